use quote_core::calculations::compute;
use quote_core::db::RepositoryRegistry;
use quote_core::session::FileLocalStore;
use quote_core::{
    CreateQuoteRequest, FinanceInput, QuoteApi, QuoteError, QuoteSession, QuoteStore,
    UpdateQuoteRequest,
};
use quote_db_sqlite::SqliteRepositoryFactory;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::cli::{Command, SessionCommand};
use crate::config::AppConfig;
use crate::output;

/// Registry with every backend this binary ships: `memory` and `sqlite`.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::with_builtin();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Executes commands against the configured store and local session.
///
/// The store is opened on first use and shared by later commands, so the
/// `memory` backend keeps its contents for the life of the `App`.
pub struct App {
    config: AppConfig,
    registry: RepositoryRegistry,
    json: bool,
    store: OnceCell<QuoteStore>,
}

impl App {
    pub fn new(
        config: AppConfig,
        json: bool,
    ) -> Self {
        Self {
            config,
            registry: build_registry(),
            json,
            store: OnceCell::new(),
        }
    }

    async fn store(&self) -> Result<&QuoteStore, QuoteError> {
        self.store
            .get_or_try_init(|| async {
                let repo = self.registry.open(&self.config.database).await?;
                Ok::<_, QuoteError>(QuoteStore::new(repo))
            })
            .await
    }

    fn local_store(&self) -> FileLocalStore {
        FileLocalStore::new(self.config.session.dir.clone())
    }

    /// Run one command and return what should be printed on success.
    pub async fn run(
        &self,
        command: &Command,
    ) -> Result<String, QuoteError> {
        debug!(?command, "running command");
        match command {
            Command::Compute(finance) => {
                let result = compute(&finance.apply_to(FinanceInput::default()));
                if self.json {
                    json_out(output::to_json(&result))
                } else {
                    Ok(output::render_result(&result))
                }
            }
            Command::Create { name, finance } => {
                let request =
                    CreateQuoteRequest::new(name.clone(), finance.apply_to(FinanceInput::default()));
                let created = self.store().await?.create_quote(request).await?;
                self.render_quote(&created)
            }
            Command::List => {
                let quotes = self.store().await?.list_quotes().await?;
                if self.json {
                    json_out(output::quotes_json(&quotes))
                } else {
                    Ok(output::render_list(&quotes))
                }
            }
            Command::Get { id } => {
                let quote = self.store().await?.get_quote(id).await?;
                self.render_quote(&quote)
            }
            Command::Update { id, name, finance } => {
                let store = self.store().await?;
                let finance_quote = if finance.is_empty() {
                    None
                } else {
                    let current = store.get_quote(id).await?;
                    Some(finance.apply_to(current.finance_quote))
                };
                let request = UpdateQuoteRequest {
                    name: name.clone(),
                    finance_quote,
                    result: None,
                };
                let updated = store.update_quote(id, request).await?;
                self.render_quote(&updated)
            }
            Command::Delete { id } => {
                self.store().await?.delete_quote(id).await?;
                self.render_deleted(id)
            }
            Command::Session(command) => self.run_session(command).await,
        }
    }

    /// Session commands restore the local snapshot, apply one change, and
    /// write the snapshot back.
    async fn run_session(
        &self,
        command: &SessionCommand,
    ) -> Result<String, QuoteError> {
        let local = self.local_store();
        let mut session = QuoteSession::restore(&local);

        let rendered = match command {
            SessionCommand::Show => self.render_session(&session)?,
            SessionCommand::Set { field, value } => {
                session.set_field(*field, *value);
                self.render_session(&session)?
            }
            SessionCommand::Name { name } => {
                session.set_name(name.clone());
                self.render_session(&session)?
            }
            SessionCommand::New => {
                session.new_quote();
                self.render_session(&session)?
            }
            SessionCommand::Open { id } => {
                session.open(id)?;
                self.render_session(&session)?
            }
            SessionCommand::Save { name } => {
                let name = name.clone().unwrap_or_else(|| session.working().name.clone());
                let store = self.store().await?;
                let saved = session.save(store, &name).await?;
                self.render_quote(&saved)?
            }
            SessionCommand::Delete { id } => {
                let store = self.store().await?;
                session.delete(store, id).await?;
                self.render_deleted(id)?
            }
            SessionCommand::Sync => {
                let store = self.store().await?;
                session.refresh(store).await?;
                self.render_session(&session)?
            }
        };

        session.persist(&local);
        Ok(rendered)
    }

    fn render_quote(
        &self,
        quote: &quote_core::SavedQuote,
    ) -> Result<String, QuoteError> {
        if self.json {
            json_out(output::quote_json(quote))
        } else {
            Ok(output::render_quote(quote))
        }
    }

    fn render_session(
        &self,
        session: &QuoteSession,
    ) -> Result<String, QuoteError> {
        if self.json {
            json_out(output::to_json(session))
        } else {
            Ok(output::render_session(session))
        }
    }

    fn render_deleted(
        &self,
        id: &str,
    ) -> Result<String, QuoteError> {
        if self.json {
            json_out(output::to_json(&json!({ "id": id, "deleted": true })))
        } else {
            Ok(format!("Deleted quote {id}.\n"))
        }
    }

    /// Printable form of a failure, honouring `--json` and production masking.
    pub fn render_error(
        &self,
        error: &QuoteError,
    ) -> String {
        render_error(error, self.json, self.config.production)
    }
}

pub fn render_error(
    error: &QuoteError,
    json: bool,
    production: bool,
) -> String {
    if !json {
        return output::render_error(error, production);
    }
    let api_error = error.to_api_error(production);
    output::error_json(&api_error).unwrap_or_else(|_| api_error.message.clone())
}

fn json_out(result: serde_json::Result<String>) -> Result<String, QuoteError> {
    result.map_err(|e| QuoteError::Internal(format!("failed to encode output: {e}")))
}
