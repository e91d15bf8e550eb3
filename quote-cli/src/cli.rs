use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quote_core::calculations::{by_cost, by_profit, by_selling_price};
use quote_core::{Field, FinanceInput};

use crate::config::{ConfigOverrides, LoadOptions};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Vehicle finance quotes.
///
/// Computes loan figures from deal inputs, stores named quotes, and keeps a
/// local working session that syncs with the store.
#[derive(Debug, Parser)]
#[command(
    name = "quotes",
    version,
    after_help = "Examples:\n  quotes compute --cost 10000 --profit 2000 --term 12 --rate 5.5 --out-of-pocket 1000 --tax-rate 8.25\n  quotes --json list\n  quotes session set cost 15000"
)]
pub struct Cli {
    /// TOML configuration file. Defaults to `quotes.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend (`sqlite` or `memory`).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Backend connection string, e.g. `sqlite:quotes.db?mode=rwc`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Directory for the local session snapshot.
    #[arg(long, global = true)]
    pub session_dir: Option<PathBuf>,

    /// Hide internal error details.
    #[arg(long, global = true)]
    pub production: bool,

    /// Print wire-format JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            overrides: ConfigOverrides {
                backend: self.backend.clone(),
                connection_string: self.db.clone(),
                session_dir: self.session_dir.clone(),
                production: self.production.then_some(true),
                log_level: None,
            },
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the derived figures for a set of inputs without saving.
    Compute(FinanceArgs),

    /// Save a new quote.
    Create {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        finance: FinanceArgs,
    },

    /// List saved quotes, newest first.
    List,

    /// Show one saved quote.
    Get { id: String },

    /// Rename a quote or change its inputs. Inputs not given keep their
    /// stored values.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        finance: FinanceArgs,
    },

    /// Delete a saved quote.
    Delete { id: String },

    /// Work on the local working quote.
    #[command(subcommand)]
    Session(SessionCommand),
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Print the working quote and the local list of saved quotes.
    Show,

    /// Set one input. Cost, profit and selling price stay consistent.
    Set {
        field: Field,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Set the working quote's name.
    Name { name: String },

    /// Start a blank working quote.
    New,

    /// Load a saved quote from the local list into the working quote.
    Open { id: String },

    /// Save the working quote, creating or updating it in the store.
    Save {
        /// Name to save under. Defaults to the working quote's name.
        name: Option<String>,
    },

    /// Delete a saved quote from the store and the local list.
    Delete { id: String },

    /// Replace the local list with the store's contents.
    Sync,
}

/// Finance inputs as flags. Omitted values fall back to a base input.
#[derive(Debug, Clone, Default, Args)]
pub struct FinanceArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub cost: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub profit: Option<f64>,

    /// When omitted, follows cost + profit.
    #[arg(long, allow_negative_numbers = true)]
    pub selling_price: Option<f64>,

    /// Number of monthly payments.
    #[arg(long, allow_negative_numbers = true)]
    pub term: Option<f64>,

    /// Interest rate as a percentage.
    #[arg(long, allow_negative_numbers = true)]
    pub rate: Option<f64>,

    /// Down payment.
    #[arg(long, allow_negative_numbers = true)]
    pub out_of_pocket: Option<f64>,

    /// Sales tax rate as a percentage.
    #[arg(long, allow_negative_numbers = true)]
    pub tax_rate: Option<f64>,
}

impl FinanceArgs {
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_none())
    }

    /// Apply the supplied flags to `base` in field order, reconciling cost,
    /// profit and selling price the same way interactive edits do.
    pub fn apply_to(
        &self,
        base: FinanceInput,
    ) -> FinanceInput {
        self.fields()
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| (field, v)))
            .fold(base, |input, (field, value)| match field {
                Field::Cost => by_cost(&input, value),
                Field::Profit => by_profit(&input, value),
                Field::SellingPrice => by_selling_price(&input, value),
                Field::Term => FinanceInput { term: value, ..input },
                Field::Rate => FinanceInput { rate: value, ..input },
                Field::OutOfPocket => FinanceInput {
                    out_of_pocket: value,
                    ..input
                },
                Field::TaxRate => FinanceInput {
                    tax_rate: value,
                    ..input
                },
            })
    }

    fn fields(&self) -> [(Field, Option<f64>); 7] {
        [
            (Field::Cost, self.cost),
            (Field::Profit, self.profit),
            (Field::SellingPrice, self.selling_price),
            (Field::Term, self.term),
            (Field::Rate, self.rate),
            (Field::OutOfPocket, self.out_of_pocket),
            (Field::TaxRate, self.tax_rate),
        ]
    }
}
