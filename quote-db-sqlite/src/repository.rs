use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quote_core::{
    DerivedResult, FinanceInput, QuoteRepository, RepositoryError, SavedQuote,
};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::debug;

use crate::numeric::get_f64;

const SELECT_QUOTE: &str = "SELECT id, name,
        cost, profit, selling_price, term, rate, out_of_pocket, tax_rate,
        taxes, base_loan_amount, interest, total_loan_amount, payment,
        created_at, updated_at
     FROM quote";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open a pool for `database_url`.
    ///
    /// Accepts a sqlx URL (`sqlite:quotes.db?mode=rwc`), a bare file path, or
    /// `":memory:"`. Files are created if missing. In-memory databases get a
    /// single long-lived connection, since every SQLite connection to
    /// `:memory:` sees its own empty database.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = connect_options(database_url)?;

        let mut pool_options = SqlitePoolOptions::new();
        if is_in_memory(database_url) {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        debug!(database_url, "opened sqlite pool");
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }
}

fn connect_options(database_url: &str) -> Result<SqliteConnectOptions> {
    let options = if database_url == ":memory:" {
        SqliteConnectOptions::from_str("sqlite::memory:")?
    } else if database_url.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid SQLite URL: {}", database_url))?
    } else {
        SqliteConnectOptions::new().filename(database_url)
    };
    Ok(options.create_if_missing(true))
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn write_error(
    e: sqlx::Error,
    id: &str,
) -> RepositoryError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(format!("quote id '{}' already exists", id))
        }
        _ => RepositoryError::Database(e.to_string()),
    }
}

fn row_to_saved_quote(row: &SqliteRow) -> Result<SavedQuote, RepositoryError> {
    let out_of_pocket = get_f64(row, "out_of_pocket")?;

    Ok(SavedQuote {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        name: row
            .try_get("name")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        finance_quote: FinanceInput {
            cost: get_f64(row, "cost")?,
            profit: get_f64(row, "profit")?,
            selling_price: get_f64(row, "selling_price")?,
            term: get_f64(row, "term")?,
            rate: get_f64(row, "rate")?,
            out_of_pocket,
            tax_rate: get_f64(row, "tax_rate")?,
        },
        result: DerivedResult {
            taxes: get_f64(row, "taxes")?,
            base_loan_amount: get_f64(row, "base_loan_amount")?,
            interest: get_f64(row, "interest")?,
            total_loan_amount: get_f64(row, "total_loan_amount")?,
            payment: get_f64(row, "payment")?,
            out_of_pocket,
        },
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {}", e)))?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get updated_at: {}", e)))?,
    })
}

#[async_trait]
impl QuoteRepository for SqliteRepository {
    async fn create_quote(
        &self,
        quote: SavedQuote,
    ) -> Result<SavedQuote, RepositoryError> {
        let input = &quote.finance_quote;
        let result = &quote.result;

        sqlx::query(
            "INSERT INTO quote (
                id, name,
                cost, profit, selling_price, term, rate, out_of_pocket, tax_rate,
                taxes, base_loan_amount, interest, total_loan_amount, payment,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&quote.id)
        .bind(&quote.name)
        .bind(input.cost)
        .bind(input.profit)
        .bind(input.selling_price)
        .bind(input.term)
        .bind(input.rate)
        .bind(input.out_of_pocket)
        .bind(input.tax_rate)
        .bind(result.taxes)
        .bind(result.base_loan_amount)
        .bind(result.interest)
        .bind(result.total_loan_amount)
        .bind(result.payment)
        .bind(quote.created_at)
        .bind(quote.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &quote.id))?;

        self.get_quote(&quote.id).await
    }

    async fn get_quote(
        &self,
        id: &str,
    ) -> Result<SavedQuote, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_QUOTE} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        row_to_saved_quote(&row)
    }

    async fn update_quote(
        &self,
        quote: &SavedQuote,
    ) -> Result<(), RepositoryError> {
        let input = &quote.finance_quote;
        let result = &quote.result;

        let outcome = sqlx::query(
            "UPDATE quote SET
                name = ?,
                cost = ?, profit = ?, selling_price = ?, term = ?, rate = ?,
                out_of_pocket = ?, tax_rate = ?,
                taxes = ?, base_loan_amount = ?, interest = ?, total_loan_amount = ?,
                payment = ?,
                created_at = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&quote.name)
        .bind(input.cost)
        .bind(input.profit)
        .bind(input.selling_price)
        .bind(input.term)
        .bind(input.rate)
        .bind(input.out_of_pocket)
        .bind(input.tax_rate)
        .bind(result.taxes)
        .bind(result.base_loan_amount)
        .bind(result.interest)
        .bind(result.total_loan_amount)
        .bind(result.payment)
        .bind(quote.created_at)
        .bind(quote.updated_at)
        .bind(&quote.id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if outcome.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(quote.id.clone()));
        }

        Ok(())
    }

    async fn delete_quote(
        &self,
        id: &str,
    ) -> Result<(), RepositoryError> {
        let outcome = sqlx::query("DELETE FROM quote WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if outcome.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn list_quotes(&self) -> Result<Vec<SavedQuote>, RepositoryError> {
        // rowid breaks ties between quotes created within the same instant.
        let rows = sqlx::query(&format!("{SELECT_QUOTE} ORDER BY created_at DESC, rowid DESC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_saved_quote).collect()
    }
}
