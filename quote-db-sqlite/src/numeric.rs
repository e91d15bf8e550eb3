use quote_core::RepositoryError;
use sqlx::{Row, TypeInfo, ValueRef};

/// Read a numeric column as `f64`, accepting both INTEGER and REAL storage.
///
/// SQLite may hand back whole-number reals as INTEGER when rows were written
/// by hand or by another tool, so both classes are widened here.
pub fn get_f64(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<f64, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{}' not found: {}", column, e)))?;

    if value_ref.is_null() {
        return Err(RepositoryError::Database(format!("Column '{}' is NULL", column)));
    }

    let type_info = value_ref.type_info();
    let type_name = type_info.name();

    match type_name {
        "INTEGER" => {
            let val: i64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!(
                    "Failed to get INTEGER from '{}': {}",
                    column, e
                ))
            })?;
            Ok(val as f64)
        }
        "REAL" => row.try_get(column).map_err(|e| {
            RepositoryError::Database(format!("Failed to get REAL from '{}': {}", column, e))
        }),
        _ => Err(RepositoryError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            type_name, column
        ))),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        sqlx::query(
            "CREATE TABLE numbers (
                id INTEGER PRIMARY KEY,
                int_value INTEGER,
                real_value REAL,
                null_value REAL,
                text_value TEXT
            )",
        )
        .execute(&pool)
        .await
        .expect("Failed to create test table");
        pool
    }

    async fn fetch(
        pool: &SqlitePool,
        insert: &str,
    ) -> sqlx::sqlite::SqliteRow {
        sqlx::query(insert)
            .execute(pool)
            .await
            .expect("Failed to insert test data");
        sqlx::query("SELECT * FROM numbers WHERE id = 1")
            .fetch_one(pool)
            .await
            .expect("Failed to fetch row")
    }

    #[tokio::test]
    async fn integer_storage_widens_to_f64() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO numbers (id, int_value) VALUES (1, 12000)").await;

        assert_eq!(get_f64(&row, "int_value"), Ok(12000.0));
    }

    #[tokio::test]
    async fn real_storage_is_returned_bit_for_bit() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO numbers (id, real_value) VALUES (1, 0.0825)").await;

        let value = get_f64(&row, "real_value").expect("real");

        assert_eq!(value.to_bits(), 0.0825_f64.to_bits());
    }

    #[tokio::test]
    async fn negative_real_survives() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO numbers (id, real_value) VALUES (1, -456.78)").await;

        assert_eq!(get_f64(&row, "real_value"), Ok(-456.78));
    }

    #[tokio::test]
    async fn null_is_an_error() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO numbers (id, null_value) VALUES (1, NULL)").await;

        assert_eq!(
            get_f64(&row, "null_value"),
            Err(RepositoryError::Database("Column 'null_value' is NULL".to_string()))
        );
    }

    #[tokio::test]
    async fn text_is_an_unexpected_type() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO numbers (id, text_value) VALUES (1, 'twelve')").await;

        assert_eq!(
            get_f64(&row, "text_value"),
            Err(RepositoryError::Database(
                "Unexpected type 'TEXT' for column 'text_value'".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn missing_column_is_reported() {
        let pool = setup_test_db().await;
        let row = fetch(&pool, "INSERT INTO numbers (id) VALUES (1)").await;

        let result = get_f64(&row, "nonexistent_column");

        assert!(matches!(result, Err(RepositoryError::Database(msg)) if msg.starts_with("Column 'nonexistent_column' not found:")));
    }
}
