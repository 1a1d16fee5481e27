//! Database bootstrap: create the database if missing, then the schema and tables.

use crate::error::{AppError, ConfigError};
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// Schema-qualified table names, shared by the DDL and the repository queries.
#[derive(Clone, Debug)]
pub struct Tables {
    pub schema: String,
    pub store: String,
    pub employee: String,
    pub customer: String,
    pub store_customer: String,
}

impl Tables {
    pub fn new(schema: &str) -> Self {
        let q = |table: &str| format!("{}.{}", quote_ident(schema), quote_ident(table));
        Tables {
            schema: quote_ident(schema),
            store: q("pet_store"),
            employee: q("employee"),
            customer: q("customer"),
            store_customer: q("pet_store_customer"),
        }
    }
}

/// Create the schema and tables if they do not exist.
///
/// Foreign keys have no ON DELETE action: removing a store's employees and
/// customer links is done explicitly by the service, per the delete policy.
pub async fn ensure_schema(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    let t = Tables::new(schema);
    let statements = [
        format!("CREATE SCHEMA IF NOT EXISTS {}", t.schema),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                pet_store_id BIGSERIAL PRIMARY KEY,
                pet_store_name TEXT,
                pet_store_address TEXT,
                pet_store_city TEXT,
                pet_store_state TEXT,
                pet_store_zip TEXT,
                pet_store_phone TEXT
            )
            "#,
            t.store
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                employee_id BIGSERIAL PRIMARY KEY,
                pet_store_id BIGINT NOT NULL REFERENCES {} (pet_store_id),
                employee_first_name TEXT,
                employee_last_name TEXT,
                employee_phone TEXT,
                employee_job_title TEXT
            )
            "#,
            t.employee, t.store
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS employee_pet_store_id_idx ON {} (pet_store_id)",
            t.employee
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                customer_id BIGSERIAL PRIMARY KEY,
                customer_first_name TEXT,
                customer_last_name TEXT,
                customer_email TEXT
            )
            "#,
            t.customer
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                pet_store_id BIGINT NOT NULL REFERENCES {} (pet_store_id),
                customer_id BIGINT NOT NULL REFERENCES {} (customer_id),
                PRIMARY KEY (pet_store_id, customer_id)
            )
            "#,
            t.store_customer, t.store, t.customer
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS pet_store_customer_customer_id_idx ON {} (customer_id)",
            t.store_customer
        ),
    ];
    for sql in &statements {
        tracing::debug!(sql = %sql, "ddl");
        sqlx::query(sql).execute(pool).await?;
    }
    tracing::info!(schema = %schema, "schema ready");
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, db_name) = admin_options(database_url)?;
    let Some(db_name) = db_name else {
        return Ok(());
    };
    if db_name == "postgres" {
        return Ok(());
    }
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Connect options for the `postgres` maintenance database on the same server,
/// plus the database named by the URL (if any).
fn admin_options(database_url: &str) -> Result<(PgConnectOptions, Option<String>), ConfigError> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| ConfigError::DatabaseUrl(e.to_string()))?;
    let db_name = opts
        .get_database()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    Ok((opts.database("postgres"), db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
