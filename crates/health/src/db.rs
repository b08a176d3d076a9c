//! Database access for health probes and the SQL console.
//!
//! [`DatabaseClient`] is the seam: the console talks to it, tests swap in a
//! fake. [`PgClient`] is the real implementation: a lazily-connected pool
//! for the configured database and one-off connections for anything else.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, ConnectOptions, Connection, Row, TypeInfo, ValueRef};
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// Database errors. Console operations report these as data.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DbError {
    /// The server could not be reached or refused the login.
    #[error("cannot connect to {database}: {source}")]
    Connect {
        /// Database name.
        database: String,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },

    /// The statement failed.
    #[error("query on {database} failed: {source}")]
    Query {
        /// Database name.
        database: String,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },

    /// The round trip exceeded its bound.
    #[error("{database} did not answer within {timeout:?}")]
    Timeout {
        /// Database name.
        database: String,
        /// The bound that expired.
        timeout: Duration,
    },
}

/// Rows of a result set with column names kept separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    /// Column names in select order.
    pub columns: Vec<String>,
    /// One array per row, values in column order.
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    /// Rows as arrays.
    pub fn to_arrays(&self) -> Value {
        Value::Array(self.rows.iter().cloned().map(Value::Array).collect())
    }

    /// Rows as objects keyed by column name.
    pub fn to_objects(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|row| {
                    let obj: Map<String, Value> =
                        self.columns.iter().cloned().zip(row.iter().cloned()).collect();
                    Value::Object(obj)
                })
                .collect(),
        )
    }
}

/// A database the console can ping and query.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Open (or borrow) a connection to `database` and run a trivial
    /// statement.
    async fn ping(&self, database: &str) -> Result<(), DbError>;

    /// Run `sql` against `database`.
    async fn query(&self, database: &str, sql: &str) -> Result<QueryResult, DbError>;
}

// ── Postgres ────────────────────────────────────────────────────────────

/// Postgres client. The configured database gets a shared pool; any other
/// name typed into the console gets a connection that is closed after the
/// call.
pub struct PgClient {
    config: DatabaseConfig,
    acquire_timeout: Duration,
    pool: Mutex<Option<PgPool>>,
}

impl PgClient {
    /// No connections are opened until first use.
    pub fn new(config: DatabaseConfig, acquire_timeout: Duration) -> Self {
        Self {
            config,
            acquire_timeout,
            pool: Mutex::new(None),
        }
    }

    fn connect_options(&self, database: &str) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.user)
            .password(&self.config.password)
            .database(database)
    }

    /// The shared pool, only for the configured database.
    fn pool_for(&self, database: &str) -> Option<PgPool> {
        if database != self.config.name {
            return None;
        }
        let mut slot = self.pool.lock();
        let pool = slot.get_or_insert_with(|| {
            info!(
                database,
                host = %self.config.host,
                max_connections = self.config.max_connections,
                "database pool created"
            );
            PgPoolOptions::new()
                .max_connections(self.config.max_connections)
                .min_connections(0)
                .acquire_timeout(self.acquire_timeout)
                .idle_timeout(Duration::from_secs(self.config.idle_timeout_secs))
                .connect_lazy_with(self.connect_options(database))
        });
        Some(pool.clone())
    }

    async fn fetch(&self, database: &str, sql: &str) -> Result<Vec<PgRow>, DbError> {
        let query_failed = |source| DbError::Query {
            database: database.to_string(),
            source,
        };
        if let Some(pool) = self.pool_for(database) {
            return sqlx::query(sql).fetch_all(&pool).await.map_err(query_failed);
        }

        let mut conn = self
            .connect_options(database)
            .connect()
            .await
            .map_err(|source| DbError::Connect {
                database: database.to_string(),
                source,
            })?;
        let rows = sqlx::query(sql).fetch_all(&mut conn).await;
        if let Err(e) = conn.close().await {
            debug!(database, error = %e, "closing one-off connection failed");
        }
        rows.map_err(query_failed)
    }
}

#[async_trait]
impl DatabaseClient for PgClient {
    async fn ping(&self, database: &str) -> Result<(), DbError> {
        self.fetch(database, "SELECT 1")
            .await
            .map_err(|e| match e {
                DbError::Query { database, source } => DbError::Connect { database, source },
                other => other,
            })?;
        debug!(database, "ping ok");
        Ok(())
    }

    async fn query(&self, database: &str, sql: &str) -> Result<QueryResult, DbError> {
        let rows = self.fetch(database, sql).await?;
        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let rows: Vec<Vec<Value>> = rows.iter().map(decode_row).collect();
        debug!(database, rows = rows.len(), "query ok");
        Ok(QueryResult { columns, rows })
    }
}

// ── Row decoding ────────────────────────────────────────────────────────

/// How a column's values are turned into JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoder {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Uuid,
    Json,
    TimestampTz,
    Timestamp,
    Date,
    Time,
    /// Types whose binary wire form is UTF-8 text.
    Text,
    /// Everything else decodes to null; cast to `::text` in the query to
    /// see the value.
    Unsupported,
}

impl Decoder {
    fn for_type(name: &str) -> Self {
        match name {
            "BOOL" => Decoder::Bool,
            "INT2" => Decoder::Int2,
            "INT4" => Decoder::Int4,
            "INT8" => Decoder::Int8,
            "FLOAT4" => Decoder::Float4,
            "FLOAT8" => Decoder::Float8,
            "NUMERIC" => Decoder::Numeric,
            "UUID" => Decoder::Uuid,
            "JSON" | "JSONB" => Decoder::Json,
            "TIMESTAMPTZ" => Decoder::TimestampTz,
            "TIMESTAMP" => Decoder::Timestamp,
            "DATE" => Decoder::Date,
            "TIME" => Decoder::Time,
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" | "\"CHAR\"" | "UNKNOWN" | "citext" => {
                Decoder::Text
            }
            _ => Decoder::Unsupported,
        }
    }
}

fn decode_row(row: &PgRow) -> Vec<Value> {
    (0..row.columns().len()).map(|i| decode_cell(row, i)).collect()
}

/// Decode one cell by its Postgres type. A cell that fails to decode is
/// null.
fn decode_cell(row: &PgRow, i: usize) -> Value {
    let is_null = row.try_get_raw(i).map(|v| v.is_null()).unwrap_or(true);
    if is_null {
        return Value::Null;
    }
    let decoded = match Decoder::for_type(row.columns()[i].type_info().name()) {
        Decoder::Bool => row.try_get::<bool, _>(i).map(Value::from),
        Decoder::Int2 => row.try_get::<i16, _>(i).map(Value::from),
        Decoder::Int4 => row.try_get::<i32, _>(i).map(Value::from),
        Decoder::Int8 => row.try_get::<i64, _>(i).map(Value::from),
        Decoder::Float4 => row.try_get::<f32, _>(i).map(Value::from),
        Decoder::Float8 => row.try_get::<f64, _>(i).map(Value::from),
        Decoder::Numeric => row.try_get::<Decimal, _>(i).map(numeric_value),
        Decoder::Uuid => row
            .try_get::<sqlx::types::Uuid, _>(i)
            .map(|u| Value::from(u.to_string())),
        Decoder::Json => row.try_get::<Value, _>(i),
        Decoder::TimestampTz => row
            .try_get::<chrono::DateTime<chrono::Utc>, _>(i)
            .map(|t| Value::from(t.to_rfc3339())),
        Decoder::Timestamp => row
            .try_get::<chrono::NaiveDateTime, _>(i)
            .map(|t| Value::from(t.to_string())),
        Decoder::Date => row
            .try_get::<chrono::NaiveDate, _>(i)
            .map(|d| Value::from(d.to_string())),
        Decoder::Time => row
            .try_get::<chrono::NaiveTime, _>(i)
            .map(|t| Value::from(t.to_string())),
        Decoder::Text => row.try_get_unchecked::<String, _>(i).map(Value::from),
        Decoder::Unsupported => return Value::Null,
    };
    decoded.unwrap_or(Value::Null)
}

/// A JSON number when the decimal fits an `f64`, its exact text otherwise.
fn numeric_value(d: Decimal) -> Value {
    d.to_f64()
        .and_then(serde_json::Number::from_f64)
        .map_or_else(|| Value::from(d.to_string()), Value::Number)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn result() -> QueryResult {
        QueryResult {
            columns: vec!["id".into(), "name".into()],
            rows: vec![vec![json!(1), json!("a")], vec![json!(2), Value::Null]],
        }
    }

    #[test]
    fn rows_as_arrays_keep_column_order() {
        assert_eq!(result().to_arrays(), json!([[1, "a"], [2, null]]));
    }

    #[test]
    fn rows_as_objects() {
        assert_eq!(
            result().to_objects(),
            json!([{"id": 1, "name": "a"}, {"id": 2, "name": null}])
        );
    }

    #[test]
    fn empty_result() {
        assert_eq!(QueryResult::default().to_arrays(), json!([]));
    }

    #[test]
    fn text_is_only_read_from_text_wire_types() {
        for name in ["TEXT", "VARCHAR", "BPCHAR", "NAME"] {
            assert_eq!(Decoder::for_type(name), Decoder::Text, "{name}");
        }
        for name in ["INTERVAL", "MONEY", "BYTEA", "INET", "INT4[]"] {
            assert_eq!(Decoder::for_type(name), Decoder::Unsupported, "{name}");
        }
    }

    #[test]
    fn numeric_and_uuid_have_their_own_decoders() {
        assert_eq!(Decoder::for_type("NUMERIC"), Decoder::Numeric);
        assert_eq!(Decoder::for_type("UUID"), Decoder::Uuid);
    }

    #[test]
    fn numeric_cells_become_numbers() {
        let price = numeric_value(Decimal::new(2999, 2));
        assert!((price.as_f64().unwrap() - 29.99).abs() < 1e-9, "{price}");
        assert_eq!(numeric_value(Decimal::new(1, 0)), json!(1.0));
        assert_eq!(numeric_value(Decimal::new(-5, 1)), json!(-0.5));
    }

    fn offline_config() -> DatabaseConfig {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        DatabaseConfig {
            host: "127.0.0.1".into(),
            port,
            ..DatabaseConfig::default()
        }
    }

    #[tokio::test]
    async fn only_the_configured_database_is_pooled() {
        let client = PgClient::new(offline_config(), Duration::from_millis(200));
        for i in 0..100 {
            assert!(client.pool_for(&format!("db_{i}")).is_none());
        }
        assert!(client.pool.lock().is_none());

        let first = client.pool_for("wapromag_test");
        assert!(first.is_some());
        assert!(client.pool_for("wapromag_test").is_some());
        assert!(client.pool.lock().is_some());
    }

    #[tokio::test]
    async fn unconfigured_database_uses_a_one_off_connection() {
        let client = PgClient::new(offline_config(), Duration::from_millis(200));
        match client.query("db_0", "SELECT 1").await {
            Err(DbError::Connect { database, .. }) => assert_eq!(database, "db_0"),
            other => panic!("expected a connect error, got {other:?}"),
        }
        assert!(client.pool.lock().is_none());
    }
}
