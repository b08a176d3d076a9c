//! The SQL console: connection test, ad-hoc queries, and table listing.
//!
//! Database failures are reported as `{ success: false, error }`; only
//! malformed requests surface as [`ConsoleError`].

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::ConsoleError;
use crate::config::ConsoleConfig;
use crate::db::{DatabaseClient, DbError, QueryResult};

/// Statement run by [`SqlService::test_connection`].
pub const CONNECTION_TEST_SQL: &str = "SELECT 1 AS ok";

/// Statement run by [`SqlService::list_tables`].
pub const LIST_TABLES_SQL: &str = "SELECT table_schema::text, table_name::text, table_type::text \
     FROM information_schema.tables \
     WHERE table_type = 'BASE TABLE' \
     ORDER BY table_schema, table_name";

/// Outcome of a console statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlOutcome {
    /// Whether the statement ran.
    pub success: bool,
    /// Human-readable note (connection test only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Result rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recordset: Option<Value>,
    /// Failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SqlOutcome {
    fn rows(recordset: Value) -> Self {
        Self {
            success: true,
            message: None,
            recordset: Some(recordset),
            error: None,
        }
    }

    fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            message: None,
            recordset: None,
            error: Some(error.to_string()),
        }
    }
}

/// Console statements against the configured server.
#[derive(Clone)]
pub struct SqlService {
    config: Arc<ConsoleConfig>,
    client: Arc<dyn DatabaseClient>,
}

impl SqlService {
    /// Run statements through `client`.
    pub fn new(config: Arc<ConsoleConfig>, client: Arc<dyn DatabaseClient>) -> Self {
        Self { config, client }
    }

    async fn run(&self, database: &str, sql: &str) -> Result<QueryResult, DbError> {
        let limit: Duration = self.config.timeouts.database;
        tokio::time::timeout(limit, self.client.query(database, sql))
            .await
            .map_err(|_| DbError::Timeout {
                database: database.to_string(),
                timeout: limit,
            })?
    }

    /// Connect to the database behind `alias` and run a trivial query.
    pub async fn test_connection(&self, alias: &str) -> SqlOutcome {
        let database = self.config.resolve_alias(alias);
        match self.run(&database, CONNECTION_TEST_SQL).await {
            Ok(result) => {
                info!(%database, "connection test ok");
                SqlOutcome {
                    message: Some(format!("Connected to {database}")),
                    ..SqlOutcome::rows(result.to_objects())
                }
            }
            Err(e) => {
                warn!(%database, error = %e, "connection test failed");
                SqlOutcome::failed(e)
            }
        }
    }

    /// Run `query` against `database`; rows come back as arrays in column
    /// order.
    pub async fn execute(&self, database: &str, query: &str) -> Result<SqlOutcome, ConsoleError> {
        if database.trim().is_empty() || query.trim().is_empty() {
            return Err(ConsoleError::BadRequest("Missing database or query".into()));
        }
        let database = self.config.resolve_alias(database);
        Ok(match self.run(&database, query).await {
            Ok(result) => {
                info!(%database, rows = result.rows.len(), "query executed");
                SqlOutcome::rows(result.to_arrays())
            }
            Err(e) => {
                warn!(%database, error = %e, "query failed");
                SqlOutcome::failed(e)
            }
        })
    }

    /// Base tables as `[schema, name, type]`, ordered by schema then name.
    pub async fn list_tables(&self, alias: &str) -> SqlOutcome {
        let database = self.config.resolve_alias(alias);
        match self.run(&database, LIST_TABLES_SQL).await {
            Ok(result) => SqlOutcome::rows(result.to_arrays()),
            Err(e) => {
                warn!(%database, error = %e, "table listing failed");
                SqlOutcome::failed(e)
            }
        }
    }
}
