//! Probe targets derived from configuration.

use serde::Serialize;

use crate::config::{ConsoleConfig, DatabaseConfig};

/// A configured printer, addressed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrinterTarget {
    /// Stable id (`zebra-1`).
    #[serde(skip)]
    pub id: String,
    /// Hostname or IP.
    pub host: String,
    /// RAW port.
    pub port: u16,
    /// Display name.
    #[serde(rename = "printer")]
    pub display_name: String,
    /// Model string.
    pub model: String,
}

/// The database a health check probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseTarget {
    /// Key the result is reported under.
    pub alias: String,
    /// Actual database name.
    pub database: String,
}

/// Map an operator-supplied database name onto a real one.
///
/// Blank input and the configured alias (case-insensitively) map to the
/// configured database; anything else passes through unchanged.
pub fn resolve_alias(db: &DatabaseConfig, name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(&db.alias) {
        db.name.clone()
    } else {
        name.to_string()
    }
}

impl ConsoleConfig {
    /// All printers, ordered by id.
    pub fn printer_targets(&self) -> Vec<PrinterTarget> {
        self.printers
            .keys()
            .filter_map(|id| self.printer(id))
            .collect()
    }

    /// The printer configured under `id`.
    pub fn printer(&self, id: &str) -> Option<PrinterTarget> {
        self.printers.get(id).map(|p| PrinterTarget {
            id: id.to_string(),
            host: p.host.clone(),
            port: p.port,
            display_name: p.name.clone(),
            model: p.model.clone(),
        })
    }

    /// The database probed by health checks.
    pub fn database_target(&self) -> DatabaseTarget {
        DatabaseTarget {
            alias: self.database.alias.clone(),
            database: self.database.name.clone(),
        }
    }

    /// See [`resolve_alias`].
    pub fn resolve_alias(&self, name: &str) -> String {
        resolve_alias(&self.database, name)
    }
}
