//! Console configuration: targets, pool sizing, and per-call-site timeouts.
//!
//! Loaded once at start-up in three layers (built-in defaults, an optional
//! TOML file, then environment variables) and shared read-only afterwards.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::ConsoleError;

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Login user.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Database probed by health checks and used for the alias.
    pub name: String,
    /// Operator-facing alias that maps onto `name`.
    pub alias: String,
    /// Pool size per database.
    pub max_connections: u32,
    /// Seconds an idle pooled connection is kept.
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "wapromag-db".into(),
            port: 5432,
            user: "postgres".into(),
            password: String::new(),
            name: "wapromag_test".into(),
            alias: "wapromag".into(),
            max_connections: 5,
            idle_timeout_secs: 30,
        }
    }
}

/// One configured printer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterEntry {
    /// Hostname or IP.
    pub host: String,
    /// RAW port.
    pub port: u16,
    /// Display name.
    pub name: String,
    /// Model string.
    pub model: String,
}

impl PrinterEntry {
    fn new(host: &str, name: &str, model: &str) -> Self {
        Self {
            host: host.into(),
            port: labeldesk_print_client::DEFAULT_PORT,
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Per-call-site probe bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeTimeouts {
    /// Start-up preflight.
    #[serde(with = "millis")]
    pub preflight: Duration,
    /// Live health.
    #[serde(with = "millis")]
    pub live: Duration,
    /// Detailed health.
    #[serde(with = "millis")]
    pub detailed: Duration,
    /// Diagnostic report.
    #[serde(with = "millis")]
    pub report: Duration,
    /// Full diagnostics.
    #[serde(with = "millis")]
    pub full: Duration,
    /// Interactive printer test and status.
    #[serde(with = "millis")]
    pub printer_test: Duration,
    /// Test print.
    #[serde(with = "millis")]
    pub test_print: Duration,
    /// Operator command send.
    #[serde(with = "millis")]
    pub command: Duration,
    /// SQL console round trip.
    #[serde(with = "millis")]
    pub database: Duration,
}

impl Default for ProbeTimeouts {
    fn default() -> Self {
        let ms = Duration::from_millis;
        Self {
            preflight: ms(800),
            live: ms(800),
            detailed: ms(800),
            report: ms(1500),
            full: ms(1000),
            printer_test: ms(1500),
            test_print: ms(3000),
            command: ms(4000),
            database: ms(3000),
        }
    }
}

/// Complete console configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Printers keyed by id (`zebra-1`, `zebra-2`).
    pub printers: BTreeMap<String, PrinterEntry>,
    /// Probe bounds in milliseconds.
    pub timeouts: ProbeTimeouts,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let mut printers = BTreeMap::new();
        printers.insert(
            "zebra-1".to_string(),
            PrinterEntry::new("zebra-printer-1", "ZEBRA-001", "ZT230"),
        );
        printers.insert(
            "zebra-2".to_string(),
            PrinterEntry::new("zebra-printer-2", "ZEBRA-002", "ZT410"),
        );
        Self {
            database: DatabaseConfig::default(),
            printers,
            timeouts: ProbeTimeouts::default(),
        }
    }
}

/// Environment variables and the config keys they override.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("DB_ALIAS", "database.alias"),
    ("DB_MAX_CONNECTIONS", "database.max_connections"),
    ("DB_IDLE_TIMEOUT_SECS", "database.idle_timeout_secs"),
    ("ZEBRA_1_HOST", "printers.zebra-1.host"),
    ("ZEBRA_1_PORT", "printers.zebra-1.port"),
    ("ZEBRA_1_NAME", "printers.zebra-1.name"),
    ("ZEBRA_1_MODEL", "printers.zebra-1.model"),
    ("ZEBRA_2_HOST", "printers.zebra-2.host"),
    ("ZEBRA_2_PORT", "printers.zebra-2.port"),
    ("ZEBRA_2_NAME", "printers.zebra-2.name"),
    ("ZEBRA_2_MODEL", "printers.zebra-2.model"),
];

impl ConsoleConfig {
    /// Load from defaults, an optional TOML file, and the process
    /// environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConsoleError> {
        Self::load_with(file, |key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load) with an injectable variable lookup.
    pub fn load_with<F>(file: Option<&Path>, env: F) -> Result<Self, ConsoleError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, env(var))?;
        }
        Ok(builder.build()?.try_deserialize()?)
    }
}

/// `Duration` as integer milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = ConsoleConfig::load_with(None, env(&[])).unwrap();
        assert_eq!(cfg, ConsoleConfig::default());
        assert_eq!(cfg.printers["zebra-1"].host, "zebra-printer-1");
        assert_eq!(cfg.printers["zebra-2"].model, "ZT410");
        assert_eq!(cfg.timeouts.command, Duration::from_millis(4000));
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = ConsoleConfig::load_with(
            None,
            env(&[
                ("DB_HOST", "10.0.0.5"),
                ("DB_PORT", "6543"),
                ("ZEBRA_2_HOST", "127.0.0.1"),
                ("ZEBRA_2_PORT", "19100"),
                ("ZEBRA_1_NAME", "FRONT-DESK"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.database.host, "10.0.0.5");
        assert_eq!(cfg.database.port, 6543);
        assert_eq!(cfg.printers["zebra-2"].host, "127.0.0.1");
        assert_eq!(cfg.printers["zebra-2"].port, 19100);
        assert_eq!(cfg.printers["zebra-1"].name, "FRONT-DESK");
        assert_eq!(cfg.printers["zebra-1"].port, 9100);
    }

    #[test]
    fn file_layer_sits_between_defaults_and_environment() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[database]
host = "db.internal"
name = "wapromag_prod"

[printers.zebra-1]
host = "10.1.1.1"

[timeouts]
live = 250
"#
        )
        .unwrap();

        let cfg =
            ConsoleConfig::load_with(Some(file.path()), env(&[("DB_HOST", "override")])).unwrap();
        assert_eq!(cfg.database.host, "override");
        assert_eq!(cfg.database.name, "wapromag_prod");
        assert_eq!(cfg.printers["zebra-1"].host, "10.1.1.1");
        assert_eq!(cfg.printers["zebra-1"].model, "ZT230");
        assert_eq!(cfg.timeouts.live, Duration::from_millis(250));
        assert_eq!(cfg.timeouts.report, Duration::from_millis(1500));
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let err = ConsoleConfig::load_with(None, env(&[("ZEBRA_1_PORT", "ninety")])).unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)), "{err:?}");
    }
}
