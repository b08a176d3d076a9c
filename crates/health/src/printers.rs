//! Operator-facing printer operations.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use labeldesk_print_client::{
    CATALOGUE, CommandCatalogue, HostIdentity, HostStatus, PrintError, PrinterAddr,
    PrinterConfig, PrinterSettings, StatusQuery, TEST_LABEL, TcpPrinter, probe, send_command,
    send_line,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::ConsoleError;
use crate::config::ConsoleConfig;
use crate::report::Check;
use crate::target::PrinterTarget;

/// A printer's configuration plus its reachability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrinterStatus {
    /// Configured target.
    #[serde(flatten)]
    pub target: PrinterTarget,
    /// TCP reachability.
    pub connection: Check,
}

/// Whether the printer is online.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// Accepting connections.
    Online,
    /// Not reachable.
    Offline,
}

/// `{ "success": true, "status": "online" | "offline" }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresenceReport {
    /// Always true: the lookup itself succeeded.
    pub success: bool,
    /// Reachability.
    pub status: Presence,
}

/// Result of an operator command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    /// Whether the command was delivered.
    pub success: bool,
    /// First reply line, when the printer answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// Identity, status, and settings read over one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrinterInfo {
    /// `~HI` reply.
    pub identity: HostIdentity,
    /// `~HS` reply.
    pub status: HostStatus,
    /// `^WD` reply.
    pub settings: PrinterSettings,
}

/// Printer operations over the configured fleet.
#[derive(Debug, Clone)]
pub struct PrinterService {
    config: Arc<ConsoleConfig>,
}

impl PrinterService {
    /// Serve the printers in `config`.
    pub fn new(config: Arc<ConsoleConfig>) -> Self {
        Self { config }
    }

    fn lookup(&self, id: &str) -> Result<PrinterTarget, ConsoleError> {
        self.config
            .printer(id)
            .ok_or_else(|| ConsoleError::UnknownPrinter(id.to_string()))
    }

    /// Every printer with its reachability, probed concurrently.
    pub async fn status_all(&self) -> BTreeMap<String, PrinterStatus> {
        let limit = self.config.timeouts.printer_test;
        let checks = self.config.printer_targets().into_iter().map(|target| async move {
            let success = probe(&target.host, target.port, limit).await;
            (
                target.id.clone(),
                PrinterStatus {
                    target,
                    connection: Check { success },
                },
            )
        });
        join_all(checks).await.into_iter().collect()
    }

    /// Whether printer `id` accepts a connection.
    pub async fn test(&self, id: &str) -> Result<Check, ConsoleError> {
        let target = self.lookup(id)?;
        let success = probe(&target.host, target.port, self.config.timeouts.printer_test).await;
        Ok(Check { success })
    }

    /// Online or offline.
    pub async fn status(&self, id: &str) -> Result<PresenceReport, ConsoleError> {
        let Check { success } = self.test(id).await?;
        Ok(PresenceReport {
            success: true,
            status: if success {
                Presence::Online
            } else {
                Presence::Offline
            },
        })
    }

    /// Send the built-in test label.
    pub async fn test_print(&self, id: &str) -> Result<Check, ConsoleError> {
        let target = self.lookup(id)?;
        let success = send_line(
            &target.host,
            target.port,
            TEST_LABEL,
            self.config.timeouts.test_print,
        )
        .await;
        info!(printer = id, success, "test print");
        Ok(Check { success })
    }

    /// Send an operator command and capture the reply line, if any.
    pub async fn send_command(
        &self,
        id: &str,
        command: &str,
    ) -> Result<CommandOutcome, ConsoleError> {
        let target = self.lookup(id)?;
        if command.trim().is_empty() {
            return Err(ConsoleError::BadRequest("Empty command".into()));
        }
        match send_command(&target.host, target.port, command, self.config.timeouts.command).await
        {
            Ok(reply) => {
                info!(printer = id, command, answered = reply.response.is_some(), "command sent");
                Ok(CommandOutcome {
                    success: true,
                    response: reply.response,
                })
            }
            Err(e) => {
                warn!(printer = id, command, error = %e, "command failed");
                Ok(CommandOutcome {
                    success: false,
                    response: None,
                })
            }
        }
    }

    /// The fixed command catalogue.
    pub fn commands(&self) -> CommandCatalogue {
        CATALOGUE
    }

    /// Query identity, status, and settings over one session.
    pub async fn info(&self, id: &str) -> Result<PrinterInfo, ConsoleError> {
        let target = self.lookup(id)?;
        let wrap = |source: PrintError| ConsoleError::Printer {
            id: id.to_string(),
            source,
        };
        let addr = PrinterAddr::new(&target.host, target.port).to_string();
        let config = PrinterConfig::with_timeout(self.config.timeouts.printer_test);
        let mut session = TcpPrinter::connect(&addr, config).await.map_err(wrap)?;
        let identity = session.query_info().await.map_err(wrap)?;
        let status = session.query_status().await.map_err(wrap)?;
        let settings = session.query_settings().await.map_err(wrap)?;
        Ok(PrinterInfo {
            identity,
            status,
            settings,
        })
    }
}
