//! Label printer client: send ZPL to Zebra-compatible printers over TCP.
//!
//! Provides bounded-timeout reachability probes and one-shot sends, a
//! session type for status queries, parsers for the printers' single-line
//! replies, and an in-process printer emulator for tests and demos.
//! The API is async on tokio.
mod addr;
mod commands;
mod config;
pub mod emulator;
mod error;
mod status;
mod tcp;

pub use addr::{DEFAULT_PORT, PrinterAddr, parse_printer_addr};
pub use commands::{
    CATALOGUE, CONFIG_DUMP, CommandCatalogue, CommandReply, HOST_IDENTIFICATION, HOST_STATUS,
    PING, TEST_LABEL,
};
pub use config::{PrinterConfig, PrinterTimeouts, REPLY_WINDOW};
pub use emulator::{EmulatorState, PrinterEmulator, RunningEmulator};
pub use error::PrintError;
pub use status::{HostIdentity, HostStatus, PrinterSettings, PrinterState};
pub use tcp::{TcpPrinter, connect, probe, send_command, send_line};

use async_trait::async_trait;

// ── Traits ──────────────────────────────────────────────────────────────

/// Send data to a printer.
#[async_trait]
pub trait Printer: Send {
    /// Send raw bytes to the printer.
    async fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError>;

    /// Send a ZPL string to the printer (convenience wrapper over `send_raw`).
    async fn send_zpl(&mut self, zpl: &str) -> Result<(), PrintError> {
        self.send_raw(zpl.as_bytes()).await
    }
}

/// Query a printer. Only bidirectional transports implement this.
#[async_trait]
pub trait StatusQuery: Printer {
    /// Send a command and read one reply line (terminator stripped).
    async fn query_line(&mut self, cmd: &str) -> Result<String, PrintError>;

    /// Query printer status via `~HS` and parse the response.
    async fn query_status(&mut self) -> Result<HostStatus, PrintError> {
        let line = self.query_line(HOST_STATUS).await?;
        HostStatus::parse(&line)
    }

    /// Query printer identity via `~HI` and parse the response.
    async fn query_info(&mut self) -> Result<HostIdentity, PrintError> {
        let line = self.query_line(HOST_IDENTIFICATION).await?;
        HostIdentity::parse(&line)
    }

    /// Query the settings dump via `^WD` and parse the response.
    async fn query_settings(&mut self) -> Result<PrinterSettings, PrintError> {
        let line = self.query_line(CONFIG_DUMP).await?;
        PrinterSettings::parse(&line)
    }
}
