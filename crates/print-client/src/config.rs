//! Configuration types for the print client.

use std::time::Duration;

/// Session configuration for a [`TcpPrinter`](crate::TcpPrinter).
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Network timeout settings.
    pub timeouts: PrinterTimeouts,
    /// TCP keepalive idle time and probe interval.
    pub keepalive: Duration,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            timeouts: PrinterTimeouts::default(),
            keepalive: Duration::from_secs(60),
        }
    }
}

/// Timeout settings for printer sessions.
///
/// Defaults are tuned for an interactive console on the printers' LAN:
/// - `connect`: 1.5s
/// - `write`: 3s
/// - `read`: 2s (replies come back in one line or not at all)
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct PrinterTimeouts {
    /// Maximum time to wait for the TCP connection to establish.
    pub connect: Duration,
    /// Maximum time to wait for a write to complete.
    pub write: Duration,
    /// Maximum time to wait for a reply line after sending a query.
    pub read: Duration,
}

impl Default for PrinterTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_millis(1500),
            write: Duration::from_secs(3),
            read: Duration::from_secs(2),
        }
    }
}

impl PrinterConfig {
    /// Config with every timeout set to `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeouts: PrinterTimeouts {
                connect: timeout,
                write: timeout,
                read: timeout,
            },
            ..Self::default()
        }
    }
}

/// How long [`send_command`](crate::send_command) waits for a reply line
/// after the command is written. Never longer than the remaining exchange
/// bound.
pub const REPLY_WINDOW: Duration = Duration::from_millis(500);
