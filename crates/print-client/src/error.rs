//! Typed error types for the print client.

use std::io;
use std::time::Duration;

/// Printer error conditions, categorized by type.
///
/// Each variant carries enough context to produce a helpful error message.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    // -- Connection --
    /// The printer actively refused the connection (e.g. port not open).
    #[error("connection refused: {addr}")]
    ConnectionRefused {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// TCP connect did not complete within its bound.
    #[error("connection timed out: {addr} ({timeout:?})")]
    ConnectionTimeout {
        /// The address that was attempted.
        addr: String,
        /// The bound that elapsed.
        timeout: Duration,
    },

    /// Connection failed for a reason other than refusal or timeout.
    #[error("connection failed: {addr}")]
    ConnectionFailed {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The printer closed the connection before answering.
    #[error("connection closed by printer")]
    ConnectionClosed,

    // -- Address --
    /// The provided address string could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// DNS resolution found no addresses for the given hostname.
    #[error("no address found for hostname: {0}")]
    NoAddressFound(String),

    // -- I/O --
    /// Writing data to the printer failed.
    #[error("write failed: {0}")]
    WriteFailed(#[source] io::Error),

    /// Reading data from the printer failed.
    #[error("read failed: {0}")]
    ReadFailed(#[source] io::Error),

    /// The printer did not answer within the read timeout.
    #[error("read timed out waiting for response")]
    ReadTimeout,

    /// A whole connect/send/reply exchange exceeded its bound.
    #[error("exchange with {addr} timed out after {timeout:?}")]
    ExchangeTimeout {
        /// The printer address.
        addr: String,
        /// The bound that elapsed.
        timeout: Duration,
    },

    // -- Protocol --
    /// A printer reply could not be parsed.
    #[error("malformed response: {details}")]
    MalformedResponse {
        /// Human-readable description of the parsing failure.
        details: String,
    },

    // -- Emulator --
    /// The emulator could not bind its listening socket.
    #[error("cannot bind {addr}")]
    Bind {
        /// The requested bind address.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl PrintError {
    /// Returns `true` if the failure was a bound elapsing rather than an
    /// explicit error from the peer.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            PrintError::ConnectionTimeout { .. }
                | PrintError::ReadTimeout
                | PrintError::ExchangeTimeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_errors() {
        assert!(
            PrintError::ConnectionTimeout {
                addr: "x".into(),
                timeout: Duration::from_secs(1),
            }
            .is_timeout()
        );
        assert!(PrintError::ReadTimeout.is_timeout());
        assert!(
            PrintError::ExchangeTimeout {
                addr: "x".into(),
                timeout: Duration::from_millis(1500),
            }
            .is_timeout()
        );
    }

    #[test]
    fn non_timeout_errors() {
        assert!(
            !PrintError::ConnectionRefused {
                addr: "x".into(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "test"),
            }
            .is_timeout()
        );
        assert!(!PrintError::ConnectionClosed.is_timeout());
        assert!(!PrintError::InvalidAddress("x".into()).is_timeout());
        assert!(
            !PrintError::MalformedResponse {
                details: "x".into()
            }
            .is_timeout()
        );
        assert!(
            !PrintError::WriteFailed(io::Error::new(io::ErrorKind::BrokenPipe, "test"))
                .is_timeout()
        );
    }

    #[test]
    fn display_includes_address() {
        let e = PrintError::ExchangeTimeout {
            addr: "zebra-printer-1:9100".into(),
            timeout: Duration::from_millis(3000),
        };
        assert_eq!(
            e.to_string(),
            "exchange with zebra-printer-1:9100 timed out after 3s"
        );
    }
}
