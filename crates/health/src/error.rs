use labeldesk_print_client::PrintError;

/// Errors surfaced by console operations.
///
/// Probe failures never appear here: they are recorded as data in a
/// [`HealthSnapshot`](crate::HealthSnapshot). These are request and
/// infrastructure errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConsoleError {
    /// The request was malformed (missing or empty fields).
    #[error("{0}")]
    BadRequest(String),

    /// No printer is configured under this id.
    #[error("Unknown printer: {0}")]
    UnknownPrinter(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A printer session failed.
    #[error("printer {id}: {source}")]
    Printer {
        /// Printer id.
        id: String,
        /// Underlying transport error.
        #[source]
        source: PrintError,
    },
}

impl ConsoleError {
    /// Whether the caller is at fault (the HTTP analogue is a 4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::BadRequest(_) | Self::UnknownPrinter(_))
    }
}
