//! Printer reply parsers.
//!
//! Parses the single-line `~HI` (host identification) and `~HS` (host
//! status) replies and the JSON `^WD` settings dump into typed structs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::PrintError;

// ── Helpers ─────────────────────────────────────────────────────────────

fn malformed(cmd: &str, details: impl fmt::Display) -> PrintError {
    PrintError::MalformedResponse {
        details: format!("{cmd}: {details}"),
    }
}

/// Split a reply line into exactly `n` comma-separated, trimmed fields.
fn fields<'a>(cmd: &str, line: &'a str, n: usize) -> Result<Vec<&'a str>, PrintError> {
    let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    if fields.len() != n {
        return Err(malformed(
            cmd,
            format_args!("expected {n} fields, got {} in {line:?}", fields.len()),
        ));
    }
    Ok(fields)
}

// ── PrinterState ────────────────────────────────────────────────────────

/// Printer engine state as reported in replies.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrinterState {
    /// Idle and ready for a format.
    Ready,
    /// A format has started and not yet ended.
    Printing,
}

impl PrinterState {
    /// Wire spelling (`READY`, `PRINTING`).
    pub fn as_str(self) -> &'static str {
        match self {
            PrinterState::Ready => "READY",
            PrinterState::Printing => "PRINTING",
        }
    }
}

impl fmt::Display for PrinterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrinterState {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "READY" => Ok(PrinterState::Ready),
            "PRINTING" => Ok(PrinterState::Printing),
            other => Err(malformed("state", format_args!("unknown state {other:?}"))),
        }
    }
}

// ── HostIdentity ────────────────────────────────────────────────────────

/// Parsed `~HI` reply: `NAME,MODEL,FIRMWARE,SERIAL,STATE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostIdentity {
    /// Configured printer name.
    pub name: String,
    /// Model string (e.g. `ZT230`).
    pub model: String,
    /// Firmware version.
    pub firmware: String,
    /// Serial number.
    pub serial: String,
    /// Engine state at the time of the query.
    pub state: PrinterState,
}

impl HostIdentity {
    /// Parse a `~HI` reply line.
    pub fn parse(line: &str) -> Result<Self, PrintError> {
        let f = fields("~HI", line, 5)?;
        Ok(Self {
            name: f[0].to_string(),
            model: f[1].to_string(),
            firmware: f[2].to_string(),
            serial: f[3].to_string(),
            state: f[4].parse()?,
        })
    }
}

// ── HostStatus ──────────────────────────────────────────────────────────

/// Parsed `~HS` reply: `STATUS:<state>,JOBS:<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStatus {
    /// Engine state.
    pub state: PrinterState,
    /// Jobs completed since power-on or reset.
    pub jobs_printed: u64,
}

impl HostStatus {
    /// Parse a `~HS` reply line.
    pub fn parse(line: &str) -> Result<Self, PrintError> {
        let f = fields("~HS", line, 2)?;
        let state = f[0]
            .strip_prefix("STATUS:")
            .ok_or_else(|| malformed("~HS", format_args!("missing STATUS: in {:?}", f[0])))?
            .parse()?;
        let jobs = f[1]
            .strip_prefix("JOBS:")
            .ok_or_else(|| malformed("~HS", format_args!("missing JOBS: in {:?}", f[1])))?;
        let jobs_printed = jobs
            .parse::<u64>()
            .map_err(|_| malformed("~HS", format_args!("cannot parse job count {jobs:?}")))?;
        Ok(Self {
            state,
            jobs_printed,
        })
    }

    /// `true` when the printer can accept a new format.
    pub fn is_ready(&self) -> bool {
        self.state == PrinterState::Ready
    }
}

// ── PrinterSettings ─────────────────────────────────────────────────────

/// Parsed `^WD` settings dump.
///
/// Printers report numbers as JSON strings (`"dpi": "203"`); plain JSON
/// numbers are accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterSettings {
    /// Configured printer name.
    pub name: String,
    /// Model string.
    pub model: String,
    /// Print head resolution in dots per inch.
    #[serde(deserialize_with = "lenient")]
    pub dpi: u32,
    /// Label width in inches.
    #[serde(rename = "width", deserialize_with = "lenient")]
    pub width_in: f64,
    /// Label length in inches.
    #[serde(rename = "length", deserialize_with = "lenient")]
    pub length_in: f64,
    /// Darkness setting.
    #[serde(deserialize_with = "lenient")]
    pub darkness: u32,
    /// Print speed in inches per second.
    #[serde(deserialize_with = "lenient")]
    pub speed: u32,
}

impl PrinterSettings {
    /// Parse a `^WD` JSON reply.
    pub fn parse(line: &str) -> Result<Self, PrintError> {
        serde_json::from_str(line.trim()).map_err(|e| malformed("^WD", e))
    }

    /// Label size in dots, `(width, length)`.
    pub fn label_dots(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        (
            (self.width_in * dpi).round() as u32,
            (self.length_in * dpi).round() as u32,
        )
    }
}

/// Accept a number either as a JSON number or as a numeric string.
fn lenient<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    use serde::de::Error;
    match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => s.trim().parse().map_err(D::Error::custom),
        serde_json::Value::Number(n) => n.to_string().parse().map_err(D::Error::custom),
        other => Err(D::Error::custom(format!("expected number, got {other}"))),
    }
}
