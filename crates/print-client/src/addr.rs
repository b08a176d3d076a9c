//! Printer address parsing and resolution.
//!
//! Handles the formats operators pass as printer addresses:
//! `IP`, `IP:PORT`, `[IPv6]:PORT`, `hostname`, `hostname:PORT`. Defaults to
//! port 9100.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::PrintError;

/// Default ZPL raw printing port (JetDirect / RAW).
pub const DEFAULT_PORT: u16 = 9100;

/// An unresolved printer endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrinterAddr {
    /// Hostname or IP literal.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl PrinterAddr {
    /// Build an address from parts.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Resolve to a socket address. The first result wins for dual-stack
    /// hostnames.
    pub async fn resolve(&self) -> Result<SocketAddr, PrintError> {
        if let Ok(ip) = self.host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| PrintError::NoAddressFound(self.host.clone()))
    }
}

impl fmt::Display for PrinterAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Parse a user-provided printer address string without touching DNS.
///
/// Accepts these formats:
/// - `192.168.1.55:9100` -- IP with explicit port
/// - `192.168.1.55` -- IP without port (defaults to 9100)
/// - `[::1]:9100` / `::1` -- IPv6 with or without port
/// - `printer01.local:9100` -- hostname with port
/// - `printer01.local` -- hostname without port (defaults to 9100)
pub fn parse_printer_addr(input: &str) -> Result<PrinterAddr, PrintError> {
    let input = input.trim();
    let invalid = || PrintError::InvalidAddress(input.to_string());

    // 1. Full socket address (e.g., "192.168.1.55:9100" or "[::1]:9100")
    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(PrinterAddr::new(addr.ip().to_string(), addr.port()));
    }

    // 2. Bare IP without port (e.g., "192.168.1.55" or "::1")
    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(PrinterAddr::new(ip.to_string(), DEFAULT_PORT));
    }

    // 3. host:port or bare host
    let (host, port) = match input.rsplit_once(':') {
        Some((host, port)) => (host, port.parse::<u16>().map_err(|_| invalid())?),
        None => (input, DEFAULT_PORT),
    };
    if !is_hostname(host) {
        return Err(invalid());
    }
    Ok(PrinterAddr::new(host, port))
}

fn is_hostname(host: &str) -> bool {
    !host.is_empty()
        && host.len() <= 253
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_with_port() {
        let addr = parse_printer_addr("192.168.1.55:9100").unwrap();
        assert_eq!(addr.host, "192.168.1.55");
        assert_eq!(addr.port, 9100);
    }

    #[test]
    fn test_ip_with_custom_port() {
        let addr = parse_printer_addr("10.0.0.1:6101").unwrap();
        assert_eq!(addr, PrinterAddr::new("10.0.0.1", 6101));
    }

    #[test]
    fn test_ip_without_port_defaults_to_9100() {
        let addr = parse_printer_addr("192.168.1.55").unwrap();
        assert_eq!(addr.port, DEFAULT_PORT);
    }

    #[test]
    fn test_ipv6() {
        let addr = parse_printer_addr("[::1]:9101").unwrap();
        assert_eq!(addr, PrinterAddr::new("::1", 9101));
        assert_eq!(addr.to_string(), "[::1]:9101");
        let bare = parse_printer_addr("::1").unwrap();
        assert_eq!(bare.port, DEFAULT_PORT);
    }

    #[test]
    fn test_hostname() {
        assert_eq!(
            parse_printer_addr("zebra-printer-1").unwrap(),
            PrinterAddr::new("zebra-printer-1", DEFAULT_PORT)
        );
        assert_eq!(
            parse_printer_addr(" printer01.local:9200 ").unwrap(),
            PrinterAddr::new("printer01.local", 9200)
        );
    }

    #[test]
    fn test_garbage_input() {
        for input in ["", "not a valid address!!!", "host:port", "host:99999", ":9100"] {
            match parse_printer_addr(input) {
                Err(PrintError::InvalidAddress(s)) => assert_eq!(s, input.trim()),
                other => panic!("{input:?}: expected InvalidAddress, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_resolve_ip_literal() {
        let sa = PrinterAddr::new("127.0.0.1", 9100).resolve().await.unwrap();
        assert!(sa.ip().is_loopback());
        assert_eq!(sa.port(), 9100);
    }

    #[tokio::test]
    async fn test_unresolvable_hostname() {
        match PrinterAddr::new("no-such-host.invalid", 9100).resolve().await {
            Err(PrintError::NoAddressFound(s)) => assert_eq!(s, "no-such-host.invalid"),
            other => panic!("expected NoAddressFound, got {other:?}"),
        }
    }
}
