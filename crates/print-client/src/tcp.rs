//! TCP transport for ZPL printers (port 9100 / JetDirect / RAW).
//!
//! One-shot helpers ([`probe`], [`send_line`], [`send_command`]) bound the
//! whole exchange by a single timeout and always drop the socket before
//! returning. [`TcpPrinter`] keeps a session open for several queries.

use std::future::Future;
use std::io;
use std::net::Shutdown;
use std::time::Duration;

use async_trait::async_trait;
use socket2::{SockRef, TcpKeepalive};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout, timeout_at};
use tracing::debug;

use crate::addr::{PrinterAddr, parse_printer_addr};
use crate::commands::CommandReply;
use crate::config::REPLY_WINDOW;
use crate::{PrintError, Printer, PrinterConfig, StatusQuery};

// ── One-shot exchanges ─────────────────────────────────────────────────

/// Check whether a TCP connection to `host:port` can be established within
/// `limit`. The socket is closed immediately.
pub async fn probe(host: &str, port: u16, limit: Duration) -> bool {
    let addr = PrinterAddr::new(host, port);
    match connect(&addr, limit).await {
        Ok(_) => {
            debug!(%addr, "probe succeeded");
            true
        }
        Err(e) => {
            debug!(%addr, error = %e, "probe failed");
            false
        }
    }
}

/// Write `data` plus a newline to `host:port`. Connect, write, flush and
/// shutdown together must finish within `limit`.
pub async fn send_line(host: &str, port: u16, data: &str, limit: Duration) -> bool {
    let addr = PrinterAddr::new(host, port);
    let result = bounded(&addr, limit, async {
        let mut stream = open(&addr).await?;
        write_line(&mut stream, data).await?;
        stream.shutdown().await.map_err(PrintError::WriteFailed)?;
        Ok(())
    })
    .await;
    match result {
        Ok(()) => {
            debug!(%addr, bytes = data.len() + 1, "line sent");
            true
        }
        Err(e) => {
            debug!(%addr, error = %e, "send failed");
            false
        }
    }
}

/// Write `command` plus a newline and wait briefly for one reply line.
///
/// The reply wait is [`REPLY_WINDOW`], cut short by the overall `limit`.
/// A printer that stays silent yields `response: None`, not an error.
pub async fn send_command(
    host: &str,
    port: u16,
    command: &str,
    limit: Duration,
) -> Result<CommandReply, PrintError> {
    let addr = PrinterAddr::new(host, port);
    let deadline = Instant::now() + limit;
    let expired = || PrintError::ExchangeTimeout {
        addr: addr.to_string(),
        timeout: limit,
    };

    let mut stream = timeout_at(deadline, open(&addr))
        .await
        .map_err(|_| expired())??;
    timeout_at(deadline, write_line(&mut stream, command))
        .await
        .map_err(|_| expired())??;

    let window = deadline.min(Instant::now() + REPLY_WINDOW);
    let mut reader = BufReader::new(&mut stream);
    let mut line = String::new();
    let response = match timeout_at(window, reader.read_line(&mut line)).await {
        Ok(Ok(0)) | Err(_) => None,
        Ok(Ok(_)) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        Ok(Err(e)) => return Err(PrintError::ReadFailed(e)),
    };
    let _ = stream.shutdown().await;

    debug!(%addr, command, answered = response.is_some(), "command sent");
    Ok(CommandReply { response })
}

/// Open a connection bounded by `limit`.
pub async fn connect(addr: &PrinterAddr, limit: Duration) -> Result<TcpStream, PrintError> {
    timeout(limit, open(addr))
        .await
        .map_err(|_| PrintError::ConnectionTimeout {
            addr: addr.to_string(),
            timeout: limit,
        })?
}

async fn bounded<T>(
    addr: &PrinterAddr,
    limit: Duration,
    fut: impl Future<Output = Result<T, PrintError>>,
) -> Result<T, PrintError> {
    timeout(limit, fut)
        .await
        .map_err(|_| PrintError::ExchangeTimeout {
            addr: addr.to_string(),
            timeout: limit,
        })?
}

async fn open(addr: &PrinterAddr) -> Result<TcpStream, PrintError> {
    let socket_addr = addr.resolve().await?;
    TcpStream::connect(socket_addr)
        .await
        .map_err(|e| match e.kind() {
            io::ErrorKind::ConnectionRefused => PrintError::ConnectionRefused {
                addr: addr.to_string(),
                source: e,
            },
            _ => PrintError::ConnectionFailed {
                addr: addr.to_string(),
                source: e,
            },
        })
}

async fn write_line(stream: &mut TcpStream, data: &str) -> Result<(), PrintError> {
    let mut buf = Vec::with_capacity(data.len() + 1);
    buf.extend_from_slice(data.as_bytes());
    buf.push(b'\n');
    stream.write_all(&buf).await.map_err(PrintError::WriteFailed)?;
    stream.flush().await.map_err(PrintError::WriteFailed)
}

// ── Session ────────────────────────────────────────────────────────────

/// An open TCP session with a ZPL printer.
///
/// Connects to the printer's RAW port (typically 9100) and sends ZPL as raw
/// bytes. Queries are answered with a single newline-terminated line.
pub struct TcpPrinter {
    stream: BufReader<TcpStream>,
    config: PrinterConfig,
    addr: PrinterAddr,
}

impl TcpPrinter {
    /// Connect to a printer at the given address.
    ///
    /// The address can be any format accepted by [`parse_printer_addr`].
    /// Configures the socket with TCP_NODELAY and TCP keepalive.
    pub async fn connect(addr: &str, config: PrinterConfig) -> Result<Self, PrintError> {
        let addr = parse_printer_addr(addr)?;
        let stream = Self::open_stream(&addr, &config).await?;
        Ok(Self {
            stream: BufReader::new(stream),
            config,
            addr,
        })
    }

    async fn open_stream(addr: &PrinterAddr, config: &PrinterConfig) -> Result<TcpStream, PrintError> {
        let stream = connect(addr, config.timeouts.connect).await?;
        configure_stream(&stream, config).map_err(|e| PrintError::ConnectionFailed {
            addr: addr.to_string(),
            source: e,
        })?;
        Ok(stream)
    }

    /// The address this printer was connected with.
    pub fn remote_addr(&self) -> &PrinterAddr {
        &self.addr
    }
}

#[async_trait]
impl Printer for TcpPrinter {
    async fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        let stream = self.stream.get_mut();
        timeout(self.config.timeouts.write, async {
            stream.write_all(data).await?;
            stream.flush().await
        })
        .await
        .map_err(|_| PrintError::WriteFailed(io::ErrorKind::TimedOut.into()))?
        .map_err(PrintError::WriteFailed)
    }
}

#[async_trait]
impl StatusQuery for TcpPrinter {
    async fn query_line(&mut self, cmd: &str) -> Result<String, PrintError> {
        let mut framed = String::with_capacity(cmd.len() + 1);
        framed.push_str(cmd);
        framed.push('\n');
        self.send_raw(framed.as_bytes()).await?;

        let mut line = String::new();
        let n = timeout(self.config.timeouts.read, self.stream.read_line(&mut line))
            .await
            .map_err(|_| PrintError::ReadTimeout)?
            .map_err(PrintError::ReadFailed)?;
        if n == 0 {
            return Err(PrintError::ConnectionClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Drop for TcpPrinter {
    fn drop(&mut self) {
        let _ = SockRef::from(self.stream.get_ref()).shutdown(Shutdown::Both);
    }
}

// ── Helpers ────────────────────────────────────────────────────────────

/// Configure TCP_NODELAY and keepalive on a stream.
fn configure_stream(stream: &TcpStream, config: &PrinterConfig) -> io::Result<()> {
    // TCP_NODELAY -- disable Nagle's algorithm for low-latency sends
    stream.set_nodelay(true)?;
    configure_keepalive(stream, config.keepalive)
}

/// Configure TCP keepalive on a `TcpStream` via `socket2`.
fn configure_keepalive(stream: &TcpStream, interval: Duration) -> io::Result<()> {
    let keepalive = TcpKeepalive::new().with_time(interval);

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    let keepalive = keepalive.with_interval(interval);

    SockRef::from(stream).set_tcp_keepalive(&keepalive)
}
