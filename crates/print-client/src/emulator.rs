//! In-process printer emulator.
//!
//! Speaks the same line protocol as the fleet's printers so the console can
//! be exercised without hardware. Every received chunk is answered
//! according to a fixed rule table (see [`PrinterEmulator::respond`]).

use std::net::SocketAddr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::PrintError;
use crate::status::PrinterState;

/// Largest chunk read from a client in one go.
const CHUNK_SIZE: usize = 1024;

/// Point-in-time copy of the emulator's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmulatorState {
    /// Printer name reported by `~HI`.
    pub name: String,
    /// Model reported by `~HI`.
    pub model: String,
    /// Current engine state.
    pub status: PrinterState,
    /// Jobs completed since start or the last reset.
    pub jobs_printed: u64,
    /// Most recent chunk received.
    pub last_command: Option<String>,
}

/// An emulated printer. Clones share the same state.
#[derive(Debug, Clone)]
pub struct PrinterEmulator {
    state: Arc<Mutex<EmulatorState>>,
}

impl PrinterEmulator {
    /// A ready printer with no jobs printed.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(EmulatorState {
                name: name.into(),
                model: model.into(),
                status: PrinterState::Ready,
                jobs_printed: 0,
                last_command: None,
            })),
        }
    }

    /// Apply one received chunk and return the reply, if any.
    ///
    /// Rules, first match wins:
    /// - starts with `^XA`: a whole label (also contains `^XZ`) completes a
    ///   job, otherwise the printer goes `PRINTING` and stays silent
    /// - starts with `^XZ`: completes a job, replies `JOB COMPLETED: <n>`
    /// - `~HI`: identity line; `~HS`: status line; `^WD`: JSON settings
    /// - contains `PING` (any case): `PONG`
    /// - anything else: `OK`
    pub fn respond(&self, chunk: &str) -> Option<String> {
        let mut st = self.state.lock();
        st.last_command = Some(chunk.to_string());

        if chunk.starts_with("^XA") {
            if chunk.contains("^XZ") {
                return Some(complete_job(&mut st));
            }
            st.status = PrinterState::Printing;
            return None;
        }
        let reply = if chunk.starts_with("^XZ") {
            complete_job(&mut st)
        } else if chunk.starts_with("~HI") {
            format!("{},{},V1.0,12345,{}\n", st.name, st.model, st.status)
        } else if chunk.starts_with("~HS") {
            format!("STATUS:{},JOBS:{}\n", st.status, st.jobs_printed)
        } else if chunk.starts_with("^WD") {
            settings_json(&st)
        } else if chunk.to_ascii_uppercase().contains("PING") {
            "PONG\n".to_string()
        } else {
            "OK\n".to_string()
        };
        Some(reply)
    }

    /// Clear the job counter and return to `READY`.
    pub fn reset(&self) {
        let mut st = self.state.lock();
        st.jobs_printed = 0;
        st.status = PrinterState::Ready;
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> EmulatorState {
        self.state.lock().clone()
    }

    /// Bind `addr` and serve connections on a background task.
    pub async fn spawn(self, addr: &str) -> Result<RunningEmulator, PrintError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| PrintError::Bind {
                addr: addr.to_string(),
                source: e,
            })?;
        let local_addr = listener.local_addr().map_err(|e| PrintError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;
        let name = self.snapshot().name;
        info!(%local_addr, printer = %name, "emulator listening");
        let task = tokio::spawn(self.clone().serve(listener));
        Ok(RunningEmulator {
            local_addr,
            emulator: self,
            task,
        })
    }

    /// Accept connections forever, one task per client.
    pub async fn serve(self, listener: TcpListener) {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    tokio::spawn(self.clone().handle_client(stream, peer));
                }
                Err(e) => warn!(error = %e, "accept failed"),
            }
        }
    }

    async fn handle_client(self, mut stream: TcpStream, peer: SocketAddr) {
        debug!(%peer, "client connected");
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            let n = match stream.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    debug!(%peer, error = %e, "read failed");
                    break;
                }
            };
            let chunk = String::from_utf8_lossy(&buf[..n]);
            debug!(%peer, command = %chunk.trim_end(), "received");
            if let Some(reply) = self.respond(&chunk)
                && let Err(e) = stream.write_all(reply.as_bytes()).await
            {
                debug!(%peer, error = %e, "write failed");
                break;
            }
        }
        debug!(%peer, "client disconnected");
    }
}

fn complete_job(st: &mut EmulatorState) -> String {
    st.jobs_printed += 1;
    st.status = PrinterState::Ready;
    format!("JOB COMPLETED: {}\n", st.jobs_printed)
}

fn settings_json(st: &EmulatorState) -> String {
    let body = serde_json::json!({
        "name": st.name,
        "model": st.model,
        "dpi": "203",
        "width": "4.00",
        "length": "6.00",
        "darkness": "10",
        "speed": "2",
    });
    format!("{body}\n")
}

/// A listening emulator. The accept loop stops when this is dropped.
#[derive(Debug)]
pub struct RunningEmulator {
    local_addr: SocketAddr,
    emulator: PrinterEmulator,
    task: JoinHandle<()>,
}

impl RunningEmulator {
    /// The bound address (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle to the emulated printer's state.
    pub fn emulator(&self) -> &PrinterEmulator {
        &self.emulator
    }

    /// Stop accepting connections.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for RunningEmulator {
    fn drop(&mut self) {
        self.task.abort();
    }
}
