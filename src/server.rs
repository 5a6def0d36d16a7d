//! TCP server: bind, announce, accept one client, serve to completion.
//!
//! The bound port is written as a single line of decimal text to stdout so
//! the invoking parent can locate the service; everything else (logs)
//! belongs on stderr. Exactly one connection is accepted for the lifetime
//! of the server, matching the single-client protocol.
//!
//! # Example
//!
//! ```ignore
//! use evalwire::{eval::BasicEvaluator, Server};
//!
//! let server = Server::bind("127.0.0.1:0").await?;
//! server.announce_port()?;
//! server.serve(BasicEvaluator::new()).await?;
//! ```

use std::io::Write;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::error::{EvalwireError, Result};
use crate::eval::Evaluator;
use crate::session::Session;

/// Default bind address: localhost, ephemeral port.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:0";

/// Single-connection TCP server for the bridge protocol.
pub struct Server {
    listener: TcpListener,
}

impl Server {
    /// Bind a listener on the given address.
    ///
    /// Use port 0 to let the OS pick an ephemeral port, then
    /// [`Server::announce_port`] to publish it.
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local = listener.local_addr()?;
        tracing::info!(addr = %local, "listening");
        Ok(Self { listener })
    }

    /// Bind on the default address (`127.0.0.1:0`).
    pub async fn bind_default() -> Result<Self> {
        Self::bind(DEFAULT_BIND_ADDR).await
    }

    /// The bound local address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// The bound local port.
    pub fn local_port(&self) -> Result<u16> {
        Ok(self.local_addr()?.port())
    }

    /// Write the bound port to stdout as one line of decimal text.
    ///
    /// This is the sole discovery interface for the invoking parent, so it
    /// must happen before accepting. Uses an explicit `\n` and flushes;
    /// stdout carries nothing else.
    pub fn announce_port(&self) -> Result<()> {
        let port = self.local_port()?;
        write_stdout_line(&port.to_string())?;
        Ok(())
    }

    /// Accept exactly one connection and serve it to completion.
    ///
    /// The evaluation environment is created at accept time and dropped
    /// when the connection closes. A connection truncated mid-request is
    /// logged and treated as a close, not an error.
    pub async fn serve<E: Evaluator>(self, evaluator: E) -> Result<()> {
        let (stream, peer) = self.listener.accept().await?;
        tracing::info!(%peer, "client connected");

        let (read_half, write_half) = stream.into_split();
        let session = Session::new(read_half, write_half, evaluator);
        match session.run().await {
            Ok(()) => {
                tracing::info!(%peer, "session finished");
                Ok(())
            }
            Err(EvalwireError::ConnectionClosed) => {
                tracing::warn!(%peer, "connection closed mid-request");
                Ok(())
            }
            Err(e) => {
                tracing::error!(%peer, error = %e, "session failed");
                Err(e)
            }
        }
    }
}

/// Write a line to stdout with an explicit `\n` and flush.
///
/// Not `println!`: the parent waits for a complete, flushed line.
fn write_stdout_line(line: &str) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(line.as_bytes())?;
    handle.write_all(b"\n")?;
    handle.flush()?;
    Ok(())
}
