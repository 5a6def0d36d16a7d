//! # evalwire
//!
//! Remote code-execution bridge: a framed request/response protocol over a
//! single TCP connection, executing code fragments against a persistent
//! per-connection evaluation environment.
//!
//! ## Architecture
//!
//! - **Protocol**: 1-byte discriminant tags plus 4-byte big-endian
//!   length-prefixed UTF-8 text frames; buffered reader/writer absorb
//!   partial socket reads and writes
//! - **Codec**: host values encode totally into a closed JSON-safe union;
//!   unrepresentable values degrade to text instead of failing
//! - **Dispatch**: strictly sequential request/response; evaluation
//!   failures become structured error responses, never connection faults
//!
//! ## Example
//!
//! ```ignore
//! use evalwire::{eval::BasicEvaluator, Server};
//!
//! #[tokio::main]
//! async fn main() -> evalwire::Result<()> {
//!     let server = Server::bind_default().await?;
//!     server.announce_port()?;
//!     server.serve(BasicEvaluator::new()).await
//! }
//! ```

pub mod codec;
pub mod error;
pub mod eval;
pub mod protocol;
pub mod session;

mod server;

pub use codec::Value;
pub use error::{EvalwireError, Result};
pub use eval::{Environment, EvalError, Evaluator};
pub use server::{Server, DEFAULT_BIND_ADDR};
pub use session::{Request, Response, Session};
