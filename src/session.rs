//! Session - the message dispatch loop for one connection.
//!
//! One session owns the connection's [`FrameReader`], [`FrameWriter`],
//! [`Environment`], and evaluator, and loops strictly
//! request-by-request: read one discriminant tag, read the variant payload,
//! execute, write and flush exactly one response. There is no pipelining
//! inside the loop, so responses leave in request order by construction.
//!
//! Evaluator failures and payload decode failures inside intact framing
//! become Failure responses and the loop continues; only channel-level and
//! framing-level faults terminate the session.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::codec::{decode_str, encode_to_string, Value};
use crate::error::{diagnostic_trace, EvalwireError, Result};
use crate::eval::{Environment, EvalError, Evaluator};
use crate::protocol::{
    FrameReader, FrameWriter, ASSIGNMENT_TAG, ERROR_TAG, EXPRESSION_TAG, STATEMENT_TAG,
    SUCCESS_TAG,
};

/// A decoded request message.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Execute a code fragment for effect.
    Statement {
        /// The code fragment.
        code: String,
    },
    /// Evaluate a code fragment and return its value.
    Expression {
        /// The code fragment.
        code: String,
    },
    /// Bind a name to a decoded value in the environment.
    Assignment {
        /// Name to bind.
        name: String,
        /// Already-decoded value.
        value: Value,
    },
}

impl Request {
    /// Short variant name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Request::Statement { .. } => "statement",
            Request::Expression { .. } => "expression",
            Request::Assignment { .. } => "assignment",
        }
    }
}

/// A response message, exactly one per request.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// The request succeeded. `body` is the JSON-encoded result for
    /// expressions and `None` for statements and assignments.
    Success {
        /// JSON-encoded result text, if the request kind returns one.
        body: Option<String>,
    },
    /// The request failed; the connection stays up.
    Failure {
        /// Short error message.
        message: String,
        /// Multi-line diagnostic trace.
        trace: String,
    },
}

impl Response {
    /// Success with no body (statement, assignment).
    pub fn success() -> Self {
        Response::Success { body: None }
    }

    /// Success carrying a JSON-encoded expression result.
    pub fn success_with_body(body: String) -> Self {
        Response::Success { body: Some(body) }
    }

    /// Failure from a protocol-level recoverable error; the trace is the
    /// error's source chain.
    pub fn from_error(err: &EvalwireError) -> Self {
        Response::Failure {
            message: err.to_string(),
            trace: diagnostic_trace(err),
        }
    }

    /// Failure from an evaluator error, carrying its own trace.
    pub fn from_eval_error(err: EvalError) -> Self {
        Response::Failure {
            message: err.message,
            trace: err.trace,
        }
    }

    /// Append this response's frames to the writer buffer.
    fn write<W: AsyncWrite + Unpin>(&self, writer: &mut FrameWriter<W>) -> Result<()> {
        match self {
            Response::Success { body } => {
                writer.write_tag(SUCCESS_TAG);
                if let Some(body) = body {
                    writer.write_text(body)?;
                }
            }
            Response::Failure { message, trace } => {
                writer.write_tag(ERROR_TAG);
                writer.write_text(message)?;
                writer.write_text(trace)?;
            }
        }
        Ok(())
    }
}

/// The per-connection dispatch loop.
pub struct Session<R, W, E> {
    reader: FrameReader<R>,
    writer: FrameWriter<W>,
    evaluator: E,
    env: Environment,
}

impl<R, W, E> Session<R, W, E>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    E: Evaluator,
{
    /// Create a session over the two halves of a byte channel.
    ///
    /// The environment is created here and lives exactly as long as the
    /// session.
    pub fn new(read_half: R, write_half: W, evaluator: E) -> Self {
        Self {
            reader: FrameReader::new(read_half),
            writer: FrameWriter::new(write_half),
            evaluator,
            env: Environment::new(),
        }
    }

    /// Run the dispatch loop until the connection closes.
    ///
    /// Returns `Ok(())` on a clean close (EOF while awaiting the next
    /// discriminant tag).
    ///
    /// # Errors
    ///
    /// Channel I/O faults, framing corruption, and EOF in the middle of a
    /// request are propagated; no partial response is emitted for them.
    pub async fn run(mut self) -> Result<()> {
        loop {
            let tag = match self.reader.read_tag().await {
                Ok(tag) => tag,
                Err(EvalwireError::ConnectionClosed) => {
                    tracing::debug!("connection closed by peer");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            let response = match self.read_request(tag).await {
                Ok(request) => {
                    tracing::debug!(kind = request.kind(), "dispatching request");
                    self.execute(request)
                }
                Err(e) if e.is_connection_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!(error = %e, tag, "rejecting request");
                    Response::from_error(&e)
                }
            };

            response.write(&mut self.writer)?;
            self.writer.flush().await?;
        }
    }

    /// Read and decode the payload for the given discriminant tag.
    ///
    /// An unknown tag fails immediately, before any payload byte is read.
    /// The assignment payload is consumed as raw frames first and decoded
    /// afterwards, so a decode failure can never leave the stream
    /// misaligned.
    async fn read_request(&mut self, tag: u8) -> Result<Request> {
        match tag {
            STATEMENT_TAG => Ok(Request::Statement {
                code: self.reader.read_text().await?,
            }),
            EXPRESSION_TAG => Ok(Request::Expression {
                code: self.reader.read_text().await?,
            }),
            ASSIGNMENT_TAG => {
                let name_bytes = self.reader.read_text_bytes().await?;
                let value_bytes = self.reader.read_text_bytes().await?;
                let name = String::from_utf8(name_bytes.to_vec())?;
                let raw = String::from_utf8(value_bytes.to_vec())?;
                let value = decode_str(&raw)?;
                Ok(Request::Assignment { name, value })
            }
            tag => Err(EvalwireError::UnrecognizedMessage(tag)),
        }
    }

    /// Execute one request against the environment.
    ///
    /// Evaluator failures are converted here; they never propagate out of
    /// the loop.
    fn execute(&mut self, request: Request) -> Response {
        match request {
            Request::Statement { code } => {
                match self.evaluator.execute_statement(&code, &mut self.env) {
                    Ok(()) => Response::success(),
                    Err(e) => Response::from_eval_error(e),
                }
            }
            Request::Expression { code } => {
                match self.evaluator.evaluate_expression(&code, &mut self.env) {
                    Ok(value) => match encode_to_string(&value) {
                        Ok(body) => Response::success_with_body(body),
                        Err(e) => Response::from_error(&e),
                    },
                    Err(e) => Response::from_eval_error(e),
                }
            }
            Request::Assignment { name, value } => {
                self.evaluator.bind(&name, value, &mut self.env);
                Response::success()
            }
        }
    }
}
