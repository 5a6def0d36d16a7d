//! Evaluation environment and the script evaluator seam.
//!
//! The protocol core treats code execution as an injectable capability with
//! three operations; it has zero dependency on any specific scripting
//! engine. [`BasicEvaluator`] is the deterministic implementation used by
//! the bundled binary and the tests.

mod basic;

use std::collections::HashMap;

use thiserror::Error;

use crate::codec::Value;

pub use basic::BasicEvaluator;

/// A failure raised while executing a code fragment.
///
/// Carries the short message and the multi-line diagnostic trace that a
/// Failure response puts on the wire. Both are always non-empty.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EvalError {
    /// Short human-readable description.
    pub message: String,
    /// Multi-line diagnostic text describing the failure site.
    pub trace: String,
}

impl EvalError {
    /// Create an error whose trace is the message itself.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let trace = message.clone();
        Self { message, trace }
    }

    /// Replace the trace with richer diagnostic text.
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = trace.into();
        self
    }
}

/// Per-connection mutable binding store.
///
/// Created once when a connection is accepted, mutated by every statement,
/// expression, and assignment on that connection, and dropped when the
/// connection closes. Owned state, never shared across connections.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name to a value, replacing any previous binding.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Look up a binding.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Whether a name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the environment holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// The script evaluator capability.
///
/// Implementations run code fragments against the per-connection
/// [`Environment`]. Any failure they raise is caught by the session loop
/// and converted into a Failure response; it never tears down the
/// connection.
pub trait Evaluator {
    /// Execute a code fragment for effect. No return value.
    fn execute_statement(&mut self, code: &str, env: &mut Environment) -> Result<(), EvalError>;

    /// Evaluate a code fragment and return its value.
    fn evaluate_expression(&mut self, code: &str, env: &mut Environment)
        -> Result<Value, EvalError>;

    /// Bind a name to an already-decoded value in the environment.
    fn bind(&mut self, name: &str, value: Value, env: &mut Environment) {
        env.bind(name, value);
    }
}
