//! Deterministic built-in evaluator.
//!
//! Understands just enough to exercise the bridge end to end without
//! pulling in a scripting engine:
//!
//! - statements: blank lines and `#` comments are no-ops; `name = <expr>`
//!   binds; anything else is evaluated as an expression and discarded
//! - expressions: JSON literals (`5`, `"text"`, `[1, 2]`, `{"k": true}`)
//!   or bound identifiers
//!
//! Failures carry a trace naming the offending fragment.

use super::{Environment, EvalError, Evaluator};
use crate::codec::{decode_str, Value};

/// Longest fragment excerpt quoted in a trace.
const TRACE_EXCERPT_LEN: usize = 120;

/// Minimal assignment-and-lookup evaluator used by the bundled server
/// binary and the tests.
#[derive(Debug, Default)]
pub struct BasicEvaluator;

impl BasicEvaluator {
    /// Create a new evaluator.
    pub fn new() -> Self {
        Self
    }

    fn eval(&self, fragment: &str, env: &Environment) -> Result<Value, EvalError> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Err(fail("empty expression", fragment));
        }

        if is_identifier(fragment) {
            return match env.get(fragment) {
                Some(value) => Ok(value.clone()),
                None => Err(fail(
                    &format!("name '{fragment}' is not defined"),
                    fragment,
                )),
            };
        }

        decode_str(fragment)
            .map_err(|e| fail(&format!("invalid expression: {e}"), fragment))
    }
}

impl Evaluator for BasicEvaluator {
    fn execute_statement(&mut self, code: &str, env: &mut Environment) -> Result<(), EvalError> {
        let code = code.trim();
        if code.is_empty() || code.starts_with('#') {
            return Ok(());
        }

        // `name = <expr>` binds; the first `=` splits target from source.
        if let Some((target, source)) = code.split_once('=') {
            let target = target.trim();
            if is_identifier(target) {
                let value = self.eval(source, env)?;
                env.bind(target, value);
                return Ok(());
            }
        }

        // Not an assignment: evaluate for effect, discard the value.
        self.eval(code, env).map(|_| ())
    }

    fn evaluate_expression(
        &mut self,
        code: &str,
        env: &mut Environment,
    ) -> Result<Value, EvalError> {
        self.eval(code, env)
    }
}

/// Whether a fragment is a bare identifier: `[A-Za-z_][A-Za-z0-9_]*`.
fn is_identifier(fragment: &str) -> bool {
    let mut chars = fragment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Build an [`EvalError`] with a trace naming the offending fragment.
fn fail(message: &str, fragment: &str) -> EvalError {
    let excerpt: String = fragment.chars().take(TRACE_EXCERPT_LEN).collect();
    EvalError::new(message).with_trace(format!("{message}\n  while evaluating `{excerpt}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn run(env: &mut Environment, code: &str) -> Result<(), EvalError> {
        BasicEvaluator::new().execute_statement(code, env)
    }

    fn eval(env: &mut Environment, code: &str) -> Result<Value, EvalError> {
        BasicEvaluator::new().evaluate_expression(code, env)
    }

    #[test]
    fn test_statement_binds_literal() {
        let mut env = Environment::new();
        run(&mut env, "x = 5").unwrap();
        assert_eq!(env.get("x"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_statement_binds_structured_literal() {
        let mut env = Environment::new();
        run(&mut env, r#"config = {"depth": 3, "labels": ["a", "b"]}"#).unwrap();
        assert_eq!(
            env.get("config"),
            Some(&Value::Map(BTreeMap::from([
                ("depth".to_string(), Value::Int(3)),
                (
                    "labels".to_string(),
                    Value::Seq(vec![Value::Text("a".into()), Value::Text("b".into())])
                ),
            ])))
        );
    }

    #[test]
    fn test_statement_binds_from_identifier() {
        let mut env = Environment::new();
        run(&mut env, "x = 1").unwrap();
        run(&mut env, "y = x").unwrap();
        assert_eq!(env.get("y"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_blank_and_comment_statements_are_noops() {
        let mut env = Environment::new();
        run(&mut env, "").unwrap();
        run(&mut env, "   ").unwrap();
        run(&mut env, "# just a comment").unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn test_bare_expression_statement_discards_value() {
        let mut env = Environment::new();
        run(&mut env, "[1, 2, 3]").unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn test_expression_literal() {
        let mut env = Environment::new();
        assert_eq!(eval(&mut env, "2.5").unwrap(), Value::Float(2.5));
        assert_eq!(eval(&mut env, "\"hi\"").unwrap(), Value::Text("hi".into()));
        assert_eq!(eval(&mut env, "null").unwrap(), Value::Null);
    }

    #[test]
    fn test_expression_lookup() {
        let mut env = Environment::new();
        env.bind("answer", Value::Int(42));
        assert_eq!(eval(&mut env, "answer").unwrap(), Value::Int(42));
        assert_eq!(eval(&mut env, "  answer  ").unwrap(), Value::Int(42));
    }

    #[test]
    fn test_unknown_name_has_message_and_trace() {
        let mut env = Environment::new();
        let err = eval(&mut env, "missing").unwrap_err();
        assert_eq!(err.message, "name 'missing' is not defined");
        assert!(err.trace.contains("while evaluating `missing`"));
        assert!(err.trace.lines().count() > 1);
    }

    #[test]
    fn test_invalid_expression_has_trace() {
        let mut env = Environment::new();
        let err = eval(&mut env, "1 +").unwrap_err();
        assert!(err.message.starts_with("invalid expression"));
        assert!(err.trace.contains("while evaluating `1 +`"));
    }

    #[test]
    fn test_assignment_with_equals_inside_string() {
        let mut env = Environment::new();
        run(&mut env, r#"rule = "a=b""#).unwrap();
        assert_eq!(env.get("rule"), Some(&Value::Text("a=b".into())));
    }

    #[test]
    fn test_non_identifier_target_is_not_assignment() {
        let mut env = Environment::new();
        // `"a=b"` is an expression statement, not an assignment.
        run(&mut env, r#""a=b""#).unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("x"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("snake_case_2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("a b"));
    }

    #[test]
    fn test_bind_default_impl() {
        let mut env = Environment::new();
        let mut evaluator = BasicEvaluator::new();
        evaluator.bind("v", Value::Bool(true), &mut env);
        assert_eq!(env.get("v"), Some(&Value::Bool(true)));
    }
}
