//! Errors raised while compiling statements.
//!
//! Every variant describes a programming error in query construction. Nothing
//! here is recovered internally; callers fail the enclosing operation.

/// Errors that can occur while building or compiling a statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("No statement in progress")]
    NoStatement,

    #[error("Fragment '{fragment}' may only be set once per statement")]
    DuplicateFragment { fragment: &'static str },

    #[error("Invalid operator '{operator}': {reason}")]
    InvalidOperator { operator: String, reason: String },

    #[error("Unsupported database engine: {0}")]
    UnsupportedEngine(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unsupported escape format: {0}")]
    EscapeFormat(String),

    #[error("Fragment '{fragment}' is not allowed on a {kind} statement")]
    FragmentNotAllowed {
        fragment: &'static str,
        kind: &'static str,
    },

    #[error("Fragment '{fragment}' is empty")]
    EmptyFragment { fragment: String },

    #[error("Invalid join type: {0}")]
    InvalidJoinType(String),

    #[error("Invalid conjunction: {0}")]
    InvalidConjunction(String),

    #[error("Cannot render non-finite float {0} as a SQL literal")]
    NonFiniteFloat(String),

    #[error("{operation} is not supported by the {dialect} dialect")]
    UnsupportedOperation {
        dialect: &'static str,
        operation: &'static str,
    },
}

impl CompileError {
    pub(crate) fn invalid_operator(operator: &str, reason: impl Into<String>) -> Self {
        CompileError::InvalidOperator {
            operator: operator.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(dialect: &'static str, operation: &'static str) -> Self {
        CompileError::UnsupportedOperation { dialect, operation }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
