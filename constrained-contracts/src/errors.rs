//! Contract-related error types

use constrained_core::{Value, ValueError};
use thiserror::Error;

use crate::contract::ContractKind;

/// Main contract error type
#[derive(Error, Debug)]
pub enum ContractError {
    /// Contract violation during execution
    #[error("Contract violation: {0}")]
    Violation(#[from] ContractViolation),

    /// A recorded operation failed against the concrete value
    #[error(transparent)]
    Evaluation(#[from] ValueError),

    /// Operation not supported by this kind of condition
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Named target could not be resolved
    #[error("Undefined variable in condition: {0}")]
    UndefinedVariable(String),

    /// Wrapped function called with the wrong number of arguments
    #[error("Function '{function}' expects {expected} arguments, got {actual}")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// Invalid regular expression passed to a pattern predicate
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Invalid verification configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure raised by a wrapped function body
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Represents a contract violation
#[derive(Error, Debug, Clone)]
pub enum ContractViolation {
    /// Precondition violation
    #[error("The value ({}) did not meet the specified pre-condition{}{}",
        value,
        if let Some(func) = function { format!(" of function '{}'", func) } else { String::new() },
        if let Some(c) = constraint { format!(" [{}]", c) } else { String::new() }
    )]
    Precondition {
        value: Value,
        function: Option<String>,
        constraint: Option<String>,
    },

    /// Postcondition violation
    #[error("The value ({}) did not meet the specified post-condition{}{}",
        value,
        if let Some(func) = function { format!(" of function '{}'", func) } else { String::new() },
        if let Some(c) = constraint { format!(" [{}]", c) } else { String::new() }
    )]
    Postcondition {
        value: Value,
        function: Option<String>,
        constraint: Option<String>,
    },

    /// Invariant violation
    #[error("The value ({}) did not meet the specified invariant condition{}{}",
        value,
        if let Some(func) = function { format!(" of function '{}'", func) } else { String::new() },
        if let Some(c) = constraint { format!(" [{}]", c) } else { String::new() }
    )]
    Invariant {
        value: Value,
        function: Option<String>,
        constraint: Option<String>,
    },

    /// Rejected write to a constrained field
    #[error("Specified value ({}) does not satisfy this constraint{}",
        value,
        if let Some(c) = constraint { format!(" [{}]", c) } else { String::new() }
    )]
    Assignment {
        value: Value,
        field: Option<String>,
        constraint: Option<String>,
    },
}

impl ContractViolation {
    /// Create a new contract violation
    pub fn new(kind: ContractKind, value: Value, function: Option<String>) -> Self {
        match kind {
            ContractKind::Precondition => Self::Precondition {
                value,
                function,
                constraint: None,
            },
            ContractKind::Postcondition => Self::Postcondition {
                value,
                function,
                constraint: None,
            },
            ContractKind::Invariant => Self::Invariant {
                value,
                function,
                constraint: None,
            },
        }
    }

    /// Create a rejected-assignment violation
    pub fn assignment(value: Value, field: Option<String>) -> Self {
        Self::Assignment {
            value,
            field,
            constraint: None,
        }
    }

    /// Attach a description of the failing constraint
    pub fn with_constraint(mut self, description: String) -> Self {
        match &mut self {
            Self::Precondition { constraint, .. }
            | Self::Postcondition { constraint, .. }
            | Self::Invariant { constraint, .. }
            | Self::Assignment { constraint, .. } => *constraint = Some(description),
        }
        self
    }

    /// Condition kind, `None` for rejected assignments
    pub fn kind(&self) -> Option<ContractKind> {
        match self {
            Self::Precondition { .. } => Some(ContractKind::Precondition),
            Self::Postcondition { .. } => Some(ContractKind::Postcondition),
            Self::Invariant { .. } => Some(ContractKind::Invariant),
            Self::Assignment { .. } => None,
        }
    }

    /// The offending value
    pub fn value(&self) -> &Value {
        match self {
            Self::Precondition { value, .. }
            | Self::Postcondition { value, .. }
            | Self::Invariant { value, .. }
            | Self::Assignment { value, .. } => value,
        }
    }

    /// Get the function name if available
    pub fn function_name(&self) -> Option<&str> {
        match self {
            Self::Precondition { function, .. }
            | Self::Postcondition { function, .. }
            | Self::Invariant { function, .. } => function.as_deref(),
            Self::Assignment { .. } => None,
        }
    }

    /// Description of the failing constraint if available
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::Precondition { constraint, .. }
            | Self::Postcondition { constraint, .. }
            | Self::Invariant { constraint, .. }
            | Self::Assignment { constraint, .. } => constraint.as_deref(),
        }
    }
}

impl ContractError {
    /// The violation carried by this error, if it is one
    pub fn violation(&self) -> Option<&ContractViolation> {
        match self {
            Self::Violation(violation) => Some(violation),
            _ => None,
        }
    }
}

/// Result type for contract operations
pub type ContractResult<T> = Result<T, ContractError>;

#[cfg(test)]
#[path = "errors/errors_tests.rs"]
mod tests;
