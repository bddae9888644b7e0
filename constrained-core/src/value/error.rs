//! Error types for value operations

use thiserror::Error;

/// Error type for value operations
///
/// Raised when a recorded operation is applied to a concrete value it does
/// not support. These errors are never wrapped by the evaluator: the caller
/// sees the error produced by the failing primitive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// Type mismatch error
    #[error("Type error: expected {expected}, got {actual}")]
    TypeError {
        expected: &'static str,
        actual: &'static str,
    },

    /// Binary operation applied to operands it does not support
    #[error("Unsupported operand types for {op}: '{lhs}' and '{rhs}'")]
    UnsupportedOperands {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    /// Unary operation applied to an operand it does not support
    #[error("Bad operand type for {op}: '{operand}'")]
    BadOperand {
        op: &'static str,
        operand: &'static str,
    },

    /// Index out of bounds
    #[error("Index {index} out of bounds for sequence of length {length}")]
    IndexOutOfBounds { index: i64, length: usize },

    /// Key not found in map
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Attribute lookup failed
    #[error("'{type_name}' value has no attribute '{attribute}'")]
    AttributeNotFound {
        type_name: String,
        attribute: String,
    },

    /// Value is not subscriptable
    #[error("'{0}' value is not subscriptable")]
    NotSubscriptable(&'static str),

    /// Value is not callable
    #[error("'{0}' value is not callable")]
    NotCallable(&'static str),

    /// Function arity mismatch
    #[error("Function expects {expected} arguments, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Integer arithmetic overflow
    #[error("Integer overflow in {0}")]
    Overflow(&'static str),

    /// Value cannot be hashed
    #[error("Unhashable type: '{0}'")]
    Unhashable(&'static str),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type for value operations
pub type ValueResult<T> = Result<T, ValueError>;
