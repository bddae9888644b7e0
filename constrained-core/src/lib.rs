//! Core types for the constrained workspace
//!
//! This crate provides the runtime value model that symbolic constraint
//! expressions are replayed against:
//! - Value representation and runtime type tags
//! - Primitive unary/binary operations, indexing, attribute access and calls
//! - Built-in methods reachable through attribute access
//! - Value error types

pub mod methods;
pub mod ops;
pub mod value;

pub use ops::{BinaryOp, UnaryOp};
pub use value::{NativeFn, Value, ValueError, ValueResult, ValueType};
