//! Constrained Contract System
//!
//! This crate provides runtime constraint checking built from symbolic
//! expressions: operations are recorded on a placeholder ([`Expr::root`]) and
//! replayed later against concrete values. Recorded expressions and plain
//! predicates are grouped into [`ConstraintSet`]s, which back
//! preconditions, postconditions, invariants and constrained fields.
//!
//! ```
//! use constrained_contracts::{constraints, util, Expr};
//! use constrained_core::{Value, ValueType};
//!
//! let x = Expr::root();
//! let word = constraints![
//!     util::is_instance(ValueType::String),
//!     x.getattr("len").invoke().gt(0),
//!     x.getitem(-1).ne("!"),
//! ];
//!
//! assert_eq!(word.is_member(&Value::from("bleh")), Ok(true));
//! assert_eq!(word.is_member(&Value::from("bleh!")), Ok(false));
//! assert_eq!(word.is_member(&Value::Integer(3)), Ok(false));
//! ```

pub mod condition;
pub mod config;
pub mod constraint;
pub mod contract;
pub mod errors;
pub mod evaluator;
pub mod expr;
pub mod field;
pub mod function;
pub mod operators;
pub mod scope;
pub mod util;

pub use condition::{Condition, Invariant, Postcondition, Precondition, Target};
pub use config::VerificationConfig;
pub use constraint::{Check, ConstraintSet};
pub use contract::{Contract, ContractKind};
pub use errors::{ContractError, ContractResult, ContractViolation};
pub use evaluator::{evaluate, ExprEvaluator};
pub use expr::Expr;
pub use field::ConstrainedField;
pub use function::ContractFn;
pub use scope::Scope;
