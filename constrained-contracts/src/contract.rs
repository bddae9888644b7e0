//! Contract representation
//!
//! A [`Contract`] groups the preconditions and postconditions of one function
//! and applies them in a single step.
//!
//! # Contract Semantics
//!
//! ## Preconditions (`requires`)
//! - Checked before the function body runs, in declaration order
//! - Each one checks a single named parameter
//! - A failed precondition means the caller passed a bad argument
//!
//! ## Postconditions (`ensures`)
//! - Checked after the function body returns, in declaration order
//! - Each one checks the return value
//! - Not checked when the body itself fails
//! - A failed postcondition means the implementation is wrong
//!
//! ## Invariants
//! - Only apply to scoped blocks, see [`crate::condition::Invariant`]
//!
//! # Example
//!
//! ```
//! use constrained_contracts::{constraints, Contract, ContractFn, Expr};
//! use constrained_core::Value;
//!
//! let x = Expr::root();
//! let non_negative = constraints![x.ge(0)];
//!
//! let factorial = ContractFn::new("factorial", ["n"], |args| {
//!     let n = args[0].as_integer()?;
//!     Ok(Value::Integer((1..=n).product()))
//! });
//!
//! let checked = Contract::new("factorial")
//!     .requires("n", &non_negative)
//!     .ensures(&constraints![x.ge(1)])
//!     .apply(factorial)
//!     .unwrap();
//!
//! assert_eq!(checked.call(&[Value::Integer(5)]).unwrap(), Value::Integer(120));
//! assert!(checked.call(&[Value::Integer(-1)]).is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::condition::{Condition, Postcondition, Precondition, Target};
use crate::config::VerificationConfig;
use crate::constraint::ConstraintSet;
use crate::errors::ContractResult;
use crate::function::ContractFn;

/// Contract conditions attached to one function
#[derive(Debug, Clone)]
pub struct Contract {
    /// Name of the function this contract applies to
    pub function_name: String,

    /// Checked against arguments before the body runs
    pub preconditions: Vec<Precondition>,

    /// Checked against the return value after the body returns
    pub postconditions: Vec<Postcondition>,

    /// Applied to every condition, overriding their own configuration
    pub config: VerificationConfig,
}

/// Types of contract conditions
///
/// Each type has different semantics for when it's checked and who
/// is blamed when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ContractKind {
    /// Checked on entry. Failure blames the caller.
    Precondition,

    /// Checked on exit. Failure blames the implementation.
    Postcondition,

    /// Checked on entry and on exit. Failure indicates corrupted state.
    Invariant,
}

impl ContractKind {
    pub fn name(self) -> &'static str {
        match self {
            ContractKind::Precondition => "pre-condition",
            ContractKind::Postcondition => "post-condition",
            ContractKind::Invariant => "invariant",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Contract {
    /// Create a new empty contract for a function
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            preconditions: Vec::new(),
            postconditions: Vec::new(),
            config: VerificationConfig::default(),
        }
    }

    /// Require the argument `param` to be a member of `constraint`
    pub fn requires(mut self, param: impl Into<String>, constraint: &ConstraintSet) -> Self {
        self.add_precondition(constraint.precondition(Target::named(param)));
        self
    }

    /// Require the return value to be a member of `constraint`
    pub fn ensures(mut self, constraint: &ConstraintSet) -> Self {
        self.add_postcondition(constraint.postcondition("result"));
        self
    }

    pub fn with_config(mut self, config: VerificationConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a precondition to the contract
    pub fn add_precondition(&mut self, condition: Precondition) {
        self.preconditions.push(condition);
    }

    /// Add a postcondition to the contract
    pub fn add_postcondition(&mut self, condition: Postcondition) {
        self.postconditions.push(condition);
    }

    /// Check if this contract has any conditions
    pub fn has_conditions(&self) -> bool {
        !self.preconditions.is_empty() || !self.postconditions.is_empty()
    }

    /// Wrap `function` with every condition of the contract
    ///
    /// Fails if a precondition names a parameter `function` does not have.
    pub fn apply(&self, function: ContractFn) -> ContractResult<ContractFn> {
        debug!(
            "Applying contract for '{}' to '{}' ({} pre, {} post)",
            self.function_name,
            function.name(),
            self.preconditions.len(),
            self.postconditions.len()
        );

        // Preconditions run outermost-first and postconditions innermost-first,
        // so the first declared of each ends up checked first.
        let mut wrapped = function;
        for condition in &self.postconditions {
            wrapped = condition
                .clone()
                .with_config(self.config.clone())
                .decorate(wrapped)?;
        }
        for condition in self.preconditions.iter().rev() {
            wrapped = condition
                .clone()
                .with_config(self.config.clone())
                .decorate(wrapped)?;
        }
        Ok(wrapped)
    }
}
