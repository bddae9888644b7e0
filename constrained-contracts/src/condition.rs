//! Runtime conditions
//!
//! A condition ties a [`ConstraintSet`] to a [`Target`] naming the value to
//! check, and checks it at a fixed point of a scoped block or a function call:
//!
//! | Condition        | Scoped block            | Function wrapper                 |
//! |------------------|-------------------------|----------------------------------|
//! | [`Precondition`] | on entry                | argument, before the call        |
//! | [`Postcondition`]| on exit                 | return value, after the call     |
//! | [`Invariant`]    | on entry and on exit    | unsupported                      |
//!
//! A failing check raises a [`ContractViolation`] of the matching kind. The
//! checks of a disabled [`VerificationConfig`] are skipped.

use std::fmt;
use std::sync::Arc;

use constrained_core::Value;
use tracing::{debug, trace};

use crate::config::VerificationConfig;
use crate::constraint::ConstraintSet;
use crate::contract::ContractKind;
use crate::errors::{ContractError, ContractResult, ContractViolation};
use crate::function::ContractFn;
use crate::scope::Scope;

/// Producer of a condition target value
pub type AccessorFn = dyn Fn() -> Value + Send + Sync;

/// Where a condition finds the value it checks
#[derive(Clone)]
pub enum Target {
    /// A variable in the scope, or a parameter of a wrapped function
    Named(String),

    /// A zero-argument accessor, called each time the condition is checked
    Accessor(Arc<AccessorFn>),
}

impl Target {
    pub fn named(name: impl Into<String>) -> Self {
        Target::Named(name.into())
    }

    pub fn accessor<F>(accessor: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Target::Accessor(Arc::new(accessor))
    }

    /// Produce the current target value
    pub fn resolve(&self, scope: &Scope) -> ContractResult<Value> {
        match self {
            Target::Named(name) => scope
                .get(name)
                .cloned()
                .ok_or_else(|| ContractError::UndefinedVariable(name.clone())),
            Target::Accessor(accessor) => Ok(accessor()),
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Target::Accessor(_) => f.write_str("Accessor"),
        }
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::Named(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::Named(name)
    }
}

/// A check bound to a point in a block or a function call
pub trait Condition {
    fn kind(&self) -> ContractKind;

    /// Check on entry to a scoped block
    fn enter(&self, scope: &Scope) -> ContractResult<()>;

    /// Check on exit from a scoped block
    fn exit(&self, scope: &Scope) -> ContractResult<()>;

    /// Wrap `function` so that this condition is checked on each call
    fn decorate(&self, function: ContractFn) -> ContractResult<ContractFn>;

    /// Run `body` between [`Condition::enter`] and [`Condition::exit`]
    ///
    /// The body may rebind variables in the scope; the exit check sees the
    /// updated bindings.
    fn scoped<R, F>(&self, scope: &mut Scope, body: F) -> ContractResult<R>
    where
        Self: Sized,
        F: FnOnce(&mut Scope) -> R,
    {
        self.enter(scope)?;
        let result = body(scope);
        self.exit(scope)?;
        Ok(result)
    }
}

/// State shared by all condition kinds
#[derive(Debug, Clone)]
struct Guard {
    constraint: ConstraintSet,
    target: Target,
    config: VerificationConfig,
}

impl Guard {
    fn new(constraint: ConstraintSet, target: Target) -> Self {
        Self {
            constraint,
            target,
            config: VerificationConfig::default(),
        }
    }

    fn require(&self, kind: ContractKind, value: Value, function: Option<&str>) -> ContractResult<()> {
        if !self.config.is_checked(kind) {
            trace!("Skipping disabled {:?} check", kind);
            return Ok(());
        }
        match self.constraint.first_failure(&value)? {
            None => Ok(()),
            Some(index) => {
                let mut violation =
                    ContractViolation::new(kind, value, function.map(str::to_string));
                if let Some(description) = self.constraint.describe(index) {
                    violation = violation.with_constraint(description);
                }
                debug!("{}", violation);
                Err(violation.into())
            }
        }
    }

    fn require_target(&self, kind: ContractKind, scope: &Scope) -> ContractResult<()> {
        if !self.config.is_checked(kind) {
            return Ok(());
        }
        let value = self.target.resolve(scope)?;
        self.require(kind, value, None)
    }
}

macro_rules! condition_accessors {
    ($ty:ident) => {
        impl $ty {
            /// Create a condition checking the value produced by `target`
            pub fn new(constraint: ConstraintSet, target: impl Into<Target>) -> Self {
                Self {
                    guard: Guard::new(constraint, target.into()),
                }
            }

            pub fn with_config(mut self, config: VerificationConfig) -> Self {
                self.guard.config = config;
                self
            }

            pub fn constraint(&self) -> &ConstraintSet {
                &self.guard.constraint
            }

            pub fn target(&self) -> &Target {
                &self.guard.target
            }

            pub fn config(&self) -> &VerificationConfig {
                &self.guard.config
            }

            /// Check `value` directly, outside any block or call
            pub fn check(&self, value: &Value) -> ContractResult<()> {
                self.guard.require(self.kind(), value.clone(), None)
            }
        }
    };
}

/// Checked before a block runs or a function is called
#[derive(Debug, Clone)]
pub struct Precondition {
    guard: Guard,
}

condition_accessors!(Precondition);

impl Condition for Precondition {
    fn kind(&self) -> ContractKind {
        ContractKind::Precondition
    }

    fn enter(&self, scope: &Scope) -> ContractResult<()> {
        self.guard.require_target(self.kind(), scope)
    }

    fn exit(&self, _scope: &Scope) -> ContractResult<()> {
        Ok(())
    }

    /// Checks the target before each call
    ///
    /// A named target must be a parameter of `function`; it is looked up when
    /// decorating, not on each call.
    fn decorate(&self, function: ContractFn) -> ContractResult<ContractFn> {
        let position = match &self.guard.target {
            Target::Named(name) => Some(function.param_index(name).ok_or_else(|| {
                ContractError::UndefinedVariable(format!(
                    "'{}' is not a parameter of '{}'",
                    name,
                    function.name()
                ))
            })?),
            Target::Accessor(_) => None,
        };
        let guard = self.guard.clone();
        Ok(function.wrap(move |inner, args| {
            let value = match (position, &guard.target) {
                (Some(index), _) => args[index].clone(),
                (None, target) => target.resolve(&Scope::new())?,
            };
            guard.require(ContractKind::Precondition, value, Some(inner.name()))?;
            inner.call(args)
        }))
    }
}

/// Checked after a block runs or a function returns
#[derive(Debug, Clone)]
pub struct Postcondition {
    guard: Guard,
}

condition_accessors!(Postcondition);

impl Condition for Postcondition {
    fn kind(&self) -> ContractKind {
        ContractKind::Postcondition
    }

    fn enter(&self, _scope: &Scope) -> ContractResult<()> {
        Ok(())
    }

    fn exit(&self, scope: &Scope) -> ContractResult<()> {
        self.guard.require_target(self.kind(), scope)
    }

    /// Checks the return value after each call; the target is not used
    fn decorate(&self, function: ContractFn) -> ContractResult<ContractFn> {
        let guard = self.guard.clone();
        Ok(function.wrap(move |inner, args| {
            let result = inner.call(args)?;
            guard.require(ContractKind::Postcondition, result.clone(), Some(inner.name()))?;
            Ok(result)
        }))
    }
}

/// Checked both when a block starts and when it ends
#[derive(Debug, Clone)]
pub struct Invariant {
    guard: Guard,
}

condition_accessors!(Invariant);

impl Condition for Invariant {
    fn kind(&self) -> ContractKind {
        ContractKind::Invariant
    }

    fn enter(&self, scope: &Scope) -> ContractResult<()> {
        self.guard.require_target(self.kind(), scope)
    }

    fn exit(&self, scope: &Scope) -> ContractResult<()> {
        self.guard.require_target(self.kind(), scope)
    }

    fn decorate(&self, _function: ContractFn) -> ContractResult<ContractFn> {
        Err(ContractError::Unsupported(
            "Invariant objects do not provide decorator functionality".to_string(),
        ))
    }
}

#[cfg(test)]
#[path = "condition/condition_tests.rs"]
mod tests;
