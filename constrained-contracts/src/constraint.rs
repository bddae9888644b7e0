//! Constraint sets and membership testing
//!
//! A [`ConstraintSet`] is an ordered list of [`Check`]s. A candidate value is a
//! member of the set when every check accepts it. Checks are tried in order
//! and testing stops at the first rejection, so later checks may rely on
//! earlier ones (e.g. a type check ahead of an arithmetic check).

use std::fmt;
use std::sync::Arc;

use constrained_core::{Value, ValueResult};
use tracing::{debug, trace};

use crate::condition::{Invariant, Postcondition, Precondition, Target};
use crate::evaluator;
use crate::expr::Expr;
use crate::field::ConstrainedField;

/// Fallible predicate over a candidate value
pub type PredicateFn = dyn Fn(&Value) -> ValueResult<bool> + Send + Sync;

/// A single membership test
#[derive(Clone)]
pub enum Check {
    /// Arbitrary predicate, optionally named for diagnostics
    Predicate {
        name: Option<String>,
        function: Arc<PredicateFn>,
    },

    /// Recorded expression; accepted when its result is truthy
    Expr(Expr),

    /// Nested constraint set; accepted when the candidate is a member
    Set(ConstraintSet),
}

impl Check {
    /// Wrap an infallible predicate
    pub fn predicate<F>(function: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Check::Predicate {
            name: None,
            function: Arc::new(move |value: &Value| Ok(function(value))),
        }
    }

    /// Wrap a predicate whose failures propagate to the caller
    pub fn fallible<F>(function: F) -> Self
    where
        F: Fn(&Value) -> ValueResult<bool> + Send + Sync + 'static,
    {
        Check::Predicate {
            name: None,
            function: Arc::new(function),
        }
    }

    /// Attach a diagnostic name. Only predicates carry one.
    pub fn named(self, name: impl Into<String>) -> Self {
        match self {
            Check::Predicate { function, .. } => Check::Predicate {
                name: Some(name.into()),
                function,
            },
            other => other,
        }
    }

    /// Test a candidate against this check
    pub fn is_satisfied_by(&self, candidate: &Value) -> ValueResult<bool> {
        match self {
            Check::Predicate { function, .. } => function(candidate),
            Check::Expr(expr) => evaluator::evaluate_condition(expr, candidate),
            Check::Set(set) => set.is_member(candidate),
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Predicate { name, .. } => f.debug_struct("Predicate").field("name", name).finish(),
            Check::Expr(expr) => f.debug_tuple("Expr").field(&expr.to_string()).finish(),
            Check::Set(set) => f.debug_tuple("Set").field(set).finish(),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Predicate { name: Some(name), .. } => write!(f, "{}", name),
            Check::Predicate { name: None, .. } => write!(f, "<predicate>"),
            Check::Expr(expr) => write!(f, "{}", expr),
            Check::Set(set) => write!(f, "{}", set),
        }
    }
}

impl From<Expr> for Check {
    fn from(expr: Expr) -> Self {
        Check::Expr(expr)
    }
}

impl From<&Expr> for Check {
    fn from(expr: &Expr) -> Self {
        Check::Expr(expr.clone())
    }
}

impl From<ConstraintSet> for Check {
    fn from(set: ConstraintSet) -> Self {
        Check::Set(set)
    }
}

impl From<&ConstraintSet> for Check {
    fn from(set: &ConstraintSet) -> Self {
        Check::Set(set.clone())
    }
}

struct Inner {
    name: Option<String>,
    checks: Vec<Check>,
}

/// An immutable, cheaply cloneable set of checks
///
/// Clones share the same checks, so a set can be handed to several
/// conditions or fields and tested from several threads.
#[derive(Clone)]
pub struct ConstraintSet {
    inner: Arc<Inner>,
}

impl ConstraintSet {
    /// Create a set from checks, tested in the given order
    pub fn new<I, C>(checks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Check>,
    {
        Self {
            inner: Arc::new(Inner {
                name: None,
                checks: checks.into_iter().map(Into::into).collect(),
            }),
        }
    }

    /// The set with no checks; every value is a member
    pub fn empty() -> Self {
        Self::new(Vec::<Check>::new())
    }

    /// A copy of this set carrying a diagnostic name
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: Some(name.into()),
                checks: self.inner.checks.clone(),
            }),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    pub fn checks(&self) -> &[Check] {
        &self.inner.checks
    }

    pub fn len(&self) -> usize {
        self.inner.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.checks.is_empty()
    }

    /// Whether `candidate` satisfies every check
    pub fn is_member(&self, candidate: &Value) -> ValueResult<bool> {
        Ok(self.first_failure(candidate)?.is_none())
    }

    /// Position of the first check rejecting `candidate`
    ///
    /// Checks after the first rejection are not run. An error from a check
    /// aborts the test and is returned as is.
    pub fn first_failure(&self, candidate: &Value) -> ValueResult<Option<usize>> {
        for (index, check) in self.inner.checks.iter().enumerate() {
            let accepted = check.is_satisfied_by(candidate)?;
            trace!("Check {} on {}: {}", check, candidate, accepted);
            if !accepted {
                debug!("{} rejected by {}", candidate, check);
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Description of the check at `index`, prefixed by the set name if any
    pub fn describe(&self, index: usize) -> Option<String> {
        let check = self.inner.checks.get(index)?;
        Some(match &self.inner.name {
            Some(name) => format!("{}: {}", name, check),
            None => check.to_string(),
        })
    }

    /// Precondition guarding the value produced by `target`
    pub fn precondition(&self, target: impl Into<Target>) -> Precondition {
        Precondition::new(self.clone(), target)
    }

    /// Postcondition guarding the value produced by `target`
    pub fn postcondition(&self, target: impl Into<Target>) -> Postcondition {
        Postcondition::new(self.clone(), target)
    }

    /// Invariant guarding the value produced by `target`
    pub fn invariant(&self, target: impl Into<Target>) -> Invariant {
        Invariant::new(self.clone(), target)
    }

    /// An empty field restricted to members of this set
    pub fn field(&self) -> ConstrainedField {
        ConstrainedField::new(self.clone())
    }
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintSet")
            .field("name", &self.inner.name)
            .field("checks", &self.inner.checks)
            .finish()
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.inner.name {
            return write!(f, "{}", name);
        }
        write!(f, "{{")?;
        for (i, check) in self.inner.checks.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", check)?;
        }
        write!(f, "}}")
    }
}

/// Build a [`ConstraintSet`] from expressions, checks or nested sets
///
/// ```
/// use constrained_contracts::{constraints, util, Expr};
/// use constrained_core::{Value, ValueType};
///
/// let x = Expr::root();
/// let positive_int = constraints![util::is_instance(ValueType::Integer), x.gt(0)];
///
/// assert_eq!(positive_int.is_member(&Value::Integer(3)), Ok(true));
/// assert_eq!(positive_int.is_member(&Value::from("3")), Ok(false));
/// ```
#[macro_export]
macro_rules! constraints {
    () => {
        $crate::ConstraintSet::empty()
    };
    ($($check:expr),+ $(,)?) => {
        $crate::ConstraintSet::new(::std::vec![$($crate::Check::from($check)),+])
    };
}
