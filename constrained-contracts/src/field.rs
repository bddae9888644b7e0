//! Fields that only ever hold members of a constraint set

use constrained_core::Value;
use tracing::debug;

use crate::constraint::ConstraintSet;
use crate::errors::{ContractResult, ContractViolation};

/// A slot whose writes are checked against a [`ConstraintSet`]
///
/// A rejected write leaves the previous value in place.
#[derive(Debug, Clone)]
pub struct ConstrainedField {
    constraint: ConstraintSet,
    name: Option<String>,
    value: Option<Value>,
}

impl ConstrainedField {
    /// An empty field
    pub fn new(constraint: ConstraintSet) -> Self {
        Self {
            constraint,
            name: None,
            value: None,
        }
    }

    /// Name reported in violations
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// A field holding `value`, which must be a member
    pub fn with_value(constraint: ConstraintSet, value: impl Into<Value>) -> ContractResult<Self> {
        let mut field = Self::new(constraint);
        field.set(value)?;
        Ok(field)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn constraint(&self) -> &ConstraintSet {
        &self.constraint
    }

    /// The current value, `None` if never set or deleted
    pub fn get(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Store `value` if it is a member of the constraint set
    pub fn set(&mut self, value: impl Into<Value>) -> ContractResult<()> {
        let value = value.into();
        match self.constraint.first_failure(&value)? {
            None => {
                self.value = Some(value);
                Ok(())
            }
            Some(index) => {
                let mut violation = ContractViolation::assignment(value, self.name.clone());
                if let Some(description) = self.constraint.describe(index) {
                    violation = violation.with_constraint(description);
                }
                debug!("Rejected write to {}: {}", self.name.as_deref().unwrap_or("field"), violation);
                Err(violation.into())
            }
        }
    }

    /// Clear the field, returning the previous value
    pub fn delete(&mut self) -> Option<Value> {
        self.value.take()
    }
}
