//! Ready-made checks
//!
//! Builders for common membership tests that cannot be written as a single
//! recorded expression, such as quantifying over elements or reducing a
//! sequence first. Each returns a [`Check`] usable in a [`crate::ConstraintSet`].

use std::cmp::Ordering;

use constrained_core::{ops, BinaryOp, Value, ValueError, ValueResult, ValueType};
use regex_lite::Regex;

use crate::constraint::Check;
use crate::errors::{ContractError, ContractResult};

/// Elements of an iterable value: list items, string characters or map keys
fn elements(value: &Value) -> ValueResult<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items.clone()),
        Value::String(s) => Ok(s.chars().map(|c| Value::String(c.to_string())).collect()),
        Value::Map(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            Ok(keys.into_iter().map(Value::String).collect())
        }
        other => Err(ValueError::TypeError {
            expected: "iterable",
            actual: other.type_name(),
        }),
    }
}

/// Accepts iterables with at least one element accepted by `check`
pub fn any(check: impl Into<Check>) -> Check {
    let check = check.into();
    let name = format!("any({})", check);
    Check::fallible(move |value| {
        for element in elements(value)? {
            if check.is_satisfied_by(&element)? {
                return Ok(true);
            }
        }
        Ok(false)
    })
    .named(name)
}

/// Accepts iterables whose elements are all accepted by `check`
pub fn all(check: impl Into<Check>) -> Check {
    let check = check.into();
    let name = format!("all({})", check);
    Check::fallible(move |value| {
        for element in elements(value)? {
            if !check.is_satisfied_by(&element)? {
                return Ok(false);
            }
        }
        Ok(true)
    })
    .named(name)
}

/// Accepts values of type `ty`
pub fn is_instance(ty: ValueType) -> Check {
    Check::predicate(move |value| value.value_type() == ty).named(format!("is_instance({})", ty))
}

/// Accepts values of any of `types`
pub fn is_instance_of(types: &[ValueType]) -> Check {
    let types = types.to_vec();
    let names: Vec<_> = types.iter().map(|ty| ty.name()).collect();
    let name = format!("is_instance_of({})", names.join(", "));
    Check::predicate(move |value| types.contains(&value.value_type())).named(name)
}

/// Accepts values that can be called
pub fn callable() -> Check {
    Check::predicate(Value::is_callable).named("callable")
}

/// Accepts iterables whose sum is accepted by `check`
pub fn sum(check: impl Into<Check>) -> Check {
    let check = check.into();
    let name = format!("sum({})", check);
    Check::fallible(move |value| {
        let total = elements(value)?
            .iter()
            .try_fold(Value::Integer(0), |acc, element| {
                ops::apply_binary(BinaryOp::Add, &acc, element)
            })?;
        check.is_satisfied_by(&total)
    })
    .named(name)
}

fn extreme(value: &Value, keep: Ordering, function: &'static str) -> ValueResult<Value> {
    let mut best: Option<Value> = None;
    for element in elements(value)? {
        best = Some(match best {
            Some(current) if ops::compare(&element, &current)? != keep => current,
            _ => element,
        });
    }
    best.ok_or_else(|| ValueError::InvalidOperation(format!("{}() arg is an empty sequence", function)))
}

/// Accepts non-empty iterables whose smallest element is accepted by `check`
pub fn min(check: impl Into<Check>) -> Check {
    let check = check.into();
    let name = format!("min({})", check);
    Check::fallible(move |value| check.is_satisfied_by(&extreme(value, Ordering::Less, "min")?))
        .named(name)
}

/// Accepts non-empty iterables whose largest element is accepted by `check`
pub fn max(check: impl Into<Check>) -> Check {
    let check = check.into();
    let name = format!("max({})", check);
    Check::fallible(move |value| check.is_satisfied_by(&extreme(value, Ordering::Greater, "max")?))
        .named(name)
}

fn round_half_even(f: f64) -> f64 {
    if (f - f.trunc()).abs() == 0.5 {
        2.0 * (f / 2.0).round()
    } else {
        f.round()
    }
}

/// Accepts numbers that, rounded half to even, are accepted by `check`
pub fn round(check: impl Into<Check>) -> Check {
    let check = check.into();
    let name = format!("round({})", check);
    Check::fallible(move |value| {
        let rounded = match value {
            Value::Integer(_) => value.clone(),
            Value::Boolean(b) => Value::Integer(*b as i64),
            Value::Float(f) => {
                let rounded = round_half_even(*f);
                // NaN and infinities fail the range check too
                if !(i64::MIN as f64..i64::MAX as f64).contains(&rounded) {
                    return Err(ValueError::Overflow("round"));
                }
                Value::Integer(rounded as i64)
            }
            other => {
                return Err(ValueError::TypeError {
                    expected: "number",
                    actual: other.type_name(),
                })
            }
        };
        check.is_satisfied_by(&rounded)
    })
    .named(name)
}

/// Accepts strings with a prefix matching the regular expression `pattern`
pub fn matches(pattern: &str) -> ContractResult<Check> {
    let regex = Regex::new(&format!("^(?:{})", pattern))
        .map_err(|e| ContractError::InvalidPattern(e.to_string()))?;
    let name = format!("matches({:?})", pattern);
    Ok(Check::fallible(move |value| Ok(regex.is_match(value.as_string()?))).named(name))
}
