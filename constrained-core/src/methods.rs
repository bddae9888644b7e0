//! Built-in methods reachable through attribute access
//!
//! `value.upper` produces a [`Value::Method`] bound to its receiver; calling it
//! dispatches here with the receiver and the call arguments.

use tracing::trace;

use crate::value::{Value, ValueError, ValueResult, ValueType};

/// (name, arity) pairs per receiver type
const STRING_METHODS: &[(&str, usize)] = &[
    ("upper", 0),
    ("lower", 0),
    ("trim", 0),
    ("starts_with", 1),
    ("ends_with", 1),
    ("contains", 1),
    ("len", 0),
    ("is_empty", 0),
    ("split", 1),
    ("replace", 2),
];

const LIST_METHODS: &[(&str, usize)] = &[
    ("len", 0),
    ("is_empty", 0),
    ("first", 0),
    ("last", 0),
    ("contains", 1),
    ("count", 1),
];

const MAP_METHODS: &[(&str, usize)] = &[
    ("len", 0),
    ("is_empty", 0),
    ("keys", 0),
    ("values", 0),
    ("contains_key", 1),
    ("get", 1),
];

const NUMBER_METHODS: &[(&str, usize)] = &[("abs", 0), ("is_positive", 0), ("is_negative", 0)];

fn methods_for(ty: ValueType) -> &'static [(&'static str, usize)] {
    match ty {
        ValueType::String => STRING_METHODS,
        ValueType::List => LIST_METHODS,
        ValueType::Map => MAP_METHODS,
        ValueType::Integer | ValueType::Float => NUMBER_METHODS,
        _ => &[],
    }
}

fn arity_of(ty: ValueType, name: &str) -> Option<usize> {
    methods_for(ty)
        .iter()
        .find(|(method, _)| *method == name)
        .map(|(_, arity)| *arity)
}

/// Check whether `name` is a built-in method of values of type `ty`
pub fn has_method(ty: ValueType, name: &str) -> bool {
    arity_of(ty, name).is_some()
}

/// Invoke a built-in method on its receiver
pub fn call_method(receiver: &Value, name: &str, args: &[Value]) -> ValueResult<Value> {
    let expected = arity_of(receiver.value_type(), name)
        .ok_or_else(|| missing(receiver.type_name(), name))?;
    if expected != args.len() {
        return Err(ValueError::ArityMismatch {
            expected,
            actual: args.len(),
        });
    }

    trace!("Calling method {} on {}", name, receiver.type_name());

    match receiver {
        Value::String(s) => string_method(s, name, args),
        Value::List(items) => list_method(items, name, args),
        Value::Map(_) => map_method(receiver, name, args),
        Value::Integer(_) | Value::Float(_) => number_method(receiver, name),
        _ => Err(ValueError::InvalidOperation(format!(
            "{} has no methods",
            receiver.type_name()
        ))),
    }
}

fn missing(type_name: &str, name: &str) -> ValueError {
    ValueError::AttributeNotFound {
        type_name: type_name.to_string(),
        attribute: name.to_string(),
    }
}

fn string_method(s: &str, name: &str, args: &[Value]) -> ValueResult<Value> {
    Ok(match name {
        "upper" => Value::String(s.to_uppercase()),
        "lower" => Value::String(s.to_lowercase()),
        "trim" => Value::String(s.trim().to_string()),
        "starts_with" => Value::Boolean(s.starts_with(args[0].as_string()?)),
        "ends_with" => Value::Boolean(s.ends_with(args[0].as_string()?)),
        "contains" => Value::Boolean(s.contains(args[0].as_string()?)),
        "len" => Value::Integer(s.chars().count() as i64),
        "is_empty" => Value::Boolean(s.is_empty()),
        "split" => {
            let separator = args[0].as_string()?;
            if separator.is_empty() {
                return Err(ValueError::InvalidOperation("empty separator".to_string()));
            }
            Value::List(s.split(separator).map(Value::from).collect())
        }
        "replace" => Value::String(s.replace(args[0].as_string()?, args[1].as_string()?)),
        _ => return Err(missing("string", name)),
    })
}

fn list_method(items: &[Value], name: &str, args: &[Value]) -> ValueResult<Value> {
    Ok(match name {
        "len" => Value::Integer(items.len() as i64),
        "is_empty" => Value::Boolean(items.is_empty()),
        "first" => items.first().cloned().unwrap_or(Value::Nil),
        "last" => items.last().cloned().unwrap_or(Value::Nil),
        "contains" => Value::Boolean(items.contains(&args[0])),
        "count" => Value::Integer(items.iter().filter(|item| **item == args[0]).count() as i64),
        _ => return Err(missing("list", name)),
    })
}

fn map_method(receiver: &Value, name: &str, args: &[Value]) -> ValueResult<Value> {
    let map = receiver.as_map()?;
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    Ok(match name {
        "len" => Value::Integer(map.len() as i64),
        "is_empty" => Value::Boolean(map.is_empty()),
        "keys" => Value::List(keys.into_iter().map(|k| Value::String(k.clone())).collect()),
        "values" => Value::List(keys.into_iter().map(|k| map[k].clone()).collect()),
        "contains_key" => Value::Boolean(map.contains_key(args[0].as_string()?)),
        "get" => map
            .get(args[0].as_string()?)
            .cloned()
            .unwrap_or(Value::Nil),
        _ => return Err(missing("map", name)),
    })
}

fn number_method(receiver: &Value, name: &str) -> ValueResult<Value> {
    match name {
        "abs" => crate::ops::apply_unary(crate::ops::UnaryOp::Abs, receiver),
        "is_positive" => Ok(Value::Boolean(receiver.as_number()? > 0.0)),
        "is_negative" => Ok(Value::Boolean(receiver.as_number()? < 0.0)),
        _ => Err(missing(receiver.type_name(), name)),
    }
}
