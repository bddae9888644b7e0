//! Runtime value representation

pub mod error;

pub use error::{ValueError, ValueResult};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// Signature of a host function callable from a recorded expression
pub type NativeFn = dyn Fn(&[Value]) -> ValueResult<Value> + Send + Sync;

/// Runtime value types
#[derive(Clone)]
pub enum Value {
    /// Nil/null value
    Nil,

    /// Boolean value
    Boolean(bool),

    /// Integer value
    Integer(i64),

    /// Floating point value
    Float(f64),

    /// String value
    String(String),

    /// List of values
    List(Vec<Value>),

    /// Hash table keyed by strings
    Map(FxHashMap<String, Value>),

    /// Object with named attributes
    Record {
        type_name: String,
        fields: FxHashMap<String, Value>,
    },

    /// Native function
    NativeFunction {
        name: String,
        /// `None` for variadic functions
        arity: Option<usize>,
        function: Arc<NativeFn>,
    },

    /// Built-in method bound to its receiver by attribute access
    Method { receiver: Box<Value>, name: String },
}

/// Runtime type tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    Nil,
    Boolean,
    Integer,
    Float,
    String,
    List,
    Map,
    Record,
    NativeFunction,
    Method,
}

impl ValueType {
    /// Name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Nil => "nil",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Map => "map",
            ValueType::Record => "record",
            ValueType::NativeFunction => "native-function",
            ValueType::Method => "method",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Build a list value
    pub fn list(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a map value
    pub fn map<K: Into<String>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a record value
    pub fn record<K: Into<String>, V: Into<Value>>(
        type_name: impl Into<String>,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Value::Record {
            type_name: type_name.into(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Wrap a host closure as a callable value
    pub fn native<F>(name: impl Into<String>, arity: Option<usize>, function: F) -> Self
    where
        F: Fn(&[Value]) -> ValueResult<Value> + Send + Sync + 'static,
    {
        Value::NativeFunction {
            name: name.into(),
            arity,
            function: Arc::new(function),
        }
    }

    /// Type checking predicates
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record { .. })
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::NativeFunction { .. } | Value::Method { .. })
    }

    /// Type conversion helpers
    pub fn as_boolean(&self) -> ValueResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(ValueError::TypeError {
                expected: "boolean",
                actual: self.type_name(),
            }),
        }
    }

    pub fn as_integer(&self) -> ValueResult<i64> {
        match self {
            Value::Integer(n) => Ok(*n),
            _ => Err(ValueError::TypeError {
                expected: "integer",
                actual: self.type_name(),
            }),
        }
    }

    pub fn as_number(&self) -> ValueResult<f64> {
        match self {
            Value::Integer(n) => Ok(*n as f64),
            Value::Float(f) => Ok(*f),
            _ => Err(ValueError::TypeError {
                expected: "number",
                actual: self.type_name(),
            }),
        }
    }

    pub fn as_string(&self) -> ValueResult<&str> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(ValueError::TypeError {
                expected: "string",
                actual: self.type_name(),
            }),
        }
    }

    pub fn as_list(&self) -> ValueResult<&[Value]> {
        match self {
            Value::List(items) => Ok(items),
            _ => Err(ValueError::TypeError {
                expected: "list",
                actual: self.type_name(),
            }),
        }
    }

    pub fn as_map(&self) -> ValueResult<&FxHashMap<String, Value>> {
        match self {
            Value::Map(map) => Ok(map),
            _ => Err(ValueError::TypeError {
                expected: "map",
                actual: self.type_name(),
            }),
        }
    }

    /// Runtime type tag
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Nil => ValueType::Nil,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::List(_) => ValueType::List,
            Value::Map(_) => ValueType::Map,
            Value::Record { .. } => ValueType::Record,
            Value::NativeFunction { .. } => ValueType::NativeFunction,
            Value::Method { .. } => ValueType::Method,
        }
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    /// Check if value is truthy
    ///
    /// Nil, `false`, zero and empty containers are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Boolean(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Record { .. } | Value::NativeFunction { .. } | Value::Method { .. } => true,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Boolean(b) => write!(f, "Boolean({})", b),
            Value::Integer(n) => write!(f, "Integer({})", n),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Map(map) => f.debug_struct("Map").field("map", map).finish(),
            Value::Record { type_name, fields } => f
                .debug_struct("Record")
                .field("type_name", type_name)
                .field("fields", fields)
                .finish(),
            Value::NativeFunction { name, arity, .. } => f
                .debug_struct("NativeFunction")
                .field("name", name)
                .field("arity", arity)
                .finish(),
            Value::Method { receiver, name } => f
                .debug_struct("Method")
                .field("receiver", receiver)
                .field("name", name)
                .finish(),
        }
    }
}

/// Order an integer against a float without rounding the integer
///
/// `None` only when `b` is NaN.
pub fn compare_int_float(a: i64, b: f64) -> Option<Ordering> {
    if b.is_nan() {
        return None;
    }
    // i64::MIN as f64 is exactly -2^63 and i64::MAX as f64 rounds up to 2^63
    if b >= i64::MAX as f64 {
        return Some(Ordering::Less);
    }
    if b < i64::MIN as f64 {
        return Some(Ordering::Greater);
    }
    let whole = b.trunc();
    match a.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&b),
        ordering => Some(ordering),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                compare_int_float(*a, *b) == Some(Ordering::Equal)
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (
                Value::Record {
                    type_name: t1,
                    fields: f1,
                },
                Value::Record {
                    type_name: t2,
                    fields: f2,
                },
            ) => t1 == t2 && f1 == f2,
            (
                Value::NativeFunction {
                    name: n1,
                    arity: a1,
                    ..
                },
                Value::NativeFunction {
                    name: n2,
                    arity: a2,
                    ..
                },
            ) => n1 == n2 && a1 == a2,
            (
                Value::Method {
                    receiver: r1,
                    name: n1,
                },
                Value::Method {
                    receiver: r2,
                    name: n2,
                },
            ) => n1 == n2 && r1 == r2,
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                let mut keys: Vec<_> = map.keys().collect();
                keys.sort();
                write!(f, "{{")?;
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, map[key])?;
                }
                write!(f, "}}")
            }
            Value::Record { type_name, fields } => {
                write!(f, "#<{} with {} fields>", type_name, fields.len())
            }
            Value::NativeFunction { name, .. } => write!(f, "#<native:{}>", name),
            Value::Method { receiver, name } => {
                write!(f, "#<method {} of {}>", name, receiver.type_name())
            }
        }
    }
}

#[cfg(test)]
#[path = "../value_tests.rs"]
mod tests;
