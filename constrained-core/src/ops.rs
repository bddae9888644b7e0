//! Primitive operations on runtime values
//!
//! Every operation a symbolic expression can record bottoms out in one of the
//! functions here. The semantics follow a dynamically typed host: integers
//! promote to floats when mixed, booleans count as `0`/`1` in arithmetic,
//! floor division and modulo round toward negative infinity, and sequences
//! accept negative indices counted from the end.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::methods;
use crate::value::{compare_int_float, Value, ValueError, ValueResult};

/// Unary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Pos,
    Invert,
    Abs,
    /// Integer coercion
    Index,
    Hash,
    Reversed,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Invert => "~",
            UnaryOp::Abs => "abs",
            UnaryOp::Index => "index",
            UnaryOp::Hash => "hash",
            UnaryOp::Reversed => "reversed",
        }
    }

    /// Whether the operator renders as a prefix symbol rather than a call
    pub fn is_prefix(self) -> bool {
        matches!(self, UnaryOp::Neg | UnaryOp::Pos | UnaryOp::Invert)
    }
}

/// Binary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    FloorDiv,
    TrueDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitAnd,
    BitOr,
    BitXor,
    DivMod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Three-way comparison yielding -1, 0 or 1
    Cmp,
    /// `rhs in lhs`
    Contains,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::FloorDiv => "//",
            BinaryOp::TrueDiv => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::DivMod => "divmod",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Cmp => "cmp",
            BinaryOp::Contains => "in",
        }
    }

    /// Whether the operator renders as a function call rather than infix
    pub fn is_call_style(self) -> bool {
        matches!(self, BinaryOp::DivMod | BinaryOp::Cmp)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Num> {
        match value {
            Value::Integer(n) => Some(Num::Int(*n)),
            Value::Boolean(b) => Some(Num::Int(*b as i64)),
            Value::Float(f) => Some(Num::Float(*f)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(f) => f,
        }
    }
}

fn unsupported(op: BinaryOp, lhs: &Value, rhs: &Value) -> ValueError {
    ValueError::UnsupportedOperands {
        op: op.symbol(),
        lhs: lhs.type_name(),
        rhs: rhs.type_name(),
    }
}

/// Apply a unary operation
pub fn apply_unary(op: UnaryOp, operand: &Value) -> ValueResult<Value> {
    let bad = || ValueError::BadOperand {
        op: op.symbol(),
        operand: operand.type_name(),
    };

    match op {
        UnaryOp::Neg => match Num::of(operand).ok_or_else(bad)? {
            Num::Int(n) => n
                .checked_neg()
                .map(Value::Integer)
                .ok_or(ValueError::Overflow("negation")),
            Num::Float(f) => Ok(Value::Float(-f)),
        },
        UnaryOp::Pos => match Num::of(operand).ok_or_else(bad)? {
            Num::Int(n) => Ok(Value::Integer(n)),
            Num::Float(f) => Ok(Value::Float(f)),
        },
        UnaryOp::Invert => match operand {
            Value::Integer(n) => Ok(Value::Integer(!n)),
            Value::Boolean(b) => Ok(Value::Integer(!(*b as i64))),
            _ => Err(bad()),
        },
        UnaryOp::Abs => match Num::of(operand).ok_or_else(bad)? {
            Num::Int(n) => n
                .checked_abs()
                .map(Value::Integer)
                .ok_or(ValueError::Overflow("abs")),
            Num::Float(f) => Ok(Value::Float(f.abs())),
        },
        UnaryOp::Index => match operand {
            Value::Integer(n) => Ok(Value::Integer(*n)),
            Value::Boolean(b) => Ok(Value::Integer(*b as i64)),
            _ => Err(ValueError::TypeError {
                expected: "integer",
                actual: operand.type_name(),
            }),
        },
        UnaryOp::Hash => hash_value(operand).map(Value::Integer),
        UnaryOp::Reversed => match operand {
            Value::List(items) => Ok(Value::List(items.iter().rev().cloned().collect())),
            Value::String(s) => Ok(Value::String(s.chars().rev().collect())),
            _ => Err(ValueError::TypeError {
                expected: "sequence",
                actual: operand.type_name(),
            }),
        },
    }
}

/// Apply a binary operation with `lhs` as the receiver
pub fn apply_binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> ValueResult<Value> {
    match op {
        BinaryOp::Eq => Ok(Value::Boolean(lhs == rhs)),
        BinaryOp::Ne => Ok(Value::Boolean(lhs != rhs)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = partial_compare(op, lhs, rhs)?;
            Ok(Value::Boolean(match (op, ordering) {
                (_, None) => false,
                (BinaryOp::Lt, Some(o)) => o == Ordering::Less,
                (BinaryOp::Le, Some(o)) => o != Ordering::Greater,
                (BinaryOp::Gt, Some(o)) => o == Ordering::Greater,
                (_, Some(o)) => o != Ordering::Less,
            }))
        }
        BinaryOp::Cmp => match partial_compare(op, lhs, rhs)? {
            Some(o) => Ok(Value::Integer(o as i64)),
            None => Err(ValueError::InvalidOperation(format!(
                "cannot order {} and {}",
                lhs, rhs
            ))),
        },
        BinaryOp::Contains => contains(lhs, rhs).map(Value::Boolean),
        BinaryOp::Add => add(lhs, rhs),
        BinaryOp::Mul => mul(lhs, rhs),
        BinaryOp::LShift | BinaryOp::RShift => shift(op, lhs, rhs),
        BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => bitwise(op, lhs, rhs),
        BinaryOp::DivMod => Ok(Value::List(vec![
            arithmetic(BinaryOp::FloorDiv, lhs, rhs)?,
            arithmetic(BinaryOp::Mod, lhs, rhs)?,
        ])),
        BinaryOp::Sub
        | BinaryOp::FloorDiv
        | BinaryOp::TrueDiv
        | BinaryOp::Mod
        | BinaryOp::Pow => arithmetic(op, lhs, rhs),
    }
}

fn add(lhs: &Value, rhs: &Value) -> ValueResult<Value> {
    match (lhs, rhs) {
        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
        (Value::List(a), Value::List(b)) => {
            Ok(Value::List(a.iter().chain(b.iter()).cloned().collect()))
        }
        _ => arithmetic(BinaryOp::Add, lhs, rhs),
    }
}

/// Largest string (bytes) or list (items) a repetition may produce
pub const MAX_REPEAT_LEN: usize = u32::MAX as usize;

fn mul(lhs: &Value, rhs: &Value) -> ValueResult<Value> {
    /// Clamp negative counts to zero and refuse results past `MAX_REPEAT_LEN`
    fn times(len: usize, count: i64) -> ValueResult<usize> {
        if len == 0 {
            return Ok(0);
        }
        let count =
            usize::try_from(count.max(0)).map_err(|_| ValueError::Overflow("repetition"))?;
        match len.checked_mul(count) {
            Some(total) if total <= MAX_REPEAT_LEN => Ok(count),
            _ => Err(ValueError::Overflow("repetition")),
        }
    }

    match (lhs, rhs) {
        (Value::String(s), Value::Integer(n)) | (Value::Integer(n), Value::String(s)) => {
            Ok(Value::String(s.repeat(times(s.len(), *n)?)))
        }
        (Value::List(items), Value::Integer(n)) | (Value::Integer(n), Value::List(items)) => {
            let count = times(items.len(), *n)?;
            let mut out = Vec::with_capacity(items.len() * count);
            for _ in 0..count {
                out.extend(items.iter().cloned());
            }
            Ok(Value::List(out))
        }
        _ => arithmetic(BinaryOp::Mul, lhs, rhs),
    }
}

fn floor_div_int(a: i64, b: i64) -> ValueResult<i64> {
    if b == 0 {
        return Err(ValueError::DivisionByZero);
    }
    let q = a.checked_div(b).ok_or(ValueError::Overflow("floor division"))?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

fn floor_mod_int(a: i64, b: i64) -> ValueResult<i64> {
    if b == 0 {
        return Err(ValueError::DivisionByZero);
    }
    let r = a.checked_rem(b).unwrap_or(0);
    if r != 0 && ((r < 0) != (b < 0)) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

fn floor_mod_float(a: f64, b: f64) -> ValueResult<f64> {
    if b == 0.0 {
        return Err(ValueError::DivisionByZero);
    }
    let r = a % b;
    if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value) -> ValueResult<Value> {
    let (a, b) = match (Num::of(lhs), Num::of(rhs)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(unsupported(op, lhs, rhs)),
    };

    if let (Num::Int(a), Num::Int(b)) = (a, b) {
        return match op {
            BinaryOp::Add => a
                .checked_add(b)
                .map(Value::Integer)
                .ok_or(ValueError::Overflow("addition")),
            BinaryOp::Sub => a
                .checked_sub(b)
                .map(Value::Integer)
                .ok_or(ValueError::Overflow("subtraction")),
            BinaryOp::Mul => a
                .checked_mul(b)
                .map(Value::Integer)
                .ok_or(ValueError::Overflow("multiplication")),
            BinaryOp::FloorDiv => floor_div_int(a, b).map(Value::Integer),
            BinaryOp::Mod => floor_mod_int(a, b).map(Value::Integer),
            BinaryOp::TrueDiv => {
                if b == 0 {
                    Err(ValueError::DivisionByZero)
                } else {
                    Ok(Value::Float(a as f64 / b as f64))
                }
            }
            BinaryOp::Pow => {
                if b >= 0 {
                    u32::try_from(b)
                        .ok()
                        .and_then(|exp| a.checked_pow(exp))
                        .map(Value::Integer)
                        .ok_or(ValueError::Overflow("power"))
                } else if a == 0 {
                    Err(ValueError::DivisionByZero)
                } else {
                    Ok(Value::Float((a as f64).powf(b as f64)))
                }
            }
            _ => Err(unsupported(op, lhs, rhs)),
        };
    }

    let (a, b) = (a.as_f64(), b.as_f64());
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::TrueDiv | BinaryOp::FloorDiv if b == 0.0 => Err(ValueError::DivisionByZero),
        BinaryOp::TrueDiv => Ok(Value::Float(a / b)),
        BinaryOp::FloorDiv => Ok(Value::Float((a / b).floor())),
        BinaryOp::Mod => floor_mod_float(a, b).map(Value::Float),
        BinaryOp::Pow if a == 0.0 && b < 0.0 => Err(ValueError::DivisionByZero),
        BinaryOp::Pow => Ok(Value::Float(a.powf(b))),
        _ => Err(unsupported(op, lhs, rhs)),
    }
}

fn integer_operands(op: BinaryOp, lhs: &Value, rhs: &Value) -> ValueResult<(i64, i64)> {
    match (Num::of(lhs), Num::of(rhs)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => Ok((a, b)),
        _ => Err(unsupported(op, lhs, rhs)),
    }
}

fn shift(op: BinaryOp, lhs: &Value, rhs: &Value) -> ValueResult<Value> {
    let (a, count) = integer_operands(op, lhs, rhs)?;
    if count < 0 {
        return Err(ValueError::InvalidOperation("negative shift count".to_string()));
    }

    if op == BinaryOp::RShift {
        return Ok(Value::Integer(if count >= 64 {
            if a < 0 {
                -1
            } else {
                0
            }
        } else {
            a >> count
        }));
    }

    if a == 0 {
        return Ok(Value::Integer(0));
    }
    if count >= 64 {
        return Err(ValueError::Overflow("left shift"));
    }
    let wide = (a as i128) << count;
    i64::try_from(wide)
        .map(Value::Integer)
        .map_err(|_| ValueError::Overflow("left shift"))
}

fn bitwise(op: BinaryOp, lhs: &Value, rhs: &Value) -> ValueResult<Value> {
    if let (Value::Boolean(a), Value::Boolean(b)) = (lhs, rhs) {
        return Ok(Value::Boolean(match op {
            BinaryOp::BitAnd => a & b,
            BinaryOp::BitOr => a | b,
            _ => a ^ b,
        }));
    }

    let (a, b) = integer_operands(op, lhs, rhs)?;
    Ok(Value::Integer(match op {
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        _ => a ^ b,
    }))
}

/// Order two values, `None` when they are comparable but unordered (NaN)
fn partial_compare(op: BinaryOp, lhs: &Value, rhs: &Value) -> ValueResult<Option<Ordering>> {
    if let (Some(a), Some(b)) = (Num::of(lhs), Num::of(rhs)) {
        return Ok(match (a, b) {
            (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
            (Num::Int(a), Num::Float(b)) => compare_int_float(a, b),
            (Num::Float(a), Num::Int(b)) => compare_int_float(b, a).map(Ordering::reverse),
            (Num::Float(a), Num::Float(b)) => a.partial_cmp(&b),
        });
    }

    match (lhs, rhs) {
        (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
        (Value::List(a), Value::List(b)) => {
            for (x, y) in a.iter().zip(b.iter()) {
                if x != y {
                    return partial_compare(op, x, y);
                }
            }
            Ok(Some(a.len().cmp(&b.len())))
        }
        _ => Err(unsupported(op, lhs, rhs)),
    }
}

/// Total ordering used by aggregate helpers such as `min`/`max`
pub fn compare(lhs: &Value, rhs: &Value) -> ValueResult<Ordering> {
    partial_compare(BinaryOp::Cmp, lhs, rhs)?.ok_or_else(|| {
        ValueError::InvalidOperation(format!("cannot order {} and {}", lhs, rhs))
    })
}

/// `item in container`
pub fn contains(container: &Value, item: &Value) -> ValueResult<bool> {
    match container {
        Value::String(s) => match item {
            Value::String(needle) => Ok(s.contains(needle.as_str())),
            _ => Err(ValueError::TypeError {
                expected: "string",
                actual: item.type_name(),
            }),
        },
        Value::List(items) => Ok(items.iter().any(|candidate| candidate == item)),
        Value::Map(map) | Value::Record { fields: map, .. } => match item {
            Value::String(key) => Ok(map.contains_key(key)),
            _ => Ok(false),
        },
        _ => Err(ValueError::UnsupportedOperands {
            op: BinaryOp::Contains.symbol(),
            lhs: item.type_name(),
            rhs: container.type_name(),
        }),
    }
}

fn normalize_index(index: i64, length: usize) -> ValueResult<usize> {
    let resolved = if index < 0 {
        index + length as i64
    } else {
        index
    };
    if resolved < 0 || resolved >= length as i64 {
        Err(ValueError::IndexOutOfBounds { index, length })
    } else {
        Ok(resolved as usize)
    }
}

/// Subscript `target[key]`
pub fn get_item(target: &Value, key: &Value) -> ValueResult<Value> {
    match target {
        Value::List(items) => {
            let index = apply_unary(UnaryOp::Index, key)?.as_integer()?;
            Ok(items[normalize_index(index, items.len())?].clone())
        }
        Value::String(s) => {
            let index = apply_unary(UnaryOp::Index, key)?.as_integer()?;
            let length = s.chars().count();
            let position = normalize_index(index, length)?;
            s.chars()
                .nth(position)
                .map(|c| Value::String(c.to_string()))
                .ok_or(ValueError::IndexOutOfBounds { index, length })
        }
        Value::Map(map) | Value::Record { fields: map, .. } => {
            let key = key.as_string()?;
            map.get(key)
                .cloned()
                .ok_or_else(|| ValueError::KeyNotFound(key.to_string()))
        }
        _ => Err(ValueError::NotSubscriptable(target.type_name())),
    }
}

/// Attribute access `target.name`
///
/// Record fields and map entries shadow built-in methods of the same name.
pub fn get_attr(target: &Value, name: &str) -> ValueResult<Value> {
    if let Value::Map(fields) | Value::Record { fields, .. } = target {
        if let Some(value) = fields.get(name) {
            return Ok(value.clone());
        }
    }

    if methods::has_method(target.value_type(), name) {
        return Ok(Value::Method {
            receiver: Box::new(target.clone()),
            name: name.to_string(),
        });
    }

    let type_name = match target {
        Value::Record { type_name, .. } => type_name.clone(),
        _ => target.type_name().to_string(),
    };
    Err(ValueError::AttributeNotFound {
        type_name,
        attribute: name.to_string(),
    })
}

/// Invoke a callable value
pub fn call(target: &Value, args: &[Value]) -> ValueResult<Value> {
    match target {
        Value::NativeFunction {
            arity, function, ..
        } => {
            if let Some(expected) = arity {
                if *expected != args.len() {
                    return Err(ValueError::ArityMismatch {
                        expected: *expected,
                        actual: args.len(),
                    });
                }
            }
            function(args)
        }
        Value::Method { receiver, name } => methods::call_method(receiver, name, args),
        _ => Err(ValueError::NotCallable(target.type_name())),
    }
}

fn write_hash(value: &Value, state: &mut FxHasher) -> ValueResult<()> {
    match value {
        Value::Nil => 0u8.hash(state),
        Value::Boolean(b) => (*b as i64).hash(state),
        Value::Integer(n) => n.hash(state),
        Value::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).hash(state)
            } else {
                f.to_bits().hash(state)
            }
        }
        Value::String(s) => s.hash(state),
        Value::NativeFunction { name, .. } => name.hash(state),
        Value::Method { receiver, name } => {
            name.hash(state);
            write_hash(receiver, state)?;
        }
        Value::List(_) | Value::Map(_) | Value::Record { .. } => {
            return Err(ValueError::Unhashable(value.type_name()))
        }
    }
    Ok(())
}

/// Structural hash; values that compare equal hash equal
pub fn hash_value(value: &Value) -> ValueResult<i64> {
    let mut state = FxHasher::default();
    write_hash(value, &mut state)?;
    Ok(state.finish() as i64)
}

#[cfg(test)]
#[path = "ops_tests.rs"]
mod tests;
