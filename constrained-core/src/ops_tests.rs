use super::*;
use proptest::prelude::*;

fn int(n: i64) -> Value {
    Value::Integer(n)
}

// ===== Arithmetic =====

#[test]
fn test_integer_arithmetic() {
    assert_eq!(apply_binary(BinaryOp::Add, &int(3), &int(4)), Ok(int(7)));
    assert_eq!(apply_binary(BinaryOp::Sub, &int(3), &int(4)), Ok(int(-1)));
    assert_eq!(apply_binary(BinaryOp::Mul, &int(3), &int(4)), Ok(int(12)));
    assert_eq!(apply_binary(BinaryOp::Pow, &int(2), &int(10)), Ok(int(1024)));
    assert_eq!(
        apply_binary(BinaryOp::TrueDiv, &int(7), &int(2)),
        Ok(Value::Float(3.5))
    );
}

#[test]
fn test_mixed_arithmetic_promotes_to_float() {
    assert_eq!(
        apply_binary(BinaryOp::Add, &int(1), &Value::Float(0.5)),
        Ok(Value::Float(1.5))
    );
    assert_eq!(
        apply_binary(BinaryOp::Pow, &int(2), &int(-1)),
        Ok(Value::Float(0.5))
    );
}

#[test]
fn test_floor_division_and_modulo_round_down() {
    assert_eq!(apply_binary(BinaryOp::FloorDiv, &int(-7), &int(2)), Ok(int(-4)));
    assert_eq!(apply_binary(BinaryOp::Mod, &int(-7), &int(2)), Ok(int(1)));
    assert_eq!(apply_binary(BinaryOp::Mod, &int(7), &int(-2)), Ok(int(-1)));
    assert_eq!(
        apply_binary(BinaryOp::DivMod, &int(-7), &int(2)),
        Ok(Value::list([-4, 1]))
    );
    assert_eq!(
        apply_binary(BinaryOp::Mod, &Value::Float(-1.0), &Value::Float(3.0)),
        Ok(Value::Float(2.0))
    );
}

#[test]
fn test_division_by_zero() {
    for op in [BinaryOp::TrueDiv, BinaryOp::FloorDiv, BinaryOp::Mod] {
        assert_eq!(
            apply_binary(op, &int(1), &int(0)),
            Err(ValueError::DivisionByZero)
        );
    }
    assert_eq!(
        apply_binary(BinaryOp::TrueDiv, &Value::Float(1.0), &Value::Float(0.0)),
        Err(ValueError::DivisionByZero)
    );
}

#[test]
fn test_overflow_is_an_error() {
    assert_eq!(
        apply_binary(BinaryOp::Add, &int(i64::MAX), &int(1)),
        Err(ValueError::Overflow("addition"))
    );
    assert_eq!(
        apply_binary(BinaryOp::LShift, &int(1), &int(64)),
        Err(ValueError::Overflow("left shift"))
    );
    assert_eq!(
        apply_unary(UnaryOp::Neg, &int(i64::MIN)),
        Err(ValueError::Overflow("negation"))
    );
}

#[test]
fn test_sequence_concatenation_and_repetition() {
    assert_eq!(
        apply_binary(BinaryOp::Add, &Value::from("ab"), &Value::from("cd")),
        Ok(Value::from("abcd"))
    );
    assert_eq!(
        apply_binary(BinaryOp::Mul, &Value::from("ab"), &int(3)),
        Ok(Value::from("ababab"))
    );
    assert_eq!(
        apply_binary(BinaryOp::Mul, &int(2), &Value::list([1])),
        Ok(Value::list([1, 1]))
    );
    assert_eq!(
        apply_binary(BinaryOp::Add, &Value::from("a"), &int(1)),
        Err(ValueError::UnsupportedOperands {
            op: "+",
            lhs: "string",
            rhs: "integer"
        })
    );
}

#[test]
fn test_repetition_past_limit_is_an_error() {
    assert_eq!(
        apply_binary(BinaryOp::Mul, &Value::from("ab"), &int(i64::MAX)),
        Err(ValueError::Overflow("repetition"))
    );
    assert_eq!(
        apply_binary(BinaryOp::Mul, &int(i64::MAX), &Value::list([1, 2])),
        Err(ValueError::Overflow("repetition"))
    );
    assert_eq!(
        apply_binary(BinaryOp::Mul, &Value::list([1]), &int(MAX_REPEAT_LEN as i64 + 1)),
        Err(ValueError::Overflow("repetition"))
    );
    assert_eq!(
        apply_binary(BinaryOp::Mul, &Value::from("ab"), &int(-3)),
        Ok(Value::from(""))
    );
    assert_eq!(
        apply_binary(BinaryOp::Mul, &Value::from(""), &int(i64::MAX)),
        Ok(Value::from(""))
    );
    assert_eq!(
        apply_binary(BinaryOp::Mul, &Value::List(vec![]), &int(i64::MAX)),
        Ok(Value::List(vec![]))
    );
}

// ===== Bitwise =====

#[test]
fn test_shifts_and_bitwise() {
    assert_eq!(apply_binary(BinaryOp::LShift, &int(3), &int(2)), Ok(int(12)));
    assert_eq!(apply_binary(BinaryOp::RShift, &int(-8), &int(1)), Ok(int(-4)));
    assert_eq!(apply_binary(BinaryOp::RShift, &int(-8), &int(100)), Ok(int(-1)));
    assert_eq!(apply_binary(BinaryOp::BitAnd, &int(6), &int(3)), Ok(int(2)));
    assert_eq!(apply_binary(BinaryOp::BitOr, &int(6), &int(3)), Ok(int(7)));
    assert_eq!(apply_binary(BinaryOp::BitXor, &int(6), &int(3)), Ok(int(5)));
    assert_eq!(
        apply_binary(BinaryOp::BitAnd, &Value::Boolean(true), &Value::Boolean(false)),
        Ok(Value::Boolean(false))
    );
    assert!(apply_binary(BinaryOp::LShift, &int(1), &int(-1)).is_err());
}

#[test]
fn test_unary_operations() {
    assert_eq!(apply_unary(UnaryOp::Neg, &int(3)), Ok(int(-3)));
    assert_eq!(apply_unary(UnaryOp::Invert, &int(5)), Ok(int(-6)));
    assert_eq!(apply_unary(UnaryOp::Abs, &Value::Float(-2.5)), Ok(Value::Float(2.5)));
    assert_eq!(apply_unary(UnaryOp::Index, &Value::Boolean(true)), Ok(int(1)));
    assert_eq!(
        apply_unary(UnaryOp::Reversed, &Value::from("abc")),
        Ok(Value::from("cba"))
    );
    assert_eq!(
        apply_unary(UnaryOp::Neg, &Value::from("abc")),
        Err(ValueError::BadOperand {
            op: "-",
            operand: "string"
        })
    );
}

// ===== Comparison =====

#[test]
fn test_ordering() {
    assert_eq!(apply_binary(BinaryOp::Lt, &int(1), &Value::Float(1.5)), Ok(Value::Boolean(true)));
    assert_eq!(apply_binary(BinaryOp::Ge, &int(5), &int(5)), Ok(Value::Boolean(true)));
    assert_eq!(
        apply_binary(BinaryOp::Lt, &Value::from("abc"), &Value::from("abd")),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        apply_binary(BinaryOp::Gt, &Value::list([1, 2]), &Value::list([1])),
        Ok(Value::Boolean(true))
    );
    assert_eq!(apply_binary(BinaryOp::Cmp, &int(1), &int(2)), Ok(int(-1)));
    assert!(apply_binary(BinaryOp::Lt, &Value::from("a"), &int(1)).is_err());
}

#[test]
fn test_equality_never_fails() {
    assert_eq!(
        apply_binary(BinaryOp::Eq, &Value::from("a"), &int(1)),
        Ok(Value::Boolean(false))
    );
    assert_eq!(
        apply_binary(BinaryOp::Ne, &Value::Nil, &Value::list([1])),
        Ok(Value::Boolean(true))
    );
}

#[test]
fn test_contains() {
    assert_eq!(contains(&Value::from("bleh"), &Value::from("le")), Ok(true));
    assert_eq!(contains(&Value::list([1, 2, 3]), &int(2)), Ok(true));
    assert_eq!(contains(&Value::map([("k", 1)]), &Value::from("k")), Ok(true));
    assert!(contains(&int(3), &int(3)).is_err());
}

// ===== Indexing, attributes, calls =====

#[test]
fn test_negative_indexing() {
    assert_eq!(get_item(&Value::from("bleh"), &int(-1)), Ok(Value::from("h")));
    assert_eq!(get_item(&Value::list([1, 2, 3]), &int(-3)), Ok(int(1)));
    assert_eq!(
        get_item(&Value::list([1, 2, 3]), &int(3)),
        Err(ValueError::IndexOutOfBounds { index: 3, length: 3 })
    );
    assert_eq!(
        get_item(&int(5), &int(0)),
        Err(ValueError::NotSubscriptable("integer"))
    );
}

#[test]
fn test_map_and_record_lookup() {
    let point = Value::record("Point", [("x", 1), ("y", 2)]);
    assert_eq!(get_attr(&point, "y"), Ok(int(2)));
    assert_eq!(get_item(&point, &Value::from("x")), Ok(int(1)));
    assert_eq!(
        get_attr(&point, "z"),
        Err(ValueError::AttributeNotFound {
            type_name: "Point".to_string(),
            attribute: "z".to_string()
        })
    );
    assert_eq!(
        get_item(&Value::map([("a", 1)]), &Value::from("b")),
        Err(ValueError::KeyNotFound("b".to_string()))
    );
}

#[test]
fn test_bound_method_call() {
    let upper = get_attr(&Value::from("bleh"), "upper").unwrap();
    assert!(upper.is_callable());
    assert_eq!(call(&upper, &[]), Ok(Value::from("BLEH")));

    let starts = get_attr(&Value::from("bleh"), "starts_with").unwrap();
    assert_eq!(call(&starts, &[Value::from("bl")]), Ok(Value::Boolean(true)));
    assert_eq!(
        call(&starts, &[]),
        Err(ValueError::ArityMismatch {
            expected: 1,
            actual: 0
        })
    );

    let count = get_attr(&Value::list([1, 2, 1]), "count").unwrap();
    assert_eq!(call(&count, &[int(1)]), Ok(int(2)));
}

#[test]
fn test_native_function_call() {
    let double = Value::native("double", Some(1), |args| {
        apply_binary(BinaryOp::Mul, &args[0], &Value::Integer(2))
    });
    assert_eq!(call(&double, &[int(21)]), Ok(int(42)));
    assert!(call(&double, &[]).is_err());
    assert_eq!(call(&int(1), &[]), Err(ValueError::NotCallable("integer")));
}

// ===== Float equality =====

#[test]
fn test_float_equality_is_exact() {
    let eq = |a: Value, b: Value| apply_binary(BinaryOp::Eq, &a, &b);
    let ne = |a: Value, b: Value| apply_binary(BinaryOp::Ne, &a, &b);

    assert_eq!(eq(Value::Float(f64::INFINITY), Value::Float(f64::INFINITY)), Ok(Value::Boolean(true)));
    assert_eq!(eq(Value::Float(f64::INFINITY), Value::Float(f64::NEG_INFINITY)), Ok(Value::Boolean(false)));
    assert_eq!(eq(Value::Float(f64::NAN), Value::Float(f64::NAN)), Ok(Value::Boolean(false)));
    assert_eq!(ne(Value::Float(1e-17), Value::Float(0.0)), Ok(Value::Boolean(true)));
    assert_eq!(ne(Value::Float(1e-17), int(0)), Ok(Value::Boolean(true)));
    assert_eq!(eq(Value::Float(-0.0), Value::Float(0.0)), Ok(Value::Boolean(true)));
    assert_eq!(eq(int(0), Value::Float(-0.0)), Ok(Value::Boolean(true)));
}

#[test]
fn test_large_int_float_mix_is_exact() {
    let two_53 = 1i64 << 53;
    assert_eq!(
        apply_binary(BinaryOp::Eq, &int(two_53 + 1), &Value::Float(two_53 as f64)),
        Ok(Value::Boolean(false))
    );
    assert_eq!(
        apply_binary(BinaryOp::Gt, &int(two_53 + 1), &Value::Float(two_53 as f64)),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        apply_binary(BinaryOp::Lt, &Value::Float(two_53 as f64), &int(two_53 + 1)),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        apply_binary(BinaryOp::Eq, &int(two_53), &Value::Float(two_53 as f64)),
        Ok(Value::Boolean(true))
    );
    // i64::MAX as f64 is 2^63, one past i64::MAX
    assert_eq!(
        apply_binary(BinaryOp::Eq, &int(i64::MAX), &Value::Float(i64::MAX as f64)),
        Ok(Value::Boolean(false))
    );
    assert_eq!(
        apply_binary(BinaryOp::Lt, &int(i64::MAX), &Value::Float(i64::MAX as f64)),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        apply_binary(BinaryOp::Gt, &int(-1), &Value::Float(-1.5)),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        apply_binary(BinaryOp::Lt, &int(i64::MIN), &Value::Float(f64::INFINITY)),
        Ok(Value::Boolean(true))
    );
}

#[test]
fn test_list_ordering_uses_exact_equality() {
    let lhs = Value::List(vec![Value::Float(0.0), int(2)]);
    let rhs = Value::List(vec![Value::Float(1e-17), int(1)]);
    assert_eq!(apply_binary(BinaryOp::Lt, &lhs, &rhs), Ok(Value::Boolean(true)));
}

// ===== Hashing =====

#[test]
fn test_hash_consistency() {
    assert_eq!(hash_value(&int(1)), hash_value(&Value::Float(1.0)));
    assert_eq!(hash_value(&int(1)), hash_value(&Value::Boolean(true)));
    assert_eq!(hash_value(&Value::from("a")), hash_value(&Value::from("a")));
    assert_eq!(
        hash_value(&Value::list([1])),
        Err(ValueError::Unhashable("list"))
    );
}

proptest! {
    #[test]
    fn prop_floor_div_mod_identity(a in -10_000i64..10_000, b in -100i64..100) {
        prop_assume!(b != 0);
        let q = apply_binary(BinaryOp::FloorDiv, &int(a), &int(b)).unwrap().as_integer().unwrap();
        let r = apply_binary(BinaryOp::Mod, &int(a), &int(b)).unwrap().as_integer().unwrap();
        prop_assert_eq!(q * b + r, a);
        prop_assert!(r == 0 || (r < 0) == (b < 0));
    }

    #[test]
    fn prop_equal_values_hash_equal(n in any::<i32>()) {
        prop_assert_eq!(hash_value(&int(n as i64)), hash_value(&Value::Float(n as f64)));
    }

    #[test]
    fn prop_float_equality_agrees_with_ordering(
        a in prop::num::f64::NORMAL | prop::num::f64::ZERO | prop::num::f64::SUBNORMAL,
        b in prop::num::f64::NORMAL | prop::num::f64::ZERO | prop::num::f64::SUBNORMAL,
    ) {
        let (a, b) = (Value::Float(a), Value::Float(b));
        let ordered_equal = partial_compare(BinaryOp::Cmp, &a, &b).unwrap() == Some(Ordering::Equal);
        prop_assert_eq!(a == b, ordered_equal);
        if a == b {
            prop_assert_eq!(hash_value(&a), hash_value(&b));
        }
    }

    #[test]
    fn prop_int_float_equality_agrees_with_ordering(n in any::<i64>(), f in any::<f64>()) {
        let (a, b) = (int(n), Value::Float(f));
        let ordered_equal = partial_compare(BinaryOp::Cmp, &a, &b).unwrap() == Some(Ordering::Equal);
        prop_assert_eq!(a == b, ordered_equal);
        if a == b {
            prop_assert_eq!(hash_value(&a), hash_value(&b));
        }
    }
}
