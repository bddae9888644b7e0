use super::*;
use rustc_hash::FxHashMap;

// ===== Basic Value Tests =====

#[test]
fn test_value_type_predicates() {
    let int_val = Value::Integer(42);
    assert!(int_val.is_integer());
    assert!(int_val.is_number());
    assert!(!int_val.is_float());

    let float_val = Value::Float(3.5);
    assert!(float_val.is_float());
    assert!(float_val.is_number());
    assert!(!float_val.is_integer());

    assert!(Value::from("hello").is_string());
    assert!(Value::Boolean(true).is_boolean());
    assert!(Value::Nil.is_nil());
    assert!(Value::List(vec![]).is_list());
    assert!(Value::Map(FxHashMap::default()).is_map());
    assert!(Value::record("Point", [("x", 1)]).is_record());
    assert!(Value::native("id", Some(1), |args| Ok(args[0].clone())).is_callable());
}

#[test]
fn test_type_names() {
    assert_eq!(Value::Nil.type_name(), "nil");
    assert_eq!(Value::Integer(1).type_name(), "integer");
    assert_eq!(Value::Float(1.0).type_name(), "float");
    assert_eq!(Value::from("x").type_name(), "string");
    assert_eq!(Value::list([1, 2]).type_name(), "list");
    assert_eq!(Value::map([("a", 1)]).type_name(), "map");
    assert_eq!(Value::record("Point", [("x", 1)]).value_type(), ValueType::Record);
}

#[test]
fn test_accessors() {
    assert_eq!(Value::Integer(7).as_integer(), Ok(7));
    assert_eq!(Value::Integer(7).as_number(), Ok(7.0));
    assert_eq!(Value::from("abc").as_string(), Ok("abc"));
    assert_eq!(
        Value::from("abc").as_integer(),
        Err(ValueError::TypeError {
            expected: "integer",
            actual: "string"
        })
    );
    assert_eq!(Value::list([1, 2]).as_list().map(|l| l.len()), Ok(2));
}

// ===== Truthiness Tests =====

#[test]
fn test_truthiness() {
    assert!(!Value::Nil.is_truthy());
    assert!(!Value::Boolean(false).is_truthy());
    assert!(!Value::Integer(0).is_truthy());
    assert!(!Value::Float(0.0).is_truthy());
    assert!(!Value::from("").is_truthy());
    assert!(!Value::List(vec![]).is_truthy());
    assert!(!Value::Map(FxHashMap::default()).is_truthy());

    assert!(Value::Boolean(true).is_truthy());
    assert!(Value::Integer(-1).is_truthy());
    assert!(Value::from("a").is_truthy());
    assert!(Value::list([0]).is_truthy());
}

// ===== Equality Tests =====

#[test]
fn test_numeric_cross_equality() {
    assert_eq!(Value::Integer(2), Value::Float(2.0));
    assert_eq!(Value::Float(2.0), Value::Integer(2));
    assert_ne!(Value::Integer(2), Value::Float(2.5));
}

#[test]
fn test_structural_equality() {
    assert_eq!(Value::list([1, 2, 3]), Value::list([1, 2, 3]));
    assert_ne!(Value::list([1, 2, 3]), Value::list([1, 2]));
    assert_eq!(Value::map([("a", 1)]), Value::map([("a", 1)]));
    assert_ne!(
        Value::record("A", [("x", 1)]),
        Value::record("B", [("x", 1)])
    );
    assert_ne!(Value::from("1"), Value::Integer(1));
}

// ===== Display Tests =====

#[test]
fn test_display() {
    assert_eq!(Value::Nil.to_string(), "nil");
    assert_eq!(Value::Integer(5).to_string(), "5");
    assert_eq!(Value::Float(2.0).to_string(), "2.0");
    assert_eq!(Value::from("bleh").to_string(), "\"bleh\"");
    assert_eq!(Value::list([1, 2]).to_string(), "[1, 2]");
    assert_eq!(Value::map([("b", 2), ("a", 1)]).to_string(), "{\"a\": 1, \"b\": 2}");
}
