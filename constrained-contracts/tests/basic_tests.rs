//! Basic integration tests for constrained-contracts

use constrained_contracts::{constraints, evaluate, util, Check, ConstraintSet, Expr};
use constrained_core::{Value, ValueError, ValueType};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn x() -> Expr {
    Expr::root()
}

#[test]
fn test_tree_reevaluated_per_input() {
    let expr = &x() * 2 + 1;
    assert_eq!(evaluate(&expr, &Value::Integer(3)), Ok(Value::Integer(7)));
    assert_eq!(evaluate(&expr, &Value::Integer(5)), Ok(Value::Integer(11)));
    assert_eq!(evaluate(&expr, &Value::Integer(3)), Ok(Value::Integer(7)));
}

#[test]
fn test_linear_bound() {
    let set = constraints![(&x() * 2 + 1).ge(5)];
    assert_eq!(set.is_member(&Value::Integer(3)), Ok(true));
    assert_eq!(set.is_member(&Value::Integer(2)), Ok(true));
    assert_eq!(set.is_member(&Value::Integer(1)), Ok(false));
    assert_eq!(set.is_member(&Value::Integer(-100)), Ok(false));
}

#[test]
fn test_odd_but_not_three() {
    let set = constraints![(&x() % 2).ne(0), x().ne(3)];
    assert_eq!(set.is_member(&Value::Integer(5)), Ok(true));
    assert_eq!(set.is_member(&Value::Integer(2)), Ok(false));
    assert_eq!(set.is_member(&Value::Integer(3)), Ok(false));
}

#[test]
fn test_last_character() {
    let ends_in_h = constraints![x().getitem(-1).eq("h")];
    assert_eq!(ends_in_h.is_member(&Value::from("bleh")), Ok(true));
    assert_eq!(ends_in_h.is_member(&Value::from("bleH")), Ok(false));

    let ends_in_any_h = constraints![x().getitem(-1).method("upper", Vec::<Expr>::new()).eq("H")];
    assert_eq!(ends_in_any_h.is_member(&Value::from("bleh")), Ok(true));
    assert_eq!(ends_in_any_h.is_member(&Value::from("bleH")), Ok(true));
    assert_eq!(ends_in_any_h.is_member(&Value::from("blab")), Ok(false));
}

#[test]
fn test_conjunction_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let set = ConstraintSet::new([
        Check::from(x().gt(0)),
        Check::predicate(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        }),
        Check::from(x().lt(10)),
    ]);

    assert_eq!(set.is_member(&Value::Integer(-1)), Ok(false));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(set.is_member(&Value::Integer(1)), Ok(false));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(set.first_failure(&Value::Integer(1)), Ok(Some(1)));
}

#[test]
fn test_evaluation_errors_surface_unchanged() {
    let set = constraints![x().getitem(0).eq(1)];
    assert_eq!(
        set.is_member(&Value::Integer(5)),
        Err(ValueError::NotSubscriptable("integer"))
    );

    let guarded = constraints![util::is_instance(ValueType::List), x().getitem(0).eq(1)];
    assert_eq!(guarded.is_member(&Value::Integer(5)), Ok(false));
    assert_eq!(guarded.is_member(&Value::list([1, 2])), Ok(true));
}

#[test]
fn test_predicates_and_expressions_mix() {
    let set = constraints![
        Check::predicate(|v| v.is_string()),
        x().getattr("len").invoke().le(3),
        util::matches("[a-z]").unwrap(),
    ];
    assert_eq!(set.is_member(&Value::from("abc")), Ok(true));
    assert_eq!(set.is_member(&Value::from("abcd")), Ok(false));
    assert_eq!(set.is_member(&Value::from("Abc")), Ok(false));
    assert_eq!(set.is_member(&Value::Integer(1)), Ok(false));
}

#[test]
fn test_membership_with_records() {
    let point = |px: i64, py: i64| Value::record("Point", [("x", px), ("y", py)]);
    let in_unit_square = constraints![
        x().getattr("x").ge(0),
        x().getattr("x").le(1),
        x().getattr("y").ge(0),
        x().getattr("y").le(1),
    ];
    assert_eq!(in_unit_square.is_member(&point(0, 1)), Ok(true));
    assert_eq!(in_unit_square.is_member(&point(2, 0)), Ok(false));
}

#[test]
fn test_set_shared_across_threads() {
    let set = constraints![(&x() % 3).eq(0)];
    let handles: Vec<_> = (0..8)
        .map(|n| {
            let set = set.clone();
            std::thread::spawn(move || set.is_member(&Value::Integer(n)))
        })
        .collect();

    let members: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap().unwrap())
        .collect();
    assert_eq!(members, vec![true, false, false, true, false, false, true, false]);
}

#[test]
fn test_float_comparisons_are_exact() {
    let nonzero = constraints![x().ne(0.0)];
    assert_eq!(nonzero.is_member(&Value::Float(1e-17)), Ok(true));
    assert_eq!(nonzero.is_member(&Value::Float(0.0)), Ok(false));
    assert_eq!(x().gt(0.0).evaluate(&Value::Float(1e-17)), Ok(Value::Boolean(true)));

    let unbounded = constraints![x().eq(f64::INFINITY)];
    assert_eq!(unbounded.is_member(&Value::Float(f64::INFINITY)), Ok(true));
    assert_eq!(unbounded.is_member(&Value::Float(f64::MAX)), Ok(false));
}

#[test]
fn test_oversized_repetition_is_an_error() {
    let repeated = x() * i64::MAX;
    assert_eq!(
        repeated.evaluate(&Value::from("ab")),
        Err(ValueError::Overflow("repetition"))
    );
    assert_eq!(
        repeated.evaluate(&Value::list([1, 2])),
        Err(ValueError::Overflow("repetition"))
    );
    assert_eq!((x() * 3).evaluate(&Value::from("ab")), Ok(Value::from("ababab")));
}
