//! Replays recorded expressions against a concrete value

use constrained_core::{ops, Value, ValueResult};
use tracing::trace;

use crate::expr::Expr;

/// Evaluates expression trees with a fixed value bound to the root
///
/// Every occurrence of [`Expr::Root`] within one evaluation resolves to the
/// same bound value.
#[derive(Debug, Clone, Copy)]
pub struct ExprEvaluator<'a> {
    bound: &'a Value,
}

impl<'a> ExprEvaluator<'a> {
    /// Create an evaluator for the given bound value
    pub fn new(bound: &'a Value) -> Self {
        Self { bound }
    }

    pub fn bound(&self) -> &'a Value {
        self.bound
    }

    /// Evaluate a condition expression by the truthiness of its result
    pub fn evaluate_condition(&self, expr: &Expr) -> ValueResult<bool> {
        let value = self.evaluate(expr)?;
        trace!("Condition {} evaluated to {}", expr, value);
        Ok(value.is_truthy())
    }

    /// Evaluate an expression to a value
    ///
    /// Operands are evaluated left to right; the first failing operation
    /// aborts the evaluation.
    pub fn evaluate(&self, expr: &Expr) -> ValueResult<Value> {
        match expr {
            Expr::Root => Ok(self.bound.clone()),
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Unary { op, operand } => {
                let operand = self.evaluate(operand)?;
                ops::apply_unary(*op, &operand)
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                ops::apply_binary(*op, &lhs, &rhs)
            }
            Expr::Index { target, key } => {
                let target = self.evaluate(target)?;
                let key = self.evaluate(key)?;
                ops::get_item(&target, &key)
            }
            Expr::Attr { target, name } => {
                let target = self.evaluate(target)?;
                ops::get_attr(&target, name)
            }
            Expr::Call { target, args } => self.evaluate_call(target, args),
        }
    }

    fn evaluate_call(&self, target: &Expr, args: &[Expr]) -> ValueResult<Value> {
        let function = self.evaluate(target)?;
        let args = args
            .iter()
            .map(|arg| self.evaluate(arg))
            .collect::<ValueResult<Vec<_>>>()?;
        trace!("Calling {} with {} arguments", function, args.len());
        ops::call(&function, &args)
    }
}

/// Evaluate `expr` with `bound` substituted for the root
pub fn evaluate(expr: &Expr, bound: &Value) -> ValueResult<Value> {
    ExprEvaluator::new(bound).evaluate(expr)
}

/// Evaluate `expr` with `bound` substituted for the root and test the truthiness of the result
pub fn evaluate_condition(expr: &Expr, bound: &Value) -> ValueResult<bool> {
    ExprEvaluator::new(bound).evaluate_condition(expr)
}

#[cfg(test)]
#[path = "evaluator/evaluator_tests.rs"]
mod tests;
