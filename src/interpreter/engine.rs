use crate::ast::{BinaryOp, Expression, LogicalOp, UnaryOp, Value};
use crate::config::EvaluationBudget;
use crate::data::ExecutionContext;
use crate::error::EvaluationError;
use std::cell::Cell;
use std::time::Instant;

use super::functions;

// How many steps pass between wall-clock checks.
const CLOCK_INTERVAL: u64 = 256;

/// A lambda parameter binding, chained to the bindings of enclosing lambdas.
pub(super) struct Locals<'s> {
    pub(super) name: &'s str,
    pub(super) value: &'s Value,
    pub(super) parent: Option<&'s Locals<'s>>,
}

impl<'s> Locals<'s> {
    fn lookup(&self, name: &str) -> Option<&'s Value> {
        if self.name == name {
            return Some(self.value);
        }
        self.parent.and_then(|parent| parent.lookup(name))
    }
}

/// The core recursive engine for evaluating a single AST against one context.
///
/// An engine is created per evaluation; it only reads the context and the AST.
pub(super) struct AstEngine<'a> {
    context: &'a ExecutionContext,
    budget: EvaluationBudget,
    started: Instant,
    steps: Cell<u64>,
}

impl<'a> AstEngine<'a> {
    pub(super) fn new(context: &'a ExecutionContext, budget: EvaluationBudget) -> Self {
        Self {
            context,
            budget,
            started: Instant::now(),
            steps: Cell::new(0),
        }
    }

    /// Evaluates from the root. Depth counts nodes, the root being 1, which
    /// matches [`Expression::depth`] and the compiler's nesting limit.
    pub(super) fn evaluate(&self, expression: &Expression) -> Result<Value, EvaluationError> {
        self.eval(expression, None, 1)
    }

    /// Counts one unit of work against the step and time budgets.
    pub(super) fn tick(&self) -> Result<(), EvaluationError> {
        let steps = self.steps.get() + 1;
        self.steps.set(steps);
        if steps > self.budget.max_steps {
            return Err(EvaluationError::StepBudgetExceeded(self.budget.max_steps));
        }
        if steps % CLOCK_INTERVAL == 0 && self.started.elapsed() > self.budget.timeout() {
            return Err(EvaluationError::Timeout(self.budget.timeout_ms));
        }
        Ok(())
    }

    pub(super) fn eval(
        &self,
        expr: &Expression,
        scope: Option<&Locals<'_>>,
        depth: usize,
    ) -> Result<Value, EvaluationError> {
        if depth > self.budget.max_depth {
            return Err(EvaluationError::DepthExceeded(self.budget.max_depth));
        }
        self.tick()?;

        match expr {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::DataRef { source, path } => {
                let root = scope
                    .and_then(|locals| locals.lookup(source))
                    .or_else(|| self.context.get(source))
                    .ok_or_else(|| EvaluationError::InputNotFound(source.clone()))?;
                let mut current = root;
                for property in path {
                    current = property_of(current, property)?;
                }
                Ok(current.clone())
            }
            Expression::Member { object, property } => {
                let object = self.eval(object, scope, depth + 1)?;
                property_of(&object, property).cloned()
            }
            Expression::Unary { op, operand } => {
                let value = self.eval(operand, scope, depth + 1)?;
                match (op, value) {
                    (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (UnaryOp::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
                    (UnaryOp::Not, other) => Err(type_mismatch("!", "Bool", other)),
                    (UnaryOp::Negate, other) => Err(type_mismatch("-", "Number", other)),
                }
            }
            Expression::Binary { op, left, right } => {
                let left = self.eval(left, scope, depth + 1)?;
                let right = self.eval(right, scope, depth + 1)?;
                eval_binary(*op, left, right)
            }
            Expression::Logical { op, left, right } => {
                let symbol = op.symbol();
                let left = self.eval_bool(left, scope, depth, symbol)?;
                // Short-circuit: the right side is only evaluated when it decides the outcome.
                match (op, left) {
                    (LogicalOp::And, false) => Ok(Value::Bool(false)),
                    (LogicalOp::Or, true) => Ok(Value::Bool(true)),
                    _ => Ok(Value::Bool(self.eval_bool(right, scope, depth, symbol)?)),
                }
            }
            Expression::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                let branch = if self.eval_bool(condition, scope, depth, "?:")? {
                    then_branch
                } else {
                    else_branch
                };
                self.eval(branch, scope, depth + 1)
            }
            Expression::Call { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, scope, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                functions::call(function, args)
            }
            Expression::Method {
                receiver,
                method,
                argument,
            } => match self.eval(receiver, scope, depth + 1)? {
                Value::List(items) => self.apply_method(method, items, argument, scope, depth),
                other => Err(type_mismatch(method, "List", other)),
            },
        }
    }

    fn eval_bool(
        &self,
        expr: &Expression,
        scope: Option<&Locals<'_>>,
        depth: usize,
        operation: &str,
    ) -> Result<bool, EvaluationError> {
        match self.eval(expr, scope, depth + 1)? {
            Value::Bool(b) => Ok(b),
            other => Err(type_mismatch(operation, "Bool", other)),
        }
    }
}

pub(super) fn type_mismatch(operation: &str, expected: &str, found: Value) -> EvaluationError {
    EvaluationError::TypeMismatch {
        operation: operation.to_string(),
        expected: expected.to_string(),
        found,
    }
}

fn property_of<'v>(value: &'v Value, property: &str) -> Result<&'v Value, EvaluationError> {
    match value {
        Value::Record(fields) => {
            fields
                .get(property)
                .ok_or_else(|| EvaluationError::PropertyNotFound {
                    property: property.to_string(),
                    target: value.to_string(),
                })
        }
        other => Err(EvaluationError::PropertyNotFound {
            property: property.to_string(),
            target: other.type_name().to_string(),
        }),
    }
}

fn eval_binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, EvaluationError> {
    let symbol = op.symbol();
    match op {
        BinaryOp::LooseEqual => Ok(Value::Bool(loose_eq(&left, &right))),
        BinaryOp::LooseNotEqual => Ok(Value::Bool(!loose_eq(&left, &right))),
        BinaryOp::StrictEqual => Ok(Value::Bool(left == right)),
        BinaryOp::StrictNotEqual => Ok(Value::Bool(left != right)),
        BinaryOp::Less | BinaryOp::LessOrEqual | BinaryOp::Greater | BinaryOp::GreaterOrEqual => {
            let ordering = match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                (Value::Number(_) | Value::Str(_), _) => {
                    return Err(type_mismatch(symbol, left.type_name(), right.clone()));
                }
                _ => return Err(type_mismatch(symbol, "Number or String", left.clone())),
            };
            // NaN compares false against everything.
            let Some(ordering) = ordering else {
                return Ok(Value::Bool(false));
            };
            Ok(Value::Bool(match op {
                BinaryOp::Less => ordering.is_lt(),
                BinaryOp::LessOrEqual => ordering.is_le(),
                BinaryOp::Greater => ordering.is_gt(),
                _ => ordering.is_ge(),
            }))
        }
        _ => {
            let a = left
                .as_f64()
                .ok_or_else(|| type_mismatch(symbol, "Number", left.clone()))?;
            let b = right
                .as_f64()
                .ok_or_else(|| type_mismatch(symbol, "Number", right.clone()))?;
            let result = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Subtract => a - b,
                BinaryOp::Multiply => a * b,
                BinaryOp::Power => a.powf(b),
                BinaryOp::Divide | BinaryOp::Modulo if b == 0.0 => {
                    return Err(EvaluationError::DivisionByZero(format!("{} {} {}", a, symbol, b)));
                }
                BinaryOp::Divide => a / b,
                _ => a % b,
            };
            Ok(Value::Number(result))
        }
    }
}

/// `==` semantics: numeric strings and booleans coerce to numbers.
fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(n), Value::Str(s)) | (Value::Str(s), Value::Number(n)) => {
            s.trim().parse::<f64>().is_ok_and(|parsed| parsed == *n)
        }
        (Value::Bool(b), Value::Number(n)) | (Value::Number(n), Value::Bool(b)) => {
            f64::from(u8::from(*b)) == *n
        }
        _ => left == right,
    }
}
