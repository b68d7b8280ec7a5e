use super::engine::{AstEngine, Locals, type_mismatch};
use crate::ast::{MethodArgument, Value};
use crate::error::EvaluationError;
use ahash::AHashMap;
use itertools::Itertools;
use std::collections::BTreeMap;

impl<'a> AstEngine<'a> {
    /// Applies a collection method to an evaluated receiver.
    pub(super) fn apply_method(
        &self,
        method: &str,
        items: Vec<Value>,
        argument: &MethodArgument,
        scope: Option<&Locals<'_>>,
        depth: usize,
    ) -> Result<Value, EvaluationError> {
        match method {
            "where" => {
                let mut kept = Vec::new();
                for item in items {
                    match self.call_lambda(method, argument, &item, scope, depth)? {
                        Value::Bool(true) => kept.push(item),
                        Value::Bool(false) => {}
                        other => return Err(type_mismatch(method, "Bool", other)),
                    }
                }
                Ok(Value::List(kept))
            }
            "sum" | "average" => {
                let numbers = self.project_numbers(method, &items, argument, scope, depth)?;
                if numbers.is_empty() {
                    return Ok(Value::Number(0.0));
                }
                let total: f64 = numbers.iter().sum();
                Ok(Value::Number(if method == "sum" {
                    total
                } else {
                    total / numbers.len() as f64
                }))
            }
            "min" | "max" => {
                let numbers = self.project_numbers(method, &items, argument, scope, depth)?;
                let reduced = if method == "min" {
                    numbers.into_iter().reduce(f64::min)
                } else {
                    numbers.into_iter().reduce(f64::max)
                };
                reduced
                    .map(Value::Number)
                    .ok_or_else(|| EvaluationError::EmptyCollection(method.to_string()))
            }
            "count" => Ok(Value::Number(items.len() as f64)),
            "any" | "all" => {
                // `any` stops at the first true, `all` at the first false.
                let stop_on = method == "any";
                for item in &items {
                    match self.call_lambda(method, argument, item, scope, depth)? {
                        Value::Bool(b) if b == stop_on => return Ok(Value::Bool(stop_on)),
                        Value::Bool(_) => {}
                        other => return Err(type_mismatch(method, "Bool", other)),
                    }
                }
                Ok(Value::Bool(!stop_on))
            }
            "first" => items
                .into_iter()
                .next()
                .ok_or_else(|| EvaluationError::EmptyCollection(method.to_string())),
            "last" => items
                .into_iter()
                .next_back()
                .ok_or_else(|| EvaluationError::EmptyCollection(method.to_string())),
            "groupBy" => {
                let mut groups: Vec<(Value, Vec<Value>)> = Vec::new();
                let mut index: AHashMap<Value, usize> = AHashMap::new();
                for item in items {
                    let key = self.call_lambda(method, argument, &item, scope, depth)?;
                    match index.get(&key) {
                        Some(&slot) => groups[slot].1.push(item),
                        None => {
                            index.insert(key.clone(), groups.len());
                            groups.push((key, vec![item]));
                        }
                    }
                }
                Ok(Value::List(
                    groups
                        .into_iter()
                        .map(|(key, members)| {
                            Value::Record(BTreeMap::from([
                                ("Key".to_string(), key),
                                ("Items".to_string(), Value::List(members)),
                            ]))
                        })
                        .collect(),
                ))
            }
            "orderBy" | "orderByDescending" => {
                let descending = method == "orderByDescending";
                let keyed = items
                    .into_iter()
                    .map(|item| {
                        let key = self.call_lambda(method, argument, &item, scope, depth)?;
                        Ok((key, item))
                    })
                    .collect::<Result<Vec<_>, EvaluationError>>()?;
                // `sorted_by` is stable, so equal keys keep their input order.
                Ok(Value::List(
                    keyed
                        .into_iter()
                        .sorted_by(|(a, _), (b, _)| {
                            if descending {
                                b.sort_cmp(a)
                            } else {
                                a.sort_cmp(b)
                            }
                        })
                        .map(|(_, item)| item)
                        .collect(),
                ))
            }
            "distinct" => Ok(Value::List(items.into_iter().unique().collect())),
            "take" | "skip" => {
                let count = self.count_argument(method, argument, scope, depth)?;
                Ok(Value::List(if method == "take" {
                    items.into_iter().take(count).collect()
                } else {
                    items.into_iter().skip(count).collect()
                }))
            }
            other => Err(EvaluationError::InvalidArgument {
                function: other.to_string(),
                message: "unknown collection method".to_string(),
            }),
        }
    }

    fn call_lambda(
        &self,
        method: &str,
        argument: &MethodArgument,
        item: &Value,
        scope: Option<&Locals<'_>>,
        depth: usize,
    ) -> Result<Value, EvaluationError> {
        let MethodArgument::Lambda { param, body } = argument else {
            return Err(EvaluationError::InvalidArgument {
                function: method.to_string(),
                message: "expected a lambda argument".to_string(),
            });
        };
        self.tick()?;
        let locals = Locals {
            name: param,
            value: item,
            parent: scope,
        };
        self.eval(body, Some(&locals), depth + 1)
    }

    fn project_numbers(
        &self,
        method: &str,
        items: &[Value],
        argument: &MethodArgument,
        scope: Option<&Locals<'_>>,
        depth: usize,
    ) -> Result<Vec<f64>, EvaluationError> {
        items
            .iter()
            .map(|item| match self.call_lambda(method, argument, item, scope, depth)? {
                Value::Number(n) => Ok(n),
                other => Err(type_mismatch(method, "Number", other)),
            })
            .collect()
    }

    fn count_argument(
        &self,
        method: &str,
        argument: &MethodArgument,
        scope: Option<&Locals<'_>>,
        depth: usize,
    ) -> Result<usize, EvaluationError> {
        let MethodArgument::Value(expr) = argument else {
            return Err(EvaluationError::InvalidArgument {
                function: method.to_string(),
                message: "expected a count".to_string(),
            });
        };
        match self.eval(expr, scope, depth + 1)? {
            Value::Number(n) if n >= 0.0 && n.fract() == 0.0 => Ok(n as usize),
            other => Err(EvaluationError::InvalidArgument {
                function: method.to_string(),
                message: format!("expected a non-negative whole number, found {}", other),
            }),
        }
    }
}
