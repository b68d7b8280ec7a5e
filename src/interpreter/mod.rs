use crate::ast::{Expression, Value};
use crate::compiler::Compiler;
use crate::config::EvaluationBudget;
use crate::data::ExecutionContext;
use crate::error::EvaluationError;
use crate::rule::{CompiledExpression, CompiledRule};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

mod engine;
mod functions;
mod methods;

use engine::AstEngine;

/// The outcome of evaluating one expression.
///
/// Compile and evaluation failures are both reported here with
/// `success == false`; the elapsed time is always filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock time in milliseconds.
    pub execution_time: f64,
}

impl TestResult {
    fn finish(outcome: Result<Value, String>, started: Instant) -> Self {
        let execution_time = started.elapsed().as_secs_f64() * 1_000.0;
        match outcome {
            Ok(value) => Self {
                success: true,
                result: Some(value),
                error: None,
                execution_time,
            },
            Err(error) => Self {
                success: false,
                result: None,
                error: Some(error),
                execution_time,
            },
        }
    }

    /// True when evaluation succeeded with the boolean `true`.
    pub fn is_true(&self) -> bool {
        self.success && matches!(self.result, Some(Value::Bool(true)))
    }
}

/// Which expression of an action was run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Branch {
    OnSuccess,
    OnFailure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    pub name: String,
    pub branch: Branch,
    pub result: TestResult,
}

/// The result of running a compiled rule: its condition and each action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOutcome {
    pub rule: String,
    pub matched: bool,
    pub condition: TestResult,
    pub actions: Vec<ActionOutcome>,
}

/// Evaluates compiled expressions against an [`ExecutionContext`].
///
/// Evaluation only borrows the context and the AST, so a single `Evaluator`
/// can be shared across threads and reused for any number of contexts.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    compiler: Compiler,
    budget: EvaluationBudget,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom compiler for [`Evaluator::evaluate`], e.g. one with extra data sources.
    pub fn with_compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_budget(mut self, budget: EvaluationBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> &EvaluationBudget {
        &self.budget
    }

    /// Evaluates a parsed expression.
    pub fn eval(
        &self,
        expression: &Expression,
        context: &ExecutionContext,
    ) -> Result<Value, EvaluationError> {
        AstEngine::new(context, self.budget).evaluate(expression)
    }

    /// Validates, compiles and evaluates an expression string in one go.
    pub fn evaluate(&self, source: &str, context: &ExecutionContext) -> TestResult {
        let started = Instant::now();
        let outcome = self
            .compiler
            .compile(source)
            .map_err(|e| e.to_string())
            .and_then(|compiled| {
                self.eval(&compiled.ast, context)
                    .map_err(|e| e.to_string())
            });
        let result = TestResult::finish(outcome, started);
        debug!(
            success = result.success,
            elapsed_ms = result.execution_time,
            "evaluated expression"
        );
        result
    }

    /// Evaluates an already compiled expression.
    pub fn run(&self, compiled: &CompiledExpression, context: &ExecutionContext) -> TestResult {
        let started = Instant::now();
        let outcome = self.eval(&compiled.ast, context).map_err(|e| e.to_string());
        TestResult::finish(outcome, started)
    }

    /// Runs a rule: the condition first, then for every action either its
    /// `onSuccess` or its `onFailure` expression.
    ///
    /// A condition that fails to evaluate, or evaluates to anything other
    /// than `true`, selects the `onFailure` branch.
    pub fn run_rule(&self, rule: &CompiledRule, context: &ExecutionContext) -> RuleOutcome {
        let condition = self.run(&rule.condition, context);
        let matched = condition.is_true();
        let branch = if matched {
            Branch::OnSuccess
        } else {
            Branch::OnFailure
        };

        let actions = rule
            .actions
            .iter()
            .map(|action| {
                let expression = match branch {
                    Branch::OnSuccess => &action.on_success,
                    Branch::OnFailure => &action.on_failure,
                };
                ActionOutcome {
                    name: action.name.clone(),
                    branch,
                    result: self.run(expression, context),
                }
            })
            .collect();

        debug!(rule = %rule.name, matched, "ran rule");
        RuleOutcome {
            rule: rule.name.clone(),
            matched,
            condition,
            actions,
        }
    }
}
