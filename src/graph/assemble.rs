use super::node::{Node, NodeType};
use super::store::RuleGraph;
use crate::error::AssemblyError;
use crate::rule::{ActionDefinition, RuleDefinition};
use tracing::debug;

/// A condition term and the connective that joins it to the previous term.
struct Term {
    connective: Option<&'static str>,
    expression: String,
}

impl RuleGraph {
    /// Folds a rule group into a rule definition.
    ///
    /// Children are read in insertion order. Conditions are joined by the
    /// operator node between them (`AND` when there is none), nested rule
    /// groups contribute their own condition in parentheses and nested
    /// action groups become the rule's actions.
    pub fn assemble(&self, group_id: &str) -> Result<RuleDefinition, AssemblyError> {
        let group = self
            .node(group_id)
            .ok_or_else(|| AssemblyError::NotFound(group_id.to_string()))?;
        if group.node_type != NodeType::RuleGroup {
            return Err(AssemblyError::NotARuleGroup(group_id.to_string()));
        }

        let mut actions = Vec::new();
        let condition = self.fold_condition(group, &mut actions)?;
        let definition = RuleDefinition {
            group_id: group_id.to_string(),
            name: self.name_of(group, NodeType::RuleName),
            condition,
            actions,
        };
        debug!(rule = %definition.name, actions = definition.actions.len(), "assembled rule");
        Ok(definition)
    }

    fn fold_condition(
        &self,
        group: &Node,
        actions: &mut Vec<ActionDefinition>,
    ) -> Result<String, AssemblyError> {
        let mut terms: Vec<Term> = Vec::new();
        // Operator seen since the last term, with the id of the node that set it.
        let mut pending: Option<(&'static str, &str)> = None;

        for child in self.children_of(group) {
            let expression = match child.node_type {
                NodeType::Condition => {
                    let expression = child.data_str("expression").unwrap_or_default().trim();
                    if expression.is_empty() {
                        return Err(AssemblyError::EmptyCondition(child.id.clone()));
                    }
                    expression.to_string()
                }
                NodeType::RuleGroup => {
                    let nested = self.fold_condition(child, actions)?;
                    format!("({})", nested)
                }
                NodeType::ConditionalOperator => {
                    if terms.is_empty() || pending.is_some() {
                        return Err(AssemblyError::DanglingOperator(child.id.clone()));
                    }
                    pending = Some((connective(child)?, child.id.as_str()));
                    continue;
                }
                NodeType::ActionGroup => {
                    actions.push(ActionDefinition {
                        group_id: child.id.clone(),
                        name: self.name_of(child, NodeType::ActionName),
                        on_success: child.data_str("onSuccess").unwrap_or_default().to_string(),
                        on_failure: child.data_str("onFailure").unwrap_or_default().to_string(),
                    });
                    continue;
                }
                NodeType::RuleName | NodeType::ActionName | NodeType::Initial => continue,
            };
            let connective = match pending.take() {
                Some((symbol, _)) => Some(symbol),
                None if terms.is_empty() => None,
                None => Some("&&"),
            };
            terms.push(Term {
                connective,
                expression,
            });
        }

        if let Some((_, operator_id)) = pending {
            return Err(AssemblyError::DanglingOperator(operator_id.to_string()));
        }
        Ok(join_terms(terms))
    }

    fn children_of<'g>(&'g self, node: &Node) -> Vec<&'g Node> {
        self.children(&node.id).unwrap_or_default()
    }

    fn name_of(&self, group: &Node, name_type: NodeType) -> String {
        self.children_of(group)
            .into_iter()
            .find(|child| child.node_type == name_type)
            .and_then(Node::label)
            .or_else(|| group.label())
            .unwrap_or(group.id.as_str())
            .to_string()
    }
}

fn connective(node: &Node) -> Result<&'static str, AssemblyError> {
    let value = node.data_str("operator").unwrap_or("AND");
    match value.trim().to_ascii_uppercase().as_str() {
        "AND" | "&&" => Ok("&&"),
        "OR" | "||" => Ok("||"),
        _ => Err(AssemblyError::UnknownOperator {
            node_id: node.id.clone(),
            value: value.to_string(),
        }),
    }
}

/// Joins terms left to right. A change of connective wraps everything so
/// far in parentheses, so `a OR b AND c` reads as `(a OR b) AND c`.
fn join_terms(terms: Vec<Term>) -> String {
    if terms.is_empty() {
        return "true".to_string();
    }
    let wrap = terms.len() > 1;
    let mut condition = String::new();
    let mut previous: Option<&str> = None;
    for term in terms {
        let expression = if wrap {
            format!("({})", term.expression)
        } else {
            term.expression
        };
        match term.connective {
            None => condition = expression,
            Some(symbol) => {
                if previous.is_some_and(|p| p != symbol) {
                    condition = format!("({})", condition);
                }
                condition = format!("{} {} {}", condition, symbol, expression);
                previous = Some(symbol);
            }
        }
    }
    condition
}
