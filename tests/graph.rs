//! Tests for the rule graph: commands, persistence and assembly.
mod common;

use common::{create_rule_graph, create_sales_context};
use kisoku::graph::{CommandOutcome, Extent, GraphSnapshot, NodeCounter, Position};
use kisoku::prelude::*;
use serde_json::json;
use std::collections::BTreeSet;

fn edges(graph: &RuleGraph) -> BTreeSet<(String, Option<String>)> {
    graph
        .nodes()
        .map(|node| (node.id.clone(), node.parent_id.clone()))
        .collect()
}

fn condition(graph: &mut RuleGraph, expression: &str) -> String {
    let node = graph.create_node(NodeType::Condition, None).unwrap();
    graph
        .update_node_data(&node.id, json!({ "expression": expression }))
        .unwrap();
    node.id
}

fn operator(graph: &mut RuleGraph, value: &str) -> String {
    let node = graph
        .create_node(NodeType::ConditionalOperator, None)
        .unwrap();
    graph
        .update_node_data(&node.id, json!({ "operator": value }))
        .unwrap();
    node.id
}

#[test]
fn test_condition_without_selection_is_rejected() {
    let mut graph = RuleGraph::new();
    let before = graph.len();
    assert_eq!(
        graph.create_node(NodeType::Condition, None),
        Err(GraphError::Structural(StructuralError::NoGroupSelected))
    );
    assert_eq!(graph.len(), before);

    graph.create_node(NodeType::RuleGroup, None).unwrap();
    graph.clear_selection();
    let before = graph.len();
    let err = graph
        .create_node(NodeType::ConditionalOperator, None)
        .unwrap_err();
    assert_eq!(err.to_string(), "no group selected");
    assert_eq!(graph.len(), before);
}

#[test]
fn test_group_creation_adds_name_node_and_selects() {
    let mut graph = RuleGraph::new();
    let group = graph.create_node(NodeType::RuleGroup, None).unwrap();

    assert_eq!(group.id, "ruleGroup-1");
    assert_eq!(group.position, Position::new(100.0, 100.0));
    assert_eq!(group.parent_id, None);
    assert_eq!(group.label(), Some("Rule 1"));
    assert_eq!(graph.selection(), Some("ruleGroup-1"));
    assert_eq!(graph.len(), 2);

    let name = graph.node("ruleName-1").unwrap();
    assert_eq!(name.parent_id.as_deref(), Some("ruleGroup-1"));
    assert_eq!(name.extent, Some(Extent::Parent));
    assert_eq!(name.position, Position::new(10.0, 10.0));
    assert_eq!(graph.counter().get(NodeType::RuleGroup), 1);
    assert_eq!(graph.counter().get(NodeType::RuleName), 1);
}

#[test]
fn test_nested_positions_and_ids() {
    let mut graph = RuleGraph::new();
    graph.create_node(NodeType::RuleGroup, None).unwrap();
    let first = graph.create_node(NodeType::Condition, None).unwrap();
    let op = graph
        .create_node(NodeType::ConditionalOperator, None)
        .unwrap();
    let second = graph.create_node(NodeType::Condition, None).unwrap();

    assert_eq!(first.parent_id.as_deref(), Some("ruleGroup-1"));
    assert_eq!(first.position, Position::new(20.0, 60.0));
    assert_eq!(op.position, Position::new(20.0, 140.0));
    assert_eq!(first.data, json!({ "label": "Condition", "expression": "" }));
    assert_eq!(op.data, json!({ "operator": "AND" }));

    let token = |id: &str| -> i64 { id.rsplit_once('-').unwrap().1.parse().unwrap() };
    assert!(first.id.starts_with("condition-"));
    assert!(op.id.starts_with("conditionalOperator-"));
    assert!(token(&second.id) > token(&first.id));

    graph.clear_selection();
    let root = graph.create_node(NodeType::RuleGroup, None).unwrap();
    assert_eq!(root.id, "ruleGroup-2");
    assert_eq!(root.position, Position::new(150.0, 150.0));
}

#[test]
fn test_initial_node_is_always_a_root() {
    let mut graph = RuleGraph::new();
    graph.create_node(NodeType::RuleGroup, None).unwrap();
    let start = graph.create_node(NodeType::Initial, None).unwrap();
    assert_eq!(start.id, "initial-1");
    assert_eq!(start.parent_id, None);
    assert_eq!(start.label(), Some("Start"));
}

#[test]
fn test_explicit_parent_must_be_a_group() {
    let mut graph = RuleGraph::new();
    graph.create_node(NodeType::RuleGroup, None).unwrap();
    let cond = graph.create_node(NodeType::Condition, None).unwrap();

    assert_eq!(
        graph.create_node(NodeType::Condition, Some(&cond.id)),
        Err(GraphError::Structural(StructuralError::NotAGroup(cond.id.clone())))
    );
    assert_eq!(
        graph.create_node(NodeType::Condition, Some("ruleGroup-9")),
        Err(GraphError::NotFound("ruleGroup-9".to_string()))
    );
    assert!(graph.select_group(&cond.id).is_err());
}

#[test]
fn test_name_nodes_are_managed() {
    let mut graph = RuleGraph::new();
    graph.create_node(NodeType::ActionGroup, None).unwrap();
    assert!(matches!(
        graph.create_node(NodeType::ActionName, None),
        Err(GraphError::Structural(StructuralError::ManagedNode(_)))
    ));
    assert!(matches!(
        graph.delete_node("actionName-1"),
        Err(GraphError::Structural(StructuralError::ManagedNode(_)))
    ));
    assert_eq!(graph.len(), 2);
}

#[test]
fn test_update_merges_object_patches() {
    let mut graph = RuleGraph::new();
    let action = graph.create_node(NodeType::ActionGroup, None).unwrap();
    graph
        .update_node_data(&action.id, json!({ "onSuccess": "100" }))
        .unwrap();

    let node = graph.node(&action.id).unwrap();
    assert_eq!(node.data_str("onSuccess"), Some("100"));
    assert_eq!(node.data_str("onFailure"), Some(""));
    assert_eq!(node.label(), Some("Action 1"));

    graph.update_node_data(&action.id, json!("raw")).unwrap();
    assert_eq!(graph.node(&action.id).unwrap().data, json!("raw"));

    assert_eq!(
        graph.update_node_data("nope", json!({})),
        Err(GraphError::NotFound("nope".to_string()))
    );
}

#[test]
fn test_deleting_a_group_orphans_its_children() {
    let (mut graph, group_id) = create_rule_graph("AND");
    let children: Vec<String> = graph
        .children(&group_id)
        .unwrap()
        .into_iter()
        .filter(|node| node.node_type != NodeType::RuleName)
        .map(|node| node.id.clone())
        .collect();

    let outcome = graph.delete_node(&group_id).unwrap();
    assert_eq!(outcome.removed, vec!["ruleName-1".to_string(), group_id.clone()]);
    assert_eq!(outcome.orphaned, children);
    assert_eq!(graph.selection(), None);

    let orphans: Vec<&str> = graph.orphans().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(orphans.len(), 4);
    assert!(graph.node(&children[0]).is_some());
    assert!(graph.children(&group_id).is_err());
}

#[test]
fn test_deleting_a_subtree_cascades() {
    let (mut graph, group_id) = create_rule_graph("AND");
    graph.clear_selection();
    let start = graph.create_node(NodeType::Initial, None).unwrap();
    let total = graph.len();

    let outcome = graph.delete_subtree(&group_id).unwrap();
    assert_eq!(outcome.removed.len(), total - 1);
    assert_eq!(outcome.removed.last(), Some(&group_id));
    assert!(outcome.orphaned.is_empty());
    assert_eq!(graph.len(), 1);
    assert!(graph.node(&start.id).is_some());
    assert!(graph.orphans().is_empty());
}

#[test]
fn test_dispatch_applies_serialized_commands() {
    let mut graph = RuleGraph::new();
    let command: GraphCommand =
        serde_json::from_value(json!({ "command": "create", "nodeType": "ruleGroup" })).unwrap();
    let CommandOutcome::Created(group) = graph.dispatch(command).unwrap() else {
        panic!("expected a created node");
    };

    let outcome = graph
        .dispatch(GraphCommand::Create {
            node_type: NodeType::Condition,
            parent_id: Some(group.id.clone()),
        })
        .unwrap();
    let CommandOutcome::Created(cond) = outcome else {
        panic!("expected a created node");
    };

    let update: GraphCommand = serde_json::from_value(json!({
        "command": "update",
        "id": cond.id.clone(),
        "patch": { "expression": "sale.Amount > 10" }
    }))
    .unwrap();
    assert_eq!(
        graph.dispatch(update).unwrap(),
        CommandOutcome::Updated(cond.id.clone())
    );

    assert_eq!(
        graph.dispatch(GraphCommand::ClearSelection).unwrap(),
        CommandOutcome::Selected(None)
    );
    assert_eq!(
        graph
            .dispatch(GraphCommand::Select {
                id: group.id.clone()
            })
            .unwrap(),
        CommandOutcome::Selected(Some(group.id.clone()))
    );

    let CommandOutcome::Deleted(outcome) = graph
        .dispatch(GraphCommand::DeleteSubtree { id: group.id })
        .unwrap()
    else {
        panic!("expected a delete outcome");
    };
    assert_eq!(outcome.removed.len(), 3);
    assert!(graph.is_empty());
}

#[test]
fn test_typed_mutators_match_commands() {
    let mut typed = RuleGraph::new();
    let mut commanded = RuleGraph::new();

    assert_eq!(
        typed.create_node(NodeType::Condition, None).unwrap_err(),
        commanded
            .dispatch(GraphCommand::Create {
                node_type: NodeType::Condition,
                parent_id: None,
            })
            .unwrap_err()
    );

    let group = typed.create_node(NodeType::RuleGroup, None).unwrap();
    commanded
        .dispatch(GraphCommand::Create {
            node_type: NodeType::RuleGroup,
            parent_id: None,
        })
        .unwrap();
    typed.clear_selection();
    commanded.dispatch(GraphCommand::ClearSelection).unwrap();
    assert_eq!(typed.selection(), commanded.selection());

    typed
        .update_node_data(&group.id, json!({ "label": "Quota" }))
        .unwrap();
    commanded
        .dispatch(GraphCommand::Update {
            id: group.id.clone(),
            patch: json!({ "label": "Quota" }),
        })
        .unwrap();
    assert_eq!(typed.export(), commanded.export());

    assert_eq!(
        typed.select_group("ruleName-1").unwrap_err(),
        commanded
            .dispatch(GraphCommand::Select {
                id: "ruleName-1".to_string()
            })
            .unwrap_err()
    );

    let removed = typed.delete_node(&group.id).unwrap();
    let CommandOutcome::Deleted(commanded_removed) = commanded
        .dispatch(GraphCommand::Delete {
            id: group.id.clone(),
        })
        .unwrap()
    else {
        panic!("expected a delete outcome");
    };
    assert_eq!(removed, commanded_removed);
    assert!(typed.is_empty() && commanded.is_empty());
}

#[test]
fn test_removed_parents_leave_no_bookkeeping() {
    let (mut graph, group_id) = create_rule_graph("AND");
    let outcome = graph.delete_node(&group_id).unwrap();
    assert_eq!(outcome.orphaned.len(), 4);
    // Orphans still reference the deleted group.
    assert!(format!("{:?}", graph).contains(&group_id));

    for orphan in &outcome.orphaned {
        graph.delete_subtree(orphan).unwrap();
    }
    assert!(graph.is_empty());
    assert!(!format!("{:?}", graph).contains(&group_id));
    assert!(!format!("{:?}", graph).contains("actionGroup-1"));
}

#[test]
fn test_round_trip_keeps_parent_chain() {
    let mut graph = RuleGraph::new();
    let group = graph.create_node(NodeType::RuleGroup, None).unwrap();
    let cond = graph.create_node(NodeType::Condition, None).unwrap();

    let json = graph.to_json().unwrap();
    let restored = RuleGraph::from_json(&json).unwrap();

    assert_eq!(restored.len(), 3);
    assert_eq!(
        restored.node(&cond.id).unwrap().parent_id.as_deref(),
        Some(group.id.as_str())
    );
    assert_eq!(
        restored.node("ruleName-1").unwrap().parent_id.as_deref(),
        Some(group.id.as_str())
    );
    assert_eq!(restored.node(&group.id).unwrap().parent_id, None);
    assert_eq!(edges(&restored), edges(&graph));
}

#[test]
fn test_round_trip_is_independent_of_node_order() {
    let (graph, group_id) = create_rule_graph("OR");
    let mut snapshot = graph.export();
    snapshot.nodes.reverse();

    let restored = RuleGraph::import(snapshot).unwrap();
    assert_eq!(edges(&restored), edges(&graph));
    assert_eq!(restored.counter(), graph.counter());
    assert_eq!(restored.assemble(&group_id), graph.assemble(&group_id));
    assert_eq!(
        restored.assemble(&group_id).unwrap().condition,
        "(sale.Amount > 1000) || (customer.IsNew === true)"
    );

    let ids = |graph: &RuleGraph| graph.nodes().map(|n| n.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&restored), ids(&graph));
}

#[test]
fn test_import_without_order_follows_the_array() {
    let (graph, group_id) = create_rule_graph("AND");
    let mut snapshot = graph.export();
    snapshot.order.clear();

    let json = serde_json::to_value(&snapshot).unwrap();
    assert!(json.get("order").is_none());

    let restored = RuleGraph::import(snapshot).unwrap();
    assert_eq!(restored.assemble(&group_id), graph.assemble(&group_id));
}

#[test]
fn test_export_shape() {
    let mut graph = RuleGraph::new();
    graph.create_node(NodeType::RuleGroup, None).unwrap();
    let exported = serde_json::to_value(graph.export()).unwrap();

    let name = &exported["nodes"][1];
    assert_eq!(name["type"], json!("ruleName"));
    assert_eq!(name["parentId"], json!("ruleGroup-1"));
    assert_eq!(name["extent"], json!("parent"));
    assert!(exported["nodes"][0].get("parentId").is_none());
    assert_eq!(exported["counter"]["ruleGroup"], json!(1));
}

#[test]
fn test_import_restores_counters_from_ids() {
    let (graph, _) = create_rule_graph("AND");
    let mut snapshot = graph.export();
    snapshot.counter = NodeCounter::default();

    let mut restored = RuleGraph::import(snapshot).unwrap();
    assert_eq!(restored.selection(), None);
    let group = restored.create_node(NodeType::RuleGroup, None).unwrap();
    assert_eq!(group.id, "ruleGroup-2");
    assert!(restored.node("ruleName-2").is_some());

    let existing: BTreeSet<String> = graph.nodes().map(|n| n.id.clone()).collect();
    let cond = restored.create_node(NodeType::Condition, None).unwrap();
    assert!(!existing.contains(&cond.id));
}

#[test]
fn test_import_keeps_dangling_parents() {
    let json = r#"{
        "nodes": [
            { "id": "condition-5", "type": "condition", "position": { "x": 20, "y": 60 },
              "parentId": "ruleGroup-9", "extent": "parent",
              "data": { "label": "Condition", "expression": "true" } }
        ]
    }"#;
    let graph = RuleGraph::from_json(json).unwrap();
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.orphans().len(), 1);
}

#[test]
fn test_import_rejects_broken_structure() {
    let node = |id: &str, node_type: NodeType, parent: Option<&str>| Node {
        id: id.to_string(),
        node_type,
        position: Position::default(),
        parent_id: parent.map(str::to_string),
        extent: parent.map(|_| Extent::Parent),
        data: json!({}),
    };
    let import = |nodes: Vec<Node>| {
        RuleGraph::import(GraphSnapshot {
            nodes,
            counter: NodeCounter::default(),
            order: Vec::new(),
        })
    };

    assert_eq!(
        import(vec![
            node("ruleGroup-1", NodeType::RuleGroup, None),
            node("ruleGroup-1", NodeType::RuleGroup, None),
        ])
        .unwrap_err(),
        GraphError::Structural(StructuralError::DuplicateId("ruleGroup-1".to_string()))
    );

    assert!(matches!(
        import(vec![
            node("ruleGroup-1", NodeType::RuleGroup, Some("ruleGroup-2")),
            node("ruleGroup-2", NodeType::RuleGroup, Some("ruleGroup-1")),
        ]),
        Err(GraphError::Structural(StructuralError::Cycle { .. }))
    ));

    assert_eq!(
        import(vec![
            node("ruleGroup-1", NodeType::RuleGroup, None),
            node("ruleName-1", NodeType::RuleName, Some("ruleGroup-1")),
            node("ruleName-2", NodeType::RuleName, Some("ruleGroup-1")),
        ])
        .unwrap_err(),
        GraphError::Structural(StructuralError::DuplicateNameNode {
            group_id: "ruleGroup-1".to_string(),
            name_type: "ruleName".to_string(),
        })
    );

    assert_eq!(
        import(vec![
            node("condition-1", NodeType::Condition, None),
            node("condition-2", NodeType::Condition, Some("condition-1")),
        ])
        .unwrap_err(),
        GraphError::Structural(StructuralError::NotAGroup("condition-1".to_string()))
    );

    assert_eq!(
        import(vec![
            node("actionGroup-1", NodeType::ActionGroup, None),
            node("ruleName-1", NodeType::RuleName, Some("actionGroup-1")),
        ])
        .unwrap_err(),
        GraphError::Structural(StructuralError::MisplacedNameNode("ruleName-1".to_string()))
    );

    assert_eq!(
        import(vec![
            node("ruleGroup-1", NodeType::RuleGroup, None),
            node("ruleName-1", NodeType::RuleName, Some("ruleGroup-1")),
            node("actionName-1", NodeType::ActionName, None),
        ])
        .unwrap_err(),
        GraphError::Structural(StructuralError::MisplacedNameNode("actionName-1".to_string()))
    );

    assert_eq!(
        import(vec![node("ruleName-1", NodeType::RuleName, Some("ruleGroup-7"))]).unwrap_err(),
        GraphError::Structural(StructuralError::DanglingParent {
            node_id: "ruleName-1".to_string(),
            parent_id: "ruleGroup-7".to_string(),
        })
    );

    assert_eq!(
        import(vec![
            node("ruleGroup-1", NodeType::RuleGroup, None),
            node("ruleName-1", NodeType::RuleName, Some("ruleGroup-1")),
            node("actionGroup-1", NodeType::ActionGroup, Some("ruleGroup-1")),
        ])
        .unwrap_err(),
        GraphError::Structural(StructuralError::MissingNameNode {
            group_id: "actionGroup-1".to_string(),
            name_type: "actionName".to_string(),
        })
    );

    assert!(matches!(
        RuleGraph::from_json("{ not json"),
        Err(GraphError::Json(_))
    ));
}

#[test]
fn test_assemble_joins_conditions_with_operators() {
    let (graph, group_id) = create_rule_graph("AND");
    let definition = graph.assemble(&group_id).unwrap();
    assert_eq!(definition.name, "Rule 1");
    assert_eq!(
        definition.condition,
        "(sale.Amount > 1000) && (customer.IsNew === true)"
    );
    assert_eq!(definition.actions.len(), 1);
    assert_eq!(definition.actions[0].name, "Action 1");
    assert_eq!(
        definition.actions[0].on_success,
        "sale.Amount * context.CommissionRate"
    );

    let (graph, group_id) = create_rule_graph("or");
    assert_eq!(
        graph.assemble(&group_id).unwrap().condition,
        "(sale.Amount > 1000) || (customer.IsNew === true)"
    );
}

#[test]
fn test_assemble_folds_mixed_connectives_left_to_right() {
    let mut graph = RuleGraph::new();
    let group = graph.create_node(NodeType::RuleGroup, None).unwrap();
    condition(&mut graph, "a");
    operator(&mut graph, "OR");
    condition(&mut graph, "b");
    operator(&mut graph, "AND");
    condition(&mut graph, "c");
    condition(&mut graph, "d");

    assert_eq!(
        graph.assemble(&group.id).unwrap().condition,
        "((a) || (b)) && (c) && (d)"
    );
}

#[test]
fn test_assemble_single_condition_and_empty_group() {
    let mut graph = RuleGraph::new();
    let group = graph.create_node(NodeType::RuleGroup, None).unwrap();
    assert_eq!(graph.assemble(&group.id).unwrap().condition, "true");

    condition(&mut graph, "  sale.Amount > 5  ");
    assert_eq!(graph.assemble(&group.id).unwrap().condition, "sale.Amount > 5");
}

#[test]
fn test_assemble_nested_rule_group() {
    let mut graph = RuleGraph::new();
    let outer = graph.create_node(NodeType::RuleGroup, None).unwrap();
    graph.create_node(NodeType::RuleGroup, None).unwrap();
    condition(&mut graph, "sale.Amount > 1000");
    operator(&mut graph, "OR");
    condition(&mut graph, "customer.IsNew === true");
    graph.select_group(&outer.id).unwrap();
    condition(&mut graph, "sale.Region == 'north'");

    let definition = graph.assemble(&outer.id).unwrap();
    let result = Evaluator::new().evaluate(&definition.condition, &create_sales_context());
    assert!(result.is_true(), "{}", definition.condition);
    assert!(definition.condition.contains("||"));
    assert!(definition.condition.ends_with("&& (sale.Region == 'north')"));
}

#[test]
fn test_assemble_errors() {
    let mut graph = RuleGraph::new();
    let group = graph.create_node(NodeType::RuleGroup, None).unwrap();
    let op = operator(&mut graph, "AND");
    assert_eq!(
        graph.assemble(&group.id),
        Err(AssemblyError::DanglingOperator(op))
    );

    let mut graph = RuleGraph::new();
    let group = graph.create_node(NodeType::RuleGroup, None).unwrap();
    condition(&mut graph, "true");
    let op = operator(&mut graph, "AND");
    assert_eq!(
        graph.assemble(&group.id),
        Err(AssemblyError::DanglingOperator(op))
    );

    let mut graph = RuleGraph::new();
    let group = graph.create_node(NodeType::RuleGroup, None).unwrap();
    condition(&mut graph, "true");
    operator(&mut graph, "XOR");
    condition(&mut graph, "false");
    assert!(matches!(
        graph.assemble(&group.id),
        Err(AssemblyError::UnknownOperator { ref value, .. }) if value == "XOR"
    ));

    let mut graph = RuleGraph::new();
    let group = graph.create_node(NodeType::RuleGroup, None).unwrap();
    let empty = graph.create_node(NodeType::Condition, None).unwrap();
    assert_eq!(
        graph.assemble(&group.id),
        Err(AssemblyError::EmptyCondition(empty.id))
    );

    let action = graph.create_node(NodeType::ActionGroup, None).unwrap();
    assert_eq!(
        graph.assemble(&action.id),
        Err(AssemblyError::NotARuleGroup(action.id.clone()))
    );
    assert_eq!(
        graph.assemble("ruleGroup-42"),
        Err(AssemblyError::NotFound("ruleGroup-42".to_string()))
    );
}

#[test]
fn test_rule_name_comes_from_name_node() {
    let (mut graph, group_id) = create_rule_graph("AND");
    graph
        .update_node_data("ruleName-1", json!({ "label": "Big new deals" }))
        .unwrap();
    graph
        .update_node_data("actionName-1", json!({ "label": "Commission" }))
        .unwrap();

    let definition = graph.assemble(&group_id).unwrap();
    assert_eq!(definition.name, "Big new deals");
    assert_eq!(definition.actions[0].name, "Commission");
}

#[test]
fn test_assembled_rule_runs() {
    let context = create_sales_context();
    let evaluator = Evaluator::new();
    let compiler = Compiler::default();

    let (graph, group_id) = create_rule_graph("AND");
    let rule = compiler
        .compile_rule(&graph.assemble(&group_id).unwrap())
        .unwrap();
    let outcome = evaluator.run_rule(&rule, &context);
    assert!(outcome.matched);
    assert_eq!(outcome.actions.len(), 1);
    assert_eq!(outcome.actions[0].branch, Branch::OnSuccess);
    let paid = outcome.actions[0]
        .result
        .result
        .as_ref()
        .and_then(Value::as_f64)
        .unwrap();
    assert!((paid - 60.0).abs() < 1e-9);

    let (mut graph, group_id) = create_rule_graph("AND");
    let first = graph
        .children(&group_id)
        .unwrap()
        .into_iter()
        .find(|node| node.node_type == NodeType::Condition)
        .map(|node| node.id.clone())
        .unwrap();
    graph
        .update_node_data(&first, json!({ "expression": "sale.Amount > 5000" }))
        .unwrap();
    let rule = compiler
        .compile_rule(&graph.assemble(&group_id).unwrap())
        .unwrap();
    let outcome = evaluator.run_rule(&rule, &context);
    assert!(!outcome.matched);
    assert_eq!(outcome.actions[0].branch, Branch::OnFailure);
    assert_eq!(outcome.actions[0].result.result, Some(Value::Number(0.0)));
}
