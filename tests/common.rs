//! Common test utilities for building execution contexts and rule graphs.
use kisoku::prelude::*;
use serde_json::json;

/// A context with one sale, one user and a small sales history.
///
/// `userSales` holds the three sales created by user 7; `allSales` adds two more.
#[allow(dead_code)]
pub fn create_sales_context() -> ExecutionContext {
    ExecutionContext::from(json!({
        "sale": {
            "Id": 100, "Amount": 1200, "SaleAmount": 1200, "Quantity": 3,
            "ProductId": 2, "CategoryId": 1, "CustomerId": 9, "CreatedBy": 7,
            "CreatedDate": "2024-11-02", "Region": "north", "Status": "closed",
            "Discount": 0.05, "Margin": 0.4
        },
        "user": { "Id": 7, "Name": "Aiko", "Role": "manager", "HireDate": "2020-03-01", "Target": 3000 },
        "context": {
            "Target": 2500, "Quarter": 4, "Year": 2024, "CommissionRate": 0.05,
            "BonusPool": 10000, "Today": "2024-11-15"
        },
        "customer": { "Id": 9, "IsNew": true, "Region": "north" },
        "allSales": [
            { "Id": 1, "SaleAmount": 500, "CreatedBy": 7, "Region": "north", "CategoryId": 1, "Status": "closed", "CreatedDate": "2024-10-01" },
            { "Id": 2, "SaleAmount": 1500, "CreatedBy": 8, "Region": "north", "CategoryId": 2, "Status": "closed", "CreatedDate": "2024-10-03" },
            { "Id": 3, "SaleAmount": 1200, "CreatedBy": 7, "Region": "north", "CategoryId": 2, "Status": "closed", "CreatedDate": "2024-11-02" },
            { "Id": 4, "SaleAmount": 300, "CreatedBy": 9, "Region": "south", "CategoryId": 3, "Status": "open", "CreatedDate": "2024-07-19" },
            { "Id": 5, "SaleAmount": 900, "CreatedBy": 7, "Region": "north", "CategoryId": 3, "Status": "closed", "CreatedDate": "2024-11-09" }
        ],
        "userSales": [
            { "Id": 1, "SaleAmount": 500, "CreatedBy": 7, "Region": "north", "CategoryId": 1, "Status": "closed", "CreatedDate": "2024-10-01" },
            { "Id": 3, "SaleAmount": 1200, "CreatedBy": 7, "Region": "north", "CategoryId": 2, "Status": "closed", "CreatedDate": "2024-11-02" },
            { "Id": 5, "SaleAmount": 900, "CreatedBy": 7, "Region": "north", "CategoryId": 3, "Status": "closed", "CreatedDate": "2024-11-09" }
        ],
        "teamMembers": [
            { "Id": 7, "Name": "Aiko", "Target": 2000, "Achieved": 2600 },
            { "Id": 8, "Name": "Ben", "Target": 1500, "Achieved": 1500 }
        ],
        "products": [
            { "Id": 1, "Name": "Basic", "Price": 100, "IsPromoted": false },
            { "Id": 2, "Name": "Pro", "Price": 400, "IsPromoted": true }
        ]
    }))
}

/// Evaluates `expression` against `context` and returns the value, panicking
/// with the reported error if evaluation failed.
#[allow(dead_code)]
pub fn eval_ok(expression: &str, context: &ExecutionContext) -> Value {
    let result = Evaluator::new().evaluate(expression, context);
    assert!(
        result.success,
        "'{}' failed: {:?}",
        expression, result.error
    );
    result.result.unwrap_or_default()
}

/// Builds a rule group holding two conditions joined by an explicit operator,
/// plus one nested action group. Returns the graph and the rule group id.
#[allow(dead_code)]
pub fn create_rule_graph(operator: &str) -> (RuleGraph, String) {
    let mut graph = RuleGraph::new();
    let group = graph.create_node(NodeType::RuleGroup, None).unwrap();

    let first = graph.create_node(NodeType::Condition, None).unwrap();
    graph
        .update_node_data(&first.id, json!({ "expression": "sale.Amount > 1000" }))
        .unwrap();
    let op = graph
        .create_node(NodeType::ConditionalOperator, None)
        .unwrap();
    graph
        .update_node_data(&op.id, json!({ "operator": operator }))
        .unwrap();
    let second = graph.create_node(NodeType::Condition, None).unwrap();
    graph
        .update_node_data(&second.id, json!({ "expression": "customer.IsNew === true" }))
        .unwrap();

    let action = graph.create_node(NodeType::ActionGroup, None).unwrap();
    graph
        .update_node_data(
            &action.id,
            json!({
                "onSuccess": "sale.Amount * context.CommissionRate",
                "onFailure": "0"
            }),
        )
        .unwrap();
    graph.select_group(&group.id).unwrap();

    (graph, group.id)
}
