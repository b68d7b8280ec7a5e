use super::node::{Node, NodeCounter};
use super::store::RuleGraph;
use crate::error::{GraphError, StructuralError};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The exported form of a rule graph: every node plus the counter snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub counter: NodeCounter,
    /// Node ids in creation order. Sibling order, and with it the assembled
    /// rule, follows this list; ids missing from it keep their array order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<String>,
}

impl RuleGraph {
    pub fn export(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes().cloned().collect(),
            counter: self.counter().clone(),
            order: self.nodes().map(|node| node.id.clone()).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(&self.export()).map_err(|e| GraphError::Json(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let snapshot: GraphSnapshot =
            serde_json::from_str(json).map_err(|e| GraphError::Json(e.to_string()))?;
        Self::import(snapshot)
    }

    /// Rebuilds a graph from a snapshot. Node order in the snapshot does not
    /// matter; parent links are checked against the whole set.
    ///
    /// Every group must own exactly one name node of its kind. Other dangling
    /// parent references are kept, so a graph with orphans survives a round
    /// trip.
    pub fn import(snapshot: GraphSnapshot) -> Result<Self, GraphError> {
        let GraphSnapshot {
            mut nodes,
            counter,
            order,
        } = snapshot;

        let mut by_id: AHashMap<&str, &Node> = AHashMap::with_capacity(nodes.len());
        for node in &nodes {
            if by_id.insert(node.id.as_str(), node).is_some() {
                return Err(StructuralError::DuplicateId(node.id.clone()).into());
            }
        }

        let mut named_groups: AHashSet<&str> = AHashSet::new();
        for node in &nodes {
            let is_name = node.node_type.is_name();
            let Some(parent_id) = node.parent_id.as_deref() else {
                if is_name {
                    return Err(StructuralError::MisplacedNameNode(node.id.clone()).into());
                }
                continue;
            };
            let Some(parent) = by_id.get(parent_id) else {
                if is_name {
                    return Err(StructuralError::DanglingParent {
                        node_id: node.id.clone(),
                        parent_id: parent_id.to_string(),
                    }
                    .into());
                }
                warn!(node = %node.id, parent = parent_id, "imported node has a dangling parent");
                continue;
            };
            if node.node_type.requires_group() && !parent.node_type.is_group() {
                return Err(StructuralError::NotAGroup(parent_id.to_string()).into());
            }
            if is_name && parent.node_type.name_type() != Some(node.node_type) {
                return Err(StructuralError::MisplacedNameNode(node.id.clone()).into());
            }
            if is_name && !named_groups.insert(parent_id) {
                return Err(StructuralError::DuplicateNameNode {
                    group_id: parent_id.to_string(),
                    name_type: node.node_type.to_string(),
                }
                .into());
            }
            ensure_acyclic(node, &by_id)?;
        }

        if let Some((group, name_type)) = nodes.iter().find_map(|node| {
            node.node_type
                .name_type()
                .filter(|_| !named_groups.contains(node.id.as_str()))
                .map(|name_type| (node, name_type))
        }) {
            return Err(StructuralError::MissingNameNode {
                group_id: group.id.clone(),
                name_type: name_type.to_string(),
            }
            .into());
        }

        let rank: AHashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(position, id)| (id.as_str(), position))
            .collect();
        nodes.sort_by_key(|node| rank.get(node.id.as_str()).copied().unwrap_or(usize::MAX));

        let mut graph = RuleGraph::new();
        for node in nodes {
            graph.insert(node);
        }
        graph.restore_counters(counter);

        let groups = graph.nodes().filter(|n| n.node_type.is_group()).count();
        info!(nodes = graph.len(), groups, "imported rule graph");
        Ok(graph)
    }
}

fn ensure_acyclic<'n>(
    start: &'n Node,
    by_id: &AHashMap<&'n str, &'n Node>,
) -> Result<(), StructuralError> {
    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut current = start;
    seen.insert(current.id.as_str());
    while let Some(parent) = current.parent_id.as_deref().and_then(|p| by_id.get(p).copied()) {
        if !seen.insert(parent.id.as_str()) {
            return Err(StructuralError::Cycle {
                node_id: start.id.clone(),
            });
        }
        current = parent;
    }
    Ok(())
}

