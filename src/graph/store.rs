use super::node::{Extent, Node, NodeCounter, NodeType, Position};
use crate::config::LayoutConfig;
use crate::error::{GraphError, StructuralError};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// A mutation of the rule graph. Commands are applied one at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum GraphCommand {
    #[serde(rename_all = "camelCase")]
    Create {
        node_type: NodeType,
        #[serde(default)]
        parent_id: Option<String>,
    },
    Update {
        id: String,
        patch: serde_json::Value,
    },
    Delete {
        id: String,
    },
    DeleteSubtree {
        id: String,
    },
    Select {
        id: String,
    },
    ClearSelection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Created(Node),
    Updated(String),
    Deleted(DeleteOutcome),
    Selected(Option<String>),
}

/// Ids touched by a delete. `orphaned` nodes keep their dangling `parent_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub removed: Vec<String>,
    pub orphaned: Vec<String>,
}

/// An arena of rule graph nodes with a derived children index.
///
/// Nodes are kept in creation order. `children` maps a parent id to the ids
/// that reference it, whether or not that parent still exists.
#[derive(Debug, Clone, Default)]
pub struct RuleGraph {
    slots: Vec<Option<Node>>,
    index: AHashMap<String, usize>,
    children: AHashMap<String, Vec<String>>,
    selection: Option<String>,
    counter: NodeCounter,
    layout: LayoutConfig,
    last_token: i64,
}

impl RuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Applies a single command. This is the one entry point for mutations.
    pub fn dispatch(&mut self, command: GraphCommand) -> Result<CommandOutcome, GraphError> {
        debug!(?command, "dispatching graph command");
        match command {
            GraphCommand::Create {
                node_type,
                parent_id,
            } => self
                .apply_create(node_type, parent_id.as_deref())
                .map(CommandOutcome::Created),
            GraphCommand::Update { id, patch } => self
                .apply_update(&id, patch)
                .map(|()| CommandOutcome::Updated(id)),
            GraphCommand::Delete { id } => self.apply_delete(&id).map(CommandOutcome::Deleted),
            GraphCommand::DeleteSubtree { id } => {
                self.apply_delete_subtree(&id).map(CommandOutcome::Deleted)
            }
            GraphCommand::Select { id } => self
                .apply_select(&id)
                .map(|()| CommandOutcome::Selected(Some(id))),
            GraphCommand::ClearSelection => {
                self.selection = None;
                Ok(CommandOutcome::Selected(None))
            }
        }
    }

    /// Creates a node. Conditions and operators go into `parent_id` or the
    /// selected group; groups nest under the selection when there is one
    /// and become the new selection.
    pub fn create_node(
        &mut self,
        node_type: NodeType,
        parent_id: Option<&str>,
    ) -> Result<Node, GraphError> {
        let command = GraphCommand::Create {
            node_type,
            parent_id: parent_id.map(str::to_string),
        };
        match self.dispatch(command)? {
            CommandOutcome::Created(node) => Ok(node),
            other => Err(mismatch("Created", other)),
        }
    }

    /// Shallow-merges an object patch into a node's data. A non-object
    /// patch replaces the payload outright.
    pub fn update_node_data(&mut self, id: &str, patch: serde_json::Value) -> Result<(), GraphError> {
        let command = GraphCommand::Update {
            id: id.to_string(),
            patch,
        };
        match self.dispatch(command)? {
            CommandOutcome::Updated(_) => Ok(()),
            other => Err(mismatch("Updated", other)),
        }
    }

    /// Removes a node. Deleting a group also removes its name child and
    /// leaves every other child orphaned.
    pub fn delete_node(&mut self, id: &str) -> Result<DeleteOutcome, GraphError> {
        match self.dispatch(GraphCommand::Delete { id: id.to_string() })? {
            CommandOutcome::Deleted(outcome) => Ok(outcome),
            other => Err(mismatch("Deleted", other)),
        }
    }

    /// Removes a node together with all of its descendants.
    pub fn delete_subtree(&mut self, id: &str) -> Result<DeleteOutcome, GraphError> {
        match self.dispatch(GraphCommand::DeleteSubtree { id: id.to_string() })? {
            CommandOutcome::Deleted(outcome) => Ok(outcome),
            other => Err(mismatch("Deleted", other)),
        }
    }

    pub fn select_group(&mut self, id: &str) -> Result<(), GraphError> {
        match self.dispatch(GraphCommand::Select { id: id.to_string() })? {
            CommandOutcome::Selected(_) => Ok(()),
            other => Err(mismatch("Selected", other)),
        }
    }

    pub fn clear_selection(&mut self) {
        // Clearing cannot fail.
        let _ = self.dispatch(GraphCommand::ClearSelection);
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index
            .get(id)
            .and_then(|&slot| self.slots[slot].as_ref())
    }

    /// All live nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn counter(&self) -> &NodeCounter {
        &self.counter
    }

    /// Direct children of a node in insertion order.
    pub fn children(&self, id: &str) -> Result<Vec<&Node>, GraphError> {
        if !self.index.contains_key(id) {
            return Err(GraphError::NotFound(id.to_string()));
        }
        Ok(self.child_ids(id).iter().filter_map(|c| self.node(c)).collect())
    }

    /// Nodes whose parent no longer exists.
    pub fn orphans(&self) -> Vec<&Node> {
        self.nodes()
            .filter(|node| {
                node.parent_id
                    .as_deref()
                    .is_some_and(|parent| !self.index.contains_key(parent))
            })
            .collect()
    }

    /// Top-level groups of the given type, in creation order.
    pub fn root_groups(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes()
            .filter(move |node| node.node_type == node_type && node.parent_id.is_none())
    }

    fn child_ids(&self, id: &str) -> &[String] {
        self.children.get(id).map_or(&[], Vec::as_slice)
    }

    fn group(&self, id: &str) -> Result<&Node, GraphError> {
        let node = self
            .node(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;
        if !node.node_type.is_group() {
            return Err(StructuralError::NotAGroup(id.to_string()).into());
        }
        Ok(node)
    }

    fn apply_create(
        &mut self,
        node_type: NodeType,
        parent_id: Option<&str>,
    ) -> Result<Node, GraphError> {
        if node_type.is_name() {
            return Err(StructuralError::ManagedNode(node_type.to_string()).into());
        }
        // The start node is always a root, even while a group is selected.
        let requested = match node_type {
            NodeType::Initial => None,
            _ => parent_id.or(self.selection.as_deref()),
        };
        let parent = match requested {
            Some(id) => Some(self.group(id)?.id.clone()),
            None if node_type.requires_group() => {
                return Err(StructuralError::NoGroupSelected.into());
            }
            None => None,
        };

        let layout = self.layout;
        let index = self.counter.get(node_type);
        let id = if node_type.requires_group() {
            self.next_token_id(node_type)
        } else {
            format!("{}-{}", node_type, index + 1)
        };
        let position = match (&parent, node_type) {
            (Some(_), NodeType::ConditionalOperator) => {
                Position::new(layout.nested_x, layout.operator_y)
            }
            (Some(_), _) => Position::new(layout.nested_x, layout.nested_y),
            (None, _) => {
                let offset = index as f64;
                Position::new(
                    layout.base_x + offset * layout.dx,
                    layout.base_y + offset * layout.dy,
                )
            }
        };

        let node = Node {
            id: id.clone(),
            node_type,
            position,
            extent: parent.as_ref().map(|_| Extent::Parent),
            parent_id: parent,
            data: node_type.default_data(index + 1),
        };
        self.counter.increment(node_type);
        self.insert(node.clone());

        if let Some(name_type) = node_type.name_type() {
            let name_index = self.counter.increment(name_type);
            self.insert(Node {
                id: format!("{}-{}", name_type, name_index),
                node_type: name_type,
                position: Position::new(layout.name_x, layout.name_y),
                parent_id: Some(id.clone()),
                extent: Some(Extent::Parent),
                data: name_type.default_data(index + 1),
            });
            self.selection = Some(id.clone());
        }

        info!(id = %id, node_type = %node_type, parent = ?node.parent_id, "created node");
        Ok(node)
    }

    fn apply_update(&mut self, id: &str, patch: serde_json::Value) -> Result<(), GraphError> {
        let slot = *self
            .index
            .get(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;
        let node = self.slots[slot]
            .as_mut()
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;
        match (&mut node.data, patch) {
            (serde_json::Value::Object(data), serde_json::Value::Object(patch)) => {
                data.extend(patch);
            }
            (data, patch) => *data = patch,
        }
        debug!(id, "updated node data");
        Ok(())
    }

    fn apply_delete(&mut self, id: &str) -> Result<DeleteOutcome, GraphError> {
        let node_type = self
            .node(id)
            .map(|node| node.node_type)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;
        if node_type.is_name() {
            return Err(StructuralError::ManagedNode(node_type.to_string()).into());
        }

        let mut outcome = DeleteOutcome::default();
        if let Some(name_type) = node_type.name_type() {
            let (names, orphans): (Vec<String>, Vec<String>) =
                self.child_ids(id).iter().cloned().partition(|child| {
                    self.node(child)
                        .is_some_and(|node| node.node_type == name_type)
                });
            for name in names {
                self.remove(&name);
                outcome.removed.push(name);
            }
            outcome.orphaned = orphans;
        }
        self.remove(id);
        outcome.removed.push(id.to_string());

        if !outcome.orphaned.is_empty() {
            warn!(group = id, orphaned = ?outcome.orphaned, "deleted group left orphaned children");
        }
        info!(id, removed = outcome.removed.len(), "deleted node");
        Ok(outcome)
    }

    fn apply_delete_subtree(&mut self, id: &str) -> Result<DeleteOutcome, GraphError> {
        if !self.index.contains_key(id) {
            return Err(GraphError::NotFound(id.to_string()));
        }
        let mut pending = vec![id.to_string()];
        let mut removed = Vec::new();
        while let Some(current) = pending.pop() {
            pending.extend(self.child_ids(&current).iter().cloned());
            removed.push(current);
        }
        // Children first, so the removal order mirrors a post-order walk.
        removed.reverse();
        for node_id in &removed {
            self.remove(node_id);
        }
        info!(id, removed = removed.len(), "deleted subtree");
        Ok(DeleteOutcome {
            removed,
            orphaned: Vec::new(),
        })
    }

    fn apply_select(&mut self, id: &str) -> Result<(), GraphError> {
        self.group(id)?;
        self.selection = Some(id.to_string());
        Ok(())
    }

    /// Allocates `${type}-${timestamp}`, kept strictly increasing and unique.
    fn next_token_id(&mut self, node_type: NodeType) -> String {
        let mut token = chrono::Utc::now().timestamp_millis().max(self.last_token + 1);
        while self.index.contains_key(&format!("{}-{}", node_type, token)) {
            token += 1;
        }
        self.last_token = token;
        format!("{}-{}", node_type, token)
    }

    pub(super) fn insert(&mut self, node: Node) {
        if let Some(parent) = &node.parent_id {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(node.id.clone());
        }
        self.index.insert(node.id.clone(), self.slots.len());
        self.slots.push(Some(node));
    }

    /// Drops a node from the arena. Children entries are pruned once they are
    /// empty and their parent is gone; orphans keep theirs.
    fn remove(&mut self, id: &str) -> Option<Node> {
        let slot = self.index.remove(id)?;
        let node = self.slots[slot].take()?;
        if let Some(parent) = node.parent_id.as_deref() {
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.retain(|sibling| sibling != id);
                if siblings.is_empty() && !self.index.contains_key(parent) {
                    self.children.remove(parent);
                }
            }
        }
        if self.children.get(id).is_some_and(Vec::is_empty) {
            self.children.remove(id);
        }
        if self.selection.as_deref() == Some(id) {
            self.selection = None;
        }
        Some(node)
    }

    pub(super) fn restore_counters(&mut self, counter: NodeCounter) {
        self.counter = counter;
        for node in self.slots.iter().flatten() {
            let suffix = node
                .id
                .rsplit_once('-')
                .and_then(|(_, suffix)| suffix.parse::<i64>().ok());
            let Some(suffix) = suffix else { continue };
            if node.node_type.requires_group() {
                self.last_token = self.last_token.max(suffix);
            } else {
                self.counter
                    .raise_to(node.node_type, u64::try_from(suffix).unwrap_or(0));
            }
        }
    }
}

fn mismatch(expected: &str, outcome: CommandOutcome) -> GraphError {
    GraphError::UnexpectedOutcome {
        expected: expected.to_string(),
        found: format!("{:?}", outcome),
    }
}
