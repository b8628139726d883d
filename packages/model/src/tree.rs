use crate::operator::Operator;
use crate::value::RuleValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Node identifier, unique across a tree
pub type NodeId = String;

/// Shared handle to a child node
///
/// Edits rebuild only the path to the edited node, so untouched
/// children keep the same allocation and compare equal by pointer.
pub type NodeRef = Arc<TreeNode>;

/// Logical connector between two siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Combinator {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf node: one field tested with one operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub id: NodeId,
    pub field_name: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: RuleValue,
    /// Connector to the next sibling; ignored on the last child
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_combinator: Option<Combinator>,
}

impl Condition {
    pub fn new(
        id: impl Into<NodeId>,
        field_name: impl Into<String>,
        operator: Operator,
        value: impl Into<RuleValue>,
    ) -> Self {
        Self {
            id: id.into(),
            field_name: field_name.into(),
            operator,
            value: value.into(),
            edge_combinator: None,
        }
    }

    pub fn with_edge(mut self, combinator: Combinator) -> Self {
        self.edge_combinator = Some(combinator);
        self
    }
}

/// Internal node: ordered children joined by connectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: NodeId,
    #[serde(default)]
    pub default_combinator: Combinator,
    #[serde(default)]
    pub children: Vec<NodeRef>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub negate: bool,
    /// Connector between this group and its next sibling in the parent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_combinator: Option<Combinator>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Group {
    pub fn new(id: impl Into<NodeId>, default_combinator: Combinator) -> Self {
        Self {
            id: id.into(),
            default_combinator,
            children: Vec::new(),
            negate: false,
            edge_combinator: None,
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = TreeNode>) -> Self {
        self.children = children.into_iter().map(Arc::new).collect();
        self
    }

    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    pub fn with_edge(mut self, combinator: Combinator) -> Self {
        self.edge_combinator = Some(combinator);
        self
    }

    /// Connector actually applied between child `index` and child `index + 1`
    ///
    /// The left child's edge override wins over the group default.
    pub fn effective_connector(&self, index: usize) -> Option<Combinator> {
        if index + 1 >= self.children.len() {
            return None;
        }
        Some(
            self.children[index]
                .edge_combinator()
                .unwrap_or(self.default_combinator),
        )
    }

    /// All connectors between consecutive children, in order
    pub fn connectors(&self) -> Vec<Combinator> {
        (0..self.children.len().saturating_sub(1))
            .filter_map(|i| self.effective_connector(i))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Index of the direct child with `id`
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.children.iter().position(|child| child.id() == id)
    }

    /// Number of conditions anywhere below this group
    pub fn condition_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child.as_ref() {
                TreeNode::Condition(_) => 1,
                TreeNode::Group(group) => group.condition_count(),
            })
            .sum()
    }
}

/// A node in the rule tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TreeNode {
    Condition(Condition),
    Group(Group),
}

impl TreeNode {
    pub fn id(&self) -> &str {
        match self {
            TreeNode::Condition(condition) => &condition.id,
            TreeNode::Group(group) => &group.id,
        }
    }

    pub fn edge_combinator(&self) -> Option<Combinator> {
        match self {
            TreeNode::Condition(condition) => condition.edge_combinator,
            TreeNode::Group(group) => group.edge_combinator,
        }
    }

    pub fn set_edge_combinator(&mut self, combinator: Option<Combinator>) {
        match self {
            TreeNode::Condition(condition) => condition.edge_combinator = combinator,
            TreeNode::Group(group) => group.edge_combinator = combinator,
        }
    }

    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            TreeNode::Condition(condition) => Some(condition),
            TreeNode::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            TreeNode::Group(group) => Some(group),
            TreeNode::Condition(_) => None,
        }
    }
}

impl From<Condition> for TreeNode {
    fn from(condition: Condition) -> Self {
        TreeNode::Condition(condition)
    }
}

impl From<Group> for TreeNode {
    fn from(group: Group) -> Self {
        TreeNode::Group(group)
    }
}

pub fn is_condition(node: &TreeNode) -> bool {
    matches!(node, TreeNode::Condition(_))
}

pub fn is_group(node: &TreeNode) -> bool {
    matches!(node, TreeNode::Group(_))
}

/// A rule tree, rooted at a group
///
/// Serializes as the root group object itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTree {
    root: Arc<Group>,
}

impl RuleTree {
    pub fn new(root: Group) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn from_arc(root: Arc<Group>) -> Self {
        Self { root }
    }

    /// Empty AND root group
    pub fn empty(id: impl Into<NodeId>) -> Self {
        Self::new(Group::new(id, Combinator::And))
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn root_arc(&self) -> &Arc<Group> {
        &self.root
    }

    pub fn root_id(&self) -> &str {
        &self.root.id
    }

    /// True when both trees share the same root allocation
    pub fn ptr_eq(&self, other: &RuleTree) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Find a non-root node by id
    pub fn find_node(&self, id: &str) -> Option<&NodeRef> {
        find_in_group(&self.root, id)
    }

    /// Find a group by id, including the root
    pub fn find_group(&self, id: &str) -> Option<&Group> {
        if self.root.id == id {
            return Some(&self.root);
        }
        self.find_node(id).and_then(|node| node.as_group())
    }

    pub fn find_condition(&self, id: &str) -> Option<&Condition> {
        self.find_node(id).and_then(|node| node.as_condition())
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.root.id == id || self.find_node(id).is_some()
    }

    /// Group directly containing the node with `id`
    pub fn parent_of(&self, id: &str) -> Option<&Group> {
        parent_in_group(&self.root, id)
    }

    /// Ids from the root down to the node with `id`, both inclusive
    pub fn path_to(&self, id: &str) -> Option<Vec<NodeId>> {
        let mut path = vec![self.root.id.clone()];
        if self.root.id == id || path_in_group(&self.root, id, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    /// Nesting depth of a node; the root is at depth 0
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        self.path_to(id).map(|path| path.len() - 1)
    }

    /// Every id in the tree, in depth-first order
    pub fn all_ids(&self) -> Vec<&str> {
        let mut ids = vec![self.root.id.as_str()];
        collect_ids(&self.root, &mut ids);
        ids
    }

    pub fn condition_count(&self) -> usize {
        self.root.condition_count()
    }

    /// True when the root has no children at all
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn find_in_group<'a>(group: &'a Group, id: &str) -> Option<&'a NodeRef> {
    for child in &group.children {
        if child.id() == id {
            return Some(child);
        }
        if let TreeNode::Group(inner) = child.as_ref() {
            if let Some(found) = find_in_group(inner, id) {
                return Some(found);
            }
        }
    }
    None
}

fn parent_in_group<'a>(group: &'a Group, id: &str) -> Option<&'a Group> {
    if group.position_of(id).is_some() {
        return Some(group);
    }
    group
        .children
        .iter()
        .filter_map(|child| child.as_group())
        .find_map(|inner| parent_in_group(inner, id))
}

fn path_in_group(group: &Group, id: &str, path: &mut Vec<NodeId>) -> bool {
    for child in &group.children {
        path.push(child.id().to_string());
        if child.id() == id {
            return true;
        }
        if let TreeNode::Group(inner) = child.as_ref() {
            if path_in_group(inner, id, path) {
                return true;
            }
        }
        path.pop();
    }
    false
}

fn collect_ids<'a>(group: &'a Group, ids: &mut Vec<&'a str>) {
    for child in &group.children {
        ids.push(child.id());
        if let TreeNode::Group(inner) = child.as_ref() {
            collect_ids(inner, ids);
        }
    }
}
