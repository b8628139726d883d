//! # Tree Mutations
//!
//! Structural edit operations on a rule tree.
//!
//! ## Design Principles
//!
//! 1. **Pure**: an old tree and an intent in, a new tree out
//! 2. **Addressed by id**: every intent names the node or group it targets
//! 3. **Validated**: structural constraints are checked before anything is rebuilt
//! 4. **Shared**: untouched subtrees are carried over by pointer
//!
//! ## Mutation Semantics
//!
//! ### Move
//! - Detach, then reinsert at the target index clamped to the child count
//! - Fails if the target is the node itself or one of its descendants
//! - Fails for the root and for condition targets
//!
//! ### Clone
//! - Deep copy with a fresh id on every node
//! - Inserted right after the original, or right before it
//!
//! ### Delete
//! - Removes the node and all descendants
//! - The root cannot be deleted

use crate::rewrite::{
    clone_with_fresh_ids, edit_group, edit_siblings, ensure_unique_ids, fresh_id, group_height,
    taken_ids,
};
use rulecraft_model::{
    Combinator, Condition, FieldCatalog, Group, IdGenerator, NodeId, Operator, RuleTree,
    RuleValue, TreeNode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Semantic edit intents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    /// Append a condition to a group; synthesized from the catalog when absent
    AddCondition {
        group_id: NodeId,
        #[serde(default)]
        condition: Option<Condition>,
    },

    /// Append a group; an empty AND group when absent
    AddGroup {
        group_id: NodeId,
        #[serde(default)]
        group: Option<Group>,
    },

    UpdateCondition {
        node_id: NodeId,
        patch: ConditionPatch,
    },

    UpdateGroup {
        node_id: NodeId,
        patch: GroupPatch,
    },

    DeleteNode {
        node_id: NodeId,
    },

    CloneNode {
        node_id: NodeId,
        #[serde(default = "default_insert_after")]
        insert_after: bool,
    },

    MoveNode {
        node_id: NodeId,
        target_group_id: NodeId,
        index: usize,
    },

    SetDefaultCombinator {
        group_id: NodeId,
        combinator: Combinator,
    },

    /// Set or clear the connector after a node
    SetEdgeCombinator {
        node_id: NodeId,
        #[serde(default)]
        combinator: Option<Combinator>,
    },

    ToggleNegate {
        group_id: NodeId,
    },
}

fn default_insert_after() -> bool {
    true
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Node is not a group: {0}")]
    NotAGroup(String),

    #[error("Node is not a condition: {0}")]
    NotACondition(String),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("The root group cannot be moved, cloned or deleted")]
    CannotEditRoot,

    #[error("Group nesting would exceed the maximum depth of {max}")]
    DepthLimitExceeded { max: usize },

    #[error("Field catalog is empty")]
    EmptyCatalog,
}

pub type EditResult<T> = Result<T, MutationError>;

/// Partial update for a condition; `id` is accepted but never applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<RuleValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_combinator: Option<Combinator>,
}

impl ConditionPatch {
    pub fn field(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    pub fn operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn value(mut self, value: impl Into<RuleValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    fn apply_to(&self, condition: &Condition) -> Condition {
        Condition {
            id: condition.id.clone(),
            field_name: self
                .field_name
                .clone()
                .unwrap_or_else(|| condition.field_name.clone()),
            operator: self.operator.unwrap_or(condition.operator),
            value: self.value.clone().unwrap_or_else(|| condition.value.clone()),
            edge_combinator: self.edge_combinator.or(condition.edge_combinator),
        }
    }
}

/// Partial update for a group; children are never replaced and `id` is ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_combinator: Option<Combinator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_combinator: Option<Combinator>,
}

impl GroupPatch {
    fn apply_to(&self, group: &Group) -> Group {
        let mut next = group.clone();
        if let Some(combinator) = self.default_combinator {
            next.default_combinator = combinator;
        }
        if let Some(negate) = self.negate {
            next.negate = negate;
        }
        if self.edge_combinator.is_some() {
            next.edge_combinator = self.edge_combinator;
        }
        next
    }
}

/// Collaborators an edit may need beyond the tree itself
pub struct EditContext<'a> {
    pub catalog: &'a FieldCatalog,
    pub ids: &'a mut IdGenerator,
    /// Deepest allowed group depth (root = 0); `None` means unbounded
    pub max_depth: Option<usize>,
}

impl<'a> EditContext<'a> {
    pub fn new(catalog: &'a FieldCatalog, ids: &'a mut IdGenerator) -> Self {
        Self {
            catalog,
            ids,
            max_depth: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Mutation {
    /// Apply the mutation, producing a new tree
    pub fn apply(&self, tree: &RuleTree, ctx: &mut EditContext) -> EditResult<RuleTree> {
        match self {
            Mutation::AddCondition { group_id, condition } => {
                add_condition(tree, group_id, condition.clone(), ctx)
            }
            Mutation::AddGroup { group_id, group } => add_group(tree, group_id, group.clone(), ctx),
            Mutation::UpdateCondition { node_id, patch } => update_condition(tree, node_id, patch),
            Mutation::UpdateGroup { node_id, patch } => update_group(tree, node_id, patch),
            Mutation::DeleteNode { node_id } => delete_node(tree, node_id),
            Mutation::CloneNode { node_id, insert_after } => {
                clone_node(tree, node_id, *insert_after, ctx)
            }
            Mutation::MoveNode {
                node_id,
                target_group_id,
                index,
            } => move_node(tree, node_id, target_group_id, *index),
            Mutation::SetDefaultCombinator { group_id, combinator } => update_group(
                tree,
                group_id,
                &GroupPatch {
                    default_combinator: Some(*combinator),
                    ..Default::default()
                },
            ),
            Mutation::SetEdgeCombinator { node_id, combinator } => {
                set_edge_combinator(tree, node_id, *combinator)
            }
            Mutation::ToggleNegate { group_id } => edit_group(tree, group_id, |group| {
                let mut next = group.clone();
                next.negate = !group.negate;
                Ok(next)
            }),
        }
    }

    /// Short human description, used for history entries
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::AddCondition { .. } => "Add condition",
            Mutation::AddGroup { .. } => "Add group",
            Mutation::UpdateCondition { .. } => "Update condition",
            Mutation::UpdateGroup { .. } => "Update group",
            Mutation::DeleteNode { .. } => "Delete",
            Mutation::CloneNode { .. } => "Duplicate",
            Mutation::MoveNode { .. } => "Move",
            Mutation::SetDefaultCombinator { .. } => "Change combinator",
            Mutation::SetEdgeCombinator { .. } => "Change connector",
            Mutation::ToggleNegate { .. } => "Toggle NOT",
        }
    }
}

fn add_condition(
    tree: &RuleTree,
    group_id: &str,
    condition: Option<Condition>,
    ctx: &mut EditContext,
) -> EditResult<RuleTree> {
    let mut taken = taken_ids(tree);
    let condition = match condition {
        Some(condition) => ensure_unique_ids(TreeNode::Condition(condition), ctx.ids, &mut taken),
        None => {
            let field = ctx.catalog.first().ok_or(MutationError::EmptyCatalog)?;
            let operator = field.operators().first().copied().unwrap_or(Operator::Equals);
            TreeNode::Condition(Condition::new(
                fresh_id(ctx.ids, &mut taken),
                field.name.clone(),
                operator,
                field.default_value(),
            ))
        }
    };

    append_child(tree, group_id, condition)
}

fn add_group(
    tree: &RuleTree,
    group_id: &str,
    group: Option<Group>,
    ctx: &mut EditContext,
) -> EditResult<RuleTree> {
    let parent_depth = match tree.find_group(group_id) {
        Some(_) => tree.depth_of(group_id).unwrap_or(0),
        None if tree.contains_id(group_id) => {
            return Err(MutationError::NotAGroup(group_id.to_string()))
        }
        None => return Err(MutationError::GroupNotFound(group_id.to_string())),
    };

    let mut taken = taken_ids(tree);
    let group = match group {
        Some(group) => ensure_unique_ids(TreeNode::Group(group), ctx.ids, &mut taken),
        None => TreeNode::Group(Group::new(fresh_id(ctx.ids, &mut taken), Combinator::And)),
    };

    if let (Some(max), Some(inserted)) = (ctx.max_depth, group.as_group()) {
        let deepest = parent_depth + 1 + group_height(inserted);
        if deepest > max {
            return Err(MutationError::DepthLimitExceeded { max });
        }
    }

    append_child(tree, group_id, group)
}

fn append_child(tree: &RuleTree, group_id: &str, child: TreeNode) -> EditResult<RuleTree> {
    edit_group(tree, group_id, |group| {
        let mut next = group.clone();
        next.children.push(Arc::new(child));
        Ok(next)
    })
}

fn update_condition(tree: &RuleTree, node_id: &str, patch: &ConditionPatch) -> EditResult<RuleTree> {
    if tree.find_condition(node_id).is_none() {
        return Err(if tree.contains_id(node_id) {
            MutationError::NotACondition(node_id.to_string())
        } else {
            MutationError::NodeNotFound(node_id.to_string())
        });
    }

    edit_siblings(tree, node_id, |children, index| {
        if let TreeNode::Condition(condition) = children[index].as_ref() {
            children[index] = Arc::new(TreeNode::Condition(patch.apply_to(condition)));
        }
        Ok(())
    })
}

fn update_group(tree: &RuleTree, group_id: &str, patch: &GroupPatch) -> EditResult<RuleTree> {
    edit_group(tree, group_id, |group| Ok(patch.apply_to(group)))
}

fn delete_node(tree: &RuleTree, node_id: &str) -> EditResult<RuleTree> {
    edit_siblings(tree, node_id, |children, index| {
        children.remove(index);
        Ok(())
    })
}

fn clone_node(
    tree: &RuleTree,
    node_id: &str,
    insert_after: bool,
    ctx: &mut EditContext,
) -> EditResult<RuleTree> {
    let mut taken = taken_ids(tree);
    edit_siblings(tree, node_id, |children, index| {
        let copy = clone_with_fresh_ids(&children[index], ctx.ids, &mut taken);
        let at = if insert_after { index + 1 } else { index };
        children.insert(at, Arc::new(copy));
        Ok(())
    })
}

fn move_node(
    tree: &RuleTree,
    node_id: &str,
    target_group_id: &str,
    index: usize,
) -> EditResult<RuleTree> {
    if tree.root_id() == node_id {
        return Err(MutationError::CannotEditRoot);
    }
    let node = tree
        .find_node(node_id)
        .cloned()
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;

    match tree.path_to(target_group_id) {
        None => return Err(MutationError::GroupNotFound(target_group_id.to_string())),
        Some(path) if path.iter().any(|id| id == node_id) => {
            return Err(MutationError::CycleDetected)
        }
        Some(_) => {}
    }
    if tree.find_group(target_group_id).is_none() {
        return Err(MutationError::NotAGroup(target_group_id.to_string()));
    }

    let detached = delete_node(tree, node_id)?;
    edit_group(&detached, target_group_id, |group| {
        let mut next = group.clone();
        let at = index.min(next.children.len());
        next.children.insert(at, node);
        Ok(next)
    })
}

fn set_edge_combinator(
    tree: &RuleTree,
    node_id: &str,
    combinator: Option<Combinator>,
) -> EditResult<RuleTree> {
    edit_siblings(tree, node_id, |children, index| {
        let mut node = children[index].as_ref().clone();
        node.set_edge_combinator(combinator);
        children[index] = Arc::new(node);
        Ok(())
    })
}
