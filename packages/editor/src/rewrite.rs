//! Path-copying rewrite of a rule tree.
//!
//! Every edit descends to one group, replaces it, and rebuilds only the
//! groups on the way back up. Siblings off that path keep their `Arc`s, so
//! the old and new tree share every untouched subtree.

use crate::mutations::{MutationError, EditResult};
use rulecraft_model::{Group, IdGenerator, NodeId, NodeRef, RuleTree, TreeNode};
use std::collections::HashSet;
use std::sync::Arc;

/// Replace the group with id `target` by the result of `edit`
pub(crate) fn edit_group<F>(tree: &RuleTree, target: &str, edit: F) -> EditResult<RuleTree>
where
    F: FnOnce(&Group) -> EditResult<Group>,
{
    if tree.find_group(target).is_none() {
        return Err(if tree.contains_id(target) {
            MutationError::NotAGroup(target.to_string())
        } else {
            MutationError::GroupNotFound(target.to_string())
        });
    }

    let mut edit = Some(edit);
    match rewrite(tree.root(), target, &mut edit)? {
        Some(root) => Ok(RuleTree::new(root)),
        None => Err(MutationError::GroupNotFound(target.to_string())),
    }
}

/// Edit the child list that holds `node_id`; `edit` receives that list and the node's index
pub(crate) fn edit_siblings<F>(tree: &RuleTree, node_id: &str, edit: F) -> EditResult<RuleTree>
where
    F: FnOnce(&mut Vec<NodeRef>, usize) -> EditResult<()>,
{
    if tree.root_id() == node_id {
        return Err(MutationError::CannotEditRoot);
    }
    let parent_id = tree
        .parent_of(node_id)
        .map(|parent| parent.id.clone())
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;

    edit_group(tree, &parent_id, |parent| {
        let index = parent
            .position_of(node_id)
            .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
        let mut next = parent.clone();
        edit(&mut next.children, index)?;
        Ok(next)
    })
}

fn rewrite<F>(group: &Group, target: &str, edit: &mut Option<F>) -> EditResult<Option<Group>>
where
    F: FnOnce(&Group) -> EditResult<Group>,
{
    if group.id == target {
        return match edit.take() {
            Some(edit) => edit(group).map(Some),
            None => Ok(None),
        };
    }

    for (index, child) in group.children.iter().enumerate() {
        let TreeNode::Group(inner) = child.as_ref() else {
            continue;
        };
        if let Some(rewritten) = rewrite(inner, target, edit)? {
            // Cloning a group copies its child pointers, not the subtrees
            let mut next = group.clone();
            next.children[index] = Arc::new(TreeNode::Group(rewritten));
            return Ok(Some(next));
        }
    }

    Ok(None)
}

/// Every id currently used by `tree`
pub(crate) fn taken_ids(tree: &RuleTree) -> HashSet<NodeId> {
    tree.all_ids().into_iter().map(str::to_string).collect()
}

/// Next generated id not already in `taken`; the id is recorded as taken
pub(crate) fn fresh_id(ids: &mut IdGenerator, taken: &mut HashSet<NodeId>) -> NodeId {
    loop {
        let id = ids.new_id();
        if taken.insert(id.clone()) {
            return id;
        }
    }
}

/// Deep copy of `node` where every node gets a new id
pub(crate) fn clone_with_fresh_ids(
    node: &TreeNode,
    ids: &mut IdGenerator,
    taken: &mut HashSet<NodeId>,
) -> TreeNode {
    match node {
        TreeNode::Condition(condition) => {
            let mut copy = condition.clone();
            copy.id = fresh_id(ids, taken);
            TreeNode::Condition(copy)
        }
        TreeNode::Group(group) => {
            let id = fresh_id(ids, taken);
            let children = group
                .children
                .iter()
                .map(|child| Arc::new(clone_with_fresh_ids(child, ids, taken)))
                .collect();
            TreeNode::Group(Group {
                id,
                children,
                ..group.clone()
            })
        }
    }
}

/// Keep supplied ids that are unused; replace blank or colliding ones
pub(crate) fn ensure_unique_ids(
    node: TreeNode,
    ids: &mut IdGenerator,
    taken: &mut HashSet<NodeId>,
) -> TreeNode {
    match node {
        TreeNode::Condition(mut condition) => {
            condition.id = claim(condition.id, ids, taken);
            TreeNode::Condition(condition)
        }
        TreeNode::Group(mut group) => {
            group.id = claim(group.id, ids, taken);
            group.children = group
                .children
                .into_iter()
                .map(|child| {
                    let child = Arc::unwrap_or_clone(child);
                    Arc::new(ensure_unique_ids(child, ids, taken))
                })
                .collect();
            TreeNode::Group(group)
        }
    }
}

fn claim(id: NodeId, ids: &mut IdGenerator, taken: &mut HashSet<NodeId>) -> NodeId {
    if !id.is_empty() && taken.insert(id.clone()) {
        id
    } else {
        fresh_id(ids, taken)
    }
}

/// Levels of nested groups below `group` (0 when it holds only conditions)
pub(crate) fn group_height(group: &Group) -> usize {
    group
        .children
        .iter()
        .filter_map(|child| child.as_group())
        .map(|inner| 1 + group_height(inner))
        .max()
        .unwrap_or(0)
}
