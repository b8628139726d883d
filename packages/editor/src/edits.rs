//! Infallible edit functions.
//!
//! Each call builds the matching [`Mutation`] and applies it. A rejected
//! edit is logged and the input tree is returned unchanged, so callers can
//! always replace their current tree with the result.

use crate::mutations::{ConditionPatch, EditContext, GroupPatch, Mutation};
use rulecraft_model::{Combinator, Condition, FieldCatalog, Group, IdGenerator, RuleTree};

fn apply_or_keep(tree: &RuleTree, mutation: Mutation, ctx: &mut EditContext) -> RuleTree {
    match mutation.apply(tree, ctx) {
        Ok(next) => next,
        Err(err) => {
            tracing::warn!(edit = mutation.label(), error = %err, "Edit rejected; tree unchanged");
            tree.clone()
        }
    }
}

/// Apply an edit that needs neither the catalog nor new ids
fn apply_plain(tree: &RuleTree, mutation: Mutation) -> RuleTree {
    let catalog = FieldCatalog::default();
    let mut ids = IdGenerator::default();
    let mut ctx = EditContext::new(&catalog, &mut ids);
    apply_or_keep(tree, mutation, &mut ctx)
}

pub fn add_condition(
    tree: &RuleTree,
    group_id: &str,
    condition: Option<Condition>,
    ctx: &mut EditContext,
) -> RuleTree {
    let mutation = Mutation::AddCondition {
        group_id: group_id.to_string(),
        condition,
    };
    apply_or_keep(tree, mutation, ctx)
}

/// No-op when the new group would sit deeper than `ctx.max_depth`
pub fn add_group(tree: &RuleTree, group_id: &str, group: Option<Group>, ctx: &mut EditContext) -> RuleTree {
    let mutation = Mutation::AddGroup {
        group_id: group_id.to_string(),
        group,
    };
    apply_or_keep(tree, mutation, ctx)
}

pub fn update_condition(tree: &RuleTree, node_id: &str, patch: ConditionPatch) -> RuleTree {
    apply_plain(
        tree,
        Mutation::UpdateCondition {
            node_id: node_id.to_string(),
            patch,
        },
    )
}

pub fn update_group(tree: &RuleTree, node_id: &str, patch: GroupPatch) -> RuleTree {
    apply_plain(
        tree,
        Mutation::UpdateGroup {
            node_id: node_id.to_string(),
            patch,
        },
    )
}

pub fn delete_node(tree: &RuleTree, node_id: &str) -> RuleTree {
    apply_plain(
        tree,
        Mutation::DeleteNode {
            node_id: node_id.to_string(),
        },
    )
}

pub fn clone_node(tree: &RuleTree, node_id: &str, insert_after: bool, ctx: &mut EditContext) -> RuleTree {
    let mutation = Mutation::CloneNode {
        node_id: node_id.to_string(),
        insert_after,
    };
    apply_or_keep(tree, mutation, ctx)
}

pub fn move_node(tree: &RuleTree, node_id: &str, target_group_id: &str, index: usize) -> RuleTree {
    apply_plain(
        tree,
        Mutation::MoveNode {
            node_id: node_id.to_string(),
            target_group_id: target_group_id.to_string(),
            index,
        },
    )
}

pub fn set_default_combinator(tree: &RuleTree, group_id: &str, combinator: Combinator) -> RuleTree {
    apply_plain(
        tree,
        Mutation::SetDefaultCombinator {
            group_id: group_id.to_string(),
            combinator,
        },
    )
}

pub fn set_edge_combinator(tree: &RuleTree, node_id: &str, combinator: Option<Combinator>) -> RuleTree {
    apply_plain(
        tree,
        Mutation::SetEdgeCombinator {
            node_id: node_id.to_string(),
            combinator,
        },
    )
}

pub fn toggle_negate(tree: &RuleTree, group_id: &str) -> RuleTree {
    apply_plain(
        tree,
        Mutation::ToggleNegate {
            group_id: group_id.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulecraft_model::{FieldDef, FieldType, Operator};

    fn tree() -> RuleTree {
        RuleTree::new(Group::new("root", Combinator::And).with_children([
            Condition::new("c1", "age", Operator::Equals, 1).into(),
        ]))
    }

    #[test]
    fn test_rejected_edits_return_input() {
        let tree = tree();
        assert!(delete_node(&tree, "root").ptr_eq(&tree));
        assert!(delete_node(&tree, "missing").ptr_eq(&tree));
        assert!(move_node(&tree, "root", "root", 0).ptr_eq(&tree));
        assert!(toggle_negate(&tree, "c1").ptr_eq(&tree));
    }

    #[test]
    fn test_add_group_beyond_depth_is_noop() {
        let catalog = FieldCatalog::new(vec![FieldDef::new("age", "Age", FieldType::Number)]);
        let mut ids = IdGenerator::for_tree("test", &tree());
        let mut ctx = EditContext::new(&catalog, &mut ids).with_max_depth(Some(0));
        let tree = tree();
        assert!(add_group(&tree, "root", None, &mut ctx).ptr_eq(&tree));
    }
}
