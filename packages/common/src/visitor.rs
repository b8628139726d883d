use rulecraft_model::{Condition, Group, RuleTree, TreeNode};

/// Visitor pattern for traversing rule trees immutably
///
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_tree(&mut self, tree: &RuleTree) {
        walk_tree(self, tree);
    }

    fn visit_group(&mut self, group: &Group) {
        walk_group(self, group);
    }

    fn visit_condition(&mut self, _condition: &Condition) {
        // Leaf node, no children to walk
    }
}

pub fn walk_tree<V: Visitor>(visitor: &mut V, tree: &RuleTree) {
    visitor.visit_group(tree.root());
}

pub fn walk_group<V: Visitor>(visitor: &mut V, group: &Group) {
    for child in &group.children {
        match child.as_ref() {
            TreeNode::Condition(condition) => visitor.visit_condition(condition),
            TreeNode::Group(inner) => visitor.visit_group(inner),
        }
    }
}

/// Collects every condition in document order
#[derive(Default)]
pub struct ConditionCollector<'a> {
    pub conditions: Vec<&'a Condition>,
}

impl<'a> ConditionCollector<'a> {
    pub fn collect(tree: &'a RuleTree) -> Vec<&'a Condition> {
        let mut collector = ConditionCollector::default();
        collector.walk(tree.root());
        collector.conditions
    }

    // Visitor methods can't carry the tree lifetime, so walk by hand.
    fn walk(&mut self, group: &'a Group) {
        for child in &group.children {
            match child.as_ref() {
                TreeNode::Condition(condition) => self.conditions.push(condition),
                TreeNode::Group(inner) => self.walk(inner),
            }
        }
    }
}
