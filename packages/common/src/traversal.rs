//! Shared group traversal for the code generators.
//!
//! Every backend renders a group the same way: render each child, drop the
//! ones that come out empty, join the rest with their effective connectors,
//! then wrap for nesting or negation. Backends only supply the leaf and
//! joining primitives.

use rulecraft_model::{Combinator, Condition, Group, RuleTree, TreeNode};

/// Backend-specific primitives driven by [`render_group`]
pub trait GroupRenderer {
    type Output;

    /// Value produced for a group with nothing to render
    fn empty(&self) -> Self::Output;

    fn is_empty(&self, output: &Self::Output) -> bool;

    fn condition(&mut self, condition: &Condition) -> Self::Output;

    /// Join rendered children; `connectors[i]` sits between `parts[i]` and `parts[i + 1]`
    fn join(
        &mut self,
        group: &Group,
        parts: Vec<Self::Output>,
        connectors: Vec<Combinator>,
    ) -> Self::Output;

    /// Wrap a nested (non-root) group
    fn nest(&mut self, output: Self::Output) -> Self::Output {
        output
    }

    fn negate(&mut self, output: Self::Output) -> Self::Output;
}

pub fn render_tree<R: GroupRenderer>(renderer: &mut R, tree: &RuleTree) -> R::Output {
    render_group(renderer, tree.root(), false)
}

pub fn render_group<R: GroupRenderer>(renderer: &mut R, group: &Group, nested: bool) -> R::Output {
    let mut parts = Vec::with_capacity(group.children.len());
    let mut connectors = Vec::with_capacity(group.children.len());

    for child in &group.children {
        let output = match child.as_ref() {
            TreeNode::Condition(condition) => renderer.condition(condition),
            TreeNode::Group(inner) => render_group(renderer, inner, true),
        };
        if renderer.is_empty(&output) {
            continue;
        }
        parts.push(output);
        connectors.push(
            child
                .edge_combinator()
                .unwrap_or(group.default_combinator),
        );
    }

    if parts.is_empty() {
        return renderer.empty();
    }

    // The last kept child's own connector leads nowhere
    connectors.pop();

    let joined = renderer.join(group, parts, connectors);
    if group.negate {
        renderer.negate(joined)
    } else if nested {
        renderer.nest(joined)
    } else {
        joined
    }
}

/// Shared connector of a list, or `None` when connectors are mixed or absent
pub fn uniform_connector(connectors: &[Combinator]) -> Option<Combinator> {
    let first = *connectors.first()?;
    connectors
        .iter()
        .all(|connector| *connector == first)
        .then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulecraft_model::Operator;

    /// Minimal text backend: field names joined by connectors
    struct Names;

    impl GroupRenderer for Names {
        type Output = String;

        fn empty(&self) -> String {
            String::new()
        }

        fn is_empty(&self, output: &String) -> bool {
            output.is_empty()
        }

        fn condition(&mut self, condition: &Condition) -> String {
            condition.field_name.clone()
        }

        fn join(&mut self, _group: &Group, parts: Vec<String>, connectors: Vec<Combinator>) -> String {
            let mut out = parts[0].clone();
            for (part, connector) in parts[1..].iter().zip(connectors) {
                out.push_str(&format!(" {} {}", connector, part));
            }
            out
        }

        fn nest(&mut self, output: String) -> String {
            format!("({})", output)
        }

        fn negate(&mut self, output: String) -> String {
            format!("NOT ({})", output)
        }
    }

    fn cond(id: &str, field: &str) -> TreeNode {
        Condition::new(id, field, Operator::Equals, 1).into()
    }

    #[test]
    fn test_empty_group_renders_empty() {
        let tree = RuleTree::empty("root");
        assert_eq!(render_tree(&mut Names, &tree), "");
    }

    #[test]
    fn test_connectors_follow_edge_overrides() {
        let tree = RuleTree::new(Group::new("root", Combinator::Or).with_children([
            Condition::new("c1", "a", Operator::Equals, 1)
                .with_edge(Combinator::And)
                .into(),
            cond("c2", "b"),
            cond("c3", "c"),
        ]));
        assert_eq!(render_tree(&mut Names, &tree), "a AND b OR c");
    }

    #[test]
    fn test_nested_and_negated_groups() {
        let tree = RuleTree::new(Group::new("root", Combinator::And).with_children([
            cond("c1", "a"),
            Group::new("g1", Combinator::Or)
                .with_children([cond("c2", "b"), cond("c3", "c")])
                .into(),
            Group::new("g2", Combinator::And)
                .negated()
                .with_children([cond("c4", "d")])
                .into(),
        ]));
        assert_eq!(render_tree(&mut Names, &tree), "a AND (b OR c) AND NOT (d)");
    }

    #[test]
    fn test_empty_children_are_skipped_with_their_connector() {
        let tree = RuleTree::new(Group::new("root", Combinator::And).with_children([
            Condition::new("c1", "a", Operator::Equals, 1)
                .with_edge(Combinator::Or)
                .into(),
            Group::new("g1", Combinator::And)
                .with_edge(Combinator::And)
                .into(),
            cond("c2", "b"),
        ]));
        assert_eq!(render_tree(&mut Names, &tree), "a OR b");
    }

    #[test]
    fn test_uniform_connector() {
        assert_eq!(uniform_connector(&[]), None);
        assert_eq!(
            uniform_connector(&[Combinator::Or, Combinator::Or]),
            Some(Combinator::Or)
        );
        assert_eq!(uniform_connector(&[Combinator::Or, Combinator::And]), None);
    }
}
