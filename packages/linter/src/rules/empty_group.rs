use crate::diagnostic::Diagnostic;
use crate::rules::{RuleContext, ValidationRule};
use rulecraft_model::Group;

/// Empty groups are allowed but contribute nothing
pub struct EmptyGroupRule;

impl ValidationRule for EmptyGroupRule {
    fn name(&self) -> &'static str {
        "empty-group"
    }

    fn description(&self) -> &'static str {
        "Warn about groups without any conditions"
    }

    fn check_group(&self, group: &Group, ctx: &RuleContext) -> Vec<Diagnostic> {
        if !group.is_empty() {
            return Vec::new();
        }

        vec![Diagnostic::warning(self.name(), "Group has no conditions", ctx.path)
            .with_suggestion("Add a condition or remove the group")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulecraft_model::{Combinator, Condition, FieldCatalog, Operator};

    #[test]
    fn test_warns_only_on_empty_groups() {
        let catalog = FieldCatalog::default();
        let path = vec!["g".to_string()];
        let ctx = RuleContext { catalog: &catalog, path: &path };

        let empty = Group::new("g", Combinator::And);
        let diagnostics = EmptyGroupRule.check_group(&empty, &ctx);
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());

        let filled = Group::new("g", Combinator::And)
            .with_children([Condition::new("c", "a", Operator::Equals, 1).into()]);
        assert!(EmptyGroupRule.check_group(&filled, &ctx).is_empty());
    }
}
