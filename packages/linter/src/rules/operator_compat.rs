use crate::diagnostic::Diagnostic;
use crate::rules::{RuleContext, ValidationRule};
use rulecraft_model::{Condition, FieldDef};

/// Operator must be one the field allows
pub struct OperatorCompatRule;

impl ValidationRule for OperatorCompatRule {
    fn name(&self) -> &'static str {
        "operator-compat"
    }

    fn description(&self) -> &'static str {
        "Conditions must use an operator allowed for their field"
    }

    fn check_condition(
        &self,
        condition: &Condition,
        field: &FieldDef,
        ctx: &RuleContext,
    ) -> Vec<Diagnostic> {
        if field.allows(condition.operator) {
            return Vec::new();
        }

        let allowed = field
            .operators()
            .iter()
            .map(|op| op.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        vec![Diagnostic::error(
            self.name(),
            format!(
                "Operator '{}' is not allowed for {} field '{}'",
                condition.operator,
                field.field_type.as_str(),
                field.label
            ),
            ctx.path,
        )
        .with_suggestion(format!("Use one of: {}", allowed))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulecraft_model::{FieldCatalog, FieldType, Operator};

    #[test]
    fn test_rejects_operator_outside_field_set() {
        let field = FieldDef::new("age", "Age", FieldType::Number);
        let catalog = FieldCatalog::new(vec![field.clone()]);
        let path = vec!["root".to_string(), "c1".to_string()];
        let ctx = RuleContext { catalog: &catalog, path: &path };

        let bad = Condition::new("c1", "age", Operator::Contains, "1");
        let diagnostics = OperatorCompatRule.check_condition(&bad, &field, &ctx);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, "operator-compat:c1");
        assert!(diagnostics[0].is_error());

        let good = Condition::new("c1", "age", Operator::GreaterThan, 1);
        assert!(OperatorCompatRule.check_condition(&good, &field, &ctx).is_empty());
    }
}
