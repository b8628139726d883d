use crate::diagnostic::Diagnostic;
use crate::rules::{RuleContext, ValidationRule};
use rulecraft_model::{Condition, FieldDef};

/// Conditions need a value unless their operator takes none
pub struct MissingValueRule;

impl ValidationRule for MissingValueRule {
    fn name(&self) -> &'static str {
        "missing-value"
    }

    fn description(&self) -> &'static str {
        "Conditions must have a value unless the operator is value-less"
    }

    fn check_condition(
        &self,
        condition: &Condition,
        field: &FieldDef,
        ctx: &RuleContext,
    ) -> Vec<Diagnostic> {
        if condition.operator.is_valueless() || !condition.value.is_missing() {
            return Vec::new();
        }

        vec![Diagnostic::error(
            self.name(),
            format!("'{}' needs a value", field.label),
            ctx.path,
        )]
    }
}
