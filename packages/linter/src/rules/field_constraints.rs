use crate::diagnostic::Diagnostic;
use crate::rules::{value_items, RuleContext, ValidationRule};
use regex::Regex;
use rulecraft_model::{Condition, FieldConstraints, FieldDef, FieldType, RuleValue};

/// Field-supplied min/max, length, pattern and custom checks
pub struct FieldConstraintsRule;

impl ValidationRule for FieldConstraintsRule {
    fn name(&self) -> &'static str {
        "field-constraints"
    }

    fn description(&self) -> &'static str {
        "Values must satisfy the constraints declared on their field"
    }

    fn check_condition(
        &self,
        condition: &Condition,
        field: &FieldDef,
        ctx: &RuleContext,
    ) -> Vec<Diagnostic> {
        let Some(constraints) = &field.constraints else {
            return Vec::new();
        };
        if condition.operator.is_valueless() || condition.value.is_missing() {
            return Vec::new();
        }

        let mut diagnostics = Vec::new();
        for value in value_items(condition) {
            for (key, problem) in violations(field, constraints, value) {
                let message = constraints.message.clone().unwrap_or(problem);
                let mut diagnostic =
                    Diagnostic::error(self.name(), message, ctx.path).with_key(key);
                if let Some(suggestion) = &constraints.suggestion {
                    diagnostic = diagnostic.with_suggestion(suggestion.clone());
                }
                // Same constraint failing on two range bounds reports once
                if !diagnostics.iter().any(|d: &Diagnostic| d.id == diagnostic.id) {
                    diagnostics.push(diagnostic);
                }
            }
        }

        if let Some(custom) = &constraints.custom {
            if let Err(message) = custom.check(&condition.value) {
                let message = constraints.message.clone().unwrap_or(message);
                let mut diagnostic =
                    Diagnostic::error(self.name(), message, ctx.path).with_key("custom");
                if let Some(suggestion) = &constraints.suggestion {
                    diagnostic = diagnostic.with_suggestion(suggestion.clone());
                }
                diagnostics.push(diagnostic);
            }
        }

        diagnostics
    }
}

fn violations(
    field: &FieldDef,
    constraints: &FieldConstraints,
    value: &RuleValue,
) -> Vec<(&'static str, String)> {
    let mut found = Vec::new();

    if field.field_type == FieldType::Number {
        if let Some(n) = value.as_f64() {
            if let Some(min) = constraints.min.filter(|min| n < *min) {
                found.push(("min", format!("'{}' must be at least {}", field.label, min)));
            }
            if let Some(max) = constraints.max.filter(|max| n > *max) {
                found.push(("max", format!("'{}' must be at most {}", field.label, max)));
            }
        }
        return found;
    }

    let Some(text) = value.as_text() else {
        return found;
    };
    let length = text.chars().count();

    if let Some(min) = constraints.min_length.filter(|min| length < *min) {
        found.push((
            "min-length",
            format!("'{}' must be at least {} characters", field.label, min),
        ));
    }
    if let Some(max) = constraints.max_length.filter(|max| length > *max) {
        found.push((
            "max-length",
            format!("'{}' must be at most {} characters", field.label, max),
        ));
    }
    if let Some(pattern) = &constraints.pattern {
        match Regex::new(pattern) {
            Ok(regex) if !regex.is_match(text) => found.push((
                "pattern",
                format!("'{}' does not match the expected format", field.label),
            )),
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(field = %field.name, error = %err, "Ignoring invalid constraint pattern");
            }
        }
    }

    found
}
