use crate::diagnostic::Diagnostic;
use crate::rules::{RuleContext, ValidationRule};
use rulecraft_model::{Condition, FieldDef, FieldType, RuleValue};

/// Values must coerce to the field's type and fit the operator's shape
pub struct ValueTypeRule;

impl ValidationRule for ValueTypeRule {
    fn name(&self) -> &'static str {
        "value-type"
    }

    fn description(&self) -> &'static str {
        "Values must match the field type and the operator's expected shape"
    }

    fn check_condition(
        &self,
        condition: &Condition,
        field: &FieldDef,
        ctx: &RuleContext,
    ) -> Vec<Diagnostic> {
        let operator = condition.operator;
        if operator.is_valueless() || condition.value.is_missing() {
            return Vec::new();
        }

        let items: Vec<&RuleValue> = if operator.is_range() {
            match condition.value.as_range() {
                Some((low, high)) if !low.is_missing() && !high.is_missing() => vec![low, high],
                _ => {
                    return vec![Diagnostic::error(
                        self.name(),
                        format!("'{}' {} needs a lower and an upper bound", field.label, operator),
                        ctx.path,
                    )
                    .with_suggestion("Provide the value as [low, high]")];
                }
            }
        } else if operator.is_list() {
            match condition.value.as_list() {
                Some(items) => items.iter().collect(),
                None => vec![&condition.value],
            }
        } else {
            if condition.value.as_list().is_some() {
                return vec![Diagnostic::error(
                    self.name(),
                    format!("'{}' {} takes a single value", field.label, operator),
                    ctx.path,
                )];
            }
            vec![&condition.value]
        };

        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let problem = type_problem(field, item)?;
                Some(
                    Diagnostic::error(self.name(), problem, ctx.path)
                        .with_key(&index.to_string()),
                )
            })
            .collect()
    }
}

/// Describe why `value` does not fit `field`, if it doesn't
fn type_problem(field: &FieldDef, value: &RuleValue) -> Option<String> {
    let shown = value.to_plain_string();
    match field.field_type {
        FieldType::Number if value.as_f64().is_none() => {
            Some(format!("'{}' is not a number for '{}'", shown, field.label))
        }
        FieldType::Date if value.as_date().is_none() => Some(format!(
            "'{}' is not a valid date for '{}' (expected YYYY-MM-DD)",
            shown, field.label
        )),
        FieldType::Boolean if value.as_bool().is_none() => {
            Some(format!("'{}' is not true or false for '{}'", shown, field.label))
        }
        // Options may still be loading; only check against a known list
        FieldType::Select if !field.options.is_empty() && field.option(&shown).is_none() => {
            Some(format!("'{}' is not an option of '{}'", shown, field.label))
        }
        FieldType::String if value.as_list().is_some() => {
            Some(format!("'{}' expects text", field.label))
        }
        _ => None,
    }
}
