use chrono::NaiveDate;
use rulecraft_common::{render_tree, GroupRenderer};
use rulecraft_model::{
    format_number, Combinator, Condition, FieldCatalog, FieldDef, FieldType, Group, Operator,
    RuleTree, RuleValue, DATE_FORMAT,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Options for readable compilation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// chrono format string for date values
    pub date_format: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            date_format: "%B %-d, %Y".to_string(),
        }
    }
}

/// Compile a rule tree to an English sentence
pub fn compile_to_readable(tree: &RuleTree, catalog: &FieldCatalog, options: &CompileOptions) -> String {
    let mut ctx = Context { catalog, options };
    render_tree(&mut ctx, tree)
}

/// Readable rendering with default options
pub fn format_readable(tree: &RuleTree, catalog: &FieldCatalog) -> String {
    compile_to_readable(tree, catalog, &CompileOptions::default())
}

/// Phrase used between the field label and the value
pub fn operator_phrase(operator: Operator) -> &'static str {
    match operator {
        Operator::Equals => "equals",
        Operator::NotEquals => "does not equal",
        Operator::Contains => "contains",
        Operator::StartsWith => "starts with",
        Operator::EndsWith => "ends with",
        Operator::IsEmpty => "is empty",
        Operator::IsNotEmpty => "is not empty",
        Operator::GreaterThan => "is greater than",
        Operator::GreaterThanOrEqual => "is greater than or equal to",
        Operator::LessThan => "is less than",
        Operator::LessThanOrEqual => "is less than or equal to",
        Operator::Between => "is between",
        Operator::NotBetween => "is not between",
        Operator::Before => "is before",
        Operator::After => "is after",
        Operator::IsTrue => "is true",
        Operator::IsFalse => "is false",
        Operator::In => "is one of",
        Operator::NotIn => "is not one of",
    }
}

struct Context<'a> {
    catalog: &'a FieldCatalog,
    options: &'a CompileOptions,
}

impl Context<'_> {
    fn format_value(&self, field: Option<&FieldDef>, value: &RuleValue, operator: Operator) -> String {
        if operator.is_range() {
            if let Some((low, high)) = value.as_range() {
                return format!(
                    "{} and {}",
                    self.format_scalar(field, low),
                    self.format_scalar(field, high)
                );
            }
        }
        match value.as_list() {
            Some(items) => items
                .iter()
                .map(|item| self.format_scalar(field, item))
                .collect::<Vec<_>>()
                .join(", "),
            None => self.format_scalar(field, value),
        }
    }

    fn format_scalar(&self, field: Option<&FieldDef>, value: &RuleValue) -> String {
        let Some(field) = field else {
            return match value {
                RuleValue::Text(text) => quote(text),
                other => other.to_plain_string(),
            };
        };

        match field.field_type {
            FieldType::Number => match value.as_f64() {
                Some(n) => format_number(n),
                None => quote(&value.to_plain_string()),
            },
            FieldType::Date => match value.as_date() {
                Some(date) => format_date(date, &self.options.date_format),
                None => quote(&value.to_plain_string()),
            },
            FieldType::Boolean => match value.as_bool() {
                Some(b) => b.to_string(),
                None => quote(&value.to_plain_string()),
            },
            FieldType::Select => match field.option_label(value) {
                Some(label) => quote(label),
                None => quote(&value.to_plain_string()),
            },
            FieldType::String => quote(&value.to_plain_string()),
        }
    }
}

/// Format with the configured pattern, falling back to ISO for a bad pattern
fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        return date.format(DATE_FORMAT).to_string();
    }
    out
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text)
}

impl GroupRenderer for Context<'_> {
    type Output = String;

    fn empty(&self) -> String {
        String::new()
    }

    fn is_empty(&self, output: &String) -> bool {
        output.is_empty()
    }

    fn condition(&mut self, condition: &Condition) -> String {
        let field = self.catalog.get(&condition.field_name);
        let label = self.catalog.label_for(&condition.field_name);
        let phrase = operator_phrase(condition.operator);

        if condition.operator.is_valueless() {
            return format!("{} {}", label, phrase);
        }
        format!(
            "{} {} {}",
            label,
            phrase,
            self.format_value(field, &condition.value, condition.operator)
        )
    }

    fn join(&mut self, _group: &Group, parts: Vec<String>, connectors: Vec<Combinator>) -> String {
        let mut out = String::new();
        for (index, part) in parts.iter().enumerate() {
            if index > 0 {
                out.push(' ');
                out.push_str(connectors[index - 1].as_str());
                out.push(' ');
            }
            out.push_str(part);
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
