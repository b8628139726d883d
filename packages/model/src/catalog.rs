//! Field catalog: the fields a rule tree may reference, with their types,
//! operators, options and constraints.

use crate::operator::Operator;
use crate::value::RuleValue;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Value type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Date,
    Boolean,
    Select,
}

impl FieldType {
    /// Operators offered when a field does not list its own
    pub fn default_operators(&self) -> &'static [Operator] {
        use Operator::*;
        match self {
            FieldType::String => &[
                Equals, NotEquals, Contains, StartsWith, EndsWith, IsEmpty, IsNotEmpty,
            ],
            FieldType::Number => &[
                Equals,
                NotEquals,
                GreaterThan,
                GreaterThanOrEqual,
                LessThan,
                LessThanOrEqual,
                Between,
                NotBetween,
            ],
            FieldType::Date => &[Equals, NotEquals, Before, After, Between, NotBetween],
            FieldType::Boolean => &[Equals, IsTrue, IsFalse],
            FieldType::Select => &[Equals, NotEquals, In, NotIn],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
            FieldType::Select => "select",
        }
    }
}

/// One choice of a select field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Caller-supplied value check; returns the failure message
#[derive(Clone)]
pub struct CustomValidator(Arc<dyn Fn(&RuleValue) -> Result<(), String> + Send + Sync>);

impl CustomValidator {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&RuleValue) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(check))
    }

    pub fn check(&self, value: &RuleValue) -> Result<(), String> {
        (self.0)(value)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(..)")
    }
}

/// Extra restrictions on a field's values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression text values must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Message reported instead of the generated one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip)]
    pub custom: Option<CustomValidator>,
}

/// A field conditions can reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_operators: Option<Vec<Operator>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<FieldConstraints>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            allowed_operators: None,
            options: Vec::new(),
            constraints: None,
        }
    }

    pub fn with_operators(mut self, operators: impl Into<Vec<Operator>>) -> Self {
        self.allowed_operators = Some(operators.into());
        self
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = FieldOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn with_constraints(mut self, constraints: FieldConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    /// Allowed operators, falling back to the type defaults
    pub fn operators(&self) -> &[Operator] {
        match &self.allowed_operators {
            Some(operators) => operators,
            None => self.field_type.default_operators(),
        }
    }

    pub fn allows(&self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }

    pub fn option(&self, value: &str) -> Option<&FieldOption> {
        self.options.iter().find(|option| option.value == value)
    }

    /// Label of the option whose value matches, if any
    pub fn option_label(&self, value: &RuleValue) -> Option<&str> {
        self.option(&value.to_plain_string())
            .map(|option| option.label.as_str())
    }

    /// Starting value for a freshly created condition on this field
    pub fn default_value(&self) -> RuleValue {
        match self.field_type {
            FieldType::String => RuleValue::Text(String::new()),
            FieldType::Number => RuleValue::Number(0.0),
            FieldType::Boolean => RuleValue::Bool(false),
            FieldType::Date => RuleValue::from(Local::now().date_naive()),
            FieldType::Select => self
                .options
                .first()
                .map(|option| RuleValue::Text(option.value.clone()))
                .unwrap_or_default(),
        }
    }
}

/// One page of options produced by a value resolver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionPage {
    pub options: Vec<FieldOption>,
    #[serde(default)]
    pub has_more: bool,
}

/// Ordered collection of field definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    fields: Vec<FieldDef>,
}

impl FieldCatalog {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldDef> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    pub fn first(&self) -> Option<&FieldDef> {
        self.fields.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Display label for a field, or the raw name when it is unknown
    pub fn label_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).map(|field| field.label.as_str()).unwrap_or(name)
    }

    /// Append resolved options to a field, skipping values already present
    ///
    /// Returns false when the field does not exist.
    pub fn merge_options(&mut self, name: &str, page: OptionPage) -> bool {
        let Some(field) = self.get_mut(name) else {
            return false;
        };
        for option in page.options {
            if field.option(&option.value).is_none() {
                field.options.push(option);
            }
        }
        true
    }
}

impl FromIterator<FieldDef> for FieldCatalog {
    fn from_iter<I: IntoIterator<Item = FieldDef>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_field() -> FieldDef {
        FieldDef::new("status", "Status", FieldType::Select).with_options([
            FieldOption::new("active", "Active"),
            FieldOption::new("closed", "Closed"),
        ])
    }

    #[test]
    fn test_default_operators_by_type() {
        let field = FieldDef::new("age", "Age", FieldType::Number);
        assert!(field.allows(Operator::Between));
        assert!(!field.allows(Operator::Contains));

        let restricted = field.with_operators(vec![Operator::Equals]);
        assert_eq!(restricted.operators(), &[Operator::Equals]);
    }

    #[test]
    fn test_default_values() {
        assert_eq!(
            FieldDef::new("n", "N", FieldType::String).default_value(),
            RuleValue::from("")
        );
        assert_eq!(
            FieldDef::new("n", "N", FieldType::Number).default_value(),
            RuleValue::from(0)
        );
        assert_eq!(
            FieldDef::new("n", "N", FieldType::Boolean).default_value(),
            RuleValue::from(false)
        );
        assert_eq!(status_field().default_value(), RuleValue::from("active"));
        assert!(FieldDef::new("d", "D", FieldType::Date)
            .default_value()
            .as_date()
            .is_some());
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            { "name": "age", "label": "Age", "type": "number", "constraints": { "min": 0 } },
            { "name": "tier", "label": "Tier", "type": "select",
              "allowedOperators": ["in"], "options": [{ "value": "gold", "label": "Gold" }] }
        ]"#;
        let catalog: FieldCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("age").unwrap().constraints.as_ref().unwrap().min, Some(0.0));
        assert_eq!(catalog.get("tier").unwrap().operators(), &[Operator::In]);
        assert_eq!(catalog.label_for("tier"), "Tier");
        assert_eq!(catalog.label_for("ghost"), "ghost");
    }

    #[test]
    fn test_merge_resolved_options() {
        let mut catalog = FieldCatalog::new(vec![status_field()]);
        let page = OptionPage {
            options: vec![
                FieldOption::new("closed", "Closed"),
                FieldOption::new("pending", "Pending"),
            ],
            has_more: true,
        };
        assert!(catalog.merge_options("status", page));
        let field = catalog.get("status").unwrap();
        assert_eq!(field.options.len(), 3);
        assert_eq!(field.option_label(&RuleValue::from("pending")), Some("Pending"));
        assert!(!catalog.merge_options("ghost", OptionPage::default()));
    }
}
