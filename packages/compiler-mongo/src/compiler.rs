use rulecraft_common::{render_tree, uniform_connector, GroupRenderer};
use rulecraft_model::{
    Combinator, Condition, FieldCatalog, FieldDef, FieldType, Group, Operator, RuleTree,
    RuleValue, DATE_FORMAT,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Options for Mongo compilation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Add `$options: "i"` to text matches
    pub case_insensitive: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            case_insensitive: true,
        }
    }
}

/// Compile a rule tree to a Mongo filter; an empty tree yields `{}`
pub fn compile_to_mongo(tree: &RuleTree, catalog: &FieldCatalog, options: &CompileOptions) -> Value {
    let mut ctx = Context { catalog, options };
    render_tree(&mut ctx, tree)
}

/// Pretty-printed filter with default options
pub fn format_mongo(tree: &RuleTree, catalog: &FieldCatalog) -> String {
    let filter = compile_to_mongo(tree, catalog, &CompileOptions::default());
    serde_json::to_string_pretty(&filter).unwrap_or_else(|_| filter.to_string())
}

struct Context<'a> {
    catalog: &'a FieldCatalog,
    options: &'a CompileOptions,
}

impl Context<'_> {
    fn value(&self, field: Option<&FieldDef>, value: &RuleValue) -> Value {
        match field.map(|field| field.field_type) {
            Some(FieldType::Number) => match value.as_f64() {
                Some(n) => number(n),
                None => plain(value),
            },
            Some(FieldType::Boolean) => match value.as_bool() {
                Some(b) => Value::Bool(b),
                None => plain(value),
            },
            Some(FieldType::Date) => match value.as_date() {
                Some(date) => Value::String(date.format(DATE_FORMAT).to_string()),
                None => plain(value),
            },
            _ => plain(value),
        }
    }

    fn list(&self, field: Option<&FieldDef>, value: &RuleValue) -> Value {
        match value.as_list() {
            Some(items) => Value::Array(items.iter().map(|item| self.value(field, item)).collect()),
            None => Value::Array(vec![self.value(field, value)]),
        }
    }

    fn range(&self, field: Option<&FieldDef>, value: &RuleValue) -> Value {
        let (low, high) = value.as_range().unwrap_or((value, value));
        json!({ "$gte": self.value(field, low), "$lte": self.value(field, high) })
    }

    fn regex(&self, value: &RuleValue, prefix: &str, suffix: &str) -> Value {
        let pattern = format!("{}{}{}", prefix, regex::escape(&value.to_plain_string()), suffix);
        if self.options.case_insensitive {
            json!({ "$regex": pattern, "$options": "i" })
        } else {
            json!({ "$regex": pattern })
        }
    }
}

/// Integral numbers become JSON integers
fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

fn plain(value: &RuleValue) -> Value {
    match value {
        RuleValue::Null => Value::Null,
        RuleValue::Bool(b) => Value::Bool(*b),
        RuleValue::Number(n) => number(*n),
        RuleValue::Text(text) => Value::String(text.clone()),
        RuleValue::List(items) => Value::Array(items.iter().map(plain).collect()),
    }
}

fn field_filter(name: &str, filter: Value) -> Value {
    let mut object = Map::new();
    object.insert(name.to_string(), filter);
    Value::Object(object)
}

impl GroupRenderer for Context<'_> {
    type Output = Value;

    fn empty(&self) -> Value {
        Value::Object(Map::new())
    }

    fn is_empty(&self, output: &Value) -> bool {
        output.as_object().is_some_and(Map::is_empty)
    }

    fn condition(&mut self, condition: &Condition) -> Value {
        let name = condition.field_name.as_str();
        let field = self.catalog.get(name);
        let value = &condition.value;

        let filter = match condition.operator {
            Operator::Equals => self.value(field, value),
            Operator::NotEquals => json!({ "$ne": self.value(field, value) }),
            Operator::Contains => self.regex(value, "", ""),
            Operator::StartsWith => self.regex(value, "^", ""),
            Operator::EndsWith => self.regex(value, "", "$"),
            Operator::GreaterThan | Operator::After => json!({ "$gt": self.value(field, value) }),
            Operator::GreaterThanOrEqual => json!({ "$gte": self.value(field, value) }),
            Operator::LessThan | Operator::Before => json!({ "$lt": self.value(field, value) }),
            Operator::LessThanOrEqual => json!({ "$lte": self.value(field, value) }),
            Operator::Between => self.range(field, value),
            Operator::NotBetween => json!({ "$not": self.range(field, value) }),
            Operator::In => json!({ "$in": self.list(field, value) }),
            Operator::NotIn => json!({ "$nin": self.list(field, value) }),
            Operator::IsTrue => Value::Bool(true),
            Operator::IsFalse => Value::Bool(false),
            Operator::IsEmpty => {
                return json!({ "$or": [field_filter(name, Value::Null), field_filter(name, json!(""))] });
            }
            Operator::IsNotEmpty => {
                return json!({ "$and": [
                    field_filter(name, json!({ "$ne": null })),
                    field_filter(name, json!({ "$ne": "" })),
                ] });
            }
        };

        field_filter(name, filter)
    }

    fn join(&mut self, group: &Group, mut parts: Vec<Value>, connectors: Vec<Combinator>) -> Value {
        if parts.len() == 1 {
            return parts.remove(0);
        }

        let combinator = match uniform_connector(&connectors) {
            Some(combinator) => combinator,
            None => {
                tracing::debug!(
                    group = %group.id,
                    fallback = %group.default_combinator,
                    "Mixed connectors collapsed to the group default"
                );
                group.default_combinator
            }
        };

        let key = match combinator {
            Combinator::And => "$and",
            Combinator::Or => "$or",
        };
        field_filter(key, Value::Array(parts))
    }

    fn negate(&mut self, output: Value) -> Value {
        json!({ "$not": output })
    }
}
