use rulecraft_common::{render_tree, GroupRenderer};
use rulecraft_model::{
    format_number, Combinator, Condition, FieldCatalog, FieldDef, FieldType, Group, Operator,
    RuleTree, RuleValue, DATE_FORMAT,
};
use serde::{Deserialize, Serialize};

/// Options for SQL compilation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Double-quote every column name, not only the ones that need it
    pub quote_all_identifiers: bool,
}

/// Compile a rule tree to a SQL `WHERE` body; an empty tree yields `""`
pub fn compile_to_sql(tree: &RuleTree, catalog: &FieldCatalog, options: &CompileOptions) -> String {
    let mut ctx = Context { catalog, options };
    render_tree(&mut ctx, tree)
}

/// SQL rendering with default options
pub fn format_sql(tree: &RuleTree, catalog: &FieldCatalog) -> String {
    compile_to_sql(tree, catalog, &CompileOptions::default())
}

/// Single-quote a string literal, doubling embedded quotes
pub fn quote_string(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Column reference; names outside `[A-Za-z0-9_.]` are double-quoted
pub fn quote_identifier(name: &str, force: bool) -> String {
    let plain = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if plain && !force {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

struct Context<'a> {
    catalog: &'a FieldCatalog,
    options: &'a CompileOptions,
}

impl Context<'_> {
    fn literal(&self, field: Option<&FieldDef>, value: &RuleValue) -> String {
        let field_type = field.map(|field| field.field_type);
        match (field_type, value) {
            (Some(FieldType::Number), _) => match value.as_f64() {
                Some(n) => format_number(n),
                None => quote_string(&value.to_plain_string()),
            },
            (Some(FieldType::Boolean), _) => match value.as_bool() {
                Some(true) => "TRUE".to_string(),
                Some(false) => "FALSE".to_string(),
                None => quote_string(&value.to_plain_string()),
            },
            (Some(FieldType::Date), _) => match value.as_date() {
                Some(date) => quote_string(&date.format(DATE_FORMAT).to_string()),
                None => quote_string(&value.to_plain_string()),
            },
            (None, RuleValue::Number(n)) => format_number(*n),
            (None, RuleValue::Bool(true)) => "TRUE".to_string(),
            (None, RuleValue::Bool(false)) => "FALSE".to_string(),
            (None, RuleValue::Null) => "NULL".to_string(),
            _ => quote_string(&value.to_plain_string()),
        }
    }

    fn list(&self, field: Option<&FieldDef>, value: &RuleValue) -> String {
        let items = match value.as_list() {
            Some(items) => items
                .iter()
                .map(|item| self.literal(field, item))
                .collect::<Vec<_>>(),
            None => vec![self.literal(field, value)],
        };
        format!("({})", items.join(", "))
    }

    fn range(&self, field: Option<&FieldDef>, value: &RuleValue) -> String {
        match value.as_range() {
            Some((low, high)) => format!("{} AND {}", self.literal(field, low), self.literal(field, high)),
            None => format!("{} AND {}", self.literal(field, value), self.literal(field, value)),
        }
    }
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
        let column = quote_identifier(&condition.field_name, self.options.quote_all_identifiers);
        let value = &condition.value;
        let pattern = |prefix: &str, suffix: &str| {
            quote_string(&format!("{}{}{}", prefix, value.to_plain_string(), suffix))
        };

        match condition.operator {
            Operator::Equals => format!("{} = {}", column, self.literal(field, value)),
            Operator::NotEquals => format!("{} <> {}", column, self.literal(field, value)),
            Operator::Contains => format!("{} LIKE {}", column, pattern("%", "%")),
            Operator::StartsWith => format!("{} LIKE {}", column, pattern("", "%")),
            Operator::EndsWith => format!("{} LIKE {}", column, pattern("%", "")),
            Operator::IsEmpty => format!("({0} IS NULL OR {0} = '')", column),
            Operator::IsNotEmpty => format!("({0} IS NOT NULL AND {0} <> '')", column),
            Operator::GreaterThan | Operator::After => {
                format!("{} > {}", column, self.literal(field, value))
            }
            Operator::GreaterThanOrEqual => format!("{} >= {}", column, self.literal(field, value)),
            Operator::LessThan | Operator::Before => {
                format!("{} < {}", column, self.literal(field, value))
            }
            Operator::LessThanOrEqual => format!("{} <= {}", column, self.literal(field, value)),
            Operator::Between => format!("{} BETWEEN {}", column, self.range(field, value)),
            Operator::NotBetween => format!("{} NOT BETWEEN {}", column, self.range(field, value)),
            Operator::IsTrue => format!("{} = TRUE", column),
            Operator::IsFalse => format!("{} = FALSE", column),
            Operator::In => format!("{} IN {}", column, self.list(field, value)),
            Operator::NotIn => format!("{} NOT IN {}", column, self.list(field, value)),
        }
    }

    fn join(&mut self, _group: &Group, parts: Vec<String>, connectors: Vec<Combinator>) -> String {
        let mut sql = String::new();
        for (index, part) in parts.iter().enumerate() {
            if index > 0 {
                sql.push(' ');
                sql.push_str(connectors[index - 1].as_str());
                sql.push(' ');
            }
            sql.push_str(part);
        }
        sql
    }

    fn nest(&mut self, output: String) -> String {
        format!("({})", output)
    }

    fn negate(&mut self, output: String) -> String {
        format!("NOT ({})", output)
    }
}
