use crate::error::{CompileError, CompileResult};
use rulecraft_compiler_mongo as mongo;
use rulecraft_compiler_readable as readable;
use rulecraft_compiler_sql as sql;
use rulecraft_model::{FieldCatalog, RuleTree};
use serde_json::Value;

/// A code generator that turns a tree into some output
pub trait Backend {
    type Output;

    fn name(&self) -> &str;

    fn compile(&self, tree: &RuleTree, catalog: &FieldCatalog) -> CompileResult<Self::Output>;
}

#[derive(Debug, Clone, Default)]
pub struct ReadableBackend {
    pub options: readable::CompileOptions,
}

impl Backend for ReadableBackend {
    type Output = String;

    fn name(&self) -> &str {
        "readable"
    }

    fn compile(&self, tree: &RuleTree, catalog: &FieldCatalog) -> CompileResult<String> {
        Ok(readable::compile_to_readable(tree, catalog, &self.options))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SqlBackend {
    pub options: sql::CompileOptions,
}

impl Backend for SqlBackend {
    type Output = String;

    fn name(&self) -> &str {
        "sql"
    }

    fn compile(&self, tree: &RuleTree, catalog: &FieldCatalog) -> CompileResult<String> {
        Ok(sql::compile_to_sql(tree, catalog, &self.options))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MongoBackend {
    pub options: mongo::CompileOptions,
}

impl Backend for MongoBackend {
    type Output = Value;

    fn name(&self) -> &str {
        "mongo"
    }

    fn compile(&self, tree: &RuleTree, catalog: &FieldCatalog) -> CompileResult<Value> {
        Ok(mongo::compile_to_mongo(tree, catalog, &self.options))
    }
}

/// Identity output: the tree's own serialized form
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend;

impl Backend for JsonBackend {
    type Output = Value;

    fn name(&self) -> &str {
        "json"
    }

    fn compile(&self, tree: &RuleTree, _catalog: &FieldCatalog) -> CompileResult<Value> {
        Ok(serde_json::to_value(tree)?)
    }
}

/// Wraps a caller-supplied `(tree) -> T` as a backend
pub struct CustomBackend<F> {
    name: String,
    render: F,
}

impl<F> CustomBackend<F> {
    pub fn new(name: impl Into<String>, render: F) -> Self {
        Self {
            name: name.into(),
            render,
        }
    }
}

impl<F, T> Backend for CustomBackend<F>
where
    F: Fn(&RuleTree) -> Result<T, String>,
{
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn compile(&self, tree: &RuleTree, _catalog: &FieldCatalog) -> CompileResult<T> {
        (self.render)(tree).map_err(|message| CompileError::Backend {
            backend: self.name.clone(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulecraft_model::{Combinator, Condition, FieldDef, FieldType, Group, Operator};

    fn tree() -> RuleTree {
        RuleTree::new(
            Group::new("root", Combinator::And)
                .with_children([Condition::new("c1", "age", Operator::GreaterThan, 18).into()]),
        )
    }

    #[test]
    fn test_json_backend_is_identity() {
        let catalog = FieldCatalog::default();
        let value = JsonBackend.compile(&tree(), &catalog).unwrap();
        let back: RuleTree = serde_json::from_value(value).unwrap();
        assert_eq!(back, tree());
    }

    #[test]
    fn test_custom_backend_errors_carry_name() {
        let catalog = FieldCatalog::new(vec![FieldDef::new("age", "Age", FieldType::Number)]);
        let count = CustomBackend::new("count", |tree: &RuleTree| Ok::<_, String>(tree.condition_count()));
        assert_eq!(count.compile(&tree(), &catalog).unwrap(), 1);

        let failing = CustomBackend::new("broken", |_: &RuleTree| Err::<(), _>("nope".to_string()));
        let err = failing.compile(&tree(), &catalog).unwrap_err();
        assert_eq!(err.to_string(), "Backend 'broken' failed: nope");
    }
}
