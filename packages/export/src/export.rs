use crate::backend::{Backend, JsonBackend, MongoBackend, ReadableBackend, SqlBackend};
use crate::error::CompileResult;
use crate::format::ExportFormat;
use rulecraft_compiler_mongo as mongo;
use rulecraft_compiler_readable as readable;
use rulecraft_compiler_sql as sql;
use rulecraft_model::{FieldCatalog, RuleTree};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Per-backend options for a single export run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub readable: readable::CompileOptions,
    pub sql: sql::CompileOptions,
    pub mongo: mongo::CompileOptions,
}

/// Output of one built-in format
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutput {
    Text(String),
    Json(Value),
}

impl ExportOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ExportOutput::Text(text) => Some(text),
            ExportOutput::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ExportOutput::Json(value) => Some(value),
            ExportOutput::Text(_) => None,
        }
    }

    /// Text as-is, JSON pretty-printed
    pub fn to_pretty_string(&self) -> CompileResult<String> {
        match self {
            ExportOutput::Text(text) => Ok(text.clone()),
            ExportOutput::Json(value) => Ok(serde_json::to_string_pretty(value)?),
        }
    }
}

impl fmt::Display for ExportOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportOutput::Text(text) => f.write_str(text),
            ExportOutput::Json(value) => write!(f, "{}", value),
        }
    }
}

/// Every built-in output, plus the custom backend's when one was supplied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportBundle<T = ()> {
    pub readable: String,
    pub sql: String,
    pub mongo: Value,
    pub json: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<T>,
}

impl<T> ExportBundle<T> {
    pub fn get(&self, format: ExportFormat) -> ExportOutput {
        match format {
            ExportFormat::Readable => ExportOutput::Text(self.readable.clone()),
            ExportFormat::Sql => ExportOutput::Text(self.sql.clone()),
            ExportFormat::Mongo => ExportOutput::Json(self.mongo.clone()),
            ExportFormat::Json => ExportOutput::Json(self.json.clone()),
        }
    }
}

/// Compile a tree to one built-in format
pub fn export(
    tree: &RuleTree,
    catalog: &FieldCatalog,
    format: ExportFormat,
    options: &ExportOptions,
) -> CompileResult<ExportOutput> {
    tracing::debug!(format = %format, conditions = tree.condition_count(), "Exporting rule tree");

    let output = match format {
        ExportFormat::Readable => ExportOutput::Text(readable_backend(options).compile(tree, catalog)?),
        ExportFormat::Sql => ExportOutput::Text(sql_backend(options).compile(tree, catalog)?),
        ExportFormat::Mongo => ExportOutput::Json(mongo_backend(options).compile(tree, catalog)?),
        ExportFormat::Json => ExportOutput::Json(JsonBackend.compile(tree, catalog)?),
    };
    Ok(output)
}

/// Compile a tree to every built-in format
pub fn export_all(
    tree: &RuleTree,
    catalog: &FieldCatalog,
    options: &ExportOptions,
) -> CompileResult<ExportBundle> {
    Ok(ExportBundle {
        readable: readable_backend(options).compile(tree, catalog)?,
        sql: sql_backend(options).compile(tree, catalog)?,
        mongo: mongo_backend(options).compile(tree, catalog)?,
        json: JsonBackend.compile(tree, catalog)?,
        custom: None,
    })
}

/// [`export_all`] with a caller-supplied backend threaded alongside the built-ins
pub fn export_all_with<B: Backend>(
    tree: &RuleTree,
    catalog: &FieldCatalog,
    options: &ExportOptions,
    custom: &B,
) -> CompileResult<ExportBundle<B::Output>> {
    let bundle = export_all(tree, catalog, options)?;
    let custom = custom.compile(tree, catalog)?;
    Ok(ExportBundle {
        readable: bundle.readable,
        sql: bundle.sql,
        mongo: bundle.mongo,
        json: bundle.json,
        custom: Some(custom),
    })
}

/// A tree without any condition has nothing to export
pub fn can_export_to_format(tree: &RuleTree, _format: ExportFormat) -> bool {
    tree.condition_count() > 0
}

fn readable_backend(options: &ExportOptions) -> ReadableBackend {
    ReadableBackend {
        options: options.readable.clone(),
    }
}

fn sql_backend(options: &ExportOptions) -> SqlBackend {
    SqlBackend {
        options: options.sql.clone(),
    }
}

fn mongo_backend(options: &ExportOptions) -> MongoBackend {
    MongoBackend {
        options: options.mongo.clone(),
    }
}
