use rulecraft_editor::{DocumentOptions, DEFAULT_HISTORY_LIMIT};
use rulecraft_export::{ExportFormat, ExportOptions};
use rulecraft_linter::LintOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "rulecraft.config.json";

/// Rulecraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Field catalog file, relative to the project directory
    #[serde(default = "default_catalog")]
    pub catalog: String,

    /// Deepest allowed group depth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Undo snapshots kept per document
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Output formats written by `compile`
    #[serde(default = "default_emit")]
    pub emit: Vec<ExportFormat>,

    /// chrono pattern for dates in readable output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,

    /// Lint rules to skip
    #[serde(default)]
    pub disabled_rules: Vec<String>,

    /// Optional output directory for `compile`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
}

fn default_catalog() -> String {
    "fields.json".to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_emit() -> Vec<ExportFormat> {
    vec![ExportFormat::Readable, ExportFormat::Sql, ExportFormat::Mongo]
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|err| anyhow::anyhow!("Invalid {}: {}", DEFAULT_CONFIG_NAME, err))?;
            tracing::debug!(path = %config_path.display(), "Loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the field catalog
    pub fn catalog_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.catalog)
    }

    pub fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            max_depth: self.max_depth,
            history_limit: self.history_limit,
            ..Default::default()
        }
    }

    pub fn lint_options(&self) -> LintOptions {
        LintOptions {
            disabled: self.disabled_rules.clone(),
            ..Default::default()
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        let mut options = ExportOptions::default();
        if let Some(date_format) = &self.date_format {
            options.readable.date_format = date_format.clone();
        }
        options
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            max_depth: None,
            history_limit: default_history_limit(),
            emit: default_emit(),
            date_format: None,
            disabled_rules: vec![],
            out_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "catalog": "schema/fields.json",
            "maxDepth": 3,
            "historyLimit": 10,
            "emit": ["sql", "mongo"],
            "dateFormat": "%d/%m/%Y",
            "disabledRules": ["empty-group"],
            "outDir": "dist"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.catalog, "schema/fields.json");
        assert_eq!(config.max_depth, Some(3));
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.emit, vec![ExportFormat::Sql, ExportFormat::Mongo]);
        assert_eq!(config.disabled_rules, vec!["empty-group"]);
        assert_eq!(config.out_dir, Some("dist".to_string()));

        assert_eq!(config.document_options().max_depth, Some(3));
        assert_eq!(config.document_options().history_limit, 10);
        assert_eq!(config.lint_options().disabled, vec!["empty-group"]);
        assert_eq!(config.export_options().readable.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog, "fields.json");
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
        assert_eq!(config.emit.len(), 3);
        assert!(config.disabled_rules.is_empty());

        let parsed: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.catalog_path(dir.path()), dir.path().join("fields.json"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "emit": ["pdf"] }"#).unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
