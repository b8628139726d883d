pub mod compile;
pub mod init;
pub mod lint;

pub use compile::{compile, CompileArgs};
pub use init::{init, InitArgs};
pub use lint::{lint, LintArgs};

use crate::config::{Config, DEFAULT_CONFIG_NAME};
use rulecraft_common::load_catalog;
use rulecraft_model::FieldCatalog;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Load the configured field catalog; a missing file yields an empty catalog
pub(crate) fn project_catalog(config: &Config, cwd: &Path) -> anyhow::Result<FieldCatalog> {
    let path = config.catalog_path(cwd);
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Field catalog not found, every field is unknown");
        return Ok(FieldCatalog::default());
    }
    load_catalog(&path).map_err(|err| anyhow::anyhow!("Cannot load catalog {}: {}", path.display(), err))
}

/// Collect rule tree files: the input itself, or every `.json` under it
///
/// The project config and the field catalog are skipped.
pub(crate) fn find_tree_files(input: &Path, config: &Config, cwd: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(anyhow::anyhow!("Input path does not exist: {}", input.display()));
    }

    let catalog = config.catalog_path(cwd).canonicalize().ok();
    let mut files = Vec::new();

    for entry in WalkDir::new(input)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        if path.file_name().and_then(|n| n.to_str()) == Some(DEFAULT_CONFIG_NAME) {
            continue;
        }
        if catalog.is_some() && path.canonicalize().ok() == catalog {
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Resolve a user-supplied path against the project directory
pub(crate) fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_tree_files_skips_config_and_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(DEFAULT_CONFIG_NAME), "{}").unwrap();
        fs::write(root.join("fields.json"), "[]").unwrap();
        fs::create_dir_all(root.join("queries")).unwrap();
        fs::write(root.join("queries/b.json"), "{}").unwrap();
        fs::write(root.join("queries/a.json"), "{}").unwrap();
        fs::write(root.join("queries/notes.txt"), "").unwrap();

        let files = find_tree_files(root, &Config::default(), root).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(find_tree_files(&missing, &Config::default(), dir.path()).is_err());
    }
}
