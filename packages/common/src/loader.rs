use crate::result::CommonResult;
use rulecraft_model::{FieldCatalog, RuleTree, SavedQuery};
use serde::Deserialize;
use std::path::Path;

/// A tree file holds either a bare tree or a saved-query record
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTree {
    Saved(Box<SavedQuery>),
    Bare(RuleTree),
}

/// Parse a tree from JSON, accepting a bare tree or a saved query
pub fn parse_tree(json: &str) -> CommonResult<RuleTree> {
    let stored: StoredTree = serde_json::from_str(json)?;
    Ok(match stored {
        StoredTree::Saved(saved) => saved.tree,
        StoredTree::Bare(tree) => tree,
    })
}

pub fn load_tree(path: &Path) -> CommonResult<RuleTree> {
    let source = std::fs::read_to_string(path)?;
    parse_tree(&source)
}

pub fn load_catalog(path: &Path) -> CommonResult<FieldCatalog> {
    let source = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}
