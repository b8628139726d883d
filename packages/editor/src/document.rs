//! # Document Handle
//!
//! A Document owns one rule tree and its editing state: the field catalog
//! it is checked against, the id generator, the undo history and the
//! findings of the latest lint run.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Edit → Lint → Export → Save
//!   ↓      ↓       ↓       ↓       ↓
//! File  History  Findings Outputs File
//! ```
//!
//! Every edit goes through the history; the linter re-runs after every
//! change so [`Document::diagnostics`] always describes the current tree.

use crate::history::{History, DEFAULT_HISTORY_LIMIT};
use crate::mutations::{EditContext, Mutation};
use crate::EditorError;
use rulecraft_common::parse_tree;
use rulecraft_export::{export, ExportFormat, ExportOptions, ExportOutput};
use rulecraft_linter::{lint_tree, Diagnostic, LintOptions};
use rulecraft_model::{FieldCatalog, IdGenerator, OptionPage, RuleTree, SavedQuery, DEFAULT_NAMESPACE};
use std::path::{Path, PathBuf};

/// Editing limits for a document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    /// Deepest allowed group depth (root = 0)
    pub max_depth: Option<usize>,

    /// Snapshots kept by the undo history
    pub history_limit: usize,

    /// Namespace hashed into generated ids
    pub id_namespace: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            id_namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Outcome of applying a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationResult {
    /// Document version after the mutation
    pub version: u64,

    /// False when the edit produced an identical tree (nothing was recorded)
    pub changed: bool,
}

/// Editable rule tree document
#[derive(Debug)]
pub struct Document {
    /// Backing file, if any
    pub path: Option<PathBuf>,

    /// Current version number (increments on each change)
    pub version: u64,

    catalog: FieldCatalog,
    ids: IdGenerator,
    history: History,
    options: DocumentOptions,
    lint_options: LintOptions,
    diagnostics: Vec<Diagnostic>,
    saved: Option<SavedQuery>,
    dirty: bool,
}

impl Document {
    /// Create a memory-backed document
    pub fn new(tree: RuleTree, catalog: FieldCatalog) -> Self {
        Self::with_options(tree, catalog, DocumentOptions::default())
    }

    pub fn with_options(tree: RuleTree, catalog: FieldCatalog, options: DocumentOptions) -> Self {
        let ids = IdGenerator::for_tree(&options.id_namespace, &tree);
        let mut document = Self {
            path: None,
            version: 0,
            catalog,
            ids,
            history: History::with_limit(tree, options.history_limit),
            options,
            lint_options: LintOptions::default(),
            diagnostics: Vec::new(),
            saved: None,
            dirty: false,
        };
        document.relint();
        document
    }

    /// Load a bare tree or a saved query from a JSON file
    pub fn load(path: impl AsRef<Path>, catalog: FieldCatalog, options: DocumentOptions) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let saved = serde_json::from_str::<SavedQuery>(&source).ok();
        let tree = match &saved {
            Some(saved) => saved.tree.clone(),
            None => parse_tree(&source)?,
        };

        let mut document = Self::with_options(tree, catalog, options);
        document.path = Some(path.to_path_buf());
        document.saved = saved;
        tracing::debug!(path = %path.display(), conditions = document.tree().condition_count(), "Loaded document");
        Ok(document)
    }

    pub fn with_lint_options(mut self, lint_options: LintOptions) -> Self {
        self.lint_options = lint_options;
        self.relint();
        self
    }

    pub fn tree(&self) -> &RuleTree {
        self.history.current()
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Findings of the latest lint run, in document order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Apply a mutation; rejected edits leave the document untouched
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let current = self.history.current();
        let mut ctx = EditContext::new(&self.catalog, &mut self.ids).with_max_depth(self.options.max_depth);

        let next = match mutation.apply(current, &mut ctx) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(edit = mutation.label(), error = %err, "Rejected edit");
                return Err(err.into());
            }
        };

        if next == *current {
            return Ok(MutationResult {
                version: self.version,
                changed: false,
            });
        }

        self.history.push(next, Some(mutation.label()));
        self.changed();
        tracing::debug!(edit = mutation.label(), version = self.version, "Applied edit");

        Ok(MutationResult {
            version: self.version,
            changed: true,
        })
    }

    /// Step back in history; false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        if self.history.undo().is_none() {
            return false;
        }
        self.changed();
        true
    }

    /// Step forward in history; false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        if self.history.redo().is_none() {
            return false;
        }
        self.changed();
        true
    }

    /// Group several mutations into one undo step
    pub fn begin_batch(&mut self, description: impl Into<String>) {
        self.history.begin_batch();
        self.history.set_batch_description(description);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    /// Replace the tree and clear history
    pub fn reset(&mut self, tree: RuleTree) {
        self.ids.observe(&tree);
        self.history.reset(tree);
        self.changed();
    }

    /// Merge a resolved option page into a select field and re-lint
    ///
    /// Also bumps the version.
    pub fn merge_options(&mut self, field: &str, page: OptionPage) -> bool {
        let merged = self.catalog.merge_options(field, page);
        if merged {
            self.version += 1;
            self.relint();
        }
        merged
    }

    /// Replace the catalog and re-lint
    pub fn set_catalog(&mut self, catalog: FieldCatalog) {
        self.catalog = catalog;
        self.version += 1;
        self.relint();
    }

    pub fn export(&self, format: ExportFormat, options: &ExportOptions) -> Result<ExportOutput, EditorError> {
        Ok(export(self.tree(), &self.catalog, format, options)?)
    }

    /// Snapshot the current tree as a saved query
    pub fn to_saved_query(&self, name: impl Into<String>) -> SavedQuery {
        let name = name.into();
        match &self.saved {
            Some(saved) if saved.name == name => {
                let mut saved = saved.clone();
                saved.update_tree(self.tree().clone());
                saved
            }
            _ => SavedQuery::new(name, self.tree().clone()),
        }
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        let path = self.path.clone().ok_or(EditorError::NotFileBacked)?;
        self.write_to(&path)
    }

    /// Save to a new path and make it the backing file
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), EditorError> {
        let path = path.into();
        self.write_to(&path)?;
        self.path = Some(path);
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> Result<(), EditorError> {
        let json = match &mut self.saved {
            Some(saved) => {
                saved.update_tree(self.history.current().clone());
                serde_json::to_string_pretty(saved)?
            }
            None => serde_json::to_string_pretty(self.history.current())?,
        };
        std::fs::write(path, json)?;
        self.dirty = false;
        tracing::debug!(path = %path.display(), "Saved document");
        Ok(())
    }

    fn changed(&mut self) {
        self.version += 1;
        self.dirty = true;
        self.relint();
    }

    fn relint(&mut self) {
        self.diagnostics = lint_tree(self.history.current(), &self.catalog, &self.lint_options);
    }
}
