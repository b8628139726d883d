//! # Editing Pipeline
//!
//! Coordinates the full edit lifecycle: Mutate → Lint → Export
//!
//! The Pipeline manages:
//! - Applying mutations through the document (and its history)
//! - Handing back the fresh findings
//! - Re-exporting every output, cached per document version

use crate::{Document, EditorError, Mutation};
use rulecraft_export::{export_all, ExportBundle, ExportOptions};
use rulecraft_linter::Diagnostic;

/// Manages the full edit → export pipeline
pub struct Pipeline {
    document: Document,
    options: ExportOptions,
    last_outputs: Option<(u64, ExportBundle)>,
}

impl Pipeline {
    /// Create pipeline for document
    pub fn new(document: Document) -> Self {
        Self::with_options(document, ExportOptions::default())
    }

    pub fn with_options(document: Document, options: ExportOptions) -> Self {
        Self {
            document,
            options,
            last_outputs: None,
        }
    }

    /// Apply mutation and return the new findings and outputs
    pub fn apply_mutation(&mut self, mutation: Mutation) -> Result<PipelineResult, EditorError> {
        let result = self.document.apply(mutation)?;
        let outputs = self.outputs()?.clone();

        Ok(PipelineResult {
            version: result.version,
            changed: result.changed,
            diagnostics: self.document.diagnostics().to_vec(),
            outputs,
        })
    }

    pub fn undo(&mut self) -> Result<Option<PipelineResult>, EditorError> {
        if !self.document.undo() {
            return Ok(None);
        }
        self.current().map(Some)
    }

    pub fn redo(&mut self) -> Result<Option<PipelineResult>, EditorError> {
        if !self.document.redo() {
            return Ok(None);
        }
        self.current().map(Some)
    }

    /// Outputs for the current version, compiled at most once per version
    pub fn outputs(&mut self) -> Result<&ExportBundle, EditorError> {
        let version = self.document.version;
        let bundle = match self.last_outputs.take() {
            Some((cached, bundle)) if cached == version => bundle,
            _ => {
                tracing::debug!(version, "Re-exporting document");
                export_all(self.document.tree(), self.document.catalog(), &self.options)?
            }
        };
        Ok(&self.last_outputs.insert((version, bundle)).1)
    }

    /// Get current document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Get mutable document reference
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Cached outputs (if any), possibly for an older version
    pub fn last_outputs(&self) -> Option<&ExportBundle> {
        self.last_outputs.as_ref().map(|(_, bundle)| bundle)
    }

    /// Clear output cache (force a full re-export on next request)
    pub fn clear_cache(&mut self) {
        self.last_outputs = None;
    }

    fn current(&mut self) -> Result<PipelineResult, EditorError> {
        let outputs = self.outputs()?.clone();
        Ok(PipelineResult {
            version: self.document.version,
            changed: true,
            diagnostics: self.document.diagnostics().to_vec(),
            outputs,
        })
    }
}

/// Result of pipeline execution
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// New version number
    pub version: u64,

    /// False when the mutation left the tree as it was
    pub changed: bool,

    /// Findings for the new tree
    pub diagnostics: Vec<Diagnostic>,

    /// Every built-in output for the new tree
    pub outputs: ExportBundle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulecraft_model::{Combinator, Condition, FieldCatalog, FieldDef, FieldType, Group, Operator, RuleTree};

    fn document() -> Document {
        let catalog = FieldCatalog::new(vec![FieldDef::new("age", "Age", FieldType::Number)]);
        let tree = RuleTree::new(Group::new("root", Combinator::And).with_children([
            Condition::new("c1", "age", Operator::GreaterThan, 18).into(),
        ]));
        Document::new(tree, catalog)
    }

    #[test]
    fn test_pipeline_initial_outputs() {
        let mut pipeline = Pipeline::new(document());
        assert!(pipeline.last_outputs().is_none());

        let outputs = pipeline.outputs().unwrap();
        assert_eq!(outputs.sql, "age > 18");
        assert!(pipeline.last_outputs().is_some());
    }

    #[test]
    fn test_pipeline_mutation_refreshes_outputs() {
        let mut pipeline = Pipeline::new(document());
        pipeline.outputs().unwrap();

        let result = pipeline
            .apply_mutation(Mutation::ToggleNegate {
                group_id: "root".to_string(),
            })
            .unwrap();

        assert_eq!(result.version, 1);
        assert_eq!(result.outputs.sql, "NOT (age > 18)");
        assert_eq!(result.outputs.readable, "NOT (Age is greater than 18)");

        let undone = pipeline.undo().unwrap().unwrap();
        assert_eq!(undone.outputs.sql, "age > 18");
        assert!(pipeline.undo().unwrap().is_none());
    }
}
