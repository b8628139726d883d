//! # Rulecraft Editor
//!
//! Structural editing engine for rule trees.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: RuleTree, FieldCatalog, ids          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Pure, path-copying tree edits            │
//! │  - Bounded undo/redo history                │
//! │  - Re-lint after every change               │
//! │  - Coordinate edit → export pipeline        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ export: readable / SQL / Mongo / JSON       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Trees are values**: an edit returns a new tree, the old one is untouched
//! 2. **Structural sharing**: subtrees off the edited path are shared by `Arc`
//! 3. **History owns snapshots**: undo is a cursor move, not an inverse edit
//! 4. **Findings are data**: validation never fails an edit
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rulecraft_editor::{Document, Mutation};
//!
//! let mut doc = Document::load("adults.json", catalog, Default::default())?;
//!
//! doc.apply(Mutation::AddCondition {
//!     group_id: doc.tree().root_id().to_string(),
//!     condition: None,
//! })?;
//!
//! for finding in doc.diagnostics() {
//!     println!("{}: {}", finding.rule, finding.message);
//! }
//!
//! doc.undo();
//! doc.save()?;
//! ```

mod document;
mod edits;
mod errors;
mod history;
mod mutations;
mod pipeline;
mod rewrite;

pub use document::{Document, DocumentOptions, MutationResult};
pub use edits::{
    add_condition, add_group, clone_node, delete_node, move_node, set_default_combinator,
    set_edge_combinator, toggle_negate, update_condition, update_group,
};
pub use errors::EditorError;
pub use history::{History, HistoryEntry, DEFAULT_HISTORY_LIMIT};
pub use mutations::{ConditionPatch, EditContext, EditResult, GroupPatch, Mutation, MutationError};
pub use pipeline::{Pipeline, PipelineResult};

// Re-export common types for convenience
pub use rulecraft_model::{Combinator, Condition, FieldCatalog, Group, IdGenerator, RuleTree, TreeNode};
