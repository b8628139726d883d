//! # Undo/Redo History
//!
//! Bounded linear log of tree snapshots.
//!
//! ## Design
//!
//! - Every tree-changing edit pushes the new tree
//! - Undo/redo move a cursor over the log; nothing is recomputed
//! - Pushing while not at the tip discards the redo tail
//! - Exceeding the limit drops the oldest entry
//! - Batches collapse several pushes into one undo step
//!
//! Snapshots share structure, so keeping fifty of them costs little more
//! than the paths the edits rebuilt.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(tree);
//! history.push(next, Some("Add condition"));
//!
//! let previous = history.undo();
//! let again = history.redo();
//! ```

use rulecraft_model::RuleTree;

/// Default number of snapshots kept
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// One snapshot in the log
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub tree: RuleTree,

    /// Label of the edit that produced this snapshot
    pub description: Option<String>,
}

#[derive(Debug, Default)]
struct Batch {
    description: Option<String>,

    /// Index of the snapshot this batch writes into
    entry: Option<usize>,
}

#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,

    /// Index of the current snapshot
    cursor: usize,

    /// Maximum number of snapshots (0 = unlimited)
    limit: usize,

    batch: Option<Batch>,
}

impl History {
    pub fn new(initial: RuleTree) -> Self {
        Self::with_limit(initial, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(initial: RuleTree, limit: usize) -> Self {
        Self {
            entries: vec![HistoryEntry {
                tree: initial,
                description: None,
            }],
            cursor: 0,
            limit,
            batch: None,
        }
    }

    pub fn current(&self) -> &RuleTree {
        &self.entries[self.cursor].tree
    }

    /// Record a new current tree
    pub fn push(&mut self, tree: RuleTree, description: Option<&str>) {
        if let Some(Batch { entry: Some(index), .. }) = &self.batch {
            if *index == self.cursor {
                self.entries[self.cursor].tree = tree;
                return;
            }
        }

        let description = match &self.batch {
            Some(batch) => batch.description.clone().or(description.map(str::to_string)),
            None => description.map(str::to_string),
        };

        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry { tree, description });
        self.cursor += 1;

        if self.limit > 0 && self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
            self.cursor -= excess;
        }

        if let Some(batch) = &mut self.batch {
            batch.entry = Some(self.cursor);
        }
    }

    /// Step back; returns the tree now current
    pub fn undo(&mut self) -> Option<&RuleTree> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Step forward; returns the tree now current
    pub fn redo(&mut self) -> Option<&RuleTree> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn undo_levels(&self) -> usize {
        self.cursor
    }

    pub fn redo_levels(&self) -> usize {
        self.entries.len() - self.cursor - 1
    }

    /// Number of snapshots in the log, including the current one
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Clear the log down to a single snapshot
    pub fn reset(&mut self, tree: RuleTree) {
        self.entries = vec![HistoryEntry {
            tree,
            description: None,
        }];
        self.cursor = 0;
        self.batch = None;
    }

    /// Description of the edit the next undo reverts
    pub fn undo_description(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.entries[self.cursor].description.as_deref()
    }

    /// Description of the edit the next redo reapplies
    pub fn redo_description(&self) -> Option<&str> {
        self.entries
            .get(self.cursor + 1)
            .and_then(|entry| entry.description.as_deref())
    }

    /// Start a batch; pushes until [`History::end_batch`] form one undo step
    pub fn begin_batch(&mut self) {
        self.batch = Some(Batch::default());
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.batch {
            let description = description.into();
            if let Some(entry) = batch.entry.and_then(|index| self.entries.get_mut(index)) {
                entry.description = Some(description.clone());
            }
            batch.description = Some(description);
        }
    }

    pub fn end_batch(&mut self) {
        self.batch = None;
    }

    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }
}
