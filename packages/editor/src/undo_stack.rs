//! # Undo/Redo Stack
//!
//! Tracks mutation history and enables undo/redo operations.
//!
//! ## Design
//!
//! - Each mutation records its inverse before being applied
//! - Undo applies the inverses and moves the batch to the redo stack
//! - Redo reapplies the original mutations
//! - New mutations clear the redo stack
//! - Supports batched operations (group multiple mutations as one undo step)
//! - Consecutive rapid edits of the same kind (typing, dragging) coalesce
//!   into a single undo step via a rolling merge window

use std::time::{SystemTime, UNIX_EPOCH};

use pagecraft_document::{ComponentTree, TreeError};
use thiserror::Error;
use tracing::debug;

use crate::mutations::{MergeCategory, Mutation};

/// Rapid same-category edits within this window collapse into one step
pub const MERGE_WINDOW_MS: u64 = 1000;

/// Default number of retained undo levels
pub const DEFAULT_MAX_LEVELS: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("A batch is already being recorded")]
    BatchInProgress,

    #[error("No batch in progress")]
    NoBatchInProgress,
}

/// A group of mutations that are undone/redone together
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// The mutations in this batch (in application order)
    pub mutations: Vec<Mutation>,

    /// The inverse mutations (in reverse order for undo)
    pub inverses: Vec<Mutation>,

    /// Optional description of this batch
    pub description: Option<String>,

    /// Set only for implicit single-mutation batches; explicit batches
    /// never merge
    pub merge_category: Option<MergeCategory>,

    /// When the most recent mutation in this batch landed
    pub timestamp_ms: u64,
}

impl MutationBatch {
    fn empty(now_ms: u64) -> Self {
        Self {
            mutations: Vec::new(),
            inverses: Vec::new(),
            description: None,
            merge_category: None,
            timestamp_ms: now_ms,
        }
    }

    /// Create a single-mutation batch
    pub fn single(mutation: Mutation, inverse: Mutation, now_ms: u64) -> Self {
        let merge_category = mutation.merge_category();
        Self {
            mutations: vec![mutation],
            inverses: vec![inverse],
            description: None,
            merge_category,
            timestamp_ms: now_ms,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Undo/redo stack over a page's component tree
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied batches (most recent last)
    undo_stack: Vec<MutationBatch>,

    /// Stack of undone batches (most recent last)
    redo_stack: Vec<MutationBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<MutationBatch>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Apply a mutation and record it for undo
    pub fn apply(
        &mut self,
        mutation: &Mutation,
        tree: &mut ComponentTree,
    ) -> Result<(), TreeError> {
        self.apply_at(mutation, tree, None, current_timestamp_ms())
    }

    /// Apply a mutation with an explicit history description
    pub fn apply_described(
        &mut self,
        mutation: &Mutation,
        tree: &mut ComponentTree,
        description: impl Into<String>,
    ) -> Result<(), TreeError> {
        self.apply_at(mutation, tree, Some(description.into()), current_timestamp_ms())
    }

    /// Apply with an injected clock, used by the merge-window tests
    pub fn apply_at(
        &mut self,
        mutation: &Mutation,
        tree: &mut ComponentTree,
        description: Option<String>,
        now_ms: u64,
    ) -> Result<(), TreeError> {
        // Generate inverse before applying
        let inverse = mutation.to_inverse(tree)?;
        mutation.apply(tree)?;

        if let Some(batch) = &mut self.current_batch {
            batch.mutations.push(mutation.clone());
            batch.inverses.insert(0, inverse); // Inverses go in reverse order
            batch.timestamp_ms = now_ms;
            if batch.description.is_none() {
                batch.description = description;
            }
        } else {
            let mut batch = MutationBatch::single(mutation.clone(), inverse, now_ms);
            batch.description = description;
            self.push_batch(batch, now_ms);
        }

        Ok(())
    }

    /// Start a batch of mutations (undone/redone together).
    ///
    /// Fails if a batch is already open; nesting is not supported.
    pub fn begin_batch(
        &mut self,
        description: Option<String>,
    ) -> Result<(), HistoryError> {
        if self.current_batch.is_some() {
            return Err(HistoryError::BatchInProgress);
        }
        let mut batch = MutationBatch::empty(current_timestamp_ms());
        batch.description = description;
        self.current_batch = Some(batch);
        Ok(())
    }

    /// Commit the current batch to the undo stack.
    ///
    /// Empty batches are discarded without becoming an undo step.
    pub fn end_batch(&mut self) -> Result<(), HistoryError> {
        let batch = self
            .current_batch
            .take()
            .ok_or(HistoryError::NoBatchInProgress)?;
        if !batch.mutations.is_empty() {
            let now_ms = batch.timestamp_ms;
            self.push_batch(batch, now_ms);
        }
        Ok(())
    }

    /// Abort the current batch, rolling back its applied mutations
    pub fn cancel_batch(&mut self, tree: &mut ComponentTree) -> Result<(), HistoryError> {
        let batch = self
            .current_batch
            .take()
            .ok_or(HistoryError::NoBatchInProgress)?;
        for inverse in &batch.inverses {
            if let Err(error) = inverse.apply(tree) {
                // Inverses were captured against the exact states they
                // revert, so this only fires on outside interference.
                debug!(%error, "rollback inverse failed");
            }
        }
        Ok(())
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    /// Push a batch, merging with the previous step when both are
    /// implicit same-category edits inside the merge window.
    fn push_batch(&mut self, batch: MutationBatch, now_ms: u64) {
        let redo_was_empty = self.redo_stack.is_empty();
        self.redo_stack.clear();

        if redo_was_empty {
            if let (Some(category), Some(last)) =
                (batch.merge_category, self.undo_stack.last_mut())
            {
                let within_window =
                    now_ms.saturating_sub(last.timestamp_ms) <= MERGE_WINDOW_MS;
                if last.merge_category == Some(category) && within_window {
                    // Undo unwinds newest-first, so the incoming inverses
                    // go in front; redo replays the whole burst in order.
                    let mut inverses = batch.inverses;
                    inverses.append(&mut last.inverses);
                    last.inverses = inverses;
                    last.mutations.extend(batch.mutations);
                    last.timestamp_ms = now_ms;
                    if last.description.is_none() {
                        last.description = batch.description;
                    }
                    return;
                }
            }
        }

        self.undo_stack.push(batch);
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the most recent batch.
    ///
    /// The batch moves to the redo stack only once every inverse has
    /// landed; on failure (e.g. undoing against the wrong tree) any
    /// partially undone mutations are replayed and the entry stays on
    /// the undo stack.
    pub fn undo(&mut self, tree: &mut ComponentTree) -> Result<bool, TreeError> {
        let Some(batch) = self.undo_stack.pop() else {
            return Ok(false);
        };
        for (applied, inverse) in batch.inverses.iter().enumerate() {
            if let Err(error) = inverse.apply(tree) {
                // inverses run newest-first, so `applied` inverses undid
                // the last `applied` mutations; replay that tail in order
                let skip = batch.mutations.len() - applied;
                for mutation in batch.mutations.iter().skip(skip) {
                    if let Err(error) = mutation.apply(tree) {
                        debug!(%error, "replay after failed undo");
                    }
                }
                self.undo_stack.push(batch);
                return Err(error);
            }
        }
        self.redo_stack.push(batch);
        Ok(true)
    }

    /// Redo the most recently undone batch.
    ///
    /// On failure the partially reapplied mutations are unwound and the
    /// entry stays on the redo stack.
    pub fn redo(&mut self, tree: &mut ComponentTree) -> Result<bool, TreeError> {
        let Some(batch) = self.redo_stack.pop() else {
            return Ok(false);
        };
        for (applied, mutation) in batch.mutations.iter().enumerate() {
            if let Err(error) = mutation.apply(tree) {
                let skip = batch.inverses.len() - applied;
                for inverse in batch.inverses.iter().skip(skip) {
                    if let Err(error) = inverse.apply(tree) {
                        debug!(%error, "unwind after failed redo");
                    }
                }
                self.redo_stack.push(batch);
                return Err(error);
            }
        }
        self.undo_stack.push(batch);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
