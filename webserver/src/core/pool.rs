//! Item pool: the immutable post collection and its assignment counters
//!
//! Loaded once at startup; afterwards only the counters change, and only
//! through the allocator's select-then-increment sequence.

use std::collections::{BTreeMap, HashMap};

use crate::error::{WebServerError, WebServerResult};
use shared::PostItem;

/// The pool of evaluatable posts plus per-post assignment counts.
#[derive(Debug)]
pub struct ItemPool {
    items: Vec<PostItem>,
    assignment_counts: HashMap<u64, u32>,
}

/// Snapshot of the assignment counters for the diagnostics endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStats {
    pub total_assignments: u64,
    pub min_assignments: u32,
    pub max_assignments: u32,
    pub per_item: BTreeMap<u64, u32>,
}

impl ItemPool {
    /// Create a pool from already-parsed items.
    ///
    /// Rejects an empty collection and duplicate post indices; both indicate
    /// a broken dataset rather than a condition worth limping through.
    pub fn new(items: Vec<PostItem>) -> WebServerResult<Self> {
        if items.is_empty() {
            return Err(WebServerError::data_load("item dataset is empty"));
        }

        let mut assignment_counts = HashMap::with_capacity(items.len());
        for item in &items {
            if assignment_counts.insert(item.index, 0).is_some() {
                return Err(WebServerError::data_load(format!(
                    "duplicate post index {} in item dataset",
                    item.index
                )));
            }
        }

        Ok(Self { items, assignment_counts })
    }

    /// Parse a pool from the raw dataset JSON (an array of posts).
    pub fn from_json(raw: &str) -> WebServerResult<Self> {
        let items: Vec<PostItem> = serde_json::from_str(raw)
            .map_err(|e| WebServerError::data_load(format!("malformed item dataset: {e}")))?;
        Self::new(items)
    }

    /// The full immutable item collection
    pub fn all(&self) -> &[PostItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current assignment count for one post
    pub fn assignment_count(&self, index: u64) -> u32 {
        self.assignment_counts.get(&index).copied().unwrap_or(0)
    }

    /// Record that a post was handed to one more session.
    ///
    /// Counters never decrease, even when a session is abandoned; that bounds
    /// worst-case over-sampling instead of tracking completed exposure.
    pub fn record_assignment(&mut self, index: u64) {
        if let Some(count) = self.assignment_counts.get_mut(&index) {
            *count += 1;
        }
    }

    /// Snapshot the counters for diagnostics
    pub fn assignment_stats(&self) -> AssignmentStats {
        let per_item: BTreeMap<u64, u32> =
            self.assignment_counts.iter().map(|(&k, &v)| (k, v)).collect();

        let total_assignments: u64 = per_item.values().map(|&c| u64::from(c)).sum();
        let min_assignments = per_item.values().copied().min().unwrap_or(0);
        let max_assignments = per_item.values().copied().max().unwrap_or(0);

        AssignmentStats {
            total_assignments,
            min_assignments,
            max_assignments,
            per_item,
        }
    }
}
