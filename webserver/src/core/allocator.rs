//! Balanced item-assignment allocator
//!
//! Distributes the item pool across sessions so that every post accumulates
//! roughly the same number of ratings: rank by assignment count with uniform
//! random tie-breaking, take the least-assigned, increment, and hand back the
//! sample in a fresh random order.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::pool::ItemPool;
use shared::PostItem;

/// Stateless selection strategy over an [`ItemPool`].
///
/// Selection and counter increment happen in one call; the caller serializes
/// access to the pool so no two concurrent draws can act on stale counts.
#[derive(Debug, Clone, Default)]
pub struct BalancedAllocator;

impl BalancedAllocator {
    pub fn new() -> Self {
        Self
    }

    /// Draw a balanced sample of `count` items and record the assignments.
    pub fn select_sample(&self, pool: &mut ItemPool, count: usize) -> Vec<PostItem> {
        self.select_sample_with_rng(pool, count, &mut rand::thread_rng())
    }

    /// Same as [`select_sample`](Self::select_sample) with an injected rng,
    /// so tests can drive the selection deterministically.
    pub fn select_sample_with_rng<R: Rng>(
        &self,
        pool: &mut ItemPool,
        count: usize,
        rng: &mut R,
    ) -> Vec<PostItem> {
        let mut selected: Vec<PostItem> = if count >= pool.len() {
            pool.all().to_vec()
        } else {
            let mut candidates: Vec<PostItem> = pool.all().to_vec();

            // Shuffling before a stable sort makes the tie-break uniformly
            // random instead of biased toward dataset order.
            candidates.shuffle(rng);
            candidates.sort_by_key(|item| pool.assignment_count(item.index));
            candidates.truncate(count);
            candidates
        };

        for item in &selected {
            pool.record_assignment(item.index);
        }

        // Fresh shuffle so presentation order carries no signal about how the
        // items ranked during selection.
        selected.shuffle(rng);
        selected
    }
}
