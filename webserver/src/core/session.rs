//! Per-participant session state
//!
//! A session owns the participant's assigned sample, the responses captured
//! so far, and a progress pointer. Sessions are held in memory only; the
//! durable record is built at final submission.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::error::{WebServerError, WebServerResult};
use crate::types::SubmitRequest;
use shared::{CompletedSession, PostItem, ResponseRecord, SessionSummary};

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub participant_name: String,
    /// Assigned sample, in the presentation order handed to the client
    pub items: Vec<PostItem>,
    /// Client-reported first-note order per post index
    pub note_assignments: HashMap<u64, String>,
    /// Captured responses keyed by post index
    pub responses: HashMap<u64, ResponseRecord>,
    /// One past the highest item position answered so far
    pub progress: usize,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: String, participant_name: String, items: Vec<PostItem>) -> Self {
        Self {
            id,
            participant_name,
            items,
            note_assignments: HashMap::new(),
            responses: HashMap::new(),
            progress: 0,
            started_at: Utc::now(),
        }
    }

    /// Upsert the response for the item at `item_index` within the assigned
    /// sample. Out-of-range positions are rejected before any state changes.
    pub fn record_response(
        &mut self,
        item_index: usize,
        response: ResponseRecord,
    ) -> WebServerResult<()> {
        let Some(item) = self.items.get(item_index) else {
            return Err(WebServerError::ItemIndexOutOfRange {
                index: item_index,
                total: self.items.len(),
            });
        };

        let post_index = item.index;
        if !response.note_mapping.is_empty() {
            self.note_assignments
                .insert(post_index, response.note_mapping.clone());
        }
        self.responses.insert(post_index, response);
        self.progress = self.progress.max(item_index + 1);
        Ok(())
    }

    /// Build the immutable record persisted at final submission.
    ///
    /// The submitted response map wins over incrementally saved responses
    /// (the client sends its complete picture); assigned-item data stays out
    /// of the record.
    pub fn build_final_record(&self, submission: SubmitRequest) -> CompletedSession {
        let user_responses = if submission.user_responses.is_empty() {
            self.responses
                .iter()
                .map(|(&post_index, record)| (post_index, record.clone()))
                .collect()
        } else {
            submission.user_responses
        };

        let session_summary = submission.session_summary.unwrap_or_else(|| SessionSummary {
            evaluated_posts: user_responses.len(),
            start_time: self.started_at.to_rfc3339(),
        });

        CompletedSession {
            participant_name: self.participant_name.clone(),
            session_id: self.id.clone(),
            start_time: self.started_at,
            completion_time: submission.completion_time.unwrap_or_else(Utc::now),
            total_items_assigned: submission.total_items.unwrap_or(self.items.len()),
            session_summary,
            user_responses,
        }
    }
}
