//! Core survey data model used throughout the system
//!
//! These types mirror the JSON wire format consumed by the frontend, so the
//! serde attribute names are part of the external contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One evaluatable item: a social-media post paired with a community-written
/// note and an LLM-generated note.
///
/// Items are loaded once at startup and never mutated. Unknown dataset fields
/// (post text, author metadata, …) are carried through `extra` so the client
/// receives exactly what the dataset provides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostItem {
    /// Stable unique identifier of the post within the dataset
    pub index: u64,

    /// Community-written annotation
    #[serde(default)]
    pub community_notes: String,

    /// Model-generated annotation
    #[serde(default, rename = "LLM_notes")]
    pub llm_notes: String,

    /// Optional explicit media reference; post images are otherwise resolved
    /// by the `img/post<index>.png` convention under the data mount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_ref: Option<String>,

    /// Passthrough for dataset fields the server does not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Sub-dimension ratings for a single note.
///
/// Values are captured exactly as the client reports them; mid-session they
/// are legitimately empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingDetails {
    #[serde(default)]
    pub source_quality: String,
    #[serde(default)]
    pub clarity: String,
    #[serde(default)]
    pub coverage: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub impartiality: String,
}

/// Ratings for one note: the primary helpfulness rating plus the named
/// sub-dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteRating {
    #[serde(default)]
    pub helpfulness: String,
    #[serde(default)]
    pub details: RatingDetails,
}

/// The full rating payload for one post.
///
/// `note_mapping` records which note the client showed first
/// (`"community_first"` or `"llm_first"`); the server stores it verbatim and
/// never interprets the blinding scheme. `comparison` holds the
/// paired-comparison choice (`"community_note"` or `"llm_note"`). A repeated
/// save for the same post replaces the stored record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    #[serde(default)]
    pub post_index: Option<u64>,
    #[serde(default)]
    pub note_mapping: String,
    #[serde(default)]
    pub community_note: NoteRating,
    #[serde(default)]
    pub llm_note: NoteRating,
    #[serde(default)]
    pub comparison: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Client-reported summary attached to a final submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    #[serde(default)]
    pub evaluated_posts: usize,
    /// Reported as an ISO timestamp by the frontend, or `"unknown"`
    #[serde(default)]
    pub start_time: String,
}

/// The durable record written when a participant submits.
///
/// Raw assigned-item data is deliberately excluded so stored results never
/// redistribute the source dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSession {
    pub participant_name: String,
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    pub completion_time: DateTime<Utc>,
    pub total_items_assigned: usize,
    pub session_summary: SessionSummary,
    /// Response map keyed by post index
    #[serde(default)]
    pub user_responses: BTreeMap<u64, ResponseRecord>,
}
