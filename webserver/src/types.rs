//! Type definitions for the webserver HTTP API
//!
//! Request and response bodies for the survey endpoints. Field names follow
//! the wire format the frontend already speaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use shared::{PostItem, ResponseRecord, SessionSummary};

/// Body of `POST /api/start-session`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    #[serde(default)]
    pub participant_name: String,
}

/// Successful response to `POST /api/start-session`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub session_id: String,
    pub total_items: usize,
    pub message: String,
}

/// Successful response to `GET /api/session/:id/data`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDataResponse {
    pub data: Vec<PostItem>,
    pub total_items: usize,
    pub participant_name: String,
}

/// Body of `POST /api/session/:id/response`
///
/// `item_index` addresses the item's position within the assigned sample;
/// `post_index` and `timestamp` are advisory client bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponseRequest {
    pub item_index: usize,
    #[serde(default)]
    pub post_index: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub responses: ResponseRecord,
}

/// Acknowledgement body shared by the save and submit endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub message: String,
}

/// Body of `POST /api/session/:id/submit`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(default)]
    pub user_responses: BTreeMap<u64, ResponseRecord>,
    #[serde(default)]
    pub completion_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_items: Option<usize>,
    #[serde(default)]
    pub session_summary: Option<SessionSummary>,
}

/// Successful response to `POST /api/session/:id/submit`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub message: String,
    pub filename: String,
}
