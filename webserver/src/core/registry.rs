//! Session registry: live sessions, the participant-name ledger, and the
//! item pool behind one facade
//!
//! Pure business logic; the server wraps a registry in a `tokio::sync::Mutex`
//! so every operation here runs under one lock. That makes the allocator's
//! "rank, select, increment" sequence atomic against concurrent session
//! creation, and name-check-then-insert atomic against duplicate names.

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::core::allocator::BalancedAllocator;
use crate::core::pool::{AssignmentStats, ItemPool};
use crate::core::session::Session;
use crate::error::{WebServerError, WebServerResult};
use crate::types::SubmitRequest;
use shared::{CompletedSession, PostItem, ResponseRecord};

pub struct StudyRegistry {
    pool: ItemPool,
    allocator: BalancedAllocator,
    sessions: HashMap<String, Session>,
    /// Names that may never start another session (completed participants)
    used_names: HashSet<String>,
    items_per_session: usize,
}

/// Counters for the diagnostics endpoint.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    pub active_sessions: usize,
    pub total_items: usize,
    pub items_per_session: usize,
    pub used_names: Vec<String>,
    pub assignment_stats: AssignmentStats,
}

impl StudyRegistry {
    pub fn new(pool: ItemPool, used_names: HashSet<String>, items_per_session: usize) -> Self {
        Self {
            pool,
            allocator: BalancedAllocator::new(),
            sessions: HashMap::new(),
            used_names,
            items_per_session,
        }
    }

    /// Start a session for `participant_name` (already trimmed and
    /// validated non-empty by the caller).
    ///
    /// Returns the fresh session id and the assigned sample size.
    pub fn create_session(&mut self, participant_name: &str) -> WebServerResult<(String, usize)> {
        if self.used_names.contains(participant_name) {
            return Err(WebServerError::DuplicateName {
                name: participant_name.to_string(),
            });
        }

        if self
            .sessions
            .values()
            .any(|session| session.participant_name == participant_name)
        {
            return Err(WebServerError::NameInUse {
                name: participant_name.to_string(),
            });
        }

        let items = self
            .allocator
            .select_sample(&mut self.pool, self.items_per_session);
        let total_items = items.len();

        // v7 = millisecond timestamp + random bits, so ids are both
        // unpredictable and collision-free across the process lifetime
        let session_id = Uuid::now_v7().to_string();
        let session = Session::new(session_id.clone(), participant_name.to_string(), items);
        self.sessions.insert(session_id.clone(), session);

        Ok((session_id, total_items))
    }

    /// The assigned sample and participant name for one session
    pub fn session_data(&self, session_id: &str) -> WebServerResult<(Vec<PostItem>, String)> {
        let session = self.get_session(session_id)?;
        Ok((session.items.clone(), session.participant_name.clone()))
    }

    /// Upsert one item response (advisory incremental save)
    pub fn record_response(
        &mut self,
        session_id: &str,
        item_index: usize,
        response: ResponseRecord,
    ) -> WebServerResult<u64> {
        let session = self.get_session_mut(session_id)?;
        session.record_response(item_index, response)?;
        Ok(session.items[item_index].index)
    }

    /// Build the durable record for a final submission
    pub fn finalize_submission(
        &self,
        session_id: &str,
        submission: SubmitRequest,
    ) -> WebServerResult<CompletedSession> {
        let session = self.get_session(session_id)?;
        Ok(session.build_final_record(submission))
    }

    /// Permanently retire a participant name after a completed submission.
    ///
    /// Idempotent: a duplicate submit before the cleanup grace period only
    /// re-inserts the same name.
    pub fn retire_name(&mut self, name: &str) {
        self.used_names.insert(name.to_string());
    }

    /// Evict a session from memory. Returns whether it was still present.
    pub fn remove_session(&mut self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    pub fn active_session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Diagnostics snapshot
    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut used_names: Vec<String> = self.used_names.iter().cloned().collect();
        used_names.sort();

        RegistrySnapshot {
            active_sessions: self.sessions.len(),
            total_items: self.pool.len(),
            items_per_session: self.items_per_session,
            used_names,
            assignment_stats: self.pool.assignment_stats(),
        }
    }

    fn get_session(&self, session_id: &str) -> WebServerResult<&Session> {
        self.sessions
            .get(session_id)
            .ok_or_else(|| WebServerError::SessionNotFound {
                session_id: session_id.to_string(),
            })
    }

    fn get_session_mut(&mut self, session_id: &str) -> WebServerResult<&mut Session> {
        self.sessions
            .get_mut(session_id)
            .ok_or_else(|| WebServerError::SessionNotFound {
                session_id: session_id.to_string(),
            })
    }
}
