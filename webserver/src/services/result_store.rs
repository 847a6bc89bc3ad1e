//! File-backed result store
//!
//! Writes one pretty-printed JSON file per completed session into the results
//! directory and rebuilds the used-name ledger from that directory at
//! startup.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{WebServerError, WebServerResult};
use crate::traits::ResultStore;
use shared::CompletedSession;

/// Real result store persisting to a local directory.
#[derive(Debug, Clone)]
pub struct RealResultStore {
    results_dir: PathBuf,
}

impl RealResultStore {
    pub fn new<P: AsRef<Path>>(results_dir: P) -> Self {
        Self {
            results_dir: results_dir.as_ref().to_path_buf(),
        }
    }

    /// Sanitize a participant name for use inside a filename.
    ///
    /// Keeps alphanumeric characters (Unicode-aware, so CJK names survive)
    /// and replaces everything else with underscores.
    fn sanitize_name(name: &str) -> String {
        name.chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect()
    }

    /// Filename for one record. The session id is embedded, so records of
    /// distinct sessions can never collide.
    fn record_filename(record: &CompletedSession) -> String {
        format!(
            "session_{}_{}.json",
            record.session_id,
            Self::sanitize_name(&record.participant_name)
        )
    }
}

#[async_trait]
impl ResultStore for RealResultStore {
    async fn persist(&self, record: &CompletedSession) -> WebServerResult<String> {
        fs::create_dir_all(&self.results_dir).await.map_err(|e| {
            WebServerError::persistence(format!(
                "cannot create results directory {}: {e}",
                self.results_dir.display()
            ))
        })?;

        let filename = Self::record_filename(record);
        let final_path = self.results_dir.join(&filename);
        let tmp_path = self.results_dir.join(format!("{filename}.tmp"));

        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| WebServerError::persistence(format!("cannot serialize record: {e}")))?;

        // Write-then-rename keeps a re-submit from ever leaving a truncated
        // record behind; a rename onto the same session's file is the
        // documented last-submit-wins behavior.
        fs::write(&tmp_path, contents).await.map_err(|e| {
            WebServerError::persistence(format!("cannot write {}: {e}", tmp_path.display()))
        })?;
        fs::rename(&tmp_path, &final_path).await.map_err(|e| {
            WebServerError::persistence(format!("cannot finalize {}: {e}", final_path.display()))
        })?;

        tracing::info!("💾 Stored completed session record {filename}");
        Ok(filename)
    }

    async fn load_used_names(&self) -> WebServerResult<HashSet<String>> {
        let mut names = HashSet::new();

        let mut entries = match fs::read_dir(&self.results_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "Results directory {} does not exist yet, starting with an empty name ledger",
                    self.results_dir.display()
                );
                return Ok(names);
            }
            Err(e) => {
                return Err(WebServerError::persistence(format!(
                    "cannot read results directory {}: {e}",
                    self.results_dir.display()
                )));
            }
        };

        let mut scanned = 0usize;
        while let Some(entry) = entries.next_entry().await.map_err(WebServerError::IoError)? {
            let path = entry.path();
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !filename.starts_with("session_") || !filename.ends_with(".json") {
                continue;
            }

            scanned += 1;
            match fs::read_to_string(&path).await {
                Ok(raw) => match serde_json::from_str::<CompletedSession>(&raw) {
                    Ok(record) => {
                        names.insert(record.participant_name);
                    }
                    Err(e) => {
                        tracing::warn!("Skipping unparseable result file {filename}: {e}");
                    }
                },
                Err(e) => {
                    tracing::warn!("Skipping unreadable result file {filename}: {e}");
                }
            }
        }

        tracing::info!(
            "Loaded {} used participant names from {} result files",
            names.len(),
            scanned
        );
        Ok(names)
    }
}
