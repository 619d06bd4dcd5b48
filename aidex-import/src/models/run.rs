//! Import run state machine
//!
//! A run progresses RUNNING → (STOPPING) → terminal. The durable artifact
//! of a run is its `import_logs` rows; this status record is in-memory
//! only and served by `GET /import/status`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Import run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunState {
    /// Run in progress
    Running,
    /// Stop requested; finishing the record currently in flight
    Stopping,
    /// All sources processed
    Completed,
    /// Halted at a cooperative check point; partial counts kept
    Stopped,
    /// Run-level failure (not per-record errors, which are absorbed)
    Failed,
}

/// Per-source counters accumulated during a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceCounters {
    pub source: String,
    pub fetched: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl SourceCounters {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }
}

/// In-memory status of the current (or most recent) import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatus {
    pub run_id: Uuid,
    pub state: RunState,
    /// Sources this run covers (one name, or all configured)
    pub sources: Vec<String>,
    /// Counters per source, in processing order
    pub counters: Vec<SourceCounters>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl RunStatus {
    /// Create new run status in the Running state
    pub fn new(sources: Vec<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            state: RunState::Running,
            sources,
            counters: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Transition to new state, stamping `ended_at` on terminal states
    pub fn transition_to(&mut self, new_state: RunState) {
        self.state = new_state;
        if self.is_terminal() {
            self.ended_at = Some(Utc::now());
        }
    }

    /// Check if the run has finished
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            RunState::Completed | RunState::Stopped | RunState::Failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_is_running() {
        let status = RunStatus::new(vec!["huggingface".to_string()]);
        assert_eq!(status.state, RunState::Running);
        assert!(!status.is_terminal());
        assert!(status.ended_at.is_none());
    }

    #[test]
    fn test_terminal_transition_sets_ended_at() {
        let mut status = RunStatus::new(vec!["huggingface".to_string()]);
        status.transition_to(RunState::Stopping);
        assert!(status.ended_at.is_none());

        status.transition_to(RunState::Stopped);
        assert!(status.is_terminal());
        assert!(status.ended_at.is_some());
    }
}
