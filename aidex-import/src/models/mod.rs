//! Data models for aidex-import

pub mod candidate;
pub mod run;
pub mod tool;

pub use candidate::CandidateRecord;
pub use run::{RunState, RunStatus, SourceCounters};
pub use tool::{NormalizedTool, Pricing};
