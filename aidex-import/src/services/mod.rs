//! Import pipeline services

pub mod duplicate_detector;
pub mod import_coordinator;
pub mod normalizer;

pub use duplicate_detector::{detect, Match};
pub use import_coordinator::ImportCoordinator;
pub use normalizer::{normalize, Outcome};
