//! # Aidex Common Library
//!
//! Shared code for the aidex services including:
//! - Error types
//! - Configuration loading and data directory resolution
//! - Database pool initialization and table creation

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
