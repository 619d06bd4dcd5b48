//! Database access for aidex-import
//!
//! Tools and import log persistence over the shared SQLite pool. Pool and
//! table initialization live in `aidex_common::db`.

pub mod import_logs;
pub mod tools;
