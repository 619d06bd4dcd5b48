//! Shared database access for aidex services

pub mod init;

pub use init::{init_database_pool, init_tables};
