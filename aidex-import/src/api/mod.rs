//! HTTP API handlers for aidex-import

pub mod health;
pub mod import;
pub mod tools;

pub use health::health_routes;
pub use import::import_routes;
pub use tools::tool_routes;
