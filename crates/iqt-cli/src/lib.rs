//! CLI library components for interaction-query.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod session;
pub mod shell;
pub mod summary;
