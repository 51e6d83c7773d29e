pub mod coaching;
pub mod config;
pub mod error;
pub mod telemetry;
