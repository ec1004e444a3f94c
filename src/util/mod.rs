//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod process;

pub use config::Config;
pub use diagnostic::Diagnostic;
