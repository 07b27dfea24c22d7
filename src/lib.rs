//! Toolsense - Real-time lexical tool suggestion engine
//!
//! This library exposes the core components for the suggestion service,
//! enabling integration tests and potential embedding in other applications.

pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
pub mod suggest;

// Re-export key types for convenience
pub use catalog::{Suggestion, ToolKind, ToolSpec};
pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
pub use suggest::{CombineStrategy, EngineOptions, SuggestionEngine};
