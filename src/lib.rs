//! Small note-taking library
//!
//! This library keeps an ordered collection of short text notes in a single
//! key-value storage slot, tracks which note is selected, and renders the
//! collection as escaped HTML list and detail views.

mod cli;
mod collection;
mod config;
mod dialog;
mod errors;
mod helper;
mod note;
mod render;
mod selection;
mod storage;
mod types;

// Re-export key components
pub use cli::*;
pub use collection::*;
pub use config::*;
pub use dialog::*;
pub use errors::*;
pub use helper::*;
pub use note::*;
pub use render::*;
pub use selection::*;
pub use storage::*;
pub use types::*;
