//! Error types for the sidenotes application.
//!
//! This module defines custom error types that categorize the failures
//! that can occur while managing, persisting and presenting notes.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::NoteId;

/// The main error type for the sidenotes application.
#[derive(Error, Debug)]
pub enum NotesError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Both title and content were blank.
    #[error("Please enter a title or some content")]
    EmptyNote,

    /// Title was blank while partial notes are rejected.
    #[error("Please enter a title")]
    MissingTitle,

    /// Content was blank while partial notes are rejected.
    #[error("Please enter some content")]
    MissingContent,

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: NoteId },

    /// The storage slot held something that is not a serialized note sequence.
    #[error("Malformed data in storage slot '{key}': {message}")]
    MalformedPersistedData { key: String, message: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    #[error("{message}")]
    EditorError { message: String },

    /// Shell input that could not be understood.
    #[error("{message}")]
    InvalidCommand { message: String },
}

impl NotesError {
    /// Whether this error is something the user caused and can fix, as opposed
    /// to an environment failure.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            NotesError::EmptyNote
                | NotesError::MissingTitle
                | NotesError::MissingContent
                | NotesError::NoteNotFound { .. }
                | NotesError::InvalidCommand { .. }
        )
    }
}
