//! Shared types for the sidenotes application.
//!
//! This module contains the crate-wide `Result` alias, the change
//! notifications emitted by the collection and the CLI subcommands.
use std::path::PathBuf;

use clap::Subcommand;

use crate::{NoteId, NotesError};

/// A specialized Result type for sidenotes operations.
pub type Result<T> = std::result::Result<T, NotesError>;

/// What a successful mutation did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Created(NoteId),
    Updated(NoteId),
    /// The note was removed; `selection_cleared` is set when it was the active one.
    Deleted {
        id: NoteId,
        selection_cleared: bool,
    },
    SelectionChanged(Option<NoteId>),
}

/// Available subcommands for the sidenotes application
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new note and select it
    Add {
        /// Title of the note
        #[clap(short = 'T', long, default_value = "")]
        title: String,

        /// Content of the note
        #[clap(short, long, default_value = "")]
        content: String,
    },

    /// List notes, newest first
    List {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Select a note and show it in full
    Show {
        /// ID of the note to show
        id: NoteId,
    },

    /// Overwrite an existing note in place
    Edit {
        /// ID of the note to edit
        id: NoteId,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New content for the note
        #[clap(short, long)]
        content: Option<String>,

        /// Open content in editor before saving
        #[clap(short, long)]
        editor: bool,
    },

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: NoteId,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Render the list and detail views as an HTML page
    Render {
        /// Where to write the page (stdout when omitted)
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// Note to show in the detail view
        #[clap(short, long)]
        select: Option<NoteId>,
    },

    /// Start an interactive session
    Shell,
}
