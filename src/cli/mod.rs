//! Command-line front end: argument parsing and the command handler.
mod app;
mod args;

pub use app::*;
pub use args::*;
