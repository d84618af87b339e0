use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use which::which;

use crate::{is_valid_date_format, NotesError, RenderOptions, Result, LOCALE_TIMESTAMP_FORMAT};

/// Slot name the collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "myNotes";

/// How to treat a note that has only a title or only content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialNotePolicy {
    /// The missing field is stored empty.
    #[default]
    Allow,
    /// The missing field is reported as `MissingTitle` or `MissingContent`.
    Reject,
}

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Directory holding the storage slots
    pub data_dir: PathBuf,

    /// Name of the slot holding the serialized collection
    pub storage_key: String,

    /// Validation policy for half-filled notes
    pub partial_notes: PartialNotePolicy,

    /// Maximum characters of a title shown in the list view
    pub title_preview_len: usize,

    /// Maximum characters of content shown in the list view
    pub content_preview_len: usize,

    /// chrono format string for dates in views
    pub date_format: String,

    /// Label shown for notes without a title
    pub untitled_label: String,

    /// When set, the HTML page is rewritten here after every change
    pub render_path: Option<PathBuf>,

    /// Editor command used by `edit --editor`
    pub editor_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = ProjectDirs::from("", "", "sidenotes")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".sidenotes"));

        Self {
            data_dir,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            partial_notes: PartialNotePolicy::default(),
            title_preview_len: 30,
            content_preview_len: 50,
            date_format: LOCALE_TIMESTAMP_FORMAT.to_string(),
            untitled_label: "Untitled".to_string(),
            render_path: None,
            editor_command: None,
        }
    }
}

impl Config {
    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "sidenotes").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Loads the configuration from `path`, falling back to defaults when the
    /// file does not exist. Fields missing from the file take default values.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|e| NotesError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| NotesError::ConfigError {
            message: format!("invalid config {}: {}", path.display(), e),
        })?;

        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        // The key doubles as a file name
        let key_ok = !self.storage_key.is_empty()
            && self
                .storage_key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !key_ok {
            return Err(NotesError::ConfigError {
                message: format!("invalid storage_key '{}'", self.storage_key),
            });
        }
        if self.title_preview_len == 0 || self.content_preview_len == 0 {
            return Err(NotesError::ConfigError {
                message: "preview lengths must be positive".to_string(),
            });
        }
        if !is_valid_date_format(&self.date_format) {
            return Err(NotesError::ConfigError {
                message: format!("invalid date_format '{}'", self.date_format),
            });
        }
        Ok(())
    }

    /// View settings derived from this configuration.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            title_max: self.title_preview_len,
            content_max: self.content_preview_len,
            date_format: self.date_format.clone(),
            untitled_label: self.untitled_label.clone(),
        }
    }

    // This method provides smart fallbacks when no editor is configured
    pub fn get_editor_command(&self) -> String {
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        if let Ok(editor) = std::env::var("EDITOR") {
            return editor;
        }

        if cfg!(windows) {
            "notepad".to_string()
        } else if cfg!(target_os = "macos") {
            "open -W -t".to_string()
        } else {
            for editor in &["nano", "vim", "vi", "emacs"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            "nano".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.json")).unwrap();

        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.partial_notes, PartialNotePolicy::Allow);
        assert_eq!(config.content_preview_len, 50);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"partial_notes":"reject","title_preview_len":12}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.partial_notes, PartialNotePolicy::Reject);
        assert_eq!(config.title_preview_len, 12);
        assert_eq!(config.untitled_label, "Untitled");
    }

    #[test]
    fn invalid_file_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(NotesError::ConfigError { .. })
        ));
    }

    #[test]
    fn empty_storage_key_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"storage_key":"  "}"#).unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn bad_date_format_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"date_format":"%Q %Y"}"#).unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn configured_editor_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"editor_command":"vim -n"}"#).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.get_editor_command(), "vim -n");
    }
}
