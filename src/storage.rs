use std::{
    collections::{HashMap, HashSet},
    fs,
    io::Write,
    path::PathBuf,
};

use log::{debug, error, info, trace, warn};
use tempfile::NamedTempFile;

use crate::{Note, NotesError, Result, DEFAULT_STORAGE_KEY};

/// A string key-value store holding whole values per key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value under `key`. Readers see either the old or the new
    /// value, never a partial write.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Keeps values in memory only. Used for ephemeral sessions and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            debug!("Data directory does not exist, creating: {}", dir.display());
            fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                NotesError::DirectoryError { path: dir.clone() }
            })?;
        }
        Ok(Self { dir })
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            trace!("Slot file {} not present", path.display());
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).map_err(|e| {
            error!("Failed to read slot file {}: {}", path.display(), e);
            NotesError::Io(e)
        })?;
        Ok(Some(raw))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key);

        // Write next to the target and rename over it so the slot is replaced atomically
        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            NotesError::Io(e)
        })?;

        temp_file.write_all(value.as_bytes()).map_err(|e| {
            error!("Failed to write to temporary file: {}", e);
            NotesError::Io(e)
        })?;

        temp_file.flush().map_err(|e| {
            error!("Failed to flush temporary file: {}", e);
            NotesError::Io(e)
        })?;

        temp_file.persist(&path).map_err(|e| {
            error!("Failed to persist file {}: {}", path.display(), e.error);
            NotesError::Io(e.error)
        })?;

        trace!("Slot {} written to {}", key, path.display());
        Ok(())
    }
}

/// Reads and writes the whole note collection as one JSON array in a single
/// storage slot.
pub struct NoteStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> NoteStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Loads the collection, reporting malformed data as an error.
    ///
    /// An absent slot is an empty collection. Duplicate ids keep their first
    /// occurrence.
    pub fn try_load(&self) -> Result<Vec<Note>> {
        let raw = match self.store.get(&self.key)? {
            Some(raw) => raw,
            None => {
                debug!("Storage slot '{}' is empty", self.key);
                return Ok(Vec::new());
            }
        };

        let notes: Vec<Note> =
            serde_json::from_str(&raw).map_err(|e| NotesError::MalformedPersistedData {
                key: self.key.clone(),
                message: e.to_string(),
            })?;

        let mut seen = HashSet::with_capacity(notes.len());
        let mut unique = Vec::with_capacity(notes.len());
        for note in notes {
            if seen.insert(note.id) {
                unique.push(note);
            } else {
                warn!("Dropping duplicate note id {} from slot '{}'", note.id, self.key);
            }
        }

        info!("Loaded {} notes from slot '{}'", unique.len(), self.key);
        Ok(unique)
    }

    /// Loads the collection, never failing: anything unreadable becomes an
    /// empty collection.
    pub fn load(&self) -> Vec<Note> {
        match self.try_load() {
            Ok(notes) => notes,
            Err(e) => {
                warn!("Starting with an empty collection: {}", e);
                Vec::new()
            }
        }
    }

    /// Overwrites the slot with the full collection.
    pub fn save(&mut self, notes: &[Note]) -> Result<()> {
        let json = serde_json::to_string(notes).map_err(|e| {
            error!("Failed to serialize notes: {}", e);
            NotesError::Serialization(e)
        })?;
        self.store.set(&self.key, &json)?;
        debug!("Saved {} notes to slot '{}'", notes.len(), self.key);
        Ok(())
    }
}
