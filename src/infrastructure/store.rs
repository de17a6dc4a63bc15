//! Document store implementations

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::SavedData;
use crate::infrastructure::traits::{DocumentStore, FileSystem};

/// Stores the saved data as pretty-printed JSON in a single file.
pub struct JsonFileStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> ApplicationResult<Option<SavedData>> {
        if !self.fs.exists(&self.path) {
            debug!("no data file yet");
            return Ok(None);
        }
        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read tree data", &self.path)?;
        Ok(Some(SavedData::from_json(&content)?))
    }

    #[instrument(level = "debug", skip(self, data), fields(path = %self.path.display()))]
    fn save(&self, data: &SavedData) -> ApplicationResult<()> {
        let json = data.to_json_pretty()?;
        self.fs
            .ensure_parent(&self.path)
            .with_path_context("create data directory for", &self.path)?;
        self.fs
            .write_atomic(&self.path, &json)
            .with_path_context("write tree data", &self.path)?;
        debug!("saved {} nodes", data.tree.nodes.len());
        Ok(())
    }
}

/// In-process store. Data goes through JSON like the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    json: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw JSON, which need not be valid.
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            json: Mutex::new(Some(json.into())),
        }
    }

    /// The JSON last written, if any.
    pub fn json(&self) -> Option<String> {
        self.json.lock().ok().and_then(|guard| guard.clone())
    }
}

fn poisoned() -> ApplicationError {
    ApplicationError::Store {
        message: "memory store lock poisoned".into(),
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> ApplicationResult<Option<SavedData>> {
        let guard = self.json.lock().map_err(|_| poisoned())?;
        match guard.as_deref() {
            Some(json) => Ok(Some(SavedData::from_json(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, data: &SavedData) -> ApplicationResult<()> {
        let json = data.to_json_pretty()?;
        *self.json.lock().map_err(|_| poisoned())? = Some(json);
        Ok(())
    }
}
