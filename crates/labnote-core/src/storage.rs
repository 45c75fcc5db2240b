use std::cell::RefCell;
use std::path::PathBuf;

use crate::error::LabnoteError;
use crate::tabs::TabGroup;

/// Durable slot holding the serialized tab groups.
pub trait TabRepository {
    fn load(&self) -> Result<Vec<TabGroup>, LabnoteError>;
    fn save(&self, groups: &[TabGroup]) -> Result<(), LabnoteError>;
}

/// Tab groups stored as one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TabRepository for JsonFileRepository {
    /// Missing file loads as no groups.
    fn load(&self) -> Result<Vec<TabGroup>, LabnoteError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| LabnoteError::StateRead(Box::new(e)))?;
        serde_json::from_str(&content).map_err(|e| LabnoteError::StateRead(Box::new(e)))
    }

    fn save(&self, groups: &[TabGroup]) -> Result<(), LabnoteError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LabnoteError::StateWrite(Box::new(e)))?;
        }
        let content =
            serde_json::to_string_pretty(groups).map_err(|e| LabnoteError::StateWrite(Box::new(e)))?;
        // write-then-rename so a crash never leaves a truncated file
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content).map_err(|e| LabnoteError::StateWrite(Box::new(e)))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| LabnoteError::StateWrite(Box::new(e)))?;
        Ok(())
    }
}

/// In-memory repository that keeps every saved snapshot.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    initial: Vec<TabGroup>,
    saves: RefCell<Vec<Vec<TabGroup>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_groups(groups: Vec<TabGroup>) -> Self {
        Self {
            initial: groups,
            saves: RefCell::default(),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.borrow().len()
    }

    pub fn last_saved(&self) -> Option<Vec<TabGroup>> {
        self.saves.borrow().last().cloned()
    }
}

impl TabRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<TabGroup>, LabnoteError> {
        Ok(self
            .saves
            .borrow()
            .last()
            .cloned()
            .unwrap_or_else(|| self.initial.clone()))
    }

    fn save(&self, groups: &[TabGroup]) -> Result<(), LabnoteError> {
        self.saves.borrow_mut().push(groups.to_vec());
        Ok(())
    }
}
