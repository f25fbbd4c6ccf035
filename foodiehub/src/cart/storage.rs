//! Cart persistence
//!
//! The draft survives restarts as a JSON file under the data directory.
//! Storage is injected so tests and the offline demo can run without
//! touching the filesystem.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use super::CartDraft;

/// Fixed file name of the persisted cart draft
const CART_FILE: &str = "foodiehub-cart.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the cart draft is kept between sessions
pub trait CartStorage: Send + std::fmt::Debug {
    /// Load the persisted draft, `None` when nothing was saved yet
    fn load(&self) -> Result<Option<CartDraft>, StorageError>;

    /// Persist the full draft
    fn save(&self, draft: &CartDraft) -> Result<(), StorageError>;
}

/// JSON file under the configured data directory
#[derive(Debug)]
pub struct JsonFileStorage {
    file_path: PathBuf,
}

impl JsonFileStorage {
    /// Storage rooted at a data directory; the file name is fixed
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            file_path: data_dir.as_ref().join(CART_FILE),
        }
    }

    /// Path of the draft file
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<CartDraft>, StorageError> {
        if !self.file_path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.file_path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, draft: &CartDraft) -> Result<(), StorageError> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(draft)?;
        std::fs::write(&self.file_path, content)?;
        Ok(())
    }
}

/// In-process storage for tests and the demo
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<CartDraft>>,
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<CartDraft>, StorageError> {
        Ok(self.slot.lock().unwrap().clone())
    }

    fn save(&self, draft: &CartDraft) -> Result<(), StorageError> {
        *self.slot.lock().unwrap() = Some(draft.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;

    fn draft_with_one_line() -> CartDraft {
        CartDraft {
            items: vec![CartItem {
                id: "line-1".to_string(),
                menu_item_id: "3".to_string(),
                name: "Butter Chicken".to_string(),
                price: 349.0,
                quantity: 2,
                image_url: None,
                restaurant_id: "1".to_string(),
                restaurant_name: "Spice Garden".to_string(),
            }],
            restaurant_id: Some("1".to_string()),
            restaurant_name: Some("Spice Garden".to_string()),
        }
    }

    #[test]
    fn file_round_trip_preserves_the_draft() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());

        let draft = draft_with_one_line();
        storage.save(&draft).unwrap();
        let loaded = storage.load().unwrap().unwrap();

        assert_eq!(loaded, draft);
        assert!(storage.path().exists());
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn save_creates_the_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("deep/data"));

        storage.save(&draft_with_one_line()).unwrap();
        assert!(storage.load().unwrap().is_some());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        std::fs::write(storage.path(), "not json").unwrap();

        assert!(matches!(storage.load(), Err(StorageError::Json(_))));
    }

    #[test]
    fn memory_storage_round_trips() {
        let storage = MemoryStorage::default();
        assert!(storage.load().unwrap().is_none());

        let draft = draft_with_one_line();
        storage.save(&draft).unwrap();
        assert_eq!(storage.load().unwrap().unwrap(), draft);
    }
}
