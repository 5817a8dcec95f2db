//! JSON file storage for comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tp_core::comment::{CommentQuery, CommentRecord, CommentSource};
use tp_core::error::{Result, ThreadPrepError};
use tp_core::types::CommentId;
use tracing::{debug, info};

/// Current comment file schema version
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// On-disk layout of a comment file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentFile {
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
}

/// Comment store backed by a single JSON file
///
/// The whole file is loaded into memory; [`save`](Self::save) rewrites it
/// atomically.
#[derive(Debug, Clone)]
pub struct JsonCommentStore {
    path: PathBuf,
    comments: Vec<CommentRecord>,
}

impl JsonCommentStore {
    /// Create an empty store that will be saved to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            comments: Vec::new(),
        }
    }

    /// Load `path`, or start empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No comment file at {:?}, starting empty", path);
            Ok(Self::new(path))
        }
    }

    /// Load an existing comment file
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = fs::File::open(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ThreadPrepError::FileNotFound(path.clone())
            } else {
                ThreadPrepError::Io(e)
            }
        })?;

        let reader = BufReader::new(file);
        let data: CommentFile = serde_json::from_reader(reader).map_err(|e| {
            ThreadPrepError::from(e).with_context(format!("Invalid comment file {:?}", path))
        })?;

        if data.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(ThreadPrepError::UnsupportedSchemaVersion(
                data.schema_version,
            ));
        }

        info!("Loaded {} comments from {:?}", data.comments.len(), path);
        Ok(Self {
            path,
            comments: data.comments,
        })
    }

    /// Default comment file in the platform data directory
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "threadprep", "threadprep")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".threadprep")
            })
            .join("comments.json")
    }

    /// Open the store at the default location
    pub fn default_location() -> Result<Self> {
        Self::open(Self::default_path())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored comments in insertion order
    pub fn comments(&self) -> &[CommentRecord] {
        &self.comments
    }

    /// Number of stored comments
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// Check if the store has no comments
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Get a comment by id
    pub fn get(&self, id: CommentId) -> Option<&CommentRecord> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// Add a comment; ids must be unique
    pub fn add(&mut self, record: CommentRecord) -> Result<()> {
        if self.get(record.id).is_some() {
            return Err(ThreadPrepError::Validation(format!(
                "Comment {} already exists",
                record.id
            )));
        }
        debug!("Added comment {}", record.id);
        self.comments.push(record);
        Ok(())
    }

    /// Remove a comment, returning it
    pub fn remove(&mut self, id: CommentId) -> Result<CommentRecord> {
        let index = self
            .comments
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ThreadPrepError::CommentNotFound(id.to_string()))?;
        Ok(self.comments.remove(index))
    }

    /// Next unused comment id
    pub fn next_id(&self) -> CommentId {
        CommentId(self.comments.iter().map(|c| c.id.0).max().unwrap_or(0) + 1)
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("comments.json");
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    /// Write the store atomically (write to temp, then rename)
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    ThreadPrepError::Io(std::io::Error::new(
                        e.kind(),
                        format!("Failed to create data directory: {}", e),
                    ))
                })?;
                debug!("Created data directory: {:?}", parent);
            }
        }

        let temp_path = self.temp_path();
        let data = CommentFile {
            schema_version: CURRENT_SCHEMA_VERSION,
            saved_at: Some(Utc::now()),
            comments: self.comments.clone(),
        };

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            ThreadPrepError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, &data)?;
        writer.flush()?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ThreadPrepError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Saved {} comments to {:?}", self.comments.len(), self.path);
        Ok(())
    }
}

impl CommentSource for JsonCommentStore {
    fn fetch(&self, query: &CommentQuery) -> Result<Vec<CommentRecord>> {
        self.comments.as_slice().fetch(query)
    }

    fn count_threads(&self, query: &CommentQuery) -> Result<usize> {
        self.comments.as_slice().count_threads(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use tp_core::comment::CommentBuilder;

    fn create_test_store() -> (JsonCommentStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonCommentStore::new(temp_dir.path().join("data").join("comments.json"));
        (store, temp_dir)
    }

    fn comment(id: u64, parent: u64) -> CommentRecord {
        CommentBuilder::reply(id, 1, parent)
            .author("Test")
            .content("Hello world")
            .build()
            .unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let (mut store, _temp) = create_test_store();
        store.add(comment(1, 0)).unwrap();
        store.add(comment(2, 1)).unwrap();
        store.save().unwrap();

        let loaded = JsonCommentStore::load(store.path()).unwrap();
        assert_eq!(loaded.comments(), store.comments());
        assert_eq!(loaded.next_id(), CommentId(3));
    }

    #[test]
    fn test_atomic_write() {
        let (mut store, _temp) = create_test_store();
        store.add(comment(1, 0)).unwrap();
        store.save().unwrap();

        assert!(!store.temp_path().exists());
        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("\"schema_version\": 1"));
        assert!(content.contains("Hello world"));
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let (store, _temp) = create_test_store();
        let opened = JsonCommentStore::open(store.path()).unwrap();
        assert!(opened.is_empty());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let (store, _temp) = create_test_store();
        let err = JsonCommentStore::load(store.path()).unwrap_err();
        assert!(matches!(err, ThreadPrepError::FileNotFound(_)));
    }

    #[test]
    fn test_future_schema_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("comments.json");
        fs::write(&path, r#"{"schema_version": 9, "comments": []}"#).unwrap();

        let err = JsonCommentStore::load(&path).unwrap_err();
        assert!(matches!(err, ThreadPrepError::UnsupportedSchemaVersion(9)));
    }

    #[test]
    fn test_duplicate_and_remove() {
        let (mut store, _temp) = create_test_store();
        store.add(comment(1, 0)).unwrap();
        assert!(store.add(comment(1, 0)).is_err());

        let removed = store.remove(CommentId(1)).unwrap();
        assert_eq!(removed.id, CommentId(1));
        assert!(matches!(
            store.remove(CommentId(1)),
            Err(ThreadPrepError::CommentNotFound(_))
        ));
    }

    #[test]
    fn test_fetch_as_comment_source() {
        let (mut store, _temp) = create_test_store();
        store.add(comment(1, 0)).unwrap();
        store.add(comment(2, 1)).unwrap();
        store.add(comment(3, 0)).unwrap();

        let query = CommentQuery {
            number: Some(1),
            paged: Some(1),
            ..CommentQuery::default()
        };
        assert_eq!(store.count_threads(&query).unwrap(), 2);
        let ids: Vec<u64> = store.fetch(&query).unwrap().iter().map(|c| c.id.0).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&1) && ids.contains(&2));
    }

    #[test]
    fn test_default_path() {
        let path = JsonCommentStore::default_path();
        assert!(path.ends_with("comments.json"));
    }
}
