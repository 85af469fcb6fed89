//! Artifact storage
//!
//! Rendered match images are handed to a store, which returns the reference
//! (URL or path) reported back to the caller.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{LocatorError, Result};

/// Persists rendered artifacts and returns a reference to them
pub trait ArtifactStore: Send + Sync {
    /// Store the file at `artifact` under `category`
    fn store(&self, artifact: &Path, category: &str) -> Result<String>;
}

impl<T: ArtifactStore + ?Sized> ArtifactStore for Arc<T> {
    fn store(&self, artifact: &Path, category: &str) -> Result<String> {
        (**self).store(artifact, category)
    }
}

/// Copies artifacts into `<root>/<category>/` on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactStore for LocalArtifactStore {
    fn store(&self, artifact: &Path, category: &str) -> Result<String> {
        let file_name = artifact.file_name().ok_or_else(|| {
            LocatorError::Storage(format!("artifact path has no file name: {}", artifact.display()))
        })?;

        let dir = self.root.join(category);
        std::fs::create_dir_all(&dir)?;
        let destination = dir.join(file_name);
        std::fs::copy(artifact, &destination)?;

        log::debug!("Stored artifact at {}", destination.display());
        Ok(destination.to_string_lossy().into_owned())
    }
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// Mock store that records requests and returns synthetic URLs
#[derive(Default)]
pub struct MockArtifactStore {
    base_url: String,
    stored: Mutex<Vec<(PathBuf, String)>>,
    failing: bool,
}

impl MockArtifactStore {
    /// Create a mock store answering with `base_url/category/file_name`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            stored: Mutex::new(Vec::new()),
            failing: false,
        }
    }

    /// Make every call fail
    pub fn with_failure(mut self) -> Self {
        self.failing = true;
        self
    }

    /// All (artifact, category) pairs stored so far
    pub fn stored(&self) -> Vec<(PathBuf, String)> {
        self.stored.lock().clone()
    }
}

impl ArtifactStore for MockArtifactStore {
    fn store(&self, artifact: &Path, category: &str) -> Result<String> {
        if self.failing {
            return Err(LocatorError::Storage("mock store failure".to_string()));
        }

        let name = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.stored
            .lock()
            .push((artifact.to_path_buf(), category.to_string()));

        Ok(format!("{}/{}/{}", self.base_url, category, name))
    }
}
