//! Request-scoped file handling

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// The two input images of one request.
///
/// When cleanup is enabled both files are deleted on drop, whichever way
/// the request ends.
#[derive(Debug)]
pub struct InputFiles {
    template: PathBuf,
    reference: PathBuf,
    cleanup: bool,
}

impl InputFiles {
    pub fn new(template: &Path, reference: &Path, cleanup: bool) -> Self {
        Self {
            template: template.to_path_buf(),
            reference: reference.to_path_buf(),
            cleanup,
        }
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    pub fn reference(&self) -> &Path {
        &self.reference
    }
}

impl Drop for InputFiles {
    fn drop(&mut self) {
        if !self.cleanup {
            return;
        }
        for path in [&self.template, &self.reference] {
            match std::fs::remove_file(path) {
                Ok(()) => log::debug!("Removed input {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Failed to remove input {}: {}", path.display(), e),
            }
        }
    }
}

static ARTIFACT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Output path unique across threads and processes.
///
/// Combines the timestamp with the process id and a process-wide counter,
/// so requests within the same millisecond still get distinct names.
pub fn unique_artifact_path(dir: &Path) -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = ARTIFACT_COUNTER.fetch_add(1, Ordering::Relaxed);
    dir.join(format!("{}-{}-{}.jpg", millis, std::process::id(), seq))
}
