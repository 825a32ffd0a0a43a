use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{TraceError, TraceResult};

pub const BODY_UNAVAILABLE: &str = "Response body is not available";

const RESOURCES_DIR: &str = "resources";

/// Content-addressed blobs (screenshots, request/response bodies) stored next
/// to a trace under `resources/<sha1>`.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at `<trace dir>/resources`.
    pub fn for_trace(trace_path: &Path) -> Self {
        let dir = trace_path.parent().unwrap_or_else(|| Path::new("."));
        Self::new(dir.join(RESOURCES_DIR))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, sha1: &str) -> TraceResult<PathBuf> {
        validate_name(sha1)?;
        Ok(self.root.join(sha1))
    }

    /// `Ok(None)` when the blob was not captured.
    pub fn read(&self, sha1: &str) -> TraceResult<Option<Vec<u8>>> {
        let path = self.path_for(sha1)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "blob missing");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn read_text(&self, sha1: &str) -> TraceResult<Option<String>> {
        Ok(self
            .read(sha1)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }
}

// Names are hashes, optionally with an extension (`<sha1>.jpeg`); anything that
// could walk out of the resources directory is rejected.
fn validate_name(name: &str) -> TraceResult<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '@'));
    if valid {
        Ok(())
    } else {
        Err(TraceError::InvalidArg(format!("invalid blob name: {name:?}")))
    }
}
