//! Delivery of rendered artifacts

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::context::ExportArtifact;
use crate::error::{ExportError, ExportResult};

/// Where a finished artifact goes: a directory, memory, a browser download
pub trait DownloadSink: Send + Sync {
    /// Hand over the artifact; returns where it ended up
    fn deliver(&self, artifact: &ExportArtifact) -> ExportResult<String>;
}

/// Writes artifacts into a directory.
///
/// Bytes go to a hidden temp file first and are renamed into place, so a
/// failed write never leaves a partial file under the final name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn delivery_error(path: &Path, source: std::io::Error) -> ExportError {
        ExportError::Delivery {
            path: path.display().to_string(),
            source,
        }
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> ExportResult<String> {
        fs::create_dir_all(&self.dir).map_err(|e| Self::delivery_error(&self.dir, e))?;

        let target = self.dir.join(&artifact.filename);
        let temp = self.dir.join(format!(".{}.partial", artifact.filename));

        let written = fs::File::create(&temp).and_then(|mut file| {
            file.write_all(&artifact.bytes)?;
            file.sync_all()
        });
        let result = written.and_then(|_| fs::rename(&temp, &target));
        if let Err(e) = result {
            let _ = fs::remove_file(&temp);
            return Err(Self::delivery_error(&target, e));
        }

        log::debug!("Wrote {} bytes to {}", artifact.len(), target.display());
        Ok(target.display().to_string())
    }
}

/// Keeps delivered artifacts in memory, for tests and embedding
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<ExportArtifact>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filenames delivered so far, oldest first
    pub fn filenames(&self) -> Vec<String> {
        match self.delivered.lock() {
            Ok(delivered) => delivered.iter().map(|a| a.filename.clone()).collect(),
            Err(poisoned) => poisoned.into_inner().iter().map(|a| a.filename.clone()).collect(),
        }
    }

    /// Remove and return everything delivered so far
    pub fn take(&self) -> Vec<ExportArtifact> {
        match self.delivered.lock() {
            Ok(mut delivered) => std::mem::take(&mut *delivered),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> ExportResult<String> {
        let mut delivered = match self.delivered.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        delivered.push(artifact.clone());
        Ok(format!("memory:{}", artifact.filename))
    }
}
