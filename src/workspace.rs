use std::fs::{self, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{trace, warn};

const MAX_ATTEMPTS: usize = 16;

/// A staging directory owned by one execution.
///
/// The directory and everything the toolchain wrote into it are removed
/// when the value is dropped, on every exit path. Removal failures are
/// logged and otherwise ignored.
#[derive(Debug)]
pub struct Workspace {
    dir: PathBuf,
    source: PathBuf,
}

impl Workspace {
    /// Creates a fresh directory under `root` and writes `source_text` to
    /// `file_name` inside it, flushed to disk.
    pub fn stage(root: &Path, file_name: &str, source_text: &str) -> Result<Self> {
        let dir = create_unique_dir(root)?;
        // From here on `Drop` owns the directory.
        let ws = Self {
            source: dir.join(file_name),
            dir,
        };
        ws.write_source(source_text)
            .with_context(|| format!("failed to stage source: path = {}", ws.source.display()))?;
        trace!(dir = ?ws.dir, source = ?ws.source, "staged");
        Ok(ws)
    }

    fn write_source(&self, source_text: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.source)?;
        file.write_all(source_text.as_bytes())?;
        file.sync_all()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn source_path(&self) -> &Path {
        &self.source
    }

    /// A path for a build product or capture file inside the workspace.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Writes `content` to a new file inside the workspace.
    pub fn put(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.artifact_path(name);
        fs::write(&path, content)
            .with_context(|| format!("failed to write file: path = {}", path.display()))?;
        Ok(path)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => trace!(dir = ?self.dir, "workspace removed"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(dir = ?self.dir, %err, "failed to remove workspace"),
        }
    }
}

fn create_unique_dir(root: &Path) -> Result<PathBuf> {
    for _ in 0..MAX_ATTEMPTS {
        let nonce: u64 = rand::random();
        let dir = root.join(format!("polyexec_{:016x}", nonce));
        match fs::create_dir(&dir) {
            Ok(()) => return Ok(dir),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to create workspace: path = {}", dir.display())
                })
            }
        }
    }
    anyhow::bail!(
        "failed to create a unique workspace under {} after {} attempts",
        root.display(),
        MAX_ATTEMPTS
    )
}
