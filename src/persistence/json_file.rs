use super::*;
use anyhow::Context;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Pretty-printed JSON in a single file, replaced on every write
pub struct JsonFileStatusWriter {
    path: PathBuf,
}

impl JsonFileStatusWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn new_shared(path: impl Into<PathBuf>) -> SharedStatusWriter {
        Arc::new(Self::new(path))
    }
}

impl StatusWriter for JsonFileStatusWriter {
    fn write(&self, status: &StatusFile) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating status directory {}", dir.display()))?;
        }

        let json = serde_json::to_string_pretty(status).context("serializing status")?;

        // Write aside and rename, so the dashboard never reads half a file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;

        debug!(path = %self.path.display(), "status written");
        Ok(())
    }
}
