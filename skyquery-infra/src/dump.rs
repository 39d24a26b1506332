use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keeps raw provider bodies on disk for later inspection.
#[derive(Debug, Clone)]
pub struct ResponseDump {
    dir: PathBuf,
}

impl ResponseDump {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `<label>-<utc timestamp>.json` and returns its path.
    pub async fn write(&self, label: &str, raw: &str) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let path = self.dir.join(format!("{}-{}.json", label, stamp));
        tokio::fs::write(&path, raw).await?;
        debug!("Raw response written to {}", path.display());
        Ok(path)
    }
}
