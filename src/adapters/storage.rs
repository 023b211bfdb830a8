use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Files under a base directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    fn lock_key(&self, path: &str) -> Option<String> {
        let full_path = self.full_path(path);
        let absolute = std::path::absolute(&full_path).unwrap_or(full_path);
        Some(absolute.to_string_lossy().into_owned())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.full_path(path)).await?)
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.full_path(path)).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);
        let data = data.to_vec();

        let target = full_path.clone();
        tokio::task::spawn_blocking(move || replace_file(&target, &data))
            .await
            .map_err(std::io::Error::other)??;

        tracing::debug!("Replaced {}", full_path.display());
        Ok(())
    }
}

// Each write gets its own temp file beside the target, which is then renamed
// over it. The temp file is removed if anything fails before the rename.
fn replace_file(target: &Path, data: &[u8]) -> Result<()> {
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
