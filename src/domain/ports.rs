use crate::utils::error::Result;

/// Byte-level access to the files that back the catalog and the intake logs.
///
/// `write_file` must replace the whole file atomically: a reader sees either
/// the old contents or the new ones, never a partial write.
pub trait Storage: Send + Sync + 'static {
    /// Identifies the file behind `path` across storage instances, so that
    /// every log appending to the same file shares one lock. `None` keeps the
    /// lock private to the log.
    fn lock_key(&self, _path: &str) -> Option<String> {
        None
    }

    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
