use crate::domain::ports::Storage;
use crate::utils::error::{BookingError, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Locks for files that storage backends identify by key, shared by every
/// log in the process that points at the same file.
static SHARED_LOCKS: Lazy<std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>> =
    Lazy::new(Default::default);

fn shared_lock(key: String) -> Arc<Mutex<()>> {
    let mut locks = SHARED_LOCKS.lock().unwrap_or_else(PoisonError::into_inner);
    locks.entry(key).or_default().clone()
}

/// An append-only JSON array file of records.
///
/// Appends are a read-modify-write of the whole file and run under a lock per
/// file. Waiting for the lock and reading the current contents are bounded by
/// `timeout`; if that elapses the append fails and nothing is written. Once
/// the write has started it runs to completion in its own task and keeps the
/// lock until it is done, so the result reported to the caller always matches
/// what is on disk.
pub struct RecordLog<T, S: Storage> {
    storage: Arc<S>,
    path: String,
    lock: Arc<Mutex<()>>,
    timeout: Duration,
    _record: PhantomData<fn() -> T>,
}

impl<T, S> RecordLog<T, S>
where
    T: Serialize + DeserializeOwned,
    S: Storage,
{
    pub fn new(storage: Arc<S>, path: impl Into<String>, timeout: Duration) -> Self {
        let path = path.into();
        let lock = match storage.lock_key(&path) {
            Some(key) => shared_lock(key),
            None => Arc::new(Mutex::new(())),
        };
        Self {
            storage,
            path,
            lock,
            timeout,
            _record: PhantomData,
        }
    }

    /// Appends `record` and returns the new length of the log. On `Ok` the
    /// record is on disk; on `Err` it is not.
    pub async fn append(&self, record: &T) -> Result<usize> {
        let value = serde_json::to_value(record)?;
        let (guard, mut records) = self
            .bounded(async {
                let guard = self.lock.clone().lock_owned().await;
                tracing::debug!("Acquired lock for {}", self.path);
                let records = self.read_values().await?;
                Ok((guard, records))
            })
            .await?;

        records.push(value);
        let count = records.len();
        let data = serde_json::to_vec(&records)?;

        match self.spawn_write(guard, data).await {
            Ok(()) => Ok(count),
            Err(e) => {
                tracing::error!("Persistence failure on {}: {}", self.path, e);
                Err(BookingError::persistence(&self.path, e))
            }
        }
    }

    // The write task owns the guard, so dropping the caller's future neither
    // cancels the write nor lets another append in before it finishes.
    async fn spawn_write(&self, guard: OwnedMutexGuard<()>, data: Vec<u8>) -> Result<()> {
        let storage = self.storage.clone();
        let path = self.path.clone();
        let task = tokio::spawn(async move {
            let _guard = guard;
            storage.write_file(&path, &data).await
        });
        match task.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e.to_string()).into()),
        }
    }

    /// Every record in the log, oldest first. A log that was never written is empty.
    pub async fn read_all(&self) -> Result<Vec<T>> {
        self.bounded(async {
            let values = self.read_values().await?;
            values
                .into_iter()
                .map(|v| serde_json::from_value(v).map_err(BookingError::from))
                .collect()
        })
        .await
    }

    // Existing entries stay as raw JSON so records written by older versions
    // survive an append untouched.
    async fn read_values(&self) -> Result<Vec<serde_json::Value>> {
        if !self.storage.exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let data = self.storage.read_file(&self.path).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    async fn bounded<R>(&self, operation: impl Future<Output = Result<R>>) -> Result<R> {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::error!("Persistence failure on {}: {}", self.path, e);
                Err(BookingError::persistence(&self.path, e))
            }
            Err(_) => {
                tracing::error!("Timed out after {:?} on {}", self.timeout, self.path);
                Err(BookingError::persistence(
                    &self.path,
                    format!("timed out after {:?}", self.timeout),
                ))
            }
        }
    }
}
