use std::sync::Arc;

use tokio::sync::{AcquireError, Mutex, MutexGuard, OwnedSemaphorePermit, Semaphore};

use crate::config::Config;

/// State shared by the dispatcher and every connection task.
pub struct ServerContext {
    config: Config,
    /// Held for the whole of a file response when file service is serialised.
    file_lock: Mutex<()>,
    /// `None` when `max_connections` is 0.
    limiter: Option<Arc<Semaphore>>,
}

impl ServerContext {
    pub fn new(config: Config) -> Self {
        let limiter = match config.server.max_connections {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };

        Self {
            config,
            file_lock: Mutex::new(()),
            limiter,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn file_lock(&self) -> &Mutex<()> {
        &self.file_lock
    }

    /// Waits for the file service lock, or returns `None` straight away when
    /// serialisation is turned off.
    pub async fn lock_file_service(&self) -> Option<MutexGuard<'_, ()>> {
        if self.config.server.serialize_file_service {
            Some(self.file_lock.lock().await)
        } else {
            None
        }
    }

    /// Waits for a free connection slot. The slot is held until the returned
    /// permit is dropped; unbounded contexts hand out `None`.
    pub async fn acquire_slot(&self) -> Result<Option<OwnedSemaphorePermit>, AcquireError> {
        match &self.limiter {
            Some(sem) => Ok(Some(Arc::clone(sem).acquire_owned().await?)),
            None => Ok(None),
        }
    }

    /// Free connection slots, or `None` if unbounded.
    pub fn available_slots(&self) -> Option<usize> {
        self.limiter.as_ref().map(|sem| sem.available_permits())
    }
}
