//! Cross-process mutual exclusion around read/modify/write sequences.
//!
//! The production backend is a lock file whose existence means "held".
//! Acquisition polls until the file can be created. There is no timeout by
//! default, so a lock file left behind by a crashed process blocks every
//! later invocation until it is removed by hand.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::interrupt::{self, InterruptedError};

/// A mutual-exclusion primitive that can be tried without blocking.
pub trait LockBackend {
    /// Attempts to take the lock once. Returns `Ok(false)` if it is held.
    fn try_acquire(&self) -> Result<bool>;

    fn release(&self) -> Result<()>;
}

/// Lock held while a file exists at `path`.
#[derive(Debug, Clone)]
pub struct FileLock {
    path: PathBuf,
}

impl FileLock {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LockBackend for FileLock {
    fn try_acquire(&self) -> Result<bool> {
        // create_new fails if the file exists, so check and create are one step.
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to create lock {}", self.path.display()))
            }
        }
    }

    fn release(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove lock {}", self.path.display()))
            }
        }
    }
}

/// In-process lock for tests.
#[derive(Debug, Default)]
pub struct MemoryLock {
    held: AtomicBool,
}

impl MemoryLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}

impl LockBackend for MemoryLock {
    fn try_acquire(&self) -> Result<bool> {
        Ok(self
            .held
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok())
    }

    fn release(&self) -> Result<()> {
        self.held.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// How long and how often to retry a held lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPolicy {
    pub poll_interval: Duration,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl LockPolicy {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

#[derive(Debug)]
pub struct LockTimeoutError {
    pub waited: Duration,
}

impl std::fmt::Display for LockTimeoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timed out after {:?} waiting for the lock", self.waited)
    }
}

impl std::error::Error for LockTimeoutError {}

/// Releases the lock when dropped.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a, B: LockBackend> {
    backend: &'a B,
}

impl<B: LockBackend> Drop for LockGuard<'_, B> {
    fn drop(&mut self) {
        if let Err(err) = self.backend.release() {
            tracing::error!("failed to release lock: {err:#}");
        }
    }
}

/// Blocks until the lock is taken, the policy times out, or Ctrl+C is pressed.
///
/// # Errors
/// Returns [`LockTimeoutError`] or [`InterruptedError`] (both downcastable
/// from the `anyhow::Error`), or the backend's I/O error.
pub fn acquire<'a, B: LockBackend>(
    backend: &'a B,
    policy: &LockPolicy,
) -> Result<LockGuard<'a, B>> {
    acquire_with(backend, policy, interrupt::is_interrupted)
}

/// Like [`acquire`], with a custom cancellation check.
pub fn acquire_with<'a, B, F>(
    backend: &'a B,
    policy: &LockPolicy,
    cancelled: F,
) -> Result<LockGuard<'a, B>>
where
    B: LockBackend,
    F: Fn() -> bool,
{
    let started = Instant::now();
    let mut logged_wait = false;

    loop {
        if backend.try_acquire()? {
            return Ok(LockGuard { backend });
        }

        if !logged_wait {
            tracing::debug!("lock is held, waiting");
            logged_wait = true;
        }

        if cancelled() {
            return Err(InterruptedError.into());
        }

        let waited = started.elapsed();
        if let Some(timeout) = policy.timeout
            && waited >= timeout
        {
            return Err(LockTimeoutError { waited }.into());
        }

        std::thread::sleep(policy.poll_interval);
    }
}
