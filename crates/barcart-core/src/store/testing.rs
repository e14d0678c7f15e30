//! Test doubles for `KeyValueStore`.
//!
//! - `FlakyStore`: a working in-memory store with switchable failures and a
//!   read gate, for scenarios that need real state across calls
//! - `MockStore`: mockall expectations, for checking exactly which store
//!   calls an operation makes

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;

use super::{KeyValueStore, MemoryStore};
use crate::error::{StoreError, StoreResult};

mockall::mock! {
    pub Store {}

    #[async_trait]
    impl KeyValueStore for Store {
        async fn get(&self, key: &str) -> StoreResult<Option<String>>;
        async fn set(&self, key: &str, value: String) -> StoreResult<()>;
        async fn remove(&self, key: &str) -> StoreResult<()>;
    }
}

#[derive(Debug)]
pub(crate) struct FlakyStore {
    pub inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    /// Reads wait while this is `false`.
    reads_open: watch::Sender<bool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        let (reads_open, _) = watch::channel(true);
        Self {
            inner: MemoryStore::new(),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            reads_open,
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Park every `get` until `release_reads`.
    pub fn hold_reads(&self) {
        self.reads_open.send_replace(false);
    }

    pub fn release_reads(&self) {
        self.reads_open.send_replace(true);
    }

    fn check(flag: &AtomicBool, op: &str) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::Storage(format!("simulated {} failure", op)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut open = self.reads_open.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = open.wait_for(|open| *open).await;
        Self::check(&self.fail_reads, "read")?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        Self::check(&self.fail_writes, "write")?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        Self::check(&self.fail_writes, "delete")?;
        self.inner.remove(key).await
    }
}
