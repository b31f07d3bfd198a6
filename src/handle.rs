//! Client Handle
//!
//! `SafeMap` is the only thing callers hold. Every method packages a
//! request with its own reply slot, hands it to the coordinator, and blocks
//! until the reply arrives. Callers never touch the map itself.

use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use parking_lot::Mutex;
use tracing::{debug, error, trace, warn};

use crate::config::Config;
use crate::coordinator::{Coordinator, StopReason};
use crate::error::{Result, SafeMapError};
use crate::request::{channels, Outbox, Reply, Request};

/// State shared by every clone of one handle
struct Lifecycle {
    /// Set by the first `terminate`; checked before every submit
    closed: AtomicBool,

    /// Thread the coordinator (and so every scan callback) runs on
    coordinator: ThreadId,

    /// Taken by whichever `terminate` call gets there first
    worker: Mutex<Option<JoinHandle<StopReason>>>,
}

/// A concurrency-safe map served by a single coordinator thread
///
/// Cloning is cheap; clones talk to the same coordinator. When the last
/// clone is dropped the coordinator shuts itself down.
///
/// ## Scan callbacks
/// `for_each` and `for_each_until` run their callback on the coordinator
/// thread. Calling back into the same store from inside a callback would
/// deadlock, so it fails with [`SafeMapError::ReentrantCall`] instead.
pub struct SafeMap<K, V> {
    outbox: Outbox<K, V>,
    lifecycle: Arc<Lifecycle>,
}

impl<K, V> SafeMap<K, V>
where
    K: Eq + Hash + Send + 'static,
    V: Clone + Send + 'static,
{
    /// Create an empty store with the default config
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create an empty store and start its coordinator
    pub fn with_config(config: Config) -> Result<Self> {
        let (outbox, inbox) = channels(config.inbox_capacity);
        let worker = Coordinator::spawn(&config, inbox)?;

        let lifecycle = Lifecycle {
            closed: AtomicBool::new(false),
            coordinator: worker.thread().id(),
            worker: Mutex::new(Some(worker)),
        };

        Ok(Self {
            outbox,
            lifecycle: Arc::new(lifecycle),
        })
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Get a copy of the value stored under `key`
    ///
    /// `Ok(None)` means the key is absent; that is not an error.
    pub fn get(&self, key: K) -> Result<Option<V>> {
        trace!("get: called");
        self.call(|reply| Request::Read { key, reply })
    }

    /// Whether `key` is present
    pub fn exists(&self, key: K) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Number of entries
    pub fn size(&self) -> Result<usize> {
        trace!("size: called");
        self.call(|reply| Request::Len { reply })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert or overwrite `key`
    pub fn set(&self, key: K, value: V) -> Result<()> {
        trace!("set: called");
        self.call(|reply| Request::Write { key, value, reply })
    }

    /// Remove `key`; removing an absent key succeeds
    pub fn delete(&self, key: K) -> Result<()> {
        trace!("delete: called");
        self.call(|reply| Request::Delete { key, reply })
    }

    /// Remove every entry
    pub fn clear(&self) -> Result<()> {
        trace!("clear: called");
        self.call(|reply| Request::Clear { reply })
    }

    // =========================================================================
    // Scans
    // =========================================================================

    /// Call `visit` once per entry, in no particular order
    ///
    /// Returns after the whole map has been visited.
    pub fn for_each<F>(&self, visit: F) -> Result<()>
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        trace!("for_each: called");
        self.call(|reply| Request::ScanAll {
            visit: Box::new(visit),
            reply,
        })
    }

    /// Call `visit` per entry until it returns `true`
    ///
    /// Which entries are seen before the stop depends on map order.
    pub fn for_each_until<F>(&self, visit: F) -> Result<()>
    where
        F: FnMut(&K, &V) -> bool + Send + 'static,
    {
        trace!("for_each_until: called");
        self.call(|reply| Request::ScanUntil {
            visit: Box::new(visit),
            reply,
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Stop the coordinator for good
    ///
    /// The store is closed to new requests as soon as this is called.
    /// Requests still queued when the coordinator stops fail with `Closed`.
    /// Waits for the coordinator thread to exit. Calling it again, from any
    /// clone, is a no-op.
    pub fn terminate(&self) -> Result<()> {
        self.check_caller()?;

        if self.lifecycle.closed.swap(true, Ordering::AcqRel) {
            debug!("terminate: store already closed");
            return Ok(());
        }

        // Fails only if the coordinator already died
        if self.outbox.send(Request::Terminate).is_err() {
            debug!("terminate: coordinator already gone");
        }

        let worker = self.lifecycle.worker.lock().take();
        if let Some(worker) = worker {
            match worker.join() {
                Ok(reason) => debug!(?reason, "terminate: coordinator joined"),
                Err(_) => error!("terminate: coordinator thread panicked"),
            }
        }
        Ok(())
    }

    /// Whether the store no longer accepts requests
    pub fn is_closed(&self) -> bool {
        self.lifecycle.closed.load(Ordering::Acquire) || self.outbox.coordinator_gone()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Submit one request and wait for its reply
    fn call<T>(&self, build: impl FnOnce(Reply<T>) -> Request<K, V>) -> Result<T> {
        self.check_caller()?;
        if self.lifecycle.closed.load(Ordering::Acquire) {
            return Err(SafeMapError::Closed);
        }

        let (reply, rx) = Reply::channel();
        self.outbox.send(build(reply))?;
        self.outbox.wait(rx)
    }

    /// Reject calls made from the coordinator thread (scan callbacks)
    fn check_caller(&self) -> Result<()> {
        if thread::current().id() == self.lifecycle.coordinator {
            warn!("Rejected reentrant call from a scan callback");
            return Err(SafeMapError::ReentrantCall);
        }
        Ok(())
    }
}

// Manual impl: derive would demand K: Clone
impl<K, V> Clone for SafeMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            outbox: self.outbox.clone(),
            lifecycle: Arc::clone(&self.lifecycle),
        }
    }
}
