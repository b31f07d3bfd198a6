//! Coordinator Module
//!
//! The single worker that owns the map.
//!
//! ## Responsibilities
//! - Own the only reference to the map
//! - Receive requests from every inbox, one at a time
//! - Handle each request to completion before taking the next
//! - Reject whatever is still queued when it stops

use std::collections::HashMap;
use std::hash::Hash;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, trace};

use crate::config::Config;
use crate::error::Result;
use crate::request::{Inbox, Request};

/// Why the coordinator loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A handle sent `Terminate`
    Terminated,

    /// Every handle was dropped
    Disconnected,
}

/// Owner of the map
///
/// ## Concurrency Model: Single Writer, No Locks
///
/// - The map lives on the coordinator thread and nowhere else
/// - Reads, writes, scans and clears all arrive as requests
/// - Exactly one request is being handled at any moment, so no reader ever
///   sees a half-applied write
///
/// Scan callbacks run on this thread. A callback that calls back into the
/// same store is rejected by the handle (see `SafeMapError::ReentrantCall`).
pub struct Coordinator<K, V> {
    /// The store
    map: HashMap<K, V>,

    /// Receiving side of every request channel
    inbox: Inbox<K, V>,

    /// Requests handled so far
    served: u64,
}

impl<K, V> Coordinator<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a coordinator with an empty map
    pub fn new(inbox: Inbox<K, V>) -> Self {
        Self {
            map: HashMap::new(),
            inbox,
            served: 0,
        }
    }

    /// Start a coordinator on its own named thread
    pub fn spawn(config: &Config, inbox: Inbox<K, V>) -> Result<JoinHandle<StopReason>>
    where
        K: Send + 'static,
        V: Send + 'static,
    {
        config.validate()?;

        let coordinator = Self::new(inbox);
        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || coordinator.run())?;

        debug!(thread = %config.thread_name, "Coordinator thread spawned");
        Ok(handle)
    }

    /// Run until terminated or disconnected
    ///
    /// The map is dropped on return.
    pub fn run(mut self) -> StopReason {
        info!("Coordinator started");

        let reason = loop {
            match self.inbox.recv() {
                Some(Request::Terminate) => break StopReason::Terminated,
                Some(request) => self.handle(request),
                None => break StopReason::Disconnected,
            }
        };

        let rejected = self.inbox.drain();
        info!(
            ?reason,
            served = self.served,
            rejected,
            entries = self.map.len(),
            "Coordinator stopped"
        );
        reason
    }

    /// Handle one request and send its reply
    fn handle(&mut self, request: Request<K, V>) {
        trace!(?request, "Handling request");
        self.served += 1;

        match request {
            Request::Read { key, reply } => {
                reply.send(self.map.get(&key).cloned());
            }

            Request::Write { key, value, reply } => {
                self.map.insert(key, value);
                reply.send(());
            }

            Request::Delete { key, reply } => {
                // Absent keys are not an error
                self.map.remove(&key);
                reply.send(());
            }

            Request::Len { reply } => {
                reply.send(self.map.len());
            }

            Request::ScanAll { mut visit, reply } => {
                for (key, value) in &self.map {
                    visit(key, value);
                }
                reply.send(());
            }

            Request::ScanUntil { mut visit, reply } => {
                // any() stops at the first true
                let stopped_early = self.map.iter().any(|(key, value)| visit(key, value));
                trace!(stopped_early, "Early-break scan finished");
                reply.send(());
            }

            Request::Clear { reply } => {
                self.map.clear();
                reply.send(());
            }

            // Intercepted by run()
            Request::Terminate => {}
        }
    }
}
