//! Request definitions
//!
//! Represents one operation sent to the coordinator.

use std::fmt;

use super::Reply;

/// Callback run for every entry of a full scan
pub type ScanFn<K, V> = Box<dyn FnMut(&K, &V) + Send>;

/// Callback run per entry of an early-break scan; `true` stops the scan
pub type ScanUntilFn<K, V> = Box<dyn FnMut(&K, &V) -> bool + Send>;

/// Request kinds, one inbox each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Read,
    Write,
    Delete,
    Len,
    Scan,
    Clear,
    Terminate,
}

/// A request envelope
pub enum Request<K, V> {
    /// Look up a key
    Read { key: K, reply: Reply<Option<V>> },

    /// Insert or overwrite a key
    Write { key: K, value: V, reply: Reply<()> },

    /// Remove a key (absent keys are fine)
    Delete { key: K, reply: Reply<()> },

    /// Count entries
    Len { reply: Reply<usize> },

    /// Visit every entry
    ScanAll {
        visit: ScanFn<K, V>,
        reply: Reply<()>,
    },

    /// Visit entries until the callback returns true
    ScanUntil {
        visit: ScanUntilFn<K, V>,
        reply: Reply<()>,
    },

    /// Remove every entry
    Clear { reply: Reply<()> },

    /// Stop the coordinator
    Terminate,
}

impl<K, V> Request<K, V> {
    /// Get the request kind
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::Read { .. } => RequestKind::Read,
            Request::Write { .. } => RequestKind::Write,
            Request::Delete { .. } => RequestKind::Delete,
            Request::Len { .. } => RequestKind::Len,
            Request::ScanAll { .. } | Request::ScanUntil { .. } => RequestKind::Scan,
            Request::Clear { .. } => RequestKind::Clear,
            Request::Terminate => RequestKind::Terminate,
        }
    }
}

// Callbacks aren't Debug, so only the variant is shown
impl<K, V> fmt::Debug for Request<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Request::Read { .. } => "Read",
            Request::Write { .. } => "Write",
            Request::Delete { .. } => "Delete",
            Request::Len { .. } => "Len",
            Request::ScanAll { .. } => "ScanAll",
            Request::ScanUntil { .. } => "ScanUntil",
            Request::Clear { .. } => "Clear",
            Request::Terminate => "Terminate",
        };
        f.write_str(name)
    }
}
