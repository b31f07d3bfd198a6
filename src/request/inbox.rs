//! Request channels
//!
//! One channel per request kind. Handles hold the sending side (`Outbox`),
//! the coordinator holds the receiving side (`Inbox`). Requests of the same
//! kind are received in FIFO order; across kinds, whichever inbox
//! `select!` picks is serviced next.
//!
//! A zero-sized liveness channel rides alongside: the coordinator holds its
//! only sender, so it disconnects the moment the coordinator is gone (even
//! by panic) and wakes every caller still waiting for a reply.

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

use crate::config::InboxCapacity;
use crate::error::{Result, SafeMapError};

use super::{Request, RequestKind};

/// Open the request channels for one store
pub fn channels<K, V>(capacity: InboxCapacity) -> (Outbox<K, V>, Inbox<K, V>) {
    let (read_tx, read_rx) = open(capacity);
    let (write_tx, write_rx) = open(capacity);
    let (delete_tx, delete_rx) = open(capacity);
    let (len_tx, len_rx) = open(capacity);
    let (scan_tx, scan_rx) = open(capacity);
    let (clear_tx, clear_rx) = open(capacity);
    let (terminate_tx, terminate_rx) = open(capacity);
    let (alive_tx, alive_rx) = channel::bounded(0);

    let outbox = Outbox {
        read: read_tx,
        write: write_tx,
        delete: delete_tx,
        len: len_tx,
        scan: scan_tx,
        clear: clear_tx,
        terminate: terminate_tx,
        alive: alive_rx,
    };
    let inbox = Inbox {
        read: read_rx,
        write: write_rx,
        delete: delete_rx,
        len: len_rx,
        scan: scan_rx,
        clear: clear_rx,
        terminate: terminate_rx,
        _alive: alive_tx,
    };
    (outbox, inbox)
}

fn open<T>(capacity: InboxCapacity) -> (Sender<T>, Receiver<T>) {
    match capacity {
        InboxCapacity::Rendezvous => channel::bounded(0),
        InboxCapacity::Bounded { capacity } => channel::bounded(capacity),
        InboxCapacity::Unbounded => channel::unbounded(),
    }
}

// =============================================================================
// Sending Side
// =============================================================================

/// Senders for every inbox of one store
pub struct Outbox<K, V> {
    read: Sender<Request<K, V>>,
    write: Sender<Request<K, V>>,
    delete: Sender<Request<K, V>>,
    len: Sender<Request<K, V>>,
    scan: Sender<Request<K, V>>,
    clear: Sender<Request<K, V>>,
    terminate: Sender<Request<K, V>>,

    /// Never carries a message; disconnects when the coordinator is gone
    alive: Receiver<()>,
}

impl<K, V> Outbox<K, V> {
    /// Route a request to the inbox for its kind
    ///
    /// Fails with `Closed` once the coordinator has dropped its inboxes.
    pub fn send(&self, request: Request<K, V>) -> Result<()> {
        let tx = match request.kind() {
            RequestKind::Read => &self.read,
            RequestKind::Write => &self.write,
            RequestKind::Delete => &self.delete,
            RequestKind::Len => &self.len,
            RequestKind::Scan => &self.scan,
            RequestKind::Clear => &self.clear,
            RequestKind::Terminate => &self.terminate,
        };
        tx.send(request).map_err(|_| SafeMapError::Closed)
    }

    /// Block on a reply until it arrives or the coordinator is gone
    pub fn wait<T>(&self, reply: Receiver<T>) -> Result<T> {
        crossbeam::select! {
            recv(reply) -> value => value.map_err(|_| SafeMapError::Closed),
            // The reply may have landed just before the coordinator exited
            recv(self.alive) -> _ => reply.try_recv().map_err(|_| SafeMapError::Closed),
        }
    }

    /// Whether the coordinator has stopped running
    pub fn coordinator_gone(&self) -> bool {
        matches!(self.alive.try_recv(), Err(TryRecvError::Disconnected))
    }
}

// Manual impl: derive would demand K: Clone and V: Clone
impl<K, V> Clone for Outbox<K, V> {
    fn clone(&self) -> Self {
        Self {
            read: self.read.clone(),
            write: self.write.clone(),
            delete: self.delete.clone(),
            len: self.len.clone(),
            scan: self.scan.clone(),
            clear: self.clear.clone(),
            terminate: self.terminate.clone(),
            alive: self.alive.clone(),
        }
    }
}

// =============================================================================
// Receiving Side
// =============================================================================

/// Receivers for every inbox of one store
pub struct Inbox<K, V> {
    read: Receiver<Request<K, V>>,
    write: Receiver<Request<K, V>>,
    delete: Receiver<Request<K, V>>,
    len: Receiver<Request<K, V>>,
    scan: Receiver<Request<K, V>>,
    clear: Receiver<Request<K, V>>,
    terminate: Receiver<Request<K, V>>,

    /// Dropped together with the inbox
    _alive: Sender<()>,
}

impl<K, V> Inbox<K, V> {
    /// Block until any inbox yields a request
    ///
    /// Returns `None` once every handle is gone. Senders for all inboxes live
    /// in one `Outbox`, so one disconnected inbox means all are.
    pub fn recv(&self) -> Option<Request<K, V>> {
        let received = crossbeam::select! {
            recv(self.read) -> msg => msg,
            recv(self.write) -> msg => msg,
            recv(self.delete) -> msg => msg,
            recv(self.len) -> msg => msg,
            recv(self.scan) -> msg => msg,
            recv(self.clear) -> msg => msg,
            recv(self.terminate) -> msg => msg,
        };
        received.ok()
    }

    /// Drop every request still waiting in any inbox
    ///
    /// Dropping a request drops its reply slot, which wakes its caller with
    /// a closed error. Returns how many requests were rejected.
    pub fn drain(&self) -> usize {
        let mut rejected = 0;
        for rx in self.receivers() {
            while let Ok(request) = rx.try_recv() {
                tracing::trace!(?request, "Rejecting queued request");
                rejected += 1;
            }
        }
        rejected
    }

    fn receivers(&self) -> [&Receiver<Request<K, V>>; 7] {
        [
            &self.read,
            &self.write,
            &self.delete,
            &self.len,
            &self.scan,
            &self.clear,
            &self.terminate,
        ]
    }
}
