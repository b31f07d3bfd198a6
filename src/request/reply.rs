//! One-shot reply slot
//!
//! Each request carries its own `Reply`. Sending consumes it, so a reply
//! slot delivers at most one value. Dropping it unsent disconnects the
//! waiting caller, which then reports the store as closed.

use crossbeam::channel::{self, Receiver, Sender};

/// Sending half of a one-shot reply channel
pub struct Reply<T> {
    tx: Sender<T>,
}

impl<T> Reply<T> {
    /// Create a reply slot and the receiver the caller waits on
    pub fn channel() -> (Reply<T>, Receiver<T>) {
        let (tx, rx) = channel::bounded(1);
        (Reply { tx }, rx)
    }

    /// Deliver the reply
    pub fn send(self, value: T) {
        // Capacity 1 and a single send: never blocks
        if self.tx.send(value).is_err() {
            tracing::trace!("Reply dropped, caller no longer waiting");
        }
    }
}
