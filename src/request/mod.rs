//! Request Module
//!
//! Defines the message protocol between handles and the coordinator.
//!
//! ## Flow
//! ```text
//! ┌──────────┐  Request + Reply   ┌───────────┐   select!   ┌─────────────┐
//! │  Caller  │ ─────────────────▶ │   Inbox   │ ──────────▶ │ Coordinator │
//! │ (blocks) │ ◀───────────────── │ (per kind)│             │  (owns map) │
//! └──────────┘   one-shot reply   └───────────┘             └─────────────┘
//! ```
//!
//! ### Request Kinds
//! - Read:      Payload: key                  Reply: Option<value>
//! - Write:     Payload: key + value          Reply: ()
//! - Delete:    Payload: key                  Reply: ()
//! - Len:       Payload: empty                Reply: entry count
//! - Scan:      Payload: callback             Reply: () once the scan ends
//! - Clear:     Payload: empty                Reply: ()
//! - Terminate: Payload: empty                Reply: none (thread is joined)

mod envelope;
mod inbox;
mod reply;

pub use envelope::{Request, RequestKind, ScanFn, ScanUntilFn};
pub use inbox::{channels, Inbox, Outbox};
pub use reply::Reply;
