//! # SafeMap
//!
//! A concurrency-safe in-memory map with:
//! - One coordinator thread that exclusively owns the map
//! - Message passing instead of locks
//! - Blocking, synchronous-looking calls for any number of threads
//! - Fail-fast `Closed` errors after termination instead of hangs
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 SafeMap handles (any thread)                 │
//! │       get / set / delete / size / exists / for_each ...      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Request + one-shot Reply
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Inboxes (one per kind)                      │
//! │   Read │ Write │ Delete │ Len │ Scan │ Clear │ Terminate     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  select!
//!                       ▼
//!               ┌───────────────┐
//!               │  Coordinator  │
//!               │ (owns HashMap)│
//!               └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use safemap::SafeMap;
//!
//! let map: SafeMap<String, i32> = SafeMap::new()?;
//! map.set("a".to_string(), 1)?;
//! assert_eq!(map.get("a".to_string())?, Some(1));
//! map.terminate()?;
//! assert!(map.get("a".to_string()).is_err());
//! # Ok::<(), safemap::SafeMapError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod request;
pub mod coordinator;
pub mod handle;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SafeMapError, Result};
pub use config::{Config, InboxCapacity};
pub use handle::SafeMap;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SafeMap
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
