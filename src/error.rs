//! Error types for SafeMap
//!
//! Provides a unified error type for all operations.
//!
//! A missing key is not an error: lookups report absence through
//! `Option`/`bool`.

use thiserror::Error;

/// Result type alias using SafeMapError
pub type Result<T> = std::result::Result<T, SafeMapError>;

/// Unified error type for SafeMap operations
#[derive(Debug, Error)]
pub enum SafeMapError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// The OS refused to spawn the coordinator thread
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    /// The store was terminated, or its coordinator is gone
    #[error("Store is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Usage Errors
    // -------------------------------------------------------------------------
    /// A scan callback tried to call back into the store it is scanning
    #[error("Reentrant call into the store from a scan callback")]
    ReentrantCall,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
