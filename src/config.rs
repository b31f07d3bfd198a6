//! Configuration for SafeMap
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, SafeMapError};

/// Main configuration for a SafeMap instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Inbox Configuration
    // -------------------------------------------------------------------------
    /// Capacity of each request inbox (one inbox per request kind)
    pub inbox_capacity: InboxCapacity,

    // -------------------------------------------------------------------------
    // Coordinator Configuration
    // -------------------------------------------------------------------------
    /// Name given to the coordinator thread (shows up in panics and tracing)
    pub thread_name: String,
}

/// How many requests an inbox may hold before senders block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboxCapacity {
    /// Zero capacity: a sender blocks until the coordinator takes its request
    Rendezvous,

    /// Up to `capacity` queued requests per inbox
    Bounded { capacity: usize },

    /// Never blocks on send
    Unbounded,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inbox_capacity: InboxCapacity::Rendezvous,
            thread_name: "safemap-coordinator".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config before a coordinator is spawned with it
    pub fn validate(&self) -> Result<()> {
        // std::thread::Builder panics on interior NULs
        if self.thread_name.contains('\0') {
            return Err(SafeMapError::Config(format!(
                "thread name {:?} contains a NUL byte",
                self.thread_name
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the inbox capacity
    pub fn inbox_capacity(mut self, capacity: InboxCapacity) -> Self {
        self.config.inbox_capacity = capacity;
        self
    }

    /// Set the coordinator thread name
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
