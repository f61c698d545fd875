//! Environment variable access.
//!
//! Stages read their configuration through [`Environment`] so the process
//! environment can be swapped for an in-memory map in tests.

use std::collections::HashMap;
use std::fmt;

/// Read-only source of environment variables
pub trait Environment {
    /// Raw value of `key`, if set
    fn var(&self, key: &str) -> Option<String>;

    /// Value of `key` when set to a non-empty string
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

/// The current process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// String that must never reach a log line.
///
/// `Debug` and `Display` print a placeholder; use [`Secret::expose`] where the
/// value is actually needed.
#[derive(Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a sensitive value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the wrapped value
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
