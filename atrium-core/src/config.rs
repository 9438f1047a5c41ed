//! # Atrium Configuration
//!
//! A minimal string key/value store. Values are loaded explicitly (from the
//! function invocation's `env` map, or any other source the caller picks) and
//! read through an immutable [`AtriumConfigSnapshot`]. Business logic never
//! looks at process environment variables.
//!
//! ```rust
//! use atrium_core::AtriumConfig;
//!
//! let mut config = AtriumConfig::new();
//! config.set("WEBHOOK_TIMEOUT_SECS", "5");
//!
//! let snapshot = config.snapshot();
//! assert_eq!(snapshot.get_u64("WEBHOOK_TIMEOUT_SECS"), Some(5));
//! assert!(snapshot.require("APPWRITE_ENDPOINT").is_err());
//! ```

use std::collections::HashMap;

use crate::errors::AtriumError;

#[derive(Debug, Default)]
pub struct AtriumConfig {
    values: HashMap<String, String>,
}

impl AtriumConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Load every pair from an iterator, e.g. an invocation `env` map.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = Self::new();
        for (key, value) in pairs {
            config.set(key, value);
        }
        config
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn snapshot(&self) -> AtriumConfigSnapshot {
        AtriumConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AtriumConfigSnapshot {
    map: HashMap<String, String>,
}

impl AtriumConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    /// Blank values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map
            .get(key)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    /// Accepts `true/false`, `1/0`, `yes/no` (case-insensitive).
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)?.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        }
    }

    /// Like [`get`](Self::get) but a missing key is a configuration error.
    pub fn require(&self, key: &str) -> Result<&str, AtriumError> {
        self.get(key).ok_or_else(|| {
            AtriumError::configuration(format!("missing required configuration key {key}"))
        })
    }
}
