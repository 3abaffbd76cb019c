//! # Pica Configuration
//!
//! A minimal string key/value store. Keys are dotted (`blob.backend`,
//! `http.port`); typed readers live on the immutable [`PicaConfigSnapshot`].
//!
//! ## Environment overrides
//! [`PicaConfig::load_env`] copies every variable starting with a prefix,
//! lowercasing it and turning `__` into `.`:
//!
//! ```bash
//! export PICA__BLOB__BACKEND=fs   # -> blob.backend = "fs"
//! ```
//!
//! Backends are chosen once from a snapshot at startup.

use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct PicaConfig {
    values: HashMap<String, String>,
}

impl PicaConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Build a config from the current process environment.
    pub fn from_env(prefix: &str) -> Self {
        let mut config = Self::new();
        config.load_env(prefix);
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

    /// Builder form of [`set`](Self::set).
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Overlay variables from `vars` whose name starts with `prefix`.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                if !normalized.is_empty() {
                    self.set(normalized, value);
                }
            }
        }
    }

    /// Overlay the process environment (`PICA__HTTP__PORT` -> `http.port`).
    pub fn load_env(&mut self, prefix: &str) {
        self.load_vars(prefix, std::env::vars());
    }

    pub fn snapshot(&self) -> PicaConfigSnapshot {
        PicaConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PicaConfigSnapshot {
    map: HashMap<String, String>,
}

impl PicaConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str()).filter(|s| !s.is_empty())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse::<usize>().ok())
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|v| v.trim().parse::<u32>().ok())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    /// Comma separated list, trimmed, empty items dropped.
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}
