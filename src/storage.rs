// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! String key/value persistence and the JSON adapter on top of it.
//!
//! [`Storage`] is the only place that encodes or decodes collections. It never
//! lets a backend or decode failure escape: reads fall back to the caller's
//! default and writes report `false`, both with a log line.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A flat persistent string store.
pub trait KvBackend {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-process backend. Clones share the same map, so opening a second
/// database on a clone behaves like reloading from the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw access for inspecting or corrupting stored values in tests.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.inner.borrow_mut().insert(key.to_string(), value.to_string());
    }
}

impl KvBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.inner.borrow().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

pub struct Storage {
    backend: Box<dyn KvBackend>,
}

impl Storage {
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Decoded value under `key`, or `default` when the key is missing,
    /// unreadable, or holds something that does not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!(key, error = %e, "read failed, using default");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value is corrupt, using default");
                default
            }
        }
    }

    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get(key, T::default())
    }

    pub fn contains(&self, key: &str) -> bool {
        matches!(self.backend.read(key), Ok(Some(_)))
    }

    /// Encodes and writes `value`. Returns whether the write landed.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let encoded = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(key, error = %e, "encode failed");
                return false;
            }
        };
        match self.backend.write(key, &encoded) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key, error = %e, "write failed");
                false
            }
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.backend.keys().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "listing keys failed");
            Vec::new()
        })
    }
}
