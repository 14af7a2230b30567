//! Per-execution-context scratch storage.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use serde_json::{Map, Value};

/// A mutable scratch mapping scoped to the current execution context.
///
/// Storage is explicitly keyed by the current thread's id: handlers running
/// under one execution context never see values written under another. The
/// scope is created lazily on first access and is *not* cleared between
/// invocations — a hosting runtime that reuses an execution context for
/// sequential invocations (warm start) leaves earlier values visible until a
/// handler clears them. That visibility is intentional; invocations against
/// one context are strictly sequential, so access is uncontended in practice.
///
/// Cloning a `Globals` yields a handle to the same storage, so the handle can
/// be shared between the application and handler closures.
#[derive(Clone, Default)]
pub struct Globals {
    scopes: Arc<Mutex<HashMap<ThreadId, Map<String, Value>>>>,
}

impl Globals {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the value under `key` in the current scope.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.with(|scope| scope.get(key).cloned())
    }

    /// Sets `key` in the current scope, returning any replaced value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.with(|scope| scope.insert(key.into(), value.into()))
    }

    /// Removes `key` from the current scope.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.with(|scope| scope.remove(key))
    }

    /// Clears the current scope only; other execution contexts are untouched.
    pub fn clear(&self) {
        self.with(Map::clear);
    }

    /// Runs `f` with mutable access to the current scope.
    pub fn with<T>(&self, f: impl FnOnce(&mut Map<String, Value>) -> T) -> T {
        let mut scopes = self.scopes.lock();
        let scope = scopes.entry(thread::current().id()).or_default();
        f(scope)
    }
}
