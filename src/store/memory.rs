//! In-memory data store.
//!
//! Holds a JSON tree and answers reads the way the remote database does. Every
//! read is recorded, and individual keys can be made to fail or respond slowly,
//! which makes it the store of choice for tests and the offline demo.

use super::{DataStore, DbPath, Snapshot};
use crate::error::{DashError, Result};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct MemoryStore {
    root: RwLock<Value>,
    reads: Mutex<Vec<DbPath>>,
    failures: Mutex<HashMap<DbPath, String>>,
    latency: Mutex<HashMap<DbPath, Duration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an entire tree.
    pub fn from_value(root: Value) -> Self {
        let store = Self::new();
        *store.root.write() = root;
        store
    }

    /// Write `value` at `path`, creating intermediate objects as needed.
    pub fn set(&self, path: &DbPath, value: Value) {
        let mut root = self.root.write();
        let mut node = &mut *root;
        for segment in path.segments() {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            node = match node {
                Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
                _ => unreachable!("node was just made an object"),
            };
        }
        *node = value;
    }

    /// Make reads of `path` fail with `message`.
    pub fn fail(&self, path: &DbPath, message: impl Into<String>) {
        self.failures.lock().insert(path.clone(), message.into());
    }

    /// Delay reads of `path` by `delay`.
    pub fn delay(&self, path: &DbPath, delay: Duration) {
        self.latency.lock().insert(path.clone(), delay);
    }

    /// Paths read so far, in the order the reads started.
    pub fn reads(&self) -> Vec<DbPath> {
        self.reads.lock().clone()
    }

    pub fn read_count(&self) -> usize {
        self.reads.lock().len()
    }

    fn lookup(&self, path: &DbPath) -> Value {
        let root = self.root.read();
        let mut node = &*root;
        for segment in path.segments() {
            node = match node {
                Value::Object(map) => match map.get(segment) {
                    Some(child) => child,
                    None => return Value::Null,
                },
                Value::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get(i)) {
                    Some(child) => child,
                    None => return Value::Null,
                },
                _ => return Value::Null,
            };
        }
        node.clone()
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn get(&self, path: &DbPath, _id_token: Option<&str>) -> Result<Snapshot> {
        self.reads.lock().push(path.clone());

        let delay = self.latency.lock().get(path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.lock().get(path).cloned();
        if let Some(message) = failure {
            return Err(DashError::store(path.to_string(), 503, message));
        }

        Ok(Snapshot::new(path.clone(), self.lookup(path)))
    }
}
