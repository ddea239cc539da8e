//! Remote data store abstraction.
//!
//! The dashboard only needs point reads over a hierarchical keyspace. This module
//! defines the [`DataStore`] trait together with the key and snapshot types, and
//! hosts the REST and in-memory implementations.

pub mod memory;
pub mod path;
pub mod rest;

use crate::error::{DashError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use memory::MemoryStore;
pub use path::DbPath;
pub use rest::RestDataStore;

/// Result of a point read: the key that was read and the value found there, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    path: DbPath,
    value: Option<Value>,
}

impl Snapshot {
    /// JSON `null` is how the database reports an absent key.
    pub fn new(path: DbPath, value: Value) -> Self {
        let value = if value.is_null() { None } else { Some(value) };
        Self { path, value }
    }

    pub fn path(&self) -> &DbPath {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Decode the stored value into `T`, `None` when nothing is stored.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Option<T>> {
        let Snapshot { path, value } = self;
        value
            .map(|value| {
                serde_json::from_value(value).map_err(|err| DashError::decode(path.to_string(), err))
            })
            .transpose()
    }
}

/// Read access to a hierarchical key-value database.
///
/// `id_token` authorizes the read on behalf of the signed-in user; stores that do
/// not enforce rules may ignore it.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn get(&self, path: &DbPath, id_token: Option<&str>) -> Result<Snapshot>;
}
