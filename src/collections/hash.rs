//! Remote-backed hash
//!
//! An associative container whose fields live in the store under a fixed
//! key name. The object itself is a stateless view: constructing or
//! dropping it has no remote side effect.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::StoreHandle;
use crate::codec;
use crate::error::Result;
use crate::protocol::Command;

use super::{decode_bulk_set, decode_bulk_vec, reply_count, reply_flag, round_trip};

/// A typed hash stored remotely under a fixed key name
///
/// `K` must encode injectively (keys that differ must encode differently);
/// the fixed-width codec guarantees this for every common key type. `V`
/// carries no uniqueness requirement.
pub struct RemoteHash<K, V> {
    /// Shared ownership of the store session
    handle: Arc<StoreHandle>,

    /// Hash key (name), immutable after construction
    name: String,

    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> RemoteHash<K, V>
where
    K: Serialize + DeserializeOwned + Eq + Hash,
    V: Serialize + DeserializeOwned,
{
    /// Bind a typed hash view to `name` over the given handle
    pub fn new(handle: Arc<StoreHandle>, name: impl Into<String>) -> Self {
        Self {
            handle,
            name: name.into(),
            _marker: PhantomData,
        }
    }

    /// The store key this hash is bound to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unconditional upsert
    ///
    /// Returns true if the field was newly created, false if an existing
    /// field's value was overwritten.
    pub fn set(&self, key: &K, value: &V) -> Result<bool> {
        let reply = round_trip(
            &self.handle,
            Command::HashSet {
                name: self.name.clone(),
                field: codec::encode(key)?,
                value: codec::encode(value)?,
            },
        )?;
        Ok(reply_flag(&reply))
    }

    /// Upsert only if the key does not already exist
    ///
    /// Returns true if the field was created, false if a pre-existing
    /// entry blocked the write (its value is unchanged).
    pub fn set_if_absent(&self, key: &K, value: &V) -> Result<bool> {
        let reply = round_trip(
            &self.handle,
            Command::HashSetIfAbsent {
                name: self.name.clone(),
                field: codec::encode(key)?,
                value: codec::encode(value)?,
            },
        )?;
        Ok(reply_flag(&reply))
    }

    /// Whether the field exists in the store
    pub fn exists(&self, key: &K) -> Result<bool> {
        let reply = round_trip(
            &self.handle,
            Command::HashExists {
                name: self.name.clone(),
                field: codec::encode(key)?,
            },
        )?;
        Ok(reply_flag(&reply))
    }

    /// Fetch one field
    ///
    /// `None` if the field does not exist in the store, or if it exists
    /// but fails to decode as `V`; the two causes are indistinguishable
    /// at this layer.
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        let reply = round_trip(
            &self.handle,
            Command::HashGet {
                name: self.name.clone(),
                field: codec::encode(key)?,
            },
        )?;
        Ok(reply.as_bulk().and_then(codec::decode))
    }

    /// Remove one field
    ///
    /// Returns true iff an entry was actually removed.
    pub fn delete(&self, key: &K) -> Result<bool> {
        let reply = round_trip(
            &self.handle,
            Command::HashDelete {
                name: self.name.clone(),
                fields: vec![codec::encode(key)?],
            },
        )?;
        Ok(reply_flag(&reply))
    }

    /// Number of fields in the hash
    pub fn len(&self) -> Result<usize> {
        let reply = round_trip(
            &self.handle,
            Command::HashLen {
                name: self.name.clone(),
            },
        )?;
        Ok(reply_count(&reply))
    }

    /// Whether the hash holds no fields
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Every stored field key that decodes as `K`
    ///
    /// Fields with undecodable keys are silently skipped.
    pub fn keys(&self) -> Result<HashSet<K>> {
        let reply = round_trip(
            &self.handle,
            Command::HashKeys {
                name: self.name.clone(),
            },
        )?;
        Ok(decode_bulk_set(&reply))
    }

    /// Every stored field value that decodes as `V`
    ///
    /// Order is whatever the store returns and is not reproducible
    /// across calls.
    pub fn values(&self) -> Result<Vec<V>> {
        let reply = round_trip(
            &self.handle,
            Command::HashValues {
                name: self.name.clone(),
            },
        )?;
        Ok(decode_bulk_vec(&reply))
    }

    /// Keys zipped with their corresponding values
    ///
    /// Built from `keys()` followed by one `get` per key, a separate
    /// round trip each. The result is not atomic relative to concurrent
    /// mutators: keys deleted in between are omitted, keys added in
    /// between are not observed.
    pub fn entries(&self) -> Result<HashMap<K, V>> {
        let keys = self.keys()?;

        let mut entries = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.get(&key)? {
                entries.insert(key, value);
            }
        }

        Ok(entries)
    }
}
