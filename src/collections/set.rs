//! Remote-backed set
//!
//! A set container whose members live in the store under a fixed key
//! name, with server-side set algebra across two containers sharing the
//! same handle.
//!
//! Membership is determined by encoded-byte equality, not by `T`'s `Eq`;
//! the deterministic codec makes the two coincide for ordinary types.

use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::StoreHandle;
use crate::codec;
use crate::error::Result;
use crate::protocol::Command;

use super::{decode_bulk_set, reply_count, reply_flag, round_trip};

/// A typed set stored remotely under a fixed key name
pub struct RemoteSet<T> {
    /// Shared ownership of the store session
    handle: Arc<StoreHandle>,

    /// Set key (name), immutable after construction
    name: String,

    _marker: PhantomData<fn() -> T>,
}

impl<T> RemoteSet<T>
where
    T: Serialize + DeserializeOwned + Eq + Hash,
{
    /// Bind a typed set view to `name` over the given handle
    pub fn new(handle: Arc<StoreHandle>, name: impl Into<String>) -> Self {
        Self {
            handle,
            name: name.into(),
            _marker: PhantomData,
        }
    }

    /// The store key this set is bound to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add one member
    ///
    /// Returns the number of members newly inserted (0 if it was already
    /// present).
    pub fn add(&self, member: &T) -> Result<usize> {
        self.add_all(std::iter::once(member))
    }

    /// Add every member of a collection
    ///
    /// Duplicates across the call and members already present do not
    /// increase the returned count. An empty collection issues no
    /// command and returns 0.
    pub fn add_all<'a, I>(&self, members: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let members = encode_members(members)?;
        if members.is_empty() {
            return Ok(0);
        }

        let reply = round_trip(
            &self.handle,
            Command::SetAdd {
                name: self.name.clone(),
                members,
            },
        )?;
        Ok(reply_count(&reply))
    }

    /// Remove one member
    ///
    /// Returns the number of members actually removed.
    pub fn remove(&self, member: &T) -> Result<usize> {
        self.remove_all(std::iter::once(member))
    }

    /// Remove every member of a collection
    ///
    /// An empty collection issues no command and returns 0.
    pub fn remove_all<'a, I>(&self, members: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let members = encode_members(members)?;
        if members.is_empty() {
            return Ok(0);
        }

        let reply = round_trip(
            &self.handle,
            Command::SetRemove {
                name: self.name.clone(),
                members,
            },
        )?;
        Ok(reply_count(&reply))
    }

    /// Number of members in the set
    pub fn cardinality(&self) -> Result<usize> {
        let reply = round_trip(
            &self.handle,
            Command::SetCard {
                name: self.name.clone(),
            },
        )?;
        Ok(reply_count(&reply))
    }

    /// Whether the member is in the set
    pub fn contains(&self, member: &T) -> Result<bool> {
        let reply = round_trip(
            &self.handle,
            Command::SetContains {
                name: self.name.clone(),
                member: codec::encode(member)?,
            },
        )?;
        Ok(reply_flag(&reply))
    }

    /// Every stored member that decodes as `T`
    ///
    /// Undecodable members are silently skipped.
    pub fn members(&self) -> Result<HashSet<T>> {
        let reply = round_trip(
            &self.handle,
            Command::SetMembers {
                name: self.name.clone(),
            },
        )?;
        Ok(decode_bulk_set(&reply))
    }

    /// Remove every member, returning the count removed
    ///
    /// Built from `members()` followed by a bulk remove, two round
    /// trips. A member added between the two calls is not cleared.
    pub fn clear(&self) -> Result<usize> {
        let members = self.members()?;
        self.remove_all(members.iter())
    }

    /// Members of this set absent from `other`, computed server-side
    ///
    /// Both sets must share the same handle; cross-session algebra is
    /// unsupported.
    pub fn difference(&self, other: &RemoteSet<T>) -> Result<HashSet<T>> {
        let reply = round_trip(
            &self.handle,
            Command::SetDiff {
                name: self.name.clone(),
                other: other.name.clone(),
            },
        )?;
        Ok(decode_bulk_set(&reply))
    }

    /// Members present in both sets, computed server-side
    pub fn intersection(&self, other: &RemoteSet<T>) -> Result<HashSet<T>> {
        let reply = round_trip(
            &self.handle,
            Command::SetInter {
                name: self.name.clone(),
                other: other.name.clone(),
            },
        )?;
        Ok(decode_bulk_set(&reply))
    }

    /// Members present in either set, computed server-side
    pub fn union(&self, other: &RemoteSet<T>) -> Result<HashSet<T>> {
        let reply = round_trip(
            &self.handle,
            Command::SetUnion {
                name: self.name.clone(),
                other: other.name.clone(),
            },
        )?;
        Ok(decode_bulk_set(&reply))
    }
}

/// Encode a collection of members for the wire
fn encode_members<'a, T, I>(members: I) -> Result<Vec<Vec<u8>>>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    members.into_iter().map(codec::encode).collect()
}
