//! Typed Collections
//!
//! Remote-backed containers bound to a fixed store key name. Each
//! operation encodes its inputs, issues one command on the shared handle,
//! forces a flush, and decodes the reply with the pure helpers below.
//!
//! ## Decode-skip policy
//!
//! Any remote entry that fails to decode as the expected type is omitted
//! from bulk results rather than raising an error; the store is a shared,
//! possibly heterogeneously-typed namespace, and foreign entries must
//! degrade to absence. Error replies and unexpected reply shapes decode
//! to the operation's zero value for the same reason.

use std::collections::HashSet;
use std::hash::Hash;

use serde::de::DeserializeOwned;

use crate::client::StoreHandle;
use crate::codec;
use crate::error::Result;
use crate::protocol::{Command, Reply};

mod hash;
mod set;

pub use hash::RemoteHash;
pub use set::RemoteSet;

/// Issue one command and synchronously resolve its reply
///
/// The flush after every issue is what gives the containers their
/// blocking request/response semantics.
pub(crate) fn round_trip(handle: &StoreHandle, command: Command) -> Result<Reply> {
    let pending = handle.issue(command)?;
    handle.flush()?;
    pending.wait()
}

/// Interpret an integer reply as a created/removed/present flag
pub(crate) fn reply_flag(reply: &Reply) -> bool {
    matches!(reply.as_integer(), Some(n) if n > 0)
}

/// Interpret an integer reply as a count
pub(crate) fn reply_count(reply: &Reply) -> usize {
    match reply.as_integer() {
        Some(n) if n > 0 => n as usize,
        _ => 0,
    }
}

/// Decode the bulk elements of an array reply into a set, skipping
/// undecodable entries
pub(crate) fn decode_bulk_set<T>(reply: &Reply) -> HashSet<T>
where
    T: DeserializeOwned + Eq + Hash,
{
    decode_bulks(reply).collect()
}

/// Decode the bulk elements of an array reply into a sequence, skipping
/// undecodable entries
pub(crate) fn decode_bulk_vec<V>(reply: &Reply) -> Vec<V>
where
    V: DeserializeOwned,
{
    decode_bulks(reply).collect()
}

fn decode_bulks<'a, V>(reply: &'a Reply) -> impl Iterator<Item = V> + 'a
where
    V: DeserializeOwned + 'a,
{
    reply
        .as_array()
        .unwrap_or(&[])
        .iter()
        .filter_map(|element| element.as_bulk())
        .filter_map(codec::decode)
}
