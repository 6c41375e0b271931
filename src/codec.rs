//! Typed codec
//!
//! Converts application-level values to and from the store's native byte
//! strings. The store itself is untyped; this module is what every other
//! component trusts for type safety across the network boundary.
//!
//! ## Contract
//! - `encode` is deterministic: equal values always produce equal bytes,
//!   and distinct values of the same type produce distinct bytes.
//! - `decode` succeeds if and only if the bytes are a complete encoding of
//!   exactly the requested type; trailing bytes are rejected.
//! - Round-trip law: `decode(&encode(&v)?) == Some(v)` for every
//!   representable `v`.
//! - Decode failures are absorbed into `None`, never surfaced as errors.
//!   The remote store is a shared, possibly heterogeneously-typed
//!   namespace, so foreign entries must degrade to absence.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{RemoraError, Result};

/// Bincode options used for every value
///
/// Fixed-width integers keep the encoding deterministic across values of
/// the same type; rejecting trailing bytes keeps decode from accepting a
/// prefix-compatible foreign entry.
fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Encode a value into its store byte-string representation
pub fn encode<V>(value: &V) -> Result<Vec<u8>>
where
    V: Serialize + ?Sized,
{
    options()
        .serialize(value)
        .map_err(|e| RemoraError::Codec(e.to_string()))
}

/// Decode a store byte string into possibly the actual value
///
/// Returns `None` on any malformed, truncated, or partially-matching
/// input.
pub fn decode<V>(bytes: &[u8]) -> Option<V>
where
    V: DeserializeOwned,
{
    options().deserialize(bytes).ok()
}
