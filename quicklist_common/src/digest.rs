//! Origin-hash digest of outbound request bodies.
//!
//! The server echoes `OriginHash` in its replies: the BLAKE2b digest (24 byte
//! output, lower-case hex) of the exact request body it received, without the
//! frame terminator.
use blake2::Blake2b;
use blake2::digest::Digest;
use blake2::digest::consts::U24;

type Blake2b192 = Blake2b<U24>;

/// Length of an origin hash in hex characters.
pub const ORIGIN_HASH_LEN: usize = 48;

/// Computes the origin hash of a request body.
pub fn origin_hash(body: &str) -> String {
    let mut hasher = Blake2b192::new();
    hasher.update(body.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[path = "digest_tests.rs"]
mod tests;
