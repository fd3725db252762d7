//! # Hashing
//!
//! Unmasked SHAKE128 contexts for commitments, seed derivation and the
//! Fiat-Shamir transcript. The masked twin used while handling secret data
//! lives in [`super::keccak`].

use tiny_keccak::{Hasher, Shake, Xof};

use crate::constants::params::PARAM_DIGEST_SIZE;
use crate::constants::types::Hash;

/// Domain prefix for seed-tree node derivation and challenge re-hashing
pub const HASH_PREFIX_1: [u8; 1] = [1];
/// Domain prefix for Merkle node compression
pub const HASH_PREFIX_3: [u8; 1] = [3];

/// A SHAKE128 context with the update helpers the protocol uses
pub struct HashCtx(Shake);

impl HashCtx {
    pub fn new() -> Self {
        HashCtx(Shake::v128())
    }

    pub fn with_prefix(prefix: &[u8; 1]) -> Self {
        let mut ctx = Self::new();
        ctx.update(prefix);
        ctx
    }

    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    /// Absorb a counter as two little-endian bytes.
    pub fn update_u16_le(&mut self, value: u16) {
        self.0.update(&value.to_le_bytes());
    }

    pub fn squeeze(&mut self, output: &mut [u8]) {
        self.0.squeeze(output);
    }

    pub fn digest(mut self) -> Hash {
        let mut out = [0u8; PARAM_DIGEST_SIZE];
        self.0.squeeze(&mut out);
        out
    }
}

impl Default for HashCtx {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod hashing_tests {
    use super::*;

    #[test]
    fn test_squeeze_chunked_matches_digest() {
        let mut a = HashCtx::new();
        a.update(b"some input");
        let digest = a.digest();

        let mut b = HashCtx::new();
        b.update(b"some ");
        b.update(b"input");
        let mut out = [0u8; PARAM_DIGEST_SIZE];
        b.squeeze(&mut out[..13]);
        b.squeeze(&mut out[13..]);
        assert_eq!(digest, out);
    }

    #[test]
    fn test_prefix_changes_digest() {
        let mut plain = HashCtx::new();
        plain.update(b"data");
        let mut one = HashCtx::with_prefix(&HASH_PREFIX_1);
        one.update(b"data");
        let mut three = HashCtx::with_prefix(&HASH_PREFIX_3);
        three.update(b"data");

        let (p, o, t) = (plain.digest(), one.digest(), three.digest());
        assert_ne!(p, o);
        assert_ne!(p, t);
        assert_ne!(o, t);
    }

    #[test]
    fn test_prefix_is_plain_absorption() {
        let mut a = HashCtx::with_prefix(&HASH_PREFIX_1);
        a.update(b"xy");
        let mut b = HashCtx::new();
        b.update(&[1, b'x', b'y']);
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn test_u16_le_order() {
        let mut a = HashCtx::new();
        a.update_u16_le(0x0201);
        let mut b = HashCtx::new();
        b.update(&[0x01, 0x02]);
        assert_eq!(a.digest(), b.digest());
    }
}
