//! # Challenge
//!
//! The Fiat-Shamir transcript digest and its expansion into the two
//! challenge lists: which repetitions to open, and which party stays
//! unopened inside each of them.
//!
//! Expansion reads the digest as a bit stream in fixed-width chunks and
//! rejection-samples into range, re-hashing the digest whenever a pass runs
//! dry. The repetition list keeps its insertion order; signing and
//! verification both derive any ordering they need from it.

use crate::arith::bytes::get_bit;
use crate::constants::params::{
    PARAM_INPUT_SIZE, PARAM_NB_EXECUTIONS, PARAM_NB_OPENED, PARAM_NB_PARTIES, PARAM_OUTPUT_SIZE,
};
use crate::constants::types::{Hash, Salt};
use crate::subroutines::hashing::{HashCtx, HASH_PREFIX_1};

/// The challenge digest over the full first-phase transcript.
pub fn transcript_digest(
    round_commitments: &[Hash],
    merkle_root: &Hash,
    salt: &Salt,
    ciphertext: &[u8; PARAM_OUTPUT_SIZE],
    plaintext: &[u8; PARAM_INPUT_SIZE],
    msg: &[u8],
) -> Hash {
    let mut hasher = HashCtx::new();
    for ch in round_commitments {
        hasher.update(ch);
    }
    hasher.update(merkle_root);
    hasher.update(salt);
    hasher.update(ciphertext);
    hasher.update(plaintext);
    hasher.update(msg);
    hasher.digest()
}

/// Split a byte string into `chunk_bits`-wide values, LSB first within each
/// chunk. Trailing bits that do not fill a chunk are dropped.
fn bits_to_chunks(chunk_bits: usize, input: &[u8]) -> Vec<u16> {
    let chunk_count = input.len() * 8 / chunk_bits;
    let mut chunks = Vec::with_capacity(chunk_count);
    for i in 0..chunk_count {
        let mut chunk = 0u16;
        for j in 0..chunk_bits {
            if get_bit(input, i * chunk_bits + j) {
                chunk |= 1 << j;
            }
        }
        chunks.push(chunk);
    }
    chunks
}

fn rehash(h: &Hash) -> Hash {
    let mut hasher = HashCtx::with_prefix(&HASH_PREFIX_1);
    hasher.update(h);
    hasher.digest()
}

/// Expand the challenge digest into the opened repetitions (distinct, in
/// sampling order) and the unopened party of each.
pub fn expand_challenge(digest: &Hash) -> ([u16; PARAM_NB_OPENED], [u16; PARAM_NB_OPENED]) {
    let mut h = *digest;

    let mut challenge_c = [0u16; PARAM_NB_OPENED];
    let mut count_c = 0;
    while count_c < PARAM_NB_OPENED {
        for chunk in bits_to_chunks(8, &h) {
            if (chunk as usize) < PARAM_NB_EXECUTIONS && !challenge_c[..count_c].contains(&chunk) {
                challenge_c[count_c] = chunk;
                count_c += 1;
                if count_c == PARAM_NB_OPENED {
                    break;
                }
            }
        }
        h = rehash(&h);
    }

    // the party pass continues from the re-hashed digest
    let mut challenge_p = [0u16; PARAM_NB_OPENED];
    let mut count_p = 0;
    while count_p < PARAM_NB_OPENED {
        for chunk in bits_to_chunks(4, &h) {
            if (chunk as usize) < PARAM_NB_PARTIES {
                challenge_p[count_p] = chunk;
                count_p += 1;
                if count_p == PARAM_NB_OPENED {
                    break;
                }
            }
        }
        h = rehash(&h);
    }

    (challenge_c, challenge_p)
}

/// The repetitions the challenge leaves closed, in ascending order. These
/// are the Merkle leaves a verifier cannot recompute.
pub fn unopened_rounds(challenge_c: &[u16]) -> Vec<u16> {
    (0..PARAM_NB_EXECUTIONS as u16)
        .filter(|t| !challenge_c.contains(t))
        .collect()
}

#[cfg(test)]
mod challenge_tests {
    use super::*;

    #[test]
    fn test_expand_challenge_ranges() {
        for byte in 0..50u8 {
            let digest = [byte; 32];
            let (c, p) = expand_challenge(&digest);
            for t in c {
                assert!((t as usize) < PARAM_NB_EXECUTIONS);
            }
            for party in p {
                assert!((party as usize) < PARAM_NB_PARTIES);
            }
            // opened repetitions are pairwise distinct
            for i in 0..c.len() {
                for j in 0..i {
                    assert_ne!(c[i], c[j]);
                }
            }
        }
    }

    #[test]
    fn test_expand_challenge_deterministic() {
        let digest = [0xabu8; 32];
        assert_eq!(expand_challenge(&digest), expand_challenge(&digest));
        let mut other = digest;
        other[31] ^= 1;
        assert_ne!(expand_challenge(&digest), expand_challenge(&other));
    }

    #[test]
    fn test_bits_to_chunks_order() {
        // 0b1000_0000 read LSB-first in 4-bit chunks: first chunk holds
        // bit 0 of the stream in its bit 0
        let chunks = bits_to_chunks(4, &[0b1000_0000]);
        assert_eq!(chunks, vec![0b0001, 0b0000]);
        let chunks = bits_to_chunks(8, &[0b1100_0001]);
        assert_eq!(chunks, vec![0b1000_0011]);
    }

    #[test]
    fn test_transcript_digest_sensitivity() {
        let ch = vec![[3u8; 32]; PARAM_NB_EXECUTIONS];
        let root = [4u8; 32];
        let salt = [5u8; 32];
        let ct = [6u8; PARAM_OUTPUT_SIZE];
        let pt = [7u8; PARAM_INPUT_SIZE];

        let digest = transcript_digest(&ch, &root, &salt, &ct, &pt, b"message");
        assert_ne!(
            digest,
            transcript_digest(&ch, &root, &salt, &ct, &pt, b"other message")
        );
        let mut other_root = root;
        other_root[0] ^= 1;
        assert_ne!(
            digest,
            transcript_digest(&ch, &other_root, &salt, &ct, &pt, b"message")
        );
    }

    #[test]
    fn test_unopened_rounds_complement() {
        let digest = [0x42u8; 32];
        let (c, _) = expand_challenge(&digest);
        let missing = unopened_rounds(&c);
        assert_eq!(missing.len(), PARAM_NB_EXECUTIONS - PARAM_NB_OPENED);
        for t in &missing {
            assert!(!c.contains(t));
        }
        for pair in missing.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
