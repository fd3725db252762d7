//! # Subroutines
//!
//! The protocol building blocks under the signature scheme.
//!
//! - [`hashing`]: Plain SHAKE128 transcripts and the domain prefixes.
//! - [`keccak`]: A two-share masked Keccak sponge for hashing secrets.
//! - [`tapes`]: Per-party random tapes and broadcast views.
//! - [`tree`]: Seed derivation trees and the Merkle commitment tree.
//! - [`commitments`]: The per-party, per-round and view commitments.
//! - [`challenge`]: Fiat-Shamir digest and challenge expansion.

pub mod challenge;
pub mod commitments;
pub mod hashing;
pub mod keccak;
pub mod tapes;
pub mod tree;
