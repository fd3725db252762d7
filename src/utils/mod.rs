//! # Utilities
//!
//! - [`marshalling`]: The trait for serialising and deserialising keys and signatures.
//! - [`iterator`]: Sequential or rayon-parallel iteration over repetition slots.

pub(crate) mod iterator;
pub mod marshalling;
