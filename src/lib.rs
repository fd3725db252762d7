//! # rpicnic
//!
//! A masked Rust implementation of the Picnic3-L1 signature scheme.
//!
//! Picnic3 proves knowledge of a LowMC key in the MPC-in-the-head paradigm:
//! the signer simulates a 16-party computation of the cipher 250 times,
//! commits to every party, and opens all but one party in 36 repetitions
//! chosen by a Fiat-Shamir challenge. This crate additionally runs the
//! signer under a first-order boolean masking so that no intermediate value
//! depending on the secret key is ever handled in the clear.
//!
//! The [`api`] module is the intended entry point:
//!
//! ```
//! use rpicnic::api;
//!
//! let (pk, sk) = api::keygen();
//! let signature = api::sign(&sk, b"hello").unwrap();
//! assert!(api::verify(&pk, b"hello", &signature).is_ok());
//! ```

pub mod api;
pub mod arith;
pub mod constants;
pub mod errors;
pub mod keygen;
pub mod lowmc;
pub mod signature;
pub mod subroutines;
pub mod utils;

#[cfg(feature = "kat")]
pub mod kat;

pub use errors::Error;
pub use signature::max_signature_size;
