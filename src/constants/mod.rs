//! # Constants
//!
//! Parameters of the compiled instance: the Picnic3 parameter set at security
//! level L1, i.e. LowMC-129-129-4 underneath a 16-party, 250-repetition
//! MPC-in-the-head proof with two-share boolean masking on the signer side.
//!
//! The [`params`] module holds the numeric parameters, the [`types`] module
//! the small fixed-size byte types like [`types::Hash`] and [`types::Seed`].

pub mod params;
pub mod types;
