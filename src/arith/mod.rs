//! # Arithmetic
//!
//! GF(2) arithmetic over the cipher state and its two-share masked twin.
//!
//! - [`bitvec`]: 129-bit state vectors in three 64-bit words.
//! - [`matrix`]: vector-matrix products and inversion for the linear layers.
//! - [`bytes`]: byte buffers that exist once per share domain.
//! - [`masked`]: the [`masked::StateWord`] trait plus the plain and two-share
//!   implementations the whole protocol is generic over.
//! - [`masking`]: gadget selection and the masking randomness context.

pub mod bitvec;
pub mod bytes;
pub mod masked;
pub mod masking;
pub mod matrix;
