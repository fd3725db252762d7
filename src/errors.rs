//! # Errors
//!
//! The crate-wide error type. Fallible operations return
//! `Result<_, Error>`; callers that only care about pass/fail can match on
//! [`Error::VerificationFailed`].

/// Everything that can go wrong across key handling, signing and
/// verification.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// A serialised key or signature had the wrong length, non-zero
    /// padding bits, or an out-of-range field.
    #[error("malformed encoding")]
    InvalidEncoding,
    /// The signature did not verify against the public key and message.
    #[error("signature verification failed")]
    VerificationFailed,
    /// The secret key is inconsistent with its public key.
    #[error("invalid key material")]
    InvalidKey,
    /// A sponge or masking configuration outside what this crate supports.
    #[error("unsupported parameters")]
    UnsupportedParameters,
}
