//! # One-call API
//!
//! Key generation, signing and verification against the fixed
//! LowMC-129-129-4 instance. Each call expands the cipher tables on entry;
//! callers that sign in a loop can hold a [`LowmcInstance`] themselves and
//! use the lower-level entry points.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::errors::Error;
use crate::keygen::{self, PublicKey, SecretKey};
use crate::lowmc::{LowmcInstance, ParameterSet};
use crate::signature::{SignConfig, Signature};

/// Generate a key pair from operating-system randomness.
pub fn keygen() -> (PublicKey, SecretKey) {
    let instance = LowmcInstance::generate(ParameterSet::Picnic3L1);
    keygen::keygen(&instance, &mut OsRng)
}

/// Sign `message` with the default masking configuration.
pub fn sign(secret_key: &SecretKey, message: &[u8]) -> Result<Vec<u8>, Error> {
    sign_with_config(secret_key, message, &SignConfig::default())
}

/// Sign `message` with an explicit signer configuration.
pub fn sign_with_config(
    secret_key: &SecretKey,
    message: &[u8],
    config: &SignConfig,
) -> Result<Vec<u8>, Error> {
    sign_with_rng(secret_key, message, config, &mut OsRng)
}

/// Sign `message` with a caller-supplied randomness source.
///
/// Signing draws randomness for the masking shares and, unless the
/// configuration is deterministic, for the salt. A seeded generator makes
/// the whole run reproducible.
pub fn sign_with_rng(
    secret_key: &SecretKey,
    message: &[u8],
    config: &SignConfig,
    rng: &mut dyn RngCore,
) -> Result<Vec<u8>, Error> {
    let instance = LowmcInstance::generate(ParameterSet::Picnic3L1);
    Signature::sign_message(&instance, secret_key, message, config, rng)
}

/// Verify a serialised signature over `message`.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &[u8]) -> Result<(), Error> {
    let instance = LowmcInstance::generate(ParameterSet::Picnic3L1);
    let serialised = signature.to_vec();
    Signature::verify_signature(&instance, public_key, message, &serialised)
}
