//! # Key generation
//!
//! A key pair is a random cipher key together with a random plaintext and
//! its encryption: the signature proves knowledge of a key mapping the
//! public plaintext to the public ciphertext.

use crate::arith::bitvec::BitVec;
use crate::arith::bytes::padding_bits_zero;
use crate::constants::params::{PARAM_INPUT_SIZE, PARAM_LOWMC_BLOCK_BITS, PARAM_OUTPUT_SIZE};
use crate::errors::Error;
use crate::lowmc::LowmcInstance;
use crate::utils::marshalling::Marshalling;

use rand::RngCore;
use zeroize::Zeroize;

/// Serialised public key: ciphertext then plaintext
pub const PUBLIC_KEY_SIZE: usize = PARAM_OUTPUT_SIZE + PARAM_INPUT_SIZE;
/// Serialised secret key: cipher key then the public key
pub const SECRET_KEY_SIZE: usize = PARAM_INPUT_SIZE + PUBLIC_KEY_SIZE;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub ciphertext: [u8; PARAM_OUTPUT_SIZE],
    pub plaintext: [u8; PARAM_INPUT_SIZE],
}

#[derive(Clone, Debug)]
pub struct SecretKey {
    pub(crate) key: [u8; PARAM_INPUT_SIZE],
    pub(crate) pk: PublicKey,
}

/// Generate a key pair from the given randomness source.
pub fn keygen(instance: &LowmcInstance, rng: &mut dyn RngCore) -> (PublicKey, SecretKey) {
    let mut key = BitVec::random(rng);
    key.clear_padding();
    let mut plaintext = BitVec::random(rng);
    plaintext.clear_padding();
    let ciphertext = instance.evaluate(&key, &plaintext);

    let mut pk = PublicKey {
        ciphertext: [0u8; PARAM_OUTPUT_SIZE],
        plaintext: [0u8; PARAM_INPUT_SIZE],
    };
    ciphertext.to_bytes(&mut pk.ciphertext);
    plaintext.to_bytes(&mut pk.plaintext);

    let mut key_bytes = [0u8; PARAM_INPUT_SIZE];
    key.to_bytes(&mut key_bytes);
    let sk = SecretKey {
        key: key_bytes,
        pk: pk.clone(),
    };
    (pk, sk)
}

impl PublicKey {
    fn check_padding(&self) -> Result<(), Error> {
        if !padding_bits_zero(&self.ciphertext, PARAM_LOWMC_BLOCK_BITS)
            || !padding_bits_zero(&self.plaintext, PARAM_LOWMC_BLOCK_BITS)
        {
            return Err(Error::InvalidEncoding);
        }
        Ok(())
    }
}

impl Marshalling<Vec<u8>> for PublicKey {
    fn serialise(&self) -> Vec<u8> {
        let mut serialised = Vec::with_capacity(PUBLIC_KEY_SIZE);
        serialised.extend_from_slice(&self.ciphertext);
        serialised.extend_from_slice(&self.plaintext);
        serialised
    }

    fn parse(serialised: &Vec<u8>) -> Result<Self, Error> {
        if serialised.len() != PUBLIC_KEY_SIZE {
            return Err(Error::InvalidEncoding);
        }
        let mut pk = PublicKey {
            ciphertext: [0u8; PARAM_OUTPUT_SIZE],
            plaintext: [0u8; PARAM_INPUT_SIZE],
        };
        pk.ciphertext.copy_from_slice(&serialised[..PARAM_OUTPUT_SIZE]);
        pk.plaintext.copy_from_slice(&serialised[PARAM_OUTPUT_SIZE..]);
        pk.check_padding()?;
        Ok(pk)
    }
}

impl SecretKey {
    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    /// Check that the embedded public key is the encryption of the public
    /// plaintext under this key.
    pub fn validate(&self, instance: &LowmcInstance) -> Result<(), Error> {
        let key = BitVec::from_bytes(&self.key);
        let plaintext = BitVec::from_bytes(&self.pk.plaintext);
        let mut ciphertext = [0u8; PARAM_OUTPUT_SIZE];
        instance.evaluate(&key, &plaintext).to_bytes(&mut ciphertext);
        if ciphertext != self.pk.ciphertext {
            return Err(Error::InvalidKey);
        }
        Ok(())
    }
}

impl Marshalling<Vec<u8>> for SecretKey {
    fn serialise(&self) -> Vec<u8> {
        let mut serialised = Vec::with_capacity(SECRET_KEY_SIZE);
        serialised.extend_from_slice(&self.key);
        serialised.extend_from_slice(&self.pk.serialise());
        serialised
    }

    fn parse(serialised: &Vec<u8>) -> Result<Self, Error> {
        if serialised.len() != SECRET_KEY_SIZE {
            return Err(Error::InvalidEncoding);
        }
        if !padding_bits_zero(&serialised[..PARAM_INPUT_SIZE], PARAM_LOWMC_BLOCK_BITS) {
            return Err(Error::InvalidEncoding);
        }
        let mut key = [0u8; PARAM_INPUT_SIZE];
        key.copy_from_slice(&serialised[..PARAM_INPUT_SIZE]);
        let pk = PublicKey::parse(&serialised[PARAM_INPUT_SIZE..].to_vec())?;
        Ok(SecretKey { key, pk })
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
