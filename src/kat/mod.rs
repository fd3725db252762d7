//! # Known Answer Test harness
//!
//! Generates NIST-style response file content for the Picnic3-L1 parameter
//! set. Every vector is derived from a 48-byte seed through the AES-CTR
//! generator used by the NIST PQC submission harnesses, and signing runs in
//! deterministic mode, so regenerating a response file always reproduces the
//! same bytes.
//!
//! Enabled with the `kat` feature:
//!
//! ```sh
//! cargo test --features kat
//! ```

use std::fmt::Write as _;
use std::io;
use std::path::Path;

use nist_pqc_seeded_rng::{NistPqcAes256CtrRng, RngCore, Seed as NistSeed, SeedableRng};

use crate::errors::Error;
use crate::keygen;
use crate::lowmc::{LowmcInstance, ParameterSet};
use crate::signature::{SignConfig, Signature};
use crate::utils::marshalling::Marshalling as _;

/// One response file entry. `signed_message` is the signature followed by
/// the message, as in the `crypto_sign` convention.
pub struct KatVector {
    pub count: usize,
    pub seed: [u8; 48],
    pub message: Vec<u8>,
    pub public_key: Vec<u8>,
    pub secret_key: Vec<u8>,
    pub signed_message: Vec<u8>,
}

/// Generates `count` seeded vectors. Message lengths follow the NIST
/// harness convention of 33 bytes per count step.
pub fn generate_vectors(count: usize) -> Result<Vec<KatVector>, Error> {
    let instance = LowmcInstance::generate(ParameterSet::Picnic3L1);
    let config = SignConfig {
        randomized: false,
        ..SignConfig::default()
    };

    let mut master = NistPqcAes256CtrRng::from_seed(NistSeed::default());
    let mut vectors = Vec::with_capacity(count);

    for i in 0..count {
        let mut seed = [0u8; 48];
        master.fill_bytes(&mut seed);
        let mut rng = NistPqcAes256CtrRng::from_seed(seed);

        let mut message = vec![0u8; 33 * (i + 1)];
        rng.fill_bytes(&mut message);

        let (pk, sk) = keygen::keygen(&instance, &mut rng);
        let signature = Signature::sign_message(&instance, &sk, &message, &config, &mut rng)?;

        let mut signed_message = signature;
        signed_message.extend_from_slice(&message);

        vectors.push(KatVector {
            count: i,
            seed,
            message,
            public_key: pk.serialise(),
            secret_key: sk.serialise(),
            signed_message,
        });
    }

    Ok(vectors)
}

/// Renders vectors in the `.rsp` line format of the NIST harnesses.
pub fn render_response(vectors: &[KatVector]) -> String {
    let mut out = String::from("# rpicnic Picnic3-L1\n");

    for vector in vectors {
        let _ = writeln!(out);
        let _ = writeln!(out, "count = {}", vector.count);
        let _ = writeln!(out, "seed = {}", hex::encode_upper(vector.seed));
        let _ = writeln!(out, "mlen = {}", vector.message.len());
        let _ = writeln!(out, "msg = {}", hex::encode_upper(&vector.message));
        let _ = writeln!(out, "pk = {}", hex::encode_upper(&vector.public_key));
        let _ = writeln!(out, "sk = {}", hex::encode_upper(&vector.secret_key));
        let _ = writeln!(out, "smlen = {}", vector.signed_message.len());
        let _ = writeln!(out, "sm = {}", hex::encode_upper(&vector.signed_message));
    }

    out
}

/// Generates `count` vectors and writes the response file to `path`.
pub fn write_response_file(path: &Path, count: usize) -> io::Result<()> {
    let vectors =
        generate_vectors(count).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    std::fs::write(path, render_response(&vectors))
}

#[cfg(test)]
mod kat_tests {
    use super::*;

    #[test]
    fn test_kat_generation_is_reproducible() {
        let first = generate_vectors(2).expect("generation failed");
        let second = generate_vectors(2).expect("generation failed");
        assert_eq!(render_response(&first), render_response(&second));
    }

    #[test]
    fn test_kat_vectors_verify() {
        let instance = LowmcInstance::generate(ParameterSet::Picnic3L1);

        for vector in generate_vectors(2).expect("generation failed") {
            let pk = keygen::PublicKey::parse(&vector.public_key).expect("bad public key");
            let mlen = vector.message.len();
            let signature = vector.signed_message[..vector.signed_message.len() - mlen].to_vec();

            Signature::verify_signature(&instance, &pk, &vector.message, &signature)
                .expect("vector does not verify");
            assert_eq!(
                &vector.signed_message[signature.len()..],
                vector.message.as_slice()
            );
        }
    }
}
