//! # Signature scheme
//!
//! Signing, verification and the wire format. [`sign::SignConfig`] selects
//! the masking behavior and whether signatures are randomized; verification
//! is configuration-free because it only ever handles public data.

mod sign;
pub(crate) mod signature;
mod verify;

pub use sign::SignConfig;
pub use signature::max_signature_size;

pub(crate) use signature::Signature;

#[cfg(test)]
mod signing_and_verifying_tests {
    use super::signature::Signature;
    use super::SignConfig;
    use crate::arith::masking::{AndGadget, KeccakMasking, MaskingConfig};
    use crate::errors::Error;
    use crate::keygen::{keygen, PublicKey, SecretKey};
    use crate::lowmc::{LowmcInstance, ParameterSet};
    use rand::{rngs::StdRng, SeedableRng};

    fn test_pair(seed: u64) -> (LowmcInstance, PublicKey, SecretKey) {
        let instance = LowmcInstance::generate(ParameterSet::Picnic3L1);
        let mut rng = StdRng::seed_from_u64(seed);
        let (pk, sk) = keygen(&instance, &mut rng);
        (instance, pk, sk)
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let (instance, pk, sk) = test_pair(1);
        let message = b"Hello, World!";
        let mut rng = StdRng::seed_from_u64(100);

        let signature =
            Signature::sign_message(&instance, &sk, message, &SignConfig::default(), &mut rng)
                .expect("signing failed");
        Signature::verify_signature(&instance, &pk, message, &signature)
            .expect("verification failed");

        // a different message must not verify
        let wrong = Signature::verify_signature(&instance, &pk, b"Hello, world!", &signature);
        assert!(wrong.is_err());
    }

    #[test]
    fn test_verify_rejects_tampered_bytes() {
        let (instance, pk, sk) = test_pair(2);
        let message = b"tamper target";
        let mut rng = StdRng::seed_from_u64(200);
        let signature =
            Signature::sign_message(&instance, &sk, message, &SignConfig::default(), &mut rng)
                .expect("signing failed");

        // challenge digest, tree openings, and proof area
        for at in [0, 40, signature.len() / 2, signature.len() - 1] {
            let mut bad = signature.clone();
            bad[at] ^= 0x01;
            assert!(
                Signature::verify_signature(&instance, &pk, message, &bad).is_err(),
                "flip at {at} accepted"
            );
        }

        let truncated = signature[..signature.len() - 1].to_vec();
        assert_eq!(
            Signature::verify_signature(&instance, &pk, message, &truncated),
            Err(Error::InvalidEncoding)
        );
    }

    #[test]
    fn test_deterministic_signing_is_independent_of_masking_randomness() {
        let (instance, _, sk) = test_pair(3);
        let message = b"deterministic";
        let config = SignConfig {
            randomized: false,
            ..SignConfig::default()
        };

        let mut rng_a = StdRng::seed_from_u64(41);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = Signature::sign_message(&instance, &sk, message, &config, &mut rng_a)
            .expect("signing failed");
        let b = Signature::sign_message(&instance, &sk, message, &config, &mut rng_b)
            .expect("signing failed");
        assert_eq!(a, b);
    }

    #[test]
    fn test_randomized_signing_differs_and_both_verify() {
        let (instance, pk, sk) = test_pair(4);
        let message = b"randomized";

        let mut rng_a = StdRng::seed_from_u64(51);
        let mut rng_b = StdRng::seed_from_u64(52);
        let config = SignConfig::default();
        let a = Signature::sign_message(&instance, &sk, message, &config, &mut rng_a)
            .expect("signing failed");
        let b = Signature::sign_message(&instance, &sk, message, &config, &mut rng_b)
            .expect("signing failed");
        assert_ne!(a, b);
        Signature::verify_signature(&instance, &pk, message, &a).expect("first failed");
        Signature::verify_signature(&instance, &pk, message, &b).expect("second failed");
    }

    #[test]
    fn test_masking_configurations_interoperate() {
        let (instance, pk, sk) = test_pair(5);
        let message = b"config matrix";

        let configs = [
            MaskingConfig {
                and_gadget: AndGadget::Heuristic,
                keccak_gadget: AndGadget::Heuristic,
                keccak_masking: KeccakMasking::None,
            },
            MaskingConfig {
                and_gadget: AndGadget::Randomized,
                keccak_gadget: AndGadget::Randomized,
                keccak_masking: KeccakMasking::Full,
            },
        ];
        for (i, masking) in configs.into_iter().enumerate() {
            let config = SignConfig {
                masking,
                randomized: true,
            };
            let mut rng = StdRng::seed_from_u64(60 + i as u64);
            let signature = Signature::sign_message(&instance, &sk, message, &config, &mut rng)
                .expect("signing failed");
            Signature::verify_signature(&instance, &pk, message, &signature)
                .expect("verification failed");
        }
    }

    #[test]
    fn test_signing_with_mismatched_key_fails() {
        let (instance, pk, sk) = test_pair(6);
        let mut bad_key = sk.key;
        bad_key[0] ^= 0x80;
        let bad = SecretKey {
            key: bad_key,
            pk: pk.clone(),
        };

        let mut rng = StdRng::seed_from_u64(70);
        let result =
            Signature::sign_message(&instance, &bad, b"nope", &SignConfig::default(), &mut rng);
        assert_eq!(result.unwrap_err(), Error::InvalidKey);
    }
}
