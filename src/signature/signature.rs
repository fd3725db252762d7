//! Wire format of a signature.
//!
//! A serialised signature is the challenge digest, the salt, the opening of
//! the initial-seed tree, the opening of the view-commitment Merkle tree, and
//! one proof per opened repetition in ascending repetition order. Every
//! length after the challenge digest is determined by the challenge
//! expansion, so parsing recomputes the exact byte count and rejects
//! anything else.

use crate::{
    arith::bytes::padding_bits_zero,
    constants::{
        params::{
            PARAM_AUX_SIZE, PARAM_DIGEST_SIZE, PARAM_INPUT_SIZE, PARAM_LOWMC_BLOCK_BITS,
            PARAM_NB_EXECUTIONS, PARAM_NB_PARTIES, PARAM_NB_OPENED,
            PARAM_PARTY_SEED_INFO_SIZE, PARAM_SALT_SIZE, PARAM_SEED_SIZE, PARAM_VIEW_BITS,
            PARAM_VIEW_SIZE,
        },
        types::{Hash, Salt},
    },
    errors::Error,
    subroutines::{
        challenge::{expand_challenge, unopened_rounds},
        tree::Tree,
    },
    utils::marshalling::Marshalling,
};

/// Opening data for one repetition selected by the challenge.
pub(crate) struct Proof {
    /// Seed-tree nodes revealing every party seed except the unopened one.
    pub(crate) seed_info: [u8; PARAM_PARTY_SEED_INFO_SIZE],
    /// Correction bits for the last party. Absent when the last party is the
    /// unopened one, since its tape is never reconstructed in that case.
    pub(crate) aux: Option<[u8; PARAM_AUX_SIZE]>,
    /// Masked witness fed into the online phase.
    pub(crate) input: [u8; PARAM_INPUT_SIZE],
    /// Broadcast messages of the unopened party.
    pub(crate) msgs: [u8; PARAM_VIEW_SIZE],
    /// Commitment of the unopened party.
    pub(crate) commitment: Hash,
}

pub(crate) struct Signature {
    pub(crate) challenge: Hash,
    pub(crate) salt: Salt,
    pub(crate) iseed_info: Vec<u8>,
    pub(crate) cv_info: Vec<u8>,
    /// Proofs for the opened repetitions, in ascending repetition order.
    pub(crate) proofs: Vec<Proof>,
    pub(crate) challenge_c: [u16; PARAM_NB_OPENED],
    pub(crate) challenge_p: [u16; PARAM_NB_OPENED],
}

impl Signature {
    /// Pairs each opened repetition with its unopened party and sorts by
    /// repetition index. The result matches the proof order on the wire.
    pub(crate) fn opened_rounds(
        challenge_c: &[u16; PARAM_NB_OPENED],
        challenge_p: &[u16; PARAM_NB_OPENED],
    ) -> Vec<(u16, u16)> {
        let mut opened: Vec<(u16, u16)> = challenge_c
            .iter()
            .copied()
            .zip(challenge_p.iter().copied())
            .collect();
        opened.sort_unstable_by_key(|&(round, _)| round);
        opened
    }
}

impl Marshalling<Vec<u8>> for Signature {
    fn serialise(&self) -> Vec<u8> {
        let mut serialised = Vec::with_capacity(max_signature_size());
        serialised.extend_from_slice(&self.challenge);
        serialised.extend_from_slice(&self.salt);
        serialised.extend_from_slice(&self.iseed_info);
        serialised.extend_from_slice(&self.cv_info);
        for proof in &self.proofs {
            serialised.extend_from_slice(&proof.seed_info);
            if let Some(aux) = &proof.aux {
                serialised.extend_from_slice(aux);
            }
            serialised.extend_from_slice(&proof.input);
            serialised.extend_from_slice(&proof.msgs);
            serialised.extend_from_slice(&proof.commitment);
        }
        serialised
    }

    fn parse(serialised: &Vec<u8>) -> Result<Self, Error> {
        let header = PARAM_DIGEST_SIZE + PARAM_SALT_SIZE;
        if serialised.len() < header {
            return Err(Error::InvalidEncoding);
        }

        let mut challenge = Hash::default();
        challenge.copy_from_slice(&serialised[..PARAM_DIGEST_SIZE]);
        let mut salt = Salt::default();
        salt.copy_from_slice(&serialised[PARAM_DIGEST_SIZE..header]);

        let (challenge_c, challenge_p) = expand_challenge(&challenge);
        let iseed_len = Tree::reveal_seeds_size(PARAM_NB_EXECUTIONS, &challenge_c);
        let missing = unopened_rounds(&challenge_c);
        let cv_len = Tree::open_merkle_size(PARAM_NB_EXECUTIONS, &missing);
        let opened = Signature::opened_rounds(&challenge_c, &challenge_p);

        let last_party = (PARAM_NB_PARTIES - 1) as u16;
        let mut bytes_required = header + iseed_len + cv_len;
        for &(_, party) in &opened {
            bytes_required +=
                PARAM_PARTY_SEED_INFO_SIZE + PARAM_INPUT_SIZE + PARAM_VIEW_SIZE + PARAM_DIGEST_SIZE;
            if party != last_party {
                bytes_required += PARAM_AUX_SIZE;
            }
        }
        if serialised.len() != bytes_required {
            return Err(Error::InvalidEncoding);
        }

        let mut offset = header;
        let iseed_info = serialised[offset..offset + iseed_len].to_vec();
        offset += iseed_len;
        let cv_info = serialised[offset..offset + cv_len].to_vec();
        offset += cv_len;

        let mut proofs = Vec::with_capacity(opened.len());
        for &(_, party) in &opened {
            let mut seed_info = [0u8; PARAM_PARTY_SEED_INFO_SIZE];
            seed_info.copy_from_slice(&serialised[offset..offset + PARAM_PARTY_SEED_INFO_SIZE]);
            offset += PARAM_PARTY_SEED_INFO_SIZE;

            let aux = if party != last_party {
                let mut bits = [0u8; PARAM_AUX_SIZE];
                bits.copy_from_slice(&serialised[offset..offset + PARAM_AUX_SIZE]);
                offset += PARAM_AUX_SIZE;
                if !padding_bits_zero(&bits, PARAM_VIEW_BITS) {
                    return Err(Error::InvalidEncoding);
                }
                Some(bits)
            } else {
                None
            };

            let mut input = [0u8; PARAM_INPUT_SIZE];
            input.copy_from_slice(&serialised[offset..offset + PARAM_INPUT_SIZE]);
            offset += PARAM_INPUT_SIZE;
            if !padding_bits_zero(&input, PARAM_LOWMC_BLOCK_BITS) {
                return Err(Error::InvalidEncoding);
            }

            let mut msgs = [0u8; PARAM_VIEW_SIZE];
            msgs.copy_from_slice(&serialised[offset..offset + PARAM_VIEW_SIZE]);
            offset += PARAM_VIEW_SIZE;
            if !padding_bits_zero(&msgs, PARAM_VIEW_BITS) {
                return Err(Error::InvalidEncoding);
            }

            let mut commitment = Hash::default();
            commitment.copy_from_slice(&serialised[offset..offset + PARAM_DIGEST_SIZE]);
            offset += PARAM_DIGEST_SIZE;

            proofs.push(Proof {
                seed_info,
                aux,
                input,
                msgs,
                commitment,
            });
        }

        Ok(Signature {
            challenge,
            salt,
            iseed_info,
            cv_info,
            proofs,
            challenge_c,
            challenge_p,
        })
    }
}

/// Upper bound on the size of a serialised signature. Actual signatures are
/// smaller because tree openings share ancestor nodes.
pub fn max_signature_size() -> usize {
    // One sibling seed per tree level on each hidden path.
    let iseed_bound = PARAM_NB_OPENED * 8 * PARAM_SEED_SIZE;
    let cv_bound = (PARAM_NB_EXECUTIONS - PARAM_NB_OPENED) * PARAM_DIGEST_SIZE;
    let proof = PARAM_PARTY_SEED_INFO_SIZE
        + PARAM_AUX_SIZE
        + PARAM_INPUT_SIZE
        + PARAM_VIEW_SIZE
        + PARAM_DIGEST_SIZE;
    PARAM_DIGEST_SIZE + PARAM_SALT_SIZE + iseed_bound + cv_bound + PARAM_NB_OPENED * proof
}

#[cfg(test)]
mod signature_tests {
    use super::*;

    #[test]
    fn test_parse_rejects_truncated_header() {
        let bytes = vec![0u8; PARAM_DIGEST_SIZE + PARAM_SALT_SIZE - 1];
        assert!(Signature::parse(&bytes).is_err());

        let bytes = vec![];
        assert!(Signature::parse(&bytes).is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_total_length() {
        // A zero challenge still expands to a well defined opening shape, so
        // the expected length is computable and anything else must fail.
        let bytes = vec![0u8; PARAM_DIGEST_SIZE + PARAM_SALT_SIZE + 5];
        assert!(Signature::parse(&bytes).is_err());
    }

    #[test]
    fn test_opened_rounds_sorted_and_paired() {
        let mut challenge_c = [0u16; PARAM_NB_OPENED];
        let mut challenge_p = [0u16; PARAM_NB_OPENED];
        for i in 0..PARAM_NB_OPENED {
            // Descending repetition indices, each with its own party.
            challenge_c[i] = (PARAM_NB_EXECUTIONS - 1 - i) as u16;
            challenge_p[i] = (i % PARAM_NB_PARTIES) as u16;
        }
        let opened = Signature::opened_rounds(&challenge_c, &challenge_p);
        for window in opened.windows(2) {
            assert!(window[0].0 < window[1].0);
        }
        for (round, party) in opened {
            let at = challenge_c
                .iter()
                .position(|&c| c == round)
                .expect("round came from challenge_c");
            assert_eq!(challenge_p[at], party);
        }
    }

    #[test]
    fn test_max_size_covers_worst_case_proofs() {
        let per_proof = PARAM_PARTY_SEED_INFO_SIZE
            + PARAM_AUX_SIZE
            + PARAM_INPUT_SIZE
            + PARAM_VIEW_SIZE
            + PARAM_DIGEST_SIZE;
        assert!(max_signature_size() > PARAM_NB_OPENED * per_proof);
    }
}
