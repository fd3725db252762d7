//! # Verification
//!
//! The verifier replays the protocol on plain values. For repetitions the
//! challenge left closed it regrows every party seed and recomputes the
//! round commitment from scratch; for opened repetitions it rebuilds all but
//! the unopened party, substitutes that party's broadcast from the proof,
//! and re-runs the online pass. The recomputed transcript digest must match
//! the signature's challenge.

use subtle::ConstantTimeEq;

use crate::{
    arith::bitvec::BitVec,
    constants::{
        params::{PARAM_NB_EXECUTIONS, PARAM_NB_PARTIES},
        types::{CommitmentsArray, Hash, Seed},
    },
    errors::Error,
    keygen::PublicKey,
    lowmc::LowmcInstance,
    subroutines::{
        challenge::{transcript_digest, unopened_rounds},
        commitments::{commit, commit_round, commit_view},
        tapes::{RandomTapes, Views},
        tree::Tree,
    },
    utils::marshalling::Marshalling as _,
};

use super::signature::Signature;

/// Stage traces for debugging rejected signatures. Compiled out of release
/// builds, where a rejection is a bare [`Error`].
#[cfg(debug_assertions)]
macro_rules! reject_trace {
    ($($arg:tt)*) => { eprintln!($($arg)*) };
}
#[cfg(not(debug_assertions))]
macro_rules! reject_trace {
    ($($arg:tt)*) => {};
}

impl Signature {
    pub(crate) fn verify_signature(
        instance: &LowmcInstance,
        public_key: &PublicKey,
        message: &[u8],
        serialised: &Vec<u8>,
    ) -> Result<(), Error> {
        let sig = Signature::parse(serialised).map_err(|e| {
            reject_trace!("verify: malformed signature encoding");
            e
        })?;
        let plaintext = BitVec::from_bytes(&public_key.plaintext);
        let ciphertext = public_key.ciphertext;
        let last = PARAM_NB_PARTIES - 1;

        // Regrow the initial seeds of every closed repetition
        let iseeds = Tree::reconstruct_seeds(
            PARAM_NB_EXECUTIONS,
            &sig.challenge_c,
            &sig.iseed_info,
            &sig.salt,
            0,
        )
        .map_err(|e| {
            reject_trace!("verify: repetition seed opening rejected");
            e
        })?;

        let opened = Signature::opened_rounds(&sig.challenge_c, &sig.challenge_p);

        let mut round_commitments = vec![Hash::default(); PARAM_NB_EXECUTIONS];
        let mut view_commitments: Vec<Option<Hash>> = vec![None; PARAM_NB_EXECUTIONS];

        let mut k = 0;
        for t in 0..PARAM_NB_EXECUTIONS {
            let is_opened = k < opened.len() && opened[k].0 as usize == t;
            if !is_opened {
                // Closed repetition: the initial seed is available, so the
                // commitments are recomputed in full. The view commitment
                // stays missing and comes from the Merkle opening instead.
                let iseed = iseeds.leaf_seed(t);
                let party_tree = Tree::generate_seeds(&iseed, &sig.salt, t as u16, PARAM_NB_PARTIES);
                let seeds: [Seed; PARAM_NB_PARTIES] =
                    std::array::from_fn(|i| party_tree.leaf_seed(i));

                let mut tapes = RandomTapes::<BitVec>::new();
                tapes.derive(&seeds, &sig.salt, t as u16);
                instance.compute_aux(&mut tapes, &mut ());

                let mut commits = CommitmentsArray::default();
                for (party, c) in commits.iter_mut().enumerate().take(last) {
                    *c = commit(&seeds[party], None, &sig.salt, t as u16, party as u16);
                }
                commits[last] = commit(
                    &seeds[last],
                    Some(tapes.aux().as_slice()),
                    &sig.salt,
                    t as u16,
                    last as u16,
                );
                round_commitments[t] = commit_round(&commits);
                continue;
            }

            // Opened repetition: all seeds but the unopened party's
            let unopened = opened[k].1 as usize;
            let proof = &sig.proofs[k];
            k += 1;

            let party_tree = Tree::reconstruct_seeds(
                PARAM_NB_PARTIES,
                &[unopened as u16],
                &proof.seed_info,
                &sig.salt,
                t as u16,
            )
            .map_err(|e| {
                reject_trace!("verify: party seed opening rejected at repetition {}", t);
                e
            })?;
            let seeds: [Seed; PARAM_NB_PARTIES] = std::array::from_fn(|i| party_tree.leaf_seed(i));

            let mut tapes = RandomTapes::<BitVec>::new();
            tapes.derive(&seeds, &sig.salt, t as u16);

            let mut commits = CommitmentsArray::default();
            for party in 0..PARAM_NB_PARTIES {
                if party == unopened {
                    continue;
                }
                commits[party] = if party == last {
                    let aux = proof.aux.as_ref().ok_or(Error::InvalidEncoding)?;
                    commit(&seeds[party], Some(aux), &sig.salt, t as u16, party as u16)
                } else {
                    commit(&seeds[party], None, &sig.salt, t as u16, party as u16)
                };
            }
            commits[unopened] = proof.commitment;
            round_commitments[t] = commit_round(&commits);

            // Online pass with the unopened party's tape removed and its
            // broadcast taken from the proof
            if let Some(aux) = &proof.aux {
                tapes.set_aux_bits(aux);
            }
            tapes.zero_tape(unopened);
            let mut views = Views::<BitVec>::new();
            views.set_view(unopened, &proof.msgs);
            views.unopened = Some(unopened);

            let input = BitVec::from_bytes(&proof.input);
            instance
                .simulate_online(&input, &mut tapes, &mut views, &plaintext, &ciphertext, &mut ())
                .map_err(|e| {
                    reject_trace!("verify: online replay failed at repetition {}", t);
                    e
                })?;

            view_commitments[t] = Some(commit_view(&proof.input, &views));
        }

        // Merkle root over recomputed and supplied view commitments
        let missing = unopened_rounds(&sig.challenge_c);
        let mut merkle = Tree::new_merkle(PARAM_NB_EXECUTIONS);
        merkle.add_merkle_nodes(&missing, &sig.cv_info).map_err(|e| {
            reject_trace!("verify: merkle opening rejected");
            e
        })?;
        merkle.verify_merkle(&view_commitments, &sig.salt).map_err(|e| {
            reject_trace!("verify: merkle root mismatch over the view commitments");
            e
        })?;

        let expected = transcript_digest(
            &round_commitments,
            &merkle.root(),
            &sig.salt,
            &ciphertext,
            &public_key.plaintext,
            message,
        );
        if bool::from(expected.ct_eq(&sig.challenge)) {
            Ok(())
        } else {
            reject_trace!("verify: transcript digest does not match the challenge");
            Err(Error::VerificationFailed)
        }
    }
}
