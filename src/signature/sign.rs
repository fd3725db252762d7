//! # Signing
//!
//! The prover side of the protocol. Every sensitive intermediate lives in
//! two shares: the key is split on entry, tapes are squeezed share-wise, and
//! the cipher simulation runs on [`MaskedBitVec`] words. Only values that
//! appear in the signature are ever declassified.
//!
//! Phase one simulates all repetitions and keeps two digests per repetition.
//! After the challenge, the opening phase re-runs the selected repetitions
//! from their recorded masking seeds; since signature bytes never depend on
//! masking randomness, the replay is bit-identical to the first pass.

use crate::utils::iterator::*;
use crate::{
    arith::{
        bitvec::BitVec,
        bytes::{MaskedBytes, ShareBytes as _},
        masked::{MaskedBitVec, StateWord as _},
        masking::{Masking, MaskingConfig},
    },
    constants::{
        params::{
            PARAM_AUX_SIZE, PARAM_INPUT_SIZE, PARAM_LOWMC_BLOCK_BITS, PARAM_NB_EXECUTIONS,
            PARAM_NB_PARTIES, PARAM_OUTPUT_SIZE, PARAM_PARTY_SEED_INFO_SIZE, PARAM_SALT_SIZE,
            PARAM_SEED_SIZE, PARAM_VIEW_SIZE,
        },
        types::{CommitmentsArray, Hash, Salt, Seed},
    },
    errors::Error,
    keygen::{PublicKey, SecretKey},
    lowmc::LowmcInstance,
    subroutines::{
        challenge::{expand_challenge, transcript_digest, unopened_rounds},
        commitments::{commit, commit_round, masked_commit, masked_commit_view},
        keccak::MaskedShake,
        tapes::{RandomTapes, Views},
        tree::Tree,
    },
    utils::marshalling::Marshalling as _,
};

use rand::RngCore;

use super::signature::{Proof, Signature};

/// Signer-side behavior switches.
#[derive(Clone, Copy, Debug)]
pub struct SignConfig {
    /// Masking behavior of the shared computation
    pub masking: MaskingConfig,
    /// Mix fresh randomness into the salt and root-seed derivation. Turning
    /// this off makes signatures deterministic per key and message.
    pub randomized: bool,
}

impl Default for SignConfig {
    fn default() -> Self {
        Self {
            masking: MaskingConfig::default(),
            randomized: true,
        }
    }
}

/// Everything one repetition produces. Phase one keeps only the two digests;
/// the opening phase rebuilds the rest by replaying the repetition.
struct Repetition {
    party_tree: Tree,
    tapes: RandomTapes<MaskedBitVec>,
    views: Views<MaskedBitVec>,
    commits: CommitmentsArray,
    round_commitment: Hash,
    view_commitment: Hash,
    input_shares: MaskedBytes,
}

impl Signature {
    pub(crate) fn sign_message(
        instance: &LowmcInstance,
        secret_key: &SecretKey,
        message: &[u8],
        config: &SignConfig,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<u8>, Error> {
        let pk = secret_key.public_key();
        let plaintext = BitVec::from_bytes(&pk.plaintext);
        let ciphertext = pk.ciphertext;

        // Share the key before anything else touches it
        let mut mask_seed = [0u8; 32];
        rng.fill_bytes(&mut mask_seed);
        let mut masking = Masking::from_seed(config.masking, mask_seed);
        let key_bytes = masked_share(&secret_key.key, &mut masking);
        let key_shares = MaskedBitVec::from_bytes(&key_bytes);

        // Salt and root seed bind the key, message and instance
        let extra = if config.randomized {
            let mut extra = [0u8; 32];
            rng.fill_bytes(&mut extra);
            Some(extra)
        } else {
            None
        };
        let (salt, root) =
            compute_salt_and_root(&key_bytes, message, pk, extra.as_ref(), &mut masking);

        let iseeds = Tree::generate_seeds(&root, &salt, 0, PARAM_NB_EXECUTIONS);

        // Pre-draw per-repetition masking seeds so the opening phase can
        // replay a repetition exactly
        let mask_seeds: Vec<[u8; 32]> = (0..PARAM_NB_EXECUTIONS)
            .map(|_| {
                let mut seed = [0u8; 32];
                rng.fill_bytes(&mut seed);
                seed
            })
            .collect();

        // Phase one: simulate every repetition
        let masking_config = config.masking;
        let mut slots: Vec<Result<(Hash, Hash), Error>> =
            vec![Ok((Hash::default(), Hash::default())); PARAM_NB_EXECUTIONS];
        get_mut_iterator(&mut slots)
            .enumerate()
            .for_each(|(t, slot)| {
                let iseed = iseeds.leaf_seed(t);
                *slot = simulate_repetition(
                    instance,
                    &key_shares,
                    &iseed,
                    &salt,
                    t as u16,
                    &plaintext,
                    &ciphertext,
                    masking_config,
                    mask_seeds[t],
                )
                .map(|rep| (rep.round_commitment, rep.view_commitment));
            });

        let mut round_commitments = Vec::with_capacity(PARAM_NB_EXECUTIONS);
        let mut view_commitments = Vec::with_capacity(PARAM_NB_EXECUTIONS);
        for slot in slots {
            let (ch, cv) = slot?;
            round_commitments.push(ch);
            view_commitments.push(Some(cv));
        }

        // Phase two: Fiat-Shamir challenge over the full transcript
        let merkle = Tree::build_merkle(&view_commitments, &salt);
        let challenge = transcript_digest(
            &round_commitments,
            &merkle.root(),
            &salt,
            &ciphertext,
            &pk.plaintext,
            message,
        );
        let (challenge_c, challenge_p) = expand_challenge(&challenge);

        // Phase three: open the challenged repetitions
        let missing = unopened_rounds(&challenge_c);
        let cv_info = merkle.open_merkle(&missing);
        let iseed_info = iseeds.reveal_seeds(&challenge_c);

        let mut proofs = Vec::with_capacity(challenge_c.len());
        for (t, party) in Signature::opened_rounds(&challenge_c, &challenge_p) {
            let iseed = iseeds.leaf_seed(t as usize);
            let rep = simulate_repetition(
                instance,
                &key_shares,
                &iseed,
                &salt,
                t,
                &plaintext,
                &ciphertext,
                masking_config,
                mask_seeds[t as usize],
            )?;
            proofs.push(open_repetition(&rep, party));
        }

        let signature = Signature {
            challenge,
            salt,
            iseed_info,
            cv_info,
            proofs,
            challenge_c,
            challenge_p,
        };
        Ok(signature.serialise())
    }
}

/// Split a byte string into a fresh two-share representation.
fn masked_share(data: &[u8], masking: &mut Masking) -> MaskedBytes {
    let mut share0 = vec![0u8; data.len()];
    masking.rng().fill_bytes(&mut share0);
    let share1: Vec<u8> = share0.iter().zip(data).map(|(r, d)| r ^ d).collect();
    MaskedBytes {
        shares: [share0, share1],
    }
}

/// Derive the salt and the root seed of the repetition tree. The key enters
/// share-wise; the squeezed output is public, so it combines on the way out.
fn compute_salt_and_root(
    key_shares: &MaskedBytes,
    message: &[u8],
    pk: &PublicKey,
    extra: Option<&[u8; 32]>,
    masking: &mut Masking,
) -> (Salt, Seed) {
    let mut sponge = MaskedShake::v128();
    sponge.update([key_shares.share(0), key_shares.share(1)], masking);
    sponge.update_public(message, masking);
    sponge.update_public(&pk.ciphertext, masking);
    sponge.update_public(&pk.plaintext, masking);
    sponge.update_u16_le_public(PARAM_LOWMC_BLOCK_BITS as u16, masking);
    if let Some(extra) = extra {
        sponge.update_public(extra, masking);
    }
    let mut buf = [0u8; PARAM_SALT_SIZE + PARAM_SEED_SIZE];
    sponge.squeeze_combined(&mut buf, masking);

    let mut salt = Salt::default();
    salt.copy_from_slice(&buf[..PARAM_SALT_SIZE]);
    let mut root = Seed::default();
    root.copy_from_slice(&buf[PARAM_SALT_SIZE..]);
    (salt, root)
}

/// Run one repetition end to end in the shared domain: derive the party
/// tapes, fix up the corrections, commit to every party, and simulate the
/// online pass against the public ciphertext.
#[allow(clippy::too_many_arguments)]
fn simulate_repetition(
    instance: &LowmcInstance,
    key_shares: &MaskedBitVec,
    iseed: &Seed,
    salt: &Salt,
    t: u16,
    plaintext: &BitVec,
    ciphertext: &[u8; PARAM_OUTPUT_SIZE],
    config: MaskingConfig,
    mask_seed: [u8; 32],
) -> Result<Repetition, Error> {
    let mut masking = Masking::from_seed(config, mask_seed);

    let party_tree = Tree::generate_seeds(iseed, salt, t, PARAM_NB_PARTIES);
    let seeds: [Seed; PARAM_NB_PARTIES] = std::array::from_fn(|i| party_tree.leaf_seed(i));

    let mut tapes = RandomTapes::<MaskedBitVec>::new();
    tapes.derive_masked(&seeds, salt, t, &mut masking);
    let input_mask = instance.compute_aux(&mut tapes, &mut masking);

    let last = PARAM_NB_PARTIES - 1;
    let mut commits = CommitmentsArray::default();
    for (party, c) in commits.iter_mut().enumerate().take(last) {
        *c = commit(&seeds[party], None, salt, t, party as u16);
    }
    commits[last] = masked_commit(&seeds[last], tapes.aux(), salt, t, last as u16, &mut masking);
    let round_commitment = commit_round(&commits);

    // the public input is the key under the tape-derived mask
    let mut masked_input = input_mask.xor(key_shares);
    masked_input.clear_padding();

    let mut views = Views::<MaskedBitVec>::new();
    instance
        .simulate_online(
            &masked_input,
            &mut tapes,
            &mut views,
            plaintext,
            ciphertext,
            &mut masking,
        )
        .map_err(|_| Error::InvalidKey)?;

    let mut input_shares = MaskedBytes::zeroed(PARAM_INPUT_SIZE);
    masked_input.to_bytes(&mut input_shares);
    let view_commitment = masked_commit_view(&input_shares, &views, &mut masking);

    Ok(Repetition {
        party_tree,
        tapes,
        views,
        commits,
        round_commitment,
        view_commitment,
        input_shares,
    })
}

/// Assemble the proof of one opened repetition. This is where the masked
/// input, the correction bits and the unopened party's broadcast are
/// declassified into signature material.
fn open_repetition(rep: &Repetition, party: u16) -> Proof {
    let last = (PARAM_NB_PARTIES - 1) as u16;

    let mut seed_info = [0u8; PARAM_PARTY_SEED_INFO_SIZE];
    seed_info.copy_from_slice(&rep.party_tree.reveal_seeds(&[party]));

    let aux = if party != last {
        let mut bits = [0u8; PARAM_AUX_SIZE];
        bits.copy_from_slice(&rep.tapes.aux().combine());
        Some(bits)
    } else {
        None
    };

    let mut input = [0u8; PARAM_INPUT_SIZE];
    input.copy_from_slice(&rep.input_shares.combine());

    let mut msgs = [0u8; PARAM_VIEW_SIZE];
    msgs.copy_from_slice(&rep.views.view(party as usize).combine());

    Proof {
        seed_info,
        aux,
        input,
        msgs,
        commitment: rep.commits[party as usize],
    }
}
