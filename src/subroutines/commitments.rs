//! # Commitments
//!
//! The hash commitments binding each repetition of the proof:
//!
//! - [`commit`] binds one party's tape seed, plus the correction bits for
//!   the last party.
//! - [`commit_round`] folds the sixteen party commitments of a repetition
//!   into one digest for the challenge transcript.
//! - [`commit_view`] binds the public input and every party's broadcast
//!   bits; these digests are the Merkle leaves.
//!
//! The masked twins produce bit-identical digests while keeping their
//! sensitive inputs in two shares end to end.

use crate::arith::bitvec::BitVec;
use crate::arith::bytes::{MaskedBytes, ShareBytes as _};
use crate::arith::masked::MaskedBitVec;
use crate::arith::masking::Masking;
use crate::constants::params::PARAM_NB_PARTIES;
use crate::constants::types::{CommitmentsArray, Hash, Salt, Seed};
use crate::subroutines::hashing::HashCtx;
use crate::subroutines::keccak::MaskedShake;
use crate::subroutines::tapes::Views;

/// Commit to a party's tape seed, and for the last party also to its
/// correction bits.
pub fn commit(seed: &Seed, aux: Option<&[u8]>, salt: &Salt, t: u16, party: u16) -> Hash {
    let mut hasher = HashCtx::new();
    hasher.update(seed);
    if let Some(aux) = aux {
        hasher.update(aux);
    }
    hasher.update(salt);
    hasher.update_u16_le(t);
    hasher.update_u16_le(party);
    hasher.digest()
}

/// Share-wise [`commit`] for the last party, whose correction bits stay
/// masked. The combined digest equals the plain commitment over the
/// combined bits.
pub fn masked_commit(
    seed: &Seed,
    aux: &MaskedBytes,
    salt: &Salt,
    t: u16,
    party: u16,
    masking: &mut Masking,
) -> Hash {
    let mut hasher = MaskedShake::v128();
    hasher.update_public(seed, masking);
    hasher.update([aux.share(0), aux.share(1)], masking);
    hasher.update_public(salt, masking);
    hasher.update_u16_le_public(t, masking);
    hasher.update_u16_le_public(party, masking);
    let mut digest = Hash::default();
    hasher.squeeze_combined(&mut digest, masking);
    digest
}

/// Fold the party commitments of one repetition.
pub fn commit_round(commits: &CommitmentsArray) -> Hash {
    let mut hasher = HashCtx::new();
    for commit in commits {
        hasher.update(commit);
    }
    hasher.digest()
}

/// Commit to the masked input and the broadcast bits of every party.
pub fn commit_view(input: &[u8], views: &Views<BitVec>) -> Hash {
    let mut hasher = HashCtx::new();
    hasher.update(input);
    for party in 0..PARAM_NB_PARTIES {
        hasher.update(views.view(party).as_slice());
    }
    hasher.digest()
}

/// Share-wise [`commit_view`]; combined output equals the plain digest
/// over the combined input and views.
pub fn masked_commit_view(
    input: &MaskedBytes,
    views: &Views<MaskedBitVec>,
    masking: &mut Masking,
) -> Hash {
    let mut hasher = MaskedShake::v128();
    hasher.update([input.share(0), input.share(1)], masking);
    for party in 0..PARAM_NB_PARTIES {
        let view = views.view(party);
        hasher.update([view.share(0), view.share(1)], masking);
    }
    let mut digest = Hash::default();
    hasher.squeeze_combined(&mut digest, masking);
    digest
}

#[cfg(test)]
mod commitment_tests {
    use super::*;
    use crate::arith::masking::MaskingConfig;
    use crate::constants::params::{
        PARAM_AUX_SIZE, PARAM_INPUT_SIZE, PARAM_LOWMC_BLOCK_BITS, PARAM_VIEW_SIZE,
    };
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    const SALT: Salt = [0x11; 32];
    const SEED: Seed = [0x22; 16];

    #[test]
    fn test_commit_separates_inputs() {
        let base = commit(&SEED, None, &SALT, 0, 0);
        assert_ne!(base, commit(&SEED, None, &SALT, 0, 1));
        assert_ne!(base, commit(&SEED, None, &SALT, 1, 0));
        assert_ne!(base, commit(&[0x23; 16], None, &SALT, 0, 0));
        assert_ne!(base, commit(&SEED, Some(&[0u8; PARAM_AUX_SIZE]), &SALT, 0, 0));
    }

    #[test]
    fn test_masked_commit_matches_plain() {
        let mut rng = StdRng::seed_from_u64(41);
        let mut masking = Masking::from_seed(MaskingConfig::default(), [9u8; 32]);

        let mut aux = MaskedBytes::zeroed(PARAM_AUX_SIZE);
        rng.fill_bytes(aux.share_mut(0));
        rng.fill_bytes(aux.share_mut(1));
        let combined = aux.combine();

        let masked = masked_commit(&SEED, &aux, &SALT, 17, 15, &mut masking);
        let plain = commit(&SEED, Some(&combined), &SALT, 17, 15);
        assert_eq!(masked, plain);
    }

    #[test]
    fn test_commit_round_covers_every_party() {
        let mut commits: CommitmentsArray = Default::default();
        for (i, c) in commits.iter_mut().enumerate() {
            c[0] = i as u8;
        }
        let digest = commit_round(&commits);
        commits[15][0] ^= 1;
        assert_ne!(digest, commit_round(&commits));
    }

    #[test]
    fn test_masked_commit_view_matches_plain() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut masking = Masking::from_seed(MaskingConfig::default(), [7u8; 32]);

        let mut input = MaskedBytes::zeroed(PARAM_INPUT_SIZE);
        rng.fill_bytes(input.share_mut(0));
        rng.fill_bytes(input.share_mut(1));

        // fill the masked views word by word and mirror them in plain form
        let mut masked_views: Views<MaskedBitVec> = Views::new();
        for party in 0..PARAM_NB_PARTIES {
            for word in 0..4 {
                let mut value = BitVec::random(&mut rng);
                value.clear_padding();
                let shared = MaskedBitVec::mask(&value, &mut masking);
                masked_views.write_word(party, word * PARAM_LOWMC_BLOCK_BITS, &shared);
            }
        }
        let mut plain_views: Views<BitVec> = Views::new();
        for party in 0..PARAM_NB_PARTIES {
            let combined = masked_views.view(party).combine();
            assert_eq!(combined.len(), PARAM_VIEW_SIZE);
            plain_views.set_view(party, &combined);
        }

        let masked = masked_commit_view(&input, &masked_views, &mut masking);
        let plain = commit_view(&input.combine(), &plain_views);
        assert_eq!(masked, plain);
    }
}
