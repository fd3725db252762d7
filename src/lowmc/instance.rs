//! Cipher instance: the LowMC-129-129-4 linear-layer tables plus the
//! inverses the correction pass walks backwards through.
//!
//! The tables are expanded deterministically from a fixed, versioned domain
//! string. Round and key matrices are sampled by rejection until invertible,
//! which both matches the full-rank requirement on the linear layers and
//! yields the inverses in the same pass.

use tiny_keccak::{Hasher, Shake, Xof};

use crate::arith::bitvec::BitVec;
use crate::arith::matrix::Matrix;
use crate::constants::params::{PARAM_INPUT_SIZE, PARAM_LOWMC_BLOCK_BITS, PARAM_LOWMC_ROUNDS};

/// Table expansion domain, versioned: changing it changes every key pair
/// and signature ever produced
const TABLE_DOMAIN: &[u8] = b"rpicnic-lowmc-129-129-4-tables-v1";

/// Supported cipher parameter sets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterSet {
    /// LowMC-129-129-4 with a full substitution layer, the Picnic3 L1 choice
    Picnic3L1,
}

/// One round's worth of tables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LowmcRound {
    /// Linear layer
    pub l: Matrix,
    /// Inverse linear layer
    pub li: Matrix,
    /// Key matrix applied after this round's linear layer
    pub k: Matrix,
    /// Round constant
    pub constant: BitVec,
}

/// A fully expanded cipher instance. Generated once and passed by reference
/// into every operation that needs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LowmcInstance {
    /// Whitening key matrix
    pub k0: Matrix,
    /// Inverse of the whitening key matrix, used to recover the key mask
    /// from tape bits
    pub ki0: Matrix,
    pub rounds: Vec<LowmcRound>,
}

impl LowmcInstance {
    pub fn generate(set: ParameterSet) -> Self {
        match set {
            ParameterSet::Picnic3L1 => Self::expand_tables(),
        }
    }

    fn expand_tables() -> Self {
        let mut xof = Shake::v128();
        xof.update(TABLE_DOMAIN);

        let (k0, ki0) = sample_invertible(&mut xof);
        let rounds = (0..PARAM_LOWMC_ROUNDS)
            .map(|_| {
                let (l, li) = sample_invertible(&mut xof);
                let (k, _) = sample_invertible(&mut xof);
                let constant = sample_state(&mut xof);
                LowmcRound { l, li, k, constant }
            })
            .collect();

        Self { k0, ki0, rounds }
    }
}

fn sample_state(xof: &mut Shake) -> BitVec {
    let mut bytes = [0u8; PARAM_INPUT_SIZE];
    xof.squeeze(&mut bytes);
    let mut v = BitVec::from_bytes(&bytes);
    v.clear_padding();
    v
}

fn sample_matrix(xof: &mut Shake) -> Matrix {
    let mut rows = [BitVec::default(); PARAM_LOWMC_BLOCK_BITS];
    for row in rows.iter_mut() {
        *row = sample_state(xof);
    }
    Matrix::from_rows(rows)
}

/// Sample until invertible. A uniform GF(2) matrix is invertible with
/// probability about 0.29, so this terminates after a handful of draws.
fn sample_invertible(xof: &mut Shake) -> (Matrix, Matrix) {
    loop {
        let m = sample_matrix(xof);
        if let Some(inv) = m.inverse() {
            return (m, inv);
        }
    }
}

#[cfg(test)]
mod instance_tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_generation_is_deterministic() {
        let a = LowmcInstance::generate(ParameterSet::Picnic3L1);
        let b = LowmcInstance::generate(ParameterSet::Picnic3L1);
        assert_eq!(a, b);
        assert_eq!(a.rounds.len(), PARAM_LOWMC_ROUNDS);
    }

    #[test]
    fn test_inverses_round_trip() {
        let mut rng = StdRng::seed_from_u64(51);
        let instance = LowmcInstance::generate(ParameterSet::Picnic3L1);
        for _ in 0..20 {
            let mut v = BitVec::random(&mut rng);
            v.clear_padding();
            assert_eq!(instance.ki0.mul(&instance.k0.mul(&v)), v);
            for round in &instance.rounds {
                assert_eq!(round.li.mul(&round.l.mul(&v)), v);
            }
        }
    }

    #[test]
    fn test_tables_have_clean_padding() {
        let instance = LowmcInstance::generate(ParameterSet::Picnic3L1);
        let mut check = |m: &Matrix| {
            for row in &m.rows {
                let mut clean = *row;
                clean.clear_padding();
                assert_eq!(&clean, row);
            }
        };
        check(&instance.k0);
        check(&instance.ki0);
        for round in &instance.rounds {
            check(&round.l);
            check(&round.li);
            check(&round.k);
            let mut c = round.constant;
            c.clear_padding();
            assert_eq!(c, round.constant);
        }
    }
}
