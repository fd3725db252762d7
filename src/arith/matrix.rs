// GF(2) matrices acting on state vectors by vector-matrix multiplication.
//
// Row j of a matrix is itself a state vector; multiplying v by the matrix
// XORs together the rows selected by the value bits of v, lowest
// word-significance bit first. Rows keep their padding bits zero so products
// stay clean.

use super::bitvec::BitVec;
use crate::constants::params::PARAM_LOWMC_BLOCK_BITS;

/// Square GF(2) matrix with one row per cipher state bit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    pub(crate) rows: [BitVec; PARAM_LOWMC_BLOCK_BITS],
}

impl Matrix {
    pub fn identity() -> Self {
        let mut rows = [BitVec::default(); PARAM_LOWMC_BLOCK_BITS];
        for (j, row) in rows.iter_mut().enumerate() {
            row.set_mul_bit(j, true);
        }
        Self { rows }
    }

    pub(crate) fn from_rows(rows: [BitVec; PARAM_LOWMC_BLOCK_BITS]) -> Self {
        Self { rows }
    }

    /// v * M. Row selection is branchless: each row is ANDed with an all-ones
    /// or all-zeros word derived from the corresponding bit of v.
    pub fn mul(&self, v: &BitVec) -> BitVec {
        let mut acc = BitVec::default();
        self.addmul(&mut acc, v);
        acc
    }

    /// acc ^= v * M
    pub fn addmul(&self, acc: &mut BitVec, v: &BitVec) {
        let mut row = 0;
        let mut top = v.w[0] >> 63;
        self.addmul_word(acc, top, &mut row, 1);
        top = v.w[1];
        self.addmul_word(acc, top, &mut row, 64);
        top = v.w[2];
        self.addmul_word(acc, top, &mut row, 64);
    }

    fn addmul_word(&self, acc: &mut BitVec, mut bits: u64, row: &mut usize, count: usize) {
        for _ in 0..count {
            let mask = (bits & 1).wrapping_neg();
            let r = &self.rows[*row];
            acc.w[0] ^= r.w[0] & mask;
            acc.w[1] ^= r.w[1] & mask;
            acc.w[2] ^= r.w[2] & mask;
            bits >>= 1;
            *row += 1;
        }
    }

    /// Gauss-Jordan inversion. Returns None for singular matrices.
    pub fn inverse(&self) -> Option<Matrix> {
        let mut a = self.clone();
        let mut inv = Matrix::identity();
        for col in 0..PARAM_LOWMC_BLOCK_BITS {
            let pivot = (col..PARAM_LOWMC_BLOCK_BITS).find(|&r| a.rows[r].mul_bit(col) == 1)?;
            a.rows.swap(col, pivot);
            inv.rows.swap(col, pivot);
            for r in 0..PARAM_LOWMC_BLOCK_BITS {
                if r != col && a.rows[r].mul_bit(col) == 1 {
                    let (pivot_row, inv_pivot_row) = (a.rows[col], inv.rows[col]);
                    a.rows[r].xor_assign(&pivot_row);
                    inv.rows[r].xor_assign(&inv_pivot_row);
                }
            }
        }
        Some(inv)
    }
}

#[cfg(test)]
mod matrix_tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn random_state(rng: &mut StdRng) -> BitVec {
        let mut v = BitVec::random(rng);
        v.clear_padding();
        v
    }

    fn random_matrix(rng: &mut StdRng) -> Matrix {
        let mut rows = [BitVec::default(); PARAM_LOWMC_BLOCK_BITS];
        for row in rows.iter_mut() {
            *row = random_state(rng);
        }
        Matrix::from_rows(rows)
    }

    fn random_invertible(rng: &mut StdRng) -> (Matrix, Matrix) {
        loop {
            let m = random_matrix(rng);
            if let Some(inv) = m.inverse() {
                return (m, inv);
            }
        }
    }

    #[test]
    fn test_identity_mul() {
        let mut rng = StdRng::seed_from_u64(11);
        let id = Matrix::identity();
        for _ in 0..50 {
            let v = random_state(&mut rng);
            assert_eq!(id.mul(&v), v);
        }
    }

    #[test]
    fn test_mul_row_selection() {
        let mut rng = StdRng::seed_from_u64(12);
        let m = random_matrix(&mut rng);
        for j in [0usize, 1, 63, 64, 127, 128] {
            let mut v = BitVec::default();
            v.set_mul_bit(j, true);
            assert_eq!(m.mul(&v), m.rows[j]);
        }
    }

    #[test]
    fn test_mul_is_linear() {
        let mut rng = StdRng::seed_from_u64(13);
        let m = random_matrix(&mut rng);
        for _ in 0..50 {
            let a = random_state(&mut rng);
            let b = random_state(&mut rng);
            assert_eq!(m.mul(&a.xor(&b)), m.mul(&a).xor(&m.mul(&b)));
        }
    }

    #[test]
    fn test_addmul_accumulates() {
        let mut rng = StdRng::seed_from_u64(14);
        let m = random_matrix(&mut rng);
        let v = random_state(&mut rng);
        let mut acc = random_state(&mut rng);
        let expected = acc.xor(&m.mul(&v));
        m.addmul(&mut acc, &v);
        assert_eq!(acc, expected);
    }

    #[test]
    fn test_inverse_round_trip() {
        let mut rng = StdRng::seed_from_u64(15);
        let (m, inv) = random_invertible(&mut rng);
        for _ in 0..50 {
            let v = random_state(&mut rng);
            assert_eq!(inv.mul(&m.mul(&v)), v);
            assert_eq!(m.mul(&inv.mul(&v)), v);
        }
    }

    #[test]
    fn test_singular_matrix_rejected() {
        let mut rng = StdRng::seed_from_u64(16);
        let mut m = random_matrix(&mut rng);
        m.rows[7] = m.rows[3];
        assert!(m.inverse().is_none());

        m.rows[7] = BitVec::default();
        assert!(m.inverse().is_none());
    }
}
