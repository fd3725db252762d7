// GF(2) bit vectors backing the 129-bit cipher state.
//
// A state vector occupies three 64-bit words. The byte form is big-endian with
// the first byte holding state bits 0..8 (MSB first), so state bit i sits at
// word-significance position 191 - i: w[2] carries bits 0..64, w[1] bits
// 64..128 and the top bit of w[0] carries bit 128. The low 63 bits of w[0] are
// padding and stay zero in every value produced by this module.

use rand::RngCore;

/// Number of 64-bit words backing a state vector
pub const BITVEC_WORDS: usize = 3;

/// Bit width of the backing words
pub const BITVEC_BITS: usize = BITVEC_WORDS * 64;

/// A 129-bit cipher state padded into three 64-bit words
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitVec {
    pub(crate) w: [u64; BITVEC_WORDS],
}

impl BitVec {
    /// Load from big-endian bytes, at most 24. Shorter inputs fill the vector
    /// from the most significant word down, matching the byte form of a state.
    pub fn from_bytes(data: &[u8]) -> Self {
        debug_assert!(data.len() <= BITVEC_WORDS * 8);
        let mut w = [0u64; BITVEC_WORDS];
        let mut idx = BITVEC_WORDS;
        let mut rest = data;
        while !rest.is_empty() {
            idx -= 1;
            let take = rest.len().min(8);
            let mut chunk = [0u8; 8];
            chunk[..take].copy_from_slice(&rest[..take]);
            w[idx] = u64::from_be_bytes(chunk);
            rest = &rest[take..];
        }
        Self { w }
    }

    /// Store into big-endian bytes, truncating to `out.len()` bytes.
    pub fn to_bytes(&self, out: &mut [u8]) {
        debug_assert!(out.len() <= BITVEC_WORDS * 8);
        let mut idx = BITVEC_WORDS;
        let mut rest = out;
        while !rest.is_empty() {
            idx -= 1;
            let chunk = self.w[idx].to_be_bytes();
            let take = rest.len().min(8);
            rest[..take].copy_from_slice(&chunk[..take]);
            rest = &mut rest[take..];
        }
    }

    /// Uniformly random vector over all 192 bits.
    pub fn random(rng: &mut dyn RngCore) -> Self {
        let mut bytes = [0u8; BITVEC_WORDS * 8];
        rng.fill_bytes(&mut bytes);
        Self::from_bytes(&bytes)
    }

    /// State bit i, MSB-first within the byte form.
    pub fn bit(&self, i: usize) -> bool {
        let u = BITVEC_BITS - 1 - i;
        (self.w[u / 64] >> (u % 64)) & 1 == 1
    }

    pub fn set_bit(&mut self, i: usize, value: bool) {
        let u = BITVEC_BITS - 1 - i;
        let mask = 1u64 << (u % 64);
        if value {
            self.w[u / 64] |= mask;
        } else {
            self.w[u / 64] &= !mask;
        }
    }

    /// Bit j in the matrix row/column convention: j = 0 is the lowest value
    /// bit (word-significance position 63), j = 128 the highest.
    pub(crate) fn mul_bit(&self, j: usize) -> u64 {
        let u = 63 + j;
        (self.w[u / 64] >> (u % 64)) & 1
    }

    pub(crate) fn set_mul_bit(&mut self, j: usize, value: bool) {
        let u = 63 + j;
        let mask = 1u64 << (u % 64);
        if value {
            self.w[u / 64] |= mask;
        } else {
            self.w[u / 64] &= !mask;
        }
    }

    pub fn xor(&self, rhs: &Self) -> Self {
        Self {
            w: [
                self.w[0] ^ rhs.w[0],
                self.w[1] ^ rhs.w[1],
                self.w[2] ^ rhs.w[2],
            ],
        }
    }

    pub fn xor_assign(&mut self, rhs: &Self) {
        self.w[0] ^= rhs.w[0];
        self.w[1] ^= rhs.w[1];
        self.w[2] ^= rhs.w[2];
    }

    pub fn and(&self, rhs: &Self) -> Self {
        Self {
            w: [
                self.w[0] & rhs.w[0],
                self.w[1] & rhs.w[1],
                self.w[2] & rhs.w[2],
            ],
        }
    }

    /// Shift towards lower state-bit indices (towards the MSB of the byte
    /// form). Only word-internal distances are supported.
    pub fn shl(&self, n: u32) -> Self {
        debug_assert!(n < 64);
        if n == 0 {
            return *self;
        }
        Self {
            w: [
                self.w[0] << n,
                (self.w[1] << n) | (self.w[0] >> (64 - n)),
                (self.w[2] << n) | (self.w[1] >> (64 - n)),
            ],
        }
    }

    /// Shift towards higher state-bit indices.
    pub fn shr(&self, n: u32) -> Self {
        debug_assert!(n < 64);
        if n == 0 {
            return *self;
        }
        Self {
            w: [
                (self.w[0] >> n) | (self.w[1] << (64 - n)),
                (self.w[1] >> n) | (self.w[2] << (64 - n)),
                self.w[2] >> n,
            ],
        }
    }

    /// Zero the 63 padding bits below the block width.
    pub fn clear_padding(&mut self) {
        self.w[0] &= 0x8000_0000_0000_0000;
    }
}

#[cfg(test)]
mod bitvec_tests {
    use super::*;
    use crate::constants::params::PARAM_INPUT_SIZE;

    #[test]
    fn test_byte_roundtrip() {
        let mut bytes = [0u8; 24];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(37).wrapping_add(11);
        }
        let v = BitVec::from_bytes(&bytes);
        let mut out = [0u8; 24];
        v.to_bytes(&mut out);
        assert_eq!(bytes, out);
    }

    #[test]
    fn test_short_byte_roundtrip() {
        let mut bytes = [0u8; PARAM_INPUT_SIZE];
        bytes[0] = 0xA5;
        bytes[16] = 0x80;
        let v = BitVec::from_bytes(&bytes);
        let mut out = [0u8; PARAM_INPUT_SIZE];
        v.to_bytes(&mut out);
        assert_eq!(bytes, out);
    }

    #[test]
    fn test_bit_order_msb_first() {
        let mut bytes = [0u8; 24];
        bytes[0] = 0x80;
        let v = BitVec::from_bytes(&bytes);
        assert!(v.bit(0));
        assert!(!v.bit(1));
        assert_eq!(v.w[2], 1u64 << 63);

        let mut bytes = [0u8; 24];
        bytes[16] = 0x80;
        let v = BitVec::from_bytes(&bytes);
        assert!(v.bit(128));
        assert_eq!(v.w[0], 1u64 << 63);
    }

    #[test]
    fn test_set_bit_matches_byte_form() {
        let mut v = BitVec::default();
        v.set_bit(0, true);
        v.set_bit(9, true);
        v.set_bit(128, true);
        let mut out = [0u8; PARAM_INPUT_SIZE];
        v.to_bytes(&mut out);
        assert_eq!(out[0], 0x80);
        assert_eq!(out[1], 0x40);
        assert_eq!(out[16], 0x80);
    }

    #[test]
    fn test_shifts_move_state_bits() {
        let mut v = BitVec::default();
        v.set_bit(10, true);
        v.set_bit(70, true);
        let l = v.shl(2);
        assert!(l.bit(8));
        assert!(l.bit(68));
        let r = l.shr(2);
        assert_eq!(r, v);
    }

    #[test]
    fn test_shift_crosses_words() {
        let mut v = BitVec::default();
        // bit 64 is the top bit of w[1]; shifting left by one must carry it
        // into the bottom of w[2]
        v.set_bit(64, true);
        let l = v.shl(1);
        assert!(l.bit(63));
        assert_eq!(l.w[2] & 1, 1);
    }

    #[test]
    fn test_clear_padding() {
        let v = BitVec {
            w: [u64::MAX, u64::MAX, u64::MAX],
        };
        let mut c = v;
        c.clear_padding();
        assert_eq!(c.w[0], 1u64 << 63);
        assert_eq!(c.w[1], u64::MAX);
        assert_eq!(c.w[2], u64::MAX);
        for i in 0..129 {
            assert!(c.bit(i));
        }
    }

    #[test]
    fn test_mul_bit_convention() {
        let mut v = BitVec::default();
        v.set_mul_bit(0, true);
        assert_eq!(v.w[0], 1u64 << 63);
        assert_eq!(v.mul_bit(0), 1);
        // mul bit 0 is state bit 128
        assert!(v.bit(128));

        let mut v = BitVec::default();
        v.set_mul_bit(128, true);
        assert!(v.bit(0));
    }
}
