// Shared-domain state words.
//
// The cipher, its correction-bit pass and the online simulation are written
// once against [`StateWord`] and run in two domains: plain [`BitVec`] words
// on the verification path and two-share [`MaskedBitVec`] words on the
// signing path. Linear operations act share-wise; AND and refresh consume
// masking randomness through the context.

use super::bitvec::BitVec;
use super::bytes::{get_bit, set_bit, MaskedBytes, PlainBytes, ShareBytes};
use super::masking::{AndGadget, Masking};
use super::matrix::Matrix;
use crate::constants::params::PARAM_MASKING_SHARES;

/// Operations the shared computation needs from a cipher state word
pub trait StateWord: Copy + Default {
    /// Consumed by AND and refresh: `()` in the plain domain, masking
    /// randomness in the shared domain
    type Ctx;
    /// Byte buffers carrying tape, view and correction data in this domain
    type Bytes: ShareBytes;

    fn xor(&self, rhs: &Self) -> Self;
    /// XOR with a public constant
    fn xor_mask(&self, mask: &BitVec) -> Self;
    fn and(&self, rhs: &Self, ctx: &mut Self::Ctx) -> Self;
    /// AND with a public constant
    fn and_mask(&self, mask: &BitVec) -> Self;
    fn shl(&self, n: u32) -> Self;
    fn shr(&self, n: u32) -> Self;
    /// Rerandomize the sharing without changing the value. A no-op in the
    /// plain domain.
    fn refresh(&mut self, ctx: &mut Self::Ctx);
    fn matrix_mul(&self, m: &Matrix) -> Self;
    /// self ^= v * M
    fn matrix_addmul(&mut self, v: &Self, m: &Matrix);
    /// Recombine the shares into the public value. Every call site is a
    /// deliberate declassification boundary.
    fn declassify(&self) -> BitVec;
    fn from_bytes(src: &Self::Bytes) -> Self;
    fn to_bytes(&self, dst: &mut Self::Bytes);
    /// Load `nbits` consecutive bits starting at `start` into state bits
    /// 0..nbits
    fn read_bits(src: &Self::Bytes, start: usize, nbits: usize) -> Self;
    /// Store state bits 0..nbits at bit offset `start`
    fn write_bits(&self, dst: &mut Self::Bytes, start: usize, nbits: usize);
    fn clear_padding(&mut self);
}

impl StateWord for BitVec {
    type Ctx = ();
    type Bytes = PlainBytes;

    fn xor(&self, rhs: &Self) -> Self {
        BitVec::xor(self, rhs)
    }

    fn xor_mask(&self, mask: &BitVec) -> Self {
        BitVec::xor(self, mask)
    }

    fn and(&self, rhs: &Self, _ctx: &mut ()) -> Self {
        BitVec::and(self, rhs)
    }

    fn and_mask(&self, mask: &BitVec) -> Self {
        BitVec::and(self, mask)
    }

    fn shl(&self, n: u32) -> Self {
        BitVec::shl(self, n)
    }

    fn shr(&self, n: u32) -> Self {
        BitVec::shr(self, n)
    }

    fn refresh(&mut self, _ctx: &mut ()) {}

    fn matrix_mul(&self, m: &Matrix) -> Self {
        m.mul(self)
    }

    fn matrix_addmul(&mut self, v: &Self, m: &Matrix) {
        m.addmul(self, v);
    }

    fn declassify(&self) -> BitVec {
        *self
    }

    fn from_bytes(src: &PlainBytes) -> Self {
        BitVec::from_bytes(src.as_slice())
    }

    fn to_bytes(&self, dst: &mut PlainBytes) {
        BitVec::to_bytes(self, dst.as_mut_slice());
    }

    fn read_bits(src: &PlainBytes, start: usize, nbits: usize) -> Self {
        read_word_bits(src.as_slice(), start, nbits)
    }

    fn write_bits(&self, dst: &mut PlainBytes, start: usize, nbits: usize) {
        write_word_bits(self, dst.as_mut_slice(), start, nbits);
    }

    fn clear_padding(&mut self) {
        BitVec::clear_padding(self);
    }
}

/// A state word split into two boolean shares
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaskedBitVec {
    pub(crate) shares: [BitVec; PARAM_MASKING_SHARES],
}

impl MaskedBitVec {
    /// Split a public value into a fresh two-share representation.
    pub fn mask(value: &BitVec, masking: &mut Masking) -> Self {
        let r = BitVec::random(masking.rng());
        Self {
            shares: [r, r.xor(value)],
        }
    }

    pub fn from_shares(shares: [BitVec; PARAM_MASKING_SHARES]) -> Self {
        Self { shares }
    }
}

impl StateWord for MaskedBitVec {
    type Ctx = Masking;
    type Bytes = MaskedBytes;

    fn xor(&self, rhs: &Self) -> Self {
        Self {
            shares: [
                self.shares[0].xor(&rhs.shares[0]),
                self.shares[1].xor(&rhs.shares[1]),
            ],
        }
    }

    fn xor_mask(&self, mask: &BitVec) -> Self {
        Self {
            shares: [self.shares[0].xor(mask), self.shares[1]],
        }
    }

    fn and(&self, rhs: &Self, masking: &mut Masking) -> Self {
        let (a0, a1) = (&self.shares[0], &self.shares[1]);
        let (b0, b1) = (&rhs.shares[0], &rhs.shares[1]);
        match masking.config().and_gadget {
            AndGadget::Randomized => {
                let r = BitVec::random(masking.rng());
                let z0 = a0.and(b0).xor(&r);
                let z1 = a1.and(b1).xor(&r).xor(&a0.and(b1)).xor(&a1.and(b0));
                Self { shares: [z0, z1] }
            }
            AndGadget::Heuristic => {
                let z0 = a0.and(b0).xor(&a0.and(b1));
                let z1 = a1.and(b0).xor(&a1.and(b1));
                Self { shares: [z0, z1] }
            }
        }
    }

    fn and_mask(&self, mask: &BitVec) -> Self {
        Self {
            shares: [self.shares[0].and(mask), self.shares[1].and(mask)],
        }
    }

    fn shl(&self, n: u32) -> Self {
        Self {
            shares: [self.shares[0].shl(n), self.shares[1].shl(n)],
        }
    }

    fn shr(&self, n: u32) -> Self {
        Self {
            shares: [self.shares[0].shr(n), self.shares[1].shr(n)],
        }
    }

    fn refresh(&mut self, masking: &mut Masking) {
        let r = BitVec::random(masking.rng());
        self.shares[0].xor_assign(&r);
        self.shares[1].xor_assign(&r);
    }

    fn matrix_mul(&self, m: &Matrix) -> Self {
        Self {
            shares: [m.mul(&self.shares[0]), m.mul(&self.shares[1])],
        }
    }

    fn matrix_addmul(&mut self, v: &Self, m: &Matrix) {
        m.addmul(&mut self.shares[0], &v.shares[0]);
        m.addmul(&mut self.shares[1], &v.shares[1]);
    }

    fn declassify(&self) -> BitVec {
        self.shares[0].xor(&self.shares[1])
    }

    fn from_bytes(src: &MaskedBytes) -> Self {
        Self {
            shares: [
                BitVec::from_bytes(src.share(0)),
                BitVec::from_bytes(src.share(1)),
            ],
        }
    }

    fn to_bytes(&self, dst: &mut MaskedBytes) {
        self.shares[0].to_bytes(dst.share_mut(0));
        self.shares[1].to_bytes(dst.share_mut(1));
    }

    fn read_bits(src: &MaskedBytes, start: usize, nbits: usize) -> Self {
        Self {
            shares: [
                read_word_bits(src.share(0), start, nbits),
                read_word_bits(src.share(1), start, nbits),
            ],
        }
    }

    fn write_bits(&self, dst: &mut MaskedBytes, start: usize, nbits: usize) {
        write_word_bits(&self.shares[0], dst.share_mut(0), start, nbits);
        write_word_bits(&self.shares[1], dst.share_mut(1), start, nbits);
    }

    fn clear_padding(&mut self) {
        self.shares[0].clear_padding();
        self.shares[1].clear_padding();
    }
}

fn read_word_bits(src: &[u8], start: usize, nbits: usize) -> BitVec {
    let mut v = BitVec::default();
    for i in 0..nbits {
        if get_bit(src, start + i) {
            v.set_bit(i, true);
        }
    }
    v
}

fn write_word_bits(v: &BitVec, dst: &mut [u8], start: usize, nbits: usize) {
    for i in 0..nbits {
        set_bit(dst, start + i, v.bit(i));
    }
}
