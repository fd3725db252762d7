// Byte buffers in a share domain.
//
// Tapes, broadcast views and correction bits exist twice in the protocol:
// as single byte strings on the verification path and as per-share byte
// strings while signing. [`ShareBytes`] is the common surface; the bit layout
// inside a buffer is MSB-first, matching [`get_bit`].

use crate::constants::params::PARAM_MASKING_SHARES;

/// MSB-first bit read from a byte buffer.
#[inline]
pub fn get_bit(bytes: &[u8], bit: usize) -> bool {
    (bytes[bit / 8] >> (7 - (bit % 8))) & 1 == 1
}

/// MSB-first bit write into a byte buffer.
#[inline]
pub fn set_bit(bytes: &mut [u8], bit: usize, value: bool) {
    let mask = 1u8 << (7 - (bit % 8));
    if value {
        bytes[bit / 8] |= mask;
    } else {
        bytes[bit / 8] &= !mask;
    }
}

/// Whether all bits from `bit_len` to the end of the last used byte are zero.
pub fn padding_bits_zero(bytes: &[u8], bit_len: usize) -> bool {
    let rem = bit_len % 8;
    if rem == 0 {
        return true;
    }
    bytes[bit_len / 8] & ((1u8 << (8 - rem)) - 1) == 0
}

/// A byte buffer that is either a single string or one string per share.
pub trait ShareBytes: Clone {
    fn zeroed(len: usize) -> Self;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn fill_zero(&mut self);
    fn xor_assign(&mut self, rhs: &Self);
    /// XOR the shares together. The identity for plain buffers.
    fn combine(&self) -> Vec<u8>;
}

/// Single byte string: the unmasked domain
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlainBytes(pub(crate) Vec<u8>);

impl PlainBytes {
    pub fn from_slice(data: &[u8]) -> Self {
        Self(data.to_vec())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl ShareBytes for PlainBytes {
    fn zeroed(len: usize) -> Self {
        Self(vec![0u8; len])
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn fill_zero(&mut self) {
        self.0.fill(0);
    }

    fn xor_assign(&mut self, rhs: &Self) {
        debug_assert_eq!(self.0.len(), rhs.0.len());
        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a ^= b;
        }
    }

    fn combine(&self) -> Vec<u8> {
        self.0.clone()
    }
}

/// One byte string per share: the masked domain
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskedBytes {
    pub(crate) shares: [Vec<u8>; PARAM_MASKING_SHARES],
}

impl MaskedBytes {
    pub fn share(&self, i: usize) -> &[u8] {
        &self.shares[i]
    }

    pub fn share_mut(&mut self, i: usize) -> &mut [u8] {
        &mut self.shares[i]
    }
}

impl ShareBytes for MaskedBytes {
    fn zeroed(len: usize) -> Self {
        Self {
            shares: std::array::from_fn(|_| vec![0u8; len]),
        }
    }

    fn len(&self) -> usize {
        self.shares[0].len()
    }

    fn fill_zero(&mut self) {
        for share in self.shares.iter_mut() {
            share.fill(0);
        }
    }

    fn xor_assign(&mut self, rhs: &Self) {
        for (share, other) in self.shares.iter_mut().zip(rhs.shares.iter()) {
            debug_assert_eq!(share.len(), other.len());
            for (a, b) in share.iter_mut().zip(other.iter()) {
                *a ^= b;
            }
        }
    }

    fn combine(&self) -> Vec<u8> {
        let mut out = self.shares[0].clone();
        for share in &self.shares[1..] {
            for (a, b) in out.iter_mut().zip(share.iter()) {
                *a ^= b;
            }
        }
        out
    }
}

#[cfg(test)]
mod bytes_tests {
    use super::*;

    #[test]
    fn test_bit_access_msb_first() {
        let mut buf = vec![0u8; 4];
        set_bit(&mut buf, 0, true);
        set_bit(&mut buf, 9, true);
        set_bit(&mut buf, 31, true);
        assert_eq!(buf, vec![0x80, 0x40, 0x00, 0x01]);
        assert!(get_bit(&buf, 0));
        assert!(get_bit(&buf, 9));
        assert!(get_bit(&buf, 31));
        assert!(!get_bit(&buf, 1));
        set_bit(&mut buf, 0, false);
        assert!(!get_bit(&buf, 0));
        assert_eq!(buf[0], 0x00);
    }

    #[test]
    fn test_padding_bits_zero() {
        let mut buf = vec![0u8; 17];
        assert!(padding_bits_zero(&buf, 129));
        buf[16] = 0x80;
        assert!(padding_bits_zero(&buf, 129));
        buf[16] = 0x81;
        assert!(!padding_bits_zero(&buf, 129));
        buf[16] = 0x40;
        assert!(!padding_bits_zero(&buf, 129));
        assert!(padding_bits_zero(&buf, 136));
    }

    #[test]
    fn test_masked_combine() {
        let mut buf = MaskedBytes::zeroed(3);
        buf.share_mut(0).copy_from_slice(&[0xF0, 0x0F, 0xAA]);
        buf.share_mut(1).copy_from_slice(&[0x0F, 0x0F, 0x55]);
        assert_eq!(buf.combine(), vec![0xFF, 0x00, 0xFF]);
    }

    #[test]
    fn test_xor_assign() {
        let a = PlainBytes::from_slice(&[1, 2, 3]);
        let mut b = PlainBytes::from_slice(&[7, 7, 7]);
        b.xor_assign(&a);
        assert_eq!(b.as_slice(), &[6, 5, 4]);
    }
}
