//! # Masked Keccak
//!
//! A SHAKE sponge over a two-share Keccak state. Linear permutation steps
//! (theta, rho, pi) run on each share independently, the round constant is
//! folded into share 0, and only chi crosses shares through a masked AND
//! gadget. XOR-combining the shares of any output always yields the plain
//! SHAKE of the XOR-combined input, which is what keeps signatures
//! verifiable by an unmasked implementation.
//!
//! How many of the 24 rounds run on shares is configurable: all of them,
//! the first half (collapsing once the state is pseudorandom), or none
//! (collapse on absorption).

use crate::arith::masking::{AndGadget, KeccakMasking, Masking};
use crate::constants::params::PARAM_MASKING_SHARES;
use crate::errors::Error;

const KECCAK_ROUNDS: usize = 24;
const KECCAK_WIDTH_BYTES: usize = 200;
/// SHAKE128 rate in bytes
const SHAKE128_RATE: usize = 168;
/// SHAKE multi-rate padding suffix (includes the first padding bit)
const SHAKE_SUFFIX: u8 = 0x1F;

const ROUND_CONSTANTS: [u64; KECCAK_ROUNDS] = [
    0x0000000000000001,
    0x0000000000008082,
    0x800000000000808a,
    0x8000000080008000,
    0x000000000000808b,
    0x0000000080000001,
    0x8000000080008081,
    0x8000000000008009,
    0x000000000000008a,
    0x0000000000000088,
    0x0000000080008009,
    0x000000008000000a,
    0x000000008000808b,
    0x800000000000008b,
    0x8000000000008089,
    0x8000000000008003,
    0x8000000000008002,
    0x8000000000000080,
    0x000000000000800a,
    0x800000008000000a,
    0x8000000080008081,
    0x8000000000008080,
    0x0000000080000001,
    0x8000000080008008,
];

/// Rotation offsets indexed by lane x + 5y
const RHO: [u32; 25] = [
    0, 1, 62, 28, 27, 36, 44, 6, 55, 20, 3, 10, 43, 25, 39, 41, 45, 15, 21, 8, 18, 2, 61, 56, 14,
];

type Lanes = [u64; 25];

fn theta(a: &mut Lanes) {
    let mut c = [0u64; 5];
    for (x, col) in c.iter_mut().enumerate() {
        *col = a[x] ^ a[x + 5] ^ a[x + 10] ^ a[x + 15] ^ a[x + 20];
    }
    for x in 0..5 {
        let d = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
        for y in 0..5 {
            a[x + 5 * y] ^= d;
        }
    }
}

/// rho and pi fused: rotate every lane and move it to its pi destination.
fn rho_pi(a: &Lanes) -> Lanes {
    let mut b = [0u64; 25];
    for y in 0..5 {
        for x in 0..5 {
            let src = (x + 3 * y) % 5 + 5 * x;
            b[x + 5 * y] = a[src].rotate_left(RHO[src]);
        }
    }
    b
}

fn plain_round(a: &mut Lanes, rc: u64) {
    theta(a);
    let b = rho_pi(a);
    for y in 0..5 {
        for x in 0..5 {
            let i1 = (x + 1) % 5 + 5 * y;
            let i2 = (x + 2) % 5 + 5 * y;
            a[x + 5 * y] = b[x + 5 * y] ^ (!b[i1] & b[i2]);
        }
    }
    a[0] ^= rc;
}

/// One round on the two-share state. The complement inside chi is a public
/// constant and lands on share 0 only.
fn masked_round(s: &mut [Lanes; PARAM_MASKING_SHARES], rc: u64, masking: &mut Masking) {
    let gadget = masking.config().keccak_gadget;
    let mut b = [[0u64; 25]; PARAM_MASKING_SHARES];
    for (share, dst) in s.iter_mut().zip(b.iter_mut()) {
        theta(share);
        *dst = rho_pi(share);
    }
    for y in 0..5 {
        for x in 0..5 {
            let i = x + 5 * y;
            let i1 = (x + 1) % 5 + 5 * y;
            let i2 = (x + 2) % 5 + 5 * y;
            let (z0, z1) = and_lanes(gadget, (!b[0][i1], b[1][i1]), (b[0][i2], b[1][i2]), masking);
            s[0][i] = b[0][i] ^ z0;
            s[1][i] = b[1][i] ^ z1;
        }
    }
    s[0][0] ^= rc;
}

fn and_lanes(
    gadget: AndGadget,
    (x0, x1): (u64, u64),
    (y0, y1): (u64, u64),
    masking: &mut Masking,
) -> (u64, u64) {
    match gadget {
        AndGadget::Randomized => {
            let r = masking.random_word();
            ((x0 & y0) ^ r, (x1 & y1) ^ r ^ (x0 & y1) ^ (x1 & y0))
        }
        AndGadget::Heuristic => ((x0 & y0) ^ (x0 & y1), (x1 & y0) ^ (x1 & y1)),
    }
}

/// SHAKE sponge over a two-share state
pub struct MaskedShake {
    state: [Lanes; PARAM_MASKING_SHARES],
    rate: usize,
    byte_index: usize,
    /// Pending domain suffix per share; only share 0 carries a nonzero one
    suffix: [u8; PARAM_MASKING_SHARES],
    squeezing: bool,
}

impl MaskedShake {
    /// A sponge with the given rate/capacity split in bits and domain
    /// suffix. The suffix must be nonzero since it doubles as the first
    /// padding bit, and only the compiled share count is supported.
    pub fn new(rate_bits: usize, capacity_bits: usize, suffix: u8, shares: usize) -> Result<Self, Error> {
        if rate_bits + capacity_bits != KECCAK_WIDTH_BYTES * 8 || rate_bits % 8 != 0 || rate_bits == 0 {
            return Err(Error::UnsupportedParameters);
        }
        if suffix == 0 || shares != PARAM_MASKING_SHARES {
            return Err(Error::UnsupportedParameters);
        }
        let mut suffixes = [0u8; PARAM_MASKING_SHARES];
        suffixes[0] = suffix;
        Ok(Self {
            state: [[0u64; 25]; PARAM_MASKING_SHARES],
            rate: rate_bits / 8,
            byte_index: 0,
            suffix: suffixes,
            squeezing: false,
        })
    }

    /// SHAKE128 over two shares
    pub fn v128() -> Self {
        // rate and suffix are compile-time valid
        Self {
            state: [[0u64; 25]; PARAM_MASKING_SHARES],
            rate: SHAKE128_RATE,
            byte_index: 0,
            suffix: {
                let mut s = [0u8; PARAM_MASKING_SHARES];
                s[0] = SHAKE_SUFFIX;
                s
            },
            squeezing: false,
        }
    }

    /// Absorb one byte string per share. The streams must have equal length.
    pub fn update(&mut self, shares: [&[u8]; PARAM_MASKING_SHARES], masking: &mut Masking) {
        debug_assert!(!self.squeezing);
        debug_assert_eq!(shares[0].len(), shares[1].len());
        for pos in 0..shares[0].len() {
            for (sh, stream) in shares.iter().enumerate() {
                self.xor_byte(sh, self.byte_index, stream[pos]);
            }
            self.byte_index += 1;
            if self.byte_index == self.rate {
                self.permute(masking);
                self.byte_index = 0;
            }
        }
    }

    /// Absorb public data: the bytes land in share 0, zeros in the rest.
    pub fn update_public(&mut self, data: &[u8], masking: &mut Masking) {
        debug_assert!(!self.squeezing);
        for &byte in data {
            self.xor_byte(0, self.byte_index, byte);
            self.byte_index += 1;
            if self.byte_index == self.rate {
                self.permute(masking);
                self.byte_index = 0;
            }
        }
    }

    pub fn update_u16_le_public(&mut self, value: u16, masking: &mut Masking) {
        self.update_public(&value.to_le_bytes(), masking);
    }

    /// Absorb a final, possibly bit-length input. Whole bytes are absorbed
    /// as usual; the trailing `bit_len % 8` bits sit low-aligned in the last
    /// byte of each stream and are merged into the pending domain suffix.
    pub fn update_last_bits(
        &mut self,
        shares: [&[u8]; PARAM_MASKING_SHARES],
        bit_len: usize,
        masking: &mut Masking,
    ) {
        let full_bytes = bit_len / 8;
        let rem = bit_len % 8;
        self.update([&shares[0][..full_bytes], &shares[1][..full_bytes]], masking);
        if rem == 0 {
            return;
        }
        let keep = (1u16 << rem) - 1;
        let mut delimited = [0u16; PARAM_MASKING_SHARES];
        for sh in 0..PARAM_MASKING_SHARES {
            let last = shares[sh][full_bytes] as u16 & keep;
            delimited[sh] = last | (self.suffix[sh] as u16) << rem;
        }
        // If share 0's merged byte overflows, every share absorbs its low
        // byte now so the streams stay aligned.
        if delimited[0] & 0xFF00 == 0 {
            for sh in 0..PARAM_MASKING_SHARES {
                self.suffix[sh] = delimited[sh] as u8;
            }
        } else {
            let low: [u8; PARAM_MASKING_SHARES] =
                std::array::from_fn(|sh| delimited[sh] as u8);
            self.update([&[low[0]], &[low[1]]], masking);
            for sh in 0..PARAM_MASKING_SHARES {
                self.suffix[sh] = (delimited[sh] >> 8) as u8;
            }
        }
    }

    /// Squeeze one output buffer per share. The buffers must have equal
    /// length.
    pub fn squeeze(&mut self, outputs: [&mut [u8]; PARAM_MASKING_SHARES], masking: &mut Masking) {
        debug_assert_eq!(outputs[0].len(), outputs[1].len());
        if !self.squeezing {
            self.pad_and_switch(masking);
        }
        let len = outputs[0].len();
        let [out0, out1] = outputs;
        let mut offset = 0;
        while offset < len {
            if self.byte_index == self.rate {
                self.permute(masking);
                self.byte_index = 0;
            }
            let take = (self.rate - self.byte_index).min(len - offset);
            for k in 0..take {
                out0[offset + k] = self.extract_byte(0, self.byte_index + k);
                out1[offset + k] = self.extract_byte(1, self.byte_index + k);
            }
            self.byte_index += take;
            offset += take;
        }
    }

    /// Squeeze and XOR the shares together. The declassification boundary
    /// for public digests like commitments and the challenge.
    pub fn squeeze_combined(&mut self, output: &mut [u8], masking: &mut Masking) {
        let mut share1 = vec![0u8; output.len()];
        self.squeeze([&mut *output, &mut share1[..]], masking);
        for (a, b) in output.iter_mut().zip(share1.iter()) {
            *a ^= b;
        }
    }

    fn pad_and_switch(&mut self, masking: &mut Masking) {
        for sh in 0..PARAM_MASKING_SHARES {
            self.xor_byte(sh, self.byte_index, self.suffix[sh]);
        }
        // A merged suffix whose top bit lands on the last bit of the block
        // leaves no room for the final padding bit in this block.
        if self.suffix[0] >= 0x80 && self.byte_index == self.rate - 1 {
            self.permute(masking);
        }
        self.xor_byte(0, self.rate - 1, 0x80);
        self.permute(masking);
        self.byte_index = 0;
        self.squeezing = true;
    }

    fn permute(&mut self, masking: &mut Masking) {
        match masking.config().keccak_masking {
            KeccakMasking::Full => {
                for rc in ROUND_CONSTANTS {
                    masked_round(&mut self.state, rc, masking);
                }
            }
            KeccakMasking::FirstHalf => {
                for rc in &ROUND_CONSTANTS[..KECCAK_ROUNDS / 2] {
                    masked_round(&mut self.state, *rc, masking);
                }
                self.collapse();
                for rc in &ROUND_CONSTANTS[KECCAK_ROUNDS / 2..] {
                    plain_round(&mut self.state[0], *rc);
                }
            }
            KeccakMasking::None => {
                self.collapse();
                for rc in ROUND_CONSTANTS {
                    plain_round(&mut self.state[0], rc);
                }
            }
        }
    }

    /// Fold share 1 into share 0. Absorption is linear, so collapsing at
    /// permutation entry is equivalent to collapsing each absorbed block.
    fn collapse(&mut self) {
        for i in 0..25 {
            self.state[0][i] ^= self.state[1][i];
            self.state[1][i] = 0;
        }
    }

    fn xor_byte(&mut self, share: usize, index: usize, byte: u8) {
        self.state[share][index / 8] ^= (byte as u64) << (8 * (index % 8));
    }

    fn extract_byte(&self, share: usize, index: usize) -> u8 {
        (self.state[share][index / 8] >> (8 * (index % 8))) as u8
    }
}

#[cfg(test)]
mod keccak_tests {
    use super::*;
    use crate::arith::masking::MaskingConfig;
    use rand::{rngs::StdRng, RngCore, SeedableRng};
    use tiny_keccak::{Hasher, Shake, Xof};

    const CONFIGS: [MaskingConfig; 6] = [
        MaskingConfig {
            and_gadget: AndGadget::Randomized,
            keccak_gadget: AndGadget::Heuristic,
            keccak_masking: KeccakMasking::None,
        },
        MaskingConfig {
            and_gadget: AndGadget::Randomized,
            keccak_gadget: AndGadget::Heuristic,
            keccak_masking: KeccakMasking::FirstHalf,
        },
        MaskingConfig {
            and_gadget: AndGadget::Randomized,
            keccak_gadget: AndGadget::Heuristic,
            keccak_masking: KeccakMasking::Full,
        },
        MaskingConfig {
            and_gadget: AndGadget::Randomized,
            keccak_gadget: AndGadget::Randomized,
            keccak_masking: KeccakMasking::None,
        },
        MaskingConfig {
            and_gadget: AndGadget::Randomized,
            keccak_gadget: AndGadget::Randomized,
            keccak_masking: KeccakMasking::FirstHalf,
        },
        MaskingConfig {
            and_gadget: AndGadget::Randomized,
            keccak_gadget: AndGadget::Randomized,
            keccak_masking: KeccakMasking::Full,
        },
    ];

    fn masking_for(config: MaskingConfig, seed: u64) -> Masking {
        let mut seed_bytes = [0u8; 32];
        seed_bytes[..8].copy_from_slice(&seed.to_le_bytes());
        Masking::from_seed(config, seed_bytes)
    }

    fn plain_shake128(data: &[u8], out_len: usize) -> Vec<u8> {
        let mut shake = Shake::v128();
        shake.update(data);
        let mut out = vec![0u8; out_len];
        shake.squeeze(&mut out);
        out
    }

    fn split_shares(data: &[u8], rng: &mut StdRng) -> (Vec<u8>, Vec<u8>) {
        let mut share0 = vec![0u8; data.len()];
        rng.fill_bytes(&mut share0);
        let share1: Vec<u8> = share0.iter().zip(data.iter()).map(|(a, b)| a ^ b).collect();
        (share0, share1)
    }

    #[test]
    fn test_combined_digest_matches_plain_shake() {
        let mut rng = StdRng::seed_from_u64(31);
        for config in CONFIGS {
            for len in [0usize, 1, 5, 167, 168, 169, 400] {
                let mut data = vec![0u8; len];
                rng.fill_bytes(&mut data);
                let (s0, s1) = split_shares(&data, &mut rng);

                let mut masking = masking_for(config, len as u64);
                let mut sponge = MaskedShake::v128();
                sponge.update([&s0, &s1], &mut masking);
                let mut digest = [0u8; 32];
                sponge.squeeze_combined(&mut digest, &mut masking);

                assert_eq!(
                    digest.to_vec(),
                    plain_shake128(&data, 32),
                    "mismatch for len={len} config={config:?}"
                );
            }
        }
    }

    #[test]
    fn test_single_bit_flip_changes_digest() {
        let mut rng = StdRng::seed_from_u64(38);
        let mut data = vec![0u8; 40];
        rng.fill_bytes(&mut data);

        let digest_of = |data: &[u8], seed: u64| {
            let mut masking = masking_for(MaskingConfig::default(), seed);
            let mut sponge = MaskedShake::v128();
            sponge.update_public(data, &mut masking);
            let mut digest = [0u8; 32];
            sponge.squeeze_combined(&mut digest, &mut masking);
            digest
        };

        let base = digest_of(&data, 1);
        assert_eq!(base, digest_of(&data, 2), "same input, different mask randomness");
        data[17] ^= 0x04;
        assert_ne!(base, digest_of(&data, 1));
    }

    #[test]
    fn test_public_update_is_zero_share_update() {
        let mut masking = masking_for(MaskingConfig::default(), 7);
        let data = b"public bytes in share zero";
        let zeros = vec![0u8; data.len()];

        let mut a = MaskedShake::v128();
        a.update_public(data, &mut masking);
        let mut da = [0u8; 32];
        a.squeeze_combined(&mut da, &mut masking);

        let mut b = MaskedShake::v128();
        b.update([data, &zeros], &mut masking);
        let mut db = [0u8; 32];
        b.squeeze_combined(&mut db, &mut masking);

        assert_eq!(da, db);
    }

    #[test]
    fn test_per_share_squeeze_combines_to_plain() {
        let mut rng = StdRng::seed_from_u64(32);
        let mut data = vec![0u8; 70];
        rng.fill_bytes(&mut data);

        for config in CONFIGS {
            let mut masking = masking_for(config, 90);
            let mut sponge = MaskedShake::v128();
            sponge.update_public(&data, &mut masking);
            let mut out0 = vec![0u8; 200];
            let mut out1 = vec![0u8; 200];
            sponge.squeeze([&mut out0, &mut out1], &mut masking);
            let combined: Vec<u8> = out0.iter().zip(out1.iter()).map(|(a, b)| a ^ b).collect();
            assert_eq!(combined, plain_shake128(&data, 200));
        }
    }

    #[test]
    fn test_chunked_squeeze_matches_one_shot() {
        let mut masking = masking_for(MaskingConfig::default(), 33);
        let mut a = MaskedShake::v128();
        a.update_public(b"chunked", &mut masking);
        let mut one_shot = vec![0u8; 400];
        a.squeeze_combined(&mut one_shot, &mut masking);

        let mut masking = masking_for(MaskingConfig::default(), 34);
        let mut b = MaskedShake::v128();
        b.update_public(b"chunked", &mut masking);
        let mut chunked = vec![0u8; 400];
        b.squeeze_combined(&mut chunked[..100], &mut masking);
        b.squeeze_combined(&mut chunked[100..168], &mut masking);
        b.squeeze_combined(&mut chunked[168..], &mut masking);

        assert_eq!(one_shot, chunked);
    }

    #[test]
    fn test_last_bits_byte_aligned_matches_update() {
        let mut rng = StdRng::seed_from_u64(35);
        let mut data = vec![0u8; 21];
        rng.fill_bytes(&mut data);
        let (s0, s1) = split_shares(&data, &mut rng);

        let mut masking = masking_for(MaskingConfig::default(), 36);
        let mut a = MaskedShake::v128();
        a.update([&s0, &s1], &mut masking);
        let mut da = [0u8; 32];
        a.squeeze_combined(&mut da, &mut masking);

        let mut b = MaskedShake::v128();
        b.update_last_bits([&s0, &s1], data.len() * 8, &mut masking);
        let mut db = [0u8; 32];
        b.squeeze_combined(&mut db, &mut masking);

        assert_eq!(da, db);
    }

    #[test]
    fn test_last_bits_consistent_across_configs() {
        let mut rng = StdRng::seed_from_u64(37);
        // rem = 3 keeps the merged suffix in one byte, rem = 5 overflows it
        for bit_len in [8 * 4 + 3, 8 * 4 + 5] {
            let mut data = vec![0u8; 5];
            rng.fill_bytes(&mut data);
            let (s0, s1) = split_shares(&data, &mut rng);

            let mut digests = Vec::new();
            for config in CONFIGS {
                let mut masking = masking_for(config, bit_len as u64);
                let mut sponge = MaskedShake::v128();
                sponge.update_last_bits([&s0, &s1], bit_len, &mut masking);
                let mut digest = [0u8; 32];
                sponge.squeeze_combined(&mut digest, &mut masking);
                digests.push(digest);
            }
            for d in &digests[1..] {
                assert_eq!(&digests[0], d);
            }
            // trailing bits must matter
            let mut shorter = masking_for(CONFIGS[0], 99);
            let mut sponge = MaskedShake::v128();
            sponge.update_last_bits([&s0, &s1], bit_len - 1, &mut shorter);
            let mut digest = [0u8; 32];
            sponge.squeeze_combined(&mut digest, &mut shorter);
            assert_ne!(digests[0], digest);
        }
    }

    #[test]
    fn test_new_validates_parameters() {
        assert!(MaskedShake::new(1344, 256, 0x1F, 2).is_ok());
        assert!(MaskedShake::new(1344, 256, 0x00, 2).is_err());
        assert!(MaskedShake::new(1344, 256, 0x1F, 3).is_err());
        assert!(MaskedShake::new(1344, 128, 0x1F, 2).is_err());
    }
}
