//! # Random tapes and broadcast views
//!
//! Each party owns one random tape per repetition. The tape interleaves, per
//! cipher round, a 129-bit input-mask word followed by a 129-bit AND-helper
//! word; the round-0 input-mask word is the party's share of the mask on the
//! cipher's whitened input. Reads walk the tape through an explicit
//! [`BitCursor`] so the correction pass and the online pass can be seen to
//! consume the same bits.
//!
//! [`Views`] collects the 129 bits each party broadcasts per round. During
//! verification the unopened party's view comes from the signature instead
//! of being recomputed.

use crate::arith::bitvec::BitVec;
use crate::arith::bytes::{get_bit, set_bit, ShareBytes};
use crate::arith::masked::{MaskedBitVec, StateWord};
use crate::arith::masking::Masking;
use crate::constants::params::{
    PARAM_AUX_SIZE, PARAM_LOWMC_BLOCK_BITS, PARAM_LOWMC_ROUNDS, PARAM_NB_PARTIES, PARAM_TAPE_SIZE,
    PARAM_VIEW_SIZE,
};
use crate::constants::types::{Salt, Seed};
use crate::subroutines::hashing::HashCtx;
use crate::subroutines::keccak::MaskedShake;

/// Bit offset of the input-mask word of `round`
pub fn mask_offset(round: usize) -> usize {
    2 * PARAM_LOWMC_BLOCK_BITS * round
}

/// Bit offset of the AND-helper word of `round`
pub fn helper_offset(round: usize) -> usize {
    2 * PARAM_LOWMC_BLOCK_BITS * round + PARAM_LOWMC_BLOCK_BITS
}

/// A bit position into a tape or view buffer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitCursor(usize);

impl BitCursor {
    pub fn at(bit: usize) -> Self {
        BitCursor(bit)
    }

    pub fn bit(&self) -> usize {
        self.0
    }

    pub fn advance(&mut self, nbits: usize) {
        self.0 += nbits;
    }

    /// Back to the first tape bit. The correction pass must leave the cursor
    /// here so the online pass replays the exact bits it fixed up.
    pub fn rewind(&mut self) {
        self.0 = 0;
    }
}

/// Per-party random tapes of one repetition, plus their running parity and
/// the correction bits of the last party
pub struct RandomTapes<W: StateWord> {
    tapes: [W::Bytes; PARAM_NB_PARTIES],
    parity: W::Bytes,
    aux: W::Bytes,
    pub pos: BitCursor,
    pub aux_pos: BitCursor,
}

impl<W: StateWord> RandomTapes<W> {
    pub fn new() -> Self {
        Self {
            tapes: std::array::from_fn(|_| W::Bytes::zeroed(PARAM_TAPE_SIZE)),
            parity: W::Bytes::zeroed(PARAM_TAPE_SIZE),
            aux: W::Bytes::zeroed(PARAM_AUX_SIZE),
            pos: BitCursor::default(),
            aux_pos: BitCursor::default(),
        }
    }

    /// Recompute the XOR of all party tapes.
    pub fn compute_parity(&mut self) {
        self.parity.fill_zero();
        for tape in &self.tapes {
            self.parity.xor_assign(tape);
        }
    }

    pub fn tape(&self, party: usize) -> &W::Bytes {
        &self.tapes[party]
    }

    pub fn aux(&self) -> &W::Bytes {
        &self.aux
    }

    pub fn clear_aux(&mut self) {
        self.aux.fill_zero();
    }

    /// Zero one party's tape, as done for the unopened party before the
    /// online pass of verification.
    pub fn zero_tape(&mut self, party: usize) {
        self.tapes[party].fill_zero();
    }

    pub fn party_word(&self, party: usize, at_bit: usize) -> W {
        W::read_bits(&self.tapes[party], at_bit, PARAM_LOWMC_BLOCK_BITS)
    }

    pub fn parity_word(&self, at_bit: usize) -> W {
        W::read_bits(&self.parity, at_bit, PARAM_LOWMC_BLOCK_BITS)
    }

    pub fn last_party_word(&self, at_bit: usize) -> W {
        self.party_word(PARAM_NB_PARTIES - 1, at_bit)
    }

    pub fn write_last_party_word(&mut self, at_bit: usize, word: &W) {
        word.write_bits(
            &mut self.tapes[PARAM_NB_PARTIES - 1],
            at_bit,
            PARAM_LOWMC_BLOCK_BITS,
        );
    }

    pub fn write_aux_word(&mut self, at_bit: usize, word: &W) {
        word.write_bits(&mut self.aux, at_bit, PARAM_LOWMC_BLOCK_BITS);
    }
}

impl<W: StateWord> Default for RandomTapes<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomTapes<BitVec> {
    /// Expand all party tapes from their seeds.
    pub fn derive(&mut self, seeds: &[Seed; PARAM_NB_PARTIES], salt: &Salt, t: u16) {
        for (i, seed) in seeds.iter().enumerate() {
            let mut ctx = HashCtx::new();
            ctx.update(seed);
            ctx.update(salt);
            ctx.update_u16_le(t);
            ctx.update_u16_le(i as u16);
            let tape = self.tapes[i].as_mut_slice();
            ctx.squeeze(tape);
        }
    }

    /// Overwrite the last party's helper words with correction bits taken
    /// from a signature.
    pub fn set_aux_bits(&mut self, aux: &[u8]) {
        let last = self.tapes[PARAM_NB_PARTIES - 1].as_mut_slice();
        let mut in_bit = 0;
        for round in 0..PARAM_LOWMC_ROUNDS {
            for i in 0..PARAM_LOWMC_BLOCK_BITS {
                set_bit(last, helper_offset(round) + i, get_bit(aux, in_bit));
                in_bit += 1;
            }
        }
    }
}

impl RandomTapes<MaskedBitVec> {
    /// Expand all party tapes from their seeds, squeezing each tape as two
    /// shares. The combined tape equals the unmasked derivation.
    pub fn derive_masked(
        &mut self,
        seeds: &[Seed; PARAM_NB_PARTIES],
        salt: &Salt,
        t: u16,
        masking: &mut Masking,
    ) {
        for (i, seed) in seeds.iter().enumerate() {
            let mut sponge = MaskedShake::v128();
            sponge.update_public(seed, masking);
            sponge.update_public(salt, masking);
            sponge.update_u16_le_public(t, masking);
            sponge.update_u16_le_public(i as u16, masking);
            let [share0, share1] = &mut self.tapes[i].shares;
            sponge.squeeze([&mut share0[..], &mut share1[..]], masking);
        }
    }
}

/// Broadcast views of all parties within one repetition
pub struct Views<W: StateWord> {
    views: [W::Bytes; PARAM_NB_PARTIES],
    pub pos: BitCursor,
    /// Party whose broadcast is substituted from the signature instead of
    /// simulated. Always None while signing.
    pub unopened: Option<usize>,
}

impl<W: StateWord> Views<W> {
    pub fn new() -> Self {
        Self {
            views: std::array::from_fn(|_| W::Bytes::zeroed(PARAM_VIEW_SIZE)),
            pos: BitCursor::default(),
            unopened: None,
        }
    }

    pub fn view(&self, party: usize) -> &W::Bytes {
        &self.views[party]
    }

    pub fn read_word(&self, party: usize, at_bit: usize) -> W {
        W::read_bits(&self.views[party], at_bit, PARAM_LOWMC_BLOCK_BITS)
    }

    pub fn write_word(&mut self, party: usize, at_bit: usize, word: &W) {
        word.write_bits(&mut self.views[party], at_bit, PARAM_LOWMC_BLOCK_BITS);
    }
}

impl<W: StateWord> Default for Views<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl Views<BitVec> {
    /// Insert the unopened party's broadcast bits from a signature.
    pub fn set_view(&mut self, party: usize, data: &[u8]) {
        self.views[party].as_mut_slice().copy_from_slice(data);
    }
}
