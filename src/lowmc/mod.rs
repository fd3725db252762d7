//! # LowMC
//!
//! The cipher and its three protocol-facing passes, written once against
//! [`StateWord`] so the signing path runs them on two-share values and the
//! verification path on plain ones:
//!
//! - [`LowmcInstance::evaluate`]: the plain cipher, used by key generation.
//! - [`LowmcInstance::compute_aux`]: the preprocessing pass. Walks the
//!   rounds backwards through the inverse linear layers and overwrites the
//!   last party's AND-helper words so every helper parity matches what the
//!   online pass needs.
//! - [`LowmcInstance::simulate_online`]: the online pass. Substitutes each
//!   S-box layer on the masked state using tape words and broadcast views,
//!   then checks the declassified output against the public ciphertext.
//!
//! The substitution layer is bitsliced over lane masks: each S-box owns
//! three adjacent state bits, and the three lanes are aligned onto the
//! third-bit positions before any AND.

pub mod instance;

pub use instance::{LowmcInstance, LowmcRound, ParameterSet};

use crate::arith::bitvec::BitVec;
use crate::arith::masked::StateWord;
use crate::constants::params::{PARAM_LOWMC_BLOCK_BITS, PARAM_OUTPUT_SIZE};
use crate::errors::Error;
use crate::subroutines::tapes::{helper_offset, mask_offset, BitCursor, RandomTapes, Views};

use subtle::ConstantTimeEq;

/// First bit of every S-box triple
pub(crate) const MASK_A: BitVec = BitVec {
    w: [
        0x8000000000000000,
        0x4924924924924924,
        0x2492492492492492,
    ],
};
/// Second bit of every S-box triple
pub(crate) const MASK_B: BitVec = BitVec {
    w: [0, 0x9249249249249249, 0x4924924924924924],
};
/// Third bit of every S-box triple
pub(crate) const MASK_C: BitVec = BitVec {
    w: [0, 0x2492492492492492, 0x9249249249249249],
};

/// The substitution layer: z_a = a + bc, z_b = a + b + ca, z_c = a + b + c + ab
fn sbox<W: StateWord>(state: &W, ctx: &mut W::Ctx) -> W {
    let a = state.and_mask(&MASK_A).shl(2);
    let b = state.and_mask(&MASK_B).shl(1);
    let c = state.and_mask(&MASK_C);

    let ab = a.and(&b, ctx);
    let bc = b.and(&c, ctx);
    let ca = c.and(&a, ctx);

    let t0 = bc.xor(&a).shr(2);
    let t1 = ca.xor(&a).xor(&b).shr(1);
    let t2 = ab.xor(&a).xor(&b).xor(&c);
    t0.xor(&t1).xor(&t2)
}

impl LowmcInstance {
    /// Encrypt one block.
    pub fn evaluate(&self, key: &BitVec, plaintext: &BitVec) -> BitVec {
        let mut state = self.k0.mul(key).xor(plaintext);
        for round in &self.rounds {
            state = sbox::<BitVec>(&state, &mut ());
            state = round.l.mul(&state).xor(&round.constant);
            round.k.addmul(&mut state, key);
        }
        state
    }

    /// The preprocessing pass over freshly derived tapes. Fixes up the last
    /// party's helper words, fills the correction-bit buffer, and returns
    /// the key mask hidden in the round-0 input-mask parity. Leaves the tape
    /// cursor rewound for the online pass.
    pub fn compute_aux<W: StateWord>(&self, tapes: &mut RandomTapes<W>, ctx: &mut W::Ctx) -> W {
        tapes.compute_parity();
        tapes.clear_aux();

        // the round-0 input-mask parity masks the cipher input; undo the
        // whitening matrix to get the mask of the key itself
        let key0 = tapes.parity_word(mask_offset(0));
        let lowmc_key = key0.matrix_mul(&self.ki0);

        let mut x = W::default();
        for r in (0..self.rounds.len()).rev() {
            let round = &self.rounds[r];
            x.matrix_addmul(&lowmc_key, &round.k);
            let y = x.matrix_mul(&round.li);
            x = if r == 0 {
                key0
            } else {
                tapes.parity_word(mask_offset(r))
            };
            tapes.pos = BitCursor::at(helper_offset(r));
            tapes.aux_pos = BitCursor::at(r * PARAM_LOWMC_BLOCK_BITS);
            sbox_aux(&x, &y, tapes, ctx);
        }

        tapes.pos.rewind();
        lowmc_key
    }

    /// The online pass. Consumes tape words from the rewound cursor, writes
    /// each party's broadcast into `msgs`, and compares the declassified
    /// output against the expected ciphertext in constant time.
    pub fn simulate_online<W: StateWord>(
        &self,
        masked_key: &W,
        tapes: &mut RandomTapes<W>,
        msgs: &mut Views<W>,
        plaintext: &BitVec,
        expected: &[u8; PARAM_OUTPUT_SIZE],
        ctx: &mut W::Ctx,
    ) -> Result<(), Error> {
        let mut key = *masked_key;
        key.refresh(ctx);

        let mut state = key.matrix_mul(&self.k0).xor_mask(plaintext);
        for round in &self.rounds {
            state = mpc_sbox(&state, tapes, msgs, ctx);
            state = state.matrix_mul(&round.l).xor_mask(&round.constant);
            state.matrix_addmul(&key, &round.k);
            state.refresh(ctx);
        }

        let mut output = [0u8; PARAM_OUTPUT_SIZE];
        state.declassify().to_bytes(&mut output);
        if bool::from(output.ct_eq(expected)) {
            Ok(())
        } else {
            Err(Error::VerificationFailed)
        }
    }
}

/// Compute the correction word for one round. `statein` carries the parity
/// of the round's input-mask words, `stateout` the required output mask,
/// both read off the cursors set by the caller.
fn sbox_aux<W: StateWord>(statein: &W, stateout: &W, tapes: &mut RandomTapes<W>, ctx: &mut W::Ctx) {
    let a = statein.and_mask(&MASK_A).shl(2);
    let b = statein.and_mask(&MASK_B).shl(1);
    let c = statein.and_mask(&MASK_C);

    let d = stateout.and_mask(&MASK_A).shl(2);
    let e = stateout.and_mask(&MASK_B).shl(1);
    let f = stateout.and_mask(&MASK_C);

    // required AND-output masks per gate
    let fresh_ab = f.xor(&a).xor(&b).xor(&c);
    let fresh_bc = d.xor(&a);
    let fresh_ca = e.xor(&a).xor(&b);

    // aggregate at the tape lanes: ab helpers on the c lane, bc on b, ca on a
    let mut aux = fresh_ca.shr(2).xor(&fresh_bc.shr(1)).xor(&fresh_ab);
    aux = aux.xor(&c.and(&a, ctx).shr(2));
    aux = aux.xor(&b.and(&c, ctx).shr(1));
    aux = aux.xor(&a.and(&b, ctx));

    // flip the last party's helper word so the helper parity becomes aux
    let at = tapes.pos.bit();
    let parity = tapes.parity_word(at);
    let last = tapes.last_party_word(at);
    let correction = aux.xor(&parity).xor(&last);
    tapes.write_last_party_word(at, &correction);
    tapes.write_aux_word(tapes.aux_pos.bit(), &correction);
}

/// One substitution layer of the online pass: every party's broadcast word
/// is derived from its tape words and the masked state, except the unopened
/// party whose word is read back from the views.
fn mpc_sbox<W: StateWord>(
    state: &W,
    tapes: &mut RandomTapes<W>,
    msgs: &mut Views<W>,
    ctx: &mut W::Ctx,
) -> W {
    let a = state.and_mask(&MASK_A).shl(2);
    let b = state.and_mask(&MASK_B).shl(1);
    let c = state.and_mask(&MASK_C);

    let mut s_ab = a.and(&b, ctx);
    let mut s_bc = b.and(&c, ctx);
    let mut s_ca = c.and(&a, ctx);

    let pos = tapes.pos.bit();
    let msgs_pos = msgs.pos.bit();
    for i in 0..crate::constants::params::PARAM_NB_PARTIES {
        if msgs.unopened == Some(i) {
            // substitute the supplied broadcast for the unopened party
            let tmp = msgs.read_word(i, msgs_pos);
            s_ab = s_ab.xor(&tmp.and_mask(&MASK_C));
            s_bc = s_bc.xor(&tmp.and_mask(&MASK_B).shl(1));
            s_ca = s_ca.xor(&tmp.and_mask(&MASK_A).shl(2));
            continue;
        }

        let masks = tapes.party_word(i, pos);
        let mask_a = masks.and_mask(&MASK_A).shl(2);
        let mask_b = masks.and_mask(&MASK_B).shl(1);
        let mask_c = masks.and_mask(&MASK_C);

        let helpers = tapes.party_word(i, pos + PARAM_LOWMC_BLOCK_BITS);
        let helper_ab = helpers.and_mask(&MASK_C);
        let helper_bc = helpers.and_mask(&MASK_B).shl(1);
        let helper_ca = helpers.and_mask(&MASK_A).shl(2);

        let mut broadcast = a.and(&mask_b, ctx).xor(&b.and(&mask_a, ctx)).xor(&helper_ab);
        s_ab = s_ab.xor(&broadcast);

        let t = b.and(&mask_c, ctx).xor(&c.and(&mask_b, ctx)).xor(&helper_bc);
        s_bc = s_bc.xor(&t);
        broadcast = broadcast.xor(&t.shr(1));

        let t = c.and(&mask_a, ctx).xor(&a.and(&mask_c, ctx)).xor(&helper_ca);
        s_ca = s_ca.xor(&t);
        broadcast = broadcast.xor(&t.shr(2));

        msgs.write_word(i, msgs_pos, &broadcast);
    }
    tapes.pos.advance(2 * PARAM_LOWMC_BLOCK_BITS);
    msgs.pos.advance(PARAM_LOWMC_BLOCK_BITS);

    let t0 = s_bc.xor(&a).shr(2);
    let t1 = s_ca.xor(&a).xor(&b).shr(1);
    let t2 = s_ab.xor(&a).xor(&b).xor(&c);
    t0.xor(&t1).xor(&t2)
}
