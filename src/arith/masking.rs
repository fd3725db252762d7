// Masking configuration and the randomness context consumed by shared
// computation.

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

/// Gadget used for AND between two shared values
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AndGadget {
    /// Draws one fresh random word per AND and rerandomizes both output
    /// shares with it. Composable under SNI.
    #[default]
    Randomized,
    /// No fresh randomness: each output share combines one input share with
    /// both shares of the other operand. Correct, first-order protected in
    /// isolation, but without a composition proof.
    Heuristic,
}

/// How much of the sponge permutation runs on shares during masked hashing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeccakMasking {
    /// Shares are collapsed before the permutation runs; only absorption is
    /// share-wise.
    None,
    /// The first half of the permutation rounds runs on shares, then the
    /// state collapses and the remaining rounds run unmasked. The sponge
    /// state is pseudorandom by that point, which is what makes the early
    /// collapse tolerable.
    #[default]
    FirstHalf,
    /// Every permutation round runs on shares.
    Full,
}

/// Signer-side masking behavior. The verification path never consults this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskingConfig {
    /// Gadget for the cipher and correction-bit ANDs
    pub and_gadget: AndGadget,
    /// Gadget for the chi step of masked permutation rounds
    pub keccak_gadget: AndGadget,
    /// Extent of masking inside the sponge permutation
    pub keccak_masking: KeccakMasking,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            and_gadget: AndGadget::Randomized,
            keccak_gadget: AndGadget::Heuristic,
            keccak_masking: KeccakMasking::FirstHalf,
        }
    }
}

/// Configuration plus the randomness source feeding mask refreshes and
/// gadget randomness. None of the bytes drawn here reach the signature;
/// masks cancel at every declassification.
pub struct Masking {
    config: MaskingConfig,
    rng: Box<dyn RngCore + Send>,
}

impl Masking {
    /// Operating-system randomness, the default for production signing.
    pub fn new(config: MaskingConfig) -> Self {
        Self {
            config,
            rng: Box::new(OsRng),
        }
    }

    /// Deterministic masking randomness. Signature bytes do not depend on
    /// the seed; this exists so tests can exercise reproducible share
    /// splittings.
    pub fn from_seed(config: MaskingConfig, seed: [u8; 32]) -> Self {
        Self {
            config,
            rng: Box::new(StdRng::from_seed(seed)),
        }
    }

    pub fn config(&self) -> MaskingConfig {
        self.config
    }

    pub(crate) fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    pub(crate) fn random_word(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

#[cfg(test)]
mod masking_tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MaskingConfig::default();
        assert_eq!(config.and_gadget, AndGadget::Randomized);
        assert_eq!(config.keccak_gadget, AndGadget::Heuristic);
        assert_eq!(config.keccak_masking, KeccakMasking::FirstHalf);
    }

    #[test]
    fn test_seeded_masking_reproducible() {
        let mut a = Masking::from_seed(MaskingConfig::default(), [7u8; 32]);
        let mut b = Masking::from_seed(MaskingConfig::default(), [7u8; 32]);
        for _ in 0..16 {
            assert_eq!(a.random_word(), b.random_word());
        }
    }
}
