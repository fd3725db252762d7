// LowMC Parameters
/// (n) Cipher block size in bits
pub const PARAM_LOWMC_BLOCK_BITS: usize = 129;
/// (k) Cipher key size in bits. The instance is full-key-size, so k = n
pub const PARAM_LOWMC_KEY_BITS: usize = 129;
/// (r) Number of cipher rounds
pub const PARAM_LOWMC_ROUNDS: usize = 4;
/// (m) Number of S-boxes per round. 3m = n, the substitution layer covers the full state
pub const PARAM_LOWMC_SBOXES: usize = 43;

// MPCitH Parameters
/// Number of secret parties
pub const PARAM_NB_PARTIES: usize = 16;
/// Number of log2(nb_parties) for the number of parties
pub const PARAM_LOG_NB_PARTIES: usize = 4;
/// Number of repetitions of the protocol
pub const PARAM_NB_EXECUTIONS: usize = 250;
/// Number of repetitions opened in the challenge
pub const PARAM_NB_OPENED: usize = 36;

// Masking Parameters
/// Number of boolean shares each sensitive value is split into
pub const PARAM_MASKING_SHARES: usize = 2;

// Signature Parameters
pub const PARAM_SEED_SIZE: usize = 128 / 8;
pub const PARAM_SALT_SIZE: usize = 256 / 8;
pub const PARAM_DIGEST_SIZE: usize = 256 / 8;

// Derived byte sizes
/// Broadcast bits of one party across all rounds, also the number of AND gates
pub const PARAM_VIEW_BITS: usize = PARAM_LOWMC_BLOCK_BITS * PARAM_LOWMC_ROUNDS;
/// Cipher input (key or plaintext) packed into bytes, the last 7 bits zero padding
pub const PARAM_INPUT_SIZE: usize = (PARAM_LOWMC_BLOCK_BITS + 7) / 8;
/// Cipher output, same packing as the input
pub const PARAM_OUTPUT_SIZE: usize = PARAM_INPUT_SIZE;
/// Broadcast bits of one party across all rounds: n bits per round
pub const PARAM_VIEW_SIZE: usize = (PARAM_VIEW_BITS + 7) / 8;
/// Correction bits for the last party, one per S-box AND gate
pub const PARAM_AUX_SIZE: usize = PARAM_VIEW_SIZE;
/// Random tape of one party: an input-mask word and a helper word per round
pub const PARAM_TAPE_SIZE: usize = 2 * PARAM_VIEW_SIZE;
/// Seed-tree opening for one repetition: the unopened party is one of 16 leaves
pub const PARAM_PARTY_SEED_INFO_SIZE: usize = PARAM_LOG_NB_PARTIES * PARAM_SEED_SIZE;
