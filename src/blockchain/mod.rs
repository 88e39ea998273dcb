pub mod block;
pub mod hasher;
pub mod model;
pub mod pow;

pub use block::Block;
pub use model::{Ledger, MineOutcome};

/// Default Proof-of-Work difficulty: leading `'0'` hex characters in the
/// proof digest. Six characters is a 24-bit target.
pub const DEFAULT_DIFFICULTY: usize = 6;

/// Fixed subsidy paid to the miner of every sealed block.
pub const BLOCK_REWARD: f64 = 100.0;

/// Sender of reward transactions; marks value created by mining.
pub const REWARD_SENDER: &str = "0";

/// Genesis sentinels, agreed out-of-band rather than derived from work.
/// The previous-hash sentinel can never equal a 64-char hex digest.
pub const GENESIS_PROOF: u64 = 100;
pub const GENESIS_PREVIOUS_HASH: &str = "1";
