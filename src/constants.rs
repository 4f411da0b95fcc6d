//! Ledger constants

/// Maximum number of blocks a branch may lag behind the best branch and
/// still be extended.
pub const CUTOFF_AGE: u64 = 10;

/// Height of the genesis block
pub const GENESIS_HEIGHT: u64 = 1;

/// Base units per coin
pub const UNITS_PER_COIN: i64 = 100_000_000;

/// Fixed coinbase reward: 25 coins
pub const COINBASE_REWARD: i64 = 25 * UNITS_PER_COIN;

/// Compact ECDSA signature length
pub const SIGNATURE_SIZE: usize = 64;
