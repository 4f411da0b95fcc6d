//! # Fork-Ledger
//!
//! Minimal single-node ledger: transactions are validated against an unspent
//! output set, blocks are linked into a tree of competing branches, and the
//! tip of the tallest branch is exposed as the state to mine on.
//!
//! ## Architecture
//!
//! - [`utxo`]: point-in-time unspent output set
//! - [`transaction`]: transaction drafts, validation and greedy batch selection
//! - [`mempool`]: candidate pool of submitted transactions
//! - [`block`]: block drafts and connection on a parent's UTXO set
//! - [`chain`]: block tree, best-node tracking, cutoff and pruning
//! - [`mining`]: block assembly on the best node
//! - [`sync`]: mutex-guarded handle for use across threads
//!
//! Hashing, signing and byte encodings live in [`crypto`] and [`encoding`].
//!
//! ## Usage
//!
//! ```rust
//! use fork_ledger::*;
//! use fork_ledger::crypto::{public_key, secret_key_from_bytes};
//!
//! let scrooge = secret_key_from_bytes(&[1; 32]).unwrap();
//! let alice = public_key(&secret_key_from_bytes(&[2; 32]).unwrap());
//!
//! let genesis = Block::genesis(public_key(&scrooge), COINBASE_REWARD);
//! let mut chain = ChainManager::new(genesis.clone()).unwrap();
//!
//! let coin = genesis.coinbase().outpoint(0);
//! let tx = TransactionBuilder::new()
//!     .add_input(coin.hash, coin.index)
//!     .add_output(COINBASE_REWARD, alice)
//!     .sign_input(0, &scrooge)
//!     .unwrap()
//!     .finalize();
//! chain.submit_transaction(tx);
//!
//! let block = create_block(&mut chain, alice).unwrap();
//! assert_eq!(block.transactions().len(), 1);
//! assert_eq!(chain.best_height(), 2);
//! ```

pub mod types;
pub mod constants;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod utxo;
pub mod transaction;
pub mod mempool;
pub mod block;
pub mod chain;
pub mod mining;
pub mod sync;
pub mod error;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use config::ChainConfig;
pub use utxo::UtxoSet;
pub use transaction::{is_valid, select_valid, TransactionBuilder};
pub use mempool::CandidatePool;
pub use block::BlockBuilder;
pub use chain::{ChainManager, LedgerNode};
pub use mining::{create_block, create_new_block};
pub use sync::SharedChain;
pub use error::{BlockRejection, ConsensusError, Result};
