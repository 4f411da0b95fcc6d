//! Thread-safe handle to a [`ChainManager`]
//!
//! All submissions and queries go through one mutex. Nothing inside the
//! critical section waits on I/O, and readers only ever receive copies.

use std::sync::Arc;

use parking_lot::Mutex;
use secp256k1::PublicKey;

use crate::chain::ChainManager;
use crate::error::BlockRejection;
use crate::mining;
use crate::types::*;
use crate::utxo::UtxoSet;

#[derive(Debug, Clone)]
pub struct SharedChain {
    inner: Arc<Mutex<ChainManager>>,
}

impl SharedChain {
    pub fn new(chain: ChainManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(chain)),
        }
    }

    pub fn submit_block(&self, block: Block) -> bool {
        self.inner.lock().submit_block(block)
    }

    pub fn add_block(&self, block: Block) -> std::result::Result<Natural, BlockRejection> {
        self.inner.lock().add_block(block)
    }

    pub fn submit_transaction(&self, tx: Transaction) -> bool {
        self.inner.lock().submit_transaction(tx)
    }

    pub fn best_block(&self) -> Block {
        self.inner.lock().best_block().clone()
    }

    pub fn best_height(&self) -> Natural {
        self.inner.lock().best_height()
    }

    pub fn best_utxo_snapshot(&self) -> UtxoSet {
        self.inner.lock().best_utxo_snapshot()
    }

    pub fn candidate_transactions(&self) -> Vec<Transaction> {
        self.inner.lock().candidate_transactions()
    }

    /// Assemble and submit a block without letting another submission run
    /// in between.
    pub fn create_block(&self, miner: PublicKey) -> Option<Block> {
        let mut chain = self.inner.lock();
        mining::create_block(&mut *chain, miner)
    }

    /// Run `f` with exclusive access to the chain.
    pub fn with_chain<R>(&self, f: impl FnOnce(&mut ChainManager) -> R) -> R {
        let mut chain = self.inner.lock();
        f(&mut *chain)
    }
}
