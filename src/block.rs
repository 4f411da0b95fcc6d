//! Block construction and connection on top of a parent's UTXO set

use log::debug;
use secp256k1::PublicKey;

use crate::error::{BlockRejection, ConsensusError, Result};
use crate::transaction::select_valid;
use crate::types::*;
use crate::utxo::{created_outpoints, describe, UtxoSet};

/// Draft block on top of `prev_block_hash`, paying `reward` to the miner.
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    prev_block_hash: Option<Hash>,
    coinbase: Transaction,
    transactions: Vec<Transaction>,
}

impl BlockBuilder {
    pub fn new(prev_block_hash: Option<Hash>, miner: PublicKey, reward: Amount) -> Self {
        let coinbase_data = prev_block_hash.map(|h| h.to_vec()).unwrap_or_default();
        Self {
            prev_block_hash,
            coinbase: Transaction::coinbase(reward, miner, coinbase_data),
            transactions: Vec::new(),
        }
    }

    pub fn add_transaction(mut self, tx: Transaction) -> Self {
        self.transactions.push(tx);
        self
    }

    pub fn add_transactions<I: IntoIterator<Item = Transaction>>(mut self, txs: I) -> Self {
        self.transactions.extend(txs);
        self
    }

    pub fn finalize(self) -> Block {
        Block::from_parts(self.prev_block_hash, self.coinbase, self.transactions)
    }
}

impl Block {
    /// Genesis block: no parent, no body, a single coinbase.
    pub fn genesis(miner: PublicKey, reward: Amount) -> Self {
        BlockBuilder::new(None, miner, reward).finalize()
    }
}

/// Insert the coinbase outputs of `block` into `utxo_set`. Fails without
/// modifying the set if any of them already exists.
pub fn apply_coinbase(block: &Block, utxo_set: &mut UtxoSet) -> Result<()> {
    let coinbase = block.coinbase();
    let created = created_outpoints(coinbase)?;
    for outpoint in &created {
        if utxo_set.contains(outpoint) {
            return Err(ConsensusError::DuplicateOutput(describe(outpoint)));
        }
    }
    for (outpoint, output) in created.into_iter().zip(coinbase.outputs()) {
        utxo_set.add(outpoint, output.clone())?;
    }
    Ok(())
}

/// ConnectBlock: ℬ × 𝒰𝒮 → 𝒰𝒮
///
/// For block b with parent UTXO set us:
/// 1. (accepted, us') = SelectValid(b.transactions, us)
/// 2. If |accepted| < |b.transactions|: reject, blocks are atomic
/// 3. Insert the coinbase outputs into us'
/// 4. Return us'
///
/// `utxo_set` is not modified.
pub fn connect_block(
    block: &Block,
    utxo_set: &UtxoSet,
) -> std::result::Result<UtxoSet, BlockRejection> {
    let declared = block.transactions().len();
    let (accepted, mut resulting) = select_valid(block.transactions(), utxo_set);
    if accepted.len() != declared {
        debug!("{} of {} transactions valid", accepted.len(), declared);
        return Err(BlockRejection::InvalidTransactions {
            declared,
            accepted: accepted.len(),
        });
    }

    apply_coinbase(block, &mut resulting)
        .map_err(|e| BlockRejection::DuplicateOutput(e.to_string()))?;

    Ok(resulting)
}

/// UTXO set of a chain consisting of just `genesis`.
pub fn genesis_utxo_set(genesis: &Block) -> Result<UtxoSet> {
    let mut utxo_set = UtxoSet::new();
    apply_coinbase(genesis, &mut utxo_set)?;
    Ok(utxo_set)
}
