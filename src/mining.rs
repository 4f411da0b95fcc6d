//! Block assembly on top of the best node

use log::debug;
use secp256k1::PublicKey;

use crate::block::BlockBuilder;
use crate::chain::ChainManager;
use crate::transaction::select_valid;
use crate::types::*;

/// CreateNewBlock: 𝒰𝒮 × 𝒯𝒳* → ℬ
///
/// 1. Take the best block and a snapshot of its UTXO set
/// 2. Filter the candidate pool with SelectValid, in submission order
/// 3. Build a block on the best block paying the configured reward to `miner`
///
/// The chain is not modified.
pub fn create_new_block(chain: &ChainManager, miner: PublicKey) -> Block {
    let parent = chain.best_block().hash();
    let utxo_set = chain.best_utxo_snapshot();
    let candidates = chain.candidate_transactions();

    let (selected, _) = select_valid(&candidates, &utxo_set);
    debug!(
        "assembled {} of {} candidates on height {}",
        selected.len(),
        candidates.len(),
        chain.best_height()
    );

    BlockBuilder::new(Some(parent), miner, chain.config().coinbase_reward)
        .add_transactions(selected)
        .finalize()
}

/// Assemble a block with [`create_new_block`] and submit it. Returns the block
/// if the chain accepted it.
pub fn create_block(chain: &mut ChainManager, miner: PublicKey) -> Option<Block> {
    let block = create_new_block(chain, miner);
    if chain.submit_block(block.clone()) {
        Some(block)
    } else {
        None
    }
}
