//! Block tree with fork tracking
//!
//! Every accepted block becomes a [`LedgerNode`] holding its own UTXO set.
//! Nodes live in an arena keyed by block hash; parent and child links are
//! hashes into that arena. The best node is always the tallest one, and a
//! block extending a branch that lags more than `cutoff_age` behind it is
//! rejected.

use std::collections::{HashMap, HashSet};

use log::{info, trace, warn};

use crate::block::{connect_block, genesis_utxo_set};
use crate::config::ChainConfig;
use crate::constants::GENESIS_HEIGHT;
use crate::error::{hex_prefix, BlockRejection, ConsensusError, Result};
use crate::mempool::CandidatePool;
use crate::types::*;
use crate::utxo::UtxoSet;

/// An accepted block and the UTXO set after applying it.
#[derive(Debug, Clone)]
pub struct LedgerNode {
    block: Block,
    height: Natural,
    parent: Option<Hash>,
    children: Vec<Hash>,
    utxo_set: UtxoSet,
}

impl LedgerNode {
    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn hash(&self) -> Hash {
        self.block.hash()
    }

    pub fn height(&self) -> Natural {
        self.height
    }

    /// `None` for genesis.
    pub fn parent(&self) -> Option<Hash> {
        self.parent
    }

    pub fn children(&self) -> &[Hash] {
        &self.children
    }

    pub fn utxo_set(&self) -> &UtxoSet {
        &self.utxo_set
    }
}

/// Owner of the block tree, the candidate pool and the best-node pointer.
#[derive(Debug, Clone)]
pub struct ChainManager {
    nodes: HashMap<Hash, LedgerNode>,
    best: Hash,
    pool: CandidatePool,
    config: ChainConfig,
}

impl ChainManager {
    /// Start a chain from `genesis` with the default configuration.
    pub fn new(genesis: Block) -> Result<Self> {
        Self::with_config(genesis, ChainConfig::default())
    }

    pub fn with_config(genesis: Block, config: ChainConfig) -> Result<Self> {
        config.validate()?;
        if !genesis.is_genesis() {
            return Err(ConsensusError::InvalidGenesis(
                "genesis block must not reference a parent".to_string(),
            ));
        }
        if !genesis.transactions().is_empty() {
            return Err(ConsensusError::InvalidGenesis(
                "genesis block must only contain a coinbase".to_string(),
            ));
        }

        let utxo_set = genesis_utxo_set(&genesis)?;
        let hash = genesis.hash();
        let node = LedgerNode {
            block: genesis,
            height: GENESIS_HEIGHT,
            parent: None,
            children: Vec::new(),
            utxo_set,
        };

        let mut nodes = HashMap::new();
        nodes.insert(hash, node);
        info!("chain initialised at genesis {}", hex_prefix(&hash));

        Ok(Self {
            nodes,
            best: hash,
            pool: CandidatePool::new(),
            config,
        })
    }

    /// Add `block` to the tree if it is valid; returns whether it was added.
    pub fn submit_block(&mut self, block: Block) -> bool {
        self.add_block(block).is_ok()
    }

    /// Add `block` to the tree, returning its height or why it was rejected.
    ///
    /// 1. Reject a block with no parent reference (genesis only comes in
    ///    through the constructor) and a block already in the tree
    /// 2. The coinbase must have no inputs and a single output paying exactly
    ///    the configured reward
    /// 3. Find the parent node; unknown parents are dropped, not buffered
    /// 4. Connect the block on the parent's UTXO set; every declared
    ///    transaction must be valid
    /// 5. Reject if `height <= best_height - cutoff_age`
    /// 6. Link the new node; it becomes best only if strictly taller, and
    ///    only then are its transactions dropped from the candidate pool
    ///
    /// Nothing changes on rejection.
    pub fn add_block(&mut self, block: Block) -> std::result::Result<Natural, BlockRejection> {
        let hash = block.hash();
        match self.link_block(block) {
            Ok(height) => {
                info!("accepted block {} at height {}", hex_prefix(&hash), height);
                Ok(height)
            }
            Err(rejection) => {
                warn!("rejected block {}: {}", hex_prefix(&hash), rejection);
                Err(rejection)
            }
        }
    }

    fn link_block(&mut self, block: Block) -> std::result::Result<Natural, BlockRejection> {
        // 1. Parent reference and duplicates
        let prev_hash = block.prev_block_hash().ok_or(BlockRejection::MissingParent)?;
        let hash = block.hash();
        if self.nodes.contains_key(&hash) {
            return Err(BlockRejection::DuplicateBlock(hash));
        }

        // 2. Coinbase
        self.check_coinbase(block.coinbase())?;

        // 3. Parent lookup
        let parent = self
            .nodes
            .get(&prev_hash)
            .ok_or(BlockRejection::UnknownParent(prev_hash))?;

        // 4. Transactions against the parent's state
        let utxo_set = connect_block(&block, &parent.utxo_set)?;

        // 5. Cutoff
        let height = parent.height + 1;
        let best_height = self.best_height();
        if height.saturating_add(self.config.cutoff_age) <= best_height {
            return Err(BlockRejection::BelowCutoff { height, best_height });
        }

        // 6. Link
        let tx_hashes: Vec<Hash> = block.transactions().iter().map(|tx| tx.hash()).collect();
        if let Some(parent) = self.nodes.get_mut(&prev_hash) {
            parent.children.push(hash);
        }
        self.nodes.insert(
            hash,
            LedgerNode {
                block,
                height,
                parent: Some(prev_hash),
                children: Vec::new(),
                utxo_set,
            },
        );

        if height > best_height {
            info!("new best block {} at height {}", hex_prefix(&hash), height);
            self.best = hash;
            for tx_hash in &tx_hashes {
                self.pool.remove_by_hash(tx_hash);
            }
            if self.config.prune_stale {
                self.prune();
            }
        }

        Ok(height)
    }

    fn check_coinbase(&self, coinbase: &Transaction) -> std::result::Result<(), BlockRejection> {
        let value = match coinbase.outputs() {
            [output] if coinbase.is_coinbase() => output.value,
            outputs => {
                return Err(BlockRejection::InvalidCoinbase(format!(
                    "{} inputs and {} outputs",
                    coinbase.inputs().len(),
                    outputs.len()
                )))
            }
        };
        if value != self.config.coinbase_reward {
            return Err(BlockRejection::InvalidCoinbase(format!(
                "pays {}, reward is {}",
                value, self.config.coinbase_reward
            )));
        }
        Ok(())
    }

    /// Drop stale branches: whole subtrees in which no node is at or above
    /// `best_height - cutoff_age`. Such nodes can never be extended again,
    /// since a child of a node at height `h` is rejected once
    /// `h + 1 <= best_height - cutoff_age`. Ancestors of retained nodes,
    /// including the best chain back to genesis, are kept.
    fn prune(&mut self) {
        let floor = self.best_height().saturating_sub(self.config.cutoff_age);

        let mut keep = HashSet::new();
        for node in self.nodes.values().filter(|node| node.height >= floor) {
            let mut cursor = Some(node.hash());
            while let Some(hash) = cursor {
                if !keep.insert(hash) {
                    break;
                }
                cursor = self.nodes.get(&hash).and_then(|node| node.parent);
            }
        }

        let before = self.nodes.len();
        self.nodes.retain(|hash, _| keep.contains(hash));
        let pruned = before - self.nodes.len();
        if pruned == 0 {
            return;
        }
        for node in self.nodes.values_mut() {
            node.children.retain(|child| keep.contains(child));
        }
        trace!("pruned {} stale nodes below height {}", pruned, floor);
    }

    /// Queue a transaction for a future block. No validation happens here.
    pub fn submit_transaction(&mut self, tx: Transaction) -> bool {
        self.pool.add(tx)
    }

    pub fn best_node(&self) -> &LedgerNode {
        &self.nodes[&self.best]
    }

    pub fn best_block(&self) -> &Block {
        &self.best_node().block
    }

    pub fn best_height(&self) -> Natural {
        self.best_node().height
    }

    /// Independent copy of the UTXO set at the best node.
    pub fn best_utxo_snapshot(&self) -> UtxoSet {
        self.best_node().utxo_set.clone()
    }

    pub fn candidate_pool(&self) -> &CandidatePool {
        &self.pool
    }

    /// Pooled transactions in submission order.
    pub fn candidate_transactions(&self) -> Vec<Transaction> {
        self.pool.as_list()
    }

    pub fn node(&self, hash: &Hash) -> Option<&LedgerNode> {
        self.nodes.get(hash)
    }

    pub fn block(&self, hash: &Hash) -> Option<&Block> {
        self.nodes.get(hash).map(|node| &node.block)
    }

    pub fn contains_block(&self, hash: &Hash) -> bool {
        self.nodes.contains_key(hash)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Hashes of nodes without children, tallest first.
    pub fn tips(&self) -> Vec<Hash> {
        let mut tips: Vec<&LedgerNode> = self
            .nodes
            .values()
            .filter(|node| node.children.is_empty())
            .collect();
        tips.sort_by(|a, b| b.height.cmp(&a.height).then(a.hash().cmp(&b.hash())));
        tips.into_iter().map(|node| node.hash()).collect()
    }

    /// Hashes from `hash` back to genesis. Empty if `hash` is not in the tree.
    pub fn ancestors(&self, hash: &Hash) -> Vec<Hash> {
        let mut path = Vec::new();
        let mut cursor = self.nodes.get(hash);
        while let Some(node) = cursor {
            path.push(node.hash());
            cursor = node.parent.and_then(|parent| self.nodes.get(&parent));
        }
        path
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }
}
