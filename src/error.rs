//! Error types for ledger validation

use thiserror::Error;

use crate::types::{Hash, Natural};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("UTXO not found: {0}")]
    UtxoNotFound(String),

    #[error("Duplicate output: {0}")]
    DuplicateOutput(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Transaction construction failed: {0}")]
    TransactionConstruction(String),

    #[error("Invalid genesis block: {0}")]
    InvalidGenesis(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Why a submitted block was not added to the tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockRejection {
    #[error("block has no parent reference")]
    MissingParent,

    #[error("parent {} is not known", hex_prefix(.0))]
    UnknownParent(Hash),

    #[error("block {} is already in the tree", hex_prefix(.0))]
    DuplicateBlock(Hash),

    #[error("invalid coinbase: {0}")]
    InvalidCoinbase(String),

    #[error("{accepted} of {declared} transactions are valid")]
    InvalidTransactions { declared: usize, accepted: usize },

    #[error("height {height} is too far behind best height {best_height}")]
    BelowCutoff { height: Natural, best_height: Natural },

    #[error("coinbase output already exists: {0}")]
    DuplicateOutput(String),
}

pub(crate) fn hex_prefix(hash: &Hash) -> String {
    hex::encode(&hash[..4])
}

impl From<serde_json::Error> for ConsensusError {
    fn from(err: serde_json::Error) -> Self {
        ConsensusError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConsensusError>;
