//! Core ledger types

use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};

use crate::encoding;
use crate::crypto;

/// Hash type: 256-bit hash
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Natural number type
pub type Natural = u64;

/// Amount in base units. Signed so that malformed negative values can be
/// represented and rejected.
pub type Amount = i64;

/// OutPoint: (producing transaction hash, output index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}

impl OutPoint {
    pub fn new(hash: Hash, index: u32) -> Self {
        Self { hash, index }
    }
}

/// Transaction input: the outpoint it consumes plus the owner's signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub signature: ByteString,
}

/// Transaction output: amount and owning public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: Amount,
    pub owner: PublicKey,
}

/// A finalized transaction.
///
/// The hash is computed once at construction and the contents cannot be
/// changed afterwards; drafts are built with
/// [`TransactionBuilder`](crate::transaction::TransactionBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    coinbase_data: ByteString,
    hash: Hash,
}

impl Transaction {
    pub(crate) fn from_parts(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
        coinbase_data: ByteString,
    ) -> Self {
        let hash = crypto::hash(&encoding::transaction_bytes(&inputs, &outputs, &coinbase_data));
        Self {
            inputs,
            outputs,
            coinbase_data,
            hash,
        }
    }

    /// Coinbase transaction: no inputs, a single output of `reward` to `owner`.
    ///
    /// `coinbase_data` is folded into the hash so that coinbases of different
    /// blocks paying the same key get distinct outpoints.
    pub fn coinbase(reward: Amount, owner: PublicKey, coinbase_data: ByteString) -> Self {
        Self::from_parts(
            Vec::new(),
            vec![TransactionOutput { value: reward, owner }],
            coinbase_data,
        )
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    pub fn input(&self, index: usize) -> Option<&TransactionInput> {
        self.inputs.get(index)
    }

    pub fn output(&self, index: usize) -> Option<&TransactionOutput> {
        self.outputs.get(index)
    }

    pub fn coinbase_data(&self) -> &[u8] {
        &self.coinbase_data
    }

    /// Zero inputs and exactly one output.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.is_empty() && self.outputs.len() == 1
    }

    /// Bytes each input's signature commits to.
    pub fn signing_payload(&self, index: usize) -> Option<ByteString> {
        encoding::signing_payload(&self.inputs, &self.outputs, index)
    }

    /// Outpoint that output `index` of this transaction will occupy.
    pub fn outpoint(&self, index: u32) -> OutPoint {
        OutPoint::new(self.hash, index)
    }
}

/// A finalized block: parent reference, coinbase and ordered body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    prev_block_hash: Option<Hash>,
    coinbase: Transaction,
    transactions: Vec<Transaction>,
    hash: Hash,
}

impl Block {
    pub(crate) fn from_parts(
        prev_block_hash: Option<Hash>,
        coinbase: Transaction,
        transactions: Vec<Transaction>,
    ) -> Self {
        let hash = crypto::hash(&encoding::block_bytes(
            prev_block_hash.as_ref(),
            &coinbase,
            &transactions,
        ));
        Self {
            prev_block_hash,
            coinbase,
            transactions,
            hash,
        }
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    pub fn prev_block_hash(&self) -> Option<Hash> {
        self.prev_block_hash
    }

    pub fn coinbase(&self) -> &Transaction {
        &self.coinbase
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_block_hash.is_none()
    }
}

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}
