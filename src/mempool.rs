//! Candidate pool of submitted transactions awaiting inclusion in a block

use std::collections::HashSet;

use crate::types::{Hash, Transaction};

/// Unvalidated holding area. Keeps insertion order; a transaction whose hash
/// is already present is ignored.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    transactions: Vec<Transaction>,
    hashes: HashSet<Hash>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if a transaction with the same hash was already pooled.
    pub fn add(&mut self, tx: Transaction) -> bool {
        if !self.hashes.insert(tx.hash()) {
            return false;
        }
        self.transactions.push(tx);
        true
    }

    pub fn remove_by_hash(&mut self, hash: &Hash) -> Option<Transaction> {
        if !self.hashes.remove(hash) {
            return None;
        }
        let position = self.transactions.iter().position(|tx| tx.hash() == *hash)?;
        Some(self.transactions.remove(position))
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.hashes.contains(hash)
    }

    pub fn get(&self, hash: &Hash) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.hash() == *hash)
    }

    /// Snapshot of the pooled transactions in insertion order.
    pub fn as_list(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
