//! Unspent output set: 𝒪 → 𝒯

use std::collections::HashMap;

use crate::error::{hex_prefix, ConsensusError, Result};
use crate::types::{OutPoint, Transaction, TransactionOutput};

/// Point-in-time set of unspent outputs keyed by outpoint.
///
/// Cloning produces a fully independent snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtxoSet {
    entries: HashMap<OutPoint, TransactionOutput>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an output. An outpoint may exist at most once, so inserting an
    /// existing key fails and leaves the set unchanged.
    pub fn add(&mut self, outpoint: OutPoint, output: TransactionOutput) -> Result<()> {
        if self.entries.contains_key(&outpoint) {
            return Err(ConsensusError::DuplicateOutput(describe(&outpoint)));
        }
        self.entries.insert(outpoint, output);
        Ok(())
    }

    pub fn remove(&mut self, outpoint: &OutPoint) -> Option<TransactionOutput> {
        self.entries.remove(outpoint)
    }

    pub fn get(&self, outpoint: &OutPoint) -> Option<&TransactionOutput> {
        self.entries.get(outpoint)
    }

    pub fn contains(&self, outpoint: &OutPoint) -> bool {
        self.entries.contains_key(outpoint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn outpoints(&self) -> Vec<OutPoint> {
        self.entries.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OutPoint, &TransactionOutput)> {
        self.entries.iter()
    }
}

pub(crate) fn describe(outpoint: &OutPoint) -> String {
    format!("{}:{}", hex_prefix(&outpoint.hash), outpoint.index)
}

/// Outpoints created by `tx`, in output order.
pub(crate) fn created_outpoints(tx: &Transaction) -> Result<Vec<OutPoint>> {
    (0..tx.outputs().len())
        .map(|index| {
            u32::try_from(index).map(|index| tx.outpoint(index)).map_err(|_| {
                ConsensusError::TransactionConstruction(format!(
                    "output index {} does not fit in u32",
                    index
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{public_key, secret_key_from_bytes};

    fn output(value: i64) -> TransactionOutput {
        let sk = secret_key_from_bytes(&[3; 32]).unwrap();
        TransactionOutput { value, owner: public_key(&sk) }
    }

    #[test]
    fn test_add_and_lookup() {
        let mut utxo_set = UtxoSet::new();
        let outpoint = OutPoint::new([1; 32], 0);
        utxo_set.add(outpoint, output(50)).unwrap();

        assert!(utxo_set.contains(&outpoint));
        assert_eq!(utxo_set.get(&outpoint).map(|o| o.value), Some(50));
        assert_eq!(utxo_set.len(), 1);
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut utxo_set = UtxoSet::new();
        let outpoint = OutPoint::new([1; 32], 0);
        utxo_set.add(outpoint, output(50)).unwrap();

        let result = utxo_set.add(outpoint, output(70));
        assert!(matches!(result, Err(ConsensusError::DuplicateOutput(_))));
        assert_eq!(utxo_set.get(&outpoint).map(|o| o.value), Some(50));
    }

    #[test]
    fn test_same_hash_different_index() {
        let mut utxo_set = UtxoSet::new();
        utxo_set.add(OutPoint::new([1; 32], 0), output(1)).unwrap();
        utxo_set.add(OutPoint::new([1; 32], 1), output(2)).unwrap();
        assert_eq!(utxo_set.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut utxo_set = UtxoSet::new();
        let outpoint = OutPoint::new([1; 32], 0);
        utxo_set.add(outpoint, output(50)).unwrap();

        assert!(utxo_set.remove(&outpoint).is_some());
        assert!(utxo_set.remove(&outpoint).is_none());
        assert!(utxo_set.is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut utxo_set = UtxoSet::new();
        let outpoint = OutPoint::new([1; 32], 0);
        utxo_set.add(outpoint, output(50)).unwrap();

        let snapshot = utxo_set.clone();
        utxo_set.remove(&outpoint);

        assert!(snapshot.contains(&outpoint));
        assert!(!utxo_set.contains(&outpoint));
        assert_ne!(snapshot, utxo_set);
    }

    #[test]
    fn test_created_outpoints_follow_output_order() {
        let tx = crate::transaction::TransactionBuilder::new()
            .add_output(1, output(0).owner)
            .add_output(2, output(0).owner)
            .add_output(3, output(0).owner)
            .finalize();
        let created = created_outpoints(&tx).unwrap();
        assert_eq!(created, vec![tx.outpoint(0), tx.outpoint(1), tx.outpoint(2)]);
    }

    #[test]
    fn test_describe_uses_short_hex() {
        assert_eq!(describe(&OutPoint::new([0xab; 32], 3)), "abababab:3");
    }
}
