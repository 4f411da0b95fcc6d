//! Transaction construction and validation against an unspent output set

use std::collections::HashSet;

use log::debug;
use secp256k1::{PublicKey, SecretKey};

use crate::crypto;
use crate::encoding;
use crate::error::{ConsensusError, Result};
use crate::types::*;
use crate::utxo::{created_outpoints, describe, UtxoSet};

/// Draft transaction. Inputs, outputs and signatures can be changed freely
/// until [`finalize`](Self::finalize) computes the hash and freezes it.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spend output `index` of transaction `prev_hash`.
    pub fn add_input(mut self, prev_hash: Hash, index: u32) -> Self {
        self.inputs.push(TransactionInput {
            prevout: OutPoint::new(prev_hash, index),
            signature: Vec::new(),
        });
        self
    }

    pub fn add_output(mut self, value: Amount, owner: PublicKey) -> Self {
        self.outputs.push(TransactionOutput { value, owner });
        self
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    /// Bytes input `index` must sign.
    pub fn signing_payload(&self, index: usize) -> Option<ByteString> {
        encoding::signing_payload(&self.inputs, &self.outputs, index)
    }

    /// Attach an externally produced signature to input `index`.
    pub fn add_signature(mut self, index: usize, signature: ByteString) -> Result<Self> {
        let input = self.inputs.get_mut(index).ok_or_else(|| {
            ConsensusError::TransactionConstruction(format!("No input at index {}", index))
        })?;
        input.signature = signature;
        Ok(self)
    }

    /// Sign input `index` with `secret_key`.
    pub fn sign_input(self, index: usize, secret_key: &SecretKey) -> Result<Self> {
        let payload = self.signing_payload(index).ok_or_else(|| {
            ConsensusError::TransactionConstruction(format!("No input at index {}", index))
        })?;
        let signature = crypto::sign(secret_key, &payload);
        self.add_signature(index, signature)
    }

    /// Sign every input with the same key.
    pub fn sign_all(mut self, secret_key: &SecretKey) -> Result<Self> {
        for index in 0..self.inputs.len() {
            self = self.sign_input(index, secret_key)?;
        }
        Ok(self)
    }

    pub fn finalize(self) -> Transaction {
        Transaction::from_parts(self.inputs, self.outputs, Vec::new())
    }
}

/// CheckTransaction: 𝒯𝒳 × 𝒰𝒮 → {valid, invalid}
///
/// Checks, in order, stopping at the first failure:
/// 1. every input's outpoint is in `utxo_set`
/// 2. no outpoint is consumed twice within `tx`
/// 3. every input's signature verifies against the owner of its outpoint
/// 4. every output value is non-negative
/// 5. Σ input values ≥ Σ output values
pub fn check_transaction(tx: &Transaction, utxo_set: &UtxoSet) -> ValidationResult {
    // 1. Inputs exist
    for (i, input) in tx.inputs().iter().enumerate() {
        if !utxo_set.contains(&input.prevout) {
            return ValidationResult::Invalid(format!(
                "Input {} references unknown output {}",
                i,
                describe(&input.prevout)
            ));
        }
    }

    // 2. No duplicate inputs
    let mut seen = HashSet::with_capacity(tx.inputs().len());
    for (i, input) in tx.inputs().iter().enumerate() {
        if !seen.insert(input.prevout) {
            return ValidationResult::Invalid(format!(
                "Input {} spends {} more than once",
                i,
                describe(&input.prevout)
            ));
        }
    }

    // 3. Signatures
    let mut total_in: Amount = 0;
    for (i, input) in tx.inputs().iter().enumerate() {
        let Some(spent) = utxo_set.get(&input.prevout) else {
            return ValidationResult::Invalid(format!("Input {} disappeared", i));
        };
        let Some(payload) = tx.signing_payload(i) else {
            return ValidationResult::Invalid(format!("No signing payload for input {}", i));
        };
        if !crypto::verify(&spent.owner, &payload, &input.signature) {
            return ValidationResult::Invalid(format!("Invalid signature at input {}", i));
        }
        total_in = match total_in.checked_add(spent.value) {
            Some(sum) => sum,
            None => return ValidationResult::Invalid("Input value overflow".to_string()),
        };
    }

    // 4. Output values
    for (i, output) in tx.outputs().iter().enumerate() {
        if output.value < 0 {
            return ValidationResult::Invalid(format!(
                "Negative output value {} at index {}",
                output.value, i
            ));
        }
    }

    // 5. Conservation
    let mut total_out: Amount = 0;
    for output in tx.outputs() {
        total_out = match total_out.checked_add(output.value) {
            Some(sum) => sum,
            None => return ValidationResult::Invalid("Output value overflow".to_string()),
        };
    }
    if total_in < total_out {
        return ValidationResult::Invalid(format!(
            "Outputs {} exceed inputs {}",
            total_out, total_in
        ));
    }

    ValidationResult::Valid
}

/// Boolean form of [`check_transaction`].
pub fn is_valid(tx: &Transaction, utxo_set: &UtxoSet) -> bool {
    check_transaction(tx, utxo_set).is_valid()
}

/// Surplus of inputs over outputs. Only meaningful for a valid transaction;
/// the surplus is forfeited, nobody collects it.
pub fn calculate_fee(tx: &Transaction, utxo_set: &UtxoSet) -> Option<Amount> {
    let total_in = tx.inputs().iter().try_fold(0 as Amount, |acc, input| {
        utxo_set
            .get(&input.prevout)
            .and_then(|spent| acc.checked_add(spent.value))
    })?;
    let total_out = tx
        .outputs()
        .iter()
        .try_fold(0 as Amount, |acc, output| acc.checked_add(output.value))?;
    total_in.checked_sub(total_out)
}

/// ApplyTransaction: 𝒯𝒳 × 𝒰𝒮 → 𝒰𝒮
///
/// Removes the consumed outpoints and inserts the produced ones. All
/// preconditions are checked before anything is touched, so on error
/// `utxo_set` is unchanged.
pub fn apply_transaction(tx: &Transaction, utxo_set: &mut UtxoSet) -> Result<()> {
    for input in tx.inputs() {
        if !utxo_set.contains(&input.prevout) {
            return Err(ConsensusError::UtxoNotFound(describe(&input.prevout)));
        }
    }
    let created = created_outpoints(tx)?;
    for outpoint in &created {
        if utxo_set.contains(outpoint) {
            return Err(ConsensusError::DuplicateOutput(describe(outpoint)));
        }
    }

    for input in tx.inputs() {
        utxo_set.remove(&input.prevout);
    }
    for (outpoint, output) in created.into_iter().zip(tx.outputs()) {
        utxo_set.add(outpoint, output.clone())?;
    }
    Ok(())
}

/// SelectValid: 𝒯𝒳* × 𝒰𝒮 → 𝒯𝒳* × 𝒰𝒮
///
/// Greedy, order-dependent selection: each candidate is checked against the
/// set as already modified by the candidates accepted before it, and applied
/// immediately if valid. Candidates are taken in the order given; callers
/// wanting a different selection must order them first. `utxo_set` itself is
/// never modified.
pub fn select_valid(txs: &[Transaction], utxo_set: &UtxoSet) -> (Vec<Transaction>, UtxoSet) {
    let mut working = utxo_set.clone();
    let mut accepted = Vec::with_capacity(txs.len());

    for (i, tx) in txs.iter().enumerate() {
        if let ValidationResult::Invalid(reason) = check_transaction(tx, &working) {
            debug!("rejecting candidate {}: {}", i, reason);
            continue;
        }
        if let Err(e) = apply_transaction(tx, &mut working) {
            debug!("rejecting candidate {}: {}", i, e);
            continue;
        }
        accepted.push(tx.clone());
    }

    (accepted, working)
}
