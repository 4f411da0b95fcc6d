//! Transaction validation against a UTXO set

use fork_ledger::*;
use fork_ledger::crypto::{public_key, secret_key_from_bytes};
use fork_ledger::transaction::{check_transaction, calculate_fee};
use secp256k1::{PublicKey, SecretKey};

fn key(byte: u8) -> SecretKey {
    secret_key_from_bytes(&[byte; 32]).unwrap()
}

fn pk(byte: u8) -> PublicKey {
    public_key(&key(byte))
}

/// Twenty funding outputs owned by key(1), as a pool a test can spend from.
fn funded_pool() -> (UtxoSet, Vec<(OutPoint, Amount)>) {
    let mut utxo_set = UtxoSet::new();
    let mut funds = Vec::new();
    for i in 0..20u8 {
        let outpoint = OutPoint::new([i + 1; 32], u32::from(i % 3));
        let value = 1_000 + Amount::from(i) * 10;
        utxo_set
            .add(outpoint, TransactionOutput { value, owner: pk(1) })
            .unwrap();
        funds.push((outpoint, value));
    }
    (utxo_set, funds)
}

fn pay(outpoint: OutPoint, value: Amount, to: PublicKey, signer: &SecretKey) -> Transaction {
    TransactionBuilder::new()
        .add_input(outpoint.hash, outpoint.index)
        .add_output(value, to)
        .sign_input(0, signer)
        .unwrap()
        .finalize()
}

#[test]
fn test_single_input_single_output_valid() {
    let (utxo_set, funds) = funded_pool();
    for (outpoint, value) in funds {
        let tx = pay(outpoint, value, pk(2), &key(1));
        assert!(is_valid(&tx, &utxo_set));
    }
}

#[test]
fn test_flipped_signature_bit_invalid() {
    let (utxo_set, funds) = funded_pool();
    let (outpoint, value) = funds[0];
    let draft = TransactionBuilder::new()
        .add_input(outpoint.hash, outpoint.index)
        .add_output(value, pk(2));
    let payload = draft.signing_payload(0).unwrap();
    let signature = crypto::sign(&key(1), &payload);

    for byte in [0usize, 13, 31, 32, 50, 63] {
        for bit in [0u8, 3, 7] {
            let mut tampered = signature.clone();
            tampered[byte] ^= 1 << bit;
            let tx = draft
                .clone()
                .add_signature(0, tampered)
                .unwrap()
                .finalize();
            assert!(!is_valid(&tx, &utxo_set), "byte {} bit {}", byte, bit);
        }
    }

    let tx = draft.add_signature(0, signature).unwrap().finalize();
    assert!(is_valid(&tx, &utxo_set));
}

#[test]
fn test_outputs_exceeding_inputs_invalid_regardless_of_signature() {
    let (utxo_set, funds) = funded_pool();
    let (outpoint, value) = funds[4];

    let signed = pay(outpoint, value + 1, pk(2), &key(1));
    let wrongly_signed = pay(outpoint, value + 1, pk(2), &key(2));
    assert!(!is_valid(&signed, &utxo_set));
    assert!(!is_valid(&wrongly_signed, &utxo_set));
}

#[test]
fn test_multi_input_conservation() {
    let (utxo_set, funds) = funded_pool();
    let total: Amount = funds[..3].iter().map(|(_, v)| v).sum();

    let mut draft = TransactionBuilder::new();
    for (outpoint, _) in &funds[..3] {
        draft = draft.add_input(outpoint.hash, outpoint.index);
    }
    let tx = draft
        .add_output(total - 5, pk(2))
        .add_output(5, pk(3))
        .sign_all(&key(1))
        .unwrap()
        .finalize();

    assert_eq!(check_transaction(&tx, &utxo_set), ValidationResult::Valid);
    assert_eq!(calculate_fee(&tx, &utxo_set), Some(0));
}

#[test]
fn test_inputs_signed_in_any_order() {
    let (utxo_set, funds) = funded_pool();
    let draft = TransactionBuilder::new()
        .add_input(funds[0].0.hash, funds[0].0.index)
        .add_input(funds[1].0.hash, funds[1].0.index)
        .add_output(funds[0].1 + funds[1].1, pk(2));

    let forward = draft.clone().sign_input(0, &key(1)).unwrap().sign_input(1, &key(1)).unwrap();
    let backward = draft.sign_input(1, &key(1)).unwrap().sign_input(0, &key(1)).unwrap();

    let (a, b) = (forward.finalize(), backward.finalize());
    assert_eq!(a.hash(), b.hash());
    assert!(is_valid(&a, &utxo_set));
}

#[test]
fn test_one_bad_signature_among_many_invalid() {
    let (mut utxo_set, funds) = funded_pool();
    let foreign = OutPoint::new([0xaa; 32], 0);
    utxo_set
        .add(foreign, TransactionOutput { value: 10, owner: pk(4) })
        .unwrap();

    let tx = TransactionBuilder::new()
        .add_input(funds[0].0.hash, funds[0].0.index)
        .add_input(foreign.hash, foreign.index)
        .add_output(10, pk(2))
        .sign_all(&key(1))
        .unwrap()
        .finalize();
    assert!(!is_valid(&tx, &utxo_set));
}

#[test]
fn test_double_spend_across_transactions_keeps_earlier() {
    let (utxo_set, funds) = funded_pool();
    let (outpoint, value) = funds[7];
    let tx1 = pay(outpoint, value, pk(2), &key(1));
    let tx2 = pay(outpoint, value - 1, pk(3), &key(1));
    assert!(is_valid(&tx1, &utxo_set));
    assert!(is_valid(&tx2, &utxo_set));

    let (accepted, resulting) = select_valid(&[tx1.clone(), tx2.clone()], &utxo_set);
    assert_eq!(accepted, vec![tx1.clone()]);
    assert!(!resulting.contains(&outpoint));

    let (accepted, _) = select_valid(&[tx2.clone(), tx1], &utxo_set);
    assert_eq!(accepted, vec![tx2]);
}

#[test]
fn test_select_valid_leaves_input_snapshot_untouched() {
    let (utxo_set, funds) = funded_pool();
    let before = utxo_set.clone();
    let txs: Vec<Transaction> = funds
        .iter()
        .map(|(outpoint, value)| pay(*outpoint, *value, pk(2), &key(1)))
        .collect();

    let (accepted, resulting) = select_valid(&txs, &utxo_set);
    assert_eq!(accepted.len(), txs.len());
    assert_eq!(resulting.len(), utxo_set.len());
    assert_eq!(utxo_set, before);
    for tx in &accepted {
        assert_eq!(resulting.get(&tx.outpoint(0)).map(|o| o.owner), Some(pk(2)));
    }
}

#[test]
fn test_finalized_hash_stable_under_clone() {
    let (_, funds) = funded_pool();
    let tx = pay(funds[0].0, funds[0].1, pk(2), &key(1));
    let copy = tx.clone();
    assert_eq!(tx.hash(), copy.hash());
    assert_eq!(tx, copy);
}
