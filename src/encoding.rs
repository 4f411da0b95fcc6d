//! Canonical byte encodings
//!
//! Integers are little-endian and fixed width, every sequence carries a `u32`
//! length prefix and public keys use the 33-byte compressed form, so distinct
//! values never share an encoding.

use crate::types::{ByteString, Hash, OutPoint, Transaction, TransactionInput, TransactionOutput};

/// Payload signed by input `index`: its own outpoint followed by every output.
///
/// Signatures of the other inputs are not covered, so inputs can be signed
/// one at a time in any order. Returns `None` for an out-of-range index.
pub fn signing_payload(
    inputs: &[TransactionInput],
    outputs: &[TransactionOutput],
    index: usize,
) -> Option<ByteString> {
    let input = inputs.get(index)?;
    let mut buf = Vec::with_capacity(36 + 4 + outputs.len() * 41);
    write_outpoint(&mut buf, &input.prevout);
    write_outputs(&mut buf, outputs);
    Some(buf)
}

/// Identity encoding of a transaction.
pub fn transaction_bytes(
    inputs: &[TransactionInput],
    outputs: &[TransactionOutput],
    coinbase_data: &[u8],
) -> ByteString {
    let mut buf = Vec::new();
    write_len(&mut buf, inputs.len());
    for input in inputs {
        write_outpoint(&mut buf, &input.prevout);
        write_bytes(&mut buf, &input.signature);
    }
    write_outputs(&mut buf, outputs);
    write_bytes(&mut buf, coinbase_data);
    buf
}

/// Identity encoding of a block.
pub fn block_bytes(
    prev_block_hash: Option<&Hash>,
    coinbase: &Transaction,
    transactions: &[Transaction],
) -> ByteString {
    let mut buf = Vec::with_capacity(1 + 32 + 32 + 4 + transactions.len() * 32);
    match prev_block_hash {
        Some(hash) => {
            buf.push(1);
            buf.extend_from_slice(hash);
        }
        None => buf.push(0),
    }
    buf.extend_from_slice(&coinbase.hash());
    write_len(&mut buf, transactions.len());
    for tx in transactions {
        buf.extend_from_slice(&tx.hash());
    }
    buf
}

fn write_outpoint(buf: &mut ByteString, outpoint: &OutPoint) {
    buf.extend_from_slice(&outpoint.hash);
    buf.extend_from_slice(&outpoint.index.to_le_bytes());
}

fn write_outputs(buf: &mut ByteString, outputs: &[TransactionOutput]) {
    write_len(buf, outputs.len());
    for output in outputs {
        buf.extend_from_slice(&output.value.to_le_bytes());
        buf.extend_from_slice(&output.owner.serialize());
    }
}

fn write_bytes(buf: &mut ByteString, bytes: &[u8]) {
    write_len(buf, bytes.len());
    buf.extend_from_slice(bytes);
}

/// Lengths are written as `u32`. Longer sequences saturate at `u32::MAX`
/// instead of wrapping.
fn write_len(buf: &mut ByteString, len: usize) {
    let len = u32::try_from(len).unwrap_or(u32::MAX);
    buf.extend_from_slice(&len.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{public_key, secret_key_from_bytes};

    fn output(value: i64, key_byte: u8) -> TransactionOutput {
        let sk = secret_key_from_bytes(&[key_byte; 32]).unwrap();
        TransactionOutput { value, owner: public_key(&sk) }
    }

    fn input(hash_byte: u8, index: u32, signature: Vec<u8>) -> TransactionInput {
        TransactionInput {
            prevout: OutPoint::new([hash_byte; 32], index),
            signature,
        }
    }

    #[test]
    fn test_signing_payload_ignores_signatures() {
        let outputs = vec![output(10, 1)];
        let unsigned = vec![input(1, 0, vec![]), input(2, 1, vec![])];
        let signed = vec![input(1, 0, vec![7; 64]), input(2, 1, vec![9; 64])];

        assert_eq!(
            signing_payload(&unsigned, &outputs, 1),
            signing_payload(&signed, &outputs, 1)
        );
    }

    #[test]
    fn test_signing_payload_differs_per_input() {
        let outputs = vec![output(10, 1)];
        let inputs = vec![input(1, 0, vec![]), input(2, 1, vec![])];

        assert_ne!(
            signing_payload(&inputs, &outputs, 0),
            signing_payload(&inputs, &outputs, 1)
        );
    }

    #[test]
    fn test_signing_payload_out_of_range() {
        assert!(signing_payload(&[], &[output(1, 1)], 0).is_none());
    }

    #[test]
    fn test_transaction_bytes_cover_signatures_and_data() {
        let outputs = vec![output(10, 1)];
        let a = transaction_bytes(&[input(1, 0, vec![1])], &outputs, &[]);
        let b = transaction_bytes(&[input(1, 0, vec![2])], &outputs, &[]);
        let c = transaction_bytes(&[input(1, 0, vec![1])], &outputs, &[0]);

        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_output_order_preserved() {
        let ab = transaction_bytes(&[], &[output(1, 1), output(2, 2)], &[]);
        let ba = transaction_bytes(&[], &[output(2, 2), output(1, 1)], &[]);
        assert_ne!(ab, ba);
    }
}
