//! Hashing and signature primitives
//!
//! The ledger only depends on the call contract here: a deterministic
//! collision-resistant `hash`, and `sign`/`verify` over arbitrary payloads.

use bitcoin_hashes::{sha256d, Hash as BitcoinHash};
use once_cell::sync::Lazy;
use secp256k1::{ecdsa::Signature, All, Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

use crate::constants::SIGNATURE_SIZE;
use crate::error::{ConsensusError, Result};
use crate::types::{ByteString, Hash};

static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Double SHA-256 of `data`.
pub fn hash(data: &[u8]) -> Hash {
    sha256d::Hash::hash(data).into_inner()
}

/// Public key for a secret key.
pub fn public_key(secret_key: &SecretKey) -> PublicKey {
    PublicKey::from_secret_key(&SECP256K1_CONTEXT, secret_key)
}

/// Parse a secret key from raw bytes.
pub fn secret_key_from_bytes(bytes: &[u8]) -> Result<SecretKey> {
    SecretKey::from_slice(bytes).map_err(|e| ConsensusError::InvalidKey(e.to_string()))
}

/// Sign `payload`; returns the compact signature bytes.
pub fn sign(secret_key: &SecretKey, payload: &[u8]) -> ByteString {
    let message = Message::from_digest(message_digest(payload));
    SECP256K1_CONTEXT
        .sign_ecdsa(&message, secret_key)
        .serialize_compact()
        .to_vec()
}

/// Verify a compact signature over `payload`. Malformed signatures verify
/// as false.
pub fn verify(public_key: &PublicKey, payload: &[u8], signature: &[u8]) -> bool {
    if signature.len() != SIGNATURE_SIZE {
        return false;
    }
    let signature = match Signature::from_compact(signature) {
        Ok(sig) => sig,
        Err(_) => return false,
    };
    let message = Message::from_digest(message_digest(payload));
    SECP256K1_CONTEXT
        .verify_ecdsa(&message, &signature, public_key)
        .is_ok()
}

fn message_digest(payload: &[u8]) -> [u8; 32] {
    Sha256::digest(payload).into()
}
