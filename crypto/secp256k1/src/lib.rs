// Copyright (c) 2026 Vouch Foundation

#![deny(unsafe_code)]

//! Secp256k1 signing primitives for block witnesses and transaction signers.
//!
//! This crate provides the hashing and signature utilities consumed by the
//! consensus core: SHA-256 digests, secp256k1 keypairs, a self-describing
//! [`Signature`] that carries the signer's public key, and the mapping from a
//! public key to an account id.
//!
//! # Examples
//!
//! ```
//! use vch_crypto_secp256k1::{sha256, verify, Keypair};
//!
//! let keypair = Keypair::from_bytes(&[7u8; 32]).unwrap();
//! let digest = sha256(b"slot 42");
//!
//! let signature = keypair.sign(&digest).unwrap();
//! assert!(verify(&digest, &signature));
//! assert_eq!(keypair.id(), vch_crypto_secp256k1::account_id_from_pubkey(&signature.pubkey));
//! ```

use k256::ecdsa::{
    signature::hazmat::{PrehashSigner, PrehashVerifier},
    Signature as K256Signature, SigningKey, VerifyingKey,
};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::ZeroizeOnDrop;

/// Prefix of every account id.
pub const ACCOUNT_ID_PREFIX: &str = "VCH";

/// Length of the checksum appended to a public key before base58 encoding.
const ID_CHECKSUM_LEN: usize = 4;

/// Errors that can occur during key operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid private key")]
    InvalidPrivateKey,

    #[error("Signing failed: {0}")]
    SigningError(String),

    #[error("Malformed signature encoding: {0}")]
    Decode(String),

    #[error("Signature encoding failed: {0}")]
    Encode(String),
}

/// Compute the SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Signature algorithm tag carried inside an encoded [`Signature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    Secp256k1,
}

/// A detached signature together with the public key that produced it.
///
/// The verifier never needs a key directory: the embedded public key is
/// checked against the claimed account id with [`account_id_from_pubkey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub algorithm: Algorithm,
    /// Compact `r || s` encoding (64 bytes).
    pub sig: Vec<u8>,
    /// SEC1 compressed public key (33 bytes).
    pub pubkey: Vec<u8>,
}

impl Signature {
    /// Canonical byte encoding stored in block headers and transactions.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        bincode::serialize(self).map_err(|e| Error::Encode(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        bincode::deserialize(bytes).map_err(|e| Error::Decode(e.to_string()))
    }
}

/// A secp256k1 keypair used by witnesses and transaction signers.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Keypair {
    #[zeroize(skip)] // SigningKey implements its own zeroization
    signing_key: SigningKey,
}

impl core::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Keypair {{ id: {} }}", self.id())
    }
}

impl Keypair {
    /// Create a keypair from raw 32-byte private key bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, Error> {
        let signing_key =
            SigningKey::from_bytes(bytes.into()).map_err(|_| Error::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Generate a fresh keypair.
    pub fn random<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        Self {
            signing_key: SigningKey::random(rng),
        }
    }

    /// SEC1 compressed public key (33 bytes: 0x02/0x03 || x).
    pub fn public_key(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    /// Account id owned by this keypair.
    pub fn id(&self) -> String {
        account_id_from_pubkey(&self.public_key())
    }

    /// Sign a 32-byte digest.
    ///
    /// Signing is deterministic (RFC 6979), so the same digest always yields
    /// the same signature bytes.
    pub fn sign(&self, digest: &[u8; 32]) -> Result<Signature, Error> {
        let signature: K256Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| Error::SigningError(e.to_string()))?;

        Ok(Signature {
            algorithm: Algorithm::Secp256k1,
            sig: signature.to_bytes().to_vec(),
            pubkey: self.public_key(),
        })
    }
}

/// Verify `signature` over `digest` using the public key embedded in it.
pub fn verify(digest: &[u8], signature: &Signature) -> bool {
    match signature.algorithm {
        Algorithm::Secp256k1 => {
            let Ok(key) = VerifyingKey::from_sec1_bytes(&signature.pubkey) else {
                return false;
            };
            let Ok(sig) = K256Signature::from_slice(&signature.sig) else {
                return false;
            };
            key.verify_prehash(digest, &sig).is_ok()
        }
    }
}

/// Map a public key to its account id: `VCH` followed by the base58 encoding
/// of `pubkey || sha256(pubkey)[..4]`.
pub fn account_id_from_pubkey(pubkey: &[u8]) -> String {
    let checksum = sha256(pubkey);
    let mut payload = Vec::with_capacity(pubkey.len() + ID_CHECKSUM_LEN);
    payload.extend_from_slice(pubkey);
    payload.extend_from_slice(&checksum[..ID_CHECKSUM_LEN]);
    format!("{}{}", ACCOUNT_ID_PREFIX, bs58::encode(payload).into_string())
}

/// Recover the public key embedded in an account id, checking its checksum.
pub fn pubkey_from_account_id(id: &str) -> Option<Vec<u8>> {
    let encoded = id.strip_prefix(ACCOUNT_ID_PREFIX)?;
    let payload = bs58::decode(encoded).into_vec().ok()?;
    if payload.len() <= ID_CHECKSUM_LEN {
        return None;
    }
    let (pubkey, checksum) = payload.split_at(payload.len() - ID_CHECKSUM_LEN);
    if sha256(pubkey)[..ID_CHECKSUM_LEN] != *checksum {
        return None;
    }
    Some(pubkey.to_vec())
}
