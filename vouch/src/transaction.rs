// Copyright (c) 2026 Vouch Foundation

//! Transactions and their execution receipts.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use vch_crypto_secp256k1::{account_id_from_pubkey, verify, Keypair, Signature};
use vch_vm_host::{HostError, Receipt, ReceiptKind};

use crate::codec::Encoder;

/// A single contract call inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub contract: String,
    pub action_name: String,
    /// JSON-encoded argument array
    pub data: String,
}

impl Action {
    pub fn new(contract: &str, action_name: &str, data: &str) -> Self {
        Self {
            contract: contract.to_string(),
            action_name: action_name.to_string(),
            data: data.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    #[error("transaction is not published")]
    NotPublished,

    #[error("missing signature of signer {0}")]
    MissingSigner(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("signing failed: {0}")]
    Signing(String),
}

/// A signed transaction.
///
/// Signing happens in two layers: every account in `signers` signs the base
/// hash, then the publisher signs the base hash plus those signatures. The
/// publisher pays for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    /// Creation time in nanoseconds since the unix epoch
    pub time: i64,
    /// Expiry time in nanoseconds since the unix epoch
    pub expiration: i64,
    pub gas_price: i64,
    pub gas_limit: i64,
    pub actions: Vec<Action>,
    pub signers: Vec<String>,
    pub signs: Vec<Signature>,
    pub publisher: Option<Signature>,
}

impl Tx {
    pub fn new(actions: Vec<Action>, signers: Vec<String>, gas_limit: i64, gas_price: i64, time: i64, expiration: i64) -> Self {
        Self {
            time,
            expiration,
            gas_price,
            gas_limit,
            actions,
            signers,
            signs: Vec::new(),
            publisher: None,
        }
    }

    /// Hash signed by every signer.
    pub fn base_hash(&self) -> [u8; 32] {
        let mut enc = Encoder::new();
        enc.i64(self.time)
            .i64(self.expiration)
            .i64(self.gas_price)
            .i64(self.gas_limit)
            .u32(self.actions.len() as u32);
        for action in &self.actions {
            enc.str(&action.contract)
                .str(&action.action_name)
                .str(&action.data);
        }
        enc.u32(self.signers.len() as u32);
        for signer in &self.signers {
            enc.str(signer);
        }
        Sha256::digest(enc.finish()).into()
    }

    /// Hash signed by the publisher.
    pub fn publish_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.base_hash());
        for sign in &self.signs {
            hasher.update(&sign.sig);
            hasher.update(&sign.pubkey);
        }
        hasher.finalize().into()
    }

    /// Transaction id, covering every signature.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.publish_hash());
        if let Some(publisher) = &self.publisher {
            hasher.update(&publisher.sig);
            hasher.update(&publisher.pubkey);
        }
        hasher.finalize().into()
    }

    pub fn sign(&mut self, keypair: &Keypair) -> Result<(), TxError> {
        let sign = keypair
            .sign(&self.base_hash())
            .map_err(|e| TxError::Signing(e.to_string()))?;
        self.signs.push(sign);
        Ok(())
    }

    pub fn publish(&mut self, keypair: &Keypair) -> Result<(), TxError> {
        let publisher = keypair
            .sign(&self.publish_hash())
            .map_err(|e| TxError::Signing(e.to_string()))?;
        self.publisher = Some(publisher);
        Ok(())
    }

    /// Account id of the publisher, if published.
    pub fn publisher_id(&self) -> Option<String> {
        self.publisher
            .as_ref()
            .map(|p| account_id_from_pubkey(&p.pubkey))
    }

    /// Check every signer signature and the publisher signature.
    pub fn verify_self(&self) -> Result<(), TxError> {
        let base = self.base_hash();
        for signer in &self.signers {
            let sign = self
                .signs
                .iter()
                .find(|s| account_id_from_pubkey(&s.pubkey) == *signer)
                .ok_or_else(|| TxError::MissingSigner(signer.clone()))?;
            if !verify(&base, sign) {
                return Err(TxError::InvalidSignature);
            }
        }

        let publisher = self.publisher.as_ref().ok_or(TxError::NotPublished)?;
        if !verify(&self.publish_hash(), publisher) {
            return Err(TxError::InvalidSignature);
        }
        Ok(())
    }
}

/// Outcome class of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    Success,
    GasRunOut,
    BalanceNotEnough,
    WrongParameter,
    RuntimeError,
}

impl StatusCode {
    fn as_u32(self) -> u32 {
        match self {
            Self::Success => 0,
            Self::GasRunOut => 1,
            Self::BalanceNotEnough => 2,
            Self::WrongParameter => 3,
            Self::RuntimeError => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub code: StatusCode,
    pub message: String,
}

impl Status {
    pub fn success() -> Self {
        Self {
            code: StatusCode::Success,
            message: String::new(),
        }
    }

    pub fn gas_run_out(limit: i64) -> Self {
        Self {
            code: StatusCode::GasRunOut,
            message: format!("gas limit {} exceeded", limit),
        }
    }

    pub fn from_error(error: &HostError) -> Self {
        let code = match error {
            HostError::BalanceNotEnough { .. } => StatusCode::BalanceNotEnough,
            HostError::Serialization(_) => StatusCode::WrongParameter,
            _ => StatusCode::RuntimeError,
        };
        Self {
            code,
            message: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == StatusCode::Success
    }
}

/// Recorded outcome of executing one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: [u8; 32],
    pub gas_usage: i64,
    pub status: Status,
    pub success_action_count: u32,
    pub receipts: Vec<Receipt>,
}

impl TxReceipt {
    /// Canonical encoding; two nodes agree on a receipt iff these bytes match.
    pub fn encode(&self) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.bytes(&self.tx_hash)
            .i64(self.gas_usage)
            .u32(self.status.code.as_u32())
            .str(&self.status.message)
            .u32(self.success_action_count)
            .u32(self.receipts.len() as u32);
        for receipt in &self.receipts {
            let kind = match receipt.kind {
                ReceiptKind::SystemDefined => 0,
                ReceiptKind::UserDefined => 1,
            };
            enc.u32(kind).str(&receipt.content);
        }
        enc.finish()
    }

    pub fn hash(&self) -> [u8; 32] {
        Sha256::digest(self.encode()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypair(seed: u8) -> Keypair {
        Keypair::from_bytes(&[seed; 32]).unwrap()
    }

    fn signed_tx() -> (Tx, Keypair, Keypair) {
        let signer = keypair(1);
        let publisher = keypair(2);
        let mut tx = Tx::new(
            vec![Action::new("token", "transfer", r#"["a","b",1]"#)],
            vec![signer.id()],
            10_000,
            1,
            1_000_000_000,
            2_000_000_000,
        );
        tx.sign(&signer).unwrap();
        tx.publish(&publisher).unwrap();
        (tx, signer, publisher)
    }

    #[test]
    fn test_verify_self() {
        let (tx, _, publisher) = signed_tx();
        assert!(tx.verify_self().is_ok());
        assert_eq!(tx.publisher_id(), Some(publisher.id()));
    }

    #[test]
    fn test_tampered_tx_fails() {
        let (mut tx, _, _) = signed_tx();
        tx.gas_limit += 1;
        assert_eq!(tx.verify_self(), Err(TxError::InvalidSignature));
    }

    #[test]
    fn test_missing_signer() {
        let (mut tx, _, publisher) = signed_tx();
        tx.signs.clear();
        tx.publish(&publisher).unwrap();
        assert!(matches!(tx.verify_self(), Err(TxError::MissingSigner(_))));
    }

    #[test]
    fn test_unpublished() {
        let mut tx = Tx::new(vec![], vec![], 100, 0, 0, 0);
        tx.signs.clear();
        assert_eq!(tx.verify_self(), Err(TxError::NotPublished));
    }

    #[test]
    fn test_hash_covers_publisher() {
        let (tx, _, _) = signed_tx();
        let mut other = tx.clone();
        other.publish(&keypair(3)).unwrap();
        assert_ne!(tx.hash(), other.hash());
        assert_eq!(tx.base_hash(), other.base_hash());
    }

    #[test]
    fn test_receipt_encoding_sensitive_to_content() {
        let receipt = TxReceipt {
            tx_hash: [1u8; 32],
            gas_usage: 10,
            status: Status::success(),
            success_action_count: 1,
            receipts: vec![Receipt {
                kind: ReceiptKind::SystemDefined,
                content: r#"["run","[]","success"]"#.to_string(),
            }],
        };
        let mut other = receipt.clone();
        other.gas_usage = 11;

        assert_eq!(receipt.encode(), receipt.clone().encode());
        assert_ne!(receipt.encode(), other.encode());
    }
}
