//! Digital signatures for transactions
//!
//! Every party listed in `Transaction::signers` signs the transaction id.
//! A transaction is only committable once all required signatures are present.

use crate::error::LedgerError;
use crate::hash::calculate_tx_id;
use crate::transaction::{Transaction, TxId};
use bestbid_core::Party;
use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, Signer as DalekSigner, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

/// Signature algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Ed25519,
}

/// One party's signature over a transaction id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
    pub signer: Party,
    pub algorithm: SignatureAlgorithm,
    /// Public key (hex-encoded)
    pub public_key: String,
    /// Signature bytes (hex-encoded)
    pub signature: String,
    pub signed_at: DateTime<Utc>,
}

/// Bytes covered by a signature: tx id, signer and signing time
fn signable_payload(tx_id: &TxId, signer: &Party, signed_at: &DateTime<Utc>) -> Vec<u8> {
    format!("{}|{}|{}", tx_id, signer, signed_at.to_rfc3339()).into_bytes()
}

impl TransactionSignature {
    /// Verify this signature against a transaction id
    pub fn verify(&self, tx_id: &TxId) -> Result<(), LedgerError> {
        let invalid = |reason: String| LedgerError::InvalidSignature {
            signer: self.signer.to_string(),
            reason,
        };

        let pk_bytes = hex::decode(&self.public_key)
            .map_err(|e| invalid(format!("Invalid public key hex: {}", e)))?;
        let sig_bytes = hex::decode(&self.signature)
            .map_err(|e| invalid(format!("Invalid signature hex: {}", e)))?;

        let pk_array: [u8; 32] = pk_bytes
            .try_into()
            .map_err(|_| invalid("Public key must be 32 bytes".to_string()))?;
        let sig_array: [u8; 64] = sig_bytes
            .try_into()
            .map_err(|_| invalid("Signature must be 64 bytes".to_string()))?;

        let verifying_key = VerifyingKey::from_bytes(&pk_array)
            .map_err(|e| invalid(format!("Invalid public key: {}", e)))?;
        let signature = Signature::from_bytes(&sig_array);

        let payload = signable_payload(tx_id, &self.signer, &self.signed_at);
        verifying_key.verify(&payload, &signature).map_err(|e| {
            LedgerError::SignatureVerificationFailed(format!(
                "Signature from {} failed: {}",
                self.signer, e
            ))
        })
    }
}

/// Trait for signers
pub trait Signer: Send + Sync {
    /// The party this signer signs for
    fn party(&self) -> &Party;

    /// Get the public key (hex-encoded)
    fn public_key_hex(&self) -> String;

    /// Sign a transaction id
    fn sign(&self, tx_id: &TxId) -> TransactionSignature;
}

/// Ed25519 signer holding one party's key
pub struct PartySigner {
    party: Party,
    signing_key: SigningKey,
}

impl PartySigner {
    /// Create from a 32-byte seed (hex-encoded)
    pub fn from_hex(party: Party, hex_seed: &str) -> Result<Self, LedgerError> {
        let bytes = hex::decode(hex_seed.trim()).map_err(|e| LedgerError::InvalidSignature {
            signer: party.to_string(),
            reason: format!("Invalid key hex: {}", e),
        })?;

        let seed: [u8; 32] = bytes.try_into().map_err(|_| LedgerError::InvalidSignature {
            signer: party.to_string(),
            reason: "Key must be 32 bytes".to_string(),
        })?;

        Ok(Self {
            party,
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// Generate a new random signing key
    pub fn generate(party: Party) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            party,
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Export the seed as hex (for storage)
    pub fn seed_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }
}

impl Signer for PartySigner {
    fn party(&self) -> &Party {
        &self.party
    }

    fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    fn sign(&self, tx_id: &TxId) -> TransactionSignature {
        let signed_at = Utc::now();
        let payload = signable_payload(tx_id, &self.party, &signed_at);
        let signature = self.signing_key.sign(&payload);

        TransactionSignature {
            signer: self.party.clone(),
            algorithm: SignatureAlgorithm::Ed25519,
            public_key: self.public_key_hex(),
            signature: hex::encode(signature.to_bytes()),
            signed_at,
        }
    }
}

/// A transaction with its id and the signatures collected so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub tx_id: TxId,
    pub transaction: Transaction,
    pub signatures: Vec<TransactionSignature>,
}

impl SignedTransaction {
    /// Wrap an unsigned transaction, computing its id
    pub fn new(transaction: Transaction) -> Self {
        Self {
            tx_id: calculate_tx_id(&transaction),
            transaction,
            signatures: Vec::new(),
        }
    }

    pub fn add_signature(&mut self, signature: TransactionSignature) {
        self.signatures.push(signature);
    }

    /// Required signers that have not signed yet
    pub fn missing_signers(&self) -> Vec<&Party> {
        self.transaction
            .signers
            .iter()
            .filter(|party| !self.signatures.iter().any(|s| &s.signer == *party))
            .collect()
    }

    /// Verify the id matches the content and every required signer signed it
    pub fn verify_signatures(&self) -> Result<(), LedgerError> {
        let expected = calculate_tx_id(&self.transaction);
        if expected != self.tx_id {
            return Err(LedgerError::TxIdMismatch {
                expected: expected.to_string(),
                actual: self.tx_id.to_string(),
            });
        }

        if let Some(party) = self.missing_signers().first() {
            return Err(LedgerError::MissingSignature((*party).clone()));
        }

        for signature in &self.signatures {
            signature.verify(&self.tx_id)?;
        }

        Ok(())
    }
}
