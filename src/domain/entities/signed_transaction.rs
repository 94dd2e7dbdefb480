use solana_sdk::{
    hash::Hash,
    signature::Signature,
    transaction::{Transaction, VersionedTransaction},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignedTransactionError {
    #[error("failed to serialize transaction to wire bytes")]
    Serialize {
        #[source]
        source: bincode::Error,
    },
    #[error("failed to decode transaction wire bytes")]
    Decode {
        #[source]
        source: bincode::Error,
    },
}

/// Wire bytes of a transaction plus the signature that identifies it on-chain.
///
/// The primary signature is the first signature slot; an empty or zeroed slot
/// means the transaction was never signed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignedTransaction {
    wire_bytes: Vec<u8>,
    signature: Option<Signature>,
    recent_blockhash: Hash,
}

impl SignedTransaction {
    pub fn from_versioned(
        transaction: &VersionedTransaction,
    ) -> Result<Self, SignedTransactionError> {
        let wire_bytes = bincode::serialize(transaction)
            .map_err(|source| SignedTransactionError::Serialize { source })?;

        Ok(Self {
            wire_bytes,
            signature: primary_signature(&transaction.signatures),
            recent_blockhash: *transaction.message.recent_blockhash(),
        })
    }

    pub fn from_legacy(transaction: Transaction) -> Result<Self, SignedTransactionError> {
        Self::from_versioned(&VersionedTransaction::from(transaction))
    }

    pub fn from_wire_bytes(wire_bytes: Vec<u8>) -> Result<Self, SignedTransactionError> {
        let transaction = bincode::deserialize::<VersionedTransaction>(&wire_bytes)
            .map_err(|source| SignedTransactionError::Decode { source })?;

        Ok(Self {
            signature: primary_signature(&transaction.signatures),
            recent_blockhash: *transaction.message.recent_blockhash(),
            wire_bytes,
        })
    }

    #[inline(always)]
    pub fn wire_bytes(&self) -> &[u8] {
        &self.wire_bytes
    }

    #[inline(always)]
    pub const fn signature(&self) -> Option<Signature> {
        self.signature
    }

    #[inline(always)]
    pub const fn recent_blockhash(&self) -> Hash {
        self.recent_blockhash
    }

    #[inline(always)]
    pub const fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}

fn primary_signature(signatures: &[Signature]) -> Option<Signature> {
    signatures
        .first()
        .copied()
        .filter(|signature| *signature != Signature::default())
}
