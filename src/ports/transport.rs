use async_trait::async_trait;
use solana_sdk::signature::Signature;
use thiserror::Error;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TransportError {
    #[error("rpc request failed: {0}")]
    Request(String),
    #[error("rpc rejected transaction: {0}")]
    Rejected(String),
    #[error("malformed transaction payload: {0}")]
    Payload(String),
}

impl TransportError {
    /// Only request-level failures are worth retrying; a rejected or malformed
    /// payload fails the same way every time.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

/// Final status of a signature as seen by the cluster at the transport's
/// commitment level.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed(String),
}

#[async_trait]
pub trait TransactionTransport: Send + Sync {
    async fn send_raw_transaction(&self, wire_bytes: &[u8]) -> Result<Signature, TransportError>;

    async fn get_transaction_status(
        &self,
        signature: &Signature,
    ) -> Result<TransactionStatus, TransportError>;

    async fn get_block_height(&self) -> Result<u64, TransportError>;
}
