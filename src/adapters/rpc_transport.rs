use async_trait::async_trait;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_config::RpcSendTransactionConfig,
    rpc_request::RpcError,
};
use solana_sdk::{signature::Signature, transaction::VersionedTransaction};
use solana_transaction_status::UiTransactionEncoding;

use crate::{
    domain::value_objects::CommitmentLevel,
    ports::transport::{TransactionStatus, TransactionTransport, TransportError},
};

/// JSON-RPC transport. Sends skip preflight and disable node-side retries so
/// that resending stays under the caller's control.
pub struct RpcTransport {
    rpc: RpcClient,
    commitment: CommitmentLevel,
}

impl RpcTransport {
    pub fn new(rpc_url: String, commitment: CommitmentLevel) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url, commitment.as_commitment_config()),
            commitment,
        }
    }

    #[inline(always)]
    pub const fn commitment(&self) -> CommitmentLevel {
        self.commitment
    }

    #[inline(always)]
    pub const fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    fn send_config() -> RpcSendTransactionConfig {
        RpcSendTransactionConfig {
            skip_preflight: true,
            encoding: Some(UiTransactionEncoding::Base64),
            max_retries: Some(0),
            ..RpcSendTransactionConfig::default()
        }
    }
}

#[async_trait]
impl TransactionTransport for RpcTransport {
    async fn send_raw_transaction(&self, wire_bytes: &[u8]) -> Result<Signature, TransportError> {
        let transaction = bincode::deserialize::<VersionedTransaction>(wire_bytes)
            .map_err(|error| TransportError::Payload(error.to_string()))?;

        self.rpc
            .send_transaction_with_config(&transaction, Self::send_config())
            .await
            .map_err(|error| classify_client_error(&error))
    }

    async fn get_transaction_status(
        &self,
        signature: &Signature,
    ) -> Result<TransactionStatus, TransportError> {
        let response = self
            .rpc
            .get_signature_statuses(&[*signature])
            .await
            .map_err(|error| classify_client_error(&error))?;

        let Some(Some(status)) = response.value.into_iter().next() else {
            return Ok(TransactionStatus::Pending);
        };

        if let Some(error) = status.err {
            return Ok(TransactionStatus::Failed(error.to_string()));
        }

        if status.satisfies_commitment(self.commitment.as_commitment_config()) {
            Ok(TransactionStatus::Confirmed)
        } else {
            Ok(TransactionStatus::Pending)
        }
    }

    async fn get_block_height(&self) -> Result<u64, TransportError> {
        self.rpc
            .get_block_height_with_commitment(self.commitment.as_commitment_config())
            .await
            .map_err(|error| classify_client_error(&error))
    }
}

/// A JSON-RPC error response means the node understood and refused the call.
/// Everything else is a delivery problem worth retrying.
#[expect(
    clippy::wildcard_enum_match_arm,
    reason = "only response errors are distinguished from every other failure"
)]
fn classify_client_error(error: &ClientError) -> TransportError {
    match error.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError { .. })
        | ClientErrorKind::TransactionError(_)
        | ClientErrorKind::SigningError(_) => TransportError::Rejected(error.to_string()),
        _ => TransportError::Request(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use solana_client::client_error::{ClientError, ClientErrorKind};

    use super::{RpcTransport, classify_client_error};
    use crate::{
        domain::value_objects::CommitmentLevel,
        ports::transport::{TransactionTransport, TransportError},
    };

    #[test]
    fn send_config_skips_preflight_and_node_retries() {
        let config = RpcTransport::send_config();
        assert!(config.skip_preflight);
        assert_eq!(config.max_retries, Some(0));
    }

    #[test]
    fn io_failures_are_transient() {
        let error = ClientError::from(ClientErrorKind::Custom("connection reset".to_owned()));
        assert!(matches!(
            classify_client_error(&error),
            TransportError::Request(_)
        ));
    }

    #[tokio::test]
    async fn rejects_garbage_payload_before_any_request() {
        let transport =
            RpcTransport::new("http://127.0.0.1:1".to_owned(), CommitmentLevel::Confirmed);
        let result = transport.send_raw_transaction(&[1, 2]).await;
        assert!(matches!(result, Err(TransportError::Payload(_))));
        assert_eq!(transport.commitment(), CommitmentLevel::Confirmed);
    }
}
