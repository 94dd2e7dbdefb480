use std::{str::FromStr, sync::LazyLock};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::json;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_request::{RpcError, RpcRequest},
};
use solana_sdk::pubkey::Pubkey;
use url::Url;

use crate::{
    domain::{entities::SignedTransaction, outcome::BundleId},
    ports::relay::{BundleRelay, RelayError},
};

/// Block engines reject bundles longer than this.
pub const MAX_BUNDLE_TRANSACTIONS: usize = 5;

const JITO_TIP_ACCOUNT_ADDRESSES: [&str; 8] = [
    "96gYZGLnJYVFmbjzopPSU6QiEV5fGqZNyN9nmNhvrZU5",
    "HFqU5x63VTqvQss8hp11i4wVV8bD44PvwucfZ2bU7gRe",
    "Cw8CFyM9FkoMi7K7Crf6HNQqf4uEMzpKw6QNghXLvLkY",
    "ADaUMid9yfUytqMBgopwjb2DTLSokTSzL1zt6iGPaS49",
    "DfXygSm4jCyNCybVYYK6DwvWqjKee8pbDmJGcLWNDXjh",
    "ADuUkR4vqLUMWXxW9gh6D6L8pMSawimctcNZ5pGwDcEt",
    "DttWaMuVvTiduZRnguLF7jNxTgiMBZ1hyAumKUiL2KRL",
    "3AVi9Tg9Uo68tJfuvoKvqKNWKkC5wPdSSdeBnizKZ6jT",
];

static JITO_TIP_PUBKEYS: LazyLock<Vec<Pubkey>> = LazyLock::new(|| {
    JITO_TIP_ACCOUNT_ADDRESSES
        .iter()
        .filter_map(|address| Pubkey::from_str(address).ok())
        .collect()
});

#[inline(always)]
pub fn jito_tip_pubkeys() -> &'static [Pubkey] {
    JITO_TIP_PUBKEYS.as_slice()
}

struct BlockEngine {
    url: Url,
    rpc: RpcClient,
}

/// `sendBundle` over JSON-RPC to one or more Jito block engines. Every engine
/// gets the bundle; the first one to accept it wins.
pub struct JitoBundleRelay {
    engines: Vec<BlockEngine>,
    tip_accounts: Vec<Pubkey>,
}

impl JitoBundleRelay {
    pub fn new(relay_urls: &[Url]) -> Self {
        Self::with_tip_accounts(relay_urls, jito_tip_pubkeys().to_vec())
    }

    pub fn with_tip_accounts(relay_urls: &[Url], tip_accounts: Vec<Pubkey>) -> Self {
        let engines = relay_urls
            .iter()
            .map(|url| BlockEngine {
                url: url.clone(),
                rpc: RpcClient::new(url.as_str().to_owned()),
            })
            .collect();

        Self {
            engines,
            tip_accounts,
        }
    }

    pub const fn endpoint_count(&self) -> usize {
        self.engines.len()
    }
}

#[async_trait]
impl BundleRelay for JitoBundleRelay {
    fn describe(&self) -> String {
        match self.engines.as_slice() {
            [] => "jito (no block engines)".to_owned(),
            [engine] => format!("jito {}", engine.url),
            [engine, rest @ ..] => format!("jito {} (+{} more)", engine.url, rest.len()),
        }
    }

    fn tip_accounts(&self) -> &[Pubkey] {
        &self.tip_accounts
    }

    async fn submit_bundle(&self, bundle: &[SignedTransaction]) -> Result<BundleId, RelayError> {
        if bundle.is_empty() || bundle.len() > MAX_BUNDLE_TRANSACTIONS {
            return Err(RelayError::Rejected(format!(
                "bundle must hold 1..={} transactions, got {}",
                MAX_BUNDLE_TRANSACTIONS,
                bundle.len()
            )));
        }
        if self.engines.is_empty() {
            return Err(RelayError::Unavailable(
                "no block engine endpoints configured".to_owned(),
            ));
        }

        let encoded = bundle
            .iter()
            .map(|transaction| STANDARD.encode(transaction.wire_bytes()))
            .collect::<Vec<_>>();
        let params = json!([encoded, { "encoding": "base64" }]);

        let mut pending = self
            .engines
            .iter()
            .map(|engine| {
                let params = params.clone();
                async move {
                    let response = engine
                        .rpc
                        .send::<String>(
                            RpcRequest::Custom {
                                method: "sendBundle",
                            },
                            params,
                        )
                        .await;
                    (engine, response)
                }
            })
            .collect::<FuturesUnordered<_>>();

        let mut rejection = None;
        let mut last_failure = None;
        while let Some((engine, response)) = pending.next().await {
            match response {
                Ok(bundle_id) => return Ok(BundleId::new(bundle_id)),
                Err(error) => match classify_client_error(&error) {
                    RelayError::Rejected(message) => {
                        log::debug!("JITO > {} > Rejected: {}", engine.url, message);
                        rejection = Some(message);
                    }
                    RelayError::Unavailable(message) => {
                        log::debug!("JITO > {} > Unreachable: {}", engine.url, message);
                        last_failure = Some(message);
                    }
                },
            }
        }

        match (rejection, last_failure) {
            (Some(message), _) => Err(RelayError::Rejected(message)),
            (None, Some(message)) => Err(RelayError::Unavailable(message)),
            (None, None) => Err(RelayError::Unavailable(
                "no block engine answered".to_owned(),
            )),
        }
    }
}

#[expect(
    clippy::wildcard_enum_match_arm,
    reason = "only response errors are distinguished from every other failure"
)]
fn classify_client_error(error: &ClientError) -> RelayError {
    match error.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError { .. }) => {
            RelayError::Rejected(error.to_string())
        }
        _ => RelayError::Unavailable(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use solana_sdk::{hash::Hash, message::Message, pubkey::Pubkey, transaction::Transaction};
    use url::Url;

    use super::{JitoBundleRelay, MAX_BUNDLE_TRANSACTIONS, jito_tip_pubkeys};
    use crate::{
        domain::entities::{SignedTransaction, SignedTransactionError},
        ports::relay::{BundleRelay, RelayError},
    };

    fn unsigned_transaction() -> Result<SignedTransaction, SignedTransactionError> {
        SignedTransaction::from_legacy(Transaction::new_unsigned(Message::new_with_blockhash(
            &[],
            None,
            &Hash::new_unique(),
        )))
    }

    #[test]
    fn parses_every_known_tip_account() {
        assert_eq!(jito_tip_pubkeys().len(), 8);
    }

    #[test]
    fn describes_endpoints() {
        let first = Url::parse("https://mainnet.block-engine.jito.wtf/api/v1/bundles");
        let second = Url::parse("https://ny.mainnet.block-engine.jito.wtf/api/v1/bundles");
        assert!(first.is_ok() && second.is_ok());
        if let (Ok(first), Ok(second)) = (first, second) {
            let relay = JitoBundleRelay::new(&[first, second]);
            assert_eq!(relay.endpoint_count(), 2);
            assert_eq!(
                relay.describe(),
                "jito https://mainnet.block-engine.jito.wtf/api/v1/bundles (+1 more)"
            );
            assert_eq!(relay.tip_accounts().len(), 8);
        }
    }

    #[tokio::test]
    async fn oversized_bundle_is_rejected_locally() {
        let relay = JitoBundleRelay::with_tip_accounts(&[], vec![Pubkey::new_unique()]);
        let transaction = unsigned_transaction();
        assert!(transaction.is_ok());
        if let Ok(transaction) = transaction {
            let bundle = vec![transaction; MAX_BUNDLE_TRANSACTIONS.saturating_add(1)];
            assert!(matches!(
                relay.submit_bundle(&bundle).await,
                Err(RelayError::Rejected(_))
            ));
        }
    }

    #[tokio::test]
    async fn no_endpoints_is_unavailable() {
        let relay = JitoBundleRelay::with_tip_accounts(&[], Vec::new());
        let transaction = unsigned_transaction();
        assert!(transaction.is_ok());
        if let Ok(transaction) = transaction {
            assert!(matches!(
                relay.submit_bundle(&[transaction]).await,
                Err(RelayError::Unavailable(_))
            ));
        }
    }
}
