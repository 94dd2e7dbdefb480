use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::domain::{entities::SignedTransaction, outcome::BundleId};

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RelayError {
    #[error("relay rejected bundle: {0}")]
    Rejected(String),
    #[error("relay unreachable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait BundleRelay: Send + Sync {
    fn describe(&self) -> String;

    /// Accounts the relay accepts tips on. Never empty for a usable relay.
    fn tip_accounts(&self) -> &[Pubkey];

    /// Submits an ordered bundle; the relay lands all of it or none of it.
    async fn submit_bundle(&self, bundle: &[SignedTransaction]) -> Result<BundleId, RelayError>;
}
