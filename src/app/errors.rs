use std::path::PathBuf;

use solana_client::client_error::ClientError;
use thiserror::Error;

use crate::{
    app::logging::LoggingError,
    domain::{entities::SignedTransactionError, settings::SettingsError},
    slices::execution::StrategyError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Keypair(#[from] KeypairLoadError),
    #[error(transparent)]
    Blockhash(#[from] BlockhashFetchError),
    #[error(transparent)]
    Probe(#[from] ProbeBuildError),
    #[error(transparent)]
    Strategy(#[from] StrategyError),
    #[error("transaction {signature} was not confirmed: {reason}")]
    NotConfirmed { signature: String, reason: String },
}

#[derive(Debug, Error)]
pub enum KeypairLoadError {
    #[error("failed to open keypair file at {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read keypair file at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse keypair json at {path}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid keypair bytes at {path}")]
    InvalidBytes {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Error)]
pub enum BlockhashFetchError {
    #[error("failed to fetch latest blockhash")]
    Read {
        #[source]
        source: ClientError,
    },
}

#[derive(Debug, Error)]
pub enum ProbeBuildError {
    #[error("failed to sign probe transaction")]
    Sign {
        #[source]
        source: solana_sdk::signer::SignerError,
    },
    #[error("failed to encode probe transaction")]
    Encode {
        #[source]
        source: SignedTransactionError,
    },
}
