use std::{path::PathBuf, sync::Arc};

use solana_sdk::{
    message::Message,
    signature::Keypair,
    signer::Signer,
    transaction::Transaction,
};
use solana_system_interface::instruction::transfer;
use tokio::{fs::File, io::AsyncReadExt};

use crate::{
    adapters::{JitoBundleRelay, RpcTransport},
    app::{
        errors::{AppError, BlockhashFetchError, KeypairLoadError, ProbeBuildError},
        logging::{init_logging, resolve_level_filter},
    },
    domain::{
        entities::SignedTransaction,
        outcome::ExecutionResult,
        settings::RuntimeSettings,
        value_objects::{BlockhashWindow, CommitmentLevel, StrategyKind},
    },
    ports::relay::BundleRelay,
    slices::execution::{SubmissionStrategy, TransactionExecutor},
};

pub async fn run() {
    if let Err(error) = run_inner().await {
        log::error!("{}", error);
        eprintln!("{}", error);
        std::process::exit(1);
    }
}

async fn run_inner() -> Result<(), AppError> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    let rust_log = std::env::var("RUST_LOG").ok();
    init_logging(resolve_level_filter(rust_log.as_deref())).await?;

    log::info!("Slotland runtime");

    let settings = RuntimeSettings::from_cli_args(&args)?;
    let keypair = load_keypair(settings.keypair_path.as_str()).await?;

    let transport = Arc::new(RpcTransport::new(
        settings.rpc_url.as_str().to_owned(),
        settings.commitment,
    ));

    let relay: Option<Arc<dyn BundleRelay>> = match settings.strategy.strategy {
        StrategyKind::Bundle => Some(Arc::new(JitoBundleRelay::new(
            &settings.strategy.relay_urls,
        ))),
        StrategyKind::Direct | StrategyKind::Escalating => None,
    };
    let relay_description = relay
        .as_ref()
        .map_or_else(|| "(none)".to_owned(), |relay| relay.describe());
    let strategy = SubmissionStrategy::from_config(&settings.strategy, relay)?;

    log::info!(
        "Settings: \
\n\tWallet: {}\
\n\tRPC_URL: {}\
\n\tCOMMITMENT: {}\
\n\tSTRATEGY: {}\
\n\tPRIORITY_FEES: {} µLamports\
\n\tSEND_INTERVAL: {}\
\n\tPOLL_INTERVAL: {}\
\n\tMAX_TRANSPORT_RETRIES: {}\
\n\tMAX_WAIT: {}\
\n\tRELAY: {}\
\n\tTIP: {}\
\n\tPROBE: {}",
        keypair.pubkey(),
        settings.rpc_url,
        settings.commitment,
        settings.strategy.strategy,
        settings.fee_plan.compute_unit_price().as_u64(),
        settings.strategy.send_interval,
        settings.executor.poll_interval,
        settings.executor.max_transport_retries,
        settings
            .executor
            .max_wait
            .map_or_else(|| "disabled".to_owned(), |max_wait| format!("{:?}", max_wait)),
        relay_description,
        settings.strategy.tip,
        settings.probe_lamports,
    );

    let (blockhash, last_valid_height) = transport
        .rpc()
        .get_latest_blockhash_with_commitment(settings.commitment.as_commitment_config())
        .await
        .map_err(|source| BlockhashFetchError::Read { source })?;
    let window = BlockhashWindow::new(blockhash, last_valid_height);

    let probe = build_probe(&keypair, &settings, &window)?;
    let executor = TransactionExecutor::new(transport, strategy, settings.executor);
    let result = executor.execute_and_confirm(&probe, &keypair, window).await;

    if let Some(bundle_id) = result.submission.bundle_id.as_ref() {
        log::info!("Bundle id: {}", bundle_id);
    }
    if let Some(error) = result.submission.error.as_ref() {
        log::warn!("Submission side reported: {}", error);
    }

    settle(&result, settings.commitment)
}

fn settle(result: &ExecutionResult, commitment: CommitmentLevel) -> Result<(), AppError> {
    match &result.error {
        None => {
            log::info!(
                "Probe {} confirmed at {} commitment",
                result.signature_string(),
                commitment
            );
            Ok(())
        }
        Some(error) => Err(AppError::NotConfirmed {
            signature: result.signature_string(),
            reason: error.to_string(),
        }),
    }
}

/// Self-transfer carrying the configured compute budget, signed against the
/// window's reference blockhash.
fn build_probe(
    keypair: &Keypair,
    settings: &RuntimeSettings,
    window: &BlockhashWindow,
) -> Result<SignedTransaction, ProbeBuildError> {
    let payer = keypair.pubkey();
    let instructions = settings.fee_plan.apply(vec![transfer(
        &payer,
        &payer,
        settings.probe_lamports.as_u64(),
    )]);

    let blockhash = window.reference_hash();
    let message = Message::new_with_blockhash(&instructions, Some(&payer), &blockhash);
    let mut transaction = Transaction::new_unsigned(message);
    let signer_refs: [&dyn Signer; 1] = [keypair];
    transaction
        .try_sign(&signer_refs, blockhash)
        .map_err(|source| ProbeBuildError::Sign { source })?;

    SignedTransaction::from_legacy(transaction).map_err(|source| ProbeBuildError::Encode { source })
}

async fn load_keypair(path: &str) -> Result<Keypair, KeypairLoadError> {
    let path_buf = PathBuf::from(path);
    let mut keypair_file = File::open(&path_buf)
        .await
        .map_err(|source| KeypairLoadError::Open {
            path: path_buf.clone(),
            source,
        })?;

    let mut contents = String::new();
    keypair_file
        .read_to_string(&mut contents)
        .await
        .map_err(|source| KeypairLoadError::Read {
            path: path_buf.clone(),
            source,
        })?;

    let keypair_bytes = serde_json::from_str::<Vec<u8>>(&contents).map_err(|source| {
        KeypairLoadError::ParseJson {
            path: path_buf.clone(),
            source,
        }
    })?;

    Keypair::try_from(keypair_bytes.as_slice()).map_err(|error| KeypairLoadError::InvalidBytes {
        path: path_buf,
        source: error.into(),
    })
}

#[cfg(test)]
mod tests {
    use solana_sdk::{hash::Hash, signature::Keypair};

    use solana_sdk::signature::Signature;

    use super::{build_probe, load_keypair, settle};
    use crate::{
        app::errors::{AppError, KeypairLoadError},
        domain::{
            config::parse_slotland_config_toml,
            outcome::{ExecutionErrorKind, ExecutionResult, SubmissionReport},
            settings::RuntimeSettings,
            value_objects::{BlockhashWindow, CommitmentLevel, StrategyKind},
        },
    };

    #[tokio::test]
    async fn missing_keypair_file_is_reported_with_path() {
        let result = load_keypair("/nonexistent/slotland/keypair.json").await;
        assert!(matches!(result, Err(KeypairLoadError::Open { .. })));
    }

    #[test]
    fn probe_is_signed_against_window_blockhash() {
        let parsed = parse_slotland_config_toml(
            r#"
[runtime]
keypair_path = "keypair.json"
rpc_url = "https://api.mainnet-beta.solana.com"

[execution]
priority_fee_microlamports = 10000
"#,
        );
        assert!(parsed.is_ok());
        let Ok(parsed) = parsed else {
            return;
        };
        let settings =
            RuntimeSettings::from_parsed_config(&[], "slotland.toml".to_owned(), &parsed);
        assert!(settings.is_ok());
        let Ok(settings) = settings else {
            return;
        };

        let keypair = Keypair::new();
        let window = BlockhashWindow::new(Hash::new_unique(), 1_000);
        let probe = build_probe(&keypair, &settings, &window);

        assert!(probe.is_ok());
        if let Ok(probe) = probe {
            assert!(probe.is_signed());
            assert_eq!(probe.recent_blockhash(), window.reference_hash());
        }
    }

    #[test]
    fn unconfirmed_result_fails_with_signature_and_reason() {
        let signature = Signature::new_unique();
        let result = ExecutionResult {
            confirmed: false,
            signature: Some(signature),
            error: Some(ExecutionErrorKind::BlockhashExpired {
                last_valid_height: 100,
                observed_height: 101,
            }),
            submission: SubmissionReport::new(StrategyKind::Direct),
        };

        let settled = settle(&result, CommitmentLevel::Confirmed);
        assert!(matches!(
            settled,
            Err(AppError::NotConfirmed { signature: ref reported, ref reason })
                if *reported == signature.to_string() && reason.contains("blockhash expired")
        ));
    }

    #[test]
    fn confirmed_result_settles() {
        let result = ExecutionResult {
            confirmed: true,
            signature: Some(Signature::new_unique()),
            error: None,
            submission: SubmissionReport::new(StrategyKind::Escalating),
        };

        assert!(settle(&result, CommitmentLevel::Confirmed).is_ok());
    }
}
