use crate::{
    domain::{
        outcome::{ExecutionErrorKind, SubmissionReport},
        value_objects::StrategyKind,
    },
    slices::execution::{
        retry::FailureBudget,
        signal::{GateState, SendGate},
    },
};

use super::{SendContext, TRANSPORT_RETRY_BACKOFF};

/// One broadcast through the standard RPC send path. Landing is left entirely
/// to the poller and the blockhash window.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectStrategy;

impl DirectStrategy {
    pub async fn send(&self, context: &SendContext<'_>, gate: &mut SendGate) -> SubmissionReport {
        let mut report = SubmissionReport::new(StrategyKind::Direct);
        let mut failures = FailureBudget::new(context.max_transport_retries);

        loop {
            match gate.check(&context.window) {
                GateState::Open => {}
                GateState::Stopped => break,
                GateState::Expired { observed_height } => {
                    log::debug!(
                        "DIRECT > {} > Window expired at height {}; not sending",
                        context.signature,
                        observed_height
                    );
                    break;
                }
            }

            report.record_attempt();
            match context
                .transport
                .send_raw_transaction(context.transaction.wire_bytes())
                .await
            {
                Ok(signature) => {
                    log::info!("DIRECT > {} > Broadcast accepted", signature);
                    break;
                }
                Err(error) if !error.is_transient() => {
                    log::warn!("DIRECT > {} > Broadcast refused: {}", context.signature, error);
                    report.error = Some(ExecutionErrorKind::SendRejected {
                        message: error.to_string(),
                    });
                    break;
                }
                Err(error) => {
                    log::warn!("DIRECT > {} > Broadcast failed: {}", context.signature, error);
                    if let Some(terminal) = failures.record(error.to_string()) {
                        report.error = Some(terminal);
                        break;
                    }
                    if !gate.pause(TRANSPORT_RETRY_BACKOFF).await {
                        break;
                    }
                }
            }
        }

        report
    }
}
