use crate::{
    domain::{
        outcome::{ExecutionErrorKind, SubmissionReport},
        value_objects::{IntervalMillis, StrategyKind},
    },
    slices::execution::{
        retry::FailureBudget,
        signal::{GateState, SendGate},
    },
};

use super::SendContext;

/// Rebroadcasts the identical signed payload every `send_interval` until the
/// poller resolves or the window closes.
///
/// Resending the same bytes is safe: the cluster deduplicates by signature,
/// and the payload and blockhash never change between attempts. The priority
/// fee is part of the signed payload, attached when the caller built it.
#[derive(Clone, Copy, Debug)]
pub struct EscalatingStrategy {
    send_interval: IntervalMillis,
}

impl EscalatingStrategy {
    pub const fn new(send_interval: IntervalMillis) -> Self {
        Self { send_interval }
    }

    #[inline(always)]
    pub const fn send_interval(&self) -> IntervalMillis {
        self.send_interval
    }

    pub async fn send(&self, context: &SendContext<'_>, gate: &mut SendGate) -> SubmissionReport {
        let mut report = SubmissionReport::new(StrategyKind::Escalating);
        let mut failures = FailureBudget::new(context.max_transport_retries);

        log::debug!(
            "ESCALATING > {} > Resending every {}",
            context.signature,
            self.send_interval
        );

        loop {
            match gate.check(&context.window) {
                GateState::Open => {}
                GateState::Stopped => break,
                GateState::Expired { observed_height } => {
                    log::debug!(
                        "ESCALATING > {} > Window expired at height {} after {} sends",
                        context.signature,
                        observed_height,
                        report.attempts
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
                Ok(_) => {
                    failures.reset();
                    log::trace!(
                        "ESCALATING > {} > Send #{} accepted",
                        context.signature,
                        report.attempts
                    );
                }
                Err(error) if !error.is_transient() => {
                    log::warn!(
                        "ESCALATING > {} > Send refused, stopping resends: {}",
                        context.signature,
                        error
                    );
                    report.error = Some(ExecutionErrorKind::SendRejected {
                        message: error.to_string(),
                    });
                    break;
                }
                Err(error) => {
                    log::warn!(
                        "ESCALATING > {} > Send #{} failed: {}",
                        context.signature,
                        report.attempts,
                        error
                    );
                    if let Some(terminal) = failures.record(error.to_string()) {
                        report.error = Some(terminal);
                        break;
                    }
                }
            }

            if !gate.pause(self.send_interval.as_duration()).await {
                break;
            }
        }

        report
    }
}
