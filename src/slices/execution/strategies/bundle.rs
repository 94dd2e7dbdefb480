use std::sync::Arc;

use solana_sdk::{
    message::Message,
    pubkey::Pubkey,
    signature::Signature,
    signer::Signer,
    transaction::Transaction,
};
use solana_system_interface::instruction::transfer;

use crate::{
    domain::{
        entities::SignedTransaction,
        outcome::{ExecutionErrorKind, SubmissionReport},
        value_objects::{Lamports, StrategyKind},
    },
    ports::relay::{BundleRelay, RelayError},
    slices::execution::{
        retry::FailureBudget,
        signal::{GateState, SendGate},
    },
};

use super::{SendContext, TRANSPORT_RETRY_BACKOFF};

/// Submits `[transaction, tip]` to a bundle relay instead of the public
/// broadcast path. A rejected bundle is reported, never resubmitted.
pub struct BundleStrategy {
    relay: Arc<dyn BundleRelay>,
    tip: Lamports,
}

impl BundleStrategy {
    pub const fn new(relay: Arc<dyn BundleRelay>, tip: Lamports) -> Self {
        Self { relay, tip }
    }

    #[inline(always)]
    pub const fn tip(&self) -> Lamports {
        self.tip
    }

    pub async fn send(&self, context: &SendContext<'_>, gate: &mut SendGate) -> SubmissionReport {
        let mut report = SubmissionReport::new(StrategyKind::Bundle);

        let bundle = match self.assemble(context) {
            Ok(bundle) => bundle,
            Err(message) => {
                log::error!("BUNDLE > {} > {}", context.signature, message);
                report.error = Some(ExecutionErrorKind::RelayRejected { message });
                return report;
            }
        };

        let mut failures = FailureBudget::new(context.max_transport_retries);
        loop {
            match gate.check(&context.window) {
                GateState::Open => {}
                GateState::Stopped => break,
                GateState::Expired { observed_height } => {
                    log::debug!(
                        "BUNDLE > {} > Window expired at height {}; not submitting",
                        context.signature,
                        observed_height
                    );
                    break;
                }
            }

            report.record_attempt();
            match self.relay.submit_bundle(&bundle).await {
                Ok(bundle_id) => {
                    log::info!(
                        "BUNDLE > {} > Accepted by {} as bundle {} (tip {})",
                        context.signature,
                        self.relay.describe(),
                        bundle_id,
                        self.tip
                    );
                    report.bundle_id = Some(bundle_id);
                    break;
                }
                Err(RelayError::Rejected(message)) => {
                    log::warn!(
                        "BUNDLE > {} > Rejected by {}: {}",
                        context.signature,
                        self.relay.describe(),
                        message
                    );
                    report.error = Some(ExecutionErrorKind::RelayRejected { message });
                    break;
                }
                Err(RelayError::Unavailable(message)) => {
                    log::warn!("BUNDLE > {} > Relay unreachable: {}", context.signature, message);
                    if let Some(terminal) = failures.record(message) {
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

    fn assemble(&self, context: &SendContext<'_>) -> Result<Vec<SignedTransaction>, String> {
        let tip_account = pick_tip_account(self.relay.tip_accounts(), &context.signature)
            .ok_or_else(|| format!("{} advertises no tip accounts", self.relay.describe()))?;

        let payer = context.signer.pubkey();
        let blockhash = context.transaction.recent_blockhash();
        let message = Message::new_with_blockhash(
            &[transfer(&payer, &tip_account, self.tip.as_u64())],
            Some(&payer),
            &blockhash,
        );

        let mut tip_transaction = Transaction::new_unsigned(message);
        let signer_refs: [&dyn Signer; 1] = [context.signer];
        tip_transaction
            .try_sign(&signer_refs, blockhash)
            .map_err(|error| format!("failed to sign tip transaction: {}", error))?;

        let tip = SignedTransaction::from_legacy(tip_transaction)
            .map_err(|error| format!("failed to encode tip transaction: {}", error))?;

        Ok(vec![context.transaction.clone(), tip])
    }
}

/// Spreads tips over the relay's accounts, keyed by the transaction
/// signature so resubmissions of one transaction stay on one account.
fn pick_tip_account(accounts: &[Pubkey], signature: &Signature) -> Option<Pubkey> {
    let seed = signature
        .as_ref()
        .iter()
        .fold(0_usize, |acc, byte| acc.wrapping_add(usize::from(*byte)));
    let index = seed.checked_rem(accounts.len())?;
    accounts.get(index).copied()
}
