use std::sync::Arc;

use solana_sdk::signer::Signer;

use crate::{
    domain::{
        entities::SignedTransaction,
        execution_config::ExecutorSettings,
        outcome::{ExecutionErrorKind, ExecutionResult},
        value_objects::{BlockhashWindow, StrategyKind},
    },
    ports::transport::TransactionTransport,
    slices::execution::{
        poller::{ConfirmationPoller, PollVerdict},
        signal::send_signal,
        strategies::{SendContext, SubmissionStrategy},
    },
};

/// Submits an already-signed transaction with one strategy and confirms it
/// within its blockhash window.
pub struct TransactionExecutor {
    transport: Arc<dyn TransactionTransport>,
    strategy: SubmissionStrategy,
    settings: ExecutorSettings,
}

impl TransactionExecutor {
    pub const fn new(
        transport: Arc<dyn TransactionTransport>,
        strategy: SubmissionStrategy,
        settings: ExecutorSettings,
    ) -> Self {
        Self {
            transport,
            strategy,
            settings,
        }
    }

    #[inline(always)]
    pub const fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    #[inline(always)]
    pub const fn settings(&self) -> &ExecutorSettings {
        &self.settings
    }

    /// Runs the strategy's send loop next to the confirmation poller and
    /// returns once the poller has an answer and the send loop has drained.
    ///
    /// `confirmed` is only ever set from what the poller observed.
    pub async fn execute_and_confirm<S>(
        &self,
        transaction: &SignedTransaction,
        signer: &S,
        window: BlockhashWindow,
    ) -> ExecutionResult
    where
        S: Signer + Sync,
    {
        let strategy = self.strategy.kind();
        let Some(signature) = transaction.signature() else {
            log::warn!("EXEC > {} > Transaction is unsigned; nothing sent", strategy);
            return ExecutionResult::unsigned(strategy);
        };

        let transaction_hash = transaction.recent_blockhash();
        if window.reference_hash() != transaction_hash {
            log::warn!(
                "EXEC > {} > Window {} does not belong to blockhash {}; nothing sent",
                signature,
                window,
                transaction_hash
            );
            return ExecutionResult::refused(
                strategy,
                signature,
                ExecutionErrorKind::WindowMismatch {
                    window_hash: window.reference_hash(),
                    transaction_hash,
                },
            );
        }

        log::info!(
            "EXEC > {} > Submitting via {} within window {}",
            signature,
            strategy,
            window
        );

        let transport = self.transport.as_ref();
        let context = SendContext {
            transport,
            transaction,
            signature,
            window,
            signer,
            max_transport_retries: self.settings.max_transport_retries,
        };
        let poller = ConfirmationPoller::new(transport, self.settings);
        let (publisher, mut gate) = send_signal();

        let (verdict, submission) = tokio::join!(
            async {
                let verdict = poller.poll(&signature, &window, &publisher).await;
                publisher.stop();
                verdict
            },
            self.strategy.send(&context, &mut gate),
        );

        let error = match verdict {
            PollVerdict::Confirmed => None,
            PollVerdict::NotLanded(error) => Some(error),
        };

        match &error {
            None => log::info!(
                "EXEC > {} > Confirmed after {} submission attempt(s)",
                signature,
                submission.attempts
            ),
            Some(error) => log::warn!(
                "EXEC > {} > Not confirmed after {} submission attempt(s): {}",
                signature,
                submission.attempts,
                error
            ),
        }

        ExecutionResult {
            confirmed: error.is_none(),
            signature: Some(signature),
            error,
            submission,
        }
    }
}
