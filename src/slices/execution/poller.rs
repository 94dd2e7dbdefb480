use std::time::Instant;

use solana_sdk::signature::Signature;

use crate::{
    domain::{
        execution_config::ExecutorSettings, outcome::ExecutionErrorKind,
        value_objects::BlockhashWindow,
    },
    ports::transport::{TransactionStatus, TransactionTransport},
    slices::execution::{retry::FailureBudget, signal::SignalPublisher},
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PollVerdict {
    Confirmed,
    NotLanded(ExecutionErrorKind),
}

impl PollVerdict {
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

pub struct ConfirmationPoller<'transport> {
    transport: &'transport dyn TransactionTransport,
    settings: ExecutorSettings,
}

impl<'transport> ConfirmationPoller<'transport> {
    pub const fn new(
        transport: &'transport dyn TransactionTransport,
        settings: ExecutorSettings,
    ) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Polls status and block height together until a terminal answer, window
    /// expiry, exhausted transport retries or the wall-clock ceiling.
    ///
    /// A confirmation observed in the same round as an expired height wins.
    pub async fn poll(
        &self,
        signature: &Signature,
        window: &BlockhashWindow,
        publisher: &SignalPublisher,
    ) -> PollVerdict {
        let started_at = Instant::now();
        let mut failures = FailureBudget::new(self.settings.max_transport_retries);

        loop {
            let (height, status) = tokio::join!(
                self.transport.get_block_height(),
                self.transport.get_transaction_status(signature),
            );

            match status {
                Ok(TransactionStatus::Confirmed) => {
                    log::debug!("POLL > {} > Confirmed", signature);
                    return PollVerdict::Confirmed;
                }
                Ok(TransactionStatus::Failed(reason)) => {
                    log::debug!("POLL > {} > Failed on-chain: {}", signature, reason);
                    return PollVerdict::NotLanded(ExecutionErrorKind::OnChainFailure { reason });
                }
                Ok(TransactionStatus::Pending) => match height {
                    Ok(height) => {
                        failures.reset();
                        if window.is_expired(height) {
                            log::debug!(
                                "POLL > {} > Height {} passed last valid height {}",
                                signature,
                                height,
                                window.last_valid_height()
                            );
                            return PollVerdict::NotLanded(ExecutionErrorKind::BlockhashExpired {
                                last_valid_height: window.last_valid_height(),
                                observed_height: height,
                            });
                        }
                        publisher.observe_height(height);
                        log::trace!("POLL > {} > Pending at height {}", signature, height);
                    }
                    Err(error) => {
                        if let Some(verdict) =
                            record_failure(signature, &mut failures, error.to_string())
                        {
                            return verdict;
                        }
                    }
                },
                Err(error) => {
                    if let Ok(height) = height {
                        if window.is_expired(height) {
                            log::debug!(
                                "POLL > {} > Height {} passed last valid height {} while status was unreadable",
                                signature,
                                height,
                                window.last_valid_height()
                            );
                            return PollVerdict::NotLanded(ExecutionErrorKind::BlockhashExpired {
                                last_valid_height: window.last_valid_height(),
                                observed_height: height,
                            });
                        }
                        publisher.observe_height(height);
                    }
                    if let Some(verdict) =
                        record_failure(signature, &mut failures, error.to_string())
                    {
                        return verdict;
                    }
                }
            }

            if let Some(max_wait) = self.settings.max_wait {
                let elapsed = started_at.elapsed();
                if elapsed >= max_wait {
                    log::warn!(
                        "POLL > {} > No terminal status after {:?}; giving up",
                        signature,
                        elapsed
                    );
                    return PollVerdict::NotLanded(ExecutionErrorKind::DeadlineExceeded {
                        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    });
                }
            }

            tokio::time::sleep(self.settings.poll_interval.as_duration()).await;
        }
    }
}

fn record_failure(
    signature: &Signature,
    failures: &mut FailureBudget,
    last_error: String,
) -> Option<PollVerdict> {
    log::warn!(
        "POLL > {} > Transport error ({}/{}): {}",
        signature,
        failures.consecutive().saturating_add(1),
        failures.max_retries(),
        last_error
    );

    failures.record(last_error).map(|error| {
        log::error!("POLL > {} > Giving up: {}", signature, error);
        PollVerdict::NotLanded(error)
    })
}
