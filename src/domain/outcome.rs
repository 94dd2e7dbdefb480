use std::fmt::{Display, Formatter};

use solana_sdk::{hash::Hash, signature::Signature};
use thiserror::Error;

use crate::domain::value_objects::StrategyKind;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ExecutionErrorKind {
    #[error("transaction carries no signature")]
    Unsigned,
    #[error("window blockhash {window_hash} does not match transaction blockhash {transaction_hash}")]
    WindowMismatch {
        window_hash: Hash,
        transaction_hash: Hash,
    },
    #[error("blockhash expired: height {observed_height} passed last valid height {last_valid_height}")]
    BlockhashExpired {
        last_valid_height: u64,
        observed_height: u64,
    },
    #[error("transaction failed on-chain: {reason}")]
    OnChainFailure { reason: String },
    #[error("transport unavailable after {attempts} attempts: {last_error}")]
    TransportUnavailable { attempts: u32, last_error: String },
    #[error("transaction refused by the send path: {message}")]
    SendRejected { message: String },
    #[error("bundle rejected by relay: {message}")]
    RelayRejected { message: String },
    #[error("no terminal status within {elapsed_ms}ms wall-clock ceiling")]
    DeadlineExceeded { elapsed_ms: u64 },
}

impl ExecutionErrorKind {
    /// Whether resubmitting the same signed bytes can still succeed. Expired
    /// and failed transactions have to be rebuilt and re-signed first.
    pub const fn is_resubmittable(&self) -> bool {
        matches!(
            self,
            Self::TransportUnavailable { .. } | Self::DeadlineExceeded { .. }
        )
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BundleId(String);

impl BundleId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BundleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the send side did during one execution. Informational only: it never
/// decides whether the transaction landed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmissionReport {
    pub strategy: StrategyKind,
    pub attempts: u32,
    pub bundle_id: Option<BundleId>,
    pub error: Option<ExecutionErrorKind>,
}

impl SubmissionReport {
    pub const fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            attempts: 0,
            bundle_id: None,
            error: None,
        }
    }

    pub const fn record_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExecutionResult {
    pub confirmed: bool,
    pub signature: Option<Signature>,
    pub error: Option<ExecutionErrorKind>,
    pub submission: SubmissionReport,
}

impl ExecutionResult {
    pub(crate) const fn unsigned(strategy: StrategyKind) -> Self {
        Self {
            confirmed: false,
            signature: None,
            error: Some(ExecutionErrorKind::Unsigned),
            submission: SubmissionReport::new(strategy),
        }
    }

    /// Refused before anything was sent.
    pub(crate) const fn refused(
        strategy: StrategyKind,
        signature: Signature,
        error: ExecutionErrorKind,
    ) -> Self {
        Self {
            confirmed: false,
            signature: Some(signature),
            error: Some(error),
            submission: SubmissionReport::new(strategy),
        }
    }

    pub fn signature_string(&self) -> String {
        self.signature
            .map_or_else(|| "(unsigned)".to_owned(), |signature| signature.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{ExecutionErrorKind, ExecutionResult, SubmissionReport};
    use crate::domain::value_objects::StrategyKind;

    #[test]
    fn only_transport_and_deadline_failures_are_resubmittable() {
        assert!(
            ExecutionErrorKind::TransportUnavailable {
                attempts: 3,
                last_error: "connection reset".to_owned(),
            }
            .is_resubmittable()
        );
        assert!(ExecutionErrorKind::DeadlineExceeded { elapsed_ms: 1 }.is_resubmittable());
        assert!(!ExecutionErrorKind::Unsigned.is_resubmittable());
        assert!(
            !ExecutionErrorKind::SendRejected {
                message: "Blockhash not found".to_owned(),
            }
            .is_resubmittable()
        );
        assert!(
            !ExecutionErrorKind::BlockhashExpired {
                last_valid_height: 100,
                observed_height: 101,
            }
            .is_resubmittable()
        );
    }

    #[test]
    fn attempts_saturate() {
        let mut report = SubmissionReport::new(StrategyKind::Escalating);
        report.attempts = u32::MAX;
        report.record_attempt();
        assert_eq!(report.attempts, u32::MAX);
    }

    #[test]
    fn unsigned_result_is_terminal_failure() {
        let result = ExecutionResult::unsigned(StrategyKind::Direct);
        assert!(!result.confirmed);
        assert_eq!(result.error, Some(ExecutionErrorKind::Unsigned));
        assert_eq!(result.submission.attempts, 0);
        assert_eq!(result.signature_string(), "(unsigned)");
    }
}
