pub mod bundle;
pub mod direct;
pub mod escalating;

use std::{sync::Arc, time::Duration};

use solana_sdk::{signature::Signature, signer::Signer};
use thiserror::Error;

use crate::{
    domain::{
        entities::SignedTransaction,
        execution_config::StrategyConfig,
        outcome::SubmissionReport,
        value_objects::{BlockhashWindow, StrategyKind},
    },
    ports::{relay::BundleRelay, transport::TransactionTransport},
    slices::execution::signal::SendGate,
};

pub use bundle::BundleStrategy;
pub use direct::DirectStrategy;
pub use escalating::EscalatingStrategy;

/// Pause between retries of a send that failed at the transport level.
pub const TRANSPORT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Debug, Eq, Error, PartialEq)]
pub enum StrategyError {
    #[error("bundle strategy requires a bundle relay")]
    MissingRelay,
}

/// Everything one send loop borrows from the caller for a single execution.
pub struct SendContext<'call> {
    pub transport: &'call dyn TransactionTransport,
    pub transaction: &'call SignedTransaction,
    pub signature: Signature,
    pub window: BlockhashWindow,
    pub signer: &'call (dyn Signer + Sync),
    pub max_transport_retries: u32,
}

pub enum SubmissionStrategy {
    Direct(DirectStrategy),
    Escalating(EscalatingStrategy),
    Bundle(BundleStrategy),
}

impl SubmissionStrategy {
    pub fn from_config(
        config: &StrategyConfig,
        relay: Option<Arc<dyn BundleRelay>>,
    ) -> Result<Self, StrategyError> {
        match config.strategy {
            StrategyKind::Direct => Ok(Self::Direct(DirectStrategy)),
            StrategyKind::Escalating => {
                Ok(Self::Escalating(EscalatingStrategy::new(config.send_interval)))
            }
            StrategyKind::Bundle => {
                let relay = relay.ok_or(StrategyError::MissingRelay)?;
                Ok(Self::Bundle(BundleStrategy::new(relay, config.tip)))
            }
        }
    }

    pub const fn kind(&self) -> StrategyKind {
        match self {
            Self::Direct(_) => StrategyKind::Direct,
            Self::Escalating(_) => StrategyKind::Escalating,
            Self::Bundle(_) => StrategyKind::Bundle,
        }
    }

    /// Runs the send side until it has nothing left to do or the gate closes.
    /// The returned report never decides the execution outcome.
    pub async fn send(&self, context: &SendContext<'_>, gate: &mut SendGate) -> SubmissionReport {
        match self {
            Self::Direct(strategy) => strategy.send(context, gate).await,
            Self::Escalating(strategy) => strategy.send(context, gate).await,
            Self::Bundle(strategy) => strategy.send(context, gate).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StrategyError, SubmissionStrategy};
    use crate::domain::{
        execution_config::StrategyConfig,
        value_objects::{IntervalMillis, Lamports, PriorityFeeMicrolamports, StrategyKind},
    };

    #[test]
    fn builds_variant_from_config() {
        let direct = SubmissionStrategy::from_config(&StrategyConfig::direct(), None);
        assert!(matches!(&direct, Ok(strategy) if strategy.kind() == StrategyKind::Direct));
    }

    #[test]
    fn escalating_takes_its_send_interval_from_config() {
        let config = StrategyConfig::escalating(
            PriorityFeeMicrolamports::new(10_000),
            IntervalMillis::clamped(400),
        );
        let escalating = SubmissionStrategy::from_config(&config, None);
        assert!(matches!(
            &escalating,
            Ok(SubmissionStrategy::Escalating(strategy))
                if strategy.send_interval() == IntervalMillis::clamped(400)
        ));
    }

    #[test]
    fn bundle_without_relay_is_rejected() {
        let config = StrategyConfig::bundle(Lamports::new(1_000), Vec::new());
        let bundle = SubmissionStrategy::from_config(&config, None);
        assert!(matches!(bundle, Err(StrategyError::MissingRelay)));
    }
}
