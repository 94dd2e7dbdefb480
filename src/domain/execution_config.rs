use std::time::Duration;

use url::Url;

use crate::domain::value_objects::{
    IntervalMillis, Lamports, PriorityFeeMicrolamports, StrategyKind,
};

pub const DEFAULT_POLL_INTERVAL: IntervalMillis = IntervalMillis::clamped(1_500);
pub const DEFAULT_SEND_INTERVAL: IntervalMillis = IntervalMillis::clamped(750);
pub const DEFAULT_MAX_TRANSPORT_RETRIES: u32 = 3;
pub const DEFAULT_MAX_WAIT_MS: u64 = 90_000;
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(DEFAULT_MAX_WAIT_MS);

/// Parameters fixed for the lifetime of one submission strategy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrategyConfig {
    pub strategy: StrategyKind,
    /// Priority fee the caller attached to the signed payload. Informational:
    /// no strategy re-prices a signed transaction.
    pub fee: PriorityFeeMicrolamports,
    pub tip: Lamports,
    pub send_interval: IntervalMillis,
    pub relay_urls: Vec<Url>,
}

impl StrategyConfig {
    pub const fn direct() -> Self {
        Self {
            strategy: StrategyKind::Direct,
            fee: PriorityFeeMicrolamports::new(0),
            tip: Lamports::new(0),
            send_interval: DEFAULT_SEND_INTERVAL,
            relay_urls: Vec::new(),
        }
    }

    pub const fn escalating(fee: PriorityFeeMicrolamports, send_interval: IntervalMillis) -> Self {
        Self {
            strategy: StrategyKind::Escalating,
            fee,
            tip: Lamports::new(0),
            send_interval,
            relay_urls: Vec::new(),
        }
    }

    pub const fn bundle(tip: Lamports, relay_urls: Vec<Url>) -> Self {
        Self {
            strategy: StrategyKind::Bundle,
            fee: PriorityFeeMicrolamports::new(0),
            tip,
            send_interval: DEFAULT_SEND_INTERVAL,
            relay_urls,
        }
    }
}

/// Poller-side knobs shared by every strategy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExecutorSettings {
    pub poll_interval: IntervalMillis,
    pub max_transport_retries: u32,
    /// Wall-clock ceiling for a stalled cluster. `None` leaves the blockhash
    /// window as the only bound.
    pub max_wait: Option<Duration>,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_transport_retries: DEFAULT_MAX_TRANSPORT_RETRIES,
            max_wait: Some(DEFAULT_MAX_WAIT),
        }
    }
}
