use std::{
    borrow::Borrow,
    fmt::{Display, Formatter},
    num::NonZeroU64,
    sync::Arc,
    time::Duration,
};

use solana_commitment_config::CommitmentConfig;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StrategyKind {
    Direct,
    Escalating,
    Bundle,
}

impl StrategyKind {
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "direct" => Some(Self::Direct),
            "escalating" | "warp" => Some(Self::Escalating),
            "bundle" | "jito" => Some(Self::Bundle),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Escalating => "escalating",
            Self::Bundle => "bundle",
        }
    }
}

impl Display for StrategyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommitmentLevel {
    Processed,
    Confirmed,
    Finalized,
}

impl CommitmentLevel {
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "processed" => Some(Self::Processed),
            "confirmed" => Some(Self::Confirmed),
            "finalized" => Some(Self::Finalized),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }

    pub fn as_commitment_config(self) -> CommitmentConfig {
        match self {
            Self::Processed => CommitmentConfig::processed(),
            Self::Confirmed => CommitmentConfig::confirmed(),
            Self::Finalized => CommitmentConfig::finalized(),
        }
    }
}

impl Display for CommitmentLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct PriorityFeeMicrolamports(u64);

impl PriorityFeeMicrolamports {
    #[inline(always)]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Millisecond interval that is never zero, so timed loops always yield.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct IntervalMillis(NonZeroU64);

impl IntervalMillis {
    pub const MIN: Self = Self(NonZeroU64::MIN);

    /// Const constructor for defaults; zero clamps to [`Self::MIN`].
    pub const fn clamped(value: u64) -> Self {
        match NonZeroU64::new(value) {
            Some(value) => Self(value),
            None => Self::MIN,
        }
    }

    pub fn new(value: u64) -> Result<Self, &'static str> {
        NonZeroU64::new(value)
            .map(Self)
            .ok_or("interval must be greater than 0 ms")
    }

    #[inline(always)]
    pub const fn as_millis(self) -> u64 {
        self.0.get()
    }

    #[inline(always)]
    pub const fn as_duration(self) -> Duration {
        Duration::from_millis(self.0.get())
    }
}

impl Display for IntervalMillis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NonEmptyText(Arc<str>);

impl NonEmptyText {
    pub fn new(value: impl Into<Arc<str>>) -> Result<Self, &'static str> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err("text value must not be empty");
        }

        Ok(Self(value))
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NonEmptyText {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for NonEmptyText {
    #[inline(always)]
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl Display for NonEmptyText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(Arc::<str>::from(value))
    }
}

impl TryFrom<&str> for NonEmptyText {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(Arc::<str>::from(value.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{
        CommitmentLevel, IntervalMillis, NonEmptyText, PriorityFeeMicrolamports, StrategyKind,
    };

    #[test]
    fn parses_strategy_kinds_and_aliases() {
        assert_eq!(StrategyKind::parse("direct"), Some(StrategyKind::Direct));
        assert_eq!(
            StrategyKind::parse("ESCALATING"),
            Some(StrategyKind::Escalating)
        );
        assert_eq!(StrategyKind::parse("warp"), Some(StrategyKind::Escalating));
        assert_eq!(StrategyKind::parse(" bundle "), Some(StrategyKind::Bundle));
        assert_eq!(StrategyKind::parse("jito"), Some(StrategyKind::Bundle));
    }

    #[test]
    fn rejects_unknown_strategy_kind() {
        assert_eq!(StrategyKind::parse("carrier_pigeon"), None);
    }

    #[test]
    fn parses_commitment_levels() {
        assert_eq!(
            CommitmentLevel::parse("Processed"),
            Some(CommitmentLevel::Processed)
        );
        assert_eq!(
            CommitmentLevel::parse("confirmed"),
            Some(CommitmentLevel::Confirmed)
        );
        assert_eq!(
            CommitmentLevel::parse("FINALIZED"),
            Some(CommitmentLevel::Finalized)
        );
        assert_eq!(CommitmentLevel::parse("recent"), None);
    }

    #[test]
    fn interval_must_be_non_zero() {
        assert!(IntervalMillis::new(0).is_err());
        assert_eq!(IntervalMillis::clamped(0), IntervalMillis::MIN);

        let interval = IntervalMillis::new(750);
        assert!(interval.is_ok());
        if let Ok(interval) = interval {
            assert_eq!(interval.as_duration(), Duration::from_millis(750));
            assert_eq!(interval.to_string(), "750ms");
        }
    }

    #[test]
    fn requires_non_empty_text() {
        assert!(NonEmptyText::try_from("keypair.json".to_owned()).is_ok());
        assert!(NonEmptyText::try_from(" ".to_owned()).is_err());
    }

    #[test]
    fn keeps_priority_fee_scalar() {
        let value = PriorityFeeMicrolamports::new(42);
        assert_eq!(value.as_u64(), 42);
        assert!(!value.is_zero());
        assert!(PriorityFeeMicrolamports::default().is_zero());
    }
}
