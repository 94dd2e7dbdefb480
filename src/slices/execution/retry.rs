use crate::domain::outcome::ExecutionErrorKind;

/// Consecutive transport failures tolerated inside one loop before the loop
/// gives up with [`ExecutionErrorKind::TransportUnavailable`].
#[derive(Debug)]
pub struct FailureBudget {
    max_retries: u32,
    consecutive: u32,
}

impl FailureBudget {
    pub const fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            consecutive: 0,
        }
    }

    pub const fn reset(&mut self) {
        self.consecutive = 0;
    }

    pub const fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Records one failure and yields the terminal error once the budget is spent.
    pub fn record(&mut self, last_error: String) -> Option<ExecutionErrorKind> {
        self.consecutive = self.consecutive.saturating_add(1);
        (self.consecutive > self.max_retries).then(|| ExecutionErrorKind::TransportUnavailable {
            attempts: self.consecutive,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::FailureBudget;
    use crate::domain::outcome::ExecutionErrorKind;

    #[test]
    fn allows_configured_retries_then_gives_up() {
        let mut budget = FailureBudget::new(2);
        assert_eq!(budget.record("a".to_owned()), None);
        assert_eq!(budget.record("b".to_owned()), None);
        assert_eq!(
            budget.record("c".to_owned()),
            Some(ExecutionErrorKind::TransportUnavailable {
                attempts: 3,
                last_error: "c".to_owned(),
            })
        );
    }

    #[test]
    fn success_resets_the_count() {
        let mut budget = FailureBudget::new(1);
        assert_eq!(budget.record("a".to_owned()), None);
        budget.reset();
        assert_eq!(budget.consecutive(), 0);
        assert_eq!(budget.record("b".to_owned()), None);
    }

    #[test]
    fn zero_retries_fails_on_first_error() {
        let mut budget = FailureBudget::new(0);
        assert!(budget.record("a".to_owned()).is_some());
    }
}
