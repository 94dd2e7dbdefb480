pub mod executor;
pub mod poller;
pub mod retry;
pub mod signal;
pub mod strategies;

pub use executor::TransactionExecutor;
pub use poller::{ConfirmationPoller, PollVerdict};
pub use strategies::{StrategyError, SubmissionStrategy};
