pub mod blockhash_window;
pub mod runtime;
pub mod sol_amount;

pub use blockhash_window::BlockhashWindow;
pub use runtime::{
    CommitmentLevel, IntervalMillis, NonEmptyText, PriorityFeeMicrolamports, StrategyKind,
};
pub use sol_amount::Lamports;
