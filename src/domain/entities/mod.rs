pub mod signed_transaction;

pub use signed_transaction::{SignedTransaction, SignedTransactionError};
