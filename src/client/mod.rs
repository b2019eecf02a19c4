mod submitter;

pub use submitter::{PendingTransaction, TransactionSubmitter};
