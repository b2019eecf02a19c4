mod enums;
mod order;
mod serde_helpers;
mod transaction;

// Re-export all types
pub use enums::*;
pub use order::*;
pub use transaction::*;

pub(crate) use serde_helpers::{deserialize_quantity, deserialize_quantity_u64};
