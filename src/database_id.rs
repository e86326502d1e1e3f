//! Database ID type definition.

/// Alias for the integer type used for mapping to transaction IDs.
pub type TransactionId = i64;
