//! Shared primitive types used across the entire engine.

/// An opaque account identity. Accounts exist only as graph nodes.
pub type AccountId = String;

/// A stable, unique identifier for a recorded transaction.
pub type TxId = String;

/// The identity scope for all session state.
pub type Username = String;

/// Maximum number of transactions kept in the history ledger.
pub const HISTORY_CAPACITY: usize = 100;

/// Maximum number of alerts kept in the alert log.
pub const ALERT_CAPACITY: usize = 10;
