//! Double-entry bookkeeping domain model
//!
//! The first consumer of the event contract: accounts with kind-dependent
//! debit/credit semantics, a chart of accounts that owns them, and
//! transactions that apply balanced sets of line items when the engine
//! dispatches them. Contributes no scheduling logic of its own.

pub mod account;
pub mod chart;
pub mod transaction;

// Re-exports
pub use account::{Account, AccountKind, NormalBalance, ParseAccountKindError};
pub use chart::ChartOfAccounts;
pub use transaction::{Transaction, TransactionItem};
