//! Ledger Sim Core - Discrete-Event Simulation Kernel
//!
//! Event-driven simulation engine with a double-entry bookkeeping domain
//! model as its first consumer.
//!
//! # Architecture
//!
//! - **events**: the schedulable capability (timestamp + name + dispatch)
//! - **scheduler**: the engine - priority queue, logical clock, run-state
//!   machine, dispatch log
//! - **accounting**: accounts, chart of accounts, transactions-as-events
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (cents)
//! 2. Logical time advances only to the timestamp of the event being
//!    dispatched - never by wall clock
//! 3. Events never touch the queue directly; they only return new events
//!    for the engine that invoked them to schedule

// Module declarations
pub mod accounting;
pub mod events;
pub mod scheduler;

// Re-exports for convenience
pub use accounting::{
    account::{Account, AccountKind, NormalBalance, ParseAccountKindError},
    chart::ChartOfAccounts,
    transaction::{Transaction, TransactionItem},
};
pub use events::event::{Event, EventError, FollowOns, NoopEvent, Timestamp};
pub use scheduler::{
    engine::{Engine, EngineError, EngineState, EngineStatus},
    log::{DispatchLog, DispatchOutcome, DispatchRecord},
};
