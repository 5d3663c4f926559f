//! Scheduler - the event queue, run-state machine, and dispatch loop
//!
//! See `engine.rs` for the run loop and `log.rs` for the dispatch log.

pub mod engine;
pub mod log;

// Re-export main types for convenience
pub use engine::{Engine, EngineError, EngineState, EngineStatus};
pub use log::{DispatchLog, DispatchOutcome, DispatchRecord};
