//! Event capability
//!
//! Every unit of work the engine dispatches implements the [`Event`] trait:
//! a logical timestamp, a display name, and a `dispatch` operation that
//! mutates the simulation context and returns zero or more follow-on
//! events. Events never touch the queue directly - the engine that invoked
//! them schedules whatever they return.
//!
//! # Error contract
//!
//! Dispatch separates simulation-control signals from genuine defects:
//!
//! - [`EventError::Stop`] - end the run now, by design → engine STOPPED
//! - [`EventError::Abort`] - modeled failure, the run cannot continue →
//!   engine ABORTED
//! - [`EventError::Internal`] - unmodeled defect; the engine never absorbs
//!   it and `run()` hands it back to the caller

use thiserror::Error;

/// Logical simulation time.
///
/// Advanced only by event timestamps, unrelated to wall-clock time.
pub type Timestamp = u64;

/// Errors raised by an event's dispatch logic.
///
/// `Stop` and `Abort` are control signals the engine translates into
/// terminal run-states. `Internal` carries anything else: the engine does
/// not catch it, and `run()` returns it to the caller with the run-state
/// left as it was before the dispatch.
#[derive(Debug, Error)]
pub enum EventError {
    /// The simulation should end now, by design, not because of a failure.
    #[error("stop requested: {0}")]
    Stop(String),

    /// An expected, modeled failure after which this run cannot
    /// meaningfully continue.
    #[error("dispatch aborted: {0}")]
    Abort(String),

    /// An unmodeled defect in the event's own logic.
    #[error(transparent)]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Follow-on events produced by a single dispatch, in scheduling order.
pub type FollowOns<C> = Vec<Box<dyn Event<C>>>;

/// The schedulable capability.
///
/// `C` is the simulation context: the bag of domain state the engine owns
/// and lends to every dispatch. The engine imposes no shape on it - the
/// ledger collaborator uses its chart of accounts, tests use whatever
/// recording scaffold they need, `()` works for pure time-markers.
///
/// An event is consumed exactly once: the engine pops it, dispatches it,
/// and discards it. Events are never reused or rescheduled automatically.
pub trait Event<C>: std::fmt::Debug {
    /// The logical time at which this event is eligible to run.
    fn timestamp(&self) -> Timestamp;

    /// Display identifier. Never participates in ordering or scheduling.
    fn name(&self) -> &str;

    /// Execute the event against the simulation context.
    ///
    /// Side effects on `ctx` are unconstrained and non-transactional: a
    /// dispatch that fails midway leaves any already-applied effects in
    /// place. Returns the finite sequence of newly-created events the
    /// engine should schedule, each at its own timestamp.
    fn dispatch(&mut self, ctx: &mut C) -> Result<FollowOns<C>, EventError>;
}

/// The base event: carries a timestamp and a name, does nothing, yields no
/// follow-on events. Useful as a pure time-marker.
///
/// # Example
/// ```
/// use ledger_sim_core::{Engine, EngineState, NoopEvent};
///
/// let mut engine = Engine::new("demo", ());
/// engine.schedule(Box::new(NoopEvent::new(3, "heartbeat")));
/// engine.run(None).unwrap();
///
/// assert_eq!(engine.now(), 3);
/// assert!(engine.is_state(EngineState::Finished));
/// ```
#[derive(Debug, Clone)]
pub struct NoopEvent {
    timestamp: Timestamp,
    name: String,
}

impl NoopEvent {
    /// Create a no-op event at the given logical time.
    pub fn new(timestamp: Timestamp, name: impl Into<String>) -> Self {
        Self {
            timestamp,
            name: name.into(),
        }
    }
}

impl<C> Event<C> for NoopEvent {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn dispatch(&mut self, _ctx: &mut C) -> Result<FollowOns<C>, EventError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_event_yields_nothing() {
        let mut event = NoopEvent::new(7, "marker");
        let follow_ons = event.dispatch(&mut ()).unwrap();

        assert!(follow_ons.is_empty());
        assert_eq!(Event::<()>::timestamp(&event), 7);
        assert_eq!(Event::<()>::name(&event), "marker");
    }

    #[test]
    fn test_event_error_messages() {
        let stop = EventError::Stop("closing time".to_string());
        assert_eq!(stop.to_string(), "stop requested: closing time");

        let abort = EventError::Abort("books do not balance".to_string());
        assert_eq!(abort.to_string(), "dispatch aborted: books do not balance");
    }
}
