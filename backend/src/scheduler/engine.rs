//! The event-driven simulation engine
//!
//! The engine owns a min-priority queue of pending events ordered by
//! timestamp, the logical clock, and the run-state machine. `run` pops the
//! earliest event, advances the clock to its timestamp, dispatches it,
//! schedules everything it returns, and repeats until the queue drains or
//! a stop condition is reached.
//!
//! # Run-state machine
//!
//! ```text
//! WAITING ──run()──▶ RUNNING ──▶ FINISHED   queue exhausted
//!                       │──────▶ STOPPED    stop-time exceeded, or an
//!                       │                   event requested a stop
//!                       └──────▶ ABORTED    an event signaled a modeled
//!                                           failure
//! ```
//!
//! PAUSED is reserved for externally-initiated suspension (see
//! [`Engine::pause`]); the run loop never sets it. Unmodeled defects are
//! not part of the state machine: they propagate out of `run()` with the
//! status left as it was before the dispatch.
//!
//! # Example
//!
//! ```
//! use ledger_sim_core::{Engine, EngineState, NoopEvent};
//!
//! let mut engine = Engine::new("demo", ());
//! engine.schedule(Box::new(NoopEvent::new(1, "open")));
//! engine.schedule(Box::new(NoopEvent::new(5, "close")));
//!
//! // Halt once the next event would run past t=3.
//! engine.run(Some(3)).unwrap();
//!
//! assert!(engine.is_state(EngineState::Stopped));
//! assert_eq!(engine.now(), 3);
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::{Event, EventError, Timestamp};
use crate::scheduler::log::{DispatchLog, DispatchOutcome, DispatchRecord};

// ============================================================================
// Run-state machine
// ============================================================================

/// Enumeration of allowed engine run-states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineState {
    /// Freshly constructed, nothing dispatched yet.
    Waiting,

    /// Actively dispatching events.
    Running,

    /// Queue exhausted normally.
    Finished,

    /// Halted by the stop-time limit, or by an event requesting a
    /// controlled stop.
    Stopped,

    /// Halted because an event signaled a modeled failure.
    Aborted,

    /// Externally-initiated suspension. Never set by the run loop.
    Paused,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Waiting => "WAITING",
            EngineState::Running => "RUNNING",
            EngineState::Finished => "FINISHED",
            EngineState::Stopped => "STOPPED",
            EngineState::Aborted => "ABORTED",
            EngineState::Paused => "PAUSED",
        };
        f.write_str(name)
    }
}

/// Current engine status: the run-state plus the message explaining how it
/// was entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    /// The run-state.
    pub state: EngineState,

    /// Human-readable reason for the most recent transition.
    pub message: String,
}

/// Errors returned by [`Engine::run`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// `run` was called while the engine was already RUNNING - either a
    /// re-entrant call, or an attempt to resume after a defect left the
    /// run interrupted.
    #[error("engine is already running at t={now}")]
    AlreadyRunning {
        /// The logical clock at the time of the rejected call.
        now: Timestamp,
    },

    /// An event's dispatch raised an unmodeled defect. The run-state is
    /// left as it was before the dispatch (still RUNNING): the run was
    /// interrupted abnormally and is not safely resumable.
    #[error("event '{event}' failed at t={now}: {source}")]
    EventFailure {
        /// The logical clock when the event was dispatched.
        now: Timestamp,
        /// The failing event's display name.
        event: String,
        /// The defect itself.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

// ============================================================================
// Engine
// ============================================================================

/// Queue entry: an event plus its effective timestamp and insertion
/// sequence number.
///
/// Ordered by `(timestamp, seq)` with the comparison reversed so the std
/// max-heap behaves as a min-heap. The insertion counter makes the
/// tie-break among equal timestamps insertion-order stable; the event's
/// name and payload never participate in ordering.
struct ScheduledEvent<C> {
    timestamp: Timestamp,
    seq: u64,
    event: Box<dyn Event<C>>,
}

impl<C> PartialEq for ScheduledEvent<C> {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.seq == other.seq
    }
}

impl<C> Eq for ScheduledEvent<C> {}

impl<C> Ord for ScheduledEvent<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: the earliest timestamp (then lowest seq) wins the heap.
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<C> PartialOrd for ScheduledEvent<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The core simulation engine.
///
/// Owns the event queue, the logical clock, the run-state, and the
/// simulation context `C` that every dispatch receives. All scheduling
/// goes through the engine; events only return new events for it to
/// schedule.
///
/// Strictly single-threaded and synchronous: each dispatch is drained to
/// exhaustion before the next event is popped, and nothing blocks on I/O.
///
/// # Example
///
/// ```
/// use ledger_sim_core::{Engine, EngineState, NoopEvent};
///
/// let mut engine = Engine::new("demo", ());
/// engine.schedule(Box::new(NoopEvent::new(2, "tick")));
/// engine.run(None).unwrap();
///
/// assert!(engine.is_state(EngineState::Finished));
/// assert_eq!(engine.dispatch_log().len(), 1);
/// ```
pub struct Engine<C> {
    /// Display name of this engine.
    name: String,

    /// Domain state lent to every dispatch.
    context: C,

    /// The logical clock. Advances only to the timestamp of the event
    /// being dispatched, or freezes at the stop time on an early halt.
    now: Timestamp,

    /// Pending events, min-ordered by (timestamp, insertion order).
    queue: BinaryHeap<ScheduledEvent<C>>,

    /// Current run-state and transition message.
    status: EngineStatus,

    /// Insertion counter backing the equal-timestamp tie-break.
    next_seq: u64,

    /// Record of every consumed event.
    dispatch_log: DispatchLog,
}

impl<C> Engine<C> {
    /// Create a new engine in the WAITING state with the clock at 0.
    pub fn new(name: impl Into<String>, context: C) -> Self {
        Self {
            name: name.into(),
            context,
            now: 0,
            queue: BinaryHeap::new(),
            status: EngineStatus {
                state: EngineState::Waiting,
                message: "Initialized".to_string(),
            },
            next_seq: 0,
            dispatch_log: DispatchLog::new(),
        }
    }

    /// The engine's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The logical clock.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Current status: run-state plus transition message.
    pub fn status(&self) -> &EngineStatus {
        &self.status
    }

    /// The current run-state.
    pub fn state(&self) -> EngineState {
        self.status.state
    }

    /// The latest status message.
    pub fn message(&self) -> &str {
        &self.status.message
    }

    /// Whether the current run-state equals the provided one.
    pub fn is_state(&self, state: EngineState) -> bool {
        self.status.state == state
    }

    /// Shared view of the simulation context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable view of the simulation context.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Number of pending events.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Check if no events are pending.
    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The record of every consumed event, in dispatch order.
    pub fn dispatch_log(&self) -> &DispatchLog {
        &self.dispatch_log
    }

    /// Schedule an event at its own timestamp.
    ///
    /// Queue length increases by exactly one. Timestamps earlier than the
    /// current clock are accepted unadjusted; the clock will visibly
    /// rewind when such an event is popped.
    pub fn schedule(&mut self, event: Box<dyn Event<C>>) {
        let timestamp = event.timestamp();
        self.push(event, timestamp);
    }

    /// Schedule an event at an override timestamp, ignoring its own.
    pub fn schedule_at(&mut self, event: Box<dyn Event<C>>, timestamp: Timestamp) {
        self.push(event, timestamp);
    }

    fn push(&mut self, event: Box<dyn Event<C>>, timestamp: Timestamp) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(ScheduledEvent {
            timestamp,
            seq,
            event,
        });
    }

    /// Externally-initiated suspension: set the PAUSED state with a
    /// message. The run loop itself never pauses.
    pub fn pause(&mut self, message: impl Into<String>) {
        self.set_status(EngineState::Paused, message.into());
    }

    fn set_status(&mut self, state: EngineState, message: String) {
        self.status = EngineStatus { state, message };
    }

    fn finish(&mut self, message: String) {
        self.set_status(EngineState::Finished, message);
    }

    fn stop(&mut self, message: String) {
        self.set_status(EngineState::Stopped, message);
    }

    fn abort(&mut self, message: String) {
        self.set_status(EngineState::Aborted, message);
    }

    /// Run the simulation.
    ///
    /// Continually pops the earliest pending event, advances the clock to
    /// its timestamp, and dispatches it, until the queue is exhausted
    /// (FINISHED), an event requests a stop (STOPPED) or signals a modeled
    /// failure (ABORTED), or the next event would run past `stop_at`
    /// (STOPPED with the clock frozen at `stop_at`; the popped event is
    /// discarded, not requeued - a hard cutoff, not a pause).
    ///
    /// # Errors
    ///
    /// * [`EngineError::AlreadyRunning`] if the engine is mid-run - in
    ///   particular, after a previous run was interrupted by a defect.
    /// * [`EngineError::EventFailure`] if a dispatch raises an unmodeled
    ///   defect; the run-state is left as it was (still RUNNING).
    pub fn run(&mut self, stop_at: Option<Timestamp>) -> Result<(), EngineError> {
        if self.is_state(EngineState::Running) {
            return Err(EngineError::AlreadyRunning { now: self.now });
        }

        let until = match stop_at {
            Some(t) => format!("Stopping at {t}"),
            None => "Stopping at Never".to_string(),
        };
        self.set_status(EngineState::Running, until);

        loop {
            let Some(item) = self.queue.pop() else {
                let now = self.now;
                self.finish(format!("Finished at t={now}"));
                return Ok(());
            };

            if let Some(limit) = stop_at {
                if item.timestamp > limit {
                    self.now = limit;
                    self.stop(format!("Max time {limit} exceeded"));
                    return Ok(());
                }
            }

            self.now = item.timestamp;
            if !self.consume(item.event)? {
                return Ok(());
            }
        }
    }

    /// Dispatch one popped event, schedule its follow-ons, and route its
    /// control signals into the state machine. Returns whether the run
    /// loop should keep going.
    fn consume(&mut self, mut event: Box<dyn Event<C>>) -> Result<bool, EngineError> {
        let name = event.name().to_string();

        match event.dispatch(&mut self.context) {
            Ok(follow_ons) => {
                for follow_on in follow_ons {
                    self.schedule(follow_on);
                }
                self.record(&name, DispatchOutcome::Completed);
                Ok(true)
            }
            Err(EventError::Stop(reason)) => {
                self.record(&name, DispatchOutcome::Stopped);
                let now = self.now;
                self.stop(format!("Stopped by event '{name}' at t={now}: {reason}"));
                Ok(false)
            }
            Err(EventError::Abort(reason)) => {
                self.record(&name, DispatchOutcome::Aborted);
                let now = self.now;
                self.abort(format!("Aborted by event '{name}' at t={now}: {reason}"));
                Ok(false)
            }
            Err(EventError::Internal(source)) => {
                // Unmodeled defect: leave the status untouched and hand
                // the error to the caller of `run`.
                self.record(&name, DispatchOutcome::Failed);
                Err(EngineError::EventFailure {
                    now: self.now,
                    event: name,
                    source,
                })
            }
        }
    }

    fn record(&mut self, name: &str, outcome: DispatchOutcome) {
        self.dispatch_log.record(DispatchRecord {
            timestamp: self.now,
            name: name.to_string(),
            outcome,
        });
    }
}

impl<C> fmt::Display for Engine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Engine({}) - {} events - status {}",
            self.name,
            self.queue.len(),
            self.state()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NoopEvent;

    #[test]
    fn test_engine_init() {
        let engine: Engine<()> = Engine::new("fresh", ());

        assert!(engine.is_state(EngineState::Waiting));
        assert!(engine.message().to_lowercase().contains("initialized"));
        assert_eq!(engine.now(), 0);
        assert!(engine.queue_is_empty());
    }

    #[test]
    fn test_schedule_grows_queue_by_one() {
        let mut engine = Engine::new("queue", ());

        engine.schedule(Box::new(NoopEvent::new(3, "later")));
        assert_eq!(engine.queue_len(), 1);

        engine.schedule(Box::new(NoopEvent::new(1, "sooner")));
        assert_eq!(engine.queue_len(), 2);
    }

    #[test]
    fn test_scheduled_event_min_ordering() {
        let early = ScheduledEvent::<()> {
            timestamp: 1,
            seq: 1,
            event: Box::new(NoopEvent::new(1, "early")),
        };
        let late = ScheduledEvent::<()> {
            timestamp: 7,
            seq: 0,
            event: Box::new(NoopEvent::new(7, "late")),
        };

        // Reversed comparison: the earlier timestamp is the heap maximum.
        assert_eq!(early.cmp(&late), Ordering::Greater);
    }

    #[test]
    fn test_equal_timestamps_break_ties_by_insertion() {
        let first = ScheduledEvent::<()> {
            timestamp: 5,
            seq: 0,
            event: Box::new(NoopEvent::new(5, "first")),
        };
        let second = ScheduledEvent::<()> {
            timestamp: 5,
            seq: 1,
            event: Box::new(NoopEvent::new(5, "second")),
        };

        assert_eq!(first.cmp(&second), Ordering::Greater);
    }

    #[test]
    fn test_pause_sets_paused_state() {
        let mut engine = Engine::new("paused", ());
        engine.pause("operator break");

        assert!(engine.is_state(EngineState::Paused));
        assert_eq!(engine.message(), "operator break");
    }

    #[test]
    fn test_engine_display() {
        let mut engine = Engine::new("display", ());
        for t in 0..3 {
            engine.schedule(Box::new(NoopEvent::new(t, "tick")));
        }

        let rendered = engine.to_string();
        assert!(rendered.contains("3 events"), "{rendered}");
        assert!(rendered.contains("WAITING"), "{rendered}");
    }
}
