//! The schedulable event capability
//!
//! See `event.rs` for the `Event` trait, the no-op base event, and the
//! errors event dispatch logic may raise.

pub mod event;

// Re-exports
pub use event::{Event, EventError, FollowOns, NoopEvent, Timestamp};
