// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration errors.
//!
//! Everything here is detected when a timeline or condition is built, never
//! in the middle of a run.

/// Rejected timeline or condition configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Random wait range is reversed, negative or not finite
    #[error("Invalid time range: min {min}, max {max}")]
    InvalidTimeRange {
        /// Lower bound in seconds
        min: f32,
        /// Upper bound in seconds
        max: f32,
    },

    /// Event start time is negative or not finite
    #[error("Event {index} has invalid time {time}")]
    InvalidEventTime {
        /// Position in the timeline
        index: usize,
        /// Offending time
        time: f32,
    },

    /// Event duration is negative or not finite
    #[error("Event {index} has invalid duration {duration}")]
    InvalidEventDuration {
        /// Position in the timeline
        index: usize,
        /// Offending duration
        duration: f32,
    },

    /// Event is scheduled before the one preceding it
    #[error("Event {index} at {time}s is scheduled before its predecessor at {previous}s")]
    EventsOutOfOrder {
        /// Position in the timeline
        index: usize,
        /// Time of the offending event
        time: f32,
        /// Time of the event before it
        previous: f32,
    },
}

/// Result type for building flows
pub type Result<T> = std::result::Result<T, ConfigError>;
