// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline and branching-state runtime for `OrdoPlay`.
//!
//! This crate drives sequenced, time-based gameplay behavior:
//! - Timelines of timed events, instantaneous or ongoing
//! - Conditions with start/evaluate/end sessions
//! - Background logic running alongside branch evaluation
//! - Branching states that pick the first satisfied transition
//!
//! ## Architecture
//!
//! The runtime is single-threaded and cooperative. The host owns the clock
//! and steps whichever [`Interpreter`] is active once per tick. A step either
//! suspends or finishes with the next [`Continuation`], so timelines and
//! branching states chain into each other and nest freely.
//!
//! Replacing or dropping a running interpreter performs no cleanup. Call
//! [`Interpreter::abort`] first when ongoing events or condition sessions
//! must be closed.

pub mod error;
pub mod host;
pub mod interpreter;
pub mod event;
pub mod timeline;
pub mod condition;
pub mod logic;
pub mod branch;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::ConfigError;
pub use host::{Host, RunStatus};
pub use interpreter::{goto, stop, Continuation, Interpreter, StepResult, Transition};
pub use event::{EventAction, EventId, EventStatus, TimedEvent, TimelineEvent};
pub use timeline::{Timeline, TimelinePhase, TimelineRunner};
pub use condition::{AfterTime, AndCondition, Condition, ConditionLogic, DependencyRunning, PredicateCall};
pub use logic::{BackgroundLogic, LogicFn};
pub use branch::Branch;
pub use state::{BranchingState, StatePhase};
