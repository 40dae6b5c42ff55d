// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timelines and the runner that plays them.
//!
//! A [`Timeline`] is an ordered list of [`TimelineEvent`]s. A
//! [`TimelineRunner`] advances a virtual clock by the host's delta time on
//! every step, triggers events as the clock reaches them, and keeps ongoing
//! events updated until they finish. Any event may stop the whole run early
//! by reporting [`EventStatus::FinishedExitState`].

use crate::error::{ConfigError, Result};
use crate::event::{EventStatus, TimelineEvent};
use crate::host::Host;
use crate::interpreter::{Interpreter, StepResult, Transition};

/// Validated, time-ordered list of events
pub struct Timeline<H> {
    /// Timeline name
    pub name: String,
    events: Vec<TimelineEvent<H>>,
}

impl<H> Timeline<H> {
    /// Create a timeline, rejecting bad times, bad durations and
    /// out-of-order events. Events are never re-sorted.
    pub fn new(name: impl Into<String>, events: Vec<TimelineEvent<H>>) -> Result<Self> {
        let mut previous = 0.0_f32;
        for (index, event) in events.iter().enumerate() {
            if !event.time.is_finite() || event.time < 0.0 {
                return Err(ConfigError::InvalidEventTime {
                    index,
                    time: event.time,
                });
            }
            if !event.duration.is_finite() || event.duration < 0.0 {
                return Err(ConfigError::InvalidEventDuration {
                    index,
                    duration: event.duration,
                });
            }
            if event.time < previous {
                return Err(ConfigError::EventsOutOfOrder {
                    index,
                    time: event.time,
                    previous,
                });
            }
            previous = event.time;
        }

        Ok(Self {
            name: name.into(),
            events,
        })
    }

    /// An empty timeline
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Vec::new(),
        }
    }

    /// Get all events
    pub fn events(&self) -> &[TimelineEvent<H>] {
        &self.events
    }

    /// Get event count
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Start time of the last event
    pub fn last_event_time(&self) -> f32 {
        self.events.last().map(|e| e.time).unwrap_or(0.0)
    }
}

impl<H> std::fmt::Debug for Timeline<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("name", &self.name)
            .field("events", &self.events)
            .finish()
    }
}

/// Lifecycle of a timeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelinePhase {
    /// Never stepped
    #[default]
    NotStarted,
    /// Waiting on scheduled or ongoing events
    Running,
    /// Every event played out
    Finished,
    /// Stopped by an exit-state signal
    Exited,
    /// Stopped through [`Interpreter::abort`]
    Aborted,
}

impl TimelinePhase {
    /// Check if the run is over
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Exited | Self::Aborted)
    }
}

/// Plays one timeline against the host clock
pub struct TimelineRunner<H> {
    timeline: Timeline<H>,
    then: Option<Box<dyn Transition<H>>>,
    phase: TimelinePhase,
    current_time: f32,
    /// Index of the next event to trigger
    cursor: usize,
    /// Indices of ongoing events, in the order they were triggered
    active: Vec<usize>,
}

impl<H: Host> TimelineRunner<H> {
    /// Create a runner for a timeline
    pub fn new(timeline: Timeline<H>) -> Self {
        Self {
            timeline,
            then: None,
            phase: TimelinePhase::NotStarted,
            current_time: 0.0,
            cursor: 0,
            active: Vec::new(),
        }
    }

    /// Continue with `target` once the run terminates on its own
    pub fn then(mut self, target: Box<dyn Transition<H>>) -> Self {
        self.then = Some(target);
        self
    }

    /// Get the current phase
    pub fn phase(&self) -> TimelinePhase {
        self.phase
    }

    /// Time since the run started
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Number of ongoing events
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of events not yet triggered
    pub fn pending_count(&self) -> usize {
        self.timeline.events.len() - self.cursor
    }

    /// Get the timeline being played
    pub fn timeline(&self) -> &Timeline<H> {
        &self.timeline
    }

    /// Still waiting: either the next event is in the future, or nothing is
    /// scheduled but something is still ongoing.
    fn is_waiting(&self) -> bool {
        match self.timeline.events.get(self.cursor) {
            Some(next) => self.current_time < next.time,
            None => !self.active.is_empty(),
        }
    }

    /// Update ongoing events in trigger order.
    /// Returns true if one of them asked to exit.
    fn update_active(&mut self, host: &mut H) -> bool {
        let mut i = 0;
        while i < self.active.len() {
            let index = self.active[i];
            let event = &mut self.timeline.events[index];
            let elapsed = self.current_time - event.time;

            match event.update(host, elapsed) {
                EventStatus::Ongoing => i += 1,
                EventStatus::Finished => {
                    tracing::trace!(
                        timeline = %self.timeline.name,
                        event = %event.label,
                        elapsed,
                        "Event finished"
                    );
                    event.end(host);
                    self.active.remove(i);
                }
                EventStatus::FinishedExitState => {
                    tracing::debug!(
                        timeline = %self.timeline.name,
                        event = %event.label,
                        "Exit requested during update"
                    );
                    self.end_active(host);
                    return true;
                }
            }
        }
        false
    }

    /// End every ongoing event in trigger order
    fn end_active(&mut self, host: &mut H) {
        for index in std::mem::take(&mut self.active) {
            self.timeline.events[index].end(host);
        }
    }

    fn finish(&mut self, host: &mut H, phase: TimelinePhase) -> StepResult<H> {
        self.phase = phase;
        self.cursor = self.timeline.events.len();
        tracing::debug!(
            timeline = %self.timeline.name,
            time = self.current_time,
            ?phase,
            "Timeline done"
        );
        let next = self.then.take().and_then(|mut target| target.resolve(host));
        StepResult::Done(next)
    }
}

impl<H: Host> Interpreter<H> for TimelineRunner<H> {
    fn name(&self) -> &str {
        &self.timeline.name
    }

    fn step(&mut self, host: &mut H) -> StepResult<H> {
        match self.phase {
            TimelinePhase::NotStarted => {
                tracing::debug!(
                    timeline = %self.timeline.name,
                    events = self.timeline.events.len(),
                    "Timeline started"
                );
                self.phase = TimelinePhase::Running;
            }
            TimelinePhase::Running => {}
            phase => {
                tracing::warn!(timeline = %self.timeline.name, ?phase, "Stepped a finished timeline");
                return StepResult::Done(None);
            }
        }

        self.current_time += host.delta_time();

        if self.is_waiting() && self.update_active(host) {
            return self.finish(host, TimelinePhase::Exited);
        }

        while let Some(event) = self.timeline.events.get_mut(self.cursor) {
            if self.current_time < event.time {
                return StepResult::Suspend;
            }

            let status = event.trigger(host);
            tracing::debug!(
                timeline = %self.timeline.name,
                event = %event.label,
                at = self.current_time,
                ?status,
                "Event triggered"
            );

            match status {
                EventStatus::Finished => {}
                EventStatus::Ongoing => self.active.push(self.cursor),
                EventStatus::FinishedExitState => {
                    self.end_active(host);
                    return self.finish(host, TimelinePhase::Exited);
                }
            }
            self.cursor += 1;
        }

        if self.active.is_empty() {
            self.finish(host, TimelinePhase::Finished)
        } else {
            StepResult::Suspend
        }
    }

    fn abort(&mut self, host: &mut H) {
        if self.phase.is_terminal() {
            return;
        }
        tracing::debug!(
            timeline = %self.timeline.name,
            active = self.active.len(),
            "Timeline aborted"
        );
        self.end_active(host);
        self.cursor = self.timeline.events.len();
        self.phase = TimelinePhase::Aborted;
    }
}
