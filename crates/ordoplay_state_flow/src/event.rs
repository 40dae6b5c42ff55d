// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timed events placed on a timeline.
//!
//! An event is triggered once when the timeline clock reaches its start time.
//! It either finishes on the spot or stays ongoing, receiving an update every
//! tick with its local elapsed time until it reports completion. Ongoing
//! events are ended exactly once.

use uuid::Uuid;

/// Unique identifier for a timeline event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Create a new random event ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// What an event reports back to the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    /// Keep updating this event
    Ongoing,
    /// Done, the timeline carries on
    Finished,
    /// Done, and the whole timeline must stop now
    FinishedExitState,
}

impl EventStatus {
    /// Time-up test shared by every duration-based event
    pub fn until(elapsed: f32, duration: f32) -> Self {
        if elapsed >= duration {
            EventStatus::Finished
        } else {
            EventStatus::Ongoing
        }
    }
}

/// Contract implemented by event authors.
///
/// `update` and `end` are only called for events that returned
/// [`EventStatus::Ongoing`] from `trigger`.
pub trait TimedEvent<H> {
    /// Called once when the timeline reaches the event's start time
    fn trigger(&mut self, host: &mut H) -> EventStatus;

    /// Called every tick while the event is ongoing.
    ///
    /// `elapsed` is the timeline time minus the event's start time. The
    /// provided implementation finishes once `elapsed >= duration`.
    fn update(&mut self, host: &mut H, elapsed: f32, duration: f32) -> EventStatus {
        let _ = host;
        EventStatus::until(elapsed, duration)
    }

    /// Called exactly once for every event that went ongoing
    fn end(&mut self, host: &mut H) {
        let _ = host;
    }
}

/// Built-in event behaviors
pub enum EventAction<H> {
    /// Instantaneous callback
    Call(Box<dyn FnMut(&mut H)>),
    /// Callback driven with normalized progress over the event's duration
    Span(Box<dyn FnMut(&mut H, f32)>),
    /// Stops the timeline as soon as it is reached
    ExitState,
    /// Author-provided behavior
    Custom(Box<dyn TimedEvent<H>>),
}

impl<H> EventAction<H> {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            EventAction::Call(_) => "call",
            EventAction::Span(_) => "span",
            EventAction::ExitState => "exit_state",
            EventAction::Custom(_) => "custom",
        }
    }
}

impl<H> TimedEvent<H> for EventAction<H> {
    fn trigger(&mut self, host: &mut H) -> EventStatus {
        match self {
            EventAction::Call(f) => {
                f(host);
                EventStatus::Finished
            }
            EventAction::Span(f) => {
                f(host, 0.0);
                EventStatus::Ongoing
            }
            EventAction::ExitState => EventStatus::FinishedExitState,
            EventAction::Custom(event) => event.trigger(host),
        }
    }

    fn update(&mut self, host: &mut H, elapsed: f32, duration: f32) -> EventStatus {
        match self {
            EventAction::Span(f) => {
                let progress = if duration > 0.0 {
                    (elapsed / duration).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                f(host, progress);
                EventStatus::until(elapsed, duration)
            }
            EventAction::Custom(event) => event.update(host, elapsed, duration),
            // Never ongoing, nothing to update
            EventAction::Call(_) | EventAction::ExitState => EventStatus::Finished,
        }
    }

    fn end(&mut self, host: &mut H) {
        if let EventAction::Custom(event) = self {
            event.end(host);
        }
    }
}

/// An event scheduled on a timeline
pub struct TimelineEvent<H> {
    /// Unique event ID
    pub id: EventId,
    /// Label used in logs
    pub label: String,
    /// Start offset from the beginning of the timeline, in seconds
    pub time: f32,
    /// How long the event stays ongoing, in seconds (0 = instantaneous)
    pub duration: f32,
    action: EventAction<H>,
}

impl<H: 'static> TimelineEvent<H> {
    /// Create an event from a behavior
    pub fn new(time: f32, duration: f32, action: EventAction<H>) -> Self {
        Self {
            id: EventId::new(),
            label: action.kind().to_string(),
            time,
            duration,
            action,
        }
    }

    /// Instantaneous callback at `time`
    pub fn call(time: f32, f: impl FnMut(&mut H) + 'static) -> Self {
        Self::new(time, 0.0, EventAction::Call(Box::new(f)))
    }

    /// Progress callback running from `time` for `duration` seconds
    pub fn span(time: f32, duration: f32, f: impl FnMut(&mut H, f32) + 'static) -> Self {
        Self::new(time, duration, EventAction::Span(Box::new(f)))
    }

    /// Stop the timeline at `time`
    pub fn exit_state(time: f32) -> Self {
        Self::new(time, 0.0, EventAction::ExitState)
    }

    /// Author-provided behavior
    pub fn custom(time: f32, duration: f32, event: impl TimedEvent<H> + 'static) -> Self {
        Self::new(time, duration, EventAction::Custom(Box::new(event)))
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl<H> TimelineEvent<H> {
    /// The behavior behind this event
    pub fn action(&self) -> &EventAction<H> {
        &self.action
    }

    pub(crate) fn trigger(&mut self, host: &mut H) -> EventStatus {
        self.action.trigger(host)
    }

    pub(crate) fn update(&mut self, host: &mut H, elapsed: f32) -> EventStatus {
        self.action.update(host, elapsed, self.duration)
    }

    pub(crate) fn end(&mut self, host: &mut H) {
        self.action.end(host);
    }
}

impl<H> std::fmt::Debug for TimelineEvent<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineEvent")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("time", &self.time)
            .field("duration", &self.duration)
            .field("kind", &self.action.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestHost;

    struct Pulse;

    impl TimedEvent<TestHost> for Pulse {
        fn trigger(&mut self, host: &mut TestHost) -> EventStatus {
            host.record("pulse:trigger");
            EventStatus::Ongoing
        }

        fn end(&mut self, host: &mut TestHost) {
            host.record("pulse:end");
        }
    }

    #[test]
    fn test_until_uses_inclusive_threshold() {
        assert_eq!(EventStatus::until(0.5, 1.0), EventStatus::Ongoing);
        assert_eq!(EventStatus::until(1.0, 1.0), EventStatus::Finished);
        assert_eq!(EventStatus::until(0.0, 0.0), EventStatus::Finished);
    }

    #[test]
    fn test_call_finishes_on_trigger() {
        let mut host = TestHost::new(1.0);
        let mut event = TimelineEvent::call(0.0, |h: &mut TestHost| h.record("called"));

        assert_eq!(event.trigger(&mut host), EventStatus::Finished);
        assert_eq!(host.log, vec!["called"]);
        assert_eq!(event.label, "call");
    }

    #[test]
    fn test_span_reports_progress() {
        let mut host = TestHost::new(1.0);
        let mut event = TimelineEvent::span(1.0, 2.0, |h: &mut TestHost, p: f32| {
            h.record(format!("p={p}"));
        });

        assert_eq!(event.trigger(&mut host), EventStatus::Ongoing);
        assert_eq!(event.update(&mut host, 1.0), EventStatus::Ongoing);
        assert_eq!(event.update(&mut host, 2.5), EventStatus::Finished);
        assert_eq!(host.log, vec!["p=0", "p=0.5", "p=1"]);
    }

    #[test]
    fn test_zero_length_span_completes_on_first_update() {
        let mut host = TestHost::new(1.0);
        let mut event = TimelineEvent::span(0.0, 0.0, |_: &mut TestHost, _: f32| {});

        assert_eq!(event.trigger(&mut host), EventStatus::Ongoing);
        assert_eq!(event.update(&mut host, 0.0), EventStatus::Finished);
    }

    #[test]
    fn test_custom_uses_default_time_up() {
        let mut host = TestHost::new(1.0);
        let mut event = TimelineEvent::custom(0.0, 1.0, Pulse).with_label("pulse");

        assert_eq!(event.trigger(&mut host), EventStatus::Ongoing);
        assert_eq!(event.update(&mut host, 0.5), EventStatus::Ongoing);
        assert_eq!(event.update(&mut host, 1.0), EventStatus::Finished);
        event.end(&mut host);
        assert_eq!(host.log, vec!["pulse:trigger", "pulse:end"]);
        assert_eq!(event.label, "pulse");
    }

    #[test]
    fn test_exit_state_signals_on_trigger() {
        let mut host = TestHost::new(1.0);
        let mut event = TimelineEvent::<TestHost>::exit_state(3.0);
        assert_eq!(event.trigger(&mut host), EventStatus::FinishedExitState);
    }
}
