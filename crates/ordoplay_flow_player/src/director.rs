// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drives one chain of interpreters.
//!
//! A director holds the continuation that is currently running and steps it
//! once per tick. When it finishes, the continuation it handed back is
//! installed and runs from the next tick on.

use ordoplay_state_flow::{Continuation, Host, RunStatus, StepResult};
use std::cell::Cell;
use std::rc::Rc;

/// Runs a flow to completion, one step per tick
pub struct Director<H> {
    name: String,
    current: Option<Continuation<H>>,
    running: Rc<Cell<bool>>,
    transitions: u64,
    ticks: u64,
}

impl<H: Host> Director<H> {
    /// Create an idle director
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current: None,
            running: Rc::new(Cell::new(false)),
            transitions: 0,
            ticks: 0,
        }
    }

    /// Name of this director
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Begin running `flow`, replacing whatever was running
    pub fn start(&mut self, flow: Continuation<H>) {
        tracing::info!(director = %self.name, flow = %flow.name(), "Flow started");
        self.install(Some(flow));
    }

    /// Step the current flow once. Returns true while something is running.
    pub fn tick(&mut self, host: &mut H) -> bool {
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        self.ticks += 1;

        match current.step(host) {
            StepResult::Suspend => true,
            StepResult::Done(next) => {
                self.transitions += 1;
                match &next {
                    Some(next_flow) => tracing::info!(
                        director = %self.name,
                        from = %current.name(),
                        to = %next_flow.name(),
                        "Transition"
                    ),
                    None => tracing::info!(
                        director = %self.name,
                        from = %current.name(),
                        "Flow finished"
                    ),
                }
                self.install(next);
                self.is_running()
            }
        }
    }

    /// Replace the running flow without cleaning it up.
    ///
    /// Ongoing events of the replaced flow never get their end callback and
    /// its condition sessions are never closed. Use [`Director::abort`] first
    /// when that matters.
    pub fn redirect(&mut self, next: Option<Continuation<H>>) {
        if let Some(current) = &self.current {
            tracing::debug!(director = %self.name, from = %current.name(), "Redirected");
        }
        self.install(next);
    }

    /// Stop the running flow and run its cleanup
    pub fn abort(&mut self, host: &mut H) {
        if let Some(mut current) = self.current.take() {
            tracing::info!(director = %self.name, flow = %current.name(), "Flow aborted");
            current.abort(host);
        }
        self.running.set(false);
    }

    /// Handle other flows can depend on
    pub fn status(&self) -> Rc<dyn RunStatus> {
        let status: Rc<dyn RunStatus> = self.running.clone();
        status
    }

    /// Name of the running flow
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.name())
    }

    /// Check if a flow is running
    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Completed hand-overs, including the final one to idle
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Ticks spent stepping a flow
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn install(&mut self, next: Option<Continuation<H>>) {
        self.running.set(next.is_some());
        self.current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::world::World;
    use ordoplay_state_flow::{
        goto, stop, Branch, BranchingState, Condition, EventStatus, TimedEvent, Timeline, TimelineEvent,
        TimelineRunner,
    };

    /// Ongoing event that marks the blackboard when it ends
    struct Beacon;

    impl TimedEvent<World> for Beacon {
        fn trigger(&mut self, host: &mut World) -> EventStatus {
            host.blackboard().write().set("beacon", 1.0);
            EventStatus::Ongoing
        }

        fn end(&mut self, host: &mut World) {
            host.blackboard().write().set("beacon_ended", 1.0);
        }
    }

    fn world(dt: f32) -> World {
        let mut world = World::new(&PlayerConfig {
            seed: Some(3),
            ..PlayerConfig::default()
        });
        world.begin_tick(dt);
        world
    }

    fn beacon_flow() -> Continuation<World> {
        let timeline = Timeline::<World>::new("beacon", vec![TimelineEvent::custom(0.0, 10.0, Beacon)]).unwrap();
        Box::new(TimelineRunner::new(timeline))
    }

    #[test]
    fn test_runs_chain_to_idle() {
        let mut host = world(1.0);
        let second = Timeline::<World>::new("second", vec![TimelineEvent::call(1.0, |w: &mut World| {
            w.blackboard().write().add("second", 1.0);
        })])
        .unwrap();
        let first = TimelineRunner::new(Timeline::<World>::empty("first"))
            .then(goto(Box::new(TimelineRunner::new(second))));

        let mut director = Director::new("main");
        director.start(Box::new(first));
        let status = director.status();
        assert!(status.is_running());

        assert!(director.tick(&mut host));
        assert_eq!(director.current_name(), Some("second"));
        assert!(!director.tick(&mut host));

        assert!(!status.is_running());
        assert_eq!(director.transitions(), 2);
        assert_eq!(host.blackboard().read().get("second"), 1.0);
        assert!(!director.tick(&mut host));
        assert_eq!(director.ticks(), 2);
    }

    #[test]
    fn test_status_drives_dependency_condition() {
        let mut host = world(1.0);
        let mut ambience = Director::new("ambience");
        ambience.start(beacon_flow());
        host.register_machine("ambience", ambience.status());

        let waiting = BranchingState::<World>::new("wait_for_silence")
            .branch(Branch::unless(Condition::dependency_running("ambience"), stop()));
        let mut main = Director::new("main");
        main.start(Box::new(waiting));

        assert!(main.tick(&mut host));
        ambience.abort(&mut host);
        assert!(!main.tick(&mut host));
    }

    #[test]
    fn test_redirect_skips_cleanup() {
        let mut host = world(1.0);
        let mut director = Director::new("main");
        director.start(beacon_flow());
        director.tick(&mut host);
        assert_eq!(host.blackboard().read().get("beacon"), 1.0);

        director.redirect(None);
        assert!(!director.is_running());
        assert!(!director.status().is_running());
        assert!(!host.blackboard().read().contains("beacon_ended"));
    }

    #[test]
    fn test_abort_runs_cleanup() {
        let mut host = world(1.0);
        let mut director = Director::new("main");
        director.start(beacon_flow());
        director.tick(&mut host);

        director.abort(&mut host);
        assert!(!director.is_running());
        assert_eq!(host.blackboard().read().get("beacon_ended"), 1.0);

        // Nothing left to abort
        director.abort(&mut host);
    }
}
