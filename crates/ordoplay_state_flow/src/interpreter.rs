// SPDX-License-Identifier: MIT OR Apache-2.0
//! Step-driven interpreters and the continuations that link them.
//!
//! An interpreter keeps everything it needs across ticks in its own fields.
//! The host calls [`Interpreter::step`] once per tick and either gets control
//! back ([`StepResult::Suspend`]) or receives the next thing to run
//! ([`StepResult::Done`]).

use crate::host::Host;

/// Something the host can run next
pub type Continuation<H> = Box<dyn Interpreter<H>>;

/// Outcome of a single step
pub enum StepResult<H> {
    /// Still running, step again next tick
    Suspend,
    /// Finished; run the continuation next, or go idle on `None`
    Done(Option<Continuation<H>>),
}

impl<H> StepResult<H> {
    /// Check if the interpreter suspended
    pub fn is_suspend(&self) -> bool {
        matches!(self, StepResult::Suspend)
    }

    /// Check if the interpreter finished
    pub fn is_done(&self) -> bool {
        matches!(self, StepResult::Done(_))
    }

    /// Take the continuation out of a finished step
    pub fn into_next(self) -> Option<Continuation<H>> {
        match self {
            StepResult::Suspend => None,
            StepResult::Done(next) => next,
        }
    }
}

impl<H> std::fmt::Debug for StepResult<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepResult::Suspend => f.write_str("Suspend"),
            StepResult::Done(None) => f.write_str("Done(None)"),
            StepResult::Done(Some(next)) => write!(f, "Done({})", next.name()),
        }
    }
}

/// A resumable unit of execution driven by the host.
pub trait Interpreter<H> {
    /// Name used in logs and diagnostics
    fn name(&self) -> &str;

    /// Advance by one host tick
    fn step(&mut self, host: &mut H) -> StepResult<H>;

    /// Stop early and run cleanup callbacks.
    ///
    /// Dropping an interpreter performs no cleanup at all; this is the
    /// explicit alternative for callers that need it.
    fn abort(&mut self, host: &mut H) {
        let _ = host;
    }
}

/// Resolves a transition target into the next continuation.
///
/// The runtime never looks inside a target. It may build a fresh timeline, a
/// nested branching state, or nothing at all.
pub trait Transition<H> {
    /// Produce the continuation to run next
    fn resolve(&mut self, host: &mut H) -> Option<Continuation<H>>;
}

impl<H, F> Transition<H> for F
where
    F: FnMut(&mut H) -> Option<Continuation<H>>,
{
    fn resolve(&mut self, host: &mut H) -> Option<Continuation<H>> {
        self(host)
    }
}

/// Target that ends the flow
pub fn stop<H: Host + 'static>() -> Box<dyn Transition<H>> {
    Box::new(|_: &mut H| -> Option<Continuation<H>> { None })
}

/// Target that hands over a prebuilt continuation.
///
/// The continuation can be handed over once; resolving again yields nothing.
pub fn goto<H: Host + 'static>(next: Continuation<H>) -> Box<dyn Transition<H>> {
    let mut next = Some(next);
    Box::new(move |_: &mut H| next.take())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestHost;

    struct Idle;

    impl Interpreter<TestHost> for Idle {
        fn name(&self) -> &str {
            "idle"
        }

        fn step(&mut self, _host: &mut TestHost) -> StepResult<TestHost> {
            StepResult::Suspend
        }
    }

    #[test]
    fn test_goto_hands_over_once() {
        let mut host = TestHost::new(1.0);
        let mut target = goto::<TestHost>(Box::new(Idle));

        let next = target.resolve(&mut host).expect("first resolve");
        assert_eq!(next.name(), "idle");
        assert!(target.resolve(&mut host).is_none());
    }

    #[test]
    fn test_stop_resolves_nothing() {
        let mut host = TestHost::new(1.0);
        assert!(stop::<TestHost>().resolve(&mut host).is_none());
    }

    #[test]
    fn test_step_result_helpers() {
        let done: StepResult<TestHost> = StepResult::Done(Some(Box::new(Idle)));
        assert!(done.is_done());
        assert_eq!(format!("{done:?}"), "Done(idle)");
        assert_eq!(done.into_next().map(|n| n.name().to_string()), Some("idle".to_string()));

        let suspend: StepResult<TestHost> = StepResult::Suspend;
        assert!(suspend.is_suspend());
        assert!(suspend.into_next().is_none());
    }
}
