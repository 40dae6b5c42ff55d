// SPDX-License-Identifier: MIT OR Apache-2.0
//! Background logic that runs alongside branch evaluation.
//!
//! Background logic has no result of its own. It runs every tick before the
//! branches are tested, so anything it writes is visible to conditions in
//! the same tick.

/// Lifecycle of per-tick background logic
pub trait BackgroundLogic<H> {
    /// Called once when the owning state starts
    fn on_start(&mut self, host: &mut H) {
        let _ = host;
    }

    /// Called every tick, before any branch is tested
    fn update_logic(&mut self, host: &mut H);

    /// Called once when the owning state takes a branch
    fn on_finished(&mut self, host: &mut H) {
        let _ = host;
    }
}

/// Background logic built from closures
pub struct LogicFn<H> {
    label: String,
    start: Option<Box<dyn FnMut(&mut H)>>,
    update: Box<dyn FnMut(&mut H)>,
    finished: Option<Box<dyn FnMut(&mut H)>>,
}

impl<H: 'static> LogicFn<H> {
    /// Run `update` every tick
    pub fn new(label: impl Into<String>, update: impl FnMut(&mut H) + 'static) -> Self {
        Self {
            label: label.into(),
            start: None,
            update: Box::new(update),
            finished: None,
        }
    }

    /// Also run `f` when the state starts
    pub fn with_start(mut self, f: impl FnMut(&mut H) + 'static) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    /// Also run `f` when the state finishes
    pub fn with_finished(mut self, f: impl FnMut(&mut H) + 'static) -> Self {
        self.finished = Some(Box::new(f));
        self
    }
}

impl<H> LogicFn<H> {
    /// Label used in logs
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<H> BackgroundLogic<H> for LogicFn<H> {
    fn on_start(&mut self, host: &mut H) {
        if let Some(start) = &mut self.start {
            start(host);
        }
    }

    fn update_logic(&mut self, host: &mut H) {
        (self.update)(host);
    }

    fn on_finished(&mut self, host: &mut H) {
        if let Some(finished) = &mut self.finished {
            finished(host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestHost;

    #[test]
    fn test_logic_fn_lifecycle() {
        let mut host = TestHost::new(1.0);
        let mut logic = LogicFn::new("counter", |h: &mut TestHost| h.counter += 1)
            .with_start(|h: &mut TestHost| h.record("start"))
            .with_finished(|h: &mut TestHost| h.record("finished"));

        logic.on_start(&mut host);
        logic.update_logic(&mut host);
        logic.update_logic(&mut host);
        logic.on_finished(&mut host);

        assert_eq!(host.counter, 2);
        assert_eq!(host.log, vec!["start", "finished"]);
        assert_eq!(logic.label(), "counter");
    }

    #[test]
    fn test_optional_hooks_default_to_nothing() {
        let mut host = TestHost::new(1.0);
        let mut logic = LogicFn::new("noop", |_: &mut TestHost| {});

        BackgroundLogic::on_start(&mut logic, &mut host);
        BackgroundLogic::on_finished(&mut logic, &mut host);
        assert!(host.log.is_empty());
    }
}
