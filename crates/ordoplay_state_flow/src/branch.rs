// SPDX-License-Identifier: MIT OR Apache-2.0
//! Branches: a condition paired with where to go when it holds.

use crate::condition::{Condition, ConditionLogic};
use crate::host::Host;
use crate::interpreter::{Continuation, Transition};

/// A condition, an optional inversion, and a transition target
pub struct Branch<H> {
    /// Label used in logs
    pub label: String,
    /// Negate the condition before it is used for selection
    pub invert: bool,
    condition: Condition<H>,
    target: Box<dyn Transition<H>>,
}

impl<H> Branch<H> {
    /// Create a branch taken when `condition` is met
    pub fn new(condition: Condition<H>, target: Box<dyn Transition<H>>) -> Self {
        Self {
            label: condition.kind().to_string(),
            invert: false,
            condition,
            target,
        }
    }

    /// Create a branch taken when `condition` is not met
    pub fn unless(condition: Condition<H>, target: Box<dyn Transition<H>>) -> Self {
        Self::new(condition, target).inverted(true)
    }

    /// Set the inversion flag
    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Get the condition
    pub fn condition(&self) -> &Condition<H> {
        &self.condition
    }

    pub(crate) fn resolve_target(&mut self, host: &mut H) -> Option<Continuation<H>> {
        self.target.resolve(host)
    }
}

impl<H: Host> Branch<H> {
    pub(crate) fn on_start(&mut self, host: &mut H) {
        self.condition.on_start(host);
    }

    /// Effective result with inversion applied
    pub(crate) fn is_satisfied(&mut self, host: &mut H) -> bool {
        self.condition.is_met(host) != self.invert
    }

    pub(crate) fn on_end(&mut self, host: &mut H) {
        self.condition.on_end(host);
    }
}

impl<H> std::fmt::Debug for Branch<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Branch")
            .field("label", &self.label)
            .field("invert", &self.invert)
            .field("condition", &self.condition)
            .finish()
    }
}
