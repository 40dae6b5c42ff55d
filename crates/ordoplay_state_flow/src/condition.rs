// SPDX-License-Identifier: MIT OR Apache-2.0
//! Boolean conditions used by branches.
//!
//! Every condition has a checking session bracketed by `on_start` and
//! `on_end`. Internal state such as a countdown is only meaningful inside
//! that session and is reset when the next one starts.

use crate::error::{ConfigError, Result};
use crate::host::{Host, RunStatus};
use std::rc::Rc;

/// Lifecycle shared by all conditions
pub trait ConditionLogic<H> {
    /// Begin a checking session
    fn on_start(&mut self, host: &mut H) {
        let _ = host;
    }

    /// Evaluate for the current tick
    fn is_met(&mut self, host: &mut H) -> bool;

    /// End the checking session
    fn on_end(&mut self, host: &mut H) {
        let _ = host;
    }
}

/// Met once a randomly drawn wait in `[min, max]` has elapsed.
///
/// The countdown only advances when the condition is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct AfterTime {
    min: f32,
    max: f32,
    remaining: f32,
}

impl AfterTime {
    /// Create a wait drawn from `[min, max]` seconds
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max < min {
            return Err(ConfigError::InvalidTimeRange { min, max });
        }
        Ok(Self {
            min,
            max,
            remaining: min,
        })
    }

    /// Create a wait of exactly `seconds`
    pub fn fixed(seconds: f32) -> Result<Self> {
        Self::new(seconds, seconds)
    }

    /// Lower bound in seconds
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound in seconds
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Time left in the current session
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl<H: Host> ConditionLogic<H> for AfterTime {
    fn on_start(&mut self, host: &mut H) {
        self.remaining = host.random_range(self.min, self.max);
    }

    fn is_met(&mut self, host: &mut H) -> bool {
        self.remaining -= host.delta_time();
        self.remaining <= 0.0
    }
}

/// Met while an external probe returns true
pub struct PredicateCall<H> {
    label: String,
    probe: Box<dyn FnMut(&mut H) -> bool>,
}

impl<H: 'static> PredicateCall<H> {
    /// Wrap a probe that reads the host
    pub fn new(label: impl Into<String>, probe: impl FnMut(&mut H) -> bool + 'static) -> Self {
        Self {
            label: label.into(),
            probe: Box::new(probe),
        }
    }

    /// Bind a probe to an external object.
    ///
    /// `target` is typically a shared handle (`Rc`, `Arc<RwLock<_>>`) to
    /// state owned outside the flow.
    pub fn bound<T: 'static>(
        label: impl Into<String>,
        target: T,
        probe: impl Fn(&T) -> bool + 'static,
    ) -> Self {
        Self::new(label, move |_: &mut H| probe(&target))
    }
}

impl<H> PredicateCall<H> {
    /// Label used in logs
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<H> ConditionLogic<H> for PredicateCall<H> {
    fn is_met(&mut self, host: &mut H) -> bool {
        (self.probe)(host)
    }
}

impl<H> std::fmt::Debug for PredicateCall<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateCall").field("label", &self.label).finish()
    }
}

/// Met while a named machine reports that it is running.
///
/// The handle is resolved through the host once per session.
pub struct DependencyRunning {
    name: String,
    handle: Option<Rc<dyn RunStatus>>,
}

impl DependencyRunning {
    /// Depend on the machine registered under `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: None,
        }
    }

    /// Name of the machine
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if a handle was resolved for the current session
    pub fn is_resolved(&self) -> bool {
        self.handle.is_some()
    }
}

impl<H: Host> ConditionLogic<H> for DependencyRunning {
    fn on_start(&mut self, host: &mut H) {
        self.handle = host.resolve_dependency(&self.name);
        if self.handle.is_none() {
            tracing::warn!(dependency = %self.name, "Dependency not found, treating as not running");
        }
    }

    fn is_met(&mut self, _host: &mut H) -> bool {
        self.handle.as_ref().is_some_and(|handle| handle.is_running())
    }

    fn on_end(&mut self, _host: &mut H) {
        self.handle = None;
    }
}

impl std::fmt::Debug for DependencyRunning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyRunning")
            .field("name", &self.name)
            .field("resolved", &self.handle.is_some())
            .finish()
    }
}

/// Met only while every child is met.
///
/// All children are evaluated on every call, even after one of them came
/// back false, so that timers inside later children keep running. An empty
/// list is always met.
pub struct AndCondition<H> {
    children: Vec<Condition<H>>,
}

impl<H> AndCondition<H> {
    /// Combine children
    pub fn new(children: Vec<Condition<H>>) -> Self {
        Self { children }
    }

    /// Get the children
    pub fn children(&self) -> &[Condition<H>] {
        &self.children
    }
}

impl<H: Host> ConditionLogic<H> for AndCondition<H> {
    fn on_start(&mut self, host: &mut H) {
        for child in &mut self.children {
            child.on_start(host);
        }
    }

    fn is_met(&mut self, host: &mut H) -> bool {
        let mut met = true;
        for child in &mut self.children {
            met &= child.is_met(host);
        }
        met
    }

    fn on_end(&mut self, host: &mut H) {
        for child in &mut self.children {
            child.on_end(host);
        }
    }
}

/// Any condition a branch can test
pub enum Condition<H> {
    /// Random wait
    AfterTime(AfterTime),
    /// External probe
    Predicate(PredicateCall<H>),
    /// Another machine is running
    DependencyRunning(DependencyRunning),
    /// Always met
    Default,
    /// Every child met
    And(AndCondition<H>),
    /// Author-provided condition
    Custom(Box<dyn ConditionLogic<H>>),
}

impl<H: 'static> Condition<H> {
    /// Random wait in `[min, max]` seconds
    pub fn after_time(min: f32, max: f32) -> Result<Self> {
        AfterTime::new(min, max).map(Condition::AfterTime)
    }

    /// External probe reading the host
    pub fn predicate(label: impl Into<String>, probe: impl FnMut(&mut H) -> bool + 'static) -> Self {
        Condition::Predicate(PredicateCall::new(label, probe))
    }

    /// Named machine is running
    pub fn dependency_running(name: impl Into<String>) -> Self {
        Condition::DependencyRunning(DependencyRunning::new(name))
    }

    /// All of `children`
    pub fn and(children: Vec<Condition<H>>) -> Self {
        Condition::And(AndCondition::new(children))
    }

    /// Author-provided condition
    pub fn custom(condition: impl ConditionLogic<H> + 'static) -> Self {
        Condition::Custom(Box::new(condition))
    }
}

impl<H> Condition<H> {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Condition::AfterTime(_) => "after_time",
            Condition::Predicate(_) => "predicate",
            Condition::DependencyRunning(_) => "dependency_running",
            Condition::Default => "default",
            Condition::And(_) => "and",
            Condition::Custom(_) => "custom",
        }
    }
}

impl<H: Host> ConditionLogic<H> for Condition<H> {
    fn on_start(&mut self, host: &mut H) {
        match self {
            Condition::AfterTime(c) => c.on_start(host),
            Condition::Predicate(c) => c.on_start(host),
            Condition::DependencyRunning(c) => c.on_start(host),
            Condition::Default => {}
            Condition::And(c) => c.on_start(host),
            Condition::Custom(c) => c.on_start(host),
        }
    }

    fn is_met(&mut self, host: &mut H) -> bool {
        match self {
            Condition::AfterTime(c) => c.is_met(host),
            Condition::Predicate(c) => c.is_met(host),
            Condition::DependencyRunning(c) => c.is_met(host),
            Condition::Default => true,
            Condition::And(c) => c.is_met(host),
            Condition::Custom(c) => c.is_met(host),
        }
    }

    fn on_end(&mut self, host: &mut H) {
        match self {
            Condition::AfterTime(c) => c.on_end(host),
            Condition::Predicate(c) => c.on_end(host),
            Condition::DependencyRunning(c) => c.on_end(host),
            Condition::Default => {}
            Condition::And(c) => c.on_end(host),
            Condition::Custom(c) => c.on_end(host),
        }
    }
}

impl<H> std::fmt::Debug for Condition<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::AfterTime(c) => std::fmt::Debug::fmt(c, f),
            Condition::Predicate(c) => std::fmt::Debug::fmt(c, f),
            Condition::DependencyRunning(c) => std::fmt::Debug::fmt(c, f),
            Condition::And(c) => f.debug_tuple("And").field(&c.children).finish(),
            Condition::Default | Condition::Custom(_) => f.write_str(self.kind()),
        }
    }
}
