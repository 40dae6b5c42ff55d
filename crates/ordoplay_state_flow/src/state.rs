// SPDX-License-Identifier: MIT OR Apache-2.0
//! Branching state interpreter.
//!
//! Each tick the state runs its background logic, then tests its branches in
//! declaration order. The first branch whose effective result is true wins:
//! every condition session is closed, background logic is finished, and the
//! winning branch's target becomes the next continuation.
//!
//! A state without a branch that eventually holds never finishes. Add a
//! [`Condition::Default`](crate::condition::Condition::Default) fallback when
//! termination matters.

use crate::branch::Branch;
use crate::host::Host;
use crate::interpreter::{Interpreter, StepResult};
use crate::logic::BackgroundLogic;

/// Lifecycle of a branching state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatePhase {
    /// Never stepped
    #[default]
    NotStarted,
    /// Testing branches every tick
    Running,
    /// A branch was taken
    Taken,
    /// Stopped through [`Interpreter::abort`]
    Aborted,
}

/// Picks one transition out of a prioritized branch list
pub struct BranchingState<H> {
    name: String,
    branches: Vec<Branch<H>>,
    logic: Vec<Box<dyn BackgroundLogic<H>>>,
    phase: StatePhase,
    taken: Option<usize>,
    ticks: u64,
}

impl<H: Host> BranchingState<H> {
    /// Create an empty state
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branches: Vec::new(),
            logic: Vec::new(),
            phase: StatePhase::NotStarted,
            taken: None,
            ticks: 0,
        }
    }

    /// Append a branch; earlier branches win ties
    pub fn branch(mut self, branch: Branch<H>) -> Self {
        self.branches.push(branch);
        self
    }

    /// Append background logic
    pub fn logic(mut self, logic: impl BackgroundLogic<H> + 'static) -> Self {
        self.logic.push(Box::new(logic));
        self
    }

    /// Get the current phase
    pub fn phase(&self) -> StatePhase {
        self.phase
    }

    /// Index of the branch that was taken
    pub fn taken_branch(&self) -> Option<usize> {
        self.taken
    }

    /// Ticks spent running
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Get the branches
    pub fn branches(&self) -> &[Branch<H>] {
        &self.branches
    }

    fn start(&mut self, host: &mut H) {
        tracing::debug!(
            state = %self.name,
            branches = self.branches.len(),
            logic = self.logic.len(),
            "State started"
        );
        for branch in &mut self.branches {
            branch.on_start(host);
        }
        for logic in &mut self.logic {
            logic.on_start(host);
        }
        self.phase = StatePhase::Running;
    }

    /// Close every condition session and finish every background logic
    fn close(&mut self, host: &mut H) {
        for branch in &mut self.branches {
            branch.on_end(host);
        }
        for logic in &mut self.logic {
            logic.on_finished(host);
        }
    }
}

impl<H: Host> Interpreter<H> for BranchingState<H> {
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self, host: &mut H) -> StepResult<H> {
        match self.phase {
            StatePhase::NotStarted => self.start(host),
            StatePhase::Running => {}
            phase => {
                tracing::warn!(state = %self.name, ?phase, "Stepped a finished state");
                return StepResult::Done(None);
            }
        }
        self.ticks += 1;

        for logic in &mut self.logic {
            logic.update_logic(host);
        }

        let Some(index) = self.branches.iter_mut().position(|b| b.is_satisfied(host)) else {
            tracing::trace!(state = %self.name, tick = self.ticks, "No branch taken");
            return StepResult::Suspend;
        };

        tracing::debug!(
            state = %self.name,
            branch = %self.branches[index].label,
            index,
            tick = self.ticks,
            "Branch taken"
        );
        self.close(host);
        self.phase = StatePhase::Taken;
        self.taken = Some(index);

        StepResult::Done(self.branches[index].resolve_target(host))
    }

    fn abort(&mut self, host: &mut H) {
        if self.phase != StatePhase::Running {
            return;
        }
        tracing::debug!(state = %self.name, tick = self.ticks, "State aborted");
        self.close(host);
        self.phase = StatePhase::Aborted;
    }
}
