// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host contract consumed by the runtime.
//!
//! The runtime never owns a clock or a thread. Whatever drives it (a game
//! loop, an editor preview, a test) implements [`Host`] and steps the active
//! interpreter once per tick.

use rand::Rng;
use std::rc::Rc;

/// Handle to something that can report whether it is currently running.
///
/// Exposed by the host for [`DependencyRunning`](crate::condition::DependencyRunning)
/// conditions; the runtime only ever asks the one question.
pub trait RunStatus {
    /// Whether the referenced machine is running right now
    fn is_running(&self) -> bool;
}

impl RunStatus for std::cell::Cell<bool> {
    fn is_running(&self) -> bool {
        self.get()
    }
}

/// The object that owns per-frame timing and drives interpreters.
pub trait Host {
    /// Elapsed time in seconds since the previous tick
    fn delta_time(&self) -> f32;

    /// Draw a value in `[min, max]`.
    ///
    /// Used by [`AfterTime`](crate::condition::AfterTime) when a checking
    /// session starts. Override with a seeded generator for reproducible runs.
    fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        rand::rng().random_range(min..=max)
    }

    /// Look up a running-status handle by name.
    ///
    /// Hosts without named machines can keep the default, which resolves
    /// nothing.
    fn resolve_dependency(&mut self, name: &str) -> Option<Rc<dyn RunStatus>> {
        let _ = name;
        None
    }
}
