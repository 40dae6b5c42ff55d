// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reference host for state flows.
//!
//! The world owns the property blackboard that conditions and events read
//! and write, the random source for timed waits, and the registry of named
//! machines that dependency conditions look up.

use crate::config::PlayerConfig;
use indexmap::IndexMap;
use ordoplay_state_flow::{Host, RunStatus};
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::rc::Rc;
use std::sync::Arc;

/// Blackboard handle shared between the world and flow callbacks
pub type SharedBlackboard = Arc<RwLock<Blackboard>>;

/// Named numeric properties, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blackboard {
    values: IndexMap<String, f32>,
}

impl Blackboard {
    /// Create an empty blackboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value, 0.0 if never set
    pub fn get(&self, key: &str) -> f32 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    /// Get a value if it was ever set
    pub fn try_get(&self, key: &str) -> Option<f32> {
        self.values.get(key).copied()
    }

    /// Set a value
    pub fn set(&mut self, key: impl Into<String>, value: f32) {
        self.values.insert(key.into(), value);
    }

    /// Add to a value, starting from 0.0
    pub fn add(&mut self, key: impl Into<String>, amount: f32) -> f32 {
        let value = self.values.entry(key.into()).or_insert(0.0);
        *value += amount;
        *value
    }

    /// Remove a value
    pub fn remove(&mut self, key: &str) -> Option<f32> {
        self.values.shift_remove(key)
    }

    /// Check if a value was set
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over all values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Get value count
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Host implementation used by the player
pub struct World {
    delta_time: f32,
    rng: StdRng,
    blackboard: SharedBlackboard,
    machines: IndexMap<String, Rc<dyn RunStatus>>,
    /// Simulated time since the world was created
    pub elapsed_time: f64,
    /// Fixed steps taken
    pub tick_count: u64,
}

impl World {
    /// Create a world from player settings
    pub fn new(config: &PlayerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            delta_time: 0.0,
            rng,
            blackboard: Arc::new(RwLock::new(Blackboard::new())),
            machines: IndexMap::new(),
            elapsed_time: 0.0,
            tick_count: 0,
        }
    }

    /// Begin a fixed step of `delta_time` seconds
    pub fn begin_tick(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
        self.elapsed_time += f64::from(delta_time);
        self.tick_count += 1;
    }

    /// Handle to the blackboard
    pub fn blackboard(&self) -> SharedBlackboard {
        Arc::clone(&self.blackboard)
    }

    /// Make a machine visible to dependency conditions
    pub fn register_machine(&mut self, name: impl Into<String>, status: Rc<dyn RunStatus>) {
        let name = name.into();
        tracing::debug!(machine = %name, "Registered machine");
        self.machines.insert(name, status);
    }

    /// Remove a machine from the registry
    pub fn unregister_machine(&mut self, name: &str) -> bool {
        self.machines.shift_remove(name).is_some()
    }
}

impl Host for World {
    fn delta_time(&self) -> f32 {
        self.delta_time
    }

    fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    fn resolve_dependency(&mut self, name: &str) -> Option<Rc<dyn RunStatus>> {
        self.machines.get(name).cloned()
    }
}
