// SPDX-License-Identifier: MIT OR Apache-2.0
//! Instrumented host shared by the unit tests.

use crate::host::{Host, RunStatus};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Fixed-delta host that records every callback it sees
pub(crate) struct TestHost {
    /// Delta returned for every tick
    pub dt: f32,
    /// Callback journal, in call order
    pub log: Vec<String>,
    /// Scratch counter for background logic
    pub counter: i32,
    /// Named running flags
    pub machines: HashMap<String, Rc<Cell<bool>>>,
}

impl TestHost {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            log: Vec::new(),
            counter: 0,
            machines: HashMap::new(),
        }
    }

    pub fn record(&mut self, entry: impl Into<String>) {
        self.log.push(entry.into());
    }

    /// Entries starting with `prefix`
    pub fn entries(&self, prefix: &str) -> Vec<&str> {
        self.log
            .iter()
            .filter(|e| e.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.log.iter().filter(|e| *e == entry).count()
    }
}

impl Host for TestHost {
    fn delta_time(&self) -> f32 {
        self.dt
    }

    fn random_range(&mut self, min: f32, _max: f32) -> f32 {
        min
    }

    fn resolve_dependency(&mut self, name: &str) -> Option<Rc<dyn RunStatus>> {
        self.machines
            .get(name)
            .map(|flag| Rc::clone(flag) as Rc<dyn RunStatus>)
    }
}
