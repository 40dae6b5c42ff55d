// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reference host for `OrdoPlay` state flows.
//!
//! Provides what the runtime leaves to its host:
//! - A fixed-timestep frame clock
//! - A world with a shared blackboard, seeded randomness and a machine registry
//! - Directors that step a flow once per tick and install its continuations
//! - RON player configuration

pub mod clock;
pub mod config;
pub mod demo;
pub mod director;
pub mod world;

pub use clock::FrameClock;
pub use config::{PlayerConfig, PlayerError, Result};
pub use demo::{run, RunSummary};
pub use director::Director;
pub use world::{Blackboard, SharedBlackboard, World};
