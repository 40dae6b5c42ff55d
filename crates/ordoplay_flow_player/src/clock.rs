// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fixed-timestep frame clock.
//!
//! Frames arrive with arbitrary lengths; flows are stepped with a constant
//! delta. The clock turns one into the other.

use crate::config::PlayerConfig;

/// Accumulates frame time into fixed simulation steps
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Simulation step in seconds
    pub fixed_timestep: f64,
    /// Time scale for simulation (1.0 = normal speed)
    time_scale: f32,
    /// Cap on steps per frame
    max_steps: u32,
    /// Accumulated delta time not yet consumed by a step
    accumulated_time: f64,
    /// Frame count since the clock started
    pub frame_count: u64,
    /// Scaled time since the clock started
    pub elapsed_time: f64,
}

impl FrameClock {
    /// Create a clock from player settings
    pub fn new(config: &PlayerConfig) -> Self {
        let mut clock = Self {
            fixed_timestep: f64::from(config.fixed_timestep),
            time_scale: 1.0,
            max_steps: config.max_steps_per_frame.max(1),
            accumulated_time: 0.0,
            frame_count: 0,
            elapsed_time: 0.0,
        };
        clock.set_time_scale(config.time_scale);
        clock
    }

    /// Register a frame and return how many fixed steps to run
    pub fn advance(&mut self, delta_time: f64) -> u32 {
        let scaled_delta = delta_time * f64::from(self.time_scale);
        self.elapsed_time += scaled_delta;
        self.accumulated_time += scaled_delta;
        self.frame_count += 1;

        let mut steps = 0;
        while self.accumulated_time >= self.fixed_timestep {
            self.accumulated_time -= self.fixed_timestep;
            steps += 1;

            // Drop the backlog rather than spiral
            if steps >= self.max_steps {
                self.accumulated_time = 0.0;
                break;
            }
        }

        steps
    }

    /// Step length handed to the host
    pub fn step_delta(&self) -> f32 {
        self.fixed_timestep as f32
    }

    /// Get the time scale
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set time scale (clamped to reasonable range)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.clamp(0.0, 10.0);
    }

    /// Clear accumulated time and counters
    pub fn reset(&mut self) {
        self.accumulated_time = 0.0;
        self.frame_count = 0;
        self.elapsed_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(fixed: f32, max_steps: u32) -> FrameClock {
        FrameClock::new(&PlayerConfig {
            fixed_timestep: fixed,
            max_steps_per_frame: max_steps,
            ..PlayerConfig::default()
        })
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = clock(0.5, 8);
        assert_eq!(clock.advance(0.25), 0);
        assert_eq!(clock.advance(0.25), 1);
        assert_eq!(clock.advance(1.0), 2);
        assert_eq!(clock.frame_count, 3);
        assert_eq!(clock.elapsed_time, 1.5);
    }

    #[test]
    fn test_caps_steps_per_frame() {
        let mut clock = clock(0.25, 4);
        assert_eq!(clock.advance(10.0), 4);
        // Backlog was dropped
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = clock(0.5, 8);
        clock.set_time_scale(2.0);
        assert_eq!(clock.advance(0.5), 2);

        clock.set_time_scale(0.0);
        assert_eq!(clock.advance(5.0), 0);

        clock.set_time_scale(100.0);
        assert_eq!(clock.time_scale(), 10.0);

        clock.reset();
        assert_eq!(clock.frame_count, 0);
    }
}
