// SPDX-License-Identifier: MIT OR Apache-2.0
//! Guard patrol demo.
//!
//! Two flows share one world:
//! - `ambience` plays a single long span and then goes idle
//! - `main` fades in, patrols until the guard is down, the noise triggers
//!   the alarm, or the ambience stops
//!
//! The alarm timeline exits early, so its reinforcement event never fires.

use crate::clock::FrameClock;
use crate::config::{PlayerConfig, Result};
use crate::director::Director;
use crate::world::{Blackboard, SharedBlackboard, World};
use ordoplay_state_flow::{
    goto, stop, Branch, BranchingState, Condition, Continuation, Host, LogicFn, PredicateCall, Timeline,
    TimelineEvent, TimelineRunner,
};

/// Name the ambience flow is registered under
pub const AMBIENCE: &str = "ambience";

/// Outcome of a player run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Frames played
    pub frames: u64,
    /// Fixed steps taken
    pub steps: u64,
    /// Simulated seconds
    pub elapsed_time: f64,
    /// Hand-overs made by the main flow
    pub main_transitions: u64,
    /// Hand-overs made by the ambience flow
    pub ambience_transitions: u64,
    /// Both flows went idle before the frame limit
    pub finished: bool,
    /// Final blackboard contents
    pub blackboard: Blackboard,
}

/// Fade the lights in, then hand the guard its health
pub fn intro_timeline() -> Result<Timeline<World>> {
    let events = vec![
        TimelineEvent::call(0.0, |w: &mut World| w.blackboard().write().set("light", 0.0))
            .with_label("lights_off"),
        TimelineEvent::span(0.0, 1.0, |w: &mut World, progress| {
            w.blackboard().write().set("light", progress);
        })
        .with_label("fade_in"),
        TimelineEvent::call(1.0, |w: &mut World| w.blackboard().write().set("guard_hp", 3.0))
            .with_label("spawn_guard"),
    ];
    Ok(Timeline::new("intro", events)?)
}

/// Sound the alarm; the exit cuts the siren short
pub fn alarm_timeline() -> Result<Timeline<World>> {
    let events = vec![
        TimelineEvent::call(0.0, |w: &mut World| w.blackboard().write().set("alarm", 1.0))
            .with_label("raise_alarm"),
        TimelineEvent::span(0.0, 2.0, |w: &mut World, progress| {
            w.blackboard().write().set("siren", progress);
        })
        .with_label("siren"),
        TimelineEvent::exit_state(0.5).with_label("cut"),
        TimelineEvent::call(1.0, |w: &mut World| w.blackboard().write().set("reinforcements", 1.0))
            .with_label("reinforcements"),
    ];
    Ok(Timeline::new("alarm", events)?)
}

/// Declare victory
pub fn victory_timeline() -> Result<Timeline<World>> {
    let events = vec![
        TimelineEvent::call(0.0, |w: &mut World| w.blackboard().write().set("victory", 1.0))
            .with_label("victory"),
    ];
    Ok(Timeline::new("victory", events)?)
}

/// Patrol until one of the exits holds.
///
/// Branches in priority order:
/// 1. guard health is gone
/// 2. a short random wait has passed and the noise is high
/// 3. the ambience flow is no longer running
pub fn patrol_state(blackboard: SharedBlackboard) -> Result<BranchingState<World>> {
    let noise = LogicFn::new("noise", |w: &mut World| {
        let dt = w.delta_time();
        w.blackboard().write().add("noise", dt * 10.0);
    })
    .with_start(|w: &mut World| w.blackboard().write().set("noise", 0.0));

    let stamina = LogicFn::new("stamina", |w: &mut World| {
        let dt = w.delta_time();
        w.blackboard().write().add("guard_hp", -dt * 0.5);
    });

    let guard_down = PredicateCall::bound("guard_down", blackboard, |board: &SharedBlackboard| {
        board.read().get("guard_hp") <= 0.0
    });
    let noisy = Condition::and(vec![
        Condition::after_time(0.5, 1.0)?,
        Condition::predicate("noisy", |w: &mut World| w.blackboard().read().get("noise") >= 15.0),
    ]);

    let alarm = TimelineRunner::new(alarm_timeline()?);
    let victory = TimelineRunner::new(victory_timeline()?);

    Ok(BranchingState::new("patrol")
        .logic(noise)
        .logic(stamina)
        .branch(
            Branch::new(Condition::Predicate(guard_down), goto(Box::new(victory)))
                .with_label("guard_down"),
        )
        .branch(Branch::new(noisy, goto(Box::new(alarm))).with_label("alarm"))
        .branch(
            Branch::unless(Condition::dependency_running(AMBIENCE), stop())
                .with_label("ambience_over"),
        ))
}

/// Intro followed by the patrol
pub fn guard_flow(blackboard: SharedBlackboard) -> Result<Continuation<World>> {
    let patrol = patrol_state(blackboard)?;
    let intro = TimelineRunner::new(intro_timeline()?).then(goto(Box::new(patrol)));
    Ok(Box::new(intro))
}

/// A single four second span
pub fn ambience_flow() -> Result<Continuation<World>> {
    let events = vec![TimelineEvent::span(0.0, 4.0, |w: &mut World, progress| {
        w.blackboard().write().set("ambience", progress);
    })
    .with_label("wind")];
    Ok(Box::new(TimelineRunner::new(Timeline::new(AMBIENCE, events)?)))
}

/// Play both flows until they are idle or the frame limit is reached
pub fn run(config: &PlayerConfig) -> Result<RunSummary> {
    config.validate()?;

    let mut world = World::new(config);
    let mut clock = FrameClock::new(config);

    let mut ambience = Director::new(AMBIENCE);
    ambience.start(ambience_flow()?);
    world.register_machine(AMBIENCE, ambience.status());

    let mut main = Director::new("main");
    main.start(guard_flow(world.blackboard())?);

    let mut frames = 0;
    let mut steps = 0;
    while frames < config.max_frames && (main.is_running() || ambience.is_running()) {
        for _ in 0..clock.advance(f64::from(config.frame_time)) {
            world.begin_tick(clock.step_delta());
            ambience.tick(&mut world);
            main.tick(&mut world);
            steps += 1;
        }
        frames += 1;
    }

    let finished = !main.is_running() && !ambience.is_running();
    if finished {
        tracing::info!(frames, steps, elapsed = world.elapsed_time, "All flows idle");
    } else {
        tracing::warn!(
            frames,
            main = ?main.current_name(),
            ambience = ?ambience.current_name(),
            "Frame limit reached with flows still running"
        );
    }

    let blackboard = world.blackboard().read().clone();
    Ok(RunSummary {
        frames,
        steps,
        elapsed_time: world.elapsed_time,
        main_transitions: main.transitions(),
        ambience_transitions: ambience.transitions(),
        finished,
        blackboard,
    })
}
