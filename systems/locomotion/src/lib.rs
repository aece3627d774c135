#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Steering locomotion: walking along the gaze, jumping and gravity.

use glam::Vec3;
use serde::Deserialize;
use vr_survival_core::{elapsed_in, Command, Event, Phase, PlayerSnapshot};

/// Tuning for the locomotion system.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Walking speed in units per second at full deflection.
    pub speed: f32,
    /// Height reached by a jump.
    pub jump_height: f32,
    /// Vertical acceleration; negative pulls the player down.
    pub gravity: f32,
    /// Axis magnitude at or below which the footsteps stop.
    pub footstep_deadzone: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            jump_height: 1.0,
            gravity: -9.81,
            footstep_deadzone: 0.0001,
        }
    }
}

/// Steering input sampled for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Steering {
    /// Direction the player's head looks at.
    pub gaze: Vec3,
    /// Forward deflection of the locomotion axis.
    pub axis: f32,
    /// The jump action went down this frame.
    pub jump: bool,
}

impl Default for Steering {
    fn default() -> Self {
        Self {
            gaze: Vec3::Z,
            axis: 0.0,
            jump: false,
        }
    }
}

/// Pure system moving the player body from steering input.
#[derive(Debug)]
pub struct Locomotion {
    config: LocomotionConfig,
    vertical_velocity: f32,
    footsteps: bool,
}

impl Locomotion {
    /// Creates a locomotion system for a player at rest.
    #[must_use]
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            vertical_velocity: 0.0,
            footsteps: false,
        }
    }

    /// Current vertical velocity of the player body.
    #[must_use]
    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Consumes the frame's events and steering input to emit movement commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        steering: Steering,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::PhaseChanged { phase } = event {
                if *phase != Phase::Playing {
                    self.vertical_velocity = 0.0;
                    self.set_footsteps(false, out);
                }
            }
        }

        let dt = elapsed_in(events).as_secs_f32();
        if dt <= 0.0 {
            return;
        }

        if player.grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = 0.0;
        }

        let flat_gaze = Vec3::new(steering.gaze.x, 0.0, steering.gaze.z).normalize_or_zero();
        if flat_gaze != Vec3::ZERO {
            out.push(Command::OrientPlayer { forward: flat_gaze });
        }
        let walk = flat_gaze * steering.axis.clamp(0.0, 1.0) * self.config.speed * dt;

        if steering.axis > 0.0 {
            self.set_footsteps(true, out);
        }
        if steering.axis.abs() <= self.config.footstep_deadzone {
            self.set_footsteps(false, out);
        }

        if steering.jump && player.grounded {
            self.vertical_velocity += (self.config.jump_height * -3.0 * self.config.gravity)
                .max(0.0)
                .sqrt();
            tracing::trace!(velocity = self.vertical_velocity, "jump");
        }
        self.vertical_velocity += self.config.gravity * dt;

        let translation = walk + Vec3::Y * (self.vertical_velocity * dt);
        if translation != Vec3::ZERO {
            out.push(Command::MovePlayer { translation });
        }
    }

    fn set_footsteps(&mut self, playing: bool, out: &mut Vec<Command>) {
        if self.footsteps != playing {
            self.footsteps = playing;
            out.push(Command::SetFootsteps { playing });
        }
    }
}
