//! Scripted player used to drive headless rounds.

use glam::{Vec2, Vec3};
use vr_survival_core::{flat_direction, Phase};
use vr_survival_system_armory::TriggerState;
use vr_survival_system_interaction::{
    DesktopEmulation, DesktopSample, InputSource, Pose, VrController, VrSample, LOOK_SPEED,
};
use vr_survival_system_session::{FrameInput, Session, SettingsStore};
use vr_survival_world::query;

const EYE_HEIGHT: f32 = 1.6;
const HAND_OFFSET: Vec3 = Vec3::new(0.25, 1.3, 0.3);

enum Rig {
    Controller(VrController),
    Desktop {
        emulation: DesktopEmulation,
        yaw: f32,
    },
}

/// Turns toward the nearest enemy and shoots once it is within range.
pub(crate) struct Autopilot {
    rig: Rig,
    pulled: bool,
}

impl Autopilot {
    /// Drives a tracked headset and controllers.
    pub(crate) fn controller() -> Self {
        Self::with_rig(Rig::Controller(VrController::new()))
    }

    /// Drives the keyboard and mouse emulation.
    pub(crate) fn desktop() -> Self {
        Self::with_rig(Rig::Desktop {
            emulation: DesktopEmulation::new(EYE_HEIGHT, HAND_OFFSET),
            yaw: 0.0,
        })
    }

    fn with_rig(rig: Rig) -> Self {
        Self { rig, pulled: false }
    }

    /// Input device the session should read this frame.
    pub(crate) fn source(&self) -> &dyn InputSource {
        match &self.rig {
            Rig::Controller(rig) => rig,
            Rig::Desktop { emulation, .. } => emulation,
        }
    }

    /// Samples the rig and host input for the next frame.
    pub(crate) fn plan<S: SettingsStore>(&mut self, session: &Session<S>) -> FrameInput {
        let phase = session.phase();
        let world = session.world();
        let player = query::player(world);

        let range = {
            let config = query::config(world);
            config.projectile_speed * config.projectile_lifetime + config.enemy_radius
        };
        let target = query::enemy_view(world)
            .iter()
            .map(|enemy| (enemy.position.distance(player.position), enemy.position))
            .min_by(|a, b| a.0.total_cmp(&b.0));

        let aim = target
            .and_then(|(_, position)| flat_direction(player.position, position))
            .unwrap_or(player.forward);
        self.look(player.position, aim);

        let engaged = phase == Phase::Playing
            && target.is_some_and(|(distance, _)| distance <= range);
        // Alternate the trigger so semi-automatic fire sees press edges.
        let pressed = engaged && !self.pulled;
        self.pulled = pressed;

        FrameInput {
            start: phase == Phase::Splash,
            restart: false,
            trigger: TriggerState {
                pressed,
                held: engaged,
            },
        }
    }

    fn look(&mut self, feet: Vec3, aim: Vec3) {
        match &mut self.rig {
            Rig::Controller(rig) => {
                let hand = Pose {
                    position: feet + HAND_OFFSET,
                    forward: aim,
                };
                rig.update(VrSample {
                    head: Pose {
                        position: feet + Vec3::Y * EYE_HEIGHT,
                        forward: aim,
                    },
                    left: hand,
                    right: hand,
                    ..VrSample::default()
                });
            }
            Rig::Desktop { emulation, yaw } => {
                let target = aim.x.atan2(aim.z).to_degrees();
                let turn = (target - *yaw + 180.0).rem_euclid(360.0) - 180.0;
                *yaw += turn;
                emulation.update(
                    feet,
                    DesktopSample {
                        mouse_delta: Vec2::new(turn / LOOK_SPEED, 0.0),
                        rotate_head: true,
                        ..DesktopSample::default()
                    },
                );
            }
        }
    }
}
