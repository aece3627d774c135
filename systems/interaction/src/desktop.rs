//! Keyboard and mouse emulation of a headset with one controller.

use glam::{Vec2, Vec3};
use vr_survival_core::Ray;

use crate::input::{Action, Axis, ButtonState, InputSource, Pointer};

/// Degrees the head turns per unit of mouse movement.
pub const LOOK_SPEED: f32 = 1.5;
const CONTROLLER_MULTIPLIER: f32 = 2.0;

/// Raw keyboard and mouse levels for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DesktopSample {
    /// Mouse movement since the previous frame.
    pub mouse_delta: Vec2,
    /// Rotate-head key (Q) is down.
    pub rotate_head: bool,
    /// Rotate-controller key (C) is down.
    pub rotate_controller: bool,
    /// Left mouse button is down.
    pub left_mouse: bool,
    /// Right mouse button is down.
    pub right_mouse: bool,
    /// Teleport key (T) is down.
    pub teleport_key: bool,
    /// Jump key (Space) is down.
    pub jump_key: bool,
    /// Forward key (W) is down.
    pub forward_key: bool,
    /// Mouse wheel movement since the previous frame.
    pub scroll: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Orientation {
    yaw: f32,
    pitch: f32,
}

impl Orientation {
    fn turn(&mut self, delta: Vec2, speed: f32) {
        self.yaw += speed * delta.x;
        self.pitch -= speed * delta.y;
    }

    fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.sin() * pitch.cos(), -pitch.sin(), yaw.cos() * pitch.cos())
    }
}

/// Input source that emulates a headset and controller with mouse and
/// keyboard. Both pointers share the emulated controller ray.
#[derive(Clone, Debug)]
pub struct DesktopEmulation {
    eye_height: f32,
    controller_offset: Vec3,
    anchor: Vec3,
    head: Orientation,
    controller: Orientation,
    previous: DesktopSample,
    current: DesktopSample,
}

impl Default for DesktopEmulation {
    fn default() -> Self {
        Self::new(1.6, Vec3::new(0.25, 1.3, 0.3))
    }
}

impl DesktopEmulation {
    /// Creates an emulated rig with the head `eye_height` above the player's
    /// feet and the controller at `controller_offset` from them.
    #[must_use]
    pub fn new(eye_height: f32, controller_offset: Vec3) -> Self {
        Self {
            eye_height,
            controller_offset,
            anchor: Vec3::ZERO,
            head: Orientation::default(),
            controller: Orientation::default(),
            previous: DesktopSample::default(),
            current: DesktopSample::default(),
        }
    }

    /// Feeds one frame of keyboard and mouse state. `anchor` is the
    /// position of the player's feet.
    pub fn update(&mut self, anchor: Vec3, sample: DesktopSample) {
        self.anchor = anchor;
        if sample.rotate_head {
            self.head.turn(sample.mouse_delta, LOOK_SPEED);
        }
        if sample.rotate_controller {
            self.controller
                .turn(sample.mouse_delta, LOOK_SPEED * CONTROLLER_MULTIPLIER);
        }
        self.previous = self.current;
        self.current = sample;
    }

    fn button(&self, level: impl Fn(&DesktopSample) -> bool) -> ButtonState {
        ButtonState::from_levels(level(&self.previous), level(&self.current))
    }
}

impl InputSource for DesktopEmulation {
    fn aim_ray(&self, pointer: Pointer) -> Ray {
        match pointer {
            Pointer::Grab | Pointer::Teleport => Ray::new(
                self.anchor + self.controller_offset,
                self.controller.forward(),
            ),
            Pointer::Gaze => Ray::new(
                self.anchor + Vec3::Y * self.eye_height,
                self.head.forward(),
            ),
        }
    }

    fn action(&self, action: Action) -> ButtonState {
        match action {
            Action::Primary => self.button(|sample| sample.left_mouse),
            Action::Secondary => self.button(|sample| sample.right_mouse),
            Action::Confirm => self.button(|sample| sample.teleport_key),
            Action::Jump => self.button(|sample| sample.jump_key),
        }
    }

    fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::GrabDepth => self.current.scroll,
            Axis::Locomotion => {
                if self.current.forward_key {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_turns_twice_as_fast_as_head() {
        let mut rig = DesktopEmulation::default();
        rig.update(
            Vec3::ZERO,
            DesktopSample {
                mouse_delta: Vec2::new(30.0, 0.0),
                rotate_head: true,
                rotate_controller: true,
                ..DesktopSample::default()
            },
        );

        let gaze = rig.aim_ray(Pointer::Gaze).direction();
        let pointer = rig.aim_ray(Pointer::Grab).direction();
        assert!((gaze.x - 45.0_f32.to_radians().sin()).abs() < 1e-5);
        assert!((pointer.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn mouse_up_pitches_view_upwards() {
        let mut rig = DesktopEmulation::default();
        rig.update(
            Vec3::ZERO,
            DesktopSample {
                mouse_delta: Vec2::new(0.0, 10.0),
                rotate_head: true,
                ..DesktopSample::default()
            },
        );
        assert!(rig.aim_ray(Pointer::Gaze).direction().y > 0.0);
    }

    #[test]
    fn mouse_without_modifier_does_not_turn() {
        let mut rig = DesktopEmulation::default();
        rig.update(
            Vec3::ZERO,
            DesktopSample {
                mouse_delta: Vec2::new(50.0, 50.0),
                ..DesktopSample::default()
            },
        );
        assert_eq!(rig.aim_ray(Pointer::Gaze).direction(), Vec3::Z);
        assert_eq!(rig.aim_ray(Pointer::Teleport).direction(), Vec3::Z);
    }

    #[test]
    fn buttons_report_edges_and_axes() {
        let mut rig = DesktopEmulation::default();
        let held = DesktopSample {
            left_mouse: true,
            forward_key: true,
            scroll: -1.0,
            ..DesktopSample::default()
        };
        rig.update(Vec3::ZERO, held);
        assert!(rig.action(Action::Primary).pressed);
        assert_eq!(rig.axis(Axis::Locomotion), 1.0);
        assert_eq!(rig.axis(Axis::GrabDepth), -1.0);

        rig.update(Vec3::ZERO, held);
        assert!(!rig.action(Action::Primary).pressed);
        assert!(rig.action(Action::Primary).held);

        rig.update(Vec3::ZERO, DesktopSample::default());
        assert!(rig.action(Action::Primary).released);
    }

    #[test]
    fn rays_follow_the_anchor() {
        let mut rig = DesktopEmulation::default();
        rig.update(Vec3::new(3.0, 0.0, -2.0), DesktopSample::default());
        let gaze = rig.aim_ray(Pointer::Gaze).origin();
        assert!((gaze - Vec3::new(3.0, 1.6, -2.0)).length() < 1e-5);
        let grab = rig.aim_ray(Pointer::Grab).origin();
        assert!((grab - Vec3::new(3.25, 1.3, -1.7)).length() < 1e-5);
    }
}
