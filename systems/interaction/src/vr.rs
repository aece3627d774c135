//! Tracked headset with two hand controllers.

use glam::{Vec2, Vec3};
use vr_survival_core::Ray;

use crate::input::{Action, Axis, ButtonState, InputSource, Pointer};

const STICK_DEADZONE: f32 = 0.01;

/// World-space pose of a tracked device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Device position.
    pub position: Vec3,
    /// Direction the device points at.
    pub forward: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::Z,
        }
    }
}

/// Tracking and controller state for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VrSample {
    /// Headset pose.
    pub head: Pose,
    /// Left controller pose.
    pub left: Pose,
    /// Right controller pose.
    pub right: Pose,
    /// Left trigger is pulled.
    pub left_trigger: bool,
    /// Right trigger is pulled.
    pub right_trigger: bool,
    /// Left thumbstick deflection.
    pub left_stick: Vec2,
    /// Right thumbstick deflection.
    pub right_stick: Vec2,
}

impl VrSample {
    fn teleport_aim(&self) -> bool {
        self.left_stick.y > STICK_DEADZONE
    }
}

/// Input source backed by a headset and two controllers.
#[derive(Clone, Debug, Default)]
pub struct VrController {
    previous: VrSample,
    current: VrSample,
}

impl VrController {
    /// Creates a rig with no input history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one frame of tracking and controller state.
    pub fn update(&mut self, sample: VrSample) {
        self.previous = self.current;
        self.current = sample;
    }

    fn button(&self, level: impl Fn(&VrSample) -> bool) -> ButtonState {
        ButtonState::from_levels(level(&self.previous), level(&self.current))
    }
}

impl InputSource for VrController {
    fn aim_ray(&self, pointer: Pointer) -> Ray {
        let pose = match pointer {
            Pointer::Grab => self.current.right,
            Pointer::Teleport => self.current.left,
            Pointer::Gaze => self.current.head,
        };
        Ray::new(pose.position, pose.forward)
    }

    fn action(&self, action: Action) -> ButtonState {
        match action {
            Action::Primary => self.button(|sample| sample.right_trigger),
            Action::Secondary => self.button(VrSample::teleport_aim),
            Action::Confirm | Action::Jump => self.button(|sample| sample.left_trigger),
        }
    }

    fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::GrabDepth => self.current.right_stick.y,
            Axis::Locomotion => self.current.left_stick.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_hand_owns_a_pointer() {
        let mut rig = VrController::new();
        rig.update(VrSample {
            head: Pose {
                position: Vec3::new(0.0, 1.7, 0.0),
                forward: Vec3::Z,
            },
            left: Pose {
                position: Vec3::new(-0.2, 1.2, 0.3),
                forward: Vec3::new(0.0, -1.0, 1.0),
            },
            right: Pose {
                position: Vec3::new(0.2, 1.2, 0.3),
                forward: Vec3::X,
            },
            ..VrSample::default()
        });

        assert_eq!(rig.aim_ray(Pointer::Grab).direction(), Vec3::X);
        assert_eq!(
            rig.aim_ray(Pointer::Teleport).origin(),
            Vec3::new(-0.2, 1.2, 0.3)
        );
        assert_eq!(rig.aim_ray(Pointer::Gaze).origin().y, 1.7);
    }

    #[test]
    fn left_stick_forward_aims_teleport() {
        let mut rig = VrController::new();
        rig.update(VrSample {
            left_stick: Vec2::new(0.0, 0.005),
            ..VrSample::default()
        });
        assert!(!rig.action(Action::Secondary).held);

        rig.update(VrSample {
            left_stick: Vec2::new(0.0, 0.5),
            ..VrSample::default()
        });
        assert!(rig.action(Action::Secondary).pressed);
        assert_eq!(rig.axis(Axis::Locomotion), 0.5);
    }

    #[test]
    fn left_trigger_confirms_and_jumps() {
        let mut rig = VrController::new();
        rig.update(VrSample {
            left_trigger: true,
            right_stick: Vec2::new(0.0, -0.8),
            ..VrSample::default()
        });
        assert!(rig.action(Action::Confirm).pressed);
        assert!(rig.action(Action::Jump).pressed);
        assert!(!rig.action(Action::Primary).held);
        assert_eq!(rig.axis(Axis::GrabDepth), -0.8);
    }
}
