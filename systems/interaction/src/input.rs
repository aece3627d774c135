//! Device-independent view of the player's input.

use vr_survival_core::Ray;

/// Ray-casting pointer exposed by an input device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pointer {
    /// Pointer used to highlight, grab and push props.
    Grab,
    /// Pointer used to aim the teleport marker.
    Teleport,
    /// Head gaze; drives steering and facing.
    Gaze,
}

/// Digital action exposed by an input device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Grab, and fire.
    Primary,
    /// Aim the teleport marker.
    Secondary,
    /// Confirm the teleport.
    Confirm,
    /// Jump.
    Jump,
}

/// Analogue axis exposed by an input device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Pushes or pulls the held prop along the grab pointer.
    GrabDepth,
    /// Forward steering.
    Locomotion,
}

/// Edge and level state of a digital action for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// The action went down this frame.
    pub pressed: bool,
    /// The action is down.
    pub held: bool,
    /// The action went up this frame.
    pub released: bool,
}

impl ButtonState {
    /// Derives the frame state from the previous and current levels.
    #[must_use]
    pub const fn from_levels(previous: bool, current: bool) -> Self {
        Self {
            pressed: current && !previous,
            held: current,
            released: previous && !current,
        }
    }
}

/// Capabilities every input device offers to the interaction systems.
pub trait InputSource {
    /// World-space ray of `pointer`.
    fn aim_ray(&self, pointer: Pointer) -> Ray;

    /// Frame state of `action`.
    fn action(&self, action: Action) -> ButtonState;

    /// Current value of `axis`, usually in `-1.0..=1.0`.
    fn axis(&self, axis: Axis) -> f32;
}
