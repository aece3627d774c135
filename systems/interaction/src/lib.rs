#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pointer interaction: highlighting, grabbing, pushing props and teleporting.
//!
//! A single [`Interactor`] covers every rig. Device differences live behind
//! the [`InputSource`] trait and the behavioural differences between rigs
//! live in [`InteractionConfig`].

mod desktop;
mod input;
mod vr;

use glam::Vec3;
use serde::Deserialize;
use vr_survival_core::{elapsed_in, Command, Event, GrabbableId, Ray, RayHit, Rgba, Surface};

pub use desktop::{DesktopEmulation, DesktopSample, LOOK_SPEED};
pub use input::{Action, Axis, ButtonState, InputSource, Pointer};
pub use vr::{Pose, VrController, VrSample};

/// Teleport behaviour of a rig.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    /// Height above the ground hit at which the player lands.
    pub landing_height: f32,
    /// Height above the ground hit at which the marker is drawn.
    pub marker_lift: f32,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            landing_height: 0.28,
            marker_lift: 0.01,
        }
    }
}

/// Tuning that distinguishes the interaction rigs.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Speed at which the depth axis pushes or pulls a held prop.
    pub push_speed: f32,
    /// Closest a held prop may come to the pointer.
    pub min_reach: f32,
    /// Farthest a held prop may be pushed from the pointer.
    pub max_reach: f32,
    /// Length of every pointer ray.
    pub ray_length: f32,
    /// Pointer colour while a prop is highlighted.
    pub pointer_tint: Rgba,
    /// Pointer colour while nothing is highlighted.
    pub idle_pointer_tint: Rgba,
    /// Teleport behaviour; rigs without one cannot teleport.
    pub teleport: Option<TeleportConfig>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self::controller_grab_teleport()
    }
}

impl InteractionConfig {
    /// Mouse-driven grabbing without teleport.
    #[must_use]
    pub fn emulated_grab() -> Self {
        Self {
            push_speed: 4.5,
            min_reach: 0.4,
            max_reach: 7.0,
            ray_length: 30.0,
            pointer_tint: Rgba::new(1.0, 1.0, 0.0, 1.0),
            idle_pointer_tint: Rgba::new(1.0, 1.0, 0.0, 0.5),
            teleport: None,
        }
    }

    /// Mouse-driven grabbing with teleport.
    #[must_use]
    pub fn emulated_grab_teleport() -> Self {
        Self {
            push_speed: 4.0,
            pointer_tint: Rgba::new(1.0, 0.0, 0.0, 1.0),
            idle_pointer_tint: Rgba::new(1.0, 0.0, 0.0, 0.6),
            teleport: Some(TeleportConfig {
                landing_height: 1.02,
                ..TeleportConfig::default()
            }),
            ..Self::emulated_grab()
        }
    }

    /// Controller grabbing without teleport.
    #[must_use]
    pub fn controller_grab() -> Self {
        Self::emulated_grab()
    }

    /// Controller grabbing with teleport.
    #[must_use]
    pub fn controller_grab_teleport() -> Self {
        Self {
            teleport: Some(TeleportConfig::default()),
            ..Self::emulated_grab_teleport()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Held {
    object: GrabbableId,
    distance: f32,
}

/// Pure system turning pointer input into interaction commands.
#[derive(Debug)]
pub struct Interactor {
    config: InteractionConfig,
    highlighted: Option<Option<GrabbableId>>,
    held: Option<Held>,
    marker_shown: bool,
}

impl Interactor {
    /// Creates an interactor with nothing highlighted or held.
    #[must_use]
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            highlighted: None,
            held: None,
            marker_shown: false,
        }
    }

    /// Prop currently held, if any.
    #[must_use]
    pub fn held(&self) -> Option<GrabbableId> {
        self.held.map(|held| held.object)
    }

    /// Consumes the frame's input and emits interaction commands.
    ///
    /// `raycast` resolves the closest hit of a ray within a maximum distance
    /// against the world.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: &dyn InputSource,
        raycast: &dyn Fn(&Ray, f32) -> Option<RayHit>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::ObjectReleased { object } = event {
                if self.held() == Some(*object) {
                    self.held = None;
                }
            }
        }
        let dt = elapsed_in(events).as_secs_f32();

        let grab_ray = input.aim_ray(Pointer::Grab);
        let grab_hit = raycast(&grab_ray, self.config.ray_length);
        self.update_highlight(grab_hit.as_ref(), out);
        self.update_grab(input, &grab_ray, grab_hit.as_ref(), dt, out);

        if let Some(teleport) = self.config.teleport {
            self.update_teleport(teleport, input, raycast, out);
        }
    }

    fn update_highlight(&mut self, hit: Option<&RayHit>, out: &mut Vec<Command>) {
        if self.held.is_some() {
            return;
        }
        let target = hit.and_then(|hit| match hit.surface {
            Surface::Grabbable(id) => Some(id),
            Surface::Ground => None,
        });
        if self.highlighted == Some(target) {
            return;
        }
        self.highlighted = Some(target);
        let pointer_tint = if target.is_some() {
            self.config.pointer_tint
        } else {
            self.config.idle_pointer_tint
        };
        out.push(Command::HighlightGrabbable {
            target,
            pointer_tint,
        });
    }

    fn update_grab(
        &mut self,
        input: &dyn InputSource,
        ray: &Ray,
        hit: Option<&RayHit>,
        dt: f32,
        out: &mut Vec<Command>,
    ) {
        let primary = input.action(Action::Primary);

        if primary.pressed && self.held.is_none() {
            if let Some(hit) = hit {
                if let Surface::Grabbable(object) = hit.surface {
                    let distance = hit.center.distance(ray.origin());
                    self.held = Some(Held {
                        object,
                        distance: distance.clamp(self.config.min_reach, self.config.max_reach),
                    });
                    tracing::debug!(object = object.get(), distance, "grabbed prop");
                    out.push(Command::GrabObject { object });
                }
            }
        }

        if primary.released {
            if let Some(held) = self.held.take() {
                out.push(Command::ReleaseObject {
                    object: held.object,
                });
                return;
            }
        }

        if let Some(held) = self.held.as_mut() {
            let push = input.axis(Axis::GrabDepth) * self.config.push_speed * dt;
            held.distance =
                (held.distance + push).clamp(self.config.min_reach, self.config.max_reach);
            out.push(Command::MoveGrabbed {
                object: held.object,
                position: ray.point_at(held.distance),
            });
        }
    }

    fn update_teleport(
        &mut self,
        teleport: TeleportConfig,
        input: &dyn InputSource,
        raycast: &dyn Fn(&Ray, f32) -> Option<RayHit>,
        out: &mut Vec<Command>,
    ) {
        let aiming = input.action(Action::Secondary);
        if !aiming.held {
            if self.marker_shown {
                self.marker_shown = false;
                out.push(Command::HideTeleportMarker);
            }
            return;
        }

        let ray = input.aim_ray(Pointer::Teleport);
        let Some(hit) = raycast(&ray, self.config.ray_length) else {
            return;
        };
        if hit.surface != Surface::Ground {
            return;
        }

        self.marker_shown = true;
        out.push(Command::ShowTeleportMarker {
            position: hit.point + Vec3::Y * teleport.marker_lift,
            normal: hit.normal,
        });
        if input.action(Action::Confirm).pressed {
            out.push(Command::RequestTeleport {
                destination: hit.point + Vec3::Y * teleport.landing_height,
            });
        }
    }
}
