#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the VR survival simulation.
//!
//! This crate defines the message surface that connects the session, the
//! authoritative world, and pure systems. Systems submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to on the next pass. Systems consume event streams, read immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

mod tasks;

pub use tasks::{TaskQueue, TimedTask};

/// Prompt shown while the splash screen waits for the player.
pub const SPLASH_PROMPT: &str = "Press Enter to begin.";

/// Height of the flat ground plane every body stands on.
pub const GROUND_HEIGHT: f32 = 0.0;

/// Lifecycle phase of a survival round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Splash screen is shown and nothing advances until the player starts.
    Splash,
    /// The round is running.
    Playing,
    /// The player died; gameplay is frozen until a restart.
    GameOver,
}

/// Difficulty tier implied by the elapsed round time.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    /// Opening tier.
    #[default]
    Normal,
    /// First escalation.
    Enhanced,
    /// Final escalation.
    Extreme,
}

impl DifficultyTier {
    /// Every tier in escalation order.
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Normal,
        DifficultyTier::Enhanced,
        DifficultyTier::Extreme,
    ];

    /// Human readable name used in HUD text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            DifficultyTier::Normal => "Normal",
            DifficultyTier::Enhanced => "Enhanced",
            DifficultyTier::Extreme => "EXTREME",
        }
    }

    /// Glow applied to enemies spawned at this tier.
    #[must_use]
    pub const fn glow(self) -> Glow {
        match self {
            DifficultyTier::Normal => Glow {
                color: Rgba::new(0.2, 0.8, 0.2, 1.0),
                light_intensity: 0.3,
            },
            DifficultyTier::Enhanced => Glow {
                color: Rgba::new(1.0, 0.6, 0.2, 1.0),
                light_intensity: 0.4,
            },
            DifficultyTier::Extreme => Glow {
                color: Rgba::new(1.0, 0.2, 0.2, 1.0),
                light_intensity: 0.5,
            },
        }
    }

    /// Screen flash played when the tier activates, if any.
    #[must_use]
    pub const fn activation_flash(self) -> Option<Rgba> {
        match self {
            DifficultyTier::Normal => None,
            DifficultyTier::Enhanced => Some(Rgba::new(1.0, 0.6, 0.2, 0.3)),
            DifficultyTier::Extreme => Some(Rgba::new(1.0, 0.2, 0.2, 0.4)),
        }
    }
}

/// Emissive tint and point light strength applied to an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    /// Emission and light colour.
    pub color: Rgba,
    /// Intensity of the attached point light.
    pub light_intensity: f32,
}

impl Glow {
    /// Emission colour scaled to the subtle strength used on enemy materials.
    #[must_use]
    pub fn emission(&self) -> Rgba {
        Rgba::new(
            self.color.red * 0.1,
            self.color.green * 0.1,
            self.color.blue * 0.1,
            self.color.alpha,
        )
    }
}

/// RGBA colour with floating point channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel intensity.
    pub red: f32,
    /// Green channel intensity.
    pub green: f32,
    /// Blue channel intensity.
    pub blue: f32,
    /// Alpha channel intensity.
    #[serde(default = "opaque")]
    pub alpha: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a colour from its channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Returns the same colour with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a grabbable prop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GrabbableId(u32);

impl GrabbableId {
    /// Creates a new grabbable identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Behaviour state of a single enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum EnemyState {
    /// Walking toward the player.
    #[default]
    Chasing,
    /// In reach of the player and biting on a timer.
    Attacking,
}

/// Trigger behaviour of the player's weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireMode {
    /// One shot per trigger press.
    #[default]
    SemiAuto,
    /// Continuous fire while the trigger is held.
    Rapid,
}

/// Audio the host should play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Cannon shot at a projectile's origin.
    Cannon,
    /// Looping footsteps should start.
    FootstepsStarted,
    /// Looping footsteps should stop.
    FootstepsStopped,
    /// Teleport marker confirmation chime.
    TeleportChime,
    /// Background music finished fading out and stopped.
    MusicStopped,
}

/// Half-line used for pointing and gaze queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalising the direction. Degenerate directions fall
    /// back to world forward (`+Z`).
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.normalize_or_zero();
        let direction = if direction == Vec3::ZERO {
            Vec3::Z
        } else {
            direction
        };
        Self { origin, direction }
    }

    /// Start of the ray.
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit direction of the ray.
    #[must_use]
    pub const fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point reached after travelling `distance` along the ray.
    #[must_use]
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Kind of body a ray struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    /// The walkable ground plane.
    Ground,
    /// A grabbable prop.
    Grabbable(GrabbableId),
}

/// Closest intersection reported by a ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Body that was struck.
    pub surface: Surface,
    /// World position of the intersection.
    pub point: Vec3,
    /// Surface normal at the intersection.
    pub normal: Vec3,
    /// Distance from the ray origin to the intersection.
    pub distance: f32,
    /// Centre of the struck body. Equal to `point` for the ground.
    pub center: Vec3,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Leaves the splash screen and starts the round.
    StartRound,
    /// Ends the round after the player died.
    EndRound,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Creates an enemy facing the player.
    SpawnEnemy {
        /// Spawn position.
        position: Vec3,
        /// Tier the enemy was scaled for.
        tier: DifficultyTier,
        /// Movement speed in units per second, tier scaling already applied.
        speed: f32,
        /// Damage dealt per bite, tier bonus already applied.
        damage: i32,
    },
    /// Moves an enemy and updates its facing.
    MoveEnemy {
        /// Enemy to move.
        enemy: EnemyId,
        /// New world position.
        position: Vec3,
        /// New facing direction.
        facing: Vec3,
    },
    /// Transitions an enemy's behaviour state.
    SetEnemyState {
        /// Enemy to update.
        enemy: EnemyId,
        /// State to enter.
        state: EnemyState,
    },
    /// Applies one bite of the enemy's damage to the player.
    BitePlayer {
        /// Enemy dealing the damage.
        enemy: EnemyId,
    },
    /// Launches a player projectile.
    FireProjectile {
        /// Muzzle position.
        origin: Vec3,
        /// Travel direction fixed at fire time.
        direction: Vec3,
    },
    /// Overlays a full-screen flash that fades out linearly.
    FlashScreen {
        /// Starting colour; alpha fades to zero.
        color: Rgba,
        /// Length of the fade.
        duration: Duration,
    },
    /// Replaces the ammo readout with a notification for a while.
    ShowNotification {
        /// Text to show.
        text: String,
        /// How long the notification stays up.
        duration: Duration,
    },
    /// Displaces the player's body, clamped to the ground plane.
    MovePlayer {
        /// Offset to apply.
        translation: Vec3,
    },
    /// Points the player's facing along the provided direction.
    OrientPlayer {
        /// New facing direction.
        forward: Vec3,
    },
    /// Starts or stops the footstep loop.
    SetFootsteps {
        /// Whether footsteps should be audible.
        playing: bool,
    },
    /// Highlights the prop under the grab pointer, dimming any other.
    HighlightGrabbable {
        /// Prop to highlight, or `None` to dim everything.
        target: Option<GrabbableId>,
        /// Colour of the pointer beam.
        pointer_tint: Rgba,
    },
    /// Picks up a prop, making it kinematic.
    GrabObject {
        /// Prop to pick up.
        object: GrabbableId,
    },
    /// Moves a held prop.
    MoveGrabbed {
        /// Held prop.
        object: GrabbableId,
        /// New world position.
        position: Vec3,
    },
    /// Drops a held prop.
    ReleaseObject {
        /// Held prop.
        object: GrabbableId,
    },
    /// Shows the teleport destination marker.
    ShowTeleportMarker {
        /// Marker position.
        position: Vec3,
        /// Surface normal the marker aligns with.
        normal: Vec3,
    },
    /// Hides the teleport destination marker.
    HideTeleportMarker,
    /// Teleports the player after the confirmation delay.
    RequestTeleport {
        /// Landing position.
        destination: Vec3,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The round lifecycle entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Gameplay time advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// An enemy entered the world.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Spawn position.
        position: Vec3,
        /// Tier the enemy was scaled for.
        tier: DifficultyTier,
    },
    /// An enemy switched behaviour state.
    EnemyStateChanged {
        /// Enemy that transitioned.
        enemy: EnemyId,
        /// State it entered.
        state: EnemyState,
    },
    /// A projectile destroyed an enemy.
    EnemyDestroyed {
        /// Enemy that was removed.
        enemy: EnemyId,
        /// Projectile that hit it.
        projectile: ProjectileId,
    },
    /// The player took damage.
    PlayerDamaged {
        /// Enemy that bit.
        enemy: EnemyId,
        /// Damage dealt.
        amount: i32,
        /// Health left afterwards.
        health: i32,
    },
    /// Player health reached zero or below.
    PlayerDied,
    /// A projectile was launched.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Launch position.
        origin: Vec3,
        /// Travel direction.
        direction: Vec3,
    },
    /// A projectile ran out of lifetime without hitting anything.
    ProjectileExpired {
        /// Projectile that was removed.
        projectile: ProjectileId,
    },
    /// A full-screen flash started.
    ScreenFlashed {
        /// Starting colour of the flash.
        color: Rgba,
    },
    /// A notification replaced the ammo readout.
    NotificationShown {
        /// Text on display.
        text: String,
    },
    /// The active notification expired.
    NotificationCleared,
    /// The highlighted prop changed.
    HighlightChanged {
        /// Newly highlighted prop, if any.
        target: Option<GrabbableId>,
    },
    /// A prop was picked up.
    ObjectGrabbed {
        /// Prop that was picked up.
        object: GrabbableId,
    },
    /// A held prop was dropped.
    ObjectReleased {
        /// Prop that was dropped.
        object: GrabbableId,
    },
    /// A teleport was confirmed and is waiting for its delay.
    TeleportArmed {
        /// Landing position.
        destination: Vec3,
    },
    /// The player was teleported.
    Teleported {
        /// Position before the jump.
        from: Vec3,
        /// Position after the jump.
        to: Vec3,
    },
    /// Audio the host should play.
    Audio {
        /// Cue to play.
        cue: AudioCue,
    },
}

/// Converts configured seconds into a [`Duration`] rounded to the nearest
/// microsecond. Negative or non-finite values collapse to zero.
#[must_use]
pub fn seconds(value: f32) -> Duration {
    if !value.is_finite() || value <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_micros((f64::from(value) * 1_000_000.0).round() as u64)
}

/// Unit direction from `from` towards `to` on the horizontal plane, or
/// `None` when the two points share the same column.
#[must_use]
pub fn flat_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let delta = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    let direction = delta.normalize_or_zero();
    (direction != Vec3::ZERO).then_some(direction)
}

/// Sums the gameplay time carried by `TimeAdvanced` events.
#[must_use]
pub fn elapsed_in(events: &[Event]) -> Duration {
    events
        .iter()
        .filter_map(|event| match event {
            Event::TimeAdvanced { dt } => Some(*dt),
            _ => None,
        })
        .fold(Duration::ZERO, Duration::saturating_add)
}

/// Returns the last phase change carried by `events`, if any.
#[must_use]
pub fn phase_change_in(events: &[Event]) -> Option<Phase> {
    events.iter().rev().find_map(|event| match event {
        Event::PhaseChanged { phase } => Some(*phase),
        _ => None,
    })
}

/// Immutable representation of the player's body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Position of the player's feet.
    pub position: Vec3,
    /// Unit facing direction.
    pub forward: Vec3,
    /// Where projectiles leave the weapon, when the rig has a muzzle.
    pub muzzle: Option<Vec3>,
    /// Remaining health; the round ends at zero or below.
    pub health: i32,
    /// Whether the player stands on the ground plane.
    pub grounded: bool,
}

/// Immutable representation of a single enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current world position.
    pub position: Vec3,
    /// Unit facing direction.
    pub facing: Vec3,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Damage dealt per bite.
    pub damage: i32,
    /// Tier the enemy was scaled for.
    pub tier: DifficultyTier,
    /// Behaviour state.
    pub state: EnemyState,
}

/// Read-only snapshot describing every enemy in the world.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a single enemy.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Current world position.
    pub position: Vec3,
    /// Unit travel direction.
    pub direction: Vec3,
    /// Lifetime left before it despawns.
    pub remaining: Duration,
}

/// Immutable representation of a grabbable prop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrabbableSnapshot {
    /// Unique identifier assigned to the prop.
    pub id: GrabbableId,
    /// Centre of the prop.
    pub position: Vec3,
    /// Bounding sphere radius.
    pub radius: f32,
    /// Whether the prop is highlighted by the pointer.
    pub highlighted: bool,
    /// Whether the prop is currently held (kinematic).
    pub held: bool,
}

/// Immutable representation of the teleport destination marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleportMarkerSnapshot {
    /// Whether the marker is rendered.
    pub visible: bool,
    /// Marker position.
    pub position: Vec3,
    /// Surface normal the marker aligns with.
    pub normal: Vec3,
    /// Marker tint; green while a teleport is pending, yellow otherwise.
    pub color: Rgba,
    /// Whether a confirmed teleport is waiting for its delay.
    pub pending: bool,
}
