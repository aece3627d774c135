#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the VR survival round.
//!
//! The world owns the player body, enemies, projectiles, grabbable props and
//! every timed presentation effect. It only changes through [`apply`] and is
//! inspected through the functions in [`query`].

mod collision;
mod presentation;

use std::{collections::BTreeMap, time::Duration};

use glam::Vec3;
use serde::Deserialize;
use vr_survival_core::{
    flat_direction, seconds, AudioCue, Command, DifficultyTier, EnemyId, EnemyState, Event,
    GrabbableId, Phase, ProjectileId, Rgba, GROUND_HEIGHT,
};

use presentation::{Deferred, Presentation};

const DEFAULT_POINTER_TINT: Rgba = Rgba::new(1.0, 1.0, 0.0, 0.5);

/// Tuning values owned by the world.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Health the player starts each round with.
    pub player_health: i32,
    /// Projectile travel speed in units per second.
    pub projectile_speed: f32,
    /// Seconds a projectile lives before it despawns.
    pub projectile_lifetime: f32,
    /// Bounding radius of a projectile.
    pub projectile_radius: f32,
    /// Bounding radius of an enemy.
    pub enemy_radius: f32,
    /// Height of an enemy's hit sphere centre above its feet.
    pub enemy_body_height: f32,
    /// Seconds between confirming a teleport and the jump.
    pub teleport_delay: f32,
    /// Background music volume while the round runs.
    pub music_volume: f32,
    /// Seconds the music takes to fade after the round ends.
    pub music_fade: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            player_health: 100,
            projectile_speed: 10.0,
            projectile_lifetime: 1.0,
            projectile_radius: 0.1,
            enemy_radius: 0.5,
            enemy_body_height: 1.0,
            teleport_delay: 0.35,
            music_volume: 0.5,
            music_fade: 2.0,
        }
    }
}

/// Placement of a grabbable prop in the arena.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PropPlacement {
    /// Centre of the prop.
    pub position: [f32; 3],
    /// Bounding sphere radius.
    pub radius: f32,
}

/// Static description of the arena the round is played in.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArenaLayout {
    /// Where the player's feet start.
    pub player_spawn: [f32; 3],
    /// Muzzle position relative to the player, expressed as
    /// `[right, up, forward]`. Projectiles leave from the player's position
    /// when absent.
    pub muzzle_offset: Option<[f32; 3]>,
    /// Props the player can pick up.
    pub props: Vec<PropPlacement>,
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self {
            player_spawn: [0.0, 0.0, 0.0],
            muzzle_offset: Some([0.2, 1.3, 0.4]),
            props: vec![
                PropPlacement {
                    position: [1.0, 0.5, 2.0],
                    radius: 0.3,
                },
                PropPlacement {
                    position: [-1.0, 0.5, 2.0],
                    radius: 0.3,
                },
                PropPlacement {
                    position: [0.0, 0.5, 3.0],
                    radius: 0.3,
                },
            ],
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    position: Vec3,
    forward: Vec3,
    health: i32,
    grounded: bool,
}

#[derive(Clone, Copy, Debug)]
struct Enemy {
    position: Vec3,
    facing: Vec3,
    speed: f32,
    damage: i32,
    tier: DifficultyTier,
    state: EnemyState,
}

#[derive(Clone, Copy, Debug)]
struct Projectile {
    position: Vec3,
    direction: Vec3,
    remaining: Duration,
}

#[derive(Clone, Copy, Debug)]
struct Grabbable {
    position: Vec3,
    radius: f32,
    highlighted: bool,
    held: bool,
}

/// Represents the authoritative state of one survival round.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    phase: Phase,
    player: Player,
    muzzle_offset: Option<Vec3>,
    enemies: BTreeMap<EnemyId, Enemy>,
    next_enemy_id: u32,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    next_projectile_id: u32,
    grabbables: BTreeMap<GrabbableId, Grabbable>,
    highlighted: Option<GrabbableId>,
    pointer_tint: Rgba,
    footsteps: bool,
    presentation: Presentation,
}

impl World {
    /// Creates a world waiting on the splash screen.
    #[must_use]
    pub fn new(config: WorldConfig, layout: &ArenaLayout) -> Self {
        let grabbables = layout
            .props
            .iter()
            .enumerate()
            .map(|(index, prop)| {
                (
                    GrabbableId::new(index as u32),
                    Grabbable {
                        position: Vec3::from(prop.position),
                        radius: prop.radius,
                        highlighted: false,
                        held: false,
                    },
                )
            })
            .collect();
        let spawn = Vec3::from(layout.player_spawn);

        Self {
            player: Player {
                position: spawn,
                forward: Vec3::Z,
                health: config.player_health,
                grounded: spawn.y <= GROUND_HEIGHT,
            },
            muzzle_offset: layout.muzzle_offset.map(Vec3::from),
            phase: Phase::Splash,
            enemies: BTreeMap::new(),
            next_enemy_id: 0,
            projectiles: BTreeMap::new(),
            next_projectile_id: 0,
            grabbables,
            highlighted: None,
            pointer_tint: DEFAULT_POINTER_TINT,
            footsteps: false,
            presentation: Presentation::new(config.music_volume),
            config,
        }
    }

    fn muzzle(&self) -> Option<Vec3> {
        let offset = self.muzzle_offset?;
        let forward = self.player.forward;
        let right = Vec3::Y.cross(forward).normalize_or_zero();
        let up = forward.cross(right).normalize_or_zero();
        Some(self.player.position + right * offset.x + up * offset.y + forward * offset.z)
    }

    fn place_player(&mut self, position: Vec3) {
        let grounded = position.y <= GROUND_HEIGHT;
        self.player.position = Vec3::new(position.x, position.y.max(GROUND_HEIGHT), position.z);
        self.player.grounded = grounded;
    }

    fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let step = self.config.projectile_speed * dt.as_secs_f32();
        let ids: Vec<ProjectileId> = self.projectiles.keys().copied().collect();

        for id in ids {
            let Some(projectile) = self.projectiles.get_mut(&id) else {
                continue;
            };
            projectile.position += projectile.direction * step;
            let position = projectile.position;

            let body = Vec3::Y * self.config.enemy_body_height;
            let struck = self.enemies.iter().find_map(|(enemy_id, enemy)| {
                collision::spheres_touch(
                    position,
                    self.config.projectile_radius,
                    enemy.position + body,
                    self.config.enemy_radius,
                )
                .then_some(*enemy_id)
            });

            if let Some(enemy) = struck {
                let _ = self.enemies.remove(&enemy);
                let _ = self.projectiles.remove(&id);
                out_events.push(Event::EnemyDestroyed {
                    enemy,
                    projectile: id,
                });
                continue;
            }

            projectile.remaining = projectile.remaining.saturating_sub(dt);
            if projectile.remaining.is_zero() {
                let _ = self.projectiles.remove(&id);
                out_events.push(Event::ProjectileExpired { projectile: id });
            }
        }
    }

    fn run_deferred(&mut self, action: Deferred, out_events: &mut Vec<Event>) {
        match action {
            Deferred::CompleteTeleport { destination } => {
                let from = self.player.position;
                self.place_player(destination);
                let marker = &mut self.presentation.marker;
                marker.pending = false;
                marker.visible = false;
                out_events.push(Event::Teleported {
                    from,
                    to: self.player.position,
                });
            }
            Deferred::ClearFlash { generation } => self.presentation.clear_flash(generation),
            Deferred::ClearNotification { generation } => {
                if self.presentation.clear_notification(generation) {
                    out_events.push(Event::NotificationCleared);
                }
            }
            Deferred::StopMusic => {
                self.presentation.stop_music();
                out_events.push(Event::Audio {
                    cue: AudioCue::MusicStopped,
                });
            }
        }
    }

    fn set_phase(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        self.phase = phase;
        tracing::debug!(?phase, "phase changed");
        out_events.push(Event::PhaseChanged { phase });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let playing = world.phase == Phase::Playing;

    match command {
        Command::StartRound => {
            if world.phase == Phase::Splash {
                world.set_phase(Phase::Playing, out_events);
            }
        }
        Command::EndRound => {
            if playing {
                world.set_phase(Phase::GameOver, out_events);
                world
                    .presentation
                    .fade_music(seconds(world.config.music_fade));
            }
        }
        Command::Tick { dt } => {
            for action in world.presentation.unscaled.advance(dt) {
                world.run_deferred(action, out_events);
            }
            if !playing {
                return;
            }

            out_events.push(Event::TimeAdvanced { dt });
            for action in world.presentation.scaled.advance(dt) {
                world.run_deferred(action, out_events);
            }
            world.advance_projectiles(dt, out_events);
        }
        Command::SpawnEnemy {
            position,
            tier,
            speed,
            damage,
        } => {
            if !playing {
                return;
            }
            let enemy = EnemyId::new(world.next_enemy_id);
            world.next_enemy_id = world.next_enemy_id.wrapping_add(1);
            let facing = flat_direction(position, world.player.position).unwrap_or(Vec3::Z);
            let _ = world.enemies.insert(
                enemy,
                Enemy {
                    position,
                    facing,
                    speed,
                    damage,
                    tier,
                    state: EnemyState::Chasing,
                },
            );
            out_events.push(Event::EnemySpawned {
                enemy,
                position,
                tier,
            });
        }
        Command::MoveEnemy {
            enemy,
            position,
            facing,
        } => {
            if !playing {
                return;
            }
            if let Some(instance) = world.enemies.get_mut(&enemy) {
                instance.position = position;
                let facing = facing.normalize_or_zero();
                if facing != Vec3::ZERO {
                    instance.facing = facing;
                }
            }
        }
        Command::SetEnemyState { enemy, state } => {
            if let Some(instance) = world.enemies.get_mut(&enemy) {
                if instance.state != state {
                    instance.state = state;
                    out_events.push(Event::EnemyStateChanged { enemy, state });
                }
            }
        }
        Command::BitePlayer { enemy } => {
            if !playing || world.player.health <= 0 {
                return;
            }
            let Some(instance) = world.enemies.get(&enemy) else {
                return;
            };
            let amount = instance.damage;
            world.player.health = world.player.health.saturating_sub(amount);
            out_events.push(Event::PlayerDamaged {
                enemy,
                amount,
                health: world.player.health,
            });
            if world.player.health <= 0 {
                out_events.push(Event::PlayerDied);
            }
        }
        Command::FireProjectile { origin, direction } => {
            if !playing {
                return;
            }
            let direction = direction.normalize_or_zero();
            let direction = if direction == Vec3::ZERO {
                world.player.forward
            } else {
                direction
            };
            let projectile = ProjectileId::new(world.next_projectile_id);
            world.next_projectile_id = world.next_projectile_id.wrapping_add(1);
            let _ = world.projectiles.insert(
                projectile,
                Projectile {
                    position: origin,
                    direction,
                    remaining: seconds(world.config.projectile_lifetime),
                },
            );
            out_events.push(Event::ProjectileFired {
                projectile,
                origin,
                direction,
            });
            out_events.push(Event::Audio {
                cue: AudioCue::Cannon,
            });
        }
        Command::FlashScreen { color, duration } => {
            world.presentation.start_flash(color, duration);
            out_events.push(Event::ScreenFlashed { color });
        }
        Command::ShowNotification { text, duration } => {
            world.presentation.show_notification(text.clone(), duration);
            out_events.push(Event::NotificationShown { text });
        }
        Command::MovePlayer { translation } => {
            if !playing {
                return;
            }
            let target = world.player.position + translation;
            world.place_player(target);
        }
        Command::OrientPlayer { forward } => {
            if !playing {
                return;
            }
            let forward = forward.normalize_or_zero();
            if forward != Vec3::ZERO {
                world.player.forward = forward;
            }
        }
        Command::SetFootsteps { playing: footsteps } => {
            if world.footsteps != footsteps {
                world.footsteps = footsteps;
                let cue = if footsteps {
                    AudioCue::FootstepsStarted
                } else {
                    AudioCue::FootstepsStopped
                };
                out_events.push(Event::Audio { cue });
            }
        }
        Command::HighlightGrabbable {
            target,
            pointer_tint,
        } => {
            world.pointer_tint = pointer_tint;
            let target = target.filter(|id| world.grabbables.contains_key(id));
            if target == world.highlighted {
                return;
            }
            if let Some(previous) = world.highlighted.and_then(|id| world.grabbables.get_mut(&id)) {
                previous.highlighted = false;
            }
            if let Some(next) = target.and_then(|id| world.grabbables.get_mut(&id)) {
                next.highlighted = true;
            }
            world.highlighted = target;
            out_events.push(Event::HighlightChanged { target });
        }
        Command::GrabObject { object } => {
            let anything_held = world.grabbables.values().any(|prop| prop.held);
            if anything_held {
                return;
            }
            if let Some(prop) = world.grabbables.get_mut(&object) {
                prop.held = true;
                out_events.push(Event::ObjectGrabbed { object });
            }
        }
        Command::MoveGrabbed { object, position } => {
            if let Some(prop) = world.grabbables.get_mut(&object) {
                if prop.held {
                    prop.position = position;
                }
            }
        }
        Command::ReleaseObject { object } => {
            if let Some(prop) = world.grabbables.get_mut(&object) {
                if prop.held {
                    prop.held = false;
                    out_events.push(Event::ObjectReleased { object });
                }
            }
        }
        Command::ShowTeleportMarker { position, normal } => {
            let marker = &mut world.presentation.marker;
            if marker.pending {
                return;
            }
            marker.visible = true;
            marker.position = position;
            marker.normal = normal.normalize_or_zero();
        }
        Command::HideTeleportMarker => {
            let marker = &mut world.presentation.marker;
            if !marker.pending {
                marker.visible = false;
            }
        }
        Command::RequestTeleport { destination } => {
            if !playing || world.presentation.marker.pending {
                return;
            }
            world.presentation.marker.pending = true;
            world.presentation.scaled.schedule(
                seconds(world.config.teleport_delay),
                Deferred::CompleteTeleport { destination },
            );
            out_events.push(Event::TeleportArmed { destination });
            out_events.push(Event::Audio {
                cue: AudioCue::TeleportChime,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use vr_survival_core::{
        EnemySnapshot, EnemyView, GrabbableId, GrabbableSnapshot, Phase, PlayerSnapshot,
        ProjectileSnapshot, Ray, RayHit, Rgba, Surface, TeleportMarkerSnapshot,
    };

    use super::{collision, World, WorldConfig};
    use glam::Vec3;

    /// Lifecycle phase of the round.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Tuning values the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Captures the player's body.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            position: player.position,
            forward: player.forward,
            muzzle: world.muzzle(),
            health: player.health,
            grounded: player.grounded,
        }
    }

    /// Captures a read-only view of every enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots = world
            .enemies
            .iter()
            .map(|(id, enemy)| EnemySnapshot {
                id: *id,
                position: enemy.position,
                facing: enemy.facing,
                speed: enemy.speed,
                damage: enemy.damage,
                tier: enemy.tier,
                state: enemy.state,
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures every projectile in flight, ordered by identifier.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|(id, projectile)| ProjectileSnapshot {
                id: *id,
                position: projectile.position,
                direction: projectile.direction,
                remaining: projectile.remaining,
            })
            .collect()
    }

    /// Captures every grabbable prop, ordered by identifier.
    #[must_use]
    pub fn grabbables(world: &World) -> Vec<GrabbableSnapshot> {
        world
            .grabbables
            .keys()
            .filter_map(|id| grabbable(world, *id))
            .collect()
    }

    /// Captures a single grabbable prop.
    #[must_use]
    pub fn grabbable(world: &World, id: GrabbableId) -> Option<GrabbableSnapshot> {
        world.grabbables.get(&id).map(|prop| GrabbableSnapshot {
            id,
            position: prop.position,
            radius: prop.radius,
            highlighted: prop.highlighted,
            held: prop.held,
        })
    }

    /// Prop currently highlighted by the grab pointer.
    #[must_use]
    pub fn highlighted(world: &World) -> Option<GrabbableId> {
        world.highlighted
    }

    /// Colour of the grab pointer beam.
    #[must_use]
    pub fn pointer_tint(world: &World) -> Rgba {
        world.pointer_tint
    }

    /// Reports whether the footstep loop is playing.
    #[must_use]
    pub fn footsteps_playing(world: &World) -> bool {
        world.footsteps
    }

    /// Casts `ray` against the free grabbable props and the ground plane,
    /// returning the closest hit within `max_distance`. Held props are
    /// ignored.
    #[must_use]
    pub fn raycast(world: &World, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        let props = world
            .grabbables
            .iter()
            .filter(|(_, prop)| !prop.held)
            .filter_map(|(id, prop)| {
                let distance = collision::ray_sphere(ray, prop.position, prop.radius)?;
                let point = ray.point_at(distance);
                Some(RayHit {
                    surface: Surface::Grabbable(*id),
                    point,
                    normal: (point - prop.position).normalize_or_zero(),
                    distance,
                    center: prop.position,
                })
            });
        let ground = collision::ray_ground(ray).map(|distance| {
            let point = ray.point_at(distance);
            RayHit {
                surface: Surface::Ground,
                point,
                normal: Vec3::Y,
                distance,
                center: point,
            }
        });

        props
            .chain(ground)
            .filter(|hit| hit.distance <= max_distance)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Captures the teleport destination marker.
    #[must_use]
    pub fn teleport_marker(world: &World) -> TeleportMarkerSnapshot {
        let marker = &world.presentation.marker;
        TeleportMarkerSnapshot {
            visible: marker.visible,
            position: marker.position,
            normal: marker.normal,
            color: marker.color(),
            pending: marker.pending,
        }
    }

    /// Full-screen flash colour, with alpha already faded, if one is active.
    #[must_use]
    pub fn flash_overlay(world: &World) -> Option<Rgba> {
        world.presentation.flash_overlay()
    }

    /// Notification currently replacing the ammo readout.
    #[must_use]
    pub fn notification(world: &World) -> Option<&str> {
        world.presentation.notification()
    }

    /// Current background music volume.
    #[must_use]
    pub fn music_volume(world: &World) -> f32 {
        world.presentation.music_volume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vr_survival_core::{Ray, Surface};

    fn playing_world() -> World {
        let mut world = World::new(WorldConfig::default(), &ArenaLayout::default());
        let mut events = Vec::new();
        apply(&mut world, Command::StartRound, &mut events);
        world
    }

    fn spawn(world: &mut World, position: Vec3, damage: i32) -> EnemyId {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnEnemy {
                position,
                tier: DifficultyTier::Normal,
                speed: 3.5,
                damage,
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::EnemySpawned { enemy, .. }] => *enemy,
            other => panic!("unexpected events: {other:?}"),
        }
    }

    fn tick(world: &mut World, millis: u64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
            },
            &mut events,
        );
        events
    }

    #[test]
    fn splash_holds_time_still() {
        let mut world = World::new(WorldConfig::default(), &ArenaLayout::default());
        assert_eq!(query::phase(&world), Phase::Splash);
        assert!(tick(&mut world, 100).is_empty());

        let mut events = Vec::new();
        apply(&mut world, Command::StartRound, &mut events);
        assert_eq!(
            events,
            vec![Event::PhaseChanged {
                phase: Phase::Playing
            }]
        );
        assert_eq!(
            tick(&mut world, 100),
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(100)
            }]
        );
    }

    #[test]
    fn spawned_enemy_faces_player() {
        let mut world = playing_world();
        let enemy = spawn(&mut world, Vec3::new(0.0, 0.0, 20.0), 3);
        let view = query::enemy_view(&world);
        let snapshot = view.get(enemy).expect("enemy present");
        assert_eq!(snapshot.state, EnemyState::Chasing);
        assert!((snapshot.facing - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn bites_drain_health_until_death_reported_once() {
        let mut world = playing_world();
        let enemy = spawn(&mut world, Vec3::new(0.0, 0.0, 1.0), 60);

        let mut events = Vec::new();
        apply(&mut world, Command::BitePlayer { enemy }, &mut events);
        apply(&mut world, Command::BitePlayer { enemy }, &mut events);
        apply(&mut world, Command::BitePlayer { enemy }, &mut events);

        let deaths = events
            .iter()
            .filter(|event| matches!(event, Event::PlayerDied))
            .count();
        assert_eq!(deaths, 1);
        assert_eq!(query::player(&world).health, -20);
    }

    #[test]
    fn projectile_destroys_exactly_one_enemy() {
        let mut world = playing_world();
        let first = spawn(&mut world, Vec3::new(0.0, 0.0, 0.5), 3);
        let _second = spawn(&mut world, Vec3::new(0.0, 0.0, 0.55), 3);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::FireProjectile {
                origin: Vec3::Y,
                direction: Vec3::Z,
            },
            &mut events,
        );
        assert!(events.contains(&Event::Audio {
            cue: AudioCue::Cannon
        }));

        let events = tick(&mut world, 16);
        let destroyed: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                Event::EnemyDestroyed { enemy, .. } => Some(*enemy),
                _ => None,
            })
            .collect();
        assert_eq!(destroyed, vec![first]);
        assert_eq!(query::enemy_view(&world).len(), 1);
        assert!(query::projectiles(&world).is_empty());
    }

    #[test]
    fn projectile_expires_after_lifetime() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::FireProjectile {
                origin: Vec3::new(0.0, 1.0, 0.0),
                direction: Vec3::X,
            },
            &mut events,
        );

        assert!(!tick(&mut world, 900)
            .iter()
            .any(|event| matches!(event, Event::ProjectileExpired { .. })));
        let projectile = query::projectiles(&world)[0];
        assert!((projectile.position.x - 9.0).abs() < 1e-4);

        assert!(tick(&mut world, 100)
            .iter()
            .any(|event| matches!(event, Event::ProjectileExpired { .. })));
        assert!(query::projectiles(&world).is_empty());
    }

    #[test]
    fn teleport_waits_and_ignores_duplicates() {
        let mut world = playing_world();
        let destination = Vec3::new(3.0, 0.28, 4.0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ShowTeleportMarker {
                position: Vec3::new(3.0, 0.01, 4.0),
                normal: Vec3::Y,
            },
            &mut events,
        );
        apply(&mut world, Command::RequestTeleport { destination }, &mut events);
        apply(
            &mut world,
            Command::RequestTeleport {
                destination: Vec3::new(-5.0, 0.28, 0.0),
            },
            &mut events,
        );
        let armed = events
            .iter()
            .filter(|event| matches!(event, Event::TeleportArmed { .. }))
            .count();
        assert_eq!(armed, 1);
        let marker = query::teleport_marker(&world);
        assert!(marker.pending && marker.visible);
        assert_eq!(marker.color, Rgba::new(0.0, 1.0, 0.0, 0.7));

        assert!(!tick(&mut world, 300)
            .iter()
            .any(|event| matches!(event, Event::Teleported { .. })));
        let events = tick(&mut world, 50);
        assert!(events.contains(&Event::Teleported {
            from: Vec3::ZERO,
            to: destination,
        }));
        assert_eq!(query::player(&world).position, destination);
        assert!(!query::player(&world).grounded);
        let marker = query::teleport_marker(&world);
        assert!(!marker.pending && !marker.visible);
    }

    #[test]
    fn player_never_sinks_below_ground() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePlayer {
                translation: Vec3::new(1.0, -3.0, 0.0),
            },
            &mut events,
        );
        let player = query::player(&world);
        assert_eq!(player.position, Vec3::new(1.0, 0.0, 0.0));
        assert!(player.grounded);
    }

    #[test]
    fn movement_waits_for_the_round_to_start() {
        let mut world = World::new(WorldConfig::default(), &ArenaLayout::default());
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePlayer {
                translation: Vec3::new(2.0, 0.0, 0.0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::OrientPlayer { forward: Vec3::X },
            &mut events,
        );

        let player = query::player(&world);
        assert_eq!(player.position, Vec3::ZERO);
        assert_eq!(player.forward, Vec3::Z);
        assert!(events.is_empty());
    }

    #[test]
    fn missing_muzzle_is_reported_as_absent() {
        let layout = ArenaLayout {
            muzzle_offset: None,
            ..ArenaLayout::default()
        };
        let world = World::new(WorldConfig::default(), &layout);
        assert_eq!(query::player(&world).muzzle, None);
    }

    #[test]
    fn muzzle_follows_facing() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::OrientPlayer { forward: Vec3::X },
            &mut events,
        );
        let muzzle = query::player(&world).muzzle.expect("muzzle configured");
        assert!((muzzle - Vec3::new(0.4, 1.3, -0.2)).length() < 1e-5);
    }

    #[test]
    fn raycast_prefers_nearest_prop_over_ground() {
        let world = playing_world();
        let ray = Ray::new(Vec3::new(1.0, 0.5, 0.0), Vec3::Z);
        let hit = query::raycast(&world, &ray, 10.0).expect("hit");
        assert_eq!(hit.surface, Surface::Grabbable(GrabbableId::new(0)));
        assert!((hit.distance - 1.7).abs() < 1e-5);

        let ray = Ray::new(Vec3::new(5.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 1.0));
        let hit = query::raycast(&world, &ray, 10.0).expect("hit");
        assert_eq!(hit.surface, Surface::Ground);
        assert_eq!(hit.normal, Vec3::Y);
        assert!(query::raycast(&world, &ray, 1.0).is_none());
    }

    #[test]
    fn highlight_moves_between_props() {
        let mut world = playing_world();
        let mut events = Vec::new();
        let tint = Rgba::new(1.0, 1.0, 0.0, 1.0);
        apply(
            &mut world,
            Command::HighlightGrabbable {
                target: Some(GrabbableId::new(0)),
                pointer_tint: tint,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::HighlightGrabbable {
                target: Some(GrabbableId::new(1)),
                pointer_tint: tint,
            },
            &mut events,
        );
        let props = query::grabbables(&world);
        assert!(!props[0].highlighted);
        assert!(props[1].highlighted);
        assert_eq!(query::pointer_tint(&world), tint);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn game_over_freezes_gameplay_but_fades_music() {
        let mut world = playing_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ShowNotification {
                text: "PERK".to_owned(),
                duration: Duration::from_secs(3),
            },
            &mut events,
        );
        apply(&mut world, Command::EndRound, &mut events);
        assert_eq!(query::phase(&world), Phase::GameOver);

        let events = tick(&mut world, 1000);
        assert!(events.is_empty());
        assert!((query::music_volume(&world) - 0.25).abs() < 1e-5);
        assert_eq!(query::notification(&world), Some("PERK"));

        let events = tick(&mut world, 1000);
        assert_eq!(
            events,
            vec![Event::Audio {
                cue: AudioCue::MusicStopped
            }]
        );
        assert_eq!(query::music_volume(&world), 0.0);
    }
}
