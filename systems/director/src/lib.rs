#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game director: round clock, difficulty escalation and enemy spawning.
//!
//! The director watches `TimeAdvanced` events, escalates the difficulty tier
//! as the round clock crosses its thresholds and keeps a spawn cooldown that
//! releases bursts of enemies on a ring around the player.

mod clock;

use std::{f32::consts::TAU, time::Duration};

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use vr_survival_core::{seconds, Command, DifficultyTier, Event, Phase, PlayerSnapshot};

pub use clock::{tier_at, GameClock, TierThresholds};

/// Spawn cadence of a single tier.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Cadence {
    /// Seconds between bursts.
    pub interval: f32,
    /// Enemies released per burst.
    pub burst: u32,
}

/// Enemy scaling applied on top of the base stats for a tier.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct TierScaling {
    /// Multiplier applied to the base speed.
    pub speed_multiplier: f32,
    /// Added to the base bite damage.
    pub damage_bonus: i32,
}

/// Tuning for the director.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// Seconds into the round at which Enhanced activates.
    pub enhanced_after: f32,
    /// Seconds into the round at which Extreme activates.
    pub extreme_after: f32,
    /// Cadence while Normal.
    pub normal_cadence: Cadence,
    /// Cadence while Enhanced.
    pub enhanced_cadence: Cadence,
    /// Cadence while Extreme.
    pub extreme_cadence: Cadence,
    /// Enemy scaling while Enhanced.
    pub enhanced_scaling: TierScaling,
    /// Enemy scaling while Extreme.
    pub extreme_scaling: TierScaling,
    /// Radius of the spawn ring around the player.
    pub spawn_distance: f32,
    /// Speed of a Normal enemy in units per second.
    pub enemy_speed: f32,
    /// Bite damage of a Normal enemy.
    pub enemy_damage: i32,
    /// Seconds an activation flash takes to fade.
    pub flash_duration: f32,
    /// Seed of the spawn angle generator.
    pub seed: u64,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            enhanced_after: 60.0,
            extreme_after: 75.0,
            normal_cadence: Cadence {
                interval: 2.0,
                burst: 1,
            },
            enhanced_cadence: Cadence {
                interval: 1.8,
                burst: 1,
            },
            extreme_cadence: Cadence {
                interval: 2.0,
                burst: 1,
            },
            enhanced_scaling: TierScaling {
                speed_multiplier: 1.1,
                damage_bonus: 1,
            },
            extreme_scaling: TierScaling {
                speed_multiplier: 1.25,
                damage_bonus: 2,
            },
            spawn_distance: 20.0,
            enemy_speed: 3.5,
            enemy_damage: 3,
            flash_duration: 0.5,
            seed: 0x5eed_2b1d_c0de_7a11,
        }
    }
}

impl DirectorConfig {
    /// Escalation thresholds described by the configuration.
    #[must_use]
    pub fn thresholds(&self) -> TierThresholds {
        TierThresholds::new(seconds(self.enhanced_after), seconds(self.extreme_after))
    }

    /// Cadence used while `tier` is active.
    #[must_use]
    pub const fn cadence(&self, tier: DifficultyTier) -> Cadence {
        match tier {
            DifficultyTier::Normal => self.normal_cadence,
            DifficultyTier::Enhanced => self.enhanced_cadence,
            DifficultyTier::Extreme => self.extreme_cadence,
        }
    }

    /// Enemy speed and damage for an enemy spawned at `tier`.
    #[must_use]
    pub fn enemy_stats(&self, tier: DifficultyTier) -> (f32, i32) {
        let scaling = match tier {
            DifficultyTier::Normal => TierScaling {
                speed_multiplier: 1.0,
                damage_bonus: 0,
            },
            DifficultyTier::Enhanced => self.enhanced_scaling,
            DifficultyTier::Extreme => self.extreme_scaling,
        };
        (
            self.enemy_speed * scaling.speed_multiplier,
            self.enemy_damage.saturating_add(scaling.damage_bonus),
        )
    }
}

/// Pure system that owns the round clock and emits spawn and flash commands.
#[derive(Debug)]
pub struct Director {
    config: DirectorConfig,
    thresholds: TierThresholds,
    clock: GameClock,
    tier: DifficultyTier,
    cooldown: Duration,
    active: bool,
    rng: ChaCha8Rng,
}

impl Director {
    /// Creates a director that waits for the round to start.
    #[must_use]
    pub fn new(config: DirectorConfig) -> Self {
        Self {
            thresholds: config.thresholds(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            clock: GameClock::new(),
            tier: DifficultyTier::Normal,
            cooldown: Duration::ZERO,
            active: false,
        }
    }

    /// Time elapsed in the current round.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Highest tier activated so far in the current round.
    #[must_use]
    pub const fn tier(&self) -> DifficultyTier {
        self.tier
    }

    /// Escalation thresholds in use.
    #[must_use]
    pub const fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    /// Consumes world events and the player snapshot to emit commands.
    pub fn handle(&mut self, events: &[Event], player: &PlayerSnapshot, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::PhaseChanged {
                    phase: Phase::Playing,
                } => self.begin_round(player, out),
                Event::PhaseChanged { .. } => self.active = false,
                Event::TimeAdvanced { dt } if self.active => self.step(*dt, player, out),
                _ => {}
            }
        }
    }

    fn begin_round(&mut self, player: &PlayerSnapshot, out: &mut Vec<Command>) {
        self.clock.reset();
        self.tier = DifficultyTier::Normal;
        self.cooldown = Duration::ZERO;
        self.active = true;
        self.spawn_burst(DifficultyTier::Normal, 1, player, out);
    }

    fn step(&mut self, dt: Duration, player: &PlayerSnapshot, out: &mut Vec<Command>) {
        self.clock.advance(dt);

        let reached = tier_at(self.clock.elapsed(), &self.thresholds);
        while self.tier < reached {
            let next = match self.tier {
                DifficultyTier::Normal => DifficultyTier::Enhanced,
                DifficultyTier::Enhanced | DifficultyTier::Extreme => DifficultyTier::Extreme,
            };
            self.activate(next, player, out);
        }

        self.cooldown = self.cooldown.saturating_sub(dt);
        if self.cooldown.is_zero() {
            let cadence = self.config.cadence(self.tier);
            self.cooldown = seconds(cadence.interval);
            self.spawn_burst(self.tier, cadence.burst, player, out);
        }
    }

    fn activate(&mut self, tier: DifficultyTier, player: &PlayerSnapshot, out: &mut Vec<Command>) {
        self.tier = tier;
        tracing::info!(
            tier = tier.label(),
            elapsed = self.clock.elapsed().as_secs_f32(),
            "difficulty escalated"
        );

        if let Some(color) = tier.activation_flash() {
            out.push(Command::FlashScreen {
                color,
                duration: seconds(self.config.flash_duration),
            });
        }

        let burst = self.config.cadence(tier).burst.saturating_add(1);
        self.spawn_burst(tier, burst, player, out);
    }

    fn spawn_burst(
        &mut self,
        tier: DifficultyTier,
        count: u32,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        let (speed, damage) = self.config.enemy_stats(tier);
        for _ in 0..count {
            let position = self.ring_position(player.position);
            out.push(Command::SpawnEnemy {
                position,
                tier,
                speed,
                damage,
            });
        }
        tracing::debug!(tier = tier.label(), count, "spawned enemy burst");
    }

    fn ring_position(&mut self, center: Vec3) -> Vec3 {
        let angle = self.rng.gen_range(0.0_f32..TAU);
        let radius = self.config.spawn_distance;
        Vec3::new(
            center.x + angle.cos() * radius,
            center.y,
            center.z + angle.sin() * radius,
        )
    }
}
