#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player weapon: trigger handling, ammo, reload and time-gated perks.

mod resources;

use std::time::Duration;

use glam::Vec3;
use serde::Deserialize;
use vr_survival_core::{elapsed_in, seconds, Command, Event, FireMode, PlayerSnapshot};

pub use resources::{FireOutcome, PlayerResources};

/// One-shot upgrade unlocked once the round clock reaches `after`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PerkConfig {
    /// Seconds into the round at which the perk unlocks.
    pub after: f32,
    /// Magazine capacity granted by the perk.
    pub max_ammo: u32,
    /// Trigger behaviour granted by the perk, if it changes it.
    #[serde(default)]
    pub fire_mode: Option<FireMode>,
    /// Notification shown when the perk unlocks.
    pub notification: String,
}

/// Tuning for the armory.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArmoryConfig {
    /// Starting magazine capacity.
    pub max_ammo: u32,
    /// Seconds a reload takes.
    pub reload_time: f32,
    /// Seconds between semi-automatic shots.
    pub fire_cooldown: f32,
    /// Seconds between rapid-fire shots.
    pub rapid_fire_cooldown: f32,
    /// Seconds a perk notification stays on screen.
    pub notification_duration: f32,
    /// Perks in unlock order.
    pub perks: Vec<PerkConfig>,
}

impl Default for ArmoryConfig {
    fn default() -> Self {
        Self {
            max_ammo: 10,
            reload_time: 1.0,
            fire_cooldown: 1.0,
            rapid_fire_cooldown: 0.1,
            notification_duration: 3.0,
            perks: vec![
                PerkConfig {
                    after: 60.0,
                    max_ammo: 20,
                    fire_mode: None,
                    notification: "PERK: AMMO INCREASED TO 20!".to_owned(),
                },
                PerkConfig {
                    after: 75.0,
                    max_ammo: 25,
                    fire_mode: Some(FireMode::Rapid),
                    notification: "PERK: RAPID FIRE MODE UNLOCKED! AMMO: 25".to_owned(),
                },
            ],
        }
    }
}

/// Trigger input sampled for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriggerState {
    /// The trigger went down this frame.
    pub pressed: bool,
    /// The trigger is down.
    pub held: bool,
}

impl TriggerState {
    /// Reports whether the trigger asks for a shot in `mode`.
    #[must_use]
    pub const fn wants_fire(&self, mode: FireMode) -> bool {
        match mode {
            FireMode::SemiAuto => self.pressed,
            FireMode::Rapid => self.pressed || self.held,
        }
    }
}

/// Pure system owning the player's weapon resources.
#[derive(Debug)]
pub struct Armory {
    config: ArmoryConfig,
    resources: PlayerResources,
    unlocked: Vec<bool>,
    muzzle_warned: bool,
}

impl Armory {
    /// Creates an armory with a full magazine.
    #[must_use]
    pub fn new(config: ArmoryConfig) -> Self {
        let resources = PlayerResources::new(
            config.max_ammo,
            seconds(config.reload_time),
            seconds(config.fire_cooldown),
            seconds(config.rapid_fire_cooldown),
        );
        Self {
            unlocked: vec![false; config.perks.len()],
            config,
            resources,
            muzzle_warned: false,
        }
    }

    /// Weapon state.
    #[must_use]
    pub const fn resources(&self) -> &PlayerResources {
        &self.resources
    }

    /// Text shown in the ammo readout.
    #[must_use]
    pub fn ammo_label(&self) -> String {
        self.resources.label()
    }

    /// Advances timers, unlocks perks and fires when the trigger asks for it.
    ///
    /// `elapsed` is the round clock after this step's time was added.
    pub fn handle(
        &mut self,
        events: &[Event],
        elapsed: Duration,
        trigger: TriggerState,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        let dt = elapsed_in(events);
        if dt.is_zero() {
            return;
        }

        if self.resources.advance_reload(dt) {
            tracing::debug!(ammo = self.resources.ammo(), "reload complete");
        }
        self.unlock_perks(elapsed, out);
        self.resources.cool_down(dt);

        if !trigger.wants_fire(self.resources.fire_mode()) {
            return;
        }
        match self.resources.try_fire() {
            FireOutcome::Fired => out.push(Command::FireProjectile {
                origin: self.muzzle(player),
                direction: player.forward,
            }),
            FireOutcome::ReloadStarted => tracing::debug!("empty magazine, reloading"),
            FireOutcome::CoolingDown | FireOutcome::Reloading => {}
        }
    }

    fn unlock_perks(&mut self, elapsed: Duration, out: &mut Vec<Command>) {
        for (perk, unlocked) in self.config.perks.iter().zip(self.unlocked.iter_mut()) {
            if *unlocked || elapsed < seconds(perk.after) {
                continue;
            }
            *unlocked = true;
            self.resources.upgrade(perk.max_ammo, perk.fire_mode);
            tracing::info!(
                max_ammo = perk.max_ammo,
                fire_mode = ?self.resources.fire_mode(),
                "perk unlocked"
            );
            out.push(Command::ShowNotification {
                text: perk.notification.clone(),
                duration: seconds(self.config.notification_duration),
            });
        }
    }

    fn muzzle(&mut self, player: &PlayerSnapshot) -> Vec3 {
        match player.muzzle {
            Some(muzzle) => muzzle,
            None => {
                if !self.muzzle_warned {
                    self.muzzle_warned = true;
                    tracing::warn!("no muzzle configured, firing from the player position");
                }
                player.position
            }
        }
    }
}
