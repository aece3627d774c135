//! Ammo pool, fire cooldown and reload timer.

use std::time::Duration;

use vr_survival_core::{FireMode, TaskQueue};

/// Result of pulling the trigger once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireOutcome {
    /// A round was fired.
    Fired,
    /// The previous shot's cooldown is still running.
    CoolingDown,
    /// The magazine was empty; a reload began.
    ReloadStarted,
    /// A reload is already in progress.
    Reloading,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Refill;

/// Ammunition and timers of the player's weapon.
#[derive(Clone, Debug)]
pub struct PlayerResources {
    ammo: u32,
    max_ammo: u32,
    fire_cooldown: Duration,
    fire_mode: FireMode,
    semi_auto_cooldown: Duration,
    rapid_cooldown: Duration,
    reload_time: Duration,
    reload: TaskQueue<Refill>,
}

impl PlayerResources {
    /// Creates a full magazine in semi-automatic mode.
    #[must_use]
    pub fn new(
        max_ammo: u32,
        reload_time: Duration,
        semi_auto_cooldown: Duration,
        rapid_cooldown: Duration,
    ) -> Self {
        Self {
            ammo: max_ammo,
            max_ammo,
            fire_cooldown: Duration::ZERO,
            fire_mode: FireMode::SemiAuto,
            semi_auto_cooldown,
            rapid_cooldown,
            reload_time,
            reload: TaskQueue::new(),
        }
    }

    /// Rounds left in the magazine.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Magazine capacity.
    #[must_use]
    pub const fn max_ammo(&self) -> u32 {
        self.max_ammo
    }

    /// Active trigger behaviour.
    #[must_use]
    pub const fn fire_mode(&self) -> FireMode {
        self.fire_mode
    }

    /// Time left before the next shot may fire.
    #[must_use]
    pub const fn fire_cooldown(&self) -> Duration {
        self.fire_cooldown
    }

    /// Reports whether a reload is in progress.
    #[must_use]
    pub fn reloading(&self) -> bool {
        !self.reload.is_empty()
    }

    /// Advances the reload timer, refilling the magazine when it completes.
    /// Returns whether a reload finished.
    pub fn advance_reload(&mut self, dt: Duration) -> bool {
        let finished = !self.reload.advance(dt).is_empty();
        if finished {
            self.ammo = self.max_ammo;
        }
        finished
    }

    /// Counts the fire cooldown down by `dt`.
    pub fn cool_down(&mut self, dt: Duration) {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(dt);
    }

    /// Fires one round when the weapon is ready.
    ///
    /// Firing the last round, or pulling the trigger on an empty magazine,
    /// starts a reload. Pulling it again while reloading does nothing.
    pub fn try_fire(&mut self) -> FireOutcome {
        if self.reloading() {
            return FireOutcome::Reloading;
        }
        if self.ammo == 0 {
            self.start_reload();
            return FireOutcome::ReloadStarted;
        }
        if !self.fire_cooldown.is_zero() {
            return FireOutcome::CoolingDown;
        }

        self.fire_cooldown = match self.fire_mode {
            FireMode::SemiAuto => self.semi_auto_cooldown,
            FireMode::Rapid => self.rapid_cooldown,
        };
        self.ammo -= 1;
        if self.ammo == 0 {
            self.start_reload();
        }
        FireOutcome::Fired
    }

    /// Raises the magazine capacity and refills it.
    pub fn upgrade(&mut self, max_ammo: u32, fire_mode: Option<FireMode>) {
        self.max_ammo = max_ammo;
        self.ammo = max_ammo;
        if let Some(mode) = fire_mode {
            self.fire_mode = mode;
        }
    }

    /// Text shown in the ammo readout.
    #[must_use]
    pub fn label(&self) -> String {
        if self.reloading() {
            return "Reloading...".to_owned();
        }
        let mode = match self.fire_mode {
            FireMode::SemiAuto => "",
            FireMode::Rapid => " [RAPID]",
        };
        format!("Ammo: {} / {}{}", self.ammo, self.max_ammo, mode)
    }

    fn start_reload(&mut self) {
        tracing::debug!(reload_time = ?self.reload_time, "reloading");
        self.reload.schedule(self.reload_time, Refill);
    }
}
