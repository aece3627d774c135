#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-enemy chase and attack behaviour.
//!
//! Every enemy owns an [`EnemyBrain`] that switches between chasing and
//! attacking based on its distance to the player. Chasing enemies walk
//! towards the player on the horizontal plane, attacking enemies bite on a
//! fixed interval.

use std::{collections::BTreeMap, time::Duration};

use serde::Deserialize;
use vr_survival_core::{
    elapsed_in, flat_direction, seconds, Command, EnemyId, EnemySnapshot, EnemyState, EnemyView,
    Event, PlayerSnapshot,
};

/// Tuning shared by every enemy.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Distance below which a chasing enemy starts attacking.
    pub reach: f32,
    /// Extra distance beyond `reach` the player must gain before an attacking
    /// enemy resumes the chase. Zero switches back as soon as the player is
    /// out of reach.
    pub release_margin: f32,
    /// Seconds between bites.
    pub bite_interval: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            reach: 1.5,
            release_margin: 0.25,
            bite_interval: 0.5,
        }
    }
}

/// Outcome of advancing a brain by one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrainStep {
    /// State entered during the tick, if the state changed.
    pub transition: Option<EnemyState>,
    /// Whether the enemy bites the player this tick.
    pub bite: bool,
}

/// Behaviour state machine of a single enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnemyBrain {
    state: EnemyState,
    bite_timer: Duration,
}

impl EnemyBrain {
    /// Current behaviour state.
    #[must_use]
    pub const fn state(&self) -> EnemyState {
        self.state
    }

    /// Advances the brain by `dt` given the enemy's distance to the player.
    ///
    /// At most one bite is reported per call. The first bite lands on the
    /// tick the enemy starts attacking.
    pub fn step(&mut self, dt: Duration, distance: f32, tuning: &Tuning) -> BrainStep {
        let mut step = BrainStep::default();

        match self.state {
            EnemyState::Chasing => {
                if distance < tuning.reach {
                    self.state = EnemyState::Attacking;
                    self.bite_timer = Duration::ZERO;
                    step.transition = Some(EnemyState::Attacking);
                } else {
                    return step;
                }
            }
            EnemyState::Attacking => {
                if distance >= tuning.reach + tuning.release_margin.max(0.0) {
                    self.state = EnemyState::Chasing;
                    step.transition = Some(EnemyState::Chasing);
                    return step;
                }
            }
        }

        self.bite_timer = self.bite_timer.saturating_sub(dt);
        if self.bite_timer.is_zero() {
            self.bite_timer = seconds(tuning.bite_interval);
            step.bite = true;
        }
        step
    }
}

/// Pure system that drives every enemy towards the player.
#[derive(Debug, Default)]
pub struct EnemyAi {
    tuning: Tuning,
    brains: BTreeMap<EnemyId, EnemyBrain>,
}

impl EnemyAi {
    /// Creates the system with the provided tuning.
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            brains: BTreeMap::new(),
        }
    }

    /// Brain tracked for `enemy`, if any.
    #[must_use]
    pub fn brain(&self, enemy: EnemyId) -> Option<&EnemyBrain> {
        self.brains.get(&enemy)
    }

    /// Consumes world events and views to emit movement, state and bite
    /// commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::EnemySpawned { enemy, .. } => {
                    let _ = self.brains.insert(*enemy, EnemyBrain::default());
                }
                Event::EnemyDestroyed { enemy, .. } => {
                    let _ = self.brains.remove(enemy);
                }
                _ => {}
            }
        }
        self.brains.retain(|id, _| enemies.get(*id).is_some());

        let dt = elapsed_in(events);
        if dt.is_zero() {
            return;
        }

        for enemy in enemies.iter() {
            let brain = self.brains.entry(enemy.id).or_default();
            let distance = enemy.position.distance(player.position);
            let step = brain.step(dt, distance, &self.tuning);

            if let Some(state) = step.transition {
                tracing::trace!(enemy = enemy.id.get(), ?state, distance, "enemy state");
                out.push(Command::SetEnemyState {
                    enemy: enemy.id,
                    state,
                });
            }
            if step.bite {
                out.push(Command::BitePlayer { enemy: enemy.id });
            }

            out.push(pursue(enemy, brain.state(), player, dt));
        }
    }
}

/// Moves a chasing enemy towards the player without overshooting. Every
/// enemy keeps facing the player.
fn pursue(
    enemy: &EnemySnapshot,
    state: EnemyState,
    player: &PlayerSnapshot,
    dt: Duration,
) -> Command {
    let Some(direction) = flat_direction(enemy.position, player.position) else {
        return Command::MoveEnemy {
            enemy: enemy.id,
            position: enemy.position,
            facing: enemy.facing,
        };
    };

    let mut position = enemy.position;
    if state == EnemyState::Chasing {
        let gap = glam::Vec2::new(
            player.position.x - enemy.position.x,
            player.position.z - enemy.position.z,
        )
        .length();
        let stride = (enemy.speed * dt.as_secs_f32()).min(gap);
        position += direction * stride;
    }

    Command::MoveEnemy {
        enemy: enemy.id,
        position,
        facing: direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    #[test]
    fn first_bite_lands_when_attack_starts() {
        let tuning = Tuning::default();
        let mut brain = EnemyBrain::default();

        let step = brain.step(TICK, 1.4, &tuning);
        assert_eq!(step.transition, Some(EnemyState::Attacking));
        assert!(step.bite);
    }

    #[test]
    fn bites_repeat_at_interval() {
        let tuning = Tuning::default();
        let mut brain = EnemyBrain::default();
        let bites: Vec<bool> = (0..11)
            .map(|_| brain.step(TICK, 1.0, &tuning).bite)
            .collect();
        let expected = [
            true, false, false, false, false, true, false, false, false, false, true,
        ];
        assert_eq!(bites, expected);
    }

    #[test]
    fn far_enemy_keeps_chasing() {
        let tuning = Tuning::default();
        let mut brain = EnemyBrain::default();
        assert_eq!(brain.step(TICK, 1.5, &tuning), BrainStep::default());
        assert_eq!(brain.state(), EnemyState::Chasing);
    }

    #[test]
    fn hovering_at_reach_does_not_flicker() {
        let tuning = Tuning::default();
        let mut brain = EnemyBrain::default();
        let _ = brain.step(TICK, 1.49, &tuning);

        for distance in [1.51, 1.49, 1.6, 1.5, 1.74] {
            let step = brain.step(TICK, distance, &tuning);
            assert_eq!(step.transition, None);
        }
        assert_eq!(brain.state(), EnemyState::Attacking);

        let step = brain.step(TICK, 1.75, &tuning);
        assert_eq!(step.transition, Some(EnemyState::Chasing));
        assert!(!step.bite);
    }

    #[test]
    fn zero_margin_releases_at_reach() {
        let tuning = Tuning {
            release_margin: 0.0,
            ..Tuning::default()
        };
        let mut brain = EnemyBrain::default();
        let _ = brain.step(TICK, 1.0, &tuning);
        let step = brain.step(TICK, 1.5, &tuning);
        assert_eq!(step.transition, Some(EnemyState::Chasing));
    }
}
