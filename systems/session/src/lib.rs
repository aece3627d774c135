#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session context that owns the world and every system and drives a round
//! from the splash screen through game over and restart.

mod config;
mod hud;
mod settings;

use std::time::Duration;

use vr_survival_core::{Command, Event, Phase, SPLASH_PROMPT};
use vr_survival_system_armory::{Armory, TriggerState};
use vr_survival_system_director::Director;
use vr_survival_system_enemy_ai::EnemyAi;
use vr_survival_system_interaction::{Action, Axis, InputSource, Interactor, Pointer};
use vr_survival_system_locomotion::{Locomotion, Steering};
use vr_survival_world::{self as world, query, World};

pub use config::{ConfigError, SessionConfig};
pub use settings::{Lighting, MemoryStore, SettingsError, SettingsStore, TomlFileStore};

/// Host input that is not part of the interaction rig.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// The start key went down this frame.
    pub start: bool,
    /// The restart key went down this frame.
    pub restart: bool,
    /// Weapon trigger state.
    pub trigger: TriggerState,
}

/// World and systems of a single round.
#[derive(Debug)]
struct Round {
    world: World,
    director: Director,
    enemy_ai: EnemyAi,
    armory: Armory,
    interactor: Interactor,
    locomotion: Locomotion,
    backlog: Vec<Event>,
}

impl Round {
    fn new(config: &SessionConfig) -> Self {
        Self {
            world: World::new(config.world.clone(), &config.arena),
            director: Director::new(config.director.clone()),
            enemy_ai: EnemyAi::new(config.enemies.clone()),
            armory: Armory::new(config.armory.clone()),
            interactor: Interactor::new(config.interaction.clone()),
            locomotion: Locomotion::new(config.locomotion.clone()),
            backlog: Vec::new(),
        }
    }

    fn run_systems(
        &mut self,
        events: &[Event],
        input: &FrameInput,
        rig: &dyn InputSource,
        out: &mut Vec<Command>,
    ) {
        let player = query::player(&self.world);
        let enemies = query::enemy_view(&self.world);

        self.director.handle(events, &player, out);
        self.enemy_ai.handle(events, &enemies, &player, out);
        self.armory.handle(
            events,
            self.director.elapsed(),
            input.trigger,
            &player,
            out,
        );

        let world = &self.world;
        self.interactor.handle(
            events,
            rig,
            &|ray, max_distance| query::raycast(world, ray, max_distance),
            out,
        );

        let steering = Steering {
            gaze: rig.aim_ray(Pointer::Gaze).direction(),
            axis: rig.axis(Axis::Locomotion),
            jump: rig.action(Action::Jump).pressed,
        };
        self.locomotion.handle(events, steering, &player, out);
    }
}

/// Explicit game context: the round in progress plus persisted settings.
#[derive(Debug)]
pub struct Session<S: SettingsStore> {
    config: SessionConfig,
    store: S,
    lighting: Lighting,
    round: Round,
}

impl<S: SettingsStore> Session<S> {
    /// Creates a session on the splash screen, restoring lighting from `store`.
    pub fn new(config: SessionConfig, store: S) -> Self {
        let lighting = load_lighting(&store, Lighting::default());
        let round = Round::new(&config);
        Self {
            config,
            store,
            lighting,
            round,
        }
    }

    /// Advances the session by one host frame and returns every event the
    /// world emitted during it.
    pub fn step(&mut self, dt: Duration, input: &FrameInput, rig: &dyn InputSource) -> Vec<Event> {
        let mut emitted = Vec::new();

        match query::phase(&self.round.world) {
            Phase::Splash if input.start => {
                world::apply(&mut self.round.world, Command::StartRound, &mut emitted);
            }
            Phase::GameOver if input.restart => return self.restart(),
            _ => {}
        }

        world::apply(&mut self.round.world, Command::Tick { dt }, &mut emitted);

        let mut events = std::mem::take(&mut self.round.backlog);
        events.extend(emitted.iter().cloned());

        let mut commands = Vec::new();
        self.round.run_systems(&events, input, rig, &mut commands);

        let mut follow_up = Vec::new();
        for command in commands {
            world::apply(&mut self.round.world, command, &mut follow_up);
        }
        if follow_up
            .iter()
            .any(|event| matches!(event, Event::PlayerDied))
        {
            tracing::info!(
                survived = self.round.director.elapsed().as_secs_f32(),
                tier = ?self.round.director.tier(),
                "round over"
            );
            world::apply(&mut self.round.world, Command::EndRound, &mut follow_up);
        }

        emitted.extend(follow_up.iter().cloned());
        self.round.backlog = follow_up;
        emitted
    }

    fn restart(&mut self) -> Vec<Event> {
        if let Err(error) = self.store.save(&self.lighting) {
            tracing::warn!(%error, "failed to persist lighting settings");
        }
        self.lighting = load_lighting(&self.store, self.lighting);
        self.round = Round::new(&self.config);
        tracing::info!("session restarted");
        vec![Event::PhaseChanged {
            phase: Phase::Splash,
        }]
    }

    /// Lifecycle phase of the current round.
    #[must_use]
    pub fn phase(&self) -> Phase {
        query::phase(&self.round.world)
    }

    /// World of the current round, for read-only queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.round.world
    }

    /// Director of the current round.
    #[must_use]
    pub fn director(&self) -> &Director {
        &self.round.director
    }

    /// Armory of the current round.
    #[must_use]
    pub fn armory(&self) -> &Armory {
        &self.round.armory
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Lighting the host should apply.
    #[must_use]
    pub fn lighting(&self) -> Lighting {
        self.lighting
    }

    /// Replaces the lighting; it is persisted on the next restart.
    pub fn set_lighting(&mut self, lighting: Lighting) {
        self.lighting = lighting;
    }

    /// Settings store backing the session.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Main HUD text for the current phase.
    #[must_use]
    pub fn info_text(&self) -> String {
        let director = &self.round.director;
        match self.phase() {
            Phase::Splash => SPLASH_PROMPT.to_owned(),
            Phase::Playing => hud::info_text(
                query::player(&self.round.world).health,
                director.elapsed(),
                director.tier(),
            ),
            Phase::GameOver => hud::game_over_text(
                director.elapsed(),
                director.tier(),
                director.thresholds().enhanced(),
            ),
        }
    }

    /// Ammo readout, replaced by the active notification when there is one.
    #[must_use]
    pub fn ammo_text(&self) -> String {
        hud::ammo_text(
            query::notification(&self.round.world),
            self.round.armory.ammo_label(),
        )
    }
}

fn load_lighting<S: SettingsStore>(store: &S, fallback: Lighting) -> Lighting {
    match store.load() {
        Ok(Some(lighting)) => lighting,
        Ok(None) => fallback,
        Err(error) => {
            tracing::warn!(%error, "failed to load lighting settings");
            fallback
        }
    }
}
