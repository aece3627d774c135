use std::time::Duration;

use vr_survival_core::{Command, DifficultyTier, Event, Phase, Rgba};
use vr_survival_system_director::{Director, DirectorConfig};
use vr_survival_world::{self as world, query, ArenaLayout, World, WorldConfig};

fn started_world() -> (World, Vec<Event>) {
    let mut world = World::new(WorldConfig::default(), &ArenaLayout::default());
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartRound, &mut events);
    (world, events)
}

fn advance(director: &mut Director, world: &World, dt: Duration) -> Vec<Command> {
    let mut commands = Vec::new();
    director.handle(
        &[Event::TimeAdvanced { dt }],
        &query::player(world),
        &mut commands,
    );
    commands
}

fn spawned_tiers(commands: &[Command]) -> Vec<DifficultyTier> {
    commands
        .iter()
        .filter_map(|command| match command {
            Command::SpawnEnemy { tier, .. } => Some(*tier),
            _ => None,
        })
        .collect()
}

fn flashes(commands: &[Command]) -> Vec<Rgba> {
    commands
        .iter()
        .filter_map(|command| match command {
            Command::FlashScreen { color, .. } => Some(*color),
            _ => None,
        })
        .collect()
}

#[test]
fn round_start_spawns_opening_enemy() {
    let (world, events) = started_world();
    let mut director = Director::new(DirectorConfig::default());
    let mut commands = Vec::new();
    director.handle(&events, &query::player(&world), &mut commands);

    assert_eq!(spawned_tiers(&commands), vec![DifficultyTier::Normal]);
    assert_eq!(director.tier(), DifficultyTier::Normal);
}

#[test]
fn crossing_enhanced_threshold_fires_activation_once() {
    let (world, events) = started_world();
    let mut director = Director::new(DirectorConfig::default());
    let mut commands = Vec::new();
    director.handle(&events, &query::player(&world), &mut commands);

    let commands = advance(&mut director, &world, Duration::from_millis(59_900));
    assert_eq!(director.tier(), DifficultyTier::Normal);
    assert!(flashes(&commands).is_empty());

    let commands = advance(&mut director, &world, Duration::from_millis(200));
    assert_eq!(director.tier(), DifficultyTier::Enhanced);
    assert_eq!(flashes(&commands), vec![Rgba::new(1.0, 0.6, 0.2, 0.3)]);
    let enhanced_burst = DirectorConfig::default().enhanced_cadence.burst as usize;
    assert_eq!(
        spawned_tiers(&commands),
        vec![DifficultyTier::Enhanced; enhanced_burst + 1]
    );

    let commands = advance(&mut director, &world, Duration::from_millis(100));
    assert!(flashes(&commands).is_empty());
    assert!(spawned_tiers(&commands).is_empty());
}

#[test]
fn one_interval_of_time_yields_one_burst() {
    let (world, events) = started_world();
    let mut director = Director::new(DirectorConfig::default());
    let mut commands = Vec::new();
    director.handle(&events, &query::player(&world), &mut commands);

    let first_tick = advance(&mut director, &world, Duration::from_millis(100));
    assert_eq!(spawned_tiers(&first_tick).len(), 1);

    let mut bursts = 0;
    for _ in 0..4 {
        let commands = advance(&mut director, &world, Duration::from_millis(500));
        bursts += spawned_tiers(&commands).len();
    }
    assert_eq!(bursts, 1);
}

#[test]
fn single_step_across_both_thresholds_activates_in_order() {
    let (world, events) = started_world();
    let mut director = Director::new(DirectorConfig::default());
    let mut commands = Vec::new();
    director.handle(&events, &query::player(&world), &mut commands);

    let commands = advance(&mut director, &world, Duration::from_secs(80));
    assert_eq!(director.tier(), DifficultyTier::Extreme);
    assert_eq!(
        flashes(&commands),
        vec![Rgba::new(1.0, 0.6, 0.2, 0.3), Rgba::new(1.0, 0.2, 0.2, 0.4)]
    );
    assert_eq!(
        spawned_tiers(&commands),
        vec![
            DifficultyTier::Enhanced,
            DifficultyTier::Enhanced,
            DifficultyTier::Extreme,
            DifficultyTier::Extreme,
            DifficultyTier::Extreme,
        ]
    );
}

#[test]
fn spawned_enemies_surround_the_player() {
    let (mut world, events) = started_world();
    let mut director = Director::new(DirectorConfig::default());
    let mut commands = Vec::new();
    director.handle(&events, &query::player(&world), &mut commands);
    commands.extend(advance(&mut director, &world, Duration::from_secs(1)));

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let player = query::player(&world);
    let view = query::enemy_view(&world);
    assert_eq!(view.len(), 2);
    for enemy in view.iter() {
        let distance = (enemy.position - player.position).length();
        assert!((distance - 20.0).abs() < 1e-3);
        assert_eq!(enemy.position.y, player.position.y);
        assert_eq!(enemy.speed, 3.5);
        assert_eq!(enemy.damage, 3);
    }
}

#[test]
fn game_over_stops_the_clock_and_new_round_resets_it() {
    let (world, events) = started_world();
    let mut director = Director::new(DirectorConfig::default());
    let mut commands = Vec::new();
    director.handle(&events, &query::player(&world), &mut commands);
    let _ = advance(&mut director, &world, Duration::from_secs(70));
    assert_eq!(director.tier(), DifficultyTier::Enhanced);

    director.handle(
        &[Event::PhaseChanged {
            phase: Phase::GameOver,
        }],
        &query::player(&world),
        &mut commands,
    );
    let _ = advance(&mut director, &world, Duration::from_secs(10));
    assert_eq!(director.elapsed(), Duration::from_secs(70));

    director.handle(
        &[Event::PhaseChanged {
            phase: Phase::Playing,
        }],
        &query::player(&world),
        &mut commands,
    );
    assert_eq!(director.elapsed(), Duration::ZERO);
    assert_eq!(director.tier(), DifficultyTier::Normal);
}
