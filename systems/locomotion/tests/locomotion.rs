use std::time::Duration;

use glam::Vec3;
use vr_survival_core::{AudioCue, Command, Event};
use vr_survival_system_locomotion::{Locomotion, LocomotionConfig, Steering};
use vr_survival_world::{self as world, query, ArenaLayout, World, WorldConfig};

fn playing_world() -> World {
    let mut world = World::new(WorldConfig::default(), &ArenaLayout::default());
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartRound, &mut events);
    world
}

fn frame(world: &mut World, locomotion: &mut Locomotion, steering: Steering) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(100),
        },
        &mut events,
    );

    let player = query::player(world);
    let mut commands = Vec::new();
    locomotion.handle(&events, steering, &player, &mut commands);

    let mut follow_up = Vec::new();
    for command in commands {
        world::apply(world, command, &mut follow_up);
    }
    follow_up
}

#[test]
fn walking_follows_gaze_and_keeps_feet_on_ground() {
    let mut world = playing_world();
    let mut locomotion = Locomotion::new(LocomotionConfig::default());
    let steering = Steering {
        gaze: Vec3::X,
        axis: 1.0,
        jump: false,
    };

    let events = frame(&mut world, &mut locomotion, steering);
    assert!(events.contains(&Event::Audio {
        cue: AudioCue::FootstepsStarted
    }));
    assert!(query::footsteps_playing(&world));

    for _ in 0..9 {
        let _ = frame(&mut world, &mut locomotion, steering);
    }

    let player = query::player(&world);
    assert!((player.position.x - 2.0).abs() < 1e-3);
    assert_eq!(player.position.y, 0.0);
    assert!(player.grounded);
    assert_eq!(player.forward, Vec3::X);

    let events = frame(&mut world, &mut locomotion, Steering::default());
    assert!(events.contains(&Event::Audio {
        cue: AudioCue::FootstepsStopped
    }));
}

#[test]
fn jump_rises_then_lands() {
    let mut world = playing_world();
    let mut locomotion = Locomotion::new(LocomotionConfig::default());

    let _ = frame(
        &mut world,
        &mut locomotion,
        Steering {
            jump: true,
            ..Steering::default()
        },
    );
    let airborne = query::player(&world);
    assert!(airborne.position.y > 0.4);
    assert!(!airborne.grounded);

    for _ in 0..20 {
        let _ = frame(&mut world, &mut locomotion, Steering::default());
    }
    let landed = query::player(&world);
    assert_eq!(landed.position.y, 0.0);
    assert!(landed.grounded);
}
