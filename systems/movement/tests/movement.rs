use nird_defence_core::{
    CellCoord, CellPoint, Command, EnemyKind, EnemyStats, Event, PathTable, Phase, WaveDefinition,
    WaveSchedule,
};
use nird_defence_system_movement::Movement;
use nird_defence_world::{self as world, query, Rules, World};

fn short_track() -> Rules {
    let mut rules = Rules {
        starting_lives: 1,
        path: PathTable::new(vec![
            CellCoord::new(0, 0),
            CellCoord::new(1, 0),
            CellCoord::new(2, 0),
        ]),
        waves: WaveSchedule::new(vec![WaveDefinition::new(1, vec![EnemyKind::Tracker])]),
        ..Rules::default()
    };
    rules.enemies.tracker = EnemyStats {
        health: 140,
        speed: 0.5,
        reward: 5,
    };
    rules
}

fn spawned_world() -> World {
    let mut world = World::with_rules(short_track());
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartWave, &mut events);
    world::apply(&mut world, Command::Tick, &mut events);
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Tracker,
        },
        &mut events,
    );
    assert_eq!(query::enemy_view(&world).len(), 1);
    world
}

fn move_tick(world: &mut World, movement: &mut Movement) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick, &mut events);

    let mut commands = Vec::new();
    movement.handle(
        &events,
        query::phase(world),
        &query::enemy_view(world),
        query::path(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn position(world: &World) -> Option<CellPoint> {
    query::enemy_view(world).iter().next().map(|enemy| enemy.position)
}

#[test]
fn enemy_walks_the_path_and_costs_a_life() {
    let mut world = spawned_world();
    let mut movement = Movement::new();

    let _ = move_tick(&mut world, &mut movement);
    assert_eq!(position(&world), Some(CellPoint::new(0.5, 0.0)));

    let _ = move_tick(&mut world, &mut movement);
    assert_eq!(position(&world), Some(CellPoint::new(1.0, 0.0)));

    let _ = move_tick(&mut world, &mut movement);
    assert_eq!(position(&world), Some(CellPoint::new(1.5, 0.0)));

    let events = move_tick(&mut world, &mut movement);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::EnemyEscaped { .. })));
    assert!(events.contains(&Event::LivesLost {
        count: 1,
        remaining: 0
    }));
    assert_eq!(query::phase(&world), Phase::Lost);
    assert!(query::enemy_view(&world).is_empty());
    assert_eq!(query::status(&world).currency, 150, "escapes pay nothing");
}
