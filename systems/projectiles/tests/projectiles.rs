use nird_defence_core::{
    CellCoord, Command, EnemyId, EnemyKind, Event, ProjectileId, TowerId, TowerKind,
    SLOWED_FACTOR,
};
use nird_defence_system_projectiles::Projectiles;
use nird_defence_world::{self as world, query, Rules, World};

fn armed_world(tower: TowerKind, enemies: usize) -> World {
    armed_world_with_rules(Rules::default(), tower, enemies)
}

fn armed_world_with_rules(rules: Rules, tower: TowerKind, enemies: usize) -> World {
    let mut world = World::with_rules(rules);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceTower {
            kind: tower,
            cell: CellCoord::new(1, 1),
        },
        &mut events,
    );
    world::apply(&mut world, Command::StartWave, &mut events);
    for _ in 0..enemies {
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Tracker,
            },
            &mut events,
        );
    }
    world::apply(
        &mut world,
        Command::FireProjectile {
            tower: TowerId::new(0),
            target: EnemyId::new(0),
        },
        &mut events,
    );
    assert_eq!(query::projectile_view(&world).len(), 1);
    world
}

fn fly(world: &mut World) -> Vec<Event> {
    let mut system = Projectiles::new();
    let mut events = Vec::new();
    for _ in 0..10 {
        let mut commands = Vec::new();
        system.handle(
            query::phase(world),
            &query::projectile_view(world),
            &query::enemy_view(world),
            &mut commands,
        );
        for command in commands {
            world::apply(world, command, &mut events);
        }
        if query::projectile_view(world).is_empty() {
            break;
        }
    }
    events
}

#[test]
fn frost_splash_damages_and_slows_every_enemy_around_the_target() {
    let mut world = armed_world(TowerKind::Firewall, 2);

    let events = fly(&mut world);

    let damaged = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyDamaged { amount: 120, .. }))
        .count();
    assert_eq!(damaged, 2);
    assert!(query::projectile_view(&world).is_empty());
    for enemy in query::enemy_view(&world).iter() {
        assert_eq!(enemy.health, 20);
        assert_eq!(enemy.slow_factor, SLOWED_FACTOR);
    }
}

#[test]
fn frost_without_splash_damages_the_target_but_does_not_slow() {
    let mut rules = Rules::default();
    rules.towers.firewall.splash_radius = 0.0;
    let mut world = armed_world_with_rules(rules, TowerKind::Firewall, 2);

    let _ = fly(&mut world);

    let enemies: Vec<_> = query::enemy_view(&world)
        .iter()
        .map(|enemy| (enemy.health, enemy.slow_factor))
        .collect();
    assert_eq!(enemies, vec![(20, 1.0), (140, 1.0)]);
}

#[test]
fn bullets_hit_only_their_target() {
    let mut world = armed_world(TowerKind::TuxTurret, 2);

    let _ = fly(&mut world);

    let health: Vec<_> = query::enemy_view(&world)
        .iter()
        .map(|enemy| (enemy.health, enemy.is_slowed()))
        .collect();
    assert_eq!(health, vec![(128, false), (140, false)]);
}

#[test]
fn projectile_is_discarded_when_target_leaves_play() {
    let mut world = armed_world(TowerKind::TuxTurret, 1);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::EscapeEnemy {
            enemy: EnemyId::new(0),
        },
        &mut events,
    );

    let events = fly(&mut world);

    assert_eq!(
        events,
        vec![Event::ProjectileExpired {
            projectile: ProjectileId::new(0)
        }]
    );
}
