use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use nird_defence_core::{CellCoord, Command, EnemyKind, TowerKind, TowerTarget};
use nird_defence_system_tower_targeting::TowerTargeting;
use nird_defence_world::{self as world, query, World};

#[test]
fn replay_assigns_identical_targets() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(fingerprint(&first), fingerprint(&second));

    let after_spawn = &first[3];
    assert_eq!(after_spawn.len(), 1, "only the turret near the entry sees the enemy");
    assert_eq!(after_spawn[0].tower.get(), 0);

    let after_second_spawn = &first[4];
    assert_eq!(after_second_spawn.len(), 1);
    assert_eq!(
        after_second_spawn[0].enemy, after_spawn[0].enemy,
        "the earliest spawned enemy stays the target"
    );
}

fn scripted_commands() -> Vec<Command> {
    vec![
        Command::PlaceTower {
            kind: TowerKind::TuxTurret,
            cell: CellCoord::new(1, 1),
        },
        Command::PlaceTower {
            kind: TowerKind::TuxTurret,
            cell: CellCoord::new(7, 9),
        },
        Command::StartWave,
        Command::SpawnEnemy {
            kind: EnemyKind::Tracker,
        },
        Command::SpawnEnemy {
            kind: EnemyKind::Tracker,
        },
    ]
}

fn replay(commands: Vec<Command>) -> Vec<Vec<TowerTarget>> {
    let mut world = World::new();
    let mut targeting = TowerTargeting::new();
    let mut assignments = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);

        let mut targets = Vec::new();
        targeting.handle(
            query::phase(&world),
            &query::tower_view(&world),
            &query::enemy_view(&world),
            query::tower_catalog(&world),
            &mut targets,
        );
        assignments.push(targets);
    }

    assignments
}

fn fingerprint(assignments: &[Vec<TowerTarget>]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for targets in assignments {
        targets.len().hash(&mut hasher);
        for target in targets {
            target.tower.hash(&mut hasher);
            target.enemy.hash(&mut hasher);
        }
    }
    hasher.finish()
}
