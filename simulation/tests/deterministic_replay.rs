use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use nird_defence_core::{CellCoord, TowerKind};
use nird_defence_simulation::{Simulation, SimulationConfig};

fn replay() -> (u64, u64) {
    let mut simulation = Simulation::new(SimulationConfig::default());
    let mut hasher = DefaultHasher::new();

    for (kind, cell) in [
        (TowerKind::TuxTurret, CellCoord::new(1, 1)),
        (TowerKind::TuxTurret, CellCoord::new(3, 3)),
    ] {
        assert!(simulation.place_tower(kind, cell).is_ok());
    }

    let frame = Duration::from_micros(16_700);
    for _ in 0..3_000 {
        if simulation.scene().hud.can_start_wave() {
            assert!(simulation.start_next_wave().is_ok());
        }
        let _ = simulation.advance(frame);
        for event in simulation.drain_events() {
            format!("{event:?}").hash(&mut hasher);
        }
    }

    (hasher.finish(), simulation.status().tick)
}

#[test]
fn scripted_match_replays_identically() {
    let (first, ticks) = replay();
    let (second, _) = replay();

    assert!(ticks > 0);
    assert_eq!(first, second, "replay diverged between runs");
}
