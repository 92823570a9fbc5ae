#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn controller that releases the active wave's enemies at its cadence.

use nird_defence_core::{Command, Event, Phase, WaveProgress};

/// Pure system that emits spawn and wave clearance commands.
#[derive(Debug, Default)]
pub struct Spawning;

impl Spawning {
    /// Creates a new spawning system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes the tick's events and the wave bookkeeping to emit commands.
    ///
    /// At most one enemy is released per tick. Once the queue is drained and
    /// the path is empty the wave is concluded instead.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: Phase,
        progress: WaveProgress,
        out: &mut Vec<Command>,
    ) {
        if phase != Phase::Playing || !progress.wave_in_progress {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        match progress.next_spawn {
            Some(kind) => {
                if progress.frames_since_last_spawn >= progress.spawn_interval_frames {
                    out.push(Command::SpawnEnemy { kind });
                }
            }
            None => {
                if progress.enemies_alive == 0 {
                    out.push(Command::ConcludeWave);
                }
            }
        }
    }
}
