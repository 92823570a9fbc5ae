#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays NIRD Defence headlessly.
//!
//! The runner loads the rules and feeds the scripted defence through the
//! terminal backend's frame input. Waves are launched as soon as the previous
//! one is cleared, and a report is printed once the match is decided or a
//! limit is reached.

mod args;
mod report;
mod terminal;

use std::io;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use nird_defence_rendering::{Presentation, RenderingBackend, TowerPreview};
use nird_defence_simulation::{Simulation, SimulationConfig};
use nird_defence_world::Rules;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{args::Args, report::Report, terminal::TerminalBackend};

/// Entry point for the NIRD Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let rules = match &args.rules {
        Some(path) => Rules::load(path)
            .with_context(|| format!("failed to load rules from {}", path.display()))?,
        None => Rules::default(),
    };

    let mut simulation = Simulation::with_rules(rules, SimulationConfig::default());
    let wave_limit = args.waves.unwrap_or(u32::MAX);
    let max_ticks = args.max_ticks;
    let frame_step = simulation.config().tick_duration();
    let placements = args
        .towers
        .iter()
        .map(|tower| (tower.kind, tower.cell))
        .collect();
    let presentation = Presentation::new("NIRD Defence", simulation.scene());
    let mut failure = None;

    TerminalBackend::new(io::stdout().lock(), frame_step)
        .with_render_every(args.render_every)
        .with_placements(placements)
        .with_restart_at(args.restart_at)
        .run(presentation, |dt, input, scene| {
            if input.restart {
                simulation.restart();
                info!("match restarted");
            }

            if let (true, Some(kind)) = (input.confirm_action, input.selected_tower) {
                let placed = match input.cursor_cell {
                    Some(cell) => simulation.place_tower(kind, cell).map_err(|reason| {
                        anyhow!("cannot place {kind:?} at {cell:?}: {reason:?}")
                    }),
                    None => Err(anyhow!("cannot place {kind:?} outside the board")),
                };
                match placed {
                    Ok(tower) => info!(?tower, ?kind, cell = ?input.cursor_cell, "tower placed"),
                    Err(error) => {
                        failure = Some(error);
                        return false;
                    }
                }
            }

            let status = simulation.status();
            if input.start_wave && status.wave_index < wave_limit {
                match simulation.start_next_wave() {
                    Ok(wave) => info!(wave, "wave launched"),
                    Err(reason) => warn!(?reason, "wave not launched"),
                }
            }

            let _ = simulation.advance(dt);
            let _ = simulation.drain_events();

            *scene = simulation.scene();
            scene.tower_preview = match (input.selected_tower, input.cursor_cell) {
                (Some(kind), Some(cell)) => {
                    Some(TowerPreview::evaluate(simulation.world(), kind, cell))
                }
                _ => None,
            };

            let status = simulation.status();
            let waves_done = status.wave_index >= wave_limit && !status.wave_in_progress;
            !(status.phase.is_over() || waves_done || status.tick >= max_ticks)
        })?;

    if let Some(error) = failure {
        return Err(error);
    }

    let status = simulation.status();
    info!(phase = ?status.phase, tick = status.tick, "match finished");

    let report = Report::new(status, simulation.stats());
    let mut stdout = io::stdout().lock();
    if args.json {
        report.write_json(&mut stdout)
    } else {
        report.write_text(&mut stdout)
    }
}
