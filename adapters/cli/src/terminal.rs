//! Plain-text rendering backend.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result};
use nird_defence_core::{CellCoord, EnemyKind, TowerKind};
use nird_defence_rendering::{
    FrameInput, Presentation, RenderingBackend, Scene, TileGridPresentation,
};

/// Backend that drives the update loop as fast as possible and draws the
/// board as ASCII art.
///
/// Player input is scripted: each scripted tower is placed on its own frame
/// by pointing at the centre of its cell and confirming, waves are launched
/// once the script is exhausted, and an optional restart frame replays the
/// placements from scratch.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W> {
    writer: W,
    frame_step: Duration,
    render_every: u64,
    auto_start_waves: bool,
    placements: Vec<(TowerKind, CellCoord)>,
    restart_at: Option<u64>,
}

impl<W: Write> TerminalBackend<W> {
    pub(crate) fn new(writer: W, frame_step: Duration) -> Self {
        Self {
            writer,
            frame_step,
            render_every: 0,
            auto_start_waves: true,
            placements: Vec::new(),
            restart_at: None,
        }
    }

    /// Towers placed one per frame before the first wave is launched.
    pub(crate) fn with_placements(mut self, placements: Vec<(TowerKind, CellCoord)>) -> Self {
        self.placements = placements;
        self
    }

    /// Requests a restart on the provided frame.
    pub(crate) fn with_restart_at(mut self, frame: Option<u64>) -> Self {
        self.restart_at = frame;
        self
    }

    fn next_input(&self, frame: u64, next_placement: &mut usize, scene: &Scene) -> FrameInput {
        if self.restart_at == Some(frame) {
            *next_placement = 0;
            return FrameInput {
                restart: true,
                ..FrameInput::default()
            };
        }

        match self.placements.get(*next_placement) {
            Some(&(kind, cell)) => {
                *next_placement += 1;
                FrameInput {
                    cursor_cell: pointer_cell(&scene.tile_grid, cell),
                    selected_tower: Some(kind),
                    confirm_action: true,
                    ..FrameInput::default()
                }
            }
            None => FrameInput {
                start_wave: self.auto_start_waves && scene.hud.can_start_wave(),
                ..FrameInput::default()
            },
        }
    }

    /// Draws the board after every `frames` frames. Zero disables periodic
    /// drawing; the final board is always drawn.
    pub(crate) fn with_render_every(mut self, frames: u64) -> Self {
        self.render_every = frames;
        self
    }

    fn draw(&mut self, frame: u64, scene: &Scene) -> Result<()> {
        let hud = scene.hud;
        writeln!(
            self.writer,
            "frame {frame} | {:?} | wave {}/{} | lives {} | currency {}",
            hud.phase, hud.wave, hud.wave_count, hud.lives, hud.currency
        )?;
        for row in board_rows(scene) {
            writeln!(self.writer, "{row}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool,
    {
        writeln!(self.writer, "{}", presentation.window_title)
            .context("failed to write to the terminal")?;
        let mut scene = presentation.scene;
        let mut frame = 0_u64;
        let mut next_placement = 0;

        loop {
            let input = self.next_input(frame, &mut next_placement, &scene);
            if !update_scene(self.frame_step, input, &mut scene) {
                break;
            }
            frame += 1;
            if self.render_every > 0 && frame % self.render_every == 0 {
                self.draw(frame, &scene)?;
            }
        }

        self.draw(frame, &scene)?;
        self.writer.flush().context("failed to flush the terminal")?;
        Ok(())
    }
}

/// Cell a pointer aimed at the centre of `cell` would hover, if it is on the
/// board.
fn pointer_cell(grid: &TileGridPresentation, cell: CellCoord) -> Option<CellCoord> {
    let pointer = grid.clamp_world_position(grid.to_world(cell.to_point()));
    grid.snap_world_to_cell(pointer)
}

/// Renders the board, one string per row.
pub(crate) fn board_rows(scene: &Scene) -> Vec<String> {
    let grid = scene.tile_grid;
    let columns = grid.columns as usize;
    let mut cells = vec![vec!['.'; columns]; grid.rows as usize];

    let mut put = |column: u32, row: u32, glyph: char| {
        if let Some(cell) = cells
            .get_mut(row as usize)
            .and_then(|line| line.get_mut(column as usize))
        {
            *cell = glyph;
        }
    };

    for cell in &scene.path {
        put(cell.column(), cell.row(), '#');
    }
    for tower in &scene.towers {
        let glyph = match tower.kind {
            TowerKind::TuxTurret => 'T',
            TowerKind::Firewall => 'F',
            TowerKind::Recycler => 'R',
        };
        put(tower.cell.column(), tower.cell.row(), glyph);
    }
    for projectile in &scene.projectiles {
        if let Some(cell) = grid.snap_world_to_cell(projectile.position) {
            put(cell.column(), cell.row(), '*');
        }
    }
    for enemy in &scene.enemies {
        let glyph = match enemy.kind {
            EnemyKind::Tracker => 't',
            EnemyKind::Bloatware => 'b',
            EnemyKind::LicenseBoss => 'B',
        };
        if let Some(cell) = grid.snap_world_to_cell(enemy.position) {
            put(cell.column(), cell.row(), glyph);
        }
    }

    cells.into_iter().map(String::from_iter).collect()
}
