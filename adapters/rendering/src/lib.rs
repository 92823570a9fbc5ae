#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for NIRD Defence adapters.
//!
//! A [`Scene`] is captured from world queries once per frame. It carries
//! everything a host needs to draw the board and the HUD, and nothing that
//! would let a host mutate the match.

use anyhow::Result as AnyResult;
use glam::Vec2;
use nird_defence_core::{
    CellCoord, CellPoint, EnemyId, EnemyKind, Phase, PlacementError, ProjectileId,
    ProjectileKind, TowerId, TowerKind,
};
use nird_defence_world::{query, World};
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Base color used for an enemy kind.
#[must_use]
pub const fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Tracker => Color::from_rgb_u8(0xf9, 0x73, 0x16),
        EnemyKind::Bloatware => Color::from_rgb_u8(0xa8, 0x55, 0xf7),
        EnemyKind::LicenseBoss => Color::from_rgb_u8(0xdc, 0x26, 0x26),
    }
}

/// Base color used for a tower kind.
#[must_use]
pub const fn tower_color(kind: TowerKind) -> Color {
    match kind {
        TowerKind::TuxTurret => Color::from_rgb_u8(0xfa, 0xcc, 0x15),
        TowerKind::Firewall => Color::from_rgb_u8(0xfb, 0x92, 0x3c),
        TowerKind::Recycler => Color::from_rgb_u8(0x22, 0xc5, 0x5e),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cell under the cursor, if the cursor lies on the board.
    pub cursor_cell: Option<CellCoord>,
    /// Tower kind currently selected in the palette.
    pub selected_tower: Option<TowerKind>,
    /// Whether the adapter detected a placement confirmation on this frame.
    pub confirm_action: bool,
    /// Whether the player asked for the next wave on this frame.
    pub start_wave: bool,
    /// Whether the player asked to restart the match on this frame.
    pub restart: bool,
}

/// Describes the square cell grid that can be rendered by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single cell expressed in world units.
    pub cell_length: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl TileGridPresentation {
    /// Side length used by [`Scene::capture`].
    pub const DEFAULT_CELL_LENGTH: f32 = 48.0;

    /// Calculates the total width of the grid.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Clamps a world-space position to the playable grid bounds.
    #[must_use]
    pub fn clamp_world_position(&self, position: Vec2) -> Vec2 {
        if self.columns == 0 || self.rows == 0 {
            return Vec2::ZERO;
        }

        Vec2::new(
            position.x.clamp(0.0, self.width()),
            position.y.clamp(0.0, self.height()),
        )
    }

    /// Converts a simulation point into the world-space centre it is drawn at.
    ///
    /// Simulation coordinates address cell centres, so `(0, 0)` maps to the
    /// middle of the top-left cell.
    #[must_use]
    pub fn to_world(&self, point: CellPoint) -> Vec2 {
        Vec2::new(
            (point.x() as f32 + 0.5) * self.cell_length,
            (point.y() as f32 + 0.5) * self.cell_length,
        )
    }

    /// Snaps a world-space position to the cell containing it.
    ///
    /// Returns `None` when the position lies outside the grid.
    #[must_use]
    pub fn snap_world_to_cell(&self, position: Vec2) -> Option<CellCoord> {
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }

        let column = (position.x / self.cell_length).floor() as u32;
        let row = (position.y / self.cell_length).floor() as u32;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(CellCoord::new(column, row))
    }
}

/// Lives, currency and wave counters shown above the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Lives left before the match is lost.
    pub lives: i32,
    /// Currency available for placement.
    pub currency: u32,
    /// Number of waves launched so far.
    pub wave: u32,
    /// Number of waves in the schedule.
    pub wave_count: u32,
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Whether the launched wave is still being fought.
    pub wave_in_progress: bool,
}

impl HudPresentation {
    /// Reports whether the host should offer the "next wave" action.
    #[must_use]
    pub fn can_start_wave(&self) -> bool {
        !self.phase.is_over() && !self.wave_in_progress && self.wave < self.wave_count
    }
}

/// Describes an enemy drawn on the path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Identifier allocated to the enemy by the world.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// World-space centre of the enemy.
    pub position: Vec2,
    /// Remaining health as a fraction of the maximum.
    pub health_ratio: f32,
    /// Whether the enemy currently moves below full speed.
    pub slowed: bool,
    /// Fill color, lightened while slowed.
    pub color: Color,
}

/// Describes a tower placed on the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Remaining cooldown as a fraction of the tower's interval.
    pub cooldown_ratio: f32,
    /// Targeting radius in world units; zero for passive towers.
    pub range: f32,
    /// Fill color.
    pub color: Color,
}

/// Describes a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Kind of projectile.
    pub kind: ProjectileKind,
    /// World-space centre of the projectile.
    pub position: Vec2,
}

/// Entry of the tower palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Tower kind offered.
    pub kind: TowerKind,
    /// Placement cost.
    pub cost: u32,
    /// Whether the player can currently pay for it.
    pub affordable: bool,
}

/// Placement preview for the cell under the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TowerPreview {
    /// Kind of tower proposed for placement.
    pub kind: TowerKind,
    /// Cell the tower would occupy.
    pub cell: CellCoord,
    /// Reason the world would reject the placement, if any.
    pub rejection: Option<PlacementError>,
}

impl TowerPreview {
    /// Evaluates a placement against the world without applying it.
    #[must_use]
    pub fn evaluate(world: &World, kind: TowerKind, cell: CellCoord) -> Self {
        Self {
            kind,
            cell,
            rejection: query::placement_error(world, kind, cell),
        }
    }

    /// Reports whether the placement would be accepted.
    #[must_use]
    pub const fn placeable(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Renderable snapshot of a match.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board dimensions.
    pub tile_grid: TileGridPresentation,
    /// Cells enemies walk through, in traversal order.
    pub path: Vec<CellCoord>,
    /// Scalar counters.
    pub hud: HudPresentation,
    /// Enemies on the path, in spawn order.
    pub enemies: Vec<EnemyPresentation>,
    /// Towers on the board, in placement order.
    pub towers: Vec<TowerPresentation>,
    /// Projectiles in flight, in launch order.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Tower kinds offered to the player.
    pub palette: Vec<PaletteEntry>,
    /// Placement preview under the cursor, if any.
    pub tower_preview: Option<TowerPreview>,
}

impl Scene {
    /// Captures the current state of the world.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        let rules = query::rules(world);
        let tile_grid = TileGridPresentation {
            columns: rules.columns,
            rows: rules.rows,
            cell_length: TileGridPresentation::DEFAULT_CELL_LENGTH,
            line_color: Color::from_rgb_u8(0x33, 0x41, 0x55),
        };
        let status = query::status(world);
        let catalog = query::tower_catalog(world);

        let enemies = query::enemy_view(world)
            .iter()
            .map(|enemy| {
                let base = enemy_color(enemy.kind);
                let slowed = enemy.is_slowed();
                EnemyPresentation {
                    id: enemy.id,
                    kind: enemy.kind,
                    position: tile_grid.to_world(enemy.position),
                    health_ratio: enemy.health_ratio().clamp(0.0, 1.0) as f32,
                    slowed,
                    color: if slowed { base.lighten(0.5) } else { base },
                }
            })
            .collect();

        let towers = query::tower_view(world)
            .iter()
            .map(|tower| {
                let stats = catalog.stats(tower.kind);
                let cooldown_ratio = if stats.fire_interval == 0 {
                    0.0
                } else {
                    (tower.cooldown_remaining as f32 / stats.fire_interval as f32).min(1.0)
                };
                TowerPresentation {
                    id: tower.id,
                    kind: tower.kind,
                    cell: tower.cell,
                    cooldown_ratio,
                    range: stats.range as f32 * tile_grid.cell_length,
                    color: tower_color(tower.kind),
                }
            })
            .collect();

        let projectiles = query::projectile_view(world)
            .iter()
            .map(|projectile| ProjectilePresentation {
                id: projectile.id,
                kind: projectile.kind,
                position: tile_grid.to_world(projectile.position),
            })
            .collect();

        let palette = TowerKind::ALL
            .into_iter()
            .map(|kind| PaletteEntry {
                kind,
                cost: catalog.stats(kind).cost,
                affordable: query::can_afford(world, kind),
            })
            .collect();

        Self {
            tile_grid,
            path: query::path(world).waypoints().to_vec(),
            hud: HudPresentation {
                lives: status.lives,
                currency: status.currency,
                wave: status.wave_index,
                wave_count: status.wave_count,
                phase: status.phase,
                wave_in_progress: status.wave_in_progress,
            },
            enemies,
            towers,
            projectiles,
            palette,
            tower_preview: None,
        }
    }

    /// Reports whether the player can currently pay for the tower kind.
    #[must_use]
    pub fn can_afford(&self, kind: TowerKind) -> bool {
        self.palette
            .iter()
            .any(|entry| entry.kind == kind && entry.affordable)
    }
}

/// Top-level description of what a backend should display.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the host window or terminal.
    pub window_title: String,
    /// Scene presented on the first frame.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting scenes frame by frame.
pub trait RenderingBackend {
    /// Runs the backend until it decides to stop.
    ///
    /// `update_scene` receives the elapsed time and the input gathered for the
    /// frame, and refreshes the scene in place. It returns `false` once the
    /// host has nothing left to show.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool;
}
