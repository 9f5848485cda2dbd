//! Renderer seams and the render entry point.
//!
//! Drawing lives outside this crate. Hosts implement [`GridRenderer`] and
//! [`TileRenderer`]; [`render`] forwards the active projection to the matching
//! one. Compact mode is drawn by the tile renderer with `compact` set.

use super::{GridOptions, Projection, TileOptions};
use crate::app::ViewModeCoordinator;

/// Draws the grid surface.
pub trait GridRenderer {
    fn render_grid(&mut self, options: &GridOptions);
}

/// Draws the tile surface, including compact lists.
pub trait TileRenderer {
    fn render_tiles(&mut self, options: &TileOptions);
}

/// Forwards the coordinator's active projection to its renderer.
pub fn render(coordinator: &ViewModeCoordinator, grid: &mut dyn GridRenderer, tiles: &mut dyn TileRenderer) {
    let _span = tracing::debug_span!("render", mode = ?coordinator.state().mode).entered();

    match coordinator.projection() {
        Projection::Grid(options) => grid.render_grid(&options),
        Projection::Tile(options) | Projection::Compact(options) => tiles.render_tiles(&options),
    }
}
