//! Render projections handed to grid and tile renderers.
//!
//! Projections are immutable, display-ready snapshots computed from the
//! coordinator's [`ViewState`] and effective [`ViewConfig`]. Renderers receive
//! them read-only and report intent back through events; they never see or
//! mutate canonical state.
//!
//! # Architecture
//!
//! ```text
//! ViewState + ViewConfig + page rows ──▶ ProjectionContext ──▶ GridOptions
//!                                                         └──▶ TileOptions
//! ```
//!
//! - [`grid`]: tabular projection
//! - [`tile`]: card projection, also used for compact mode
//! - [`renderer`]: renderer traits and the [`render`] entry point

pub mod grid;
pub mod renderer;
pub mod tile;

pub use grid::{GridColumn, GridOptions};
pub use renderer::{render, GridRenderer, TileRenderer};
pub use tile::{TileItem, TileOptions, TileProperty};

use crate::app::commands::Command;
use crate::app::state::ViewState;
use crate::data::{GroupBucket, PageInfo, QuickSearch};
use crate::domain::{IdentityKey, Record};
use crate::storage::ViewConfig;

/// Everything a projection is computed from.
pub struct ProjectionContext<'a> {
    pub config: &'a ViewConfig,
    pub state: &'a ViewState,
    /// Rows of the current page, in display order.
    pub rows: &'a [Record],
    pub groups: &'a [GroupBucket],
    pub page_info: PageInfo,
    pub identity: &'a IdentityKey,
    pub search: &'a QuickSearch,
    /// Commands with runtime gating already applied.
    pub commands: &'a [Command],
    pub is_cell: bool,
    pub height: Option<&'a str>,
    pub container_id: Option<&'a str>,
}

impl ProjectionContext<'_> {
    /// Selection flags of `rows`, honouring compact single-select display.
    pub(crate) fn selection_flags(&self) -> Vec<bool> {
        let compact = self.state.mode == crate::app::modes::ViewMode::Compact;
        let most_recent = self.state.selected_keys.most_recent();
        self.rows
            .iter()
            .map(|record| {
                if compact {
                    most_recent.is_some_and(|key| self.identity.matches(key, record))
                } else {
                    self.state.selected_keys.is_selected(self.identity, record)
                }
            })
            .collect()
    }
}

/// The projection of the active presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Grid(GridOptions),
    Tile(TileOptions),
    /// Single-column, single-select list rendered by the tile renderer.
    Compact(TileOptions),
}
