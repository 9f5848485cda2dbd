//! Tile projection, shared by tile and compact presentations.
//!
//! Each [`TileItem`] carries the resolved title, description and property texts
//! of one record plus the character ranges matched by the quick search, so a
//! renderer can draw highlights without re-running the query.

use super::ProjectionContext;
use crate::app::commands::Command;
use crate::app::modes::{SelectionMode, TileSize, ViewMode};
use crate::data::{GroupBucket, PageInfo, SortInfo};
use crate::domain::Record;
use serde::Serialize;

/// One property line of a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileProperty {
    pub field: String,
    /// Column label of the field when the grid configures one.
    pub label: Option<String>,
    pub value: Option<String>,
}

/// One rendered card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileItem {
    pub record: Record,
    pub selected: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub properties: Vec<TileProperty>,
    pub title_highlights: Vec<(usize, usize)>,
    pub description_highlights: Vec<(usize, usize)>,
}

/// Display-ready tile state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileOptions {
    pub size: TileSize,
    /// Single-column compact list.
    pub compact: bool,
    pub title_field: Option<String>,
    pub description_field: Option<String>,
    pub property_fields: Vec<String>,
    pub is_cell: bool,
    pub items: Vec<TileItem>,
    pub selection_mode: SelectionMode,
    pub groups: Vec<GroupBucket>,
    pub sort: Option<SortInfo>,
    pub page_info: PageInfo,
    pub no_data: bool,
    pub commands: Vec<Command>,
}

impl TileOptions {
    /// Computes the tile projection. In compact mode only the most recent
    /// selection is flagged and selection is single-select.
    #[must_use]
    pub fn project(ctx: &ProjectionContext<'_>) -> Self {
        let tile = &ctx.config.tile;
        let compact = ctx.state.mode == ViewMode::Compact;

        let items = ctx
            .rows
            .iter()
            .zip(ctx.selection_flags())
            .map(|(record, selected)| {
                let title = tile.title_field.as_deref().and_then(|f| record.text(f));
                let description = tile.description_field.as_deref().and_then(|f| record.text(f));
                TileItem {
                    title_highlights: highlights(ctx, tile.title_field.as_deref(), title.as_deref()),
                    description_highlights: highlights(
                        ctx,
                        tile.description_field.as_deref(),
                        description.as_deref(),
                    ),
                    properties: tile
                        .property_fields
                        .iter()
                        .map(|field| TileProperty {
                            field: field.clone(),
                            label: ctx
                                .config
                                .columns
                                .iter()
                                .find(|c| c.field == *field)
                                .and_then(|c| c.label.clone()),
                            value: record.text(field),
                        })
                        .collect(),
                    record: record.clone(),
                    selected,
                    title,
                    description,
                }
            })
            .collect();

        Self {
            size: ctx.state.tile_size,
            compact,
            title_field: tile.title_field.clone(),
            description_field: tile.description_field.clone(),
            property_fields: tile.property_fields.clone(),
            is_cell: ctx.is_cell,
            items,
            selection_mode: ctx.state.effective_selection_mode(),
            groups: ctx.groups.to_vec(),
            sort: ctx.state.sort.clone(),
            page_info: ctx.page_info,
            no_data: ctx.state.no_data,
            commands: ctx.commands.iter().filter(|c| c.visible).cloned().collect(),
        }
    }
}

// Highlights only when the quick search covers this field.
fn highlights(ctx: &ProjectionContext<'_>, field: Option<&str>, text: Option<&str>) -> Vec<(usize, usize)> {
    let (Some(field), Some(text)) = (field, text) else {
        return vec![];
    };
    match ctx.search.field() {
        Some(searched) if searched != field => vec![],
        _ => ctx.search.highlight_ranges(text),
    }
}
