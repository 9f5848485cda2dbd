//! Grid projection.

use super::ProjectionContext;
use crate::app::commands::Command;
use crate::app::modes::{SelectionMode, SortDirection};
use crate::data::{GroupBucket, GroupField, PageInfo, SortInfo};
use crate::domain::Record;
use serde::Serialize;

/// One visible grid column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridColumn {
    pub field: String,
    /// Header text; `None` renders an empty header.
    pub label: Option<String>,
    pub width: Option<u32>,
    pub sortable: bool,
    /// Direction indicator when this column is the sort field.
    pub sorted: Option<SortDirection>,
    pub field_source: Option<String>,
}

/// Display-ready grid state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    /// Visible columns in display order.
    pub columns: Vec<GridColumn>,
    pub rows: Vec<Record>,
    pub groups: Vec<GroupBucket>,
    pub group_field: Option<GroupField>,
    pub sort: Option<SortInfo>,
    pub selection_mode: SelectionMode,
    /// Indices into `rows` of selected rows.
    pub selected_rows: Vec<usize>,
    pub page_info: PageInfo,
    pub no_data: bool,
    pub filter_active: bool,
    pub commands: Vec<Command>,
    pub height: Option<String>,
    pub container_id: Option<String>,
}

impl GridOptions {
    /// Computes the grid projection.
    #[must_use]
    pub fn project(ctx: &ProjectionContext<'_>) -> Self {
        let sort = ctx.state.sort.as_ref();
        let columns = ctx
            .config
            .visible_columns()
            .map(|column| GridColumn {
                field: column.field.clone(),
                label: column.label.clone(),
                width: column.width,
                sortable: column.sortable,
                sorted: sort.filter(|s| s.field == column.field).map(|s| s.direction),
                field_source: column.field_source.clone(),
            })
            .collect();

        let selected_rows = ctx
            .selection_flags()
            .into_iter()
            .enumerate()
            .filter_map(|(index, selected)| selected.then_some(index))
            .collect();

        Self {
            columns,
            rows: ctx.rows.to_vec(),
            groups: ctx.groups.to_vec(),
            group_field: ctx.state.group_field.clone(),
            sort: ctx.state.sort.clone(),
            selection_mode: ctx.state.effective_selection_mode(),
            selected_rows,
            page_info: ctx.page_info,
            no_data: ctx.state.no_data,
            filter_active: ctx.state.is_filter_active(),
            commands: ctx.commands.iter().filter(|c| c.visible).cloned().collect(),
            height: ctx.height.map(str::to_string),
            container_id: ctx.container_id.map(str::to_string),
        }
    }
}
