//! Data layer: paging, filtering, quick search, sorting, grouping and export.
//!
//! Everything here is a pure function of records and descriptors. The
//! coordinator composes these pieces into the pipeline
//!
//! ```text
//! source → filter clauses → quick search → sort → group order → page slice
//! ```
//!
//! and, for server data, turns the same descriptors into a [`source::ServerQuery`].

pub mod export;
pub mod filter;
pub mod group;
pub mod paging;
pub mod search;
pub mod sort;
pub mod source;

pub use export::{ExportOptions, ExportTable};
pub use filter::{FilterClause, FilterOp};
pub use group::{GroupBucket, GroupField};
pub use paging::{PageInfo, PageManager, PageSize, PagingMode};
pub use search::{QuickSearch, QuickSearchMode};
pub use sort::SortInfo;
pub use source::{DataSource, ServerDataOptions, ServerPage, ServerQuery};
