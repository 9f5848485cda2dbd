//! Collection configuration input and normalization.
//!
//! - [`collection`]: the raw, serde-deserializable [`CollectionOptions`]
//! - [`normalize`]: defaulting and validation into [`NormalizedOptions`]

pub mod collection;
pub mod normalize;

pub use collection::{
    ColumnDef, CollectionOptions, CommandDef, FieldDef, FilterBarOptions, GridConfig, PagingOptions,
    QuickSearchOptions, TileConfig,
};
pub use normalize::{derive_tile_size, normalize, NormalizedOptions, ViewOptions};
