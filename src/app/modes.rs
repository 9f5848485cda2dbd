//! View, tile, selection and sort mode types.
//!
//! This module defines the closed enumerations that replace the single-letter
//! view codes and loosely typed mode strings of a host configuration. Letter codes
//! are parsed exactly once, during option normalization, into [`ViewCode`].
//!
//! # State Machine
//!
//! Exactly one [`ViewMode`] is active at any time:
//! - **Grid**: tabular rendering with columns
//! - **Tile**: card rendering in one of three [`TileSize`]s
//! - **Compact**: forced single-column, single-select list for narrow containers
//!
//! # Example
//!
//! ```rust
//! use collection_viewer::app::modes::{infer_tile_size, TileSize, ViewCode, ViewMode};
//!
//! assert_eq!(ViewCode::from_letter('m'), Some(ViewCode::WideTile));
//! assert_eq!(ViewCode::WideTile.view_mode(), ViewMode::Tile);
//! assert_eq!(infer_tile_size(4, false), TileSize::Large);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Presentation currently rendered for the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Tabular rendering driven by column definitions.
    Grid,
    /// Card rendering driven by tile field mappings.
    Tile,
    /// Forced narrow-container list; never a user choice while the container is wide.
    Compact,
}

/// Card size used by tile mode, ordered smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileSize {
    /// Smallest card: title, description and up to two properties.
    Medium,
    /// Wide card with a third property column.
    Wide,
    /// Large card with room for four properties.
    Large,
}

/// Item selection behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// At most one selected item.
    Single,
    /// Any number of selected items.
    #[serde(alias = "multiple")]
    Multi,
    /// Selection disabled.
    #[default]
    None,
}

impl SelectionMode {
    /// Maximum number of simultaneously selected keys, `None` meaning unbounded.
    #[must_use]
    pub const fn capacity(self) -> Option<usize> {
        match self {
            Self::Single => Some(1),
            Self::Multi => None,
            Self::None => Some(0),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    /// Largest first.
    #[serde(alias = "descending")]
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Parsed form of the single-letter view codes used in `viewMode` / `viewOptions`.
///
/// | letter | code | meaning |
/// |---|---|---|
/// | `g` | `Grid` | grid |
/// | `s` | `MediumTile` | small card (`TileSize::Medium`) |
/// | `m` | `WideTile` | medium card (`TileSize::Wide`) |
/// | `l` | `LargeTile` | large card (`TileSize::Large`) |
/// | `c` | `Compact` | compact list |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViewCode {
    #[serde(rename = "g")]
    Grid,
    #[serde(rename = "s")]
    MediumTile,
    #[serde(rename = "m")]
    WideTile,
    #[serde(rename = "l")]
    LargeTile,
    #[serde(rename = "c")]
    Compact,
}

impl ViewCode {
    /// All codes in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Grid,
        Self::MediumTile,
        Self::WideTile,
        Self::LargeTile,
        Self::Compact,
    ];

    /// Parses a letter code (case-insensitive).
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'g' => Some(Self::Grid),
            's' => Some(Self::MediumTile),
            'm' => Some(Self::WideTile),
            'l' => Some(Self::LargeTile),
            'c' => Some(Self::Compact),
            _ => None,
        }
    }

    /// The letter this code is written as.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Grid => 'g',
            Self::MediumTile => 's',
            Self::WideTile => 'm',
            Self::LargeTile => 'l',
            Self::Compact => 'c',
        }
    }

    /// The presentation this code selects.
    #[must_use]
    pub const fn view_mode(self) -> ViewMode {
        match self {
            Self::Grid => ViewMode::Grid,
            Self::MediumTile | Self::WideTile | Self::LargeTile => ViewMode::Tile,
            Self::Compact => ViewMode::Compact,
        }
    }

    /// The tile size this code selects, if it is a tile code.
    #[must_use]
    pub const fn tile_size(self) -> Option<TileSize> {
        match self {
            Self::MediumTile => Some(TileSize::Medium),
            Self::WideTile => Some(TileSize::Wide),
            Self::LargeTile => Some(TileSize::Large),
            Self::Grid | Self::Compact => None,
        }
    }

    /// Code for a mode and tile size pair. Tile mode without a size has no code.
    #[must_use]
    pub const fn from_mode(mode: ViewMode, tile_size: Option<TileSize>) -> Option<Self> {
        match (mode, tile_size) {
            (ViewMode::Grid, _) => Some(Self::Grid),
            (ViewMode::Compact, _) => Some(Self::Compact),
            (ViewMode::Tile, Some(TileSize::Medium)) => Some(Self::MediumTile),
            (ViewMode::Tile, Some(TileSize::Wide)) => Some(Self::WideTile),
            (ViewMode::Tile, Some(TileSize::Large)) => Some(Self::LargeTile),
            (ViewMode::Tile, None) => None,
        }
    }

    /// Code for a tile size.
    #[must_use]
    pub const fn for_tile(size: TileSize) -> Self {
        match size {
            TileSize::Medium => Self::MediumTile,
            TileSize::Wide => Self::WideTile,
            TileSize::Large => Self::LargeTile,
        }
    }
}

impl fmt::Display for ViewCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Default tile size for a given number of configured property fields.
///
/// 0-2 fields give a medium tile, 3 a wide tile, and 4 a large tile unless the
/// compact property layout (`is_cell`) is used, which fits four properties on a
/// wide tile. More than four fields always need the large tile.
#[must_use]
pub const fn infer_tile_size(property_field_count: usize, is_cell: bool) -> TileSize {
    match property_field_count {
        0..=2 => TileSize::Medium,
        3 => TileSize::Wide,
        4 if is_cell => TileSize::Wide,
        _ => TileSize::Large,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_size_inference_table() {
        for count in 0..=2 {
            assert_eq!(infer_tile_size(count, false), TileSize::Medium);
            assert_eq!(infer_tile_size(count, true), TileSize::Medium);
        }
        assert_eq!(infer_tile_size(3, false), TileSize::Wide);
        assert_eq!(infer_tile_size(3, true), TileSize::Wide);
        assert_eq!(infer_tile_size(4, false), TileSize::Large);
        assert_eq!(infer_tile_size(4, true), TileSize::Wide);
        assert_eq!(infer_tile_size(6, true), TileSize::Large);
    }

    #[test]
    fn letters_map_to_codes() {
        for code in ViewCode::ALL {
            assert_eq!(ViewCode::from_letter(code.letter()), Some(code));
        }
        assert_eq!(ViewCode::from_letter('G'), Some(ViewCode::Grid));
        assert_eq!(ViewCode::from_letter('x'), None);
    }

    #[test]
    fn codes_round_trip_through_mode_and_size() {
        for code in ViewCode::ALL {
            assert_eq!(ViewCode::from_mode(code.view_mode(), code.tile_size()), Some(code));
        }
        assert_eq!(ViewCode::from_mode(ViewMode::Tile, None), None);
    }

    #[test]
    fn selection_capacity() {
        assert_eq!(SelectionMode::Single.capacity(), Some(1));
        assert_eq!(SelectionMode::None.capacity(), Some(0));
        assert_eq!(SelectionMode::Multi.capacity(), None);
    }
}
