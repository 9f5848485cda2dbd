//! Container measurement capability.
//!
//! The coordinator never discovers geometry on its own. The host passes a
//! [`ContainerMeasure`] at initialization and the coordinator samples it on every
//! resize notification.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

/// Width and height of the widget container in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Measures the host container.
pub trait ContainerMeasure {
    fn measure(&self) -> ContainerSize;
}

/// Shared, host-updatable size.
///
/// Clones share the same cell, so a host keeps one clone and updates it while
/// the coordinator holds another.
///
/// ```
/// use collection_viewer::infrastructure::{ContainerMeasure, ContainerSize, FixedMeasure};
///
/// let host_side = FixedMeasure::new(ContainerSize::new(800.0, 600.0));
/// let coordinator_side = host_side.clone();
/// host_side.set_width(320.0);
/// assert_eq!(coordinator_side.measure().width, 320.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedMeasure(Rc<Cell<ContainerSize>>);

impl FixedMeasure {
    #[must_use]
    pub fn new(size: ContainerSize) -> Self {
        Self(Rc::new(Cell::new(size)))
    }

    pub fn set(&self, size: ContainerSize) {
        self.0.set(size);
    }

    /// Changes only the width.
    pub fn set_width(&self, width: f64) {
        let size = self.0.get();
        self.0.set(ContainerSize { width, ..size });
    }
}

impl ContainerMeasure for FixedMeasure {
    fn measure(&self) -> ContainerSize {
        self.0.get()
    }
}
