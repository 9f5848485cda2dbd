//! Infrastructure: data paths, container measurement and the page bus.

pub mod bus;
pub mod measure;
pub mod paths;

pub use bus::{PageBus, PageEvent, Subscription};
pub use measure::{ContainerMeasure, ContainerSize, FixedMeasure};
pub use paths::{data_dir, default_log_path, default_store_path};
