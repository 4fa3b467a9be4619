pub mod config;
pub mod error;
pub mod types;

pub use config::PlacementConfig;
pub use error::{RampartError, Result};
pub use types::{EntityHandle, Point2, Point3, SegmentId};
