//! The world around the wall tool: obstacles, fog of war, and the queries
//! placement asks of them

pub mod fog;
pub mod obstacles;
pub mod query;

pub use fog::{CellVisibility, FogMap};
pub use obstacles::{BuildingFootprints, Footprint};
pub use query::{NoObstacles, ObstacleQuery, VisibilityQuery};
