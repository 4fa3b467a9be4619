//! Pole-to-pole wall placement
//!
//! The pipeline for one span is: measure the wall unit (`sizer`), split the
//! span into units (`planner`), check the span against walls, buildings,
//! fog of war and the economy (`validator`), then pay and spawn
//! (`session`).

pub mod catalog;
pub mod planner;
pub mod segment;
pub mod session;
pub mod sizer;
pub mod snap;
pub mod spawn;
pub mod validator;

pub use catalog::{WallCatalog, WallDef, WallUnitSpec};
pub use planner::{PlannedSegment, SegmentPlan, WallSegmentPlanner};
pub use segment::{look_rotation, PlacedSegment, Pose};
pub use session::{PlacementOutcome, PlacementSession, Preview};
pub use sizer::{WallLengthAxis, WallMeshSizer};
pub use snap::{try_snap_to_nearby_wall, SnapAnchor, SnapTarget};
pub use spawn::{SpawnLog, SpawnRequest, WallSpawner};
pub use validator::{
    FailureReason, PlacementContext, PlacementValidator, PreviewState, ValidationReport,
};
