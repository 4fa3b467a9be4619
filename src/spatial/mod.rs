//! Pure 2D geometry on the horizontal plane

pub mod segment;

pub use segment::{
    collinear_overlap, intersects_2d, point_segment_distance, shares_endpoint, SegmentTolerances,
};
