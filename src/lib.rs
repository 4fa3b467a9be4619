//! Rampart - pole-to-pole wall placement for RTS building tools

pub mod core;
pub mod economy;
pub mod spatial;
pub mod walls;
pub mod world;
