//! Handing committed walls to the host for instantiation

use glam::Vec3;
use serde::Serialize;

use super::segment::Pose;
use crate::core::types::EntityHandle;

/// Whatever turns a pose and scale into a wall in the world
pub trait WallSpawner {
    fn spawn_segment(&mut self, pose: Pose, scale: Vec3) -> EntityHandle;
}

/// One spawn the host was asked to perform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpawnRequest {
    pub handle: EntityHandle,
    pub pose: Pose,
    pub scale: Vec3,
}

/// Spawner that only records what it was asked to spawn
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpawnLog {
    pub requests: Vec<SpawnRequest>,
}

impl SpawnLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl WallSpawner for SpawnLog {
    fn spawn_segment(&mut self, pose: Pose, scale: Vec3) -> EntityHandle {
        let handle = EntityHandle::new();
        self.requests.push(SpawnRequest {
            handle,
            pose,
            scale,
        });
        handle
    }
}
