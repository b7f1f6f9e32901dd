//! Axis-aligned bounding boxes for player/object contact

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::RunState;
use crate::lane_to_x;
use crate::tuning::Tuning;

/// Player half-extents while running upright
pub const PLAYER_HALF_EXTENTS: Vec3 = Vec3::new(0.4, 0.5, 0.4);
/// Player half-height while dashing (low slide)
pub const PLAYER_DASH_HALF_HEIGHT: f32 = 0.25;

/// Axis-aligned box given by center and half-extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Strict overlap; touching faces do not count
    pub fn intersects(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        d.cmplt(reach).all()
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self::new(self.center + offset, self.half_extents)
    }

    /// Box covering every position from `distance` behind (-z) to here
    pub fn swept_z(&self, distance: f32) -> Self {
        let back = distance.max(0.0) / 2.0;
        Self::new(
            self.center - Vec3::new(0.0, 0.0, back),
            self.half_extents + Vec3::new(0.0, 0.0, back),
        )
    }
}

/// Player bounding box at z = 0
///
/// A dash drops the box to the floor so the player slides under hanging
/// obstacles.
pub fn player_box(state: &RunState, tuning: &Tuning) -> Aabb {
    let x = lane_to_x(state.lane, tuning.lane_width);
    if state.is_dashing {
        let bottom = state.vertical_position - PLAYER_HALF_EXTENTS.y;
        Aabb::new(
            Vec3::new(x, bottom + PLAYER_DASH_HALF_HEIGHT, 0.0),
            Vec3::new(PLAYER_HALF_EXTENTS.x, PLAYER_DASH_HALF_HEIGHT, PLAYER_HALF_EXTENTS.z),
        )
    } else {
        Aabb::new(Vec3::new(x, state.vertical_position, 0.0), PLAYER_HALF_EXTENTS)
    }
}
