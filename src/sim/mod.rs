//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in from the caller (absolute clock + frame delta)
//! - Seeded RNG only
//! - Timed effects are countdown fields, never deferred callbacks
//! - No rendering or platform dependencies

pub mod actions;
pub mod collision;
pub mod skills;
pub mod state;
pub mod tick;
pub mod track;

pub use actions::{
    LaneDirection, accepts_input, apply_contact, apply_intent, can_change_lane, can_dash,
    can_jump, can_super_jump, on_collectible_contact, on_obstacle_contact, on_obstacle_passed,
    on_powerup_contact, request_dash, request_jump, request_lane_change, request_super_jump,
    toggle_pause,
};
pub use collision::{Aabb, player_box};
pub use skills::{Skill, SkillBook, SkillKind};
pub use state::{PowerupKind, RunEvent, RunState, RunStats};
pub use tick::{speed_at, tick};
pub use track::{Contact, ContactKind, ObjectKind, ObstacleShape, Track, TrackObject, Zone};
