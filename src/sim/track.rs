//! Seeded track spawner and contact detection
//!
//! Objects appear a fixed distance ahead of the player and slide toward it
//! at the run's current speed. The spawn sequence depends only on the seed
//! and the distance travelled, so a run can be replayed exactly.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, player_box};
use super::state::{PowerupKind, RunState};
use crate::consts::LANE_COUNT;
use crate::lane_to_x;
use crate::tuning::Tuning;

/// Object z beyond which an untouched obstacle counts as dodged
pub const PASS_Z: f32 = 2.0;
/// Object z beyond which objects are removed
pub const DESPAWN_Z: f32 = 10.0;

/// Track theme; each zone has its own obstacle set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    Sewer,
    Subway,
    Datastream,
}

impl Zone {
    const CYCLE: [Zone; 3] = [Zone::Sewer, Zone::Subway, Zone::Datastream];

    /// Zone for a distance along the track (cycles forever)
    pub fn for_distance(distance: f32, zone_length: f32) -> Zone {
        let index = (distance.max(0.0) / zone_length) as usize % Self::CYCLE.len();
        Self::CYCLE[index]
    }
}

/// Obstacle layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleShape {
    /// Knee-high wall in one lane (jump)
    LowWall { lane: u8 },
    /// Pipe across every lane (jump)
    Pipe,
    /// Bars in every lane but one (steer)
    Grate { gap_lane: u8 },
    /// Tall pillar in one lane (steer)
    Pillar { lane: u8 },
    /// Cable hanging across every lane (dash under)
    Cable,
    /// Low beam across every lane (jump)
    LaserNet,
    /// Walls in every lane but one (steer)
    Firewall { safe_lane: u8 },
}

impl ObstacleShape {
    /// Collision boxes relative to the object's z
    pub fn boxes(&self, lane_width: f32) -> Vec<Aabb> {
        let across = lane_width * LANE_COUNT as f32 / 2.0;
        match *self {
            ObstacleShape::LowWall { lane } => vec![Aabb::new(
                Vec3::new(lane_to_x(lane, lane_width), 0.5, 0.0),
                Vec3::new(lane_width / 2.0 - 0.25, 0.5, 1.0),
            )],
            ObstacleShape::Pipe => vec![Aabb::new(
                Vec3::new(0.0, 0.5, 0.0),
                Vec3::new(across, 0.5, 0.5),
            )],
            ObstacleShape::Grate { gap_lane } => {
                Self::walls_except(gap_lane, lane_width, Vec3::new(lane_width / 2.0, 4.0, 0.25))
            }
            ObstacleShape::Pillar { lane } => vec![Aabb::new(
                Vec3::new(lane_to_x(lane, lane_width), 4.0, 0.0),
                Vec3::new(0.8, 4.0, 0.8),
            )],
            ObstacleShape::Cable => vec![Aabb::new(
                Vec3::new(0.0, 1.2, 0.0),
                Vec3::new(across, 0.3, 0.2),
            )],
            ObstacleShape::LaserNet => vec![Aabb::new(
                Vec3::new(0.0, 0.6, 0.0),
                Vec3::new(across, 0.15, 0.1),
            )],
            ObstacleShape::Firewall { safe_lane } => {
                Self::walls_except(safe_lane, lane_width, Vec3::new(lane_width / 2.0, 4.0, 0.5))
            }
        }
    }

    fn walls_except(open_lane: u8, lane_width: f32, half_extents: Vec3) -> Vec<Aabb> {
        (0..LANE_COUNT)
            .filter(|lane| *lane != open_lane)
            .map(|lane| {
                Aabb::new(
                    Vec3::new(lane_to_x(lane, lane_width), half_extents.y, 0.0),
                    half_extents,
                )
            })
            .collect()
    }
}

/// What a track object is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Obstacle(ObstacleShape),
    Powerup { kind: PowerupKind, lane: u8 },
    Collectible { lane: u8 },
}

/// A spawned object on the track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub zone: Zone,
    /// Position along the track; the player sits at z = 0, objects approach from negative z
    pub z: f32,
    /// Local boxes (z relative to `z`)
    pub boxes: Vec<Aabb>,
    /// Already reported a contact (or a pass); never reports again
    pub resolved: bool,
}

impl TrackObject {
    pub fn world_boxes(&self) -> impl Iterator<Item = Aabb> + '_ {
        let offset = Vec3::new(0.0, 0.0, self.z);
        self.boxes.iter().map(move |b| b.translated(offset))
    }

    /// World boxes stretched back over the last `step` units of travel
    pub fn swept_boxes(&self, step: f32) -> impl Iterator<Item = Aabb> + '_ {
        self.world_boxes().map(move |b| b.swept_z(step))
    }

    /// Hidden objects are collected pickups (renderer stops drawing them)
    pub fn is_visible(&self) -> bool {
        !(self.resolved && !matches!(self.kind, ObjectKind::Obstacle(_)))
    }
}

/// Category of a contact notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    Obstacle,
    Powerup(PowerupKind),
    Collectible,
    /// An obstacle passed the player untouched
    ObstaclePassed,
}

/// Contact notification delivered to the run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub kind: ContactKind,
    pub object_id: u32,
}

/// Spawner plus the live objects of one run
#[derive(Debug, Clone)]
pub struct Track {
    rng: Pcg32,
    pub seed: u64,
    pub objects: Vec<TrackObject>,
    /// Distance travelled by the track
    pub travelled: f32,
    /// Distance at which the next object spawns
    next_spawn: f32,
    next_id: u32,
}

impl Track {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            objects: Vec::new(),
            travelled: 0.0,
            next_spawn: 0.0,
            next_id: 1,
        }
    }

    /// Zone the player is currently running through
    pub fn current_zone(&self, tuning: &Tuning) -> Zone {
        Zone::for_distance(self.travelled, tuning.zone_length)
    }

    /// Move objects toward the player, spawn new ones and report contacts
    ///
    /// Does nothing for a paused or finished run.
    pub fn advance(&mut self, state: &RunState, dt: f32, tuning: &Tuning) -> Vec<Contact> {
        if !state.is_playing || state.is_paused {
            return Vec::new();
        }

        let step = state.speed * dt.max(0.0);
        for object in &mut self.objects {
            object.z += step;
        }
        self.travelled += step;

        while self.travelled >= self.next_spawn {
            let overshoot = self.travelled - self.next_spawn;
            let zone = Zone::for_distance(self.next_spawn, tuning.zone_length);
            self.spawn(zone, -tuning.spawn_distance + overshoot, tuning);
            self.next_spawn += tuning.spawn_spacing;
        }

        let contacts = self.detect_contacts(state, step, tuning);
        self.objects.retain(|o| o.z <= DESPAWN_Z);
        contacts
    }

    /// Objects moved `step` this frame; test the whole span so thin
    /// obstacles cannot skip over the player on a long frame
    fn detect_contacts(&mut self, state: &RunState, step: f32, tuning: &Tuning) -> Vec<Contact> {
        let player = player_box(state, tuning);
        let mut contacts = Vec::new();

        for object in self.objects.iter_mut().filter(|o| !o.resolved) {
            let touching = object.swept_boxes(step).any(|b| b.intersects(&player));
            let kind = if touching {
                Some(match object.kind {
                    ObjectKind::Obstacle(_) => ContactKind::Obstacle,
                    ObjectKind::Powerup { kind, .. } => ContactKind::Powerup(kind),
                    ObjectKind::Collectible { .. } => ContactKind::Collectible,
                })
            } else if object.z > PASS_Z {
                match object.kind {
                    ObjectKind::Obstacle(_) => Some(ContactKind::ObstaclePassed),
                    _ => {
                        object.resolved = true;
                        None
                    }
                }
            } else {
                None
            };

            if let Some(kind) = kind {
                object.resolved = true;
                contacts.push(Contact {
                    kind,
                    object_id: object.id,
                });
            }
        }
        contacts
    }

    fn spawn(&mut self, zone: Zone, z: f32, tuning: &Tuning) {
        let kind = self.roll_kind(zone, tuning);
        let boxes = match kind {
            ObjectKind::Obstacle(shape) => shape.boxes(tuning.lane_width),
            ObjectKind::Powerup { lane, .. } => vec![Aabb::new(
                Vec3::new(lane_to_x(lane, tuning.lane_width), 0.5, 0.0),
                Vec3::splat(0.5),
            )],
            ObjectKind::Collectible { lane } => vec![Aabb::new(
                Vec3::new(lane_to_x(lane, tuning.lane_width), 0.5, 0.0),
                Vec3::splat(0.4),
            )],
        };
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(TrackObject {
            id,
            kind,
            zone,
            z,
            boxes,
            resolved: false,
        });
    }

    fn roll_kind(&mut self, zone: Zone, tuning: &Tuning) -> ObjectKind {
        let obstacle = u64::from(tuning.obstacle_weight);
        let powerup = u64::from(tuning.powerup_weight);
        let roll = self.rng.random_range(0..tuning.total_spawn_weight().max(1));
        if roll < obstacle {
            ObjectKind::Obstacle(self.roll_obstacle(zone))
        } else if roll < obstacle + powerup {
            let kind = PowerupKind::ALL[self.rng.random_range(0..PowerupKind::ALL.len())];
            ObjectKind::Powerup {
                kind,
                lane: self.roll_lane(),
            }
        } else {
            ObjectKind::Collectible {
                lane: self.roll_lane(),
            }
        }
    }

    fn roll_obstacle(&mut self, zone: Zone) -> ObstacleShape {
        let roll: f32 = self.rng.random();
        match zone {
            Zone::Sewer if roll < 0.4 => ObstacleShape::LowWall {
                lane: self.roll_lane(),
            },
            Zone::Sewer if roll < 0.7 => ObstacleShape::Pipe,
            Zone::Sewer => ObstacleShape::Grate {
                gap_lane: self.roll_lane(),
            },
            Zone::Subway if roll < 0.5 => ObstacleShape::Pillar {
                lane: self.roll_lane(),
            },
            Zone::Subway => ObstacleShape::Cable,
            Zone::Datastream if roll < 0.5 => ObstacleShape::LaserNet,
            Zone::Datastream => ObstacleShape::Firewall {
                safe_lane: self.roll_lane(),
            },
        }
    }

    fn roll_lane(&mut self) -> u8 {
        self.rng.random_range(0..LANE_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_FRAME_DELTA;

    fn object(kind: ObjectKind, z: f32, tuning: &Tuning) -> TrackObject {
        let boxes = match kind {
            ObjectKind::Obstacle(shape) => shape.boxes(tuning.lane_width),
            ObjectKind::Powerup { lane, .. } | ObjectKind::Collectible { lane } => vec![Aabb::new(
                Vec3::new(lane_to_x(lane, tuning.lane_width), 0.5, 0.0),
                Vec3::splat(0.5),
            )],
        };
        TrackObject {
            id: 99,
            kind,
            zone: Zone::Sewer,
            z,
            boxes,
            resolved: false,
        }
    }

    /// Track with spawning pushed far away so only hand-placed objects exist
    fn quiet_track() -> Track {
        let mut track = Track::new(1);
        track.next_spawn = f32::MAX;
        track
    }

    #[test]
    fn same_seed_same_sequence() {
        let tuning = Tuning::default();
        let state = RunState::new(0.0, &tuning);
        let mut a = Track::new(42);
        let mut b = Track::new(42);
        for _ in 0..600 {
            a.advance(&state, 1.0 / 60.0, &tuning);
            b.advance(&state, 1.0 / 60.0, &tuning);
        }
        let kinds = |t: &Track| t.objects.iter().map(|o| (o.id, o.kind)).collect::<Vec<_>>();
        assert!(!a.objects.is_empty());
        assert_eq!(kinds(&a), kinds(&b));
    }

    #[test]
    fn zones_cycle_with_distance() {
        assert_eq!(Zone::for_distance(0.0, 600.0), Zone::Sewer);
        assert_eq!(Zone::for_distance(650.0, 600.0), Zone::Subway);
        assert_eq!(Zone::for_distance(1300.0, 600.0), Zone::Datastream);
        assert_eq!(Zone::for_distance(1900.0, 600.0), Zone::Sewer);
    }

    #[test]
    fn spawns_follow_spacing() {
        let tuning = Tuning::default();
        let state = RunState::new(0.0, &tuning);
        let mut track = Track::new(7);
        // 7 units/s for 10 s = 70 units -> spawns at 0, 18, 36, 54
        for _ in 0..100 {
            track.advance(&state, 0.1, &tuning);
        }
        assert_eq!(track.next_id, 5);
    }

    #[test]
    fn obstacle_in_lane_reports_one_contact() {
        let tuning = Tuning::default();
        let state = RunState::new(0.0, &tuning);
        let mut track = quiet_track();
        track
            .objects
            .push(object(ObjectKind::Obstacle(ObstacleShape::LowWall { lane: 1 }), -0.5, &tuning));

        let contacts = track.advance(&state, 0.01, &tuning);
        assert_eq!(
            contacts,
            vec![Contact {
                kind: ContactKind::Obstacle,
                object_id: 99
            }]
        );
        assert!(track.advance(&state, 0.01, &tuning).is_empty());
    }

    #[test]
    fn obstacle_in_other_lane_is_dodged() {
        let tuning = Tuning::default();
        let state = RunState::new(0.0, &tuning);
        let mut track = quiet_track();
        track
            .objects
            .push(object(ObjectKind::Obstacle(ObstacleShape::Pillar { lane: 0 }), -1.0, &tuning));

        let mut contacts = Vec::new();
        for _ in 0..60 {
            contacts.extend(track.advance(&state, 1.0 / 60.0, &tuning));
        }
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].kind, ContactKind::ObstaclePassed);
    }

    #[test]
    fn long_frames_at_top_speed_still_hit_every_shape() {
        let tuning = Tuning::default();
        let mut state = RunState::new(0.0, &tuning);
        state.speed = tuning.max_speed;
        // player stays in the center lane, every shape blocks it
        let shapes = [
            ObstacleShape::LowWall { lane: 1 },
            ObstacleShape::Pipe,
            ObstacleShape::Grate { gap_lane: 0 },
            ObstacleShape::Pillar { lane: 1 },
            ObstacleShape::Cable,
            ObstacleShape::LaserNet,
            ObstacleShape::Firewall { safe_lane: 2 },
        ];

        for shape in shapes {
            let mut track = quiet_track();
            track
                .objects
                .push(object(ObjectKind::Obstacle(shape), -1.5, &tuning));

            let mut contacts = Vec::new();
            for _ in 0..3 {
                contacts.extend(track.advance(&state, MAX_FRAME_DELTA, &tuning));
            }
            assert_eq!(
                contacts,
                vec![Contact {
                    kind: ContactKind::Obstacle,
                    object_id: 99
                }],
                "{shape:?}"
            );
        }
    }

    #[test]
    fn long_frames_do_not_hit_other_lanes() {
        let tuning = Tuning::default();
        let mut state = RunState::new(0.0, &tuning);
        state.speed = tuning.max_speed;
        let mut track = quiet_track();
        track
            .objects
            .push(object(ObjectKind::Obstacle(ObstacleShape::Pillar { lane: 2 }), -1.5, &tuning));

        let mut contacts = Vec::new();
        for _ in 0..3 {
            contacts.extend(track.advance(&state, MAX_FRAME_DELTA, &tuning));
        }
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].kind, ContactKind::ObstaclePassed);
    }

    #[test]
    fn dash_slides_under_cable() {
        let tuning = Tuning::default();
        let mut state = RunState::new(0.0, &tuning);
        let standing = player_box(&state, &tuning);
        let boxes = ObstacleShape::Cable.boxes(tuning.lane_width);
        assert!(boxes[0].intersects(&standing));

        state.is_dashing = true;
        assert!(!boxes[0].intersects(&player_box(&state, &tuning)));
    }

    #[test]
    fn jump_clears_low_wall_at_apex() {
        let tuning = Tuning::default();
        let mut state = RunState::new(0.0, &tuning);
        let wall = ObstacleShape::LowWall { lane: 1 }.boxes(tuning.lane_width);
        state.vertical_position = 2.0;
        assert!(!wall[0].intersects(&player_box(&state, &tuning)));
    }

    #[test]
    fn collected_pickups_become_invisible() {
        let tuning = Tuning::default();
        let state = RunState::new(0.0, &tuning);
        let mut track = quiet_track();
        track.objects.push(object(
            ObjectKind::Powerup {
                kind: PowerupKind::Shield,
                lane: 1,
            },
            -0.2,
            &tuning,
        ));
        let contacts = track.advance(&state, 0.01, &tuning);
        assert_eq!(contacts[0].kind, ContactKind::Powerup(PowerupKind::Shield));
        assert!(!track.objects[0].is_visible());
    }

    #[test]
    fn finished_run_freezes_track() {
        let tuning = Tuning::default();
        let mut state = RunState::new(0.0, &tuning);
        state.is_playing = false;
        let mut track = Track::new(3);
        assert!(track.advance(&state, 1.0, &tuning).is_empty());
        assert!(track.objects.is_empty());
    }
}
