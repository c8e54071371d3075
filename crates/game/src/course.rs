//! Parkour courses: collision geometry, spawn points and goals.

use glam::Vec3;
use parkour_physics::{CollisionWorld, ContentFlags};
use serde::{Deserialize, Serialize};

/// A course the character can run.
#[derive(Debug)]
pub struct Course {
    /// Course identifier.
    pub id: String,

    /// Collision world for physics and surface detection.
    pub collision: CollisionWorld,

    /// Where runs may start.
    pub spawn_points: Vec<SpawnPoint>,

    /// Goals to reach.
    pub goals: Vec<GoalPoint>,
}

/// A named start position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub name: String,

    /// Feet position in world space.
    pub position: Vec3,

    /// Initial facing direction (yaw in radians).
    pub facing: f32,
}

/// A sphere that reports once when the character enters it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalPoint {
    pub name: String,
    pub position: Vec3,
    pub radius: f32,

    /// Cleared once the goal has been reached.
    pub active: bool,
}

impl GoalPoint {
    pub fn new(name: &str, position: Vec3, radius: f32) -> Self {
        Self {
            name: name.to_string(),
            position,
            radius,
            active: true,
        }
    }
}

/// Distance between demo lanes along Z.
const LANE_SPACING: f32 = 600.0;

impl Course {
    /// Create an empty course.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
            goals: Vec::new(),
        }
    }

    /// Three parallel lanes, each run along +X from its spawn point:
    ///
    /// - `ledge`: an 80-unit wall to climb onto
    /// - `vault`: a 60-unit rail with open floor behind it
    /// - `blocked`: the same rail backed by a tall wall, so it can only be
    ///   jumped at
    /// - `ramp`: a walkable wedge; nothing to climb or vault
    pub fn demo() -> Self {
        let mut course = Self::new("demo");

        // Floor, top face at y = 0
        course.collision.add_box(
            Vec3::new(0.0, -50.0, 0.0),
            Vec3::new(5000.0, 50.0, 5000.0),
            ContentFlags::SOLID,
        );

        // Ledge lane: wall face at x = 100, top at 80
        let z = 0.0;
        course
            .collision
            .add_block(Vec3::new(300.0, 0.0, z), 200.0, 150.0, 80.0, ContentFlags::SOLID);
        course.spawn_points.push(SpawnPoint {
            name: "ledge".to_string(),
            position: Vec3::new(0.0, 0.0, z),
            facing: 0.0,
        });
        course
            .goals
            .push(GoalPoint::new("ledge top", Vec3::new(160.0, 80.0, z), 60.0));

        // Vault lane: thin rail with its face at x = 100
        let z = LANE_SPACING;
        course
            .collision
            .add_block(Vec3::new(105.0, 0.0, z), 5.0, 150.0, 60.0, ContentFlags::SOLID);
        course.spawn_points.push(SpawnPoint {
            name: "vault".to_string(),
            position: Vec3::new(55.0, 0.0, z),
            facing: 0.0,
        });
        course
            .goals
            .push(GoalPoint::new("past the rail", Vec3::new(240.0, 0.0, z), 60.0));

        // Blocked lane: same rail, tall wall where the landing would be
        let z = LANE_SPACING * 2.0;
        course
            .collision
            .add_block(Vec3::new(105.0, 0.0, z), 5.0, 150.0, 60.0, ContentFlags::SOLID);
        course
            .collision
            .add_block(Vec3::new(190.0, 0.0, z), 50.0, 150.0, 250.0, ContentFlags::SOLID);
        course.spawn_points.push(SpawnPoint {
            name: "blocked".to_string(),
            position: Vec3::new(55.0, 0.0, z),
            facing: 0.0,
        });

        // Ramp lane: rises 100 units over x = 100..400
        let z = -LANE_SPACING;
        let ramp = [
            Vec3::new(100.0, 0.0, z - 150.0),
            Vec3::new(100.0, 0.0, z + 150.0),
            Vec3::new(400.0, 0.0, z - 150.0),
            Vec3::new(400.0, 0.0, z + 150.0),
            Vec3::new(400.0, 100.0, z - 150.0),
            Vec3::new(400.0, 100.0, z + 150.0),
        ];
        if course.collision.add_convex_hull(&ramp, ContentFlags::SOLID).is_none() {
            log::warn!("demo ramp hull could not be built");
        }
        course.spawn_points.push(SpawnPoint {
            name: "ramp".to_string(),
            position: Vec3::new(0.0, 0.0, z),
            facing: 0.0,
        });

        course
    }

    /// Get a spawn point by name.
    pub fn spawn(&self, name: &str) -> Option<&SpawnPoint> {
        self.spawn_points.iter().find(|s| s.name == name)
    }

    /// Deactivate and return the names of goals whose sphere contains
    /// `position`.
    pub fn check_goals(&mut self, position: Vec3) -> Vec<String> {
        let mut reached = Vec::new();

        for goal in self.goals.iter_mut().filter(|g| g.active) {
            if position.distance_squared(goal.position) <= goal.radius * goal.radius {
                goal.active = false;
                reached.push(goal.name.clone());
            }
        }

        reached
    }

    /// Number of goals not yet reached.
    pub fn remaining_goals(&self) -> usize {
        self.goals.iter().filter(|g| g.active).count()
    }
}
