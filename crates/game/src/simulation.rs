//! Game simulation - the fixed-step loop.
//!
//! The simulation is deterministic: the same config, course and input
//! sequence always produce the same character trajectory.

use parkour_physics::debug::{DebugPrimitive, DebugRecorder};

use crate::camera::FirstPersonCamera;
use crate::character::{JumpOutcome, ParkourCharacter};
use crate::config::GameConfig;
use crate::course::Course;
use crate::input::PlayerInput;

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    /// Outcome of a jump press, if the jump button went down this tick.
    pub jump: Option<JumpOutcome>,

    /// Goals reached this tick.
    pub goals: Vec<String>,
}

/// The main game simulation.
#[derive(Debug)]
pub struct Simulation {
    /// Current frame/tick number.
    pub frame: u64,

    /// Simulation configuration.
    pub config: GameConfig,

    /// Current course.
    pub course: Course,

    /// The player's character.
    pub character: ParkourCharacter,

    /// Camera following the character's eye.
    pub camera: FirstPersonCamera,

    /// Debug primitives recorded since the last drain.
    debug: DebugRecorder,

    /// Real time not yet consumed by fixed ticks.
    accumulator: f32,
}

impl Simulation {
    /// Create a simulation with the character at the course's first spawn
    /// point.
    pub fn new(config: GameConfig, course: Course) -> Self {
        let character = ParkourCharacter::new("player", config.movement.clone(), &config.parkour);

        let mut sim = Self {
            frame: 0,
            config,
            course,
            character,
            camera: FirstPersonCamera::default(),
            debug: DebugRecorder::new(),
            accumulator: 0.0,
        };

        if let Some(name) = sim.course.spawn_points.first().map(|s| s.name.clone()) {
            sim.respawn(&name);
        } else {
            log::warn!("course {} has no spawn points", sim.course.id);
        }
        sim
    }

    /// Create a simulation with default configuration on the demo course.
    pub fn demo() -> Self {
        Self::new(GameConfig::default(), Course::demo())
    }

    /// Move the character to a named spawn point.
    ///
    /// Returns false if the course has no such spawn.
    pub fn respawn(&mut self, spawn_name: &str) -> bool {
        let Some(spawn) = self.course.spawn(spawn_name) else {
            log::warn!("no spawn point named {:?} on {}", spawn_name, self.course.id);
            return false;
        };

        self.character
            .spawn(spawn.position, spawn.facing, &self.course.collision);
        let eye_height = self.character.eye_height();
        self.camera
            .update_from_character(&mut self.character.movement, eye_height);
        log::info!("{} spawned at {:?}", self.character.name, self.character.position());
        true
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self, input: &PlayerInput) -> TickEvents {
        let delta_time = self.config.delta_time();
        let command = input.to_command(self.config.mouse_sensitivity);

        let jump = self
            .character
            .tick_traced(&command, &self.course.collision, delta_time, &mut self.debug);

        let eye_height = self.character.eye_height();
        self.camera
            .update_from_character(&mut self.character.movement, eye_height);

        let goals = self.course.check_goals(self.character.position());
        for goal in &goals {
            log::info!("frame {}: reached goal {:?}", self.frame, goal);
        }

        self.frame += 1;
        TickEvents { jump, goals }
    }

    /// Run as many fixed ticks as `elapsed` seconds of real time allow,
    /// carrying the remainder to the next call.
    ///
    /// Returns the events of every tick that ran.
    pub fn advance(&mut self, elapsed: f32, input: &PlayerInput) -> Vec<TickEvents> {
        let step = self.config.delta_time();
        self.accumulator += elapsed.max(0.0);

        let mut input = input.clone();
        let mut events = Vec::new();
        while self.accumulator >= step {
            self.accumulator -= step;
            events.push(self.tick(&input));
            // Mouse movement belongs to the first tick of the frame only
            input.mouse_delta = (0.0, 0.0);
        }
        events
    }

    /// Take the debug primitives recorded so far.
    pub fn drain_debug(&mut self) -> Vec<DebugPrimitive> {
        self.debug.drain()
    }

    /// Get the delta time for this simulation.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }
}

// ============================================================================
// Tests
// ============================================================================
