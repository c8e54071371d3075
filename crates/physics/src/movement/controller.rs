//! Player movement controller.
//!
//! Standard walking and falling physics. Custom movement modes (climb,
//! vault) are driven by [`crate::parkour::TraversalMover`], which hands
//! control back here once a maneuver finishes.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;

use crate::collision::{ContentFlags, QueryFilter, TraceShape, WorldQuery};

use super::config::MovementConfig;
use super::slide_move::{clip_velocity, step_slide_move};
use super::state::{MovementMode, MovementState, PlayerCommand};

/// Player movement controller.
///
/// Handles ground and air movement, jumping, friction and acceleration,
/// and collision response.
///
/// # Example
///
/// ```ignore
/// let controller = PlayerController::new(MovementConfig::default());
/// let mut state = MovementState::new(spawn_position);
///
/// // Each tick:
/// controller.update(&mut state, &command, &world, delta_time);
/// ```
#[derive(Debug, Clone)]
pub struct PlayerController {
    /// Movement configuration.
    pub config: MovementConfig,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}

impl PlayerController {
    /// Create a new player controller with the given configuration.
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    /// The standing capsule for this configuration.
    pub fn shape(&self) -> TraceShape {
        TraceShape::Capsule {
            radius: self.config.player_radius,
            height: self.config.standing_height,
        }
    }

    /// Query filter for the character's own movement.
    pub fn filter(&self, state: &MovementState) -> QueryFilter {
        QueryFilter::new(ContentFlags::MASK_PLAYER_SOLID).ignoring(state.body)
    }

    /// Place a character at a spawn point, snapping down onto the ground.
    pub fn spawn_at<W: WorldQuery + ?Sized>(&self, state: &mut MovementState, spawn_pos: Vec3, world: &W) {
        let trace = world.sweep(
            spawn_pos + Vec3::Y,
            spawn_pos - Vec3::Y * self.config.ground_probe_distance,
            self.shape(),
            &self.filter(state),
        );

        state.velocity = Vec3::ZERO;
        state.collision_enabled = true;

        if trace.hit_something() && !trace.started_in_solid {
            state.position = trace.end_position;
            state.mode = MovementMode::Walking;
            state.ground_normal = trace.normal_or_up();
        } else {
            state.position = spawn_pos;
            state.mode = MovementMode::Falling;
            state.ground_normal = Vec3::Y;
        }

        log::debug!("spawned at {:?} in {:?}", state.position, state.mode);
    }

    /// Update movement for one tick.
    ///
    /// Only meaningful in [`MovementMode::Walking`] and
    /// [`MovementMode::Falling`]; custom modes are left untouched.
    pub fn update<W: WorldQuery + ?Sized>(
        &self,
        state: &mut MovementState,
        command: &PlayerCommand,
        world: &W,
        delta_time: f32,
    ) {
        if state.mode.is_custom() {
            return;
        }

        // Clamp delta time to prevent physics explosions
        let delta_time = delta_time.min(self.config.max_delta_time);

        self.update_view_angles(state, command);
        self.check_ground(state, world);
        self.update_timers(state, delta_time);

        if state.on_ground() {
            self.ground_move(state, command, world, delta_time);
        } else {
            self.air_move(state, command, world, delta_time);
        }

        self.check_ground(state, world);
    }

    /// Start a normal jump if standing on the ground and off cooldown.
    ///
    /// Returns whether the jump happened.
    pub fn jump(&self, state: &mut MovementState) -> bool {
        if !state.on_ground() || state.jump_cooldown_ms > 0 {
            return false;
        }

        state.velocity.y = self.config.jump_velocity;
        state.mode = MovementMode::Falling;
        state.ground_normal = Vec3::Y;
        state.jump_cooldown_ms = self.config.jump_cooldown_ms;
        log::trace!("jump from {:?}", state.position);
        true
    }

    /// Apply an explicit velocity impulse and go airborne.
    ///
    /// The ground check is skipped for `launch_grace_ms`, so a launch with
    /// no upward component isn't snapped back down and slowed by friction.
    pub fn launch(&self, state: &mut MovementState, velocity: Vec3) {
        state.velocity = velocity;
        state.mode = MovementMode::Falling;
        state.ground_normal = Vec3::Y;
        state.launch_grace_ms = self.config.launch_grace_ms;
        log::debug!("launched with {:?}", velocity);
    }

    // ========================================================================
    // View Angles
    // ========================================================================

    fn update_view_angles(&self, state: &mut MovementState, command: &PlayerCommand) {
        state.view_angles.x += command.view_delta.0;
        state.view_angles.y += command.view_delta.1;

        const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
        state.view_angles.x = state.view_angles.x.clamp(-PITCH_LIMIT, PITCH_LIMIT);

        // Normalize yaw to -PI..PI
        if state.view_angles.y > PI || state.view_angles.y < -PI {
            state.view_angles.y = (state.view_angles.y + PI).rem_euclid(TAU) - PI;
        }
    }

    // ========================================================================
    // Ground Detection
    // ========================================================================

    fn check_ground<W: WorldQuery + ?Sized>(&self, state: &mut MovementState, world: &W) {
        if state.launch_grace_ms > 0 {
            state.mode = MovementMode::Falling;
            state.ground_normal = Vec3::Y;
            return;
        }

        let trace = world.sweep(
            state.position,
            state.position - Vec3::Y * self.config.ground_probe_distance,
            self.shape(),
            &self.filter(state),
        );

        let walkable = trace.hit_something()
            && trace
                .hit_normal
                .is_some_and(|normal| normal.y >= self.config.min_ground_normal);

        // Moving upward (just jumped) never counts as grounded
        if walkable && state.velocity.y <= 0.1 {
            if state.mode == MovementMode::Falling {
                log::trace!("landed at {:?}", trace.end_position);
            }
            state.mode = MovementMode::Walking;
            state.ground_normal = trace.normal_or_up();
            state.position = trace.end_position;
            if state.velocity.y < 0.0 {
                state.velocity.y = 0.0;
            }
            return;
        }

        state.mode = MovementMode::Falling;
        state.ground_normal = Vec3::Y;
    }

    // ========================================================================
    // Timers
    // ========================================================================

    fn update_timers(&self, state: &mut MovementState, delta_time: f32) {
        let decrease_ms = (delta_time * 1000.0) as u32;
        state.jump_cooldown_ms = state.jump_cooldown_ms.saturating_sub(decrease_ms);
        state.launch_grace_ms = state.launch_grace_ms.saturating_sub(decrease_ms);
    }

    // ========================================================================
    // Ground Movement
    // ========================================================================

    fn ground_move<W: WorldQuery + ?Sized>(
        &self,
        state: &mut MovementState,
        command: &PlayerCommand,
        world: &W,
        delta_time: f32,
    ) {
        if command.wants_jump() && self.jump(state) {
            self.air_move(state, command, world, delta_time);
            return;
        }

        self.apply_friction(state, delta_time);

        let (wish_direction, wish_speed) = self.wish_velocity(state, command);
        self.accelerate(
            state,
            wish_direction,
            wish_speed,
            self.config.ground_acceleration,
            delta_time,
        );

        // Clip velocity to ground plane for smooth slope movement
        state.velocity = clip_velocity(state.velocity, state.ground_normal, self.config.overbounce);

        if state.velocity.length_squared() < 0.001 {
            state.velocity = Vec3::ZERO;
            return;
        }

        step_slide_move(
            world,
            &self.filter(state),
            &mut state.position,
            &mut state.velocity,
            self.shape(),
            delta_time,
            &self.config,
        );
    }

    fn apply_friction(&self, state: &mut MovementState, delta_time: f32) {
        let speed = state.velocity.length();

        if speed < 0.1 {
            state.velocity.x = 0.0;
            state.velocity.z = 0.0;
            return;
        }

        let control = speed.max(self.config.stop_speed);
        let drop = control * self.config.friction * delta_time;

        let new_speed = (speed - drop).max(0.0);
        state.velocity *= new_speed / speed;
    }

    // ========================================================================
    // Air Movement
    // ========================================================================

    fn air_move<W: WorldQuery + ?Sized>(
        &self,
        state: &mut MovementState,
        command: &PlayerCommand,
        world: &W,
        delta_time: f32,
    ) {
        state.velocity.y -= self.config.gravity * delta_time;

        let (wish_direction, wish_speed) = self.wish_velocity(state, command);
        self.accelerate(
            state,
            wish_direction,
            wish_speed * self.config.air_control,
            self.config.air_acceleration,
            delta_time,
        );

        step_slide_move(
            world,
            &self.filter(state),
            &mut state.position,
            &mut state.velocity,
            self.shape(),
            delta_time,
            &self.config,
        );
    }

    // ========================================================================
    // Shared Movement Helpers
    // ========================================================================

    fn wish_velocity(&self, state: &MovementState, command: &PlayerCommand) -> (Vec3, f32) {
        let wish = state.forward_direction() * command.forward_move
            + state.right_direction() * command.right_move;

        let speed_squared = wish.length_squared();
        if speed_squared < 0.0001 {
            return (Vec3::ZERO, 0.0);
        }

        let max_speed = self.config.max_speed(command.wants_sprint());

        // Scale speed by input magnitude (for analog sticks)
        let input_magnitude = command.forward_move.abs().max(command.right_move.abs()).min(1.0);

        (wish / speed_squared.sqrt(), max_speed * input_magnitude)
    }

    fn accelerate(
        &self,
        state: &mut MovementState,
        wish_direction: Vec3,
        wish_speed: f32,
        acceleration: f32,
        delta_time: f32,
    ) {
        if wish_direction.length_squared() < 0.0001 {
            return;
        }

        let add_speed = wish_speed - state.velocity.dot(wish_direction);
        if add_speed <= 0.0 {
            return;
        }

        let accel_speed = (acceleration * delta_time * wish_speed).min(add_speed);
        state.velocity += wish_direction * accel_speed;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::CollisionWorld;
    use crate::movement::state::{CommandButtons, CustomMode};

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor with its top at y=0
        world.add_box(
            Vec3::new(0.0, -50.0, 0.0),
            Vec3::new(5000.0, 50.0, 5000.0),
            ContentFlags::SOLID,
        );

        world
    }

    fn grounded(world: &CollisionWorld, controller: &PlayerController) -> MovementState {
        let mut state = MovementState::default();
        controller.spawn_at(&mut state, Vec3::ZERO, world);
        state
    }

    #[test]
    fn test_gravity() {
        let world = CollisionWorld::new();
        let controller = PlayerController::default();

        let mut state = MovementState::new(Vec3::new(0.0, 1000.0, 0.0));
        controller.update(&mut state, &PlayerCommand::default(), &world, 0.1);

        assert!(state.velocity.y < 0.0, "Should be falling");
        assert!(state.position.y < 1000.0);
        assert_eq!(state.mode, MovementMode::Falling);
    }

    #[test]
    fn test_ground_detection() {
        let world = create_test_world();
        let controller = PlayerController::default();

        let mut state = MovementState::new(Vec3::new(0.0, 5.0, 0.0));
        controller.update(&mut state, &PlayerCommand::default(), &world, 0.016);

        assert!(state.on_ground(), "Should be on ground");
        assert!(state.position.y.abs() < 0.5, "Should snap to the floor, y={}", state.position.y);
    }

    #[test]
    fn test_forward_movement() {
        let world = create_test_world();
        let controller = PlayerController::default();
        let mut state = grounded(&world, &controller);

        let command = PlayerCommand {
            forward_move: 1.0,
            ..Default::default()
        };

        for _ in 0..30 {
            controller.update(&mut state, &command, &world, 0.033);
        }

        assert!(state.position.x > 100.0, "Should have moved forward, x={}", state.position.x);
        assert!(state.position.z.abs() < 1.0);
        assert!(state.horizontal_speed() <= controller.config.walk_speed + 1.0);
    }

    #[test]
    fn test_jump_button() {
        let world = create_test_world();
        let controller = PlayerController::default();
        let mut state = grounded(&world, &controller);
        assert!(state.on_ground(), "Should start on ground");

        let mut command = PlayerCommand::default();
        command.buttons.press(CommandButtons::JUMP);
        controller.update(&mut state, &command, &world, 0.016);

        assert!(state.velocity.y > 0.0, "Should have upward velocity, got {}", state.velocity.y);
        assert_eq!(state.mode, MovementMode::Falling);
        assert!(state.jump_cooldown_ms > 0);
    }

    #[test]
    fn test_jump_requires_ground_and_cooldown() {
        let controller = PlayerController::default();

        let mut airborne = MovementState::new(Vec3::new(0.0, 500.0, 0.0));
        assert!(!controller.jump(&mut airborne));

        let mut cooling = MovementState::default();
        cooling.mode = MovementMode::Walking;
        cooling.jump_cooldown_ms = 50;
        assert!(!controller.jump(&mut cooling));
    }

    #[test]
    fn test_launch_enters_falling() {
        let controller = PlayerController::default();
        let mut state = MovementState::default();
        state.mode = MovementMode::Walking;

        controller.launch(&mut state, Vec3::new(300.0, 100.0, 0.0));

        assert_eq!(state.mode, MovementMode::Falling);
        assert_eq!(state.velocity, Vec3::new(300.0, 100.0, 0.0));
        assert_eq!(state.launch_grace_ms, controller.config.launch_grace_ms);
    }

    #[test]
    fn test_flat_launch_from_ground_keeps_speed() {
        let world = create_test_world();
        let controller = PlayerController::default();
        let mut state = grounded(&world, &controller);
        assert!(state.on_ground());

        controller.launch(&mut state, Vec3::new(700.0, 0.0, 0.0));
        controller.update(&mut state, &PlayerCommand::default(), &world, 0.016);

        assert_eq!(state.mode, MovementMode::Falling, "launch tick must not snap to ground");
        assert!((state.velocity.x - 700.0).abs() < 0.01, "no friction on the launch tick, vx={}", state.velocity.x);

        // Grace runs out and the character lands again
        for _ in 0..10 {
            controller.update(&mut state, &PlayerCommand::default(), &world, 0.016);
        }
        assert_eq!(state.launch_grace_ms, 0);
        assert!(state.on_ground());
    }

    #[test]
    fn test_update_leaves_custom_mode_alone() {
        let world = CollisionWorld::new();
        let controller = PlayerController::default();

        let mut state = MovementState::new(Vec3::new(0.0, 500.0, 0.0));
        state.mode = MovementMode::Custom(CustomMode::Climb);
        controller.update(&mut state, &PlayerCommand::default(), &world, 0.1);

        assert_eq!(state.position, Vec3::new(0.0, 500.0, 0.0));
        assert_eq!(state.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_yaw_wraps() {
        let world = create_test_world();
        let controller = PlayerController::default();
        let mut state = grounded(&world, &controller);
        state.view_angles.y = 3.0;

        let command = PlayerCommand {
            view_delta: (0.0, 0.5),
            ..Default::default()
        };
        controller.update(&mut state, &command, &world, 0.016);

        assert!(state.view_angles.y < 0.0 && state.view_angles.y > -PI);
        assert!((state.view_angles.y - (3.5 - TAU)).abs() < 1e-4);
    }

    // ========================================================================
    // Spawn Tests
    // ========================================================================

    #[test]
    fn test_spawn_at_above_ground() {
        let world = create_test_world();
        let controller = PlayerController::default();

        let mut state = MovementState::default();
        controller.spawn_at(&mut state, Vec3::new(0.0, 5.0, 0.0), &world);

        assert!(state.position.y.abs() < 1.0, "got y={}", state.position.y);
        assert!(state.on_ground(), "Should be on ground after spawn");
    }

    #[test]
    fn test_spawn_at_no_ground() {
        let world = CollisionWorld::new();
        let controller = PlayerController::default();

        let mut state = MovementState::default();
        let spawn_pos = Vec3::new(0.0, 1000.0, 0.0);
        controller.spawn_at(&mut state, spawn_pos, &world);

        assert_eq!(state.position, spawn_pos);
        assert!(!state.on_ground());
    }
}
