//! Slide move algorithm for collision response.
//!
//! Classic Quake slide move: trace along the velocity, clip against
//! whatever was hit and keep going with the remaining time. Also hosts
//! [`safe_move`], the single-displacement primitive scripted traversals use.

use glam::Vec3;

use crate::collision::{QueryFilter, TraceResult, TraceShape, WorldQuery};

use super::config::MovementConfig;

/// Upper bound on remembered clip planes, regardless of configuration.
const MAX_CLIP_PLANES: usize = 5;

/// Clip velocity against a surface normal.
///
/// Removes the component of velocity going into the surface, scaled by
/// `overbounce` so the result points slightly away from it.
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let backoff = velocity.dot(normal);

    let adjusted_backoff = if backoff < 0.0 {
        backoff * overbounce
    } else {
        backoff / overbounce
    };

    velocity - normal * adjusted_backoff
}

/// Perform a slide move through the world.
///
/// Returns whether the full movement succeeded without touching anything.
pub fn slide_move<W: WorldQuery + ?Sized>(
    world: &W,
    filter: &QueryFilter,
    position: &mut Vec3,
    velocity: &mut Vec3,
    shape: TraceShape,
    delta_time: f32,
    config: &MovementConfig,
) -> bool {
    let mut time_remaining = delta_time;
    let original_velocity = *velocity;
    let mut planes: Vec<Vec3> = Vec::with_capacity(MAX_CLIP_PLANES);

    for _ in 0..config.max_clip_planes.min(MAX_CLIP_PLANES) {
        if velocity.length_squared() < 0.0001 {
            break;
        }

        let target = *position + *velocity * time_remaining;
        let trace = world.sweep(*position, target, shape, filter);

        if !trace.hit_something() {
            *position = trace.end_position;
            return planes.is_empty();
        }

        if trace.all_solid {
            *velocity = Vec3::ZERO;
            return false;
        }

        if trace.fraction > 0.0 {
            *position = trace.end_position;
        }
        time_remaining *= 1.0 - trace.fraction;

        let Some(normal) = trace.hit_normal else {
            continue;
        };
        planes.push(normal);

        // Find a clip that doesn't push into any other plane we've touched
        let slide = planes.iter().enumerate().find_map(|(i, plane)| {
            let clipped = clip_velocity(*velocity, *plane, config.overbounce);
            let valid = planes
                .iter()
                .enumerate()
                .all(|(j, other)| i == j || clipped.dot(*other) >= -0.01);
            valid.then_some(clipped)
        });

        match slide {
            Some(clipped) => *velocity = clipped,
            None if planes.len() >= 2 => {
                // Slide along the crease between the first two planes
                let crease = planes[0].cross(planes[1]).normalize_or_zero();
                *velocity = crease * original_velocity.dot(crease);

                if velocity.dot(planes[0]) < -0.01 || velocity.dot(planes[1]) < -0.01 {
                    *velocity = Vec3::ZERO;
                    return false;
                }
            }
            None => {
                *velocity = Vec3::ZERO;
                return false;
            }
        }
    }

    false
}

/// Perform a slide move that can also climb stairs.
///
/// If the plain slide is obstructed, retries the move from `step_height`
/// higher and keeps whichever attempt got further horizontally.
pub fn step_slide_move<W: WorldQuery + ?Sized>(
    world: &W,
    filter: &QueryFilter,
    position: &mut Vec3,
    velocity: &mut Vec3,
    shape: TraceShape,
    delta_time: f32,
    config: &MovementConfig,
) -> bool {
    let start_position = *position;
    let start_velocity = *velocity;

    if slide_move(world, filter, position, velocity, shape, delta_time, config) {
        return true;
    }

    let plain_distance_sq = horizontal_distance_sq(start_position, *position);

    let up_trace = world.sweep(
        start_position,
        start_position + Vec3::Y * config.step_height,
        shape,
        filter,
    );
    if up_trace.all_solid {
        return false;
    }

    let mut stepped_position = up_trace.end_position;
    let mut stepped_velocity = start_velocity;
    slide_move(
        world,
        filter,
        &mut stepped_position,
        &mut stepped_velocity,
        shape,
        delta_time,
        config,
    );

    // Step back down
    let down_trace = world.sweep(
        stepped_position,
        stepped_position - Vec3::Y * (config.step_height + 0.01),
        shape,
        filter,
    );
    if !down_trace.all_solid {
        stepped_position = down_trace.end_position;
    }

    if horizontal_distance_sq(start_position, stepped_position) > plain_distance_sq {
        *position = stepped_position;
        *velocity = stepped_velocity;

        if let Some(normal) = down_trace.hit_normal {
            return normal.y >= config.min_ground_normal;
        }
    }

    false
}

/// Displace a shape by `delta`, stopping at the first blocking hit.
///
/// The remainder of the move after a hit is slid once along the hit
/// surface. Returns the blocking hit, if any. A shape that starts inside
/// geometry cannot be resolved by sweeping and is moved straight to the
/// target.
pub fn safe_move<W: WorldQuery + ?Sized>(
    world: &W,
    filter: &QueryFilter,
    position: &mut Vec3,
    delta: Vec3,
    shape: TraceShape,
) -> Option<TraceResult> {
    let target = *position + delta;
    let trace = world.sweep(*position, target, shape, filter);

    if trace.started_in_solid {
        log::trace!("safe_move started in solid at {:?}, moving through", *position);
        *position = target;
        return None;
    }

    *position = trace.end_position;
    if !trace.hit_something() {
        return None;
    }

    let remaining = delta * (1.0 - trace.fraction);
    let normal = trace.normal_or_up();
    let slide = remaining - normal * remaining.dot(normal);
    if slide.length_squared() > 0.0001 {
        let slide_trace = world.sweep(*position, *position + slide, shape, filter);
        if !slide_trace.started_in_solid {
            *position = slide_trace.end_position;
        }
    }

    Some(trace)
}

#[inline]
fn horizontal_distance_sq(from: Vec3, to: Vec3) -> f32 {
    let delta = to - from;
    delta.x * delta.x + delta.z * delta.z
}
