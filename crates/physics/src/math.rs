//! Angle and interpolation helpers shared by the camera and traversal code.
//!
//! Angles are radians. Interpolation helpers follow the usual "interp to"
//! shape: move a fraction `delta_time * speed` of the remaining distance
//! each tick, which gives exponential smoothing that never overshoots.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Wrap an angle difference into `[-PI, PI]`.
#[inline]
pub fn normalize_angle_diff(mut angle: f32) -> f32 {
    angle %= TAU;
    if angle > PI {
        angle -= TAU;
    } else if angle < -PI {
        angle += TAU;
    }
    angle
}

/// Yaw (radians) of a horizontal direction.
///
/// Matches the movement convention where yaw 0 faces +X and the forward
/// vector is `(cos yaw, 0, sin yaw)`.
#[inline]
pub fn yaw_from_direction(direction: Vec3) -> f32 {
    direction.z.atan2(direction.x)
}

/// Exponentially approach `target` from `current`.
///
/// A non-positive `speed` snaps straight to the target.
#[inline]
pub fn interp_to(current: f32, target: f32, delta_time: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }
    let distance = target - current;
    if distance * distance < 1.0e-8 {
        return target;
    }
    current + distance * (delta_time * speed).clamp(0.0, 1.0)
}

/// Like [`interp_to`], but takes the shortest way around the circle.
#[inline]
pub fn interp_angle_to(current: f32, target: f32, delta_time: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }
    let distance = normalize_angle_diff(target - current);
    if distance * distance < 1.0e-8 {
        return target;
    }
    current + distance * (delta_time * speed).clamp(0.0, 1.0)
}

/// Linear interpolation between two scalars.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle_diff() {
        assert!((normalize_angle_diff(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle_diff(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle_diff(0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_yaw_from_direction_axes() {
        assert!(yaw_from_direction(Vec3::X).abs() < 1e-6);
        assert!((yaw_from_direction(Vec3::Z) - PI / 2.0).abs() < 1e-6);
        assert!((yaw_from_direction(-Vec3::X).abs() - PI).abs() < 1e-6);
    }

    #[test]
    fn test_interp_to_approaches_without_overshoot() {
        let mut value = 10.0;
        for _ in 0..200 {
            let next = interp_to(value, 0.0, 0.016, 6.0);
            assert!(next <= value && next >= 0.0);
            value = next;
        }
        assert!(value.abs() < 1e-3, "should have decayed, got {}", value);

        // Large steps clamp to the target
        assert_eq!(interp_to(10.0, 0.0, 1.0, 6.0), 0.0);
    }

    #[test]
    fn test_interp_angle_takes_short_way() {
        // From just below +PI to just above -PI should step across the seam
        let current = PI - 0.1;
        let target = -PI + 0.1;
        let next = interp_angle_to(current, target, 0.5, 1.0);
        assert!(next > current, "expected to increase past PI, got {}", next);
    }
}
