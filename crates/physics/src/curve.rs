//! Keyframe curves used to shape traversal motion.
//!
//! A [`FloatCurve`] maps time to a scalar through sorted keys. A
//! [`VectorCurve`] bundles three of them. Curves evaluate outside their key
//! range by clamping to the first/last key.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How values are blended between two neighbouring keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    /// Straight line between keys.
    #[default]
    Linear,
    /// Hold the left key's value until the next key.
    Constant,
    /// Smoothstep between keys (zero slope at every key).
    SmoothStep,
}

/// A single keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

/// A 1-D keyframe curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CurveData", into = "CurveData")]
pub struct FloatCurve {
    keys: Vec<Keyframe>,
    interpolation: Interpolation,
}

/// Serialized form; keys are re-sorted on load.
#[derive(Serialize, Deserialize)]
struct CurveData {
    keys: Vec<(f32, f32)>,
    #[serde(default)]
    interpolation: Interpolation,
}

impl From<CurveData> for FloatCurve {
    fn from(data: CurveData) -> Self {
        Self::from_keys(data.keys).with_interpolation(data.interpolation)
    }
}

impl From<FloatCurve> for CurveData {
    fn from(curve: FloatCurve) -> Self {
        Self {
            keys: curve.keys.iter().map(|k| (k.time, k.value)).collect(),
            interpolation: curve.interpolation,
        }
    }
}

impl FloatCurve {
    /// Build a curve from `(time, value)` pairs. Keys are sorted by time and
    /// non-finite keys are dropped.
    pub fn from_keys(keys: impl IntoIterator<Item = (f32, f32)>) -> Self {
        let mut keys: Vec<Keyframe> = keys
            .into_iter()
            .filter(|(t, v)| t.is_finite() && v.is_finite())
            .map(|(time, value)| Keyframe { time, value })
            .collect();
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            keys,
            interpolation: Interpolation::Linear,
        }
    }

    /// A constant curve.
    pub fn constant(value: f32) -> Self {
        Self::from_keys([(0.0, value)])
    }

    /// The identity ramp from `(0, 0)` to `(1, 1)`.
    pub fn linear_ramp() -> Self {
        Self::from_keys([(0.0, 0.0), (1.0, 1.0)])
    }

    /// An ease-in/ease-out ramp from `(0, 0)` to `(1, 1)`.
    pub fn ease_in_out() -> Self {
        Self::linear_ramp().with_interpolation(Interpolation::SmoothStep)
    }

    /// Set the interpolation mode.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Evaluate the curve at `time`. An empty curve evaluates to zero.
    pub fn evaluate(&self, time: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // First key strictly after `time`; guaranteed to exist and be > 0
        let right_index = self.keys.partition_point(|k| k.time <= time);
        let left = self.keys[right_index - 1];
        let right = self.keys[right_index];

        let span = right.time - left.time;
        if span <= f32::EPSILON {
            return right.value;
        }
        let t = (time - left.time) / span;

        let blend = match self.interpolation {
            Interpolation::Linear => t,
            Interpolation::Constant => 0.0,
            Interpolation::SmoothStep => t * t * (3.0 - 2.0 * t),
        };

        left.value + (right.value - left.value) * blend
    }
}

/// A 3-D keyframe curve (one [`FloatCurve`] per axis).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorCurve {
    pub x: FloatCurve,
    pub y: FloatCurve,
    pub z: FloatCurve,
}

impl VectorCurve {
    pub fn new(x: FloatCurve, y: FloatCurve, z: FloatCurve) -> Self {
        Self { x, y, z }
    }

    /// Evaluate all three axes at `time`.
    pub fn evaluate(&self, time: f32) -> Vec3 {
        Vec3::new(self.x.evaluate(time), self.y.evaluate(time), self.z.evaluate(time))
    }

    /// Default vault path: steady forward progress, no sideways drift, and a
    /// hop that peaks over the obstacle mid-vault.
    pub fn vault_arc() -> Self {
        Self {
            x: FloatCurve::ease_in_out(),
            y: FloatCurve::constant(0.0),
            z: FloatCurve::from_keys([(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)])
                .with_interpolation(Interpolation::SmoothStep),
        }
    }
}

/// Default vault camera tilt: lean in and back out over the vault.
pub fn vault_tilt_bump() -> FloatCurve {
    FloatCurve::from_keys([(0.0, 0.0), (0.35, 1.0), (1.0, 0.0)])
        .with_interpolation(Interpolation::SmoothStep)
}
