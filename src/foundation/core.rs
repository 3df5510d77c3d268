use crate::foundation::error::{AnnotateError, AnnotateResult};

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Frame number as seen by the output stage (sequence display-rate frames).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FrameNumber(pub i32);

impl FrameNumber {
    /// Zero-pad to `width` digits, e.g. `FrameNumber(7).padded(4) == "0007"`.
    pub fn padded(self, width: usize) -> String {
        format!("{:0width$}", self.0)
    }

    /// Shift by `delta` frames using saturating arithmetic.
    pub fn offset(self, delta: i32) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameNumber,
    /// Exclusive range end.
    pub end: FrameNumber,
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameNumber, end: FrameNumber) -> AnnotateResult<Self> {
        if start.0 > end.0 {
            return Err(AnnotateError::config("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u32 {
        (self.end.0 - self.start.0).max(0) as u32
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameNumber) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

/// Euler rotation in degrees using the engine's roll/pitch/yaw naming.
///
/// Yaw turns about +Z, pitch about +Y, roll about +X, applied in that order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rotator {
    /// Rotation about the forward (X) axis, degrees.
    pub roll: f32,
    /// Rotation about the right (Y) axis, degrees.
    pub pitch: f32,
    /// Rotation about the up (Z) axis, degrees.
    pub yaw: f32,
}

impl Rotator {
    /// Identity rotation.
    pub const ZERO: Self = Self {
        roll: 0.0,
        pitch: 0.0,
        yaw: 0.0,
    };

    /// Create a rotator from roll/pitch/yaw degrees.
    pub fn new(roll: f32, pitch: f32, yaw: f32) -> Self {
        Self { roll, pitch, yaw }
    }

    /// Convert to a quaternion.
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::ZYX,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            self.roll.to_radians(),
        )
    }

    /// Rotate `v` by this rotator.
    pub fn rotate_vector(self, v: Vec3) -> Vec3 {
        self.to_quat() * v
    }
}

/// Output resolution in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
