// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions and tangent helpers.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A single sample on an animation curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time in seconds
    pub time: f32,
    /// Value at this keyframe
    pub value: f32,
    /// Incoming slope, in value units per second
    pub in_tangent: f32,
    /// Outgoing slope, in value units per second
    pub out_tangent: f32,
}

impl Keyframe {
    /// Create a new keyframe with flat tangents
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }

    /// Create a keyframe whose neighbouring segments are held constant
    pub fn step(time: f32, value: f32) -> Self {
        Self::new(time, value).with_tangents(f32::INFINITY, f32::INFINITY)
    }

    /// Set both tangents
    pub fn with_tangents(mut self, in_tangent: f32, out_tangent: f32) -> Self {
        self.in_tangent = in_tangent;
        self.out_tangent = out_tangent;
        self
    }

    /// Whether the segment ending at this keyframe is a step
    pub fn is_step_in(&self) -> bool {
        self.in_tangent.is_infinite()
    }

    /// Whether the segment starting at this keyframe is a step
    pub fn is_step_out(&self) -> bool {
        self.out_tangent.is_infinite()
    }

    /// Tangent on the given side
    pub fn tangent(&self, tangent_type: TangentType) -> f32 {
        match tangent_type {
            TangentType::In => self.in_tangent,
            TangentType::Out => self.out_tangent,
        }
    }
}

/// Which side of a keyframe a tangent belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TangentType {
    /// Incoming tangent (left of the keyframe)
    In,
    /// Outgoing tangent (right of the keyframe)
    Out,
}

impl TangentType {
    fn flag(self) -> u32 {
        match self {
            Self::In => 1 << 0,
            Self::Out => 1 << 1,
        }
    }
}

bitflags! {
    /// Policy controlling how a keyframe's tangents are computed and whether
    /// their handles are shown. The empty set means fully automatic.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TangentMode: u32 {
        /// Incoming tangent is computed automatically
        const IN_AUTO = (1 << 0) | (1 << 2);
        /// Incoming tangent is user controlled
        const IN_FREE = (1 << 0) | (1 << 3);
        /// Incoming tangent points straight at the previous keyframe
        const IN_LINEAR = (1 << 0) | (1 << 4);
        /// Segment ending at the keyframe is a step
        const IN_STEP = (1 << 0) | (1 << 5);
        /// Outgoing tangent is computed automatically
        const OUT_AUTO = (1 << 1) | (1 << 6);
        /// Outgoing tangent is user controlled
        const OUT_FREE = (1 << 1) | (1 << 7);
        /// Outgoing tangent points straight at the next keyframe
        const OUT_LINEAR = (1 << 1) | (1 << 8);
        /// Segment starting at the keyframe is a step
        const OUT_STEP = (1 << 1) | (1 << 9);
        /// Both tangents are user controlled and may differ
        const FREE = 1 << 10;
    }
}

impl TangentMode {
    /// Fully automatic tangents
    pub const AUTO: Self = Self::empty();

    /// Whether the handle for the given tangent is shown and pickable
    pub fn is_displayed(self, tangent_type: TangentType) -> bool {
        if self == Self::AUTO {
            return false;
        }
        if self == Self::FREE {
            return true;
        }

        match tangent_type {
            TangentType::In => self.contains(Self::IN_FREE),
            TangentType::Out => self.contains(Self::OUT_FREE),
        }
    }

    /// Whether any flag for the given side is set
    pub fn affects(self, tangent_type: TangentType) -> bool {
        self.bits() & tangent_type.flag() != 0
    }
}

impl Default for TangentMode {
    fn default() -> Self {
        Self::AUTO
    }
}

/// Convert a tangent slope into a unit direction `[x, y]`.
///
/// Infinite slopes map to a vertical direction.
pub fn tangent_to_normal(tangent: f32) -> [f32; 2] {
    if tangent.is_infinite() {
        return [0.0, tangent.signum()];
    }

    let len = (1.0 + tangent * tangent).sqrt();
    [1.0 / len, tangent / len]
}

/// Convert a direction back into a tangent slope
pub fn normal_to_tangent(normal: [f32; 2]) -> f32 {
    if normal[0] == 0.0 {
        return f32::INFINITY;
    }

    normal[1] / normal[0]
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Cubic Hermite interpolation. `t` is normalized to `[0, 1]` and the
    /// tangents must already be scaled by the segment length.
    pub fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, t: f32) -> f32 {
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1
    }
}
