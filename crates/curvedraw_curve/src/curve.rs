// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation curves and their evaluation.

use crate::keyframe::{Interpolation, Keyframe, TangentMode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurveId(pub Uuid);

impl CurveId {
    /// Create a new random curve ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CurveId {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors produced while building or loading curves
#[derive(Debug, thiserror::Error)]
pub enum CurveError {
    /// A keyframe time, value or tangent is NaN, or a time/value is infinite
    #[error("Keyframe {index} has a non-finite component")]
    NonFiniteKeyframe {
        /// Offending keyframe index
        index: usize,
    },

    /// Keyframes are not sorted by time
    #[error("Keyframe {index} is earlier than its predecessor")]
    Unsorted {
        /// Index of the first out-of-order keyframe
        index: usize,
    },

    /// More tangent modes than keyframes
    #[error("{modes} tangent modes given for {keyframes} keyframes")]
    TangentModeCount {
        /// Number of keyframes on the curve
        keyframes: usize,
        /// Number of tangent modes supplied
        modes: usize,
    },

    /// RON parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A curve defined by keyframes with cubic Hermite interpolation between them.
///
/// Keyframes are always sorted by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct AnimationCurve {
    keyframes: Vec<Keyframe>,
}

impl AnimationCurve {
    /// Create a curve from keyframes that are already sorted by time
    pub fn new(keyframes: Vec<Keyframe>) -> Result<Self, CurveError> {
        validate_finite(&keyframes)?;

        if let Some(index) = keyframes
            .windows(2)
            .position(|pair| pair[1].time < pair[0].time)
        {
            return Err(CurveError::Unsorted { index: index + 1 });
        }

        Ok(Self { keyframes })
    }

    /// Create a curve, sorting the keyframes by time first
    pub fn from_unsorted(mut keyframes: Vec<Keyframe>) -> Result<Self, CurveError> {
        validate_finite(&keyframes)?;
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self { keyframes })
    }

    /// All keyframes, sorted by time
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Get keyframe by index
    pub fn keyframe(&self, idx: usize) -> Option<&Keyframe> {
        self.keyframes.get(idx)
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the curve has no keyframes
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Time of the first keyframe
    pub fn start_time(&self) -> f32 {
        self.keyframes.first().map_or(0.0, |k| k.time)
    }

    /// Time of the last keyframe
    pub fn end_time(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.time)
    }

    /// Time between the first and last keyframe
    pub fn length(&self) -> f32 {
        self.end_time() - self.start_time()
    }

    /// Smallest and largest keyframe value
    pub fn value_range(&self) -> Option<(f32, f32)> {
        let first = self.keyframes.first()?.value;
        Some(self.keyframes.iter().fold((first, first), |(min, max), k| {
            (min.min(k.value), max.max(k.value))
        }))
    }

    /// Evaluate the curve at `time`.
    ///
    /// Without looping, times outside the keyframe span clamp to the first or
    /// last value. With looping, time wraps around the keyframe span.
    pub fn evaluate(&self, time: f32, looping: bool) -> f32 {
        let (first, last) = match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if self.keyframes.len() == 1 {
            return first.value;
        }

        let mut time = time;
        if looping {
            let length = last.time - first.time;
            if length > 0.0 {
                time = first.time + (time - first.time).rem_euclid(length);
            }
        }

        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // First keyframe strictly after `time`; always in 1..len here
        let right = self
            .keyframes
            .partition_point(|k| k.time <= time)
            .clamp(1, self.keyframes.len() - 1);

        evaluate_segment(&self.keyframes[right - 1], &self.keyframes[right], time)
    }
}

fn evaluate_segment(lhs: &Keyframe, rhs: &Keyframe, time: f32) -> f32 {
    let length = rhs.time - lhs.time;
    if length <= 0.0 || lhs.is_step_out() || rhs.is_step_in() {
        return lhs.value;
    }

    let t = (time - lhs.time) / length;
    Interpolation::hermite(
        lhs.value,
        lhs.out_tangent * length,
        rhs.value,
        rhs.in_tangent * length,
        t,
    )
}

fn validate_finite(keyframes: &[Keyframe]) -> Result<(), CurveError> {
    match keyframes.iter().position(|k| {
        !k.time.is_finite()
            || !k.value.is_finite()
            || k.in_tangent.is_nan()
            || k.out_tangent.is_nan()
    }) {
        Some(index) => Err(CurveError::NonFiniteKeyframe { index }),
        None => Ok(()),
    }
}

impl TryFrom<Vec<Keyframe>> for AnimationCurve {
    type Error = CurveError;

    fn try_from(keyframes: Vec<Keyframe>) -> Result<Self, Self::Error> {
        Self::new(keyframes)
    }
}

impl From<AnimationCurve> for Vec<Keyframe> {
    fn from(curve: AnimationCurve) -> Self {
        curve.keyframes
    }
}

/// A curve as shown in the editor: the evaluated data plus per-keyframe
/// tangent modes and a display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawEditorCurve")]
pub struct EditorCurve {
    /// Unique curve ID
    pub id: CurveId,
    /// Display name
    pub name: String,
    curve: AnimationCurve,
    tangent_modes: Vec<TangentMode>,
}

#[derive(Deserialize)]
struct RawEditorCurve {
    #[serde(default)]
    id: CurveId,
    #[serde(default)]
    name: String,
    curve: AnimationCurve,
    #[serde(default)]
    tangent_modes: Vec<TangentMode>,
}

impl TryFrom<RawEditorCurve> for EditorCurve {
    type Error = CurveError;

    fn try_from(raw: RawEditorCurve) -> Result<Self, Self::Error> {
        let mut curve = Self::new(raw.name, raw.curve, raw.tangent_modes)?;
        curve.id = raw.id;
        Ok(curve)
    }
}

impl EditorCurve {
    /// Create a curve with explicit tangent modes. Missing modes default to
    /// [`TangentMode::AUTO`].
    pub fn new(
        name: impl Into<String>,
        curve: AnimationCurve,
        mut tangent_modes: Vec<TangentMode>,
    ) -> Result<Self, CurveError> {
        if tangent_modes.len() > curve.len() {
            return Err(CurveError::TangentModeCount {
                keyframes: curve.len(),
                modes: tangent_modes.len(),
            });
        }
        tangent_modes.resize(curve.len(), TangentMode::AUTO);

        Ok(Self {
            id: CurveId::new(),
            name: name.into(),
            curve,
            tangent_modes,
        })
    }

    /// Create a curve whose tangents are all automatic
    pub fn from_curve(name: impl Into<String>, curve: AnimationCurve) -> Self {
        let tangent_modes = vec![TangentMode::AUTO; curve.len()];
        Self {
            id: CurveId::new(),
            name: name.into(),
            curve,
            tangent_modes,
        }
    }

    /// The underlying curve
    pub fn curve(&self) -> &AnimationCurve {
        &self.curve
    }

    /// All keyframes, sorted by time
    pub fn keyframes(&self) -> &[Keyframe] {
        self.curve.keyframes()
    }

    /// Tangent mode of a keyframe, automatic when none is stored
    pub fn tangent_mode(&self, key_idx: usize) -> TangentMode {
        self.tangent_modes
            .get(key_idx)
            .copied()
            .unwrap_or(TangentMode::AUTO)
    }

    /// All tangent modes, one per keyframe
    pub fn tangent_modes(&self) -> &[TangentMode] {
        &self.tangent_modes
    }

    /// Evaluate the curve at `time`
    pub fn evaluate(&self, time: f32, looping: bool) -> f32 {
        self.curve.evaluate(time, looping)
    }
}
