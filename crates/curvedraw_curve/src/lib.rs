// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation curve model for curvedraw.
//!
//! This crate provides the data the curve drawing consumes:
//! - Keyframes with in/out tangents (infinite tangents are steps)
//! - Tangent modes deciding which handles are editable
//! - Cubic Hermite evaluation with clamping or looping
//! - Ordered curve sets addressed by curve/keyframe index

pub mod curve;
pub mod keyframe;
pub mod set;

pub use curve::{AnimationCurve, CurveError, CurveId, EditorCurve};
pub use keyframe::{
    normal_to_tangent, tangent_to_normal, Interpolation, Keyframe, TangentMode, TangentType,
};
pub use set::{CurveSet, KeyframeRef, TangentRef};
