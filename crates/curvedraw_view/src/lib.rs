// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve drawing for curvedraw.
//!
//! This crate turns a [`CurveSet`](curvedraw_curve::CurveSet) into 2D
//! primitives and maps pointer positions back onto it:
//! - Pixel <-> curve space mapping with horizontal padding
//! - Adaptive rasterization of Hermite and step segments
//! - Frame ticks with strength-faded levels
//! - Keyframe and tangent handle picking
//! - An egui widget painting the recorded primitives
//!
//! ## Architecture
//!
//! [`CurveDrawing`] draws through the [`Canvas`] trait in element-local
//! pixels. [`DrawList`] records the primitives so they can be inspected,
//! dumped, or painted by [`CurveView`].

pub mod canvas;
pub mod drawing;
pub mod style;
pub mod ticks;
pub mod ui;

pub use canvas::{to_pixel, Canvas, DrawCommand, DrawList, PixelPos, DEFAULT_DEPTH, PIXEL_LIMIT};
pub use drawing::CurveDrawing;
pub use style::{hsv_to_rgb, unique_color, CurveStyle, StyleError};
pub use ticks::{GraphTicks, TickStepType};
pub use ui::{CurveView, CurveViewResponse, Picked};
