// SPDX-License-Identifier: MIT OR Apache-2.0
//! Visual configuration for curve drawing.
//!
//! Every size, color and depth the drawing uses lives in [`CurveStyle`], which
//! can be loaded from a RON file. Missing fields fall back to the defaults.

use egui::Color32;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors produced while loading a style
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RON parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Sizes, colors and layering used by the curve drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveStyle {
    /// Horizontal padding on each side of the drawable area, in pixels
    pub padding: i32,
    /// Horizontal distance between curve samples, in pixels
    pub line_split_width: i32,
    /// Length of a tangent handle line, in pixels
    pub tangent_line_distance: f32,
    /// Maximum distance at which a keyframe or handle is picked, in pixels
    pub pick_radius: f32,
    /// Half extent of a keyframe diamond
    pub keyframe_size: i32,
    /// Half extent of a tangent handle diamond
    pub tangent_handle_size: i32,

    /// Lead-in and lead-out lines outside the keyframe span
    pub extension_color: Color32,
    /// Frame ticks and the zero line
    pub grid_color: Color32,
    /// Tangent handle lines
    pub tangent_line_color: Color32,
    /// Marked frame and selected keyframe outlines
    pub highlight_color: Color32,
    /// Tangent handle fill
    pub handle_color: Color32,
    /// Keyframe and handle outlines
    pub outline_color: Color32,
    /// Keyframe fill
    pub keyframe_fill_color: Color32,

    /// Layer of frame ticks, curves and lines
    pub background_depth: u8,
    /// Layer of the marked frame marker
    pub marker_depth: u8,
    /// Layer of diamond fills
    pub diamond_fill_depth: u8,
    /// Layer of diamond outlines
    pub diamond_outline_depth: u8,
}

impl Default for CurveStyle {
    fn default() -> Self {
        Self {
            padding: 30,
            line_split_width: 2,
            tangent_line_distance: 30.0,
            pick_radius: 5.0,
            keyframe_size: 3,
            tangent_handle_size: 2,

            extension_color: Color32::from_gray(90),
            grid_color: Color32::from_gray(40),
            tangent_line_color: Color32::from_gray(200),
            highlight_color: Color32::from_rgb(255, 168, 0),
            handle_color: Color32::from_rgb(0, 255, 0),
            outline_color: Color32::BLACK,
            keyframe_fill_color: Color32::WHITE,

            background_depth: 128,
            marker_depth: 110,
            diamond_fill_depth: 101,
            diamond_outline_depth: 100,
        }
    }
}

impl CurveStyle {
    /// Parse a style from RON text
    pub fn from_ron(source: &str) -> Result<Self, StyleError> {
        Ok(ron::from_str(source)?)
    }

    /// Load a style from a RON file
    pub fn load(path: &Path) -> Result<Self, StyleError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron(&source)
    }
}

/// Hue step between consecutive curve colors, in degrees
const COLOR_SPACING: usize = 359 / 15;

/// A distinct color for the curve at `idx`. Indices below 15 never repeat.
pub fn unique_color(idx: usize) -> Color32 {
    let hue = ((idx * COLOR_SPACING) % 359) as f32 / 359.0;
    hsv_to_rgb(hue, 175.0 / 255.0, 175.0 / 255.0)
}

/// Convert hue, saturation and value, all in `[0, 1]`, to an opaque color
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Color32 {
    let h = (h.fract() + 1.0).fract() * 6.0;
    let sector = h.floor();
    let f = h - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as i32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgb(to_byte(r), to_byte(g), to_byte(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Color32::from_rgb(255, 0, 0));
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Color32::from_rgb(0, 255, 0));
        assert_eq!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), Color32::from_rgb(0, 0, 255));
        assert_eq!(hsv_to_rgb(0.5, 0.0, 0.5), Color32::from_rgb(128, 128, 128));
    }

    #[test]
    fn test_unique_colors_differ() {
        let colors: Vec<Color32> = (0..15).map(unique_color).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        // Hue zero: value 175 at full channel, 175 * (1 - 175/255) on the others
        assert_eq!(unique_color(0), Color32::from_rgb(175, 55, 55));
    }

    #[test]
    fn test_partial_style_file() {
        let style = CurveStyle::from_ron("(padding: 12, pick_radius: 8.0)").unwrap();
        assert_eq!(style.padding, 12);
        assert_eq!(style.pick_radius, 8.0);
        assert_eq!(style.line_split_width, CurveStyle::default().line_split_width);
    }

    #[test]
    fn test_serialization() {
        let style = CurveStyle::default();
        let ron_str =
            ron::ser::to_string_pretty(&style, ron::ser::PrettyConfig::default()).unwrap();
        let loaded = CurveStyle::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, style);
    }

    #[test]
    fn test_bad_style_file() {
        assert!(matches!(
            CurveStyle::from_ron("(padding: \"wide\")"),
            Err(StyleError::Parse(_))
        ));
    }
}
