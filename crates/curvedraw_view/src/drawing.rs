// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve drawing: coordinate mapping, curve rasterization and picking.
//!
//! The drawing covers a `width x height` pixel element. Time runs along the
//! x axis from `0` at the left padding to the visible range at the right
//! padding; value runs along the y axis from `y_range / 2` at the top to
//! `-y_range / 2` at the bottom, with zero on the center line.

use crate::canvas::{to_pixel, Canvas, PixelPos};
use crate::style::{unique_color, CurveStyle};
use crate::ticks::{GraphTicks, TickStepType};
use curvedraw_curve::{
    tangent_to_normal, CurveSet, EditorCurve, Keyframe, KeyframeRef, TangentMode, TangentRef,
    TangentType,
};
use egui::Color32;

const DEFAULT_X_RANGE: f32 = 60.0;
const DEFAULT_Y_RANGE: f32 = 20.0;

/// Draws a set of curves over a fixed-size pixel area and maps mouse
/// positions back to curves, keyframes and tangent handles
#[derive(Debug, Clone)]
pub struct CurveDrawing {
    curves: CurveSet,
    /// Selection flags, indexed by curve then keyframe
    selected: Vec<Vec<bool>>,
    width: u32,
    height: u32,
    drawable_width: u32,
    x_range: f32,
    y_range: f32,
    fps: u32,
    marked_frame: Option<u32>,
    style: CurveStyle,
}

impl CurveDrawing {
    /// Create a drawing of the given pixel size showing `curves`
    pub fn new(width: u32, height: u32, curves: CurveSet) -> Self {
        let mut drawing = Self {
            curves,
            selected: Vec::new(),
            width: 0,
            height: 0,
            drawable_width: 0,
            x_range: DEFAULT_X_RANGE,
            y_range: DEFAULT_Y_RANGE,
            fps: 1,
            marked_frame: Some(0),
            style: CurveStyle::default(),
        };
        drawing.set_size(width, height);
        drawing.clear_selected_keyframes();
        drawing
    }

    /// Replace the displayed curves. Clears the selection.
    pub fn set_curves(&mut self, curves: CurveSet) {
        self.curves = curves;
        self.clear_selected_keyframes();
    }

    /// Displayed curves
    pub fn curves(&self) -> &CurveSet {
        &self.curves
    }

    /// Change the pixel size of the element
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.update_drawable_width();
    }

    /// Element width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Element height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width between the left and right padding, in pixels
    pub fn drawable_width(&self) -> u32 {
        self.drawable_width
    }

    /// Set the visible ranges. Time spans `[0, x_range]` and value spans
    /// `[-y_range / 2, y_range / 2]`. Non-positive ranges are ignored.
    pub fn set_range(&mut self, x_range: f32, y_range: f32) {
        if !(x_range.is_finite() && x_range > 0.0 && y_range.is_finite() && y_range > 0.0) {
            tracing::warn!("Ignoring invalid curve range {x_range} x {y_range}");
            return;
        }
        self.x_range = x_range;
        self.y_range = y_range;
    }

    /// Requested horizontal range, in seconds
    pub fn x_range(&self) -> f32 {
        self.x_range
    }

    /// Vertical range, in value units
    pub fn y_range(&self) -> f32 {
        self.y_range
    }

    /// Set frames per second used for frame markers. Clamped to at least one.
    pub fn set_fps(&mut self, fps: u32) {
        if fps == 0 {
            tracing::warn!("FPS of 0 requested, using 1");
        }
        self.fps = fps.max(1);
    }

    /// Frames per second
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Set the frame to highlight, or `None` to hide the marker
    pub fn set_marked_frame(&mut self, frame: Option<u32>) {
        self.marked_frame = frame;
    }

    /// Highlighted frame
    pub fn marked_frame(&self) -> Option<u32> {
        self.marked_frame
    }

    /// Replace the visual style
    pub fn set_style(&mut self, style: CurveStyle) {
        self.style = style;
        self.update_drawable_width();
    }

    /// Visual style
    pub fn style(&self) -> &CurveStyle {
        &self.style
    }

    fn width_px(&self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX)
    }

    fn height_px(&self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX)
    }

    fn update_drawable_width(&mut self) {
        let padding = self.style.padding.max(0).unsigned_abs();
        self.drawable_width = self.width.saturating_sub(padding * 2);
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Mark a keyframe as selected or not. References outside the current
    /// curves are ignored.
    pub fn select_keyframe(&mut self, keyframe: KeyframeRef, selected: bool) {
        if let Some(flag) = self
            .selected
            .get_mut(keyframe.curve_idx)
            .and_then(|keys| keys.get_mut(keyframe.key_idx))
        {
            *flag = selected;
        }
    }

    /// Deselect every keyframe
    pub fn clear_selected_keyframes(&mut self) {
        self.selected = self
            .curves
            .iter()
            .map(|curve| vec![false; curve.keyframes().len()])
            .collect();
    }

    /// Whether a keyframe is selected. Unknown references are not.
    pub fn is_selected(&self, keyframe: KeyframeRef) -> bool {
        self.selected
            .get(keyframe.curve_idx)
            .and_then(|keys| keys.get(keyframe.key_idx))
            .copied()
            .unwrap_or(false)
    }

    /// All selected keyframes, curve by curve
    pub fn selected_keyframes(&self) -> impl Iterator<Item = KeyframeRef> + '_ {
        self.selected.iter().enumerate().flat_map(|(curve_idx, keys)| {
            keys.iter()
                .enumerate()
                .filter(|(_, selected)| **selected)
                .map(move |(key_idx, _)| KeyframeRef::new(curve_idx, key_idx))
        })
    }

    // ---------------------------------------------------------------------
    // Coordinate mapping
    // ---------------------------------------------------------------------

    /// Displayed time range, rounded down to a whole number of frames
    pub fn visible_range(&self) -> f32 {
        self.range(false)
    }

    /// Time range including the time covered by the right padding
    pub fn padded_range(&self) -> f32 {
        self.range(true)
    }

    fn range(&self, include_padding: bool) -> f32 {
        let fps = self.fps as f32;

        let mut range = self.x_range;
        if include_padding && self.drawable_width > 0 {
            let length_per_pixel = self.x_range / self.drawable_width as f32;
            range += length_per_pixel * self.style.padding as f32;
        }

        // Small bias so ranges like 0.7s at 30fps keep their last frame
        (range * fps + 1e-4).floor() / fps
    }

    /// Time at which frame `frame` starts
    pub fn time_for_frame(&self, frame: u32) -> f32 {
        let range = self.range(false);
        let num_frames = (range * self.fps as f32).round();
        if num_frames <= 0.0 {
            return 0.0;
        }

        frame as f32 * (range / num_frames)
    }

    /// Map a time and value to element-local pixels
    pub fn curve_to_pixel_space(&self, time: f32, value: f32) -> PixelPos {
        PixelPos::new(self.time_to_x(time), self.value_to_y(value))
    }

    /// Map element-local pixels to `(time, value)`. Returns `None` outside the
    /// drawable area (the horizontal padding counts as outside).
    pub fn pixel_to_curve_space(&self, pixel: PixelPos) -> Option<(f32, f32)> {
        let padding = self.style.padding;
        let right = self.width_px().saturating_sub(padding);

        if pixel.x < padding || pixel.x >= right || pixel.y < 0 || pixel.y >= self.height_px() {
            return None;
        }

        let length_per_pixel = self.range(false) / self.drawable_width as f32;
        let height_per_pixel = self.y_range / self.height as f32;

        let time = pixel.x.saturating_sub(padding) as f32 * length_per_pixel;
        let value = self.y_range / 2.0 - pixel.y as f32 * height_per_pixel;

        Some((time, value))
    }

    fn time_to_x(&self, time: f32) -> i32 {
        let range = self.range(false);
        let offset = if range > 0.0 {
            to_pixel(time / range * self.drawable_width as f32)
        } else {
            0
        };
        offset.saturating_add(self.style.padding)
    }

    fn value_to_y(&self, value: f32) -> i32 {
        let height_offset = self.height_px() / 2;
        height_offset.saturating_sub(to_pixel(value / self.y_range * self.height as f32))
    }

    // ---------------------------------------------------------------------
    // Picking
    // ---------------------------------------------------------------------

    /// Keyframe closest to `pixel`, if within the pick radius
    pub fn find_keyframe(&self, pixel: PixelPos) -> Option<KeyframeRef> {
        let mut nearest: Option<(f32, KeyframeRef)> = None;

        for (curve_idx, curve) in self.curves.iter().enumerate() {
            for (key_idx, key) in curve.keyframes().iter().enumerate() {
                let position = self.curve_to_pixel_space(key.time, key.value);
                let distance = pixel.distance(position);
                if nearest.map_or(true, |(best, _)| distance < best) {
                    nearest = Some((distance, KeyframeRef::new(curve_idx, key_idx)));
                }
            }
        }

        let (distance, keyframe) = nearest?;
        tracing::trace!("Nearest keyframe {keyframe:?} at {distance:.1}px");
        (distance <= self.style.pick_radius).then_some(keyframe)
    }

    /// Tangent handle closest to `pixel`, if within the pick radius. Only
    /// handles of selected keyframes are considered.
    pub fn find_tangent(&self, pixel: PixelPos) -> Option<TangentRef> {
        let mut nearest: Option<(f32, TangentRef)> = None;

        for (curve_idx, curve) in self.curves.iter().enumerate() {
            for (key_idx, key) in curve.keyframes().iter().enumerate() {
                let keyframe = KeyframeRef::new(curve_idx, key_idx);
                if !self.is_selected(keyframe) {
                    continue;
                }

                let mode = curve.tangent_mode(key_idx);
                for tangent_type in [TangentType::In, TangentType::Out] {
                    if !mode.is_displayed(tangent_type) {
                        continue;
                    }

                    let distance = pixel.distance(self.tangent_position(key, tangent_type));
                    if nearest.map_or(true, |(best, _)| distance < best) {
                        nearest = Some((
                            distance,
                            TangentRef {
                                keyframe,
                                tangent_type,
                            },
                        ));
                    }
                }
            }
        }

        let (distance, tangent) = nearest?;
        tracing::trace!("Nearest tangent {tangent:?} at {distance:.1}px");
        (distance <= self.style.pick_radius).then_some(tangent)
    }

    /// Pixel position of a keyframe's tangent handle
    pub fn tangent_position(&self, key: &Keyframe, tangent_type: TangentType) -> PixelPos {
        let position = self.curve_to_pixel_space(key.time, key.value);

        let [x, y] = match tangent_type {
            TangentType::In => {
                let [x, y] = tangent_to_normal(key.in_tangent);
                [-x, -y]
            }
            TangentType::Out => tangent_to_normal(key.out_tangent),
        };

        // Time and value are not scaled 1:1 on screen
        let range = self.range(false);
        if range <= 0.0 {
            return position;
        }
        let x = x / range;
        let y = y / self.y_range;
        let length = (x * x + y * y).sqrt();
        if length <= 0.0 {
            return position;
        }

        let distance = self.style.tangent_line_distance;
        let offset = PixelPos::new(
            to_pixel(x / length * distance),
            to_pixel(-y / length * distance),
        );
        position + offset
    }

    // ---------------------------------------------------------------------
    // Drawing
    // ---------------------------------------------------------------------

    /// Clear `canvas` and draw frame ticks, the zero line, every curve with
    /// its keyframes and selected tangents, and the marked frame.
    pub fn rebuild(&self, canvas: &mut impl Canvas) {
        canvas.clear();

        let padding = self.style.padding.max(0).unsigned_abs();
        let mut ticks = GraphTicks::new(TickStepType::Time);
        ticks.set_range(
            0.0,
            self.range(true),
            self.drawable_width.saturating_add(padding),
        );

        // Finest level first so stronger ticks land on top
        for level in (0..ticks.num_levels()).rev() {
            let color = self
                .style
                .grid_color
                .gamma_multiply(ticks.level_strength(level));
            for time in ticks.ticks(level) {
                self.draw_frame_marker(canvas, time, color, false);
            }
        }

        self.draw_center_line(canvas);

        for (curve_idx, curve) in self.curves.iter().enumerate() {
            self.draw_curve(canvas, curve, unique_color(curve_idx));

            for (key_idx, key) in curve.keyframes().iter().enumerate() {
                let selected = self.is_selected(KeyframeRef::new(curve_idx, key_idx));
                self.draw_keyframe(canvas, key, selected);

                if selected {
                    self.draw_tangents(canvas, key, curve.tangent_mode(key_idx));
                }
            }
        }

        if let Some(frame) = self.marked_frame {
            self.draw_frame_marker(
                canvas,
                self.time_for_frame(frame),
                self.style.highlight_color,
                true,
            );
        }

        tracing::debug!(
            "Rebuilt curve drawing: {} curves, {} tick levels, {}x{}px",
            self.curves.len(),
            ticks.num_levels(),
            self.width,
            self.height
        );
    }

    fn draw_frame_marker(
        &self,
        canvas: &mut impl Canvas,
        time: f32,
        color: Color32,
        on_top: bool,
    ) {
        let x = self.time_to_x(time);
        let depth = if on_top {
            self.style.marker_depth
        } else {
            self.style.background_depth
        };

        canvas.draw_line(
            PixelPos::new(x, 0),
            PixelPos::new(x, self.height_px()),
            color,
            depth,
        );
    }

    fn draw_center_line(&self, canvas: &mut impl Canvas) {
        let y = self.height_px() / 2;
        canvas.draw_line(
            PixelPos::new(0, y),
            PixelPos::new(self.width_px(), y),
            self.style.grid_color,
            self.style.background_depth,
        );
    }

    fn draw_diamond(
        &self,
        canvas: &mut impl Canvas,
        center: PixelPos,
        size: i32,
        inner: Color32,
        outer: Color32,
    ) {
        let a = center - PixelPos::new(size, 0);
        let b = center - PixelPos::new(0, size);
        let c = center + PixelPos::new(size, 0);
        let d = center + PixelPos::new(0, size);

        canvas.draw_triangle_strip(&[b, c, a, d], inner, self.style.diamond_fill_depth);
        canvas.draw_poly_line(&[a, b, c, d, a], outer, self.style.diamond_outline_depth);
    }

    fn draw_keyframe(&self, canvas: &mut impl Canvas, key: &Keyframe, selected: bool) {
        let center = self.curve_to_pixel_space(key.time, key.value);
        let outline = if selected {
            self.style.highlight_color
        } else {
            self.style.outline_color
        };

        self.draw_diamond(
            canvas,
            center,
            self.style.keyframe_size,
            self.style.keyframe_fill_color,
            outline,
        );
    }

    fn draw_tangents(&self, canvas: &mut impl Canvas, key: &Keyframe, mode: TangentMode) {
        let center = self.curve_to_pixel_space(key.time, key.value);

        for tangent_type in [TangentType::In, TangentType::Out] {
            if !mode.is_displayed(tangent_type) {
                continue;
            }

            let handle = self.tangent_position(key, tangent_type);
            canvas.draw_line(
                center,
                handle,
                self.style.tangent_line_color,
                self.style.background_depth,
            );
            self.draw_diamond(
                canvas,
                handle,
                self.style.tangent_handle_size,
                self.style.handle_color,
                self.style.outline_color,
            );
        }
    }

    /// Rasterize one curve: a flat lead-in up to the first keyframe, a
    /// poly-line through the keyframe span and a flat lead-out to the right
    /// edge.
    fn draw_curve(&self, canvas: &mut impl Canvas, curve: &EditorCurve, color: Color32) {
        let keys = curve.keyframes();
        let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
            return;
        };

        let range = self.range(false);
        let length_per_pixel = range / self.drawable_width as f32;
        let pixels_per_value = self.height as f32 / self.y_range;
        let height_offset = self.height_px() / 2;
        let padding = self.style.padding;
        let split = self.style.line_split_width.max(1);
        let depth = self.style.background_depth;

        // Canvas y grows downwards
        let to_y = |value: f32| height_offset.saturating_sub(to_pixel(value * pixels_per_value));
        let to_column = |time: f32| to_pixel(time.clamp(0.0, range) / length_per_pixel);
        let to_point = |column: i32, y: i32| PixelPos::new(padding.saturating_add(column), y);

        let y = to_y(curve.evaluate(0.0, false));
        canvas.draw_line(
            PixelPos::new(0, y),
            to_point(to_column(first.time), y),
            self.style.extension_color,
            depth,
        );

        let mut points = Vec::new();
        for pair in keys.windows(2) {
            let (lhs, rhs) = (&pair[0], &pair[1]);

            let start = lhs.time.clamp(0.0, range);
            let end = rhs.time.clamp(0.0, range);
            let start_pixel = to_column(start);
            let end_pixel = to_column(end);

            // Sampling would round the step off into a slope
            if lhs.is_step_out() || rhs.is_step_in() {
                let y_start = to_y(curve.evaluate(start, false));
                points.push(to_point(start_pixel, y_start));
                points.push(to_point(end_pixel, y_start));

                let y_end = to_y(curve.evaluate(end, false));
                points.push(to_point(end_pixel, y_end));
                continue;
            }

            let (num_splits, time_increment) = if start_pixel != end_pixel {
                let splits = (end_pixel - start_pixel) as f32 / split as f32;
                let whole = splits.floor();
                let remainder = splits - whole;

                (
                    whole as i32 + remainder.ceil() as i32 + 1,
                    (end - start) / splits,
                )
            } else {
                (1, 0.0)
            };

            for j in 0..num_splits {
                let x = start_pixel.saturating_add(j.saturating_mul(split)).min(end_pixel);
                let t = (start + j as f32 * time_increment).min(end);
                points.push(to_point(x, to_y(curve.evaluate(t, false))));
            }
        }

        canvas.draw_poly_line(&points, color, depth);

        let y = to_y(curve.evaluate(range, false));
        canvas.draw_line(
            to_point(to_column(last.time), y),
            PixelPos::new(self.width_px(), y),
            self.style.extension_color,
            depth,
        );
    }
}
