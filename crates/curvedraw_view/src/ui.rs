// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui widget showing a [`CurveDrawing`].

use crate::canvas::{DrawList, PixelPos};
use crate::drawing::CurveDrawing;
use curvedraw_curve::{KeyframeRef, TangentRef};
use egui::{Pos2, Rect, Sense};

/// Item under the pointer when the view was clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Picked {
    /// A keyframe
    Keyframe(KeyframeRef),
    /// A tangent handle of a selected keyframe
    Tangent(TangentRef),
}

/// Result of showing a [`CurveView`]
#[derive(Debug)]
pub struct CurveViewResponse {
    /// Response of the allocated element
    pub response: egui::Response,
    /// Curve-space `(time, value)` under the pointer
    pub hover: Option<(f32, f32)>,
    /// Item picked by a click this frame
    pub picked: Option<Picked>,
}

/// Curve drawing widget with a cached draw list
pub struct CurveView {
    drawing: CurveDrawing,
    draw_list: DrawList,
    dirty: bool,
}

impl CurveView {
    /// Wrap a drawing
    pub fn new(drawing: CurveDrawing) -> Self {
        Self {
            drawing,
            draw_list: DrawList::new(),
            dirty: true,
        }
    }

    /// The wrapped drawing
    pub fn drawing(&self) -> &CurveDrawing {
        &self.drawing
    }

    /// Mutable access to the drawing. Schedules a rebuild.
    pub fn drawing_mut(&mut self) -> &mut CurveDrawing {
        self.dirty = true;
        &mut self.drawing
    }

    /// Force a rebuild on the next refresh
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Cached primitives from the last rebuild
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Rebuild the cached draw list if anything changed
    pub fn refresh(&mut self) {
        if self.dirty {
            self.drawing.rebuild(&mut self.draw_list);
            self.dirty = false;
        }
    }

    /// Pick at an element-local pixel. Tangent handles take priority over
    /// keyframes. Picking a keyframe selects it; unless `additive`, the
    /// previous selection is cleared first.
    pub fn pick(&mut self, pixel: PixelPos, additive: bool) -> Option<Picked> {
        if let Some(tangent) = self.drawing.find_tangent(pixel) {
            tracing::debug!("Picked tangent {tangent:?}");
            return Some(Picked::Tangent(tangent));
        }

        let keyframe = self.drawing.find_keyframe(pixel);
        if !additive {
            self.drawing.clear_selected_keyframes();
            self.dirty = true;
        }

        let keyframe = keyframe?;
        tracing::debug!("Picked keyframe {keyframe:?}");
        self.drawing.select_keyframe(keyframe, true);
        self.dirty = true;
        Some(Picked::Keyframe(keyframe))
    }

    /// Allocate the element, handle clicks and paint
    pub fn show(&mut self, ui: &mut egui::Ui) -> CurveViewResponse {
        let size = egui::vec2(self.drawing.width() as f32, self.drawing.height() as f32);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        let hover = response
            .hover_pos()
            .and_then(|pos| self.drawing.pixel_to_curve_space(to_local(rect, pos)));

        let mut picked = None;
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let additive = ui.input(|i| i.modifiers.shift);
                picked = self.pick(to_local(rect, pos), additive);
            }
        }

        self.refresh();
        if ui.is_rect_visible(rect) {
            self.draw_list.paint(&ui.painter_at(rect), rect.min);
        }

        CurveViewResponse {
            response,
            hover,
            picked,
        }
    }
}

fn to_local(rect: Rect, pos: Pos2) -> PixelPos {
    let local = pos - rect.min;
    PixelPos::new(local.x.floor() as i32, local.y.floor() as i32)
}
