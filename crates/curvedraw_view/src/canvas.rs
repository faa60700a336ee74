// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drawing surface abstraction.
//!
//! The curve drawing emits primitives in element-local pixel coordinates
//! through [`Canvas`]. [`DrawList`] records them so they can be inspected,
//! serialized, or painted with egui.

use egui::epaint::Mesh;
use egui::{Color32, Pos2, Shape, Stroke};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::ops::{Add, Sub};

/// Depth used when a primitive has no particular layering needs.
/// Lower depths draw on top of higher ones.
pub const DEFAULT_DEPTH: u8 = 128;

/// Largest pixel coordinate produced from curve space. Far enough outside any
/// element to be clipped, small enough that offsets added to it cannot overflow.
/// A power of two so it converts to `f32` exactly.
pub const PIXEL_LIMIT: i32 = 1 << 29;

/// Truncate a scaled curve-space coordinate to a pixel, clamped to
/// `[-PIXEL_LIMIT, PIXEL_LIMIT]`. NaN maps to zero.
pub fn to_pixel(value: f32) -> i32 {
    let limit = PIXEL_LIMIT as f32;
    value.clamp(-limit, limit) as i32
}

/// Integer position in element-local pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPos {
    /// Horizontal offset from the left edge
    pub x: i32,
    /// Vertical offset from the top edge (grows downwards)
    pub y: i32,
}

impl PixelPos {
    /// Create a new pixel position
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position
    pub fn distance(self, other: Self) -> f32 {
        let dx = (i64::from(self.x) - i64::from(other.x)) as f32;
        let dy = (i64::from(self.y) - i64::from(other.y)) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Convert to an egui position relative to `origin`, on the pixel center
    pub fn to_pos2(self, origin: Pos2) -> Pos2 {
        Pos2::new(origin.x + self.x as f32 + 0.5, origin.y + self.y as f32 + 0.5)
    }
}

impl Add for PixelPos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for PixelPos {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// A surface that accepts 2D draw primitives
pub trait Canvas {
    /// Remove everything drawn so far
    fn clear(&mut self);

    /// Draw a one pixel wide line between two points
    fn draw_line(&mut self, a: PixelPos, b: PixelPos, color: Color32, depth: u8);

    /// Draw connected line segments through all points
    fn draw_poly_line(&mut self, points: &[PixelPos], color: Color32, depth: u8);

    /// Fill a triangle strip: every three consecutive points form a triangle
    fn draw_triangle_strip(&mut self, points: &[PixelPos], color: Color32, depth: u8);
}

/// A recorded draw primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Single line segment
    Line {
        /// Start point
        a: PixelPos,
        /// End point
        b: PixelPos,
        /// Line color
        color: Color32,
        /// Layer, lower is on top
        depth: u8,
    },
    /// Connected line segments
    PolyLine {
        /// Points in drawing order
        points: Vec<PixelPos>,
        /// Line color
        color: Color32,
        /// Layer, lower is on top
        depth: u8,
    },
    /// Filled triangle strip
    TriangleStrip {
        /// Strip vertices
        points: Vec<PixelPos>,
        /// Fill color
        color: Color32,
        /// Layer, lower is on top
        depth: u8,
    },
}

impl DrawCommand {
    /// Layer of this command
    pub fn depth(&self) -> u8 {
        match self {
            Self::Line { depth, .. }
            | Self::PolyLine { depth, .. }
            | Self::TriangleStrip { depth, .. } => *depth,
        }
    }

    /// Color of this command
    pub fn color(&self) -> Color32 {
        match self {
            Self::Line { color, .. }
            | Self::PolyLine { color, .. }
            | Self::TriangleStrip { color, .. } => *color,
        }
    }

    fn to_shape(&self, origin: Pos2) -> Shape {
        match self {
            Self::Line { a, b, color, .. } => Shape::line_segment(
                [a.to_pos2(origin), b.to_pos2(origin)],
                Stroke::new(1.0, *color),
            ),
            Self::PolyLine { points, color, .. } => Shape::line(
                points.iter().map(|p| p.to_pos2(origin)).collect(),
                Stroke::new(1.0, *color),
            ),
            Self::TriangleStrip { points, color, .. } => {
                let mut mesh = Mesh::default();
                for point in points {
                    mesh.colored_vertex(point.to_pos2(origin), *color);
                }
                for i in 2..points.len() as u32 {
                    mesh.add_triangle(i - 2, i - 1, i);
                }
                Shape::mesh(mesh)
            }
        }
    }
}

/// A canvas that records commands in submission order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Create an empty draw list
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in submission order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Convert to egui shapes, deepest layer first. Commands sharing a depth
    /// keep their submission order.
    pub fn to_shapes(&self, origin: Pos2) -> Vec<Shape> {
        let mut ordered: Vec<&DrawCommand> = self.commands.iter().collect();
        ordered.sort_by_key(|command| Reverse(command.depth()));
        ordered
            .into_iter()
            .map(|command| command.to_shape(origin))
            .collect()
    }

    /// Paint all commands with the element's top-left corner at `origin`
    pub fn paint(&self, painter: &egui::Painter, origin: Pos2) {
        painter.extend(self.to_shapes(origin));
    }
}

impl Canvas for DrawList {
    fn clear(&mut self) {
        self.commands.clear();
    }

    fn draw_line(&mut self, a: PixelPos, b: PixelPos, color: Color32, depth: u8) {
        self.commands.push(DrawCommand::Line { a, b, color, depth });
    }

    fn draw_poly_line(&mut self, points: &[PixelPos], color: Color32, depth: u8) {
        if points.len() < 2 {
            return;
        }
        self.commands.push(DrawCommand::PolyLine {
            points: points.to_vec(),
            color,
            depth,
        });
    }

    fn draw_triangle_strip(&mut self, points: &[PixelPos], color: Color32, depth: u8) {
        if points.len() < 3 {
            return;
        }
        self.commands.push(DrawCommand::TriangleStrip {
            points: points.to_vec(),
            color,
            depth,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::epaint::ColorMode;

    #[test]
    fn test_pixel_distance() {
        let a = PixelPos::new(0, 0);
        let b = PixelPos::new(3, 4);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b - a, b);
        assert_eq!(a + b, b);
    }

    #[test]
    fn test_extreme_coordinates() {
        assert_eq!(to_pixel(1e12), PIXEL_LIMIT);
        assert_eq!(to_pixel(-1e12), -PIXEL_LIMIT);
        assert_eq!(to_pixel(f32::NAN), 0);
        assert_eq!(to_pixel(-3.7), -3);

        let far = PixelPos::new(i32::MAX, i32::MIN);
        assert_eq!(far + PixelPos::new(1, -1), far);
        assert_eq!(far - PixelPos::new(-1, 1), far);
        assert!(far.distance(PixelPos::new(i32::MIN, i32::MAX)) > 4.0e9);
    }

    #[test]
    fn test_degenerate_primitives_dropped() {
        let mut list = DrawList::new();
        list.draw_poly_line(&[PixelPos::new(1, 1)], Color32::WHITE, DEFAULT_DEPTH);
        list.draw_triangle_strip(
            &[PixelPos::new(0, 0), PixelPos::new(1, 0)],
            Color32::WHITE,
            DEFAULT_DEPTH,
        );
        assert!(list.is_empty());

        list.draw_line(PixelPos::new(0, 0), PixelPos::new(4, 0), Color32::RED, 10);
        assert_eq!(list.len(), 1);
        assert_eq!(list.commands()[0].depth(), 10);
        assert_eq!(list.commands()[0].color(), Color32::RED);

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_shapes_ordered_by_depth() {
        let mut list = DrawList::new();
        list.draw_line(PixelPos::new(0, 0), PixelPos::new(1, 0), Color32::RED, 100);
        list.draw_line(PixelPos::new(0, 1), PixelPos::new(1, 1), Color32::GREEN, 128);
        list.draw_line(PixelPos::new(0, 2), PixelPos::new(1, 2), Color32::BLUE, 128);

        let shapes = list.to_shapes(Pos2::ZERO);
        let colors: Vec<Color32> = shapes
            .iter()
            .map(|shape| match shape {
                Shape::LineSegment { stroke, .. } => match stroke.color {
                    ColorMode::Solid(color) => color,
                    ColorMode::UV(_) => Color32::TRANSPARENT,
                },
                _ => Color32::TRANSPARENT,
            })
            .collect();

        // Deepest first, submission order within a depth
        assert_eq!(colors, vec![Color32::GREEN, Color32::BLUE, Color32::RED]);
    }

    #[test]
    fn test_json_dump() {
        let mut list = DrawList::new();
        list.draw_poly_line(
            &[PixelPos::new(0, 0), PixelPos::new(2, 3)],
            Color32::from_rgb(175, 55, 55),
            DEFAULT_DEPTH,
        );

        let json = serde_json::to_string(&list).unwrap();
        assert!(json.contains("PolyLine"));
        let loaded: DrawList = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, list);
    }

    #[test]
    fn test_triangle_strip_mesh() {
        let mut list = DrawList::new();
        let points = [
            PixelPos::new(0, -1),
            PixelPos::new(1, 0),
            PixelPos::new(-1, 0),
            PixelPos::new(0, 1),
        ];
        list.draw_triangle_strip(&points, Color32::WHITE, 101);

        let shapes = list.to_shapes(Pos2::new(10.0, 10.0));
        match &shapes[0] {
            Shape::Mesh(mesh) => {
                assert_eq!(mesh.vertices.len(), 4);
                assert_eq!(mesh.indices, vec![0, 1, 2, 1, 2, 3]);
                assert_eq!(mesh.vertices[0].pos, Pos2::new(10.5, 9.5));
            }
            other => panic!("expected a mesh, got {other:?}"),
        }
    }
}
