use eframe::egui::{Pos2, Rect, pos2};

use super::calib::{CalibrationRect, Handle};

pub const HANDLE_TOLERANCE: f32 = 16.0;
pub const NODE_TOLERANCE: f32 = 12.0;

const AXIS_EPSILON: f64 = 1e-9;

/// Axis-aligned bounding box of the graph's node coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl GraphBounds {
    /// Non-finite coordinates are ignored; an empty input falls back to the
    /// unit box so the mapping stays well defined.
    pub fn of(points: impl Iterator<Item = (f64, f64)>) -> Self {
        let mut bounds: Option<GraphBounds> = None;
        for (x, y) in points {
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            let entry = bounds.get_or_insert(GraphBounds {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            });
            entry.min_x = entry.min_x.min(x);
            entry.min_y = entry.min_y.min(y);
            entry.max_x = entry.max_x.max(x);
            entry.max_y = entry.max_y.max(y);
        }

        bounds.unwrap_or(GraphBounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 1.0,
            max_y: 1.0,
        })
    }

    /// Normalize a graph-space coordinate into `[0, 1]²`. Degenerate axes
    /// (all nodes sharing one value) divide by a small epsilon instead of
    /// zero, collapsing that axis onto the rectangle's near edge.
    pub fn normalize(&self, x: f64, y: f64) -> (f32, f32) {
        let nx = (x - self.min_x) / (self.max_x - self.min_x).max(AXIS_EPSILON);
        let ny = (y - self.min_y) / (self.max_y - self.min_y).max(AXIS_EPSILON);
        (nx as f32, ny as f32)
    }
}

/// Affine map from graph space into the calibration sub-rectangle of the
/// canvas. Pure; recomputed every paint because the calibration and canvas
/// size may change between paints.
pub fn node_to_screen(
    x: f64,
    y: f64,
    canvas: Rect,
    bounds: &GraphBounds,
    calib: &CalibrationRect,
) -> Pos2 {
    let (nx, ny) = bounds.normalize(x, y);
    pos2(
        canvas.left() + (calib.x + nx * calib.w) * canvas.width(),
        canvas.top() + (calib.y + ny * calib.h) * canvas.height(),
    )
}

/// The calibration rectangle in screen pixels.
pub fn rect_px(canvas: Rect, calib: &CalibrationRect) -> Rect {
    Rect::from_min_size(
        pos2(
            canvas.left() + calib.x * canvas.width(),
            canvas.top() + calib.y * canvas.height(),
        ),
        canvas.size() * eframe::egui::vec2(calib.w, calib.h),
    )
}

pub fn handle_positions(canvas: Rect, calib: &CalibrationRect) -> [(Handle, Pos2); 4] {
    let r = rect_px(canvas, calib);
    [
        (Handle::TopLeft, r.left_top()),
        (Handle::TopRight, r.right_top()),
        (Handle::BottomRight, r.right_bottom()),
        (Handle::BottomLeft, r.left_bottom()),
    ]
}

/// Corner handle under the pointer, if any, within a fixed pixel tolerance.
/// The minimum-size invariant keeps corners apart, so test order is not
/// observable; it matches the drawing order anyway.
pub fn hit_handle(pointer: Pos2, canvas: Rect, calib: &CalibrationRect) -> Option<Handle> {
    handle_positions(canvas, calib)
        .into_iter()
        .find(|(_, corner)| {
            (pointer.x - corner.x).abs() <= HANDLE_TOLERANCE
                && (pointer.y - corner.y).abs() <= HANDLE_TOLERANCE
        })
        .map(|(handle, _)| handle)
}

/// Nearest node within `NODE_TOLERANCE` of the pointer. Linear scan; fine
/// for graphs up to low thousands of nodes. Strict `<` keeps the first
/// occurrence on exact distance ties.
pub fn hit_node(pointer: Pos2, screen_positions: &[Pos2]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, position) in screen_positions.iter().enumerate() {
        let distance = position.distance(pointer);
        if distance <= NODE_TOLERANCE && best.is_none_or(|(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}
