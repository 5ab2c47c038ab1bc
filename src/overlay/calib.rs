use serde::{Deserialize, Serialize};

pub const MIN_EXTENT: f32 = 0.05;

/// Normalized sub-rectangle of the canvas the graph bounds are mapped onto.
/// All four fields are fractions of the canvas size in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Default for CalibrationRect {
    fn default() -> Self {
        Self {
            x: 0.07,
            y: 0.08,
            w: 0.86,
            h: 0.84,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Handle {
    pub const ALL: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomRight,
        Handle::BottomLeft,
    ];
}

impl CalibrationRect {
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Re-establish the invariants on values loaded from disk, where the
    /// session file may have been edited by hand.
    pub fn sanitized(self) -> Self {
        if !(self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()) {
            return Self::default();
        }

        let w = self.w.clamp(MIN_EXTENT, 1.0);
        let h = self.h.clamp(MIN_EXTENT, 1.0);
        Self {
            x: self.x.clamp(0.0, 1.0 - w),
            y: self.y.clamp(0.0, 1.0 - h),
            w,
            h,
        }
    }

    /// Resize by dragging one corner to the given normalized pointer
    /// position, computed from `self` as the anchor snapshot. The anchor's
    /// opposite corner stays fixed; when the pointer would collapse the
    /// rectangle below `MIN_EXTENT`, the dragged coordinate yields.
    pub fn resized(&self, handle: Handle, pointer_x: f32, pointer_y: f32) -> Self {
        let px = pointer_x.clamp(0.0, 1.0);
        let py = pointer_y.clamp(0.0, 1.0);
        let right = self.right();
        let bottom = self.bottom();
        let mut next = *self;

        match handle {
            Handle::TopLeft => {
                next.w = right - px;
                next.x = px;
                if next.w < MIN_EXTENT {
                    next.w = MIN_EXTENT;
                    next.x = right - MIN_EXTENT;
                }
                next.h = bottom - py;
                next.y = py;
                if next.h < MIN_EXTENT {
                    next.h = MIN_EXTENT;
                    next.y = bottom - MIN_EXTENT;
                }
            }
            Handle::TopRight => {
                next.w = (px - self.x).max(MIN_EXTENT);
                next.h = bottom - py;
                next.y = py;
                if next.h < MIN_EXTENT {
                    next.h = MIN_EXTENT;
                    next.y = bottom - MIN_EXTENT;
                }
            }
            Handle::BottomRight => {
                next.w = (px - self.x).max(MIN_EXTENT);
                next.h = (py - self.y).max(MIN_EXTENT);
            }
            Handle::BottomLeft => {
                next.w = right - px;
                next.x = px;
                if next.w < MIN_EXTENT {
                    next.w = MIN_EXTENT;
                    next.x = right - MIN_EXTENT;
                }
                next.h = (py - self.y).max(MIN_EXTENT);
            }
        }

        next
    }

    /// Move the whole rectangle by a normalized delta, computed from `self`
    /// as the anchor snapshot. Size is preserved; the origin is clamped so
    /// the rectangle stays fully inside the unit square.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: (self.x + dx).clamp(0.0, 1.0 - self.w),
            y: (self.y + dy).clamp(0.0, 1.0 - self.h),
            w: self.w,
            h: self.h,
        }
    }

    #[cfg(test)]
    pub(crate) fn holds_invariants(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.w <= 1.0 + f32::EPSILON
            && self.y + self.h <= 1.0 + f32::EPSILON
            && self.w >= MIN_EXTENT
            && self.h >= MIN_EXTENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_left_drag_moves_origin_and_keeps_opposite_corner() {
        let anchor = CalibrationRect {
            x: 0.1,
            y: 0.1,
            w: 0.5,
            h: 0.5,
        };
        let next = anchor.resized(Handle::TopLeft, 0.3, 0.3);
        assert_eq!(
            next,
            CalibrationRect {
                x: 0.3,
                y: 0.3,
                w: 0.3,
                h: 0.3,
            }
        );
    }

    #[test]
    fn top_left_drag_past_opposite_corner_yields_to_min_size() {
        let anchor = CalibrationRect {
            x: 0.1,
            y: 0.1,
            w: 0.5,
            h: 0.5,
        };
        let next = anchor.resized(Handle::TopLeft, 0.9, 0.9);
        assert!((next.w - MIN_EXTENT).abs() < 1e-6);
        assert!((next.h - MIN_EXTENT).abs() < 1e-6);
        // Opposite corner stays pinned at the anchor's.
        assert!((next.right() - anchor.right()).abs() < 1e-6);
        assert!((next.bottom() - anchor.bottom()).abs() < 1e-6);
        assert!(next.holds_invariants());
    }

    #[test]
    fn bottom_right_drag_keeps_top_left_fixed() {
        let anchor = CalibrationRect {
            x: 0.2,
            y: 0.25,
            w: 0.4,
            h: 0.4,
        };
        let next = anchor.resized(Handle::BottomRight, 0.9, 0.8);
        assert_eq!(next.x, anchor.x);
        assert_eq!(next.y, anchor.y);
        assert!((next.w - 0.7).abs() < 1e-6);
        assert!((next.h - 0.55).abs() < 1e-6);
    }

    #[test]
    fn invariants_hold_after_any_corner_drag() {
        let anchor = CalibrationRect::default();
        let pointers = [
            (-0.5, -0.5),
            (0.0, 0.0),
            (0.5, 0.5),
            (1.0, 1.0),
            (1.5, 1.5),
            (0.05, 0.99),
            (0.99, 0.05),
        ];
        for handle in Handle::ALL {
            for (px, py) in pointers {
                let next = anchor.resized(handle, px, py);
                assert!(
                    next.holds_invariants(),
                    "{handle:?} at ({px}, {py}) produced {next:?}"
                );
            }
        }
    }

    #[test]
    fn invariants_hold_after_a_sequence_of_drags() {
        let mut rect = CalibrationRect::default();
        let gestures = [
            (Some(Handle::TopLeft), 0.4, 0.6),
            (None, 0.3, -0.2),
            (Some(Handle::BottomRight), 0.01, 0.02),
            (Some(Handle::TopRight), 1.4, 0.0),
            (None, -0.9, 0.9),
            (Some(Handle::BottomLeft), 0.97, 0.97),
        ];
        for (handle, px, py) in gestures {
            rect = match handle {
                Some(handle) => rect.resized(handle, px, py),
                None => rect.translated(px, py),
            };
            assert!(rect.holds_invariants(), "after {handle:?}: {rect:?}");
        }
    }

    #[test]
    fn translate_clamps_inside_unit_square() {
        let anchor = CalibrationRect {
            x: 0.1,
            y: 0.1,
            w: 0.5,
            h: 0.3,
        };
        let next = anchor.translated(5.0, -5.0);
        assert!((next.x - 0.5).abs() < 1e-6);
        assert_eq!(next.y, 0.0);
        assert_eq!(next.w, anchor.w);
        assert_eq!(next.h, anchor.h);
    }

    #[test]
    fn sanitized_recovers_from_garbage() {
        let broken = CalibrationRect {
            x: f32::NAN,
            y: 0.0,
            w: 0.5,
            h: 0.5,
        };
        assert_eq!(broken.sanitized(), CalibrationRect::default());

        let oversized = CalibrationRect {
            x: 0.9,
            y: 0.9,
            w: 0.8,
            h: 0.0,
        };
        assert!(oversized.sanitized().holds_invariants());
    }
}
