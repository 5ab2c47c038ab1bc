use eframe::egui::{Pos2, Rect};

use super::calib::{CalibrationRect, Handle};
use super::mapping::{hit_handle, rect_px};

/// Gates whether pointer gestures edit the calibration or select nodes.
/// Consumed by both the hit-tester and the drag machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    Viewing,
    Calibrating,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    Handle(Handle),
    Move,
}

/// One in-flight calibration gesture. Holds the anchor snapshot taken at
/// pointer-down; every pointer-move recomputes the rectangle from that
/// snapshot, never from accumulated per-frame deltas.
#[derive(Clone, Copy, Debug)]
pub struct DragSession {
    pub kind: DragKind,
    anchor_pointer: Pos2,
    anchor_rect: CalibrationRect,
}

impl DragSession {
    /// Pointer-down in Calibrating mode: a handle wins over the rectangle
    /// interior; a press outside both starts nothing.
    pub fn begin(pointer: Pos2, canvas: Rect, calib: CalibrationRect) -> Option<Self> {
        let kind = if let Some(handle) = hit_handle(pointer, canvas, &calib) {
            DragKind::Handle(handle)
        } else if rect_px(canvas, &calib).contains(pointer) {
            DragKind::Move
        } else {
            return None;
        };

        Some(Self {
            kind,
            anchor_pointer: pointer,
            anchor_rect: calib,
        })
    }

    /// Rectangle for the current pointer position, recomputed from the
    /// anchor. Zero pointer movement returns the anchor rect unchanged.
    pub fn apply(&self, pointer: Pos2, canvas: Rect) -> CalibrationRect {
        if pointer == self.anchor_pointer {
            return self.anchor_rect;
        }

        match self.kind {
            DragKind::Handle(handle) => self.anchor_rect.resized(
                handle,
                (pointer.x - canvas.left()) / canvas.width(),
                (pointer.y - canvas.top()) / canvas.height(),
            ),
            DragKind::Move => {
                let delta = pointer - self.anchor_pointer;
                self.anchor_rect
                    .translated(delta.x / canvas.width(), delta.y / canvas.height())
            }
        }
    }

    /// The last committed value, standing if this drag is discarded.
    pub fn committed(&self) -> CalibrationRect {
        self.anchor_rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn canvas() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(1000.0, 1000.0))
    }

    fn calib() -> CalibrationRect {
        CalibrationRect {
            x: 0.1,
            y: 0.1,
            w: 0.5,
            h: 0.5,
        }
    }

    #[test]
    fn begin_picks_handle_over_interior() {
        let session = DragSession::begin(pos2(100.0, 100.0), canvas(), calib())
            .expect("press on the tl corner starts a drag");
        assert_eq!(session.kind, DragKind::Handle(Handle::TopLeft));

        let session = DragSession::begin(pos2(300.0, 300.0), canvas(), calib())
            .expect("press inside the rect starts a move");
        assert_eq!(session.kind, DragKind::Move);

        assert!(DragSession::begin(pos2(900.0, 900.0), canvas(), calib()).is_none());
    }

    #[test]
    fn handle_drag_recomputes_from_anchor_without_drift() {
        let session = DragSession::begin(pos2(100.0, 100.0), canvas(), calib()).unwrap();

        let once = session.apply(pos2(300.0, 300.0), canvas());
        let twice = session.apply(pos2(300.0, 300.0), canvas());
        assert_eq!(once, twice);

        assert!((once.x - 0.3).abs() < 1e-6);
        assert!((once.y - 0.3).abs() < 1e-6);
        assert!((once.w - 0.3).abs() < 1e-6);
        assert!((once.h - 0.3).abs() < 1e-6);
    }

    #[test]
    fn zero_movement_leaves_rect_unchanged() {
        // Press within tolerance but off the exact corner.
        let session = DragSession::begin(pos2(108.0, 95.0), canvas(), calib()).unwrap();
        assert_eq!(session.kind, DragKind::Handle(Handle::TopLeft));
        assert_eq!(session.apply(pos2(108.0, 95.0), canvas()), calib());
    }

    #[test]
    fn move_drag_translates_by_pointer_delta() {
        let session = DragSession::begin(pos2(300.0, 300.0), canvas(), calib()).unwrap();
        let moved = session.apply(pos2(400.0, 250.0), canvas());
        assert!((moved.x - 0.2).abs() < 1e-6);
        assert!((moved.y - 0.05).abs() < 1e-6);
        assert_eq!(moved.w, 0.5);
        assert_eq!(moved.h, 0.5);
    }

    #[test]
    fn discarding_a_drag_leaves_the_committed_value() {
        let session = DragSession::begin(pos2(300.0, 300.0), canvas(), calib()).unwrap();
        let _ = session.apply(pos2(700.0, 700.0), canvas());
        assert_eq!(session.committed(), calib());
    }
}
