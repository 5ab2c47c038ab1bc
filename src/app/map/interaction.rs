use eframe::egui::{self, CursorIcon, PointerButton, Rect, Ui};

use crate::overlay::drag::{DragKind, DragSession, InteractionMode};
use crate::overlay::mapping::{hit_handle, hit_node, rect_px};

use super::super::ViewModel;

impl ViewModel {
    /// Drive the drag state machine from the frame's pointer state. Only
    /// active in Calibrating mode; pointer moves while no session exists are
    /// no-ops.
    pub(in crate::app) fn handle_calibration_drag(
        &mut self,
        ui: &Ui,
        canvas: Rect,
        response: &egui::Response,
    ) {
        if self.mode != InteractionMode::Calibrating {
            return;
        }

        if self.drag.is_none()
            && response.drag_started_by(PointerButton::Primary)
            && let Some(pointer) = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos())
        {
            self.drag = DragSession::begin(pointer, canvas, self.calib);
        }

        if let Some(drag) = self.drag {
            if response.dragged_by(PointerButton::Primary)
                && let Some(pointer) = response.interact_pointer_pos()
            {
                self.calib = drag.apply(pointer, canvas);
            }

            if response.drag_stopped_by(PointerButton::Primary) {
                self.commit_drag();
            }

            ui.output_mut(|output| {
                output.cursor_icon = match drag.kind {
                    DragKind::Handle(_) => CursorIcon::Crosshair,
                    DragKind::Move => CursorIcon::Grabbing,
                };
            });
        } else if let Some(pointer) = response.hover_pos() {
            if hit_handle(pointer, canvas, &self.calib).is_some() {
                ui.output_mut(|output| output.cursor_icon = CursorIcon::Crosshair);
            } else if rect_px(canvas, &self.calib).contains(pointer) {
                ui.output_mut(|output| output.cursor_icon = CursorIcon::Grab);
            }
        }
    }

    pub(in crate::app) fn hovered_node(&self, ui: &Ui, canvas: Rect) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !canvas.contains(pointer) {
            return None;
        }
        hit_node(pointer, &self.screen_positions)
    }
}
