use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::sim::{EdgeClass, NodeKind};

pub(super) fn node_fill(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Home => Color32::from_rgba_unmultiplied(34, 197, 94, 242),
        NodeKind::Store => Color32::from_rgba_unmultiplied(239, 68, 68, 242),
        NodeKind::TaxiStand => Color32::from_rgba_unmultiplied(251, 113, 133, 242),
        NodeKind::Generic => Color32::from_rgba_unmultiplied(148, 163, 184, 242),
    }
}

pub(super) fn node_radius(kind: NodeKind) -> f32 {
    match kind {
        NodeKind::Home | NodeKind::Store => 6.0,
        NodeKind::TaxiStand => 5.0,
        NodeKind::Generic => 3.2,
    }
}

pub(super) fn edge_stroke(class: EdgeClass) -> Stroke {
    match class {
        EdgeClass::Arterial => {
            Stroke::new(1.2, Color32::from_rgba_unmultiplied(59, 130, 246, 140))
        }
        EdgeClass::Local => Stroke::new(1.2, Color32::from_rgba_unmultiplied(148, 163, 184, 90)),
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// Flat substitute shown when the background image is unavailable.
pub(super) fn draw_fallback_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(24, 28, 35));

    let step = 48.0;
    let mut x = rect.left() + step;
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = rect.top() + step;
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}
