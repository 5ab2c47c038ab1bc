use eframe::egui::{
    self, Align2, Color32, FontId, Rect, Sense, Shape, Stroke, StrokeKind, TextureOptions, Ui,
    pos2, vec2,
};

use crate::overlay::drag::InteractionMode;
use crate::overlay::mapping::{handle_positions, node_to_screen, rect_px};
use crate::util::truncate_middle;

use super::super::ViewModel;
use super::super::render_utils::{
    blend_color, draw_fallback_background, edge_stroke, node_fill, node_radius,
};

impl ViewModel {
    pub(in crate::app) fn draw_map(&mut self, ui: &mut Ui) {
        if self.background_texture.is_none()
            && let Some(image) = self.background.take()
        {
            self.background_texture =
                Some(ui.ctx()
                    .load_texture("background-map", image, TextureOptions::LINEAR));
        }

        let available = ui.available_size();
        let size = self
            .background_texture
            .as_ref()
            .map(|texture| {
                let tex = texture.size_vec2();
                let scale = (available.x / tex.x).min(available.y / tex.y);
                if scale.is_finite() && scale > 0.0 {
                    tex * scale
                } else {
                    available
                }
            })
            .unwrap_or(available);

        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
        if rect.width() < 1.0 || rect.height() < 1.0 {
            return;
        }

        let painter = ui.painter_at(rect);
        match &self.background_texture {
            Some(texture) => {
                painter.image(
                    texture.id(),
                    rect,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => draw_fallback_background(&painter, rect),
        }

        // Snapshots applied between paints map with the last painted rect.
        self.canvas = Some(rect);

        self.handle_calibration_drag(ui, rect, &response);

        self.screen_positions.clear();
        self.screen_positions.reserve(self.graph.nodes.len());
        for node in &self.graph.nodes {
            self.screen_positions.push(node_to_screen(
                node.x,
                node.y,
                rect,
                &self.bounds,
                &self.calib,
            ));
        }

        for edge in &self.graph.edges {
            let (Some(a), Some(b)) = (
                self.graph.node_index(&edge.a),
                self.graph.node_index(&edge.b),
            ) else {
                continue;
            };
            painter.line_segment(
                [self.screen_positions[a], self.screen_positions[b]],
                edge_stroke(edge.class),
            );
        }

        let search_matches = self.search_matches();
        let hovered = self.hovered_node(ui, rect);

        for (index, node) in self.graph.nodes.iter().enumerate() {
            let position = self.screen_positions[index];
            let radius = node_radius(node.kind);

            let selected = self.session.data.home.as_deref() == Some(node.id.as_str())
                || self.session.data.taxi_start.as_deref() == Some(node.id.as_str());
            if selected {
                painter.circle_filled(
                    position,
                    radius + 4.0,
                    Color32::from_rgba_unmultiplied(17, 24, 39, 64),
                );
            }

            let mut fill = node_fill(node.kind);
            if search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index))
            {
                fill = blend_color(fill, Color32::from_rgb(103, 196, 255), 0.68);
            }
            if hovered == Some(index) && self.mode == InteractionMode::Viewing {
                fill = blend_color(fill, Color32::WHITE, 0.3);
            }

            painter.circle_filled(position, radius, fill);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 23, 42, 40)),
            );
        }

        self.draw_taxi(ui, &painter);

        if self.mode == InteractionMode::Calibrating {
            self.draw_calibration_overlay(&painter, rect);
        } else if let Some(index) = hovered {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });

            let node = &self.graph.nodes[index];
            let caption = match self.graph.store_name(&node.id) {
                Some(name) => format!(
                    "{}  |  {}  |  {name}",
                    truncate_middle(&node.id, 28),
                    node.kind.label()
                ),
                None => format!("{}  |  {}", truncate_middle(&node.id, 28), node.kind.label()),
            };
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                caption,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );

            if response.clicked_by(egui::PointerButton::Primary) {
                self.select_node(index);
            }
        }
    }

    fn draw_taxi(&mut self, ui: &Ui, painter: &egui::Painter) {
        let now = ui.input(|input| input.time);

        let position = match self.anim {
            Some(anim) => {
                let position = anim.sample(now);
                if anim.finished(now) {
                    self.anim = None;
                } else {
                    ui.ctx().request_repaint();
                }
                Some(position)
            }
            None => {
                // An unknown taxi node is skipped, not an error.
                self.graph.node(&self.snapshot.taxi.node).map(|node| {
                    node_to_screen(
                        node.x,
                        node.y,
                        self.canvas.unwrap_or(painter.clip_rect()),
                        &self.bounds,
                        &self.calib,
                    )
                })
            }
        };

        let Some(position) = position else {
            return;
        };

        painter.circle_filled(
            position,
            12.0,
            Color32::from_rgba_unmultiplied(245, 158, 11, 50),
        );
        painter.circle_filled(
            position,
            7.0,
            Color32::from_rgba_unmultiplied(245, 158, 11, 242),
        );
        painter.circle_stroke(
            position,
            7.0,
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 23, 42, 46)),
        );
    }

    fn draw_calibration_overlay(&self, painter: &egui::Painter, canvas: Rect) {
        let outline = rect_px(canvas, &self.calib);
        let stroke = Stroke::new(2.0, Color32::from_rgba_unmultiplied(17, 24, 39, 204));

        let corners = [
            outline.left_top(),
            outline.right_top(),
            outline.right_bottom(),
            outline.left_bottom(),
            outline.left_top(),
        ];
        for pair in corners.windows(2) {
            painter.extend(Shape::dashed_line(pair, stroke, 6.0, 4.0));
        }

        for (_, corner) in handle_positions(canvas, &self.calib) {
            let handle_rect = Rect::from_center_size(corner, vec2(16.0, 16.0));
            painter.rect_filled(
                handle_rect,
                2.0,
                Color32::from_rgba_unmultiplied(255, 255, 255, 242),
            );
            painter.rect_stroke(
                handle_rect,
                2.0,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(17, 24, 39, 217)),
                StrokeKind::Middle,
            );
        }

        painter.text(
            outline.left_top() + vec2(8.0, -10.0),
            Align2::LEFT_BOTTOM,
            "Drag the corners to resize, or inside the rectangle to move it",
            FontId::proportional(12.0),
            Color32::from_rgba_unmultiplied(17, 24, 39, 230),
        );
    }
}
