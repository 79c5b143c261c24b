use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, pos2, vec2};

use crate::util::format_count;

use super::super::ViewModel;

const OVERLAY_MARGIN: f32 = 12.0;
const OVERLAY_PADDING: f32 = 10.0;
const CAPTION_WIDTH: f32 = 400.0;
const CAPTION_LINE_HEIGHT: f32 = 22.0;
const SWATCH_SIZE: f32 = 16.0;
const SWATCH_SPACING: f32 = 5.0;
const LEGEND_WIDTH: f32 = 150.0;
const LEGEND_TITLE_HEIGHT: f32 = 22.0;
const TOOLTIP_LINE_HEIGHT: f32 = 18.0;

fn overlay_fill() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 255, 255, 204)
}

fn overlay_stroke() -> Stroke {
    Stroke::new(1.0, Color32::from_rgba_unmultiplied(120, 126, 150, 90))
}

/// Shifts `box_rect` back inside `bounds` when it would spill past the right
/// or bottom edge.
fn keep_inside(box_rect: Rect, bounds: Rect) -> Rect {
    let mut shift = vec2(0.0, 0.0);
    if box_rect.right() > bounds.right() {
        shift.x = bounds.right() - box_rect.right();
    }
    if box_rect.bottom() > bounds.bottom() {
        shift.y = bounds.bottom() - box_rect.bottom();
    }
    let shifted = box_rect.translate(shift);
    shifted.translate(vec2(
        (bounds.left() - shifted.left()).max(0.0),
        (bounds.top() - shifted.top()).max(0.0),
    ))
}

impl ViewModel {
    pub(in crate::app) fn draw_caption(&self, painter: &Painter, rect: Rect) {
        let lines = self.chart.step.caption();
        let height = OVERLAY_PADDING * 2.0 + CAPTION_LINE_HEIGHT * lines.len() as f32;
        let box_rect = Rect::from_min_size(
            rect.left_top() + vec2(OVERLAY_MARGIN, OVERLAY_MARGIN),
            vec2(CAPTION_WIDTH.min(rect.width() - OVERLAY_MARGIN * 2.0), height),
        );

        painter.rect_filled(box_rect, 6.0, overlay_fill());
        painter.rect_stroke(box_rect, 6.0, overlay_stroke(), StrokeKind::Inside);

        for (line_index, line) in lines.iter().enumerate() {
            // First line is the headline.
            let font = if line_index == 0 {
                FontId::proportional(17.0)
            } else {
                FontId::proportional(14.0)
            };
            let offset = OVERLAY_PADDING + CAPTION_LINE_HEIGHT * line_index as f32;
            painter.text(
                box_rect.left_top() + vec2(OVERLAY_PADDING, offset),
                Align2::LEFT_TOP,
                *line,
                font,
                Color32::from_gray(30),
            );
        }
    }

    pub(in crate::app) fn draw_legend(&self, painter: &Painter, rect: Rect) {
        let entries = &self.legend.entries;
        if entries.is_empty() {
            return;
        }

        let row_height = SWATCH_SIZE + SWATCH_SPACING;
        let height = OVERLAY_PADDING * 2.0
            + LEGEND_TITLE_HEIGHT
            + row_height * entries.len() as f32
            - SWATCH_SPACING;
        let box_rect = Rect::from_min_size(
            pos2(
                rect.right() - OVERLAY_MARGIN - LEGEND_WIDTH,
                rect.top() + OVERLAY_MARGIN,
            ),
            vec2(LEGEND_WIDTH, height),
        );

        painter.rect_filled(box_rect, 6.0, overlay_fill());
        painter.rect_stroke(box_rect, 6.0, overlay_stroke(), StrokeKind::Inside);
        painter.text(
            box_rect.left_top() + vec2(OVERLAY_PADDING, OVERLAY_PADDING),
            Align2::LEFT_TOP,
            self.legend.mode.label(),
            FontId::proportional(14.0),
            Color32::from_gray(20),
        );

        for (row, entry) in entries.iter().enumerate() {
            let top =
                box_rect.top() + OVERLAY_PADDING + LEGEND_TITLE_HEIGHT + row_height * row as f32;
            let swatch = Rect::from_min_size(
                pos2(box_rect.left() + OVERLAY_PADDING, top),
                vec2(SWATCH_SIZE, SWATCH_SIZE),
            );
            painter.rect_filled(swatch, 2.0, entry.color);
            painter.text(
                pos2(swatch.right() + 8.0, swatch.center().y),
                Align2::LEFT_CENTER,
                &entry.label,
                FontId::proportional(13.0),
                Color32::from_gray(30),
            );
        }
    }

    pub(in crate::app) fn draw_tooltip(
        &self,
        painter: &Painter,
        rect: Rect,
        anchor: Pos2,
        index: usize,
    ) {
        let Some(node) = self.graph.nodes.get(index) else {
            return;
        };
        let record = &node.record;

        let lines = [
            record.title.clone(),
            format!("Rating: {:.2}", record.score),
            format!("Members: {}", format_count(record.members)),
            format!("Genre: {}", node.primary_genre),
            format!("Year: {}", record.year),
        ];

        let font = FontId::proportional(13.0);
        let width = lines
            .iter()
            .map(|line| {
                painter
                    .layout_no_wrap(line.clone(), font.clone(), Color32::BLACK)
                    .size()
                    .x
            })
            .fold(0.0_f32, f32::max);
        let size = vec2(
            width + OVERLAY_PADDING * 2.0,
            TOOLTIP_LINE_HEIGHT * lines.len() as f32 + OVERLAY_PADDING * 2.0,
        );
        let box_rect = keep_inside(Rect::from_min_size(anchor, size), rect);

        painter.rect_filled(box_rect, 4.0, Color32::from_rgba_unmultiplied(255, 255, 255, 235));
        painter.rect_stroke(box_rect, 4.0, overlay_stroke(), StrokeKind::Inside);

        for (line_index, line) in lines.into_iter().enumerate() {
            let offset = OVERLAY_PADDING + TOOLTIP_LINE_HEIGHT * line_index as f32;
            painter.text(
                box_rect.left_top() + vec2(OVERLAY_PADDING, offset),
                Align2::LEFT_TOP,
                line,
                font.clone(),
                Color32::from_gray(25),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_box_is_pulled_back_inside_the_canvas() {
        let bounds = Rect::from_min_max(pos2(0.0, 0.0), pos2(400.0, 300.0));
        let spilled = Rect::from_min_size(pos2(350.0, 280.0), vec2(120.0, 60.0));

        let placed = keep_inside(spilled, bounds);
        assert_eq!(placed.size(), spilled.size());
        assert!(bounds.contains_rect(placed));
    }

    #[test]
    fn boxes_already_inside_are_untouched() {
        let bounds = Rect::from_min_max(pos2(0.0, 0.0), pos2(400.0, 300.0));
        let inside = Rect::from_min_size(pos2(20.0, 20.0), vec2(100.0, 50.0));
        assert_eq!(keep_inside(inside, bounds), inside);
    }
}
