use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

pub(super) const CANVAS_BACKGROUND: Color32 = Color32::from_rgb(0xf6, 0xf7, 0xff);

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

/// Washes a color toward the canvas background.
pub(super) fn fade_color(color: Color32, amount: f32) -> Color32 {
    blend_color(color, CANVAS_BACKGROUND, amount)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, CANVAS_BACKGROUND);

    let step = (80.0 * zoom.clamp(0.6, 1.8)).max(24.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(180, 186, 214, 60));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

/// Area-proportional bubble radius.
pub(super) fn radius_for_members(members: u64) -> f32 {
    (members as f64).sqrt() as f32 / 100.0
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn screen_and_world_transforms_invert_each_other() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0));
        let pan = vec2(35.0, -20.0);
        let world = vec2(-120.0, 44.0);

        let screen = world_to_screen(rect, pan, 1.6, world);
        let back = screen_to_world(rect, pan, 1.6, screen);
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn radius_grows_with_the_square_root_of_members() {
        assert_eq!(radius_for_members(10_000), 1.0);
        assert_eq!(radius_for_members(40_000), 2.0);
        assert!(radius_for_members(2_600_000) > radius_for_members(2_500_000));
    }

    #[test]
    fn blend_endpoints_are_exact() {
        let a = Color32::from_rgb(10, 20, 30);
        let b = Color32::from_rgb(200, 100, 50);
        assert_eq!(blend_color(a, b, 0.0), a);
        assert_eq!(blend_color(a, b, 1.0), b);
        assert_eq!(blend_color(a, b, 7.0), b);
    }
}
