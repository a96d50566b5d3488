use std::f32::consts::TAU;

use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::engine::{EngineContext, Projected};

const BACKGROUND: Color32 = Color32::from_rgb(7, 9, 14);
/// World-space node radius before perspective scaling.
const NODE_RADIUS: f32 = 0.12;
const LINK_ALPHA: u8 = 52;
const GLOW_ALPHA: u8 = 14;

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

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn to_screen(rect: Rect, projected: Projected) -> Pos2 {
    Pos2::new(rect.left() + projected.x, rect.top() + projected.y)
}

pub(super) fn draw(painter: &Painter, rect: Rect, engine: &mut EngineContext) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    if !engine.take_dirty() {
        return;
    }

    let camera = engine.camera();
    let topology = engine.topology();

    // Link endpoints are read through node indices, so lines always track the
    // live positions.
    for link in &topology.links {
        let start = camera.project(engine.node_position(link.source));
        let end = camera.project(engine.node_position(link.target));
        let (Some(start), Some(end)) = (start, end) else {
            continue;
        };

        let color = engine.group_color(link.group);
        painter.line_segment(
            [to_screen(rect, start), to_screen(rect, end)],
            Stroke::new(1.0, with_alpha(color, LINK_ALPHA)),
        );
    }

    // Soft-glow pass underneath the node dots.
    for (index, position) in engine.glow_positions().chunks_exact(3).enumerate() {
        let world = glam::Vec3::new(position[0], position[1], position[2]);
        let Some(projected) = camera.project(world) else {
            continue;
        };
        let radius = (NODE_RADIUS * 3.4 * projected.scale).clamp(2.0, 16.0);
        painter.circle_filled(
            to_screen(rect, projected),
            radius,
            with_alpha(topology.colors[index], GLOW_ALPHA),
        );
    }

    for (index, position) in engine.node_positions().chunks_exact(3).enumerate() {
        let world = glam::Vec3::new(position[0], position[1], position[2]);
        let Some(projected) = camera.project(world) else {
            continue;
        };
        let radius = (NODE_RADIUS * projected.scale).clamp(0.8, 5.0);
        painter.circle_filled(to_screen(rect, projected), radius, topology.colors[index]);
    }

    draw_pulses(painter, rect, engine);
    draw_beams(painter, rect, engine);
}

fn draw_pulses(painter: &Painter, rect: Rect, engine: &EngineContext) {
    let highlight = engine.highlight();
    let pulse = highlight.pulse();
    let active = highlight.active();
    let color = Color32::from_rgb(208, 228, 255);
    let alpha = (70.0 + pulse * 150.0) as u8;

    let camera = engine.camera();
    for position in highlight.pulse_positions()[..active * 3].chunks_exact(3) {
        let world = glam::Vec3::new(position[0], position[1], position[2]);
        let Some(projected) = camera.project(world) else {
            continue;
        };
        let radius = (NODE_RADIUS * (1.6 + pulse * 1.2) * projected.scale).clamp(1.2, 9.0);
        painter.circle_filled(to_screen(rect, projected), radius, with_alpha(color, alpha));
    }
}

fn draw_beams(painter: &Painter, rect: Rect, engine: &EngineContext) {
    let camera = engine.camera();

    for (slot_index, slot) in engine.beams().slots().iter().enumerate() {
        if !slot.is_active() {
            continue;
        }

        let intensity = slot.intensity();
        let color = engine.group_color(slot.group());

        // Trail particles, oldest faintest, spread growing with depth.
        let trail_len = slot.trail().len();
        for (index, point) in slot.trail().enumerate() {
            let Some(projected) = camera.project(*point) else {
                continue;
            };
            let recency = (index + 1) as f32 / trail_len as f32;
            let depth = 1.0 - recency;

            let angle = (index as f32 * 0.618_034 + slot_index as f32 * 0.414_214) * TAU;
            let spread = depth * 0.26 * projected.scale;
            let center = to_screen(rect, projected)
                + eframe::egui::vec2(angle.cos() * spread, angle.sin() * spread);

            let radius = (NODE_RADIUS * 0.55 * projected.scale * (0.4 + 0.6 * recency))
                .clamp(0.3, 2.6);
            let alpha = (intensity * recency * 150.0) as u8;
            painter.circle_filled(center, radius, with_alpha(color, alpha));
        }

        let Some(projected) = camera.project(slot.position()) else {
            continue;
        };
        let center = to_screen(rect, projected);

        let glow_radius = (NODE_RADIUS * 3.0 * projected.scale).clamp(2.0, 14.0);
        painter.circle_filled(center, glow_radius, with_alpha(color, (intensity * 46.0) as u8));

        let core_radius = (NODE_RADIUS * 0.9 * projected.scale).clamp(0.8, 3.6);
        let core = blend_color(color, Color32::WHITE, 0.65);
        painter.circle_filled(center, core_radius, with_alpha(core, (intensity * 255.0) as u8));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_interpolates_between_endpoints() {
        let a = Color32::from_rgb(0, 0, 0);
        let b = Color32::from_rgb(200, 100, 50);
        assert_eq!(blend_color(a, b, 0.0), a);
        assert_eq!(blend_color(a, b, 1.0), b);

        let mid = blend_color(a, b, 0.5);
        assert_eq!(mid.r(), 100);
        assert_eq!(mid.g(), 50);
        assert_eq!(mid.b(), 25);
    }

    #[test]
    fn blend_clamps_out_of_range_amounts() {
        let a = Color32::from_rgb(10, 20, 30);
        let b = Color32::from_rgb(40, 50, 60);
        assert_eq!(blend_color(a, b, -1.0), a);
        assert_eq!(blend_color(a, b, 2.0), b);
    }
}
