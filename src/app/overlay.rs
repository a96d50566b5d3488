use eframe::egui::{Align2, Color32, Context, FontId, Painter, Rect, vec2};

use super::NeuralCanvasApp;

const FPS_SAMPLE_WINDOW: usize = 180;

impl NeuralCanvasApp {
    pub(super) fn update_fps_counter(&mut self, ctx: &Context) {
        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(super) fn draw_overlay(&self, painter: &Painter, rect: Rect) {
        if !self.show_fps {
            return;
        }

        let mut parts = vec![format!("FPS {:.0}", self.fps_current)];
        if !self.fps_samples.is_empty() {
            let average = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
            parts.push(format!("avg {average:.1}"));
        }
        if let Some(low) = self.fps_samples.iter().copied().reduce(f32::min) {
            parts.push(format!("low {low:.0}"));
        }

        let topology = self.engine.topology();
        parts.push(format!(
            "{} nodes / {} links / {} beams",
            topology.node_count(),
            topology.links.len(),
            self.engine.beams().active_count()
        ));

        painter.text(
            rect.left_top() + vec2(10.0, 10.0),
            Align2::LEFT_TOP,
            parts.join(" | "),
            FontId::proportional(12.0),
            Color32::from_gray(200),
        );
    }
}
