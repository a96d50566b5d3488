use std::collections::VecDeque;
use std::time::Instant;

use eframe::egui::{self, Color32, Context, Sense, Vec2};

use crate::config::EngineConfig;
use crate::engine::{EngineContext, FrameInput};

mod overlay;
mod render;

/// eframe host for the engine: forwards pointer and viewport state, ticks the
/// simulation once per frame, and disposes it exactly once on exit.
pub struct NeuralCanvasApp {
    engine: EngineContext,
    interaction_enabled: bool,
    show_fps: bool,
    mounted_at: Instant,
    viewport: Vec2,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl NeuralCanvasApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: EngineConfig,
        palette: Vec<Color32>,
        show_fps: bool,
    ) -> Self {
        Self {
            engine: EngineContext::new(&config, &palette),
            interaction_enabled: !config.disable_interaction,
            show_fps,
            mounted_at: Instant::now(),
            viewport: Vec2::ZERO,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }
}

impl eframe::App for NeuralCanvasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.update_fps_counter(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), Sense::hover());
                let painter = ui.painter_at(rect);

                if rect.size() != self.viewport {
                    self.viewport = rect.size();
                    self.engine.set_viewport(rect.width(), rect.height());
                }

                // Single shared pointer cell: written by the host event pump,
                // read once here at the top of the frame.
                let pointer = if self.interaction_enabled {
                    response
                        .hover_pos()
                        .map(|pos| (pos.x - rect.left(), pos.y - rect.top()))
                } else {
                    None
                };

                self.engine.tick(FrameInput {
                    now: self.mounted_at.elapsed().as_secs_f64(),
                    pointer,
                });

                render::draw(&painter, rect, &mut self.engine);
                self.draw_overlay(&painter, rect);
            });

        if self.engine.is_running() {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.engine.dispose();
    }
}
