mod beams;
mod camera;
mod cursor;
mod field;
mod graph;
mod highlight;

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::EngineConfig;

pub use beams::{BeamPool, BeamSlot};
pub use camera::{OrbitCamera, Projected};
pub use graph::{GraphTopology, Link};
pub use highlight::HighlightRanker;

use cursor::CursorProjector;
use field::SpatialField;

/// Host-provided per-frame input. The engine never reads wall time or the
/// event queue itself; the pointer cell is written by the host and read here
/// once at the top of each tick.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    /// Monotonic seconds since mount.
    pub now: f64,
    /// Pointer position in viewport pixels, if any.
    pub pointer: Option<(f32, f32)>,
}

/// The whole simulation behind one explicit lifecycle: construct on mount,
/// `tick` once per frame, `dispose` exactly once on teardown. All per-frame
/// phases run strictly in sequence inside `tick`; ordering, not locking, is
/// the correctness mechanism.
pub struct EngineContext {
    running: bool,
    disposed: bool,
    interaction_enabled: bool,
    react_radius: f32,
    influence_strength: f32,
    topology: GraphTopology,
    palette: Vec<eframe::egui::Color32>,
    field: SpatialField,
    camera: OrbitCamera,
    cursor: CursorProjector,
    highlight: HighlightRanker,
    beams: BeamPool,
    /// Scratch `(node, distance)` list reused across frames.
    candidates: Vec<(usize, f32)>,
    buffers_dirty: bool,
    rng: StdRng,
}

impl EngineContext {
    pub fn new(config: &EngineConfig, palette: &[eframe::egui::Color32]) -> Self {
        Self::build(config, palette, StdRng::from_entropy())
    }

    fn build(config: &EngineConfig, palette: &[eframe::egui::Color32], mut rng: StdRng) -> Self {
        let topology = graph::generate(config.node_count, palette, &mut rng);
        let field = SpatialField::new(config.node_count, config.field_radius, &mut rng);
        let beams = BeamPool::new(config.beam_count, 0.0, &mut rng);

        info!(
            nodes = topology.node_count(),
            links = topology.links.len(),
            beams = config.beam_count,
            interaction = !config.disable_interaction,
            "engine mounted"
        );

        Self {
            running: true,
            disposed: false,
            interaction_enabled: !config.disable_interaction,
            react_radius: config.react_radius,
            influence_strength: config.influence_strength,
            topology,
            palette: palette.to_vec(),
            field,
            camera: OrbitCamera::new(config.distance, config.orbit_speed),
            cursor: CursorProjector::new(!config.disable_interaction),
            highlight: HighlightRanker::new(config.highlight_cap),
            beams,
            candidates: Vec::new(),
            buffers_dirty: false,
            rng,
        }
    }

    /// Recomputes aspect ratio and viewport size. No-op once disposed, so a
    /// late resize event cannot touch released state.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if !self.running {
            return;
        }
        debug!(width, height, "viewport resized");
        self.camera.set_viewport(width, height);
    }

    /// One frame: advance the camera orbit, reproject the cursor, run the
    /// spatial field, re-rank highlights, advance every beam slot.
    pub fn tick(&mut self, input: FrameInput) {
        if !self.running {
            return;
        }

        self.camera.advance();

        if self.interaction_enabled {
            match input.pointer {
                Some((x, y)) => {
                    let viewport = self.camera.viewport();
                    self.cursor.set_pointer(x, y, viewport);
                }
                None => self.cursor.clear_pointer(),
            }
        }
        let cursor_world = self.cursor.project(&self.camera);

        let clock = input.now as f32;
        self.field.advance(
            clock,
            cursor_world,
            self.react_radius,
            self.influence_strength,
            &mut self.candidates,
        );
        self.highlight
            .rank(&mut self.candidates, self.field.positions(), clock);
        self.beams.update(
            input.now,
            self.field.positions(),
            &self.topology.links,
            &mut self.rng,
        );

        self.buffers_dirty = true;
    }

    /// Tears the engine down, exactly once. Order matters: stop the loop
    /// first so an already-queued frame finds `tick` inert, then clear input
    /// state, then release the buffers. A second call is a no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.running = false;
        self.cursor.clear_pointer();
        self.field.release();
        self.highlight.release();
        self.beams.release();
        self.candidates = Vec::new();
        self.disposed = true;
        info!("engine disposed");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True when this frame produced new buffer contents; reading it clears
    /// the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.buffers_dirty)
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn topology(&self) -> &GraphTopology {
        &self.topology
    }

    pub fn node_positions(&self) -> &[f32] {
        self.field.positions()
    }

    pub fn glow_positions(&self) -> &[f32] {
        self.field.glow()
    }

    pub fn node_position(&self, index: usize) -> Vec3 {
        self.field.position(index)
    }

    pub fn group_color(&self, group: usize) -> eframe::egui::Color32 {
        self.palette
            .get(group)
            .copied()
            .unwrap_or(eframe::egui::Color32::WHITE)
    }

    pub fn highlight(&self) -> &HighlightRanker {
        &self.highlight
    }

    pub fn beams(&self) -> &BeamPool {
        &self.beams
    }

    pub fn cursor_world(&self) -> Option<Vec3> {
        self.cursor.world_point()
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn test_engine(config: &EngineConfig) -> EngineContext {
        let palette = [
            Color32::from_rgb(90, 162, 255),
            Color32::from_rgb(143, 123, 255),
        ];
        EngineContext::build(config, &palette, StdRng::seed_from_u64(99))
    }

    fn run_frames(engine: &mut EngineContext, frames: usize, pointer: Option<(f32, f32)>) {
        for frame in 0..frames {
            engine.tick(FrameInput {
                now: frame as f64 / 60.0,
                pointer,
            });
        }
    }

    #[test]
    fn tick_marks_buffers_dirty_and_take_clears_it() {
        let mut engine = test_engine(&EngineConfig::default());
        engine.set_viewport(800.0, 600.0);

        engine.tick(FrameInput {
            now: 0.0,
            pointer: None,
        });
        assert!(engine.take_dirty());
        assert!(!engine.take_dirty());
    }

    #[test]
    fn pointer_attraction_feeds_the_highlight_ranker() {
        let config = EngineConfig {
            node_count: 400,
            react_radius: 12.0,
            ..EngineConfig::default()
        };
        let mut engine = test_engine(&config);
        engine.set_viewport(800.0, 600.0);

        run_frames(&mut engine, 30, Some((400.0, 300.0)));

        assert!(engine.highlight().active() > 0);
        assert!(engine.highlight().active() <= config.highlight_cap);
    }

    #[test]
    fn disabled_interaction_never_highlights() {
        let config = EngineConfig {
            node_count: 400,
            react_radius: 12.0,
            disable_interaction: true,
            ..EngineConfig::default()
        };
        let mut engine = test_engine(&config);
        engine.set_viewport(800.0, 600.0);

        run_frames(&mut engine, 60, Some((400.0, 300.0)));

        assert_eq!(engine.highlight().active(), 0);
        assert!(engine.cursor_world().is_none());
    }

    #[test]
    fn beams_eventually_spawn_and_stay_bounded() {
        let mut engine = test_engine(&EngineConfig::default());
        engine.set_viewport(800.0, 600.0);

        let mut saw_active = false;
        for frame in 0..1_200 {
            engine.tick(FrameInput {
                now: frame as f64 / 60.0,
                pointer: None,
            });
            let active = engine.beams().active_count();
            saw_active |= active > 0;
            assert!(active <= EngineConfig::default().beam_count);
        }
        assert!(saw_active);
    }

    #[test]
    fn dispose_is_idempotent_and_makes_the_engine_inert() {
        let mut engine = test_engine(&EngineConfig::default());
        engine.set_viewport(800.0, 600.0);
        run_frames(&mut engine, 5, None);

        engine.dispose();
        engine.dispose();

        assert!(!engine.is_running());
        assert!(engine.node_positions().is_empty());

        // A queued frame or late resize after teardown must be a no-op.
        engine.tick(FrameInput {
            now: 10.0,
            pointer: Some((10.0, 10.0)),
        });
        engine.set_viewport(1024.0, 768.0);
        assert!(!engine.take_dirty());
        assert_eq!(engine.highlight().active(), 0);
    }

    #[test]
    fn single_node_engine_runs_without_attraction_errors() {
        let config = EngineConfig {
            node_count: 1,
            disable_interaction: true,
            ..EngineConfig::default()
        };
        let mut engine = test_engine(&config);
        engine.set_viewport(800.0, 600.0);

        run_frames(&mut engine, 120, None);

        assert_eq!(engine.topology().node_count(), 1);
        assert!(engine.topology().links.is_empty());
        assert!(engine.node_position(0).is_finite());
        assert_eq!(engine.beams().active_count(), 0);
    }

    #[test]
    fn zero_node_engine_is_stable() {
        let config = EngineConfig {
            node_count: 0,
            ..EngineConfig::default()
        };
        let mut engine = test_engine(&config);
        run_frames(&mut engine, 10, Some((1.0, 1.0)));
        assert_eq!(engine.highlight().active(), 0);
    }
}
