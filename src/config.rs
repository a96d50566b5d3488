use std::path::Path;

use anyhow::{Context, Result, bail};
use eframe::egui::Color32;
use serde::Deserialize;
use tracing::warn;

use crate::util::parse_hex_color;

const MAX_NODE_COUNT: usize = 5_000;
const MAX_BEAM_COUNT: usize = 16;

/// Tuning surface of the engine. Every field has a default so presets may be
/// partial; CLI flags win over preset values.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub node_count: usize,
    /// Camera orbit radius in world units.
    pub distance: f32,
    /// Radians advanced per frame.
    pub orbit_speed: f32,
    /// Ordered group palette, `#rrggbb` strings.
    pub palette: Vec<String>,
    pub disable_interaction: bool,
    /// Radius of the ellipsoidal volume nodes are scattered in.
    pub field_radius: f32,
    /// Cursor attraction radius; zero attraction at the boundary.
    pub react_radius: f32,
    /// Peak per-frame attraction displacement at zero distance.
    pub influence_strength: f32,
    pub beam_count: usize,
    pub highlight_cap: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            node_count: 300,
            distance: 22.0,
            orbit_speed: 0.0012,
            palette: vec![
                "#5aa2ff".to_owned(),
                "#8f7bff".to_owned(),
                "#3fd4c0".to_owned(),
                "#ff8a5c".to_owned(),
            ],
            disable_interaction: false,
            field_radius: 14.0,
            react_radius: 4.5,
            influence_strength: 0.05,
            beam_count: 3,
            highlight_cap: 140,
        }
    }
}

impl EngineConfig {
    pub fn load_preset(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read preset file {}", path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse preset file {}", path.display()))
    }

    pub fn palette_colors(&self) -> Result<Vec<Color32>> {
        if self.palette.is_empty() {
            bail!("palette must contain at least one color");
        }

        self.palette
            .iter()
            .map(|value| {
                parse_hex_color(value).with_context(|| format!("bad palette entry {value:?}"))
            })
            .collect()
    }

    /// Clamps out-of-range tuning values in place, warning about each one.
    pub fn normalize(&mut self) {
        if self.node_count > MAX_NODE_COUNT {
            warn!(requested = self.node_count, cap = MAX_NODE_COUNT, "clamping node_count");
            self.node_count = MAX_NODE_COUNT;
        }
        if self.beam_count > MAX_BEAM_COUNT {
            warn!(requested = self.beam_count, cap = MAX_BEAM_COUNT, "clamping beam_count");
            self.beam_count = MAX_BEAM_COUNT;
        }
        if !(self.distance > 0.0) {
            warn!(requested = self.distance, "distance must be positive, using default");
            self.distance = Self::default().distance;
        }
        if !(self.field_radius > 0.0) {
            warn!(requested = self.field_radius, "field_radius must be positive, using default");
            self.field_radius = Self::default().field_radius;
        }
        self.react_radius = self.react_radius.max(0.0);
        self.influence_strength = self.influence_strength.clamp(0.0, 1.0);
    }
}
