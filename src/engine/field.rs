use glam::Vec3;
use rand::Rng;

/// Y extent of the scatter volume relative to X/Z.
const Y_COMPRESSION: f32 = 0.75;
/// Per-frame step applied to the breathing waves.
const WAVE_STEP: f32 = 0.011;
const WAVE_FREQ_A: f32 = 0.83;
const WAVE_FREQ_B: f32 = 0.61;
const AMPLITUDE_FREQ: f32 = 0.27;

/// Live positions of every node in a flat buffer (stride 3), plus the
/// per-node oscillation state driving the ambient "breathing" motion.
/// This is the hot path: `advance` runs once per node per frame and must not
/// allocate.
pub struct SpatialField {
    positions: Vec<f32>,
    /// Mirror of `positions` consumed by the soft-glow draw pass.
    glow: Vec<f32>,
    phase_a: Vec<f32>,
    phase_b: Vec<f32>,
    amplitude: Vec<f32>,
}

impl SpatialField {
    pub fn new(node_count: usize, radius: f32, rng: &mut impl Rng) -> Self {
        let mut positions = Vec::with_capacity(node_count * 3);
        let mut phase_a = Vec::with_capacity(node_count);
        let mut phase_b = Vec::with_capacity(node_count);
        let mut amplitude = Vec::with_capacity(node_count);

        for _ in 0..node_count {
            let point = random_unit_ball_point(rng);
            positions.push(point.x * radius);
            positions.push(point.y * radius * Y_COMPRESSION);
            positions.push(point.z * radius);
            phase_a.push(rng.gen_range(0.0..std::f32::consts::TAU));
            phase_b.push(rng.gen_range(0.0..std::f32::consts::TAU));
            amplitude.push(rng.gen_range(0.5..1.0));
        }

        Self {
            glow: positions.clone(),
            positions,
            phase_a,
            phase_b,
            amplitude,
        }
    }

    pub fn node_count(&self) -> usize {
        self.phase_a.len()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn glow(&self) -> &[f32] {
        &self.glow
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * 3;
        Vec3::new(
            self.positions[base],
            self.positions[base + 1],
            self.positions[base + 2],
        )
    }

    /// One simulation step: ambient breathing for every node, plus
    /// linear-falloff attraction toward the cursor point. Nodes inside the
    /// reaction radius are pushed into `candidates` as `(index, distance)`.
    pub fn advance(
        &mut self,
        clock: f32,
        cursor: Option<Vec3>,
        react_radius: f32,
        strength: f32,
        candidates: &mut Vec<(usize, f32)>,
    ) {
        candidates.clear();

        let react_radius_sq = react_radius * react_radius;
        let inv_react_radius = if react_radius > f32::EPSILON {
            1.0 / react_radius
        } else {
            0.0
        };

        for index in 0..self.phase_a.len() {
            let base = index * 3;

            // Amplitude itself oscillates, giving a breathing look instead of
            // constant-amplitude jitter.
            let amplitude = self.amplitude[index]
                * (0.7 + 0.3 * (clock * AMPLITUDE_FREQ + self.phase_b[index]).sin());
            let wave_a = (clock * WAVE_FREQ_A + self.phase_a[index]).sin();
            let wave_b = (clock * WAVE_FREQ_B + self.phase_b[index]).cos();

            let mut x = self.positions[base] + wave_a * amplitude * WAVE_STEP;
            let mut y = self.positions[base + 1] + wave_b * amplitude * WAVE_STEP * 0.8;
            let mut z = self.positions[base + 2] + wave_a * wave_b * amplitude * WAVE_STEP * 0.5;

            if let Some(cursor) = cursor {
                let dx = cursor.x - x;
                let dy = cursor.y - y;
                let dz = cursor.z - z;
                let distance_sq = dx * dx + dy * dy + dz * dz;
                if distance_sq < react_radius_sq {
                    let distance = distance_sq.sqrt();
                    let pull = strength * (1.0 - distance * inv_react_radius);
                    if distance > 1e-4 {
                        let inv_distance = 1.0 / distance;
                        x += dx * inv_distance * pull;
                        y += dy * inv_distance * pull;
                        z += dz * inv_distance * pull;
                    }
                    candidates.push((index, distance));
                }
            }

            self.positions[base] = x;
            self.positions[base + 1] = y;
            self.positions[base + 2] = z;
        }

        self.glow.copy_from_slice(&self.positions);
    }

    pub fn release(&mut self) {
        self.positions = Vec::new();
        self.glow = Vec::new();
        self.phase_a = Vec::new();
        self.phase_b = Vec::new();
        self.amplitude = Vec::new();
    }
}

fn random_unit_ball_point(rng: &mut impl Rng) -> Vec3 {
    loop {
        let point = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if point.length_squared() <= 1.0 {
            return point;
        }
    }
}
