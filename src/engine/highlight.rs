use std::f32::consts::TAU;

const PULSE_FREQ: f32 = 0.52;

/// Re-ranks the frame's attraction candidates by distance to the cursor and
/// republishes the nearest ones into the pulse buffer. The buffer is sized
/// once at construction; stale slots past the draw range are neither drawn
/// nor zeroed.
pub struct HighlightRanker {
    pulse_positions: Vec<f32>,
    active: usize,
    cap: usize,
    pulse: f32,
}

impl HighlightRanker {
    pub fn new(cap: usize) -> Self {
        Self {
            pulse_positions: vec![0.0; cap * 3],
            active: 0,
            cap,
            pulse: 0.0,
        }
    }

    /// Sorts `candidates` ascending by distance and copies the current
    /// positions of the nearest `k = min(cap, len)` into the pulse buffer.
    /// All highlighted nodes share one pulse phase driven by `clock`.
    pub fn rank(&mut self, candidates: &mut Vec<(usize, f32)>, positions: &[f32], clock: f32) {
        candidates.sort_unstable_by(|a, b| a.1.total_cmp(&b.1));

        let node_count = positions.len() / 3;
        let k = candidates.len().min(self.cap).min(node_count);

        for (slot, &(index, _)) in candidates.iter().take(k).enumerate() {
            let source = index * 3;
            let destination = slot * 3;
            self.pulse_positions[destination] = positions[source];
            self.pulse_positions[destination + 1] = positions[source + 1];
            self.pulse_positions[destination + 2] = positions[source + 2];
        }

        self.active = k;
        self.pulse = 0.5 + 0.5 * (clock * PULSE_FREQ * TAU).sin();
    }

    /// Active draw range; slots past it hold stale data.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Shared pulse phase in [0, 1].
    pub fn pulse(&self) -> f32 {
        self.pulse
    }

    pub fn pulse_positions(&self) -> &[f32] {
        &self.pulse_positions
    }

    pub fn release(&mut self) {
        self.pulse_positions = Vec::new();
        self.active = 0;
    }
}
