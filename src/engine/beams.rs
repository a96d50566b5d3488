use std::collections::VecDeque;

use glam::Vec3;
use rand::Rng;

use super::graph::Link;

pub const TRAIL_CAP: usize = 20;
const MIN_DURATION: f32 = 1.2;
const MAX_DURATION: f32 = 2.5;
const DURATION_PER_UNIT: f32 = 0.14;
const RESPAWN_MIN: f64 = 3.0;
const RESPAWN_MAX: f64 = 8.0;
const INITIAL_SPAWN_MIN: f64 = 0.4;
const INITIAL_SPAWN_MAX: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Active,
}

/// One reusable traveling-beam record. Slots cycle `Idle -> Active -> Idle`
/// for the lifetime of the pool; only their fields are overwritten.
pub struct BeamSlot {
    phase: Phase,
    next_spawn: f64,
    group: usize,
    start: Vec3,
    end: Vec3,
    spawned_at: f64,
    duration: f32,
    progress: f32,
    intensity: f32,
    trail: VecDeque<Vec3>,
}

impl BeamSlot {
    fn new(next_spawn: f64) -> Self {
        Self {
            phase: Phase::Idle,
            next_spawn,
            group: 0,
            start: Vec3::ZERO,
            end: Vec3::ZERO,
            spawned_at: 0.0,
            duration: MIN_DURATION,
            progress: 0.0,
            intensity: 0.0,
            trail: VecDeque::with_capacity(TRAIL_CAP),
        }
    }

    fn activate(&mut self, now: f64, positions: &[f32], links: &[Link], rng: &mut impl Rng) {
        let link = links[rng.gen_range(0..links.len())];
        let start = read_position(positions, link.source);
        let end = read_position(positions, link.target);

        self.phase = Phase::Active;
        self.group = link.group;
        // Endpoints are a snapshot; the beam does not chase moving nodes.
        self.start = start;
        self.end = end;
        self.spawned_at = now;
        self.duration = (start.distance(end) * DURATION_PER_UNIT).clamp(MIN_DURATION, MAX_DURATION);
        self.progress = 0.0;
        self.intensity = 0.0;
        self.trail.clear();
    }

    /// Returns true when the beam just finished its run.
    fn advance(&mut self, now: f64) -> bool {
        let elapsed = (now - self.spawned_at) as f32;
        self.progress = (elapsed / self.duration).clamp(0.0, 1.0);
        self.intensity = envelope(self.progress);

        if self.trail.len() == TRAIL_CAP {
            self.trail.pop_front();
        }
        self.trail.push_back(self.position());

        self.progress >= 1.0
    }

    fn retire(&mut self, now: f64, rng: &mut impl Rng) {
        self.phase = Phase::Idle;
        self.intensity = 0.0;
        self.progress = 0.0;
        self.trail.clear();
        self.next_spawn = now + rng.gen_range(RESPAWN_MIN..RESPAWN_MAX);
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn position(&self) -> Vec3 {
        self.start.lerp(self.end, self.progress)
    }

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Oldest-first history of interpolated positions.
    pub fn trail(&self) -> impl ExactSizeIterator<Item = &Vec3> {
        self.trail.iter()
    }
}

/// Fixed-size pool of beam slots. Nothing is allocated or freed after
/// construction; per-frame cost is bounded by the pool size.
pub struct BeamPool {
    slots: Vec<BeamSlot>,
}

impl BeamPool {
    pub fn new(count: usize, now: f64, rng: &mut impl Rng) -> Self {
        let slots = (0..count)
            .map(|_| BeamSlot::new(now + rng.gen_range(INITIAL_SPAWN_MIN..INITIAL_SPAWN_MAX)))
            .collect();
        Self { slots }
    }

    pub fn update(&mut self, now: f64, positions: &[f32], links: &[Link], rng: &mut impl Rng) {
        for slot in &mut self.slots {
            match slot.phase {
                Phase::Idle => {
                    if now >= slot.next_spawn && !links.is_empty() {
                        slot.activate(now, positions, links, rng);
                    }
                }
                Phase::Active => {
                    if slot.advance(now) {
                        slot.retire(now, rng);
                    }
                }
            }
        }
    }

    pub fn slots(&self) -> &[BeamSlot] {
        &self.slots
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_active()).count()
    }

    pub fn release(&mut self) {
        self.slots = Vec::new();
    }
}

/// Four-segment opacity envelope over progress: quick ramp-up, full peak,
/// slightly reduced sustain, linear ramp-down. Zero at both endpoints.
pub fn envelope(progress: f32) -> f32 {
    if progress <= 0.0 || progress >= 1.0 {
        0.0
    } else if progress < 0.05 {
        progress / 0.05
    } else if progress < 0.15 {
        1.0
    } else if progress < 0.85 {
        0.85
    } else {
        ((1.0 - progress) / 0.15) * 0.85
    }
}

fn read_position(positions: &[f32], index: usize) -> Vec3 {
    let base = index * 3;
    Vec3::new(positions[base], positions[base + 1], positions[base + 2])
}
