use glam::{Vec2, Vec3};

use super::camera::OrbitCamera;

/// Fraction of the remaining distance covered per frame.
const SMOOTHING: f32 = 0.45;
const PARALLEL_EPSILON: f32 = 1e-6;

/// Converts raw pointer pixels into a smoothed world-space point on the
/// `z = 0` plane. Inert when interaction is disabled.
pub struct CursorProjector {
    enabled: bool,
    ndc: Option<Vec2>,
    world: Option<Vec3>,
}

impl CursorProjector {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ndc: None,
            world: None,
        }
    }

    pub fn set_pointer(&mut self, pixel_x: f32, pixel_y: f32, viewport: Vec2) {
        if !self.enabled || viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }

        self.ndc = Some(Vec2::new(
            (pixel_x / viewport.x) * 2.0 - 1.0,
            1.0 - (pixel_y / viewport.y) * 2.0,
        ));
    }

    pub fn clear_pointer(&mut self) {
        self.ndc = None;
        self.world = None;
    }

    /// Casts the pointer ray onto the `z = 0` plane and smooths the hit point
    /// toward the previous one. Rays parallel to the plane clamp the ray
    /// parameter to zero instead of dividing by it.
    pub fn project(&mut self, camera: &OrbitCamera) -> Option<Vec3> {
        if !self.enabled {
            return None;
        }
        let ndc = self.ndc?;

        let (origin, direction) = camera.ndc_ray(ndc);
        let target = origin + direction * plane_hit_parameter(origin, direction);

        let next = match self.world {
            Some(previous) => previous + (target - previous) * SMOOTHING,
            None => target,
        };
        self.world = Some(next);
        Some(next)
    }

    pub fn world_point(&self) -> Option<Vec3> {
        self.world
    }
}

/// Ray parameter of the `z = 0` plane hit, clamped to zero for rays parallel
/// to the plane or pointing away from it.
fn plane_hit_parameter(origin: Vec3, direction: Vec3) -> f32 {
    if direction.z.abs() < PARALLEL_EPSILON {
        0.0
    } else {
        (-origin.z / direction.z).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        let mut camera = OrbitCamera::new(24.0, 0.0);
        camera.set_viewport(800.0, 600.0);
        camera
    }

    #[test]
    fn disabled_projector_records_nothing() {
        let camera = camera();
        let mut cursor = CursorProjector::new(false);
        cursor.set_pointer(400.0, 300.0, camera.viewport());
        assert!(cursor.project(&camera).is_none());
        assert!(cursor.world_point().is_none());
    }

    #[test]
    fn projected_point_lies_on_the_depth_plane() {
        let camera = camera();
        let mut cursor = CursorProjector::new(true);
        cursor.set_pointer(400.0, 300.0, camera.viewport());

        let point = cursor.project(&camera).unwrap();
        assert!(point.z.abs() < 0.01, "z {}", point.z);
        assert!(point.is_finite());
    }

    #[test]
    fn smoothing_is_a_contraction_toward_a_held_target() {
        let camera = camera();
        let mut cursor = CursorProjector::new(true);

        // Seed the smoothed point away from the target, then hold the target.
        cursor.set_pointer(80.0, 60.0, camera.viewport());
        cursor.project(&camera);
        cursor.set_pointer(600.0, 450.0, camera.viewport());

        let target = {
            let mut fresh = CursorProjector::new(true);
            fresh.set_pointer(600.0, 450.0, camera.viewport());
            fresh.project(&camera).unwrap()
        };

        let mut previous_distance = f32::MAX;
        for _ in 0..64 {
            let point = cursor.project(&camera).unwrap();
            let target_distance = point.distance(target);
            assert!(
                target_distance < previous_distance || target_distance < 1e-3,
                "distance grew: {target_distance} vs {previous_distance}"
            );
            previous_distance = target_distance;
        }
        assert!(previous_distance < 1e-2, "failed to converge");
    }

    #[test]
    fn extreme_pointer_positions_stay_finite() {
        let camera = camera();
        let mut cursor = CursorProjector::new(true);
        for corner in [(0.0, 0.0), (800.0, 0.0), (0.0, 600.0), (800.0, 600.0)] {
            cursor.set_pointer(corner.0, corner.1, camera.viewport());
            let point = cursor.project(&camera).unwrap();
            assert!(point.is_finite(), "corner {corner:?} produced {point}");
        }
    }

    #[test]
    fn parallel_and_receding_rays_clamp_to_zero() {
        let origin = Vec3::new(0.0, 0.0, 5.0);
        assert_eq!(plane_hit_parameter(origin, Vec3::new(1.0, 0.0, 0.0)), 0.0);
        assert_eq!(plane_hit_parameter(origin, Vec3::new(0.0, 0.0, 1.0)), 0.0);
        assert!(plane_hit_parameter(origin, Vec3::new(0.0, 0.0, -1.0)) > 0.0);
    }
}
