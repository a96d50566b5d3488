use glam::{Mat4, Vec2, Vec3};

const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
const NEAR: f32 = 0.1;
const FAR: f32 = 400.0;
const ELEVATION_FACTOR: f32 = 0.18;

/// A point projected into viewport space.
#[derive(Clone, Copy, Debug)]
pub struct Projected {
    /// Pixels from the viewport's top-left corner.
    pub x: f32,
    pub y: f32,
    /// Pixels per world unit at this depth; sizes drawn with it shrink with
    /// distance.
    pub scale: f32,
}

/// Slowly orbits the origin at a fixed radius, always looking at it.
pub struct OrbitCamera {
    angle: f32,
    distance: f32,
    orbit_speed: f32,
    viewport: Vec2,
    view_proj: Mat4,
    inverse_view_proj: Mat4,
}

impl OrbitCamera {
    pub fn new(distance: f32, orbit_speed: f32) -> Self {
        let mut camera = Self {
            angle: 0.0,
            distance: distance.max(NEAR * 2.0),
            orbit_speed,
            viewport: Vec2::new(1280.0, 800.0),
            view_proj: Mat4::IDENTITY,
            inverse_view_proj: Mat4::IDENTITY,
        };
        camera.refresh();
        camera
    }

    pub fn advance(&mut self) {
        self.angle = (self.angle + self.orbit_speed).rem_euclid(std::f32::consts::TAU);
        self.refresh();
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
        self.refresh();
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.angle.sin() * self.distance,
            self.distance * ELEVATION_FACTOR,
            self.angle.cos() * self.distance,
        )
    }

    fn refresh(&mut self) {
        let aspect = self.viewport.x / self.viewport.y;
        let projection = Mat4::perspective_rh(FOV_Y, aspect, NEAR, FAR);
        let view = Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y);
        self.view_proj = projection * view;
        self.inverse_view_proj = self.view_proj.inverse();
    }

    /// Projects a world point into viewport pixels. `None` when the point is
    /// at or behind the camera plane.
    pub fn project(&self, world: Vec3) -> Option<Projected> {
        let clip = self.view_proj * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        let half_height = self.viewport.y * 0.5;
        Some(Projected {
            x: (ndc.x + 1.0) * 0.5 * self.viewport.x,
            y: (1.0 - ndc.y) * 0.5 * self.viewport.y,
            scale: (half_height / (FOV_Y * 0.5).tan()) / clip.w,
        })
    }

    /// Ray from the camera eye through an NDC point.
    pub fn ndc_ray(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let near = self
            .inverse_view_proj
            .project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = self
            .inverse_view_proj
            .project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        (near, (far - near).normalize_or_zero())
    }
}
