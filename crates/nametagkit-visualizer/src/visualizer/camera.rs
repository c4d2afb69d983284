//! Orbit camera around a Z-up scene.

use glam::{Mat4, Vec3};

/// Pitch limit that keeps the view from flipping over the poles
const PITCH_LIMIT_DEG: f32 = 89.0;
/// Pitch of a true isometric view
const ISOMETRIC_PITCH_DEG: f32 = 35.264;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,   // radians
    pub pitch: f32, // radians
    pub fov: f32,   // degrees
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 150.0,
            yaw: -90.0f32.to_radians(),
            pitch: 35.0f32.to_radians(),
            fov: 45.0,
            aspect_ratio: 4.0 / 3.0,
            near: 0.1,
            far: 2000.0,
            min_distance: 5.0,
            max_distance: 1000.0,
        }
    }
}

impl Camera {
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance,
            ..Default::default()
        }
    }

    pub fn update_aspect_ratio(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        let limit = PITCH_LIMIT_DEG.to_radians();
        self.pitch = (self.pitch + delta_pitch).clamp(-limit, limit);
    }

    /// Positive `delta` moves towards the target.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(self.min_distance, self.max_distance);
    }

    /// Shift the target in the screen plane; deltas are in pixels.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let (right, up) = self.screen_axes();
        let scale = self.distance * 0.001;
        self.target += up * delta_y * scale - right * delta_x * scale;
    }

    /// Unit vector from the target towards the eye.
    fn direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_pitch * cos_yaw, cos_pitch * sin_yaw, sin_pitch)
    }

    /// World up for `look_at`; +Y when looking straight along Z.
    fn up_vector(&self) -> Vec3 {
        if self.direction().cross(Vec3::Z).length_squared() < 1e-3 {
            Vec3::Y
        } else {
            Vec3::Z
        }
    }

    fn screen_axes(&self) -> (Vec3, Vec3) {
        let forward = -self.direction();
        let right = forward.cross(self.up_vector()).normalize();
        let up = right.cross(forward).normalize();
        (right, up)
    }

    pub fn eye_position(&self) -> Vec3 {
        self.target + self.direction() * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, self.up_vector())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_view(&mut self, yaw_deg: f32, pitch_deg: f32) {
        self.yaw = yaw_deg.to_radians();
        let limit = PITCH_LIMIT_DEG;
        self.pitch = pitch_deg.clamp(-limit, limit).to_radians();
    }

    pub fn set_isometric(&mut self) {
        self.yaw = -45.0f32.to_radians();
        self.pitch = ISOMETRIC_PITCH_DEG.to_radians();
    }

    /// Centre on the box and back off until it fills the view with a margin.
    pub fn fit_to_bounds(&mut self, min: Vec3, max: Vec3) {
        self.target = (min + max) * 0.5;
        let radius = (max - min).length() * 0.5;
        let half_fov = (self.fov.to_radians() * 0.5).min(
            ((self.fov.to_radians() * 0.5).tan() * self.aspect_ratio.min(1.0)).atan(),
        );
        let distance = radius * 1.1 / half_fov.sin();
        self.distance = distance.clamp(self.min_distance, self.max_distance);
    }
}
