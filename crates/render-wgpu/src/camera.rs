use glam::{Mat4, Vec3};
use ringflow_render::RenderView;

/// Perspective camera orbiting a target point, with damped rotation.
///
/// Input adds to pending yaw/pitch/zoom; [`OrbitCamera::update`] applies a
/// `damping_factor` share of the pending motion each frame. Panning is not
/// supported: the target never moves.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub sensitivity: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl OrbitCamera {
    /// Camera at `(0, 0, camera_z)` looking down -Z, orbiting a point one
    /// unit ahead.
    pub fn new(camera_z: f32) -> Self {
        Self {
            target: Vec3::new(0.0, 0.0, camera_z - 1.0),
            distance: 1.0,
            yaw: 0.0,
            pitch: 0.0,
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            damping_factor: 0.25,
            min_distance: 1.0,
            max_distance: 10.0,
            sensitivity: 0.005,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 1.0,
        }
    }

    /// Queue a rotation from a mouse drag of `(dx, dy)` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.pending_yaw -= dx * self.sensitivity;
        self.pending_pitch += dy * self.sensitivity;
    }

    /// Queue a zoom. Positive `lines` moves toward the target.
    pub fn zoom(&mut self, lines: f32) {
        self.pending_zoom *= 0.95_f32.powf(lines);
    }

    /// Apply one frame of damped motion.
    pub fn update(&mut self) {
        let k = self.damping_factor;
        self.yaw += self.pending_yaw * k;
        self.pitch = (self.pitch + self.pending_pitch * k)
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
        self.pending_yaw *= 1.0 - k;
        self.pending_pitch *= 1.0 - k;

        let zoom_step = self.pending_zoom.powf(k);
        self.distance = (self.distance * zoom_step).clamp(self.min_distance, self.max_distance);
        self.pending_zoom /= zoom_step;
    }

    /// Eye position on the sphere around the target.
    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + offset * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn render_view(&self) -> RenderView {
        RenderView {
            eye: self.eye(),
            target: self.target,
            fov_degrees: self.fov.to_degrees(),
        }
    }
}
