use std::f32::consts::PI;

use glam::{Mat4, Vec3};

use crate::config::{CameraConfig, ControlsConfig};

const POLAR_EPS: f32 = 1e-6;

#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl PerspectiveCamera {
    pub fn new(cfg: &CameraConfig, aspect: f32) -> Self {
        Self {
            fov: cfg.fov,
            aspect,
            near: cfg.near,
            far: cfg.far,
            position: Vec3::from(cfg.position),
            target: Vec3::from(cfg.target),
        }
    }

    /// Zero-height viewports (minimised tabs) keep the previous aspect.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self { radius, theta: 0.0, phi: 0.0 };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let s = self.phi.sin() * self.radius;
        Vec3::new(s * self.theta.sin(), self.phi.cos() * self.radius, s * self.theta.cos())
    }
}

/// Orbit the camera around its target with damping, auto-rotation and dolly.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    cfg: ControlsConfig,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    dragging: bool,
}

impl OrbitControls {
    pub fn new(cfg: ControlsConfig) -> Self {
        Self {
            cfg,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            dragging: false,
        }
    }

    /// Auto-rotation step per update, tuned for 60 frames per second.
    pub fn auto_rotation_angle(&self) -> f32 {
        2.0 * PI / 60.0 / 60.0 * self.cfg.auto_rotate_speed
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Pointer movement in CSS pixels over an element `height` pixels tall.
    pub fn drag(&mut self, dx: f32, dy: f32, height: f32) {
        if height <= 0.0 {
            return;
        }
        let k = 2.0 * PI * self.cfg.rotate_speed / height;
        self.rotate_left(dx * k);
        self.rotate_up(dy * k);
    }

    /// Wheel input: negative `delta_y` (scroll up) moves closer.
    pub fn dolly(&mut self, delta_y: f32) {
        if !self.cfg.enable_zoom {
            return;
        }
        let step = 0.95_f32.powf(self.cfg.zoom_speed);
        if delta_y < 0.0 {
            self.scale *= step;
        } else if delta_y > 0.0 {
            self.scale /= step;
        }
    }

    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        let mut s = Spherical::from_offset(camera.position - camera.target);

        if self.cfg.auto_rotate && !self.dragging {
            self.rotate_left(self.auto_rotation_angle());
        }

        if self.cfg.enable_damping {
            s.theta += self.delta_theta * self.cfg.damping_factor;
            s.phi += self.delta_phi * self.cfg.damping_factor;
        } else {
            s.theta += self.delta_theta;
            s.phi += self.delta_phi;
        }
        s.phi = s.phi.clamp(POLAR_EPS, PI - POLAR_EPS);
        s.radius = (s.radius * self.scale).clamp(self.cfg.min_distance, self.cfg.max_distance);

        camera.position = camera.target + s.to_offset();

        if self.cfg.enable_damping {
            let decay = 1.0 - self.cfg.damping_factor;
            self.delta_theta *= decay;
            self.delta_phi *= decay;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(&CameraConfig::default(), 16.0 / 9.0)
    }

    fn still() -> ControlsConfig {
        ControlsConfig {
            auto_rotate: false,
            enable_damping: false,
            ..ControlsConfig::default()
        }
    }

    #[test]
    fn aspect_tracks_viewport() {
        let mut cam = camera();
        cam.set_aspect(800, 400);
        assert_eq!(cam.aspect, 2.0);
        cam.set_aspect(800, 0);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn projection_uses_aspect() {
        let mut cam = camera();
        cam.set_aspect(1000, 1000);
        let square = cam.projection();
        cam.set_aspect(2000, 1000);
        let wide = cam.projection();
        assert!((square.x_axis.x - 2.0 * wide.x_axis.x).abs() < 1e-5);
        assert_eq!(square.y_axis.y, wide.y_axis.y);
    }

    #[test]
    fn spherical_round_trips_start_position() {
        let v = Vec3::new(0.0, 2.0, 6.0);
        let back = Spherical::from_offset(v).to_offset();
        assert!((back - v).length() < 1e-5);
    }

    #[test]
    fn idle_update_keeps_position() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(still());
        let before = cam.position;
        controls.update(&mut cam);
        assert!((cam.position - before).length() < 1e-5);
    }

    #[test]
    fn auto_rotate_orbits_at_constant_distance() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(ControlsConfig::default());
        let r0 = cam.position.length();
        let y0 = cam.position.y;
        for _ in 0..120 {
            controls.update(&mut cam);
        }
        assert!((cam.position.length() - r0).abs() < 1e-3);
        assert!((cam.position.y - y0).abs() < 1e-3);
        assert!(cam.position.x.abs() > 1e-3);
    }

    #[test]
    fn damping_spreads_a_drag_over_frames() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(ControlsConfig {
            auto_rotate: false,
            ..ControlsConfig::default()
        });
        controls.drag(100.0, 0.0, 800.0);
        controls.update(&mut cam);
        let first = cam.position.x.abs();
        controls.update(&mut cam);
        let second = cam.position.x.abs();
        assert!(first > 0.0);
        assert!(second > first);
    }

    #[test]
    fn wheel_up_moves_closer_within_limits() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(still());
        let r0 = cam.position.length();
        controls.dolly(-100.0);
        controls.update(&mut cam);
        assert!(cam.position.length() < r0);

        for _ in 0..500 {
            controls.dolly(-100.0);
            controls.update(&mut cam);
        }
        assert!((cam.position.length() - 1.5).abs() < 1e-4);

        for _ in 0..500 {
            controls.dolly(100.0);
            controls.update(&mut cam);
        }
        assert!((cam.position.length() - 60.0).abs() < 1e-3);
    }

    #[test]
    fn default_clamp_stays_outside_the_event_horizon() {
        let cfg = crate::config::Config::default();
        assert!(cfg.controls.min_distance > cfg.black_hole.radius);
        assert!(cfg.controls.max_distance.is_finite());
    }

    #[test]
    fn unbounded_distances_keep_zooming() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(ControlsConfig {
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            ..still()
        });
        for _ in 0..100 {
            controls.dolly(-100.0);
            controls.update(&mut cam);
        }
        assert!(cam.position.length() < 0.1);
        for _ in 0..200 {
            controls.dolly(100.0);
            controls.update(&mut cam);
        }
        assert!(cam.position.length() > 60.0);
    }

    #[test]
    fn zoom_can_be_disabled() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(ControlsConfig {
            enable_zoom: false,
            ..still()
        });
        let r0 = cam.position.length();
        controls.dolly(-100.0);
        controls.update(&mut cam);
        assert!((cam.position.length() - r0).abs() < 1e-5);
    }

    #[test]
    fn polar_angle_never_flips_over_the_pole() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(still());
        controls.drag(0.0, 10_000.0, 100.0);
        controls.update(&mut cam);
        assert!(cam.position.y > 0.0);
        assert!(cam.position.y <= cam.position.length());
    }

    #[test]
    fn dragging_pauses_auto_rotate() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(ControlsConfig {
            enable_damping: false,
            ..ControlsConfig::default()
        });
        controls.begin_drag();
        let before = cam.position;
        controls.update(&mut cam);
        assert!((cam.position - before).length() < 1e-5);
        controls.end_drag();
        controls.update(&mut cam);
        assert!((cam.position - before).length() > 1e-4);
    }
}
