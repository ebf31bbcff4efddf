use std::f32::consts::FRAC_PI_2;

use glam::Mat4;

use crate::camera::{OrbitControls, PerspectiveCamera};
use crate::config::Config;

/// Matrices and uniforms the renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameUniforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub black_hole: Mat4,
    pub disk: Mat4,
    pub particles: Mat4,
    pub stars: Mat4,
    /// Seconds since start, fed to the disk shader.
    pub time: f32,
    pub viewport: (u32, u32),
}

pub struct Scene {
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    disk_tilt: f32,
    particle_spin: f32,
    star_spin: f32,
    disk_time: f32,
    particle_angle: f32,
    star_angle: f32,
    viewport: (u32, u32),
}

impl Scene {
    pub fn new(cfg: &Config, width: u32, height: u32) -> Self {
        let mut camera = PerspectiveCamera::new(&cfg.camera, 1.0);
        camera.set_aspect(width, height);
        Self {
            camera,
            controls: OrbitControls::new(cfg.controls.clone()),
            disk_tilt: -FRAC_PI_2,
            particle_spin: cfg.particles.spin,
            star_spin: cfg.stars.spin,
            disk_time: 0.0,
            particle_angle: 0.0,
            star_angle: 0.0,
            viewport: (width, height),
        }
    }

    /// Per-frame update: assigns the shader clock and both rotations from
    /// `elapsed`, then steps the orbit controls.
    pub fn advance(&mut self, elapsed: f32) {
        self.disk_time = elapsed;
        self.particle_angle = elapsed * self.particle_spin;
        self.star_angle = elapsed * self.star_spin;
        self.controls.update(&mut self.camera);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
        self.viewport = (width, height);
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn disk_time(&self) -> f32 {
        self.disk_time
    }

    pub fn particle_angle(&self) -> f32 {
        self.particle_angle
    }

    pub fn star_angle(&self) -> f32 {
        self.star_angle
    }

    pub fn frame(&self) -> FrameUniforms {
        FrameUniforms {
            view: self.camera.view(),
            projection: self.camera.projection(),
            black_hole: Mat4::IDENTITY,
            disk: Mat4::from_rotation_x(self.disk_tilt),
            particles: Mat4::from_rotation_y(self.particle_angle),
            stars: Mat4::from_rotation_y(self.star_angle),
            time: self.disk_time,
            viewport: self.viewport,
        }
    }
}
