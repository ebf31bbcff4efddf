use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as GL};

use super::composer::Composer;
use super::controls;
use super::dom;
use super::gl::{GpuGeometry, Program};
use crate::clock::Clock;
use crate::config::{rgb, Config};
use crate::error::{Error, Result};
use crate::geometry;
use crate::scene::{FrameUniforms, Scene};

const MESH_VS: &str = include_str!("shaders/mesh.vert");
const SOLID_FS: &str = include_str!("shaders/solid.frag");
const DISK_FS: &str = include_str!("shaders/disk.frag");
const POINTS_VS: &str = include_str!("shaders/points.vert");
const POINTS_FS: &str = include_str!("shaders/points.frag");

struct PointStyle {
    color: [f32; 3],
    size: f32,
    opacity: f32,
}

/// GPU side of the fixed scene: black hole, accretion disk, particle ring, stars.
struct SceneRenderer {
    solid: Program,
    disk_program: Program,
    points: Program,
    black_hole: GpuGeometry,
    disk: GpuGeometry,
    particles: GpuGeometry,
    stars: GpuGeometry,
    particle_style: PointStyle,
    star_style: PointStyle,
}

impl SceneRenderer {
    fn new(gl: &GL, cfg: &Config) -> Result<Self> {
        let solid = Program::new(gl, "solid", MESH_VS, SOLID_FS)?;
        let disk_program = Program::new(gl, "disk", MESH_VS, DISK_FS)?;
        let points = Program::new(gl, "points", POINTS_VS, POINTS_FS)?;
        let mut rng = dom::rng();

        let bh = &cfg.black_hole;
        let sphere = geometry::sphere(bh.radius, bh.width_segments, bh.height_segments);
        let black_hole = GpuGeometry::new(gl, GL::TRIANGLES)?
            .attribute(gl, &solid, "position", 3, &sphere.positions)?
            .indices(gl, &sphere.indices)?;

        let d = &cfg.disk;
        let mut ring = geometry::ring(d.inner_radius, d.outer_radius, d.theta_segments, d.phi_segments);
        ring.remap_uvs_planar(d.uv_scale);
        let disk = GpuGeometry::new(gl, GL::TRIANGLES)?
            .attribute(gl, &disk_program, "position", 3, &ring.positions)?
            .attribute(gl, &disk_program, "uv", 2, &ring.uvs)?
            .indices(gl, &ring.indices)?;

        let particles = GpuGeometry::new(gl, GL::POINTS)?.attribute(
            gl,
            &points,
            "position",
            3,
            &geometry::particle_ring(&mut rng, &cfg.particles),
        )?;
        let stars = GpuGeometry::new(gl, GL::POINTS)?.attribute(
            gl,
            &points,
            "position",
            3,
            &geometry::starfield(&mut rng, &cfg.stars),
        )?;

        log::info!(
            "scene built: {} sphere vertices, {} disk vertices, {} particles, {} stars",
            sphere.vertex_count(),
            ring.vertex_count(),
            cfg.particles.count,
            cfg.stars.count,
        );

        Ok(Self {
            solid,
            disk_program,
            points,
            black_hole,
            disk,
            particles,
            stars,
            particle_style: PointStyle {
                color: rgb(cfg.particles.color),
                size: cfg.particles.size,
                opacity: cfg.particles.opacity,
            },
            star_style: PointStyle {
                color: rgb(cfg.stars.color),
                size: cfg.stars.size,
                opacity: cfg.stars.opacity,
            },
        })
    }

    fn draw(&self, gl: &GL, frame: &FrameUniforms) {
        gl.enable(GL::DEPTH_TEST);
        gl.depth_mask(true);
        gl.disable(GL::BLEND);

        // Event horizon: opaque black, occludes everything behind it.
        self.solid.bind(gl);
        self.solid.set_mat4(gl, "model", &frame.black_hole);
        self.solid.set_mat4(gl, "view", &frame.view);
        self.solid.set_mat4(gl, "projection", &frame.projection);
        self.solid.set_vec3(gl, "color", [0.0, 0.0, 0.0]);
        self.black_hole.draw(gl);

        gl.enable(GL::BLEND);
        gl.blend_func_separate(
            GL::SRC_ALPHA,
            GL::ONE_MINUS_SRC_ALPHA,
            GL::ONE,
            GL::ONE_MINUS_SRC_ALPHA,
        );
        self.points.bind(gl);
        self.points.set_mat4(gl, "view", &frame.view);
        self.points.set_mat4(gl, "projection", &frame.projection);
        self.points.set_f32(gl, "scale", frame.viewport.1 as f32 * 0.5);
        self.draw_points(gl, &self.stars, &frame.stars, &self.star_style);

        // Additive from here on.
        gl.blend_func(GL::SRC_ALPHA, GL::ONE);
        gl.depth_mask(false);
        self.disk_program.bind(gl);
        self.disk_program.set_mat4(gl, "model", &frame.disk);
        self.disk_program.set_mat4(gl, "view", &frame.view);
        self.disk_program.set_mat4(gl, "projection", &frame.projection);
        self.disk_program.set_f32(gl, "iTime", frame.time);
        self.disk.draw(gl);
        gl.depth_mask(true);

        self.points.bind(gl);
        self.draw_points(gl, &self.particles, &frame.particles, &self.particle_style);
    }

    fn draw_points(&self, gl: &GL, geometry: &GpuGeometry, model: &glam::Mat4, style: &PointStyle) {
        self.points.set_mat4(gl, "model", model);
        self.points.set_vec3(gl, "color", style.color);
        self.points.set_f32(gl, "size", style.size);
        self.points.set_f32(gl, "opacity", style.opacity);
        geometry.draw(gl);
    }
}

/// Build the scene on `canvas` and start the animation loop.
pub fn start(canvas: HtmlCanvasElement, cfg: &Config) -> Result<()> {
    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or(Error::WebGl2Unsupported)?
        .dyn_into()
        .map_err(|_| Error::WebGl2Unsupported)?;

    let window = dom::window()?;
    let (width, height) = dom::drawing_size(&window);
    canvas.set_width(width);
    canvas.set_height(height);

    let renderer = SceneRenderer::new(&gl, cfg)?;
    let composer = Rc::new(RefCell::new(Composer::new(&gl, (width, height), cfg.bloom.clone())?));
    let scene = Rc::new(RefCell::new(Scene::new(cfg, width, height)));

    controls::install(&canvas, Rc::clone(&scene))?;

    // Resize canvas, camera and composer to fit window
    let resize_closure = {
        let canvas = canvas.clone();
        let gl = gl.clone();
        let scene = Rc::clone(&scene);
        let composer = Rc::clone(&composer);
        Closure::wrap(Box::new(move || {
            let Some(window) = web_sys::window() else { return };
            let (w, h) = dom::drawing_size(&window);
            canvas.set_width(w);
            canvas.set_height(h);
            scene.borrow_mut().resize(w, h);
            if let Err(e) = composer.borrow_mut().set_size(&gl, w, h) {
                log::error!("resize to {w}x{h} failed: {e}");
            }
        }) as Box<dyn FnMut()>)
    };
    window.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let mut clock = Clock::new();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let Some(window) = web_sys::window() else { return };
        let elapsed = clock.elapsed(dom::now_ms(&window));

        let frame = {
            let mut scene = scene.borrow_mut();
            scene.advance(elapsed);
            scene.frame()
        };
        let composer = composer.borrow();
        composer.begin(&gl);
        renderer.draw(&gl, &frame);
        composer.finish(&gl);

        // schedule next
        if let Some(cb) = f.borrow().as_ref() {
            if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                log::error!("animation loop stopped: {e:?}");
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(cb) = g.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    Ok(())
}
