//! Post-processing: scene pass into an HDR target, then bloom and tone mapping.

use web_sys::WebGl2RenderingContext as GL;

use super::gl::{Program, RenderTarget, TargetFormat, FULLSCREEN_VS};
use crate::bloom::{self, BloomChain, HIGH_PASS_SMOOTH_WIDTH, KERNEL_RADII, MIP_LEVELS};
use crate::config::BloomConfig;
use crate::error::Result;

const HIGH_PASS_FS: &str = include_str!("shaders/high_pass.frag");
const BLUR_FS: &str = include_str!("shaders/blur.frag");
const COMPOSITE_FS: &str = include_str!("shaders/composite.frag");

struct Targets {
    scene: RenderTarget,
    bright: RenderTarget,
    horizontal: Vec<RenderTarget>,
    vertical: Vec<RenderTarget>,
}

impl Targets {
    fn new(gl: &GL, chain: &BloomChain, fmt: TargetFormat) -> Result<Self> {
        let mut horizontal = Vec::with_capacity(MIP_LEVELS);
        let mut vertical = Vec::with_capacity(MIP_LEVELS);
        for &size in chain.mips() {
            horizontal.push(RenderTarget::new(gl, size, fmt, false)?);
            vertical.push(RenderTarget::new(gl, size, fmt, false)?);
        }
        Ok(Self {
            scene: RenderTarget::new(gl, chain.size(), fmt, true)?,
            bright: RenderTarget::new(gl, chain.bright_size(), fmt, false)?,
            horizontal,
            vertical,
        })
    }

    fn delete(&self, gl: &GL) {
        self.scene.delete(gl);
        self.bright.delete(gl);
        for t in self.horizontal.iter().chain(&self.vertical) {
            t.delete(gl);
        }
    }
}

pub struct Composer {
    cfg: BloomConfig,
    format: TargetFormat,
    chain: BloomChain,
    targets: Targets,
    high_pass: Program,
    blurs: Vec<Program>,
    composite: Program,
}

impl Composer {
    pub fn new(gl: &GL, (width, height): (u32, u32), cfg: BloomConfig) -> Result<Self> {
        let format = TargetFormat::detect(gl);
        let chain = BloomChain::new(width, height);
        let targets = Targets::new(gl, &chain, format)?;

        let high_pass = Program::new(gl, "high_pass", FULLSCREEN_VS, HIGH_PASS_FS)?;
        let blurs = KERNEL_RADII
            .iter()
            .map(|&radius| -> Result<Program> {
                let source = format!("#version 300 es\n#define KERNEL_RADIUS {radius}\n{BLUR_FS}");
                let program = Program::new(gl, "blur", FULLSCREEN_VS, &source)?;
                program.bind(gl);
                program.set_f32_array(gl, "gaussianCoefficients", &bloom::gaussian_coefficients(radius));
                Ok(program)
            })
            .collect::<Result<Vec<_>>>()?;
        let composite = Program::new(gl, "composite", FULLSCREEN_VS, COMPOSITE_FS)?;
        composite.bind(gl);
        composite.set_i32(gl, "sceneTexture", 0);
        for level in 0..MIP_LEVELS {
            composite.set_i32(gl, &format!("blur{level}"), level as i32 + 1);
        }

        Ok(Self {
            cfg,
            format,
            chain,
            targets,
            high_pass,
            blurs,
            composite,
        })
    }

    /// Reallocates every target when the drawing size changed.
    pub fn set_size(&mut self, gl: &GL, width: u32, height: u32) -> Result<()> {
        let Some(chain) = self.chain.resized(width, height) else {
            return Ok(());
        };
        let targets = Targets::new(gl, &chain, self.format)?;
        std::mem::replace(&mut self.targets, targets).delete(gl);
        self.chain = chain;
        log::debug!("composer resized to {width}x{height}");
        Ok(())
    }

    /// Bind and clear the scene target; the caller draws the scene next.
    pub fn begin(&self, gl: &GL) {
        self.targets.scene.bind(gl);
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
    }

    pub fn finish(&self, gl: &GL) {
        gl.disable(GL::DEPTH_TEST);
        gl.disable(GL::BLEND);
        gl.bind_vertex_array(None);
        let t = &self.targets;

        self.high_pass.bind(gl);
        t.bright.bind(gl);
        t.scene.bind_texture(gl, 0);
        self.high_pass.set_i32(gl, "tDiffuse", 0);
        self.high_pass.set_f32(gl, "threshold", self.cfg.threshold);
        self.high_pass.set_f32(gl, "smoothWidth", HIGH_PASS_SMOOTH_WIDTH);
        fullscreen(gl);

        let mut input = &t.bright;
        for (level, blur) in self.blurs.iter().enumerate() {
            blur.bind(gl);
            blur.set_i32(gl, "colorTexture", 0);
            blur.set_vec2(gl, "invSize", t.horizontal[level].texel_size());

            t.horizontal[level].bind(gl);
            input.bind_texture(gl, 0);
            blur.set_vec2(gl, "direction", [1.0, 0.0]);
            fullscreen(gl);

            t.vertical[level].bind(gl);
            t.horizontal[level].bind_texture(gl, 0);
            blur.set_vec2(gl, "direction", [0.0, 1.0]);
            fullscreen(gl);

            input = &t.vertical[level];
        }

        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        let (w, h) = self.chain.size();
        gl.viewport(0, 0, w as i32, h as i32);
        self.composite.bind(gl);
        t.scene.bind_texture(gl, 0);
        for (level, target) in t.vertical.iter().enumerate() {
            target.bind_texture(gl, level as u32 + 1);
        }
        self.composite.set_f32(gl, "bloomStrength", self.cfg.strength);
        self.composite
            .set_f32_array(gl, "bloomFactors", &bloom::bloom_factors(self.cfg.radius));
        self.composite.set_f32(gl, "exposure", self.cfg.exposure);
        fullscreen(gl);
        gl.active_texture(GL::TEXTURE0);
    }
}

fn fullscreen(gl: &GL) {
    gl.draw_arrays(GL::TRIANGLES, 0, 3);
}
