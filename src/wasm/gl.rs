use std::cell::RefCell;
use std::collections::HashMap;

use glam::Mat4;
use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlFramebuffer, WebGlProgram,
    WebGlRenderbuffer, WebGlShader, WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::error::{Error, Result};

/// Vertex shader shared by every screen-space pass; draws one oversized triangle.
pub const FULLSCREEN_VS: &str = include_str!("shaders/fullscreen.vert");

pub fn compile(gl: &GL, stage: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl.create_shader(stage).ok_or(Error::Resource("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        return Ok(shader);
    }
    let log = gl.get_shader_info_log(&shader).unwrap_or_default();
    gl.delete_shader(Some(&shader));
    Err(Error::ShaderCompile {
        stage: if stage == GL::VERTEX_SHADER { "vertex" } else { "fragment" },
        log,
    })
}

pub struct Program {
    name: &'static str,
    program: WebGlProgram,
    uniforms: RefCell<HashMap<String, Option<WebGlUniformLocation>>>,
}

impl Program {
    pub fn new(gl: &GL, name: &'static str, vertex: &str, fragment: &str) -> Result<Self> {
        let vs = compile(gl, GL::VERTEX_SHADER, vertex)?;
        let fs = compile(gl, GL::FRAGMENT_SHADER, fragment)?;
        let program = gl.create_program().ok_or(Error::Resource("program"))?;
        gl.attach_shader(&program, &vs);
        gl.attach_shader(&program, &fs);
        gl.link_program(&program);
        // Shaders are owned by the program once linked.
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));

        if !gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            let log = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            return Err(Error::ProgramLink { name, log });
        }
        log::debug!("linked program `{name}`");
        Ok(Self {
            name,
            program,
            uniforms: RefCell::new(HashMap::new()),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn bind(&self, gl: &GL) {
        gl.use_program(Some(&self.program));
    }

    pub fn attrib(&self, gl: &GL, name: &str) -> Option<u32> {
        u32::try_from(gl.get_attrib_location(&self.program, name)).ok()
    }

    fn location(&self, gl: &GL, name: &str) -> Option<WebGlUniformLocation> {
        self.uniforms
            .borrow_mut()
            .entry(name.to_string())
            .or_insert_with(|| gl.get_uniform_location(&self.program, name))
            .clone()
    }

    pub fn set_f32(&self, gl: &GL, name: &str, v: f32) {
        gl.uniform1f(self.location(gl, name).as_ref(), v);
    }

    pub fn set_i32(&self, gl: &GL, name: &str, v: i32) {
        gl.uniform1i(self.location(gl, name).as_ref(), v);
    }

    pub fn set_vec2(&self, gl: &GL, name: &str, v: [f32; 2]) {
        gl.uniform2f(self.location(gl, name).as_ref(), v[0], v[1]);
    }

    pub fn set_vec3(&self, gl: &GL, name: &str, v: [f32; 3]) {
        gl.uniform3f(self.location(gl, name).as_ref(), v[0], v[1], v[2]);
    }

    pub fn set_f32_array(&self, gl: &GL, name: &str, v: &[f32]) {
        gl.uniform1fv_with_f32_array(self.location(gl, name).as_ref(), v);
    }

    pub fn set_mat4(&self, gl: &GL, name: &str, m: &Mat4) {
        gl.uniform_matrix4fv_with_f32_array(
            self.location(gl, name).as_ref(),
            false,
            &m.to_cols_array(),
        );
    }
}

fn upload(gl: &GL, target: u32, bytes: &[u8]) -> Result<WebGlBuffer> {
    let buffer = gl.create_buffer().ok_or(Error::Resource("buffer"))?;
    gl.bind_buffer(target, Some(&buffer));
    gl.buffer_data_with_u8_array(target, bytes, GL::STATIC_DRAW);
    Ok(buffer)
}

/// Geometry uploaded once and drawn every frame.
pub struct GpuGeometry {
    vao: WebGlVertexArrayObject,
    buffers: Vec<WebGlBuffer>,
    mode: u32,
    count: i32,
    indexed: bool,
}

impl GpuGeometry {
    pub fn new(gl: &GL, mode: u32) -> Result<Self> {
        let vao = gl
            .create_vertex_array()
            .ok_or(Error::Resource("vertex array"))?;
        Ok(Self {
            vao,
            buffers: Vec::new(),
            mode,
            count: 0,
            indexed: false,
        })
    }

    /// Attach a float attribute; attributes the program doesn't use are skipped.
    pub fn attribute(
        mut self,
        gl: &GL,
        program: &Program,
        name: &str,
        components: i32,
        data: &[f32],
    ) -> Result<Self> {
        let Some(location) = program.attrib(gl, name) else {
            log::debug!("`{}` has no attribute `{name}`", program.name());
            return Ok(self);
        };
        gl.bind_vertex_array(Some(&self.vao));
        let buffer = upload(gl, GL::ARRAY_BUFFER, bytemuck::cast_slice(data))?;
        gl.enable_vertex_attrib_array(location);
        gl.vertex_attrib_pointer_with_i32(location, components, GL::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);
        if !self.indexed {
            self.count = (data.len() / components as usize) as i32;
        }
        self.buffers.push(buffer);
        Ok(self)
    }

    pub fn indices(mut self, gl: &GL, data: &[u32]) -> Result<Self> {
        gl.bind_vertex_array(Some(&self.vao));
        let buffer = upload(gl, GL::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(data))?;
        gl.bind_vertex_array(None);
        self.buffers.push(buffer);
        self.count = data.len() as i32;
        self.indexed = true;
        Ok(self)
    }

    pub fn draw(&self, gl: &GL) {
        gl.bind_vertex_array(Some(&self.vao));
        if self.indexed {
            gl.draw_elements_with_i32(self.mode, self.count, GL::UNSIGNED_INT, 0);
        } else {
            gl.draw_arrays(self.mode, 0, self.count);
        }
        gl.bind_vertex_array(None);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TargetFormat {
    internal: u32,
    format: u32,
    ty: u32,
}

impl TargetFormat {
    /// Half-float when the context can render to it, otherwise 8-bit.
    pub fn detect(gl: &GL) -> Self {
        match gl.get_extension("EXT_color_buffer_float") {
            Ok(Some(_)) => Self {
                internal: GL::RGBA16F,
                format: GL::RGBA,
                ty: GL::HALF_FLOAT,
            },
            _ => {
                log::warn!("EXT_color_buffer_float unavailable, bloom falls back to 8-bit targets");
                Self {
                    internal: GL::RGBA8,
                    format: GL::RGBA,
                    ty: GL::UNSIGNED_BYTE,
                }
            }
        }
    }
}

/// Offscreen color texture with an optional depth buffer.
pub struct RenderTarget {
    framebuffer: WebGlFramebuffer,
    texture: WebGlTexture,
    depth: Option<WebGlRenderbuffer>,
    width: i32,
    height: i32,
}

impl RenderTarget {
    pub fn new(gl: &GL, (width, height): (u32, u32), fmt: TargetFormat, depth: bool) -> Result<Self> {
        let (width, height) = (width.max(1) as i32, height.max(1) as i32);
        let texture = gl.create_texture().ok_or(Error::Resource("texture"))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            fmt.internal as i32,
            width,
            height,
            0,
            fmt.format,
            fmt.ty,
            None,
        )?;
        for (pname, param) in [
            (GL::TEXTURE_MIN_FILTER, GL::LINEAR),
            (GL::TEXTURE_MAG_FILTER, GL::LINEAR),
            (GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE),
            (GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE),
        ] {
            gl.tex_parameteri(GL::TEXTURE_2D, pname, param as i32);
        }

        let framebuffer = gl
            .create_framebuffer()
            .ok_or(Error::Resource("framebuffer"))?;
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&framebuffer));
        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(&texture),
            0,
        );

        let depth = if depth {
            let rb = gl
                .create_renderbuffer()
                .ok_or(Error::Resource("renderbuffer"))?;
            gl.bind_renderbuffer(GL::RENDERBUFFER, Some(&rb));
            gl.renderbuffer_storage(GL::RENDERBUFFER, GL::DEPTH_COMPONENT24, width, height);
            gl.framebuffer_renderbuffer(
                GL::FRAMEBUFFER,
                GL::DEPTH_ATTACHMENT,
                GL::RENDERBUFFER,
                Some(&rb),
            );
            gl.bind_renderbuffer(GL::RENDERBUFFER, None);
            Some(rb)
        } else {
            None
        };

        let status = gl.check_framebuffer_status(GL::FRAMEBUFFER);
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        gl.bind_texture(GL::TEXTURE_2D, None);
        let target = Self {
            framebuffer,
            texture,
            depth,
            width,
            height,
        };
        if status != GL::FRAMEBUFFER_COMPLETE {
            target.delete(gl);
            return Err(Error::Framebuffer(status));
        }
        Ok(target)
    }

    pub fn bind(&self, gl: &GL) {
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.framebuffer));
        gl.viewport(0, 0, self.width, self.height);
    }

    pub fn bind_texture(&self, gl: &GL, unit: u32) {
        gl.active_texture(GL::TEXTURE0 + unit);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.texture));
    }

    pub fn texel_size(&self) -> [f32; 2] {
        [1.0 / self.width as f32, 1.0 / self.height as f32]
    }

    pub fn delete(&self, gl: &GL) {
        gl.delete_framebuffer(Some(&self.framebuffer));
        gl.delete_texture(Some(&self.texture));
        if let Some(rb) = &self.depth {
            gl.delete_renderbuffer(Some(rb));
        }
    }
}
