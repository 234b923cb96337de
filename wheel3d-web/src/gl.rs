//! WebGL2 drawing of the carousel: one shared vertex buffer pair, per-element uniforms
use js_sys::Float32Array;
use wasm_bindgen::JsValue;
use web_sys::{
    HtmlImageElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};
use wheel3d_core::{transform::mvp_matrix, Camera, Carousel, QuadGeometry, RingId};

const VERT_SRC: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec2 a_uv;
uniform mat4 u_mvp;
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = u_mvp * vec4(a_position, 1.0);
}
"#;

const FRAG_SRC: &str = r#"#version 300 es
precision mediump float;
in vec2 v_uv;
uniform sampler2D u_texture;
uniform float u_opacity;
out vec4 out_color;
void main() {
    vec4 texel = texture(u_texture, v_uv);
    out_color = vec4(texel.rgb, texel.a * u_opacity);
}
"#;

fn compile_shader(gl: &GL, src: &str, shader_type: u32) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or("could not create shader")?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if !gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        return Err(JsValue::from(gl.get_shader_info_log(&shader).unwrap_or_default()));
    }
    Ok(shader)
}

fn link_program(gl: &GL, vert_src: &str, frag_src: &str) -> Result<WebGlProgram, JsValue> {
    let vert = compile_shader(gl, vert_src, GL::VERTEX_SHADER)?;
    let frag = compile_shader(gl, frag_src, GL::FRAGMENT_SHADER)?;
    let prog = gl.create_program().ok_or("could not create program")?;
    gl.attach_shader(&prog, &vert);
    gl.attach_shader(&prog, &frag);
    gl.link_program(&prog);
    gl.detach_shader(&prog, &vert);
    gl.detach_shader(&prog, &frag);
    gl.delete_shader(Some(&vert));
    gl.delete_shader(Some(&frag));
    if !gl
        .get_program_parameter(&prog, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        return Err(JsValue::from(
            gl.get_program_info_log(&prog).unwrap_or_default(),
        ));
    }
    Ok(prog)
}

fn upload_attribute(
    gl: &GL,
    location: u32,
    data: &[f32],
    components: i32,
) -> Result<WebGlBuffer, JsValue> {
    let buffer = gl.create_buffer().ok_or("could not create buffer")?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    gl.buffer_data_with_array_buffer_view(
        GL::ARRAY_BUFFER,
        &Float32Array::from(data),
        GL::STATIC_DRAW,
    );
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(location, components, GL::FLOAT, false, 0, 0);
    Ok(buffer)
}

/// Upload a decoded image as an RGBA texture with `v = 0` at the bottom
pub fn upload_texture(gl: &GL, image: &HtmlImageElement) -> Result<WebGlTexture, JsValue> {
    let texture = gl.create_texture().ok_or("could not create texture")?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);
    gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        image,
    )?;
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
    Ok(texture)
}

/// GPU-side copy of the shared quad plus the textured-quad program
pub struct GlRenderer {
    gl: GL,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    buffers: [WebGlBuffer; 2],
    vertex_count: i32,
    u_mvp: WebGlUniformLocation,
    u_opacity: WebGlUniformLocation,
    u_texture: WebGlUniformLocation,
}

impl GlRenderer {
    pub fn new(gl: GL) -> Result<Self, JsValue> {
        let program = link_program(&gl, VERT_SRC, FRAG_SRC)?;
        let uniform = |name: &str| {
            gl.get_uniform_location(&program, name)
                .ok_or_else(|| JsValue::from(format!("missing uniform {}", name)))
        };
        let u_mvp = uniform("u_mvp")?;
        let u_opacity = uniform("u_opacity")?;
        let u_texture = uniform("u_texture")?;

        let vao = gl
            .create_vertex_array()
            .ok_or("could not create vertex array")?;
        let empty = [
            gl.create_buffer().ok_or("could not create buffer")?,
            gl.create_buffer().ok_or("could not create buffer")?,
        ];

        Ok(Self {
            gl,
            program,
            vao,
            buffers: empty,
            vertex_count: 0,
            u_mvp,
            u_opacity,
            u_texture,
        })
    }

    pub fn context(&self) -> &GL {
        &self.gl
    }

    /// Upload the one geometry every element draws with
    pub fn upload_geometry(&mut self, geometry: &QuadGeometry) -> Result<(), JsValue> {
        let gl = &self.gl;
        gl.bind_vertex_array(Some(&self.vao));
        for buffer in &self.buffers {
            gl.delete_buffer(Some(buffer));
        }
        let positions = upload_attribute(gl, 0, geometry.positions(), 3)?;
        let uvs = upload_attribute(gl, 1, geometry.uvs(), 2)?;
        gl.bind_vertex_array(None);

        self.buffers = [positions, uvs];
        self.vertex_count = geometry.vertex_count() as i32;
        Ok(())
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    pub fn draw(&self, carousel: &Carousel<WebGlTexture>, camera: &Camera, background: [u8; 3]) {
        let gl = &self.gl;
        let [r, g, b] = background.map(|c| c as f32 / 255.0);
        gl.clear_color(r, g, b, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        gl.enable(GL::DEPTH_TEST);
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);

        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));
        gl.active_texture(GL::TEXTURE0);
        gl.uniform1i(Some(&self.u_texture), 0);

        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        for id in RingId::ALL {
            let worlds = carousel.world_matrices(id);
            for (element, model) in carousel.ring(id).elements().iter().zip(worlds) {
                let mvp = mvp_matrix(&model, &view, &projection);
                gl.uniform_matrix4fv_with_f32_array(Some(&self.u_mvp), false, mvp.as_slice());
                gl.uniform1f(Some(&self.u_opacity), element.material.opacity);
                gl.bind_texture(GL::TEXTURE_2D, Some(&element.material.texture));
                gl.draw_arrays(GL::TRIANGLES, 0, self.vertex_count);
            }
        }

        gl.bind_vertex_array(None);
    }

    pub fn delete_texture(&self, texture: &WebGlTexture) {
        self.gl.delete_texture(Some(texture));
    }

    /// Release GPU objects; the renderer must not be used afterwards
    pub fn release(&self) {
        for buffer in &self.buffers {
            self.gl.delete_buffer(Some(buffer));
        }
        self.gl.delete_vertex_array(Some(&self.vao));
        self.gl.delete_program(Some(&self.program));
    }
}
