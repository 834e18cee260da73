use gfx;
use gfx::traits::FactoryExt;
use vecmath::{vec3_add, Matrix4, Vector3};

const TERRAIN_VERTEX_SHADER: &'static [u8] = b"
#version 150 core

in vec3 a_Pos;
in vec3 a_Normal;

uniform Locals {
   mat4 u_Model;
   mat4 u_View;
   mat4 u_Projection;
   vec4 u_ObjectColor;
   vec4 u_LightColor;
   vec4 u_LightPos;
   vec4 u_ViewPos;
};

out vec3 v_FragPos;
out vec3 v_Normal;

void main() {
    v_FragPos = vec3(u_Model * vec4(a_Pos, 1.0));
    v_Normal = mat3(transpose(inverse(u_Model))) * a_Normal;
    gl_Position = u_Projection * u_View * vec4(v_FragPos, 1.0);
}
";

const TERRAIN_PIXEL_SHADER: &'static [u8] = b"
#version 150 core

uniform Locals {
   mat4 u_Model;
   mat4 u_View;
   mat4 u_Projection;
   vec4 u_ObjectColor;
   vec4 u_LightColor;
   vec4 u_LightPos;
   vec4 u_ViewPos;
};

in vec3 v_FragPos;
in vec3 v_Normal;
out vec4 Target0;

void main() {
    vec3 ambient = 0.1 * u_LightColor.rgb;

    vec3 norm = normalize(v_Normal);
    vec3 light_dir = normalize(u_LightPos.xyz - v_FragPos);
    vec3 diffuse = max(dot(norm, light_dir), 0.0) * u_LightColor.rgb;

    vec3 view_dir = normalize(u_ViewPos.xyz - v_FragPos);
    vec3 reflect_dir = reflect(-light_dir, norm);
    vec3 specular = 0.5 * pow(max(dot(view_dir, reflect_dir), 0.0), 32.0) * u_LightColor.rgb;

    Target0 = vec4((ambient + diffuse + specular) * u_ObjectColor.rgb, 1.0);
}
";

const MARKER_VERTEX_SHADER: &'static [u8] = b"
#version 150 core

in vec3 a_Pos;

uniform MarkerLocals {
   mat4 u_Model;
   mat4 u_View;
   mat4 u_Projection;
};

void main() {
    gl_Position = u_Projection * u_View * u_Model * vec4(a_Pos, 1.0);
}
";

const MARKER_PIXEL_SHADER: &'static [u8] = b"
#version 150 core

out vec4 Target0;

void main() {
    Target0 = vec4(1.0);
}
";

pub type ColorFormat = gfx::format::Srgba8;
pub type DepthFormat = gfx::format::DepthStencil;

gfx_defines!{
    vertex Vertex {
        pos: [f32; 3] = "a_Pos",
        normal: [f32; 3] = "a_Normal",
    }

    constant Locals {
        model: [[f32; 4]; 4] = "u_Model",
        view: [[f32; 4]; 4] = "u_View",
        projection: [[f32; 4]; 4] = "u_Projection",
        object_color: [f32; 4] = "u_ObjectColor",
        light_color: [f32; 4] = "u_LightColor",
        light_pos: [f32; 4] = "u_LightPos",
        view_pos: [f32; 4] = "u_ViewPos",
    }

    constant MarkerLocals {
        model: [[f32; 4]; 4] = "u_Model",
        view: [[f32; 4]; 4] = "u_View",
        projection: [[f32; 4]; 4] = "u_Projection",
    }

    pipeline terrain_pipe {
        vbuf: gfx::VertexBuffer<Vertex> = (),
        locals: gfx::ConstantBuffer<Locals> = "Locals",
        out_color: gfx::RenderTarget<ColorFormat> = "Target0",
        out_depth: gfx::DepthTarget<DepthFormat> =
            gfx::preset::depth::LESS_EQUAL_WRITE,
    }

    pipeline marker_pipe {
        vbuf: gfx::VertexBuffer<Vertex> = (),
        locals: gfx::ConstantBuffer<MarkerLocals> = "MarkerLocals",
        out_color: gfx::RenderTarget<ColorFormat> = "Target0",
        out_depth: gfx::DepthTarget<DepthFormat> =
            gfx::preset::depth::LESS_EQUAL_WRITE,
    }
}

fn extend(v: Vector3<f32>, w: f32) -> [f32; 4] {
    [v[0], v[1], v[2], w]
}

/// Multiplier applied to the terrain scale per frame while a scale key is held.
pub const SCALE_STEP: f32 = 1.001;
/// Distance the light marker moves per frame while a move key is held.
pub const LIGHT_STEP: f32 = 0.2;

/// Per-frame state handed to every draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderContext {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub light_pos: Vector3<f32>,
    pub light_color: Vector3<f32>,
    pub view_pos: Vector3<f32>,
    /// Render-time uniform scale of the terrain; the baked vertices never change.
    pub terrain_scale: f32,
}

impl Default for RenderContext {
    fn default() -> Self {
        RenderContext {
            view: vecmath::mat4_id(),
            projection: vecmath::mat4_id(),
            light_pos: [0.0; 3],
            light_color: [1.0; 3],
            view_pos: [0.0; 3],
            terrain_scale: 1.0,
        }
    }
}

impl RenderContext {
    pub fn scale_terrain(&mut self, factor: f32) {
        self.terrain_scale *= factor;
    }

    pub fn move_light(&mut self, delta: Vector3<f32>) {
        self.light_pos = vec3_add(self.light_pos, delta);
    }

    pub(crate) fn terrain_locals(&self, model: Matrix4<f32>, color: Vector3<f32>) -> Locals {
        Locals {
            model,
            view: self.view,
            projection: self.projection,
            object_color: extend(color, 1.0),
            light_color: extend(self.light_color, 1.0),
            light_pos: extend(self.light_pos, 1.0),
            view_pos: extend(self.view_pos, 1.0),
        }
    }

    pub(crate) fn marker_locals(&self, model: Matrix4<f32>) -> MarkerLocals {
        MarkerLocals {
            model,
            view: self.view,
            projection: self.projection,
        }
    }
}

/// Pipeline states and the pipeline data the primitives draw through. The
/// vertex buffer slot is swapped for each primitive's own buffer at draw time.
pub struct GraphicsData<R: gfx::Resources> {
    pub(crate) terrain_pso: gfx::PipelineState<R, terrain_pipe::Meta>,
    pub(crate) terrain_data: terrain_pipe::Data<R>,
    pub(crate) marker_pso: gfx::PipelineState<R, marker_pipe::Meta>,
    pub(crate) marker_data: marker_pipe::Data<R>,
}

impl <R: gfx::Resources> GraphicsData <R> {
    pub fn new<F: FactoryExt<R>>(factory: &mut F,
                                 rt: gfx::handle::RawRenderTargetView<R>,
                                 ds: gfx::handle::RawDepthStencilView<R>,
    ) -> GraphicsData<R> {
        use gfx::memory::Typed;

        let terrain_set = factory.create_shader_set(TERRAIN_VERTEX_SHADER, TERRAIN_PIXEL_SHADER)
            .expect("Failed to create terrain shader set");
        let terrain_pso = factory.create_pipeline_state(&terrain_set, gfx::Primitive::TriangleList,
                                                        gfx::state::Rasterizer::new_fill(),
                                                        terrain_pipe::new())
            .expect("Error creating terrain pipeline state");

        let marker_set = factory.create_shader_set(MARKER_VERTEX_SHADER, MARKER_PIXEL_SHADER)
            .expect("Failed to create marker shader set");
        let marker_pso = factory.create_pipeline_state(&marker_set, gfx::Primitive::TriangleList,
                                                       gfx::state::Rasterizer::new_fill(),
                                                       marker_pipe::new())
            .expect("Error creating marker pipeline state");

        GraphicsData {
            terrain_pso,
            terrain_data: terrain_pipe::Data {
                vbuf: factory.create_vertex_buffer(&[]),
                locals: factory.create_constant_buffer(1),
                out_color: Typed::new(rt.clone()),
                out_depth: Typed::new(ds.clone()),
            },
            marker_pso,
            marker_data: marker_pipe::Data {
                vbuf: factory.create_vertex_buffer(&[]),
                locals: factory.create_constant_buffer(1),
                out_color: Typed::new(rt),
                out_depth: Typed::new(ds),
            },
        }
    }

    /// Points both pipelines at new targets, e.g. after a window resize.
    pub fn set_targets(&mut self,
                       rt: gfx::handle::RawRenderTargetView<R>,
                       ds: gfx::handle::RawDepthStencilView<R>) {
        use gfx::memory::Typed;
        self.terrain_data.out_color = Typed::new(rt.clone());
        self.terrain_data.out_depth = Typed::new(ds.clone());
        self.marker_data.out_color = Typed::new(rt);
        self.marker_data.out_depth = Typed::new(ds);
    }
}

/// Column-major scale matrix.
pub fn scale_matrix(s: f32) -> Matrix4<f32> {
    [[s, 0.0, 0.0, 0.0],
     [0.0, s, 0.0, 0.0],
     [0.0, 0.0, s, 0.0],
     [0.0, 0.0, 0.0, 1.0]]
}

pub fn translation_matrix(t: Vector3<f32>) -> Matrix4<f32> {
    [[1.0, 0.0, 0.0, 0.0],
     [0.0, 1.0, 0.0, 0.0],
     [0.0, 0.0, 1.0, 0.0],
     [t[0], t[1], t[2], 1.0]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecmath::{col_mat4_mul, col_mat4_transform};

    #[test]
    fn scale_grows_geometrically() {
        let mut ctx = RenderContext::default();
        ctx.scale_terrain(2.0);
        ctx.scale_terrain(SCALE_STEP);
        assert!((ctx.terrain_scale - 2.002).abs() < 1e-6);
        ctx.scale_terrain(1.0 / SCALE_STEP);
        assert!((ctx.terrain_scale - 2.0).abs() < 1e-6);
    }

    #[test]
    fn light_moves_by_deltas() {
        let mut ctx = RenderContext::default();
        ctx.move_light([LIGHT_STEP, 0.0, 0.0]);
        ctx.move_light([0.0, 0.0, -LIGHT_STEP]);
        assert_eq!(ctx.light_pos, [0.2, 0.0, -0.2]);
    }

    #[test]
    fn translate_then_scale() {
        let m = col_mat4_mul(translation_matrix([1.0, 2.0, 3.0]), scale_matrix(0.5));
        assert_eq!(col_mat4_transform(m, [1.0, 1.0, 1.0, 1.0]), [1.5, 2.5, 3.5, 1.0]);
    }

    #[test]
    fn locals_carry_color_and_light() {
        let ctx = RenderContext { light_pos: [1.0, 2.0, 3.0], ..Default::default() };
        let locals = ctx.terrain_locals(scale_matrix(1.0), [0.2, 0.4, 0.6]);
        assert_eq!(locals.object_color, [0.2, 0.4, 0.6, 1.0]);
        assert_eq!(locals.light_pos, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(locals.light_color, [1.0, 1.0, 1.0, 1.0]);
    }
}
