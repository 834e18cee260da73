use gfx::traits::FactoryExt;
use vecmath::{col_mat4_mul, Matrix4, Vector3};

use crate::render::{scale_matrix, translation_matrix, GraphicsData, RenderContext, Vertex};

/// Edge length of the marker relative to the unit cube it is modelled from.
pub const MARKER_SCALE: f32 = 0.5;

macro_rules! face {
    ($normal:expr; $($p:expr),*) => {
        [$(Vertex { pos: $p, normal: $normal }),*]
    };
}

/// Unit cube centred on the origin, two triangles per face.
pub const CUBE_VERTICES: [[Vertex; 6]; 6] = [
    face!([0.0, 0.0, -1.0];
          [-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5],
          [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5], [-0.5, -0.5, -0.5]),
    face!([0.0, 0.0, 1.0];
          [-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5],
          [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, -0.5, 0.5]),
    face!([-1.0, 0.0, 0.0];
          [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5], [-0.5, -0.5, -0.5],
          [-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5]),
    face!([1.0, 0.0, 0.0];
          [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [0.5, -0.5, -0.5],
          [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5]),
    face!([0.0, -1.0, 0.0];
          [-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5],
          [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5], [-0.5, -0.5, -0.5]),
    face!([0.0, 1.0, 0.0];
          [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5],
          [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5]),
];

/// Small cube drawn where the light is. Its buffer is released on drop, like
/// every other primitive's.
pub struct LightMarker<R: gfx::Resources> {
    position: Vector3<f32>,
    pub visible: bool,
    buffers: Option<(gfx::handle::Buffer<R, Vertex>, gfx::Slice<R>)>,
}

impl <R: gfx::Resources> LightMarker <R> {
    pub fn new(position: Vector3<f32>) -> Self {
        LightMarker {
            position,
            visible: true,
            buffers: None,
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn setup<F: FactoryExt<R>>(&mut self, factory: &mut F) {
        if self.buffers.is_none() {
            let vertices: Vec<Vertex> = CUBE_VERTICES.iter().flatten().cloned().collect();
            self.buffers = Some(factory.create_vertex_buffer_with_slice(&vertices, ()));
        }
    }

    pub fn update_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        col_mat4_mul(translation_matrix(self.position), scale_matrix(MARKER_SCALE))
    }

    pub fn render<C: gfx::CommandBuffer<R>>(&self,
                                           encoder: &mut gfx::Encoder<R, C>,
                                           gfx_data: &mut GraphicsData<R>,
                                           ctx: &RenderContext) {
        let (vbuf, slice) = match self.buffers {
            Some((ref vbuf, ref slice)) => (vbuf, slice),
            None => {
                log::debug!("Skipping light marker that was never set up");
                return;
            }
        };

        encoder.update_constant_buffer(&gfx_data.marker_data.locals, &ctx.marker_locals(self.model_matrix()));

        if self.visible {
            gfx_data.marker_data.vbuf = vbuf.clone();
            encoder.draw(slice, &gfx_data.marker_pso, &gfx_data.marker_data);
        }
    }
}
