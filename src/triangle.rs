use gfx::traits::FactoryExt;
use vecmath::{Matrix4, Vector3};

use crate::grid::Rgb;
use crate::mesh::TriangleRecord;
use crate::render::{scale_matrix, GraphicsData, RenderContext, Vertex};

struct Buffers<R: gfx::Resources> {
    vbuf: gfx::handle::Buffer<R, Vertex>,
    slice: gfx::Slice<R>,
}

/// A single flat shaded terrain triangle with its own vertex buffer.
pub struct Triangle<R: gfx::Resources> {
    positions: [Vector3<f32>; 3],
    normals: [Vector3<f32>; 3],
    color: Rgb,
    scale: f32,
    pub visible: bool,
    buffers: Option<Buffers<R>>,
}

impl <R: gfx::Resources> Triangle <R> {
    pub fn new(record: TriangleRecord) -> Self {
        Triangle {
            positions: record.positions,
            normals: [record.normal; 3],
            color: record.color,
            scale: 1.0,
            visible: true,
            buffers: None,
        }
    }

    pub fn positions(&self) -> &[Vector3<f32>; 3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vector3<f32>; 3] {
        &self.normals
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_setup(&self) -> bool {
        self.buffers.is_some()
    }

    fn vertices(&self) -> [Vertex; 3] {
        let v = |k: usize| Vertex { pos: self.positions[k], normal: self.normals[k] };
        [v(0), v(1), v(2)]
    }

    /// Uploads the vertices. Only the first call allocates anything.
    pub fn setup<F: FactoryExt<R>>(&mut self, factory: &mut F) {
        if self.buffers.is_some() {
            return;
        }
        let (vbuf, slice) = factory.create_vertex_buffer_with_slice(&self.vertices(), ());
        self.buffers = Some(Buffers { vbuf, slice });
    }

    pub fn set_scale(&mut self, factor: f32) {
        self.scale = factor;
    }

    /// The vertices are already in world space, so the model transform is a
    /// plain uniform scale.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        scale_matrix(self.scale)
    }

    pub fn render<C: gfx::CommandBuffer<R>>(&self,
                                           encoder: &mut gfx::Encoder<R, C>,
                                           gfx_data: &mut GraphicsData<R>,
                                           ctx: &RenderContext) {
        let buffers = match self.buffers {
            Some(ref b) => b,
            None => {
                log::debug!("Skipping triangle that was never set up");
                return;
            }
        };

        let locals = ctx.terrain_locals(self.model_matrix(), self.color);
        encoder.update_constant_buffer(&gfx_data.terrain_data.locals, &locals);

        if self.visible {
            gfx_data.terrain_data.vbuf = buffers.vbuf.clone();
            encoder.draw(&buffers.slice, &gfx_data.terrain_pso, &gfx_data.terrain_data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecmath::col_mat4_transform;

    type Tri = Triangle<gfx_device_gl::Resources>;

    fn record() -> TriangleRecord {
        TriangleRecord {
            positions: [[0.0, -1.0, 2.0], [0.0, -2.0, 1.0], [1.0, -3.0, 1.0]],
            normal: [0.0, 1.0, 0.0],
            color: [0.1, 0.2, 0.3],
        }
    }

    #[test]
    fn keeps_record_data() {
        let tri = Tri::new(record());
        assert_eq!(tri.positions(), &record().positions);
        assert_eq!(tri.normals(), &[[0.0, 1.0, 0.0]; 3]);
        assert_eq!(tri.color(), [0.1, 0.2, 0.3]);
        assert!(tri.visible);
        assert!(!tri.is_setup());
    }

    #[test]
    fn vertices_pair_positions_with_the_face_normal() {
        let tri = Tri::new(record());
        let vertices = tri.vertices();
        for (k, v) in vertices.iter().enumerate() {
            assert_eq!(v.pos, record().positions[k]);
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn render_scale_is_uniform_and_leaves_vertices_alone() {
        let mut tri = Tri::new(record());
        tri.set_scale(3.0);
        assert_eq!(tri.scale(), 3.0);
        assert_eq!(tri.positions(), &record().positions);

        let p = record().positions[2];
        let moved = col_mat4_transform(tri.model_matrix(), [p[0], p[1], p[2], 1.0]);
        assert_eq!(moved, [3.0, -9.0, 3.0, 1.0]);
    }

    #[test]
    fn default_model_matrix_is_identity() {
        let tri = Tri::new(record());
        assert_eq!(tri.model_matrix(), vecmath::mat4_id());
    }
}
