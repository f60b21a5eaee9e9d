use bytemuck::{Pod, Zeroable};
use std::f32::consts::TAU;

/// Mesh vertex shared by the CPU-side geometry and the GPU pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Parameters of a torus lying in the XY plane, centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusGeometry {
    /// Distance from the centre of the torus to the centre of the tube.
    pub radius: f32,
    pub tube: f32,
    pub radial_segments: u32,
    pub tubular_segments: u32,
}

impl Default for TorusGeometry {
    fn default() -> Self {
        Self {
            radius: 0.5,
            tube: 0.1,
            radial_segments: 16,
            tubular_segments: 48,
        }
    }
}

impl TorusGeometry {
    pub fn vertex_count(&self) -> usize {
        ((self.radial_segments + 1) * (self.tubular_segments + 1)) as usize
    }

    pub fn index_count(&self) -> usize {
        (self.radial_segments * self.tubular_segments * 6) as usize
    }

    /// Generate vertices and counter-clockwise triangle indices.
    ///
    /// The seam row and column are duplicated so each ring of vertices closes
    /// on itself.
    pub fn build(&self) -> (Vec<Vertex>, Vec<u32>) {
        let radial = self.radial_segments;
        let tubular = self.tubular_segments;

        let mut vertices = Vec::with_capacity(self.vertex_count());
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            for i in 0..=tubular {
                let u = i as f32 / tubular as f32 * TAU;
                let ring = self.radius + self.tube * v.cos();
                let position = [ring * u.cos(), ring * u.sin(), self.tube * v.sin()];
                let center = [self.radius * u.cos(), self.radius * u.sin(), 0.0];
                let normal = glam::Vec3::from(position) - glam::Vec3::from(center);
                vertices.push(Vertex {
                    position,
                    normal: normal.normalize_or_zero().to_array(),
                });
            }
        }

        let row = tubular + 1;
        let mut indices = Vec::with_capacity(self.index_count());
        for j in 1..=radial {
            for i in 1..=tubular {
                let a = (row * j + i - 1);
                let b = (row * (j - 1) + i - 1);
                let c = (row * (j - 1) + i);
                let d = (row * j + i);
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        (vertices, indices)
    }
}
