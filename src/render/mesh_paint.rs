//! Drawing landscape images into a surface, optionally through the deformation mesh.

use std::sync::Arc;

use crate::assets::images::ImageHandle;
use crate::deform::mesh::{DEFAULT_COLS, DEFAULT_ROWS, DeformParams, DeformationMesh};
use crate::deform::noise::NoiseField;
use crate::foundation::core::{Affine, Point, Rect, Vec3};
use crate::foundation::error::EngineResult;
use crate::render::surface::Surface;
use crate::render::vector::VectorPass;

/// Meshes kept alive at once (the outgoing and incoming image during a transition).
const MESH_CACHE: usize = 2;
/// Vertical field of view of the default perspective camera.
const FOV_DEG: f64 = 60.0;

/// Draws an image into a destination rectangle of a surface.
pub trait ContentPainter {
    /// Paint `content` stretched over `dest` at `opacity` (`0..=1`).
    fn paint(
        &mut self,
        content: &ImageHandle,
        dest: Rect,
        opacity: f32,
        dst: &mut Surface,
    ) -> EngineResult<()>;
}

/// Undeformed painter: the image scaled onto `dest`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatPainter;

impl ContentPainter for FlatPainter {
    fn paint(
        &mut self,
        content: &ImageHandle,
        dest: Rect,
        opacity: f32,
        dst: &mut Surface,
    ) -> EngineResult<()> {
        let size = content.size();
        if size.is_zero_area() || dest.is_zero_area() {
            return Ok(());
        }
        let transform = Affine::translate(dest.origin().to_vec2())
            * Affine::scale_non_uniform(dest.width() / size.width, dest.height() / size.height);
        let mut pass = VectorPass::for_surface(dst)?;
        pass.draw_image(content.paint(), size, transform, opacity);
        pass.composite_onto(dst)
    }
}

/// Perspective camera looking down -z at the surface center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perspective {
    center: Point,
    distance: f64,
}

impl Perspective {
    /// Camera whose `z = 0` plane maps 1:1 onto a surface of the given size.
    pub fn for_surface(width: u32, height: u32) -> Self {
        let half_h = f64::from(height) * 0.5;
        Self {
            center: Point::new(f64::from(width) * 0.5, half_h),
            distance: half_h / (FOV_DEG.to_radians() * 0.5).tan(),
        }
    }

    /// Project a 3D point; `None` when it is at or behind the camera.
    pub fn project(&self, p: Vec3) -> Option<Point> {
        let denom = self.distance - p.z;
        if denom <= 1e-6 || !denom.is_finite() {
            return None;
        }
        let k = self.distance / denom;
        Some(Point::new(
            self.center.x + (p.x - self.center.x) * k,
            self.center.y + (p.y - self.center.y) * k,
        ))
    }
}

/// Painter that warps images through a cached [`DeformationMesh`].
pub struct MeshPainter {
    cols: u32,
    rows: u32,
    params: DeformParams,
    noise: Arc<dyn NoiseField>,
    meshes: Vec<DeformationMesh>,
}

impl std::fmt::Debug for MeshPainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshPainter")
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .field("params", &self.params)
            .field("meshes", &self.meshes.len())
            .finish()
    }
}

impl MeshPainter {
    /// Painter with the default 60×40 grid.
    pub fn new(noise: Arc<dyn NoiseField>) -> Self {
        Self::with_resolution(noise, DEFAULT_COLS, DEFAULT_ROWS)
    }

    /// Painter with an explicit grid resolution.
    pub fn with_resolution(noise: Arc<dyn NoiseField>, cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            params: DeformParams::default(),
            noise,
            meshes: Vec::with_capacity(MESH_CACHE),
        }
    }

    /// Reactive parameters for subsequent paints.
    pub fn set_params(&mut self, params: DeformParams) {
        self.params = params;
    }

    /// Current reactive parameters.
    pub fn params(&self) -> DeformParams {
        self.params
    }

    /// Cached meshes, most recently used first.
    pub fn meshes(&self) -> &[DeformationMesh] {
        &self.meshes
    }

    /// Move the mesh for `(dest, content size)` to the front, building it if needed.
    fn select_mesh(&mut self, content: &ImageHandle, dest: Rect) -> EngineResult<()> {
        let size = content.size();
        let resolution = Some((self.cols, self.rows));
        let hit = self.meshes.iter().position(|m| {
            m.dest() == Some(dest) && m.source_size() == Some(size) && m.resolution() == resolution
        });
        let mut mesh = match hit {
            Some(i) => self.meshes.remove(i),
            None if self.meshes.len() >= MESH_CACHE => self.meshes.pop().unwrap_or_default(),
            None => DeformationMesh::new(),
        };
        mesh.ensure_topology(self.cols, self.rows, dest, size)?;
        self.meshes.insert(0, mesh);
        Ok(())
    }
}

impl ContentPainter for MeshPainter {
    fn paint(
        &mut self,
        content: &ImageHandle,
        dest: Rect,
        opacity: f32,
        dst: &mut Surface,
    ) -> EngineResult<()> {
        self.select_mesh(content, dest)?;
        let mesh = &mut self.meshes[0];
        mesh.update_vertex_positions(&self.params, self.noise.as_ref());

        let camera = Perspective::for_surface(dst.width(), dst.height());
        let size = content.size();
        let vertices = mesh.vertices();
        // Screen position and texel coordinate of one vertex.
        let project = |i: u32| -> Option<(Point, Point)> {
            let v = vertices.get(i as usize)?;
            Some((
                camera.project(v.position)?,
                Point::new(v.uv.x * size.width, v.uv.y * size.height),
            ))
        };
        let triangles = mesh.triangles().iter().filter_map(|&[a, b, c]| {
            let (a, b, c) = (project(a)?, project(b)?, project(c)?);
            Some(([a.0, b.0, c.0], [a.1, b.1, c.1]))
        });

        let mut pass = VectorPass::for_surface(dst)?;
        pass.textured_triangles(&content.paint(), triangles, opacity);
        pass.composite_onto(dst)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/mesh_paint.rs"]
mod tests;
