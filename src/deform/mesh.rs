//! Subdivided image grid whose vertices are displaced by waves and noise every frame.
//!
//! Topology (base positions, texture coordinates, triangle indices) only changes when the
//! destination rectangle, the source size or the grid resolution changes. Per-frame work is
//! limited to recomputing displaced positions.

use std::f64::consts::TAU;

use kurbo::Size;

use crate::deform::noise::NoiseField;
use crate::foundation::alloc::{try_filled, try_with_capacity};
use crate::foundation::core::{Point, Rect, Vec3};
use crate::foundation::error::{EngineError, EngineResult};

/// Default grid columns.
pub const DEFAULT_COLS: u32 = 60;
/// Default grid rows.
pub const DEFAULT_ROWS: u32 = 40;

/// Reactive inputs for one deformation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeformParams {
    /// Scene time in seconds.
    pub time: f64,
    /// Wave displacement amount (0..30 in practice).
    pub wave_amount: f64,
    /// Erosion amount (0..1).
    pub erosion_amount: f64,
    /// Global gate for every displacement term; 0 when effects are disabled.
    pub effect_intensity: f64,
}

/// One grid vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    /// Undisplaced position.
    pub base: Vec3,
    /// Displaced position from the latest [`DeformationMesh::update_vertex_positions`].
    pub position: Vec3,
    /// Normalized texture coordinate in `[0, 1]²`.
    pub uv: Point,
}

/// What a topology was built for.
#[derive(Clone, Copy, Debug, PartialEq)]
struct TopologyKey {
    cols: u32,
    rows: u32,
    dest: Rect,
    source_size: Size,
}

/// Grid of `(cols + 1) × (rows + 1)` vertices with two triangles per cell.
#[derive(Clone, Debug, Default)]
pub struct DeformationMesh {
    key: Option<TopologyKey>,
    vertices: Vec<MeshVertex>,
    triangles: Vec<[u32; 3]>,
}

impl DeformationMesh {
    /// Empty mesh; the first [`ensure_topology`](Self::ensure_topology) builds it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Regenerate base positions, texture coordinates and the index list.
    pub fn rebuild_topology(
        &mut self,
        cols: u32,
        rows: u32,
        dest: Rect,
        source_size: Size,
    ) -> EngineResult<()> {
        if cols == 0 || rows == 0 {
            return Err(EngineError::validation(format!(
                "mesh resolution must be > 0 (got {cols}x{rows})"
            )));
        }
        let vertex_count = (cols as usize + 1)
            .checked_mul(rows as usize + 1)
            .filter(|&n| u32::try_from(n).is_ok())
            .ok_or_else(|| EngineError::validation("mesh resolution too large"))?;
        let triangle_count = (cols as usize) * (rows as usize) * 2;

        let mut vertices = try_filled(vertex_count, MeshVertex::default(), "mesh vertices")?;
        let mut triangles = try_with_capacity(triangle_count, "mesh triangles")?;

        let stride = cols as usize + 1;
        for r in 0..=rows as usize {
            let v = r as f64 / f64::from(rows);
            for c in 0..=cols as usize {
                let u = c as f64 / f64::from(cols);
                let base = Vec3::new(dest.x0 + u * dest.width(), dest.y0 + v * dest.height(), 0.0);
                vertices[r * stride + c] = MeshVertex {
                    base,
                    position: base,
                    uv: Point::new(u, v),
                };
            }
        }

        for r in 0..rows as usize {
            for c in 0..cols as usize {
                let tl = (r * stride + c) as u32;
                let tr = tl + 1;
                let bl = tl + stride as u32;
                let br = bl + 1;
                triangles.push([tl, tr, bl]);
                triangles.push([tr, br, bl]);
            }
        }

        self.vertices = vertices;
        self.triangles = triangles;
        self.key = Some(TopologyKey {
            cols,
            rows,
            dest,
            source_size,
        });
        tracing::debug!(cols, rows, "mesh topology rebuilt");
        Ok(())
    }

    /// Rebuild only if the inputs differ from the current topology. Returns `true` on rebuild.
    pub fn ensure_topology(
        &mut self,
        cols: u32,
        rows: u32,
        dest: Rect,
        source_size: Size,
    ) -> EngineResult<bool> {
        let wanted = TopologyKey {
            cols,
            rows,
            dest,
            source_size,
        };
        if self.key == Some(wanted) {
            return Ok(false);
        }
        self.rebuild_topology(cols, rows, dest, source_size)?;
        Ok(true)
    }

    /// Recompute every displaced position from its base position.
    pub fn update_vertex_positions(&mut self, params: &DeformParams, noise: &dyn NoiseField) {
        let t = params.time;
        let gate = params.effect_intensity;
        if gate == 0.0 || !gate.is_finite() {
            for v in &mut self.vertices {
                v.position = v.base;
            }
            return;
        }

        for v in &mut self.vertices {
            let (u, w) = (v.uv.x, v.uv.y);
            let horizontal = ((u * 8.0 + t * 0.8) * TAU).sin() * params.wave_amount * 0.35;
            let vertical = ((w * 6.0 + t * 0.6) * TAU).sin() * params.wave_amount * 0.2;
            let erosion = (noise.noise2(u * 2.0 + t * 0.3, w * 2.0 + t * 0.3) - 0.5)
                * params.erosion_amount
                * 120.0;
            let depth = (noise.noise3(u * 4.0, w * 4.0, t * 0.5) - 0.5) * 18.0 * gate;
            v.position = v.base + Vec3::new((horizontal + vertical) * gate, erosion * gate, depth);
        }
    }

    /// Vertices in row-major order.
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    /// Triangle index triples into [`vertices`](Self::vertices).
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Grid resolution `(cols, rows)` of the current topology.
    pub fn resolution(&self) -> Option<(u32, u32)> {
        self.key.map(|k| (k.cols, k.rows))
    }

    /// Destination rectangle of the current topology.
    pub fn dest(&self) -> Option<Rect> {
        self.key.map(|k| k.dest)
    }

    /// Source image size of the current topology.
    pub fn source_size(&self) -> Option<Size> {
        self.key.map(|k| k.source_size)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deform/mesh.rs"]
mod tests;
