//! Vector drawing onto a [`Surface`] through `vello_cpu`.
//!
//! A [`VectorPass`] records fills into a transparent layer the size of its target. Finishing the
//! pass rasterizes that layer and composites it over the target, so several fills share one
//! rasterization.

use crate::foundation::core::{Affine, Point, Rect, Rgb8};
use crate::foundation::error::{EngineError, EngineResult};
use crate::render::composite;
use crate::render::surface::Surface;

/// Outward edge offset for mesh triangles: half a pixel diagonal, so every pixel whose center
/// lies in a triangle is fully covered by that triangle and shared edges leave no AA seam.
const SEAM_OVERLAP: f64 = 0.75;

/// Recorded fills waiting to be composited over a surface.
pub struct VectorPass {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    drawn: bool,
}

impl std::fmt::Debug for VectorPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorPass")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("drawn", &self.drawn)
            .finish_non_exhaustive()
    }
}

impl VectorPass {
    /// Empty pass sized to `target`.
    pub fn for_surface(target: &Surface) -> EngineResult<Self> {
        let (width, height) = pixmap_dims(target.width(), target.height())?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            width,
            height,
            drawn: false,
        })
    }

    /// Whether anything has been recorded.
    pub fn is_empty(&self) -> bool {
        !self.drawn
    }

    /// Solid rectangle in surface pixels.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgb8, alpha: f64) {
        let a = alpha_u8(alpha);
        if a == 0 || rect.is_zero_area() {
            return;
        }
        self.reset_transforms(Affine::IDENTITY);
        self.ctx.set_paint(solid(color, a));
        self.ctx.fill_rect(&rect_to_cpu(rect));
        self.drawn = true;
    }

    /// Fill `area` with `color` whose alpha follows `stops` radially out from `center`.
    ///
    /// Stop offsets are fractions of `radius`; beyond the last stop the last alpha holds.
    pub fn fill_radial(
        &mut self,
        area: Rect,
        center: Point,
        radius: f64,
        color: Rgb8,
        stops: &[(f32, f64)],
    ) {
        if stops.is_empty() || !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let stops: Vec<(f32, vello_cpu::peniko::Color)> = stops
            .iter()
            .map(|&(offset, alpha)| (offset.clamp(0.0, 1.0), solid(color, alpha_u8(alpha))))
            .collect();
        let gradient = vello_cpu::peniko::Gradient::new_radial((center.x, center.y), radius as f32)
            .with_stops(stops.as_slice());
        self.reset_transforms(Affine::IDENTITY);
        self.ctx.set_paint(gradient);
        self.ctx.fill_rect(&rect_to_cpu(area));
        self.drawn = true;
    }

    /// Draw an image paint of `size` texels through `transform`, at `opacity` (`0..=1`).
    pub fn draw_image(
        &mut self,
        paint: vello_cpu::Image,
        size: kurbo::Size,
        transform: Affine,
        opacity: f32,
    ) {
        if opacity <= 0.0 || size.is_zero_area() {
            return;
        }
        self.reset_transforms(transform);
        self.ctx.set_paint(paint);
        self.with_opacity(opacity, |ctx| {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, size.width, size.height));
        });
        self.drawn = true;
    }

    /// Fill screen-space triangles with an image paint, each with its own texel-to-screen map.
    ///
    /// Every item pairs three screen positions with the matching texel coordinates. Triangles
    /// whose texel coordinates are collinear are skipped.
    pub fn textured_triangles(
        &mut self,
        paint: &vello_cpu::Image,
        triangles: impl IntoIterator<Item = ([Point; 3], [Point; 3])>,
        opacity: f32,
    ) {
        if opacity <= 0.0 {
            return;
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint.clone());
        let mut drawn = false;
        self.with_opacity(opacity, |ctx| {
            for (pos, uv) in triangles {
                let Some(map) = triangle_affine(uv, pos) else {
                    continue;
                };
                let [a, b, c] = inflate_triangle(pos, SEAM_OVERLAP);
                let mut path = vello_cpu::kurbo::BezPath::new();
                path.move_to(point_to_cpu(a));
                path.line_to(point_to_cpu(b));
                path.line_to(point_to_cpu(c));
                path.close_path();
                ctx.set_paint_transform(affine_to_cpu(map));
                ctx.fill_path(&path);
                drawn = true;
            }
        });
        self.drawn |= drawn;
    }

    /// Fill positioned glyphs of `font` at `size_px`, placed through `transform`.
    pub fn fill_glyphs(
        &mut self,
        font: &vello_cpu::peniko::FontData,
        size_px: f32,
        transform: Affine,
        color: Rgb8,
        alpha: f64,
        glyphs: impl Iterator<Item = vello_cpu::Glyph>,
    ) {
        let a = alpha_u8(alpha);
        if a == 0 {
            return;
        }
        self.reset_transforms(transform);
        self.ctx.set_paint(solid(color, a));
        self.ctx
            .glyph_run(font)
            .font_size(size_px)
            .fill_glyphs(glyphs);
        self.drawn = true;
    }

    /// Rasterize the recorded fills and composite them over `target`.
    pub fn composite_onto(mut self, target: &mut Surface) -> EngineResult<()> {
        if (target.width(), target.height()) != (u32::from(self.width), u32::from(self.height)) {
            return Err(EngineError::render(format!(
                "vector pass is {}x{} but target is {}x{}",
                self.width,
                self.height,
                target.width(),
                target.height()
            )));
        }
        if !self.drawn {
            return Ok(());
        }
        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut layer);
        composite::over_in_place(target.data_mut(), layer.data_as_u8_slice(), 1.0)
    }

    fn reset_transforms(&mut self, transform: Affine) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    fn with_opacity(&mut self, opacity: f32, draw: impl FnOnce(&mut vello_cpu::RenderContext)) {
        let layered = opacity < 1.0;
        if layered {
            self.ctx.push_opacity_layer(opacity);
        }
        draw(&mut self.ctx);
        if layered {
            self.ctx.pop_layer();
        }
    }
}

/// Affine map sending the texel triangle `uv` onto the screen triangle `pos`.
///
/// `None` when `uv` is degenerate or any input is non-finite.
pub fn triangle_affine(uv: [Point; 3], pos: [Point; 3]) -> Option<Affine> {
    let finite = |p: &Point| p.x.is_finite() && p.y.is_finite();
    if !uv.iter().chain(pos.iter()).all(finite) {
        return None;
    }
    let (u1, u2) = (uv[1] - uv[0], uv[2] - uv[0]);
    let det = u1.x * u2.y - u2.x * u1.y;
    if det.abs() <= f64::EPSILON {
        return None;
    }
    let (p1, p2) = (pos[1] - pos[0], pos[2] - pos[0]);
    // Screen edges times the inverse of the texel edge matrix.
    let inv = [u2.y / det, -u1.y / det, -u2.x / det, u1.x / det];
    let a = p1.x * inv[0] + p2.x * inv[1];
    let b = p1.y * inv[0] + p2.y * inv[1];
    let c = p1.x * inv[2] + p2.x * inv[3];
    let d = p1.y * inv[2] + p2.y * inv[3];
    let e = pos[0].x - (a * uv[0].x + c * uv[0].y);
    let f = pos[0].y - (b * uv[0].x + d * uv[0].y);
    Some(Affine::new([a, b, c, d, e, f]))
}

/// Push every edge of `tri` outward by `by` pixels (scaling about the incenter).
///
/// Triangles thinner than `by` are returned unchanged to avoid long miter spikes.
pub fn inflate_triangle(tri: [Point; 3], by: f64) -> [Point; 3] {
    let [a, b, c] = tri;
    let (la, lb, lc) = ((c - b).hypot(), (a - c).hypot(), (b - a).hypot());
    let perimeter = la + lb + lc;
    let area2 = ((b - a).cross(c - a)).abs();
    if perimeter <= f64::EPSILON || area2 <= f64::EPSILON {
        return tri;
    }
    let inradius = area2 / perimeter;
    if inradius < by {
        return tri;
    }
    let center = Point::new(
        (la * a.x + lb * b.x + lc * c.x) / perimeter,
        (la * a.y + lb * b.y + lc * c.y) / perimeter,
    );
    let k = (inradius + by) / inradius;
    tri.map(|p| center + (p - center) * k)
}

/// `vello_cpu` pixmaps are addressed with `u16` sides.
pub(crate) fn pixmap_dims(width: u32, height: u32) -> EngineResult<(u16, u16)> {
    let w = u16::try_from(width)
        .map_err(|_| EngineError::render(format!("width {width} exceeds u16")))?;
    let h = u16::try_from(height)
        .map_err(|_| EngineError::render(format!("height {height} exceeds u16")))?;
    Ok((w, h))
}

fn alpha_u8(alpha: f64) -> u8 {
    if alpha.is_finite() {
        alpha.round().clamp(0.0, 255.0) as u8
    } else {
        0
    }
}

fn solid(color: Rgb8, alpha: u8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, alpha)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/vector.rs"]
mod tests;
