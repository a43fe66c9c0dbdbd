use crate::foundation::alloc::{rgba_len, try_filled};
use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::foundation::error::{EngineError, EngineResult};
use crate::render::composite::{self, PremulRgba8};

/// Premultiplied RGBA8 pixel buffer, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a fully transparent surface.
    pub fn new(width: u32, height: u32) -> EngineResult<Self> {
        Self::filled(width, height, Rgba8Premul::transparent())
    }

    /// Allocate a surface where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8Premul) -> EngineResult<Self> {
        let len = rgba_len(width, height)?;
        let mut data = try_filled(len, 0u8, "surface")?;
        fill_pixels(&mut data, color.to_array());
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap an existing premultiplied buffer.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> EngineResult<Self> {
        if data.len() != rgba_len(width, height)? {
            return Err(EngineError::render(format!(
                "surface data length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size as a canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Raw premultiplied bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw premultiplied bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Whether the surface has the given size.
    pub fn matches(&self, canvas: Canvas) -> bool {
        self.width == canvas.width && self.height == canvas.height
    }

    /// Pixel at `(x, y)`, or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.data[idx..idx + 4];
        Some(Rgba8Premul {
            r: p[0],
            g: p[1],
            b: p[2],
            a: p[3],
        })
    }

    /// Overwrite every pixel.
    pub fn clear(&mut self, color: Rgba8Premul) {
        fill_pixels(&mut self.data, color.to_array());
    }

    /// Composite `color` over the whole surface.
    pub fn fill_over(&mut self, color: Rgba8Premul) {
        composite::fill_over_in_place(&mut self.data, color.to_array());
    }

    /// Multiply the whole surface by a premultiplied tint.
    pub fn multiply(&mut self, tint: Rgba8Premul) {
        composite::multiply_in_place(&mut self.data, tint.to_array());
    }

    /// Composite another surface of the same size on top.
    pub fn draw_over(&mut self, src: &Surface, opacity: f32) -> EngineResult<()> {
        self.check_same_size(src)?;
        composite::over_in_place(&mut self.data, &src.data, opacity)
    }

    /// Convert to a straight-alpha image for encoding.
    pub fn to_rgba_image(&self) -> EngineResult<image::RgbaImage> {
        let mut straight = try_filled(self.data.len(), 0u8, "rgba image")?;
        for (d, s) in straight.chunks_exact_mut(4).zip(self.data.chunks_exact(4)) {
            let a = s[3];
            if a == 0 {
                continue;
            }
            for i in 0..3 {
                let v = (u32::from(s[i]) * 255 + u32::from(a) / 2) / u32::from(a);
                d[i] = v.min(255) as u8;
            }
            d[3] = a;
        }
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| EngineError::render("rgba image buffer size mismatch"))
    }

    fn check_same_size(&self, other: &Surface) -> EngineResult<()> {
        if self.width != other.width || self.height != other.height {
            return Err(EngineError::render(format!(
                "surface size mismatch: {}x{} vs {}x{}",
                self.width, self.height, other.width, other.height
            )));
        }
        Ok(())
    }
}

fn fill_pixels(data: &mut [u8], px: PremulRgba8) {
    for d in data.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
