//! Per-pixel blend operators on premultiplied RGBA8.

use rayon::prelude::*;

use crate::foundation::error::{EngineError, EngineResult};
use crate::foundation::math::{mul_div255_u8, opacity_to_u8};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Bytes per rayon task for whole-buffer operations (a multiple of 4).
const PAR_CHUNK_BYTES: usize = 64 * 1024;

/// Source-over with an extra opacity multiplier.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = u16::from(opacity_to_u8(opacity));
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Multiply `dst` color by a premultiplied `tint`: `dst · (1 − a + c)`. Alpha is preserved.
pub fn multiply(dst: PremulRgba8, tint: PremulRgba8) -> PremulRgba8 {
    if tint[3] == 0 {
        return dst;
    }
    let keep = 255u16 - u16::from(tint[3]);
    let mut out = dst;
    for i in 0..3 {
        let factor = (keep + u16::from(tint[i])).min(255);
        out[i] = mul_div255_u8(u16::from(dst[i]), factor);
    }
    out
}

/// Composite `src` over `dst` in place. Both buffers must have the same length.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> EngineResult<()> {
    check_pair(dst, src, "over_in_place")?;
    if opacity_to_u8(opacity) == 0 {
        return Ok(());
    }
    dst.par_chunks_mut(PAR_CHUNK_BYTES)
        .zip(src.par_chunks(PAR_CHUNK_BYTES))
        .for_each(|(d, s)| {
            for (d, s) in d.chunks_exact_mut(4).zip(s.chunks_exact(4)) {
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
                d.copy_from_slice(&out);
            }
        });
    Ok(())
}

/// Composite a single color over every pixel of `dst`.
pub fn fill_over_in_place(dst: &mut [u8], color: PremulRgba8) {
    if color[3] == 0 {
        return;
    }
    dst.par_chunks_mut(PAR_CHUNK_BYTES).for_each(|d| {
        for d in d.chunks_exact_mut(4) {
            let out = over([d[0], d[1], d[2], d[3]], color, 1.0);
            d.copy_from_slice(&out);
        }
    });
}

/// Multiply every pixel of `dst` by `tint`.
pub fn multiply_in_place(dst: &mut [u8], tint: PremulRgba8) {
    if tint[3] == 0 {
        return;
    }
    dst.par_chunks_mut(PAR_CHUNK_BYTES).for_each(|d| {
        for d in d.chunks_exact_mut(4) {
            let out = multiply([d[0], d[1], d[2], d[3]], tint);
            d.copy_from_slice(&out);
        }
    });
}

fn check_pair(dst: &[u8], src: &[u8], what: &str) -> EngineResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(EngineError::render(format!(
            "{what} expects equal-length rgba8 buffers ({} vs {})",
            dst.len(),
            src.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
