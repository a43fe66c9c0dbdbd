//! Separable Gaussian blur on premultiplied RGBA8 with a Q16 fixed-point kernel.

use rayon::prelude::*;

use crate::foundation::alloc::try_filled;
use crate::foundation::error::{EngineError, EngineResult};
use crate::render::surface::Surface;

/// Largest radius accepted; larger requests are clamped.
pub const MAX_RADIUS: u32 = 64;

/// Sigma used for a given radius.
pub fn sigma_for_radius(radius: u32) -> f32 {
    (radius as f32 * 0.5).max(0.5)
}

/// Blur `surface` in place with radius `round(amount)`. Amounts below 1 are a no-op.
pub fn blur_amount(surface: &mut Surface, amount: f64) -> EngineResult<()> {
    if !amount.is_finite() || amount < 1.0 {
        return Ok(());
    }
    let radius = (amount.round() as u32).min(MAX_RADIUS);
    blur_in_place(surface, radius, sigma_for_radius(radius))
}

/// Blur `surface` in place.
pub fn blur_in_place(surface: &mut Surface, radius: u32, sigma: f32) -> EngineResult<()> {
    let (width, height) = (surface.width(), surface.height());
    if radius == 0 || width == 0 || height == 0 {
        return Ok(());
    }
    let kernel = gaussian_kernel_q16(radius.min(MAX_RADIUS), sigma)?;
    let mut tmp = try_filled(surface.data().len(), 0u8, "blur scratch")?;
    horizontal_pass(surface.data(), &mut tmp, width, &kernel);
    vertical_pass(&tmp, surface.data_mut(), width, height, &kernel);
    Ok(())
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> EngineResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(EngineError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(EngineError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = width as i64;
    let stride = width as usize * 4;
    dst.par_chunks_mut(stride)
        .zip(src.par_chunks(stride))
        .for_each(|(out_row, in_row)| {
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as i64 - radius).clamp(0, w - 1) as usize;
                    let px = &in_row[sx * 4..sx * 4 + 4];
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(px[c]);
                    }
                }
                let o = x as usize * 4;
                for c in 0..4 {
                    out_row[o + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let h = height as i64;
    let stride = width as usize * 4;
    dst.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, out_row)| {
            for x in 0..width as usize {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sy = (y as i64 + ki as i64 - radius).clamp(0, h - 1) as usize;
                    let idx = sy * stride + x * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                    }
                }
                for c in 0..4 {
                    out_row[x * 4 + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
