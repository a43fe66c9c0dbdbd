//! Reactive post passes applied to the landscape frame buffer.

use crate::deform::noise::NoiseField;
use crate::foundation::core::{Point, Rect, Rgb8};
use crate::foundation::error::EngineResult;
use crate::foundation::math::smoothstep;
use crate::mapping::remap::remap_clamped;
use crate::render::surface::Surface;
use crate::render::vector::VectorPass;

/// Side of one erosion cell in pixels.
pub const EROSION_CELL: u32 = 24;
/// Cells whose alpha would fall below this are skipped.
const EROSION_MIN_ALPHA: f64 = 1.0;
/// Tints at or below this saturation (0–255) are skipped.
pub const TINT_MIN_SATURATION: f64 = 10.0;
/// Vignette alpha at the corners for full intensity.
const VIGNETTE_MAX_ALPHA: f64 = 200.0;
/// Radius fraction where the vignette starts to darken.
const VIGNETTE_INNER: f64 = 0.45;
/// Gradient stops sampling the smoothstep falloff between the inner radius and the corners.
const VIGNETTE_STEPS: usize = 8;

/// Darken a grid of noise-modulated cells. `strength` is `erosion · globalIntensity`.
pub fn erosion_overlay(
    surface: &mut Surface,
    strength: f64,
    time: f64,
    noise: &dyn NoiseField,
) -> EngineResult<()> {
    if !strength.is_finite() || strength <= 0.0 {
        return Ok(());
    }
    let mut pass = VectorPass::for_surface(surface)?;
    let cell = f64::from(EROSION_CELL);
    let cols = surface.width().div_ceil(EROSION_CELL);
    let rows = surface.height().div_ceil(EROSION_CELL);
    for row in 0..rows {
        for col in 0..cols {
            let (cx, cy) = (f64::from(col), f64::from(row));
            let n = noise.noise3(cx * 0.35 + time * 0.3, cy * 0.35 - time * 0.2, time * 0.5);
            let alpha = remap_clamped(n, 0.35, 1.0, 0.0, 1.0) * strength * 220.0;
            if alpha < EROSION_MIN_ALPHA {
                continue;
            }
            let rect = Rect::new(cx * cell, cy * cell, (cx + 1.0) * cell, (cy + 1.0) * cell);
            pass.fill_rect(rect, Rgb8::BLACK, alpha);
        }
    }
    pass.composite_onto(surface)
}

/// Multiply-blend a flat tint. Alpha is `remap(saturation, 10, 255, 0, 150) · globalIntensity`.
pub fn tint(surface: &mut Surface, color: Rgb8, global_intensity: f64) {
    let saturation = color.saturation();
    if saturation <= TINT_MIN_SATURATION {
        return;
    }
    let alpha =
        remap_clamped(saturation, TINT_MIN_SATURATION, 255.0, 0.0, 150.0) * global_intensity;
    surface.multiply(color.with_alpha(alpha));
}

/// Radial darkening from the center outwards, scaled by `global_intensity`.
///
/// Alpha follows `smoothstep(0.45, 1, r)` of the distance to the center over the half-diagonal.
pub fn vignette(surface: &mut Surface, global_intensity: f64) -> EngineResult<()> {
    if !global_intensity.is_finite() || global_intensity <= 0.0 {
        return Ok(());
    }
    let area = surface.canvas().rect();
    if area.is_zero_area() {
        return Ok(());
    }
    let center = Point::new(area.width() * 0.5, area.height() * 0.5);
    let max_r = center.to_vec2().hypot();
    let peak = VIGNETTE_MAX_ALPHA * global_intensity;

    let mut stops = vec![(0.0_f32, 0.0)];
    for step in 0..=VIGNETTE_STEPS {
        let t = VIGNETTE_INNER + (1.0 - VIGNETTE_INNER) * step as f64 / VIGNETTE_STEPS as f64;
        stops.push((t as f32, smoothstep(VIGNETTE_INNER, 1.0, t) * peak));
    }

    let mut pass = VectorPass::for_surface(surface)?;
    pass.fill_radial(area, center, max_r, Rgb8::BLACK, &stops);
    pass.composite_onto(surface)
}

#[cfg(test)]
#[path = "../../tests/unit/composite/effects.rs"]
mod tests;
