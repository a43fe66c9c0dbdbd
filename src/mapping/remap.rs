//! Control-to-effect conversion.
//!
//! Every reactive parameter in the engine is derived from an external control value through
//! [`remap`]. The functions here are pure; none of them hold state or log.

/// Affine map of `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// With `clamp`, the result is bounded to the output interval whichever way round it is
/// given. A zero-width input range yields `out_min`, as does a non-finite `value`.
pub fn remap(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64, clamp: bool) -> f64 {
    if in_min == in_max || !value.is_finite() {
        return out_min;
    }
    let out = (value - in_min) / (in_max - in_min) * (out_max - out_min) + out_min;
    if !clamp {
        return out;
    }
    if out_max < out_min {
        out.clamp(out_max, out_min)
    } else {
        out.clamp(out_min, out_max)
    }
}

/// [`remap`] with clamping enabled, the form used by every control mapping.
pub fn remap_clamped(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    remap(value, in_min, in_max, out_min, out_max, true)
}

/// One step of exponential relaxation of `current` toward `target`.
///
/// `rate` is the fraction of the remaining gap closed per step (`0` = frozen, `1` = snap).
pub fn relax_toward(current: f64, target: f64, rate: f64) -> f64 {
    let rate = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 };
    current + (target - current) * rate
}

/// One step of multiplicative decay toward zero.
pub fn decay(value: f64, factor: f64) -> f64 {
    let factor = if factor.is_finite() {
        factor.clamp(0.0, 1.0)
    } else {
        0.0
    };
    value * factor
}

/// Map a note value to a 0–255 hue.
///
/// Values above 1 are read as MIDI notes (`0..=127`), anything else as a normalized `0..=1`.
pub fn note_to_hue(note: f64) -> f64 {
    if note > 1.0 {
        remap_clamped(note, 0.0, 127.0, 0.0, 255.0)
    } else {
        remap_clamped(note, 0.0, 1.0, 0.0, 255.0)
    }
}

/// HSB to RGB with every component on the 0–255 scale.
pub fn hsb_to_rgb(hue: f64, saturation: f64, brightness: f64) -> crate::Rgb8 {
    let hue = hue.clamp(0.0, 255.0);
    let sat = saturation.clamp(0.0, 255.0) / 255.0;
    let bri = brightness.clamp(0.0, 255.0);

    if bri <= 0.0 {
        return crate::Rgb8::BLACK;
    }
    if sat <= 0.0 {
        return crate::Rgb8::from_f64(bri, bri, bri);
    }

    let hue_six = hue * 6.0 / 255.0;
    let sector = hue_six.floor();
    let rem = hue_six - sector;
    let pv = (1.0 - sat) * bri;
    let qv = (1.0 - sat * rem) * bri;
    let tv = (1.0 - sat * (1.0 - rem)) * bri;

    let (r, g, b) = match sector as u8 {
        0 | 6 => (bri, tv, pv),
        1 => (qv, bri, pv),
        2 => (pv, bri, tv),
        3 => (pv, qv, bri),
        4 => (tv, pv, bri),
        _ => (bri, pv, qv),
    };
    crate::Rgb8::from_f64(r, g, b)
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/remap.rs"]
mod tests;
