use crate::foundation::error::{EngineError, EngineResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Monotonic index of a presented frame.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// The following frame (saturating).
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Rational frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator, must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a frame rate, rejecting zero numerator or denominator.
    pub fn new(num: u32, den: u32) -> EngineResult<Self> {
        if den == 0 {
            return Err(EngineError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(EngineError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Nominal duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Nominal duration of one frame.
    pub fn frame_duration(self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.frame_duration_secs())
    }
}

/// Output resolution in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Build a canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Full-canvas rectangle in pixel space.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Center point.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) * 0.5, f64::from(self.height) * 0.5)
    }

    /// Whether either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Rectangle that covers the canvas with content of `size`, centered, aspect preserved.
    pub fn cover_rect(self, size: kurbo::Size) -> Rect {
        let (cw, ch) = (f64::from(self.width), f64::from(self.height));
        if size.width <= 0.0 || size.height <= 0.0 || self.is_empty() {
            return self.rect();
        }
        let content_ratio = size.width / size.height;
        let (w, h) = if cw / ch > content_ratio {
            (cw, cw / content_ratio)
        } else {
            (ch * content_ratio, ch)
        };
        let x = (cw - w) * 0.5;
        let y = (ch - h) * 0.5;
        Rect::new(x, y, x + w, y + h)
    }
}

/// Straight (non-premultiplied) RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb8 {
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Build a color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from float channels, clamping each to `0..=255`.
    pub fn from_f64(r: f64, g: f64, b: f64) -> Self {
        fn ch(v: f64) -> u8 {
            if v.is_finite() {
                v.round().clamp(0.0, 255.0) as u8
            } else {
                0
            }
        }
        Self::new(ch(r), ch(g), ch(b))
    }

    /// Premultiply with an alpha in `0..=255` (fractional alpha is rounded).
    pub fn with_alpha(self, alpha: f64) -> Rgba8Premul {
        let a = if alpha.is_finite() {
            alpha.round().clamp(0.0, 255.0) as u8
        } else {
            0
        };
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, a)
    }

    /// HSB saturation on the 0–255 scale.
    pub fn saturation(self) -> f64 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        if max == 0 {
            return 0.0;
        }
        f64::from(max - min) * 255.0 / f64::from(max)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red (premultiplied).
    pub r: u8,
    /// Green (premultiplied).
    pub g: u8,
    /// Blue (premultiplied).
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Opaque black.
    pub fn opaque_black() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        }
    }

    /// Premultiply a straight RGBA color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channel array in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// 3D position used by the deformation mesh (z points toward the viewer).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    /// X.
    pub x: f64,
    /// Y.
    pub y: f64,
    /// Z.
    pub z: f64,
}

impl Vec3 {
    /// Origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Build a vector.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// XY components as a point.
    pub fn xy(self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
