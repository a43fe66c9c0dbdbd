//! Coherent noise sampled by the mesh deformer and the erosion overlay.

use crate::foundation::rng::Rng64;

/// A continuous, band-limited pseudo-random field with values in `[0, 1]`.
pub trait NoiseField: Send + Sync {
    /// Sample the 2D field.
    fn noise2(&self, x: f64, y: f64) -> f64;

    /// Sample the 3D field.
    fn noise3(&self, x: f64, y: f64, z: f64) -> f64;
}

/// Improved Perlin noise over a seeded permutation table.
#[derive(Clone, Debug)]
pub struct PerlinField {
    perm: [u8; 512],
}

impl PerlinField {
    /// Build a field whose permutation is shuffled by `seed`.
    pub fn new(seed: u64) -> Self {
        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);
        let mut rng = Rng64::new(seed);
        for i in (1..table.len()).rev() {
            let j = (rng.next_u64() % (i as u64 + 1)) as usize;
            table.swap(i, j);
        }
        let perm = std::array::from_fn(|i| table[i & 255]);
        Self { perm }
    }

    fn hash(&self, i: usize) -> usize {
        usize::from(self.perm[i & 511])
    }

    /// Raw gradient noise in roughly `[-1, 1]`.
    fn signed3(&self, x: f64, y: f64, z: f64) -> f64 {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return 0.0;
        }
        let (xf, yf, zf) = (x.floor(), y.floor(), z.floor());
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let zi = (zf as i64 & 255) as usize;
        let (x, y, z) = (x - xf, y - yf, z - zf);
        let (u, v, w) = (fade(x), fade(y), fade(z));

        let a = self.hash(xi) + yi;
        let aa = self.hash(a) + zi;
        let ab = self.hash(a + 1) + zi;
        let b = self.hash(xi + 1) + yi;
        let ba = self.hash(b) + zi;
        let bb = self.hash(b + 1) + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad(self.hash(aa), x, y, z), grad(self.hash(ba), x - 1.0, y, z)),
                lerp(
                    u,
                    grad(self.hash(ab), x, y - 1.0, z),
                    grad(self.hash(bb), x - 1.0, y - 1.0, z),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(self.hash(aa + 1), x, y, z - 1.0),
                    grad(self.hash(ba + 1), x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad(self.hash(ab + 1), x, y - 1.0, z - 1.0),
                    grad(self.hash(bb + 1), x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        )
    }
}

impl Default for PerlinField {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NoiseField for PerlinField {
    fn noise2(&self, x: f64, y: f64) -> f64 {
        self.noise3(x, y, 0.0)
    }

    fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        (self.signed3(x, y, z) * 0.5 + 0.5).clamp(0.0, 1.0)
    }
}

/// Field returning the same value everywhere. `0.5` yields zero noise displacement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantField(pub f64);

impl Default for ConstantField {
    fn default() -> Self {
        Self(0.5)
    }
}

impl NoiseField for ConstantField {
    fn noise2(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }

    fn noise3(&self, _x: f64, _y: f64, _z: f64) -> f64 {
        self.0
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

#[cfg(test)]
#[path = "../../tests/unit/deform/noise.rs"]
mod tests;
