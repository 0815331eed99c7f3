//! Improved Perlin noise over a shuffled permutation table.

// Noise code uses mathematical single-letter variables (x, y, z, i, j, k)
#![allow(clippy::many_single_char_names)]

use crate::random::Random;

use super::{floor, lerp3, smoothstep};

/// Gradient vectors for noise computation.
static GRADIENT: [[i32; 3]; 16] = [
    [1, 1, 0],
    [-1, 1, 0],
    [1, -1, 0],
    [-1, -1, 0],
    [1, 0, 1],
    [-1, 0, 1],
    [1, 0, -1],
    [-1, 0, -1],
    [0, 1, 1],
    [0, -1, 1],
    [0, 1, -1],
    [0, -1, -1],
    [1, 1, 0],
    [0, -1, 1],
    [-1, 1, 0],
    [0, -1, -1],
];

#[inline]
fn dot(gradient: [i32; 3], x: f64, y: f64, z: f64) -> f64 {
    f64::from(gradient[0]) * x + f64::from(gradient[1]) * y + f64::from(gradient[2]) * z
}

/// Improved Perlin noise generator.
///
/// The permutation table and the lattice offsets are drawn from the random
/// source at construction, so the same seed always yields the same field.
#[derive(Debug, Clone)]
pub struct ImprovedNoise {
    /// Permutation table (256 bytes).
    p: [u8; 256],
    /// X offset for noise variation.
    pub xo: f64,
    /// Y offset for noise variation.
    pub yo: f64,
    /// Z offset for noise variation.
    pub zo: f64,
}

impl ImprovedNoise {
    /// Creates a new `ImprovedNoise` from a random source.
    pub fn new<R: Random>(random: &mut R) -> Self {
        let xo = random.next_f64() * 256.0;
        let yo = random.next_f64() * 256.0;
        let zo = random.next_f64() * 256.0;

        let mut p = [0u8; 256];
        for (i, item) in p.iter_mut().enumerate() {
            *item = i as u8;
        }

        // Fisher-Yates shuffle
        for i in 0..256 {
            let j = random.next_i32_bounded((256 - i) as i32) as usize;
            p.swap(i, i + j);
        }

        Self { p, xo, yo, zo }
    }

    #[inline]
    fn p(&self, index: i32) -> i32 {
        i32::from(self.p[(index & 255) as usize])
    }

    #[inline]
    fn grad_dot(grad_index: i32, x: f64, y: f64, z: f64) -> f64 {
        dot(GRADIENT[(grad_index & 15) as usize], x, y, z)
    }

    /// Sample 3D Perlin noise at the given coordinates.
    #[must_use]
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        let d = x + self.xo;
        let e = y + self.yo;
        let f = z + self.zo;

        let i = floor(d);
        let j = floor(e);
        let k = floor(f);

        self.sample_and_lerp(i, j, k, d - f64::from(i), e - f64::from(j), f - f64::from(k))
    }

    fn sample_and_lerp(
        &self,
        grid_x: i32,
        grid_y: i32,
        grid_z: i32,
        delta_x: f64,
        delta_y: f64,
        delta_z: f64,
    ) -> f64 {
        let i = self.p(grid_x);
        let j = self.p(grid_x + 1);
        let k = self.p(i + grid_y);
        let l = self.p(i + grid_y + 1);
        let m = self.p(j + grid_y);
        let n = self.p(j + grid_y + 1);

        let d = Self::grad_dot(self.p(k + grid_z), delta_x, delta_y, delta_z);
        let e = Self::grad_dot(self.p(m + grid_z), delta_x - 1.0, delta_y, delta_z);
        let f = Self::grad_dot(self.p(l + grid_z), delta_x, delta_y - 1.0, delta_z);
        let g = Self::grad_dot(self.p(n + grid_z), delta_x - 1.0, delta_y - 1.0, delta_z);
        let h = Self::grad_dot(self.p(k + grid_z + 1), delta_x, delta_y, delta_z - 1.0);
        let o = Self::grad_dot(self.p(m + grid_z + 1), delta_x - 1.0, delta_y, delta_z - 1.0);
        let p = Self::grad_dot(self.p(l + grid_z + 1), delta_x, delta_y - 1.0, delta_z - 1.0);
        let q = Self::grad_dot(
            self.p(n + grid_z + 1),
            delta_x - 1.0,
            delta_y - 1.0,
            delta_z - 1.0,
        );

        let r = smoothstep(delta_x);
        let s = smoothstep(delta_y);
        let t = smoothstep(delta_z);

        lerp3(r, s, t, d, e, f, g, h, o, p, q)
    }
}
