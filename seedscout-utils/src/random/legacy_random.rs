use crate::random::Random;

const MULTIPLIER: i64 = 0x5DEECE66D;
const INCREMENT: i64 = 0xB;
const MASK: i64 = (1 << 48) - 1;
/// 2^-53, the spacing of the doubles produced by [`LegacyRandom::next_f64`].
const DOUBLE_UNIT: f64 = 1.0 / (1u64 << 53) as f64;
/// 2^-24, the spacing of the floats produced by [`LegacyRandom::next_f32`].
const FLOAT_UNIT: f32 = 1.0 / (1u32 << 24) as f32;

/// The 48-bit linear congruential generator of `java.util.Random`.
#[derive(Debug, Clone)]
pub struct LegacyRandom {
    seed: i64,
}

impl LegacyRandom {
    /// Creates a generator in the same state as `new java.util.Random(seed)`.
    #[must_use]
    pub fn from_seed(seed: i64) -> Self {
        Self {
            seed: Self::scramble(seed),
        }
    }

    /// Re-seeds the generator in place, like `Random.setSeed`.
    pub fn set_seed(&mut self, seed: i64) {
        self.seed = Self::scramble(seed);
    }

    #[inline]
    fn scramble(seed: i64) -> i64 {
        (seed ^ MULTIPLIER) & MASK
    }

    #[inline]
    fn next(&mut self, bits: u32) -> i32 {
        (self.next_random() >> (48 - bits)) as i32
    }

    #[inline]
    fn next_random(&mut self) -> i64 {
        self.seed = self
            .seed
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & MASK;
        self.seed
    }
}

impl Random for LegacyRandom {
    fn next_i32(&mut self) -> i32 {
        self.next(32)
    }

    fn next_i32_bounded(&mut self, bound: i32) -> i32 {
        debug_assert!(bound > 0, "bound must be positive");
        if bound & bound.wrapping_sub(1) == 0 {
            return ((i64::from(bound) * i64::from(self.next(31))) >> 31) as i32;
        }
        loop {
            let bits = self.next(31);
            let value = bits % bound;
            // Rejects the tail of the range that would bias low values.
            if bits.wrapping_sub(value).wrapping_add(bound - 1) >= 0 {
                return value;
            }
        }
    }

    fn next_i64(&mut self) -> i64 {
        let high = i64::from(self.next(32));
        let low = i64::from(self.next(32));
        (high << 32).wrapping_add(low)
    }

    fn next_f32(&mut self) -> f32 {
        self.next(24) as f32 * FLOAT_UNIT
    }

    fn next_f64(&mut self) -> f64 {
        let high = i64::from(self.next(26)) << 27;
        let low = i64::from(self.next(27));
        (high + low) as f64 * DOUBLE_UNIT
    }

    fn next_bool(&mut self) -> bool {
        self.next(1) != 0
    }
}

#[cfg(test)]
mod test {
    use super::LegacyRandom;
    use crate::random::Random;

    #[test]
    fn test_next_i32() {
        let mut rand = LegacyRandom::from_seed(0);

        let values = [
            -1155484576,
            -723955400,
            1033096058,
            -1690734402,
            -1557280266,
            1327362106,
            -1930858313,
            502539523,
            -1728529858,
            -938301587,
        ];

        for value in values {
            assert_eq!(rand.next_i32(), value);
        }

        let mut rand = LegacyRandom::from_seed(42);
        assert_eq!(rand.next_i32(), -1170105035);
    }

    #[test]
    fn test_next_i32_bounded() {
        // 15 is not a power of two, so this goes through the rejection loop.
        let mut rand = LegacyRandom::from_seed(0);
        let values = [0, 13, 4, 2, 5, 8, 11, 6, 9, 14];
        for value in values {
            assert_eq!(rand.next_i32_bounded(0xf), value);
        }

        let mut rand = LegacyRandom::from_seed(0);
        for _ in 0..10 {
            assert_eq!(rand.next_i32_bounded(1), 0);
        }

        let mut rand = LegacyRandom::from_seed(0);
        let values = [1, 1, 0, 1, 1, 0, 1, 0, 1, 1];
        for value in values {
            assert_eq!(rand.next_i32_bounded(2), value);
        }

        let mut rand = LegacyRandom::from_seed(42);
        assert_eq!(rand.next_i32_bounded(10), 0);
    }

    #[test]
    fn test_next_i32_between() {
        let mut rand = LegacyRandom::from_seed(0);

        let values = [1, 5, 2, 12, 12, 6, 12, 10, 4, 3];

        for value in values {
            assert_eq!(rand.next_i32_between(1, 12), value);
        }
    }

    #[test]
    fn test_next_i32_between_exclusive() {
        let mut rand = LegacyRandom::from_seed(0);

        let values = [1, 7, 9, 6, 7, 3, 3, 7, 3, 1];

        for value in values {
            assert_eq!(rand.next_i32_between_exclusive(1, 12), value);
        }
    }

    #[test]
    fn test_next_f64() {
        let mut rand = LegacyRandom::from_seed(0);

        let values = [
            0.730967787376657,
            0.24053641567148587,
            0.6374174253501083,
            0.5504370051176339,
            0.5975452777972018,
            0.3332183994766498,
            0.3851891847407185,
            0.984841540199809,
            0.8791825178724801,
            0.9412491794821144,
        ];

        for value in values {
            assert_eq!(rand.next_f64(), value);
        }
    }

    #[test]
    fn test_next_f32() {
        let mut rand = LegacyRandom::from_seed(0);

        let values: [f32; 10] = [
            0.73096776, 0.831441, 0.24053639, 0.6063452, 0.6374174, 0.30905056, 0.550437,
            0.1170066, 0.59754527, 0.7815346,
        ];

        for value in values {
            assert_eq!(rand.next_f32(), value);
        }
    }

    #[test]
    fn test_next_i64() {
        let mut rand = LegacyRandom::from_seed(0);

        let values: [i64; 10] = [
            -4962768465676381896,
            4437113781045784766,
            -6688467811848818630,
            -8292973307042192125,
            -7423979211207825555,
            6146794652083548235,
            7105486291024734541,
            -279624296851435688,
            -2228689144322150137,
            -1083761183081836303,
        ];

        for value in values {
            assert_eq!(rand.next_i64(), value);
        }
    }

    #[test]
    fn test_next_bool() {
        let mut rand = LegacyRandom::from_seed(0);

        let values = [
            true, true, false, true, true, false, true, false, true, true,
        ];

        for value in values {
            assert_eq!(rand.next_bool(), value);
        }
    }

    #[test]
    fn test_set_seed_resets_stream() {
        let mut rand = LegacyRandom::from_seed(0);
        let first = rand.next_i64();
        rand.next_i32();
        rand.set_seed(0);
        assert_eq!(rand.next_i64(), first);
    }
}
