//! Multi-octave composition on top of the single-cell evaluator: each
//! successive octave doubles the frequency and halves the amplitude.

use num_traits::Float;

use crate::perlin::{BasicPerlinNoise, cast};

impl<T: Float> BasicPerlinNoise<T> {
    // Geometric-series weight W(n) = Σ_{i<n} 2^-i = 2 − 2^(1−n), built by
    // the same amplitude walk the accumulation loops use.
    fn weight(octaves: i32) -> T {
        let mut amp = T::one();
        let mut value = T::zero();
        for _ in 0..octaves {
            value = value + amp;
            amp = amp / cast(2.0);
        }
        value
    }

    /// Raw octave sum of [`noise1d`](Self::noise1d); magnitude can reach
    /// W(octaves), so the result may leave [-1, 1]. `octaves <= 0` yields 0.
    pub fn accumulated_octave_noise1d(&self, x: T, octaves: i32) -> T {
        let mut x = x;
        let mut result = T::zero();
        let mut amp = T::one();
        let two = cast::<T>(2.0);
        for _ in 0..octaves {
            result = result + self.noise1d(x) * amp;
            x = x * two;
            amp = amp / two;
        }
        result
    }

    /// Raw octave sum of [`noise2d`](Self::noise2d); unnormalized.
    pub fn accumulated_octave_noise2d(&self, x: T, y: T, octaves: i32) -> T {
        let (mut x, mut y) = (x, y);
        let mut result = T::zero();
        let mut amp = T::one();
        let two = cast::<T>(2.0);
        for _ in 0..octaves {
            result = result + self.noise2d(x, y) * amp;
            x = x * two;
            y = y * two;
            amp = amp / two;
        }
        result
    }

    /// Raw octave sum of [`noise3d`](Self::noise3d); unnormalized.
    pub fn accumulated_octave_noise3d(&self, x: T, y: T, z: T, octaves: i32) -> T {
        let (mut x, mut y, mut z) = (x, y, z);
        let mut result = T::zero();
        let mut amp = T::one();
        let two = cast::<T>(2.0);
        for _ in 0..octaves {
            result = result + self.noise3d(x, y, z) * amp;
            x = x * two;
            y = y * two;
            z = z * two;
            amp = amp / two;
        }
        result
    }

    /// Octave sum divided by W(octaves), back in [-1, 1].
    /// `octaves <= 0` yields 0 rather than dividing by zero.
    pub fn normalized_octave_noise1d(&self, x: T, octaves: i32) -> T {
        if octaves <= 0 {
            return T::zero();
        }
        self.accumulated_octave_noise1d(x, octaves) / Self::weight(octaves)
    }

    /// See [`normalized_octave_noise1d`](Self::normalized_octave_noise1d).
    pub fn normalized_octave_noise2d(&self, x: T, y: T, octaves: i32) -> T {
        if octaves <= 0 {
            return T::zero();
        }
        self.accumulated_octave_noise2d(x, y, octaves) / Self::weight(octaves)
    }

    /// See [`normalized_octave_noise1d`](Self::normalized_octave_noise1d).
    pub fn normalized_octave_noise3d(&self, x: T, y: T, z: T, octaves: i32) -> T {
        if octaves <= 0 {
            return T::zero();
        }
        self.accumulated_octave_noise3d(x, y, z, octaves) / Self::weight(octaves)
    }

    /// Accumulated sum remapped to [0, 1] and clamped there.
    pub fn accumulated_octave_noise1d_0_1(&self, x: T, octaves: i32) -> T {
        remap_clamped(self.accumulated_octave_noise1d(x, octaves))
    }

    /// Accumulated sum remapped to [0, 1] and clamped there.
    pub fn accumulated_octave_noise2d_0_1(&self, x: T, y: T, octaves: i32) -> T {
        remap_clamped(self.accumulated_octave_noise2d(x, y, octaves))
    }

    /// Accumulated sum remapped to [0, 1] and clamped there.
    pub fn accumulated_octave_noise3d_0_1(&self, x: T, y: T, z: T, octaves: i32) -> T {
        remap_clamped(self.accumulated_octave_noise3d(x, y, z, octaves))
    }

    /// Normalized sum remapped to [0, 1]; no clamp is needed since the
    /// normalized form already stays within [-1, 1].
    pub fn normalized_octave_noise1d_0_1(&self, x: T, octaves: i32) -> T {
        self.normalized_octave_noise1d(x, octaves) * cast(0.5) + cast(0.5)
    }

    /// Normalized sum remapped to [0, 1]; unclamped.
    pub fn normalized_octave_noise2d_0_1(&self, x: T, y: T, octaves: i32) -> T {
        self.normalized_octave_noise2d(x, y, octaves) * cast(0.5) + cast(0.5)
    }

    /// Normalized sum remapped to [0, 1]; unclamped.
    pub fn normalized_octave_noise3d_0_1(&self, x: T, y: T, z: T, octaves: i32) -> T {
        self.normalized_octave_noise3d(x, y, z, octaves) * cast(0.5) + cast(0.5)
    }
}

#[inline]
fn remap_clamped<T: Float>(v: T) -> T {
    (v * cast(0.5) + cast(0.5)).max(T::zero()).min(T::one())
}
