use std::marker::PhantomData;

use num_traits::Float;
use rand::RngCore;

use crate::perm::{PermutationError, PermutationTable, TABLE_SIZE};

/// Seed used by [`BasicPerlinNoise::default`], matching the mt19937
/// `default_seed` convention of the classic implementations.
pub const DEFAULT_SEED: u32 = 5489;

// Lift a small constant into the scalar type. Every constant the engine
// needs is exactly representable in f32 and f64, so the conversion cannot
// fail for any Float type worth instantiating.
#[inline]
pub(crate) fn cast<T: Float>(v: f64) -> T {
    T::from(v).unwrap()
}

/// Classic three-dimensional Perlin gradient noise over a seeded 256-entry
/// permutation, generic over the floating-point scalar.
///
/// The engine is a plain value: 512 bytes of permutation state and nothing
/// else. Every query method only reads that state, so a shared instance is
/// safe for concurrent readers; `reseed`/`deserialize` need exclusive
/// access like any `&mut` method.
#[derive(Clone, Copy)]
pub struct BasicPerlinNoise<T = f64> {
    table: PermutationTable,
    _marker: PhantomData<T>,
}

/// The `f64` instantiation, the usual choice.
pub type PerlinNoise = BasicPerlinNoise<f64>;

impl<T: Float> BasicPerlinNoise<T> {
    /// Build an engine from a 32-bit seed. The seed→permutation map is
    /// pinned and documented in [`reseed`](Self::reseed).
    pub fn new(seed: u32) -> Self {
        Self {
            table: PermutationTable::from_seed(seed),
            _marker: PhantomData,
        }
    }

    /// Build an engine by shuffling the table with a caller-supplied
    /// generator; consumes exactly 255 `next_u32` draws.
    pub fn from_rng<R: RngCore>(rng: &mut R) -> Self {
        Self {
            table: PermutationTable::from_rng(rng),
            _marker: PhantomData,
        }
    }

    /// Rebuild the permutation from `seed`: identity table, then a
    /// Fisher–Yates shuffle from index 255 down to 1 driven by an
    /// xorshift64 stream (shifts 13/7/17) over the mixed seed, swap partner
    /// `next_u32() % (i + 1)`. Identically seeded engines are bitwise
    /// identical on every input.
    pub fn reseed(&mut self, seed: u32) {
        self.table.reseed(seed);
    }

    /// Rebuild the permutation with a caller-supplied generator, consuming
    /// exactly 255 `next_u32` draws.
    pub fn reseed_with<R: RngCore>(&mut self, rng: &mut R) {
        self.table.reseed_with(rng);
    }

    /// Copy out the first half of the permutation table.
    pub fn serialize(&self) -> [u8; TABLE_SIZE] {
        self.table.serialize()
    }

    /// Replace the permutation with `s`, rejecting anything that is not a
    /// permutation of 0..=255. On error the engine is unchanged.
    pub fn deserialize(&mut self, s: &[u8; TABLE_SIZE]) -> Result<(), PermutationError> {
        self.table.deserialize(s)
    }

    // Ken Perlin's quintic smoothstep 6t^5 − 15t^4 + 10t^3; both of its
    // first two derivatives vanish at t=0 and t=1, which is what keeps the
    // noise C2-continuous across cell boundaries.
    #[inline]
    fn fade(t: T) -> T {
        t * t * t * (t * (t * cast(6.0) - cast(15.0)) + cast(10.0))
    }

    #[inline]
    fn lerp(a: T, b: T, t: T) -> T {
        a + t * (b - a)
    }

    // Dot product with one of the 12 cube-edge gradients, selected by the
    // low nibble of the corner hash.
    #[inline]
    fn grad(hash: usize, x: T, y: T, z: T) -> T {
        let h = hash & 0xF;
        let u = if h < 8 { x } else { y };
        let v = if h < 4 {
            y
        } else if h == 12 || h == 14 {
            x
        } else {
            z
        };
        let su = if (h & 1) == 0 { u } else { -u };
        let sv = if (h & 2) == 0 { v } else { -v };
        su + sv
    }

    // Lattice cell index for one coordinate: floor, masked to the table
    // period. Non-finite inputs fall back to cell 0; the result for them is
    // unspecified but never panics.
    #[inline]
    fn cell(c: T) -> usize {
        (c.floor().to_i64().unwrap_or(0) & 0xFF) as usize
    }

    /// Single-cell Perlin noise at `(x, y, z)`, in roughly [-1, 1].
    /// Exactly zero at integer lattice points.
    pub fn noise3d(&self, x: T, y: T, z: T) -> T {
        let xi = Self::cell(x);
        let yi = Self::cell(y);
        let zi = Self::cell(z);

        let xf = x - x.floor();
        let yf = y - y.floor();
        let zf = z - z.floor();

        let u = Self::fade(xf);
        let v = Self::fade(yf);
        let w = Self::fade(zf);

        // Hash the eight cube corners. Intermediate sums may exceed 255;
        // the doubled table absorbs them without a mask.
        let p = &self.table;
        let a = p.at(xi) + yi;
        let aa = p.at(a) + zi;
        let ab = p.at(a + 1) + zi;
        let b = p.at(xi + 1) + yi;
        let ba = p.at(b) + zi;
        let bb = p.at(b + 1) + zi;

        let one = T::one();

        // Trilinear interpolation of the corner gradients: x innermost,
        // then y, then z.
        Self::lerp(
            Self::lerp(
                Self::lerp(
                    Self::grad(p.at(aa), xf, yf, zf),
                    Self::grad(p.at(ba), xf - one, yf, zf),
                    u,
                ),
                Self::lerp(
                    Self::grad(p.at(ab), xf, yf - one, zf),
                    Self::grad(p.at(bb), xf - one, yf - one, zf),
                    u,
                ),
                v,
            ),
            Self::lerp(
                Self::lerp(
                    Self::grad(p.at(aa + 1), xf, yf, zf - one),
                    Self::grad(p.at(ba + 1), xf - one, yf, zf - one),
                    u,
                ),
                Self::lerp(
                    Self::grad(p.at(ab + 1), xf, yf - one, zf - one),
                    Self::grad(p.at(bb + 1), xf - one, yf - one, zf - one),
                    u,
                ),
                v,
            ),
            w,
        )
    }

    /// 2D projection: the z = 0 plane of [`noise3d`](Self::noise3d).
    pub fn noise2d(&self, x: T, y: T) -> T {
        self.noise3d(x, y, T::zero())
    }

    /// 1D projection: the y = z = 0 line of [`noise3d`](Self::noise3d).
    pub fn noise1d(&self, x: T) -> T {
        self.noise3d(x, T::zero(), T::zero())
    }

    /// [`noise1d`](Self::noise1d) remapped to roughly [0, 1]; not clamped.
    pub fn noise1d_0_1(&self, x: T) -> T {
        self.noise1d(x) * cast(0.5) + cast(0.5)
    }

    /// [`noise2d`](Self::noise2d) remapped to roughly [0, 1]; not clamped.
    pub fn noise2d_0_1(&self, x: T, y: T) -> T {
        self.noise2d(x, y) * cast(0.5) + cast(0.5)
    }

    /// [`noise3d`](Self::noise3d) remapped to roughly [0, 1]; not clamped.
    pub fn noise3d_0_1(&self, x: T, y: T, z: T) -> T {
        self.noise3d(x, y, z) * cast(0.5) + cast(0.5)
    }
}

impl<T: Float> Default for BasicPerlinNoise<T> {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

// Written out instead of derived so equality does not demand `T: Eq`,
// which the float scalars cannot provide. Two engines are equal exactly
// when their permutations are.
impl<T> PartialEq for BasicPerlinNoise<T> {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
    }
}

impl<T> Eq for BasicPerlinNoise<T> {}

impl<T> std::fmt::Debug for BasicPerlinNoise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicPerlinNoise").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{BasicPerlinNoise, PerlinNoise};

    #[test]
    fn zero_at_integer_lattice_points() {
        let p = PerlinNoise::new(0);
        for &(x, y, z) in &[
            (0.0, 0.0, 0.0),
            (1.0, 2.0, 3.0),
            (-5.0, 17.0, -255.0),
            (256.0, -1.0, 1000.0),
        ] {
            assert_eq!(p.noise3d(x, y, z), 0.0);
        }
    }

    #[test]
    fn identically_seeded_engines_agree() {
        // Construction from a seed and default-then-reseed must coincide
        let a = PerlinNoise::new(1234);
        let mut b = PerlinNoise::default();
        b.reseed(1234);
        for y in 0..128 {
            for x in 0..128 {
                let (fx, fy) = (x as f64 / 64.0, y as f64 / 64.0);
                assert_eq!(a.noise3d(fx, fy, 0.0), b.noise3d(fx, fy, 0.0));
            }
        }
    }

    #[test]
    fn engines_compare_by_permutation() {
        let fresh = PerlinNoise::new(1234);
        let mut reseeded = PerlinNoise::default();
        assert_ne!(fresh, reseeded);
        reseeded.reseed(1234);
        assert_eq!(fresh, reseeded);
        // The scalar parameter plays no part in equality
        assert_eq!(
            BasicPerlinNoise::<f32>::new(7),
            BasicPerlinNoise::<f32>::new(7)
        );
    }

    #[test]
    fn projections_are_slices_of_noise3d() {
        let p = PerlinNoise::new(42);
        for &(x, y) in &[(0.1, 0.2), (3.7, -1.9), (100.5, 200.25), (-0.75, 0.0)] {
            assert_eq!(p.noise2d(x, y), p.noise3d(x, y, 0.0));
            assert_eq!(p.noise1d(x), p.noise3d(x, 0.0, 0.0));
        }
    }

    #[test]
    fn remap_is_half_scale_half_shift() {
        let p = PerlinNoise::new(7);
        for &(x, y, z) in &[(0.3, 0.6, 0.9), (-2.2, 4.4, -6.6), (12.515, 0.125, 3.0)] {
            assert_eq!(p.noise3d_0_1(x, y, z), p.noise3d(x, y, z) * 0.5 + 0.5);
            assert_eq!(p.noise2d_0_1(x, y), p.noise2d(x, y) * 0.5 + 0.5);
            assert_eq!(p.noise1d_0_1(x), p.noise1d(x) * 0.5 + 0.5);
        }
    }

    #[test]
    fn output_stays_in_range() {
        let p = PerlinNoise::new(0);
        let v = p.noise3d(3.14, 42.0, -7.5);
        assert!(v.is_finite());
        assert!(v.abs() <= 1.0 + 1e-6);
        for y in 0..64 {
            for x in 0..64 {
                let v = p.noise2d(x as f64 * 0.37 - 11.0, y as f64 * 0.29 - 7.0);
                assert!(v.abs() <= 1.0 + 1e-6, "noise2d out of range: {}", v);
            }
        }
    }

    #[test]
    fn lattice_mask_is_256_periodic() {
        let p = PerlinNoise::new(2025);
        for &x in &[0.1, 0.5, 0.9] {
            for &y in &[0.1, 0.5, 0.9] {
                let base = p.noise2d(x, y);
                let shifted = p.noise2d(x + 256.0, y + 256.0);
                assert!((base - shifted).abs() < 1e-12);
                let d3 = (p.noise3d(x + 256.0, y, 0.3) - p.noise3d(x, y, 0.3)).abs();
                assert!(d3 < 1e-12);
            }
        }
    }

    #[test]
    fn f32_instantiation_tracks_f64() {
        let a = BasicPerlinNoise::<f32>::new(99);
        let b = BasicPerlinNoise::<f64>::new(99);
        // Same permutation, so the f32 value is the f64 value up to
        // single-precision rounding
        let (x, y, z) = (1.25, -2.5, 3.75);
        let diff = f64::from(a.noise3d(x as f32, y as f32, z as f32)) - b.noise3d(x, y, z);
        assert!(diff.abs() < 1e-5);
    }

    #[test]
    fn non_finite_inputs_do_not_panic() {
        let p = PerlinNoise::new(1);
        let _ = p.noise3d(f64::NAN, 0.5, 0.5);
        let _ = p.noise3d(f64::INFINITY, f64::NEG_INFINITY, 0.0);
        let _ = p.noise3d(1e300, -1e300, 0.25);
    }
}
