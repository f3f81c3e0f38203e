use rand::RngCore;
use thiserror::Error;

/// Number of distinct entries in the permutation; the stored table is
/// doubled to `2 * TABLE_SIZE` so corner hashing never needs a modulo.
pub const TABLE_SIZE: usize = 256;

// Mixed into the seed before the xorshift stream starts, so seed 0 does not
// leave the generator stuck at zero.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Returned by [`PermutationTable::deserialize`] when the supplied bytes are
/// not a valid table state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PermutationError {
    #[error("serialized state is not a permutation of 0..=255")]
    InvalidPermutation,
}

// The 256-entry permutation of 0..=255 that drives corner hashing,
// duplicated into 512 bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct PermutationTable {
    p: [u8; 2 * TABLE_SIZE],
}

impl PermutationTable {
    pub(crate) fn from_seed(seed: u32) -> Self {
        let mut table = Self {
            p: [0; 2 * TABLE_SIZE],
        };
        table.reseed(seed);
        table
    }

    pub(crate) fn from_rng<R: RngCore>(rng: &mut R) -> Self {
        let mut table = Self {
            p: [0; 2 * TABLE_SIZE],
        };
        table.reseed_with(rng);
        table
    }

    // Rebuild the table from a 32-bit seed. The seed→permutation map is
    // pinned: an xorshift64 stream (shifts 13/7/17) over `seed ^ SEED_MIX`
    // drives a Fisher–Yates shuffle from index 255 down to 1, swapping each
    // `i` with `next_u32() % (i + 1)`. Exactly 255 draws are consumed.
    pub(crate) fn reseed(&mut self, seed: u32) {
        let mut first: [u8; TABLE_SIZE] = std::array::from_fn(|i| i as u8);
        let mut x = u64::from(seed) ^ SEED_MIX;
        shuffle(&mut first, || {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x as u32
        });
        self.install(&first);
    }

    // Same shuffle, driven by a caller-supplied generator. Consumes exactly
    // 255 `next_u32` draws and reads no other generator state.
    pub(crate) fn reseed_with<R: RngCore>(&mut self, rng: &mut R) {
        let mut first: [u8; TABLE_SIZE] = std::array::from_fn(|i| i as u8);
        shuffle(&mut first, || rng.next_u32());
        self.install(&first);
    }

    /// Table lookup; `index` may reach into the doubled upper half.
    #[inline]
    pub(crate) fn at(&self, index: usize) -> usize {
        self.p[index] as usize
    }

    pub(crate) fn serialize(&self) -> [u8; TABLE_SIZE] {
        let mut out = [0u8; TABLE_SIZE];
        out.copy_from_slice(&self.p[..TABLE_SIZE]);
        out
    }

    pub(crate) fn deserialize(&mut self, s: &[u8; TABLE_SIZE]) -> Result<(), PermutationError> {
        let mut seen = [false; TABLE_SIZE];
        for &v in s {
            if seen[v as usize] {
                return Err(PermutationError::InvalidPermutation);
            }
            seen[v as usize] = true;
        }
        self.install(s);
        Ok(())
    }

    fn install(&mut self, first: &[u8; TABLE_SIZE]) {
        // Duplicate into 512 bytes so lookups past 255 need no mask
        self.p = std::array::from_fn(|i| first[i & (TABLE_SIZE - 1)]);
    }
}

// Fisher–Yates over p[0..256), high index down, swap partner uniform in [0, i]
fn shuffle<F: FnMut() -> u32>(p: &mut [u8; TABLE_SIZE], mut draw: F) {
    for i in (1..TABLE_SIZE).rev() {
        let j = draw() as usize % (i + 1);
        p.swap(i, j);
    }
}
