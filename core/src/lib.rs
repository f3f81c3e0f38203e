// perlin-core holds the permutation state and the noise evaluators
mod octave;
pub mod perlin;
pub mod perm;

pub use perlin::{BasicPerlinNoise, DEFAULT_SEED, PerlinNoise};
pub use perm::{PermutationError, TABLE_SIZE};
