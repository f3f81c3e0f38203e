use perlin_core::{PerlinNoise, TABLE_SIZE};
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Sampling settings recorded next to an engine state so a run can be
/// reproduced: the grid frequency and octave count fed to the octave layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub frequency: f64,
    pub octaves: i32,
}

/// One persisted engine state: the 256-byte serialized permutation plus the
/// seed it came from and the sampling parameters it was used with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerlinStateDoc {
    pub name: String,
    pub seed: u32,
    pub params: SamplingParams,
    // Serialized permutation: exactly TABLE_SIZE bytes, first half of P
    pub table: Vec<u8>,
}

impl PerlinStateDoc {
    /// Capture an engine's state under `name`.
    pub fn from_engine(
        name: impl Into<String>,
        seed: u32,
        params: SamplingParams,
        engine: &PerlinNoise,
    ) -> Self {
        Self {
            name: name.into(),
            seed,
            params,
            table: engine.serialize().to_vec(),
        }
    }

    /// Rebuild an engine from the stored table. Fails if the blob has the
    /// wrong length or is not a permutation of 0..=255.
    pub fn to_engine(&self) -> Result<PerlinNoise, StoreError> {
        let bytes: [u8; TABLE_SIZE] = self
            .table
            .as_slice()
            .try_into()
            .map_err(|_| StoreError::TableLength(self.table.len()))?;
        let mut engine = PerlinNoise::default();
        engine.deserialize(&bytes)?;
        Ok(engine)
    }
}
