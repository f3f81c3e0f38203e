use perlin_core::PerlinNoise;
use perlin_storage::models::{PerlinStateDoc, SamplingParams};
use perlin_storage::{StateStore, StoreError};

fn main() -> Result<(), StoreError> {
    // Seed an engine and capture its state
    let engine = PerlinNoise::new(2025);
    let params = SamplingParams {
        frequency: 8.0,
        octaves: 8,
    };
    let doc = PerlinStateDoc::from_engine("demo", 2025, params, &engine);

    // Init storage
    let dir = std::env::temp_dir().join("perlin-roundtrip-demo");
    let store = StateStore::init(&dir)?;

    // Insert & read back
    store.create(&doc)?;
    if let Some(found) = store.read_by_name("demo")? {
        let rebuilt = found.to_engine()?;
        println!(
            "Round-trip success: noise3d(0.1, 0.2, 0.3) = {}",
            rebuilt.noise3d(0.1, 0.2, 0.3)
        );
    } else {
        println!("Document not found!");
    }

    // Clean up
    store.delete_by_name("demo")?;

    Ok(())
}
