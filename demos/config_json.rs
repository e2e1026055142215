//! Configuration Example
//!
//! Shows the JSON form of `LtsConfig`: only `units` is required, every solver
//! constant falls back to its documented default.

use burn::backend::NdArray;
use lts::prelude::*;

fn main() -> LtsResult<()> {
    tracing_subscriber::fmt::init();

    println!("=== LTS Configuration Example ===\n");

    type Backend = NdArray<f32>;
    let device = Default::default();

    // Minimal document
    let minimal = LtsConfig::from_json(r#"{ "units": 8 }"#)?;
    println!("Minimal config resolves to:");
    println!("{}", minimal.to_json()?);
    println!();

    // Overrides: decouple the inner and outer solver loops, smaller step
    let tuned = LtsConfig::new(8)
        .with_sde_unfolds(4)
        .with_drift_unfolds(2)
        .with_time_step(0.1)
        .with_diffusion_scale(0.5)
        .with_seed(12345);
    let json = tuned.to_json()?;
    let restored = LtsConfig::from_json(&json)?;
    println!("Round trip preserved overrides: {}", restored == tuned);

    let mut cell = LTSCell::<Backend>::new(restored)?;
    cell.configure(6, &device)?;
    println!("  Internal synapses: {}", cell.synapse_count());
    println!("  Sensory synapses:  {}", cell.sensory_synapse_count());
    println!();

    // Invalid documents are rejected before any parameter is allocated
    match LtsConfig::from_json(r#"{ "units": 8, "time_step": -1.0 }"#) {
        Ok(_) => println!("unexpectedly accepted"),
        Err(e) => println!("Rejected invalid config: {}", e),
    }

    Ok(())
}
