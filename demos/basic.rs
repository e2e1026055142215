//! Basic usage example of the LTS cell
//!
//! Steps a single cell by hand, then runs the same configuration over a
//! batch of sequences with the LTS layer.

use burn::backend::NdArray;
use burn::tensor::Tensor;
use lts::prelude::*;

fn main() -> LtsResult<()> {
    tracing_subscriber::fmt::init();

    println!("=== LTS Basic Example ===\n");

    // Use the NdArray backend (CPU)
    type Backend = NdArray<f32>;
    let device = Default::default();

    // Example 1: Single cell step
    println!("Example 1: Single cell step");
    let config = LtsConfig::new(4).with_seed(2023);
    let mut cell = LTSCell::<Backend>::new(config.clone())?;
    cell.configure(3, &device)?;

    let input = Tensor::<Backend, 2>::from_floats([[0.1, 0.2, 0.3]], &device);
    let state = Tensor::<Backend, 2>::zeros([1, 4], &device);
    let (output, next_state) = cell.step(input, state)?;

    println!("  Units: {}, input features: 3", cell.units());
    println!("  Noise vector: {}", cell.noise()?);
    println!("  Output:       {}", output);
    println!("  State shape:  {:?}", next_state.dims());
    println!();

    // Example 2: Sequence processing (batch-first)
    println!("Example 2: Batch-first sequence");
    let lts = LTS::<Backend>::new(3, config.clone(), &device)?;

    // Input shape: [batch=2, seq=10, features=3]
    let input = Tensor::<Backend, 3>::random(
        [2, 10, 3],
        burn::tensor::Distribution::Uniform(-1.0, 1.0),
        &device,
    );
    let (output, state) = lts.forward(input, None)?;

    println!("  Input shape:  [2, 10, 3]");
    println!("  Output shape: {:?}", output.dims());
    println!("  State shape:  {:?}", state.dims());
    println!();

    // Example 3: Return only last timestep, continue from previous state
    println!("Example 3: Last timestep only, stateful");
    let lts_last = LTS::<Backend>::new(3, config, &device)?.with_return_sequences(false);
    let input = Tensor::<Backend, 3>::random(
        [2, 5, 3],
        burn::tensor::Distribution::Uniform(-1.0, 1.0),
        &device,
    );
    let (output_last, _) = lts_last.forward(input, Some(state))?;

    println!("  Output shape: {:?}", output_last.dims());
    println!("  Only the last timestep is returned");
    println!();

    println!("=== Examples completed successfully! ===");
    Ok(())
}
