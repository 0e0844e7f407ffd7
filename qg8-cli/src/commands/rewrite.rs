//! Load a file into a graph and write it back out.

use anyhow::{Context, Result};
use log::info;
use qg8::{CodecConfig, Graph};

pub fn run(input: &str, output: &str, config: CodecConfig) -> Result<()> {
    let graph = Graph::load_with(input, config)
        .with_context(|| format!("Failed to load: {}", input))?;

    graph
        .write(output)
        .with_context(|| format!("Failed to write: {}", output))?;

    info!("rewrote {} -> {}", input, output);
    println!("Wrote {} chunk(s) to {}", graph.count(), output);
    Ok(())
}
