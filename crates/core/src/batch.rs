//! Parallel generation of many mazes from one config.

use rayon::prelude::*;
use tracing::info;

use crate::config::MazeConfig;
use crate::error::GenerationError;
use crate::generator::MazeGenerator;
use crate::maze::Maze;
use crate::rng::derive_seed;

/// Generates one maze per seed across the rayon pool.
///
/// Every worker owns its own random stream, so the results are identical to
/// generating sequentially and come back in input order. A bad config fails
/// every entry with the same error.
pub fn generate_batch(
    config: &MazeConfig,
    seeds: &[u64],
) -> Vec<(u64, Result<Maze, GenerationError>)> {
    let generator = match MazeGenerator::new(config.clone()) {
        Ok(generator) => generator,
        Err(error) => return seeds.iter().map(|&seed| (seed, Err(error.clone()))).collect(),
    };

    let results: Vec<_> =
        seeds.par_iter().map(|&seed| (seed, generator.generate(seed))).collect();
    let failed = results.iter().filter(|(_, result)| result.is_err()).count();
    info!(mazes = results.len(), failed, "batch generated");
    results
}

/// `count` well-mixed seeds derived from `base`.
pub fn batch_seeds(base: u64, count: usize) -> Vec<u64> {
    (0..count as u64).map(|index| derive_seed(base, index)).collect()
}
