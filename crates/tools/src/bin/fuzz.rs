use anyhow::{Result, bail};
use clap::Parser;
use maze_core::{
    Algorithm, GenerationError, MazeConfig, Neighborhood, ObstacleTarget, apply_obstacles,
    episode_seed, generate, validate, validate_episode,
};
use maze_tools::logging;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::debug;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    iterations: u32,
    /// Largest width and height tried
    #[arg(long, default_value_t = 24)]
    max_side: u64,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn below(rng: &mut ChaCha8Rng, bound: u64) -> u64 {
    rng.next_u64() % bound.max(1)
}

fn random_config(rng: &mut ChaCha8Rng, max_side: u64) -> MazeConfig {
    let floors = 1 + below(rng, 4) as usize;
    MazeConfig {
        width: 1 + below(rng, max_side) as usize,
        height: 1 + below(rng, max_side) as usize,
        floors,
        // May fall short of floors - 1.
        portal_count: (floors + below(rng, 4) as usize).saturating_sub(2),
        portal_cost: below(rng, 5) as u32,
        neighborhood: choose(rng, &[Neighborhood::Four, Neighborhood::Eight]),
        algorithm: choose(rng, &Algorithm::ALL),
        loop_density: below(rng, 101) as f64 / 100.0,
        weighted: below(rng, 2) == 0,
        cost_min: 1 + below(rng, 3) as u32,
        cost_max: 1 + below(rng, 12) as u32,
        dynamic_obstacle_count: below(rng, 12) as usize,
        obstacle_target: choose(rng, &[ObstacleTarget::Cells, ObstacleTarget::Edges]),
        obstacle_retry_budget: below(rng, 11) as usize,
        ..MazeConfig::default()
    }
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    println!("Starting maze fuzz on seed {} for {} iterations...", args.seed, args.iterations);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut generated = 0_u32;
    let mut rejected = 0_u32;

    for iteration in 0..args.iterations {
        let config = random_config(&mut rng, args.max_side);
        let maze_seed = rng.next_u64();

        let maze = match generate(&config, maze_seed) {
            Ok(maze) => maze,
            Err(
                error @ (GenerationError::InvalidDimension { .. }
                | GenerationError::InvalidConfig { .. }
                | GenerationError::DisconnectedGrid { .. }
                | GenerationError::UnsatisfiableObstacleConfig { .. }),
            ) => {
                debug!(iteration, %error, "config rejected");
                rejected += 1;
                continue;
            }
            Err(GenerationError::ValidationViolation(violation)) => {
                bail!("Invariant failed on iteration {iteration}: {violation} for {config:?}");
            }
        };

        validate(&maze)?;
        validate_episode(&maze)?;
        for episode in 1..4 {
            match apply_obstacles(&maze, episode_seed(maze_seed, episode)) {
                Ok(next) => {
                    validate_episode(&next)?;
                    assert!(
                        next.clear_obstacles() == maze.clear_obstacles(),
                        "Invariant failed: obstacles altered the structure"
                    );
                }
                Err(GenerationError::UnsatisfiableObstacleConfig { .. }) => {}
                Err(other) => bail!("Episode {episode} of iteration {iteration} failed: {other}"),
            }
        }
        generated += 1;
    }

    println!("Fuzzing completed successfully: {generated} mazes, {rejected} rejected configs.");
    Ok(())
}
