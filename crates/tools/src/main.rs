use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use maze_core::{
    Maze, MazeExport, MazeStats, apply_obstacles, batch_seeds, episode_seed, generate,
    generate_batch,
};
use maze_tools::config_file::{ConfigOverrides, write_atomic};
use maze_tools::logging;
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Deterministic maze generation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one maze
    Generate {
        #[command(flatten)]
        overrides: ConfigOverrides,
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Generate many mazes in parallel and summarize them
    Batch {
        #[command(flatten)]
        overrides: ConfigOverrides,
        /// Base seed the per-maze seeds are derived from
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
        #[arg(short = 'n', long, default_value_t = 16)]
        count: usize,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Re-inject obstacles into one base maze for several episodes
    Episodes {
        #[command(flatten)]
        overrides: ConfigOverrides,
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
        #[arg(short = 'n', long, default_value_t = 5)]
        episodes: u64,
        #[arg(short, long, value_enum, default_value_t = Format::Stats)]
        format: Format,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Rebuild and validate an exported maze
    Check {
        /// Path to the exported maze JSON
        path: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Ascii,
    Stats,
}

#[derive(Serialize)]
struct Summary {
    seed: u64,
    fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    episode: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<MazeStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Summary {
    fn of(maze: &Maze, episode: Option<u64>) -> Self {
        Self {
            seed: maze.seed(),
            fingerprint: format!("{:016x}", maze.fingerprint()),
            episode,
            stats: Some(maze.stats()),
            error: None,
        }
    }
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate { overrides, seed, format, out } => {
            let config = overrides.resolve()?;
            let maze = generate(&config, seed)
                .with_context(|| format!("Failed to generate maze for seed {seed}"))?;
            info!(seed, fingerprint = maze.fingerprint(), "maze generated");
            emit(&render(&maze, format, None)?, out.as_deref())
        }
        Command::Batch { overrides, seed, count, out } => {
            let config = overrides.resolve()?;
            let seeds = batch_seeds(seed, count);
            let summaries: Vec<Summary> = generate_batch(&config, &seeds)
                .into_iter()
                .map(|(seed, result)| match result {
                    Ok(maze) => Summary::of(&maze, None),
                    Err(error) => Summary {
                        seed,
                        fingerprint: String::new(),
                        episode: None,
                        stats: None,
                        error: Some(error.to_string()),
                    },
                })
                .collect();
            let json = serde_json::to_string_pretty(&summaries)
                .context("Failed to serialize batch summary")?;
            emit(&json, out.as_deref())
        }
        Command::Episodes { overrides, seed, episodes, format, out } => {
            let config = overrides.resolve()?;
            let base = generate(&config, seed)
                .with_context(|| format!("Failed to generate base maze for seed {seed}"))?
                .clear_obstacles();
            let mut sections = Vec::new();
            for episode in 0..episodes {
                let maze = apply_obstacles(&base, episode_seed(seed, episode))
                    .with_context(|| format!("Failed to place obstacles for episode {episode}"))?;
                sections.push(render(&maze, format, Some(episode))?);
            }
            emit(&sections.join("\n"), out.as_deref())
        }
        Command::Check { path } => {
            let export = load_export(&path)?;
            let maze = Maze::from_export(&export)
                .with_context(|| format!("Maze in {} failed validation", path.display()))?;
            println!("Maze OK.");
            println!("Seed: {}", maze.seed());
            println!("Open edges: {}", maze.open_edge_count());
            println!("Reference path: {} cells", maze.reference_path().len());
            println!("Fingerprint: {:016x}", maze.fingerprint());
            Ok(())
        }
    }
}

fn render(maze: &Maze, format: Format, episode: Option<u64>) -> Result<String> {
    match format {
        Format::Json => maze.export().to_json().context("Failed to serialize maze"),
        Format::Stats => serde_json::to_string_pretty(&Summary::of(maze, episode))
            .context("Failed to serialize maze stats"),
        Format::Ascii => {
            let mut text = String::new();
            if let Some(episode) = episode {
                text.push_str(&format!("episode {episode}\n"));
            }
            for floor in 0..maze.grid().floors() {
                text.push_str(&format!("floor {floor}\n"));
                text.push_str(&maze.render_floor(floor));
            }
            Ok(text)
        }
    }
}

fn emit(text: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => write_atomic(path, text),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn load_export(path: &Path) -> Result<MazeExport> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read maze file: {}", path.display()))?;
    MazeExport::from_json(&data).with_context(|| "Failed to deserialize maze JSON")
}
