//! Maze config files (TOML) and command-line overrides on top of them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use maze_core::{Algorithm, Difficulty, MazeConfig, Neighborhood, ObstacleTarget};

/// Flags that replace individual fields of the loaded config.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Start from a difficulty preset instead of the defaults
    #[arg(long, conflicts_with = "config")]
    pub preset: Option<Difficulty>,
    /// TOML file holding a maze config
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub width: Option<usize>,
    #[arg(long)]
    pub height: Option<usize>,
    #[arg(long)]
    pub floors: Option<usize>,
    /// 4 or 8
    #[arg(long)]
    pub neighborhood: Option<Neighborhood>,
    /// dfs_backtracker, prim or kruskal
    #[arg(long)]
    pub algorithm: Option<Algorithm>,
    #[arg(long)]
    pub loop_density: Option<f64>,
    #[arg(long)]
    pub weighted: Option<bool>,
    #[arg(long)]
    pub cost_min: Option<u32>,
    #[arg(long)]
    pub cost_max: Option<u32>,
    #[arg(long)]
    pub portals: Option<usize>,
    #[arg(long)]
    pub portal_cost: Option<u32>,
    #[arg(long)]
    pub obstacles: Option<usize>,
    /// cells or edges
    #[arg(long)]
    pub obstacle_target: Option<ObstacleTarget>,
    #[arg(long)]
    pub retry_budget: Option<usize>,
}

impl ConfigOverrides {
    /// Loads the base config (file, preset or defaults), applies every set
    /// flag and validates the result.
    pub fn resolve(&self) -> Result<MazeConfig> {
        let mut config = match (&self.config, self.preset) {
            (Some(path), _) => load_config(path)?,
            (None, Some(difficulty)) => MazeConfig::preset(difficulty),
            (None, None) => MazeConfig::default(),
        };
        self.apply(&mut config);
        config.validate().context("Invalid maze config")?;
        Ok(config)
    }

    fn apply(&self, config: &mut MazeConfig) {
        macro_rules! set {
            ($($flag:ident => $field:ident),* $(,)?) => {
                $(if let Some(value) = self.$flag {
                    config.$field = value;
                })*
            };
        }
        set!(
            width => width,
            height => height,
            floors => floors,
            neighborhood => neighborhood,
            algorithm => algorithm,
            loop_density => loop_density,
            weighted => weighted,
            cost_min => cost_min,
            cost_max => cost_max,
            portals => portal_count,
            portal_cost => portal_cost,
            obstacles => dynamic_obstacle_count,
            obstacle_target => obstacle_target,
            retry_budget => obstacle_retry_budget,
        );
    }
}

pub fn load_config(path: &Path) -> Result<MazeConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Writes through a temporary sibling so readers never see a partial file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("Failed to write: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("Failed to move into: {}", path.display()))
}
