//! High-level maze generation: spanning trees, topology augmentation,
//! endpoint selection, validation and the first obstacle episode.

mod augment;
mod endpoints;
mod pipeline;
mod spanning;

pub(crate) use augment::passable_candidates;

use crate::config::MazeConfig;
use crate::error::GenerationError;
use crate::maze::Maze;

#[derive(Clone, Debug)]
pub struct MazeGenerator {
    config: MazeConfig,
}

impl MazeGenerator {
    /// Validates the config once so repeated `generate` calls skip straight to work.
    pub fn new(config: MazeConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    pub fn generate(&self, seed: u64) -> Result<Maze, GenerationError> {
        pipeline::generate_maze(&self.config, seed)
    }
}

pub fn generate(config: &MazeConfig, seed: u64) -> Result<Maze, GenerationError> {
    MazeGenerator::new(config.clone())?.generate(seed)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::config::{Algorithm, Neighborhood, ObstacleTarget};
    use crate::pathing::reachable;
    use crate::types::{Cell, EdgeKey, EdgeKind};

    fn all_passable_cells_reachable(maze: &Maze) -> bool {
        let seen = reachable(maze, maze.start(), None);
        maze.passable_cells().all(|cell| seen[maze.grid().index(cell)])
    }

    fn intra_floor_edges(maze: &Maze) -> usize {
        maze.edges().filter(|(key, _)| !key.is_cross_floor()).count()
    }

    #[test]
    fn generate_matches_generator_output() {
        let config = MazeConfig { width: 6, height: 5, ..MazeConfig::default() };
        let from_helper = generate(&config, 123).expect("generates");
        let from_generator = MazeGenerator::new(config).expect("valid").generate(123).expect("ok");
        assert_eq!(from_helper, from_generator);
    }

    #[test]
    fn generation_fingerprint_matrix_is_stable() {
        let cases = [
            (
                MazeConfig { width: 5, height: 5, ..MazeConfig::default() },
                42_u64,
                10_528_152_211_752_887_683_u64,
            ),
            (
                MazeConfig {
                    width: 8,
                    height: 6,
                    algorithm: Algorithm::Prim,
                    loop_density: 0.15,
                    ..MazeConfig::default()
                },
                7,
                8_790_558_661_058_310_962,
            ),
            (
                MazeConfig {
                    width: 7,
                    height: 7,
                    neighborhood: Neighborhood::Eight,
                    algorithm: Algorithm::Kruskal,
                    loop_density: 0.1,
                    ..MazeConfig::default()
                },
                1_234,
                4_827_046_900_158_191_178,
            ),
            (
                MazeConfig {
                    width: 6,
                    height: 5,
                    floors: 3,
                    portal_count: 4,
                    portal_cost: 2,
                    algorithm: Algorithm::Prim,
                    ..MazeConfig::default()
                },
                99,
                2_989_320_676_855_766_987,
            ),
            (
                MazeConfig {
                    width: 9,
                    height: 9,
                    algorithm: Algorithm::Kruskal,
                    loop_density: 0.2,
                    weighted: true,
                    cost_min: 1,
                    cost_max: 9,
                    ..MazeConfig::default()
                },
                2_024,
                5_187_313_482_862_563_729,
            ),
            (
                MazeConfig {
                    width: 10,
                    height: 8,
                    loop_density: 0.1,
                    dynamic_obstacle_count: 6,
                    ..MazeConfig::default()
                },
                31_337,
                11_302_309_842_137_242_234,
            ),
            (
                MazeConfig {
                    width: 7,
                    height: 7,
                    floors: 2,
                    portal_count: 2,
                    neighborhood: Neighborhood::Eight,
                    algorithm: Algorithm::Kruskal,
                    loop_density: 0.1,
                    weighted: true,
                    cost_min: 2,
                    cost_max: 6,
                    dynamic_obstacle_count: 5,
                    obstacle_target: ObstacleTarget::Edges,
                    ..MazeConfig::default()
                },
                555,
                2_502_845_536_112_416_183,
            ),
        ];

        for (config, seed, expected_hash) in cases {
            let maze = generate(&config, seed).expect("generates");
            assert_eq!(
                maze.fingerprint(),
                expected_hash,
                "update expected hash only when generation rules intentionally change"
            );
        }
    }

    #[test]
    fn five_by_five_dfs_seed_42_is_a_stable_24_edge_tree() {
        let config = MazeConfig {
            floors: 1,
            width: 5,
            height: 5,
            neighborhood: Neighborhood::Four,
            algorithm: Algorithm::DfsBacktracker,
            loop_density: 0.0,
            weighted: false,
            portal_count: 0,
            dynamic_obstacle_count: 0,
            ..MazeConfig::default()
        };
        let expected = [
            ((0, 0), (1, 0)),
            ((0, 1), (0, 2)),
            ((0, 1), (1, 1)),
            ((0, 2), (0, 3)),
            ((0, 3), (0, 4)),
            ((0, 4), (1, 4)),
            ((1, 0), (2, 0)),
            ((1, 1), (2, 1)),
            ((1, 2), (1, 3)),
            ((1, 2), (2, 2)),
            ((1, 3), (1, 4)),
            ((2, 0), (3, 0)),
            ((2, 1), (3, 1)),
            ((2, 3), (2, 4)),
            ((2, 3), (3, 3)),
            ((3, 0), (4, 0)),
            ((3, 1), (4, 1)),
            ((3, 2), (3, 3)),
            ((3, 3), (3, 4)),
            ((3, 4), (4, 4)),
            ((4, 0), (4, 1)),
            ((4, 1), (4, 2)),
            ((4, 2), (4, 3)),
            ((4, 3), (4, 4)),
        ]
        .map(|((a_row, a_col), (b_row, b_col))| {
            EdgeKey::new(Cell::new(0, a_row, a_col), Cell::new(0, b_row, b_col))
        });

        let maze = generate(&config, 42).expect("generates");
        let tree: Vec<EdgeKey> = maze.edges().map(|(key, _)| *key).collect();
        assert_eq!(
            tree, expected,
            "update expected edges only when generation rules intentionally change"
        );
        assert!(maze.edges().all(|(_, edge)| edge.kind == EdgeKind::Tree && edge.cost == 1));
        assert_eq!((maze.start(), maze.goal()), (Cell::new(0, 0, 0), Cell::new(0, 2, 2)));
        assert_eq!(maze.reference_path().len(), 17);
    }

    #[test]
    fn different_seeds_change_the_layout() {
        let config = MazeConfig { width: 10, height: 10, ..MazeConfig::default() };
        let a = generate(&config, 1).expect("generates");
        let b = generate(&config, 2).expect("generates");
        assert_ne!(a.edges().collect::<Vec<_>>(), b.edges().collect::<Vec<_>>());
    }

    #[test]
    fn start_defaults_to_first_cell_and_goal_is_farthest() {
        let config = MazeConfig { width: 8, height: 8, ..MazeConfig::default() };
        let maze = generate(&config, 77).expect("generates");
        assert_eq!(maze.start(), Cell::new(0, 0, 0));
        let path = maze.reference_path();
        let longest = crate::pathing::hop_distances(&maze, maze.start(), None)
            .into_iter()
            .flatten()
            .max()
            .expect("cells reachable");
        assert_eq!(path.len() - 1, longest);
    }

    #[test]
    fn configured_endpoints_are_honoured() {
        let config = MazeConfig {
            width: 6,
            height: 6,
            start: Some(Cell::new(0, 5, 5)),
            goal: Some(Cell::new(0, 0, 3)),
            ..MazeConfig::default()
        };
        let maze = generate(&config, 5).expect("generates");
        assert_eq!(maze.start(), Cell::new(0, 5, 5));
        assert_eq!(maze.goal(), Cell::new(0, 0, 3));
        assert_eq!(maze.reference_path().first(), Some(&Cell::new(0, 5, 5)));
    }

    #[test]
    fn solid_cells_are_left_out_of_the_tree() {
        let solid = vec![Cell::new(0, 1, 1), Cell::new(0, 1, 2), Cell::new(0, 3, 3)];
        let config =
            MazeConfig { width: 5, height: 5, solid_cells: solid.clone(), ..MazeConfig::default() };
        let maze = generate(&config, 11).expect("generates");
        assert_eq!(maze.passable_count(), 22);
        assert_eq!(maze.open_edge_count(), 21);
        for cell in solid {
            assert!(!maze.is_passable(cell));
            assert!(maze.structural_neighbors(cell).is_empty());
        }
    }

    #[test]
    fn solid_wall_across_the_grid_fails_as_disconnected() {
        let wall = (0..4).map(|row| Cell::new(0, row, 2)).collect();
        let config = MazeConfig { width: 5, height: 4, solid_cells: wall, ..MazeConfig::default() };
        assert!(matches!(generate(&config, 1), Err(GenerationError::DisconnectedGrid { .. })));
    }

    #[test]
    fn multi_floor_maze_is_connected_through_portals() {
        let config = MazeConfig {
            width: 6,
            height: 6,
            floors: 3,
            portal_count: 2,
            loop_density: 0.0,
            ..MazeConfig::default()
        };
        let maze = generate(&config, 2_718).expect("generates");
        assert!(all_passable_cells_reachable(&maze));
        assert_eq!(maze.portals().len(), 2);
        assert_eq!(intra_floor_edges(&maze), 108 - 3);
        assert_eq!(maze.open_edge_count(), 108 - 1, "two portals close the forest into one tree");
    }

    #[test]
    fn loop_density_adds_edges_on_top_of_the_tree() {
        let base = MazeConfig {
            width: 10,
            height: 10,
            algorithm: Algorithm::Kruskal,
            ..MazeConfig::default()
        };
        let looped = MazeConfig { loop_density: 0.3, ..base.clone() };
        let tree = generate(&base, 9).expect("generates");
        let with_loops = generate(&looped, 9).expect("generates");

        assert_eq!(tree.open_edge_count(), 99);
        let closed_after_tree = 180 - 99;
        assert_eq!(with_loops.open_edge_count(), 99 + closed_after_tree * 3 / 10);
        assert!(tree.edges().all(|(key, _)| with_loops.edge(key.a, key.b).is_some()));
    }

    #[test]
    fn dfs_yields_fewer_dead_ends_than_prim_and_kruskal() {
        let mut dead_ends = [0_usize; 3];
        for seed in 0..20 {
            for (slot, algorithm) in Algorithm::ALL.into_iter().enumerate() {
                let config =
                    MazeConfig { width: 15, height: 15, algorithm, ..MazeConfig::default() };
                dead_ends[slot] += generate(&config, seed).expect("generates").stats().dead_ends;
            }
        }
        let [dfs, prim, kruskal] = dead_ends;
        assert!(dfs < prim, "dfs {dfs} vs prim {prim}");
        assert!(dfs < kruskal, "dfs {dfs} vs kruskal {kruskal}");
    }

    #[test]
    fn obstacles_are_applied_for_the_first_episode() {
        let config =
            MazeConfig { width: 8, height: 8, dynamic_obstacle_count: 5, ..MazeConfig::default() };
        let maze = generate(&config, 64).expect("generates");
        assert_eq!(maze.obstacles().cells.len(), 5);
        assert_eq!(maze.obstacles().episode_seed, Some(crate::rng::episode_seed(64, 0)));
    }

    #[test]
    fn single_cell_maze_has_start_equal_to_goal() {
        let config = MazeConfig { width: 1, height: 1, ..MazeConfig::default() };
        let maze = generate(&config, 0).expect("generates");
        assert_eq!(maze.start(), maze.goal());
        assert_eq!(maze.open_edge_count(), 0);
        assert_eq!(maze.reference_path(), &[maze.start()]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]
        #[test]
        fn generated_mazes_keep_every_passable_cell_reachable(
            seed in any::<u64>(),
            width in 2_usize..12,
            height in 1_usize..12,
            floors in 1_usize..4,
            algorithm_selector in 0_usize..3,
            eight in any::<bool>(),
            loop_percent in 0_u32..=100,
        ) {
            let config = MazeConfig {
                width,
                height,
                floors,
                portal_count: floors - 1,
                neighborhood: if eight { Neighborhood::Eight } else { Neighborhood::Four },
                algorithm: Algorithm::ALL[algorithm_selector],
                loop_density: f64::from(loop_percent) / 100.0,
                ..MazeConfig::default()
            };
            let maze = generate(&config, seed).expect("valid config always generates");
            prop_assert!(all_passable_cells_reachable(&maze));
            prop_assert!(reachable(&maze, maze.start(), None)[maze.grid().index(maze.goal())]);
            if loop_percent == 0 {
                prop_assert_eq!(maze.open_edge_count(), maze.passable_count() - 1);
            }
        }
    }
}
