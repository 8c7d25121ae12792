//! Topology augmentation on top of the spanning trees: loop edges, portal
//! pairs between adjacent floors, and traversal costs. Nothing here removes
//! an open edge.

use std::collections::BTreeMap;

use crate::config::MazeConfig;
use crate::error::GenerationError;
use crate::grid::Grid;
use crate::rng::RandomStream;
use crate::types::{Cell, Edge, EdgeKey, EdgeKind, Portal};

pub(super) struct AugmentContext<'a> {
    pub(super) config: &'a MazeConfig,
    pub(super) grid: &'a Grid,
    pub(super) passable: &'a [bool],
    pub(super) edges: &'a mut BTreeMap<EdgeKey, Edge>,
    pub(super) stream: &'a mut RandomStream,
}

/// Intra-floor candidate edges whose endpoints are both passable, in canonical order.
pub(crate) fn passable_candidates(grid: &Grid, passable: &[bool]) -> Vec<EdgeKey> {
    (0..grid.floors())
        .flat_map(|floor| grid.candidate_edges(floor))
        .filter(|key| passable[grid.index(key.a)] && passable[grid.index(key.b)])
        .collect()
}

pub(super) fn open_loops(context: &mut AugmentContext<'_>) -> usize {
    let mut closed: Vec<EdgeKey> = passable_candidates(context.grid, context.passable)
        .into_iter()
        .filter(|key| !context.edges.contains_key(key))
        .collect();
    let budget = context.config.loop_edge_budget(closed.len());
    if budget == 0 {
        return 0;
    }

    context.stream.shuffle(&mut closed);
    for key in closed.into_iter().take(budget) {
        context.edges.insert(key, Edge { kind: EdgeKind::Loop, cost: 1 });
    }
    budget
}

/// The first `floors - 1` portals join floor pairs (0,1), (1,2), ... in order so
/// every floor is reachable; the rest land on random adjacent pairs.
pub(super) fn place_portals(
    context: &mut AugmentContext<'_>,
) -> Result<Vec<Portal>, GenerationError> {
    let grid = context.grid;
    let config = context.config;
    let mut paired = vec![false; grid.len()];
    let mut portals = Vec::with_capacity(config.portal_count);

    for portal_index in 0..config.portal_count {
        let lower_floor = if portal_index + 1 < grid.floors() {
            portal_index
        } else {
            context.stream.next_index(grid.floors() - 1)
        };

        let mut endpoints = [Cell::new(0, 0, 0); 2];
        for (slot, floor) in [lower_floor, lower_floor + 1].into_iter().enumerate() {
            let free: Vec<Cell> = grid
                .floor_cells(floor)
                .filter(|&cell| context.passable[grid.index(cell)] && !paired[grid.index(cell)])
                .collect();
            if free.is_empty() {
                return Err(GenerationError::invalid_config(
                    "portal_count",
                    format!("floor {floor} has no free cell for portal {portal_index}"),
                ));
            }
            let cell = free[context.stream.next_index(free.len())];
            paired[grid.index(cell)] = true;
            endpoints[slot] = cell;
        }

        let portal = Portal { lower: endpoints[0], upper: endpoints[1], cost: config.portal_cost };
        context.edges.insert(portal.key(), Edge { kind: EdgeKind::Portal, cost: portal.cost });
        portals.push(portal);
    }
    Ok(portals)
}

/// Walks the open edges in canonical order so the draws line up across runs.
pub(super) fn assign_costs(context: &mut AugmentContext<'_>) {
    let config = context.config;
    for edge in context.edges.values_mut() {
        edge.cost = match edge.kind {
            EdgeKind::Portal => config.portal_cost,
            EdgeKind::Tree | EdgeKind::Loop if config.weighted => {
                context.stream.next_in_range(u64::from(config.cost_min), u64::from(config.cost_max))
                    as u32
            }
            EdgeKind::Tree | EdgeKind::Loop => 1,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridLimits, Neighborhood};

    struct Fixture {
        config: MazeConfig,
        grid: Grid,
        passable: Vec<bool>,
        edges: BTreeMap<EdgeKey, Edge>,
        stream: RandomStream,
    }

    impl Fixture {
        fn new(config: MazeConfig) -> Self {
            let grid = Grid::new(
                config.width,
                config.height,
                config.floors,
                Neighborhood::Four,
                GridLimits::default(),
            )
            .expect("valid grid");
            let passable = vec![true; grid.len()];
            Self { config, grid, passable, edges: BTreeMap::new(), stream: RandomStream::seeded(9) }
        }

        fn context(&mut self) -> AugmentContext<'_> {
            AugmentContext {
                config: &self.config,
                grid: &self.grid,
                passable: &self.passable,
                edges: &mut self.edges,
                stream: &mut self.stream,
            }
        }
    }

    #[test]
    fn loop_budget_opens_the_requested_fraction_of_closed_edges() {
        let mut fixture = Fixture::new(MazeConfig {
            width: 4,
            height: 4,
            loop_density: 0.5,
            ..MazeConfig::default()
        });
        let opened = open_loops(&mut fixture.context());
        assert_eq!(opened, 12, "24 closed candidates at density 0.5");
        assert!(fixture.edges.values().all(|edge| edge.kind == EdgeKind::Loop));
    }

    #[test]
    fn loops_never_replace_existing_edges() {
        let mut fixture = Fixture::new(MazeConfig {
            width: 3,
            height: 3,
            loop_density: 1.0,
            ..MazeConfig::default()
        });
        let tree_edge = EdgeKey::new(Cell::new(0, 0, 0), Cell::new(0, 0, 1));
        fixture.edges.insert(tree_edge, Edge { kind: EdgeKind::Tree, cost: 1 });
        let opened = open_loops(&mut fixture.context());
        assert_eq!(opened, 11);
        assert_eq!(fixture.edges[&tree_edge].kind, EdgeKind::Tree);
        assert_eq!(fixture.edges.len(), 12);
    }

    #[test]
    fn portals_join_every_adjacent_floor_pair_with_distinct_endpoints() {
        let mut fixture = Fixture::new(MazeConfig {
            width: 3,
            height: 3,
            floors: 3,
            portal_count: 6,
            portal_cost: 4,
            ..MazeConfig::default()
        });
        let portals = place_portals(&mut fixture.context()).expect("enough room for portals");
        assert_eq!(portals.len(), 6);
        assert_eq!((portals[0].lower.floor, portals[0].upper.floor), (0, 1));
        assert_eq!((portals[1].lower.floor, portals[1].upper.floor), (1, 2));

        let mut endpoints: Vec<Cell> =
            portals.iter().flat_map(|portal| [portal.lower, portal.upper]).collect();
        endpoints.sort_unstable();
        endpoints.dedup();
        assert_eq!(endpoints.len(), 12, "no cell may be paired twice");

        for portal in &portals {
            assert_eq!(portal.upper.floor, portal.lower.floor + 1);
            assert_eq!(fixture.edges[&portal.key()], Edge { kind: EdgeKind::Portal, cost: 4 });
        }
    }

    #[test]
    fn portals_fail_once_a_floor_runs_out_of_unpaired_cells() {
        let mut fixture = Fixture::new(MazeConfig {
            width: 1,
            height: 2,
            floors: 2,
            portal_count: 3,
            ..MazeConfig::default()
        });
        assert!(matches!(
            place_portals(&mut fixture.context()),
            Err(GenerationError::InvalidConfig { field: "portal_count", .. })
        ));
    }

    #[test]
    fn weighted_costs_stay_inside_range_and_portals_keep_their_cost() {
        let mut fixture = Fixture::new(MazeConfig {
            width: 4,
            height: 4,
            floors: 2,
            portal_count: 1,
            portal_cost: 7,
            weighted: true,
            cost_min: 2,
            cost_max: 5,
            loop_density: 1.0,
            ..MazeConfig::default()
        });
        open_loops(&mut fixture.context());
        place_portals(&mut fixture.context()).expect("portal fits");
        assign_costs(&mut fixture.context());

        for (key, edge) in &fixture.edges {
            if key.is_cross_floor() {
                assert_eq!(edge.cost, 7);
            } else {
                assert!((2..=5).contains(&edge.cost), "{key:?} cost {}", edge.cost);
            }
        }
    }

    #[test]
    fn unweighted_edges_cost_one() {
        let mut fixture = Fixture::new(MazeConfig {
            width: 3,
            height: 3,
            loop_density: 1.0,
            ..MazeConfig::default()
        });
        open_loops(&mut fixture.context());
        assign_costs(&mut fixture.context());
        assert!(fixture.edges.values().all(|edge| edge.cost == 1));
    }
}
