//! Cell addressing, bounds and neighbor enumeration for stacked floors.

use crate::config::{GridLimits, MazeConfig, Neighborhood};
use crate::error::GenerationError;
use crate::types::{Cell, EdgeKey};

/// Row/column offsets in canonical order: north first, then clockwise.
const ORTHOGONAL_STEPS: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];
const ALL_STEPS: [(isize, isize); 8] =
    [(-1, 0), (-1, 1), (0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1)];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    floors: usize,
    neighborhood: Neighborhood,
}

impl Grid {
    pub fn new(
        width: usize,
        height: usize,
        floors: usize,
        neighborhood: Neighborhood,
        limits: GridLimits,
    ) -> Result<Self, GenerationError> {
        let dimensions = MazeConfig { width, height, floors, limits, ..MazeConfig::default() };
        dimensions.check_dimensions()?;
        Ok(Self { width, height, floors, neighborhood })
    }

    pub fn for_config(config: &MazeConfig) -> Result<Self, GenerationError> {
        Self::new(config.width, config.height, config.floors, config.neighborhood, config.limits)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn floors(&self) -> usize {
        self.floors
    }

    pub fn neighborhood(&self) -> Neighborhood {
        self.neighborhood
    }

    pub fn len(&self) -> usize {
        self.width * self.height * self.floors
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cells_per_floor(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.floor < self.floors && cell.row < self.height && cell.col < self.width
    }

    pub fn index(&self, cell: Cell) -> usize {
        debug_assert!(self.contains(cell));
        (cell.floor * self.height + cell.row) * self.width + cell.col
    }

    pub fn cell(&self, index: usize) -> Cell {
        let col = index % self.width;
        let row = (index / self.width) % self.height;
        let floor = index / self.cells_per_floor();
        Cell { floor, row, col }
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.len()).map(|index| self.cell(index))
    }

    pub fn floor_cells(&self, floor: usize) -> impl Iterator<Item = Cell> + '_ {
        let base = floor * self.cells_per_floor();
        (base..base + self.cells_per_floor()).map(|index| self.cell(index))
    }

    fn steps(&self) -> &'static [(isize, isize)] {
        match self.neighborhood {
            Neighborhood::Four => &ORTHOGONAL_STEPS,
            Neighborhood::Eight => &ALL_STEPS,
        }
    }

    fn offset(&self, cell: Cell, (row_step, col_step): (isize, isize)) -> Option<Cell> {
        let row = cell.row.checked_add_signed(row_step)?;
        let col = cell.col.checked_add_signed(col_step)?;
        let next = Cell { floor: cell.floor, row, col };
        self.contains(next).then_some(next)
    }

    /// Same-floor neighbors in canonical order (N, E, S, W or N, NE, ... NW).
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        self.steps().iter().filter_map(|&step| self.offset(cell, step)).collect()
    }

    pub fn is_adjacent(&self, a: Cell, b: Cell) -> bool {
        if a.floor != b.floor || a == b || !self.contains(a) || !self.contains(b) {
            return false;
        }
        let row_gap = a.row.abs_diff(b.row);
        let col_gap = a.col.abs_diff(b.col);
        match self.neighborhood {
            Neighborhood::Four => row_gap + col_gap == 1,
            Neighborhood::Eight => row_gap <= 1 && col_gap <= 1,
        }
    }

    /// Every adjacent pair on `floor` exactly once, sorted by canonical key.
    pub fn candidate_edges(&self, floor: usize) -> Vec<EdgeKey> {
        let mut edges = Vec::new();
        for cell in self.floor_cells(floor) {
            for neighbor in self.neighbors(cell) {
                if cell < neighbor {
                    edges.push(EdgeKey::new(cell, neighbor));
                }
            }
        }
        edges.sort_unstable();
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: usize, height: usize, neighborhood: Neighborhood) -> Grid {
        Grid::new(width, height, 2, neighborhood, GridLimits::default()).expect("valid grid")
    }

    #[test]
    fn index_and_cell_round_trip_over_every_floor() {
        let grid = grid(4, 3, Neighborhood::Four);
        for (index, cell) in grid.cells().enumerate() {
            assert_eq!(grid.index(cell), index);
        }
        assert_eq!(grid.cell(12), Cell::new(1, 0, 0));
    }

    #[test]
    fn neighbors_follow_canonical_order() {
        let four = grid(3, 3, Neighborhood::Four);
        let corner = four.neighbors(Cell::new(0, 0, 0));
        assert_eq!(corner, vec![Cell::new(0, 0, 1), Cell::new(0, 1, 0)]);
        assert_eq!(
            four.neighbors(Cell::new(0, 1, 1)),
            vec![Cell::new(0, 0, 1), Cell::new(0, 1, 2), Cell::new(0, 2, 1), Cell::new(0, 1, 0)]
        );

        let eight = grid(3, 3, Neighborhood::Eight);
        assert_eq!(
            eight.neighbors(Cell::new(0, 1, 1)),
            vec![
                Cell::new(0, 0, 1),
                Cell::new(0, 0, 2),
                Cell::new(0, 1, 2),
                Cell::new(0, 2, 2),
                Cell::new(0, 2, 1),
                Cell::new(0, 2, 0),
                Cell::new(0, 1, 0),
                Cell::new(0, 0, 0),
            ]
        );
    }

    #[test]
    fn neighbors_never_cross_floors() {
        let grid = grid(2, 2, Neighborhood::Eight);
        for cell in grid.cells() {
            assert!(grid.neighbors(cell).iter().all(|next| next.floor == cell.floor));
        }
    }

    #[test]
    fn candidate_edge_counts_match_lattice_formulas() {
        let (width, height) = (5, 4);
        let four = grid(width, height, Neighborhood::Four);
        let orthogonal = (width - 1) * height + width * (height - 1);
        assert_eq!(four.candidate_edges(0).len(), orthogonal);

        let eight = grid(width, height, Neighborhood::Eight);
        let diagonal = 2 * (width - 1) * (height - 1);
        assert_eq!(eight.candidate_edges(1).len(), orthogonal + diagonal);
    }

    #[test]
    fn adjacency_respects_neighborhood() {
        let four = grid(3, 3, Neighborhood::Four);
        let eight = grid(3, 3, Neighborhood::Eight);
        let (a, diagonal) = (Cell::new(0, 0, 0), Cell::new(0, 1, 1));
        assert!(!four.is_adjacent(a, diagonal));
        assert!(eight.is_adjacent(a, diagonal));
        assert!(!eight.is_adjacent(a, Cell::new(1, 0, 0)));
        assert!(!eight.is_adjacent(a, Cell::new(0, 0, 2)));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let limits = GridLimits { max_side: 8, ..GridLimits::default() };
        let result = Grid::new(9, 2, 1, Neighborhood::Four, limits);
        assert!(matches!(result, Err(GenerationError::InvalidDimension { field: "width", .. })));
    }
}
