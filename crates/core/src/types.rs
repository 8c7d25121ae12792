use serde::{Deserialize, Serialize};

/// A grid cell addressed by floor, row and column.
///
/// The derived ordering (floor, then row, then column) is the canonical
/// enumeration order used everywhere a random choice indexes into a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub floor: usize,
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(floor: usize, row: usize, col: usize) -> Self {
        Self { floor, row, col }
    }
}

/// Canonical key of an undirected edge: the lower cell always comes first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub a: Cell,
    pub b: Cell,
}

impl EdgeKey {
    pub fn new(first: Cell, second: Cell) -> Self {
        if first <= second { Self { a: first, b: second } } else { Self { a: second, b: first } }
    }

    pub fn touches(&self, cell: Cell) -> bool {
        self.a == cell || self.b == cell
    }

    pub fn other(&self, cell: Cell) -> Option<Cell> {
        if self.a == cell {
            Some(self.b)
        } else if self.b == cell {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn is_cross_floor(&self) -> bool {
        self.a.floor != self.b.floor
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Part of the per-floor spanning tree.
    Tree,
    /// Opened by the loop augmenter on top of the tree.
    Loop,
    /// Cross-floor connection between a portal pair.
    Portal,
}

impl EdgeKind {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Tree => 0,
            Self::Loop => 1,
            Self::Portal => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub kind: EdgeKind,
    pub cost: u32,
}

/// Two cells on adjacent floors joined regardless of floor-local adjacency.
/// `lower.floor + 1 == upper.floor` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Portal {
    pub lower: Cell,
    pub upper: Cell,
    pub cost: u32,
}

impl Portal {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_key_is_independent_of_argument_order() {
        let a = Cell::new(0, 1, 2);
        let b = Cell::new(0, 1, 3);
        assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));
        assert_eq!(EdgeKey::new(b, a).a, a);
    }

    #[test]
    fn cells_order_by_floor_then_row_then_col() {
        let mut cells = vec![Cell::new(1, 0, 0), Cell::new(0, 2, 0), Cell::new(0, 1, 5)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(0, 1, 5), Cell::new(0, 2, 0), Cell::new(1, 0, 0)]);
    }

    #[test]
    fn other_endpoint_is_none_for_foreign_cell() {
        let key = EdgeKey::new(Cell::new(0, 0, 0), Cell::new(0, 0, 1));
        assert_eq!(key.other(Cell::new(0, 0, 1)), Some(Cell::new(0, 0, 0)));
        assert_eq!(key.other(Cell::new(0, 3, 3)), None);
    }
}
