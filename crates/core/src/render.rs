//! ASCII drawing of a single floor, for inspection and debugging.
//!
//! Each cell occupies an odd row and column of a `(2h + 1) x (2w + 1)`
//! character grid; the characters in between are walls (`#`) or open
//! passages (` `). Diagonal passages sit on the corner between four cells.

use crate::maze::Maze;
use crate::types::{Cell, EdgeKey};

const WALL: char = '#';
const OPEN: char = ' ';
const BLOCKED_PASSAGE: char = 'x';

impl Maze {
    /// Draws `floor` with `S`/`G` endpoints, `P` portal endpoints, `X`
    /// blocked cells and `#` for walls and solid cells. An out-of-range
    /// floor renders as an empty string.
    pub fn render_floor(&self, floor: usize) -> String {
        let grid = self.grid();
        if floor >= grid.floors() {
            return String::new();
        }
        let (width, height) = (grid.width(), grid.height());
        let mut canvas = vec![vec![WALL; 2 * width + 1]; 2 * height + 1];

        for row in 0..height {
            for col in 0..width {
                let cell = Cell::new(floor, row, col);
                canvas[2 * row + 1][2 * col + 1] = self.cell_glyph(cell);
                if col + 1 < width {
                    let east = Cell::new(floor, row, col + 1);
                    canvas[2 * row + 1][2 * col + 2] = self.passage_glyph(cell, east, OPEN);
                }
                if row + 1 < height {
                    let south = Cell::new(floor, row + 1, col);
                    canvas[2 * row + 2][2 * col + 1] = self.passage_glyph(cell, south, OPEN);
                }
                if row + 1 < height && col + 1 < width {
                    canvas[2 * row + 2][2 * col + 2] = self.corner_glyph(floor, row, col);
                }
            }
        }

        let mut out = String::with_capacity((2 * width + 2) * (2 * height + 1));
        for line in canvas {
            out.extend(line);
            out.push('\n');
        }
        out
    }

    fn cell_glyph(&self, cell: Cell) -> char {
        if !self.is_passable(cell) {
            WALL
        } else if cell == self.start() {
            'S'
        } else if cell == self.goal() {
            'G'
        } else if self.portals().iter().any(|portal| portal.key().touches(cell)) {
            'P'
        } else if self.is_blocked(cell) {
            'X'
        } else {
            OPEN
        }
    }

    fn passage_glyph(&self, from: Cell, to: Cell, open: char) -> char {
        if self.edge(from, to).is_none() {
            return WALL;
        }
        if self.obstacles().edges.contains(&EdgeKey::new(from, to)) {
            BLOCKED_PASSAGE
        } else {
            open
        }
    }

    /// `\` joins the top-left and bottom-right cells, `/` the other pair,
    /// `*` both.
    fn corner_glyph(&self, floor: usize, row: usize, col: usize) -> char {
        let falling = self.passage_glyph(
            Cell::new(floor, row, col),
            Cell::new(floor, row + 1, col + 1),
            '\\',
        );
        let rising = self.passage_glyph(
            Cell::new(floor, row, col + 1),
            Cell::new(floor, row + 1, col),
            '/',
        );
        match (falling, rising) {
            (WALL, glyph) | (glyph, WALL) => glyph,
            _ => '*',
        }
    }
}
