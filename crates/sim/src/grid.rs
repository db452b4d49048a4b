//! Row-major cell grid with glyph tooling for scenario tests and debugging.

use crate::cell::{Cell, EMPTY};
use crate::material::Element;

/// A 2D array of cells, row-major, (0, 0) at the top-left.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        Grid {
            width,
            height,
            cells: vec![EMPTY; (width * height) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn idx(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Cell {
        self.cells[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, cell: Cell) {
        let i = self.idx(x, y);
        self.cells[i] = cell;
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Occupied cells (non-zero element byte).
    pub fn particle_count(&self) -> u32 {
        self.cells.iter().filter(|c| !c.is_empty()).count() as u32
    }

    pub fn count_of(&self, e: Element) -> u32 {
        self.cells.iter().filter(|c| c.element() == e).count() as u32
    }

    /// Build a grid from glyph rows (`.` = empty, one letter per element;
    /// see [`glyph_element`]). Aux defaults per element are mid-life values
    /// so parsed fire/steam/smoke behave like freshly brushed particles.
    ///
    /// Panics on ragged rows or unknown glyphs; this is fixture tooling.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        let mut grid = Grid::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len() as u32, width, "ragged glyph row {y}");
            for (x, glyph) in row.chars().enumerate() {
                grid.set(x as u32, y as u32, glyph_cell(glyph));
            }
        }
        grid
    }

    /// Inverse of [`Grid::from_rows`], for failure messages.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(element_glyph(self.get(x, y).element()));
            }
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Grid {}x{}\n{}", self.width, self.height, self.render())
    }
}

pub fn glyph_element(glyph: char) -> Option<Element> {
    Some(match glyph {
        '.' => Element::Empty,
        'S' => Element::Sand,
        'W' => Element::Water,
        'R' => Element::Stone,
        'F' => Element::Fire,
        'V' => Element::Steam,
        'T' => Element::Wood,
        'G' => Element::Glass,
        'M' => Element::Smoke,
        'O' => Element::Oil,
        'L' => Element::Lava,
        'A' => Element::Acid,
        'P' => Element::Gunpowder,
        'B' => Element::Bomb,
        _ => return None,
    })
}

fn element_glyph(e: Element) -> char {
    match e {
        Element::Empty => '.',
        Element::Sand => 'S',
        Element::Water => 'W',
        Element::Stone => 'R',
        Element::Fire => 'F',
        Element::Steam => 'V',
        Element::Wood => 'T',
        Element::Glass => 'G',
        Element::Smoke => 'M',
        Element::Oil => 'O',
        Element::Lava => 'L',
        Element::Acid => 'A',
        Element::Gunpowder => 'P',
        Element::Bomb => 'B',
    }
}

fn glyph_cell(glyph: char) -> Cell {
    let e = glyph_element(glyph).unwrap_or_else(|| panic!("unknown glyph {glyph:?}"));
    let aux = match e {
        Element::Fire => 150,
        Element::Steam => 80,
        Element::Smoke => 70,
        Element::Lava => 200,
        Element::Acid => 180,
        _ => 0,
    };
    Cell::new(e, 0, aux)
}
