//! Movement rules over one 2x2 block: gravity with drag gates, diagonal
//! slides, and the lateral spreading family.
//!
//! Lane layout within a block:
//!
//! ```text
//!   0 (tl)  1 (tr)
//!   2 (bl)  3 (br)
//! ```
//!
//! The gravity phase is skipped 25% of the time per block (and entirely on
//! lateral-only passes); the lateral phase always runs. All decisions draw
//! from the block's hash streams, mirrored in the WGSL port.

use crate::cell::Cell;
use crate::hash::BlockRng;
use crate::material::Element;

/// Movement salts, continuing the reaction table's numbering.
pub mod salt {
    pub const MOVE_GATE: u32 = 61;
    pub const FALL_SAND_DRAG: u32 = 62;
    pub const FALL_LAVA_DRAG: u32 = 63;
    pub const FALL_GAS_RISE: u32 = 64;
    pub const YOUNG_FIRE: u32 = 65;
    pub const DIAG_SAND_DRAG: u32 = 66;
    pub const DIAG_SAND_DISPERSE: u32 = 67;
    pub const DIAG_WATER: u32 = 68;
    pub const DIAG_COIN: u32 = 69;
    pub const LAT_WATER_OIL: u32 = 70;
    pub const LAT_LAVA: u32 = 71;
    pub const LAT_STEAM: u32 = 72;
    pub const LAT_SMOKE: u32 = 73;
    pub const LAT_FIRE: u32 = 74;
    pub const SAND_SMOOTH: u32 = 75;
    pub const EROSION: u32 = 76;
}

/// Young-fire column decision: sink / stall / rise at 20/40/40.
#[derive(Clone, Copy, PartialEq, Eq)]
enum YoungFire {
    Sink,
    Stall,
    Rise,
}

#[inline]
fn young_fire_decision(rng: &BlockRng, col: u32) -> YoungFire {
    match rng.word(salt::YOUNG_FIRE, col) % 100 {
        0..=19 => YoungFire::Sink,
        20..=59 => YoungFire::Stall,
        _ => YoungFire::Rise,
    }
}

pub fn apply_movement(cells: &mut [Cell; 4], rng: &BlockRng, lateral_only: bool) {
    // bits 4-5: 25% of blocks sit out the gravity phase this pass, which
    // desynchronizes waves of falling material
    let skip = (rng.word(salt::MOVE_GATE, 0) >> 4) & 3 == 0;
    if !lateral_only && !skip {
        gravity(cells, rng);
    }
    lateral(cells, rng);
}

/// Whether the column (top `t` over bottom `b`) swaps under gravity.
fn column_falls(cells: &[Cell; 4], t: usize, b: usize, col: u32, rng: &BlockRng) -> bool {
    let top = cells[t];
    let bot = cells[b];
    let te = top.element();
    let be = bot.element();
    if te.is_immovable() || be.is_immovable() {
        return false;
    }
    if te.density() <= be.density() {
        return false;
    }
    // gas below empty: rise against per-gas drag
    if te == Element::Empty && be.is_gas() {
        return match be {
            Element::Fire => {
                if bot.aux() > 100 {
                    // fresh fire drifts before it rises
                    young_fire_decision(rng, col) == YoungFire::Rise
                } else {
                    rng.percent(salt::FALL_GAS_RISE, col, 20)
                }
            }
            Element::Steam => rng.percent(salt::FALL_GAS_RISE, col, 35),
            Element::Smoke => rng.percent(salt::FALL_GAS_RISE, col, 30),
            _ => false,
        };
    }
    // sand sinking through (or liquid rising past) sand is slowed by drag
    if (te == Element::Sand && be.is_liquid()) || (be == Element::Sand && te.is_liquid()) {
        if !rng.percent(salt::FALL_SAND_DRAG, col, 35) {
            return false;
        }
    }
    // lava is viscous in any vertical exchange
    if (te == Element::Lava || be == Element::Lava)
        && !rng.percent(salt::FALL_LAVA_DRAG, col, 50)
    {
        return false;
    }
    true
}

/// Whether the top cell `t` may slide into the diagonally opposite bottom
/// cell `d` (`b` is directly below `t`, `other_top` the other top lane).
fn can_slide(
    cells: &[Cell; 4],
    t: usize,
    d: usize,
    b: usize,
    other_top: usize,
    lane: u32,
    rng: &BlockRng,
) -> bool {
    let cell = cells[t];
    let e = cell.element();
    if e == Element::Empty || e.is_immovable() {
        return false;
    }
    let diag = cells[d].element();
    if diag.is_immovable() || e.density() <= diag.density() {
        return false;
    }
    let resting = e.density() >= cells[b].element().density();
    if e == Element::Sand && diag.is_liquid() {
        // dispersion: sand spreads into liquid even off the floor
        if !rng.percent(salt::DIAG_SAND_DRAG, lane, 35) {
            return false;
        }
        if !resting && !rng.percent(salt::DIAG_SAND_DISPERSE, lane, 50) {
            return false;
        }
        return true;
    }
    if !resting {
        return false;
    }
    if e == Element::Water {
        // streams keep their width: spread only when nothing heavier sits
        // beside the stream head, and slowly
        if cells[other_top].element().density() >= Element::Water.density() {
            return false;
        }
        if !rng.percent(salt::DIAG_WATER, lane, 25) {
            return false;
        }
    }
    true
}

fn gravity(cells: &mut [Cell; 4], rng: &BlockRng) {
    let fall_l = column_falls(cells, 0, 2, 0, rng);
    let fall_r = column_falls(cells, 1, 3, 1, rng);
    if fall_l {
        cells.swap(0, 2);
    }
    if fall_r {
        cells.swap(1, 3);
    }
    if !fall_l && !fall_r {
        let slide_l = can_slide(cells, 0, 3, 2, 1, 0, rng);
        let slide_r = can_slide(cells, 1, 2, 3, 0, 1, rng);
        if slide_l && slide_r {
            if rng.word(salt::DIAG_COIN, 0) & 1 == 0 {
                cells.swap(0, 3);
            } else {
                cells.swap(1, 2);
            }
        } else if slide_l {
            cells.swap(0, 3);
        } else if slide_r {
            cells.swap(1, 2);
        }
    }
    // young fire that rolled "sink" drifts down into empty space
    for col in 0..2usize {
        let (t, b) = (col, col + 2);
        if cells[t].element() == Element::Fire
            && cells[t].aux() > 100
            && cells[b].element() == Element::Empty
            && young_fire_decision(rng, col as u32) == YoungFire::Sink
        {
            cells.swap(t, b);
        }
    }
}

const ROWS: [(usize, usize); 2] = [(0, 1), (2, 3)];

#[inline]
fn row_full(cells: &[Cell; 4], row: usize) -> bool {
    let (i, j) = ROWS[row];
    !cells[i].is_empty() && !cells[j].is_empty()
}

/// The diving-beet pattern: the row holds one `a` and one `target`, in
/// either order. Swapping the row's two lanes applies the rule.
#[inline]
fn beet_matches(cells: &[Cell; 4], row: usize, a: Element, target: Element) -> bool {
    let (i, j) = ROWS[row];
    let (ei, ej) = (cells[i].element(), cells[j].element());
    (ei == a && ej == target) || (ej == a && ei == target)
}

fn lateral(cells: &mut [Cell; 4], rng: &BlockRng) {
    // liquids level only against a support surface (the opposite row full),
    // which keeps mid-air streams from widening
    for row in 0..2 {
        if beet_matches(cells, row, Element::Water, Element::Empty)
            && row_full(cells, 1 - row)
        {
            let (i, j) = ROWS[row];
            cells.swap(i, j);
        }
    }
    for row in 0..2 {
        if beet_matches(cells, row, Element::Water, Element::Oil)
            && row_full(cells, 1 - row)
            && rng.percent(salt::LAT_WATER_OIL, row as u32, 40)
        {
            let (i, j) = ROWS[row];
            cells.swap(i, j);
        }
    }
    for row in 0..2 {
        if beet_matches(cells, row, Element::Oil, Element::Empty) && row_full(cells, 1 - row)
        {
            let (i, j) = ROWS[row];
            cells.swap(i, j);
        }
    }
    for row in 0..2 {
        if beet_matches(cells, row, Element::Lava, Element::Empty)
            && row_full(cells, 1 - row)
            && rng.percent(salt::LAT_LAVA, row as u32, 30)
        {
            let (i, j) = ROWS[row];
            cells.swap(i, j);
        }
    }
    for row in 0..2 {
        if beet_matches(cells, row, Element::Acid, Element::Empty)
            && row_full(cells, 1 - row)
        {
            let (i, j) = ROWS[row];
            cells.swap(i, j);
        }
    }
    // gases drift along surfaces freely and meander a little in the open
    gas_lateral(cells, rng, Element::Steam, salt::LAT_STEAM, 8);
    gas_lateral(cells, rng, Element::Smoke, salt::LAT_SMOKE, 8);
    gas_lateral(cells, rng, Element::Fire, salt::LAT_FIRE, 32);

    // submerged sand relaxes to a lower angle of repose
    if let Some((s, l)) = beet_sand_liquid(cells) {
        let above = s - 2;
        if cells[above].element().is_liquid() && rng.one_in(salt::SAND_SMOOTH, 0, 32) {
            cells.swap(s, l);
        }
    }

    // water slowly erodes sand it sits beside, lifting a grain
    if rng.one_in(salt::EROSION, 0, 512) {
        let (bl, br) = (cells[2].element(), cells[3].element());
        let sand_lane = if bl == Element::Water && br == Element::Sand {
            Some(3)
        } else if bl == Element::Sand && br == Element::Water {
            Some(2)
        } else {
            None
        };
        if let Some(s) = sand_lane {
            let above = s - 2;
            let e = cells[above].element();
            if e == Element::Empty || e == Element::Water {
                cells.swap(s, above);
            }
        }
    }
}

fn gas_lateral(cells: &mut [Cell; 4], rng: &BlockRng, gas: Element, gate: u32, free_one_in: u32) {
    for row in 0..2 {
        if beet_matches(cells, row, gas, Element::Empty) {
            let against_surface = row_full(cells, 1 - row);
            if against_surface || rng.one_in(gate, row as u32, free_one_in) {
                let (i, j) = ROWS[row];
                cells.swap(i, j);
            }
        }
    }
}

/// Bottom-row sand flanked by liquid: returns (sand lane, liquid lane).
#[inline]
fn beet_sand_liquid(cells: &[Cell; 4]) -> Option<(usize, usize)> {
    let (bl, br) = (cells[2].element(), cells[3].element());
    if bl == Element::Sand && br.is_liquid() {
        Some((2, 3))
    } else if br == Element::Sand && bl.is_liquid() {
        Some((3, 2))
    } else {
        None
    }
}
