//! The alchemy table: every inter-element reaction over one 2x2 block.
//!
//! Rules run in a fixed order (aging, fire alchemy, blast propagation, lava,
//! acid, stone heat) and read/write only the four local cells, so a block
//! with several simultaneous possibilities resolves deterministically given
//! its RNG. Probabilities are per block pass; the scheduler runs 12-24 passes
//! per frame, so per-frame rates are 12-24x the per-pass numbers here.
//!
//! Each decision draws from its own salt stream (see [`salt`]); the WGSL port
//! uses the same constants.

use crate::cell::{Cell, EMPTY};
use crate::hash::BlockRng;
use crate::material::Element;

/// Rule salts. One per independent decision or spawn, so reordering or
/// extending one rule never perturbs another's outcomes.
pub mod salt {
    pub const AGE_ROLL: u32 = 1;
    pub const AGE_FATE: u32 = 2;
    pub const AGE_SPAWN: u32 = 3;

    pub const FW_STEAM: u32 = 4;
    pub const FW_ROLL: u32 = 5;
    pub const FW_FATE: u32 = 6;
    pub const FW_SPAWN: u32 = 7;

    pub const FWOOD_ROLL: u32 = 8;
    pub const FWOOD_SPAWN: u32 = 9;
    pub const FWOOD_SMOKE_ROLL: u32 = 10;
    pub const FWOOD_SMOKE_SPAWN: u32 = 11;

    pub const FOIL_ROLL: u32 = 12;
    pub const FOIL_SPAWN: u32 = 13;
    pub const FOIL_SMOKE_ROLL: u32 = 14;
    pub const FOIL_SMOKE_SPAWN: u32 = 15;

    pub const FSAND_ROLL: u32 = 16;
    pub const FSAND_SPAWN: u32 = 17;

    pub const DET_SPAWN: u32 = 18;
    pub const BLAST_CUT: u32 = 19;
    pub const BLAST_SPAWN: u32 = 20;

    pub const FGP_ROLL: u32 = 21;
    pub const FGP_SPAWN: u32 = 22;
    pub const FGP_SMOKE_ROLL: u32 = 23;
    pub const FGP_SMOKE_SPAWN: u32 = 24;

    pub const LAVA_WATER_ROLL: u32 = 25;
    pub const LAVA_WATER_FATE: u32 = 26;
    pub const LAVA_WATER_SPAWN: u32 = 27;
    pub const LAVA_HEAT: u32 = 28;
    pub const LAVA_SAND_ROLL: u32 = 29;
    pub const LAVA_SAND_SPAWN: u32 = 30;
    pub const LAVA_WOOD_ROLL: u32 = 31;
    pub const LAVA_WOOD_SPAWN: u32 = 32;
    pub const LAVA_OIL_ROLL: u32 = 33;
    pub const LAVA_OIL_SPAWN: u32 = 34;
    pub const LAVA_GP_ROLL: u32 = 35;
    pub const LAVA_GP_SPAWN: u32 = 36;
    pub const LAVA_BOMB_SPAWN: u32 = 37;

    pub const ACID_FIRE_ROLL: u32 = 38;
    pub const ACID_FIRE_SPAWN: u32 = 39;
    pub const ACID_LAVA_ROLL: u32 = 40;
    pub const ACID_LAVA_SPAWN: u32 = 41;
    pub const ACID_WATER_ROLL: u32 = 42;
    pub const ACID_WATER_FATE: u32 = 43;
    pub const ACID_WATER_SPAWN: u32 = 44;
    pub const ACID_WEAR_ROLL: u32 = 45;
    pub const ACID_DISSOLVE_ROLL: u32 = 46;
    pub const ACID_DISSOLVE_SPAWN: u32 = 47;

    pub const STONE_GAIN: u32 = 48;
    pub const STONE_DECAY: u32 = 49;
    pub const STONE_WATER_ROLL: u32 = 50;
    pub const STONE_WATER_FATE: u32 = 51;
    pub const STONE_WATER_SPAWN: u32 = 52;
    pub const STONE_WOOD_ROLL: u32 = 53;
    pub const STONE_WOOD_SPAWN: u32 = 54;
    pub const STONE_GP_ROLL: u32 = 55;
    pub const STONE_GP_SPAWN: u32 = 56;
    pub const STONE_BOMB_ROLL: u32 = 57;
    pub const STONE_BOMB_SPAWN: u32 = 58;
    pub const STONE_SAND_ROLL: u32 = 59;
    pub const STONE_SAND_SPAWN: u32 = 60;
}

/// Fire with lifetime above this is blast fire and propagates explosively.
pub const BLAST_THRESHOLD: u8 = 200;

#[inline]
fn count(cells: &[Cell; 4], e: Element) -> u32 {
    cells.iter().filter(|c| c.element() == e).count() as u32
}

#[inline]
fn contains(cells: &[Cell; 4], e: Element) -> bool {
    cells.iter().any(|c| c.element() == e)
}

/// Spawn a cell from one hash word: bits 16..24 color the particle, the low
/// bits pick the aux value uniformly in `lo..=hi`.
#[inline]
fn spawn(e: Element, w: u32, lo: u32, hi: u32) -> Cell {
    Cell::new(e, (w >> 16) as u8, (lo + w % (hi - lo + 1)) as u8)
}

/// Apply the full reaction table to one block, in the fixed order.
pub fn apply_reactions(cells: &mut [Cell; 4], rng: &BlockRng) {
    age(cells, rng);
    fire_water(cells, rng);
    fire_wood(cells, rng);
    fire_oil(cells, rng);
    fire_sand(cells, rng);
    fire_bomb(cells, rng);
    blast_propagation(cells, rng);
    fire_gunpowder(cells, rng);
    lava(cells, rng);
    acid(cells, rng);
    stone_heat(cells, rng);
}

/// Lifetime/heat/potency ticking. Each cell ages independently.
fn age(cells: &mut [Cell; 4], rng: &BlockRng) {
    for i in 0..4 {
        let cell = cells[i];
        let lane = i as u32;
        match cell.element() {
            Element::Fire => {
                if cell.aux() == 0 {
                    cells[i] = EMPTY;
                } else if rng.one_in(salt::AGE_ROLL, lane, 64) {
                    let life = cell.aux() - 1;
                    if life == 0 {
                        // burnt out: half the time leave a puff of smoke
                        cells[i] = if rng.word(salt::AGE_FATE, lane) & 1 == 0 {
                            spawn(Element::Smoke, rng.word(salt::AGE_SPAWN, lane), 60, 99)
                        } else {
                            EMPTY
                        };
                    } else {
                        cells[i] = cell.with_aux(life);
                    }
                }
            }
            Element::Steam => {
                if cell.aux() == 0 {
                    cells[i] = condense(rng, lane);
                } else if rng.one_in(salt::AGE_ROLL, lane, 64) {
                    let life = cell.aux() - 1;
                    cells[i] = if life == 0 {
                        condense(rng, lane)
                    } else {
                        cell.with_aux(life)
                    };
                }
            }
            Element::Smoke => {
                if cell.aux() == 0 {
                    cells[i] = EMPTY;
                } else if rng.one_in(salt::AGE_ROLL, lane, 64) {
                    let life = cell.aux() - 1;
                    cells[i] = if life == 0 { EMPTY } else { cell.with_aux(life) };
                }
            }
            Element::Lava => {
                if cell.aux() == 0 {
                    // cooled solid
                    cells[i] = Cell::new(
                        Element::Stone,
                        (rng.word(salt::AGE_SPAWN, lane) >> 16) as u8,
                        0,
                    );
                } else if rng.one_in(salt::AGE_ROLL, lane, 166) {
                    cells[i] = cell.with_aux(cell.aux() - 1);
                }
            }
            Element::Acid => {
                if cell.aux() == 0 {
                    cells[i] = EMPTY;
                } else if rng.one_in(salt::AGE_ROLL, lane, 128) {
                    let potency = cell.aux() - 1;
                    cells[i] = if potency == 0 {
                        EMPTY
                    } else {
                        cell.with_aux(potency)
                    };
                }
            }
            _ => {}
        }
    }
}

#[inline]
fn condense(rng: &BlockRng, lane: u32) -> Cell {
    Cell::new(
        Element::Water,
        (rng.word(salt::AGE_SPAWN, lane) >> 16) as u8,
        0,
    )
}

/// Fire quenches to steam; part of the water boils away. Blast fire is
/// exempt: water in its reach is handled by the blast table instead.
fn fire_water(cells: &mut [Cell; 4], rng: &BlockRng) {
    let ordinary_fire = cells
        .iter()
        .any(|c| c.element() == Element::Fire && c.aux() <= BLAST_THRESHOLD);
    if !ordinary_fire || !contains(cells, Element::Water) {
        return;
    }
    for i in 0..4 {
        let lane = i as u32;
        let cell = cells[i];
        if cell.element() == Element::Fire && cell.aux() <= BLAST_THRESHOLD {
            cells[i] = spawn(Element::Steam, rng.word(salt::FW_STEAM, lane), 40, 79);
        }
    }
    for i in 0..4 {
        let lane = i as u32;
        if cells[i].element() == Element::Water && rng.percent(salt::FW_ROLL, lane, 30) {
            cells[i] = if rng.percent(salt::FW_FATE, lane, 60) {
                spawn(Element::Steam, rng.word(salt::FW_SPAWN, lane), 60, 119)
            } else {
                EMPTY
            };
        }
    }
}

/// Wood catches slowly; the fire sheds the occasional smoke puff.
fn fire_wood(cells: &mut [Cell; 4], rng: &BlockRng) {
    if !contains(cells, Element::Fire) || !contains(cells, Element::Wood) {
        return;
    }
    for i in 0..4 {
        let lane = i as u32;
        match cells[i].element() {
            Element::Wood => {
                if rng.one_in(salt::FWOOD_ROLL, lane, 512) {
                    cells[i] = spawn(Element::Fire, rng.word(salt::FWOOD_SPAWN, lane), 100, 159);
                }
            }
            Element::Empty => {
                if rng.one_in(salt::FWOOD_SMOKE_ROLL, lane, 64) {
                    cells[i] =
                        spawn(Element::Smoke, rng.word(salt::FWOOD_SMOKE_SPAWN, lane), 40, 69);
                }
            }
            _ => {}
        }
    }
}

/// Oil flashes readily.
fn fire_oil(cells: &mut [Cell; 4], rng: &BlockRng) {
    if !contains(cells, Element::Fire) || !contains(cells, Element::Oil) {
        return;
    }
    for i in 0..4 {
        let lane = i as u32;
        match cells[i].element() {
            Element::Oil => {
                if rng.percent(salt::FOIL_ROLL, lane, 15) {
                    cells[i] = spawn(Element::Fire, rng.word(salt::FOIL_SPAWN, lane), 80, 139);
                }
            }
            Element::Empty => {
                if rng.one_in(salt::FOIL_SMOKE_ROLL, lane, 32) {
                    cells[i] =
                        spawn(Element::Smoke, rng.word(salt::FOIL_SMOKE_SPAWN, lane), 40, 69);
                }
            }
            _ => {}
        }
    }
}

/// Sand vitrifies; the fire pays lifetime for the heat it dumps into it.
fn fire_sand(cells: &mut [Cell; 4], rng: &BlockRng) {
    if !contains(cells, Element::Fire) || !contains(cells, Element::Sand) {
        return;
    }
    let n_sand = count(cells, Element::Sand) as u8;
    for i in 0..4 {
        let lane = i as u32;
        if cells[i].element() == Element::Sand && rng.percent(salt::FSAND_ROLL, lane, 2) {
            cells[i] = Cell::new(
                Element::Glass,
                (rng.word(salt::FSAND_SPAWN, lane) >> 16) as u8,
                0,
            );
        }
    }
    let cost = 7 * n_sand;
    for i in 0..4 {
        let cell = cells[i];
        if cell.element() == Element::Fire {
            cells[i] = if cell.aux() <= cost {
                EMPTY
            } else {
                cell.with_aux(cell.aux() - cost)
            };
        }
    }
}

/// A bomb touched by any fire detonates at once. Immovable neighbors are
/// left to the blast propagation step.
fn fire_bomb(cells: &mut [Cell; 4], rng: &BlockRng) {
    if !contains(cells, Element::Fire) || !contains(cells, Element::Bomb) {
        return;
    }
    for i in 0..4 {
        let lane = i as u32;
        let w = rng.word(salt::DET_SPAWN, lane);
        match cells[i].element() {
            Element::Bomb | Element::Fire => {
                cells[i] = Cell::new(Element::Fire, (w >> 16) as u8, 250);
            }
            Element::Empty => {
                cells[i] = spawn(Element::Smoke, w, 40, 69);
            }
            e if !e.is_immovable() => {
                cells[i] = Cell::new(Element::Fire, (w >> 16) as u8, 240);
            }
            _ => {}
        }
    }
}

/// Blast fire (lifetime above 200) consumes the block around it with a
/// lifetime that decays per cell, bounding the blast radius over passes.
fn blast_propagation(cells: &mut [Cell; 4], rng: &BlockRng) {
    let mut max_life: u32 = 0;
    for c in cells.iter() {
        if c.element() == Element::Fire && c.aux() > BLAST_THRESHOLD {
            max_life = max_life.max(c.aux() as u32);
        }
    }
    if max_life == 0 {
        return;
    }
    for i in 0..4 {
        let lane = i as u32;
        let cell = cells[i];
        if cell.element() == Element::Fire && cell.aux() > BLAST_THRESHOLD {
            continue;
        }
        match cell.element() {
            Element::Bomb => {
                cells[i] = Cell::new(
                    Element::Fire,
                    (rng.word(salt::BLAST_SPAWN, lane) >> 16) as u8,
                    250,
                );
            }
            Element::Gunpowder => {
                // amplified: nearly the full blast lifetime
                let cut = (rng.range(salt::BLAST_CUT, lane, 5, 8)) as u32;
                cells[i] = Cell::new(
                    Element::Fire,
                    (rng.word(salt::BLAST_SPAWN, lane) >> 16) as u8,
                    (max_life - cut).min(255) as u8,
                );
            }
            Element::Water => {
                cells[i] = spawn(Element::Steam, rng.word(salt::BLAST_SPAWN, lane), 80, 139);
            }
            Element::Acid => {
                cells[i] = spawn(Element::Smoke, rng.word(salt::BLAST_SPAWN, lane), 40, 69);
            }
            Element::Stone => {
                let heat = (cell.aux() as u32 + 10).min(255) as u8;
                cells[i] = cell.with_aux(heat);
            }
            Element::Glass | Element::Lava | Element::Smoke | Element::Steam | Element::Fire => {}
            _ => {
                // empty, sand, wood, oil: swallowed with a decaying lifetime
                let cut = (rng.range(salt::BLAST_CUT, lane, 8, 12)) as u32;
                cells[i] = Cell::new(
                    Element::Fire,
                    (rng.word(salt::BLAST_SPAWN, lane) >> 16) as u8,
                    max_life.saturating_sub(cut) as u8,
                );
            }
        }
    }
}

fn fire_gunpowder(cells: &mut [Cell; 4], rng: &BlockRng) {
    if !contains(cells, Element::Fire) || !contains(cells, Element::Gunpowder) {
        return;
    }
    for i in 0..4 {
        let lane = i as u32;
        match cells[i].element() {
            Element::Gunpowder => {
                if rng.percent(salt::FGP_ROLL, lane, 50) {
                    cells[i] = spawn(Element::Fire, rng.word(salt::FGP_SPAWN, lane), 120, 179);
                }
            }
            Element::Empty => {
                if rng.percent(salt::FGP_SMOKE_ROLL, lane, 10) {
                    cells[i] =
                        spawn(Element::Smoke, rng.word(salt::FGP_SMOKE_SPAWN, lane), 40, 69);
                }
            }
            _ => {}
        }
    }
}

/// Lava quenches against water, vitrifies sand, and ignites fuels. Sub-steps
/// run in order and re-inspect identities between each other.
fn lava(cells: &mut [Cell; 4], rng: &BlockRng) {
    if !contains(cells, Element::Lava) {
        return;
    }

    let n_water = count(cells, Element::Water) as u8;
    if n_water > 0 {
        for i in 0..4 {
            let lane = i as u32;
            if cells[i].element() == Element::Water && rng.percent(salt::LAVA_WATER_ROLL, lane, 50)
            {
                cells[i] = if rng.percent(salt::LAVA_WATER_FATE, lane, 60) {
                    spawn(Element::Steam, rng.word(salt::LAVA_WATER_SPAWN, lane), 60, 119)
                } else {
                    EMPTY
                };
            }
        }
        for i in 0..4 {
            let lane = i as u32;
            let cell = cells[i];
            if cell.element() == Element::Lava {
                let per = 3 + (rng.word(salt::LAVA_HEAT, lane) & 1) as u8;
                cells[i] = cell.with_aux(cell.aux().saturating_sub(per * n_water));
            }
        }
    }

    let n_sand = count(cells, Element::Sand) as u8;
    if n_sand > 0 {
        for i in 0..4 {
            let lane = i as u32;
            if cells[i].element() == Element::Sand && rng.percent(salt::LAVA_SAND_ROLL, lane, 4) {
                cells[i] = Cell::new(
                    Element::Glass,
                    (rng.word(salt::LAVA_SAND_SPAWN, lane) >> 16) as u8,
                    0,
                );
            }
        }
        for i in 0..4 {
            let cell = cells[i];
            if cell.element() == Element::Lava {
                cells[i] = cell.with_aux(cell.aux().saturating_sub(3 * n_sand));
            }
        }
    }

    for i in 0..4 {
        let lane = i as u32;
        match cells[i].element() {
            Element::Wood => {
                if rng.percent(salt::LAVA_WOOD_ROLL, lane, 8) {
                    cells[i] = spawn(Element::Fire, rng.word(salt::LAVA_WOOD_SPAWN, lane), 80, 139);
                }
            }
            Element::Oil => {
                if rng.percent(salt::LAVA_OIL_ROLL, lane, 20) {
                    cells[i] = spawn(Element::Fire, rng.word(salt::LAVA_OIL_SPAWN, lane), 80, 139);
                }
            }
            Element::Gunpowder => {
                if rng.percent(salt::LAVA_GP_ROLL, lane, 30) {
                    cells[i] =
                        spawn(Element::Fire, rng.word(salt::LAVA_GP_SPAWN, lane), 120, 179);
                }
            }
            Element::Bomb => {
                cells[i] = Cell::new(
                    Element::Fire,
                    (rng.word(salt::LAVA_BOMB_SPAWN, lane) >> 16) as u8,
                    250,
                );
            }
            _ => {}
        }
    }
}

/// Per-material dissolution probability and potency cost.
#[inline]
fn dissolution(e: Element) -> Option<(u32, u32)> {
    match e {
        Element::Sand => Some((5, 3)),
        Element::Stone => Some((2, 5)),
        Element::Wood => Some((8, 2)),
        Element::Glass => Some((1, 8)),
        Element::Oil => Some((10, 2)),
        Element::Gunpowder => Some((5, 3)),
        Element::Bomb => Some((3, 5)),
        _ => None,
    }
}

/// Acid boils off against heat, reacts weakly with water, and eats through
/// solids at a potency cost pooled across the acid in the block.
fn acid(cells: &mut [Cell; 4], rng: &BlockRng) {
    if !contains(cells, Element::Acid) {
        return;
    }

    if contains(cells, Element::Fire) {
        for i in 0..4 {
            let lane = i as u32;
            if cells[i].element() == Element::Acid && rng.percent(salt::ACID_FIRE_ROLL, lane, 10) {
                cells[i] = spawn(Element::Smoke, rng.word(salt::ACID_FIRE_SPAWN, lane), 40, 69);
            }
        }
    }
    if contains(cells, Element::Lava) {
        for i in 0..4 {
            let lane = i as u32;
            if cells[i].element() == Element::Acid && rng.percent(salt::ACID_LAVA_ROLL, lane, 15) {
                cells[i] = spawn(Element::Smoke, rng.word(salt::ACID_LAVA_SPAWN, lane), 40, 69);
            }
        }
    }

    if contains(cells, Element::Water) {
        for i in 0..4 {
            let lane = i as u32;
            if cells[i].element() == Element::Water && rng.percent(salt::ACID_WATER_ROLL, lane, 4)
            {
                cells[i] = if rng.percent(salt::ACID_WATER_FATE, lane, 60) {
                    spawn(Element::Steam, rng.word(salt::ACID_WATER_SPAWN, lane), 60, 119)
                } else {
                    EMPTY
                };
            }
        }
        for i in 0..4 {
            let lane = i as u32;
            let cell = cells[i];
            if cell.element() == Element::Acid && rng.percent(salt::ACID_WEAR_ROLL, lane, 3) {
                cells[i] = cell.with_aux(cell.aux().saturating_sub(1));
            }
        }
    }

    let n_acid = count(cells, Element::Acid);
    if n_acid == 0 {
        return;
    }
    let mut total_cost: u32 = 0;
    for i in 0..4 {
        let lane = i as u32;
        let e = cells[i].element();
        if e == Element::Acid {
            continue;
        }
        if let Some((prob, cost)) = dissolution(e) {
            if rng.percent(salt::ACID_DISSOLVE_ROLL, lane, prob) {
                cells[i] =
                    spawn(Element::Smoke, rng.word(salt::ACID_DISSOLVE_SPAWN, lane), 40, 69);
                total_cost += cost;
            }
        }
    }
    if total_cost > 0 {
        let share = (total_cost / n_acid).max(1) as u8;
        for i in 0..4 {
            let cell = cells[i];
            if cell.element() == Element::Acid {
                cells[i] = cell.with_aux(cell.aux().saturating_sub(share));
            }
        }
    }
}

/// Stone soaks up heat from fire and lava, conducts it to neighboring stone,
/// and at high temperatures scorches whatever touches it.
fn stone_heat(cells: &mut [Cell; 4], rng: &BlockRng) {
    if !contains(cells, Element::Stone) {
        return;
    }

    let n_hot = count(cells, Element::Fire) + count(cells, Element::Lava);
    if n_hot > 0 {
        for i in 0..4 {
            let lane = i as u32;
            let cell = cells[i];
            if cell.element() == Element::Stone {
                let gain = (2 + (rng.word(salt::STONE_GAIN, lane) & 1)) * n_hot;
                cells[i] = cell.with_aux((cell.aux() as u32 + gain).min(255) as u8);
            }
        }
    }

    for i in 0..4 {
        let lane = i as u32;
        let cell = cells[i];
        if cell.element() == Element::Stone && rng.one_in(salt::STONE_DECAY, lane, 128) {
            cells[i] = cell.with_aux(cell.aux().saturating_sub(1));
        }
    }

    // conduction across the four in-block adjacencies, one unit at a time
    for (a, b) in [(0, 1), (2, 3), (0, 2), (1, 3)] {
        if cells[a].element() == Element::Stone && cells[b].element() == Element::Stone {
            let (ha, hb) = (cells[a].aux() as i32, cells[b].aux() as i32);
            if ha - hb > 1 {
                cells[a] = cells[a].with_aux((ha - 1) as u8);
                cells[b] = cells[b].with_aux((hb + 1) as u8);
            } else if hb - ha > 1 {
                cells[b] = cells[b].with_aux((hb - 1) as u8);
                cells[a] = cells[a].with_aux((ha + 1) as u8);
            }
        }
    }

    let mut max_heat: u8 = 0;
    for c in cells.iter() {
        if c.element() == Element::Stone {
            max_heat = max_heat.max(c.aux());
        }
    }
    if max_heat > 100 {
        for i in 0..4 {
            let lane = i as u32;
            if cells[i].element() == Element::Water
                && rng.percent(salt::STONE_WATER_ROLL, lane, 1)
            {
                cells[i] = if rng.percent(salt::STONE_WATER_FATE, lane, 60) {
                    spawn(Element::Steam, rng.word(salt::STONE_WATER_SPAWN, lane), 60, 119)
                } else {
                    EMPTY
                };
            }
        }
    }
    if max_heat > 150 {
        for i in 0..4 {
            let lane = i as u32;
            match cells[i].element() {
                Element::Wood => {
                    if rng.one_in(salt::STONE_WOOD_ROLL, lane, 2048) {
                        cells[i] =
                            spawn(Element::Fire, rng.word(salt::STONE_WOOD_SPAWN, lane), 100, 159);
                    }
                }
                Element::Gunpowder => {
                    if rng.percent(salt::STONE_GP_ROLL, lane, 1) {
                        cells[i] =
                            spawn(Element::Fire, rng.word(salt::STONE_GP_SPAWN, lane), 120, 179);
                    }
                }
                Element::Bomb => {
                    if rng.percent(salt::STONE_BOMB_ROLL, lane, 2) {
                        cells[i] = Cell::new(
                            Element::Fire,
                            (rng.word(salt::STONE_BOMB_SPAWN, lane) >> 16) as u8,
                            250,
                        );
                    }
                }
                _ => {}
            }
        }
    }
    if max_heat > 200 {
        for i in 0..4 {
            let lane = i as u32;
            if cells[i].element() == Element::Sand && rng.one_in(salt::STONE_SAND_ROLL, lane, 200)
            {
                cells[i] = Cell::new(
                    Element::Glass,
                    (rng.word(salt::STONE_SAND_SPAWN, lane) >> 16) as u8,
                    0,
                );
            }
        }
    }
}
