//! Element identities and their physical attributes.
//!
//! Movement is driven entirely by density and the immovable flag: heavier
//! elements sink through lighter ones, gases sit below `Empty` so the same
//! swap rule that drops sand lifts smoke. Reactions key off element identity
//! directly and never consult this table.

/// All element types in the simulation.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Element {
    #[default]
    Empty = 0,
    Sand = 1,
    Water = 2,
    Stone = 3,
    Fire = 4,
    Steam = 5,
    Wood = 6,
    Glass = 7,
    Smoke = 8,
    Oil = 9,
    Lava = 10,
    Acid = 11,
    Gunpowder = 12,
    Bomb = 13,
}

impl Element {
    pub const COUNT: usize = 14;

    /// All enumerated elements, in id order.
    pub const ALL: [Element; Element::COUNT] = [
        Element::Empty,
        Element::Sand,
        Element::Water,
        Element::Stone,
        Element::Fire,
        Element::Steam,
        Element::Wood,
        Element::Glass,
        Element::Smoke,
        Element::Oil,
        Element::Lava,
        Element::Acid,
        Element::Gunpowder,
        Element::Bomb,
    ];

    /// Decode from the low byte of a cell word. Bytes outside the enumerated
    /// range decode to `Empty` so a corrupted buffer degrades instead of
    /// panicking.
    #[inline]
    pub const fn from_byte(b: u8) -> Self {
        match b {
            1 => Element::Sand,
            2 => Element::Water,
            3 => Element::Stone,
            4 => Element::Fire,
            5 => Element::Steam,
            6 => Element::Wood,
            7 => Element::Glass,
            8 => Element::Smoke,
            9 => Element::Oil,
            10 => Element::Lava,
            11 => Element::Acid,
            12 => Element::Gunpowder,
            13 => Element::Bomb,
            _ => Element::Empty,
        }
    }

    /// Settling order. Higher density sinks through lower density.
    /// Gases (0, 1) are lighter than `Empty` (2).
    #[inline]
    pub const fn density(self) -> u8 {
        match self {
            Element::Fire => 0,
            Element::Smoke | Element::Steam => 1,
            Element::Empty => 2,
            Element::Oil => 4,
            Element::Water => 5,
            Element::Acid => 6,
            Element::Lava => 7,
            Element::Wood => 9,
            Element::Sand | Element::Gunpowder => 10,
            Element::Glass => 200,
            Element::Bomb | Element::Stone => 255,
        }
    }

    /// Never moved by gravity or slides. Reactions may still transform it.
    #[inline]
    pub const fn is_immovable(self) -> bool {
        matches!(
            self,
            Element::Stone | Element::Wood | Element::Glass | Element::Bomb
        )
    }

    #[inline]
    pub const fn is_liquid(self) -> bool {
        matches!(
            self,
            Element::Water | Element::Oil | Element::Lava | Element::Acid
        )
    }

    #[inline]
    pub const fn is_gas(self) -> bool {
        matches!(self, Element::Fire | Element::Smoke | Element::Steam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_round_trip() {
        for e in Element::ALL {
            assert_eq!(Element::from_byte(e as u8), e);
        }
    }

    #[test]
    fn unknown_bytes_decode_to_empty() {
        assert_eq!(Element::from_byte(14), Element::Empty);
        assert_eq!(Element::from_byte(255), Element::Empty);
    }

    #[test]
    fn gases_are_lighter_than_empty() {
        for e in Element::ALL {
            if e.is_gas() {
                assert!(e.density() < Element::Empty.density());
            }
        }
    }
}
