//! Cell word codec properties.

use proptest::prelude::*;
use sim::{Cell, Element};

proptest! {
    /// Every (element, color, aux) triple survives an encode/decode trip.
    #[test]
    fn codec_round_trip(elem_idx in 0usize..Element::COUNT, color: u8, aux: u8) {
        let e = Element::ALL[elem_idx];
        let c = Cell::new(e, color, aux);
        prop_assert_eq!(c.element(), e);
        prop_assert_eq!(c.color(), color);
        prop_assert_eq!(c.aux(), aux);
        // the reserved byte never picks up bits
        prop_assert_eq!(c.0 >> 24, 0);
    }

    #[test]
    fn with_aux_touches_only_aux(elem_idx in 0usize..Element::COUNT, color: u8, aux: u8, new_aux: u8) {
        let e = Element::ALL[elem_idx];
        let c = Cell::new(e, color, aux).with_aux(new_aux);
        prop_assert_eq!(c.element(), e);
        prop_assert_eq!(c.color(), color);
        prop_assert_eq!(c.aux(), new_aux);
    }
}

#[test]
fn occupancy_follows_element_byte() {
    assert!(Cell::new(Element::Empty, 0, 0).is_empty());
    for e in Element::ALL.into_iter().skip(1) {
        assert!(!Cell::new(e, 0, 0).is_empty());
    }
}
