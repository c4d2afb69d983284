use nametagkit_core::{NameString, MAX_NAME_LENGTH};
use nametagkit_designer::{advance_width, BakedOutlineTable, TagDimensions, TagGenerator, TextLayout};
use proptest::prelude::*;

fn valid_name() -> impl Strategy<Value = NameString> {
    "[A-Z0-9][A-Z0-9 -]{0,12}[A-Z0-9]|[A-Z0-9]"
        .prop_map(|s| NameString::parse(&s, MAX_NAME_LENGTH).unwrap())
}

proptest! {
    #[test]
    fn prop_total_width_is_sum_of_advances(name in valid_name()) {
        let dims = TagDimensions::default();
        let layout = TextLayout::compute(&name, &BakedOutlineTable, dims.scale(), dims.spacing_factor).unwrap();

        let mut expected = 0.0;
        for ch in name.chars() {
            expected += advance_width(ch) * dims.scale() * dims.spacing_factor;
        }
        prop_assert_eq!(layout.total_width, expected);
    }

    #[test]
    fn prop_layout_is_centred(name in valid_name()) {
        let layout = TagGenerator::default().layout(&name, &BakedOutlineTable).unwrap();
        let (left, right) = layout.span();
        prop_assert!(((left + right) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn prop_generation_is_idempotent(name in valid_name()) {
        let generator = TagGenerator::default();
        prop_assert_eq!(generator.generate(&name).unwrap(), generator.generate(&name).unwrap());
    }

    #[test]
    fn prop_positions_increase(name in valid_name()) {
        let layout = TagGenerator::default().layout(&name, &BakedOutlineTable).unwrap();
        for pair in layout.glyphs.windows(2) {
            prop_assert!(pair[0].x < pair[1].x);
        }
    }
}
