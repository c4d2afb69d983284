use nametagkit_core::NameString;
use nametagkit_designer::{
    advance_width, glyph_advance_width, BakedOutlineTable, GlyphSource, TagDimensions,
    TagGenerator, Underline, WidthClass, NARROW_CHARS, WIDE_CHARS,
};

const NARROW: [char; 8] = ['I', 'i', 'l', '1', 'J', '.', ',', '-'];
const WIDE: [char; 8] = ['W', 'M', 'H', 'K', 'O', 'D', 'Q', 'G'];

#[test]
fn test_enumerated_sets() {
    assert_eq!(NARROW_CHARS, &NARROW);
    assert_eq!(WIDE_CHARS, &WIDE);
    for ch in NARROW {
        assert_eq!(WidthClass::of(ch), WidthClass::Narrow);
        assert_eq!(advance_width(ch), 2.5);
        assert_eq!(glyph_advance_width(ch), 2.5);
    }
    for ch in WIDE {
        assert_eq!(WidthClass::of(ch), WidthClass::Wide);
        assert_eq!(advance_width(ch), 5.0);
    }
    for ch in "ABCEFLNPRSTUVXYZ023456789 ".chars() {
        assert_eq!(advance_width(ch), 3.5, "{ch}");
    }
}

#[test]
fn test_glyph_table_uses_same_widths() {
    for ch in nametagkit_designer::ALPHABET.chars() {
        assert_eq!(BakedOutlineTable.glyph(ch).unwrap().advance, advance_width(ch));
    }
}

#[test]
fn test_underline_uses_same_widths() {
    let dims = TagDimensions::default();
    let name = NameString::parse("MIKE", 14).unwrap();
    let layout = TagGenerator::new(dims.clone())
        .layout(&name, &BakedOutlineTable)
        .unwrap();
    let underline = Underline::for_layout(
        &layout,
        dims.underline_width_factor,
        dims.underline_thickness,
        dims.underline_gap,
    );
    let advances = 5.0 + 2.5 + 5.0 + 3.5;
    let expected = advances * dims.scale() * dims.spacing_factor * dims.underline_width_factor;
    assert!((underline.width - expected).abs() < 1e-9);
}
