/// Index of a tile kind within the palette.
///
/// This is also the unit of on-disk encoding, see `core::codec`.
pub type TileId = u8;

/// A single palette entry: display glyph plus human-readable name.
///
/// Glyphs are exactly `constants::GLYPH_WIDTH` columns wide so rows line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileKind {
    pub glyph: &'static str,
    pub name: &'static str,
}

/// The fixed, ordered palette. Index 0 is the default/empty tile; order is
/// significant because the file format stores palette indices.
pub const PALETTE: &[TileKind] = &[
    TileKind { glyph: "  ", name: "Void" },
    TileKind { glyph: "░░", name: "Oxygen" },
    TileKind { glyph: "░░", name: "Vacuum" },
    TileKind { glyph: "██", name: "Stone" },
    TileKind { glyph: "▓▓", name: "Silt" },
    TileKind { glyph: "Cu", name: "Copper" },
    TileKind { glyph: "Ti", name: "Titanium" },
    TileKind { glyph: "##", name: "Insulated Wall" },
    TileKind { glyph: "[]", name: "Reinforced Window" },
    TileKind { glyph: "==", name: "Door" },
    TileKind { glyph: "[=", name: "Door Panel (left)" },
    TileKind { glyph: "=]", name: "Door Panel (right)" },
    TileKind { glyph: "()", name: "Airlock" },
    TileKind { glyph: "%%", name: "Vent" },
];

pub fn kind(id: TileId) -> &'static TileKind {
    &PALETTE[id as usize]
}

/// Next palette entry, wrapping from the last back to 0.
pub fn next(id: TileId) -> TileId {
    if id as usize + 1 >= PALETTE.len() {
        0
    } else {
        id + 1
    }
}

/// Previous palette entry, wrapping from 0 to the last.
pub fn prev(id: TileId) -> TileId {
    if id == 0 {
        (PALETTE.len() - 1) as TileId
    } else {
        id - 1
    }
}

/// Highest valid tile id.
pub fn max_id() -> TileId {
    (PALETTE.len() - 1) as TileId
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::codec;
    use crate::shared::constants;

    #[test]
    fn test_cycle_wraps_both_ways() {
        assert_eq!(prev(0), max_id());
        assert_eq!(next(max_id()), 0);
        assert_eq!(next(0), 1);
        assert_eq!(prev(1), 0);
    }

    #[test]
    fn test_glyphs_are_fixed_width() {
        for tile in PALETTE {
            assert_eq!(
                tile.glyph.chars().count(),
                constants::GLYPH_WIDTH,
                "glyph for {} must be {} columns",
                tile.name,
                constants::GLYPH_WIDTH
            );
        }
    }

    #[test]
    fn test_palette_fits_the_codec_alphabet() {
        assert!(PALETTE.len() <= codec::alphabet_len());
    }
}
