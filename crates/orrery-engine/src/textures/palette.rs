use super::canvas::Color;

/// Surface detail painted over the base gradient of a synthesized texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPattern {
    Crater,
    Stripe,
    Land,
    Swirl,
    Smooth,
    Volcanic,
    Cracked,
    Dark,
    Mixed,
    Haze,
}

/// Colors and pattern for one body's fallback texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub pattern: DetailPattern,
}

impl Palette {
    const fn new(primary: u32, secondary: u32, pattern: DetailPattern) -> Self {
        Self {
            primary: Color::hex(primary),
            secondary: Color::hex(secondary),
            pattern,
        }
    }
}

use DetailPattern::*;

/// Neutral grey used for names missing from the table.
pub const DEFAULT_PALETTE: Palette = Palette::new(0xb0b0b0, 0x909090, Mixed);

/// Keyed by lowercase body name.
static PALETTES: &[(&str, Palette)] = &[
    // Planets
    ("mercury", Palette::new(0xaaaaaa, 0x777777, Crater)),
    ("venus", Palette::new(0xe9d8a6, 0xd9b86e, Swirl)),
    ("earth", Palette::new(0x2a73c9, 0x186a3b, Land)),
    ("mars", Palette::new(0xc0392b, 0xcd6155, Crater)),
    ("jupiter", Palette::new(0xe67e22, 0xf39c12, Stripe)),
    ("saturn", Palette::new(0xf7dc6f, 0xf4d03f, Stripe)),
    ("uranus", Palette::new(0x85c1e9, 0x3498db, Smooth)),
    ("neptune", Palette::new(0x3498db, 0x2874a6, Smooth)),
    ("pluto", Palette::new(0xbdc3c7, 0x95a5a6, Crater)),
    // Earth
    ("moon", Palette::new(0xd5d5d5, 0xa5a5a5, Crater)),
    // Mars
    ("phobos", Palette::new(0xa88d75, 0x806354, Crater)),
    ("deimos", Palette::new(0xbaa89c, 0x9c9080, Crater)),
    // Jupiter
    ("io", Palette::new(0xebc00d, 0xe57e25, Volcanic)),
    ("europa", Palette::new(0xd0c0b0, 0xb0a090, Cracked)),
    ("ganymede", Palette::new(0x9c8a7d, 0x7a6d62, Mixed)),
    ("callisto", Palette::new(0x6b5a4c, 0x504030, Crater)),
    // Saturn
    ("titan", Palette::new(0xe89c45, 0xc97c35, Haze)),
    ("enceladus", Palette::new(0xf0f0f0, 0xe0e0e0, Cracked)),
    ("mimas", Palette::new(0xdcdcdc, 0xb0b0b0, Crater)),
    ("iapetus", Palette::new(0xd0d0d0, 0x505050, Mixed)),
    ("rhea", Palette::new(0xd5d5d5, 0xb5b5b5, Crater)),
    // Uranus
    ("titania", Palette::new(0xa0a0a0, 0x707070, Crater)),
    ("oberon", Palette::new(0x909090, 0x606060, Crater)),
    ("umbriel", Palette::new(0x707070, 0x505050, Dark)),
    ("ariel", Palette::new(0xc0c0c0, 0x909090, Cracked)),
    ("miranda", Palette::new(0xb0b0b0, 0x808080, Mixed)),
    // Neptune
    ("triton", Palette::new(0xa0c0d0, 0x809aa8, Cracked)),
    ("proteus", Palette::new(0x808080, 0x606060, Dark)),
    ("nereid", Palette::new(0xa0a0a0, 0x707070, Mixed)),
];

/// Look up the palette for `name` (case-insensitive). `None` if the name is not in the table.
pub fn lookup(name: &str) -> Option<&'static Palette> {
    let key = name.trim().to_lowercase();
    PALETTES.iter().find(|(n, _)| *n == key).map(|(_, p)| p)
}

/// Palette for `name`, falling back to [`DEFAULT_PALETTE`].
pub fn palette_for(name: &str) -> &'static Palette {
    match lookup(name) {
        Some(p) => p,
        None => {
            log::debug!("Using generic texture for unknown object: {}", name);
            &DEFAULT_PALETTE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup("Io").map(|p| p.pattern), Some(Volcanic));
        assert_eq!(lookup("SATURN").map(|p| p.pattern), Some(Stripe));
    }

    #[test]
    fn unknown_names_get_default() {
        assert!(lookup("Vulcan").is_none());
        assert_eq!(*palette_for("Vulcan"), DEFAULT_PALETTE);
        assert_eq!(palette_for("").pattern, Mixed);
    }

    #[test]
    fn sun_has_no_dedicated_palette() {
        assert_eq!(*palette_for("Sun"), DEFAULT_PALETTE);
    }

    #[test]
    fn table_keys_are_unique_and_lowercase() {
        for (i, (a, _)) in PALETTES.iter().enumerate() {
            assert_eq!(*a, a.to_lowercase());
            for (b, _) in &PALETTES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
