use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Used for any color name the palette does not know.
pub const DEFAULT_COLOR: Rgb = Rgb::new(0x97, 0xc2, 0xfc);

const PALETTE: [(&str, Rgb); 12] = [
    ("blue", DEFAULT_COLOR),
    ("red", Rgb::new(0xfb, 0x7e, 0x81)),
    ("green", Rgb::new(0x7b, 0xe1, 0x41)),
    ("yellow", Rgb::new(0xff, 0xff, 0x00)),
    ("orange", Rgb::new(0xff, 0xa8, 0x07)),
    ("purple", Rgb::new(0xad, 0x85, 0xe4)),
    ("pink", Rgb::new(0xeb, 0x7d, 0xf4)),
    ("cyan", Rgb::new(0x6e, 0x6e, 0xfd)),
    ("brown", Rgb::new(0xc3, 0x9b, 0x6e)),
    ("gray", Rgb::new(0xc2, 0xc2, 0xc2)),
    ("grey", Rgb::new(0xc2, 0xc2, 0xc2)),
    ("white", Rgb::new(0xff, 0xff, 0xff)),
];

const FALLBACK_SATURATION: f64 = 0.65;
const FALLBACK_LIGHTNESS: f64 = 0.50;

/// Display color for a color name reported by shape detection.
pub fn resolve_named(name: &str) -> Rgb {
    let name = name.trim();
    PALETTE
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, rgb)| *rgb)
        .unwrap_or(DEFAULT_COLOR)
}

/// Stable color derived from an identifier, for nodes without a detected color.
pub fn resolve_fallback(id: &str) -> Rgb {
    hsl_to_rgb(fallback_hue(id), FALLBACK_SATURATION, FALLBACK_LIGHTNESS)
}

/// Hue in whole degrees, hashed over UTF-16 code units.
fn fallback_hue(id: &str) -> u32 {
    if id.is_empty() {
        return 180;
    }
    id.encode_utf16()
        .fold(0u32, |hash, unit| (hash * 31 + u32::from(unit)) % 360)
}

fn hsl_to_rgb(hue: u32, s: f64, l: f64) -> Rgb {
    let h = f64::from(hue % 360) / 360.0;

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f64| (hue_to_rgb(p, q, t) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb {
        r: channel(h + 1.0 / 3.0),
        g: channel(h),
        b: channel(h - 1.0 / 3.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn named_colors_are_case_insensitive() {
        assert_eq!(resolve_named("Red"), Rgb::new(0xfb, 0x7e, 0x81));
        assert_eq!(resolve_named(" GREEN "), Rgb::new(0x7b, 0xe1, 0x41));
    }

    #[test]
    fn unknown_name_uses_default() {
        assert_eq!(resolve_named("chartreuse-ish"), DEFAULT_COLOR);
        assert_eq!(resolve_named(""), DEFAULT_COLOR);
    }

    #[test]
    fn rgb_displays_as_hex() {
        assert_eq!(DEFAULT_COLOR.to_string(), "#97c2fc");
        assert_eq!(Rgb::new(0, 10, 255).to_string(), "#000aff");
    }

    #[test]
    fn fallback_hue_hash() {
        // 'N' = 78, '1' = 49: (78 * 31 + 49) % 360 = 2467 % 360 = 307
        assert_eq!(fallback_hue("N1"), 307);
        assert_eq!(fallback_hue("N2"), 308);
        assert_eq!(fallback_hue(""), 180);
        assert_eq!(fallback_hue("A"), 65);
    }

    #[test]
    fn fallback_is_deterministic() {
        assert_eq!(resolve_fallback("N1"), resolve_fallback("N1"));
        assert_ne!(resolve_fallback("N1"), resolve_fallback("N2"));
    }

    #[test]
    fn fallback_empty_id_is_cyan_hue() {
        // hue 180, s 0.65, l 0.5 -> rgb(45, 210, 210)
        assert_eq!(resolve_fallback(""), Rgb::new(45, 210, 210));
    }

    #[test]
    fn hsl_primary_hues() {
        assert_eq!(hsl_to_rgb(0, 1.0, 0.5), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(120, 1.0, 0.5), Rgb::new(0, 255, 0));
        assert_eq!(hsl_to_rgb(240, 1.0, 0.5), Rgb::new(0, 0, 255));
    }
}
