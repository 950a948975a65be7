use eframe::egui::Color32;
use palette::Srgb;

// ---------------------------------------------------------------------------
// Qualitative palettes
// ---------------------------------------------------------------------------

/// 8-bit sRGB colour used throughout the chart specs.
pub type Rgb8 = Srgb<u8>;

/// Named discrete colour sequences for categorical series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualitative {
    /// Plotly's default trace colours.
    Plotly,
    /// ColorBrewer Set1.
    Set1,
    /// ColorBrewer Set2.
    Set2,
}

const PLOTLY: [Rgb8; 10] = [
    Srgb::new(0x63, 0x6e, 0xfa),
    Srgb::new(0xef, 0x55, 0x3b),
    Srgb::new(0x00, 0xcc, 0x96),
    Srgb::new(0xab, 0x63, 0xfa),
    Srgb::new(0xff, 0xa1, 0x5a),
    Srgb::new(0x19, 0xd3, 0xf3),
    Srgb::new(0xff, 0x66, 0x92),
    Srgb::new(0xb6, 0xe8, 0x80),
    Srgb::new(0xff, 0x97, 0xff),
    Srgb::new(0xfe, 0xcb, 0x52),
];

const SET1: [Rgb8; 9] = [
    Srgb::new(228, 26, 28),
    Srgb::new(55, 126, 184),
    Srgb::new(77, 175, 74),
    Srgb::new(152, 78, 163),
    Srgb::new(255, 127, 0),
    Srgb::new(255, 255, 51),
    Srgb::new(166, 86, 40),
    Srgb::new(247, 129, 191),
    Srgb::new(153, 153, 153),
];

const SET2: [Rgb8; 8] = [
    Srgb::new(102, 194, 165),
    Srgb::new(252, 141, 98),
    Srgb::new(141, 160, 203),
    Srgb::new(231, 138, 195),
    Srgb::new(166, 216, 84),
    Srgb::new(255, 217, 47),
    Srgb::new(229, 196, 148),
    Srgb::new(179, 179, 179),
];

impl Qualitative {
    pub fn colors(self) -> &'static [Rgb8] {
        match self {
            Qualitative::Plotly => &PLOTLY,
            Qualitative::Set1 => &SET1,
            Qualitative::Set2 => &SET2,
        }
    }

    /// Colour of the `i`-th category; the sequence wraps around.
    pub fn nth(self, i: usize) -> Rgb8 {
        let colors = self.colors();
        colors[i % colors.len()]
    }
}

/// Look up a CSS colour keyword such as `"red"` or `"green"`.
pub fn named(name: &str) -> Option<Rgb8> {
    palette::named::from_str(name)
}

pub fn to_color32(c: Rgb8) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

/// Serialise as `#rrggbb` for exported chart specs.
pub fn to_hex(c: Rgb8) -> String {
    format!("#{:x}", c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_wrap_around() {
        assert_eq!(Qualitative::Set2.nth(0), Qualitative::Set2.nth(8));
        assert_ne!(Qualitative::Set2.nth(0), Qualitative::Set2.nth(1));
        assert_eq!(Qualitative::Plotly.nth(10), Qualitative::Plotly.nth(0));
    }

    #[test]
    fn css_keywords_resolve() {
        assert_eq!(named("red"), Some(Srgb::new(255, 0, 0)));
        assert_eq!(named("green"), Some(Srgb::new(0, 128, 0)));
        assert_eq!(named("not-a-colour"), None);
    }

    #[test]
    fn hex_is_lowercase_with_hash() {
        assert_eq!(to_hex(Qualitative::Plotly.nth(0)), "#636efa");
        assert_eq!(to_color32(Srgb::new(1, 2, 3)), Color32::from_rgb(1, 2, 3));
    }
}
