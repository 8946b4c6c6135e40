//! Reading colors from strings and writing them back.

use std::collections::HashMap;
use lazy_static::lazy_static;
use rgb::RGBA;
use crate::{error::PaletteError, palette::wheel};

lazy_static! {
    /// CSS named colors.
    static ref NAMED: HashMap<&'static str, [u8; 3]> = {
        [("black", [0, 0, 0]), ("silver", [192, 192, 192]),
         ("gray", [128, 128, 128]), ("grey", [128, 128, 128]),
         ("white", [255, 255, 255]), ("maroon", [128, 0, 0]),
         ("red", [255, 0, 0]), ("purple", [128, 0, 128]),
         ("fuchsia", [255, 0, 255]), ("magenta", [255, 0, 255]),
         ("green", [0, 128, 0]), ("lime", [0, 255, 0]),
         ("olive", [128, 128, 0]), ("yellow", [255, 255, 0]),
         ("navy", [0, 0, 128]), ("blue", [0, 0, 255]),
         ("teal", [0, 128, 128]), ("aqua", [0, 255, 255]),
         ("cyan", [0, 255, 255]), ("orange", [255, 165, 0]),
         ("brown", [165, 42, 42]), ("pink", [255, 192, 203]),
         ("gold", [255, 215, 0]), ("indigo", [75, 0, 130]),
         ("violet", [238, 130, 238]), ("coral", [255, 127, 80]),
         ("salmon", [250, 128, 114]), ("khaki", [240, 230, 140]),
         ("crimson", [220, 20, 60]), ("turquoise", [64, 224, 208]),
         ("tomato", [255, 99, 71]), ("orchid", [218, 112, 214]),
         ("tan", [210, 180, 140]), ("beige", [245, 245, 220]),
         ("ivory", [255, 255, 240]), ("lavender", [230, 230, 250]),
         ("chocolate", [210, 105, 30]), ("plum", [221, 160, 221]),
        ].into_iter().collect()
    };
}

/// Parse a color written `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`
/// (the leading `#` may be omitted) or given by its CSS name.
/// Channels are returned in \[0, 255\].
pub fn parse_color(s: &str) -> Result<RGBA<f64>, PaletteError> {
    let s = s.trim();
    let name = s.to_ascii_lowercase();
    if let Some(&[r, g, b]) = NAMED.get(name.as_str()) {
        return Ok(RGBA { r: r as f64, g: g as f64, b: b as f64, a: 255. })
    }
    let hex = s.strip_prefix('#').unwrap_or(s);
    let invalid = || PaletteError::InvalidColor(s.to_string());
    if !hex.bytes().all(|c| c.is_ascii_hexdigit()) { return Err(invalid()) }
    let digit = |i: usize| u8::from_str_radix(&hex[i .. i + 1], 16)
        .map(|d| (d * 17) as f64);
    let pair = |i: usize| u8::from_str_radix(&hex[i .. i + 2], 16)
        .map(|d| d as f64);
    let rgba = match hex.len() {
        3 | 4 => {
            let a = if hex.len() == 4 { digit(3) } else { Ok(255.) };
            (digit(0), digit(1), digit(2), a)
        }
        6 | 8 => {
            let a = if hex.len() == 8 { pair(6) } else { Ok(255.) };
            (pair(0), pair(2), pair(4), a)
        }
        _ => return Err(invalid()),
    };
    match rgba {
        (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(RGBA { r, g, b, a }),
        _ => Err(invalid()),
    }
}

/// String renderings of a color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorFormat {
    /// `#rrggbb`
    #[default]
    Hex,
    /// `#rrggbbaa`
    HexAlpha,
    /// `#rgb` (each channel reduced to one hex digit)
    ShortHex,
    /// `rgb(r,g,b)` with integer channels.
    Rgb,
    /// `rgba(r,g,b,a)` with `a` ∈ \[0, 1\].
    Rgba,
    /// `rgb(r%,g%,b%)`
    RgbPercent,
    /// `hsl(h,s%,l%)`
    Hsl,
    /// `hsb(h,s%,b%)`
    Hsb,
}

fn byte(x: f64) -> u8 { x.round() as u8 }

fn percent(x: f64) -> String {
    let p = (x * 100.).round() / 100.;
    format!("{p}%")
}

impl ColorFormat {
    pub(crate) fn render(self, c: RGBA<f64>) -> String {
        let (r, g, b, a) = (byte(c.r), byte(c.g), byte(c.b), byte(c.a));
        match self {
            ColorFormat::Hex => format!("#{r:02x}{g:02x}{b:02x}"),
            ColorFormat::HexAlpha => format!("#{r:02x}{g:02x}{b:02x}{a:02x}"),
            ColorFormat::ShortHex => {
                let d = |x: u8| ((x as f64) / 17.).round() as u8;
                format!("#{:x}{:x}{:x}", d(r), d(g), d(b))
            }
            ColorFormat::Rgb => format!("rgb({r},{g},{b})"),
            ColorFormat::Rgba => {
                let alpha = (a as f64 / 255. * 100.).round() / 100.;
                format!("rgba({r},{g},{b},{alpha})")
            }
            ColorFormat::RgbPercent => {
                format!("rgb({},{},{})", percent(c.r / 2.55),
                        percent(c.g / 2.55), percent(c.b / 2.55))
            }
            ColorFormat::Hsl => {
                let (h, _, _) = wheel::rgb_to_hsb(c);
                format!("hsl({},{},{})", h.round(),
                        percent(wheel::hsl_saturation(c)),
                        percent(wheel::lightness(c)))
            }
            ColorFormat::Hsb => {
                let (h, s, v) = wheel::rgb_to_hsb(c);
                format!("hsb({},{},{})", h.round(), percent(s), percent(v))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        let c = parse_color("#aa1100").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (170., 17., 0., 255.));
        assert_eq!(parse_color("aa1100").unwrap(), c);
        assert_eq!(parse_color("#a10").unwrap(), c);
        let c = parse_color("00ff0080").unwrap();
        assert_eq!(c.a, 128.);
        assert_eq!(parse_color("#fff8").unwrap().a, 136.);
    }

    #[test]
    fn names() {
        let c = parse_color("Orange").unwrap();
        assert_eq!((c.r, c.g, c.b), (255., 165., 0.));
    }

    #[test]
    fn rejects_garbage() {
        for s in ["", "#", "ff00f", "gg0000", "#12345", "+12345", "ab cd"] {
            assert_eq!(parse_color(s),
                       Err(PaletteError::InvalidColor(s.trim().to_string())),
                       "{s:?}");
        }
    }

    #[test]
    fn formats() {
        let c = RGBA { r: 255., g: 0., b: 0., a: 255. };
        assert_eq!(ColorFormat::Hex.render(c), "#ff0000");
        assert_eq!(ColorFormat::HexAlpha.render(c), "#ff0000ff");
        assert_eq!(ColorFormat::ShortHex.render(c), "#f00");
        assert_eq!(ColorFormat::Rgb.render(c), "rgb(255,0,0)");
        assert_eq!(ColorFormat::Rgba.render(c), "rgba(255,0,0,1)");
        assert_eq!(ColorFormat::RgbPercent.render(c), "rgb(100%,0%,0%)");
        assert_eq!(ColorFormat::Hsl.render(c), "hsl(0,100%,50%)");
        assert_eq!(ColorFormat::Hsb.render(c), "hsb(0,100%,100%)");
    }
}
