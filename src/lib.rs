//! Color palettes for creative coding.
//!
//! - [`Palette`]: an ordered collection of [`Swatch`]es with a cursor,
//!   color-wheel derivations, weighted random sampling, sorting,
//!   gradients and rendering on a [`Canvas`].
//! - [`RGBColor`]: the color service the palette relies on, implemented
//!   for the [`rgb`] crate types.
//! - [`store`]: persistence of palettes in a [`KeyValueStore`].
//! - [`remote`]: loaders for online palette services.
//!
//! ```
//! use swatchbook::Palette;
//! let mut p: Palette = "aa1100-00bb22".parse()?;
//! p.add_complementary_colors();
//! assert_eq!(p.len(), 4);
//! assert_eq!(p.to_hex_string(), "aa1100-0099aa-00bb22-bb0099");
//! # Ok::<(), swatchbook::PaletteError>(())
//! ```

use std::marker::PhantomData;
use rgb::{RGBA, RGB8, RGB16, RGBA8, RGBA16};

mod error;
mod parse;
mod palette;
pub mod draw;
pub mod store;
pub mod remote;

pub use error::{FetchError, PaletteError};
pub use parse::{parse_color, ColorFormat};
pub use palette::{GradientOptions, GrayscaleOptions, Palette, Swatch,
                  ToStringOptions};
pub use draw::{Canvas, DrawOptions, TextAlign};
pub use store::{KeyValueStore, MemoryStore};

use palette::wheel;

/// A “continuous” range of colors parametrized by reals in \[0, 1\].
pub trait ColorRange<Color> {
    /// Returns the color corresponding to `t` ∈ \[0., 1.\].
    fn rgb(&self, t: f64) -> Color;
}

/// Specifies the methods a RGB color encoding must provide.
///
/// Only [`to_rgba`][RGBColor::to_rgba] and
/// [`from_rgba`][RGBColor::from_rgba] are required; hue, saturation,
/// brightness and lightness are derived from them.
pub trait RGBColor: Sized {
    /// Return the red, green, blue and alpha components of the color
    /// (in \[0, 255\]).
    fn to_rgba(&self) -> RGBA<f64>;

    /// Create a color from its RGBA components (in \[0, 255\]).
    fn from_rgba(rgba: RGBA<f64>) -> Self;

    /// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` (the `#` is
    /// optional) or a CSS color name.
    ///
    /// ```
    /// use rgb::RGB8;
    /// use swatchbook::RGBColor;
    /// assert_eq!(RGB8::parse("#ff8000")?, RGB8::new(255, 128, 0));
    /// assert_eq!(RGB8::parse("teal")?, RGB8::new(0, 128, 128));
    /// # Ok::<(), swatchbook::PaletteError>(())
    /// ```
    fn parse(s: &str) -> Result<Self, PaletteError> {
        parse::parse_color(s).map(Self::from_rgba)
    }

    /// An opaque gray with all channels equal to `level` ∈ \[0, 255\].
    fn gray(level: f64) -> Self {
        let x = level.clamp(0., 255.);
        Self::from_rgba(RGBA { r: x, g: x, b: x, a: 255. })
    }

    /// Create a color from hue (degrees, any value, taken modulo 360),
    /// saturation and brightness (in \[0, 100\], clamped) and alpha
    /// (in \[0, 255\]).
    fn from_hsba(h: f64, s: f64, b: f64, a: f64) -> Self {
        let (r, g, bl) = wheel::hsb_to_rgb(h, s, b);
        Self::from_rgba(RGBA { r, g, b: bl, a })
    }

    /// Hue in \[0, 360).  Grays have hue 0.
    #[inline]
    fn hue(&self) -> f64 { wheel::rgb_to_hsb(self.to_rgba()).0 }

    /// HSB saturation in \[0, 100\].
    #[inline]
    fn saturation(&self) -> f64 { wheel::rgb_to_hsb(self.to_rgba()).1 }

    /// HSB brightness (value) in \[0, 100\].
    #[inline]
    fn brightness(&self) -> f64 { wheel::rgb_to_hsb(self.to_rgba()).2 }

    /// HSL lightness in \[0, 100\].
    #[inline]
    fn lightness(&self) -> f64 { wheel::lightness(self.to_rgba()) }

    /// Return a linear RGBA gradient from color `self` to color `c1`.
    ///
    /// # Example
    ///
    /// ```
    /// use rgb::RGB8;
    /// use swatchbook::{RGBColor, ColorRange};
    /// let red = RGB8::new(255, 0, 0);
    /// let blue = RGB8::new(0, 0, 255);
    /// let grad = red.gradient(&blue);
    /// assert_eq!(grad.rgb(0.5), RGB8::new(128, 0, 128));
    /// ```
    fn gradient(&self, c1: &Self) -> Gradient<Self> {
        let c0 = self.to_rgba();
        let c1 = c1.to_rgba();
        Gradient { c0,
                   dc: RGBA { r: c1.r - c0.r, g: c1.g - c0.g,
                              b: c1.b - c0.b, a: c1.a - c0.a },
                   color: PhantomData }
    }

    /// Render the color as a string, e.g. `#rrggbb` or `hsl(…)`.
    fn format(&self, format: ColorFormat) -> String {
        format.render(self.to_rgba())
    }

}

/// Channel conversion for integer color types: round to nearest,
/// saturate at the bounds (NaN gives 0).
macro_rules! round_to { ($t: ty, $x: expr) => { ($x).round() as $t } }

impl RGBColor for RGBA<f64> {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> { *self }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self { c }
}

impl RGBColor for RGB8 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA{ r: self.r as f64, g: self.g as f64, b: self.b as f64, a: 255. }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGB8 { r: round_to!(u8, c.r), g: round_to!(u8, c.g),
               b: round_to!(u8, c.b) }
    }
}

impl RGBColor for RGB16 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA{ r: self.r as f64, g: self.g as f64, b: self.b as f64, a: 255. }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGB16 { r: round_to!(u16, c.r), g: round_to!(u16, c.g),
                b: round_to!(u16, c.b) }
    }
}

impl RGBColor for RGBA8 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA{ r: self.r as f64, g: self.g as f64, b: self.b as f64,
              a: self.a as f64 }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGBA8 { r: round_to!(u8, c.r), g: round_to!(u8, c.g),
                b: round_to!(u8, c.b), a: round_to!(u8, c.a) }
    }
}

impl RGBColor for RGBA16 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA{ r: self.r as f64, g: self.g as f64, b: self.b as f64,
              a: self.a as f64 }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGBA16 { r: round_to!(u16, c.r), g: round_to!(u16, c.g),
                 b: round_to!(u16, c.b), a: round_to!(u16, c.a) }
    }
}


/// Linear gradient between two colors, channel by channel (alpha
/// included).
///
/// Created by [`RGBColor::gradient`].  See the [`ColorRange`] trait
/// for methods.
#[derive(Clone, Copy, Debug)]
pub struct Gradient<Color> {
    c0: RGBA<f64>, // first color
    dc: RGBA<f64>, // last - first color
    color: PhantomData<Color>,
}

impl<Color> Gradient<Color>
where Color: RGBColor {
    /// Returns the color corresponding to `t` but does not check that
    /// `t` ∈ \[0, 1\].
    #[inline]
    fn rgb_unchecked(&self, t: f64) -> Color {
        Color::from_rgba(RGBA { r: self.c0.r + t * self.dc.r,
                                g: self.c0.g + t * self.dc.g,
                                b: self.c0.b + t * self.dc.b,
                                a: self.c0.a + t * self.dc.a })
    }
}

impl<Color> ColorRange<Color> for Gradient<Color>
where Color: RGBColor {
    /// Returns the color corresponding to `t` ∈ \[0., 1.\], where
    /// `t == 0.` returns the first color provided in the gradient and
    /// `t == 1.` the second.
    fn rgb(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0. } else { t.clamp(0., 1.) };
        self.rgb_unchecked(t)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsb_of_primaries() {
        let red = RGB8::new(255, 0, 0);
        assert_eq!(red.hue(), 0.);
        assert_eq!(red.saturation(), 100.);
        assert_eq!(red.brightness(), 100.);
        assert_eq!(red.lightness(), 50.);
        let blue = RGB8::new(0, 0, 255);
        assert_eq!(blue.hue(), 240.);
        let gray = RGB8::new(128, 128, 128);
        assert_eq!(gray.hue(), 0.);
        assert_eq!(gray.saturation(), 0.);
    }

    #[test]
    fn hsb_round_trip() {
        for c in [RGB8::new(12, 200, 99), RGB8::new(250, 3, 170),
                  RGB8::new(1, 2, 3), RGB8::new(255, 255, 0)] {
            let d = RGB8::from_hsba(c.hue(), c.saturation(), c.brightness(),
                                    255.);
            assert_eq!(c, d);
        }
    }

    #[test]
    fn integer_channels_round_and_saturate() {
        let c = RGBA8::from_rgba(RGBA { r: 127.5, g: -3., b: 300., a: 254.6 });
        assert_eq!(c, RGBA8::new(128, 0, 255, 255));
    }

    #[test]
    fn gradient_bounds() {
        let c0 = RGBA8::new(0, 0, 0, 0);
        let c1 = RGBA8::new(255, 255, 255, 255);
        let g = c0.gradient(&c1);
        assert_eq!(g.rgb(0.), c0);
        assert_eq!(g.rgb(1.), c1);
        assert_eq!(g.rgb(-1.), c0);
        assert_eq!(g.rgb(2.), c1);
        assert_eq!(g.rgb(0.5), RGBA8::new(128, 128, 128, 128));
    }
}
