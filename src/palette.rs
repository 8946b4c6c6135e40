//! Palettes: ordered collections of [`Swatch`]es with a cursor.

use std::{fmt, io::{self, Write}, str::FromStr};
use log::{debug, trace};
use rand::{seq::SliceRandom, Rng};
use rgb::{RGBA, RGBA8};
use crate::{error::PaletteError, ColorFormat, ColorRange, RGBColor};

mod swatch;
pub(crate) mod wheel;
pub use swatch::Swatch;
use swatch::check_weight;

/// An ordered collection of colors with a cursor.
///
/// The cursor designates the “current” color.  It is `None` exactly
/// when the palette is empty.  [`next`][Palette::next] honors the skip
/// flag of swatches, [`previous`][Palette::previous] does not.
///
/// Derivations ([`complementary`][Palette::complementary], …) return
/// new palettes; the `add_*_colors` methods rewrite the palette in
/// place.
///
/// A palette is not meant to be shared between threads while it is
/// being mutated; the sampling table is private to each instance.
#[derive(Clone, Debug)]
pub struct Palette<Color = RGBA8> {
    pub(crate) swatches: Vec<Swatch<Color>>,
    pub(crate) index: Option<usize>, // Invariant: None iff swatches is empty
    // Running totals of ⌈100 × weight⌉ over the swatches (saturating).
    // Empty when it has to be rebuilt.
    weighted: Vec<u64>,
}

impl<Color> Default for Palette<Color> {
    fn default() -> Self {
        Palette { swatches: Vec::new(), index: None, weighted: Vec::new() }
    }
}

impl<Color: PartialEq> PartialEq for Palette<Color> {
    fn eq(&self, other: &Self) -> bool {
        self.swatches == other.swatches && self.index == other.index
    }
}

impl<Color> From<Vec<Color>> for Palette<Color> {
    fn from(colors: Vec<Color>) -> Self { colors.into_iter().collect() }
}

impl<Color> FromIterator<Color> for Palette<Color> {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut p = Palette::new();
        p.extend(iter);
        p
    }
}

impl<Color> Extend<Color> for Palette<Color> {
    fn extend<I: IntoIterator<Item = Color>>(&mut self, iter: I) {
        self.swatches.extend(iter.into_iter().map(Swatch::new));
        self.after_insert();
    }
}

/// Parse a dash-delimited list of colors such as `"ff0000-00ff00"`.
/// The empty string gives an empty palette.
impl<Color: RGBColor> FromStr for Palette<Color> {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() { return Ok(Palette::new()) }
        s.split('-').map(Color::parse).collect()
    }
}

/// # Construction and access
impl<Color> Palette<Color> {
    /// An empty palette.
    pub fn new() -> Self { Self::default() }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize { self.swatches.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.swatches.is_empty() }

    /// The cursor position, `None` if the palette is empty.
    #[inline]
    pub fn index(&self) -> Option<usize> { self.index }

    /// Return the color at position `ix`.
    pub fn get(&self, ix: usize) -> Result<&Color, PaletteError> {
        self.swatches.get(ix).map(|s| &s.color)
            .ok_or(PaletteError::IndexOutOfRange { index: ix, len: self.len() })
    }

    /// The color under the cursor, `None` if the palette is empty.
    pub fn current(&self) -> Option<&Color> {
        self.index.map(|i| &self.swatches[i].color)
    }

    pub fn swatches(&self) -> &[Swatch<Color>] { &self.swatches }

    pub fn swatch(&self, ix: usize) -> Option<&Swatch<Color>> {
        self.swatches.get(ix)
    }

    /// Iterate over the colors in order.
    pub fn iter(&self) -> impl Iterator<Item = &Color> + '_ {
        self.swatches.iter().map(|s| &s.color)
    }
}

/// # Mutation
impl<Color> Palette<Color> {
    /// Append `color` with weight 1.
    pub fn add(&mut self, color: Color) -> &mut Self {
        self.add_swatch(Swatch::new(color))
    }

    /// Append a swatch, keeping its weight and skip flag.
    pub fn add_swatch(&mut self, swatch: Swatch<Color>) -> &mut Self {
        self.swatches.push(swatch);
        self.after_insert();
        self
    }

    /// Remove and return the swatch at position `ix`.  The cursor is
    /// moved back to the last swatch if it falls off the end.
    pub fn remove(&mut self, ix: usize) -> Result<Swatch<Color>, PaletteError> {
        if ix >= self.len() {
            return Err(PaletteError::IndexOutOfRange { index: ix,
                                                       len: self.len() })
        }
        let s = self.swatches.remove(ix);
        self.index = match self.index {
            _ if self.swatches.is_empty() => None,
            Some(i) if i >= self.swatches.len() => Some(self.swatches.len() - 1),
            i => i,
        };
        self.invalidate_distribution();
        Ok(s)
    }

    /// Remove all colors.
    pub fn clear(&mut self) -> &mut Self {
        self.swatches.clear();
        self.index = None;
        self.invalidate_distribution();
        self
    }

    /// Reverse the order of the colors.  The cursor keeps its numeric
    /// position, so it generally designates a different color afterwards.
    pub fn reverse(&mut self) -> &mut Self {
        self.swatches.reverse();
        self.invalidate_distribution();
        self
    }

    /// Randomly permute the colors with the thread-local generator.
    pub fn shuffle(&mut self) -> &mut Self {
        self.shuffle_with(&mut rand::thread_rng())
    }

    /// Randomly permute the colors (Fisher–Yates, so every permutation
    /// is equally likely).  The cursor keeps its numeric position.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        self.swatches.shuffle(rng);
        self.invalidate_distribution();
        self
    }

    /// Assign `weights[i]` to swatch `i` and rebuild the sampling table.
    ///
    /// Fails with [`PaletteError::InvalidWeights`] if there are not
    /// exactly [`len`][Palette::len] weights, and with
    /// [`PaletteError::InvalidArgument`] if one is not positive.  On
    /// failure no weight is changed.
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<&mut Self, PaletteError> {
        if weights.len() != self.len() {
            return Err(PaletteError::InvalidWeights { expected: self.len(),
                                                      got: weights.len() })
        }
        weights.iter().try_for_each(|&w| check_weight(w))?;
        for (s, &w) in self.swatches.iter_mut().zip(weights) {
            s.weight = w;
        }
        self.rebuild_distribution();
        Ok(self)
    }

    fn after_insert(&mut self) {
        if self.index.is_none() && !self.swatches.is_empty() {
            self.index = Some(0);
        }
        self.invalidate_distribution();
    }

    #[inline]
    fn invalidate_distribution(&mut self) { self.weighted.clear() }

    fn rebuild_distribution(&mut self) {
        let mut total = 0u64;
        self.weighted = self.swatches.iter()
            .map(|s| {
                // `as` saturates, huge weights cannot overflow the total.
                total = total.saturating_add((s.weight * 100.).ceil() as u64);
                total
            })
            .collect();
        trace!("weighted distribution rebuilt: total {} for {} swatches",
               total, self.swatches.len());
    }
}

/// # Cursor
impl<Color> Palette<Color> {
    /// Move the cursor to the first color (no effect on an empty palette).
    pub fn reset(&mut self) -> &mut Self {
        self.index = if self.is_empty() { None } else { Some(0) };
        self
    }

    /// Return the first color at or after the cursor that is not
    /// skipped and move the cursor just past it (wrapping around).
    ///
    /// Fails with [`PaletteError::AllSkipped`] if every swatch is
    /// skipped (calling `next` in that state is a logic error of the
    /// caller) and with [`PaletteError::Empty`] on an empty palette.
    pub fn next(&mut self) -> Result<&Color, PaletteError> {
        let len = self.len();
        let start = self.index.ok_or(PaletteError::Empty)?;
        let found = (0 .. len).map(|k| (start + k) % len)
            .find(|&i| !self.swatches[i].skip)
            .ok_or(PaletteError::AllSkipped)?;
        self.index = Some((found + 1) % len);
        Ok(&self.swatches[found].color)
    }

    /// Move the cursor one position back (wrapping around) and return
    /// the color there.  Skipped swatches are *not* passed over.
    pub fn previous(&mut self) -> Option<&Color> {
        let i = self.index?;
        let i = if i == 0 { self.len() - 1 } else { i - 1 };
        self.index = Some(i);
        Some(&self.swatches[i].color)
    }

    /// Put the cursor on `ix`; does nothing if `ix` is out of range.
    pub fn set(&mut self, ix: usize) -> &mut Self {
        if ix < self.len() { self.index = Some(ix) }
        self
    }

    /// Exclude swatch `ix` from [`next`][Palette::next].
    pub fn skip(&mut self, ix: usize) -> Result<&mut Self, PaletteError> {
        self.set_skip(ix, true)
    }

    pub fn unskip(&mut self, ix: usize) -> Result<&mut Self, PaletteError> {
        self.set_skip(ix, false)
    }

    pub fn unskip_all(&mut self) -> &mut Self {
        self.swatches.iter_mut().for_each(|s| s.skip = false);
        self
    }

    fn set_skip(&mut self, ix: usize, skip: bool) -> Result<&mut Self, PaletteError> {
        let s = self.swatches.get_mut(ix).ok_or(PaletteError::InvalidIndex(ix))?;
        s.skip = skip;
        Ok(self)
    }
}

/// # Random sampling
impl<Color> Palette<Color> {
    /// Pick a color at random with the thread-local generator.
    pub fn random(&mut self) -> Option<&Color> {
        self.random_with(&mut rand::thread_rng())
    }

    /// Pick a color at random, each swatch being chosen with a
    /// probability proportional to ⌈100 × weight⌉.  Weights are thus
    /// quantized to 1/100 and fractional parts are rounded up.
    /// Returns `None` on an empty palette.
    pub fn random_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&Color> {
        if self.is_empty() { return None }
        if self.weighted.is_empty() { self.rebuild_distribution() }
        let total = self.weighted.last().copied().unwrap_or(0);
        let k = rng.gen_range(0 .. total);
        let i = self.weighted.partition_point(|&c| c <= k);
        Some(&self.swatches[i].color)
    }
}

/// Options for [`Palette::gradient`].
#[derive(Clone, Debug)]
pub struct GradientOptions<Color> {
    /// Number of colors, `start` and `end` included.
    pub amount: usize,
    pub start: Color,
    pub end: Color,
}

impl<Color: RGBColor> Default for GradientOptions<Color> {
    fn default() -> Self {
        GradientOptions { amount: 5, start: Color::gray(0.),
                          end: Color::gray(255.) }
    }
}

/// Options for [`Palette::grayscale`].  Levels are in \[0, 255\].
#[derive(Clone, Copy, Debug)]
pub struct GrayscaleOptions {
    pub amount: usize,
    pub start: u8,
    pub end: u8,
}

impl Default for GrayscaleOptions {
    fn default() -> Self { GrayscaleOptions { amount: 5, start: 0, end: 255 } }
}

/// Options for [`Palette::to_string_with`].
#[derive(Clone, Debug)]
pub struct ToStringOptions {
    pub separator: String,
    pub format: ColorFormat,
}

impl Default for ToStringOptions {
    fn default() -> Self {
        ToStringOptions { separator: "-".to_string(), format: ColorFormat::Hex }
    }
}

/// # Colors
impl<Color> Palette<Color>
where Color: RGBColor + Clone {
    /// Append copies of all swatches of `other`, weights and skip
    /// flags included.
    pub fn add_palette(&mut self, other: &Palette<Color>) -> &mut Self {
        self.swatches.extend(other.swatches.iter().cloned());
        self.after_insert();
        self
    }

    /// A copy of the colors, in order.
    pub fn colors(&self) -> Vec<Color> { self.iter().cloned().collect() }

    /// A palette of `n` colors with uniformly random RGB channels.
    pub fn random_palette(n: usize) -> Self {
        Self::random_palette_with(n, &mut rand::thread_rng())
    }

    pub fn random_palette_with<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        (0 .. n).map(|_| {
            Color::from_rgba(RGBA { r: rng.gen_range(0. ..= 255.),
                                    g: rng.gen_range(0. ..= 255.),
                                    b: rng.gen_range(0. ..= 255.), a: 255. })
        }).collect()
    }

    /// `amount` colors going linearly from `start` to `end`.  Stops are
    /// taken every `1 / amount` and the last one is exactly `end`.
    ///
    /// ```
    /// use rgb::RGB8;
    /// use swatchbook::{GradientOptions, Palette};
    /// let p = Palette::gradient(&GradientOptions {
    ///     amount: 5, start: RGB8::new(0, 0, 0), end: RGB8::new(255, 255, 255) })?;
    /// assert_eq!(p.to_hex_string(), "000000-333333-666666-999999-ffffff");
    /// # Ok::<(), swatchbook::PaletteError>(())
    /// ```
    pub fn gradient(opts: &GradientOptions<Color>) -> Result<Self, PaletteError> {
        if opts.amount == 0 {
            return Err(PaletteError::invalid_value("amount", opts.amount))
        }
        let g = opts.start.gradient(&opts.end);
        let step = 1. / opts.amount as f64;
        let mut amt = 0.;
        let mut colors = Vec::with_capacity(opts.amount);
        for _ in 1 .. opts.amount {
            colors.push(g.rgb(amt));
            amt += step;
        }
        colors.push(opts.end.clone());
        Ok(colors.into())
    }

    /// A gradient between two gray levels.  `amount` must be in
    /// \[2, 255\].
    pub fn grayscale(opts: &GrayscaleOptions) -> Result<Self, PaletteError> {
        if opts.amount < 2 || opts.amount > 255 {
            return Err(PaletteError::invalid_value("amount", opts.amount))
        }
        Self::gradient(&GradientOptions { amount: opts.amount,
                                          start: Color::gray(opts.start as f64),
                                          end: Color::gray(opts.end as f64) })
    }

    /// Replace the palette by gradients of `amount` colors between each
    /// pair of consecutive colors (and from the last to the first one
    /// if `looping`).  The last stop of each gradient is dropped so that
    /// a color shared by two segments appears once.  Without
    /// `looping`, the final color of the palette is therefore lost.
    ///
    /// Palettes with less than two colors are left unchanged.  Fails
    /// with [`PaletteError::InvalidValue`] if `amount < 2`, in which
    /// case the palette is not modified either.
    pub fn insert_gradients(&mut self, amount: usize, looping: bool)
                            -> Result<&mut Self, PaletteError> {
        if amount < 2 {
            return Err(PaletteError::invalid_value("amount", amount))
        }
        let n = self.len();
        if n < 2 { return Ok(self) }
        let pairs = (0 .. n - 1).map(|i| (i, i + 1))
            .chain(looping.then_some((n - 1, 0)));
        let mut swatches = Vec::with_capacity(n * (amount - 1));
        for (a, b) in pairs {
            let mut segment = Self::gradient(&GradientOptions {
                amount,
                start: self.swatches[a].color.clone(),
                end: self.swatches[b].color.clone() })?;
            segment.swatches.pop();
            swatches.append(&mut segment.swatches);
        }
        debug!("insert_gradients: {} colors -> {} (amount {}, looping {})",
               n, swatches.len(), amount, looping);
        self.swatches = swatches;
        self.index = Some(0);
        self.invalidate_distribution();
        Ok(self)
    }

    /// The color at position `t` ∈ \[0, 1\] when the palette is seen as
    /// `len() - 1` segments of equal width, interpolating linearly (alpha
    /// included) inside a segment.  `t` below 0 gives the first color,
    /// above 1 the last.  Returns `None` on an empty palette.
    pub fn lerp(&self, t: f64) -> Option<Color> {
        let last = self.len().checked_sub(1)?;
        let x = if t.is_nan() { 0. } else { t * last as f64 };
        let i = x.floor();
        if i < 0. { return Some(self.swatches[0].color.clone()) }
        if i >= last as f64 { return Some(self.swatches[last].color.clone()) }
        let i = i as usize;
        let g = self.swatches[i].color.gradient(&self.swatches[i + 1].color);
        Some(g.rgb(x - i as f64))
    }

    /// Darken every color: brightness × 0.9.
    pub fn darken(&mut self) -> &mut Self {
        self.recolor(|h, s, b| (h, s, b * 0.9))
    }

    /// Lighten every color: saturation × 0.9, brightness × 1.1.
    pub fn lighten(&mut self) -> &mut Self {
        self.recolor(|h, s, b| (h, s * 0.9, b * 1.1))
    }

    fn recolor(&mut self, f: impl Fn(f64, f64, f64) -> (f64, f64, f64)) -> &mut Self {
        for s in &mut self.swatches {
            let rgba = s.color.to_rgba();
            let (h, sat, b) = wheel::rgb_to_hsb(rgba);
            let (h, sat, b) = f(h, sat, b);
            s.color = Color::from_hsba(h, sat, b, rgba.a);
        }
        self
    }
}

/// # Color wheel
impl<Color> Palette<Color>
where Color: RGBColor + Clone {
    /// One color per color of `self`, hue rotated by 180°.
    pub fn complementary(&self) -> Self {
        self.derive(&[wheel::COMPLEMENTARY])
    }

    /// Two colors per color of `self`, hue −30° then +30°.
    pub fn analogous(&self) -> Self { self.derive(&wheel::ANALOGOUS) }

    /// Two colors per color of `self`, hue +150° then +210°.
    pub fn split_complementary(&self) -> Self {
        self.derive(&wheel::SPLIT_COMPLEMENTARY)
    }

    /// Two colors per color of `self`, hue +120° then +240°.
    pub fn triadic(&self) -> Self { self.derive(&wheel::TRIADIC) }

    /// Replace each color `c` by `[c − 30°, c, c + 30°]`.
    pub fn add_analogous_colors(&mut self) -> &mut Self {
        self.surround(wheel::ANALOGOUS)
    }

    /// Replace each color `c` by `[c, c + 180°]`.
    pub fn add_complementary_colors(&mut self) -> &mut Self {
        let swatches = std::mem::take(&mut self.swatches);
        for s in swatches {
            let c = wheel::rotate(&s.color, wheel::COMPLEMENTARY);
            self.swatches.push(s);
            self.swatches.push(Swatch::new(c));
        }
        self.after_rewrite("complementary")
    }

    /// Replace each color `c` by `[c + 150°, c, c + 210°]`.
    pub fn add_split_complementary_colors(&mut self) -> &mut Self {
        self.surround(wheel::SPLIT_COMPLEMENTARY)
    }

    /// Replace each color `c` by `[c + 120°, c, c + 240°]`.
    pub fn add_triadic_colors(&mut self) -> &mut Self {
        self.surround(wheel::TRIADIC)
    }

    fn derive(&self, deltas: &[f64]) -> Self {
        self.iter()
            .flat_map(|c| deltas.iter().map(move |&d| wheel::rotate(c, d)))
            .collect()
    }

    fn surround(&mut self, [before, after]: [f64; 2]) -> &mut Self {
        let swatches = std::mem::take(&mut self.swatches);
        for s in swatches {
            let b = wheel::rotate(&s.color, before);
            let a = wheel::rotate(&s.color, after);
            self.swatches.push(Swatch::new(b));
            self.swatches.push(s);
            self.swatches.push(Swatch::new(a));
        }
        self.after_rewrite("derived")
    }

    fn after_rewrite(&mut self, what: &str) -> &mut Self {
        debug!("added {} colors, palette now has {}", what, self.len());
        self.invalidate_distribution();
        self
    }
}

/// # Sorting
impl<Color: RGBColor> Palette<Color> {
    /// Stable sort by increasing HSB brightness.
    pub fn sort_by_brightness(&mut self) -> &mut Self {
        self.sort_by_channel(Color::brightness)
    }

    /// Stable sort by increasing HSL lightness.
    pub fn sort_by_lightness(&mut self) -> &mut Self {
        self.sort_by_channel(Color::lightness)
    }

    /// Stable sort by increasing HSB saturation.
    pub fn sort_by_saturation(&mut self) -> &mut Self {
        self.sort_by_channel(Color::saturation)
    }

    fn sort_by_channel(&mut self, channel: impl Fn(&Color) -> f64) -> &mut Self {
        self.swatches.sort_by(|a, b| channel(&a.color).total_cmp(&channel(&b.color)));
        self.invalidate_distribution();
        self
    }
}

/// # Text
impl<Color: RGBColor> Palette<Color> {
    /// Colors rendered with `opts.format`, joined with `opts.separator`.
    pub fn to_string_with(&self, opts: &ToStringOptions) -> String {
        self.iter().map(|c| c.format(opts.format))
            .collect::<Vec<_>>()
            .join(&opts.separator)
    }

    /// Dash-separated `rrggbb` codes; parses back with
    /// [`str::parse`].
    pub fn to_hex_string(&self) -> String {
        self.to_string().replace('#', "")
    }

    /// Dump the palette to standard output as colored blocks followed
    /// by the hexadecimal codes.
    pub fn log(&self, horizontal: bool) -> io::Result<()> {
        self.write_log(&mut io::stdout().lock(), horizontal)
    }

    /// Write the colors with 24-bit ANSI escapes, on one line if
    /// `horizontal`, one color per line otherwise.
    pub fn write_log(&self, w: &mut impl Write, horizontal: bool) -> io::Result<()> {
        let hex: Vec<_> = self.iter().map(|c| c.format(ColorFormat::Hex)).collect();
        let rgb = |c: &Color| {
            let c = c.to_rgba();
            (c.r.round() as u8, c.g.round() as u8, c.b.round() as u8)
        };
        if horizontal {
            for c in self.iter() {
                let (r, g, b) = rgb(c);
                write!(w, "\x1b[38;2;{r};{g};{b}m■\x1b[0m ")?;
            }
            writeln!(w)?;
            writeln!(w, "{}", hex.join(" "))?;
        } else {
            for (c, hex) in self.iter().zip(&hex) {
                let (r, g, b) = rgb(c);
                writeln!(w, "\x1b[48;2;{r};{g};{b}m    \x1b[0m {hex}")?;
            }
        }
        Ok(())
    }
}

impl<Color: RGBColor> fmt::Display for Palette<Color> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(&ToStringOptions::default()))
    }
}
