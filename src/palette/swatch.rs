use crate::error::PaletteError;

/// One color of a [`Palette`][crate::Palette] together with its weight
/// for random selection and a flag excluding it from cursor iteration.
///
/// Colors are owned values, so cloning a swatch never shares its color
/// with the source swatch.
#[derive(Clone, Debug, PartialEq)]
pub struct Swatch<Color> {
    pub(crate) color: Color,
    pub(crate) weight: f64, // Invariant: finite and > 0
    pub(crate) skip: bool,
}

impl<Color> Swatch<Color> {
    /// A swatch with weight 1, not skipped.
    pub fn new(color: Color) -> Self {
        Swatch { color, weight: 1., skip: false }
    }

    /// A swatch with the given `weight` and `skip` flag.  Fails with
    /// [`PaletteError::InvalidArgument`] unless `weight` is a positive
    /// finite number.
    pub fn with_weight(color: Color, weight: f64, skip: bool)
                       -> Result<Self, PaletteError> {
        check_weight(weight)?;
        Ok(Swatch { color, weight, skip })
    }

    #[inline]
    pub fn color(&self) -> &Color { &self.color }

    #[inline]
    pub fn weight(&self) -> f64 { self.weight }

    /// Whether [`Palette::next`][crate::Palette::next] passes over this
    /// swatch.
    #[inline]
    pub fn is_skipped(&self) -> bool { self.skip }

    pub fn into_color(self) -> Color { self.color }
}

pub(crate) fn check_weight(weight: f64) -> Result<(), PaletteError> {
    if weight > 0. && weight.is_finite() { Ok(()) }
    else {
        Err(PaletteError::InvalidArgument(
            format!("a swatch weight must be positive, got {weight}")))
    }
}
