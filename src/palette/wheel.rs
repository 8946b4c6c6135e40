//! Color-wheel arithmetic: HSB/HSL decomposition and hue rotations.

use rgb::RGBA;
use crate::RGBColor;

/// Rotate `hue` by `delta` degrees on the 360° wheel.  The result is
/// always in \[0, 360), whatever the signs of `hue` and `delta`.
#[inline]
pub(crate) fn rotate_hue(hue: f64, delta: f64) -> f64 {
    let h = (hue + delta.rem_euclid(360.)).rem_euclid(360.);
    // rem_euclid may round up to exactly 360 for tiny negatives.
    if h >= 360. { 0. } else { h }
}

/// Return `color` with its hue rotated by `delta` degrees, saturation,
/// brightness and alpha unchanged.
pub(crate) fn rotate<C: RGBColor>(color: &C, delta: f64) -> C {
    let rgba = color.to_rgba();
    let (h, s, b) = rgb_to_hsb(rgba);
    C::from_hsba(rotate_hue(h, delta), s, b, rgba.a)
}

/// Hue offsets of the two colors derived by each scheme.
pub(crate) const ANALOGOUS: [f64; 2] = [-30., 30.];
pub(crate) const COMPLEMENTARY: f64 = 180.;
pub(crate) const SPLIT_COMPLEMENTARY: [f64; 2] = [150., 210.];
pub(crate) const TRIADIC: [f64; 2] = [120., 240.];

/// Hue in \[0, 360), saturation and brightness in \[0, 100\].
pub(crate) fn rgb_to_hsb(c: RGBA<f64>) -> (f64, f64, f64) {
    let r = c.r / 255.;
    let g = c.g / 255.;
    let b = c.b / 255.;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let s = if max > 0. { 100. * delta / max } else { 0. };
    let h = {
        if delta <= 0. { 0. }
        else if max == r { 60. * ((g - b) / delta).rem_euclid(6.) }
        else if max == g { 60. * ((b - r) / delta + 2.) }
        else { 60. * ((r - g) / delta + 4.) } };
    (if h >= 360. { 0. } else { h }, s, 100. * max)
}

/// Inverse of [`rgb_to_hsb`]; returns channels in \[0, 255\].
pub(crate) fn hsb_to_rgb(h: f64, s: f64, b: f64) -> (f64, f64, f64) {
    let v = b.clamp(0., 100.) / 100.;
    let s = s.clamp(0., 100.) / 100.;
    let h = h.rem_euclid(360.) / 60.;
    let c = v * s;
    let x = c * (1. - (h.rem_euclid(2.) - 1.).abs());
    let m = v - c;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.),
        1 => (x, c, 0.),
        2 => (0., c, x),
        3 => (0., x, c),
        4 => (x, 0., c),
        _ => (c, 0., x),
    };
    (255. * (r + m), 255. * (g + m), 255. * (b + m))
}

/// HSL lightness in \[0, 100\].
pub(crate) fn lightness(c: RGBA<f64>) -> f64 {
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    50. * (max + min) / 255.
}

/// HSL saturation in \[0, 100\].
pub(crate) fn hsl_saturation(c: RGBA<f64>) -> f64 {
    let max = c.r.max(c.g).max(c.b) / 255.;
    let min = c.r.min(c.g).min(c.b) / 255.;
    let l = (max + min) / 2.;
    if max == min { 0. }
    else { 100. * (max - min) / (1. - (2. * l - 1.).abs()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_stays_on_the_wheel() {
        assert_eq!(rotate_hue(350., 30.), 20.);
        assert_eq!(rotate_hue(10., -30.), 340.);
        assert_eq!(rotate_hue(0., 360.), 0.);
        assert_eq!(rotate_hue(180., 180.), 0.);
        for h in [0., 45., 359.9] {
            for d in [-720., -30., 0., 150., 210., 1000.] {
                let r = rotate_hue(h, d);
                assert!((0. ..360.).contains(&r), "{h} + {d} -> {r}");
            }
        }
    }

    #[test]
    fn hsb_sectors() {
        for h in [0., 30., 90., 150., 210., 270., 330.] {
            let (r, g, b) = hsb_to_rgb(h, 100., 100.);
            let (h1, s1, b1) = rgb_to_hsb(RGBA { r, g, b, a: 255. });
            assert!((h - h1).abs() < 1e-9, "{h} ≉ {h1}");
            assert!((s1 - 100.).abs() < 1e-9);
            assert!((b1 - 100.).abs() < 1e-9);
        }
    }

    #[test]
    fn hsl() {
        let c = RGBA { r: 255., g: 0., b: 0., a: 255. };
        assert_eq!(lightness(c), 50.);
        assert_eq!(hsl_saturation(c), 100.);
        let w = RGBA { r: 255., g: 255., b: 255., a: 255. };
        assert_eq!(lightness(w), 100.);
        assert_eq!(hsl_saturation(w), 0.);
    }
}
