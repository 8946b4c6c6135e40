//! Drawing palettes as rows (or columns) of swatches.
//!
//! The actual pixels are produced by the host through the [`Canvas`]
//! trait; this module only decides what goes where.

use rgb::RGBA8;
use crate::{Palette, RGBColor};

/// Horizontal and vertical text alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign { Left, Center, Right }

/// Drawing primitives provided by the host environment.
///
/// Fill and stroke state persist between calls until changed, and are
/// saved and restored by [`push`][Canvas::push] / [`pop`][Canvas::pop].
pub trait Canvas {
    fn push(&mut self);
    fn pop(&mut self);
    fn fill(&mut self, color: RGBA8);
    fn no_fill(&mut self);
    fn stroke(&mut self, color: RGBA8);
    fn no_stroke(&mut self);
    fn stroke_weight(&mut self, weight: f64);
    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn circle(&mut self, x: f64, y: f64, diameter: f64);
    fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64);
    fn text_align(&mut self, horizontal: TextAlign, vertical: TextAlign);
    fn text_size(&mut self, size: f64);
    /// Width of `text` at the current text size.
    fn text_width(&self, text: &str) -> f64;
    fn text(&mut self, text: &str, x: f64, y: f64);
}

/// Layout and decorations for [`Palette::draw`].
#[derive(Clone, Debug)]
pub struct DrawOptions {
    /// Position of the first swatch.
    pub x: f64,
    pub y: f64,
    /// Size of each swatch.
    pub width: f64,
    pub height: f64,
    /// Gap between two swatches.
    pub offset: f64,
    /// Stack swatches top to bottom instead of left to right.
    pub vertical: bool,
    pub draw_border: bool,
    pub border_color: RGBA8,
    pub border_weight: f64,
    /// Write the index of each swatch in its center.
    pub show_index: bool,
    /// Circle the index of the current swatch (needs `show_index`).
    pub show_cursor: bool,
    /// Cross out skipped swatches.
    pub show_skipped: bool,
    pub font_size: f64,
}

impl Default for DrawOptions {
    fn default() -> Self {
        DrawOptions {
            x: 0., y: 0., width: 50., height: 50., offset: 0.,
            vertical: false,
            draw_border: false,
            border_color: RGBA8::new(0, 0, 0, 255),
            border_weight: 1.,
            show_index: false,
            show_cursor: false,
            show_skipped: false,
            font_size: 12.,
        }
    }
}

const BLACK: RGBA8 = RGBA8 { r: 0, g: 0, b: 0, a: 255 };
const WHITE: RGBA8 = RGBA8 { r: 255, g: 255, b: 255, a: 255 };

impl<Color: RGBColor> Palette<Color> {
    /// Draw one rectangle per color, each one `width + offset` (or
    /// `height + offset` if vertical) after the previous one.
    pub fn draw(&self, canvas: &mut impl Canvas, opts: &DrawOptions) -> &Self {
        canvas.push();
        canvas.no_stroke();
        let (mut x, mut y) = (opts.x, opts.y);
        let (w, h) = (opts.width, opts.height);
        for (i, s) in self.swatches.iter().enumerate() {
            if opts.draw_border {
                canvas.no_fill();
                canvas.stroke(opts.border_color);
                canvas.stroke_weight(opts.border_weight);
                canvas.rect(x, y, w, h);
            }
            canvas.no_stroke();
            canvas.fill(RGBA8::from_rgba(s.color.to_rgba()));
            canvas.rect(x, y, w, h);

            if opts.show_index {
                let ink = if s.color.brightness() > 50. { BLACK } else { WHITE };
                canvas.fill(ink);
                canvas.stroke(ink);
                canvas.stroke_weight(1.);
                canvas.text_align(TextAlign::Center, TextAlign::Center);
                canvas.text_size(opts.font_size);
                let (cx, cy) = (x + w / 2., y + h / 2.);
                let label = i.to_string();
                canvas.text(&label, cx, cy);
                if opts.show_cursor && self.index == Some(i) {
                    let d = canvas.text_width(&label).max(opts.font_size);
                    canvas.no_fill();
                    canvas.circle(cx, cy, 1.5 * d);
                }
            }

            if opts.show_skipped && s.skip {
                canvas.line(x, y, x + w, y + h);
                canvas.line(x + w, y, x, y + h);
            }

            if opts.vertical { y += h + opts.offset } else { x += w + opts.offset }
        }
        canvas.pop();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Op {
        Rect(f64, f64, f64, f64),
        Fill(RGBA8),
        Circle(f64, f64, f64),
        Line,
        Text(String),
        Push,
        Pop,
        Other,
    }

    #[derive(Default)]
    struct Recorder(Vec<Op>);

    impl Canvas for Recorder {
        fn push(&mut self) { self.0.push(Op::Push) }
        fn pop(&mut self) { self.0.push(Op::Pop) }
        fn fill(&mut self, c: RGBA8) { self.0.push(Op::Fill(c)) }
        fn no_fill(&mut self) { self.0.push(Op::Other) }
        fn stroke(&mut self, _: RGBA8) { self.0.push(Op::Other) }
        fn no_stroke(&mut self) { self.0.push(Op::Other) }
        fn stroke_weight(&mut self, _: f64) { self.0.push(Op::Other) }
        fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
            self.0.push(Op::Rect(x, y, w, h))
        }
        fn circle(&mut self, x: f64, y: f64, d: f64) {
            self.0.push(Op::Circle(x, y, d))
        }
        fn line(&mut self, _: f64, _: f64, _: f64, _: f64) { self.0.push(Op::Line) }
        fn text_align(&mut self, _: TextAlign, _: TextAlign) { self.0.push(Op::Other) }
        fn text_size(&mut self, _: f64) { self.0.push(Op::Other) }
        fn text_width(&self, text: &str) -> f64 { 6. * text.len() as f64 }
        fn text(&mut self, t: &str, _: f64, _: f64) { self.0.push(Op::Text(t.into())) }
    }

    impl Recorder {
        fn rects(&self) -> Vec<&Op> {
            self.0.iter().filter(|o| matches!(o, Op::Rect(..))).collect()
        }
    }

    fn pal() -> Palette { "ff0000-00ff00-0000ff".parse().unwrap() }

    #[test]
    fn horizontal_layout() {
        let mut c = Recorder::default();
        pal().draw(&mut c, &DrawOptions { x: 10., offset: 5., ..Default::default() });
        assert_eq!(c.rects(), [&Op::Rect(10., 0., 50., 50.),
                               &Op::Rect(65., 0., 50., 50.),
                               &Op::Rect(120., 0., 50., 50.)]);
        assert_eq!(c.0.first(), Some(&Op::Push));
        assert_eq!(c.0.last(), Some(&Op::Pop));
        assert!(c.0.contains(&Op::Fill(RGBA8::new(0, 255, 0, 255))));
    }

    #[test]
    fn vertical_layout_with_borders() {
        let mut c = Recorder::default();
        let opts = DrawOptions { vertical: true, width: 20., height: 10.,
                                 draw_border: true, ..Default::default() };
        pal().draw(&mut c, &opts);
        // Each swatch: border then fill.
        assert_eq!(c.rects().len(), 6);
        assert_eq!(c.rects()[4], &Op::Rect(0., 20., 20., 10.));
    }

    #[test]
    fn decorations() {
        let mut p = pal();
        p.set(1);
        p.skip(2).unwrap();
        let mut c = Recorder::default();
        p.draw(&mut c, &DrawOptions { show_index: true, show_cursor: true,
                                      show_skipped: true, ..Default::default() });
        let texts: Vec<_> = c.0.iter()
            .filter_map(|o| if let Op::Text(t) = o { Some(t.as_str()) } else { None })
            .collect();
        assert_eq!(texts, ["0", "1", "2"]);
        assert_eq!(c.0.iter().filter(|o| matches!(o, Op::Circle(..))).count(), 1);
        assert!(c.0.contains(&Op::Circle(75., 25., 18.)));
        assert_eq!(c.0.iter().filter(|o| **o == Op::Line).count(), 2);
        // Bright swatches get black labels.
        assert!(c.0.contains(&Op::Fill(BLACK)));
    }
}
