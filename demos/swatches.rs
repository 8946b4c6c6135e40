use std::{env,
          io::{BufWriter, Write},
          fs::File,
          error::Error};
use rgb::{RGB8, RGBA8};
use swatchbook::{Canvas, ColorRange, DrawOptions, GradientOptions,
                 GrayscaleOptions, Palette, RGBColor, TextAlign,
                 store::{self, MemoryStore}};

type Err = Box<dyn Error>;

fn css(c: Option<RGBA8>) -> String {
    match c {
        Some(c) if c.a == 255 => format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b),
        Some(c) => format!("rgba({},{},{},{:.3})", c.r, c.g, c.b, c.a as f64 / 255.),
        None => "none".to_string(),
    }
}

#[derive(Clone)]
struct Style {
    fill: Option<RGBA8>,
    stroke: Option<RGBA8>,
    stroke_weight: f64,
    align: (TextAlign, TextAlign),
    text_size: f64,
}

/// Accumulates SVG elements.
struct Svg {
    body: Vec<String>,
    style: Style,
    saved: Vec<Style>,
}

impl Svg {
    fn new() -> Self {
        Svg { body: Vec::new(),
              style: Style { fill: Some(RGBA8::new(255, 255, 255, 255)),
                             stroke: Some(RGBA8::new(0, 0, 0, 255)),
                             stroke_weight: 1.,
                             align: (TextAlign::Left, TextAlign::Left),
                             text_size: 12. },
              saved: Vec::new() }
    }

    fn paint(&self) -> String {
        format!("fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"",
                css(self.style.fill), css(self.style.stroke),
                self.style.stroke_weight)
    }

    fn comment(&mut self, text: &str, x: f64, y: f64) {
        self.body.push(format!("<text x=\"{x}\" y=\"{y}\" font-size=\"14\" \
                                font-family=\"sans-serif\">{text}</text>"));
    }

    fn write(&self, fh: &mut impl Write, width: f64, height: f64) -> Result<(), Err> {
        writeln!(fh, "<svg xmlns=\"http://www.w3.org/2000/svg\" \
                      width=\"{width}\" height=\"{height}\">")?;
        for e in &self.body { writeln!(fh, "  {e}")? }
        writeln!(fh, "</svg>")?;
        Ok(())
    }
}

impl Canvas for Svg {
    fn push(&mut self) { self.saved.push(self.style.clone()) }
    fn pop(&mut self) {
        if let Some(s) = self.saved.pop() { self.style = s }
    }
    fn fill(&mut self, color: RGBA8) { self.style.fill = Some(color) }
    fn no_fill(&mut self) { self.style.fill = None }
    fn stroke(&mut self, color: RGBA8) { self.style.stroke = Some(color) }
    fn no_stroke(&mut self) { self.style.stroke = None }
    fn stroke_weight(&mut self, weight: f64) { self.style.stroke_weight = weight }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let e = format!("<rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" {}/>",
                        self.paint());
        self.body.push(e)
    }

    fn circle(&mut self, x: f64, y: f64, diameter: f64) {
        let e = format!("<circle cx=\"{x}\" cy=\"{y}\" r=\"{}\" {}/>",
                        diameter / 2., self.paint());
        self.body.push(e)
    }

    fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        let e = format!("<line x1=\"{x0}\" y1=\"{y0}\" x2=\"{x1}\" y2=\"{y1}\" {}/>",
                        self.paint());
        self.body.push(e)
    }

    fn text_align(&mut self, horizontal: TextAlign, vertical: TextAlign) {
        self.style.align = (horizontal, vertical)
    }

    fn text_size(&mut self, size: f64) { self.style.text_size = size }

    fn text_width(&self, text: &str) -> f64 {
        0.6 * self.style.text_size * text.chars().count() as f64
    }

    fn text(&mut self, text: &str, x: f64, y: f64) {
        let anchor = match self.style.align.0 {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let baseline = match self.style.align.1 {
            TextAlign::Left => "hanging",
            TextAlign::Center => "central",
            TextAlign::Right => "alphabetic",
        };
        let e = format!("<text x=\"{x}\" y=\"{y}\" font-size=\"{}\" \
                         font-family=\"sans-serif\" text-anchor=\"{anchor}\" \
                         dominant-baseline=\"{baseline}\" fill=\"{}\">{text}</text>",
                        self.style.text_size, css(self.style.fill));
        self.body.push(e)
    }
}

fn setup_logging() -> Result<(), Err> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

const ROW: f64 = 60.;

fn main() -> Result<(), Err> {
    setup_logging()?;
    let out = env::args().nth(1).unwrap_or_else(|| "swatches.svg".to_string());
    let mut svg = Svg::new();
    let mut y = 10.;
    let mut row = |svg: &mut Svg, p: &Palette<RGB8>, comment: &str| {
        let opts = DrawOptions { x: 10., y, width: 40., height: 40., offset: 2.,
                                 show_index: true, show_cursor: true,
                                 show_skipped: true, ..Default::default() };
        p.draw(svg, &opts);
        svg.comment(comment, 20. + 42. * p.len() as f64, y + 25.);
        y += ROW;
    };

    let mut p: Palette<RGB8> = "264653-2a9d8f-e9c46a-f4a261-e76f51".parse()?;
    row(&mut svg, &p, "base");
    p.next()?;
    p.next()?;
    p.skip(3)?;
    row(&mut svg, &p, "cursor on 2, 3 skipped");
    p.unskip_all().reset();

    row(&mut svg, &p.complementary(), "complementary");
    row(&mut svg, &p.analogous(), "analogous");
    row(&mut svg, &p.triadic(), "triadic");
    let mut q = p.clone();
    q.add_split_complementary_colors();
    row(&mut svg, &q, "with split complementary colors");
    q = p.clone();
    q.sort_by_brightness();
    row(&mut svg, &q, "sorted by brightness");

    let g = Palette::gradient(&GradientOptions {
        amount: 8, start: RGB8::new(94, 0, 99), end: RGB8::new(255, 235, 170) })?;
    row(&mut svg, &g, "gradient");
    row(&mut svg, &Palette::grayscale(&GrayscaleOptions::default())?, "grayscale");
    q = "ff0000-0000ff".parse()?;
    q.insert_gradients(4, true)?;
    row(&mut svg, &q, "inserted gradients (looping)");

    let range = RGB8::new(0, 0, 128).gradient(&RGB8::new(144, 144, 255));
    let strip: Palette<RGB8> = (0 .. 12).map(|i| range.rgb(i as f64 / 11.)).collect();
    row(&mut svg, &strip, "two-color range");
    let strip: Palette<RGB8> = (0 .. 12).filter_map(|i| p.lerp(i as f64 / 11.))
        .collect();
    row(&mut svg, &strip, "interpolated base");

    let mut weighted = p.clone();
    weighted.set_weights(&[5., 1., 1., 1., 0.2])?;
    let sample: Palette<RGB8> = (0 .. 10)
        .filter_map(|_| weighted.random().copied())
        .collect();
    row(&mut svg, &sample, "weighted sample");

    let mut local = MemoryStore::new();
    store::store_palette(&mut local, &p)?;
    store::store_palette(&mut local, &g)?;
    store::export_stored_palettes(&local, &mut std::io::stdout())?;
    p.log(true)?;

    let mut fh = BufWriter::new(File::create(&out)?);
    svg.write(&mut fh, 900., y)?;
    log::info!("wrote {out}");
    Ok(())
}
