//! Vector drawing onto pictures.
//!
//! Shapes are built as `kurbo` geometry, serialized into a small SVG document and rasterized by
//! `resvg` with anti-aliasing disabled, so a filled shape writes exactly its color into every
//! covered pixel. Coordinates are picture buffer coordinates (0-based, y down); stroked outlines
//! sit on pixel centers so that an outline from `x` to `x + w` covers both end columns.

use std::fmt::Write as _;
use std::sync::{Arc as Shared, OnceLock};

use anyhow::Context as _;
use kurbo::{Arc, BezPath, Ellipse, Line, Point, Rect, Shape, Vec2};

use crate::foundation::error::MediaResult;
use crate::foundation::math::over_premul_onto_rgb;
use crate::picture::Picture;
use crate::picture::color::Color;

const TOLERANCE: f64 = 0.1;

/// Font weight and slant for [`TextStyle`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    #[default]
    Plain,
    Bold,
    Italic,
    BoldItalic,
}

/// Font request used by text drawing. Families are CSS generic names or installed font names.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    pub family: String,
    pub emphasis: Emphasis,
    pub size: f64,
}

impl TextStyle {
    pub const SANS_SERIF: &'static str = "sans-serif";
    pub const SERIF: &'static str = "serif";
    pub const MONOSPACED: &'static str = "monospace";

    pub fn new(family: impl Into<String>, emphasis: Emphasis, size: f64) -> Self {
        Self {
            family: family.into(),
            emphasis,
            size,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(Self::SANS_SERIF, Emphasis::Plain, 12.0)
    }
}

/// Which point of the text `(x, y)` names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextPlacement {
    pub anchor: TextAnchor,
    pub rotation: f64,
}

/// A batch of drawing operations rasterized onto a picture in one pass.
///
/// Only the area the queued shapes can touch is rasterized. Text has no cheap bounds, so a
/// sketch holding text covers the whole picture.
#[derive(Clone, Debug, Default)]
pub struct Sketch {
    body: String,
    has_text: bool,
    bounds: Option<Rect>,
}

/// Pixel rectangle `x0..x1` by `y0..y1` of a picture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Region {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    fn cover(&mut self, area: Rect) {
        self.bounds = Some(self.bounds.map_or(area, |b| b.union(area)));
    }

    /// Outline `shape` with a pen `width` pixels wide.
    pub fn stroke(&mut self, shape: &impl Shape, color: Color, width: f64) -> &mut Self {
        // Square caps reach past the ends by half the pen, diagonally up to width / sqrt(2).
        self.cover(shape.bounding_box().inflate(width + 1.0, width + 1.0));
        let d = shape.to_path(TOLERANCE).to_svg();
        let _ = write!(
            self.body,
            r#"<path d="{d}" fill="none" stroke="{}" stroke-width="{width}" stroke-linecap="square"/>"#,
            color.to_hex()
        );
        self
    }

    pub fn fill(&mut self, shape: &impl Shape, color: Color) -> &mut Self {
        self.cover(shape.bounding_box().inflate(1.0, 1.0));
        let d = shape.to_path(TOLERANCE).to_svg();
        let _ = write!(self.body, r#"<path d="{d}" fill="{}"/>"#, color.to_hex());
        self
    }

    /// Text whose baseline starts at `(x, y)`.
    pub fn text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle, color: Color) -> &mut Self {
        self.placed_text(x, y, text, style, color, TextPlacement::default())
    }

    /// Text anchored at `(x, y)` and rotated about that point (degrees, clockwise on screen).
    pub fn placed_text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        style: &TextStyle,
        color: Color,
        placement: TextPlacement,
    ) -> &mut Self {
        let (weight, slant) = match style.emphasis {
            Emphasis::Plain => ("normal", "normal"),
            Emphasis::Bold => ("bold", "normal"),
            Emphasis::Italic => ("normal", "italic"),
            Emphasis::BoldItalic => ("bold", "italic"),
        };
        let anchor = match placement.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        let _ = write!(
            self.body,
            r#"<text x="{x}" y="{y}" transform="rotate({} {x} {y})" text-anchor="{anchor}" fill="{}" font-family="{}" font-size="{}" font-weight="{weight}" font-style="{slant}">{}</text>"#,
            placement.rotation,
            color.to_hex(),
            xml_escape(&style.family),
            style.size,
            xml_escape(text)
        );
        self.has_text = true;
        self
    }

    /// Part of a `width` x `height` picture this sketch may paint, or `None` if it paints
    /// nothing visible.
    fn region(&self, width: u32, height: u32) -> Option<Region> {
        let canvas = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        let area = if self.has_text {
            canvas
        } else {
            self.bounds?.intersect(canvas)
        };
        let region = Region {
            x0: area.x0.floor().max(0.0) as u32,
            y0: area.y0.floor().max(0.0) as u32,
            x1: (area.x1.ceil() as u32).min(width),
            y1: (area.y1.ceil() as u32).min(height),
        };
        (region.x0 < region.x1 && region.y0 < region.y1).then_some(region)
    }

    /// Rasterize every queued operation onto `picture`.
    pub fn draw_on(&self, picture: &mut Picture) -> MediaResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        let (w, h) = (picture.width(), picture.height());
        let Some(region) = self.region(w, h) else {
            return Ok(());
        };
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" shape-rendering="crispEdges">{}</svg>"#,
            self.body
        );

        let opts = usvg::Options {
            fontdb: if self.has_text {
                system_fonts()
            } else {
                Shared::new(usvg::fontdb::Database::new())
            },
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).context("parse drawing")?;

        let (rw, rh) = (region.x1 - region.x0, region.y1 - region.y0);
        let mut pixmap = resvg::tiny_skia::Pixmap::new(rw, rh)
            .with_context(|| format!("allocate a {rw}x{rh} drawing surface"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_translate(
                -(region.x0 as f32),
                -(region.y0 as f32),
            ),
            &mut pixmap.as_mut(),
        );
        tracing::trace!(?region, "sketch rasterized");

        let stride = w as usize * 3;
        let (left, right) = (region.x0 as usize * 3, region.x1 as usize * 3);
        let rgb: &mut [u8] = picture.image_mut();
        for (row, src) in (region.y0 as usize..).zip(pixmap.data().chunks_exact(rw as usize * 4)) {
            let start = row * stride;
            over_premul_onto_rgb(&mut rgb[start + left..start + right], src);
        }
        Ok(())
    }
}

fn system_fonts() -> Shared<usvg::fontdb::Database> {
    static FONTS: OnceLock<Shared<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.faces().count(), "loaded system fonts");
            Shared::new(db)
        })
        .clone()
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Outline box whose edges run through the centers of columns `x..=x+w` and rows `y..=y+h`.
fn outline_box(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x + 0.5, y + 0.5, x + w + 0.5, y + h + 0.5)
}

fn fill_box(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, x + w, y + h)
}

/// Elliptical arc inscribed in `bounds`. Angles are in degrees, 0 at three o'clock, positive
/// counter-clockwise on screen.
fn arc_in(bounds: Rect, start_deg: f64, sweep_deg: f64) -> Arc {
    Arc {
        center: bounds.center(),
        radii: Vec2::new(bounds.width() / 2.0, bounds.height() / 2.0),
        // y grows downward, so screen counter-clockwise is a negative kurbo angle.
        start_angle: -start_deg.to_radians(),
        sweep_angle: -sweep_deg.to_radians(),
        x_rotation: 0.0,
    }
}

fn pie(arc: &Arc) -> BezPath {
    let start = arc.center
        + Vec2::new(
            arc.radii.x * arc.start_angle.cos(),
            arc.radii.y * arc.start_angle.sin(),
        );
    let mut path = BezPath::new();
    path.move_to(arc.center);
    path.line_to(start);
    path.extend(arc.append_iter(TOLERANCE));
    path.close_path();
    path
}

impl Picture {
    pub fn add_line(&mut self, color: Color, x1: i64, y1: i64, x2: i64, y2: i64) -> MediaResult<()> {
        let line = Line::new(
            Point::new(x1 as f64 + 0.5, y1 as f64 + 0.5),
            Point::new(x2 as f64 + 0.5, y2 as f64 + 0.5),
        );
        Sketch::new().stroke(&line, color, 1.0).draw_on(self)
    }

    pub fn add_rect(&mut self, color: Color, x: i64, y: i64, w: i64, h: i64) -> MediaResult<()> {
        let r = outline_box(x as f64, y as f64, w as f64, h as f64);
        Sketch::new().stroke(&r, color, 1.0).draw_on(self)
    }

    pub fn add_rect_filled(&mut self, color: Color, x: i64, y: i64, w: i64, h: i64) -> MediaResult<()> {
        let r = fill_box(x as f64, y as f64, w as f64, h as f64);
        Sketch::new().fill(&r, color).draw_on(self)
    }

    pub fn add_oval(&mut self, color: Color, x: i64, y: i64, w: i64, h: i64) -> MediaResult<()> {
        let e = Ellipse::from_rect(outline_box(x as f64, y as f64, w as f64, h as f64));
        Sketch::new().stroke(&e, color, 1.0).draw_on(self)
    }

    pub fn add_oval_filled(&mut self, color: Color, x: i64, y: i64, w: i64, h: i64) -> MediaResult<()> {
        let e = Ellipse::from_rect(fill_box(x as f64, y as f64, w as f64, h as f64));
        Sketch::new().fill(&e, color).draw_on(self)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_arc(
        &mut self,
        color: Color,
        x: i64,
        y: i64,
        w: i64,
        h: i64,
        start: f64,
        angle: f64,
    ) -> MediaResult<()> {
        let arc = arc_in(outline_box(x as f64, y as f64, w as f64, h as f64), start, angle);
        Sketch::new().stroke(&arc, color, 1.0).draw_on(self)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_arc_filled(
        &mut self,
        color: Color,
        x: i64,
        y: i64,
        w: i64,
        h: i64,
        start: f64,
        angle: f64,
    ) -> MediaResult<()> {
        let arc = arc_in(fill_box(x as f64, y as f64, w as f64, h as f64), start, angle);
        Sketch::new().fill(&pie(&arc), color).draw_on(self)
    }

    pub fn add_text(&mut self, color: Color, x: i64, y: i64, text: &str) -> MediaResult<()> {
        self.add_text_with_style(color, x, y, text, &TextStyle::default())
    }

    pub fn add_text_with_style(
        &mut self,
        color: Color,
        x: i64,
        y: i64,
        text: &str,
        style: &TextStyle,
    ) -> MediaResult<()> {
        Sketch::new()
            .text(x as f64, y as f64, text, style, color)
            .draw_on(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picture::pixel::Pixel as _;

    #[test]
    fn filled_rect_covers_exactly_its_pixels() {
        let mut pic = Picture::new(10, 10, Color::WHITE);
        pic.add_rect_filled(Color::RED, 2, 3, 4, 2).unwrap();
        assert_eq!(pic.pixel(2, 3).unwrap().color(), Color::RED);
        assert_eq!(pic.pixel(5, 4).unwrap().color(), Color::RED);
        assert_eq!(pic.pixel(6, 4).unwrap().color(), Color::WHITE);
        assert_eq!(pic.pixel(2, 5).unwrap().color(), Color::WHITE);
        assert_eq!(pic.pixel(1, 3).unwrap().color(), Color::WHITE);
    }

    #[test]
    fn horizontal_line_marks_its_row() {
        let mut pic = Picture::new(20, 10, Color::WHITE);
        pic.add_line(Color::BLACK, 2, 5, 15, 5).unwrap();
        assert_eq!(pic.pixel(8, 5).unwrap().color(), Color::BLACK);
        assert_eq!(pic.pixel(8, 2).unwrap().color(), Color::WHITE);
    }

    #[test]
    fn filled_oval_paints_center_not_corners() {
        let mut pic = Picture::new(20, 20, Color::WHITE);
        pic.add_oval_filled(Color::BLUE, 0, 0, 20, 20).unwrap();
        assert_eq!(pic.pixel(10, 10).unwrap().color(), Color::BLUE);
        assert_eq!(pic.pixel(0, 0).unwrap().color(), Color::WHITE);
    }

    #[test]
    fn filled_quarter_arc_stays_in_its_quadrant() {
        let mut pic = Picture::new(40, 40, Color::WHITE);
        // 0..90 degrees sweeps from three o'clock up to twelve o'clock.
        pic.add_arc_filled(Color::GREEN, 0, 0, 40, 40, 0.0, 90.0).unwrap();
        assert_eq!(pic.pixel(28, 12).unwrap().color(), Color::GREEN);
        assert_eq!(pic.pixel(12, 28).unwrap().color(), Color::WHITE);
        assert_eq!(pic.pixel(12, 12).unwrap().color(), Color::WHITE);
    }

    #[test]
    fn small_shapes_rasterize_only_their_neighbourhood() {
        let mut sketch = Sketch::new();
        sketch.fill(&fill_box(10.0, 20.0, 4.0, 2.0), Color::RED);
        let region = sketch.region(1000, 1000).unwrap();
        assert_eq!(
            region,
            Region {
                x0: 9,
                y0: 19,
                x1: 15,
                y1: 23
            }
        );
    }

    #[test]
    fn text_covers_the_whole_canvas() {
        let mut sketch = Sketch::new();
        sketch.fill(&fill_box(1.0, 1.0, 1.0, 1.0), Color::RED);
        sketch.text(1.0, 10.0, "hi", &TextStyle::default(), Color::BLACK);
        assert_eq!(
            sketch.region(30, 40),
            Some(Region {
                x0: 0,
                y0: 0,
                x1: 30,
                y1: 40
            })
        );
    }

    #[test]
    fn shapes_straddling_the_edge_are_clipped() {
        let mut pic = Picture::new(10, 10, Color::WHITE);
        pic.add_rect_filled(Color::RED, -5, 7, 8, 20).unwrap();
        assert_eq!(pic.pixel(0, 9).unwrap().color(), Color::RED);
        assert_eq!(pic.pixel(2, 7).unwrap().color(), Color::RED);
        assert_eq!(pic.pixel(3, 7).unwrap().color(), Color::WHITE);
        assert_eq!(pic.pixel(0, 6).unwrap().color(), Color::WHITE);
    }

    #[test]
    fn shapes_off_the_canvas_draw_nothing() {
        let mut pic = Picture::new(8, 8, Color::CYAN);
        pic.add_oval_filled(Color::RED, 50, 50, 10, 10).unwrap();
        assert!(pic.pixels().all(|p| p.color() == Color::CYAN));
    }

    #[test]
    fn empty_sketch_is_a_no_op() {
        let mut pic = Picture::new(2, 2, Color::CYAN);
        Sketch::new().draw_on(&mut pic).unwrap();
        assert!(pic.pixels().all(|p| p.color() == Color::CYAN));
    }

    #[test]
    fn text_is_escaped_into_markup() {
        let mut sketch = Sketch::new();
        sketch.text(1.0, 10.0, "a<b & \"c\"", &TextStyle::default(), Color::BLACK);
        assert!(sketch.body.contains("a&lt;b &amp; &quot;c&quot;"));
        assert!(sketch.has_text);
    }
}
