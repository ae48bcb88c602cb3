//! Turtle graphics on top of [`Picture`].
//!
//! A [`Turtle`] is a plain value: position, heading and pen. Anything that leaves a mark takes
//! the canvas picture explicitly, so a turtle can walk over a free-standing picture or over the
//! picture owned by a [`World`](world::World).

pub mod world;

use kurbo::{Affine, Point, Rect};

use crate::foundation::error::MediaResult;
use crate::picture::Picture;
use crate::picture::color::Color;

/// Default distance for `forward`/`backward` and default angle for `turn`.
pub const DEFAULT_STEP: f64 = 100.0;
pub const DEFAULT_TURN: f64 = 90.0;

/// Heading is in degrees, 0 pointing up the screen and growing clockwise, kept in `(-180, 180]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Turtle {
    x: f64,
    y: f64,
    heading: f64,
    pen_down: bool,
    pen_color: Color,
}

impl Turtle {
    /// A turtle standing in the middle of `canvas`, facing up with its pen down.
    pub fn centered_on(canvas: &Picture) -> Self {
        Self::at(f64::from(canvas.width() / 2), f64::from(canvas.height() / 2))
    }

    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            heading: 0.0,
            pen_down: true,
            pen_color: Color::BLACK,
        }
    }

    pub fn x(&self) -> i64 {
        self.x.round() as i64
    }

    pub fn y(&self) -> i64 {
        self.y.round() as i64
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    pub fn pen_color(&self) -> Color {
        self.pen_color
    }

    pub fn set_pen_color(&mut self, color: Color) {
        self.pen_color = color;
    }

    pub fn pen_up(&mut self) {
        self.pen_down = false;
    }

    pub fn pen_down(&mut self) {
        self.pen_down = true;
    }

    /// Rotate clockwise by `degrees` (negative turns left).
    pub fn turn(&mut self, degrees: f64) {
        self.heading = normalize_heading(self.heading + degrees);
    }

    pub fn turn_right(&mut self) {
        self.turn(DEFAULT_TURN);
    }

    pub fn turn_left(&mut self) {
        self.turn(-DEFAULT_TURN);
    }

    /// Face the point `(x, y)`. Facing the current position leaves the heading alone.
    pub fn turn_to_face(&mut self, x: f64, y: f64) {
        let (dx, dy) = (x - self.x, y - self.y);
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.heading = normalize_heading(dx.atan2(-dy).to_degrees());
    }

    pub fn turn_to_face_turtle(&mut self, other: &Turtle) {
        self.turn_to_face(other.x, other.y);
    }

    /// Walk `pixels` along the heading, drawing when the pen is down.
    pub fn forward(&mut self, canvas: &mut Picture, pixels: f64) -> MediaResult<()> {
        let rad = self.heading.to_radians();
        let to = (self.x + pixels * rad.sin(), self.y - pixels * rad.cos());
        self.move_to(canvas, to.0, to.1)
    }

    pub fn backward(&mut self, canvas: &mut Picture, pixels: f64) -> MediaResult<()> {
        self.forward(canvas, -pixels)
    }

    /// Jump to `(x, y)` without turning, drawing when the pen is down.
    pub fn move_to(&mut self, canvas: &mut Picture, x: f64, y: f64) -> MediaResult<()> {
        if self.pen_down {
            canvas.add_line(
                self.pen_color,
                self.x(),
                self.y(),
                x.round() as i64,
                y.round() as i64,
            )?;
        }
        self.x = x;
        self.y = y;
        Ok(())
    }

    /// Stamp `picture` onto `canvas` with its top-left corner at the turtle, rotated to the
    /// heading. Pixels that land outside the canvas are dropped.
    pub fn drop_picture(&self, canvas: &mut Picture, picture: &Picture) {
        let (w, h) = (f64::from(picture.width()), f64::from(picture.height()));
        let place = Affine::translate((self.x, self.y)) * Affine::rotate(self.heading.to_radians());
        let back = place.inverse();
        let bounds = place.transform_rect_bbox(Rect::new(0.0, 0.0, w, h));

        let x0 = bounds.x0.floor().max(0.0) as u32;
        let y0 = bounds.y0.floor().max(0.0) as u32;
        let x1 = (bounds.x1.ceil().max(0.0) as u32).min(canvas.width());
        let y1 = (bounds.y1.ceil().max(0.0) as u32).min(canvas.height());

        let src = picture.image();
        let dst = canvas.image_mut();
        for y in y0..y1 {
            for x in x0..x1 {
                let p = back * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if p.x < 0.0 || p.y < 0.0 || p.x >= w || p.y >= h {
                    continue;
                }
                dst.put_pixel(x, y, *src.get_pixel(p.x as u32, p.y as u32));
            }
        }
    }
}

fn normalize_heading(degrees: f64) -> f64 {
    let h = degrees.rem_euclid(360.0);
    if h > 180.0 { h - 360.0 } else { h }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picture::pixel::Pixel as _;

    #[test]
    fn starts_centered_facing_up() {
        let canvas = Picture::new(101, 60, Color::WHITE);
        let t = Turtle::centered_on(&canvas);
        assert_eq!((t.x(), t.y()), (50, 30));
        assert_eq!(t.heading(), 0.0);
        assert!(t.is_pen_down());
    }

    #[test]
    fn heading_wraps_into_half_open_range() {
        let mut t = Turtle::at(0.0, 0.0);
        t.turn(270.0);
        assert_eq!(t.heading(), -90.0);
        t.turn(-90.0);
        assert_eq!(t.heading(), 180.0);
        t.turn_right();
        assert_eq!(t.heading(), -90.0);
    }

    #[test]
    fn forward_moves_along_heading_and_draws() {
        let mut canvas = Picture::new(50, 50, Color::WHITE);
        let mut t = Turtle::at(10.0, 40.0);
        t.forward(&mut canvas, 20.0).unwrap();
        assert_eq!((t.x(), t.y()), (10, 20));
        assert_eq!(canvas.pixel(10, 30).unwrap().color(), Color::BLACK);

        t.turn_right();
        t.pen_up();
        t.forward(&mut canvas, 15.0).unwrap();
        assert_eq!((t.x(), t.y()), (25, 20));
        assert_eq!(canvas.pixel(20, 20).unwrap().color(), Color::WHITE);
    }

    #[test]
    fn turn_to_face_points_at_target() {
        let mut t = Turtle::at(10.0, 10.0);
        t.turn_to_face(20.0, 10.0);
        assert!((t.heading() - 90.0).abs() < 1e-9);
        t.turn_to_face(10.0, 20.0);
        assert!((t.heading() - 180.0).abs() < 1e-9);
        let other = Turtle::at(0.0, 10.0);
        t.turn_to_face_turtle(&other);
        assert!((t.heading() + 90.0).abs() < 1e-9);
    }

    #[test]
    fn drop_unrotated_copies_at_turtle() {
        let mut canvas = Picture::new(20, 20, Color::WHITE);
        let stamp = Picture::new(3, 2, Color::RED);
        Turtle::at(5.0, 6.0).drop_picture(&mut canvas, &stamp);
        assert_eq!(canvas.pixel(5, 6).unwrap().color(), Color::RED);
        assert_eq!(canvas.pixel(7, 7).unwrap().color(), Color::RED);
        assert_eq!(canvas.pixel(8, 6).unwrap().color(), Color::WHITE);
        assert_eq!(canvas.pixel(5, 8).unwrap().color(), Color::WHITE);
    }

    #[test]
    fn drop_rotated_right_swings_below_and_left() {
        let mut canvas = Picture::new(20, 20, Color::WHITE);
        let stamp = Picture::new(4, 2, Color::BLUE);
        let mut t = Turtle::at(10.0, 10.0);
        t.turn_right();
        t.drop_picture(&mut canvas, &stamp);
        // The picture's x axis now points down the screen, its y axis to the left.
        assert_eq!(canvas.pixel(9, 12).unwrap().color(), Color::BLUE);
        assert_eq!(canvas.pixel(8, 13).unwrap().color(), Color::BLUE);
        assert_eq!(canvas.pixel(10, 12).unwrap().color(), Color::WHITE);
    }
}
