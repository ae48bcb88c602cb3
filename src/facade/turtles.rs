//! Turtle functions. Anything that leaves a mark takes the canvas explicitly; for a turtle that
//! lives in a [`World`], borrow both with [`World::split_mut`].

use crate::foundation::error::{MediaError, MediaResult, reject};
use crate::picture::Picture;
use crate::turtle::Turtle;
use crate::turtle::world::{TurtleId, World};

use super::pictures::MAX_PICTURE_EXTENT;

/// A world of the given size, or 640x480 unless both dimensions are given.
pub fn make_world(width: Option<i64>, height: Option<i64>) -> MediaResult<World> {
    let (Some(w), Some(h)) = (width, height) else {
        return Ok(World::default());
    };
    if !(1..=MAX_PICTURE_EXTENT).contains(&w) || !(1..=MAX_PICTURE_EXTENT).contains(&h) {
        return reject(MediaError::out_of_range(format!(
            "make_world(width, height): width (= {w}) and height (= {h}) must be between 1 and {MAX_PICTURE_EXTENT}"
        )));
    }
    Ok(World::new(w as u32, h as u32))
}

pub fn make_turtle_in_world(world: &mut World) -> TurtleId {
    world.add_turtle()
}

/// A turtle standing in the middle of `picture`.
pub fn make_turtle_on_picture(picture: &Picture) -> Turtle {
    Turtle::centered_on(picture)
}

pub fn get_turtle_list(world: &World) -> &[Turtle] {
    world.turtles()
}

/// Clockwise by `degrees`; negative values turn left.
pub fn turn(turtle: &mut Turtle, degrees: f64) {
    turtle.turn(degrees);
}

pub fn turn_right(turtle: &mut Turtle) {
    turtle.turn_right();
}

pub fn turn_left(turtle: &mut Turtle) {
    turtle.turn_left();
}

pub fn turn_to_face(turtle: &mut Turtle, x: i64, y: i64) {
    turtle.turn_to_face(x as f64, y as f64);
}

pub fn turn_to_face_turtle(turtle: &mut Turtle, other: &Turtle) {
    turtle.turn_to_face_turtle(other);
}

pub fn forward(turtle: &mut Turtle, canvas: &mut Picture, pixels: f64) -> MediaResult<()> {
    turtle.forward(canvas, pixels)
}

pub fn backward(turtle: &mut Turtle, canvas: &mut Picture, pixels: f64) -> MediaResult<()> {
    turtle.backward(canvas, pixels)
}

pub fn move_to(turtle: &mut Turtle, canvas: &mut Picture, x: i64, y: i64) -> MediaResult<()> {
    turtle.move_to(canvas, x as f64, y as f64)
}

pub fn pen_up(turtle: &mut Turtle) {
    turtle.pen_up();
}

pub fn pen_down(turtle: &mut Turtle) {
    turtle.pen_down();
}

/// Stamp `picture` onto `canvas` at the turtle, rotated to its heading.
pub fn drop(turtle: &Turtle, canvas: &mut Picture, picture: &Picture) {
    turtle.drop_picture(canvas, picture);
}

pub fn get_x_pos(turtle: &Turtle) -> i64 {
    turtle.x()
}

pub fn get_y_pos(turtle: &Turtle) -> i64 {
    turtle.y()
}

pub fn get_heading(turtle: &Turtle) -> f64 {
    turtle.heading()
}
