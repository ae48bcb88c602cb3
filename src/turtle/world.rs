use crate::foundation::error::{MediaError, MediaResult};
use crate::picture::Picture;
use crate::picture::color::Color;
use crate::turtle::Turtle;

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

/// Handle to a turtle living in a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TurtleId(usize);

impl TurtleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A white picture and the turtles walking on it.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    picture: Picture,
    turtles: Vec<Turtle>,
}

impl World {
    pub fn new(width: u32, height: u32) -> Self {
        let mut picture = Picture::new(width, height, Color::WHITE);
        picture.set_title("World");
        Self {
            picture,
            turtles: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.picture.width()
    }

    pub fn height(&self) -> u32 {
        self.picture.height()
    }

    pub fn picture(&self) -> &Picture {
        &self.picture
    }

    pub fn picture_mut(&mut self) -> &mut Picture {
        &mut self.picture
    }

    /// Put a new turtle in the middle of the world.
    pub fn add_turtle(&mut self) -> TurtleId {
        self.turtles.push(Turtle::centered_on(&self.picture));
        TurtleId(self.turtles.len() - 1)
    }

    pub fn turtles(&self) -> &[Turtle] {
        &self.turtles
    }

    pub fn turtle(&self, id: TurtleId) -> MediaResult<&Turtle> {
        self.turtles
            .get(id.0)
            .ok_or_else(|| unknown_turtle(id))
    }

    pub fn turtle_mut(&mut self, id: TurtleId) -> MediaResult<&mut Turtle> {
        self.turtles
            .get_mut(id.0)
            .ok_or_else(|| unknown_turtle(id))
    }

    /// Borrow one turtle together with the canvas it draws on.
    pub fn split_mut(&mut self, id: TurtleId) -> MediaResult<(&mut Turtle, &mut Picture)> {
        let turtle = self
            .turtles
            .get_mut(id.0)
            .ok_or_else(|| unknown_turtle(id))?;
        Ok((turtle, &mut self.picture))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

fn unknown_turtle(id: TurtleId) -> MediaError {
    MediaError::out_of_range(format!("no turtle #{} in this world", id.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picture::pixel::Pixel as _;

    #[test]
    fn turtles_start_in_the_middle() {
        let mut w = World::default();
        let id = w.add_turtle();
        let t = w.turtle(id).unwrap();
        assert_eq!((t.x(), t.y()), (320, 240));
        assert_eq!(w.turtles().len(), 1);
    }

    #[test]
    fn split_borrow_draws_on_world_picture() {
        let mut w = World::new(40, 40);
        let id = w.add_turtle();
        let (t, canvas) = w.split_mut(id).unwrap();
        t.forward(canvas, 10.0).unwrap();
        assert_eq!(w.picture().pixel(20, 15).unwrap().color(), Color::BLACK);
        assert_eq!(w.turtle(id).unwrap().y(), 10);
    }

    #[test]
    fn foreign_ids_are_rejected() {
        let mut a = World::new(10, 10);
        let mut b = World::new(10, 10);
        b.add_turtle();
        let id = b.add_turtle();
        a.add_turtle();
        assert!(a.turtle(id).unwrap_err().is_invalid_argument());
    }
}
