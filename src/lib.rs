#![forbid(unsafe_code)]

pub mod facade;
pub mod foundation;
pub mod interact;
pub mod movie;
pub mod picture;
pub mod session;
pub mod sound;
pub mod turtle;

pub use facade::Media;
pub use foundation::error::{MediaError, MediaResult};
pub use movie::Movie;
pub use picture::Picture;
pub use picture::color::Color;
pub use picture::draw::{Emphasis, TextStyle};
pub use picture::pixel::{ChannelPolicy, Pixel, PixelMut, PixelRef};
pub use session::{MediaConfig, MediaSession};
pub use sound::Sound;
pub use sound::sample::{Sample, SampleMut, SampleRef};
pub use turtle::Turtle;
pub use turtle::world::{TurtleId, World};
