use std::fmt;

use crate::picture::color::Color;

/// How integer channel values outside `0..=255` are brought back into range.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ChannelPolicy {
    /// Saturate at 0 and 255.
    #[default]
    Clamp,
    /// Reduce modulo 256 (so 256 becomes 0 and -1 becomes 255).
    Wrap,
}

impl ChannelPolicy {
    pub fn from_wrap_levels(wrap: bool) -> Self {
        if wrap { Self::Wrap } else { Self::Clamp }
    }

    pub fn wraps(self) -> bool {
        self == Self::Wrap
    }

    pub fn correct(self, value: i64) -> u8 {
        match self {
            Self::Clamp => value.clamp(0, 255) as u8,
            Self::Wrap => value.rem_euclid(256) as u8,
        }
    }
}

/// Read access shared by [`PixelRef`] and [`PixelMut`]. Coordinates are buffer (0-based)
/// coordinates.
pub trait Pixel {
    fn x(&self) -> u32;
    fn y(&self) -> u32;
    fn rgb(&self) -> image::Rgb<u8>;

    fn red(&self) -> u8 {
        self.rgb().0[0]
    }

    fn green(&self) -> u8 {
        self.rgb().0[1]
    }

    fn blue(&self) -> u8 {
        self.rgb().0[2]
    }

    fn color(&self) -> Color {
        Color::from(self.rgb())
    }
}

/// Read-only view of one pixel inside a picture.
#[derive(Clone, Copy, Debug)]
pub struct PixelRef<'a> {
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) rgb: &'a image::Rgb<u8>,
}

impl Pixel for PixelRef<'_> {
    fn x(&self) -> u32 {
        self.x
    }

    fn y(&self) -> u32 {
        self.y
    }

    fn rgb(&self) -> image::Rgb<u8> {
        *self.rgb
    }
}

/// Writable view of one pixel inside a picture.
#[derive(Debug)]
pub struct PixelMut<'a> {
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) rgb: &'a mut image::Rgb<u8>,
}

impl Pixel for PixelMut<'_> {
    fn x(&self) -> u32 {
        self.x
    }

    fn y(&self) -> u32 {
        self.y
    }

    fn rgb(&self) -> image::Rgb<u8> {
        *self.rgb
    }
}

impl PixelMut<'_> {
    pub fn set_red(&mut self, value: u8) {
        self.rgb.0[0] = value;
    }

    pub fn set_green(&mut self, value: u8) {
        self.rgb.0[1] = value;
    }

    pub fn set_blue(&mut self, value: u8) {
        self.rgb.0[2] = value;
    }

    pub fn set_color(&mut self, color: Color) {
        *self.rgb = color.to_rgb();
    }

    /// Reborrow as a read-only pixel.
    pub fn view(&self) -> PixelRef<'_> {
        PixelRef {
            x: self.x,
            y: self.y,
            rgb: &*self.rgb,
        }
    }
}

impl fmt::Display for PixelRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pixel red={} green={} blue={}",
            self.red(),
            self.green(),
            self.blue()
        )
    }
}

impl fmt::Display for PixelMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.view().fmt(f)
    }
}
