use std::fmt;

use crate::foundation::error::{MediaError, reject};
use crate::movie::Movie;
use crate::picture::Picture;
use crate::sound::Sound;

/// Any media value, for operations that accept more than one kind.
#[derive(Clone, Copy, Debug)]
pub enum Media<'a> {
    Picture(&'a Picture),
    Sound(&'a Sound),
    Movie(&'a Movie),
}

impl Media<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Media::Picture(_) => "picture",
            Media::Sound(_) => "sound",
            Media::Movie(_) => "movie",
        }
    }
}

impl fmt::Display for Media<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Media::Picture(p) => write!(f, "Picture, {} {}x{}", p.title(), p.width(), p.height()),
            Media::Sound(s) => write!(f, "Sound of length {}", s.len()),
            Media::Movie(m) => m.fmt(f),
        }
    }
}

macro_rules! media_kind {
    ($variant:ident, $ty:ty, $name:literal) => {
        impl<'a> From<&'a $ty> for Media<'a> {
            fn from(value: &'a $ty) -> Self {
                Media::$variant(value)
            }
        }

        impl<'a> TryFrom<Media<'a>> for &'a $ty {
            type Error = MediaError;

            fn try_from(media: Media<'a>) -> Result<Self, Self::Error> {
                match media {
                    Media::$variant(v) => Ok(v),
                    other => reject(MediaError::type_mismatch(format!(
                        "expected a {} but got a {}",
                        $name,
                        other.kind()
                    ))),
                }
            }
        }
    };
}

media_kind!(Picture, Picture, "picture");
media_kind!(Sound, Sound, "sound");
media_kind!(Movie, Movie, "movie");
