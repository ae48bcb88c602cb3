//! Frame-based movies: an ordered list of image files.

pub mod encode;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{MediaError, MediaResult, reject};
use crate::picture::Picture;

/// Frames written by [`Movie::write_frames_to_directory`] are named `frame0001.png`, ...
pub const FRAME_FILE_PREFIX: &str = "frame";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Movie {
    frames: Vec<PathBuf>,
    dir: Option<PathBuf>,
}

impl Movie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame file. Any materialized directory is forgotten since it no longer matches.
    pub fn add_frame(&mut self, frame: impl Into<PathBuf>) {
        self.frames.push(frame.into());
        self.dir = None;
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.frames.get(index).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.frames.iter().map(PathBuf::as_path)
    }

    /// Directory the frames were last written to, if still current.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Decode every frame in order.
    pub fn pictures(&self) -> MediaResult<Vec<Picture>> {
        self.frames.iter().map(|f| Picture::load(f)).collect()
    }

    /// Collect the frames that share the naming scheme of `first`.
    ///
    /// Every run of digits in the file name matches any text, so `frame001.png` picks up
    /// `frame002.png` and `frame010.png` but not `title.png`. Matches are sorted by name.
    #[tracing::instrument]
    pub fn from_initial_file(first: &Path) -> MediaResult<Self> {
        let Some(name) = first.file_name().and_then(|n| n.to_str()) else {
            return reject(MediaError::missing_file(format!(
                "'{}' does not name a file",
                first.display()
            )));
        };
        let dir = match first.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.is_dir() {
            return reject(MediaError::missing_file(format!(
                "'{}' is not a directory",
                dir.display()
            )));
        }

        let pattern = frame_pattern(name)?;
        let mut names: Vec<String> = std::fs::read_dir(&dir)
            .with_context(|| format!("list frames in '{}'", dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|n| pattern.matches(n))
            .collect();
        names.sort();

        let mut movie = Movie::new();
        for n in names {
            movie.add_frame(dir.join(n));
        }
        tracing::debug!(frames = movie.len(), pattern = pattern.as_str(), "movie frames collected");
        Ok(movie)
    }

    /// Decode each frame and write it back as a numbered PNG inside `dir`.
    #[tracing::instrument(skip(self), fields(frames = self.len()))]
    pub fn write_frames_to_directory(&mut self, dir: &Path) -> MediaResult<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create frame directory '{}'", dir.display()))?;
        for (i, frame) in self.frames.iter().enumerate() {
            let picture = Picture::load(frame)?;
            picture.write(&dir.join(numbered_frame_name(i)))?;
        }
        self.dir = Some(dir.to_path_buf());
        Ok(())
    }
}

/// `frame0001.png` for index 0.
pub fn numbered_frame_name(index: usize) -> String {
    format!("{FRAME_FILE_PREFIX}{:04}.png", index + 1)
}

fn frame_pattern(name: &str) -> MediaResult<glob::Pattern> {
    let mut pattern = String::new();
    let mut literal = String::new();
    let mut in_digits = false;
    for ch in name.chars() {
        if ch.is_ascii_digit() {
            if !in_digits {
                pattern.push_str(&glob::Pattern::escape(&literal));
                literal.clear();
                pattern.push('*');
                in_digits = true;
            }
        } else {
            in_digits = false;
            literal.push(ch);
        }
    }
    pattern.push_str(&glob::Pattern::escape(&literal));
    glob::Pattern::new(&pattern)
        .with_context(|| format!("build frame pattern from '{name}'"))
        .map_err(MediaError::from)
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Movie, frames: {}", self.len())
    }
}

impl<'a> IntoIterator for &'a Movie {
    type Item = &'a Path;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, PathBuf>, fn(&PathBuf) -> &Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames
            .iter()
            .map(PathBuf::as_path as fn(&PathBuf) -> &Path)
    }
}
