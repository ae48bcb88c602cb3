//! Raster pictures and the pixel/color values students manipulate.

pub mod color;
pub mod draw;
pub mod pixel;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context as _;
use image::RgbImage;

use crate::foundation::error::{MediaError, MediaResult};
use crate::picture::color::Color;
use crate::picture::pixel::{PixelMut, PixelRef};

/// Title used for pictures that were not loaded from a file.
pub const UNTITLED: &str = "Untitled";

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// An opaque RGB raster plus the file it came from, if any.
///
/// Every picture, clones included, carries a process-unique id. Equality ignores it.
#[derive(Debug)]
pub struct Picture {
    id: u64,
    image: RgbImage,
    file_name: Option<PathBuf>,
    title: String,
}

impl Clone for Picture {
    fn clone(&self) -> Self {
        Self {
            id: next_id(),
            image: self.image.clone(),
            file_name: self.file_name.clone(),
            title: self.title.clone(),
        }
    }
}

impl PartialEq for Picture {
    fn eq(&self, other: &Self) -> bool {
        self.image == other.image && self.file_name == other.file_name && self.title == other.title
    }
}

impl Picture {
    /// Blank picture filled with `color`. Callers are expected to have validated the size.
    pub fn new(width: u32, height: u32, color: Color) -> Self {
        Self::from_image(RgbImage::from_pixel(width, height, color.to_rgb()))
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self {
            id: next_id(),
            image,
            file_name: None,
            title: UNTITLED.to_string(),
        }
    }

    /// Decode an image file of any format the `image` crate recognises.
    #[tracing::instrument]
    pub fn load(path: &Path) -> MediaResult<Self> {
        let image = image::open(path)
            .with_context(|| format!("decode picture '{}'", path.display()))?
            .to_rgb8();
        tracing::debug!(width = image.width(), height = image.height(), "picture decoded");
        Ok(Self {
            id: next_id(),
            image,
            file_name: Some(path.to_path_buf()),
            title: crate::facade::get_short_path(path),
        })
    }

    /// Encode to `path`, choosing the format from its extension.
    #[tracing::instrument(skip(self))]
    pub fn write(&self, path: &Path) -> MediaResult<()> {
        let format = image::ImageFormat::from_path(path).map_err(|_| {
            MediaError::unsupported(format!(
                "cannot tell which image format to write from '{}'",
                path.display()
            ))
        })?;
        self.image
            .save_with_format(path, format)
            .with_context(|| format!("write picture '{}'", path.display()))?;
        Ok(())
    }

    /// Identity of this picture for the lifetime of the process.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<PixelRef<'_>> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(PixelRef {
            x,
            y,
            rgb: self.image.get_pixel(x, y),
        })
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<PixelMut<'_>> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(PixelMut {
            x,
            y,
            rgb: self.image.get_pixel_mut(x, y),
        })
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = PixelRef<'_>> {
        self.image
            .enumerate_pixels()
            .map(|(x, y, rgb)| PixelRef { x, y, rgb })
    }

    pub fn pixels_mut(&mut self) -> impl Iterator<Item = PixelMut<'_>> {
        self.image
            .enumerate_pixels_mut()
            .map(|(x, y, rgb)| PixelMut { x, y, rgb })
    }

    pub fn fill(&mut self, color: Color) {
        let rgb = color.to_rgb();
        for px in self.image.pixels_mut() {
            *px = rgb;
        }
    }

    /// Copy this picture into `dest` with its top-left corner at `(x0, y0)`, dropping whatever
    /// falls outside `dest`.
    pub fn copy_into(&self, dest: &mut Picture, x0: i64, y0: i64) {
        for (x, y, rgb) in self.image.enumerate_pixels() {
            let dx = x0 + i64::from(x);
            let dy = y0 + i64::from(y);
            if dx < 0 || dy < 0 || dx >= i64::from(dest.width()) || dy >= i64::from(dest.height()) {
                continue;
            }
            dest.image.put_pixel(dx as u32, dy as u32, *rgb);
        }
    }

    /// New picture holding the `width` x `height` region at `(x0, y0)`, clipped to this picture.
    pub fn crop(&self, x0: u32, y0: u32, width: u32, height: u32) -> Picture {
        let w = width.min(self.width().saturating_sub(x0)).max(1);
        let h = height.min(self.height().saturating_sub(y0)).max(1);
        let view = image::imageops::crop_imm(&self.image, x0, y0, w, h);
        Picture::from_image(view.to_image())
    }
}
