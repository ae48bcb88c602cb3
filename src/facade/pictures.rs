use rand::Rng as _;

use crate::foundation::error::{MediaError, MediaResult, reject};
use crate::foundation::index::{Axis, pixel_coord, pixel_to_student};
use crate::picture::Picture;
use crate::picture::color::Color;
use crate::picture::draw::TextStyle;
use crate::picture::pixel::{Pixel, PixelMut, PixelRef};

/// Largest width or height `make_empty_picture` accepts.
pub const MAX_PICTURE_EXTENT: i64 = 10_000;

pub fn make_empty_picture(width: i64, height: i64, color: Color) -> MediaResult<Picture> {
    const FUNC: &str = "make_empty_picture(width, height, color)";
    if width > MAX_PICTURE_EXTENT || height > MAX_PICTURE_EXTENT {
        return reject(MediaError::out_of_range(format!(
            "{FUNC}: height and width must be less than {MAX_PICTURE_EXTENT} each"
        )));
    }
    if width <= 0 || height <= 0 {
        return reject(MediaError::out_of_range(format!(
            "{FUNC}: height and width must be greater than 0 each"
        )));
    }
    Ok(Picture::new(width as u32, height as u32, color))
}

/// Picture just big enough to hold every pixel at its own 1-based coordinate. Positions no
/// pixel covers get `default`.
pub fn pixels_to_picture<P: Pixel>(pixels: &[P], default: Color) -> MediaResult<Picture> {
    let Some(width) = pixels.iter().map(|p| p.x() + 1).max() else {
        return reject(MediaError::out_of_range(
            "pixels_to_picture(pixels, color): there must be at least one pixel",
        ));
    };
    let height = pixels.iter().map(|p| p.y() + 1).max().unwrap_or(1);
    let mut picture = Picture::new(width, height, default);
    let image = picture.image_mut();
    for p in pixels {
        image.put_pixel(p.x(), p.y(), p.rgb());
    }
    Ok(picture)
}

pub fn duplicate_picture(picture: &Picture) -> Picture {
    picture.clone()
}

pub fn get_width(picture: &Picture) -> u32 {
    picture.width()
}

pub fn get_height(picture: &Picture) -> u32 {
    picture.height()
}

fn locate(func: &str, picture: &Picture, x: i64, y: i64) -> MediaResult<(u32, u32)> {
    Ok((
        pixel_coord(func, Axis::X, x, picture.width())?,
        pixel_coord(func, Axis::Y, y, picture.height())?,
    ))
}

fn out_of_picture(func: &str) -> MediaError {
    MediaError::out_of_range(format!("{func}: pixel lies outside the picture"))
}

/// The pixel at 1-based `(x, y)`.
pub fn get_pixel(picture: &Picture, x: i64, y: i64) -> MediaResult<PixelRef<'_>> {
    const FUNC: &str = "get_pixel(picture, x, y)";
    let (bx, by) = locate(FUNC, picture, x, y)?;
    picture.pixel(bx, by).ok_or_else(|| out_of_picture(FUNC))
}

pub fn get_pixel_at(picture: &Picture, x: i64, y: i64) -> MediaResult<PixelRef<'_>> {
    get_pixel(picture, x, y)
}

pub fn get_pixel_mut(picture: &mut Picture, x: i64, y: i64) -> MediaResult<PixelMut<'_>> {
    const FUNC: &str = "get_pixel(picture, x, y)";
    let (bx, by) = locate(FUNC, picture, x, y)?;
    picture.pixel_mut(bx, by).ok_or_else(|| out_of_picture(FUNC))
}

/// Every pixel, row by row.
pub fn get_pixels(picture: &Picture) -> Vec<PixelRef<'_>> {
    picture.pixels().collect()
}

pub fn get_all_pixels(picture: &Picture) -> Vec<PixelRef<'_>> {
    get_pixels(picture)
}

pub fn get_pixels_mut(picture: &mut Picture) -> Vec<PixelMut<'_>> {
    picture.pixels_mut().collect()
}

pub fn get_red(pixel: &impl Pixel) -> u8 {
    pixel.red()
}

pub fn get_green(pixel: &impl Pixel) -> u8 {
    pixel.green()
}

pub fn get_blue(pixel: &impl Pixel) -> u8 {
    pixel.blue()
}

pub fn get_color(pixel: &impl Pixel) -> Color {
    pixel.color()
}

pub fn set_color(pixel: &mut PixelMut<'_>, color: Color) {
    pixel.set_color(color);
}

pub fn get_x(pixel: &impl Pixel) -> i64 {
    pixel_to_student(pixel.x())
}

pub fn get_y(pixel: &impl Pixel) -> i64 {
    pixel_to_student(pixel.y())
}

pub fn set_all_pixels_to_a_color(picture: &mut Picture, color: Color) {
    picture.fill(color);
}

fn check_box(func: &str, width: i64, height: i64) -> MediaResult<()> {
    if width < 0 || height < 0 {
        return reject(MediaError::out_of_range(format!(
            "{func}: width (= {width}) and height (= {height}) must not be negative"
        )));
    }
    Ok(())
}

pub fn add_line(picture: &mut Picture, x1: i64, y1: i64, x2: i64, y2: i64, color: Color) -> MediaResult<()> {
    picture.add_line(color, x1, y1, x2, y2)
}

pub fn add_text(picture: &mut Picture, x: i64, y: i64, text: &str, color: Color) -> MediaResult<()> {
    picture.add_text(color, x, y, text)
}

pub fn add_text_with_style(
    picture: &mut Picture,
    x: i64,
    y: i64,
    text: &str,
    style: &TextStyle,
    color: Color,
) -> MediaResult<()> {
    if !(style.size > 0.0) {
        return reject(MediaError::out_of_range(format!(
            "add_text_with_style(picture, x, y, text, style, color): font size (= {}) must be greater than 0",
            style.size
        )));
    }
    picture.add_text_with_style(color, x, y, text, style)
}

pub fn add_rect(picture: &mut Picture, x: i64, y: i64, w: i64, h: i64, color: Color) -> MediaResult<()> {
    check_box("add_rect(picture, x, y, w, h, color)", w, h)?;
    picture.add_rect(color, x, y, w, h)
}

pub fn add_rect_filled(picture: &mut Picture, x: i64, y: i64, w: i64, h: i64, color: Color) -> MediaResult<()> {
    check_box("add_rect_filled(picture, x, y, w, h, color)", w, h)?;
    picture.add_rect_filled(color, x, y, w, h)
}

pub fn add_oval(picture: &mut Picture, x: i64, y: i64, w: i64, h: i64, color: Color) -> MediaResult<()> {
    check_box("add_oval(picture, x, y, w, h, color)", w, h)?;
    picture.add_oval(color, x, y, w, h)
}

pub fn add_oval_filled(picture: &mut Picture, x: i64, y: i64, w: i64, h: i64, color: Color) -> MediaResult<()> {
    check_box("add_oval_filled(picture, x, y, w, h, color)", w, h)?;
    picture.add_oval_filled(color, x, y, w, h)
}

/// Outline of the arc inscribed in the box, from `start` degrees (3 o'clock, counterclockwise)
/// sweeping `angle` degrees.
#[allow(clippy::too_many_arguments)]
pub fn add_arc(
    picture: &mut Picture,
    x: i64,
    y: i64,
    w: i64,
    h: i64,
    start: f64,
    angle: f64,
    color: Color,
) -> MediaResult<()> {
    check_box("add_arc(picture, x, y, w, h, start, angle, color)", w, h)?;
    picture.add_arc(color, x, y, w, h, start, angle)
}

#[allow(clippy::too_many_arguments)]
pub fn add_arc_filled(
    picture: &mut Picture,
    x: i64,
    y: i64,
    w: i64,
    h: i64,
    start: f64,
    angle: f64,
    color: Color,
) -> MediaResult<()> {
    check_box("add_arc_filled(picture, x, y, w, h, start, angle, color)", w, h)?;
    picture.add_arc_filled(color, x, y, w, h, start, angle)
}

/// Copy all of `src` that fits into `dest`, with its top-left corner at 1-based
/// `(upper_left_x, upper_left_y)`.
pub fn copy_into(src: &Picture, dest: &mut Picture, upper_left_x: i64, upper_left_y: i64) -> MediaResult<()> {
    const FUNC: &str = "copy_into(src, dest, upper_left_x, upper_left_y)";
    if upper_left_x < 1 || upper_left_x > i64::from(dest.width()) {
        return reject(MediaError::out_of_range(format!(
            "{FUNC}: upper_left_x (= {upper_left_x}) must be within dest (1..={})",
            dest.width()
        )));
    }
    if upper_left_y < 1 || upper_left_y > i64::from(dest.height()) {
        return reject(MediaError::out_of_range(format!(
            "{FUNC}: upper_left_y (= {upper_left_y}) must be within dest (1..={})",
            dest.height()
        )));
    }
    src.copy_into(dest, upper_left_x - 1, upper_left_y - 1);
    Ok(())
}

/// New picture holding the region at 1-based `(upper_left_x, upper_left_y)`, clipped to the
/// source.
pub fn crop_picture(
    picture: &Picture,
    upper_left_x: i64,
    upper_left_y: i64,
    width: i64,
    height: i64,
) -> MediaResult<Picture> {
    const FUNC: &str = "crop_picture(picture, upper_left_x, upper_left_y, width, height)";
    let x0 = pixel_coord(FUNC, Axis::X, upper_left_x, picture.width())?;
    let y0 = pixel_coord(FUNC, Axis::Y, upper_left_y, picture.height())?;
    if width < 1 || height < 1 {
        return reject(MediaError::out_of_range(format!(
            "{FUNC}: width (= {width}) and height (= {height}) must be at least 1"
        )));
    }
    let clip = |v: i64| u32::try_from(v).unwrap_or(u32::MAX);
    Ok(picture.crop(x0, y0, clip(width), clip(height)))
}

/// Pick `count` pixels of `picture` at random (with repeats) and gather them with
/// [`pixels_to_picture`], on a white background.
pub fn random_pixels(picture: &Picture, count: usize) -> MediaResult<Picture> {
    if picture.width() == 0 || picture.height() == 0 {
        return reject(MediaError::out_of_range(format!(
            "random_pixels(picture, count): cannot pick pixels from a {}x{} picture",
            picture.width(),
            picture.height()
        )));
    }
    let mut rng = rand::thread_rng();
    let chosen: Vec<PixelRef<'_>> = (0..count)
        .filter_map(|_| {
            picture.pixel(
                rng.gen_range(0..picture.width()),
                rng.gen_range(0..picture.height()),
            )
        })
        .collect();
    pixels_to_picture(&chosen, Color::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_picture_bounds() {
        let pic = make_empty_picture(3, 2, Color::CYAN).unwrap();
        assert_eq!((get_width(&pic), get_height(&pic)), (3, 2));
        assert!(make_empty_picture(0, 5, Color::WHITE).is_err());
        let err = make_empty_picture(10_001, 5, Color::WHITE).unwrap_err();
        assert!(err.to_string().contains("less than 10000"));
    }

    #[test]
    fn pixels_keep_their_coordinates() {
        let mut src = Picture::new(5, 4, Color::WHITE);
        get_pixel_mut(&mut src, 3, 2).unwrap().set_color(Color::RED);
        let picked = vec![get_pixel(&src, 3, 2).unwrap()];
        let out = pixels_to_picture(&picked, Color::BLUE).unwrap();
        assert_eq!((out.width(), out.height()), (3, 2));
        assert_eq!(get_color(&get_pixel(&out, 3, 2).unwrap()), Color::RED);
        assert_eq!(get_color(&get_pixel(&out, 1, 1).unwrap()), Color::BLUE);

        let none: Vec<PixelRef<'_>> = Vec::new();
        assert!(pixels_to_picture(&none, Color::WHITE).is_err());
    }

    #[test]
    fn pixel_coordinates_are_one_based() {
        let pic = Picture::new(4, 4, Color::WHITE);
        let px = get_pixel(&pic, 4, 1).unwrap();
        assert_eq!((get_x(&px), get_y(&px)), (4, 1));
        assert!(get_pixel(&pic, 0, 1).is_err());
        assert!(get_pixel(&pic, 1, 5).is_err());
    }

    #[test]
    fn negative_boxes_are_rejected() {
        let mut pic = Picture::new(10, 10, Color::WHITE);
        let err = add_rect(&mut pic, 1, 1, -2, 3, Color::BLACK).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(add_oval_filled(&mut pic, 1, 1, 0, 0, Color::BLACK).is_ok());
    }

    #[test]
    fn copy_into_places_at_one_based_corner() {
        let src = Picture::new(2, 2, Color::GREEN);
        let mut dest = Picture::new(4, 4, Color::WHITE);
        copy_into(&src, &mut dest, 4, 4).unwrap();
        assert_eq!(get_color(&get_pixel(&dest, 4, 4).unwrap()), Color::GREEN);
        assert_eq!(get_color(&get_pixel(&dest, 3, 3).unwrap()), Color::WHITE);
        assert!(copy_into(&src, &mut dest, 5, 1).is_err());
        assert!(copy_into(&src, &mut dest, 1, 0).is_err());
    }

    #[test]
    fn crop_clips_to_the_source() {
        let pic = Picture::new(6, 5, Color::ORANGE);
        let out = crop_picture(&pic, 5, 2, 10, 2).unwrap();
        assert_eq!((out.width(), out.height()), (2, 2));
        assert!(crop_picture(&pic, 7, 1, 1, 1).is_err());
        assert!(crop_picture(&pic, 1, 1, 0, 1).is_err());
    }

    #[test]
    fn random_pixels_fit_inside_the_source() {
        let pic = Picture::new(8, 3, Color::MAGENTA);
        let out = random_pixels(&pic, 20).unwrap();
        assert!(out.width() <= 8 && out.height() <= 3);
        assert!(random_pixels(&pic, 0).is_err());
    }

    #[test]
    fn random_pixels_of_an_empty_picture_is_rejected() {
        let err = random_pixels(&Picture::new(0, 3, Color::WHITE), 5).unwrap_err();
        assert!(matches!(err, MediaError::OutOfRange(_)));
        assert!(random_pixels(&Picture::new(4, 0, Color::WHITE), 5).is_err());
    }
}
