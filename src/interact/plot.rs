//! Time-domain plot of a sound, rendered into a [`Picture`].

use kurbo::{BezPath, Line, Point, Rect};

use crate::facade::get_short_path;
use crate::foundation::error::{MediaError, MediaResult, reject};
use crate::picture::Picture;
use crate::picture::color::Color;
use crate::picture::draw::{Sketch, TextAnchor, TextPlacement, TextStyle};
use crate::sound::Sound;

pub const NO_FILE_NAME: &str = "No file name";
pub const X_LABEL: &str = "Sample index (time)";
pub const Y_LABEL: &str = "Sample value (volume)";

/// Smallest plot either dimension may have.
pub const MIN_EXTENT: u32 = 50;
/// Largest plot either dimension may have.
pub const MAX_EXTENT: u32 = 10_000;

const WAVE: Color = Color::new(31, 119, 180);

/// Short file name of `sound`, or [`NO_FILE_NAME`].
pub fn sound_label(sound: &Sound) -> String {
    sound
        .file_name()
        .map(get_short_path)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_FILE_NAME.to_string())
}

/// `"<name>  (<rate> samples/second)"`.
pub fn plot_title(sound: &Sound) -> String {
    format!(
        "{}  ({} samples/second)",
        sound_label(sound),
        sound.sampling_rate()
    )
}

/// Sample index runs left to right, value bottom to top, with a line at zero.
#[tracing::instrument(skip(sound), fields(samples = sound.len()))]
pub fn waveform(sound: &Sound, width: u32, height: u32) -> MediaResult<Picture> {
    let extent = MIN_EXTENT..=MAX_EXTENT;
    if !extent.contains(&width) || !extent.contains(&height) {
        return reject(MediaError::out_of_range(format!(
            "waveform(sound, width, height): each side must be between {MIN_EXTENT} and {MAX_EXTENT}, got {width}x{height}"
        )));
    }
    let (w, h) = (f64::from(width), f64::from(height));
    let area = Rect::new(
        (w * 0.15).round(),
        (h * 0.10).round(),
        (w * 0.95).round(),
        (h * 0.85).round(),
    );
    let zero_y = area.center().y;
    let amplitude = sound
        .as_slice()
        .iter()
        .map(|&v| i32::from(v).abs())
        .max()
        .unwrap_or(0)
        .max(1);
    let scale = area.height() / 2.0 / f64::from(amplitude);
    let to_y = |v: i16| zero_y - f64::from(v) * scale;

    let mut sketch = Sketch::new();
    sketch
        .stroke(&area, Color::BLACK, 1.0)
        .stroke(
            &Line::new((area.x0, zero_y), (area.x1, zero_y)),
            Color::BLACK,
            1.0,
        );
    if let Some(trace) = trace(sound.as_slice(), area, to_y) {
        sketch.stroke(&trace, WAVE, 1.0);
    }

    let size = (h * 0.04).clamp(9.0, 18.0);
    let style = TextStyle {
        size,
        ..TextStyle::default()
    };
    let centered = TextPlacement {
        anchor: TextAnchor::Middle,
        rotation: 0.0,
    };
    let right = TextPlacement {
        anchor: TextAnchor::End,
        rotation: 0.0,
    };
    sketch
        .placed_text(w / 2.0, area.y0 * 0.7, &plot_title(sound), &style, Color::BLACK, centered)
        .placed_text(area.center().x, h - size * 0.6, X_LABEL, &style, Color::BLACK, centered)
        .placed_text(
            size * 1.2,
            zero_y,
            Y_LABEL,
            &style,
            Color::BLACK,
            TextPlacement {
                anchor: TextAnchor::Middle,
                rotation: -90.0,
            },
        )
        .placed_text(area.x0 - 4.0, zero_y + size / 3.0, "0", &style, Color::BLACK, right)
        .placed_text(area.x0 - 4.0, area.y0 + size / 3.0, &amplitude.to_string(), &style, Color::BLACK, right)
        .placed_text(
            area.x0 - 4.0,
            area.y1 + size / 3.0,
            &(-amplitude).to_string(),
            &style,
            Color::BLACK,
            right,
        )
        .placed_text(area.x0, area.y1 + size * 1.2, "1", &style, Color::BLACK, centered)
        .placed_text(
            area.x1,
            area.y1 + size * 1.2,
            &sound.len().to_string(),
            &style,
            Color::BLACK,
            centered,
        );

    let mut picture = Picture::new(width, height, Color::WHITE);
    sketch.draw_on(&mut picture)?;
    picture.set_title(sound_label(sound));
    Ok(picture)
}

/// Polyline through the samples. When there are more samples than columns each column gets a
/// vertical stroke from its minimum to its maximum.
fn trace(samples: &[i16], area: Rect, to_y: impl Fn(i16) -> f64) -> Option<BezPath> {
    let n = samples.len();
    if n == 0 {
        return None;
    }
    let columns = area.width().max(1.0) as usize;
    let mut path = BezPath::new();

    if n <= columns {
        let step = if n > 1 { area.width() / (n - 1) as f64 } else { 0.0 };
        for (i, &v) in samples.iter().enumerate() {
            let p = Point::new(area.x0 + i as f64 * step, to_y(v));
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        if n == 1 {
            path.line_to(Point::new(area.x1, to_y(samples[0])));
        }
        return Some(path);
    }

    for c in 0..columns {
        let lo = c * n / columns;
        let hi = ((c + 1) * n / columns).max(lo + 1);
        let chunk = &samples[lo..hi.min(n)];
        let (min, max) = chunk
            .iter()
            .fold((i16::MAX, i16::MIN), |(a, b), &v| (a.min(v), b.max(v)));
        let x = area.x0 + c as f64 + 0.5;
        if c == 0 {
            path.move_to(Point::new(x, to_y(min)));
        } else {
            path.line_to(Point::new(x, to_y(min)));
        }
        path.line_to(Point::new(x, to_y(max)));
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picture::pixel::Pixel as _;

    #[test]
    fn titles_fall_back_without_a_file() {
        let s = Sound::silent(10, 22_050);
        assert_eq!(sound_label(&s), NO_FILE_NAME);
        assert_eq!(plot_title(&s), "No file name  (22050 samples/second)");
    }

    #[test]
    fn silent_sound_traces_the_zero_line() {
        let pic = waveform(&Sound::silent(100, 8000), 400, 300).unwrap();
        assert_eq!((pic.width(), pic.height()), (400, 300));
        // Plot area rows 30..255, so zero sits at 142.5.
        assert_eq!(pic.pixel(200, 142).unwrap().color(), WAVE);
        assert_eq!(pic.pixel(200, 100).unwrap().color(), Color::WHITE);
    }

    #[test]
    fn peak_reaches_the_top_of_the_plot() {
        let s = Sound::from_samples(vec![0, 1000, 0], 8000);
        let pic = waveform(&s, 400, 300).unwrap();
        // Middle sample sits at x = 60 + 320 / 2.
        assert!((28..=34).any(|y| pic.pixel(220, y).unwrap().color() == WAVE));
    }

    #[test]
    fn long_sounds_are_binned_per_column() {
        let samples: Vec<i16> = (0..10_000).map(|i| if i % 2 == 0 { 500 } else { -500 }).collect();
        let pic = waveform(&Sound::from_samples(samples, 8000), 200, 100).unwrap();
        // Every column spans the full range, so a row just above zero is solid.
        let row = 45;
        assert!((40..180).all(|x| pic.pixel(x, row).unwrap().color() == WAVE));
    }

    #[test]
    fn tiny_plots_are_rejected() {
        let err = waveform(&Sound::silent(1, 8000), 10, 300).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn huge_plots_are_rejected() {
        let sound = Sound::silent(1, 8000);
        let err = waveform(&sound, 640, u32::MAX).unwrap_err();
        assert!(matches!(err, MediaError::OutOfRange(_)));
        assert!(waveform(&sound, MAX_EXTENT + 1, 480).is_err());
    }
}
