use crate::picture::color::Color;

/// Channels outside `0..=255` are clamped.
pub fn make_color(red: i64, green: i64, blue: i64) -> Color {
    Color::from_levels(red, green, blue)
}

pub fn distance(a: Color, b: Color) -> f64 {
    a.distance(b)
}

pub fn make_darker(color: Color) -> Color {
    color.darker()
}

pub fn make_lighter(color: Color) -> Color {
    color.brighter()
}

pub fn make_brighter(color: Color) -> Color {
    color.brighter()
}
