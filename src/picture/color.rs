use std::fmt;

/// Scale applied by [`Color::darker`] and inverted by [`Color::brighter`].
const SHADE_FACTOR: f64 = 0.7;

/// Immutable RGB color with 8 bits per channel.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const GRAY: Color = Color::new(128, 128, 128);
    pub const DARK_GRAY: Color = Color::new(64, 64, 64);
    pub const LIGHT_GRAY: Color = Color::new(192, 192, 192);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const ORANGE: Color = Color::new(255, 200, 0);
    pub const PINK: Color = Color::new(255, 175, 175);
    pub const MAGENTA: Color = Color::new(255, 0, 255);
    pub const CYAN: Color = Color::new(0, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from arbitrary integers, clamping each channel into `0..=255`.
    pub fn from_levels(r: i64, g: i64, b: i64) -> Self {
        let c = |v: i64| v.clamp(0, 255) as u8;
        Self::new(c(r), c(g), c(b))
    }

    /// Euclidean distance between two colors in RGB space.
    pub fn distance(self, other: Color) -> f64 {
        let d = |a: u8, b: u8| f64::from(a) - f64::from(b);
        let (dr, dg, db) = (d(self.r, other.r), d(self.g, other.g), d(self.b, other.b));
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Each channel scaled by 0.7 and truncated.
    pub fn darker(self) -> Self {
        let s = |v: u8| (f64::from(v) * SHADE_FACTOR) as u8;
        Self::new(s(self.r), s(self.g), s(self.b))
    }

    /// Each channel divided by 0.7, saturating at 255.
    ///
    /// Pure black becomes `(3, 3, 3)` and tiny non-zero channels are lifted to 3 first, so that
    /// repeated brightening always makes progress.
    pub fn brighter(self) -> Self {
        let floor = (1.0 / (1.0 - SHADE_FACTOR)) as u8;
        if self.r == 0 && self.g == 0 && self.b == 0 {
            return Self::new(floor, floor, floor);
        }
        let lift = |v: u8| {
            let v = if v > 0 && v < floor { floor } else { v };
            (f64::from(v) / SHADE_FACTOR).min(255.0) as u8
        };
        Self::new(lift(self.r), lift(self.g), lift(self.b))
    }

    pub fn to_rgb(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }

    /// `#rrggbb`, as used in SVG paint attributes.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<image::Rgb<u8>> for Color {
    fn from(px: image::Rgb<u8>) -> Self {
        let [r, g, b] = px.0;
        Self::new(r, g, b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "color r={} g={} b={}", self.r, self.g, self.b)
    }
}
