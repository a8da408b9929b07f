use std::fmt;
use std::ops::{ Add, Mul };

use crate::consts::MAX_CHANNEL;
use crate::feq;

/// A color.
///
/// Represented conventionally with red-green-blue (RGB) values. Each value
/// ranges from 0.0 to 1.0 inclusive. The combinators on `Color` keep it that
/// way: addition and scaling clamp every channel to at most 1.0, and
/// modulation can never exceed either of its inputs.
///
/// # Examples
///
/// Construct the color red:
///
/// ```
/// # use scene_tracer::color::Color;
/// let red = Color::red();
/// assert_eq!(red, Color::rgb(1.0, 0.0, 0.0));
/// ```
///
/// Adding saturates instead of overflowing:
///
/// ```
/// # use scene_tracer::color::Color;
/// let sum = Color::rgb(0.75, 0.5, 0.0) + Color::rgb(0.5, 0.25, 0.0);
/// assert_eq!(sum, Color::rgb(1.0, 0.75, 0.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Similar to the `PartialEq` implementation on `Vector3`, `Color`s are
/// compared component-wise, accounting for possible floating point error in
/// comparisons.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl From<[f64; 3]> for Color {
    fn from(c: [f64; 3]) -> Color {
        Color { r: c[0], g: c[1], b: c[2] }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// The color black.
    pub fn black() -> Color {
        Color {
            r: 0.0,
            g: 0.0,
            b: 0.0
        }
    }

    /// The color white.
    pub fn white() -> Color {
        Color {
            r: 1.0,
            g: 1.0,
            b: 1.0
        }
    }

    /// The color red.
    pub fn red() -> Color {
        Color {
            r: 1.0,
            g: 0.0,
            b: 0.0
        }
    }

    /// The color green.
    pub fn green() -> Color {
        Color {
            r: 0.0,
            g: 1.0,
            b: 0.0
        }
    }

    /// The color blue.
    pub fn blue() -> Color {
        Color {
            r: 0.0,
            g: 0.0,
            b: 1.0
        }
    }

    /// Modulates one color by another.
    ///
    /// This is provided as an associated function of `Color` to prevent
    /// possible confusion with the `*` operator.
    ///
    /// Each component of the two colors is multiplied, yielding a new color
    /// containing those products. This is how a surface absorbs part of the
    /// light falling on it. Since both inputs are in `[0, 1]`, no clamping is
    /// needed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use scene_tracer::color::Color;
    /// let yellow = Color::rgb(1.0, 1.0, 0.0);
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let product = Color::modulate(&yellow, &purple);
    /// assert_eq!(product, Color::red());
    /// ```
    pub fn modulate(c1: &Color, c2: &Color) -> Color {
        let r = c1.r * c2.r;
        let g = c1.g * c2.g;
        let b = c1.b * c2.b;

        Color { r, g, b }
    }

    /// Scales a color, clamping each channel to at most 1.0.
    pub fn scale(scalar: f64, c: &Color) -> Color {
        Color {
            r: clamp_channel(c.r * scalar),
            g: clamp_channel(c.g * scalar),
            b: clamp_channel(c.b * scalar),
        }
    }

    /// Converts the color to 8-bit channels, rounding down.
    ///
    /// Values outside `[0, 1]` are pinned to the representable range.
    pub fn to_rgb8(&self) -> [u8; 3] {
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
        ]
    }
}

fn clamp_channel(c: f64) -> f64 {
    if c > 1.0 { 1.0 } else { c }
}

fn quantize(c: f64) -> u8 {
    (c * MAX_CHANNEL).floor().clamp(0.0, MAX_CHANNEL) as u8
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(r={},g={},b={})", self.r, self.g, self.b)
    }
}

/// Adds two colors together.
///
/// Components are added together individually, then clamped to 1.0.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: clamp_channel(self.r + other.r),
            g: clamp_channel(self.g + other.g),
            b: clamp_channel(self.b + other.b),
        }
    }
}

/// Multiplies a color by a scalar.
///
/// Shorthand for `Color::scale`; each component is clamped to 1.0.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color::scale(other, &self)
    }
}

/// Multiplies a scalar by a color.
///
/// Returns a color with each component multiplied by the scalar.
impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color::scale(self, &other)
    }
}

/// Multiplies a color by a color.
///
/// For colors `c1` and `c2`, `c1 * c2` is shorthand for
/// `Color::modulate(&c1, &c2)`.
///
/// # Examples
///
/// ```
/// # use scene_tracer::color::Color;
/// let c1 = Color::red();
/// let c2 = Color::blue();
/// assert_eq!(c1 * c2, Color::modulate(&c1, &c2));
/// ```
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color::modulate(&self, &other)
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.4, 0.6, 0.75);
    let c2 = Color::rgb(0.3, 0.1, 0.25);

    assert_eq!(c1 + c2, Color::rgb(0.7, 0.7, 1.0));
}

#[test]
fn add_colors_clamps() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);
    let sum = c1 + c2;

    assert_eq!(sum, Color::rgb(1.0, 0.7, 1.0));
    assert!(sum.r <= 1.0 && sum.g <= 1.0 && sum.b <= 1.0);
}

#[test]
fn scale_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);

    assert_eq!(c1 * 2.0, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(0.5 * c1, Color::rgb(0.1, 0.15, 0.2));
}

#[test]
fn scale_colors_clamps() {
    let c = Color::rgb(0.2, 0.6, 0.9);
    let scaled = Color::scale(3.0, &c);

    assert_eq!(scaled, Color::rgb(0.6, 1.0, 1.0));
    assert!(scaled.r <= 1.0 && scaled.g <= 1.0 && scaled.b <= 1.0);
}

#[test]
fn modulate_white_is_idempotent() {
    let w = Color::white();

    assert_eq!(Color::modulate(&w, &w), Color::white());
    assert_eq!(w * w * w, Color::white());
}

#[test]
fn modulate_colors() {
    let c1 = Color::rgb(1.0, 0.2, 0.4);
    let c2 = Color::rgb(0.9, 1.0, 0.1);

    assert_eq!(c1 * c2, Color::rgb(0.9, 0.2, 0.04));
}

#[test]
fn quantize_rounds_down() {
    assert_eq!(Color::white().to_rgb8(), [255, 255, 255]);
    assert_eq!(Color::rgb(0.5, 0.999, 0.0).to_rgb8(), [127, 254, 0]);
    assert_eq!(Color::rgb(-0.5, 2.0, 0.0).to_rgb8(), [0, 255, 0]);
}

#[test]
fn display_color() {
    assert_eq!(Color::rgb(1.0, 0.5, 0.0).to_string(), "(r=1,g=0.5,b=0)");
}
