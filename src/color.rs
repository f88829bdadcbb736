use std::ops::{ Add, AddAssign, Sub, Mul, Div };

use crate::feq;

/// A linear RGB color.
///
/// Components are nominally in `0.0..=1.0`, but shading freely produces
/// values above one (bright highlights, summed lights); they are only clamped
/// when the canvas is written out.
///
/// # Examples
///
/// ```
/// # use pixie::color::Color;
/// let yellow = Color::rgb(1.0, 1.0, 0.0);
/// let purple = Color::rgb(1.0, 0.0, 1.0);
/// assert_eq!(yellow * purple, Color::red());
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Colors are compared component-wise within `FEQ_EPSILON`.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    pub fn black() -> Color {
        Color::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Color {
        Color::rgb(1.0, 1.0, 1.0)
    }

    pub fn red() -> Color {
        Color::rgb(1.0, 0.0, 0.0)
    }

    pub fn green() -> Color {
        Color::rgb(0.0, 1.0, 0.0)
    }

    pub fn blue() -> Color {
        Color::rgb(0.0, 0.0, 1.0)
    }

    /// Component-wise product, used to tint light by a surface color.
    pub fn hadamard(c1: &Color, c2: &Color) -> Color {
        Color::rgb(c1.r * c2.r, c1.g * c2.g, c1.b * c2.b)
    }

    /// Clamps each component to `0..=255`, rounding to the nearest byte.
    pub fn to_bytes(&self) -> [u8; 3] {
        let byte = |c: f64| (c.max(0.0).min(1.0) * 255.0).round() as u8;

        [byte(self.r), byte(self.g), byte(self.b)]
    }
}

impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Color {
        Color::rgb(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

impl AddAssign<Color> for Color {
    fn add_assign(&mut self, other: Color) {
        *self = *self + other;
    }
}

impl Sub<Color> for Color {
    type Output = Color;

    fn sub(self, other: Color) -> Color {
        Color::rgb(self.r - other.r, self.g - other.g, self.b - other.b)
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, s: f64) -> Color {
        Color::rgb(self.r * s, self.g * s, self.b * s)
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, c: Color) -> Color {
        c * self
    }
}

/// `c1 * c2` is shorthand for `Color::hadamard(&c1, &c2)`.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Color {
        Color::hadamard(&self, &other)
    }
}

impl Div<f64> for Color {
    type Output = Color;

    fn div(self, s: f64) -> Color {
        Color::rgb(self.r / s, self.g / s, self.b / s)
    }
}

#[test]
fn add_colors() {
    let mut c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 + c2, Color::rgb(1.6, 0.7, 1.0));

    c1 += c2;
    assert_eq!(c1, Color::rgb(1.6, 0.7, 1.0));
}

#[test]
fn subtract_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 - c2, Color::rgb(0.2, 0.5, 0.5));
}

#[test]
fn scale_colors() {
    let c = Color::rgb(0.2, 0.3, 0.4);

    assert_eq!(c * 2.0, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(2.0 * c, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(c / 2.0, Color::rgb(0.1, 0.15, 0.2));
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(1.0, 0.2, 0.4);
    let c2 = Color::rgb(0.9, 1.0, 0.1);

    assert_eq!(c1 * c2, Color::rgb(0.9, 0.2, 0.04));
}

#[test]
fn bytes_are_clamped() {
    assert_eq!(Color::rgb(1.5, 0.0, -0.5).to_bytes(), [255, 0, 0]);
    assert_eq!(Color::rgb(0.0, 0.5, 1.0).to_bytes(), [0, 128, 255]);
}
