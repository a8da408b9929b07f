use std::fmt;
use std::sync::Arc;

use crate::color::Color;
use crate::error::SceneError;
use crate::vector::Vector3;

/// A procedural color rule.
///
/// Called with a reference point of the thing being colored (a sphere's
/// center, a rectangle's upper-left corner, or the ray origin for
/// backgrounds) and the point being sampled.
pub type ColorFn = Arc<dyn Fn(Vector3, Vector3) -> Color + Send + Sync>;

/// The appearance of a primitive or of the background.
#[derive(Clone)]
pub enum Surface {
    /// The same color everywhere.
    Constant(Color),

    /// A color computed per sample point.
    Function(ColorFn),
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Constant(c) => f.debug_tuple("Constant").field(c).finish(),
            Surface::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl Default for Surface {
    fn default() -> Surface {
        Surface::Constant(Color::black())
    }
}

impl From<Color> for Surface {
    fn from(c: Color) -> Surface {
        Surface::Constant(c)
    }
}

impl Surface {
    /// Wraps a closure as a procedural surface.
    pub fn function<F>(f: F) -> Surface
        where F: Fn(Vector3, Vector3) -> Color + Send + Sync + 'static {
        Surface::Function(Arc::new(f))
    }

    /// Looks up one of the built-in procedural surfaces by name.
    pub fn named(name: &str) -> Result<Surface, SceneError> {
        let f: fn(Vector3, Vector3) -> Color = match name {
            "ripple" => ripple,
            "swirl" => swirl,
            "sunset" => sunset,
            _ => return Err(SceneError::UnknownSurface(name.to_string())),
        };

        Ok(Surface::function(f))
    }

    /// Resolves the color of this surface at `point`.
    ///
    /// Constant surfaces hand back a copy of their color; the result of a
    /// procedural surface belongs to the caller outright.
    pub fn color_at(&self, reference: Vector3, point: Vector3) -> Color {
        match self {
            Surface::Constant(c) => *c,
            Surface::Function(f) => f(reference, point),
        }
    }
}

/// Diagonal sine bands along `x + y + z`, tinted blue.
pub fn ripple(_reference: Vector3, p: Vector3) -> Color {
    let d = ((p.x + p.y + p.z) * 16.0).sin() / 2.0 + 0.5;
    Color::rgb(d / 2.0, d / 1.5, d)
}

/// Cosine bands along `x + y*z` over a red base.
pub fn swirl(_reference: Vector3, p: Vector3) -> Color {
    let d = ((p.x + p.y * p.z) * 2.0).cos() / 2.0 + 0.5;
    Color::rgb(1.0, d / 1.5, d / 1.1)
}

/// A vertical gradient from orange at the horizon to violet overhead.
///
/// Meant for backgrounds, where `p` is the ray's sample on the `z = 0`
/// plane. Steep rays leave `[0, 1]`; the image writer pins them.
pub fn sunset(_reference: Vector3, p: Vector3) -> Color {
    let grad = (1.0 + p.y) / 2.0;
    Color::rgb((1.0 - grad) / 1.5, 0.0, grad / 2.0)
}

#[test]
fn constant_surface_ignores_points() {
    let s = Surface::from(Color::green());

    assert_eq!(s.color_at(Vector3::zero(), Vector3::new(4.0, -2.0, 9.0)),
        Color::green());
}

#[test]
fn function_surface_receives_reference_and_point() {
    let s = Surface::function(|r, p| Color::rgb(r.x, p.y, 0.0));

    assert_eq!(
        s.color_at(Vector3::new(0.25, 0.0, 0.0), Vector3::new(0.0, 0.75, 0.0)),
        Color::rgb(0.25, 0.75, 0.0)
    );
}

#[test]
fn ripple_at_origin() {
    assert_eq!(ripple(Vector3::zero(), Vector3::zero()),
        Color::rgb(0.25, 0.5 / 1.5, 0.5));
}

#[test]
fn swirl_at_origin() {
    assert_eq!(swirl(Vector3::zero(), Vector3::zero()),
        Color::rgb(1.0, 1.0 / 1.5, 1.0 / 1.1));
}

#[test]
fn sunset_gradient() {
    let horizon = sunset(Vector3::zero(), Vector3::new(0.0, -1.0, 0.0));
    let zenith = sunset(Vector3::zero(), Vector3::new(0.0, 1.0, 0.0));
    let beyond = sunset(Vector3::zero(), Vector3::new(0.0, 7.0, 0.0));

    assert_eq!(horizon, Color::rgb(1.0 / 1.5, 0.0, 0.0));
    assert_eq!(zenith, Color::rgb(0.0, 0.0, 0.5));
    assert_eq!(beyond, Color::rgb(-2.0, 0.0, 2.0));
    assert_eq!(beyond.to_rgb8(), [0, 0, 255]);
}

#[test]
fn named_surfaces() {
    assert!(Surface::named("ripple").is_ok());
    assert!(Surface::named("sunset").is_ok());
    assert!(matches!(Surface::named("plaid"),
        Err(SceneError::UnknownSurface(ref n)) if n == "plaid"));
}
