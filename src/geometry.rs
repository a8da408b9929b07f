use crate::color::Color;
use crate::error::SceneError;
use crate::ray::Ray;
use crate::surface::Surface;
use crate::vector::Vector3;

/// A sphere with a center and a radius.
#[derive(Clone, Debug)]
pub struct Sphere {
    pub center: Vector3,
    pub radius: f64,
    pub surface: Surface,
    pub shine: Color,
}

impl Sphere {
    /// Creates a sphere, rejecting negative radii.
    pub fn new(center: Vector3, radius: f64, surface: Surface, shine: Color)
        -> Result<Sphere, SceneError> {
        if radius < 0.0 {
            return Err(SceneError::NegativeRadius(radius));
        }

        Ok(Sphere { center, radius, surface, shine })
    }

    /// Finds where a ray enters the sphere.
    ///
    /// With `b = (o - c) . d` and `c' = |o - c|^2 - r^2`, the ray meets the
    /// sphere where `t^2 + 2bt + c' = 0`. Only the near root `-b - sqrt(d)`
    /// is ever reported, and only if it lies in front of the ray. A ray
    /// starting inside the sphere has a negative near root and therefore
    /// misses, even though the far root is positive.
    ///
    /// Tangent rays (`d == 0`) are misses as well.
    pub fn entry(&self, ray: &Ray) -> Option<f64> {
        let sphere_to_ray = ray.origin - self.center;

        let b = sphere_to_ray.dot(&ray.direction);
        let c = sphere_to_ray.dot(&sphere_to_ray) - self.radius.powi(2);
        let discriminant = b.powi(2) - c;

        if discriminant <= 0.0 {
            return None;
        }

        let t = -b - discriminant.sqrt();
        if t > 0.0 { Some(t) } else { None }
    }

    /// Returns the outward normal at a point on the sphere.
    pub fn normal_at(&self, at: Vector3) -> Vector3 {
        (at - self.center).normalize()
    }
}

/// An axis-aligned rectangle facing the camera.
///
/// The rectangle lies in the plane `z = upper_left.z` and spans
/// `[upper_left.x, upper_left.x + width]` horizontally and
/// `[upper_left.y - height, upper_left.y]` vertically.
#[derive(Clone, Debug)]
pub struct Rectangle {
    pub upper_left: Vector3,
    pub width: f64,
    pub height: f64,
    pub surface: Surface,
    pub shine: Color,
}

impl Rectangle {
    /// Creates a rectangle, rejecting negative widths and heights.
    pub fn new(upper_left: Vector3, width: f64, height: f64, surface: Surface,
        shine: Color) -> Result<Rectangle, SceneError> {
        if width < 0.0 {
            return Err(SceneError::NegativeWidth(width));
        }

        if height < 0.0 {
            return Err(SceneError::NegativeHeight(height));
        }

        Ok(Rectangle { upper_left, width, height, surface, shine })
    }

    /// The normal of every rectangle, pointing back toward the camera.
    pub fn normal() -> Vector3 {
        Vector3::new(0.0, 0.0, -1.0)
    }

    /// Finds where a ray crosses the rectangle.
    ///
    /// Bounds are inclusive on every edge. A ray parallel to the plane gives
    /// an infinite or NaN `t`, which fails the bounds checks below.
    pub fn crossing(&self, ray: &Ray) -> Option<f64> {
        let t = (self.upper_left.z - ray.origin.z) / ray.direction.z;
        if !(t > 0.0) {
            return None;
        }

        let p = ray.position(t);
        let ul = self.upper_left;
        let inside = p.x >= ul.x && p.x <= ul.x + self.width
            && p.y >= ul.y - self.height && p.y <= ul.y;

        if inside { Some(t) } else { None }
    }
}

/// Anything that can be placed in a scene.
#[derive(Clone, Debug)]
pub enum Primitive {
    Sphere(Sphere),
    Rectangle(Rectangle),
}

impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Primitive {
        Primitive::Sphere(s)
    }
}

impl From<Rectangle> for Primitive {
    fn from(r: Rectangle) -> Primitive {
        Primitive::Rectangle(r)
    }
}

impl Primitive {
    /// The `t` at which a ray strikes this primitive, if it does.
    pub fn hit_distance(&self, ray: &Ray) -> Option<f64> {
        match self {
            Primitive::Sphere(s) => s.entry(ray),
            Primitive::Rectangle(r) => r.crossing(ray),
        }
    }

    /// Whether a ray strikes this primitive, without building hit data.
    pub fn blocks(&self, ray: &Ray) -> bool {
        self.hit_distance(ray).is_some()
    }

    /// The point handed to procedural surfaces alongside the hit point.
    pub fn reference_point(&self) -> Vector3 {
        match self {
            Primitive::Sphere(s) => s.center,
            Primitive::Rectangle(r) => r.upper_left,
        }
    }

    pub fn normal_at(&self, at: Vector3) -> Vector3 {
        match self {
            Primitive::Sphere(s) => s.normal_at(at),
            Primitive::Rectangle(_) => Rectangle::normal(),
        }
    }

    pub fn surface(&self) -> &Surface {
        match self {
            Primitive::Sphere(s) => &s.surface,
            Primitive::Rectangle(r) => &r.surface,
        }
    }

    pub fn shine(&self) -> Color {
        match self {
            Primitive::Sphere(s) => s.shine,
            Primitive::Rectangle(r) => r.shine,
        }
    }
}

#[cfg(test)]
fn unit_sphere_at(center: Vector3) -> Sphere {
    Sphere::new(center, 1.0, Color::white().into(), Color::black()).unwrap()
}

#[test]
fn ray_pierces_sphere() {
    let s = unit_sphere_at(Vector3::zero());
    let r = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.entry(&r), Some(4.0));
}

#[test]
fn ray_is_tangent_to_sphere() {
    let s = unit_sphere_at(Vector3::zero());
    let r = Ray::new(Vector3::new(0.0, 1.0, -5.0), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.entry(&r), None);
}

#[test]
fn ray_misses_sphere() {
    let s = unit_sphere_at(Vector3::zero());
    let r = Ray::new(Vector3::new(0.0, 2.0, -5.0), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.entry(&r), None);
}

#[test]
fn sphere_is_behind_ray() {
    let s = unit_sphere_at(Vector3::zero());
    let r = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.entry(&r), None);
}

// Only the near root is reported, so a ray leaving the sphere from inside
// sees nothing. Rendering relies on this exact behavior.
#[test]
fn ray_inside_sphere_misses() {
    let s = unit_sphere_at(Vector3::zero());
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.entry(&r), None);
}

#[test]
fn sphere_round_trip_distance() {
    let center = Vector3::new(1.0, -2.0, 7.0);
    let radius = 2.5;
    let eps = 0.125;
    let s = Sphere::new(center, radius, Color::white().into(), Color::black())
        .unwrap();

    let u = Vector3::new(1.0, 2.0, -2.0).normalize();
    let r = Ray::new(center + u * (radius + eps), -u);

    let t = s.entry(&r).expect("ray aimed at the center should hit");
    assert!(crate::feq(t, eps));
    assert_eq!(s.normal_at(r.position(t)), u);
}

#[test]
fn zero_radius_sphere_is_never_hit() {
    let s = Sphere::new(Vector3::zero(), 0.0, Color::white().into(),
        Color::black()).unwrap();
    let r = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.entry(&r), None);
}

#[test]
fn negative_radius_is_rejected() {
    let s = Sphere::new(Vector3::zero(), -1.0, Color::white().into(),
        Color::black());

    assert!(matches!(s, Err(SceneError::NegativeRadius(_))));
}

#[test]
fn normal_on_sphere_nonaxial() {
    let s = unit_sphere_at(Vector3::new(0.0, 1.0, 0.0));
    let k = 3.0f64.sqrt() / 3.0;
    let n = s.normal_at(Vector3::new(k, 1.0 + k, k));

    assert_eq!(n, Vector3::new(k, k, k));
}

#[cfg(test)]
fn square() -> Rectangle {
    Rectangle::new(Vector3::new(-1.0, 1.0, 4.0), 2.0, 2.0,
        Color::blue().into(), Color::black()).unwrap()
}

#[test]
fn ray_hits_rectangle_center() {
    let rect = square();
    let center = Vector3::new(0.0, 0.0, 4.0);
    let r = Ray::new(Vector3::new(0.0, 0.0, -3.0), Vector3::new(0.0, 0.0, 1.0));

    let t = rect.crossing(&r).expect("ray at the center should hit");
    assert_eq!(r.position(t), center);
}

#[test]
fn rectangle_edges_are_inclusive() {
    let rect = square();
    let corner = Ray::new(Vector3::new(1.0, -1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0));
    let outside = Ray::new(Vector3::new(1.01, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(rect.crossing(&corner), Some(4.0));
    assert_eq!(rect.crossing(&outside), None);
}

#[test]
fn rectangle_behind_ray() {
    let rect = square();
    let r = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(rect.crossing(&r), None);
}

#[test]
fn ray_parallel_to_rectangle() {
    let rect = square();
    let r = Ray::new(Vector3::new(-5.0, 0.0, 4.0), Vector3::new(1.0, 0.0, 0.0));

    assert_eq!(rect.crossing(&r), None);
}

#[test]
fn negative_rectangle_sizes_are_rejected() {
    let w = Rectangle::new(Vector3::zero(), -1.0, 1.0, Color::white().into(),
        Color::black());
    let h = Rectangle::new(Vector3::zero(), 1.0, -1.0, Color::white().into(),
        Color::black());

    assert!(matches!(w, Err(SceneError::NegativeWidth(_))));
    assert!(matches!(h, Err(SceneError::NegativeHeight(_))));
}

#[test]
fn primitive_dispatch() {
    let p: Primitive = square().into();
    let r = Ray::new(Vector3::new(0.5, 0.5, 0.0), Vector3::new(0.0, 0.0, 1.0));

    assert!(p.blocks(&r));
    assert_eq!(p.reference_point(), Vector3::new(-1.0, 1.0, 4.0));
    assert_eq!(p.normal_at(r.position(4.0)), Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(p.shine(), Color::black());
}
