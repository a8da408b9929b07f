use crate::color::Color;
use crate::ray::Ray;
use crate::vector::Vector3;
use crate::geometry::Primitive;

/// A ray striking a primitive.
///
/// Parameter `t` is the offset along the ray, always positive. The other
/// fields are resolved at the hit point when the hit is built, so a `Hit`
/// owns everything shading needs and borrows nothing from the scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    /// The "time" of the ray intersection.
    pub t: f64,

    /// The color of the surface where the ray struck.
    pub surface_color: Color,

    /// The color scaling the specular highlight.
    pub shine: Color,

    /// The unit normal of the primitive at the hit point.
    pub normal: Vector3,
}

/// Intersects a ray with a single primitive.
///
/// Returns `None` for a miss. On a hit, the surface is evaluated at the hit
/// point: constant surfaces copy their color and procedural surfaces are
/// called with the primitive's reference point and the hit point.
pub fn intersect(ray: &Ray, obj: &Primitive) -> Option<Hit> {
    let t = obj.hit_distance(ray)?;
    let point = ray.position(t);

    Some(Hit {
        t,
        surface_color: obj.surface().color_at(obj.reference_point(), point),
        shine: obj.shine(),
        normal: obj.normal_at(point),
    })
}

/// Picks the nearer of two optional hits.
///
/// `current` is kept unless `candidate` is strictly closer, so among equally
/// distant hits the first one found wins.
pub fn nearer(current: Option<Hit>, candidate: Option<Hit>) -> Option<Hit> {
    match (current, candidate) {
        (Some(c), Some(n)) if n.t < c.t => Some(n),
        (None, n) => n,
        (c, _) => c,
    }
}

#[cfg(test)]
use crate::geometry::{ Sphere, Rectangle };
#[cfg(test)]
use crate::surface::Surface;

#[test]
fn intersect_sphere_builds_hit() {
    let s: Primitive = Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0,
        Color::red().into(), Color::rgb(0.5, 0.5, 0.5)).unwrap().into();
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    let h = intersect(&r, &s).expect("ray should hit the sphere");
    assert_eq!(h.t, 4.0);
    assert_eq!(h.surface_color, Color::red());
    assert_eq!(h.shine, Color::rgb(0.5, 0.5, 0.5));
    assert_eq!(h.normal, Vector3::new(0.0, 0.0, -1.0));
}

#[test]
fn intersect_miss_is_none() {
    let s: Primitive = Sphere::new(Vector3::new(0.0, 3.0, 5.0), 1.0,
        Color::red().into(), Color::black()).unwrap().into();
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(intersect(&r, &s), None);
}

#[test]
fn procedural_surface_sees_reference_and_hit_point() {
    let surface = Surface::function(|reference, p| {
        Color::rgb(reference.x, p.y.abs(), 0.0)
    });
    let rect: Primitive = Rectangle::new(Vector3::new(0.25, 1.0, 2.0), 1.0,
        2.0, surface, Color::black()).unwrap().into();
    let r = Ray::new(Vector3::new(0.5, -0.5, 0.0), Vector3::new(0.0, 0.0, 1.0));

    let h = intersect(&r, &rect).expect("ray should hit the rectangle");
    assert_eq!(h.t, 2.0);
    assert_eq!(h.surface_color, Color::rgb(0.25, 0.5, 0.0));
    assert_eq!(h.normal, Vector3::new(0.0, 0.0, -1.0));
}

#[cfg(test)]
fn hit_at(t: f64, c: Color) -> Hit {
    Hit { t, surface_color: c, shine: Color::black(), normal: Vector3::zero() }
}

#[test]
fn nearer_prefers_smaller_t() {
    let a = hit_at(3.0, Color::red());
    let b = hit_at(2.0, Color::blue());

    assert_eq!(nearer(Some(a), Some(b)), Some(b));
    assert_eq!(nearer(Some(b), Some(a)), Some(b));
    assert_eq!(nearer(None, Some(a)), Some(a));
    assert_eq!(nearer(Some(a), None), Some(a));
    assert_eq!(nearer(None, None), None);
}

#[test]
fn nearer_keeps_first_on_tie() {
    let a = hit_at(2.0, Color::red());
    let b = hit_at(2.0, Color::blue());

    assert_eq!(nearer(Some(a), Some(b)).map(|h| h.surface_color),
        Some(Color::red()));
}
