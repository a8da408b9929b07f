use std::fmt;

use crate::vector::Vector3;

/// A ray with an origin and a direction.
///
/// The direction is expected to be unit length. Every consumer assumes this
/// and none of them re-validates it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Ray {
        Ray { origin, direction }
    }

    /// The point `t` units along the ray.
    pub fn position(&self, t: f64) -> Vector3 {
        self.origin + (t * self.direction)
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src {}, dir {}", self.origin, self.direction)
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(
                Vector3::new(2.0, 3.0, 4.0),
                Vector3::new(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Vector3::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Vector3::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Vector3::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Vector3::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_position_distance_law() {
    let origin = Vector3::new(-1.0, 0.5, 2.0);
    let r = Ray::new(origin, Vector3::new(1.0, -2.0, 2.0).normalize());

    for &t in [0.0, 0.25, 1.0, 3.5, -2.0].iter() {
        assert!(crate::feq(r.position(t).distance_to(&origin), t.abs()));
    }
}

#[test]
fn display_ray() {
    let r = Ray::new(Vector3::new(0.0, 0.0, -1.0), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(r.to_string(), "src <0,0,-1>, dir <0,0,1>");
}
