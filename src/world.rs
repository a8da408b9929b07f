use crate::color::Color;
use crate::consts::SHADOW_NUDGE;
use crate::geometry::Primitive;
use crate::intersect::{ Hit, intersect, nearer };
use crate::light::{ DirectionalLight, lighting };
use crate::ray::Ray;
use crate::surface::Surface;
use crate::vector::Vector3;

/// A world with objects and light.
///
/// Worlds collect all primitives, the background and the lighting needed for
/// rendering. Most logic is performed within worlds for the ray tracer. A
/// world is never modified while it is being rendered.
#[derive(Clone, Debug, Default)]
pub struct World {
    pub background: Surface,
    pub ambient: Color,
    pub light_source: DirectionalLight,
    pub objects: Vec<Primitive>,
}

impl World {
    /// Creates a world with no objects.
    pub fn new(background: Surface, ambient: Color,
        light_source: DirectionalLight) -> World {
        World { background, ambient, light_source, objects: Vec::new() }
    }

    /// Intersects a ray against all objects in a world.
    ///
    /// Every object is tested in order and the nearest hit is kept. On an
    /// exact tie in `t`, the object listed first wins.
    pub fn trace(&self, r: &Ray) -> Option<Hit> {
        self.objects.iter()
            .fold(None, |closest, obj| nearer(closest, intersect(r, obj)))
    }

    /// Determines whether a point is shadowed.
    pub fn is_shadowed(&self, p: Vector3) -> bool {
        in_shadow(p, &self.light_source, &self.objects)
    }

    /// The color seen by a ray which strikes nothing.
    ///
    /// Procedural backgrounds are sampled where the ray crosses the `z = 0`
    /// plane, scaled from the ray direction alone.
    pub fn background_at(&self, r: &Ray) -> Color {
        match &self.background {
            Surface::Constant(c) => *c,
            Surface::Function(f) => {
                let n = -r.origin.z / r.direction.z;
                let sample = Vector3::new(
                    r.direction.x * n, r.direction.y * n, 0.0
                );

                f(r.origin, sample)
            },
        }
    }

    /// Calculates the color for a ray, given what (if anything) it hit.
    pub fn shade(&self, r: &Ray, hit: Option<&Hit>) -> Color {
        match hit {
            None => self.background_at(r),
            Some(h) => {
                let point = r.position(h.t);
                lighting(h, self.ambient, &self.light_source, -r.direction,
                    self.is_shadowed(point))
            },
        }
    }

    /// Determines a color based on the intersection of a ray and the objects.
    pub fn color_at(&self, r: &Ray) -> Color {
        let hit = self.trace(r);
        self.shade(r, hit.as_ref())
    }
}

/// Checks whether anything lies between a point and a directional light.
///
/// The point is first lifted slightly toward the light so that the surface
/// it sits on doesn't shadow itself. There is no distance bound; the light
/// is infinitely far away.
pub fn in_shadow(p: Vector3, light: &DirectionalLight, objects: &[Primitive])
    -> bool {
    let lifted = p + light.direction * SHADOW_NUDGE;
    let r = Ray::new(lifted, light.direction);

    objects.iter().any(|obj| obj.blocks(&r))
}

#[cfg(test)]
use crate::geometry::{ Sphere, Rectangle };

#[cfg(test)]
fn lit_world() -> World {
    let light = DirectionalLight::new(Vector3::new(0.0, 0.0, -1.0),
        Color::white()).unwrap();
    World::new(Color::black().into(), Color::rgb(0.25, 0.25, 0.25), light)
}

#[cfg(test)]
fn sphere(center: Vector3, radius: f64, color: Color) -> Primitive {
    Sphere::new(center, radius, color.into(), Color::black()).unwrap().into()
}

#[cfg(test)]
fn backdrop(z: f64, color: Color) -> Primitive {
    Rectangle::new(Vector3::new(-10.0, 10.0, z), 20.0, 20.0, color.into(),
        Color::black()).unwrap().into()
}

#[test]
fn trace_keeps_nearest_hit() {
    let mut w = lit_world();
    w.objects.push(sphere(Vector3::new(0.0, 0.0, 6.0), 2.0, Color::red()));
    w.objects.push(sphere(Vector3::new(0.0, 0.0, 5.0), 2.0, Color::blue()));

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));
    let h = w.trace(&r).expect("ray should hit both spheres");

    assert_eq!(h.t, 3.0);
    assert_eq!(h.surface_color, Color::blue());
}

#[test]
fn trace_tie_keeps_first_listed() {
    let mut w = lit_world();
    w.objects.push(backdrop(4.0, Color::green()));
    w.objects.push(backdrop(4.0, Color::red()));

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));
    let h = w.trace(&r).expect("ray should hit the backdrops");

    assert_eq!(h.t, 4.0);
    assert_eq!(h.surface_color, Color::green());
}

#[test]
fn trace_with_no_objects() {
    let w = lit_world();
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(w.trace(&r), None);
}

#[test]
fn shadow_with_nothing_in_the_way() {
    let mut w = lit_world();
    w.objects.push(backdrop(10.0, Color::white()));

    assert!(!w.is_shadowed(Vector3::new(0.0, 0.0, 10.0)));
}

#[test]
fn shadow_object_between_point_and_light() {
    let mut w = lit_world();
    w.objects.push(sphere(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::white()));

    assert!(w.is_shadowed(Vector3::new(0.0, 0.0, 10.0)));
}

#[test]
fn shadow_object_behind_point() {
    let mut w = lit_world();
    w.objects.push(sphere(Vector3::new(0.0, 0.0, 15.0), 1.0, Color::white()));

    assert!(!w.is_shadowed(Vector3::new(0.0, 0.0, 10.0)));
}

#[test]
fn sphere_does_not_shadow_its_own_lit_side() {
    let mut w = lit_world();
    w.objects.push(sphere(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::white()));

    // The front of the sphere faces the light.
    assert!(!w.is_shadowed(Vector3::new(0.0, 0.0, 4.0)));
}

#[test]
fn shaded_point_in_shadow_is_ambient_only() {
    let rect_color = Color::rgb(0.8, 0.6, 0.4);
    let r = Ray::new(Vector3::zero(), Vector3::new(3.0, 0.0, 10.0).normalize());

    let mut open = lit_world();
    open.objects.push(backdrop(10.0, rect_color));
    let lit = open.color_at(&r);

    for &c in [Color::white(), Color::green(), Color::black()].iter() {
        let mut w = lit_world();
        w.light_source.color = c;
        w.objects.push(backdrop(10.0, rect_color));
        w.objects.push(sphere(Vector3::new(3.0, 0.0, 5.0), 1.0, Color::red()));

        assert_eq!(w.color_at(&r), Color::rgb(0.2, 0.15, 0.1));
    }

    assert!(lit.r > 0.2);
}

#[test]
fn color_ray_miss_is_background() {
    let mut w = lit_world();
    w.background = Color::rgb(0.1, 0.2, 0.3).into();
    w.objects.push(sphere(Vector3::new(0.0, 0.0, 5.0), 1.0, Color::white()));

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(w.color_at(&r), Color::rgb(0.1, 0.2, 0.3));
}

#[test]
fn procedural_background_samples_z0_plane() {
    let mut w = lit_world();
    w.background = Surface::function(|origin, sample| {
        Color::rgb(sample.x, sample.y, -origin.z / 10.0)
    });

    let r = Ray::new(Vector3::new(0.0, 0.0, -4.0),
        Vector3::new(0.05, 0.02, 0.4));
    assert_eq!(w.color_at(&r), Color::rgb(0.5, 0.2, 0.4));
}

#[test]
fn color_ray_hit_lit_from_front() {
    let mut w = lit_world();
    w.objects.push(sphere(Vector3::new(0.0, 0.0, 5.0), 1.0,
        Color::rgb(0.5, 0.5, 0.5)));

    // Normal, light and eye all line up: ambient plus full diffuse.
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));
    assert_eq!(w.color_at(&r), Color::rgb(0.5, 0.5, 0.5));
}
