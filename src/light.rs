use crate::color::Color;
use crate::consts::SPECULAR_EXPONENT;
use crate::error::SceneError;
use crate::intersect::Hit;
use crate::vector::Vector3;

/// A directional light.
///
/// A light infinitely far away: every point sees it from the same direction
/// and at the same intensity. `direction` is a unit vector pointing *at* the
/// light.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3,
    pub color: Color,
}

impl DirectionalLight {
    /// Creates a directional light.
    ///
    /// `direction` need not be unit length, it is normalized here. A
    /// zero-length direction has no meaning and is rejected.
    pub fn new(direction: Vector3, color: Color)
        -> Result<DirectionalLight, SceneError> {
        let mag = direction.magnitude();
        if !(mag > 0.0) || !mag.is_finite() {
            return Err(SceneError::ZeroLightDirection);
        }

        Ok(DirectionalLight { direction: direction.normalize(), color })
    }
}

/// Calculate the color of a hit under ambient and directional light.
///
/// Takes the hit, the scene's ambient light, its directional light and the
/// eye vector (pointing from the hit back toward the ray origin), and
/// calculates how the surface looks from the eye.
///
/// If the hit is in a shadow (parameter `in_shadow`), only ambient light is
/// used.
pub fn lighting(hit: &Hit, ambient: Color, light: &DirectionalLight,
    eyev: Vector3, in_shadow: bool) -> Color {
    let k = hit.surface_color;

    // A shadowed surface only absorbs the ambient light
    if in_shadow {
        return k * ambient;
    }

    let light_dot_normal = hit.normal.dot(&light.direction);

    // Surfaces turned away from the light only receive ambient light
    let diffuse = k * (ambient + light.color * light_dot_normal.max(0.0));

    let specular = if light_dot_normal <= 0.0 {
        Color::black()
    } else {
        let reflectv = light.direction.reflect(&hit.normal);
        let reflect_dot_eye = reflectv.dot(&eyev).max(0.0);
        hit.shine * reflect_dot_eye.powi(SPECULAR_EXPONENT)
    };

    diffuse + specular
}

#[cfg(test)]
fn grey(v: f64) -> Color {
    Color::rgb(v, v, v)
}

#[cfg(test)]
fn facing_camera() -> Hit {
    Hit {
        t: 1.0,
        surface_color: grey(0.5),
        shine: grey(0.25),
        normal: Vector3::new(0.0, 0.0, -1.0),
    }
}

#[cfg(test)]
fn light_toward(x: f64, y: f64, z: f64) -> DirectionalLight {
    DirectionalLight::new(Vector3::new(x, y, z), grey(0.5)).unwrap()
}

#[test]
fn light_direction_is_normalized() {
    let l = DirectionalLight::new(Vector3::new(-1.0, 1.0, -1.0), Color::white())
        .unwrap();

    let k = 1.0 / 3.0f64.sqrt();
    assert_eq!(l.direction, Vector3::new(-k, k, -k));
}

#[test]
fn zero_light_direction_is_rejected() {
    let l = DirectionalLight::new(Vector3::zero(), Color::white());

    assert!(matches!(l, Err(SceneError::ZeroLightDirection)));
}

#[test]
fn eye_between_light_and_surface() {
    let eyev = Vector3::new(0.0, 0.0, -1.0);
    let light = light_toward(0.0, 0.0, -1.0);

    let res = lighting(&facing_camera(), grey(0.1), &light, eyev, false);
    assert_eq!(res, grey(0.55));
}

#[test]
fn eye_between_light_and_surface_offset_45() {
    let k = 2.0f64.sqrt() / 2.0;
    let eyev = Vector3::new(0.0, k, -k);
    let light = light_toward(0.0, 0.0, -1.0);

    let res = lighting(&facing_camera(), grey(0.1), &light, eyev, false);
    assert_eq!(res, grey(0.33125));
}

#[test]
fn eye_opposite_surface_light_offset_45() {
    let eyev = Vector3::new(0.0, 0.0, -1.0);
    let light = light_toward(0.0, 1.0, -1.0);

    let res = lighting(&facing_camera(), grey(0.1), &light, eyev, false);
    assert_eq!(res, grey(0.258027));
}

#[test]
fn eye_in_path_of_reflection() {
    let k = 2.0f64.sqrt() / 2.0;
    let eyev = Vector3::new(0.0, -k, -k);
    let light = light_toward(0.0, 1.0, -1.0);

    let res = lighting(&facing_camera(), grey(0.1), &light, eyev, false);
    assert_eq!(res, grey(0.476777));
}

#[test]
fn light_behind_surface() {
    let eyev = Vector3::new(0.0, 0.0, -1.0);
    let light = light_toward(0.0, 0.0, 1.0);

    let res = lighting(&facing_camera(), grey(0.1), &light, eyev, false);
    assert_eq!(res, grey(0.05));
}

#[test]
fn shadowed_surface_is_ambient_only() {
    let eyev = Vector3::new(0.0, 0.0, -1.0);

    for &c in [Color::white(), Color::red(), grey(0.3)].iter() {
        let light = DirectionalLight::new(Vector3::new(0.0, 0.0, -1.0), c)
            .unwrap();
        let res = lighting(&facing_camera(), grey(0.1), &light, eyev, true);
        assert_eq!(res, grey(0.05));
    }
}

#[test]
fn bright_lighting_saturates() {
    let eyev = Vector3::new(0.0, 0.0, -1.0);
    let light = DirectionalLight::new(Vector3::new(0.0, 0.0, -1.0),
        Color::white()).unwrap();
    let hit = Hit { surface_color: Color::white(), shine: Color::white(),
        ..facing_camera() };

    let res = lighting(&hit, Color::white(), &light, eyev, false);
    assert_eq!(res, Color::white());
}
