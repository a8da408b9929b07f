use log::debug;
use rayon::prelude::*;
use rayon::ThreadPoolBuildError;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::error::SceneError;
use crate::ray::Ray;
use crate::vector::Vector3;
use crate::world::World;

/// A camera record for generating a canvas.
///
/// The camera sits on the z axis at `(0, 0, camera_z)` and looks toward
/// increasing z, through a viewport lying on the `z = 0` plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    camera_z: f64,
    width: usize,
    height: usize,
}

impl Camera {
    /// Creates a camera.
    ///
    /// Images need at least one pixel along each axis, at most `u32::MAX`
    /// along either, and a pixel count that fits in a `usize`.
    pub fn new(camera_z: f64, width: usize, height: usize)
        -> Result<Camera, SceneError> {
        if width == 0 || height == 0 {
            return Err(SceneError::EmptyImage { width, height });
        }

        let max_side = u32::MAX as usize;
        if width > max_side || height > max_side
            || width.checked_mul(height).is_none() {
            return Err(SceneError::ImageTooLarge { width, height });
        }

        Ok(Camera { camera_z, width, height })
    }

    /// Where the camera sits along the z axis.
    pub fn camera_z(&self) -> f64 {
        self.camera_z
    }

    /// The horizontal size of the resultant canvas.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The vertical size of the resultant canvas.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn position(&self) -> Vector3 {
        Vector3::new(0.0, 0.0, self.camera_z)
    }

    /// Builds the ray through a pixel. Rows and columns are one-indexed.
    ///
    /// If the pixel's logical point coincides with the camera there is no
    /// direction to normalize, so the ray looks straight down the z axis.
    pub fn ray_for_pixel(&self, row: usize, col: usize) -> Ray {
        let origin = self.position();
        let pixel = logical_coord(self.height, self.width, row, col);

        let offset = pixel - origin;
        let direction = if offset.magnitude() > 0.0 {
            offset.normalize()
        } else {
            Vector3::new(0.0, 0.0, 1.0)
        };

        Ray::new(origin, direction)
    }

    /// Renders every pixel of a world, one after another.
    pub fn render(&self, w: &World) -> Canvas {
        let mut image = Canvas::new(self.width, self.height);

        for row in 1..=self.height {
            for col in 1..=self.width {
                let ray = self.ray_for_pixel(row, col);
                let color = w.color_at(&ray);
                image.write_pixel(col - 1, row - 1, &color);
            }
        }

        image
    }

    /// Renders a world with rows spread across a thread pool.
    ///
    /// With `threads == 0` the global rayon pool is used. Pixels never
    /// depend on each other, so the result is identical to `render`.
    pub fn render_parallel(&self, w: &World, threads: usize)
        -> Result<Canvas, ThreadPoolBuildError> {
        let mut image = Canvas::new(self.width, self.height);
        let width = self.width;

        let fill = |pixels: &mut [Color]| {
            pixels.par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, pixel) in row.iter_mut().enumerate() {
                        let ray = self.ray_for_pixel(y + 1, x + 1);
                        *pixel = w.color_at(&ray);
                    }
                });
        };

        if threads == 0 {
            fill(image.pixels_mut());
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            debug!("built a pool of {} render threads", threads);
            pool.install(|| fill(image.pixels_mut()));
        }

        Ok(image)
    }
}

/// Maps a one-indexed pixel to its point on the `z = 0` viewport.
///
/// The viewport spans `[-1, 1]` along the larger image dimension; the
/// smaller one is shrunk by the aspect ratio so that pixels stay square.
/// Points land on pixel centers.
pub fn logical_coord(image_height: usize, image_width: usize,
    row: usize, col: usize) -> Vector3 {
    let (w, h) = (image_width as f64, image_height as f64);

    let mut x_init = -1.0;
    let mut y_init = 1.0;
    let mut side = 2.0 / w;

    if image_width > image_height {
        y_init *= h / w;
    } else if image_width < image_height {
        x_init *= w / h;
        side = 2.0 / h;
    }

    let x = x_init + 0.5 * side + (col as f64 - 1.0) * side;
    let y = y_init - 0.5 * side - (row as f64 - 1.0) * side;

    Vector3::new(x, y, 0.0)
}

#[cfg(test)]
use crate::geometry::Sphere;
#[cfg(test)]
use crate::light::DirectionalLight;

#[test]
fn logical_coord_square_corners() {
    assert_eq!(logical_coord(2, 2, 1, 1), Vector3::new(-0.5, 0.5, 0.0));
    assert_eq!(logical_coord(2, 2, 2, 2), Vector3::new(0.5, -0.5, 0.0));
}

#[test]
fn logical_coord_single_pixel_is_origin() {
    assert_eq!(logical_coord(1, 1, 1, 1), Vector3::zero());
}

#[test]
fn logical_coord_wide_image() {
    // 4x2: side 0.5, vertical extent shrinks to [-0.5, 0.5].
    assert_eq!(logical_coord(2, 4, 1, 1), Vector3::new(-0.75, 0.25, 0.0));
    assert_eq!(logical_coord(2, 4, 2, 4), Vector3::new(0.75, -0.25, 0.0));
}

#[test]
fn logical_coord_tall_image() {
    // 2x4: side 0.5, horizontal extent shrinks to [-0.5, 0.5].
    assert_eq!(logical_coord(4, 2, 1, 1), Vector3::new(-0.25, 0.75, 0.0));
    assert_eq!(logical_coord(4, 2, 4, 2), Vector3::new(0.25, -0.75, 0.0));
}

#[test]
fn ray_through_center() {
    let c = Camera::new(-1.0, 3, 3).unwrap();
    let r = c.ray_for_pixel(2, 2);

    assert_eq!(r.origin, Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(r.direction, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_through_corner() {
    let c = Camera::new(-1.0, 2, 2).unwrap();
    let r = c.ray_for_pixel(1, 1);

    let k = 1.0 / 1.5f64.sqrt();
    assert_eq!(r.direction, Vector3::new(-0.5 * k, 0.5 * k, k));
    assert!(crate::feq(r.direction.magnitude(), 1.0));
}

#[test]
fn camera_on_viewport_looks_down_z() {
    let c = Camera::new(0.0, 1, 1).unwrap();
    let r = c.ray_for_pixel(1, 1);

    assert_eq!(r.origin, Vector3::zero());
    assert_eq!(r.direction, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn empty_image_is_rejected() {
    assert!(matches!(Camera::new(-1.0, 0, 4),
        Err(SceneError::EmptyImage { width: 0, height: 4 })));
}

#[test]
fn oversized_image_is_rejected() {
    let side = u32::MAX as usize + 1;

    assert!(matches!(Camera::new(-1.0, side, 1),
        Err(SceneError::ImageTooLarge { .. })));
    assert!(matches!(Camera::new(-1.0, side, side),
        Err(SceneError::ImageTooLarge { .. })));
    assert!(Camera::new(-1.0, u32::MAX as usize, 1).is_ok());
}

#[cfg(test)]
fn ambient_sphere_world() -> World {
    let light = DirectionalLight::new(Vector3::new(0.0, 0.0, -1.0),
        Color::black()).unwrap();
    let mut w = World::new(Color::black().into(), Color::white(), light);
    w.objects.push(Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0,
        Color::white().into(), Color::black()).unwrap().into());
    w
}

#[test]
fn render_single_pixel_ambient_sphere() {
    let w = ambient_sphere_world();
    let c = Camera::new(0.0, 1, 1).unwrap();

    let image = c.render(&w);
    assert_eq!(image.read_pixel(0, 0).unwrap(), Color::white());
}

#[test]
fn render_miss_is_background() {
    let mut w = ambient_sphere_world();
    w.background = Color::rgb(0.2, 0.4, 0.6).into();
    w.objects.clear();
    let c = Camera::new(-1.0, 2, 2).unwrap();

    let image = c.render(&w);
    assert!(image.pixels().iter().all(|&p| p == Color::rgb(0.2, 0.4, 0.6)));
}

#[test]
fn parallel_render_matches_serial() {
    let w = ambient_sphere_world();
    let c = Camera::new(-2.0, 7, 5).unwrap();

    let serial = c.render(&w);
    assert_eq!(c.render_parallel(&w, 2).unwrap(), serial);
    assert_eq!(c.render_parallel(&w, 0).unwrap(), serial);
}
