pub mod consts;

pub mod vector;
pub mod ray;
pub mod color;

pub mod error;
pub mod surface;
pub mod geometry;
pub mod intersect;
pub mod light;
pub mod world;

pub mod camera;
pub mod canvas;
pub mod scene;

use consts::FEQ_EPSILON;

/// Compares two floats, tolerating rounding error.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
