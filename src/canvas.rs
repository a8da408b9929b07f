use std::fs::File;
use std::io;
use std::io::{ BufWriter, Write };
use std::path::Path;

use image::{ ImageResult, Rgb, RgbImage };

use crate::color::Color;
use crate::consts::MAX_CHANNEL;

/// A canvas for drawing pixels.
///
/// This structure mostly stores the results of the ray tracer. Once the user
/// specifies the desired image width and height, the `Camera` generates rays
/// which are cast into a `World`.
///
/// The canvas stores the resultant colors for each pixel ray, row by row from
/// the top. Once rendering finishes, the `Canvas` can be written out as a
/// plain-text PPM image or as a PNG.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Writes the canvas as a plain-text (`P3`) PPM image.
    ///
    /// The header is followed by one `r g b` triple per line, in row-major
    /// order. Channels are scaled to 255 and rounded down.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // Write PPM header, as well as metadata
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "{}", MAX_CHANNEL)?; // Maximum color value

        for pixel in self.pixels.iter() {
            let [r, g, b] = pixel.to_rgb8();
            writeln!(out, "{} {} {}", r, g, b)?;
        }

        out.flush()
    }

    /// Saves a canvas to a PPM file.
    pub fn save_ppm(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)
    }

    /// Converts the canvas to an 8-bit RGB image.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let pixel = self.pixels[(y as usize * self.width) + x as usize];
            Rgb(pixel.to_rgb8())
        })
    }

    /// Saves a canvas to a PNG file.
    pub fn save_png(&self, path: &Path) -> ImageResult<()> {
        self.to_rgb_image().save(path)
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. Pixels are specified in row-column
    /// order, where `y` is the row of the pixel, and `x` is the column. Rows
    /// and columns are zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use scene_tracer::color::Color;
    /// # use scene_tracer::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// If the specified pixel location is out-of-bounds, `None` is returned.
    /// See method `write_pixel` for an example.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        // Return nothing if pixel is out-of-bounds
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// All pixels, row-major from the top-left corner.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Mutable access to all pixels, for filling whole rows at a time.
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(3, 2);

    assert_eq!(c.pixels().len(), 6);
    assert!(c.pixels().iter().all(|&p| p == Color::black()));
}

#[test]
fn out_of_bounds_pixels() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(2, 0, &Color::red());

    assert_eq!(c.read_pixel(2, 0), None);
    assert!(c.pixels().iter().all(|&p| p == Color::black()));
}

#[test]
fn ppm_header_and_pixels() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(0, 0, &Color::white());
    c.write_pixel(1, 0, &Color::rgb(0.5, 0.0, 1.0));
    c.write_pixel(1, 1, &Color::rgb(0.0, 0.999, 0.2));

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let expected = "P3\n2 2\n255\n\
                    255 255 255\n\
                    127 0 255\n\
                    0 0 0\n\
                    0 254 51\n";
    assert_eq!(text, expected);
}

#[test]
fn rgb_image_matches_canvas() {
    let mut c = Canvas::new(3, 1);
    c.write_pixel(2, 0, &Color::green());

    let img = c.to_rgb_image();
    assert_eq!(img.dimensions(), (3, 1));
    assert_eq!(img.get_pixel(2, 0), &Rgb([0, 255, 0]));
    assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
}
