use std::fs::File;
use std::io::{ BufWriter, Write };
use std::path::Path;

use crate::color::Color;
use crate::error::Result;

/// PPM lines never exceed this many characters.
const PPM_LINE_WIDTH: usize = 70;

/// A grid of colors, the result of a render.
///
/// Pixels are stored row by row, so row `y` occupies
/// `pixels[y * width..(y + 1) * width]`.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,

    pixels: Vec<Color>,
}

impl Canvas {
    /// A black canvas.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height],
        }
    }

    /// Writes a color at column `x`, row `y`. Out-of-bounds writes are
    /// ignored.
    ///
    /// ```
    /// # use pixie::color::Color;
    /// # use pixie::canvas::Canvas;
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, Color::red());
    /// assert_eq!(canvas.read_pixel(4, 2), Some(Color::red()));
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[y * self.width + x] = color;
    }

    /// The color at column `x`, row `y`, or `None` when out of bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(self.pixels[y * self.width + x])
    }

    /// All pixels, row by row. The render driver splits this into rows.
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Encodes the canvas as a plain (P3) PPM image.
    ///
    /// Components are clamped to `0..=255`. Every row starts on a new line
    /// and long rows wrap before `PPM_LINE_WIDTH` columns.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;

        if self.width == 0 {
            return Ok(());
        }

        for row in self.pixels.chunks(self.width) {
            let mut line = String::new();

            for value in row.iter().flat_map(|c| c.to_bytes().to_vec()) {
                let token = value.to_string();

                if !line.is_empty() && line.len() + 1 + token.len() > PPM_LINE_WIDTH {
                    writeln!(out, "{}", line)?;
                    line.clear();
                }

                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&token);
            }

            writeln!(out, "{}", line)?;
        }

        Ok(())
    }

    pub fn to_ppm(&self) -> String {
        let mut buf = Vec::new();

        // Writing into a Vec cannot fail
        if self.write_ppm(&mut buf).is_err() {
            return String::new();
        }

        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Saves the canvas as a PPM file at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()?;

        Ok(())
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.width, 10);
    assert_eq!(c.height, 20);
    for y in 0..20 {
        for x in 0..10 {
            assert_eq!(c.read_pixel(x, y), Some(Color::black()));
        }
    }
}

#[test]
fn write_and_read_pixels() {
    let mut c = Canvas::new(10, 20);
    c.write_pixel(2, 3, Color::red());
    c.write_pixel(10, 3, Color::red());

    assert_eq!(c.read_pixel(2, 3), Some(Color::red()));
    assert_eq!(c.read_pixel(10, 3), None);
}

#[test]
fn ppm_header() {
    let ppm = Canvas::new(5, 3).to_ppm();
    let lines: Vec<&str> = ppm.lines().take(3).collect();

    assert_eq!(lines, vec!["P3", "5 3", "255"]);
}

#[test]
fn ppm_pixel_data_is_clamped() {
    let mut c = Canvas::new(5, 3);
    c.write_pixel(0, 0, Color::rgb(1.5, 0.0, 0.0));
    c.write_pixel(2, 1, Color::rgb(0.0, 0.5, 0.0));
    c.write_pixel(4, 2, Color::rgb(-0.5, 0.0, 1.0));

    let ppm = c.to_ppm();
    let lines: Vec<&str> = ppm.lines().skip(3).collect();

    assert_eq!(lines, vec![
        "255 0 0 0 0 0 0 0 0 0 0 0 0 0 0",
        "0 0 0 0 0 0 0 128 0 0 0 0 0 0 0",
        "0 0 0 0 0 0 0 0 0 0 0 0 0 0 255",
    ]);
}

#[test]
fn ppm_long_lines_are_split() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let ppm = c.to_ppm();
    let lines: Vec<&str> = ppm.lines().skip(3).collect();

    assert_eq!(lines, vec![
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204",
        "153 255 204 153 255 204 153 255 204 153 255 204 153",
        "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204",
        "153 255 204 153 255 204 153 255 204 153 255 204 153",
    ]);
    assert!(lines.iter().all(|l| l.len() <= PPM_LINE_WIDTH));
}

#[test]
fn ppm_ends_with_newline() {
    assert!(Canvas::new(5, 3).to_ppm().ends_with('\n'));
}
