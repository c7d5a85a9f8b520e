//! Raster render sink backed by the `image` crate

use handsketch_core::{Point, RenderSink, Rgb, Surface};
use image::{ImageFormat, Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("failed to save drawing to {path:?}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Paints render operations into an RGBA image.
///
/// Curves are rasterized by sampling the quadratic Bezier and stamping a
/// round pen of the current stroke width along it.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    image: RgbaImage,
    background: Rgba<u8>,
    color: Rgba<u8>,
    width: f64,
    cursor: Option<Point>,
}

impl RasterCanvas {
    pub fn new(surface: Surface, background: Rgb) -> Self {
        let background = Rgba(background.to_rgba(255));
        Self {
            image: RgbaImage::from_pixel(surface.width(), surface.height(), background),
            background,
            color: Rgba(Rgb::default().to_rgba(255)),
            width: 1.0,
            cursor: None,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.image.width() && y < self.image.height()).then(|| *self.image.get_pixel(x, y))
    }

    /// Number of pixels that differ from the background
    pub fn painted_pixels(&self) -> usize {
        self.image.pixels().filter(|p| **p != self.background).count()
    }

    /// Export the drawing as PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), CanvasError> {
        let path = path.as_ref();
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| CanvasError::Save {
                path: path.to_path_buf(),
                source,
            })
    }

    fn stamp(&mut self, center: Point) {
        let radius = (self.width / 2.0).max(0.5);
        let (w, h) = (self.image.width() as i64, self.image.height() as i64);

        let x0 = ((center.x - radius).floor() as i64).max(0);
        let x1 = ((center.x + radius).ceil() as i64).min(w - 1);
        let y0 = ((center.y - radius).floor() as i64).max(0);
        let y1 = ((center.y + radius).ceil() as i64).min(h - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                if dx * dx + dy * dy <= radius * radius {
                    self.image.put_pixel(x as u32, y as u32, self.color);
                }
            }
        }
    }
}

/// Point at `t` on the quadratic Bezier `start -> control -> end`.
fn quadratic_at(start: Point, control: Point, end: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * start.x + 2.0 * u * t * control.x + t * t * end.x,
        u * u * start.y + 2.0 * u * t * control.y + t * t * end.y,
    )
}

impl RenderSink for RasterCanvas {
    fn clear(&mut self) {
        let background = self.background;
        for pixel in self.image.pixels_mut() {
            *pixel = background;
        }
        self.cursor = None;
    }

    fn set_stroke_style(&mut self, color: Rgb, width: f64) {
        self.color = Rgba(color.to_rgba(255));
        self.width = width;
    }

    fn move_to(&mut self, point: Point) {
        self.cursor = Some(point);
    }

    fn curve_to(&mut self, control: Point, end: Point) {
        let start = self.cursor.unwrap_or(end);

        // control polygon length bounds the curve length
        let length = start.distance_to(&control) + control.distance_to(&end);
        let spacing = (self.width / 4.0).max(0.5);
        let steps = ((length / spacing).ceil() as usize).max(1);

        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.stamp(quadratic_at(start, control, end, t));
        }
        self.cursor = Some(end);
    }

    fn resize(&mut self, surface: Surface) {
        self.image = RgbaImage::from_pixel(surface.width(), surface.height(), self.background);
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> RasterCanvas {
        RasterCanvas::new(Surface::new(100, 60).unwrap(), Rgb(255, 255, 255))
    }

    #[test]
    fn curve_paints_along_path() {
        let mut canvas = canvas();
        canvas.set_stroke_style(Rgb(0, 0, 255), 4.0);
        canvas.move_to(Point::new(10.0, 30.0));
        canvas.curve_to(Point::new(50.0, 30.0), Point::new(90.0, 30.0));

        assert_eq!(canvas.pixel(50, 30), Some(Rgba([0, 0, 255, 255])));
        assert_eq!(canvas.pixel(50, 5), Some(Rgba([255, 255, 255, 255])));
        assert!(canvas.painted_pixels() > 80 * 3);
    }

    #[test]
    fn clear_restores_background() {
        let mut canvas = canvas();
        canvas.set_stroke_style(Rgb(0, 0, 0), 8.0);
        canvas.move_to(Point::new(20.0, 20.0));
        canvas.curve_to(Point::new(20.0, 20.0), Point::new(20.0, 20.0));
        assert!(canvas.painted_pixels() > 0);

        canvas.clear();
        assert_eq!(canvas.painted_pixels(), 0);
    }

    #[test]
    fn stamps_at_edges_stay_in_bounds() {
        let mut canvas = canvas();
        canvas.set_stroke_style(Rgb(0, 0, 0), 8.0);
        canvas.move_to(Point::new(0.0, 0.0));
        canvas.curve_to(Point::new(100.0, 0.0), Point::new(100.0, 60.0));
        assert!(canvas.painted_pixels() > 0);
    }

    #[test]
    fn resize_reallocates() {
        let mut canvas = canvas();
        canvas.resize(Surface::new(20, 10).unwrap());
        assert_eq!(canvas.image().dimensions(), (20, 10));
        assert_eq!(canvas.pixel(25, 5), None);
    }

    #[test]
    fn save_png_writes_file() {
        let canvas = canvas();
        let path = std::env::temp_dir().join("handsketch_canvas_test.png");
        canvas.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (100, 60));
        std::fs::remove_file(&path).ok();
    }
}
