use std::path::Path;

use tiny_skia::{
    Color, FillRule, GradientStop, LineCap, LinearGradient, Paint, PathBuilder, Pixmap, Point,
    RadialGradient, Rect, Shader, SpreadMode, Stroke, Transform,
};

use crate::{theme::Rgb, Result, VisualiserError};

/// CPU raster surface the visual engine paints into.
///
/// Wraps a [`tiny_skia::Pixmap`] and exposes just the drawing operations the
/// render modes need. All coordinates are in pixels; alpha values are in
/// [0, 1] and drawing outside the surface is clipped, never an error.
#[derive(Clone)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .finish()
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(VisualiserError::InvalidInput(
            "canvas dimensions must be non-zero",
        ))?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> f32 {
        self.pixmap.width() as f32
    }

    pub fn height(&self) -> f32 {
        self.pixmap.height() as f32
    }

    /// Floods the whole surface with an opaque color.
    pub fn fill(&mut self, color: Rgb) {
        self.pixmap
            .fill(Color::from_rgba8(color.r, color.g, color.b, 255));
    }

    /// Paints the whole surface with `color` at partial opacity. Repeated
    /// every frame this produces the motion-trail fade all modes rely on.
    pub fn fade(&mut self, color: Rgb, alpha: f32) {
        let paint = solid_paint(color, alpha);
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, self.width(), self.height()) {
            self.pixmap
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    pub fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, alpha: f32) {
        if let Some(path) = PathBuilder::from_circle(x, y, radius) {
            let paint = solid_paint(color, alpha);
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    pub fn stroke_circle(&mut self, x: f32, y: f32, radius: f32, width: f32, color: Rgb, alpha: f32) {
        if let Some(path) = PathBuilder::from_circle(x, y, radius) {
            let paint = solid_paint(color, alpha);
            self.pixmap
                .stroke_path(&path, &paint, &stroke(width), Transform::identity(), None);
        }
    }

    pub fn stroke_segment(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
        alpha: f32,
    ) {
        let mut builder = PathBuilder::new();
        builder.move_to(x1, y1);
        builder.line_to(x2, y2);
        if let Some(path) = builder.finish() {
            let paint = solid_paint(color, alpha);
            self.pixmap
                .stroke_path(&path, &paint, &stroke(width), Transform::identity(), None);
        }
    }

    /// Strokes a polyline through `points`. With `smoothed` the segments are
    /// quadratic curves through consecutive midpoints; `closed` joins the
    /// last point back to the first.
    pub fn stroke_polyline(
        &mut self,
        points: &[(f32, f32)],
        width: f32,
        color: Rgb,
        alpha: f32,
        smoothed: bool,
        closed: bool,
    ) {
        if points.len() < 2 {
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(points[0].0, points[0].1);
        if smoothed && points.len() > 2 {
            for i in 1..points.len() - 1 {
                let mid_x = (points[i].0 + points[i + 1].0) / 2.0;
                let mid_y = (points[i].1 + points[i + 1].1) / 2.0;
                builder.quad_to(points[i].0, points[i].1, mid_x, mid_y);
            }
            let last = points[points.len() - 1];
            builder.line_to(last.0, last.1);
        } else {
            for point in &points[1..] {
                builder.line_to(point.0, point.1);
            }
        }
        if closed {
            builder.close();
        }

        if let Some(path) = builder.finish() {
            let paint = solid_paint(color, alpha);
            self.pixmap
                .stroke_path(&path, &paint, &stroke(width), Transform::identity(), None);
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32) {
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            let paint = solid_paint(color, alpha);
            self.pixmap
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    /// Fills a rect with a top-to-bottom gradient through the given stops.
    /// Stop positions are in [0, 1] from the top edge.
    pub fn fill_rect_vertical_gradient(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        stops: &[(f32, Rgb)],
    ) {
        let rect = match Rect::from_xywh(x, y, w, h) {
            Some(rect) => rect,
            None => return,
        };
        let first = match stops.first() {
            Some(&(_, color)) => color,
            None => return,
        };

        let gradient_stops = stops
            .iter()
            .map(|&(pos, color)| GradientStop::new(pos, ts_color(color, 1.0)))
            .collect();
        let shader = LinearGradient::new(
            Point::from_xy(x, y),
            Point::from_xy(x, y + h),
            gradient_stops,
            SpreadMode::Pad,
            Transform::identity(),
        )
        .unwrap_or(Shader::SolidColor(ts_color(first, 1.0)));

        let mut paint = Paint::default();
        paint.shader = shader;
        paint.anti_alias = true;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Fills a disc with a radial gradient from its centre. Stops carry their
    /// own alpha so the outermost can fade to transparent.
    pub fn fill_radial_glow(&mut self, cx: f32, cy: f32, radius: f32, stops: &[(f32, Rgb, f32)]) {
        let path = match PathBuilder::from_circle(cx, cy, radius) {
            Some(path) => path,
            None => return,
        };
        let first = match stops.first() {
            Some(&(_, color, alpha)) => (color, alpha),
            None => return,
        };

        let gradient_stops = stops
            .iter()
            .map(|&(pos, color, alpha)| GradientStop::new(pos, ts_color(color, alpha)))
            .collect();
        let center = Point::from_xy(cx, cy);
        let shader = RadialGradient::new(
            center,
            center,
            radius,
            gradient_stops,
            SpreadMode::Pad,
            Transform::identity(),
        )
        .unwrap_or(Shader::SolidColor(ts_color(first.0, first.1)));

        let mut paint = Paint::default();
        paint.shader = shader;
        paint.anti_alias = true;
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Encodes the surface as a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.pixmap
            .save_png(path)
            .map_err(|err| VisualiserError::msg(format!("failed to encode png: {err}")))
    }

    /// Straight-alpha RGBA value at the given pixel, if it is on the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8, u8)> {
        if x >= self.pixmap.width() || y >= self.pixmap.height() {
            return None;
        }

        let index = (y * self.pixmap.width() + x) as usize;
        let pixel = self.pixmap.pixels()[index].demultiply();
        Some((pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()))
    }
}

fn ts_color(color: Rgb, alpha: f32) -> Color {
    Color::from_rgba8(
        color.r,
        color.g,
        color.b,
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

fn solid_paint(color: Rgb, alpha: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(ts_color(color, alpha));
    paint.anti_alias = true;
    paint
}

fn stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        ..Stroke::default()
    }
}
