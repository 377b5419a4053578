use std::f32::consts::TAU;

use crate::{canvas::Canvas, spectrum::SpectrumFrame, theme::Theme};

use super::reactive_scale;

/// Angle steps of the outer reactive ring.
pub const SEGMENTS: usize = 128;

/// Inner ring radius as a fraction of the base radius.
const INNER_RING_FRACTION: f32 = 0.5;
/// Continuous rotation speed in radians per second.
const ROTATION_SPEED: f32 = 0.5;

/// Radius of the outer ring at one angle step: the base radius plus an offset
/// proportional to the spectrum sample mapped to that angle.
pub fn ring_radius(base: f32, value: u8, sensitivity: u8) -> f32 {
    base + (value as f32 / 255.0) * base * (sensitivity as f32 / 4.0)
}

pub fn render(
    canvas: &mut Canvas,
    frame: &SpectrumFrame,
    theme: &Theme,
    sensitivity: u8,
    elapsed: f32,
) {
    let cx = canvas.width() / 2.0;
    let cy = canvas.height() / 2.0;
    let base = cx.min(cy) * 0.6;
    let avg = frame.avg / 255.0;
    let rotation = elapsed * ROTATION_SPEED;

    // outer reactive ring, a closed polyline swept over the full circle
    let points: Vec<(f32, f32)> = (0..SEGMENTS)
        .map(|i| {
            let angle = i as f32 / SEGMENTS as f32 * TAU + rotation;
            let value = frame.bin(i * frame.len() / SEGMENTS);
            let radius = ring_radius(base, value, sensitivity);
            (cx + angle.cos() * radius, cy + angle.sin() * radius)
        })
        .collect();
    canvas.stroke_polyline(&points, 2.0 + avg * 3.0, theme.primary, 1.0, true, true);

    // inner static ring
    canvas.stroke_circle(cx, cy, base * INNER_RING_FRACTION, 1.5, theme.secondary, 0.8);

    // central disc grows with the reactive scale
    let reactive = reactive_scale(frame.avg, sensitivity);
    let disc = base * 0.1 + base * 0.25 * reactive;
    canvas.fill_radial_glow(
        cx,
        cy,
        disc.max(1.0),
        &[(0.0, theme.accent, 0.9), (1.0, theme.accent, 0.0)],
    );
}
