use std::f32::consts::TAU;

use crate::{
    canvas::Canvas,
    spectrum::SpectrumFrame,
    theme::{hsl, Theme},
};

pub const ARM_COUNT: usize = 3;
pub const POINTS_PER_ARM: usize = 80;

/// Angle increment between consecutive points of an arm.
const ANGLE_STEP: f32 = 0.15;
/// Distance gained per point along an arm.
const DISTANCE_STEP: f32 = 3.0;
/// Continuous rotation speed in radians per second.
const ROTATION_SPEED: f32 = 0.2;
/// Hue offset between arms in degrees.
const ARM_HUE_STEP: f32 = 40.0;

/// Position of one spiral point relative to the centre.
pub fn arm_point(arm: usize, index: usize, elapsed: f32, swell: f32) -> (f32, f32) {
    let arm_offset = TAU * arm as f32 / ARM_COUNT as f32;
    let angle = index as f32 * ANGLE_STEP + arm_offset + elapsed * ROTATION_SPEED;
    let distance = index as f32 * DISTANCE_STEP + swell;
    (angle.cos() * distance, angle.sin() * distance)
}

pub fn render(canvas: &mut Canvas, frame: &SpectrumFrame, theme: &Theme, elapsed: f32) {
    let cx = canvas.width() / 2.0;
    let cy = canvas.height() / 2.0;
    let avg = frame.avg / 255.0;
    let swell = avg * 50.0;
    let base_hue = theme.base_hue();

    for arm in 0..ARM_COUNT {
        let hue = base_hue + arm as f32 * ARM_HUE_STEP;
        for index in 0..POINTS_PER_ARM {
            let (dx, dy) = arm_point(arm, index, elapsed, swell);
            let t = index as f32 / POINTS_PER_ARM as f32;
            let size = 1.0 + 3.0 * (1.0 - t);
            let alpha = 1.0 - t;
            canvas.fill_circle(cx + dx, cy + dy, size, hsl(hue, 80.0, 60.0), alpha);
        }
    }

    canvas.fill_radial_glow(
        cx,
        cy,
        100.0,
        &[
            (0.0, theme.primary, 0.8),
            (0.5, theme.primary_with_hue_offset(30.0), 0.3),
            (1.0, theme.secondary, 0.0),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{theme, ThemeName};

    #[test]
    fn points_march_outward_along_each_arm() {
        for arm in 0..ARM_COUNT {
            let mut last = -1.0_f32;
            for index in 0..POINTS_PER_ARM {
                let (x, y) = arm_point(arm, index, 0.0, 0.0);
                let distance = (x * x + y * y).sqrt();
                assert!(distance >= last);
                last = distance;
            }
        }
    }

    #[test]
    fn swell_pushes_the_whole_arm_outward() {
        let (x0, y0) = arm_point(0, 10, 0.0, 0.0);
        let (x1, y1) = arm_point(0, 10, 0.0, 50.0);
        let quiet = (x0 * x0 + y0 * y0).sqrt();
        let loud = (x1 * x1 + y1 * y1).sqrt();
        assert!((loud - quiet - 50.0).abs() < 0.001);
    }

    #[test]
    fn rotation_moves_points_over_time() {
        let before = arm_point(1, 20, 0.0, 0.0);
        let after = arm_point(1, 20, 5.0, 0.0);
        assert!((before.0 - after.0).abs() > 0.001 || (before.1 - after.1).abs() > 0.001);
    }

    #[test]
    fn renders_without_error() {
        let mut canvas = Canvas::new(128, 128).unwrap();
        let palette = theme(ThemeName::Sunset);
        render(
            &mut canvas,
            &SpectrumFrame::from_bins(vec![180; 128]),
            &palette,
            2.0,
        );
    }
}
