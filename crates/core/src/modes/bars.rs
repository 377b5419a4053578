use crate::{
    canvas::Canvas,
    spectrum::SpectrumFrame,
    theme::{hsl, Theme},
};

/// Fixed number of frequency buckets, one bar each.
pub const BAR_COUNT: usize = 64;
/// Bars never exceed this fraction of the canvas height.
pub const MAX_HEIGHT_FRACTION: f32 = 0.9;

/// Extra apron below each bar so it visually anchors to the bottom edge.
const BASELINE_APRON: f32 = 20.0;
/// Height of the hue-swept cap on top of each bar.
const CAP_HEIGHT: f32 = 3.0;

/// Static per-bar layout: an x offset and a hue swept linearly across the
/// buckets from the theme's base hue. Heights are derived fresh every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub x: f32,
    pub hue: f32,
}

/// Computes the fixed bar layout for a canvas width.
pub fn layout(width: f32, base_hue: f32) -> Vec<Bar> {
    (0..BAR_COUNT)
        .map(|i| Bar {
            x: width / BAR_COUNT as f32 * i as f32,
            hue: i as f32 / BAR_COUNT as f32 * 60.0 + base_hue,
        })
        .collect()
}

/// Bar height: the bucket value scaled by the frame average and the user
/// sensitivity against half the canvas height, clamped to
/// [`MAX_HEIGHT_FRACTION`] of the canvas.
pub fn bar_height(value: u8, avg: f32, sensitivity: u8, canvas_height: f32) -> f32 {
    let height = (value as f32 / 255.0)
        * (avg / 255.0)
        * (sensitivity as f32 / 4.0)
        * (canvas_height / 2.0);
    height.min(canvas_height * MAX_HEIGHT_FRACTION)
}

pub fn render(
    canvas: &mut Canvas,
    bars: &[Bar],
    frame: &SpectrumFrame,
    theme: &Theme,
    sensitivity: u8,
) {
    let bar_width = canvas.width() / BAR_COUNT as f32;
    let canvas_height = canvas.height();

    for (i, bar) in bars.iter().enumerate() {
        let value = frame.bin(i * frame.len() / BAR_COUNT);
        let height = bar_height(value, frame.avg, sensitivity, canvas_height);
        let top = canvas_height - height - BASELINE_APRON;

        canvas.fill_rect_vertical_gradient(
            bar.x,
            top,
            bar_width - 2.0,
            height + BASELINE_APRON,
            &[
                (0.0, theme.primary),
                (0.5, theme.secondary),
                (1.0, theme.accent),
            ],
        );

        if height > CAP_HEIGHT {
            canvas.fill_rect(
                bar.x,
                top,
                bar_width - 2.0,
                CAP_HEIGHT,
                hsl(bar.hue, 80.0, 60.0),
                1.0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_spans_the_width_with_swept_hues() {
        let bars = layout(640.0, 180.0);
        assert_eq!(bars.len(), BAR_COUNT);
        assert_eq!(bars[0].x, 0.0);
        assert!((bars[63].x - 630.0).abs() < 0.001);
        assert!((bars[0].hue - 180.0).abs() < 0.001);
        assert!(bars[63].hue > bars[0].hue);
    }

    #[test]
    fn height_follows_the_documented_formula() {
        // saturated bucket, avg 128, sensitivity 4 on a 720px canvas
        let expected = 1.0 * (128.0 / 255.0) * 1.0 * 360.0;
        assert!((bar_height(255, 128.0, 4, 720.0) - expected).abs() < 0.001);

        assert_eq!(bar_height(0, 128.0, 4, 720.0), 0.0);
        assert_eq!(bar_height(255, 0.0, 10, 720.0), 0.0);
    }

    #[test]
    fn height_clamps_to_the_maximum_fraction() {
        // saturated everything at maximum sensitivity would exceed the canvas
        let clamped = bar_height(255, 255.0, 10, 720.0);
        assert!((clamped - 720.0 * MAX_HEIGHT_FRACTION).abs() < 0.001);
    }

    #[test]
    fn bars_scenario_is_deterministic() {
        let frame = SpectrumFrame::from_bins(vec![255; 128]);
        for i in 0..BAR_COUNT {
            let value = frame.bin(i * frame.len() / BAR_COUNT);
            let height = bar_height(value, 128.0, 4, 720.0);
            let expected =
                (value as f32 / 255.0) * (128.0 / 255.0) * 360.0;
            assert!((height - expected.min(648.0)).abs() < 0.001);
        }
    }

    #[test]
    fn renders_over_a_silent_frame_without_error() {
        let mut canvas = Canvas::new(64, 64).unwrap();
        let bars = layout(64.0, 180.0);
        let theme = crate::theme::theme(crate::theme::ThemeName::Neon);
        render(&mut canvas, &bars, &SpectrumFrame::silent(128), &theme, 4);
    }
}
