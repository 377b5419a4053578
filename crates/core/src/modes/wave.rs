use crate::{canvas::Canvas, spectrum::SpectrumFrame, theme::Theme};

/// Fixed number of horizontal sample points.
pub const WAVE_POINT_COUNT: usize = 200;

/// Vertical gap between the primary and the secondary curve.
const SECOND_CURVE_OFFSET: f32 = 50.0;

const GLOW_COLOR: crate::theme::Rgb = crate::theme::Rgb::new(255, 255, 255);

/// One sample point of the wave. `x` and `base_y` are fixed by the layout;
/// `y` is displaced every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct WavePoint {
    pub x: f32,
    pub base_y: f32,
    pub y: f32,
}

/// Computes the fixed point layout for a canvas size: evenly spaced x
/// positions along the horizontal centre line.
pub fn layout(width: f32, height: f32) -> Vec<WavePoint> {
    (0..WAVE_POINT_COUNT)
        .map(|i| WavePoint {
            x: width / WAVE_POINT_COUNT as f32 * i as f32,
            base_y: height / 2.0,
            y: height / 2.0,
        })
        .collect()
}

/// Spectrum-scaled amplitude for one point.
fn amplitude(value: u8, sensitivity: u8) -> f32 {
    (value as f32 / 255.0) * 100.0 * (sensitivity as f32 / 4.0)
}

/// Displaces every point from its base line: two superposed sinusoids with
/// different spatial frequencies, phases driven by elapsed time, amplitudes
/// scaled by the mapped bin value and the frame average.
pub fn advance(points: &mut [WavePoint], frame: &SpectrumFrame, sensitivity: u8, elapsed: f32) {
    let avg = frame.avg / 255.0;
    let count = points.len().max(1);

    for (i, point) in points.iter_mut().enumerate() {
        let value = frame.bin(i * frame.len() / count);
        let offset = amplitude(value, sensitivity);
        let phase = i as f32;
        point.y = point.base_y
            + (phase * 0.05 + elapsed * 2.0).sin() * offset * avg
            + (phase * 0.023 - elapsed * 1.4).cos() * offset * 0.4 * avg;
    }
}

pub fn render(
    canvas: &mut Canvas,
    points: &mut [WavePoint],
    frame: &SpectrumFrame,
    theme: &Theme,
    sensitivity: u8,
    elapsed: f32,
) {
    advance(points, frame, sensitivity, elapsed);

    let primary: Vec<(f32, f32)> = points.iter().map(|p| (p.x, p.y)).collect();
    canvas.stroke_polyline(&primary, 3.0, theme.primary, 1.0, true, false);
    // wide glow pass over the same path
    canvas.stroke_polyline(&primary, 10.0, GLOW_COLOR, 0.3, true, false);

    // second curve: offset below, opposite time-phase sign so it diverges
    let avg = frame.avg / 255.0;
    let count = points.len().max(1);
    let secondary: Vec<(f32, f32)> = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let value = frame.bin(i * frame.len() / count);
            let offset = amplitude(value, sensitivity);
            let y = point.base_y
                + SECOND_CURVE_OFFSET
                + (i as f32 * 0.05 - elapsed * 2.0).sin() * offset * avg;
            (point.x, y)
        })
        .collect();
    canvas.stroke_polyline(
        &secondary,
        2.0,
        theme.primary_with_hue_offset(30.0),
        1.0,
        false,
        false,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_spaces_points_across_the_width() {
        let points = layout(1000.0, 600.0);
        assert_eq!(points.len(), WAVE_POINT_COUNT);
        assert_eq!(points[0].x, 0.0);
        assert!((points[199].x - 995.0).abs() < 0.001);
        assert!(points.iter().all(|p| p.base_y == 300.0));
    }

    #[test]
    fn silent_frame_keeps_the_line_flat() {
        let mut points = layout(1000.0, 600.0);
        advance(&mut points, &SpectrumFrame::silent(128), 4, 1.5);
        assert!(points.iter().all(|p| p.y == p.base_y));
    }

    #[test]
    fn loud_frame_displaces_points() {
        let mut points = layout(1000.0, 600.0);
        advance(&mut points, &SpectrumFrame::from_bins(vec![200; 128]), 4, 1.5);
        assert!(points.iter().any(|p| (p.y - p.base_y).abs() > 1.0));
    }

    #[test]
    fn displacement_scales_with_sensitivity() {
        let frame = SpectrumFrame::from_bins(vec![200; 128]);
        let mut low = layout(1000.0, 600.0);
        let mut high = layout(1000.0, 600.0);
        advance(&mut low, &frame, 1, 1.5);
        advance(&mut high, &frame, 10, 1.5);

        let spread = |points: &[WavePoint]| {
            points
                .iter()
                .map(|p| (p.y - p.base_y).abs())
                .fold(0.0_f32, f32::max)
        };
        assert!(spread(&high) > spread(&low));
    }

    #[test]
    fn renders_without_error() {
        let mut canvas = Canvas::new(64, 64).unwrap();
        let theme = crate::theme::theme(crate::theme::ThemeName::Ocean);
        let mut points = layout(64.0, 64.0);
        render(
            &mut canvas,
            &mut points,
            &SpectrumFrame::from_bins(vec![150; 128]),
            &theme,
            4,
            0.5,
        );
    }
}
