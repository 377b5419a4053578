//! The five render modes and the per-mode state they animate.
//!
//! Each mode is a free function that advances its state from the current
//! spectrum frame and paints onto the canvas. The engine owns the state
//! collections and dispatches on the active [`crate::VisualMode`].

pub mod bars;
pub mod circular;
pub mod galaxy;
pub mod particles;
pub mod wave;

pub use bars::Bar;
pub use particles::Particle;
pub use wave::WavePoint;

/// Reactive scale shared by the modes: a band level amplified by the user
/// sensitivity, normalised so sensitivity 4 over a saturated band gives 1.0.
pub fn reactive_scale(band: f32, sensitivity: u8) -> f32 {
    (band / 255.0) * (sensitivity as f32 / 4.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reactive_scale_is_linear_in_band_and_sensitivity() {
        assert_eq!(reactive_scale(0.0, 4), 0.0);
        assert!((reactive_scale(255.0, 4) - 1.0).abs() < f32::EPSILON);
        assert!((reactive_scale(255.0, 8) - 2.0).abs() < f32::EPSILON);
        assert!((reactive_scale(127.5, 4) - 0.5).abs() < 0.001);
    }
}
