use serde::{Deserialize, Serialize};

use crate::{engine::EngineSettings, spectrum::DEFAULT_FFT_SIZE};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub audio: AudioConfig,
    pub visual: VisualConfig,
}

/// Configuration specific to the audio analysis subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub fft_size: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            fft_size: DEFAULT_FFT_SIZE,
        }
    }
}

/// Configuration for the render surface and scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub settings: EngineSettings,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 60,
            settings: EngineSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_sensible_session() {
        let config = AppConfig::default();
        assert_eq!(config.audio.sample_rate, 48_000);
        assert_eq!(config.audio.fft_size, 256);
        assert_eq!(config.visual.fps, 60);
        assert_eq!(config.visual.settings.sensitivity, 4);
    }

    #[test]
    fn round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.visual.width, config.visual.width);
        assert_eq!(back.visual.settings, config.visual.settings);
        assert_eq!(back.audio.fft_size, config.audio.fft_size);
    }

    #[test]
    fn mode_and_theme_names_serialise_lowercase() {
        let json = serde_json::to_string(&AppConfig::default()).unwrap();
        assert!(json.contains("\"particles\""));
        assert!(json.contains("\"neon\""));
    }
}
