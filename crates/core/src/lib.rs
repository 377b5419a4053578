//! Core library for the audio visualiser.
//!
//! The crate decodes nothing itself: the application feeds raw sample blocks
//! into the [`AudioEngine`], which keeps a live frequency spectrum, and a
//! [`VisualEngine`] pulls one [`SpectrumFrame`] snapshot per tick to advance
//! and paint whichever of the five render modes is active onto a CPU raster
//! canvas.

pub mod audio;
pub mod canvas;
pub mod config;
pub mod engine;
pub mod error;
pub mod modes;
pub mod spectrum;
pub mod theme;

pub use audio::{AudioEngine, SpectrumHandle};
pub use canvas::Canvas;
pub use config::{AppConfig, AudioConfig, VisualConfig};
pub use engine::{EngineSettings, Telemetry, VisualEngine, VisualMode};
pub use error::{Result, VisualiserError};
pub use modes::{Bar, Particle, WavePoint};
pub use spectrum::{
    SilentSource, SpectrumAnalyser, SpectrumFrame, SpectrumSource, DEFAULT_FFT_SIZE,
};
pub use theme::{theme, Hsl, Rgb, Theme, ThemeName};
