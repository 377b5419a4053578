use std::{f32::consts::PI, fmt, sync::Arc};

use realfft::{num_complex::Complex32, RealFftPlanner, RealToComplex};
use serde::{Deserialize, Serialize};

use crate::{Result, VisualiserError};

/// Default FFT window size; yields 128 frequency bins.
pub const DEFAULT_FFT_SIZE: usize = 256;

/// Smoothing constant applied to linear magnitudes between windows.
const SMOOTHING_TIME_CONSTANT: f32 = 0.8;

/// Magnitudes below this level map to byte value 0.
const MIN_DECIBELS: f32 = -100.0;
/// Magnitudes at or above this level map to byte value 255.
const MAX_DECIBELS: f32 = -30.0;

/// Band windows, expressed in bin indices and clamped to the available bins.
const BASS_WINDOW_END: usize = 10;
const MID_WINDOW_END: usize = 80;
const HIGH_WINDOW_END: usize = 180;
const AVG_WINDOW_END: usize = 480;

/// One snapshot of per-bin byte magnitudes plus the derived band scalars.
///
/// Every value, including the band means, lies in [0, 255].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumFrame {
    pub bins: Vec<u8>,
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
    pub avg: f32,
}

impl SpectrumFrame {
    /// The all-zero frame used whenever no audio has been analysed.
    pub fn silent(bin_count: usize) -> Self {
        Self {
            bins: vec![0; bin_count],
            bass: 0.0,
            mid: 0.0,
            high: 0.0,
            avg: 0.0,
        }
    }

    /// Builds a frame from raw bin magnitudes, computing the band means.
    pub fn from_bins(bins: Vec<u8>) -> Self {
        let bass = band_mean(&bins, 0, BASS_WINDOW_END);
        let mid = band_mean(&bins, BASS_WINDOW_END, MID_WINDOW_END);
        let high = band_mean(&bins, MID_WINDOW_END, HIGH_WINDOW_END);
        let avg = band_mean(&bins, 0, AVG_WINDOW_END);
        Self {
            bins,
            bass,
            mid,
            high,
            avg,
        }
    }

    /// Bin value at `index`, zero when out of range.
    pub fn bin(&self, index: usize) -> u8 {
        self.bins.get(index).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

fn band_mean(bins: &[u8], start: usize, end: usize) -> f32 {
    let end = end.min(bins.len());
    if start >= end {
        return 0.0;
    }

    let sum: u32 = bins[start..end].iter().map(|&v| v as u32).sum();
    sum as f32 / (end - start) as f32
}

/// Pull-based snapshot provider consumed by the visual engine once per frame.
///
/// Implementations never block and never fail; absence of audio is signalled
/// by the silent frame.
pub trait SpectrumSource {
    fn current_frame(&self) -> SpectrumFrame;
}

/// Source that always yields the silent frame. Drives the resting animation
/// while no audio is loaded.
#[derive(Debug, Clone, Copy)]
pub struct SilentSource {
    bin_count: usize,
}

impl SilentSource {
    pub fn new(bin_count: usize) -> Self {
        Self { bin_count }
    }
}

impl SpectrumSource for SilentSource {
    fn current_frame(&self) -> SpectrumFrame {
        SpectrumFrame::silent(self.bin_count)
    }
}

/// FFT-based spectrum analyser.
///
/// Consumes sample blocks of any size, re-analyses a Hann-windowed FFT over
/// the most recent `fft_size` samples with 50% overlap, and exposes the
/// latest [`SpectrumFrame`] as byte magnitudes on a dB scale.
pub struct SpectrumAnalyser {
    fft_size: usize,
    plan: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    pending: Vec<f32>,
    input: Vec<f32>,
    spectrum: Vec<Complex32>,
    scratch: Vec<Complex32>,
    smoothed: Vec<f32>,
    frame: SpectrumFrame,
}

impl SpectrumAnalyser {
    /// Creates an analyser for the given FFT window size. The size must be a
    /// power of two between 64 and 4096.
    pub fn new(fft_size: usize) -> Result<Self> {
        if !fft_size.is_power_of_two() || !(64..=4096).contains(&fft_size) {
            return Err(VisualiserError::InvalidInput(
                "fft size must be a power of two between 64 and 4096",
            ));
        }

        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(fft_size);
        let input = plan.make_input_vec();
        let spectrum = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();
        let bin_count = fft_size / 2;

        Ok(Self {
            fft_size,
            plan,
            window: (0..fft_size).map(|i| hann_value(i, fft_size)).collect(),
            pending: Vec::with_capacity(fft_size * 2),
            input,
            spectrum,
            scratch,
            smoothed: vec![0.0; bin_count],
            frame: SpectrumFrame::silent(bin_count),
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of frequency bins per frame (`fft_size / 2`).
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Latest analysed frame; silent until a full window has been consumed.
    pub fn current_frame(&self) -> SpectrumFrame {
        self.frame.clone()
    }

    /// Clears all accumulated state while preserving configuration.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.smoothed.iter_mut().for_each(|m| *m = 0.0);
        self.frame = SpectrumFrame::silent(self.bin_count());
    }

    /// Consumes audio samples, re-analysing once per half-window of new data.
    pub fn process_block(&mut self, samples: &[f32]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        self.pending.extend_from_slice(samples);
        while self.pending.len() >= self.fft_size {
            self.process_window()?;
            self.pending.drain(0..self.fft_size / 2);
        }

        Ok(())
    }

    fn process_window(&mut self) -> Result<()> {
        for (slot, (sample, window)) in self
            .input
            .iter_mut()
            .zip(self.pending.iter().zip(self.window.iter()))
        {
            *slot = sample * window;
        }

        self.plan
            .process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.scratch)?;

        let scale = 1.0 / self.fft_size as f32;
        let mut bins = Vec::with_capacity(self.smoothed.len());
        for (smoothed, bin) in self.smoothed.iter_mut().zip(self.spectrum.iter()) {
            let magnitude = bin.norm() * scale;
            *smoothed = SMOOTHING_TIME_CONSTANT * *smoothed
                + (1.0 - SMOOTHING_TIME_CONSTANT) * magnitude;
            bins.push(magnitude_to_byte(*smoothed));
        }

        self.frame = SpectrumFrame::from_bins(bins);
        Ok(())
    }
}

impl fmt::Debug for SpectrumAnalyser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectrumAnalyser")
            .field("fft_size", &self.fft_size)
            .field("pending", &self.pending.len())
            .finish()
    }
}

/// Maps a linear magnitude onto the [0, 255] byte scale between
/// [`MIN_DECIBELS`] and [`MAX_DECIBELS`].
fn magnitude_to_byte(magnitude: f32) -> u8 {
    if magnitude <= 0.0 {
        return 0;
    }

    let db = 20.0 * magnitude.log10();
    let scaled = (db - MIN_DECIBELS) / (MAX_DECIBELS - MIN_DECIBELS);
    (scaled.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hann_value(index: usize, len: usize) -> f32 {
    if len <= 1 {
        return 1.0;
    }

    0.5 - 0.5 * ((2.0 * PI * index as f32) / (len as f32 - 1.0)).cos()
}
