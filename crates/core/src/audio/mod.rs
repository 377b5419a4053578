use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    spectrum::{SpectrumAnalyser, SpectrumFrame, SpectrumSource, DEFAULT_FFT_SIZE},
    Result, VisualiserError,
};

/// High level audio analysis façade.
///
/// Owns the shared [`SpectrumAnalyser`] and feeds it decoded sample blocks.
/// Rendering code never touches the analyser directly; it pulls snapshots
/// through the [`SpectrumHandle`] returned by [`AudioEngine::start`].
#[derive(Debug)]
pub struct AudioEngine {
    fft_size: usize,
    analyser: Arc<Mutex<SpectrumAnalyser>>,
}

impl AudioEngine {
    /// Creates a new engine with the default FFT window size.
    pub fn new() -> Result<Self> {
        Self::with_fft_size(DEFAULT_FFT_SIZE)
    }

    /// Creates a new engine using an explicit FFT window size.
    pub fn with_fft_size(fft_size: usize) -> Result<Self> {
        let analyser = SpectrumAnalyser::new(fft_size)?;
        Ok(Self {
            fft_size,
            analyser: Arc::new(Mutex::new(analyser)),
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of bins in the frames this engine produces.
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Resets the analyser and returns a handle for per-frame snapshot reads.
    pub fn start(&self) -> Result<SpectrumHandle> {
        {
            let mut analyser = self.lock_analyser()?;
            analyser.reset();
        }

        Ok(SpectrumHandle {
            shared: self.analyser.clone(),
            bin_count: self.fft_size / 2,
        })
    }

    /// Feeds a block of floating point samples into the analyser. File
    /// playback calls this once per scheduler tick with the samples that
    /// elapsed since the previous tick.
    pub fn push_samples(&self, samples: &[f32]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let mut analyser = self.lock_analyser()?;
        analyser.process_block(samples)
    }

    fn lock_analyser(&self) -> Result<MutexGuard<'_, SpectrumAnalyser>> {
        self.analyser
            .lock()
            .map_err(|_| VisualiserError::msg("spectrum analyser has been poisoned"))
    }
}

/// Shared, non-blocking view over the analyser managed by [`AudioEngine`].
///
/// `current_frame` never fails: a poisoned lock degrades to the silent frame,
/// matching the contract that absence of data is not an error.
#[derive(Clone)]
pub struct SpectrumHandle {
    shared: Arc<Mutex<SpectrumAnalyser>>,
    bin_count: usize,
}

impl SpectrumSource for SpectrumHandle {
    fn current_frame(&self) -> SpectrumFrame {
        match self.shared.lock() {
            Ok(analyser) => analyser.current_frame(),
            Err(_) => SpectrumFrame::silent(self.bin_count),
        }
    }
}

impl std::fmt::Debug for SpectrumHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectrumHandle")
            .field("bin_count", &self.bin_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_sees_pushed_samples() {
        let audio = AudioEngine::with_fft_size(256).unwrap();
        let handle = audio.start().unwrap();
        assert!(handle.current_frame().bins.iter().all(|&b| b == 0));

        audio.push_samples(&[0.8; 1024]).unwrap();
        let frame = handle.current_frame();
        assert_eq!(frame.len(), audio.bin_count());
        assert!(frame.bins.iter().any(|&b| b > 0));
    }

    #[test]
    fn start_resets_previous_analysis() {
        let audio = AudioEngine::with_fft_size(256).unwrap();
        let handle = audio.start().unwrap();
        audio.push_samples(&[0.8; 1024]).unwrap();
        assert!(handle.current_frame().bins.iter().any(|&b| b > 0));

        let handle = audio.start().unwrap();
        assert!(handle.current_frame().bins.iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_blocks_are_ignored() {
        let audio = AudioEngine::new().unwrap();
        audio.push_samples(&[]).unwrap();
    }
}
