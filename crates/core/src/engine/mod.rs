use serde::{Deserialize, Serialize};

use crate::{
    canvas::Canvas,
    modes::{self, Bar, Particle, WavePoint},
    spectrum::SpectrumSource,
    theme::{theme, Rgb, ThemeName},
    Result,
};

/// Calls arriving closer together than this are ignored, capping the
/// effective update rate near 60 per second.
pub const MIN_FRAME_INTERVAL: f32 = 0.016;

pub const MIN_SENSITIVITY: u8 = 1;
pub const MAX_SENSITIVITY: u8 = 10;

const BACKGROUND: Rgb = Rgb::new(5, 5, 8);
/// Per-frame background opacity; partial so previous frames bleed through as
/// motion trails.
const TRAIL_ALPHA: f32 = 0.1;

/// The five render modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualMode {
    Particles,
    Bars,
    Wave,
    Circular,
    Galaxy,
}

impl VisualMode {
    pub const ALL: [VisualMode; 5] = [
        VisualMode::Particles,
        VisualMode::Bars,
        VisualMode::Wave,
        VisualMode::Circular,
        VisualMode::Galaxy,
    ];

    /// Resolves a mode from its lowercase name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "particles" => Some(Self::Particles),
            "bars" => Some(Self::Bars),
            "wave" => Some(Self::Wave),
            "circular" => Some(Self::Circular),
            "galaxy" => Some(Self::Galaxy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Particles => "particles",
            Self::Bars => "bars",
            Self::Wave => "wave",
            Self::Circular => "circular",
            Self::Galaxy => "galaxy",
        }
    }

    /// Whether this mode animates the particle collection.
    pub fn uses_particles(&self) -> bool {
        matches!(self, Self::Particles | Self::Galaxy)
    }
}

impl Default for VisualMode {
    fn default() -> Self {
        Self::Particles
    }
}

/// User-facing engine settings, mutated through the setters and read by the
/// render step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub mode: VisualMode,
    pub theme: ThemeName,
    pub sensitivity: u8,
    pub particle_count: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            mode: VisualMode::default(),
            theme: ThemeName::default(),
            sensitivity: 4,
            particle_count: 200,
        }
    }
}

/// Derived per-frame readouts; approximate, recomputed from the latest
/// processed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub frequency_hz: f32,
    pub bass_percent: f32,
    pub live_particles: usize,
}

/// Owns all animation state and paints one frame per processed tick.
///
/// The engine does not track whether audio is loaded; it renders whatever
/// spectrum the source yields, which is the silent frame while idle.
#[derive(Debug)]
pub struct VisualEngine {
    settings: EngineSettings,
    canvas: Canvas,
    particles: Vec<Particle>,
    bars: Vec<Bar>,
    wave_points: Vec<WavePoint>,
    elapsed: f32,
    last_tick: Option<f32>,
    pointer: (f32, f32),
    last_avg: f32,
    last_bass: f32,
}

impl VisualEngine {
    pub fn new(width: u32, height: u32, settings: EngineSettings) -> Result<Self> {
        let canvas = Canvas::new(width, height)?;
        let pointer = (canvas.width() / 2.0, canvas.height() / 2.0);

        let mut engine = Self {
            settings: EngineSettings {
                sensitivity: settings
                    .sensitivity
                    .clamp(MIN_SENSITIVITY, MAX_SENSITIVITY),
                ..settings
            },
            canvas,
            particles: Vec::new(),
            bars: Vec::new(),
            wave_points: Vec::new(),
            elapsed: 0.0,
            last_tick: None,
            pointer,
            last_avg: 0.0,
            last_bass: 0.0,
        };
        engine.init_collections();
        Ok(engine)
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Animation time in seconds, advanced only by processed frames.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn wave_points(&self) -> &[WavePoint] {
        &self.wave_points
    }

    /// Switches the active render routine. Only the state collections change;
    /// theme, sensitivity and particle count are untouched.
    pub fn set_mode(&mut self, mode: VisualMode) {
        if self.settings.mode != mode {
            self.settings.mode = mode;
            self.init_collections();
        }
    }

    pub fn set_theme(&mut self, name: ThemeName) {
        self.settings.theme = name;
    }

    pub fn set_sensitivity(&mut self, sensitivity: u8) {
        self.settings.sensitivity = sensitivity.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY);
    }

    /// Updates the particle count and, in particle modes, resizes the
    /// collection immediately: new randomised particles are appended when
    /// growing, the tail is truncated when shrinking.
    pub fn set_particle_count(&mut self, count: usize) {
        self.settings.particle_count = count;
        if !self.settings.mode.uses_particles() {
            return;
        }

        if count < self.particles.len() {
            self.particles.truncate(count);
        } else {
            let base_hue = theme(self.settings.theme).base_hue();
            let (w, h) = (self.canvas.width(), self.canvas.height());
            while self.particles.len() < count {
                self.particles.push(Particle::spawn(w, h, base_hue));
            }
        }
    }

    /// Pointer position used by particle attraction.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
    }

    /// Resizes the surface and recomputes the dimension-derived layouts.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.canvas = Canvas::new(width, height)?;
        let base_hue = theme(self.settings.theme).base_hue();
        match self.settings.mode {
            VisualMode::Bars => self.bars = modes::bars::layout(self.canvas.width(), base_hue),
            VisualMode::Wave => {
                self.wave_points = modes::wave::layout(self.canvas.width(), self.canvas.height());
            }
            _ => {}
        }
        Ok(())
    }

    /// Rewinds animation time to zero and re-randomises all particle state.
    /// Settings are not changed.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        if self.settings.mode.uses_particles() {
            let base_hue = theme(self.settings.theme).base_hue();
            let (w, h) = (self.canvas.width(), self.canvas.height());
            self.particles = (0..self.settings.particle_count)
                .map(|_| Particle::spawn(w, h, base_hue))
                .collect();
        }
    }

    /// The single per-frame entry point. `now` is the driving clock in
    /// seconds; calls arriving within [`MIN_FRAME_INTERVAL`] of the last
    /// processed call are no-ops.
    pub fn render_frame(&mut self, now: f32, source: &dyn SpectrumSource) {
        if let Some(last) = self.last_tick {
            let delta = now - last;
            if delta < MIN_FRAME_INTERVAL {
                return;
            }
            self.elapsed += delta;
        }
        self.last_tick = Some(now);

        let frame = source.current_frame();
        self.last_avg = frame.avg;
        self.last_bass = frame.bass;

        self.canvas.fade(BACKGROUND, TRAIL_ALPHA);

        let palette = theme(self.settings.theme);
        match self.settings.mode {
            VisualMode::Particles => modes::particles::render(
                &mut self.canvas,
                &mut self.particles,
                &frame,
                self.settings.sensitivity,
                self.pointer,
            ),
            VisualMode::Bars => modes::bars::render(
                &mut self.canvas,
                &self.bars,
                &frame,
                &palette,
                self.settings.sensitivity,
            ),
            VisualMode::Wave => modes::wave::render(
                &mut self.canvas,
                &mut self.wave_points,
                &frame,
                &palette,
                self.settings.sensitivity,
                self.elapsed,
            ),
            VisualMode::Circular => modes::circular::render(
                &mut self.canvas,
                &frame,
                &palette,
                self.settings.sensitivity,
                self.elapsed,
            ),
            VisualMode::Galaxy => {
                modes::galaxy::render(&mut self.canvas, &frame, &palette, self.elapsed)
            }
        }
    }

    /// Approximate per-frame readouts derived from the last processed frame.
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            frequency_hz: self.last_avg * 10.0,
            bass_percent: self.last_bass / 2.55,
            live_particles: self.particles.iter().filter(|p| p.is_alive()).count(),
        }
    }

    fn init_collections(&mut self) {
        self.particles.clear();
        self.bars.clear();
        self.wave_points.clear();

        let base_hue = theme(self.settings.theme).base_hue();
        match self.settings.mode {
            VisualMode::Particles | VisualMode::Galaxy => {
                let (w, h) = (self.canvas.width(), self.canvas.height());
                self.particles = (0..self.settings.particle_count)
                    .map(|_| Particle::spawn(w, h, base_hue))
                    .collect();
            }
            VisualMode::Bars => {
                self.bars = modes::bars::layout(self.canvas.width(), base_hue);
            }
            VisualMode::Wave => {
                self.wave_points = modes::wave::layout(self.canvas.width(), self.canvas.height());
            }
            VisualMode::Circular => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::{SilentSource, SpectrumFrame, SpectrumSource};

    struct FixedSource(SpectrumFrame);

    impl SpectrumSource for FixedSource {
        fn current_frame(&self) -> SpectrumFrame {
            self.0.clone()
        }
    }

    fn engine() -> VisualEngine {
        VisualEngine::new(320, 240, EngineSettings::default()).unwrap()
    }

    #[test]
    fn particle_count_tracks_the_setting() {
        let mut engine = engine();
        for count in [0usize, 1, 50, 500, 3] {
            engine.set_particle_count(count);
            assert_eq!(engine.particles().len(), count);
        }
    }

    #[test]
    fn zero_particles_render_without_error() {
        let mut engine = engine();
        engine.set_particle_count(0);
        engine.render_frame(0.0, &SilentSource::new(128));
        assert_eq!(engine.telemetry().live_particles, 0);
    }

    #[test]
    fn growing_preserves_existing_particles() {
        let mut engine = engine();
        engine.set_particle_count(10);
        let kept: Vec<_> = engine.particles().to_vec();

        engine.set_particle_count(20);
        assert_eq!(engine.particles().len(), 20);
        assert_eq!(&engine.particles()[..10], &kept[..]);
    }

    #[test]
    fn mode_switch_preserves_other_settings() {
        let mut engine = engine();
        engine.set_theme(ThemeName::Cosmic);
        engine.set_sensitivity(7);
        engine.set_particle_count(42);

        for mode in VisualMode::ALL {
            engine.set_mode(mode);
            let settings = engine.settings();
            assert_eq!(settings.mode, mode);
            assert_eq!(settings.theme, ThemeName::Cosmic);
            assert_eq!(settings.sensitivity, 7);
            assert_eq!(settings.particle_count, 42);
        }
    }

    #[test]
    fn mode_switch_swaps_the_active_collections() {
        let mut engine = engine();
        assert!(!engine.particles().is_empty());
        assert!(engine.bars().is_empty());

        engine.set_mode(VisualMode::Bars);
        assert!(engine.particles().is_empty());
        assert_eq!(engine.bars().len(), modes::bars::BAR_COUNT);

        engine.set_mode(VisualMode::Wave);
        assert_eq!(engine.wave_points().len(), modes::wave::WAVE_POINT_COUNT);
        assert!(engine.bars().is_empty());
    }

    #[test]
    fn sensitivity_is_clamped_to_bounds() {
        let mut engine = engine();
        engine.set_sensitivity(0);
        assert_eq!(engine.settings().sensitivity, MIN_SENSITIVITY);
        engine.set_sensitivity(200);
        assert_eq!(engine.settings().sensitivity, MAX_SENSITIVITY);
    }

    #[test]
    fn reset_rewinds_time_and_rerandomises_particles() {
        let mut engine = engine();
        engine.render_frame(0.0, &SilentSource::new(128));
        engine.render_frame(0.5, &SilentSource::new(128));
        assert!(engine.elapsed() > 0.0);

        let before: Vec<_> = engine.particles().to_vec();
        let settings = *engine.settings();
        engine.reset();

        assert_eq!(engine.elapsed(), 0.0);
        assert_eq!(engine.settings(), &settings);
        assert_eq!(engine.particles().len(), before.len());
        let retained = engine
            .particles()
            .iter()
            .zip(&before)
            .filter(|(a, b)| a.x == b.x && a.y == b.y && a.vx == b.vx && a.vy == b.vy)
            .count();
        assert_eq!(retained, 0, "no particle should keep its position/velocity pair");
    }

    #[test]
    fn repeated_calls_at_the_same_instant_are_no_ops() {
        let mut engine = engine();
        let source = SilentSource::new(128);
        engine.render_frame(0.0, &source);
        let before: Vec<_> = engine.particles().to_vec();

        engine.render_frame(0.0, &source);
        assert_eq!(engine.particles(), &before[..]);
        assert_eq!(engine.elapsed(), 0.0);
    }

    #[test]
    fn throttle_drops_sub_interval_calls() {
        let mut engine = engine();
        let source = SilentSource::new(128);
        engine.render_frame(0.0, &source);
        engine.render_frame(0.005, &source);
        assert_eq!(engine.elapsed(), 0.0);

        engine.render_frame(0.020, &source);
        assert!((engine.elapsed() - 0.020).abs() < 0.0001);
    }

    #[test]
    fn every_mode_renders_idle_and_active_frames() {
        let loud = FixedSource(SpectrumFrame::from_bins(vec![200; 128]));
        for mode in VisualMode::ALL {
            let mut engine = engine();
            engine.set_mode(mode);
            engine.render_frame(0.0, &SilentSource::new(128));
            engine.render_frame(0.1, &loud);
            engine.render_frame(0.2, &loud);
        }
    }

    #[test]
    fn telemetry_reflects_the_latest_frame() {
        let mut engine = engine();
        let frame = SpectrumFrame::from_bins(vec![255; 128]);
        let expected_bass = frame.bass;
        let expected_avg = frame.avg;
        engine.render_frame(0.0, &FixedSource(frame));

        let telemetry = engine.telemetry();
        assert!((telemetry.frequency_hz - expected_avg * 10.0).abs() < 0.001);
        assert!((telemetry.bass_percent - expected_bass / 2.55).abs() < 0.001);
        assert_eq!(telemetry.live_particles, 200);
    }

    #[test]
    fn resize_recomputes_dimension_derived_layouts() {
        let mut engine = engine();
        engine.set_mode(VisualMode::Wave);
        engine.resize(640, 480).unwrap();

        let points = engine.wave_points();
        assert_eq!(points.len(), modes::wave::WAVE_POINT_COUNT);
        assert!(points.iter().all(|p| p.x < 640.0));
        assert!(points.iter().all(|p| p.base_y == 240.0));

        engine.set_mode(VisualMode::Bars);
        engine.resize(100, 100).unwrap();
        assert!(engine.bars().iter().all(|b| b.x < 100.0));
    }
}
