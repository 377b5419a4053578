use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use audio_visualiser_core::{
    AudioEngine, EngineSettings, SilentSource, Telemetry, ThemeName, VisualEngine, VisualMode,
    VisualiserError, DEFAULT_FFT_SIZE,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() -> audio_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            out_dir,
            opts,
        } => run_render(&input, &out_dir, &opts),
        Commands::Demo { seconds, opts } => run_demo(seconds, &opts),
    }
}

/// Decodes the input, drives the engine at a fixed tick rate and writes one
/// PNG per processed frame. Decode problems are non-fatal: the loop still
/// runs, rendering the resting animation from silent frames.
fn run_render(input: &Path, out_dir: &Path, opts: &VisualOpts) -> audio_visualiser_core::Result<()> {
    if !is_audio_file(input) {
        tracing::warn!(path = %input.display(), "not an audio file, nothing to do");
        return Ok(());
    }

    let decoded = match decode_wav(input) {
        Ok(decoded) => {
            tracing::info!(
                samples = decoded.samples.len(),
                sample_rate = decoded.sample_rate,
                "decoded audio"
            );
            Some(decoded)
        }
        Err(err) => {
            tracing::warn!(%err, "failed to decode audio, rendering idle frames");
            None
        }
    };

    fs::create_dir_all(out_dir)?;

    let audio = AudioEngine::new()?;
    let handle = audio.start()?;
    let mut engine = VisualEngine::new(opts.width, opts.height, engine_settings(opts)?)?;

    let fps = opts.fps.max(1);
    let (duration_seconds, sample_rate) = match &decoded {
        Some(d) => (d.samples.len() as f32 / d.sample_rate as f32, d.sample_rate),
        None => (IDLE_RENDER_SECONDS, 48_000),
    };
    let total_frames = (duration_seconds * fps as f32).ceil() as usize;
    let samples_per_tick = (sample_rate / fps).max(1) as usize;
    tracing::info!(frames = total_frames, fps, "rendering");

    let mut stats = open_stats(opts)?;
    for index in 0..total_frames {
        if let Some(d) = &decoded {
            let start = index * samples_per_tick;
            let end = ((index + 1) * samples_per_tick).min(d.samples.len());
            if start < end {
                audio.push_samples(&d.samples[start..end])?;
            }
        }

        engine.render_frame(index as f32 / fps as f32, &handle);
        engine
            .canvas()
            .save_png(out_dir.join(format!("frame_{index:05}.png")))?;
        write_stats(&mut stats, &engine.telemetry())?;
    }

    tracing::info!(out_dir = %out_dir.display(), "done");
    Ok(())
}

/// Runs the engine from the silent source only, demonstrating the resting
/// animation every mode produces without audio.
fn run_demo(seconds: u32, opts: &VisualOpts) -> audio_visualiser_core::Result<()> {
    let mut engine = VisualEngine::new(opts.width, opts.height, engine_settings(opts)?)?;
    let source = SilentSource::new(DEFAULT_FFT_SIZE / 2);

    let fps = opts.fps.max(1);
    let total_frames = (seconds * fps) as usize;
    tracing::info!(frames = total_frames, fps, "running demo loop");

    let mut stats = open_stats(opts)?;
    for index in 0..total_frames {
        engine.render_frame(index as f32 / fps as f32, &source);
        write_stats(&mut stats, &engine.telemetry())?;
        if index % fps as usize == 0 {
            let telemetry = engine.telemetry();
            tracing::info!(
                second = index / fps as usize,
                live_particles = telemetry.live_particles,
                "tick"
            );
        }
    }

    Ok(())
}

const IDLE_RENDER_SECONDS: f32 = 5.0;

fn engine_settings(opts: &VisualOpts) -> audio_visualiser_core::Result<EngineSettings> {
    let mode = VisualMode::parse(&opts.mode)
        .ok_or_else(|| VisualiserError::msg(format!("unknown visual mode `{}`", opts.mode)))?;
    let theme = ThemeName::parse(&opts.theme)
        .ok_or_else(|| VisualiserError::msg(format!("unknown theme `{}`", opts.theme)))?;

    Ok(EngineSettings {
        mode,
        theme,
        sensitivity: opts.sensitivity,
        particle_count: opts.particles,
    })
}

/// Media-type gate for selected files; anything else is skipped silently.
fn is_audio_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref(),
        Some("wav" | "mp3" | "ogg" | "flac")
    )
}

struct DecodedAudio {
    samples: Vec<f32>,
    sample_rate: u32,
}

/// Reads a WAV file and downmixes it to mono f32 samples.
fn decode_wav(path: &Path) -> audio_visualiser_core::Result<DecodedAudio> {
    let mut reader =
        hound::WavReader::open(path).map_err(|err| VisualiserError::msg(err.to_string()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|err| VisualiserError::msg(err.to_string()))?,
        hound::SampleFormat::Int => {
            let scale = (1u64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(|err| VisualiserError::msg(err.to_string()))?
        }
    };

    let samples = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}

fn open_stats(opts: &VisualOpts) -> audio_visualiser_core::Result<Option<fs::File>> {
    match &opts.stats {
        Some(path) => Ok(Some(fs::File::create(path)?)),
        None => Ok(None),
    }
}

fn write_stats(
    stats: &mut Option<fs::File>,
    telemetry: &Telemetry,
) -> audio_visualiser_core::Result<()> {
    if let Some(file) = stats {
        let line = serde_json::to_string(telemetry)
            .map_err(|err| VisualiserError::msg(err.to_string()))?;
        writeln!(file, "{line}")?;
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Audio-reactive visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode an audio file and render audio-reactive PNG frames.
    Render {
        /// Path to the audio file to visualise.
        input: PathBuf,
        /// Directory that receives the rendered frames.
        #[arg(short, long, default_value = "frames")]
        out_dir: PathBuf,
        #[command(flatten)]
        opts: VisualOpts,
    },
    /// Render the resting animation without any audio loaded.
    Demo {
        /// How long to run, in seconds.
        #[arg(long, default_value_t = 5)]
        seconds: u32,
        #[command(flatten)]
        opts: VisualOpts,
    },
}

#[derive(Args, Debug)]
struct VisualOpts {
    /// Visual mode: particles, bars, wave, circular or galaxy.
    #[arg(long, default_value = "particles")]
    mode: String,
    /// Color theme: neon, sunset, ocean, forest or cosmic.
    #[arg(long, default_value = "neon")]
    theme: String,
    /// Reactive sensitivity, 1-10.
    #[arg(long, default_value_t = 4)]
    sensitivity: u8,
    /// Particle count for the particle-based modes.
    #[arg(long, default_value_t = 200)]
    particles: usize,
    #[arg(long, default_value_t = 1280)]
    width: u32,
    #[arg(long, default_value_t = 720)]
    height: u32,
    /// Scheduler tick rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Append per-frame telemetry as JSON lines to this file.
    #[arg(long)]
    stats: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_extensions_pass_the_type_gate() {
        assert!(is_audio_file(Path::new("track.wav")));
        assert!(is_audio_file(Path::new("TRACK.WAV")));
        assert!(is_audio_file(Path::new("song.mp3")));
        assert!(!is_audio_file(Path::new("notes.txt")));
        assert!(!is_audio_file(Path::new("no_extension")));
    }

    #[test]
    fn missing_files_fail_decoding_gracefully() {
        assert!(decode_wav(Path::new("/does/not/exist.wav")).is_err());
    }

    #[test]
    fn settings_reject_unknown_names() {
        let mut opts = VisualOpts {
            mode: "particles".into(),
            theme: "neon".into(),
            sensitivity: 4,
            particles: 200,
            width: 640,
            height: 480,
            fps: 60,
            stats: None,
        };
        assert!(engine_settings(&opts).is_ok());

        opts.mode = "plasma".into();
        assert!(engine_settings(&opts).is_err());

        opts.mode = "wave".into();
        opts.theme = "lava".into();
        assert!(engine_settings(&opts).is_err());
    }
}
