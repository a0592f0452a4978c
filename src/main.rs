use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use juggle_apex::evaluator::LogFeedbackSink;
use juggle_apex::{
    ManualClock, ReplayDetector, Settings, ThrowPipeline, append_statistics, run_replay,
};

/// Replay recorded juggling ball detections and score each throw's height.
#[derive(Parser)]
#[command(name = "juggle-replay")]
struct Cli {
    /// JSON-lines file with one frame of detection boxes per line.
    detections: PathBuf,

    /// Frame rate used to time frames that carry no timestamp.
    #[arg(long, default_value = "30")]
    fps: f64,

    /// Settings file; defaults are used when it does not exist.
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// File the run's "successes,failures" line is appended to.
    #[arg(long, default_value = "statistics.txt")]
    statistics: PathBuf,

    /// Factor applied to camera frames before detection.
    #[arg(short = 's', long)]
    scale: Option<f64>,

    /// Max time to reacquire a tracked ball, in seconds.
    #[arg(short = 't', long)]
    track_time: Option<f64>,

    /// Max range to reacquire a tracked ball, in native pixels.
    #[arg(short = 'r', long)]
    track_range: Option<f64>,

    /// Move the target band by this many pixels (negative raises it).
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    band_shift: i32,

    /// Grow (positive) or shrink (negative) the target band.
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    band_resize: i32,

    /// Log every tracked ball on every frame. Not written to the settings.
    #[arg(short, long)]
    debug: bool,

    /// Write the settings, including the adjusted band, back on exit.
    #[arg(long)]
    save_settings: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut settings = Settings::load(&cli.settings)?;
    settings.apply_overrides(cli.scale, cli.track_time, cli.track_range)?;
    let debug = settings.debug || cli.debug;

    let detector = ReplayDetector::from_reader(BufReader::new(File::open(&cli.detections)?))?;
    log::info!(
        "Loaded {} frames from {}",
        detector.remaining(),
        cli.detections.display()
    );

    let clock = ManualClock::new();
    let mut pipeline = ThrowPipeline::from_settings(detector, &settings, clock.clone());
    pipeline.evaluator_mut().shift_band(cli.band_shift);
    pipeline.evaluator_mut().resize_band(cli.band_resize);

    let mut sink = LogFeedbackSink::new();
    let stats = run_replay(&mut pipeline, &clock, cli.fps, debug, &mut sink)?;

    println!("{}", stats.summary());
    append_statistics(&cli.statistics, &stats)?;
    log::info!("Statistics appended to {}", cli.statistics.display());

    if cli.save_settings {
        let band = pipeline.evaluator().band();
        settings.success_area_y = band.start_y();
        settings.success_area_length = band.length();
        settings.save(&cli.settings)?;
        log::info!("Settings written to {}", cli.settings.display());
    }

    Ok(())
}
