mod capture;
mod config;
mod cv;
mod display;
mod error;
mod gesture;
mod pipeline;
mod segmentation;

use anyhow::{Context, Result};
use capture::{CaptureSource, WebcamCapture};
use chrono::Local;
use clap::Parser;
use config::PipelineConfig;
use display::{
    is_exit_key, DisplaySink, HeadlessDisplay, View, WINDOW_BLUR, WINDOW_FOREGROUND, WINDOW_MASK,
    WINDOW_ORIGINAL,
};
use pipeline::HandPosePipeline;
use std::time::Duration;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input webcam device index
    #[arg(short, long, default_value_t = 0)]
    input_device: u32,

    /// Capture resolution width
    #[arg(long, default_value_t = 640)]
    capture_width: u32,

    /// Capture resolution height
    #[arg(long, default_value_t = 480)]
    capture_height: u32,

    /// Camera brightness applied at startup
    #[arg(long, default_value_t = 200)]
    brightness: i64,

    /// Leave the camera brightness untouched
    #[arg(long)]
    keep_brightness: bool,

    /// Background history window in frames
    #[arg(long, default_value_t = 2000)]
    history: u32,

    /// Background variance threshold
    #[arg(long, default_value_t = 16.0)]
    var_threshold: f32,

    /// Mark shadows in the background model (unsupported, fails validation)
    #[arg(long)]
    detect_shadows: bool,

    /// Passes of 3x3 erosion over the foreground mask
    #[arg(long, default_value_t = 1)]
    erode_iterations: u8,

    /// Gaussian blur kernel size (odd)
    #[arg(long, default_value_t = 61)]
    blur_size: u32,

    /// Silhouette threshold after blurring
    #[arg(long, default_value_t = 30)]
    threshold: u8,

    /// Largest defect angle in degrees counted as a gap between fingers
    #[arg(long, default_value_t = 90.0)]
    max_finger_angle: f64,

    /// Ignore convexity defects no deeper than this many pixels
    #[arg(long, default_value_t = 0.0)]
    min_defect_depth: f64,

    /// Gap count read as a fist
    #[arg(long, default_value_t = 0)]
    fist_gaps: usize,

    /// Smallest gap count read as fingers spread
    #[arg(long, default_value_t = 4)]
    spread_min: usize,

    /// Largest gap count read as fingers spread
    #[arg(long, default_value_t = 5)]
    spread_max: usize,

    /// Skip bilateral smoothing of the raw frame
    #[arg(long)]
    no_smoothing: bool,

    /// Do not mirror the frame
    #[arg(long)]
    no_mirror: bool,

    /// Milliseconds to wait for a key press between frames
    #[arg(long, default_value_t = 100)]
    wait_ms: u64,

    /// Do not open debug windows
    #[arg(long)]
    headless: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            history: self.history,
            var_threshold: self.var_threshold,
            detect_shadows: self.detect_shadows,
            erode_iterations: self.erode_iterations,
            blur_size: self.blur_size,
            threshold: self.threshold,
            max_finger_angle: self.max_finger_angle.to_radians(),
            min_defect_depth: self.min_defect_depth,
            fist_gaps: self.fist_gaps,
            spread_gaps: self.spread_min..=self.spread_max,
            smoothing: !self.no_smoothing,
            mirror: !self.no_mirror,
        }
    }
}

#[cfg(feature = "highgui")]
fn open_windows() -> Result<Option<Box<dyn DisplaySink>>> {
    let windows = display::HighGuiDisplay::new().context("Failed to open debug windows")?;
    Ok(Some(Box::new(windows)))
}

#[cfg(not(feature = "highgui"))]
fn open_windows() -> Result<Option<Box<dyn DisplaySink>>> {
    tracing::info!("Built without the highgui feature, running headless");
    Ok(None)
}

fn open_display(headless: bool) -> Result<Box<dyn DisplaySink>> {
    if !headless {
        if let Some(display) = open_windows()? {
            return Ok(display);
        }
    }

    tracing::info!("Press Ctrl+C to stop");
    Ok(Box::new(HeadlessDisplay))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // stdout carries the pose lines
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Hand pose detector starting");

    let config = args.pipeline_config();
    let mut pipeline = HandPosePipeline::new(config).context("Invalid pipeline configuration")?;

    let brightness = (!args.keep_brightness).then_some(args.brightness);
    let mut capture = WebcamCapture::new(
        args.input_device,
        args.capture_width,
        args.capture_height,
        brightness,
    )
    .context("Failed to initialize webcam capture")?;
    let (width, height) = capture.resolution();
    tracing::info!("Capture: {}x{}", width, height);

    let mut display = open_display(args.headless)?;

    run_loop(
        &mut capture,
        &mut pipeline,
        display.as_mut(),
        Duration::from_millis(args.wait_ms),
    )
}

fn run_loop<C>(
    capture: &mut C,
    pipeline: &mut HandPosePipeline,
    display: &mut dyn DisplaySink,
    wait: Duration,
) -> Result<()>
where
    C: CaptureSource,
{
    tracing::info!("Starting main loop");

    while capture.is_open() {
        let frame = capture.capture_frame().context("Failed to capture frame")?;
        let analysis = pipeline.process(&frame).context("Failed to process frame")?;

        println!(
            "hand pose at {}: {}",
            Local::now().format(TIMESTAMP_FORMAT),
            analysis.pose
        );

        display.show(WINDOW_ORIGINAL, View::Color(&analysis.annotated))?;
        display.show(WINDOW_FOREGROUND, View::Color(&analysis.foreground.image))?;
        display.show(WINDOW_BLUR, View::Gray(&analysis.shape.blurred))?;
        display.show(WINDOW_MASK, View::Gray(&analysis.shape.mask))?;

        if let Some(key) = display.wait_key(wait)? {
            if is_exit_key(key) {
                tracing::info!("Exit requested after {} frames", pipeline.frames_processed());
                break;
            }
        }
    }

    if !capture.is_open() {
        tracing::info!("Camera stream closed");
    }

    Ok(())
}
