//! Luma Reorient CLI
//!
//! Command-line interface for exercising the frame pipeline with
//! synthetic camera input and a configurable decoder.

use clap::Parser;
use luma_reorient::{
    capture::{Camera, DecoderKind, FileConfig, MockCamera},
    decode::{Decoded, Decoder, MockDecoder},
    metrics::{MetricsRegistry, MetricsSnapshot},
    orientation::OrientationTracker,
    pipeline::FramePipeline,
    report,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Reorient camera luminance planes and hand them to a barcode decoder.
#[derive(Debug, Parser)]
#[command(name = "luma-reorient", version, about)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to process (ignored with --continuous).
    #[arg(short = 'n', long)]
    frames: Option<u32>,

    /// Process frames until interrupted.
    #[arg(long)]
    continuous: bool,

    /// Frame width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Sensor mounting orientation in degrees.
    #[arg(long, allow_negative_numbers = true)]
    sensor_orientation: Option<i32>,

    /// Initial device orientation in degrees.
    #[arg(long, allow_negative_numbers = true)]
    device_orientation: Option<i32>,

    /// Turn the simulated device a quarter turn every N frames (0 disables).
    #[arg(long, default_value_t = 0)]
    rotate_every: u32,

    /// Mock decoder recognizes every Nth frame.
    #[arg(long)]
    recognize_every: Option<u32>,

    /// Use the QR decoder instead of the mock decoder.
    #[arg(long)]
    qr: bool,

    /// Metrics server port (0 disables).
    #[arg(long)]
    metrics_port: Option<u16>,

    /// Print Prometheus metrics on exit.
    #[arg(long)]
    print_metrics: bool,
}

impl Args {
    fn apply(&self, config: &mut FileConfig) {
        if let Some(frames) = self.frames {
            config.output.frame_count = frames;
        }
        if self.continuous {
            config.output.continuous = true;
        }
        if let Some(width) = self.width {
            config.capture.width = width;
        }
        if let Some(height) = self.height {
            config.capture.height = height;
        }
        if let Some(sensor) = self.sensor_orientation {
            config.orientation.sensor_orientation = sensor;
        }
        if let Some(device) = self.device_orientation {
            config.orientation.initial_device_orientation = device;
        }
        if let Some(n) = self.recognize_every {
            config.decoder.recognize_every = n;
        }
        if self.qr {
            config.decoder.kind = DecoderKind::Qr;
        }
        if let Some(port) = self.metrics_port {
            config.output.metrics_port = port;
        }
    }
}

fn build_decoder(config: &FileConfig) -> Result<Box<dyn Decoder>, String> {
    match config.decoder.kind {
        DecoderKind::Mock => Ok(Box::new(MockDecoder::recognize_every(
            config.decoder.recognize_every,
            Decoded::new(config.decoder.payload.clone(), config.decoder.symbology),
        ))),
        #[cfg(feature = "qr")]
        DecoderKind::Qr => Ok(Box::new(luma_reorient::decode::QrDecoder::new())),
        #[cfg(not(feature = "qr"))]
        DecoderKind::Qr => Err("QR decoder requires the `qr` feature".to_string()),
    }
}

/// Consecutive capture failures tolerated before the loop gives up.
const MAX_CAPTURE_FAILURES: u32 = 30;

/// Where end-of-frame snapshots go: a local registry, or the one behind
/// the HTTP exporter.
enum MetricsSink {
    Local(MetricsRegistry),
    #[cfg(feature = "metrics")]
    Served(luma_reorient::metrics::SharedMetrics),
}

impl MetricsSink {
    fn publish(&mut self, snapshot: MetricsSnapshot) {
        match self {
            MetricsSink::Local(registry) => registry.update(&snapshot),
            #[cfg(feature = "metrics")]
            MetricsSink::Served(state) => state.blocking_write().update(snapshot),
        }
    }

    fn encode(&self) -> Result<String, luma_reorient::metrics::MetricsError> {
        match self {
            MetricsSink::Local(registry) => registry.encode(),
            #[cfg(feature = "metrics")]
            MetricsSink::Served(state) => state.blocking_read().encode(),
        }
    }
}

#[cfg(feature = "metrics")]
fn start_metrics_server(port: u16, registry: MetricsRegistry) -> MetricsSink {
    use luma_reorient::metrics::MetricsServer;

    let server = MetricsServer::new(port, registry);
    let state = server.state();

    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                warn!("Failed to start metrics runtime: {}", e);
                return;
            }
        };
        if let Err(e) = runtime.block_on(server.run()) {
            warn!("Metrics server stopped: {}", e);
        }
    });

    MetricsSink::Served(state)
}

#[cfg(feature = "metrics")]
fn metrics_sink(port: u16, registry: MetricsRegistry) -> MetricsSink {
    if port > 0 {
        start_metrics_server(port, registry)
    } else {
        MetricsSink::Local(registry)
    }
}

#[cfg(not(feature = "metrics"))]
fn metrics_sink(port: u16, registry: MetricsRegistry) -> MetricsSink {
    if port > 0 {
        info!("Metrics port {} ignored: built without the `metrics` feature", port);
    }
    MetricsSink::Local(registry)
}

/// Tracks back-to-back capture failures.
#[derive(Debug, Default)]
struct CaptureFailures {
    consecutive: u32,
    total: u64,
}

impl CaptureFailures {
    /// Records a failure; returns false once the camera looks dead.
    fn fail(&mut self) -> bool {
        self.consecutive += 1;
        self.total += 1;
        self.consecutive < MAX_CAPTURE_FAILURES
    }

    fn succeed(&mut self) {
        self.consecutive = 0;
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };
    args.apply(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("Luma Reorient v{}", luma_reorient::VERSION);
    info!("This is a demonstration using mock camera input");

    // Initialize components
    let tracker = match OrientationTracker::from_config(&config.orientation) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            eprintln!("Invalid orientation config: {}", e);
            std::process::exit(1);
        }
    };

    let decoder = match build_decoder(&config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut camera = MockCamera::new();
    if let Err(e) = camera.open(&config.capture) {
        eprintln!("Failed to open camera: {}", e);
        std::process::exit(1);
    }

    let registry = match MetricsRegistry::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to create metrics registry: {}", e);
            std::process::exit(1);
        }
    };

    let mut metrics = metrics_sink(config.output.metrics_port, registry);

    // Application side of the decode event channel
    let (reporter, events) = report::channel();
    let listener = std::thread::spawn(move || {
        let mut received = 0u64;
        for event in events.iter() {
            println!(
                "Decoded frame {}: {} (rotated {})",
                event.frame_sequence, event, event.rotation
            );
            received += 1;
        }
        received
    });

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut pipeline = FramePipeline::new(Arc::clone(&tracker), decoder, reporter);
    let frame_interval = Duration::from_secs(1) / config.capture.fps;
    let mut device_orientation = config.orientation.initial_device_orientation.max(0);

    info!(
        width = config.capture.width,
        height = config.capture.height,
        rotation = %tracker.current(),
        "Processing frames..."
    );

    let mut processed: u64 = 0;
    let mut capture_failures = CaptureFailures::default();
    while running.load(Ordering::SeqCst)
        && (config.output.continuous || processed < u64::from(config.output.frame_count))
    {
        if args.rotate_every > 0 && processed > 0 && processed % u64::from(args.rotate_every) == 0
        {
            device_orientation = (device_orientation + 90) % 360;
            tracker.on_device_orientation(device_orientation);
        }

        let frame = match camera.capture() {
            Ok(f) => {
                capture_failures.succeed();
                f
            }
            Err(e) => {
                warn!("Frame capture failed: {}", e);
                if !capture_failures.fail() {
                    error!(
                        "Giving up after {} consecutive capture failures",
                        MAX_CAPTURE_FAILURES
                    );
                    break;
                }
                std::thread::sleep(frame_interval);
                continue;
            }
        };

        pipeline.process(frame);
        processed += 1;
        metrics.publish(MetricsSnapshot::from_stats(pipeline.stats()));

        if config.output.continuous {
            std::thread::sleep(frame_interval);
        }
    }

    let stats = pipeline.stats().clone();
    // Dropping the pipeline closes the event channel
    drop(pipeline);
    let delivered = listener.join().unwrap_or(0);

    info!(
        "Processed {} frames: {} decoded, {} not recognized, {} failed, {} skipped",
        stats.frames_received,
        stats.frames_decoded,
        stats.frames_not_recognized,
        stats.frames_failed,
        stats.frames_skipped
    );
    info!("Application received {} decode events", delivered);

    if stats.release_failures > 0 {
        warn!("{} frame release failures", stats.release_failures);
    }
    if capture_failures.total > 0 {
        warn!("{} frame captures failed", capture_failures.total);
    }

    metrics.publish(MetricsSnapshot::from_stats(&stats));
    if args.print_metrics {
        match metrics.encode() {
            Ok(text) => print!("{}", text),
            Err(e) => warn!("Failed to encode metrics: {}", e),
        }
    }

    camera.close();
    info!("Done. Outstanding frames: {}", camera.ledger().outstanding());
}
