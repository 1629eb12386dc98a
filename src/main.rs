// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use lanemark::metrics::MetricsSummary;
use lanemark::{Config, LaneDetector, VideoProcessor};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Parser)]
#[command(name = "lanemark")]
#[command(about = "Detect lane boundaries in road videos and write annotated copies")]
#[command(version)]
struct Cli {
    /// Video file, or a directory searched recursively for videos.
    input: PathBuf,

    /// YAML configuration. Defaults to ./config.yaml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for annotated videos (overrides video.output_dir).
    #[arg(long)]
    output_dir: Option<String>,

    /// Smoothing window in frames (overrides detection.smoothing.window).
    #[arg(long)]
    window: Option<usize>,

    /// Log level (overrides logging.level; RUST_LOG wins over both).
    #[arg(long)]
    log_level: Option<String>,

    /// Write per-video run summaries as JSON.
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None if Path::new(DEFAULT_CONFIG).is_file() => Config::load(DEFAULT_CONFIG)?,
        None => Config::default(),
    };

    if let Some(dir) = &cli.output_dir {
        config.video.output_dir = dir.clone();
    }
    if let Some(window) = cli.window {
        config.detection.smoothing.window = window;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lanemark={}", config.logging.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🛣️  Lane detection starting");
    info!(
        "Smoothing window: {} | slope cutoff: {:.2} | Canny {}/{}",
        config.detection.smoothing.window,
        config.detection.classifier.min_abs_slope,
        config.detection.edges.canny_low,
        config.detection.edges.canny_high
    );

    let video_processor = VideoProcessor::new(config.video.clone());
    let video_files = video_processor.find_video_files(&cli.input)?;
    if video_files.is_empty() {
        anyhow::bail!("No video files found in {}", cli.input.display());
    }

    let mut detector = LaneDetector::new(config.detection.clone());
    let mut summaries: Vec<(PathBuf, MetricsSummary)> = Vec::new();

    for (idx, video_path) in video_files.iter().enumerate() {
        info!(
            "Processing video {}/{}: {}",
            idx + 1,
            video_files.len(),
            video_path.display()
        );

        match video_processor.process_video(video_path, &mut detector) {
            Ok(metrics) => {
                let summary = metrics.summary(*detector.stats());
                info!("✓ Video processed");
                info!("  Frames read: {}", summary.frames_read);
                info!("  Frames written: {}", summary.frames_written);
                if summary.frames_skipped > 0 {
                    warn!("  Frames skipped: {}", summary.frames_skipped);
                }
                info!(
                    "  Full lane drawn: {:.1}% | left {} | right {}",
                    summary.detection.lane_coverage(),
                    summary.detection.frames_with_left,
                    summary.detection.frames_with_right
                );
                info!("  Processing speed: {:.1} FPS", summary.fps);
                summaries.push((video_path.clone(), summary));
            }
            Err(e) => error!("Failed to process {}: {:#}", video_path.display(), e),
        }
    }

    if let Some(path) = &cli.summary {
        let report: Vec<_> = summaries
            .iter()
            .map(|(video, summary)| {
                serde_json::json!({
                    "video": video.display().to_string(),
                    "summary": summary,
                })
            })
            .collect();
        let contents = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, contents)
            .with_context(|| format!("writing summary {}", path.display()))?;
        info!("Summary written to {}", path.display());
    }

    if summaries.is_empty() {
        anyhow::bail!("None of the {} input video(s) could be processed", video_files.len());
    }

    Ok(())
}
