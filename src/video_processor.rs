// src/video_processor.rs

use crate::metrics::PipelineMetrics;
use crate::types::VideoConfig;
use anyhow::{Context, Result};
use opencv::{
    core::{self, Mat},
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureTraitConst, VideoWriter},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "avi", "mov", "mkv", "m4v"];

/// Per-frame transformation run by the driver. The driver knows nothing
/// about what happens inside.
pub trait FrameProcessor {
    fn process(&mut self, frame: &Mat) -> Result<Mat>;

    /// Called before each new stream.
    fn reset(&mut self) {}
}

/// Sequential frame supply. `Ok(None)` marks the end of the stream.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Mat>>;

    /// Percentage of the stream consumed so far, 0 when unknown.
    fn progress(&self) -> f32 {
        0.0
    }
}

pub trait FrameSink {
    fn write_frame(&mut self, frame: &Mat) -> Result<()>;
}

pub struct VideoProcessor {
    config: VideoConfig,
}

impl VideoProcessor {
    pub fn new(config: VideoConfig) -> Self {
        Self { config }
    }

    /// `input` itself when it is a file, otherwise every video below it.
    pub fn find_video_files(&self, input: &Path) -> Result<Vec<PathBuf>> {
        if input.is_file() {
            return Ok(vec![input.to_path_buf()]);
        }
        if !input.is_dir() {
            anyhow::bail!("Input {} does not exist", input.display());
        }

        let mut videos: Vec<PathBuf> = WalkDir::new(input)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_video(e.path()))
            .map(|e| e.into_path())
            .collect();
        videos.sort();

        info!("Found {} video files", videos.len());
        Ok(videos)
    }

    pub fn open_video(&self, path: &Path) -> Result<VideoReader> {
        info!("Opening video: {}", path.display());

        let path_str = path
            .to_str()
            .with_context(|| format!("non UTF-8 path {}", path.display()))?;
        let cap = VideoCapture::from_file(path_str, videoio::CAP_ANY)?;

        if !cap.is_opened()? {
            anyhow::bail!("Failed to open video file {}", path.display());
        }

        let fps = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FPS)?;
        let total_frames = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FRAME_COUNT)? as i64;
        let width = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FRAME_WIDTH)? as i32;
        let height = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FRAME_HEIGHT)? as i32;

        info!(
            "Video properties: {}x{} @ {:.1} FPS, {} frames",
            width, height, fps, total_frames
        );

        Ok(VideoReader {
            cap,
            fps,
            total_frames,
            current_frame: 0,
            width,
            height,
        })
    }

    /// `<output_dir>/<stem>_lanes.avi`
    pub fn output_path(&self, input_path: &Path) -> PathBuf {
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        PathBuf::from(&self.config.output_dir).join(format!("{}_lanes.avi", stem))
    }

    pub fn create_writer(
        &self,
        input_path: &Path,
        width: i32,
        height: i32,
        fps: f64,
    ) -> Result<VideoSink> {
        std::fs::create_dir_all(&self.config.output_dir)
            .with_context(|| format!("creating {}", self.config.output_dir))?;

        let output_path = self.output_path(input_path);
        info!("Output video: {}", output_path.display());

        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            warn!(
                "Source reports no frame rate, writing at {:.1} FPS",
                self.config.fallback_fps
            );
            self.config.fallback_fps
        };

        let mut code = self.config.fourcc.chars();
        let (Some(c1), Some(c2), Some(c3), Some(c4)) =
            (code.next(), code.next(), code.next(), code.next())
        else {
            anyhow::bail!("Invalid fourcc {:?}", self.config.fourcc);
        };
        let fourcc = VideoWriter::fourcc(c1, c2, c3, c4)?;

        let path_str = output_path
            .to_str()
            .with_context(|| format!("non UTF-8 path {}", output_path.display()))?;
        let writer = VideoWriter::new(path_str, fourcc, fps, core::Size::new(width, height), true)?;
        if !writer.is_opened()? {
            anyhow::bail!("Failed to open video writer {}", output_path.display());
        }

        Ok(VideoSink {
            writer,
            path: output_path,
        })
    }

    /// Run one video through `processor`, writing the annotated copy.
    pub fn process_video<P: FrameProcessor>(
        &self,
        video_path: &Path,
        processor: &mut P,
    ) -> Result<PipelineMetrics> {
        let mut reader = self.open_video(video_path)?;
        let mut sink = self.create_writer(video_path, reader.width, reader.height, reader.fps)?;

        processor.reset();
        let metrics = run_frames(
            &mut reader,
            processor,
            &mut sink,
            self.config.progress_interval,
        )?;

        info!("Wrote {}", sink.path.display());
        Ok(metrics)
    }
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Read → process → write until the source runs dry.
///
/// Frames the processor rejects are logged and dropped; the loop goes on.
/// Source and sink errors end the run.
pub fn run_frames<S, P, K>(
    source: &mut S,
    processor: &mut P,
    sink: &mut K,
    progress_interval: u64,
) -> Result<PipelineMetrics>
where
    S: FrameSource + ?Sized,
    P: FrameProcessor + ?Sized,
    K: FrameSink + ?Sized,
{
    let mut metrics = PipelineMetrics::new();

    while let Some(frame) = source.next_frame()? {
        metrics.frames_read += 1;

        match processor.process(&frame) {
            Ok(out) => {
                sink.write_frame(&out)?;
                metrics.frames_written += 1;
            }
            Err(e) => {
                metrics.frames_skipped += 1;
                warn!("Frame {} skipped: {:#}", metrics.frames_read, e);
            }
        }

        if progress_interval > 0 && metrics.frames_read % progress_interval == 0 {
            info!(
                "Progress: {:.1}% ({} frames) | {:.1} FPS",
                source.progress(),
                metrics.frames_read,
                metrics.fps()
            );
        }
    }

    debug!(
        "Stream finished: {} read, {} written, {} skipped",
        metrics.frames_read, metrics.frames_written, metrics.frames_skipped
    );
    Ok(metrics)
}

pub struct VideoReader {
    pub cap: VideoCapture,
    pub fps: f64,
    pub total_frames: i64,
    pub current_frame: i64,
    pub width: i32,
    pub height: i32,
}

impl FrameSource for VideoReader {
    fn next_frame(&mut self) -> Result<Option<Mat>> {
        use opencv::videoio::VideoCaptureTrait;

        let mut mat = Mat::default();
        if !VideoCaptureTrait::read(&mut self.cap, &mut mat)? || mat.empty() {
            return Ok(None);
        }

        self.current_frame += 1;
        Ok(Some(mat))
    }

    fn progress(&self) -> f32 {
        if self.total_frames <= 0 {
            return 0.0;
        }
        (self.current_frame as f32 / self.total_frames as f32) * 100.0
    }
}

pub struct VideoSink {
    pub writer: VideoWriter,
    pub path: PathBuf,
}

impl FrameSink for VideoSink {
    fn write_frame(&mut self, frame: &Mat) -> Result<()> {
        use opencv::videoio::VideoWriterTrait;
        self.writer.write(frame)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane_detection::LaneDetector;
    use crate::test_utils::{black_frame, two_lane_frame};
    use crate::types::DetectionConfig;
    use opencv::core::{Scalar, CV_8UC1};
    use std::collections::VecDeque;

    struct MemorySource {
        frames: VecDeque<Mat>,
        total: usize,
    }

    impl MemorySource {
        fn new(frames: Vec<Mat>) -> Self {
            let total = frames.len();
            Self {
                frames: frames.into(),
                total,
            }
        }
    }

    impl FrameSource for MemorySource {
        fn next_frame(&mut self) -> Result<Option<Mat>> {
            Ok(self.frames.pop_front())
        }

        fn progress(&self) -> f32 {
            100.0 * (self.total - self.frames.len()) as f32 / self.total as f32
        }
    }

    #[derive(Default)]
    struct MemorySink {
        frames: Vec<Mat>,
    }

    impl FrameSink for MemorySink {
        fn write_frame(&mut self, frame: &Mat) -> Result<()> {
            self.frames.push(frame.try_clone()?);
            Ok(())
        }
    }

    #[test]
    fn test_runs_every_frame_and_skips_bad_ones() {
        let gray = Mat::new_rows_cols_with_default(480, 640, CV_8UC1, Scalar::all(0.0)).unwrap();
        let mut source = MemorySource::new(vec![two_lane_frame(), gray, black_frame()]);
        let mut sink = MemorySink::default();
        let mut detector = LaneDetector::new(DetectionConfig::default());

        let metrics = run_frames(&mut source, &mut detector, &mut sink, 1).unwrap();

        assert_eq!(metrics.frames_read, 3);
        assert_eq!(metrics.frames_written, 2);
        assert_eq!(metrics.frames_skipped, 1);
        assert_eq!(sink.frames.len(), 2);
        for out in &sink.frames {
            assert_eq!((out.rows(), out.cols()), (480, 640));
        }
        assert_eq!(detector.stats().frames, 2);
    }

    #[test]
    fn test_empty_source_is_not_an_error() {
        let mut source = MemorySource::new(Vec::new());
        let mut sink = MemorySink::default();
        let mut detector = LaneDetector::new(DetectionConfig::default());

        let metrics = run_frames(&mut source, &mut detector, &mut sink, 50).unwrap();
        assert_eq!(metrics.frames_read, 0);
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn test_find_video_files_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("day2")).unwrap();
        for name in ["a.mp4", "notes.txt", "day2/b.AVI", "day2/c.mkv"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let processor = VideoProcessor::new(VideoConfig::default());
        let found = processor.find_video_files(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mp4", "b.AVI", "c.mkv"]);

        let single = processor
            .find_video_files(&dir.path().join("a.mp4"))
            .unwrap();
        assert_eq!(single.len(), 1);

        assert!(processor
            .find_video_files(&dir.path().join("missing"))
            .is_err());
    }

    #[test]
    fn test_output_path_uses_stem() {
        let processor = VideoProcessor::new(VideoConfig {
            output_dir: "out".to_string(),
            ..VideoConfig::default()
        });
        assert_eq!(
            processor.output_path(Path::new("/videos/highway.mp4")),
            PathBuf::from("out/highway_lanes.avi")
        );
    }
}
