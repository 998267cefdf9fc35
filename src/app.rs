//! Main application module for sign language recognition.

use crate::{
    assets::AssetBundle,
    config::Config,
    error::Result,
    processor::{ProcessingResult, SignLanguageProcessor},
};
use log::{debug, info, warn};
use opencv::{
    core::{Mat, Scalar},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};
use std::time::{Duration, Instant};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Camera index or video file path
    pub video_source: VideoSource,
    /// Image inversion mode
    pub invert_mode: InvertMode,
    /// Brightness adjustment value
    pub brightness: f32,
    /// Stop after this many frames (None runs until the source ends)
    pub max_frames: Option<u64>,
    /// Minimum confidence for reporting a prediction
    pub confidence_floor: f32,
    /// Reset the sequence after this many consecutive pose-free frames
    /// (0 disables)
    pub reset_after_lost: u32,
}

/// Video source type
#[derive(Debug, Clone)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(String),
}

/// Image inversion mode
#[derive(Debug, Clone, PartialEq)]
pub enum InvertMode {
    /// No inversion
    None,
    /// Mirror horizontally (selfie view)
    X,
    /// Flip vertically
    Y,
    /// Both horizontal and vertical
    XY,
}

impl InvertMode {
    /// Parse an inversion mode from its CLI/config spelling
    #[must_use]
    pub fn parse(mode: &str) -> Self {
        match mode {
            "x" => InvertMode::X,
            "y" => InvertMode::Y,
            "xy" => InvertMode::XY,
            _ => InvertMode::None,
        }
    }
}

/// Main application struct
pub struct SignLanguageApp {
    config: AppConfig,
    processor: SignLanguageProcessor,
    video_capture: VideoCapture,
    lost_streak: u32,
}

impl SignLanguageApp {
    /// Create a new sign language recognition application
    ///
    /// # Errors
    ///
    /// Returns an error if the video source cannot be opened or the
    /// pipeline cannot be constructed from the asset bundle.
    pub fn new(config: AppConfig, file_config: &Config) -> Result<Self> {
        info!("Initializing sign language recognition application");

        let video_capture = match &config.video_source {
            VideoSource::Camera(index) => {
                info!("Opening camera {}", index);
                let mut cap = VideoCapture::new(*index, videoio::CAP_ANY)?;

                // Reduce buffer size for lower latency (webcam only)
                cap.set(CAP_PROP_BUFFERSIZE, 1.0)?;
                info!("Camera buffer size set to 1 for low latency");

                cap
            }
            VideoSource::File(path) => {
                info!("Opening video file: {}", path);
                VideoCapture::from_file(path, videoio::CAP_ANY)?
            }
        };

        let bundle = AssetBundle::new(&file_config.assets.dir)?;
        let processor = SignLanguageProcessor::new(&bundle, file_config)?;

        Ok(Self {
            config,
            processor,
            video_capture,
            lost_streak: 0,
        })
    }

    /// Run the main application loop, releasing pipeline resources on every
    /// exit path
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the video source or a frame
    /// transformation fails.
    pub async fn run(&mut self) -> Result<()> {
        let outcome = self.run_loop().await;
        self.processor.close();
        info!("Application shut down");
        outcome
    }

    async fn run_loop(&mut self) -> Result<()> {
        info!("Entering main loop");

        let mut frame_count: u64 = 0;
        let start_time = Instant::now();
        let mut last_fps_update = Instant::now();

        loop {
            let mut frame = Mat::default();
            if !self.video_capture.read(&mut frame)? || frame.empty() {
                if matches!(self.config.video_source, VideoSource::File(_)) {
                    info!("End of video file reached");
                    break;
                }
                warn!("Failed to read frame, retrying...");
                continue;
            }

            self.apply_transformations(&mut frame)?;

            let outcome = self.processor.process_frame(frame).await;
            self.handle_outcome(&outcome);

            frame_count += 1;
            if last_fps_update.elapsed() >= Duration::from_secs(1) {
                let fps = frame_count as f64 / start_time.elapsed().as_secs_f64();
                debug!("Throughput: {:.1} FPS", fps);
                last_fps_update = Instant::now();
            }

            if let Some(max_frames) = self.config.max_frames {
                if frame_count >= max_frames {
                    info!("Processed {} frames, stopping", frame_count);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Apply image transformations (brightness, inversion)
    fn apply_transformations(&self, frame: &mut Mat) -> Result<()> {
        if self.config.brightness != 0.0 {
            let brightness_scalar = Scalar::new(
                f64::from(self.config.brightness),
                f64::from(self.config.brightness),
                f64::from(self.config.brightness),
                0.0,
            );
            let temp = frame.clone();
            opencv::core::add(&temp, &brightness_scalar, frame, &Mat::default(), -1)?;
        }

        match self.config.invert_mode {
            InvertMode::None => {}
            InvertMode::X => {
                let temp = frame.clone();
                opencv::core::flip(&temp, frame, 1)?;
            }
            InvertMode::Y => {
                let temp = frame.clone();
                opencv::core::flip(&temp, frame, 0)?;
            }
            InvertMode::XY => {
                let temp = frame.clone();
                opencv::core::flip(&temp, frame, -1)?;
            }
        }

        Ok(())
    }

    /// React to one per-frame outcome: log it and drive the pose-loss reset
    /// policy
    fn handle_outcome(&mut self, outcome: &ProcessingResult) {
        match outcome {
            ProcessingResult::NoPoseDetected => {
                debug!("No pose detected");
                self.lost_streak += 1;
                let threshold = self.config.reset_after_lost;
                if threshold > 0 && self.lost_streak >= threshold {
                    info!("Pose lost for {} frames, resetting sequence", self.lost_streak);
                    self.processor.reset_sequence();
                    self.lost_streak = 0;
                }
            }
            ProcessingResult::SequenceBuilding { required, current } => {
                self.lost_streak = 0;
                debug!("Sequence progress: {current}/{required}");
            }
            ProcessingResult::Prediction { label, confidence } => {
                self.lost_streak = 0;
                if *confidence >= self.config.confidence_floor {
                    info!("Prediction: {label} ({confidence:.2})");
                } else {
                    debug!("Low-confidence prediction suppressed: {label} ({confidence:.2})");
                }
            }
            ProcessingResult::Error { message } => {
                warn!("Frame processing error: {message}");
            }
        }
    }
}
