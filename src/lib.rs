//! Sign language recognition library for live video feeds.
//!
//! This library turns a stream of camera frames into a continuously updated
//! natural-language label with a confidence score, using:
//! - `ONNX` Runtime for pose landmark detection and sequence classification
//! - `OpenCV` for frame capture and preprocessing
//! - A bounded FIFO window that accumulates per-frame feature vectors into
//!   the classifier's temporal input
//!
//! The per-frame pipeline:
//! 1. Pose detection finds at most one pose in the frame
//! 2. Keypoint extraction encodes it as a fixed-width feature vector
//! 3. The vector joins a sliding window of the 30 most recent frames
//! 4. Completed windows are classified into a label and confidence
//!
//! Every frame produces exactly one
//! [`ProcessingResult`](processor::ProcessingResult): no pose, window
//! progress, a prediction, or an error. Nothing raises past the processor.
//!
//! # Examples
//!
//! ## Processing frames
//!
//! ```no_run
//! use sign_language_recognition::assets::AssetBundle;
//! use sign_language_recognition::config::Config;
//! use sign_language_recognition::processor::{ProcessingResult, SignLanguageProcessor};
//! use opencv::{core::Mat, prelude::*};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let bundle = AssetBundle::new(&config.assets.dir)?;
//! let mut processor = SignLanguageProcessor::new(&bundle, &config)?;
//!
//! let frame = Mat::zeros(480, 640, opencv::core::CV_8UC3)?.to_mat()?;
//! match processor.process_frame(frame).await {
//!     ProcessingResult::NoPoseDetected => println!("no pose"),
//!     ProcessingResult::SequenceBuilding { required, current } => {
//!         println!("warming up: {current}/{required}");
//!     }
//!     ProcessingResult::Prediction { label, confidence } => {
//!         println!("{label} ({confidence:.2})");
//!     }
//!     ProcessingResult::Error { message } => eprintln!("frame failed: {message}"),
//! }
//!
//! processor.reset_sequence();
//! processor.close();
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature extraction and windowing
//!
//! ```
//! use sign_language_recognition::keypoint_extraction::KeypointExtractor;
//! use sign_language_recognition::landmarks::{Landmark, LandmarkKind, PoseEstimate};
//!
//! let mut extractor = KeypointExtractor::new();
//!
//! let mut pose = PoseEstimate::new();
//! pose.insert(Landmark {
//!     kind: LandmarkKind::LeftWrist,
//!     x: 120.0,
//!     y: 340.0,
//!     visibility: 0.9,
//! });
//!
//! let features = extractor.extract(&pose);
//! assert_eq!(features.len(), 96);
//!
//! // The window reports progress until 30 vectors have accumulated
//! assert!(extractor.add_to_sequence(features).is_none());
//! assert_eq!(extractor.fill_level(), 1);
//! ```

/// Read-only asset bundle access for models and the label map
pub mod assets;

/// Sequence classification over completed windows
pub mod classification;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Error types and result handling
pub mod error;

/// Keypoint extraction and the temporal sequence window
pub mod keypoint_extraction;

/// Landmark types shared between detector and extractor
pub mod landmarks;

/// Pose detection boundary and its `ONNX` adapter
pub mod pose_detection;

/// Frame-processing orchestrator
pub mod processor;

/// Main application module
pub mod app;

pub use error::{Error, Result};
