//! Frame-processing orchestrator.
//!
//! Sequences detection, keypoint extraction, windowing, and classification
//! for each incoming frame, and owns the lifecycle of the detector and
//! classifier resources. Callers only ever observe the four-case
//! [`ProcessingResult`]; nothing raises past this boundary.

use crate::assets::AssetBundle;
use crate::classification::SignClassifier;
use crate::config::Config;
use crate::error::Result;
use crate::keypoint_extraction::KeypointExtractor;
use crate::pose_detection::{OnnxPoseDetector, PoseDetector};
use opencv::core::Mat;

/// The single per-frame result surfaced to callers
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingResult {
    /// No pose was found in the frame; the sequence window is untouched
    NoPoseDetected,
    /// The window is still warming up
    SequenceBuilding { required: usize, current: usize },
    /// A completed window was classified
    Prediction { label: String, confidence: f32 },
    /// An unexpected per-frame failure; pipeline state remains intact
    Error { message: String },
}

/// Orchestrates the per-frame pipeline: detect, extract, window, classify.
///
/// One instance per active session. Frames must be processed one at a time
/// (`process_frame` takes `&mut self`); outcomes are produced in submission
/// order because each frame is awaited to completion before the next starts.
pub struct SignLanguageProcessor {
    detector: Box<dyn PoseDetector>,
    extractor: KeypointExtractor,
    classifier: SignClassifier,
}

impl SignLanguageProcessor {
    /// Build the processor from the asset bundle.
    ///
    /// The classifier loads best-effort: a model or label map that fails to
    /// load leaves it not-ready and every prediction degrades to the
    /// sentinel path. The pose detector has no degraded mode, so its
    /// construction failure is returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the pose model asset cannot be read or the
    /// detector session cannot be built.
    pub fn new(bundle: &AssetBundle, config: &Config) -> Result<Self> {
        let pose_model = bundle.model_bytes(&config.assets.pose_model)?;
        let detector = OnnxPoseDetector::new(
            &pose_model,
            config.detection.score_threshold,
            config.detection.visibility_threshold,
        )?;

        let mut classifier = SignClassifier::new();
        if let Err(e) = bundle
            .model_bytes(&config.assets.classifier_model)
            .and_then(|bytes| classifier.load_model(&bytes))
        {
            log::error!("Error loading classification model: {e}");
        }
        if let Err(e) = bundle
            .label_map_json(&config.assets.label_map)
            .and_then(|json| classifier.load_vocabulary(&json))
        {
            log::error!("Error loading label map: {e}");
        }

        Ok(Self::with_detector(Box::new(detector), classifier))
    }

    /// Assemble a processor from an explicit detector and classifier.
    ///
    /// This is the seam the integration tests use to drive the pipeline with
    /// scripted detections.
    #[must_use]
    pub fn with_detector(detector: Box<dyn PoseDetector>, classifier: SignClassifier) -> Self {
        Self {
            detector,
            extractor: KeypointExtractor::new(),
            classifier,
        }
    }

    /// Process one frame and produce exactly one outcome.
    ///
    /// Never returns an error and never panics the pipeline: any failure
    /// escaping the steps below is converted to [`ProcessingResult::Error`]
    /// here, with the window and loaded models left intact for the next
    /// frame. Dropping the returned future before detection resolves leaves
    /// the window unmutated.
    pub async fn process_frame(&mut self, frame: Mat) -> ProcessingResult {
        match self.try_process(frame).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Error processing frame: {e}");
                ProcessingResult::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn try_process(&mut self, frame: Mat) -> Result<ProcessingResult> {
        // Step 1: detect pose. Detection failures were already absorbed to
        // "no pose"; a pose-free frame leaves the window untouched.
        let Some(pose) = self.detector.detect(frame).await else {
            return Ok(ProcessingResult::NoPoseDetected);
        };

        // Step 2: extract keypoints (pure, synchronous)
        let features = self.extractor.extract(&pose);

        // Step 3: append and check the window
        let Some(window) = self.extractor.add_to_sequence(features) else {
            return Ok(ProcessingResult::SequenceBuilding {
                required: self.extractor.capacity(),
                current: self.extractor.fill_level(),
            });
        };

        // Step 4: classify. The window stays full from here on, so a warm
        // pipeline predicts on every pose-bearing frame.
        let (label, confidence) = self.classifier.predict(&window).await;
        Ok(ProcessingResult::Prediction { label, confidence })
    }

    /// Discard the accumulated temporal context.
    ///
    /// The only externally triggerable state transition outside the
    /// per-frame flow.
    pub fn reset_sequence(&mut self) {
        self.extractor.reset();
    }

    /// Release the classifier and detector resources.
    ///
    /// Tolerates repeated calls and sub-resources that were already
    /// released.
    pub fn close(&mut self) {
        self.classifier.close();
        self.detector.close();
    }
}
