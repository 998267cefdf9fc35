//! Pose detection boundary: turns camera frames into pose estimates.
//!
//! The detector is an external capability behind the [`PoseDetector`] trait:
//! it either finds zero-or-one pose or nothing, and it never surfaces a raw
//! failure to the orchestrator. [`OnnxPoseDetector`] adapts a 33-point pose
//! landmark model through `ONNX` Runtime.

use crate::constants::{
    DEFAULT_DETECTOR_INPUT_SIZE, DETECTOR_LANDMARK_COUNT, DETECTOR_VALUES_PER_LANDMARK,
    IMAGE_NORMALIZATION_OFFSET, IMAGE_NORMALIZATION_SCALE,
};
use crate::error::{Error, Result};
use crate::landmarks::{Landmark, LandmarkKind, PoseEstimate};
use async_trait::async_trait;
use ndarray::{Array4, CowArray};
use opencv::core::{Mat, Size, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::sync::Arc;

/// Source of pose estimates for the frame pipeline.
///
/// Implementations must be safe to call once per frame at camera rate and
/// must reuse one long-lived detector instance rather than constructing one
/// per call. `detect` absorbs internal failures: the caller only ever sees
/// "no pose".
#[async_trait]
pub trait PoseDetector: Send + Sync {
    /// Detect at most one pose in the frame.
    ///
    /// Runs off the caller's thread; resolves to `None` both when no pose is
    /// present and when detection fails internally.
    async fn detect(&self, frame: Mat) -> Option<PoseEstimate>;

    /// Release the underlying detector resources. Idempotent.
    fn close(&mut self);
}

/// Pose detector backed by a 33-point landmark model via `ONNX` Runtime.
///
/// The model contract: one NHWC image input normalized to [-1, 1]; output 0
/// is a `[1, 33 × 5]` landmark tensor of `(x, y, z, visibility, presence)`
/// in input-image pixels with logit visibility scores, output 1 a `[1, 1]`
/// pose presence score.
pub struct OnnxPoseDetector {
    session: Option<Arc<Session>>,
    input_size: i32,
    score_threshold: f32,
    visibility_threshold: f32,
}

impl OnnxPoseDetector {
    /// Create a detector from serialized model bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the `ONNX` session cannot be built from the
    /// bytes or the runtime environment cannot be created.
    pub fn new(model_bytes: &[u8], score_threshold: f32, visibility_threshold: f32) -> Result<Self> {
        log::info!("Initializing pose detector ({} byte model)", model_bytes.len());

        let environment = Arc::new(
            Environment::builder()
                .with_name("pose_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_memory(model_bytes)?;

        // Read the input size from model metadata, shape [batch, height, width, channels]
        let input_size = session
            .inputs
            .first()
            .and_then(|input| input.dimensions.get(1).copied().flatten())
            .map_or(DEFAULT_DETECTOR_INPUT_SIZE, |dim| dim as i32);

        Ok(Self {
            session: Some(Arc::new(session)),
            input_size,
            score_threshold,
            visibility_threshold,
        })
    }

    /// Preprocess a frame for the model: square resize, BGR to RGB,
    /// normalize to [-1, 1], NHWC layout.
    fn preprocess(&self, frame: &Mat) -> Result<Array4<f32>> {
        let size = self.input_size;
        let side = size as usize;

        let mut resized = Mat::default();
        imgproc::resize(
            frame,
            &mut resized,
            Size::new(size, size),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        let mut rgb_image = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;

        let mut float_image = Mat::default();
        rgb_image.convert_to(
            &mut float_image,
            CV_32F,
            f64::from(1.0 / IMAGE_NORMALIZATION_SCALE),
            f64::from(-IMAGE_NORMALIZATION_OFFSET / IMAGE_NORMALIZATION_SCALE),
        )?;

        let mut data = vec![0.0f32; side * side * 3];
        for row in 0..size {
            for col in 0..size {
                let pixel = float_image.at_2d::<opencv::core::Vec3f>(row, col)?;
                let base = ((row as usize) * side + (col as usize)) * 3;
                data[base] = pixel[0];
                data[base + 1] = pixel[1];
                data[base + 2] = pixel[2];
            }
        }

        Array4::from_shape_vec((1, side, side, 3), data)
            .map_err(|e| Error::ModelDataFormatError(format!("Failed to create input array: {e}")))
    }

    /// Run one forward pass, returning the raw landmark tensor and the pose
    /// presence score
    fn run_inference(session: &Session, input: Array4<f32>) -> Result<(Vec<f32>, f32)> {
        let cow_array = CowArray::from(input.into_dyn());
        let input_tensor = Value::from_array(session.allocator(), &cow_array)?;

        let outputs = session.run(vec![input_tensor])?;
        if outputs.len() < 2 {
            return Err(Error::ModelOutputError(format!(
                "Expected landmark and score outputs, model produced {}",
                outputs.len()
            )));
        }

        let landmarks_tensor = outputs[0].try_extract::<f32>()?;
        let landmarks_view = landmarks_tensor.view();
        let landmarks = landmarks_view
            .as_slice()
            .ok_or_else(|| Error::ModelOutputError("Failed to get landmark data".to_string()))?
            .to_vec();

        let score_tensor = outputs[1].try_extract::<f32>()?;
        let score_view = score_tensor.view();
        let score = score_view
            .as_slice()
            .and_then(|scores| scores.first().copied())
            .ok_or_else(|| Error::ModelOutputError("Failed to get pose score".to_string()))?;

        Ok((landmarks, score))
    }

    /// Convert the raw landmark tensor into a pose estimate in source-frame
    /// pixel coordinates, or `None` when the presence score gates the frame
    /// as pose-free.
    fn decode(
        raw: &[f32],
        score: f32,
        frame_width: f32,
        frame_height: f32,
        input_size: i32,
        score_threshold: f32,
        visibility_threshold: f32,
    ) -> Option<PoseEstimate> {
        if score < score_threshold {
            log::debug!("Pose score {score:.3} below threshold {score_threshold:.3}");
            return None;
        }

        let expected = DETECTOR_LANDMARK_COUNT * DETECTOR_VALUES_PER_LANDMARK;
        if raw.len() < expected {
            log::warn!("Landmark tensor has {} values, expected {expected}", raw.len());
            return None;
        }

        let scale_x = frame_width / input_size as f32;
        let scale_y = frame_height / input_size as f32;

        let mut pose = PoseEstimate::new();
        for kind in LandmarkKind::ALL {
            let base = kind.detector_index() * DETECTOR_VALUES_PER_LANDMARK;
            let visibility = sigmoid(raw[base + 3]);
            let presence = sigmoid(raw[base + 4]);

            if visibility.min(presence) < visibility_threshold {
                continue;
            }

            pose.insert(Landmark {
                kind,
                x: raw[base] * scale_x,
                y: raw[base + 1] * scale_y,
                visibility,
            });
        }

        log::debug!("Decoded pose with {} landmarks", pose.present_count());
        Some(pose)
    }
}

#[async_trait]
impl PoseDetector for OnnxPoseDetector {
    async fn detect(&self, frame: Mat) -> Option<PoseEstimate> {
        let session = match &self.session {
            Some(session) => Arc::clone(session),
            None => {
                log::warn!("Pose detector used after close");
                return None;
            }
        };

        let frame_width = frame.cols() as f32;
        let frame_height = frame.rows() as f32;

        let input = match self.preprocess(&frame) {
            Ok(input) => input,
            Err(e) => {
                log::error!("Error preparing frame for pose detection: {e}");
                return None;
            }
        };

        match tokio::task::spawn_blocking(move || Self::run_inference(&session, input)).await {
            Ok(Ok((raw, score))) => Self::decode(
                &raw,
                score,
                frame_width,
                frame_height,
                self.input_size,
                self.score_threshold,
                self.visibility_threshold,
            ),
            Ok(Err(e)) => {
                log::error!("Error detecting pose: {e}");
                None
            }
            Err(e) => {
                log::error!("Pose detection task did not complete: {e}");
                None
            }
        }
    }

    fn close(&mut self) {
        if self.session.take().is_some() {
            log::debug!("Pose detector session released");
        }
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
