//! Sequence classification: the loaded model plus its label vocabulary.
//!
//! The classifier absorbs its own failures: a model that never loaded, a
//! shape mismatch, or an inference error all surface as sentinel predictions
//! with zero confidence rather than aborting the pipeline.

use crate::constants::{FEATURE_WIDTH, SEQUENCE_LENGTH};
use crate::error::{Error, Result};
use crate::keypoint_extraction::SequenceWindow;
use ndarray::{Array3, CowArray};
use ort::{Environment, Session, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Label returned when prediction runs before a model was loaded
pub const MODEL_NOT_LOADED_LABEL: &str = "Model not loaded";

/// Label returned when inference itself fails
pub const INFERENCE_ERROR_LABEL: &str = "Error";

/// Label returned when the argmax index has no vocabulary entry
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Bijection between string labels and dense class indices.
///
/// Loaded once from a JSON object of the form `{"hello": 0, "thanks": 1}`;
/// immutable afterward. Duplicate indices are a data-quality bug in the
/// asset: one of the colliding labels survives inversion and classification
/// output for that index uses whichever did.
#[derive(Debug, Clone, Default)]
pub struct LabelVocabulary {
    label_to_index: HashMap<String, usize>,
    index_to_label: HashMap<usize, String>,
}

impl LabelVocabulary {
    /// Parse a vocabulary from label-map JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut label_to_index = HashMap::with_capacity(raw.len());
        let mut index_to_label = HashMap::with_capacity(raw.len());

        for (label, value) in raw {
            let index = value.as_u64().ok_or_else(|| {
                Error::LabelMapError(format!(
                    "Label {label:?} maps to {value}, expected a non-negative integer index"
                ))
            })? as usize;

            index_to_label.insert(index, label.clone());
            label_to_index.insert(label, index);
        }

        Ok(Self {
            label_to_index,
            index_to_label,
        })
    }

    /// Number of labels in the vocabulary
    #[must_use]
    pub fn len(&self) -> usize {
        self.label_to_index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.label_to_index.is_empty()
    }

    /// Decode a class index to its label
    #[must_use]
    pub fn label_for(&self, index: usize) -> Option<&str> {
        self.index_to_label.get(&index).map(String::as_str)
    }

    /// Training-time direction: label to class index
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.label_to_index.get(label).copied()
    }
}

/// Sequence classifier over completed windows.
///
/// Holds one long-lived `ONNX` session (or none, if loading failed) and the
/// label vocabulary used to decode its output distribution.
#[derive(Default)]
pub struct SignClassifier {
    session: Option<Arc<Session>>,
    vocabulary: LabelVocabulary,
}

impl SignClassifier {
    /// Create a classifier with no model loaded.
    ///
    /// Usable immediately: `predict` reports the not-loaded sentinel until
    /// `load_model` succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the classification model from its serialized bytes.
    ///
    /// One-time setup. When the model declares its input shape, it must be
    /// `[batch, 30, 96]`; a mismatch is a configuration error and the
    /// classifier stays not-ready.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be built from the bytes or the
    /// declared input shape contradicts the sequence contract.
    pub fn load_model(&mut self, model_bytes: &[u8]) -> Result<()> {
        let environment = Arc::new(
            Environment::builder()
                .with_name("sign_classifier")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_memory(model_bytes)?;

        let input_meta = session
            .inputs
            .first()
            .ok_or_else(|| Error::ModelInputError("Model has no inputs".to_string()))?;

        // Dynamic dimensions come back as None; only a concrete contradiction
        // is rejected here.
        let dims = &input_meta.dimensions;
        if dims.len() >= 3 {
            let declared_steps = dims[1].unwrap_or(0) as usize;
            let declared_width = dims[2].unwrap_or(0) as usize;
            if declared_steps != 0 && declared_steps != SEQUENCE_LENGTH {
                return Err(Error::ModelInputError(format!(
                    "Model expects {declared_steps} time steps, pipeline produces {SEQUENCE_LENGTH}"
                )));
            }
            if declared_width != 0 && declared_width != FEATURE_WIDTH {
                return Err(Error::ModelInputError(format!(
                    "Model expects feature width {declared_width}, pipeline produces {FEATURE_WIDTH}"
                )));
            }
        }

        self.session = Some(Arc::new(session));
        log::info!("Classification model loaded ({} bytes)", model_bytes.len());
        Ok(())
    }

    /// Load the label vocabulary from label-map JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an object of string to
    /// non-negative integer.
    pub fn load_vocabulary(&mut self, json: &str) -> Result<()> {
        let vocabulary = LabelVocabulary::from_json(json)?;
        log::info!("Label map loaded with {} labels", vocabulary.len());
        self.vocabulary = vocabulary;
        Ok(())
    }

    /// Whether a model is loaded and predictions are meaningful
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn vocabulary(&self) -> &LabelVocabulary {
        &self.vocabulary
    }

    /// Classify a completed window.
    ///
    /// Runs inference on the blocking worker pool and returns the
    /// highest-probability label with its raw score (ties resolve to the
    /// lowest class index). Failures never propagate: a missing model yields
    /// `("Model not loaded", 0.0)` and an inference error `("Error", 0.0)`.
    pub async fn predict(&self, window: &SequenceWindow) -> (String, f32) {
        let Some(session) = self.session.clone() else {
            return (MODEL_NOT_LOADED_LABEL.to_string(), 0.0);
        };

        let flat = window.to_flat();
        let outcome =
            tokio::task::spawn_blocking(move || Self::run_inference(&session, flat)).await;

        let probabilities = match outcome {
            Ok(Ok(probabilities)) => probabilities,
            Ok(Err(e)) => {
                log::error!("Error during prediction: {e}");
                return (INFERENCE_ERROR_LABEL.to_string(), 0.0);
            }
            Err(e) => {
                log::error!("Prediction task did not complete: {e}");
                return (INFERENCE_ERROR_LABEL.to_string(), 0.0);
            }
        };

        let Some(&first) = probabilities.first() else {
            log::error!("Model produced an empty probability vector");
            return (INFERENCE_ERROR_LABEL.to_string(), 0.0);
        };

        // Argmax with lowest-index tie-break
        let mut max_index = 0;
        let mut confidence = first;
        for (index, &probability) in probabilities.iter().enumerate() {
            if probability > confidence {
                max_index = index;
                confidence = probability;
            }
        }

        let label = self
            .vocabulary
            .label_for(max_index)
            .unwrap_or(UNKNOWN_LABEL)
            .to_string();

        log::debug!("Prediction: {label}, confidence: {confidence}");
        (label, confidence)
    }

    /// Run one forward pass through the model
    fn run_inference(session: &Session, flat: Vec<f32>) -> Result<Vec<f32>> {
        let input = Array3::from_shape_vec((1, SEQUENCE_LENGTH, FEATURE_WIDTH), flat)
            .map_err(|e| Error::ModelDataFormatError(format!("Failed to create input array: {e}")))?;

        let cow_array = CowArray::from(input.into_dyn());
        let input_tensor = Value::from_array(session.allocator(), &cow_array)?;

        let outputs = session.run(vec![input_tensor])?;

        let scores_output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| Error::ModelOutputError("No output from model".to_string()))?;

        let scores_tensor = scores_output.try_extract::<f32>()?;
        let scores_view = scores_tensor.view();
        let scores = scores_view
            .as_slice()
            .ok_or_else(|| Error::ModelOutputError("Failed to get output data".to_string()))?;

        Ok(scores.to_vec())
    }

    /// Release the inference session.
    ///
    /// Idempotent; safe to call if loading never succeeded. An inference
    /// already running on the blocking pool finishes on its own handle.
    pub fn close(&mut self) {
        if self.session.take().is_some() {
            log::debug!("Classifier session released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint_extraction::KeypointExtractor;
    use crate::landmarks::PoseEstimate;

    fn zero_window() -> SequenceWindow {
        let mut extractor = KeypointExtractor::new();
        let mut window = None;
        for _ in 0..SEQUENCE_LENGTH {
            let features = extractor.extract(&PoseEstimate::new());
            window = extractor.add_to_sequence(features);
        }
        window.expect("window full after 30 appends")
    }

    #[test]
    fn test_vocabulary_round_trip() {
        let vocabulary =
            LabelVocabulary::from_json(r#"{"hello": 0, "thanks": 1, "please": 2}"#).unwrap();

        assert_eq!(vocabulary.len(), 3);
        assert_eq!(vocabulary.label_for(1), Some("thanks"));
        assert_eq!(vocabulary.index_of("please"), Some(2));
        assert_eq!(vocabulary.label_for(7), None);
    }

    #[test]
    fn test_vocabulary_rejects_non_integer_indices() {
        assert!(LabelVocabulary::from_json(r#"{"hello": "zero"}"#).is_err());
        assert!(LabelVocabulary::from_json(r#"{"hello": -1}"#).is_err());
        assert!(LabelVocabulary::from_json("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_vocabulary_duplicate_index_keeps_one_label() {
        let vocabulary = LabelVocabulary::from_json(r#"{"a": 0, "b": 0}"#).unwrap();

        // Both directions stay internally consistent even with the collision
        assert_eq!(vocabulary.len(), 2);
        let survivor = vocabulary.label_for(0).expect("index 0 decodable");
        assert!(survivor == "a" || survivor == "b");
    }

    #[tokio::test]
    async fn test_predict_without_model_is_sentinel() {
        let classifier = SignClassifier::new();
        let (label, confidence) = classifier.predict(&zero_window()).await;
        assert_eq!(label, MODEL_NOT_LOADED_LABEL);
        assert_eq!(confidence, 0.0);
    }

    #[tokio::test]
    async fn test_predict_after_close_is_sentinel() {
        let mut classifier = SignClassifier::new();
        classifier
            .load_vocabulary(r#"{"hello": 0}"#)
            .expect("valid label map");
        classifier.close();
        classifier.close(); // idempotent

        let (label, confidence) = classifier.predict(&zero_window()).await;
        assert_eq!(label, MODEL_NOT_LOADED_LABEL);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_load_model_rejects_garbage_bytes() {
        let mut classifier = SignClassifier::new();
        assert!(classifier.load_model(b"not an onnx graph").is_err());
        assert!(!classifier.is_ready());
    }
}
