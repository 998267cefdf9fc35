//! Keypoint extraction and the temporal sequence window.
//!
//! Converts one pose estimate into a fixed-width feature vector and maintains
//! the bounded FIFO window of the most recent vectors that feeds the sequence
//! classifier.

use crate::constants::{COORDS_PER_LANDMARK, FEATURE_WIDTH, SEQUENCE_LENGTH};
use crate::landmarks::{LandmarkKind, PoseEstimate};
use std::collections::VecDeque;

/// Fixed-width numeric encoding of one frame's landmarks.
///
/// Layout invariant: slot `3i..3i+3` holds `(x, y, 0.0)` for landmark
/// `LandmarkKind::ALL[i]` when present and `(0.0, 0.0, 0.0)` when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    /// The feature values, always exactly [`FEATURE_WIDTH`] of them
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Snapshot of a completed sequence window.
///
/// Only the extractor can construct one, and only when its buffer holds
/// exactly [`SEQUENCE_LENGTH`] vectors, so the classifier never has to check
/// input shape at runtime. The snapshot is detached from the live buffer:
/// later appends cannot corrupt an in-flight inference.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceWindow {
    frames: Vec<FeatureVector>,
}

impl SequenceWindow {
    /// The window contents in arrival order, oldest first
    #[must_use]
    pub fn frames(&self) -> &[FeatureVector] {
        &self.frames
    }

    /// Flatten to row-major `[SEQUENCE_LENGTH × FEATURE_WIDTH]` for tensor staging
    pub(crate) fn to_flat(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(SEQUENCE_LENGTH * FEATURE_WIDTH);
        for frame in &self.frames {
            flat.extend_from_slice(frame.as_slice());
        }
        flat
    }
}

/// Converts pose estimates into feature vectors and buffers them into
/// sequence windows
#[derive(Debug, Default)]
pub struct KeypointExtractor {
    sequence: VecDeque<FeatureVector>,
}

impl KeypointExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sequence: VecDeque::with_capacity(SEQUENCE_LENGTH),
        }
    }

    /// Encode one pose estimate as a feature vector.
    ///
    /// Iterates the tracked landmarks in feature-layout order; missing
    /// landmarks contribute zeros. The result always has exactly
    /// [`FEATURE_WIDTH`] values no matter how partial the detection was.
    #[must_use]
    pub fn extract(&self, pose: &PoseEstimate) -> FeatureVector {
        let mut values = Vec::with_capacity(FEATURE_WIDTH);

        for kind in LandmarkKind::ALL {
            match pose.landmark(kind) {
                Some(landmark) => {
                    values.push(landmark.x);
                    values.push(landmark.y);
                    // The detector provides no depth
                    values.push(0.0);
                }
                None => {
                    values.extend_from_slice(&[0.0; COORDS_PER_LANDMARK]);
                }
            }
        }

        log::debug!("Extracted {} keypoint values", values.len());
        FeatureVector { values }
    }

    /// Append a feature vector to the sliding window.
    ///
    /// The buffer is FIFO-bounded at [`SEQUENCE_LENGTH`]: appending at
    /// capacity evicts the oldest vector first. Returns a snapshot of the
    /// full window when the buffer holds exactly [`SEQUENCE_LENGTH`] vectors
    /// and `None` with progress available via [`Self::fill_level`] otherwise.
    ///
    /// Once warmed up the buffer stays full, so every subsequent call
    /// returns a window; per-window inference cadence is the caller's policy.
    pub fn add_to_sequence(&mut self, features: FeatureVector) -> Option<SequenceWindow> {
        self.sequence.push_back(features);

        if self.sequence.len() > SEQUENCE_LENGTH {
            self.sequence.pop_front();
        }

        if self.sequence.len() == SEQUENCE_LENGTH {
            log::debug!("Sequence ready for prediction");
            Some(SequenceWindow {
                frames: self.sequence.iter().cloned().collect(),
            })
        } else {
            log::debug!("Sequence progress: {}/{}", self.sequence.len(), SEQUENCE_LENGTH);
            None
        }
    }

    /// Current number of buffered vectors
    #[must_use]
    pub fn fill_level(&self) -> usize {
        self.sequence.len()
    }

    /// Number of vectors required for a complete window
    #[must_use]
    pub fn capacity(&self) -> usize {
        SEQUENCE_LENGTH
    }

    /// Discard all accumulated temporal context
    pub fn reset(&mut self) {
        self.sequence.clear();
    }
}
