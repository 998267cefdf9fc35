//! Constants used throughout the application

/// Number of feature vectors a sequence window holds
pub const SEQUENCE_LENGTH: usize = 30;

/// Number of landmarks tracked in the feature layout
pub const TRACKED_LANDMARK_COUNT: usize = 32;

/// Components stored per landmark (x, y and a zero depth placeholder)
pub const COORDS_PER_LANDMARK: usize = 3;

/// Width of one feature vector (32 landmarks × 3 components)
pub const FEATURE_WIDTH: usize = TRACKED_LANDMARK_COUNT * COORDS_PER_LANDMARK;

/// Number of landmarks the pose model emits (nose + 32 tracked)
pub const DETECTOR_LANDMARK_COUNT: usize = 33;

/// Values per landmark in the pose model output (x, y, z, visibility, presence)
pub const DETECTOR_VALUES_PER_LANDMARK: usize = 5;

/// Default pose detector input size when the model does not declare one
pub const DEFAULT_DETECTOR_INPUT_SIZE: i32 = 256;

/// Image normalization constants for the pose detector ([-1, 1] range)
pub const IMAGE_NORMALIZATION_OFFSET: f32 = 127.5;
pub const IMAGE_NORMALIZATION_SCALE: f32 = 127.5;

/// Default pose presence score threshold below which a frame counts as "no pose"
pub const DEFAULT_POSE_SCORE_THRESHOLD: f32 = 0.5;

/// Default per-landmark visibility threshold below which a landmark is absent
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.5;

/// Default confidence floor for displaying predictions (display policy only)
pub const DEFAULT_CONFIDENCE_FLOOR: f32 = 0.0;

/// Default asset file names
pub const DEFAULT_POSE_MODEL_ASSET: &str = "pose_landmarker.onnx";
pub const DEFAULT_CLASSIFIER_MODEL_ASSET: &str = "sign_language_model.onnx";
pub const DEFAULT_LABEL_MAP_ASSET: &str = "label_map.json";
