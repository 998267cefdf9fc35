//! Landmark types shared between the pose detector and the keypoint extractor.

use crate::constants::TRACKED_LANDMARK_COUNT;

/// The tracked body landmarks, in feature-layout order.
///
/// The ordering is fixed by the classifier's training data: feature slot `i`
/// always belongs to `LandmarkKind::ALL[i]`. Reordering variants changes the
/// meaning of every trained model, so treat this list as append-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkKind {
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl LandmarkKind {
    /// All tracked landmarks in feature-layout order
    pub const ALL: [LandmarkKind; TRACKED_LANDMARK_COUNT] = [
        LandmarkKind::LeftEyeInner,
        LandmarkKind::LeftEye,
        LandmarkKind::LeftEyeOuter,
        LandmarkKind::RightEyeInner,
        LandmarkKind::RightEye,
        LandmarkKind::RightEyeOuter,
        LandmarkKind::LeftEar,
        LandmarkKind::RightEar,
        LandmarkKind::MouthLeft,
        LandmarkKind::MouthRight,
        LandmarkKind::LeftShoulder,
        LandmarkKind::RightShoulder,
        LandmarkKind::LeftElbow,
        LandmarkKind::RightElbow,
        LandmarkKind::LeftWrist,
        LandmarkKind::RightWrist,
        LandmarkKind::LeftPinky,
        LandmarkKind::RightPinky,
        LandmarkKind::LeftIndex,
        LandmarkKind::RightIndex,
        LandmarkKind::LeftThumb,
        LandmarkKind::RightThumb,
        LandmarkKind::LeftHip,
        LandmarkKind::RightHip,
        LandmarkKind::LeftKnee,
        LandmarkKind::RightKnee,
        LandmarkKind::LeftAnkle,
        LandmarkKind::RightAnkle,
        LandmarkKind::LeftHeel,
        LandmarkKind::RightHeel,
        LandmarkKind::LeftFootIndex,
        LandmarkKind::RightFootIndex,
    ];

    /// Index of this landmark in the feature layout
    #[must_use]
    pub fn feature_index(self) -> usize {
        self as usize
    }

    /// Index of this landmark in the pose model's 33-point output.
    ///
    /// Point 0 of the detector output is the nose, which is not tracked.
    #[must_use]
    pub fn detector_index(self) -> usize {
        self as usize + 1
    }

    /// Human-readable landmark name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            LandmarkKind::LeftEyeInner => "left_eye_inner",
            LandmarkKind::LeftEye => "left_eye",
            LandmarkKind::LeftEyeOuter => "left_eye_outer",
            LandmarkKind::RightEyeInner => "right_eye_inner",
            LandmarkKind::RightEye => "right_eye",
            LandmarkKind::RightEyeOuter => "right_eye_outer",
            LandmarkKind::LeftEar => "left_ear",
            LandmarkKind::RightEar => "right_ear",
            LandmarkKind::MouthLeft => "mouth_left",
            LandmarkKind::MouthRight => "mouth_right",
            LandmarkKind::LeftShoulder => "left_shoulder",
            LandmarkKind::RightShoulder => "right_shoulder",
            LandmarkKind::LeftElbow => "left_elbow",
            LandmarkKind::RightElbow => "right_elbow",
            LandmarkKind::LeftWrist => "left_wrist",
            LandmarkKind::RightWrist => "right_wrist",
            LandmarkKind::LeftPinky => "left_pinky",
            LandmarkKind::RightPinky => "right_pinky",
            LandmarkKind::LeftIndex => "left_index",
            LandmarkKind::RightIndex => "right_index",
            LandmarkKind::LeftThumb => "left_thumb",
            LandmarkKind::RightThumb => "right_thumb",
            LandmarkKind::LeftHip => "left_hip",
            LandmarkKind::RightHip => "right_hip",
            LandmarkKind::LeftKnee => "left_knee",
            LandmarkKind::RightKnee => "right_knee",
            LandmarkKind::LeftAnkle => "left_ankle",
            LandmarkKind::RightAnkle => "right_ankle",
            LandmarkKind::LeftHeel => "left_heel",
            LandmarkKind::RightHeel => "right_heel",
            LandmarkKind::LeftFootIndex => "left_foot_index",
            LandmarkKind::RightFootIndex => "right_foot_index",
        }
    }
}

/// One detected body landmark in source-frame pixel coordinates.
///
/// The detector provides no depth, so there is no z component here; feature
/// vectors carry a literal zero in the depth slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub kind: LandmarkKind,
    pub x: f32,
    pub y: f32,
    /// Detector visibility score in [0, 1]
    pub visibility: f32,
}

/// One frame's pose estimate: a lookup table over the tracked landmarks.
///
/// Any landmark may be absent in a given frame. Partial poses are a normal
/// case, not an error.
#[derive(Debug, Clone)]
pub struct PoseEstimate {
    slots: Vec<Option<Landmark>>,
}

impl Default for PoseEstimate {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseEstimate {
    /// Create an empty pose estimate with every landmark absent
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![None; TRACKED_LANDMARK_COUNT],
        }
    }

    /// Record a detected landmark, replacing any previous value for its kind
    pub fn insert(&mut self, landmark: Landmark) {
        self.slots[landmark.kind.feature_index()] = Some(landmark);
    }

    /// Look up a landmark by kind
    #[must_use]
    pub fn landmark(&self, kind: LandmarkKind) -> Option<&Landmark> {
        self.slots[kind.feature_index()].as_ref()
    }

    /// Number of landmarks present in this estimate
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_layout_order_is_stable() {
        assert_eq!(LandmarkKind::ALL.len(), TRACKED_LANDMARK_COUNT);
        for (i, kind) in LandmarkKind::ALL.iter().enumerate() {
            assert_eq!(kind.feature_index(), i);
        }
        // Spot checks against the training-time ordering
        assert_eq!(LandmarkKind::LeftEyeInner.feature_index(), 0);
        assert_eq!(LandmarkKind::LeftShoulder.feature_index(), 10);
        assert_eq!(LandmarkKind::RightWrist.feature_index(), 15);
        assert_eq!(LandmarkKind::RightFootIndex.feature_index(), 31);
    }

    #[test]
    fn test_detector_indices_skip_the_nose() {
        assert_eq!(LandmarkKind::LeftEyeInner.detector_index(), 1);
        assert_eq!(LandmarkKind::RightFootIndex.detector_index(), 32);
    }

    #[test]
    fn test_pose_estimate_lookup() {
        let mut pose = PoseEstimate::new();
        assert_eq!(pose.present_count(), 0);
        assert!(pose.landmark(LandmarkKind::LeftWrist).is_none());

        pose.insert(Landmark {
            kind: LandmarkKind::LeftWrist,
            x: 120.5,
            y: 340.25,
            visibility: 0.9,
        });

        let wrist = pose.landmark(LandmarkKind::LeftWrist).expect("inserted landmark");
        assert_eq!(wrist.x, 120.5);
        assert_eq!(wrist.y, 340.25);
        assert_eq!(pose.present_count(), 1);
        assert!(pose.landmark(LandmarkKind::RightWrist).is_none());
    }
}
