//! Helper functions and utilities for tests

use async_trait::async_trait;
use opencv::core::Mat;
use opencv::prelude::*;
use sign_language_recognition::landmarks::{Landmark, LandmarkKind, PoseEstimate};
use sign_language_recognition::pose_detection::PoseDetector;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Create a black test frame with the given dimensions
pub fn create_test_frame(height: i32, width: i32) -> Mat {
    Mat::zeros(height, width, opencv::core::CV_8UC3)
        .expect("Mat::zeros")
        .to_mat()
        .expect("to_mat")
}

/// Build a pose with the left wrist at `(tag, tag)` so frames are
/// distinguishable through the feature layout
pub fn tagged_pose(tag: f32) -> PoseEstimate {
    let mut pose = PoseEstimate::new();
    pose.insert(Landmark {
        kind: LandmarkKind::LeftWrist,
        x: tag,
        y: tag,
        visibility: 1.0,
    });
    pose
}

/// Detector that replays a scripted sequence of detection results.
///
/// Once the script is exhausted, or after `close`, every call resolves to
/// "no pose" — mirroring the absorb-to-none contract of the real adapter.
pub struct ScriptedDetector {
    script: Mutex<VecDeque<Option<PoseEstimate>>>,
    closed: Mutex<bool>,
}

impl ScriptedDetector {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Option<PoseEstimate>>,
    {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            closed: Mutex::new(false),
        }
    }

    /// A detector that reports a distinguishable pose on every frame
    pub fn always_posing(frames: usize) -> Self {
        Self::new((0..frames).map(|i| Some(tagged_pose(i as f32))))
    }
}

#[async_trait]
impl PoseDetector for ScriptedDetector {
    async fn detect(&self, _frame: Mat) -> Option<PoseEstimate> {
        if *self.closed.lock().expect("closed flag") {
            return None;
        }
        self.script.lock().expect("script").pop_front().flatten()
    }

    fn close(&mut self) {
        *self.closed.lock().expect("closed flag") = true;
    }
}
