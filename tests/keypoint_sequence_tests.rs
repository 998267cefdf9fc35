//! Tests for keypoint extraction and the sequence window contract

use sign_language_recognition::constants::{
    COORDS_PER_LANDMARK, FEATURE_WIDTH, SEQUENCE_LENGTH, TRACKED_LANDMARK_COUNT,
};
use sign_language_recognition::keypoint_extraction::KeypointExtractor;
use sign_language_recognition::landmarks::{Landmark, LandmarkKind, PoseEstimate};

mod test_helpers;
use test_helpers::tagged_pose;

/// Any number of present landmarks yields a full-width vector with the
/// documented slot layout
#[test]
fn test_extract_width_for_any_present_subset() {
    let extractor = KeypointExtractor::new();

    for present in [0, 1, 7, TRACKED_LANDMARK_COUNT] {
        let mut pose = PoseEstimate::new();
        for kind in LandmarkKind::ALL.iter().take(present) {
            pose.insert(Landmark {
                kind: *kind,
                x: 1.5,
                y: 2.5,
                visibility: 1.0,
            });
        }

        let features = extractor.extract(&pose);
        assert_eq!(features.len(), FEATURE_WIDTH);

        for (i, kind) in LandmarkKind::ALL.iter().enumerate() {
            let slot = &features.as_slice()[i * COORDS_PER_LANDMARK..(i + 1) * COORDS_PER_LANDMARK];
            if pose.landmark(*kind).is_some() {
                assert_eq!(slot, &[1.5, 2.5, 0.0], "present slot {i}");
            } else {
                assert_eq!(slot, &[0.0, 0.0, 0.0], "absent slot {i}");
            }
        }
    }
}

/// Window length is `min(calls, 30)` and call 31 evicts call 1 (FIFO)
#[test]
fn test_window_length_and_fifo_eviction() {
    let mut extractor = KeypointExtractor::new();
    let wrist_slot = LandmarkKind::LeftWrist.feature_index() * COORDS_PER_LANDMARK;

    let mut last_window = None;
    for call in 1..=(SEQUENCE_LENGTH + 1) {
        let features = extractor.extract(&tagged_pose(call as f32));
        last_window = extractor.add_to_sequence(features);
        assert_eq!(extractor.fill_level(), call.min(SEQUENCE_LENGTH));
    }

    // After call 31 the window holds calls 2..=31
    let window = last_window.expect("window ready after warm-up");
    assert_eq!(window.frames().len(), SEQUENCE_LENGTH);
    assert_eq!(window.frames()[0].as_slice()[wrist_slot], 2.0);
    assert_eq!(
        window.frames()[SEQUENCE_LENGTH - 1].as_slice()[wrist_slot],
        (SEQUENCE_LENGTH + 1) as f32
    );
}

/// Not ready for calls 1..29, ready on call 30 and every call after, until
/// reset
#[test]
fn test_readiness_progression() {
    let mut extractor = KeypointExtractor::new();

    for call in 1..SEQUENCE_LENGTH {
        let features = extractor.extract(&tagged_pose(call as f32));
        assert!(extractor.add_to_sequence(features).is_none(), "call {call}");
        assert_eq!(extractor.fill_level(), call);
    }

    // Ready from call 30 onward
    for call in SEQUENCE_LENGTH..SEQUENCE_LENGTH + 5 {
        let features = extractor.extract(&tagged_pose(call as f32));
        assert!(extractor.add_to_sequence(features).is_some(), "call {call}");
    }

    extractor.reset();
    assert_eq!(extractor.fill_level(), 0);
    let features = extractor.extract(&tagged_pose(0.0));
    assert!(extractor.add_to_sequence(features).is_none());
}

/// Reset followed by the same 30 inputs reproduces bit-identical window
/// contents
#[test]
fn test_reset_is_idempotent_with_fresh_state() {
    let inputs: Vec<PoseEstimate> = (0..SEQUENCE_LENGTH)
        .map(|i| tagged_pose(i as f32 * 0.25))
        .collect();

    let mut fresh = KeypointExtractor::new();
    let mut recycled = KeypointExtractor::new();

    // Pre-fill the recycled extractor with unrelated data, then reset
    for _ in 0..45 {
        let features = recycled.extract(&tagged_pose(999.0));
        recycled.add_to_sequence(features);
    }
    recycled.reset();

    let mut fresh_window = None;
    let mut recycled_window = None;
    for pose in &inputs {
        let f = fresh.extract(pose);
        fresh_window = fresh.add_to_sequence(f);
        let r = recycled.extract(pose);
        recycled_window = recycled.add_to_sequence(r);
    }

    assert_eq!(
        fresh_window.expect("fresh window complete"),
        recycled_window.expect("recycled window complete")
    );
}
