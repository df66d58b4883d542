//! End-to-end frame lifecycle through the public API.

use luma_reorient::capture::{
    Camera, CaptureConfig, Frame, MockCamera, MockFrame, PixelFormat, ReleaseLedger,
};
use luma_reorient::decode::{DecodeError, DecodeOutcome, Decoded, MockDecoder, Symbology};
use luma_reorient::orientation::{OrientationTracker, RotationAngle};
use luma_reorient::pipeline::{FrameOutcome, FramePipeline};
use luma_reorient::report;
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Scripted {
    Success,
    NotFound,
    Error,
}

impl Scripted {
    fn outcome(&self) -> DecodeOutcome {
        match self {
            Scripted::Success => DecodeOutcome::Success(Decoded::new("payload", Symbology::QrCode)),
            Scripted::NotFound => DecodeOutcome::NotFound,
            Scripted::Error => DecodeOutcome::Error(DecodeError::Internal("scripted".into())),
        }
    }
}

fn scripted_strategy() -> impl Strategy<Value = Scripted> {
    prop_oneof![
        Just(Scripted::Success),
        Just(Scripted::NotFound),
        Just(Scripted::Error),
    ]
}

fn format_strategy() -> impl Strategy<Value = PixelFormat> {
    prop_oneof![
        4 => Just(PixelFormat::Yuv420),
        1 => Just(PixelFormat::Yuv422),
        1 => Just(PixelFormat::Yuv444),
        1 => Just(PixelFormat::Nv21),
        1 => Just(PixelFormat::Jpeg),
    ]
}

fn frame(ledger: &ReleaseLedger, format: PixelFormat, sequence: u64) -> MockFrame {
    let planes = match format.expected_planes() {
        3 => vec![(vec![9u8; 12], 4), (vec![128; 4], 2), (vec![128; 4], 2)],
        2 => vec![(vec![9u8; 12], 4), (vec![128; 8], 4)],
        _ => vec![(vec![0xFF, 0xD8], 0)],
    };
    MockFrame::from_planes(format, 4, 3, planes, sequence, ledger)
}

#[test]
fn mock_camera_frames_all_released() {
    let mut camera = MockCamera::new();
    camera
        .open(&CaptureConfig {
            width: 64,
            height: 48,
            row_padding: 16,
            unsupported_every: 3,
            ..Default::default()
        })
        .unwrap();
    let ledger = camera.ledger();

    let tracker = Arc::new(OrientationTracker::default());
    let decoder = MockDecoder::recognize_every(4, Decoded::new("4006381333931", Symbology::Ean13));
    let (reporter, events) = report::channel();
    let mut pipeline = FramePipeline::new(Arc::clone(&tracker), decoder, reporter);

    for i in 0..30 {
        if i == 15 {
            tracker.on_device_orientation(180);
        }
        let frame = camera.capture().unwrap();
        pipeline.process(frame);
    }

    assert_eq!(ledger.issued(), 30);
    assert_eq!(ledger.outstanding(), 0);
    assert!(ledger.all_released_once());

    let stats = pipeline.stats();
    assert_eq!(stats.frames_received, 30);
    assert_eq!(stats.frames_skipped, 10);
    assert_eq!(pipeline.decoder().calls(), 20);

    let received: Vec<_> = events.try_iter().collect();
    assert_eq!(received.len(), 5);
    assert!(received.iter().all(|e| e.text == "4006381333931"));
    assert_eq!(received.first().unwrap().rotation, RotationAngle::Deg90);
    assert_eq!(received.last().unwrap().rotation, RotationAngle::Deg270);
}

#[test]
fn decoder_receives_upright_padded_plane() {
    let ledger = ReleaseLedger::new();
    // 3x2 luma with 2 bytes of row padding
    let luma = vec![1, 2, 3, 0, 0, 4, 5, 6];
    let frame = MockFrame::from_planes(
        PixelFormat::Yuv420,
        3,
        2,
        vec![(luma, 5), (vec![128; 2], 2), (vec![128; 2], 2)],
        1,
        &ledger,
    );

    let tracker = Arc::new(OrientationTracker::new(RotationAngle::Deg90));
    let (reporter, _events) = report::channel();
    let mut pipeline = FramePipeline::new(tracker, MockDecoder::new(), reporter);

    assert_eq!(pipeline.process(frame), FrameOutcome::NotRecognized);
    let seen = pipeline.decoder().last_seen().unwrap();
    assert_eq!(seen.image_size, (2, 3));
    assert!(ledger.all_released_once());
}

proptest! {
    #[test]
    fn every_frame_released_exactly_once(
        script in proptest::collection::vec(scripted_strategy(), 1..40),
        formats in proptest::collection::vec(format_strategy(), 40),
        turns in 0i32..4,
    ) {
        let ledger = ReleaseLedger::new();
        let tracker = Arc::new(OrientationTracker::new(RotationAngle::from_quarter_turns(turns)));
        let decoder = MockDecoder::scripted(script.iter().map(Scripted::outcome));
        let (reporter, events) = report::channel();
        let mut pipeline = FramePipeline::new(tracker, decoder, reporter);

        let mut decoded = 0usize;
        for (i, format) in formats.iter().enumerate() {
            let f = frame(&ledger, *format, i as u64 + 1);
            let supported = f.pixel_format().is_planar_yuv();
            match pipeline.process(f) {
                FrameOutcome::Skipped(_) => prop_assert!(!supported),
                FrameOutcome::Decoded(_) => decoded += 1,
                FrameOutcome::NotRecognized | FrameOutcome::Failed(_) => {}
            }
        }

        prop_assert_eq!(ledger.outstanding(), 0);
        prop_assert!(ledger.all_released_once());
        prop_assert_eq!(events.try_iter().count(), decoded);

        let supported = formats.iter().filter(|f| f.is_planar_yuv()).count() as u64;
        prop_assert_eq!(pipeline.decoder().calls(), supported);
    }
}
