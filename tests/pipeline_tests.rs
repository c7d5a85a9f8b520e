// tests/pipeline_tests.rs
use handsketch_core::render::RecordingSink;
use handsketch_core::scheduler::Unpaced;
use handsketch_core::stroke::StrokeEvent;
use handsketch_core::{
    BBox, Detection, FrameMapping, Gesture, GestureStabilizer, PipelineConfig, Point, RenderOp,
    Session, StrokeMachine, StrokePhase, Surface,
};
use handsketch_cv::{DetectorConfig, Postprocessed, RasterCanvas, ReplayDetector};

fn session(surface: Surface) -> Session<Unpaced> {
    let config = PipelineConfig::default();
    let stabilizer = GestureStabilizer::new(config.gesture_history_size).unwrap();
    let machine = StrokeMachine::seeded(&config, surface, 2024).unwrap();
    Session::from_parts(stabilizer, machine, FrameMapping::identity(surface), Unpaced)
}

fn closed_at(x: f64, y: f64) -> Vec<Detection> {
    vec![Detection::new("closed", BBox::new(x, y, 20.0, 20.0), 0.9)]
}

#[test]
fn two_fist_frames_draw_one_segment() {
    let surface = Surface::new(640, 480).unwrap();
    let mut session = session(surface);
    let mut sink = RecordingSink::new();

    let first = session.step(&closed_at(10.0, 10.0), &mut sink);
    let StrokeEvent::PenDown { color, .. } = first else {
        panic!("expected pen down, got {:?}", first);
    };
    assert!(sink.ops().is_empty());

    let second = session.step(&closed_at(50.0, 10.0), &mut sink);
    let StrokeEvent::Segment { from, to, width } = second else {
        panic!("expected a segment, got {:?}", second);
    };

    assert_eq!(from, Point::new(20.0, 20.0));
    assert!(to.x > 20.0 && to.x < 60.0);
    assert_eq!(to.y, 20.0);

    let expected_width = (150.0 / (from.distance_to(&to) + 1.0)).clamp(2.0, 8.0);
    assert!((width - expected_width).abs() < 1e-9);

    assert_eq!(sink.segments(), 1);
    assert_eq!(sink.ops()[0], RenderOp::SetStrokeStyle { color, width });
}

#[test]
fn open_hand_clears_mid_stroke() {
    let surface = Surface::new(640, 480).unwrap();
    let mut session = session(surface);
    let mut sink = RecordingSink::new();

    for x in [10.0, 30.0, 50.0] {
        session.step(&closed_at(x, 10.0), &mut sink);
    }
    assert_eq!(sink.segments(), 2);

    // open needs a majority of the 5-frame window before it wins
    let open = vec![Detection::new("open", BBox::new(100.0, 100.0, 40.0, 40.0), 0.95)];
    for _ in 0..3 {
        session.step(&open, &mut sink);
    }

    assert_eq!(session.stabilizer().current(), Gesture::Open);
    assert!(sink.clears() >= 1);
    assert_eq!(session.machine().phase(), StrokePhase::Idle);
    assert_eq!(session.machine().state().last_point, None);
}

#[test]
fn brief_dropout_keeps_stroke_alive() {
    let surface = Surface::new(640, 480).unwrap();
    let mut session = session(surface);
    let mut sink = RecordingSink::new();

    for x in [10.0, 20.0, 30.0] {
        session.step(&closed_at(x, 10.0), &mut sink);
    }
    let before = sink.segments();

    // one frame with no hand at all
    assert_eq!(session.step(&[], &mut sink), StrokeEvent::Unchanged);
    assert_eq!(session.stabilizer().current(), Gesture::Closed);

    session.step(&closed_at(40.0, 10.0), &mut sink);
    assert_eq!(sink.segments(), before + 1);
}

#[test]
fn recorded_stream_paints_canvas() -> anyhow::Result<()> {
    let recording = ReplayDetector::from_json_str(
        r#"[
            [{"label": "closed", "bbox": [40, 80, 20, 20], "score": 0.9}],
            [{"label": "closed", "bbox": [60, 80, 20, 20], "score": 0.9}],
            null,
            [{"label": "point", "bbox": [80, 80, 20, 20], "score": 0.8},
             {"label": "face", "bbox": [0, 0, 50, 50], "score": 0.99}],
            [{"label": "closed", "bbox": [100, 80, 20, 20], "score": 0.3}],
            [{"label": "closed", "bbox": [120, 80, 20, 20], "score": 0.9}]
        ]"#,
    )?;

    let detector_config = DetectorConfig::default();
    let surface = Surface::new(600, 400)?;
    let mapping = FrameMapping::new(detector_config.frame()?, surface);

    let config = PipelineConfig::default();
    let stabilizer = GestureStabilizer::new(config.gesture_history_size)?;
    let machine = StrokeMachine::seeded(&config, surface, 7)?;
    let mut session = Session::from_parts(stabilizer, machine, mapping, Unpaced);

    let mut detector = Postprocessed::new(recording, detector_config);
    let mut canvas = RasterCanvas::new(surface, handsketch_core::Rgb(255, 255, 255));
    let stats = session.run(&mut detector, &mut canvas);

    assert_eq!(stats.cycles, 5);
    assert_eq!(stats.detector_failures, 1);
    assert!(stats.segments >= 2);
    assert!(canvas.painted_pixels() > 0);
    Ok(())
}
