use std::time::{Duration, Instant};

use bvr_postprocess::common::{BvrFrame, ModelConfig, ModelPreset};
use bvr_postprocess::data::{OwnedOutput, PostprocessError};
use bvr_postprocess::detection_processing::ModelKind;
use bvr_postprocess::detection_runners::{PipelineWorker, SubmitStatus};

mod synthetic;
use synthetic::{background, features_first};

const WAIT: Duration = Duration::from_secs(10);

fn one_box() -> (Vec<usize>, Vec<f32>) {
    let mut rows = background(6, 16);
    rows[3] = vec![0.5, 0.5, 0.25, 0.25, 0.1, 0.95];
    features_first(&rows)
}

fn wait_until(done: impl Fn() -> bool) {
    let deadline = Instant::now() + WAIT;
    while !done() {
        assert!(Instant::now() < deadline, "timed out");
        std::thread::sleep(Duration::from_millis(1));
    }
}

fn worker() -> (PipelineWorker, Vec<usize>, Vec<f32>) {
    let (shape, data) = one_box();
    let config = ModelConfig::default().with_labels(&["cat", "dog"]);
    let worker = PipelineWorker::new(&config, &[shape.clone()], false).unwrap();
    (worker, shape, data)
}

#[test]
fn submitted_frame_comes_back() {
    let (worker, shape, data) = worker();
    let frame = BvrFrame::new(200, 100).with_timestamp(42);

    assert_eq!(worker.submit(vec![OwnedOutput::f32(&shape, data)], frame), SubmitStatus::Accepted);
    let y = worker.recv_timeout(WAIT).expect("no result").unwrap();

    assert_eq!(y.timestamp(), 42);
    let dets = y.detections_or_empty();
    assert_eq!(dets.len(), 1);
    assert_eq!(dets[0].get_label(), "dog");
    assert_eq!(dets[0].bbox.as_x1y1_x2y2_i32(), (75, 38, 125, 63));
    assert!(!worker.is_busy());
    assert!(worker.try_recv().is_none());
}

#[test]
fn frames_are_dropped_while_one_is_in_flight() {
    let (worker, shape, data) = worker();

    // holding the pipeline keeps the first frame in flight
    let statuses = worker
        .with_pipeline(|_| {
            let first = worker.submit(vec![OwnedOutput::f32(&shape, data.clone())], BvrFrame::new(64, 64).with_timestamp(1));
            let second = worker.submit(vec![OwnedOutput::f32(&shape, data.clone())], BvrFrame::new(64, 64).with_timestamp(2));
            (first, second, worker.is_busy())
        })
        .unwrap();
    assert_eq!(statuses, (SubmitStatus::Accepted, SubmitStatus::Dropped, true));

    let y = worker.recv_timeout(WAIT).expect("no result").unwrap();
    assert_eq!(y.timestamp(), 1);
    assert!(worker.recv_timeout(Duration::from_millis(100)).is_none());

    assert_eq!(worker.submit(vec![OwnedOutput::f32(&shape, data)], BvrFrame::new(64, 64).with_timestamp(3)), SubmitStatus::Accepted);
    assert_eq!(worker.recv_timeout(WAIT).expect("no result").unwrap().timestamp(), 3);
}

#[test]
fn switching_models_replaces_the_layout() {
    let (worker, _, _) = worker();
    assert_eq!(worker.with_pipeline(|p| p.layout().kind), Some(ModelKind::MultiClass));

    let seg = ModelPreset::Segmentation.config().with_labels(&["blob"]);
    worker.switch_model(&seg, &[vec![1, 37, 100], vec![1, 32, 160, 160]]).unwrap();
    assert_eq!(worker.with_pipeline(|p| p.layout().kind), Some(ModelKind::Segmentation));
    assert_eq!(worker.with_pipeline(|p| p.layout().mask_coeff_len), Some(32));
}

#[test]
fn failed_switch_leaves_no_model_loaded() {
    let (worker, shape, data) = worker();

    let err = worker.switch_model(&ModelConfig::default(), &[vec![1, 4, 8400]]).unwrap_err();
    assert!(matches!(err.downcast_ref::<PostprocessError>(), Some(PostprocessError::UnsupportedLayout(_))));
    assert!(worker.with_pipeline(|_| ()).is_none());

    assert_eq!(worker.submit(vec![OwnedOutput::f32(&shape, data)], BvrFrame::new(64, 64)), SubmitStatus::Accepted);
    let err = worker.recv_timeout(WAIT).expect("no result").unwrap_err();
    assert_eq!(err.downcast_ref::<PostprocessError>(), Some(&PostprocessError::NotLoaded));
    assert!(!worker.is_busy());
}

#[test]
fn bad_frames_report_errors_and_free_the_worker() {
    let (worker, shape, _) = worker();
    let short = OwnedOutput::f32(&shape, vec![0.; 10]);

    assert_eq!(worker.submit(vec![short], BvrFrame::new(64, 64)), SubmitStatus::Accepted);
    let err = worker.recv_timeout(WAIT).expect("no result").unwrap_err();
    assert!(matches!(err.downcast_ref::<PostprocessError>(), Some(PostprocessError::ShapeMismatch { .. })));
    assert!(!worker.is_busy());
}

#[test]
fn uncollected_results_are_replaced_by_newer_ones() {
    let (worker, shape, data) = worker();

    assert_eq!(worker.submit(vec![OwnedOutput::f32(&shape, data.clone())], BvrFrame::new(64, 64).with_timestamp(1)), SubmitStatus::Accepted);
    wait_until(|| !worker.is_busy());
    assert_eq!(worker.submit(vec![OwnedOutput::f32(&shape, data)], BvrFrame::new(64, 64).with_timestamp(2)), SubmitStatus::Accepted);
    wait_until(|| worker.replaced_results() == 1);

    assert_eq!(worker.recv_timeout(WAIT).expect("no result").unwrap().timestamp(), 2);
    assert!(worker.try_recv().is_none());
}

#[test]
fn stopped_worker_refuses_model_switches() {
    let (mut worker, shape, data) = worker();
    assert!(worker.is_running());

    worker.stop();
    assert!(!worker.is_running());
    let err = worker.switch_model(&ModelConfig::default(), &[shape.clone()]).unwrap_err();
    assert_eq!(err.downcast_ref::<PostprocessError>(), Some(&PostprocessError::WorkerStopped));
    assert_eq!(worker.submit(vec![OwnedOutput::f32(&shape, data)], BvrFrame::new(64, 64)), SubmitStatus::Dropped);
}
