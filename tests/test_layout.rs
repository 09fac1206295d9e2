use bvr_postprocess::common::{BvrFrame, ModelConfig};
use bvr_postprocess::data::{PostprocessError, RawOutput};
use bvr_postprocess::detection_processing::{resolve_layout, AnchorsPosition, ModelKind, ProtoLayout};

mod synthetic;
use synthetic::{anchors_first, assert_close, background, features_first};

fn labels(n: usize) -> ModelConfig {
    ModelConfig::default().with_label_strings((0..n).map(|i| format!("c{i}")).collect())
}

#[test]
fn detects_each_variant() {
    let multi = resolve_layout(&[vec![1, 84, 8400]], &labels(80)).unwrap();
    assert_eq!(multi.kind, ModelKind::MultiClass);
    assert_eq!((multi.num_classes, multi.active_classes), (80, 80));
    assert!(!multi.has_objectness);
    assert_eq!(multi.anchors_position, AnchorsPosition::After);
    assert_eq!(multi.expected_features(), multi.feature_count);

    let with_obj = resolve_layout(&[vec![1, 85, 8400]], &labels(80)).unwrap();
    assert!(with_obj.has_objectness);
    assert_eq!(with_obj.class_offset(), 5);

    let box_only = resolve_layout(&[vec![1, 5, 8400]], &ModelConfig::default()).unwrap();
    assert_eq!(box_only.kind, ModelKind::BoxOnly);
    assert_eq!(box_only.num_classes, 1);

    let pose = resolve_layout(&[vec![1, 56, 8400]], &ModelConfig::default()).unwrap();
    assert_eq!(pose.kind, ModelKind::Pose);
    assert_eq!(pose.keypoint_count, 17);
    assert_eq!(pose.keypoint_offset(), 5);
    assert_eq!(pose.expected_features(), 56);

    let seg = resolve_layout(&[vec![1, 116, 8400], vec![1, 160, 160, 32]], &labels(80)).unwrap();
    assert_eq!(seg.kind, ModelKind::Segmentation);
    assert_eq!((seg.num_classes, seg.mask_coeff_len), (80, 32));
    assert_eq!(seg.mask_offset(), 84);
    let proto = seg.proto.unwrap();
    assert_eq!((proto.height, proto.width, proto.channels), (160, 160, 32));
    assert_eq!(proto.layout, ProtoLayout::ChannelsLast);
}

#[test]
fn accepts_alternate_orientations() {
    let anchors_first = resolve_layout(&[vec![1, 8400, 84]], &labels(80)).unwrap();
    assert_eq!(anchors_first.anchors_position, AnchorsPosition::Before);
    assert_eq!((anchors_first.feature_count, anchors_first.anchor_count), (84, 8400));

    let unbatched = resolve_layout(&[vec![84, 8400]], &labels(80)).unwrap();
    assert_eq!(unbatched.feature_count, 84);

    let nchw = resolve_layout(&[vec![1, 116, 8400], vec![1, 32, 160, 160]], &labels(80)).unwrap();
    let proto = nchw.proto.unwrap();
    assert_eq!(proto.layout, ProtoLayout::ChannelsFirst);
    assert_eq!(proto.channels, 32);
}

#[test]
fn declared_labels_pick_the_feature_axis() {
    let mut rows = background(84, 20);
    rows[7][0..4].copy_from_slice(&[320., 320., 64., 64.]);
    rows[7][4 + 3] = 0.9;
    let (shape, data) = features_first(&rows);
    assert_eq!(shape, vec![1, 84, 20]);

    let config = labels(80).with_input_size(640, 640);
    let mut pipeline = bvr_postprocess::init_pipeline(&config, &[shape.clone()]).unwrap();
    let layout = pipeline.layout();
    assert_eq!(layout.anchors_position, AnchorsPosition::After);
    assert_eq!((layout.feature_count, layout.anchor_count), (84, 20));
    assert_eq!((layout.num_classes, layout.active_classes), (80, 80));

    let y = bvr_postprocess::run_postprocess(&mut pipeline, &[RawOutput::f32(&shape, &data)], &BvrFrame::new(640, 640)).unwrap();
    let dets = y.detections_or_empty();
    assert_eq!(dets.len(), 1);
    assert_eq!(dets[0].class_id, 3);
    assert_close(dets[0].confidence, 0.9);

    // same rows laid out anchors-first still resolve by the label count
    let (shape, _) = anchors_first(&rows);
    let layout = resolve_layout(&[shape], &labels(80)).unwrap();
    assert_eq!(layout.anchors_position, AnchorsPosition::Before);
    assert_eq!((layout.feature_count, layout.anchor_count), (84, 20));

    let pose = resolve_layout(&[vec![1, 56, 30]], &ModelConfig::default()).unwrap();
    assert_eq!((pose.kind, pose.anchors_position), (ModelKind::Pose, AnchorsPosition::After));
}

#[test]
fn explicit_anchors_position_wins() {
    let forced = resolve_layout(&[vec![1, 84, 20]], &ModelConfig::default().with_anchors_position(AnchorsPosition::After))
        .unwrap();
    assert_eq!((forced.feature_count, forced.anchor_count), (84, 20));

    let inferred = resolve_layout(&[vec![1, 84, 20]], &ModelConfig::default()).unwrap();
    assert_eq!(inferred.anchors_position, AnchorsPosition::Before);

    let forced = resolve_layout(&[vec![1, 6, 100]], &ModelConfig::default().with_anchors_position(AnchorsPosition::Before))
        .unwrap();
    assert_eq!((forced.feature_count, forced.anchor_count), (100, 6));
}

#[test]
fn six_features_follow_declared_labels() {
    let two = resolve_layout(&[vec![1, 6, 100]], &labels(2)).unwrap();
    assert_eq!((two.num_classes, two.has_objectness), (2, false));

    let one = resolve_layout(&[vec![1, 6, 100]], &labels(1)).unwrap();
    assert_eq!((one.num_classes, one.has_objectness), (1, true));

    let unknown = resolve_layout(&[vec![1, 6, 100]], &ModelConfig::default()).unwrap();
    assert!(unknown.has_objectness);

    let forced = resolve_layout(&[vec![1, 6, 100]], &ModelConfig::default().with_objectness(false)).unwrap();
    assert_eq!(forced.num_classes, 2);
}

#[test]
fn many_labels_turn_a_pose_shape_into_multi_class() {
    let layout = resolve_layout(&[vec![1, 56, 8400]], &labels(52)).unwrap();
    assert_eq!(layout.kind, ModelKind::MultiClass);
    assert_eq!(layout.num_classes, 52);
}

#[test]
fn unsupported_layouts_fail_to_load() {
    let cases: Vec<Vec<Vec<usize>>> = vec![
        vec![vec![1, 4, 8400]],
        vec![vec![1, 1, 4, 8400]],
        vec![vec![1, 0, 8400]],
        vec![vec![1, 36, 8400], vec![1, 160, 160, 32]],
    ];
    for shapes in cases {
        match resolve_layout(&shapes, &ModelConfig::default()) {
            Err(PostprocessError::UnsupportedLayout(_)) => {}
            other => panic!("{shapes:?} resolved to {other:?}"),
        }
    }

    let three = vec![vec![1, 84, 8400], vec![1, 160, 160, 32], vec![1, 10]];
    assert_eq!(resolve_layout(&three, &ModelConfig::default()), Err(PostprocessError::OutputCount(3)));

    let err = bvr_postprocess::init_pipeline(&ModelConfig::default(), &[vec![1, 3, 100]]).unwrap_err();
    assert!(matches!(err.downcast_ref::<PostprocessError>(), Some(PostprocessError::UnsupportedLayout(_))));
}

#[test]
fn label_mismatch_uses_the_smaller_count() {
    let layout = resolve_layout(&[vec![1, 84, 8400]], &labels(3).with_objectness(false)).unwrap();
    assert_eq!((layout.num_classes, layout.active_classes), (80, 3));

    let layout = resolve_layout(&[vec![1, 9, 100]], &labels(10).with_objectness(false)).unwrap();
    assert_eq!((layout.num_classes, layout.active_classes), (5, 5));
}

#[test]
fn mismatched_labels_still_decode() {
    let mut rows = background(8, 8);
    rows[3] = vec![0.5, 0.5, 0.2, 0.2, 0.1, 0.6, 0.0, 0.99];
    let (shape, data) = features_first(&rows);

    let config = ModelConfig::default().with_labels(&["cat", "dog"]).with_objectness(false);
    let mut pipeline = bvr_postprocess::init_pipeline(&config, &[shape.clone()]).unwrap();
    assert_eq!(pipeline.layout().active_classes, 2);

    let y = bvr_postprocess::run_postprocess(&mut pipeline, &[RawOutput::f32(&shape, &data)], &BvrFrame::new(100, 100)).unwrap();
    let det = &y.detections_or_empty()[0];
    assert_eq!(det.get_label(), "dog");
    assert_close(det.confidence, 0.6);
}
