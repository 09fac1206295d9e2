use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use bvr_postprocess::common::{BvrBox, BvrDetection, ModelConfig, ModelPreset};
use bvr_postprocess::data::NmsMode;
use bvr_postprocess::detection_processing::{nms, Nms};

mod synthetic;
use synthetic::{assert_close, detection};

#[test]
fn overlapping_same_class_keeps_the_most_confident() {
    let a = detection(0, 0., 0., 10., 10., 0.6);
    let b = detection(0, 0., 0., 10., 8., 0.9);
    assert_close(a.iou(&b), 0.8);

    let mut dets = vec![a, b];
    nms(&mut dets, 0.45, NmsMode::ClassPartitioned);
    assert_eq!(dets.len(), 1);
    assert_close(dets[0].confidence, 0.9);
}

#[test]
fn different_classes_survive_class_partitioned() {
    let a = detection(0, 0., 0., 10., 10., 0.9);
    let b = detection(1, 0., 0., 10., 9., 0.8);
    assert_close(a.iou(&b), 0.9);

    let mut partitioned = vec![a.clone(), b.clone()];
    nms(&mut partitioned, 0.45, NmsMode::ClassPartitioned);
    assert_eq!(partitioned.len(), 2);

    let mut global = vec![a, b];
    nms(&mut global, 0.45, NmsMode::Global);
    assert_eq!(global.len(), 1);
    assert_eq!(global[0].class_id, 0);
}

#[test]
fn suppression_compares_against_kept_boxes_only() {
    // b is suppressed by a, so c (overlapping b only) survives
    let a = detection(0, 0., 0., 10., 10., 0.9);
    let b = detection(0, 4., 0., 14., 10., 0.8);
    let c = detection(0, 9., 0., 19., 10., 0.7);
    let mut dets = vec![c, b, a];
    nms(&mut dets, 0.3, NmsMode::Global);

    let confs: Vec<f32> = dets.iter().map(|d| d.confidence).collect();
    assert_eq!(confs, vec![0.9, 0.7]);
}

#[test]
fn nms_is_idempotent() {
    let mut dets = vec![
        detection(0, 0., 0., 10., 10., 0.9),
        detection(0, 1., 1., 11., 11., 0.85),
        detection(1, 1., 1., 11., 11., 0.5),
        detection(0, 50., 50., 60., 60., 0.4),
    ];
    nms(&mut dets, 0.45, NmsMode::ClassPartitioned);
    let once = dets.clone();
    nms(&mut dets, 0.45, NmsMode::ClassPartitioned);
    assert_eq!(dets, once);
    assert_eq!(once.len(), 3);
}

#[test]
fn degenerate_union_has_zero_iou() {
    let a = BvrBox::new(5., 5., 5., 5.);
    assert_eq!(a.iou(&a), 0.);
    let b = BvrBox::new(0., 0., 0., 10.);
    assert_eq!(a.iou(&b), 0.);
}

#[test]
fn tightening_factor_lowers_the_effective_threshold() {
    let config = ModelConfig::default().with_iou_threshold(0.45).with_tightening_factor(0.7);
    assert_close(config.effective_iou_threshold(), 0.315);
    assert_close(ModelPreset::Pose.config().effective_iou_threshold(), 0.135);
    assert_close(ModelPreset::Grocery.config().effective_iou_threshold(), 0.45);
}

#[test]
fn random_clouds_leave_no_overlapping_pairs() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let mut dets: Vec<BvrDetection> = (0..300)
            .map(|_| {
                let (x, y) = (rng.gen_range(0.0..200.0), rng.gen_range(0.0..200.0));
                let (w, h) = (rng.gen_range(5.0..60.0), rng.gen_range(5.0..60.0));
                detection(rng.gen_range(0..3), x, y, x + w, y + h, rng.gen_range(0.0..1.0))
            })
            .collect();
        nms(&mut dets, 0.45, NmsMode::ClassPartitioned);

        for (i, a) in dets.iter().enumerate() {
            for b in dets.iter().skip(i + 1) {
                assert!(a.confidence >= b.confidence);
                if a.class_id == b.class_id {
                    assert!(a.iou(b) <= 0.45);
                }
            }
        }
    }
}

fn arb_box() -> impl Strategy<Value = BvrBox> {
    (0.0f32..500., 0.0f32..500., 1.0f32..200., 1.0f32..200.)
        .prop_map(|(x, y, w, h)| BvrBox::new(x, y, x + w, y + h))
}

fn arb_detection() -> impl Strategy<Value = BvrDetection> {
    (arb_box(), 0usize..3, 0.0f32..1.)
        .prop_map(|(bbox, class_id, confidence)| BvrDetection::new(class_id, bbox, None, confidence))
}

proptest! {
    #[test]
    fn iou_is_symmetric(a in arb_box(), b in arb_box()) {
        prop_assert_eq!(a.iou(&b), b.iou(&a));
        prop_assert!(a.iou(&b) >= 0. && a.iou(&b) <= 1.0 + 1e-6);
    }

    #[test]
    fn iou_with_itself_is_one(a in arb_box()) {
        prop_assert_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn nms_output_is_stable_and_separated(
        dets in prop::collection::vec(arb_detection(), 0..60),
        iou in 0.1f32..0.9,
    ) {
        let mut dets = dets;
        nms(&mut dets, iou, NmsMode::ClassPartitioned);
        for (i, a) in dets.iter().enumerate() {
            for b in dets.iter().skip(i + 1) {
                if a.class_id == b.class_id {
                    prop_assert!(a.iou(b) <= iou);
                }
            }
        }
        let once = dets.clone();
        nms(&mut dets, iou, NmsMode::ClassPartitioned);
        prop_assert_eq!(dets, once);
    }
}
