use crate::common::BvrKeypoint;
use crate::detection_processing::coordinate_mapper::CoordinateMapper;
use crate::detection_processing::output_layout::LayoutDescriptor;
use crate::detection_processing::tensor_view::TensorView;

/// Reads the `(x, y, confidence)` triples of one anchor into source pixels.
///
/// A triple holding NaN or infinity becomes an invisible keypoint at the origin, so the
/// returned vector always has `keypoint_count` entries and indices line up with the skeleton.
pub fn decode_keypoints(
    view: &TensorView,
    anchor: usize,
    layout: &LayoutDescriptor,
    mapper: &CoordinateMapper,
) -> Vec<BvrKeypoint> {
    let offset = layout.keypoint_offset();
    (0..layout.keypoint_count)
        .map(|k| {
            let base = offset + k * 3;
            let (x, y, conf) = (
                view.get(anchor, base),
                view.get(anchor, base + 1),
                view.get(anchor, base + 2),
            );
            if !(x.is_finite() && y.is_finite() && conf.is_finite()) {
                return BvrKeypoint::default();
            }
            let (x, y) = mapper.map_point(x, y);
            BvrKeypoint::new(x, y, conf)
        })
        .collect()
}
