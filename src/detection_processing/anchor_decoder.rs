use rayon::prelude::*;

use crate::common::{BvrBox, BvrFrame};
use crate::data::{DynConf, ScoreMode};
use crate::detection_processing::coordinate_mapper::CoordinateMapper;
use crate::detection_processing::nms::Nms;
use crate::detection_processing::output_layout::{LayoutDescriptor, BOX_CHANNELS};
use crate::detection_processing::tensor_view::TensorView;

/// An anchor that passed confidence gating, already in source pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateDetection {
    pub bbox: BvrBox,
    pub confidence: f32,
    pub class_id: usize,
    /// Row in the detection tensor, used to read keypoints after suppression.
    pub anchor: usize,
    pub mask_coeffs: Option<Vec<f32>>,
}

impl Nms for CandidateDetection {
    fn iou(&self, other: &Self) -> f32 {
        self.bbox.iou(&other.bbox)
    }

    fn confidence(&self) -> f32 {
        self.confidence
    }

    fn class_id(&self) -> usize {
        self.class_id
    }
}

/// Per-anchor extraction configured once from a [`LayoutDescriptor`].
#[derive(Debug, Clone)]
pub struct AnchorDecoder {
    layout: LayoutDescriptor,
    confs: DynConf,
    score_mode: ScoreMode,
    min_box_size: f32,
}

impl AnchorDecoder {
    pub fn new(layout: &LayoutDescriptor, confs: DynConf, score_mode: ScoreMode, min_box_size: f32) -> Self {
        Self {
            layout: layout.clone(),
            confs,
            score_mode,
            min_box_size,
        }
    }

    pub fn layout(&self) -> &LayoutDescriptor {
        &self.layout
    }

    pub fn confs(&self) -> &DynConf {
        &self.confs
    }

    /// Best class and its score over the active class channels. NaN channels never win.
    fn best_class(&self, view: &TensorView, anchor: usize) -> Option<(usize, f32)> {
        let offset = self.layout.class_offset();
        (0..self.layout.active_classes)
            .map(|c| (c, view.get(anchor, offset + c)))
            .filter(|(_, score)| !score.is_nan())
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Decodes one anchor, or `None` when it fails gating or its geometry is unusable.
    pub fn decode_anchor(
        &self,
        view: &TensorView,
        anchor: usize,
        mapper: &CoordinateMapper,
        frame: &BvrFrame,
    ) -> Option<CandidateDetection> {
        let (class_id, class_score) = self.best_class(view, anchor)?;
        let objectness = self.layout.objectness_offset().map(|i| view.get(anchor, i));
        let confidence = self.score_mode.combine(objectness, class_score);

        // NaN fails this comparison too
        if !(confidence >= self.confs.get(class_id)) || !confidence.is_finite() {
            return None;
        }
        if !frame.is_label_wanted(class_id as u16) {
            return None;
        }

        let bbox = mapper.map_box(
            view.get(anchor, 0),
            view.get(anchor, 1),
            view.get(anchor, 2),
            view.get(anchor, 3),
        )?;

        // filtering unreliably small objects
        if bbox.width() < self.min_box_size || bbox.height() < self.min_box_size {
            return None;
        }

        let mask_coeffs = self.layout.has_mask_coeffs().then(|| {
            let offset = self.layout.mask_offset();
            (0..self.layout.mask_coeff_len)
                .map(|k| view.get(anchor, offset + k))
                .collect::<Vec<f32>>()
        });

        Some(CandidateDetection {
            bbox,
            confidence,
            class_id,
            anchor,
            mask_coeffs,
        })
    }

    /// Decodes every anchor into `out`, reusing its allocation. Anchor order is preserved.
    pub fn decode_into(
        &self,
        view: &TensorView,
        mapper: &CoordinateMapper,
        frame: &BvrFrame,
        out: &mut Vec<CandidateDetection>,
    ) {
        out.clear();
        if view.features() < BOX_CHANNELS + 1 {
            return;
        }
        out.par_extend(
            (0..view.anchors())
                .into_par_iter()
                .filter_map(|i| self.decode_anchor(view, i, mapper, frame)),
        );
    }
}
