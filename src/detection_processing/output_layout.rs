use crate::common::ModelConfig;
use crate::data::PostprocessError;
use crate::detection_processing::tensor_view::AnchorsPosition;

/// Number of box geometry channels `(cx, cy, w, h)` leading every anchor.
pub const BOX_CHANNELS: usize = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ModelKind {
    BoxOnly,
    MultiClass,
    Pose,
    Segmentation,
}

impl ModelKind {
    pub fn name(&self) -> String {
        match self {
            Self::BoxOnly => "box-only".to_string(),
            Self::MultiClass => "multi-class".to_string(),
            Self::Pose => "pose".to_string(),
            Self::Segmentation => "segmentation".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProtoLayout {
    /// `(H, W, K)`
    ChannelsLast,
    /// `(K, H, W)`
    ChannelsFirst,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProtoShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
    pub layout: ProtoLayout,
}

impl ProtoShape {
    pub fn pixels(&self) -> usize {
        self.height * self.width
    }

    pub fn len(&self) -> usize {
        self.pixels() * self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode layout derived once per loaded model.
///
/// `feature_count == 4 + objectness + num_classes + mask_coeff_len + keypoint_count * 3`.
/// Pose and box-only layouts read their single confidence channel as one class.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDescriptor {
    pub kind: ModelKind,
    pub batch: usize,
    pub feature_count: usize,
    pub anchor_count: usize,
    pub anchors_position: AnchorsPosition,
    /// Class channels present in the tensor.
    pub num_classes: usize,
    /// Class channels considered by arg-max: `min(declared labels, num_classes)`.
    pub active_classes: usize,
    pub has_objectness: bool,
    pub mask_coeff_len: usize,
    pub keypoint_count: usize,
    pub proto: Option<ProtoShape>,
}

impl LayoutDescriptor {
    pub fn has_mask_coeffs(&self) -> bool {
        self.mask_coeff_len > 0
    }

    pub fn has_keypoints(&self) -> bool {
        self.keypoint_count > 0
    }

    pub fn objectness_offset(&self) -> Option<usize> {
        self.has_objectness.then_some(BOX_CHANNELS)
    }

    pub fn class_offset(&self) -> usize {
        BOX_CHANNELS + self.has_objectness as usize
    }

    pub fn mask_offset(&self) -> usize {
        self.class_offset() + self.num_classes
    }

    pub fn keypoint_offset(&self) -> usize {
        self.mask_offset() + self.mask_coeff_len
    }

    pub fn expected_features(&self) -> usize {
        self.keypoint_offset() + self.keypoint_count * 3
    }

    /// Values in one batch entry of the detection tensor.
    pub fn box_len(&self) -> usize {
        self.feature_count * self.anchor_count
    }
}

/// Picks the decode variant for a model from its output shapes.
///
/// `shapes` holds the detection tensor shape and, for segmentation models, the proto tensor
/// shape. Shapes that match no variant are an error; a declared label count that disagrees
/// with the tensor only logs a warning.
pub fn resolve_layout(shapes: &[Vec<usize>], config: &ModelConfig) -> Result<LayoutDescriptor, PostprocessError> {
    let (box_shape, proto_shape) = match shapes {
        [b] => (b, None),
        [b, p] => (b, Some(p)),
        _ => return Err(PostprocessError::OutputCount(shapes.len())),
    };

    let proto = match proto_shape {
        Some(p) => Some(proto_dims(p)?),
        None => None,
    };
    let declared = config.declared_classes();
    let kp = config.keypoint_count;

    let known = known_feature_counts(config, proto.map(|p| p.channels));
    let (batch, feature_count, anchor_count, anchors_position) =
        box_dims(box_shape, config.anchors_position, &known)?;

    let (kind, has_objectness, num_classes, mask_coeff_len, keypoint_count) = match proto {
        Some(proto) => {
            let k = proto.channels;
            let obj = objectness_for(feature_count.saturating_sub(BOX_CHANNELS), k, declared, config.has_objectness, false);
            let num_classes = feature_count
                .checked_sub(BOX_CHANNELS + obj as usize + k)
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    PostprocessError::UnsupportedLayout(format!(
                        "{feature_count} features leave no class channels beside {k} mask coefficients"
                    ))
                })?;
            (ModelKind::Segmentation, obj, num_classes, k, 0)
        }
        None if kp > 0 && feature_count == BOX_CHANNELS + 1 + kp * 3 && declared.map(|n| n <= 1).unwrap_or(true) => {
            (ModelKind::Pose, false, 1, 0, kp)
        }
        None if feature_count == BOX_CHANNELS + 1 => (ModelKind::BoxOnly, false, 1, 0, 0),
        None if feature_count > BOX_CHANNELS + 1 => {
            let obj = objectness_for(feature_count - BOX_CHANNELS, 0, declared, config.has_objectness, true);
            (ModelKind::MultiClass, obj, feature_count - BOX_CHANNELS - obj as usize, 0, 0)
        }
        None => {
            return Err(PostprocessError::UnsupportedLayout(format!(
                "{feature_count} features per anchor in {box_shape:?}"
            )))
        }
    };

    let active_classes = match declared {
        Some(n) if n != num_classes => {
            log::warn!(
                "Model declares {} labels but its output holds {} classes, using {}",
                n, num_classes, n.min(num_classes)
            );
            n.min(num_classes)
        }
        _ => num_classes,
    };

    Ok(LayoutDescriptor {
        kind,
        batch,
        feature_count,
        anchor_count,
        anchors_position,
        num_classes,
        active_classes,
        has_objectness,
        mask_coeff_len,
        keypoint_count,
        proto,
    })
}

/// Explicit flag first, then whichever reading matches the declared label count.
fn objectness_for(
    after_box: usize,
    mask_len: usize,
    declared: Option<usize>,
    explicit: Option<bool>,
    default: bool,
) -> bool {
    if let Some(x) = explicit {
        return x;
    }
    let classes_without = after_box.saturating_sub(mask_len);
    match declared {
        Some(n) if n == classes_without => false,
        Some(n) if n + 1 == classes_without => true,
        _ => default,
    }
}

/// Feature counts the configuration implies: box plus optional objectness plus the declared
/// labels (and mask coefficients), or the pose row when at most one label is declared.
fn known_feature_counts(config: &ModelConfig, mask_len: Option<usize>) -> Vec<usize> {
    let declared = config.declared_classes();
    let mut known = vec![];
    if let Some(n) = declared {
        let base = BOX_CHANNELS + n + mask_len.unwrap_or(0);
        match config.has_objectness {
            Some(true) => known.push(base + 1),
            Some(false) => known.push(base),
            None => known.extend([base, base + 1]),
        }
    }
    let kp = config.keypoint_count;
    if mask_len.is_none() && kp > 0 && declared.map(|n| n <= 1).unwrap_or(true) {
        known.push(BOX_CHANNELS + 1 + kp * 3);
    }
    known
}

/// `(batch, features, anchors, position)` of a rank-3 or rank-2 detection tensor.
///
/// An explicit position wins. Otherwise the axis whose length matches a feature count in
/// `known` is the feature axis. When neither or both match, features-first is assumed unless
/// the last axis is the smaller one and can hold a box and a score.
fn box_dims(
    shape: &[usize],
    explicit: Option<AnchorsPosition>,
    known: &[usize],
) -> Result<(usize, usize, usize, AnchorsPosition), PostprocessError> {
    let (batch, d1, d2) = match shape {
        [b, d1, d2] => (*b, *d1, *d2),
        [d1, d2] => (1, *d1, *d2),
        _ => {
            return Err(PostprocessError::UnsupportedLayout(format!(
                "detection tensor must be rank 2 or 3, got {shape:?}"
            )))
        }
    };
    if batch == 0 || d1 == 0 || d2 == 0 {
        return Err(PostprocessError::UnsupportedLayout(format!("empty detection tensor {shape:?}")));
    }

    let position = match explicit {
        Some(position) => position,
        None => match (known.contains(&d1), known.contains(&d2)) {
            (true, false) => AnchorsPosition::After,
            (false, true) => AnchorsPosition::Before,
            _ if d1 > d2 && d2 > BOX_CHANNELS => AnchorsPosition::Before,
            _ => AnchorsPosition::After,
        },
    };
    match position {
        AnchorsPosition::Before => Ok((batch, d2, d1, position)),
        AnchorsPosition::After => Ok((batch, d1, d2, position)),
    }
}

fn proto_dims(shape: &[usize]) -> Result<ProtoShape, PostprocessError> {
    let (a, b, c) = match shape {
        [1, a, b, c] | [a, b, c] => (*a, *b, *c),
        _ => {
            return Err(PostprocessError::UnsupportedLayout(format!(
                "proto tensor must be (1, H, W, K) or (1, K, H, W), got {shape:?}"
            )))
        }
    };
    if a == 0 || b == 0 || c == 0 {
        return Err(PostprocessError::UnsupportedLayout(format!("empty proto tensor {shape:?}")));
    }

    if c <= a.min(b) {
        Ok(ProtoShape { height: a, width: b, channels: c, layout: ProtoLayout::ChannelsLast })
    } else if a <= b.min(c) {
        Ok(ProtoShape { height: b, width: c, channels: a, layout: ProtoLayout::ChannelsFirst })
    } else {
        Err(PostprocessError::UnsupportedLayout(format!("cannot tell the mask channel axis of {shape:?}")))
    }
}
