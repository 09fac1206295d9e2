use ndarray::{ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use crate::data::PostprocessError;

/// Where the anchor axis sits in a detection tensor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorsPosition {
    /// `(batch, anchors, features)`
    #[serde(rename = "anchors_first")]
    Before,
    /// `(batch, features, anchors)`
    #[serde(rename = "features_first")]
    After,
}

/// Read-only `(anchors, features)` view over one batch entry of a flat output buffer.
///
/// Features-first buffers are viewed through reversed axes, so nothing is copied.
#[derive(Debug, Clone)]
pub struct TensorView<'a> {
    view: ArrayView2<'a, f32>,
}

impl<'a> TensorView<'a> {
    pub fn new(
        data: &'a [f32],
        features: usize,
        anchors: usize,
        position: AnchorsPosition,
    ) -> Result<Self, PostprocessError> {
        let n = features * anchors;
        if data.len() < n {
            return Err(PostprocessError::ShapeMismatch {
                shape: vec![features, anchors],
                expected: n,
                actual: data.len(),
            });
        }
        let data = &data[..n];
        let view = match position {
            AnchorsPosition::Before => ArrayView2::from_shape((anchors, features), data),
            AnchorsPosition::After => {
                ArrayView2::from_shape((features, anchors), data).map(|v| v.reversed_axes())
            }
        }
        .map_err(|e| PostprocessError::UnsupportedLayout(e.to_string()))?;

        Ok(Self { view })
    }

    pub fn anchors(&self) -> usize {
        self.view.len_of(Axis(0))
    }

    pub fn features(&self) -> usize {
        self.view.len_of(Axis(1))
    }

    /// Value of `feature` at `anchor`.
    pub fn get(&self, anchor: usize, feature: usize) -> f32 {
        self.view[[anchor, feature]]
    }

    /// All features of one anchor; strided when the buffer is features-first.
    pub fn anchor(&self, anchor: usize) -> ArrayView1<'_, f32> {
        self.view.index_axis(Axis(0), anchor)
    }

    /// One feature channel across every anchor.
    pub fn channel(&self, feature: usize) -> ArrayView1<'_, f32> {
        self.view.index_axis(Axis(1), feature)
    }
}
