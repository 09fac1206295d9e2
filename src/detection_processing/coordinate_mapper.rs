use crate::common::{BvrBox, BvrFrame, ModelConfig};
use crate::data::{CoordinateSpace, NORMALIZED_BOX_LIMIT, NORMALIZED_KEYPOINT_LIMIT};

/// Maps decoded geometry into source-image pixels for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    src_width: f32,
    src_height: f32,
    input_width: f32,
    input_height: f32,
    space: CoordinateSpace,
}

impl CoordinateMapper {
    pub fn new(src_width: u32, src_height: u32, input_width: u32, input_height: u32, space: CoordinateSpace) -> Self {
        Self {
            src_width: src_width as f32,
            src_height: src_height as f32,
            input_width: input_width.max(1) as f32,
            input_height: input_height.max(1) as f32,
            space,
        }
    }

    pub fn for_frame(frame: &BvrFrame, config: &ModelConfig) -> Self {
        Self::new(
            frame.img_width,
            frame.img_height,
            config.input_width,
            config.input_height,
            config.coordinate_space,
        )
    }

    fn scale(&self, x: f32, y: f32, limit: f32) -> (f32, f32) {
        if self.space.treats_as_normalized(x, y, limit) {
            (self.src_width, self.src_height)
        } else {
            (self.src_width / self.input_width, self.src_height / self.input_height)
        }
    }

    /// Scales a `(cx, cy, w, h)` box, clips it to the source image and drops it
    /// when nothing with positive area remains.
    pub fn map_box(&self, cx: f32, cy: f32, w: f32, h: f32) -> Option<BvrBox> {
        if !(cx.is_finite() && cy.is_finite() && w.is_finite() && h.is_finite()) {
            return None;
        }
        let (sx, sy) = self.scale(cx, cy, NORMALIZED_BOX_LIMIT);
        let bbox = BvrBox::default()
            .with_cxcy_wh(cx * sx, cy * sy, w * sx, h * sy)
            .clipped(self.src_width, self.src_height);
        bbox.is_valid().then_some(bbox)
    }

    /// Scales one keypoint, deciding the space from the keypoint itself.
    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        let (sx, sy) = self.scale(x, y, NORMALIZED_KEYPOINT_LIMIT);
        (x * sx, y * sy)
    }
}
