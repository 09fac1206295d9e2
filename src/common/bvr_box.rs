use serde::{Deserialize, Serialize};

/// Axis-aligned box in source-image pixel space.
///
/// `w` and `h` are cached from the corners and kept in sync by every constructor.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize, PartialOrd)]
pub struct BvrBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub w: f32,
    pub h: f32,
}

impl BvrBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::default().with_x1y1_x2y2(x1, y1, x2, y2)
    }

    pub fn width(&self) -> f32 {
        self.w
    }

    pub fn height(&self) -> f32 {
        self.h
    }

    pub fn cx(&self) -> f32 {
        (self.x1 + self.x2) / 2.
    }

    pub fn cy(&self) -> f32 {
        (self.y1 + self.y2) / 2.
    }

    pub fn xy1_xy2(&self) -> (f32, f32, f32, f32) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    /// Signed area; negative for inverted corners.
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1) * (self.y2 - self.y1)
    }

    /// Strictly positive width and height.
    pub fn is_valid(&self) -> bool {
        self.x2 > self.x1 && self.y2 > self.y1
    }

    pub fn intersect(&self, other: &BvrBox) -> f32 {
        let iw = self.x2.min(other.x2) - self.x1.max(other.x1);
        let ih = self.y2.min(other.y2) - self.y1.max(other.y1);
        iw.max(0.) * ih.max(0.)
    }

    /// Both raw areas minus the overlap. Not clamped, so degenerate boxes can make it non-positive.
    pub fn union(&self, other: &BvrBox) -> f32 {
        self.area() + other.area() - self.intersect(other)
    }

    /// Intersection over union, `0` when the union is not positive.
    pub fn iou(&self, other: &BvrBox) -> f32 {
        let union = self.union(other);
        if union <= 0. {
            return 0.;
        }
        self.intersect(other) / union
    }

    pub fn center_distance_sq(&self, other: &BvrBox) -> f32 {
        let (dx, dy) = (self.cx() - other.cx(), self.cy() - other.cy());
        dx * dx + dy * dy
    }

    /// Clamps every edge to `[0, max_w] x [0, max_h]`.
    pub fn clipped(self, max_w: f32, max_h: f32) -> Self {
        Self::new(
            self.x1.clamp(0., max_w),
            self.y1.clamp(0., max_h),
            self.x2.clamp(0., max_w),
            self.y2.clamp(0., max_h),
        )
    }

    /// Rounded corners, for pixel drawing.
    pub fn as_x1y1_x2y2_i32(&self) -> (i32, i32, i32, i32) {
        (self.x1.round() as i32,
         self.y1.round() as i32,
         self.x2.round() as i32,
         self.y2.round() as i32)
    }

    pub fn with_x1y1_x2y2(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        (self.x1, self.y1, self.x2, self.y2) = (x1, y1, x2, y2);
        self.w = x2 - x1;
        self.h = y2 - y1;
        self
    }

    /// Builds the box from its center and size.
    pub fn with_cxcy_wh(self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        let (hw, hh) = (w / 2., h / 2.);
        self.with_x1y1_x2y2(cx - hw, cy - hh, cx + hw, cy + hh)
    }
}
