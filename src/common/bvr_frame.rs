use image::{DynamicImage, RgbImage};

/// Per-frame metadata the post-processor needs about the source image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BvrFrame {
    pub img_width: u32,
    pub img_height: u32,
    pub timestamp: u128,
    pub wanted_labels: Option<Vec<u16>>,
}

impl From<&RgbImage> for BvrFrame {
    fn from(image: &RgbImage) -> Self {
        let (img_width, img_height) = image.dimensions();
        Self::new(img_width, img_height)
    }
}

impl From<&DynamicImage> for BvrFrame {
    fn from(image: &DynamicImage) -> Self {
        Self::new(image.width(), image.height())
    }
}

impl BvrFrame {
    pub fn new(img_width: u32, img_height: u32) -> Self {
        Self {
            img_width,
            img_height,
            ..Default::default()
        }
    }

    pub fn with_timestamp(mut self, timestamp: u128) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_wanted_labels(mut self, label_filters: Option<Vec<u16>>) -> Self {
        self.wanted_labels = label_filters;
        self
    }

    /// Every label is wanted unless a filter list is set.
    pub fn is_label_wanted(&self, comp_id: u16) -> bool {
        match &self.wanted_labels {
            Some(masks) => masks.contains(&comp_id),
            None => true,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.img_width, self.img_height)
    }
}
