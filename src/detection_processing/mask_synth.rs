use rayon::prelude::*;

use crate::common::{BvrDetection, MaskImage};
use crate::data::ClassPalette;
use crate::detection_processing::output_layout::{ProtoLayout, ProtoShape};

pub const SIGMOID_LUT_SIZE: usize = 2000;
pub const SIGMOID_LUT_MIN: f32 = -10.;
pub const SIGMOID_LUT_MAX: f32 = 10.;

/// Sigmoid sampled over `[SIGMOID_LUT_MIN, SIGMOID_LUT_MAX]`. Inputs outside are clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct SigmoidLut {
    table: Vec<f32>,
}

impl Default for SigmoidLut {
    fn default() -> Self {
        Self::new()
    }
}

impl SigmoidLut {
    pub fn new() -> Self {
        let step = (SIGMOID_LUT_MAX - SIGMOID_LUT_MIN) / (SIGMOID_LUT_SIZE - 1) as f32;
        let table = (0..SIGMOID_LUT_SIZE)
            .map(|i| {
                let x = SIGMOID_LUT_MIN + i as f32 * step;
                1. / (1. + (-x).exp())
            })
            .collect();
        Self { table }
    }

    /// NaN maps to 0.
    pub fn lookup(&self, x: f32) -> f32 {
        if x.is_nan() {
            return 0.;
        }
        let x = x.clamp(SIGMOID_LUT_MIN, SIGMOID_LUT_MAX);
        let pos = (x - SIGMOID_LUT_MIN) / (SIGMOID_LUT_MAX - SIGMOID_LUT_MIN) * (SIGMOID_LUT_SIZE - 1) as f32;
        self.table[(pos as usize).min(SIGMOID_LUT_SIZE - 1)]
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Builds composited instance masks at proto resolution.
///
/// Owns the channels-last proto scratch and the output image; both are sized once.
#[derive(Debug, Clone)]
pub struct MaskSynthesizer {
    shape: ProtoShape,
    threshold: f32,
    lut: SigmoidLut,
    proto: Vec<f32>,
    mask: MaskImage,
}

impl MaskSynthesizer {
    pub fn new(shape: ProtoShape, threshold: f32) -> Self {
        Self {
            shape,
            threshold,
            lut: SigmoidLut::new(),
            proto: Vec::with_capacity(shape.len()),
            mask: MaskImage::new(shape.width as u32, shape.height as u32),
        }
    }

    pub fn shape(&self) -> &ProtoShape {
        &self.shape
    }

    pub fn lut(&self) -> &SigmoidLut {
        &self.lut
    }

    /// Copies the proto tensor into channels-last scratch, transposing `(K, H, W)` input.
    pub fn load_proto(&mut self, proto: &[f32]) {
        let (hw, k) = (self.shape.pixels(), self.shape.channels);
        let proto = &proto[..self.shape.len().min(proto.len())];
        self.proto.clear();
        match self.shape.layout {
            ProtoLayout::ChannelsLast => self.proto.extend_from_slice(proto),
            ProtoLayout::ChannelsFirst => {
                self.proto.resize(hw * k, 0.);
                for (c, plane) in proto.chunks_exact(hw).enumerate() {
                    for (p, v) in plane.iter().enumerate() {
                        self.proto[p * k + c] = *v;
                    }
                }
            }
        }
        self.proto.resize(hw * k, 0.);
    }

    /// Composites every detection's mask into one image. Later detections paint over earlier
    /// ones. Detections without a matching coefficient vector are skipped.
    ///
    /// The returned image is overwritten by the next call.
    pub fn synthesize(&mut self, detections: &[BvrDetection]) -> &MaskImage {
        let (w, k) = (self.shape.width, self.shape.channels);
        let instances: Vec<(u32, &[f32])> = detections
            .iter()
            .filter_map(|d| {
                let coeffs = d.mask_coeffs.as_deref()?;
                (coeffs.len() == k).then(|| (ClassPalette::mask_colour(d.class_id), coeffs))
            })
            .collect();

        let (proto, lut, threshold) = (&self.proto, &self.lut, self.threshold);
        self.mask
            .pixels
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, row)| {
                row.fill(0);
                let proto_row = &proto[y * w * k..(y + 1) * w * k];
                for (colour, coeffs) in &instances {
                    for (x, px) in row.iter_mut().enumerate() {
                        let v = dot(coeffs, &proto_row[x * k..(x + 1) * k]);
                        if lut.lookup(v) > threshold {
                            *px = *colour;
                        }
                    }
                }
            });

        &self.mask
    }
}
