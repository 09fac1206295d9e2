use fast_image_resize::images::Image as FirImage;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{Rgba, RgbaImage};
use crate::data::{MaskUpscale, PostprocessError};

/// Per-pixel ARGB class colours; `0` is transparent (no object).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl MaskImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, PostprocessError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(PostprocessError::ShapeMismatch {
                shape: vec![height as usize, width as usize],
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    pub fn is_on(&self, x: u32, y: u32) -> bool {
        self.get(x, y).map(|p| p != 0).unwrap_or(false)
    }

    pub fn on_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != 0).count()
    }

    /// Resamples the mask to `width` x `height`.
    pub fn upscale(&self, width: u32, height: u32, mode: MaskUpscale) -> Result<MaskImage, PostprocessError> {
        let alg = match mode {
            MaskUpscale::None => return Ok(self.clone()),
            MaskUpscale::Nearest => ResizeAlg::Nearest,
            MaskUpscale::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
        };
        if width == 0 || height == 0 || self.width == 0 || self.height == 0 {
            return Err(PostprocessError::MaskResize(format!(
                "cannot resize {}x{} to {}x{}", self.width, self.height, width, height
            )));
        }
        if (width, height) == (self.width, self.height) {
            return Ok(self.clone());
        }

        let bytes: Vec<u8> = self.pixels.iter().flat_map(|&p| argb_to_rgba(p)).collect();
        let src = FirImage::from_vec_u8(self.width, self.height, bytes, PixelType::U8x4)
            .map_err(|e| PostprocessError::MaskResize(e.to_string()))?;
        let mut dst = FirImage::new(width, height, PixelType::U8x4);

        let mut resizer = Resizer::new();
        let options = ResizeOptions::new().resize_alg(alg);
        resizer
            .resize(&src, &mut dst, &options)
            .map_err(|e| PostprocessError::MaskResize(e.to_string()))?;

        let pixels = dst
            .buffer()
            .chunks_exact(4)
            .map(|c| rgba_to_argb([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self { width, height, pixels })
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            Rgba(argb_to_rgba(self.pixels[(y * self.width + x) as usize]))
        })
    }
}

fn argb_to_rgba(p: u32) -> [u8; 4] {
    let [a, r, g, b] = p.to_be_bytes();
    [r, g, b, a]
}

fn rgba_to_argb(c: [u8; 4]) -> u32 {
    u32::from_be_bytes([c[3], c[0], c[1], c[2]])
}
