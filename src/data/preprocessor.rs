// ============================================================
// Layer 4 — Image Preprocessor
// ============================================================
// Turns an image file on disk into the fixed-shape, normalised
// tensor the model consumes:
//
//   1. Decode the file (any format the `image` crate handles)
//   2. Resize exactly to the configured resolution with a
//      triangle filter — deterministic, no random cropping
//   3. Convert to RGB8 (drops alpha, expands grayscale)
//   4. Scale every channel by 1/255 into f32 ∈ [0,1]
//
// The output carries a logical leading batch dimension of 1,
// so its shape reads (1, H, W, 3). One tensor is allocated per
// call and owned by the caller; there are no other side effects.
//
// Failure is always `ClassifierError::Decode` — unreadable file
// and undecodable bytes are the same case to the boundary, which
// rejects the request either way.

use std::path::Path;

use image::imageops::FilterType;

use crate::domain::error::ClassifierError;

/// A decoded, resized, normalised image ready for one forward
/// pass. Row-major H × W × 3 with a logical batch dimension of 1.
#[derive(Debug, Clone)]
pub struct ImageTensor {
    pixels: Vec<f32>,
    height: usize,
    width:  usize,
}

impl ImageTensor {
    pub fn from_pixels(pixels: Vec<f32>, height: usize, width: usize) -> Self {
        debug_assert_eq!(pixels.len(), height * width * 3);
        Self { pixels, height, width }
    }

    /// An all-zero tensor of the given resolution. Used as a
    /// deterministic probe input in tests and smoke checks.
    pub fn zeros(height: usize, width: usize) -> Self {
        Self { pixels: vec![0.0; height * width * 3], height, width }
    }

    /// Logical shape: (batch=1, height, width, channels=3).
    pub fn shape(&self) -> [usize; 4] {
        [1, self.height, self.width, 3]
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// Decodes and normalises image files at a fixed square
/// resolution. Stateless apart from the target size.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    resolution: usize,
}

impl ImagePreprocessor {
    pub fn new(resolution: usize) -> Self {
        Self { resolution }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Decode the file at `path` into an ImageTensor.
    pub fn preprocess(&self, path: &Path) -> Result<ImageTensor, ClassifierError> {
        let decoded = image::open(path)
            .map_err(|e| ClassifierError::decode(path, e))?;

        let side = self.resolution as u32;
        // resize_exact ignores aspect ratio: the model input is a
        // fixed square regardless of the upload's proportions.
        let rgb = decoded
            .resize_exact(side, side, FilterType::Triangle)
            .to_rgb8();

        let pixels: Vec<f32> = rgb
            .into_raw()
            .into_iter()
            .map(|p| p as f32 / 255.0)
            .collect();

        Ok(ImageTensor::from_pixels(pixels, self.resolution, self.resolution))
    }
}
