use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::{threshold, ThresholdType};

/// Grey level above which a pixel becomes white
pub const DEFAULT_THRESHOLD: u8 = 150;

// BT.601 luma weights, per mille
const LUMA_WEIGHTS: [u32; 3] = [299, 587, 114];

/// Convert frame to grayscale with BT.601 weights (0.299 R + 0.587 G + 0.114 B), rounded
pub fn to_grayscale(frame: &RgbImage) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let [r, g, b] = frame.get_pixel(x, y).0;
        let weighted = LUMA_WEIGHTS[0] * u32::from(r)
            + LUMA_WEIGHTS[1] * u32::from(g)
            + LUMA_WEIGHTS[2] * u32::from(b);
        Luma([((weighted + 500) / 1000) as u8])
    })
}

/// Fixed binary threshold: values strictly above `level` become 255, the rest 0
pub fn binarize(gray: &GrayImage, level: u8) -> GrayImage {
    threshold(gray, level, ThresholdType::Binary)
}

/// Grayscale then binarize; the image handed to the recognizer
pub fn prepare_for_ocr(frame: &RgbImage, level: u8) -> GrayImage {
    binarize(&to_grayscale(frame), level)
}
