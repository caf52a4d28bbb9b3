use image::{GrayImage, Luma, RgbaImage};
use imageproc::gradients::sobel_gradients;

/// Sobel magnitude per color channel, multiplied by `scale / 8`.
pub fn apply(src: &RgbaImage, scale: f32) -> RgbaImage {
    let gain = scale.max(0.0) / 8.0;
    let mut out = src.clone();

    for c in 0..3 {
        let channel = GrayImage::from_fn(src.width(), src.height(), |x, y| {
            Luma([src.get_pixel(x, y)[c]])
        });
        let magnitude = sobel_gradients(&channel);
        for (o, m) in out.pixels_mut().zip(magnitude.pixels()) {
            o[c] = (m[0] as f32 * gain).round().clamp(0.0, 255.0) as u8;
        }
    }

    out
}
