use image::RgbaImage;
use imageproc::filter::gaussian_blur_f32;

/// Unsharp mask: adds `amount` times the difference from a blur of `radius`.
pub fn apply(src: &RgbaImage, amount: f32, radius: f32) -> RgbaImage {
    if amount.abs() < 0.001 || radius < 0.01 {
        return src.clone();
    }

    let blurred = gaussian_blur_f32(src, radius);

    let mut out = src.clone();
    for (o, (s, b)) in out.pixels_mut().zip(src.pixels().zip(blurred.pixels())) {
        for c in 0..3 {
            let sharp = s[c] as f32 + amount * (s[c] as f32 - b[c] as f32);
            o[c] = sharp.round().clamp(0.0, 255.0) as u8;
        }
        // preserve alpha
    }

    out
}
