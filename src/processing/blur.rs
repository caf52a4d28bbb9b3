use image::RgbaImage;
use imageproc::filter::gaussian_blur_f32;

/// Gaussian blur with `radius` used as the standard deviation in pixels.
pub fn apply(src: &RgbaImage, radius: f32) -> RgbaImage {
    // gaussian_blur_f32 panics on a non-positive sigma
    if radius < 0.01 {
        return src.clone();
    }
    gaussian_blur_f32(src, radius)
}
