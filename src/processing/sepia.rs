use image::RgbaImage;

/// Blends each pixel toward its sepia-toned value by `intensity` (0 = untouched).
pub fn apply(src: &RgbaImage, intensity: f32) -> RgbaImage {
    let t = intensity.clamp(0.0, 1.0);
    let mut out = src.clone();
    if t < 0.001 {
        return out;
    }

    for px in out.pixels_mut() {
        let r = px[0] as f32;
        let g = px[1] as f32;
        let b = px[2] as f32;

        let tr = (0.393 * r + 0.769 * g + 0.189 * b).min(255.0);
        let tg = (0.349 * r + 0.686 * g + 0.168 * b).min(255.0);
        let tb = (0.272 * r + 0.534 * g + 0.131 * b).min(255.0);

        px[0] = (r + (tr - r) * t).round() as u8;
        px[1] = (g + (tg - g) * t).round() as u8;
        px[2] = (b + (tb - b) * t).round() as u8;
    }

    out
}
