use image::RgbaImage;
use rayon::prelude::*;

/// Darkens toward the corners.
///
/// `radius` is the width of the falloff band as a percentage of the
/// half-diagonal: 100 ramps from the center, 0 disables the effect.
/// `intensity` is how dark the corners get (1 = black).
pub fn apply(src: &RgbaImage, intensity: f32, radius: f32) -> RgbaImage {
    let amount = intensity.clamp(0.0, 1.0);
    let reach = (radius / 100.0).clamp(0.0, 1.0);
    if amount < 0.001 || reach < 0.001 {
        return src.clone();
    }

    let w = src.width();
    let h = src.height();
    let cx = w as f32 / 2.0;
    let cy = h as f32 / 2.0;
    let half_diag = (cx * cx + cy * cy).sqrt().max(1e-6);
    let inner = 1.0 - reach;
    let stride = w as usize * 4;

    let mut out = src.clone();
    out.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let dy = y as f32 + 0.5 - cy;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let dx = x as f32 + 0.5 - cx;
                let dist = (dx * dx + dy * dy).sqrt() / half_diag;
                let gain = 1.0 - amount * smoothstep(inner, 1.0, dist);
                for c in &mut px[..3] {
                    *c = (*c as f32 * gain).round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    out
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
