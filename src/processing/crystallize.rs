use image::RgbaImage;
use rayon::prelude::*;

/// Voronoi crystallize.
///
/// Seeds sit on a jittered grid with spacing `radius`; every pixel takes the
/// source color under its nearest seed. Jitter is hashed from the grid
/// coordinates so repeated runs produce identical output.
pub fn apply(src: &RgbaImage, radius: f32) -> RgbaImage {
    let cs = radius.max(1.0);
    let w = src.width();
    let h = src.height();
    let src_raw = src.as_raw();
    let stride = w as usize * 4;
    let cells_x = ((w as f32 / cs).ceil() as i64).max(1);
    let cells_y = ((h as f32 / cs).ceil() as i64).max(1);

    let mut out = src.clone();
    out.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let py = y as f32 + 0.5;
            let gcy = (y as f32 / cs) as i64;
            for x in 0..w as usize {
                let px = x as f32 + 0.5;
                let gcx = (x as f32 / cs) as i64;

                let mut best_dist = f32::MAX;
                let mut best = (px, py);
                for ny in (gcy - 1)..=(gcy + 1) {
                    if ny < 0 || ny >= cells_y {
                        continue;
                    }
                    for nx in (gcx - 1)..=(gcx + 1) {
                        if nx < 0 || nx >= cells_x {
                            continue;
                        }
                        let (sx, sy) = seed_point(nx as u32, ny as u32, cs);
                        let d = (px - sx) * (px - sx) + (py - sy) * (py - sy);
                        if d < best_dist {
                            best_dist = d;
                            best = (sx, sy);
                        }
                    }
                }

                let sx = (best.0 as u32).min(w - 1) as usize;
                let sy = (best.1 as u32).min(h - 1) as usize;
                let si = sy * stride + sx * 4;
                let di = x * 4;
                row[di..di + 4].copy_from_slice(&src_raw[si..si + 4]);
            }
        });

    out
}

fn seed_point(cx: u32, cy: u32, cs: f32) -> (f32, f32) {
    let jx = hash_unit(cx, cy, 0x9e37_79b9);
    let jy = hash_unit(cx, cy, 0x85eb_ca6b);
    ((cx as f32 + jx) * cs, (cy as f32 + jy) * cs)
}

/// Deterministic hash of a grid cell to [0, 1).
fn hash_unit(x: u32, y: u32, salt: u32) -> f32 {
    let mut h = x.wrapping_mul(0x8da6_b343) ^ y.wrapping_mul(0xd816_3841) ^ salt;
    h ^= h >> 13;
    h = h.wrapping_mul(0x5bd1_e995);
    h ^= h >> 15;
    (h & 0x00ff_ffff) as f32 / 16_777_216.0
}
