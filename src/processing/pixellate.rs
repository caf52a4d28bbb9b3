use image::RgbaImage;
use rayon::prelude::*;

/// Replaces each `scale`-sized block with the pixel at the block's center.
pub fn apply(src: &RgbaImage, scale: f32) -> RgbaImage {
    let bs = scale.round().max(1.0) as u32;
    if bs == 1 {
        return src.clone();
    }

    let w = src.width();
    let h = src.height();
    let src_raw = src.as_raw();
    let stride = w as usize * 4;
    let mut out = src.clone();

    out.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let by = ((y as u32 / bs) * bs + bs / 2).min(h - 1) as usize;
            for x in 0..w as usize {
                let bx = ((x as u32 / bs) * bs + bs / 2).min(w - 1) as usize;
                let si = by * stride + bx * 4;
                let di = x * 4;
                row[di..di + 4].copy_from_slice(&src_raw[si..si + 4]);
            }
        });

    out
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Rgba, RgbaImage};

    use super::apply;

    fn checker() -> RgbaImage {
        ImageBuffer::from_fn(8, 8, |x, y| {
            let v = if (x + y) % 2 == 0 { 255 } else { 0 };
            Rgba([v, v, v, 255])
        })
    }

    #[test]
    fn block_pixels_share_one_color() {
        let out = apply(&checker(), 4.0);
        let first = *out.get_pixel(0, 0);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(*out.get_pixel(x, y), first);
            }
        }
    }

    #[test]
    fn unit_scale_is_identity() {
        let img = checker();
        assert_eq!(apply(&img, 0.0), img);
        assert_eq!(apply(&img, 1.0), img);
    }

    #[test]
    fn partial_edge_block_clamps_to_image() {
        let img: RgbaImage = ImageBuffer::from_fn(5, 3, |x, _| Rgba([x as u8 * 40, 0, 0, 255]));
        let out = apply(&img, 4.0);
        // Second column block centers past the right edge and clamps to x = 4.
        assert_eq!(out.get_pixel(4, 0)[0], 160);
    }
}
