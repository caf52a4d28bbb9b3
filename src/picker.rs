use std::path::{Path, PathBuf};

use image::DynamicImage;

static RAW_EXTS: &[&str] = &["raf", "dng", "nef", "cr2", "arw"];
static SUPPORTED_IMAGE_EXTS: &[&str] = &[
    "jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "raf", "dng", "nef", "cr2", "arw",
];

fn has_extension(path: &Path, exts: &[&str]) -> bool {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy()) else {
        return false;
    };
    exts.iter().any(|known| ext.eq_ignore_ascii_case(known))
}

pub fn is_raw_image(path: &Path) -> bool {
    has_extension(path, RAW_EXTS)
}

/// Returns `true` if the path has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    has_extension(path, SUPPORTED_IMAGE_EXTS)
}

/// Shows the native open dialog. `None` means the user cancelled.
pub fn pick_image_path(start_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Select a picture")
        .add_filter("Image", SUPPORTED_IMAGE_EXTS);
    if let Some(dir) = start_dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file().filter(|path| is_supported_image(path))
}

/// Open an image upright, falling back to raw decoding for RAW extensions.
pub fn open_image(path: &Path) -> anyhow::Result<DynamicImage> {
    open_image_with_hooks(path, develop_raw, read_orientation)
}

fn open_image_with_hooks<FRaw, FOrient>(
    path: &Path,
    develop_raw: FRaw,
    orientation: FOrient,
) -> anyhow::Result<DynamicImage>
where
    FRaw: Fn(&Path) -> anyhow::Result<DynamicImage>,
    FOrient: Fn(&Path) -> Option<u32>,
{
    // Fast path: try the standard image crate first.
    let img = match image::open(path) {
        Ok(img) => img,
        Err(err) if !is_raw_image(path) => return Err(err.into()),
        Err(_) => develop_raw(path)?,
    };
    Ok(apply_orientation(img, orientation(path).unwrap_or(1)))
}

fn develop_raw(path: &Path) -> anyhow::Result<DynamicImage> {
    let raw = rawler::decode_file(path)?;
    let develop = rawler::imgop::develop::RawDevelop::default();
    let intermediate = develop.develop_intermediate(&raw)?;
    intermediate
        .to_dynamic_image()
        .ok_or_else(|| anyhow::anyhow!("raw develop produced invalid image"))
}

/// EXIF orientation tag (1..=8), if the file carries one.
fn read_orientation(path: &Path) -> Option<u32> {
    let file = std::fs::File::open(path).ok()?;
    let mut bufreader = std::io::BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut bufreader).ok()?;
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?
        .value
        .get_uint(0)
}

fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        // transpose
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        // transverse
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::path::Path;

    use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba};

    use super::{
        apply_orientation, is_raw_image, is_supported_image, open_image, open_image_with_hooks,
    };

    /// 2x1 image: red on the left, blue on the right.
    fn two_pixels() -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        }))
    }

    #[test]
    fn orientation_one_is_untouched() {
        let out = apply_orientation(two_pixels(), 1);
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn orientation_six_rotates_clockwise() {
        let out = apply_orientation(two_pixels(), 6);
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(0, 1).0, [0, 0, 255, 255]);
    }

    #[test]
    fn orientation_two_mirrors() {
        let out = apply_orientation(two_pixels(), 2);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn orientation_five_transposes() {
        let out = apply_orientation(two_pixels(), 5);
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn extension_detection_is_case_insensitive() {
        assert!(is_raw_image(Path::new("/tmp/a.raf")));
        assert!(is_raw_image(Path::new("/tmp/a.RAF")));
        assert!(!is_raw_image(Path::new("/tmp/a.jpg")));
        assert!(is_supported_image(Path::new("/tmp/a.JPG")));
        assert!(!is_supported_image(Path::new("/tmp/a.txt")));
        assert!(!is_supported_image(Path::new("/tmp/noext")));
    }

    #[test]
    fn open_image_reads_png_without_exif() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("two.png");
        two_pixels().save(&path).expect("write fixture");
        let img = open_image(&path).expect("png should open");
        assert_eq!(img.dimensions(), (2, 1));
    }

    #[test]
    fn raw_fallback_is_rotated_upright() {
        let developed = Cell::new(0);
        let img = open_image_with_hooks(
            Path::new("/nonexistent/shot.raf"),
            |_| {
                developed.set(developed.get() + 1);
                Ok(two_pixels())
            },
            |_| Some(6),
        )
        .expect("raw fallback should develop");
        assert_eq!(developed.get(), 1);
        assert_eq!(img.dimensions(), (1, 2));
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn non_raw_decode_error_skips_raw_develop() {
        let developed = Cell::new(0);
        let result = open_image_with_hooks(
            Path::new("/nonexistent/shot.jpg"),
            |_| {
                developed.set(developed.get() + 1);
                Ok(two_pixels())
            },
            |_| Some(6),
        );
        assert!(result.is_err());
        assert_eq!(developed.get(), 0);
    }

    #[test]
    fn open_image_reports_missing_file() {
        assert!(open_image(Path::new("/nonexistent/instafilter.png")).is_err());
    }
}
