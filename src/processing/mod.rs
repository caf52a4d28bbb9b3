pub mod blur;
pub mod crystallize;
pub mod edges;
pub mod pixellate;
pub mod sepia;
pub mod sharpness;
pub mod vignette;

use image::DynamicImage;

/// Longest edge of the copy rendered on every slider move.
pub const PREVIEW_MAX: u32 = 1280;

/// The fixed set of filters offered in the filter menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterKind {
    Crystallize,
    Edges,
    GaussianBlur,
    Pixellate,
    #[default]
    SepiaTone,
    UnsharpMask,
    Vignette,
}

/// Which inputs a filter kind consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSlots {
    pub intensity: bool,
    pub radius: bool,
    pub scale: bool,
}

impl FilterKind {
    pub const ALL: [FilterKind; 7] = [
        FilterKind::Crystallize,
        FilterKind::Edges,
        FilterKind::GaussianBlur,
        FilterKind::Pixellate,
        FilterKind::SepiaTone,
        FilterKind::UnsharpMask,
        FilterKind::Vignette,
    ];

    /// Menu entry text.
    pub fn label(self) -> &'static str {
        match self {
            FilterKind::Crystallize => "Crystallize",
            FilterKind::Edges => "Edges",
            FilterKind::GaussianBlur => "Gaussian Blur",
            FilterKind::Pixellate => "Pixellate",
            FilterKind::SepiaTone => "Sepia Tone",
            FilterKind::UnsharpMask => "Unsharp Mask",
            FilterKind::Vignette => "Vignette",
        }
    }

    /// Caption shown on the filter button once the kind has been picked.
    pub fn short_label(self) -> &'static str {
        match self {
            FilterKind::GaussianBlur => "Blur",
            FilterKind::SepiaTone => "Sepia",
            other => other.label(),
        }
    }

    pub fn slots(self) -> FilterSlots {
        match self {
            FilterKind::Crystallize | FilterKind::GaussianBlur => FilterSlots {
                radius: true,
                ..Default::default()
            },
            FilterKind::Edges | FilterKind::Pixellate => FilterSlots {
                scale: true,
                ..Default::default()
            },
            FilterKind::SepiaTone => FilterSlots {
                intensity: true,
                ..Default::default()
            },
            FilterKind::UnsharpMask | FilterKind::Vignette => FilterSlots {
                intensity: true,
                radius: true,
                scale: false,
            },
        }
    }

    /// Radius is measured in source pixels (vignette uses a relative falloff).
    fn radius_is_spatial(self) -> bool {
        matches!(
            self,
            FilterKind::Crystallize | FilterKind::GaussianBlur | FilterKind::UnsharpMask
        )
    }

    /// Scale is a block size in pixels for pixellate, a gain for edges.
    fn scale_is_spatial(self) -> bool {
        self == FilterKind::Pixellate
    }
}

/// Raw slider values. Range clamping belongs to the controls that produce them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub intensity: f32,
    pub radius: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            radius: 100.0,
        }
    }
}

/// Inputs resolved against a kind's slots; unsupported slots stay `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterInputs {
    pub intensity: Option<f32>,
    pub radius: Option<f32>,
    pub scale: Option<f32>,
}

impl FilterInputs {
    pub fn resolve(kind: FilterKind, params: FilterParams) -> Self {
        let slots = kind.slots();
        Self {
            intensity: slots.intensity.then_some(params.intensity),
            radius: slots.radius.then_some(params.radius),
            scale: slots.scale.then_some(params.intensity * 10.0),
        }
    }

    /// Rescales pixel-valued inputs for an image downscaled by `factor`.
    pub fn at_resolution(self, kind: FilterKind, factor: f32) -> Self {
        let radius = if kind.radius_is_spatial() {
            self.radius.map(|r| r * factor)
        } else {
            self.radius
        };
        let scale = if kind.scale_is_spatial() {
            self.scale.map(|s| s * factor)
        } else {
            self.scale
        };
        Self {
            intensity: self.intensity,
            radius,
            scale,
        }
    }
}

/// Downscales `img` to fit `PREVIEW_MAX` and returns it with the factor
/// (preview long edge / source long edge) to pass to `at_resolution`.
pub fn preview_of(img: &DynamicImage) -> (DynamicImage, f32) {
    if img.width() <= PREVIEW_MAX && img.height() <= PREVIEW_MAX {
        return (img.clone(), 1.0);
    }
    let preview = img.thumbnail(PREVIEW_MAX, PREVIEW_MAX);
    let factor =
        preview.width().max(preview.height()) as f32 / img.width().max(img.height()) as f32;
    (preview, factor)
}

/// Runs `kind` over `img`.
///
/// Returns `None` when the image is empty or an input the kind needs is
/// missing. The output always has the source dimensions.
pub fn apply(img: &DynamicImage, kind: FilterKind, inputs: &FilterInputs) -> Option<DynamicImage> {
    if img.width() == 0 || img.height() == 0 {
        return None;
    }
    let rgba = img.to_rgba8();
    let out = match kind {
        FilterKind::Crystallize => crystallize::apply(&rgba, inputs.radius?),
        FilterKind::Edges => edges::apply(&rgba, inputs.scale?),
        FilterKind::GaussianBlur => blur::apply(&rgba, inputs.radius?),
        FilterKind::Pixellate => pixellate::apply(&rgba, inputs.scale?),
        FilterKind::SepiaTone => sepia::apply(&rgba, inputs.intensity?),
        FilterKind::UnsharpMask => sharpness::apply(&rgba, inputs.intensity?, inputs.radius?),
        FilterKind::Vignette => vignette::apply(&rgba, inputs.intensity?, inputs.radius?),
    };
    Some(DynamicImage::ImageRgba8(out))
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, ImageBuffer, Rgba};

    use super::{FilterInputs, FilterKind, FilterParams, PREVIEW_MAX, apply, preview_of};

    fn gradient(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_fn(w, h, |x, y| {
            Rgba([(x * 13 % 256) as u8, (y * 29 % 256) as u8, ((x + y) * 7 % 256) as u8, 255])
        }))
    }

    #[test]
    fn scale_is_ten_times_intensity() {
        let params = FilterParams {
            intensity: 0.3,
            radius: 42.0,
        };
        let inputs = FilterInputs::resolve(FilterKind::Pixellate, params);
        assert_eq!(inputs.intensity, None);
        assert_eq!(inputs.radius, None);
        assert!((inputs.scale.unwrap() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn unsupported_slots_are_left_empty() {
        let params = FilterParams::default();
        let sepia = FilterInputs::resolve(FilterKind::SepiaTone, params);
        assert_eq!(sepia.intensity, Some(0.5));
        assert_eq!(sepia.radius, None);
        assert_eq!(sepia.scale, None);

        let blur = FilterInputs::resolve(FilterKind::GaussianBlur, params);
        assert_eq!(blur.intensity, None);
        assert_eq!(blur.radius, Some(100.0));
    }

    #[test]
    fn resolution_scaling_only_touches_pixel_inputs() {
        let params = FilterParams {
            intensity: 0.8,
            radius: 40.0,
        };
        let blur = FilterInputs::resolve(FilterKind::GaussianBlur, params)
            .at_resolution(FilterKind::GaussianBlur, 0.25);
        assert_eq!(blur.radius, Some(10.0));

        let vignette = FilterInputs::resolve(FilterKind::Vignette, params)
            .at_resolution(FilterKind::Vignette, 0.25);
        assert_eq!(vignette.radius, Some(40.0));
        assert_eq!(vignette.intensity, Some(0.8));

        let edges = FilterInputs::resolve(FilterKind::Edges, params)
            .at_resolution(FilterKind::Edges, 0.25);
        assert!((edges.scale.unwrap() - 8.0).abs() < 1e-5);

        let pixellate = FilterInputs::resolve(FilterKind::Pixellate, params)
            .at_resolution(FilterKind::Pixellate, 0.25);
        assert!((pixellate.scale.unwrap() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn every_kind_preserves_dimensions() {
        let img = gradient(17, 9);
        for kind in FilterKind::ALL {
            let inputs = FilterInputs::resolve(kind, FilterParams::default());
            let out = apply(&img, kind, &inputs).expect("filter should produce output");
            assert_eq!((out.width(), out.height()), (17, 9), "{:?}", kind);
        }
    }

    #[test]
    fn empty_image_yields_no_output() {
        let img = DynamicImage::ImageRgba8(ImageBuffer::new(0, 0));
        let inputs = FilterInputs::resolve(FilterKind::SepiaTone, FilterParams::default());
        assert!(apply(&img, FilterKind::SepiaTone, &inputs).is_none());
    }

    #[test]
    fn missing_input_yields_no_output() {
        let img = gradient(4, 4);
        let inputs = FilterInputs::default();
        assert!(apply(&img, FilterKind::GaussianBlur, &inputs).is_none());
    }

    #[test]
    fn small_sources_preview_at_full_size() {
        let img = gradient(PREVIEW_MAX, 10);
        let (preview, factor) = preview_of(&img);
        assert_eq!((preview.width(), preview.height()), (PREVIEW_MAX, 10));
        assert_eq!(factor, 1.0);
    }

    #[test]
    fn large_sources_preview_within_bound() {
        let img = gradient(PREVIEW_MAX * 2, PREVIEW_MAX + 40);
        let (preview, factor) = preview_of(&img);
        assert_eq!(preview.width(), PREVIEW_MAX);
        assert!(preview.height() <= PREVIEW_MAX);
        assert!((factor - 0.5).abs() < 1e-6);
    }

    #[test]
    fn short_labels_match_menu_captions() {
        assert_eq!(FilterKind::GaussianBlur.short_label(), "Blur");
        assert_eq!(FilterKind::SepiaTone.short_label(), "Sepia");
        assert_eq!(FilterKind::UnsharpMask.short_label(), "Unsharp Mask");
        assert_eq!(FilterKind::GaussianBlur.label(), "Gaussian Blur");
    }
}
