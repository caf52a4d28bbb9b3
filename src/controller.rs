use std::path::PathBuf;
use std::time::Instant;

use image::DynamicImage;

use crate::library::ImageSaver;
use crate::processing::{self, FilterInputs, FilterKind, FilterParams};

/// Immutable filter choice plus parameters; rendering is a pure function of
/// this and the source image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterSnapshot {
    pub kind: FilterKind,
    pub params: FilterParams,
}

/// Renders `source` with `snapshot`. `factor` is the source's scale relative
/// to full resolution so pixel-valued inputs keep their on-screen size.
pub fn render(source: &DynamicImage, snapshot: &FilterSnapshot, factor: f32) -> Option<DynamicImage> {
    let inputs = FilterInputs::resolve(snapshot.kind, snapshot.params)
        .at_resolution(snapshot.kind, factor);
    processing::apply(source, snapshot.kind, &inputs)
}

#[derive(Debug)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// Nothing loaded; the UI shows the "No Image Selected" alert.
    NoImage,
    /// A source is loaded but no render has succeeded yet.
    NotRendered,
    Failed(String),
}

struct Source {
    full: DynamicImage,
    preview: DynamicImage,
    /// preview long edge / full long edge
    factor: f32,
}

impl Source {
    fn new(full: DynamicImage) -> Self {
        let (preview, factor) = processing::preview_of(&full);
        Self {
            full,
            preview,
            factor,
        }
    }
}

struct Rendered {
    preview: DynamicImage,
    snapshot: FilterSnapshot,
}

/// Owns the loaded picture, the active filter and the last rendered output.
///
/// Every mutation re-renders synchronously. A render that yields nothing
/// leaves the previous output in place.
pub struct FilterController {
    source: Option<Source>,
    snapshot: FilterSnapshot,
    rendered: Option<Rendered>,
    revision: u64,
    filter_chosen: bool,
}

impl Default for FilterController {
    fn default() -> Self {
        Self {
            source: None,
            snapshot: FilterSnapshot::default(),
            rendered: None,
            revision: 0,
            filter_chosen: false,
        }
    }
}

impl FilterController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> FilterSnapshot {
        self.snapshot
    }

    /// Latest preview-sized output, if any render has succeeded.
    pub fn preview(&self) -> Option<&DynamicImage> {
        self.rendered.as_ref().map(|r| &r.preview)
    }

    /// Bumped every time a new output is published.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Caption for the filter button.
    pub fn selection_label(&self) -> &'static str {
        if self.filter_chosen {
            self.snapshot.kind.short_label()
        } else {
            "Change Filter"
        }
    }

    pub fn select_filter(&mut self, kind: FilterKind) {
        self.snapshot.kind = kind;
        self.filter_chosen = true;
        self.apply();
    }

    pub fn set_intensity(&mut self, value: f32) {
        self.snapshot.params.intensity = value;
        self.apply();
    }

    pub fn set_radius(&mut self, value: f32) {
        self.snapshot.params.radius = value;
        self.apply();
    }

    /// Replaces the source and re-renders with the current filter.
    pub fn load_image(&mut self, img: DynamicImage) {
        tracing::info!(
            "loaded {}x{} source, filter {:?}",
            img.width(),
            img.height(),
            self.snapshot.kind
        );
        self.source = Some(Source::new(img));
        self.apply();
    }

    /// Renders the preview for the current snapshot. Returns `false` when
    /// nothing was published.
    pub fn apply(&mut self) -> bool {
        let Some(source) = self.source.as_ref() else {
            return false;
        };
        let t0 = Instant::now();
        let Some(preview) = render(&source.preview, &self.snapshot, source.factor) else {
            tracing::debug!("{:?} produced no output", self.snapshot.kind);
            return false;
        };
        tracing::debug!(
            kind = ?self.snapshot.kind,
            intensity = self.snapshot.params.intensity,
            radius = self.snapshot.params.radius,
            "rendered preview in {:.1} ms",
            t0.elapsed().as_secs_f64() * 1000.0
        );
        self.rendered = Some(Rendered {
            preview,
            snapshot: self.snapshot,
        });
        self.revision += 1;
        true
    }

    /// Full-resolution render of what the preview currently shows.
    pub fn full_resolution(&self) -> Option<DynamicImage> {
        let source = self.source.as_ref()?;
        let rendered = self.rendered.as_ref()?;
        render(&source.full, &rendered.snapshot, 1.0)
    }

    /// Hands the full-resolution output to `saver` once.
    pub fn save<S: ImageSaver>(&self, saver: &mut S) -> SaveOutcome {
        if self.source.is_none() {
            return SaveOutcome::NoImage;
        }
        let Some(output) = self.full_resolution() else {
            return SaveOutcome::NotRendered;
        };
        match saver.write_to_library(&output) {
            Ok(path) => SaveOutcome::Saved(path),
            Err(err) => SaveOutcome::Failed(format!("{:#}", err)),
        }
    }
}
