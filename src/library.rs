use std::path::{Path, PathBuf};

use anyhow::Context;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};

use crate::config::AppConfig;

pub const LIBRARY_DIR_ENV: &str = "INSTAFILTER_LIBRARY_DIR";
const FILE_STEM: &str = "instafilter";

/// Destination for finished pictures.
pub trait ImageSaver {
    /// Writes `image` and returns where it landed.
    fn write_to_library(&mut self, image: &DynamicImage) -> anyhow::Result<PathBuf>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveFormat {
    Jpg,
    Png,
}

impl SaveFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(SaveFormat::Jpg),
            "png" => Some(SaveFormat::Png),
            _ => None,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            SaveFormat::Jpg => "jpg",
            SaveFormat::Png => "png",
        }
    }
}

/// A directory of saved pictures, standing in for the system photo album.
pub struct PhotoLibrary {
    dir: PathBuf,
    format: SaveFormat,
    jpg_quality: u8,
}

impl PhotoLibrary {
    pub fn new(dir: PathBuf, format: SaveFormat, jpg_quality: u8) -> Self {
        Self {
            dir,
            format,
            jpg_quality: jpg_quality.clamp(1, 100),
        }
    }

    /// Builds the library from config, with `INSTAFILTER_LIBRARY_DIR` taking precedence.
    pub fn from_config(config: &AppConfig) -> Self {
        let env_dir = std::env::var(LIBRARY_DIR_ENV).ok();
        let dir = resolve_library_dir(env_dir.as_deref(), config.library_dir.as_deref());
        let format = config
            .save_format
            .as_deref()
            .and_then(SaveFormat::parse)
            .unwrap_or(SaveFormat::Jpg);
        Self::new(dir, format, config.jpg_quality.unwrap_or(90))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageSaver for PhotoLibrary {
    fn write_to_library(&mut self, image: &DynamicImage) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create library dir {}", self.dir.display()))?;
        let output_path = build_output_path(&self.dir, self.format);
        let file = std::fs::File::create(&output_path)
            .with_context(|| format!("create {}", output_path.display()))?;
        let writer = std::io::BufWriter::new(file);
        match self.format {
            SaveFormat::Jpg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
                let encoder = JpegEncoder::new_with_quality(writer, self.jpg_quality);
                rgb.write_with_encoder(encoder)?;
            }
            SaveFormat::Png => {
                let encoder = PngEncoder::new_with_quality(
                    writer,
                    CompressionType::Default,
                    PngFilterType::Adaptive,
                );
                image.write_with_encoder(encoder)?;
            }
        }
        Ok(output_path)
    }
}

fn default_library_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Instafilter")
}

fn resolve_library_dir(env_dir: Option<&str>, config_dir: Option<&Path>) -> PathBuf {
    if let Some(raw) = env_dir.map(str::trim).filter(|s| !s.is_empty()) {
        return expand_home_prefix(raw);
    }
    if let Some(dir) = config_dir {
        return dir.to_path_buf();
    }
    default_library_dir()
}

fn expand_home_prefix(raw: &str) -> PathBuf {
    if raw == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

fn build_output_path(dir: &Path, format: SaveFormat) -> PathBuf {
    let base = dir.join(format!("{}.{}", FILE_STEM, format.extension()));
    if !base.exists() {
        return base;
    }
    for n in 2..10000 {
        let candidate = dir.join(format!("{}-{}.{}", FILE_STEM, n, format.extension()));
        if !candidate.exists() {
            return candidate;
        }
    }
    dir.join(format!("{}-final.{}", FILE_STEM, format.extension()))
}
