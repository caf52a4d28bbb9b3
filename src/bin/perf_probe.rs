use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;

#[allow(dead_code)]
#[path = "../picker.rs"]
mod picker;
#[allow(dead_code)]
#[path = "../processing/mod.rs"]
mod processing;

use processing::{FilterInputs, FilterKind, FilterParams, preview_of};

fn list_images(dir: &Path, limit: usize) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read_dir failed for {}", dir.display()))?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && picker::is_supported_image(p))
        .collect();
    files.sort();
    files.truncate(limit);
    Ok(files)
}

fn median_ms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) * 0.5
    } else {
        sorted[mid]
    }
}

fn main() -> Result<()> {
    let mut args = std::env::args();
    let _bin = args.next();
    let dir = args
        .next()
        .map(PathBuf::from)
        .context("usage: perf_probe <image-dir> [count]")?;
    let count = args
        .next()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(10);

    let files = list_images(&dir, count)?;
    if files.is_empty() {
        anyhow::bail!("No images found in {}", dir.display());
    }
    eprintln!("Using {} images from {}", files.len(), dir.display());

    let sources = files
        .par_iter()
        .map(|path| {
            picker::open_image(path).with_context(|| format!("open failed for {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let params = FilterParams::default();
    println!("METRIC file_count={}", files.len());
    for kind in FilterKind::ALL {
        let mut preview_samples = Vec::with_capacity(sources.len());
        let mut full_samples = Vec::with_capacity(sources.len());
        for img in &sources {
            let (preview, factor) = preview_of(img);
            let inputs = FilterInputs::resolve(kind, params);

            let t0 = Instant::now();
            let _ = processing::apply(&preview, kind, &inputs.at_resolution(kind, factor));
            preview_samples.push(t0.elapsed().as_secs_f64() * 1000.0);

            let t0 = Instant::now();
            let _ = processing::apply(img, kind, &inputs);
            full_samples.push(t0.elapsed().as_secs_f64() * 1000.0);
        }
        let name = kind.label().to_ascii_lowercase().replace(' ', "_");
        println!(
            "METRIC {}_preview_ms_median={:.2}",
            name,
            median_ms(&preview_samples)
        );
        println!("METRIC {}_full_ms_median={:.2}", name, median_ms(&full_samples));
    }

    Ok(())
}
