mod panels;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::features::FeatureBundle;

/// Render one clip's bundle as stacked grayscale panels and save it as a PNG
/// keyed by the clip identifier. Empty sequences render as blank panels; the
/// only contract with the extraction core is receiving finite arrays.
pub fn render_bundle(bundle: &FeatureBundle, path: &Path) -> Result<()> {
    let panels: Vec<Vec<Vec<f32>>> = vec![
        panels::transpose(&bundle.mel_energies),
        panels::transpose(&bundle.cqcc),
        panels::transpose(&bundle.mfcc),
        vec![to_f32(&bundle.lsf)],
        vec![to_f32(&bundle.lpc)],
        vec![bundle.spectral_centroid.clone()],
        vec![bundle.spectral_contrast.clone()],
        vec![bundle.fundamental_periods.clone()],
    ];
    let img = panels::compose(&panels);
    img.save(path)
        .with_context(|| format!("Failed to write feature image: {}", path.display()))
}

/// Optional numeric sidecar: the whole bundle as JSON.
pub fn write_json(bundle: &FeatureBundle, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON sidecar: {}", path.display()))?;
    serde_json::to_writer(BufWriter::new(file), bundle).context("Failed to serialize bundle")
}

fn to_f32(values: &[f64]) -> Vec<f32> {
    values.iter().map(|&v| v as f32).collect()
}
