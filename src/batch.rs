use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::audio::decode;
use crate::config::AnalysisConfig;
use crate::error::ClipError;
use crate::features;
use crate::render;

const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "aac"];

pub struct BatchOptions {
    /// Worker pool size; 0 lets rayon pick one thread per core.
    pub jobs: usize,
    pub json: bool,
}

pub struct BatchSummary {
    pub processed: usize,
    pub skipped: Vec<(String, ClipError)>,
}

/// Process every clip under `input`, writing one artifact per clip into
/// `output`. Clips are independent units of work on a bounded worker pool;
/// one clip's failure is logged and never aborts the batch.
pub fn run(
    input: &Path,
    output: &Path,
    cfg: &AnalysisConfig,
    opts: &BatchOptions,
) -> Result<BatchSummary> {
    let clips = discover_clips(input)?;
    if clips.is_empty() {
        log::warn!("No audio clips found in {}", input.display());
        return Ok(BatchSummary { processed: 0, skipped: Vec::new() });
    }

    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    let pb = ProgressBar::new(clips.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} clips ({eta} remaining)")
            .unwrap()
            .progress_chars("=>-"),
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.jobs)
        .build()
        .context("Failed to build worker pool")?;

    let ids = artifact_ids(&clips);
    let results: Vec<(String, Result<(), ClipError>)> = pool.install(|| {
        clips
            .par_iter()
            .zip(ids.par_iter())
            .map(|(path, id)| {
                let result = process_clip(path, id, output, cfg, opts);
                pb.inc(1);
                (id.clone(), result)
            })
            .collect()
    });
    pb.finish_and_clear();

    let mut summary = BatchSummary { processed: 0, skipped: Vec::new() };
    for (id, result) in results {
        match result {
            Ok(()) => {
                log::info!("processed {}", id);
                summary.processed += 1;
            }
            Err(err) => {
                log::warn!("skipped {}: {}", id, err);
                summary.skipped.push((id, err));
            }
        }
    }
    Ok(summary)
}

fn process_clip(
    path: &Path,
    id: &str,
    output: &Path,
    cfg: &AnalysisConfig,
    opts: &BatchOptions,
) -> Result<(), ClipError> {
    let clip = decode::decode_clip(path).map_err(ClipError::Decode)?;
    let bundle = features::extract(&clip, cfg)?;

    // Artifact names derive from the unique clip identifier, so concurrent
    // clips never write to the same location.
    let image_path = output.join(format!("{id}.png"));
    render::render_bundle(&bundle, &image_path).map_err(ClipError::Artifact)?;
    if opts.json {
        let json_path = output.join(format!("{id}.json"));
        render::write_json(&bundle, &json_path).map_err(ClipError::Artifact)?;
    }
    Ok(())
}

/// Artifact identifiers for the discovered clips, in the same order. File
/// stems normally; when two files share a stem (`a.wav` next to `a.mp3`) the
/// full file name is used so their outputs stay distinct.
fn artifact_ids(clips: &[PathBuf]) -> Vec<String> {
    let mut stem_counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    for path in clips {
        *stem_counts.entry(clip_id(path)).or_insert(0) += 1;
    }
    clips
        .iter()
        .map(|path| {
            let stem = clip_id(path);
            match path.file_name().and_then(|s| s.to_str()) {
                Some(name) if stem_counts[&stem] > 1 => name.to_string(),
                _ => stem,
            }
        })
        .collect()
}

/// Non-recursive scan of the input directory, sorted by file name.
fn discover_clips(input: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(input)
        .with_context(|| format!("Failed to read input directory: {}", input.display()))?;

    let mut clips: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| {
                        AUDIO_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known))
                    })
        })
        .collect();
    clips.sort();
    Ok(clips)
}

fn clip_id(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}
