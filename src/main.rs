mod audio;
mod batch;
mod cli;
mod config;
mod error;
mod features;
mod render;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use config::{AnalysisConfig, Config};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect clipspec.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("clipspec.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("clipspec").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            merge_config(&mut cli, cfg);
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let input = cli.input.as_ref().context("Input directory is required")?;
    if !input.is_dir() {
        anyhow::bail!("Input directory not found: {}", input.display());
    }

    let analysis = analysis_from_cli(&cli);

    log::info!("clipspec - batch acoustic feature extraction");
    log::info!("Input: {}", input.display());
    log::info!("Output: {}", cli.output.display());
    log::info!(
        "Analysis: frame={} hop={} mel={} lpc_order={} cqt={}x{} pre_emphasis={} pitch={}-{}Hz",
        analysis.frame_size,
        analysis.hop_size,
        analysis.mel_bands,
        analysis.lpc_order,
        analysis.cqt_bins,
        analysis.cqt_hop,
        analysis.pre_emphasis,
        analysis.pitch_fmin,
        analysis.pitch_fmax
    );

    let opts = batch::BatchOptions { jobs: cli.jobs, json: cli.json };
    let summary = batch::run(input, &cli.output, &analysis, &opts)?;

    log::info!(
        "Done: {} processed, {} skipped",
        summary.processed,
        summary.skipped.len()
    );
    Ok(())
}

// Merge: config values apply only when CLI is at its default
fn merge_config(cli: &mut Cli, cfg: Config) {
    if cli.pre_emphasis == 0.5 { cli.pre_emphasis = cfg.analysis.pre_emphasis; }
    if cli.frame_size == 2048 { cli.frame_size = cfg.analysis.frame_size; }
    if cli.hop_size == 512 { cli.hop_size = cfg.analysis.hop_size; }
    if cli.mel_bands == 128 { cli.mel_bands = cfg.analysis.mel_bands; }
    if cli.mfcc_coeffs == 1 { cli.mfcc_coeffs = cfg.analysis.mfcc_coeffs; }
    if cli.lpc_order == 12 { cli.lpc_order = cfg.analysis.lpc_order; }
    if cli.cqt_bins == 6 { cli.cqt_bins = cfg.analysis.cqt_bins; }
    if cli.cqt_hop == 2048 { cli.cqt_hop = cfg.analysis.cqt_hop; }
    if cli.cqcc_coeffs == 6 { cli.cqcc_coeffs = cfg.analysis.cqcc_coeffs; }
    if cli.pitch_fmin == 150.0 { cli.pitch_fmin = cfg.analysis.pitch_fmin; }
    if cli.pitch_fmax == 4000.0 { cli.pitch_fmax = cfg.analysis.pitch_fmax; }
    if !cli.json { cli.json = cfg.output.json; }
}

/// Every `AnalysisConfig` field is carried explicitly so a knob added to the
/// config cannot silently fall back to its default here.
fn analysis_from_cli(cli: &Cli) -> AnalysisConfig {
    AnalysisConfig {
        pre_emphasis: cli.pre_emphasis,
        frame_size: cli.frame_size,
        hop_size: cli.hop_size,
        mel_bands: cli.mel_bands,
        mfcc_coeffs: cli.mfcc_coeffs,
        lpc_order: cli.lpc_order,
        cqt_bins: cli.cqt_bins,
        cqt_hop: cli.cqt_hop,
        cqcc_coeffs: cli.cqcc_coeffs,
        pitch_fmin: cli.pitch_fmin,
        pitch_fmax: cli.pitch_fmax,
    }
}
