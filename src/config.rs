use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Analysis parameters shared by every extractor. Passed explicitly into each
/// component so no module carries its own hidden defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// First-order high-pass coefficient applied before LPC analysis.
    #[serde(default = "default_pre_emphasis")]
    pub pre_emphasis: f32,
    /// STFT window length in samples.
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
    /// STFT hop length in samples.
    #[serde(default = "default_hop_size")]
    pub hop_size: usize,
    /// Mel filterbank size for the energy spectrogram.
    #[serde(default = "default_mel_bands")]
    pub mel_bands: usize,
    /// Leading MFCC coefficients kept per frame.
    #[serde(default = "default_mfcc_coeffs")]
    pub mfcc_coeffs: usize,
    /// Autoregressive model order for linear prediction.
    #[serde(default = "default_lpc_order")]
    pub lpc_order: usize,
    /// Constant-Q bin count (12 bins per octave up from C1).
    #[serde(default = "default_cqt_bins")]
    pub cqt_bins: usize,
    /// Constant-Q hop length in samples.
    #[serde(default = "default_cqt_hop")]
    pub cqt_hop: usize,
    /// CQCC coefficients kept per frame.
    #[serde(default = "default_cqcc_coeffs")]
    pub cqcc_coeffs: usize,
    /// Lower bound of the pitch search band, Hz.
    #[serde(default = "default_pitch_fmin")]
    pub pitch_fmin: f32,
    /// Upper bound of the pitch search band, Hz.
    #[serde(default = "default_pitch_fmax")]
    pub pitch_fmax: f32,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pre_emphasis: default_pre_emphasis(),
            frame_size: default_frame_size(),
            hop_size: default_hop_size(),
            mel_bands: default_mel_bands(),
            mfcc_coeffs: default_mfcc_coeffs(),
            lpc_order: default_lpc_order(),
            cqt_bins: default_cqt_bins(),
            cqt_hop: default_cqt_hop(),
            cqcc_coeffs: default_cqcc_coeffs(),
            pitch_fmin: default_pitch_fmin(),
            pitch_fmax: default_pitch_fmax(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { json: false }
    }
}

fn default_pre_emphasis() -> f32 { 0.5 }
fn default_frame_size() -> usize { 2048 }
fn default_hop_size() -> usize { 512 }
fn default_mel_bands() -> usize { 128 }
fn default_mfcc_coeffs() -> usize { 1 }
fn default_lpc_order() -> usize { 12 }
fn default_cqt_bins() -> usize { 6 }
fn default_cqt_hop() -> usize { 2048 }
fn default_cqcc_coeffs() -> usize { 6 }
fn default_pitch_fmin() -> f32 { 150.0 }
fn default_pitch_fmax() -> f32 { 4000.0 }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.pre_emphasis, 0.5);
        assert_eq!(cfg.frame_size, 2048);
        assert_eq!(cfg.hop_size, 512);
        assert_eq!(cfg.lpc_order, 12);
        assert_eq!(cfg.mfcc_coeffs, 1);
        assert_eq!(cfg.cqt_bins, 6);
        assert_eq!(cfg.cqt_hop, 2048);
        assert_eq!(cfg.cqcc_coeffs, 6);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: Config = toml::from_str("[analysis]\nlpc_order = 10\n").unwrap();
        assert_eq!(cfg.analysis.lpc_order, 10);
        assert_eq!(cfg.analysis.hop_size, 512);
        assert!(!cfg.output.json);
    }
}
