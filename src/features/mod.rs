pub mod cepstral;
pub mod cqt;
pub mod lpc;
pub mod pitch;
pub mod spectral;

use serde::Serialize;

use crate::audio::signal;
use crate::audio::AudioClip;
use crate::config::AnalysisConfig;
use crate::error::ClipError;

/// Everything extracted from one clip, handed to the renderer and then
/// dropped. 2-D grids are frames-major; grids produced with different
/// hop/window settings (mel vs constant-Q) have independent frame counts.
#[derive(Debug, Serialize)]
pub struct FeatureBundle {
    pub lsf: Vec<f64>,
    pub lpc: Vec<f64>,
    pub mfcc: Vec<Vec<f32>>,
    pub cqcc: Vec<Vec<f32>>,
    pub mel_energies: Vec<Vec<f32>>,
    pub spectral_centroid: Vec<f32>,
    pub spectral_contrast: Vec<f32>,
    pub fundamental_periods: Vec<f32>,
}

/// Run the full extraction pipeline on one clip.
///
/// Pre-emphasis feeds everything downstream. The LSF stage acts as the gate:
/// any of its failure kinds skips the clip before the cheaper transforms run,
/// mirroring the ordering of the rest of the pipeline.
pub fn extract(clip: &AudioClip, cfg: &AnalysisConfig) -> Result<FeatureBundle, ClipError> {
    let emphasized = signal::pre_emphasis(&clip.samples, cfg.pre_emphasis);
    if !signal::all_finite(&emphasized) {
        return Err(ClipError::MalformedSignal);
    }

    let model = lpc::fit(&emphasized, cfg.lpc_order);
    let lsf = lpc::line_spectrum_frequencies(&model)?;

    let power = spectral::power_spectrogram(&emphasized, cfg.frame_size, cfg.hop_size);
    let mel_energies =
        spectral::mel_spectrogram(&power, clip.sample_rate, cfg.frame_size, cfg.mel_bands);
    let spectral_centroid = spectral::spectral_centroid(&power, clip.sample_rate, cfg.frame_size);
    let spectral_contrast = spectral::spectral_contrast(&power, clip.sample_rate, cfg.frame_size);

    let track = pitch::track(
        &power,
        clip.sample_rate,
        cfg.frame_size,
        cfg.pitch_fmin,
        cfg.pitch_fmax,
    );
    let fundamental_periods = pitch::fundamental_periods(&track);

    let mfcc = cepstral::mfcc(&mel_energies, cfg.mfcc_coeffs);
    let cqt_magnitude = cqt::magnitude(&emphasized, clip.sample_rate, cfg.cqt_bins, cfg.cqt_hop);
    let cqcc = cepstral::cqcc(&cqt_magnitude, cfg.cqcc_coeffs);

    Ok(FeatureBundle {
        lsf,
        lpc: model.coeffs,
        mfcc,
        cqcc,
        mel_energies,
        spectral_centroid,
        spectral_contrast,
        fundamental_periods,
    })
}
