use rustfft::{num_complex::Complex, FftPlanner};

/// Short-time power spectrogram with centered frames. Every frame-based
/// transform in this module shares the frame count formula
/// `1 + samples.len() / hop_size`; transforms configured with different
/// hop or window settings do NOT align frame-for-frame.
pub fn power_spectrogram(samples: &[f32], frame_size: usize, hop_size: usize) -> Vec<Vec<f32>> {
    let frame_size = frame_size.max(2);
    let hop_size = hop_size.max(1);
    let total_frames = 1 + samples.len() / hop_size;
    let hann = hann_window(frame_size);
    let half = frame_size / 2;

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_size);

    let mut frames = Vec::with_capacity(total_frames);
    for frame_idx in 0..total_frames {
        let center = frame_idx * hop_size;
        let mut buffer: Vec<Complex<f32>> = (0..frame_size)
            .map(|i| {
                let idx = center + i;
                // Centered framing: indices outside the clip read as zero.
                let s = if idx < half {
                    0.0
                } else {
                    samples.get(idx - half).copied().unwrap_or(0.0)
                };
                Complex::new(s * hann[i], 0.0)
            })
            .collect();
        fft.process(&mut buffer);

        let power: Vec<f32> = buffer[..half + 1]
            .iter()
            .map(|c| (c.re * c.re + c.im * c.im).max(0.0))
            .collect();
        frames.push(power);
    }
    frames
}

/// Mel-scaled energy spectrogram, frames-major (`frames x mel_bands`).
pub fn mel_spectrogram(
    power: &[Vec<f32>],
    sample_rate: u32,
    frame_size: usize,
    mel_bands: usize,
) -> Vec<Vec<f32>> {
    let filters = mel_filterbank(sample_rate, frame_size, mel_bands);
    power
        .iter()
        .map(|frame| {
            filters
                .iter()
                .map(|filter| {
                    filter
                        .iter()
                        .map(|&(bin, w)| frame.get(bin).copied().unwrap_or(0.0) * w)
                        .sum::<f32>()
                })
                .collect()
        })
        .collect()
}

/// Power-weighted mean frequency per frame, in Hz. Zero for silent frames.
pub fn spectral_centroid(power: &[Vec<f32>], sample_rate: u32, frame_size: usize) -> Vec<f32> {
    let freq_resolution = sample_rate as f32 / frame_size as f32;
    power
        .iter()
        .map(|frame| {
            let total: f32 = frame.iter().sum();
            if total <= 1e-10 {
                return 0.0;
            }
            frame
                .iter()
                .enumerate()
                .map(|(bin, &p)| bin as f32 * freq_resolution * p)
                .sum::<f32>()
                / total
        })
        .collect()
}

// Part of the contrast definition (octave bands up from 200 Hz), not a
// tunable analysis parameter.
const CONTRAST_FMIN: f32 = 200.0;
const CONTRAST_BANDS: usize = 6;
const CONTRAST_QUANTILE: f32 = 0.02;

/// Per-frame spectral contrast: log peak-to-valley ratio inside octave-wide
/// sub-bands starting at 200 Hz, averaged across the bands to one scalar per
/// frame.
pub fn spectral_contrast(power: &[Vec<f32>], sample_rate: u32, frame_size: usize) -> Vec<f32> {
    let nyquist = sample_rate as f32 * 0.5;
    let mut edges = vec![0.0_f32, CONTRAST_FMIN];
    for band in 1..=CONTRAST_BANDS {
        edges.push((CONTRAST_FMIN * (1 << band) as f32).min(nyquist));
    }

    power
        .iter()
        .map(|frame| {
            let mut sum = 0.0_f32;
            let mut count = 0usize;
            for pair in edges.windows(2) {
                let lo = freq_to_bin(pair[0], sample_rate, frame_size);
                let hi = freq_to_bin(pair[1], sample_rate, frame_size).max(lo + 1);
                let band = &frame[lo..hi.min(frame.len())];
                if band.is_empty() {
                    continue;
                }
                sum += band_contrast(band);
                count += 1;
            }
            if count == 0 { 0.0 } else { sum / count as f32 }
        })
        .collect()
}

fn band_contrast(band: &[f32]) -> f32 {
    let mut sorted = band.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let quantile = ((CONTRAST_QUANTILE * band.len() as f32).round() as usize).max(1);
    let valley: f32 = sorted[..quantile].iter().sum::<f32>() / quantile as f32;
    let peak: f32 = sorted[sorted.len() - quantile..].iter().sum::<f32>() / quantile as f32;
    let eps = 1e-10_f32;
    (peak + eps).ln() - (valley + eps).ln()
}

fn mel_filterbank(sample_rate: u32, frame_size: usize, mel_bands: usize) -> Vec<Vec<(usize, f32)>> {
    let nyquist = sample_rate.max(1) as f32 * 0.5;
    let mel_max = hz_to_mel(nyquist);
    let freq_resolution = sample_rate.max(1) as f32 / frame_size as f32;
    let bins = frame_size / 2 + 1;

    // Filter edge frequencies, equally spaced on the mel scale.
    let edges: Vec<f32> = (0..mel_bands + 2)
        .map(|i| mel_to_hz(mel_max * i as f32 / (mel_bands + 1) as f32))
        .collect();

    let mut filters = Vec::with_capacity(mel_bands);
    for m in 0..mel_bands {
        let (lo, center, hi) = (edges[m], edges[m + 1], edges[m + 2]);
        let mut weights = Vec::new();
        for bin in 0..bins {
            let freq = bin as f32 * freq_resolution;
            let rising = if center > lo { (freq - lo) / (center - lo) } else { 0.0 };
            let falling = if hi > center { (hi - freq) / (hi - center) } else { 0.0 };
            let w = rising.min(falling);
            if w > 0.0 {
                weights.push((bin, w));
            }
        }
        filters.push(weights);
    }
    filters
}

fn freq_to_bin(freq_hz: f32, sample_rate: u32, frame_size: usize) -> usize {
    let nyquist = sample_rate.max(1) as f32 * 0.5;
    let freq = freq_hz.clamp(0.0, nyquist);
    ((freq * frame_size as f32 / sample_rate.max(1) as f32) as usize).min(frame_size / 2)
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sr: u32, seconds: f32) -> Vec<f32> {
        let len = (sr as f32 * seconds) as usize;
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sr as f32).sin())
            .collect()
    }

    #[test]
    fn frame_count_matches_formula() {
        let sr = 16_000;
        let samples = sine(440.0, sr, 1.0);
        let power = power_spectrogram(&samples, 2048, 512);
        assert_eq!(power.len(), 1 + samples.len() / 512);
        assert_eq!(power[0].len(), 2048 / 2 + 1);
    }

    #[test]
    fn centroid_tracks_a_pure_tone() {
        let sr = 16_000;
        let power = power_spectrogram(&sine(440.0, sr, 1.0), 2048, 512);
        let centroid = spectral_centroid(&power, sr, 2048);
        // Interior frames avoid the zero-padded edges.
        let mid = centroid[centroid.len() / 2];
        assert!(mid > 380.0 && mid < 500.0, "centroid {mid}");
    }

    #[test]
    fn centroid_of_silence_is_zero() {
        let power = power_spectrogram(&vec![0.0; 8192], 2048, 512);
        assert!(spectral_centroid(&power, 16_000, 2048).iter().all(|&c| c == 0.0));
    }

    #[test]
    fn mel_energy_concentrates_near_tone_frequency() {
        let sr = 16_000;
        let power = power_spectrogram(&sine(1000.0, sr, 1.0), 2048, 512);
        let mel = mel_spectrogram(&power, sr, 2048, 128);
        assert_eq!(mel.len(), power.len());
        assert_eq!(mel[0].len(), 128);

        let frame = &mel[mel.len() / 2];
        let peak_band = frame
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        // 1 kHz sits in the lower third of a 128-band mel axis up to 8 kHz.
        assert!(peak_band > 20 && peak_band < 80, "peak band {peak_band}");
    }

    #[test]
    fn contrast_is_one_finite_scalar_per_frame() {
        let sr = 16_000;
        let power = power_spectrogram(&sine(1000.0, sr, 0.5), 2048, 512);
        let contrast = spectral_contrast(&power, sr, 2048);
        assert_eq!(contrast.len(), power.len());
        assert!(contrast.iter().all(|c| c.is_finite()));
        // The band holding the tone separates peak from valley.
        assert!(contrast[contrast.len() / 2] > 0.0);
    }

    #[test]
    fn contrast_of_silence_is_zero() {
        let power = power_spectrogram(&vec![0.0; 4096], 16_000, 2048);
        assert!(spectral_contrast(&power, 16_000, 2048).iter().all(|&c| c == 0.0));
    }
}
