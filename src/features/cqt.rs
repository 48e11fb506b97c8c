use rustfft::num_complex::Complex;

use super::spectral::hann_window;

/// Lowest analyzed pitch, C1. Bins climb in semitones from here.
const FMIN_HZ: f32 = 32.703_195;
const BINS_PER_OCTAVE: usize = 12;

/// Constant-Q magnitude spectrogram, frames-major (`frames x bins`).
///
/// Direct evaluation of the Brown (1991) transform: each bin correlates the
/// signal against a windowed complex exponential whose length keeps the
/// center-frequency-to-bandwidth ratio Q constant. Frame count follows the
/// shared centered-framing formula `1 + samples.len() / hop_size`; the hop
/// here is independent of the STFT hop, so CQT frames do not align with mel
/// frames.
pub fn magnitude(samples: &[f32], sample_rate: u32, bins: usize, hop_size: usize) -> Vec<Vec<f32>> {
    let hop_size = hop_size.max(1);
    let total_frames = 1 + samples.len() / hop_size;
    let kernels: Vec<Vec<Complex<f32>>> = (0..bins)
        .map(|k| bin_kernel(k, sample_rate))
        .collect();

    let mut frames = Vec::with_capacity(total_frames);
    for frame_idx in 0..total_frames {
        let center = frame_idx * hop_size;
        let row: Vec<f32> = kernels
            .iter()
            .map(|kernel| {
                let half = kernel.len() / 2;
                let mut acc = Complex::new(0.0_f32, 0.0);
                for (n, &coeff) in kernel.iter().enumerate() {
                    let idx = center + n;
                    let s = if idx < half {
                        0.0
                    } else {
                        samples.get(idx - half).copied().unwrap_or(0.0)
                    };
                    acc += coeff * s;
                }
                acc.norm() / kernel.len() as f32
            })
            .collect();
        frames.push(row);
    }
    frames
}

fn bin_kernel(bin: usize, sample_rate: u32) -> Vec<Complex<f32>> {
    let q = 1.0 / (2.0_f32.powf(1.0 / BINS_PER_OCTAVE as f32) - 1.0);
    let freq = FMIN_HZ * 2.0_f32.powf(bin as f32 / BINS_PER_OCTAVE as f32);
    let len = ((q * sample_rate as f32 / freq).ceil() as usize).max(2);
    let window = hann_window(len);
    (0..len)
        .map(|n| {
            let phase = -2.0 * std::f32::consts::PI * q * n as f32 / len as f32;
            Complex::new(phase.cos(), phase.sin()) * window[n]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_matches_formula() {
        let samples = vec![0.0_f32; 16_000];
        let mag = magnitude(&samples, 16_000, 6, 2048);
        assert_eq!(mag.len(), 1 + 16_000 / 2048);
        assert_eq!(mag[0].len(), 6);
    }

    #[test]
    fn low_tone_lands_in_the_matching_bin() {
        let sr = 16_000u32;
        // E1 = 41.2 Hz, four semitones above C1 -> bin 4 of 6.
        let freq = 41.203;
        let samples: Vec<f32> = (0..sr * 2)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sr as f32).sin())
            .collect();
        let mag = magnitude(&samples, sr, 6, 2048);
        let mid = &mag[mag.len() / 2];
        let peak_bin = mid
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, 4);
    }

    #[test]
    fn silence_yields_zero_magnitude() {
        let mag = magnitude(&vec![0.0; 8192], 16_000, 6, 2048);
        assert!(mag.iter().flatten().all(|&m| m == 0.0));
    }
}
