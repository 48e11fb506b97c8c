/// Relative magnitude floor for peak candidates within a frame.
const PEAK_THRESHOLD: f32 = 0.1;

/// Per-frame fundamental-frequency estimate with its supporting magnitude.
#[derive(Debug, Clone, Copy)]
pub struct PitchFrame {
    pub frequency_hz: f32,
    pub magnitude: f32,
}

/// Magnitude-weighted peak tracking over an existing power spectrogram.
///
/// For each frame, spectral peaks inside the search band are located with
/// parabolic interpolation and the strongest one becomes the frame's
/// fundamental-frequency estimate. Silent or peakless frames report zero
/// frequency so the period filter drops them later.
pub fn track(
    power: &[Vec<f32>],
    sample_rate: u32,
    frame_size: usize,
    fmin_hz: f32,
    fmax_hz: f32,
) -> Vec<PitchFrame> {
    let freq_resolution = sample_rate as f32 / frame_size as f32;
    let lo = ((fmin_hz / freq_resolution) as usize).max(1);
    let hi = ((fmax_hz / freq_resolution) as usize).min(frame_size / 2);

    power
        .iter()
        .map(|frame| {
            let magnitudes: Vec<f32> = frame.iter().map(|&p| p.sqrt()).collect();
            let frame_max = magnitudes.iter().copied().fold(0.0_f32, f32::max);
            if frame_max <= 0.0 || lo + 1 >= hi {
                return PitchFrame { frequency_hz: 0.0, magnitude: 0.0 };
            }

            let floor = PEAK_THRESHOLD * frame_max;
            let mut best = PitchFrame { frequency_hz: 0.0, magnitude: 0.0 };
            for bin in lo..hi.min(magnitudes.len() - 1) {
                let m = magnitudes[bin];
                if m < floor || m <= magnitudes[bin - 1] || m < magnitudes[bin + 1] {
                    continue;
                }
                let (freq, mag) = interpolate_peak(&magnitudes, bin, freq_resolution);
                if mag > best.magnitude {
                    best = PitchFrame { frequency_hz: freq, magnitude: mag };
                }
            }
            best
        })
        .collect()
}

/// Parabolic interpolation around a local maximum bin.
fn interpolate_peak(magnitudes: &[f32], bin: usize, freq_resolution: f32) -> (f32, f32) {
    let (a, b, c) = (magnitudes[bin - 1], magnitudes[bin], magnitudes[bin + 1]);
    let denom = a - 2.0 * b + c;
    let shift = if denom.abs() > 1e-12 {
        (0.5 * (a - c) / denom).clamp(-0.5, 0.5)
    } else {
        0.0
    };
    let freq = (bin as f32 + shift) * freq_resolution;
    let mag = b - 0.25 * (a - c) * shift;
    (freq, mag)
}

/// Reciprocal of each frame estimate, keeping only finite, strictly positive
/// periods. Entries are dropped, never replaced, so the output may be shorter
/// than the frame count — or empty, which is a valid outcome for silent or
/// unvoiced clips.
pub fn fundamental_periods(track: &[PitchFrame]) -> Vec<f32> {
    track
        .iter()
        .map(|frame| 1.0 / frame.frequency_hz)
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect()
}
