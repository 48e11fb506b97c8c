/// Additive floor applied before taking the log of constant-Q magnitude.
const CQCC_LOG_EPS: f32 = 1e-6;

/// Mel-frequency cepstral coefficients, frames-major. Each frame keeps the
/// leading `coeffs` terms of the DCT-II of its log mel energies.
pub fn mfcc(mel_energies: &[Vec<f32>], coeffs: usize) -> Vec<Vec<f32>> {
    mel_energies
        .iter()
        .map(|frame| {
            let log_energies: Vec<f32> = frame.iter().map(|&e| e.max(1e-12).ln()).collect();
            dct_ii(&log_energies, coeffs)
        })
        .collect()
}

/// Constant-Q cepstral coefficients, frames-major, min-max normalized into
/// [0,1] across the whole clip. A constant input (max == min) normalizes to
/// all zeros instead of dividing by zero.
pub fn cqcc(cqt_magnitude: &[Vec<f32>], coeffs: usize) -> Vec<Vec<f32>> {
    let mut out: Vec<Vec<f32>> = cqt_magnitude
        .iter()
        .map(|frame| {
            let log_magnitude: Vec<f32> = frame.iter().map(|&m| (m + CQCC_LOG_EPS).ln()).collect();
            dct_ii(&log_magnitude, coeffs)
        })
        .collect();

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in out.iter().flatten() {
        min = min.min(v);
        max = max.max(v);
    }
    let range = max - min;
    for v in out.iter_mut().flatten() {
        *v = if range > 0.0 { (*v - min) / range } else { 0.0 };
    }
    out
}

fn dct_ii(values: &[f32], count: usize) -> Vec<f32> {
    let n = values.len().max(1) as f64;
    (0..count)
        .map(|k| {
            let mut sum = 0.0_f64;
            for (m, &v) in values.iter().enumerate() {
                let angle = std::f64::consts::PI * k as f64 * (m as f64 + 0.5) / n;
                sum += v as f64 * angle.cos();
            }
            sum as f32
        })
        .collect()
}
