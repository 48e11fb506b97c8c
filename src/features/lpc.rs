use nalgebra::{Complex, DMatrix};

use crate::error::ClipError;

/// Autoregressive model fit to one clip: `x[n] ~= sum a_k * x[n-k]` for
/// `k = 1..=order`.
#[derive(Debug, Clone)]
pub struct LpcModel {
    pub coeffs: Vec<f64>,
}

/// Fit a fixed-order predictor with the autocorrelation method, solved by
/// Levinson-Durbin recursion in f64. An all-zero signal yields an all-zero
/// model; the LSF stage reports that as a degenerate clip.
pub fn fit(samples: &[f32], order: usize) -> LpcModel {
    let signal: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    let r = autocorrelation(&signal, order);
    LpcModel { coeffs: levinson_durbin(&r, order) }
}

fn autocorrelation(signal: &[f64], max_lag: usize) -> Vec<f64> {
    let n = signal.len();
    let mut r = vec![0.0; max_lag + 1];
    for (lag, value) in r.iter_mut().enumerate() {
        let mut sum = 0.0;
        for i in 0..n.saturating_sub(lag) {
            sum += signal[i] * signal[i + lag];
        }
        *value = sum;
    }
    r
}

/// Returns predictor coefficients `a[1..=order]` (length = order). The
/// internal recursion works on the prediction-error filter
/// `A(z) = 1 + sum c_k z^-k`; predictor coefficients are `-c_k`.
fn levinson_durbin(r: &[f64], order: usize) -> Vec<f64> {
    let mut c = vec![0.0; order];
    if order == 0 || r[0] <= 0.0 {
        return c;
    }

    let mut prev = vec![0.0; order];
    let mut error = r[0];

    for m in 0..order {
        let mut lambda = r[m + 1];
        for j in 0..m {
            lambda += prev[j] * r[m - j];
        }

        if error.abs() < 1e-30 {
            break;
        }
        let k = -lambda / error;
        c[m] = k;
        for j in 0..m {
            c[j] = prev[j] + k * prev[m - 1 - j];
        }
        error *= 1.0 - k * k;
        if error <= 0.0 {
            break;
        }
        prev[..=m].copy_from_slice(&c[..=m]);
    }

    c.iter().map(|&v| -v).collect()
}

/// Line-spectrum frequencies: angles of the stable poles of the
/// prediction-error polynomial `p(z) = 1 - sum a_k z^-k`, sorted ascending.
///
/// Angles come from `atan2`, so values lie in (-pi, pi]: the closed upper
/// bound is reachable only for a negative real pole, which maps to exactly
/// pi.
///
/// The three failure stages are reported separately because each poisons the
/// clip differently: a non-finite polynomial, non-finite roots out of the
/// eigenvalue solver, or a filter with every pole outside the unit circle.
pub fn line_spectrum_frequencies(model: &LpcModel) -> Result<Vec<f64>, ClipError> {
    let mut p = Vec::with_capacity(model.coeffs.len() + 1);
    p.push(1.0);
    p.extend(model.coeffs.iter().map(|&a| -a));

    if p.iter().any(|v| !v.is_finite()) {
        return Err(ClipError::DegenerateModel);
    }

    let roots = polynomial_roots(&p);
    if roots.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(ClipError::DegenerateRoots);
    }

    let mut lsf: Vec<f64> = roots
        .iter()
        .filter(|z| z.norm() < 1.0)
        .map(|z| z.arg())
        .collect();
    if lsf.is_empty() {
        return Err(ClipError::NoStableRoots);
    }
    lsf.sort_by(|a, b| a.total_cmp(b));
    Ok(lsf)
}

/// All complex roots of a monic-normalized real polynomial (descending
/// powers, `p[0] == 1`), as eigenvalues of its companion matrix.
fn polynomial_roots(p: &[f64]) -> Vec<Complex<f64>> {
    let order = p.len().saturating_sub(1);
    if order == 0 {
        return Vec::new();
    }

    // A near-zero tail (silent clip) would feed a defective matrix to the
    // Schur decomposition; report it as having no roots instead.
    let tail_sum: f64 = p[1..].iter().map(|v| v.abs()).sum();
    if tail_sum < 1e-10 {
        return Vec::new();
    }

    let mut companion = DMatrix::<f64>::zeros(order, order);
    for i in 0..order {
        companion[(0, i)] = -p[i + 1];
    }
    for i in 1..order {
        companion[(i, i - 1)] = 1.0;
    }

    companion
        .complex_eigenvalues()
        .iter()
        .map(|e| Complex::new(e.re, e.im))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sine(freq: f32, sr: u32, seconds: f32) -> Vec<f32> {
        let len = (sr as f32 * seconds) as usize;
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sr as f32).sin())
            .collect()
    }

    #[test]
    fn recovers_a_first_order_predictor() {
        // x[n] = 0.9 * x[n-1]: the order-1 predictor coefficient is 0.9.
        let mut x = vec![0.0_f32; 512];
        x[0] = 1.0;
        for i in 1..x.len() {
            x[i] = 0.9 * x[i - 1];
        }
        let model = fit(&x, 1);
        assert_relative_eq!(model.coeffs[0], 0.9, epsilon = 0.05);
    }

    #[test]
    fn first_order_pole_maps_to_a_zero_angle_lsf() {
        let mut x = vec![0.0_f32; 512];
        x[0] = 1.0;
        for i in 1..x.len() {
            x[i] = 0.9 * x[i - 1];
        }
        let lsf = line_spectrum_frequencies(&fit(&x, 1)).unwrap();
        assert_eq!(lsf.len(), 1);
        assert_relative_eq!(lsf[0], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn pure_tone_produces_sorted_bounded_lsf() {
        let model = fit(&sine(440.0, 16_000, 1.0), 12);
        let lsf = line_spectrum_frequencies(&model).unwrap();
        assert!(!lsf.is_empty());
        for pair in lsf.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        for &v in &lsf {
            assert!(v > -std::f64::consts::PI && v <= std::f64::consts::PI);
        }
    }

    #[test]
    fn silent_signal_reports_no_stable_roots() {
        let model = fit(&vec![0.0_f32; 16_000], 12);
        assert!(matches!(
            line_spectrum_frequencies(&model),
            Err(ClipError::NoStableRoots)
        ));
    }

    #[test]
    fn non_finite_coefficients_report_a_degenerate_model() {
        let model = LpcModel { coeffs: vec![0.5, f64::NAN, 0.1] };
        assert!(matches!(
            line_spectrum_frequencies(&model),
            Err(ClipError::DegenerateModel)
        ));
    }
}
