/// First-order high-pass filter applied before linear-prediction analysis:
/// `y[0] = x[0]`, `y[i] = x[i] - coeff * x[i-1]`. Output length always equals
/// input length.
pub fn pre_emphasis(samples: &[f32], coeff: f32) -> Vec<f32> {
    let mut out = Vec::with_capacity(samples.len());
    if let Some(&first) = samples.first() {
        out.push(first);
        for pair in samples.windows(2) {
            out.push(pair[1] - coeff * pair[0]);
        }
    }
    out
}

pub fn all_finite(samples: &[f32]) -> bool {
    samples.iter().all(|s| s.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pre_emphasis_preserves_length_and_first_sample() {
        let input = vec![0.8, 0.4, -0.2, 0.1, 0.0];
        let out = pre_emphasis(&input, 0.5);
        assert_eq!(out.len(), input.len());
        assert_relative_eq!(out[0], input[0]);
        assert_relative_eq!(out[1], 0.4 - 0.5 * 0.8);
        assert_relative_eq!(out[4], 0.0 - 0.5 * 0.1);
    }

    #[test]
    fn pre_emphasis_of_empty_input_is_empty() {
        assert!(pre_emphasis(&[], 0.5).is_empty());
    }

    #[test]
    fn pre_emphasis_of_silence_is_silence() {
        let out = pre_emphasis(&vec![0.0; 64], 0.5);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn all_finite_flags_nan_and_infinity() {
        assert!(all_finite(&[0.0, 1.0, -1.0]));
        assert!(!all_finite(&[0.0, f32::NAN]));
        assert!(!all_finite(&[f32::INFINITY, 0.0]));
        assert!(all_finite(&[]));
    }
}
