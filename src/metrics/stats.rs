/*!
 * Sample Statistics
 * Small numeric helpers over tick samples
 */

use crate::core::types::Tick;

/// Arithmetic mean, zero for an empty sample
pub fn mean(samples: &[Tick]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|&v| v as f64).sum::<f64>() / samples.len() as f64
}

/// Sample variance with an `n - 1` denominator, zero below two samples
pub fn sample_variance(samples: &[Tick], mean: f64) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = samples
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum();
    sum_sq / (samples.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2, 4, 6]), 4.0);
    }

    #[test]
    fn test_sample_variance() {
        assert_eq!(sample_variance(&[5], 5.0), 0.0);
        // (1 + 1) / 1
        assert_eq!(sample_variance(&[4, 6], 5.0), 2.0);
        // (4 + 0 + 4) / 2
        assert_eq!(sample_variance(&[2, 4, 6], 4.0), 4.0);
    }
}
