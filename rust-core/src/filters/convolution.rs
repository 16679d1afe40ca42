//! Direct-form linear convolution
//!
//! Complexity is O(N*M); callers that need it faster are expected to shrink
//! the kernel first (see the GWT support truncation).

use std::ops::{AddAssign, Mul};

/// Centered ("same") convolution of a real signal with a kernel
///
/// The output has length `max(signal.len(), kernel.len())` and is the slice of
/// the full convolution starting at `(min_len - 1) / 2`.
///
/// # Arguments
/// * `signal` - Real input samples
/// * `kernel` - Real or complex kernel
pub fn convolve_same<T>(signal: &[f64], kernel: &[T]) -> Vec<T>
where
    T: Copy + Default + AddAssign + Mul<f64, Output = T>,
{
    let n = signal.len();
    let m = kernel.len();
    if n == 0 {
        return Vec::new();
    }
    if m == 0 {
        return vec![T::default(); n];
    }

    let out_len = n.max(m);
    let offset = (n.min(m) - 1) / 2;

    (offset..offset + out_len)
        .map(|k| {
            // y[k] = Σ x[j] * h[k - j]
            let j_start = (k + 1).saturating_sub(m);
            let j_end = k.min(n - 1);
            let mut acc = T::default();
            for j in j_start..=j_end {
                acc += kernel[k - j] * signal[j];
            }
            acc
        })
        .collect()
}

/// Normalized box filter of `taps` ones divided by `taps`
pub fn box_kernel(taps: usize) -> Vec<f64> {
    vec![1.0 / taps as f64; taps]
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_same_odd_kernel() {
        let out = convolve_same(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]);
        let expected = [1.0, 2.5, 4.0];
        for (o, e) in out.iter().zip(expected.iter()) {
            assert!((o - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_same_even_kernel() {
        let out = convolve_same(&[1.0, 2.0, 3.0, 4.0], &[1.0, 1.0]);
        assert_eq!(out, vec![1.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_kernel_longer_than_signal() {
        // Output takes the longer length, centered on the full result
        let out = convolve_same(&[1.0, 1.0], &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(out, vec![1.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_complex_kernel() {
        let kernel = [Complex64::new(0.0, 1.0)];
        let out = convolve_same(&[2.0, -1.0], &kernel);
        assert_eq!(out, vec![Complex64::new(0.0, 2.0), Complex64::new(0.0, -1.0)]);
    }

    #[test]
    fn test_box_kernel_preserves_constant() {
        let signal = vec![3.0; 32];
        let out = convolve_same(&signal, &box_kernel(5));
        assert!((out[16] - 3.0).abs() < 1e-12);
        // Edges see fewer taps
        assert!(out[0] < 3.0);
    }
}
