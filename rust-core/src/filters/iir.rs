//! IIR filtering (direct form II transposed) and the A-weighting curve

use crate::error::{Result, SeriesError};

/// A-weighting numerator, bilinear design at 44.1 kHz
pub const A_WEIGHTING_B: [f64; 7] = [
    0.169099309,
    -0.338198619,
    -0.169099309,
    0.676397238,
    -0.169099309,
    -0.338198619,
    0.169099309,
];

/// A-weighting denominator, bilinear design at 44.1 kHz
pub const A_WEIGHTING_A: [f64; 7] = [
    1.000000000,
    -4.417756060,
    7.777187062,
    -6.882221690,
    3.161704960,
    -0.696710943,
    0.057796673,
];

/// Filter `input` with the rational transfer function b(z)/a(z)
///
/// Coefficients are normalized by `a[0]`. The filter starts from rest.
pub fn lfilter(b: &[f64], a: &[f64], input: &[f64]) -> Result<Vec<f64>> {
    let a0 = match a.first() {
        Some(&a0) if a0 != 0.0 => a0,
        _ => {
            return Err(SeriesError::InvalidArgument(
                "IIR denominator must start with a non-zero coefficient".into(),
            ))
        }
    };
    if b.is_empty() {
        return Err(SeriesError::InvalidArgument(
            "IIR numerator must not be empty".into(),
        ));
    }

    let order = b.len().max(a.len());
    let coeff = |c: &[f64], i: usize| c.get(i).copied().unwrap_or(0.0) / a0;

    // Delay line z[0..order-1]
    let mut state = vec![0.0; order];
    let mut output = Vec::with_capacity(input.len());

    for &x in input {
        let y = coeff(b, 0) * x + state[0];
        for i in 1..order {
            let next = if i < order - 1 { state[i] } else { 0.0 };
            state[i - 1] = coeff(b, i) * x - coeff(a, i) * y + next;
        }
        output.push(y);
    }

    Ok(output)
}
