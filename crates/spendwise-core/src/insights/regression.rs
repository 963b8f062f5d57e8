//! Least-squares projection over a monthly series

use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::store::checked_sum;

/// Predict the value following `series` with an ordinary least-squares line
///
/// The points are `(i, series[i])` for `i = 0..n`; the prediction is the
/// fitted value at `x = n`, floored at zero.
///
/// - `[]` predicts 0
/// - `[x]` predicts x
/// - a degenerate fit (zero denominator) predicts the mean
///
/// Values too large for the sums fail with `DataFormat`.
pub fn simple_linear_predict(series: &[Decimal]) -> Result<Decimal> {
    match series {
        [] => return Ok(Decimal::ZERO),
        [only] => return Ok(*only),
        _ => {}
    }

    let overflow = || Error::overflow("the spending trend");

    let n = Decimal::from(series.len());
    let mut sum_x = Decimal::ZERO;
    let mut sum_xx = Decimal::ZERO;
    let mut sum_xy = Decimal::ZERO;

    for (i, y) in series.iter().enumerate() {
        let x = Decimal::from(i);
        sum_x += x;
        sum_xx += x * x;
        sum_xy = x
            .checked_mul(*y)
            .and_then(|xy| sum_xy.checked_add(xy))
            .ok_or_else(overflow)?;
    }
    let sum_y = checked_sum(series.iter().copied())?;

    // Only depends on n, never overflows for a monthly series
    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.is_zero() {
        return Ok(sum_y / n);
    }

    let numerator = n
        .checked_mul(sum_xy)
        .zip(sum_x.checked_mul(sum_y))
        .and_then(|(a, b)| a.checked_sub(b))
        .ok_or_else(overflow)?;
    let slope = numerator.checked_div(denominator).ok_or_else(overflow)?;
    let intercept = slope
        .checked_mul(sum_x)
        .and_then(|v| sum_y.checked_sub(v))
        .and_then(|v| v.checked_div(n))
        .ok_or_else(overflow)?;
    let predicted = slope
        .checked_mul(n)
        .and_then(|v| v.checked_add(intercept))
        .ok_or_else(overflow)?;

    Ok(predicted.max(Decimal::ZERO))
}

/// Left-pad `values` with zeros up to `len` entries
///
/// Longer inputs are returned unchanged.
pub fn pad_left(values: &[Decimal], len: usize) -> Vec<Decimal> {
    let missing = len.saturating_sub(values.len());
    let mut padded = vec![Decimal::ZERO; missing];
    padded.extend_from_slice(values);
    padded
}

/// Arithmetic mean, zero for an empty slice
pub fn mean(values: &[Decimal]) -> Result<Decimal> {
    if values.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Ok(checked_sum(values.iter().copied())? / Decimal::from(values.len()))
}
