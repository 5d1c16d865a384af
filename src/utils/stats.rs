//! Order statistics for trade price series.

/// Element at index `floor(n * q)` of an ascending-sorted slice.
///
/// This is a simple index quantile, not an interpolated one. Returns `None`
/// for an empty slice.
pub fn quantile_at(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = ((sorted.len() as f64) * q).floor() as usize;
    sorted.get(idx.min(sorted.len() - 1)).copied()
}

/// Fence `[Q1 - k*IQR, Q3 + k*IQR]` over unsorted values.
///
/// Returns `None` for an empty input.
pub fn iqr_fence(values: &[f64], k: f64) -> Option<(f64, f64)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile_at(&sorted, 0.25)?;
    let q3 = quantile_at(&sorted, 0.75)?;
    let iqr = q3 - q1;

    Some((q1 - k * iqr, q3 + k * iqr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_index() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        // floor(5 * 0.25) = 1, floor(5 * 0.75) = 3
        assert_eq!(quantile_at(&sorted, 0.25), Some(2.0));
        assert_eq!(quantile_at(&sorted, 0.75), Some(4.0));
        assert_eq!(quantile_at(&[], 0.5), None);
    }

    #[test]
    fn test_fence_excludes_outlier() {
        let values = [1.0, 1.1, 100.0, 1.2, 1.3];
        let (low, high) = iqr_fence(&values, 2.0).unwrap();
        assert!(low < 1.0);
        assert!(high > 1.3 && high < 100.0);
    }
}
