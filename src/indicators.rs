//! Trailing indicators over candle closes.

/// Simple moving average over `period` closes.
///
/// Yields `(i, mean(closes[i - period .. i]))` for every `i` in
/// `period..closes.len()` — the point at index `i` averages the window that
/// ends just before it, matching the overlay's anchor candle. With fewer
/// than `period` closes nothing is emitted; a partial window would show a
/// misleading average.
pub fn sma(closes: &[f64], period: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
    let period = period.max(1);
    (period..closes.len()).map(move |i| {
        let window = &closes[i - period..i];
        (i, window.iter().sum::<f64>() / period as f64)
    })
}

/// SMA value anchored at `index`, if the window before it is complete.
pub fn sma_at(closes: &[f64], period: usize, index: usize) -> Option<f64> {
    let period = period.max(1);
    if index < period || index >= closes.len() {
        return None;
    }
    let window = &closes[index - period..index];
    Some(window.iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_point_count() {
        let closes: Vec<f64> = (1..=25).map(|n| n as f64).collect();
        assert_eq!(sma(&closes, 20).count(), 5);
        assert_eq!(sma(&closes, 25).count(), 0);
        assert_eq!(sma(&closes, 10).count(), 15);
    }

    #[test]
    fn test_sma_over_1_to_25() {
        let closes: Vec<f64> = (1..=25).map(|n| n as f64).collect();
        let points: Vec<(usize, f64)> = sma(&closes, 20).collect();
        assert_eq!(points.len(), 5);
        // First point anchors at index 20 and averages closes 1..=20.
        assert_eq!(points[0].0, 20);
        assert!((points[0].1 - 10.5).abs() < 1e-9);
        assert_eq!(points[4].0, 24);
        assert!((points[4].1 - 14.5).abs() < 1e-9);
    }

    #[test]
    fn test_sma_empty_when_history_short() {
        let closes = [1.0, 2.0, 3.0];
        assert_eq!(sma(&closes, 20).count(), 0);
        assert_eq!(sma(&[], 5).count(), 0);
    }

    #[test]
    fn test_sma_matches_arithmetic_mean() {
        let closes = [2.0, 4.0, 6.0, 8.0, 10.0];
        let points: Vec<(usize, f64)> = sma(&closes, 2).collect();
        assert_eq!(points, vec![(2, 3.0), (3, 5.0), (4, 7.0)]);
    }

    #[test]
    fn test_sma_at_anchor() {
        let closes: Vec<f64> = (1..=25).map(|n| n as f64).collect();
        assert!((sma_at(&closes, 20, 20).unwrap() - 10.5).abs() < 1e-9);
        assert!(sma_at(&closes, 20, 19).is_none());
        assert!(sma_at(&closes, 20, 25).is_none());
    }
}
