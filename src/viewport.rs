//! Chart geometry: the mapping between the logical domain (candle index,
//! price, volume) and pixel space for a surface of a given size.
//!
//! `compute_viewport` is pure — the host reports a new surface size and the
//! caller just recomputes. All degenerate cases (no candles, flat prices,
//! zero volume) map to flat output instead of dividing by zero.

use crate::candles::Candle;

/// Fixed height of the volume band at the bottom of the plot.
pub const VOLUME_BAND_HEIGHT: f64 = 50.0;

#[derive(Debug, Clone, Copy)]
pub struct Insets {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for Insets {
    fn default() -> Self {
        Self {
            top: 20.0,
            bottom: 30.0,
            left: 10.0,
            right: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ViewportGeometry {
    pub width: f64,
    pub height: f64,
    pub insets: Insets,
    /// Vertical extent of the price plot (height minus vertical insets).
    pub plot_height: f64,
    /// Horizontal extent one candle occupies; 0 when there are no candles.
    pub slot_width: f64,
    pub candle_count: usize,
    /// Price domain, visible low/high padded by 10% of the range.
    pub min_price: f64,
    pub max_price: f64,
    pub max_volume: f64,
    pub volume_band: f64,
}

pub fn compute_viewport(width: f64, height: f64, candles: &[Candle]) -> ViewportGeometry {
    compute_viewport_with(width, height, Insets::default(), candles)
}

pub fn compute_viewport_with(
    width: f64,
    height: f64,
    insets: Insets,
    candles: &[Candle],
) -> ViewportGeometry {
    let plot_height = (height - insets.top - insets.bottom).max(0.0);
    let plot_width = (width - insets.left - insets.right).max(0.0);

    if candles.is_empty() {
        return ViewportGeometry {
            width,
            height,
            insets,
            plot_height,
            slot_width: 0.0,
            candle_count: 0,
            min_price: 0.0,
            max_price: 100.0,
            max_volume: 0.0,
            volume_band: VOLUME_BAND_HEIGHT,
        };
    }

    let mut min_low = f64::INFINITY;
    let mut max_high = f64::NEG_INFINITY;
    let mut max_volume = 0.0f64;
    for c in candles {
        min_low = min_low.min(c.low);
        max_high = max_high.max(c.high);
        max_volume = max_volume.max(c.volume);
    }
    let range = max_high - min_low;

    ViewportGeometry {
        width,
        height,
        insets,
        plot_height,
        slot_width: plot_width / candles.len() as f64,
        candle_count: candles.len(),
        min_price: min_low - range * 0.1,
        max_price: max_high + range * 0.1,
        max_volume,
        volume_band: VOLUME_BAND_HEIGHT,
    }
}

impl ViewportGeometry {
    /// Price to surface y. Higher price, smaller y. A flat domain maps every
    /// price to the vertical midline of the plot.
    pub fn price_to_y(&self, price: f64) -> f64 {
        let range = self.max_price - self.min_price;
        if range == 0.0 {
            return self.plot_height / 2.0 + self.insets.top;
        }
        self.plot_height - ((price - self.min_price) / range) * self.plot_height + self.insets.top
    }

    /// Volume to bar height, linear on `[0, max_volume]`.
    pub fn volume_to_height(&self, volume: f64) -> f64 {
        if self.max_volume == 0.0 {
            return 0.0;
        }
        (volume / self.max_volume) * self.volume_band
    }

    /// Left edge of candle `index`'s slot.
    pub fn slot_x(&self, index: usize) -> f64 {
        self.insets.left + index as f64 * self.slot_width
    }

    /// Horizontal center of candle `index`'s slot (wick / SMA anchor).
    pub fn slot_center_x(&self, index: usize) -> f64 {
        self.slot_x(index) + self.slot_width / 2.0
    }

    /// Invert a pointer's surface x back to a candle index.
    ///
    /// Out-of-range positions and degenerate geometry yield `None` — no
    /// selection, never an error.
    pub fn hit_test(&self, x: f64) -> Option<usize> {
        if self.slot_width <= 0.0 {
            return None;
        }
        let offset = x - self.insets.left;
        if offset < 0.0 {
            return None;
        }
        let index = (offset / self.slot_width).floor() as usize;
        if index < self.candle_count {
            Some(index)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candles::Candle;

    fn flat_candles(n: usize, price: f64) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle::new(i as u64, price, price, price, price, 1000.0))
            .collect()
    }

    fn ramp_candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let p = 100.0 + i as f64;
                Candle::new(i as u64, p, p + 1.0, p - 1.0, p + 0.5, 500.0 + i as f64)
            })
            .collect()
    }

    #[test]
    fn test_domain_has_ten_percent_margin() {
        let candles = ramp_candles(10);
        let geo = compute_viewport(600.0, 300.0, &candles);
        // lows span 99..108, highs 101..110 -> range 11.
        assert!((geo.min_price - (99.0 - 1.1)).abs() < 1e-9);
        assert!((geo.max_price - (110.0 + 1.1)).abs() < 1e-9);
    }

    #[test]
    fn test_price_mapping_is_order_preserving() {
        let candles = ramp_candles(30);
        let geo = compute_viewport(600.0, 300.0, &candles);
        let mut prev = f64::INFINITY;
        let mut p = geo.min_price;
        while p <= geo.max_price {
            let y = geo.price_to_y(p);
            assert!(y < prev, "y must strictly decrease as price rises");
            prev = y;
            p += (geo.max_price - geo.min_price) / 50.0;
        }
    }

    #[test]
    fn test_domain_edges_map_to_plot_edges() {
        let candles = ramp_candles(10);
        let geo = compute_viewport(600.0, 300.0, &candles);
        assert!((geo.price_to_y(geo.min_price) - (geo.plot_height + geo.insets.top)).abs() < 1e-9);
        assert!((geo.price_to_y(geo.max_price) - geo.insets.top).abs() < 1e-9);
    }

    #[test]
    fn test_flat_data_maps_to_midline() {
        let candles = flat_candles(20, 42.0);
        let geo = compute_viewport(600.0, 300.0, &candles);
        let mid = geo.plot_height / 2.0 + geo.insets.top;
        assert_eq!(geo.price_to_y(42.0), mid);
        assert_eq!(geo.price_to_y(41.0), mid);
        assert_eq!(geo.price_to_y(43.0), mid);
    }

    #[test]
    fn test_empty_history_geometry() {
        let geo = compute_viewport(600.0, 300.0, &[]);
        assert_eq!(geo.candle_count, 0);
        assert_eq!(geo.slot_width, 0.0);
        assert_eq!(geo.min_price, 0.0);
        assert_eq!(geo.max_price, 100.0);
        assert_eq!(geo.hit_test(300.0), None);
    }

    #[test]
    fn test_volume_mapping() {
        let candles = ramp_candles(10);
        let geo = compute_viewport(600.0, 300.0, &candles);
        assert_eq!(geo.volume_to_height(0.0), 0.0);
        assert!((geo.volume_to_height(geo.max_volume) - VOLUME_BAND_HEIGHT).abs() < 1e-9);
        let half = geo.volume_to_height(geo.max_volume / 2.0);
        assert!((half - VOLUME_BAND_HEIGHT / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_max_volume_maps_flat() {
        let candles: Vec<Candle> = (0..5)
            .map(|i| Candle::new(i as u64, 10.0, 11.0, 9.0, 10.0, 0.0))
            .collect();
        let geo = compute_viewport(600.0, 300.0, &candles);
        assert_eq!(geo.volume_to_height(0.0), 0.0);
    }

    #[test]
    fn test_hit_test_inverts_slot_centers() {
        let candles = ramp_candles(60);
        let geo = compute_viewport(600.0, 300.0, &candles);
        for i in 0..geo.candle_count {
            assert_eq!(geo.hit_test(geo.slot_center_x(i)), Some(i));
        }
    }

    #[test]
    fn test_hit_test_out_of_range_clears_selection() {
        let candles = ramp_candles(60);
        let geo = compute_viewport(600.0, 300.0, &candles);
        assert_eq!(geo.hit_test(geo.insets.left - 5.0), None);
        assert_eq!(geo.hit_test(geo.width + 50.0), None);
        let past_last = geo.slot_x(geo.candle_count) + geo.slot_width;
        assert_eq!(geo.hit_test(past_last), None);
    }

    #[test]
    fn test_resize_is_pure_and_idempotent() {
        let candles = ramp_candles(30);
        let a = compute_viewport(600.0, 300.0, &candles);
        let b = compute_viewport(900.0, 300.0, &candles);
        let a2 = compute_viewport(600.0, 300.0, &candles);
        assert!(b.slot_width > a.slot_width);
        assert_eq!(a.slot_width, a2.slot_width);
        assert_eq!(a.min_price, a2.min_price);
    }
}
