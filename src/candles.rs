//! Bounded OHLCV candle history.
//!
//! One candle per feed tick: the tick's price is the close, the prior close
//! is the open, and high/low get a small jitter above/below the body. The
//! window is a fixed-size deque; once full, the oldest candle falls off.

use std::collections::VecDeque;

use rand::Rng;

/// Maximum candles retained per instrument.
pub const WINDOW_CAPACITY: usize = 60;

/// Flat candles seeded on first observation so the chart and SMA have data
/// immediately.
pub const WARMUP_CANDLES: usize = 40;

const WARMUP_VOLUME: f64 = 1000.0;

#[derive(Debug, Clone, Copy)]
pub struct Candle {
    pub seq: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub is_up: bool,
}

impl Candle {
    /// High/low are clamped to contain the body and volume to be
    /// non-negative, so no constructed candle can violate the invariants.
    pub fn new(seq: u64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            seq,
            open,
            high: high.max(open.max(close)),
            low: low.min(open.min(close)),
            close,
            volume: volume.max(0.0),
            is_up: close >= open,
        }
    }

    fn flat(seq: u64, price: f64, volume: f64) -> Self {
        Self::new(seq, price, price, price, price, volume)
    }
}

/// Session-level running stats. Reset only at session start; there is no
/// calendar rollover.
#[derive(Debug, Clone, Copy)]
pub struct DayStats {
    pub open_of_day: f64,
    pub high_of_day: f64,
    pub low_of_day: f64,
    pub cumulative_volume: f64,
}

impl DayStats {
    fn new(seed_price: f64, seed_volume: f64) -> Self {
        Self {
            open_of_day: seed_price,
            high_of_day: seed_price,
            low_of_day: seed_price,
            cumulative_volume: seed_volume,
        }
    }

    /// Percent move off the session open.
    pub fn change_pct(&self, price: f64) -> f64 {
        (price - self.open_of_day) / self.open_of_day * 100.0
    }
}

#[derive(Debug)]
pub struct CandleHistory {
    capacity: usize,
    next_seq: u64,
    candles: VecDeque<Candle>,
    pub day: DayStats,
}

impl CandleHistory {
    /// Seed a new history with `warmup` flat candles at `seed_price`.
    /// The day-stats volume accumulator starts at a random session baseline.
    pub fn with_warmup(
        seed_price: f64,
        capacity: usize,
        warmup: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let capacity = capacity.max(1);
        let mut candles = VecDeque::with_capacity(capacity.min(warmup + 1));
        let mut next_seq = 0u64;
        for _ in 0..warmup {
            candles.push_back(Candle::flat(next_seq, seed_price, WARMUP_VOLUME));
            next_seq += 1;
            if candles.len() > capacity {
                candles.pop_front();
            }
        }
        let seed_volume = (rng.gen::<f64>() * 1_000_000.0).floor();
        Self {
            capacity,
            next_seq,
            candles,
            day: DayStats::new(seed_price, seed_volume),
        }
    }

    /// Append one candle for the tick that closed at `close`.
    ///
    /// `step_bound` is the absolute volatility of the step that produced
    /// `close` (see `sim::step_bound`); high/low jitter and the day-volume
    /// increment are drawn from it. Evicts the oldest candle when the window
    /// is full.
    pub fn append(&mut self, close: f64, step_bound: f64, rng: &mut impl Rng) -> Candle {
        let open = self.candles.back().map(|c| c.close).unwrap_or(close);

        let jitter = (step_bound * 0.5).max(0.0);
        let high = open.max(close) + rng.gen::<f64>() * jitter;
        let low = open.min(close) - rng.gen::<f64>() * jitter;
        let volume = (rng.gen::<f64>() * 5000.0).floor() + 500.0;

        let candle = Candle::new(self.next_seq, open, high, low, close, volume);
        self.next_seq += 1;

        self.candles.push_back(candle);
        if self.candles.len() > self.capacity {
            self.candles.pop_front();
        }

        self.day.high_of_day = self.day.high_of_day.max(close);
        self.day.low_of_day = self.day.low_of_day.min(close);
        self.day.cumulative_volume += (rng.gen::<f64>() * 500.0).floor();

        candle
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.back()
    }

    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candle> {
        self.candles.iter()
    }

    /// Chronological copy of the window, oldest first.
    pub fn snapshot(&self) -> Vec<Candle> {
        self.candles.iter().copied().collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }
}
