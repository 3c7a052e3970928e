//! The market engine: one aggregation context owning the random source and
//! the per-instrument feed state. All mutation funnels through `tick` /
//! `tick_all`, so a tick is fully committed (appended and evicted) before
//! anything reads the histories.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::candles::{Candle, CandleHistory, WARMUP_CANDLES, WINDOW_CAPACITY};
use crate::sim;
use crate::universe::{InstrumentInfo, UNIVERSE};

#[derive(Debug)]
pub struct InstrumentFeed {
    pub info: &'static InstrumentInfo,
    pub price: f64,
    pub history: CandleHistory,
}

impl InstrumentFeed {
    pub fn ticker(&self) -> &'static str {
        self.info.ticker
    }

    pub fn day_change_pct(&self) -> f64 {
        self.history.day.change_pct(self.price)
    }
}

#[derive(Debug)]
pub struct MarketEngine {
    volatility: f64,
    rng: StdRng,
    feeds: Vec<InstrumentFeed>,
}

impl MarketEngine {
    /// Engine over the full instrument universe with the default volatility.
    pub fn new(seed: u64) -> Self {
        Self::with_volatility(seed, sim::DEFAULT_VOLATILITY)
    }

    pub fn with_volatility(seed: u64, volatility: f64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let feeds = UNIVERSE
            .iter()
            .map(|info| InstrumentFeed {
                info,
                price: info.initial_price,
                history: CandleHistory::with_warmup(
                    info.initial_price,
                    WINDOW_CAPACITY,
                    WARMUP_CANDLES,
                    &mut rng,
                ),
            })
            .collect();
        Self {
            volatility,
            rng,
            feeds,
        }
    }

    pub fn feeds(&self) -> &[InstrumentFeed] {
        &self.feeds
    }

    pub fn feed(&self, ticker: &str) -> Option<&InstrumentFeed> {
        self.feeds.iter().find(|f| f.info.ticker == ticker)
    }

    pub fn price(&self, ticker: &str) -> Option<f64> {
        self.feed(ticker).map(|f| f.price)
    }

    /// Advance one instrument by one step: walk the price, append the candle.
    pub fn tick(&mut self, ticker: &str) -> Option<Candle> {
        let volatility = self.volatility;
        let feed = self.feeds.iter_mut().find(|f| f.info.ticker == ticker)?;
        let bound = sim::step_bound(feed.price, volatility);
        feed.price = sim::step(feed.price, volatility, &mut self.rng);
        Some(feed.history.append(feed.price, bound, &mut self.rng))
    }

    /// Advance every instrument by one step. Returns the number advanced.
    pub fn tick_all(&mut self) -> usize {
        let volatility = self.volatility;
        for feed in &mut self.feeds {
            let bound = sim::step_bound(feed.price, volatility);
            feed.price = sim::step(feed.price, volatility, &mut self.rng);
            feed.history.append(feed.price, bound, &mut self.rng);
        }
        self.feeds.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_seeds_full_universe() {
        let engine = MarketEngine::new(1);
        assert_eq!(engine.feeds().len(), UNIVERSE.len());
        for feed in engine.feeds() {
            assert_eq!(feed.price, feed.info.initial_price);
            assert_eq!(feed.history.len(), WARMUP_CANDLES);
        }
    }

    #[test]
    fn test_tick_appends_one_candle() {
        let mut engine = MarketEngine::new(2);
        let before = engine.feed("GOOG").unwrap().history.len();
        let candle = engine.tick("GOOG").unwrap();
        let feed = engine.feed("GOOG").unwrap();
        assert_eq!(feed.history.len(), before + 1);
        assert_eq!(feed.history.last().unwrap().seq, candle.seq);
        assert_eq!(candle.close, feed.price);
    }

    #[test]
    fn test_tick_unknown_ticker() {
        let mut engine = MarketEngine::new(3);
        assert!(engine.tick("DOGE").is_none());
    }

    #[test]
    fn test_tick_all_advances_every_instrument() {
        let mut engine = MarketEngine::new(4);
        assert_eq!(engine.tick_all(), UNIVERSE.len());
        for feed in engine.feeds() {
            assert_eq!(feed.history.len(), WARMUP_CANDLES + 1);
            assert!(feed.price >= crate::sim::PRICE_FLOOR);
        }
    }

    #[test]
    fn test_window_cap_after_long_run() {
        let mut engine = MarketEngine::new(5);
        for _ in 0..70 {
            engine.tick_all();
        }
        for feed in engine.feeds() {
            assert_eq!(feed.history.len(), WINDOW_CAPACITY);
        }
    }

    #[test]
    fn test_same_seed_same_market() {
        let mut a = MarketEngine::new(9);
        let mut b = MarketEngine::new(9);
        for _ in 0..25 {
            a.tick_all();
            b.tick_all();
        }
        for (fa, fb) in a.feeds().iter().zip(b.feeds()) {
            assert_eq!(fa.price, fb.price);
            let (ca, cb) = (fa.history.snapshot(), fb.history.snapshot());
            assert_eq!(ca.len(), cb.len());
            for (x, y) in ca.iter().zip(&cb) {
                assert_eq!(x.close, y.close);
                assert_eq!(x.volume, y.volume);
            }
        }
    }

    #[test]
    fn test_zero_volatility_market_is_flat() {
        let mut engine = MarketEngine::with_volatility(6, 0.0);
        for _ in 0..70 {
            engine.tick_all();
        }
        for feed in engine.feeds() {
            assert_eq!(feed.price, feed.info.initial_price);
            assert_eq!(feed.history.day.high_of_day, feed.info.initial_price);
            assert_eq!(feed.history.day.low_of_day, feed.info.initial_price);
            for c in feed.history.iter() {
                assert_eq!(c.close, feed.info.initial_price);
                assert_eq!(c.high, c.low);
            }
        }
    }
}
