//! Random-walk price generator.
//!
//! One step per instrument per feed tick. The step size scales with the
//! price level so percentage moves stay roughly stationary across a
//! universe that spans $0.01 penny levels and $64k coins.

use rand::Rng;

/// Default volatility coefficient: `v = price * VOLATILITY` bounds one step.
pub const DEFAULT_VOLATILITY: f64 = 0.0015;

/// Prices never go below this. Keeps percentage-return and volatility math
/// well-defined downstream.
pub const PRICE_FLOOR: f64 = 0.01;

/// Absolute step bound for a given price level.
pub fn step_bound(price: f64, volatility: f64) -> f64 {
    price * volatility
}

/// Advance the walk by one tick: `p' = max(floor, p + delta)` with `delta`
/// uniform in `[-v, v]`, `v = p * volatility`.
///
/// A zero (or negative) coefficient degenerates to `delta = 0` rather than
/// sampling an empty range.
pub fn step(prev: f64, volatility: f64, rng: &mut impl Rng) -> f64 {
    let v = step_bound(prev, volatility);
    let delta = if v > 0.0 {
        (rng.gen::<f64>() - 0.5) * 2.0 * v
    } else {
        0.0
    };
    (prev + delta).max(PRICE_FLOOR)
}
