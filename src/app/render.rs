use std::fmt::Write;

use super::state::{AppState, SMA_PERIOD};
use crate::indicators;
use crate::viewport;

const SMA_TAIL_POINTS: usize = 3;

/// Text snapshot of the desk. Pure with respect to state; the runtime prints
/// it only when something changed.
pub fn render(state: &AppState) -> String {
    let mut out = String::new();

    let user = state.user.as_deref().unwrap_or("(signed out)");
    let _ = writeln!(out, "== trademax | {} | {} ==", state.current_time, user);

    if state.user.is_none() {
        if !state.login_error.is_empty() {
            let _ = writeln!(out, "login error: {}", state.login_error);
        }
        if !state.status_message.is_empty() {
            let _ = writeln!(out, "{}", state.status_message);
        }
        return out;
    }

    let _ = writeln!(
        out,
        "cash {:>12}   equity {:>12}   total {:>12}   positions {}",
        fmt_money(state.portfolio.balance),
        fmt_money(state.equity()),
        fmt_money(state.total_value()),
        state.portfolio.holdings.len()
    );

    let _ = writeln!(
        out,
        "{:<6} {:>12} {:>8} {:>12} {:>12} {:>12}",
        "TICKER", "PRICE", "DAY%", "DAY HI", "DAY LO", "DAY VOL"
    );
    for feed in state.engine.feeds() {
        let marker = if state.is_subscribed(feed.ticker()) {
            "*"
        } else {
            " "
        };
        let _ = writeln!(
            out,
            "{marker}{:<5} {:>12.2} {:>+7.2}% {:>12.2} {:>12.2} {:>12.0}",
            feed.ticker(),
            feed.price,
            feed.day_change_pct(),
            feed.history.day.high_of_day,
            feed.history.day.low_of_day,
            feed.history.day.cumulative_volume,
        );
    }

    for ticker in &state.subscriptions {
        let Some(feed) = state.engine.feed(ticker) else {
            continue;
        };
        let candles = feed.history.snapshot();
        let geo = viewport::compute_viewport(state.surface_width, state.surface_height, &candles);
        let closes = feed.history.closes();
        let tail: Vec<String> = indicators::sma(&closes, SMA_PERIOD)
            .map(|(_, v)| format!("{v:.2}"))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .take(SMA_TAIL_POINTS)
            .rev()
            .collect();

        let _ = writeln!(
            out,
            "[{ticker}] {} candles, slot {:.1}px, domain {:.2}..{:.2}, sma({SMA_PERIOD}) {}",
            candles.len(),
            geo.slot_width,
            geo.min_price,
            geo.max_price,
            if tail.is_empty() {
                "-".to_string()
            } else {
                tail.join(" ")
            }
        );

        if let Some(h) = state.hover.as_ref().filter(|h| &h.ticker == ticker) {
            if let Some((c, sma)) = state.hover_candle() {
                let sma = sma
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or_else(|| "-".to_string());
                let _ = writeln!(
                    out,
                    "  hover #{} O:{:.2} H:{:.2} L:{:.2} C:{:.2} V:{:.0} SMA:{sma}",
                    h.index, c.open, c.high, c.low, c.close, c.volume
                );
            }
        }
    }

    if !state.status_message.is_empty() {
        let _ = writeln!(out, "> {}", state.status_message);
    }

    out
}

fn fmt_money(v: f64) -> String {
    format!("${v:.2}")
}
