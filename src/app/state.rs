use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Local, TimeZone};

use crate::candles::Candle;
use crate::indicators;
use crate::market::MarketEngine;
use crate::persist::{UserRecord, UserStore};
use crate::portfolio::Portfolio;

/// Overlay period for the trend line.
pub const SMA_PERIOD: usize = 20;

/// Surface dimensions before the layout host reports real ones.
pub const DEFAULT_SURFACE_WIDTH: f64 = 600.0;
pub const DEFAULT_SURFACE_HEIGHT: f64 = 300.0;

/// The candle under the pointer; at most one exists at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverState {
    pub ticker: String,
    pub index: usize,
}

pub struct AppState {
    pub user: Option<String>,
    pub login_error: String,

    pub engine: MarketEngine,
    pub subscriptions: Vec<String>,
    pub portfolio: Portfolio,
    pub store: UserStore,

    pub surface_width: f64,
    pub surface_height: f64,
    pub hover: Option<HoverState>,

    pub current_time: String,
    pub status_message: String,
    pub close_requested: bool,
}

impl AppState {
    pub fn new(engine: MarketEngine, store: UserStore) -> Self {
        Self {
            user: None,
            login_error: String::new(),
            engine,
            subscriptions: Vec::new(),
            portfolio: Portfolio::default(),
            store,
            surface_width: DEFAULT_SURFACE_WIDTH,
            surface_height: DEFAULT_SURFACE_HEIGHT,
            hover: None,
            current_time: String::new(),
            status_message: String::new(),
            close_requested: false,
        }
    }

    pub fn is_subscribed(&self, ticker: &str) -> bool {
        self.subscriptions.iter().any(|t| t == ticker)
    }

    pub fn equity(&self) -> f64 {
        self.portfolio.equity(|t| self.engine.price(t))
    }

    pub fn total_value(&self) -> f64 {
        self.portfolio.total_value(|t| self.engine.price(t))
    }

    /// Write the logged-in user's record; a logged-out state is a no-op.
    pub fn persist_user(&self) -> anyhow::Result<()> {
        let Some(user) = self.user.as_deref() else {
            return Ok(());
        };
        let record = UserRecord::from_session(&self.subscriptions, &self.portfolio);
        self.store.save(user, &record)
    }

    /// The hovered candle plus its SMA value, if a selection exists.
    pub fn hover_candle(&self) -> Option<(Candle, Option<f64>)> {
        let hover = self.hover.as_ref()?;
        let feed = self.engine.feed(&hover.ticker)?;
        let candle = *feed.history.get(hover.index)?;
        let sma = indicators::sma_at(&feed.history.closes(), SMA_PERIOD, hover.index);
        Some((candle, sma))
    }
}

/// unix seconds
pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

pub fn format_time(ts: u64) -> String {
    match Local.timestamp_opt(ts as i64, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("unix:{ts}"),
    }
}
