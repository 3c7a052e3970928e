//! Env-gated diagnostics. Set `TRADEMAX_DEBUG_HOOKS=1` to mirror hook lines
//! to `data/debug_hooks.log` and stderr; off by default so the hot tick path
//! stays silent.

use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

static ENABLED: OnceLock<bool> = OnceLock::new();
static FILE_HANDLE: OnceLock<Mutex<std::fs::File>> = OnceLock::new();

fn logging_enabled() -> bool {
    *ENABLED.get_or_init(|| {
        std::env::var("TRADEMAX_DEBUG_HOOKS")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(false)
    })
}

fn log_file() -> &'static Mutex<std::fs::File> {
    FILE_HANDLE.get_or_init(|| {
        let _ = std::fs::create_dir_all("data");
        let path = Path::new("data").join("debug_hooks.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap_or_else(|_| {
                std::fs::File::create("/tmp/trademax_debug_hooks.log").expect("fallback log create")
            });
        Mutex::new(file)
    })
}

fn log_line(topic: &str, msg: impl AsRef<str>) {
    if !logging_enabled() {
        return;
    }

    let ts = Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    let formatted = format!("[{ts}][{topic}] {}", msg.as_ref());

    if let Ok(mut f) = log_file().lock() {
        let _ = writeln!(f, "{formatted}");
    }

    eprintln!("{formatted}");
}

pub fn log_feed_start(interval_ms: u64) {
    log_line("feed.sim", format!("starting sim feed; interval={interval_ms}ms"));
}

pub fn log_feed_stop(reason: &str) {
    log_line("feed.sim", format!("stopping sim feed: {reason}"));
}

pub fn log_tick_ingest(ts_unix: u64, instruments: usize) {
    static COUNT: AtomicU64 = AtomicU64::new(0);
    let n = COUNT.fetch_add(1, Ordering::Relaxed) + 1;
    if n <= 10 || n % 60 == 0 {
        log_line(
            "market.tick",
            format!("tick #{n} ts={ts_unix} instruments={instruments}"),
        );
    }
}

pub fn log_login(user: &str) {
    log_line("session.login", user);
}

pub fn log_logout(user: &str) {
    log_line("session.logout", user);
}

pub fn log_trade(side: &str, ticker: &str, qty: f64, price: f64) {
    log_line(
        "desk.trade",
        format!("{side} {ticker} qty={qty} px={price:.2}"),
    );
}

pub fn log_trade_reject(reason: &str) {
    log_line("desk.trade.reject", reason);
}

pub fn log_hover(ticker: &str, index: usize) {
    log_line("chart.hover", format!("{ticker} index={index}"));
}

pub fn log_hover_clear(reason: &str) {
    log_line("chart.hover", format!("cleared: {reason}"));
}

pub fn log_surface_resize(width: f64, height: f64) {
    log_line("chart.surface", format!("resized to {width}x{height}"));
}

pub fn log_persist_result(result: &str, detail: impl AsRef<str>) {
    log_line("store", format!("{}: {}", result, detail.as_ref()));
}
