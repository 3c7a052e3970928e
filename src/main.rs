use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;

use trademax::app::{AppEvent, AppRuntime, AppState, UiEvent};
use trademax::feed;
use trademax::market::MarketEngine;
use trademax::persist::UserStore;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    let email = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "trader@example.com".to_string());
    let seed = std::env::var("TRADEMAX_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(trademax::app::now_unix);

    let store = UserStore::new(UserStore::default_dir()?);
    let mut runtime = AppRuntime::new(AppState::new(MarketEngine::new(seed), store));
    runtime.handle_event(AppEvent::Ui(UiEvent::Login { email }));

    let (tx, rx) = mpsc::channel();
    let feed = feed::start_sim_feed(tx.clone(), TICK_INTERVAL);
    {
        let tx = tx.clone();
        ctrlc::set_handler(move || {
            let _ = tx.send(AppEvent::Ui(UiEvent::CloseRequested));
        })?;
    }

    runtime.render();
    loop {
        match rx.recv_timeout(Duration::from_millis(250)) {
            Ok(ev) => runtime.handle_event(ev),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
        runtime.tick_if_needed();
        runtime.render_if_dirty();
        if runtime.state.close_requested {
            break;
        }
    }

    feed.stop();
    runtime.handle_event(AppEvent::Ui(UiEvent::Logout));
    Ok(())
}
