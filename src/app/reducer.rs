use super::event::*;
use super::state::*;
use crate::auth;
use crate::debug_hooks;
use crate::universe;
use crate::viewport;

pub fn reduce(state: &mut AppState, ev: AppEvent) -> bool {
    match ev {
        AppEvent::Ui(u) => reduce_ui(state, u),
        AppEvent::Feed(f) => reduce_feed(state, f),
        AppEvent::Timer(t) => reduce_timer(state, t),
    }
}

fn reduce_ui(state: &mut AppState, ev: UiEvent) -> bool {
    match ev {
        UiEvent::Login { email } => {
            if email.trim().is_empty() {
                state.login_error = "Email address is required.".to_string();
                return true;
            }
            if !auth::validate_email(&email) {
                state.login_error =
                    "Please enter a valid email address (e.g., user@example.com).".to_string();
                return true;
            }

            let user = auth::normalize_email(&email);
            let record = state.store.load(&user);
            state.subscriptions = record.subscriptions.clone();
            state.portfolio = record.to_portfolio();
            state.login_error.clear();
            state.hover = None;
            state.status_message = format!("Signed in as {user}.");
            debug_hooks::log_login(&user);
            state.user = Some(user);
            true
        }

        UiEvent::Logout => {
            if state.user.is_none() {
                return false;
            }
            if let Err(err) = state.persist_user() {
                state.status_message = format!("Save failed: {err}");
            } else {
                state.status_message = "Signed out.".to_string();
            }
            let user = state.user.take().unwrap_or_default();
            debug_hooks::log_logout(&user);
            state.subscriptions.clear();
            state.portfolio = Default::default();
            state.hover = None;
            true
        }

        UiEvent::SubscriptionToggled { ticker } => {
            if state.user.is_none() {
                state.status_message = "Sign in first.".to_string();
                return true;
            }
            if universe::instrument(&ticker).is_none() {
                state.status_message = format!("Ticker {ticker} is not available.");
                return true;
            }
            if state.is_subscribed(&ticker) {
                state.subscriptions.retain(|t| t != &ticker);
                if state
                    .hover
                    .as_ref()
                    .is_some_and(|h| h.ticker == ticker)
                {
                    state.hover = None;
                    debug_hooks::log_hover_clear("chart unsubscribed");
                }
                state.status_message = format!("Unwatched {ticker}.");
            } else {
                state.subscriptions.push(ticker.clone());
                state.status_message = format!("Watching {ticker}.");
            }
            if let Err(err) = state.persist_user() {
                state.status_message = format!("Save failed: {err}");
            }
            true
        }

        UiEvent::Buy { ticker, qty } => {
            if state.user.is_none() {
                state.status_message = "Sign in first.".to_string();
                return true;
            }
            let Some(price) = state.engine.price(&ticker) else {
                state.status_message = format!("Ticker {ticker} is not available.");
                return true;
            };
            match state.portfolio.buy(&ticker, qty, price) {
                Ok(()) => {
                    if !state.is_subscribed(&ticker) {
                        state.subscriptions.push(ticker.clone());
                    }
                    state.status_message = format!("Bought {qty} {ticker} @ {price:.2}");
                    debug_hooks::log_trade("buy", &ticker, qty, price);
                    if let Err(err) = state.persist_user() {
                        state.status_message = format!("Save failed: {err}");
                    }
                }
                Err(err) => {
                    state.status_message = err.to_string();
                    debug_hooks::log_trade_reject(&state.status_message);
                }
            }
            true
        }

        UiEvent::Sell { ticker, qty } => {
            if state.user.is_none() {
                state.status_message = "Sign in first.".to_string();
                return true;
            }
            let Some(price) = state.engine.price(&ticker) else {
                state.status_message = format!("Ticker {ticker} is not available.");
                return true;
            };
            match state.portfolio.sell(&ticker, qty, price) {
                Ok(()) => {
                    state.status_message = format!("Sold {qty} {ticker} @ {price:.2}");
                    debug_hooks::log_trade("sell", &ticker, qty, price);
                    if let Err(err) = state.persist_user() {
                        state.status_message = format!("Save failed: {err}");
                    }
                }
                Err(err) => {
                    state.status_message = err.to_string();
                    debug_hooks::log_trade_reject(&state.status_message);
                }
            }
            true
        }

        UiEvent::PointerMoved { ticker, x } => {
            let previous = state.hover.clone();
            let next = if state.is_subscribed(&ticker) {
                state.engine.feed(&ticker).and_then(|feed| {
                    let geo = viewport::compute_viewport(
                        state.surface_width,
                        state.surface_height,
                        &feed.history.snapshot(),
                    );
                    geo.hit_test(x).map(|index| HoverState {
                        ticker: ticker.clone(),
                        index,
                    })
                })
            } else {
                None
            };
            if let Some(h) = &next {
                debug_hooks::log_hover(&h.ticker, h.index);
            } else if previous.is_some() {
                debug_hooks::log_hover_clear("pointer out of range");
            }
            state.hover = next;
            state.hover != previous
        }

        UiEvent::PointerLeft => {
            if state.hover.is_none() {
                return false;
            }
            state.hover = None;
            debug_hooks::log_hover_clear("pointer left surface");
            true
        }

        UiEvent::SurfaceResized { width, height } => {
            state.surface_width = width.max(1.0);
            state.surface_height = height.max(1.0);
            debug_hooks::log_surface_resize(state.surface_width, state.surface_height);
            true
        }

        UiEvent::CloseRequested => {
            if let Err(err) = state.persist_user() {
                state.status_message = format!("Save failed: {err}");
            } else {
                state.status_message = "Session saved.".to_string();
            }
            state.close_requested = true;
            true
        }
    }
}

fn reduce_feed(state: &mut AppState, ev: FeedEvent) -> bool {
    match ev {
        FeedEvent::Tick { ts_unix } => {
            // The whole universe commits (append + evict) before anything
            // downstream reads the histories for this tick.
            let advanced = state.engine.tick_all();
            debug_hooks::log_tick_ingest(ts_unix, advanced);
            advanced > 0
        }
    }
}

fn reduce_timer(state: &mut AppState, ev: TimerEvent) -> bool {
    match ev {
        TimerEvent::Tick1s { now_unix } => {
            let new_time = format_time(now_unix);
            if state.current_time != new_time {
                state.current_time = new_time;
                return true;
            }
            false
        }
    }
}
