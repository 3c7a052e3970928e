//! Simulated market feed: one tick event per interval on a background
//! thread. The handle stops the loop and joins the thread so no periodic
//! work survives teardown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::app::{now_unix, AppEvent, FeedEvent};
use crate::debug_hooks;

pub struct FeedHandle {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl FeedHandle {
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

pub fn start_sim_feed(tx: Sender<AppEvent>, interval: Duration) -> FeedHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();

    debug_hooks::log_feed_start(interval.as_millis() as u64);

    let join = thread::spawn(move || loop {
        thread::sleep(interval);
        if stop_flag.load(Ordering::Relaxed) {
            debug_hooks::log_feed_stop("stop flag");
            break;
        }
        let ev = AppEvent::Feed(FeedEvent::Tick {
            ts_unix: now_unix(),
        });
        if tx.send(ev).is_err() {
            // receiver gone; the session is over
            debug_hooks::log_feed_stop("channel closed");
            break;
        }
    });

    FeedHandle {
        stop,
        join: Some(join),
    }
}
