pub mod event;
pub mod reducer;
pub mod render;
pub mod state;

pub use event::*;
pub use reducer::reduce;
pub use state::*;

/// Owns the app state and decides when a re-render is worth doing.
pub struct AppRuntime {
    pub state: AppState,
    dirty: bool,
    last_tick_unix: u64,
}

impl AppRuntime {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            dirty: true,
            last_tick_unix: 0,
        }
    }

    pub fn handle_event(&mut self, ev: AppEvent) {
        if reduce(&mut self.state, ev) {
            self.dirty = true;
        }
    }

    /// Inject the 1 s wall-clock tick; call from the main loop.
    pub fn tick_if_needed(&mut self) {
        let now = now_unix();
        if now != self.last_tick_unix {
            self.last_tick_unix = now;
            let ev = AppEvent::Timer(TimerEvent::Tick1s { now_unix: now });
            if reduce(&mut self.state, ev) {
                self.dirty = true;
            }
        }
    }

    pub fn render(&mut self) {
        print!("{}", render::render(&self.state));
        self.dirty = false;
    }

    pub fn render_if_dirty(&mut self) {
        if self.dirty {
            self.render();
        }
    }
}
