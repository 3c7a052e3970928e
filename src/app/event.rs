#[derive(Debug, Clone)]
pub enum AppEvent {
    Ui(UiEvent),
    Feed(FeedEvent),
    Timer(TimerEvent),
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    Login { email: String },
    Logout,
    SubscriptionToggled { ticker: String },
    Buy { ticker: String, qty: f64 },
    Sell { ticker: String, qty: f64 },
    PointerMoved { ticker: String, x: f64 },
    PointerLeft,
    SurfaceResized { width: f64, height: f64 },
    CloseRequested,
}

#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// One simulation step for the whole universe.
    Tick { ts_unix: u64 },
}

#[derive(Debug, Clone)]
pub enum TimerEvent {
    Tick1s { now_unix: u64 },
}
