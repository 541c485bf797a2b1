use ::domain::Timestamp;
use ::use_cases::gateways::Clock;

/// Real time.
pub struct SystemClock {
    started: ::std::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { started: ::std::time::Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn wall(&self) -> Timestamp {
        ::std::time::SystemTime::now()
    }

    fn monotonic_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Hand-cranked time for tests and the demo loop: both the wall clock and
/// the monotonic counter move only through `advance`.
pub struct ManualClock {
    state: ::std::sync::Mutex<ManualClockState>,
}

struct ManualClockState {
    wall: Timestamp,
    monotonic_ms: u64,
}

impl ManualClock {
    pub fn starting_at(wall: Timestamp) -> Self {
        Self { state: ::std::sync::Mutex::new(ManualClockState { wall, monotonic_ms: 0 }) }
    }

    pub fn advance(&self, duration: ::std::time::Duration) {
        let mut state = self.state.lock().unwrap();
        state.wall += duration;
        state.monotonic_ms += duration.as_millis() as u64;
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(::std::time::Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn wall(&self) -> Timestamp {
        self.state.lock().unwrap().wall
    }

    fn monotonic_ms(&self) -> u64 {
        self.state.lock().unwrap().monotonic_ms
    }
}
