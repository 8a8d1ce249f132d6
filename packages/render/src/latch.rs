//! Fetch latch for render requests.
//!
//! ```text
//! Idle ──begin──► Fetching ──finish(show)──► Displaying ──close──► Idle
//!                    │
//!                    └──finish(hide)──► Idle
//! ```
//!
//! `begin` while a fetch is running is coalesced: it returns `false` and
//! the caller must not start another request.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatchState {
    #[default]
    Idle,
    Fetching,
    Displaying,
}

#[derive(Debug, Default)]
pub struct FetchLatch {
    state: LatchState,
}

impl FetchLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LatchState {
        self.state
    }

    /// Start a fetch. `false` when one is already running.
    ///
    /// A new fetch from `Displaying` replaces what is shown.
    pub fn begin(&mut self) -> bool {
        match self.state {
            LatchState::Fetching => {
                debug!("Render already in flight, coalescing trigger");
                false
            }
            LatchState::Idle | LatchState::Displaying => {
                self.state = LatchState::Fetching;
                true
            }
        }
    }

    /// End the running fetch; `display` keeps the result on screen
    pub fn finish(&mut self, display: bool) {
        if self.state == LatchState::Fetching {
            self.state = if display {
                LatchState::Displaying
            } else {
                LatchState::Idle
            };
        }
    }

    /// Leave the display
    pub fn close(&mut self) {
        if self.state == LatchState::Displaying {
            self.state = LatchState::Idle;
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.state == LatchState::Fetching
    }
}
