//! Scroll timer
//!
//! A cooperative countdown serviced from the dispatch loop whenever the
//! serial read times out. While scrolling is enabled, every tick decrements
//! the countdown; when it runs out the display scrolls one pixel and the
//! countdown reloads.
//!
//! ```text
//!          SCROLL ON
//!   Idle ────────────▶ Scrolling ──┐ tick: countdown -= 1
//!    ▲                     │  ▲    │ at 0: scroll, reload
//!    └── SCROLL OFF/RESET ─┘  └────┘
//! ```

/// Scroll timer states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollState {
    /// Display only moves on an explicit scroll command
    Idle,
    /// Display scrolls on its own while the link is idle
    Scrolling,
}

/// Cooperative scroll countdown
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollTimer {
    state: ScrollState,
    countdown: u16,
    period: u16,
}

impl ScrollTimer {
    /// Create an idle timer that fires every `period` ticks once enabled
    pub const fn new(period: u16) -> Self {
        Self {
            state: ScrollState::Idle,
            countdown: period,
            period,
        }
    }

    /// Current state
    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Returns true while automatic scrolling is enabled
    pub fn is_scrolling(&self) -> bool {
        self.state == ScrollState::Scrolling
    }

    /// Ticks left before the next scroll
    pub fn countdown(&self) -> u16 {
        self.countdown
    }

    /// Ticks between scrolls
    pub fn period(&self) -> u16 {
        self.period
    }

    /// Enable or disable scrolling
    ///
    /// Reloads the countdown either way; never scrolls by itself.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.state = if enabled {
            ScrollState::Scrolling
        } else {
            ScrollState::Idle
        };
        self.countdown = self.period;
    }

    /// Return to `Idle` with a full countdown
    pub fn reset(&mut self) {
        self.set_enabled(false);
    }

    /// Advance one tick
    ///
    /// Returns true when the display should scroll now.
    pub fn tick(&mut self) -> bool {
        if self.state == ScrollState::Idle {
            return false;
        }

        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.countdown = self.period;
            return true;
        }
        false
    }
}
