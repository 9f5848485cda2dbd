//! Responsive breakpoint state machine.
//!
//! # State Machine
//!
//! ```text
//!            width < 500
//!   Wide ─────────────────▶ Narrow   (force Compact, remember previous code)
//!        ◀─────────────────
//!            width ≥ 500              (restore previous code)
//! ```
//!
//! Transitions are edge-triggered: repeated samples on the same side of the
//! breakpoint do nothing. While a transition is being applied, further samples
//! are not evaluated; the latest one is kept and replayed once the transition
//! finishes.

/// Container width below which compact mode is forced, in pixels.
pub const BREAKPOINT_PX: f64 = 500.0;

/// Which side of the breakpoint the container is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Breakpoint {
    #[default]
    Wide,
    Narrow,
}

impl Breakpoint {
    /// Classifies a width. Unmeasured containers (width ≤ 0) count as wide.
    #[must_use]
    pub fn of_width(width: f64) -> Self {
        if width > 0.0 && width < BREAKPOINT_PX {
            Self::Narrow
        } else {
            Self::Wide
        }
    }
}

/// A crossing of the breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    EnterNarrow,
    LeaveNarrow,
}

/// Edge-triggered breakpoint tracker with deferred re-entrant samples.
#[derive(Debug, Clone, Default)]
pub struct ResponsiveController {
    state: Breakpoint,
    in_flight: bool,
    pending: Option<f64>,
}

impl ResponsiveController {
    #[must_use]
    pub const fn new(state: Breakpoint) -> Self {
        Self {
            state,
            in_flight: false,
            pending: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> Breakpoint {
        self.state
    }

    #[must_use]
    pub const fn is_narrow(&self) -> bool {
        matches!(self.state, Breakpoint::Narrow)
    }

    #[must_use]
    pub const fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Evaluates a width sample.
    ///
    /// Returns the transition to apply, after which the caller must call
    /// [`finish`](Self::finish). Samples arriving while a transition is in
    /// flight are deferred and `None` is returned.
    pub fn begin(&mut self, width: f64) -> Option<Transition> {
        if self.in_flight {
            tracing::debug!(width = width, "resize sample deferred");
            self.pending = Some(width);
            return None;
        }

        let next = Breakpoint::of_width(width);
        if next == self.state {
            return None;
        }

        self.in_flight = true;
        self.state = next;
        Some(match next {
            Breakpoint::Narrow => Transition::EnterNarrow,
            Breakpoint::Wide => Transition::LeaveNarrow,
        })
    }

    /// Completes the in-flight transition and returns the deferred sample, if any.
    pub fn finish(&mut self) -> Option<f64> {
        self.in_flight = false;
        self.pending.take()
    }
}
