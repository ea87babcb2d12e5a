//! Dwell debouncer: commits a new [`Mode`] only after the tracker has stayed
//! in it for an uninterrupted dwell period.
//!
//! The rule runtime owns the live state; this module is the reference model
//! of the two-state machine that the compiled dwell rules encode:
//!
//! - **location update**: classify the new value. Equal to the committed
//!   mode cancels any pending dwell. A candidate different from the pending
//!   one (or no pending dwell) restarts the single dwell timer.
//! - **timer elapsed**: classify the *current* value again. Still different
//!   from the committed mode commits it, otherwise the dwell is discarded.
//!
//! A timer handle that has been superseded by a restart can never commit.

use crate::classifier::classify;
use crate::mode::Mode;
use crate::time::DwellDuration;
use crate::zone::ZoneRuleSet;

/// Identifies one run of the dwell timer. Every restart issues a new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwellPhase {
    Stable,
    Dwelling { candidate: Mode, timer: TimerHandle },
}

/// What a location update did to the dwell timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwellEffect {
    /// Candidate equals the committed mode and nothing was pending.
    Unchanged,
    /// Candidate equals the committed mode; the pending dwell was cancelled.
    Cancelled,
    /// A new dwell run started, superseding any previous one.
    Started(TimerHandle),
    /// Same pending candidate; the running timer keeps counting.
    Kept(TimerHandle),
}

/// Result of a timer-elapsed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwellOutcome {
    Committed { from: Mode, to: Mode },
    /// The current value classifies as the committed mode again.
    Discarded,
    /// The handle is not the running timer.
    Stale,
}

/// The dwell state machine for one installation.
#[derive(Debug, Clone)]
pub struct DwellDebouncer {
    rules: ZoneRuleSet,
    duration: DwellDuration,
    committed: Mode,
    phase: DwellPhase,
    generation: u64,
}

impl DwellDebouncer {
    /// Start `STABLE` with [`Mode::Unknown`] committed.
    #[must_use]
    pub fn new(rules: ZoneRuleSet, duration: DwellDuration) -> Self {
        Self {
            rules,
            duration,
            committed: Mode::default(),
            phase: DwellPhase::Stable,
            generation: 0,
        }
    }

    #[must_use]
    pub fn with_committed(mut self, mode: Mode) -> Self {
        self.committed = mode;
        self
    }

    #[must_use]
    pub fn committed(&self) -> Mode {
        self.committed
    }

    #[must_use]
    pub fn phase(&self) -> DwellPhase {
        self.phase
    }

    #[must_use]
    pub fn duration(&self) -> DwellDuration {
        self.duration
    }

    pub fn on_location_update(&mut self, location_value: &str) -> DwellEffect {
        let candidate = classify(location_value, &self.rules);
        if candidate == self.committed {
            let was_dwelling = matches!(self.phase, DwellPhase::Dwelling { .. });
            self.phase = DwellPhase::Stable;
            return if was_dwelling {
                DwellEffect::Cancelled
            } else {
                DwellEffect::Unchanged
            };
        }
        if let DwellPhase::Dwelling {
            candidate: pending,
            timer,
        } = self.phase
        {
            if pending == candidate {
                return DwellEffect::Kept(timer);
            }
        }
        self.generation += 1;
        let timer = TimerHandle(self.generation);
        self.phase = DwellPhase::Dwelling { candidate, timer };
        DwellEffect::Started(timer)
    }

    /// Handle expiry of `timer`, re-reading `current_value` rather than
    /// trusting the candidate captured when the timer started.
    pub fn on_timer_elapsed(&mut self, timer: TimerHandle, current_value: &str) -> DwellOutcome {
        match self.phase {
            DwellPhase::Dwelling { timer: running, .. } if running == timer => {}
            _ => return DwellOutcome::Stale,
        }
        self.phase = DwellPhase::Stable;
        let candidate = classify(current_value, &self.rules);
        if candidate == self.committed {
            return DwellOutcome::Discarded;
        }
        let from = self.committed;
        self.committed = candidate;
        DwellOutcome::Committed {
            from,
            to: candidate,
        }
    }
}
