//! Tick interval controller
//!
//! Owns the current interval, the selected profile, and the temporary
//! boost. Mutating operations report whether the interval changed so the
//! session knows when the recurring tick task must be re-armed.

use crate::consts::BOOST_DECREMENT_FACTOR;
use crate::tuning::ProfileId;

/// An active speed boost. The interval captured at activation is restored
/// verbatim on expiry, even if a profile change happened in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boost {
    prior_interval_ms: u32,
}

/// Interval state for the recurring tick timer
#[derive(Debug, Clone)]
pub struct SpeedController {
    profile: ProfileId,
    interval_ms: u32,
    boost: Option<Boost>,
}

impl SpeedController {
    pub fn new(profile: ProfileId) -> Self {
        Self {
            profile,
            interval_ms: profile.profile().initial_ms,
            boost: None,
        }
    }

    #[inline]
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    #[inline]
    pub fn profile(&self) -> ProfileId {
        self.profile
    }

    #[inline]
    pub fn boost_active(&self) -> bool {
        self.boost.is_some()
    }

    /// Switch profiles and reset the interval to the new initial value.
    /// Returns true if the interval changed (the caller's cue to re-arm
    /// the tick task). The session gates this on Running-and-not-Paused.
    pub fn select_profile(&mut self, id: ProfileId) -> bool {
        self.profile = id;
        let initial = id.profile().initial_ms;
        if self.interval_ms != initial {
            self.interval_ms = initial;
            true
        } else {
            false
        }
    }

    /// Tighten the interval by one decrement, floored at the profile
    /// minimum. Suppressed entirely while a boost is active.
    pub fn decay_on_consume(&mut self) -> bool {
        let p = self.profile.profile();
        if self.interval_ms > p.minimum_ms && self.boost.is_none() {
            self.interval_ms = (self.interval_ms - p.decrement_ms).max(p.minimum_ms);
            true
        } else {
            false
        }
    }

    /// Apply the boost reduction, remembering the interval to restore.
    /// Returns false (and does nothing) when a boost is already running;
    /// the score gate lives in the session.
    pub fn activate_boost(&mut self) -> bool {
        if self.boost.is_some() {
            return false;
        }
        let p = self.profile.profile();
        self.boost = Some(Boost {
            prior_interval_ms: self.interval_ms,
        });
        let reduction = p.decrement_ms * BOOST_DECREMENT_FACTOR;
        self.interval_ms = self.interval_ms.saturating_sub(reduction).max(p.minimum_ms);
        true
    }

    /// Restore the pre-boost interval. Returns true if a boost was
    /// actually cleared (the caller's cue to re-arm the tick task); a
    /// no-op when none is running.
    pub fn deactivate_boost(&mut self) -> bool {
        match self.boost.take() {
            Some(boost) => {
                self.interval_ms = boost.prior_interval_ms;
                true
            }
            None => false,
        }
    }

    /// Back to the selected profile's initial interval with no boost
    /// (session restart).
    pub fn reset(&mut self) {
        self.interval_ms = self.profile.profile().initial_ms;
        self.boost = None;
    }
}
