//! Data-driven game balance
//!
//! The speed curve is the arcade difficulty ramp: every consumption
//! tightens the tick interval until the profile floor. Values match the
//! classic slow/normal/fast feel at 20 cells per 400 px board.

use serde::{Deserialize, Serialize};

/// Named speed profiles selectable from the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProfileId {
    Slow,
    #[default]
    Normal,
    Fast,
}

/// Tick interval curve for one profile, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedProfile {
    /// Interval at session start (and after restart)
    pub initial_ms: u32,
    /// Floor the interval never tightens past
    pub minimum_ms: u32,
    /// Interval reduction per consumption
    pub decrement_ms: u32,
}

pub const SLOW: SpeedProfile = SpeedProfile {
    initial_ms: 150,
    minimum_ms: 100,
    decrement_ms: 1,
};

pub const NORMAL: SpeedProfile = SpeedProfile {
    initial_ms: 100,
    minimum_ms: 50,
    decrement_ms: 2,
};

pub const FAST: SpeedProfile = SpeedProfile {
    initial_ms: 70,
    minimum_ms: 30,
    decrement_ms: 3,
};

impl ProfileId {
    pub fn profile(self) -> &'static SpeedProfile {
        match self {
            ProfileId::Slow => &SLOW,
            ProfileId::Normal => &NORMAL,
            ProfileId::Fast => &FAST,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileId::Slow => "slow",
            ProfileId::Normal => "normal",
            ProfileId::Fast => "fast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(ProfileId::Slow),
            "normal" => Some(ProfileId::Normal),
            "fast" => Some(ProfileId::Fast),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_are_well_formed() {
        for id in [ProfileId::Slow, ProfileId::Normal, ProfileId::Fast] {
            let p = id.profile();
            assert!(p.minimum_ms < p.initial_ms, "{:?}", id);
            assert!(p.decrement_ms > 0, "{:?}", id);
        }
    }

    #[test]
    fn test_profile_id_round_trip() {
        for id in [ProfileId::Slow, ProfileId::Normal, ProfileId::Fast] {
            assert_eq!(ProfileId::from_str(id.as_str()), Some(id));
        }
        assert_eq!(ProfileId::from_str("turbo"), None);
    }
}
