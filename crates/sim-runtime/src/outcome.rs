//! Terminal win/loss state machine.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use sim_core::RandomSource;
use tracing::info;

const WIN_MESSAGES: [&str; 5] = [
    "Re-elected in a landslide! The people love you.",
    "Statue erected in your honor. A golden age!",
    "History will remember you as 'The Great'.",
    "Retired peacefully to a private island. Mission accomplished.",
    "Nobel Prize in Economics awarded for your stewardship.",
];

const LOSS_MESSAGES: [&str; 5] = [
    "Coup d'état! The military has seized the palace.",
    "Vote of No Confidence passed. You are out.",
    "Impeached for gross incompetence. Shame!",
    "Forced to resign amidst mass protests.",
    "The economy collapsed, and so did your government.",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Running,
    Won,
    Lost,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        self != Phase::Running
    }
}

/// How the player's term ended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub won: bool,
    pub reason: String,
}

/// Once the phase leaves `Running` it never returns; only a full reset
/// creates a fresh tracker. The outcome notice is held separately so a
/// host can surface it exactly once.
#[derive(Resource, Clone, Debug, Default)]
pub struct OutcomeTracker {
    phase: Phase,
    outcome: Option<Outcome>,
    notice_taken: bool,
}

impl OutcomeTracker {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The terminal outcome, if any, whether or not it has been taken.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Outcome not yet acknowledged by the host.
    pub fn pending(&self) -> Option<&Outcome> {
        if self.notice_taken {
            None
        } else {
            self.outcome.as_ref()
        }
    }

    /// Hand the outcome to the host once; later calls return `None`.
    pub fn take(&mut self) -> Option<Outcome> {
        if self.notice_taken {
            return None;
        }
        let o = self.outcome.clone()?;
        self.notice_taken = true;
        Some(o)
    }

    /// Check terminal conditions. The term expiring is checked before
    /// reputation, so a tick satisfying both ends in a win. Returns the new
    /// outcome on transition.
    pub fn evaluate<R: RandomSource + ?Sized>(
        &mut self,
        time: f64,
        term_length: f64,
        reputation: f64,
        rng: &mut R,
    ) -> Option<&Outcome> {
        if self.phase.is_terminal() {
            return None;
        }
        let won = if time >= term_length {
            true
        } else if reputation <= 0.0 {
            false
        } else {
            return None;
        };
        let pool: &[&str] = if won { &WIN_MESSAGES } else { &LOSS_MESSAGES };
        let reason = pool[rng.index(pool.len())].to_string();
        self.phase = if won { Phase::Won } else { Phase::Lost };
        info!(won, time, reputation, %reason, "term ended");
        self.outcome = Some(Outcome { won, reason });
        self.outcome.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::ScriptedSource;

    #[test]
    fn stays_running_inside_term() {
        let mut t = OutcomeTracker::default();
        let mut r = ScriptedSource::new(vec![0.0]);
        assert!(t.evaluate(5.0, 10.0, 40.0, &mut r).is_none());
        assert_eq!(t.phase(), Phase::Running);
    }

    #[test]
    fn term_expiry_wins_with_pooled_message() {
        let mut t = OutcomeTracker::default();
        let mut r = ScriptedSource::new(vec![0.45]);
        let o = t.evaluate(10.0, 10.0, 40.0, &mut r).unwrap().clone();
        assert!(o.won);
        assert_eq!(o.reason, WIN_MESSAGES[2]);
        assert_eq!(t.phase(), Phase::Won);
    }

    #[test]
    fn zero_reputation_loses() {
        let mut t = OutcomeTracker::default();
        let mut r = ScriptedSource::new(vec![0.99]);
        let o = t.evaluate(3.0, 10.0, 0.0, &mut r).unwrap().clone();
        assert!(!o.won);
        assert_eq!(o.reason, LOSS_MESSAGES[4]);
    }

    #[test]
    fn win_takes_precedence() {
        let mut t = OutcomeTracker::default();
        let mut r = ScriptedSource::new(vec![0.0]);
        assert!(t.evaluate(10.0, 10.0, 0.0, &mut r).unwrap().won);
    }

    #[test]
    fn terminal_phase_is_sticky() {
        let mut t = OutcomeTracker::default();
        let mut r = ScriptedSource::new(vec![0.0]);
        t.evaluate(3.0, 10.0, 0.0, &mut r);
        assert!(t.evaluate(20.0, 10.0, 80.0, &mut r).is_none());
        assert_eq!(t.phase(), Phase::Lost);
        assert!(!t.outcome().unwrap().won);
    }

    #[test]
    fn notice_is_taken_once() {
        let mut t = OutcomeTracker::default();
        assert!(t.take().is_none());
        let mut r = ScriptedSource::new(vec![0.0]);
        t.evaluate(10.0, 10.0, 50.0, &mut r);
        assert!(t.pending().is_some());
        assert!(t.take().unwrap().won);
        assert!(t.take().is_none());
        assert!(t.pending().is_none());
        assert_eq!(t.phase(), Phase::Won);
    }
}
