use serde::{Deserialize, Serialize};
use sim_core::{Country, CountryMap, Event, GlobalFactors, PlayerControls};

use crate::history::HistoryRecorder;
use crate::outcome::{Outcome, Phase};

/// Read-only view of a simulation between ticks, for hosts that render or
/// persist state.
///
/// The history buffers are only included by
/// [`Simulation::snapshot_with_history`](crate::Simulation::snapshot_with_history);
/// per-frame polling can stay small and read charts through
/// [`Simulation::history`](crate::Simulation::history) instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: f64,
    pub running: bool,
    pub speed: f64,
    pub phase: Phase,
    pub global: GlobalFactors,
    pub countries: CountryMap,
    /// Most recent first.
    pub events: Vec<Event>,
    pub reputation: f64,
    /// Terminal outcome not yet taken by the host.
    pub outcome: Option<Outcome>,
    pub player: Option<Country>,
    pub controls: PlayerControls,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoryRecorder>,
}
