//! The per-tick pipeline. Systems run chained on a single thread in this
//! order: global factors, trade, countries, reputation, events, outcome,
//! history, time.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use sim_econ::{advance_countries, advance_global};

use crate::clock::SimClock;
use crate::events::{EventLog, EventScheduler};
use crate::history::HistoryRecorder;
use crate::outcome::OutcomeTracker;
use crate::reputation::Reputation;
use crate::resources::{Economy, Player, Rng, Settings, SimTime};

pub(crate) fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(
        (
            advance_global_factors,
            apply_trade,
            advance_economies,
            score_reputation,
            run_events,
            evaluate_outcome,
            record_history,
            advance_time,
        )
            .chain(),
    );
    schedule
}

fn advance_global_factors(
    mut economy: ResMut<Economy>,
    clock: Res<SimClock>,
    mut rng: ResMut<Rng>,
) {
    advance_global(&mut economy.global, clock.dt(), rng.source());
}

/// Trade flows are not modeled yet; the weights are carried but unread.
fn apply_trade(_economy: Res<Economy>) {}

fn advance_economies(
    mut economy: ResMut<Economy>,
    player: Res<Player>,
    clock: Res<SimClock>,
    mut rng: ResMut<Rng>,
) {
    let Economy {
        global, countries, ..
    } = &mut *economy;
    advance_countries(countries, global, player.active(), clock.dt(), rng.source());
}

fn score_reputation(
    economy: Res<Economy>,
    player: Res<Player>,
    clock: Res<SimClock>,
    mut reputation: ResMut<Reputation>,
) {
    if let Some(state) = player.country.and_then(|c| economy.countries.get(&c)) {
        reputation.score(state, clock.dt());
    }
}

fn run_events(
    time: Res<SimTime>,
    mut economy: ResMut<Economy>,
    mut scheduler: ResMut<EventScheduler>,
    mut log: ResMut<EventLog>,
    mut rng: ResMut<Rng>,
) {
    let Economy {
        global, countries, ..
    } = &mut *economy;
    scheduler.expire(time.0, countries);
    if let Some(event) = scheduler.poll(time.0, global, countries, rng.source()) {
        log.push(event);
    }
}

fn evaluate_outcome(
    time: Res<SimTime>,
    settings: Res<Settings>,
    player: Res<Player>,
    reputation: Res<Reputation>,
    mut tracker: ResMut<OutcomeTracker>,
    mut clock: ResMut<SimClock>,
    mut rng: ResMut<Rng>,
) {
    if !clock.running() || player.country.is_none() {
        return;
    }
    let ended = tracker
        .evaluate(time.0, settings.0.term_length, reputation.value(), rng.source())
        .is_some();
    if ended {
        clock.set_running(false);
    }
}

fn record_history(time: Res<SimTime>, economy: Res<Economy>, mut history: ResMut<HistoryRecorder>) {
    history.sample(time.0, &economy.countries);
}

fn advance_time(mut time: ResMut<SimTime>, clock: Res<SimClock>) {
    time.0 += clock.dt();
}
