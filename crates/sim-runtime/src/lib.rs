#![deny(warnings)]

//! ECS runtime for the world-economy simulation.
//!
//! A [`Simulation`] owns a `bevy_ecs` world of resources and a chained,
//! single-threaded schedule that advances it one fixed step at a time. Hosts
//! drive it with [`Simulation::tick`] from their own frame loop and read state
//! between ticks; operator input goes through the setter methods.

pub mod clock;
pub mod events;
pub mod history;
pub mod outcome;
pub mod reputation;
pub mod resources;
pub mod snapshot;
mod systems;

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;
use sim_core::{
    validate_reputation, validate_world, ChaChaSource, Country, CountryMap, CountryState, Event,
    GlobalFactors, PlayerControls, RandomSource, SimConfig, TradeWeights, ValidationError,
};
use std::collections::VecDeque;
use tracing::{info, warn};

use crate::clock::SimClock;
use crate::events::{EventLog, EventScheduler};
use crate::history::HistoryRecorder;
use crate::outcome::{Outcome, OutcomeTracker, Phase};
use crate::reputation::Reputation;
use crate::resources::{Economy, Player, Rng, Settings, SimTime};
use crate::snapshot::Snapshot;

/// One independent simulation context.
pub struct Simulation {
    world: World,
    schedule: Schedule,
}

impl Simulation {
    /// Build a context drawing from a ChaCha stream seeded with
    /// `config.rng_seed`.
    pub fn new(config: SimConfig) -> Result<Self, ValidationError> {
        let seed = config.rng_seed;
        Self::with_source(config, Box::new(ChaChaSource::seed_from_u64(seed)))
    }

    /// Build a context drawing from an injected random source.
    pub fn with_source(
        config: SimConfig,
        source: Box<dyn RandomSource + Send + Sync>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            world: populate(config, Rng(source)),
            schedule: systems::build_schedule(),
        })
    }

    /// Re-initialize every entity from the default calibration with the same
    /// configuration. The random source carries over and keeps its stream.
    /// The context comes back paused at 1x speed.
    pub fn reset(&mut self) {
        let config = self.config().clone();
        let rng = self
            .world
            .remove_resource::<Rng>()
            .unwrap_or_else(|| Rng(Box::new(ChaChaSource::seed_from_u64(config.rng_seed))));
        self.world = populate(config, rng);
        // Systems are bound to the world they were initialized against.
        self.schedule = systems::build_schedule();
        info!("simulation reset");
    }

    // --- operator input ---

    /// Hand the operator control of `name`. Unknown names are rejected and
    /// leave the context unchanged. Controls start from their defaults.
    pub fn select_player_country(&mut self, name: &str) -> Result<Country, ValidationError> {
        let country = match name.parse::<Country>() {
            Ok(c) => c,
            Err(e) => {
                warn!(name, "rejected unknown player country");
                return Err(e);
            }
        };
        let mut player = self.world.resource_mut::<Player>();
        player.country = Some(country);
        player.controls.reset_for_new_player();
        info!(%country, "player country selected");
        Ok(country)
    }

    /// Percentage points added to the player's Taylor-rule target.
    pub fn set_rate_override(&mut self, value: f64) -> Result<(), ValidationError> {
        self.update_controls("rate_override", value, |c, v| c.rate_override = v)
    }

    /// Target primary balance, % of output.
    pub fn set_fiscal_balance(&mut self, value: f64) -> Result<(), ValidationError> {
        self.update_controls("fiscal_balance", value, |c, v| c.fiscal_balance = v)
    }

    pub fn set_tariff_level(&mut self, value: f64) -> Result<(), ValidationError> {
        self.update_controls("tariff_level", value, |c, v| c.tariff_level = v)
    }

    /// Stored for hosts; the model does not read it yet.
    pub fn set_intervention(&mut self, value: f64) -> Result<(), ValidationError> {
        self.update_controls("intervention", value, |c, v| c.intervention = v)
    }

    fn update_controls(
        &mut self,
        field: &'static str,
        value: f64,
        apply: impl FnOnce(&mut PlayerControls, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            warn!(field, value, "rejected non-finite control");
            return Err(ValidationError::NonFinite {
                field: format!("controls.{field}"),
            });
        }
        apply(&mut self.world.resource_mut::<Player>().controls, value);
        info!(field, value, "control updated");
        Ok(())
    }

    /// Simulated-time multiplier; zero freezes progress without pausing.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), ValidationError> {
        if !(speed.is_finite() && speed >= 0.0) {
            warn!(speed, "rejected speed");
            return Err(ValidationError::InvalidSpeed(speed));
        }
        self.world.resource_mut::<SimClock>().set_speed(speed);
        info!(speed, "speed set");
        Ok(())
    }

    /// Start or resume. Ignored once the term has ended.
    pub fn start(&mut self) {
        if self.phase().is_terminal() {
            warn!("start ignored: term has ended");
            return;
        }
        self.world.resource_mut::<SimClock>().set_running(true);
        info!(time = self.time(), "simulation started");
    }

    pub fn pause(&mut self) {
        self.world.resource_mut::<SimClock>().set_running(false);
        info!(time = self.time(), "simulation paused");
    }

    /// Force the reputation score (clamped to [0, 100]), e.g. for scripted
    /// scenarios.
    pub fn set_reputation(&mut self, value: f64) {
        self.world.resource_mut::<Reputation>().set(value);
    }

    // --- advancing ---

    /// Reconcile `elapsed_ms` of host time into whole fixed steps and run
    /// them. Returns the number of steps executed. Stops early if the term
    /// ends mid-batch.
    pub fn tick(&mut self, elapsed_ms: f64) -> u32 {
        self.world.resource_mut::<SimClock>().accumulate(elapsed_ms);
        let mut steps = 0;
        while self.is_running() && self.world.resource_mut::<SimClock>().take_step() {
            self.schedule.run(&mut self.world);
            steps += 1;
        }
        steps
    }

    /// Run exactly one step of `config.dt` days, bypassing the accumulator.
    /// A no-op returning `false` while paused or after the term has ended.
    pub fn step(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.schedule.run(&mut self.world);
        true
    }

    /// Fire a random event now, outside the regular schedule. The next
    /// scheduled event time is not changed.
    pub fn trigger_event(&mut self) -> Event {
        let mut state: SystemState<(
            Res<SimTime>,
            ResMut<Economy>,
            ResMut<EventScheduler>,
            ResMut<EventLog>,
            ResMut<Rng>,
        )> = SystemState::new(&mut self.world);
        let (time, mut economy, mut scheduler, mut log, mut rng) = state.get_mut(&mut self.world);
        let Economy {
            global, countries, ..
        } = &mut *economy;
        let event = scheduler.fire(time.0, global, countries, rng.source());
        log.push(event.clone());
        event
    }

    // --- reading ---

    pub fn config(&self) -> &SimConfig {
        &self.world.resource::<Settings>().0
    }

    /// Simulated days elapsed.
    pub fn time(&self) -> f64 {
        self.world.resource::<SimTime>().0
    }

    pub fn is_running(&self) -> bool {
        self.world.resource::<SimClock>().running()
    }

    pub fn speed(&self) -> f64 {
        self.world.resource::<SimClock>().speed()
    }

    pub fn global(&self) -> &GlobalFactors {
        &self.world.resource::<Economy>().global
    }

    pub fn countries(&self) -> &CountryMap {
        &self.world.resource::<Economy>().countries
    }

    pub fn country(&self, country: Country) -> Option<&CountryState> {
        self.countries().get(&country)
    }

    pub fn trade_weights(&self) -> &TradeWeights {
        &self.world.resource::<Economy>().trade
    }

    pub fn player(&self) -> Option<Country> {
        self.world.resource::<Player>().country
    }

    pub fn controls(&self) -> &PlayerControls {
        &self.world.resource::<Player>().controls
    }

    pub fn reputation(&self) -> f64 {
        self.world.resource::<Reputation>().value()
    }

    /// Event log, most recent first.
    pub fn events(&self) -> &VecDeque<Event> {
        self.world.resource::<EventLog>().entries()
    }

    pub fn next_event_time(&self) -> f64 {
        self.world.resource::<EventScheduler>().next_event_time()
    }

    pub fn phase(&self) -> Phase {
        self.world.resource::<OutcomeTracker>().phase()
    }

    /// Terminal outcome not yet taken by the host.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.world.resource::<OutcomeTracker>().pending()
    }

    /// Surface the terminal outcome exactly once. The terminal phase itself
    /// persists until [`Simulation::reset`].
    pub fn take_outcome(&mut self) -> Option<Outcome> {
        self.world.resource_mut::<OutcomeTracker>().take()
    }

    pub fn history(&self) -> &HistoryRecorder {
        self.world.resource::<HistoryRecorder>()
    }

    /// Check every model floor and finiteness. A failure means the dynamics
    /// diverged.
    pub fn check_invariants(&self) -> Result<(), ValidationError> {
        validate_world(self.global(), self.countries())?;
        validate_reputation(self.reputation())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.time(),
            running: self.is_running(),
            speed: self.speed(),
            phase: self.phase(),
            global: self.global().clone(),
            countries: self.countries().clone(),
            events: self.events().iter().cloned().collect(),
            reputation: self.reputation(),
            outcome: self.outcome().cloned(),
            player: self.player(),
            controls: self.controls().clone(),
            history: None,
        }
    }

    /// [`Simulation::snapshot`] plus a copy of the history buffers.
    pub fn snapshot_with_history(&self) -> Snapshot {
        Snapshot {
            history: Some(self.history().clone()),
            ..self.snapshot()
        }
    }
}

fn populate(config: SimConfig, mut rng: Rng) -> World {
    let mut world = World::new();
    let scheduler = EventScheduler::new(
        rng.source(),
        config.first_event_window,
        config.event_gap_window,
        config.downgrade_duration,
    );
    world.insert_resource(SimClock::new(config.dt, config.real_ms_per_day));
    world.insert_resource(SimTime::default());
    world.insert_resource(Economy::default());
    world.insert_resource(Player::default());
    world.insert_resource(Reputation::new(config.initial_reputation));
    world.insert_resource(scheduler);
    world.insert_resource(EventLog::new(config.event_log_capacity));
    world.insert_resource(OutcomeTracker::default());
    world.insert_resource(HistoryRecorder::new(
        config.history_capacity,
        config.history_interval,
    ));
    world.insert_resource(Settings(config));
    world.insert_resource(rng);
    world
}
