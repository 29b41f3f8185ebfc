//! ECS resources making up one simulation context.

use bevy_ecs::prelude::*;
use sim_core::{
    default_countries, Country, CountryMap, GlobalFactors, PlayerControls, RandomSource, SimConfig,
    TradeWeights,
};

/// Global factors, every country, and the (inert) trade weights.
#[derive(Resource, Clone, Debug)]
pub struct Economy {
    pub global: GlobalFactors,
    pub countries: CountryMap,
    pub trade: TradeWeights,
}

impl Default for Economy {
    fn default() -> Self {
        Self {
            global: GlobalFactors::default(),
            countries: default_countries(),
            trade: TradeWeights::default(),
        }
    }
}

/// The operator's economy and policy controls.
#[derive(Resource, Clone, Debug, Default)]
pub struct Player {
    pub country: Option<Country>,
    pub controls: PlayerControls,
}

impl Player {
    /// The player's country paired with its controls, if one is assigned.
    pub fn active(&self) -> Option<(Country, &PlayerControls)> {
        self.country.map(|c| (c, &self.controls))
    }
}

/// The single random stream every system draws from.
#[derive(Resource)]
pub struct Rng(pub Box<dyn RandomSource + Send + Sync>);

impl Rng {
    pub fn source(&mut self) -> &mut (dyn RandomSource + Send + Sync) {
        self.0.as_mut()
    }
}

/// Simulated days since the run began.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct SimTime(pub f64);

/// Configuration the context was built with.
#[derive(Resource, Clone, Debug)]
pub struct Settings(pub SimConfig);
