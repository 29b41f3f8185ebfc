//! Random world events: scheduling, classification, effects and the log.

use bevy_ecs::prelude::*;
use sim_core::{Country, CountryMap, DrawWindow, Event, GlobalFactors, RandomSource};
use std::collections::VecDeque;
use tracing::{debug, info};

const MAJOR_SHOCK_PROB: f64 = 0.1;
const COUNTRY_EVENT_PROB: f64 = 0.3;
const OIL_JUMP: f64 = 20.0;
const RISK_JUMP: f64 = 2.0;
const DOWNGRADE_VOL: f64 = 1.5;
const BOOM_GROWTH: f64 = 1.0;

const HEADLINES: [&str; 12] = [
    "G20 Summit concludes with vague promises of cooperation.",
    "IMF releases updated World Economic Outlook.",
    "Davos: Billionaires discuss inequality over canapés.",
    "Protests erupt in emerging markets over food prices.",
    "Central Bank Governors meet in Jackson Hole.",
    "New trade deal signed between regional powers.",
    "Tech sector regulation talks stall in parliament.",
    "Climate accord signed, markets react with indifference.",
    "Election season heats up in major economies.",
    "Supply chain bottlenecks reported at major ports.",
    "Youth unemployment figures spark parliamentary debate.",
    "Consumer confidence index hits a 6-month high.",
];

/// What a firing turned out to be.
#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    /// Oil jump of +20 (`up`) or -20.
    OilShock { up: bool },
    /// Global risk-aversion jump.
    MarketPanic,
    /// Temporary idiosyncratic volatility add-on for one country.
    CreditWatch(Country),
    /// Permanent growth boost for one country.
    TechBreakthrough(Country),
    /// Flavor headline with no state effect.
    Headline(&'static str),
}

impl EventKind {
    /// Classify one firing: 10% major global shock, 20% country event,
    /// 70% headline.
    pub fn draw<R: RandomSource + ?Sized>(rng: &mut R, countries: &[Country]) -> Self {
        let roll = rng.uniform();
        if roll < MAJOR_SHOCK_PROB {
            if rng.coin() {
                EventKind::OilShock { up: rng.coin() }
            } else {
                EventKind::MarketPanic
            }
        } else if roll < COUNTRY_EVENT_PROB && !countries.is_empty() {
            let target = countries[rng.index(countries.len())];
            if rng.coin() {
                EventKind::CreditWatch(target)
            } else {
                EventKind::TechBreakthrough(target)
            }
        } else {
            EventKind::Headline(HEADLINES[rng.index(HEADLINES.len())])
        }
    }

    pub fn text(&self) -> String {
        match self {
            EventKind::OilShock { up: true } => "Oil Supply Shock! Prices Spiking.".to_string(),
            EventKind::OilShock { up: false } => "Oil Price Collapse!".to_string(),
            EventKind::MarketPanic => {
                "Global Market Panic! Risk-off sentiment prevails.".to_string()
            }
            EventKind::CreditWatch(c) => format!("Credit Watch: {c} outlook negative."),
            EventKind::TechBreakthrough(c) => {
                format!("Tech breakthrough in {c}! Growth outlook upgraded.")
            }
            EventKind::Headline(text) => (*text).to_string(),
        }
    }
}

/// A temporary add-on to a country's idiosyncratic volatility, reverted once
/// simulated time reaches `expires_at`.
#[derive(Clone, Debug, PartialEq)]
pub struct TransientShock {
    pub country: Country,
    pub idio_vol: f64,
    pub expires_at: f64,
}

/// Decides when the next event fires and tracks shocks awaiting reversal.
#[derive(Resource, Clone, Debug)]
pub struct EventScheduler {
    next_event_time: f64,
    gap: DrawWindow,
    downgrade_duration: f64,
    pending: Vec<TransientShock>,
}

impl EventScheduler {
    /// Draws the first event time from `first`.
    pub fn new<R: RandomSource + ?Sized>(
        rng: &mut R,
        first: DrawWindow,
        gap: DrawWindow,
        downgrade_duration: f64,
    ) -> Self {
        Self {
            next_event_time: rng.uniform_range(first.low, first.high),
            gap,
            downgrade_duration,
            pending: Vec::new(),
        }
    }

    pub fn next_event_time(&self) -> f64 {
        self.next_event_time
    }

    pub fn pending(&self) -> &[TransientShock] {
        &self.pending
    }

    /// Revert every transient shock whose expiry has been reached.
    pub fn expire(&mut self, now: f64, countries: &mut CountryMap) -> usize {
        let before = self.pending.len();
        self.pending.retain(|shock| {
            if now < shock.expires_at {
                return true;
            }
            if let Some(s) = countries.get_mut(&shock.country) {
                s.idio_vol -= shock.idio_vol;
            }
            debug!(country = %shock.country, now, "transient shock expired");
            false
        });
        before - self.pending.len()
    }

    /// Fire if `now` has reached the scheduled time, then reschedule.
    pub fn poll<R: RandomSource + ?Sized>(
        &mut self,
        now: f64,
        global: &mut GlobalFactors,
        countries: &mut CountryMap,
        rng: &mut R,
    ) -> Option<Event> {
        if now < self.next_event_time {
            return None;
        }
        let event = self.fire(now, global, countries, rng);
        self.next_event_time = now + rng.uniform_range(self.gap.low, self.gap.high);
        Some(event)
    }

    /// Draw, apply and describe one event at simulated time `now`. Does not
    /// touch the schedule.
    pub fn fire<R: RandomSource + ?Sized>(
        &mut self,
        now: f64,
        global: &mut GlobalFactors,
        countries: &mut CountryMap,
        rng: &mut R,
    ) -> Event {
        let names: Vec<Country> = countries.keys().copied().collect();
        let kind = EventKind::draw(rng, &names);
        self.apply(&kind, now, global, countries);
        let event = Event {
            time: now,
            text: kind.text(),
        };
        info!(time = now, text = %event.text, "event fired");
        event
    }

    fn apply(
        &mut self,
        kind: &EventKind,
        now: f64,
        global: &mut GlobalFactors,
        countries: &mut CountryMap,
    ) {
        match kind {
            EventKind::OilShock { up } => {
                global.oil_jump = if *up { OIL_JUMP } else { -OIL_JUMP };
            }
            EventKind::MarketPanic => global.risk_jump = RISK_JUMP,
            EventKind::CreditWatch(c) => {
                if let Some(s) = countries.get_mut(c) {
                    s.idio_vol += DOWNGRADE_VOL;
                    self.pending.push(TransientShock {
                        country: *c,
                        idio_vol: DOWNGRADE_VOL,
                        expires_at: now + self.downgrade_duration,
                    });
                }
            }
            EventKind::TechBreakthrough(c) => {
                if let Some(s) = countries.get_mut(c) {
                    s.growth += BOOM_GROWTH;
                }
            }
            EventKind::Headline(_) => {}
        }
    }
}

/// Most-recent-first log with a fixed capacity.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct EventLog {
    capacity: usize,
    entries: VecDeque<Event>,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Prepend, dropping the oldest entry beyond capacity.
    pub fn push(&mut self, event: Event) {
        self.entries.push_front(event);
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> &VecDeque<Event> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
