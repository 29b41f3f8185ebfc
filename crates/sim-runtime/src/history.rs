//! Decimated, capacity-bounded time series of every country for charting.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use sim_core::{Country, CountryMap, CountryState};
use std::collections::{BTreeMap, VecDeque};
use tracing::trace;

/// Tracked per-country series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Series {
    Growth,
    Inflation,
    Debt,
    Fx,
    Equity,
    NominalOutput,
    RealOutput,
    Rate,
}

impl Series {
    pub const ALL: [Series; 8] = [
        Series::Growth,
        Series::Inflation,
        Series::Debt,
        Series::Fx,
        Series::Equity,
        Series::NominalOutput,
        Series::RealOutput,
        Series::Rate,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn read(self, s: &CountryState) -> f64 {
        match self {
            Series::Growth => s.growth,
            Series::Inflation => s.inflation,
            Series::Debt => s.debt,
            Series::Fx => s.fx,
            Series::Equity => s.equity,
            Series::NominalOutput => s.nominal_output,
            Series::RealOutput => s.real_output,
            Series::Rate => s.rate,
        }
    }
}

/// The eight series of one country, aligned with the shared time axis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CountrySeries {
    values: [VecDeque<f64>; 8],
}

impl CountrySeries {
    pub fn get(&self, series: Series) -> &VecDeque<f64> {
        &self.values[series.index()]
    }

    fn push(&mut self, s: &CountryState) {
        for series in Series::ALL {
            self.values[series.index()].push_back(series.read(s));
        }
    }

    fn pop_front(&mut self) {
        for v in &mut self.values {
            v.pop_front();
        }
    }
}

/// Samples all countries whenever simulated time enters a new
/// `interval`-sized bucket. Several ticks inside one bucket coalesce into a
/// single sample, and a tick that skips buckets still produces only one.
/// When the time axis exceeds `capacity`, the oldest sample is dropped from
/// every series at once.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecorder {
    capacity: usize,
    interval: f64,
    last_bucket: Option<i64>,
    time: VecDeque<f64>,
    countries: BTreeMap<Country, CountrySeries>,
}

impl HistoryRecorder {
    pub fn new(capacity: usize, interval: f64) -> Self {
        Self {
            capacity,
            interval,
            last_bucket: None,
            time: VecDeque::with_capacity(capacity + 1),
            countries: BTreeMap::new(),
        }
    }

    /// Record a sample if `time` falls in a later bucket than the last one.
    /// Returns whether a sample was taken.
    pub fn sample(&mut self, time: f64, countries: &CountryMap) -> bool {
        let bucket = (time / self.interval).floor() as i64;
        if self.last_bucket.is_some_and(|last| bucket <= last) {
            return false;
        }
        self.last_bucket = Some(bucket);
        self.time.push_back(time);
        for (country, state) in countries {
            self.countries.entry(*country).or_default().push(state);
        }
        if self.time.len() > self.capacity {
            self.time.pop_front();
            for series in self.countries.values_mut() {
                series.pop_front();
            }
            trace!(time, "history evicted oldest sample");
        }
        true
    }

    /// Shared time axis, oldest first.
    pub fn time(&self) -> &VecDeque<f64> {
        &self.time
    }

    pub fn country(&self, country: Country) -> Option<&CountrySeries> {
        self.countries.get(&country)
    }

    pub fn series(&self, country: Country, series: Series) -> Option<&VecDeque<f64>> {
        self.country(country).map(|c| c.get(series))
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::default_countries;

    #[test]
    fn first_call_always_samples() {
        let mut h = HistoryRecorder::new(500, 0.2);
        assert!(h.sample(0.0, &default_countries()));
        assert_eq!(h.len(), 1);
        assert_eq!(h.series(Country::Japan, Series::Debt).unwrap()[0], 250.0);
    }

    #[test]
    fn ticks_within_a_bucket_coalesce() {
        let mut h = HistoryRecorder::new(500, 0.2);
        let countries = default_countries();
        let mut taken = 0;
        for k in 0..40 {
            if h.sample(k as f64 * 0.05, &countries) {
                taken += 1;
            }
        }
        assert_eq!(taken, 10);
    }

    #[test]
    fn a_large_gap_yields_one_sample() {
        let mut h = HistoryRecorder::new(500, 0.2);
        let countries = default_countries();
        h.sample(0.0, &countries);
        assert!(h.sample(5.0, &countries));
        assert!(!h.sample(5.1, &countries));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn eviction_is_fifo_and_synchronized() {
        let mut h = HistoryRecorder::new(500, 0.2);
        let mut countries = default_countries();
        for k in 0..1200 {
            countries.get_mut(&Country::China).unwrap().growth = k as f64;
            h.sample(k as f64 * 0.2 + 0.1, &countries);
        }
        assert_eq!(h.len(), 500);
        for c in Country::ALL {
            for s in Series::ALL {
                assert_eq!(h.series(c, s).unwrap().len(), 500);
            }
        }
        let growth = h.series(Country::China, Series::Growth).unwrap();
        assert_eq!(growth.front(), Some(&700.0));
        assert_eq!(growth.back(), Some(&1199.0));
        assert!((h.time().front().unwrap() - (700.0 * 0.2 + 0.1)).abs() < 1e-9);
    }
}
