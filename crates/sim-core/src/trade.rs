use std::collections::BTreeMap;

use crate::Country;

/// Bilateral trade weights between distinct countries.
///
/// Every ordered pair of distinct countries carries a weight, but nothing in
/// the model reads them yet; the trade step in the tick pipeline is a no-op.
#[derive(Clone, Debug, PartialEq)]
pub struct TradeWeights {
    weights: BTreeMap<(Country, Country), f64>,
}

impl TradeWeights {
    /// Base weight assigned between every pair.
    pub const BASE_WEIGHT: f64 = 0.1;

    /// Same weight for every ordered pair of distinct countries.
    pub fn uniform(weight: f64) -> Self {
        let mut weights = BTreeMap::new();
        for from in Country::ALL {
            for to in Country::ALL {
                if from != to {
                    weights.insert((from, to), weight);
                }
            }
        }
        Self { weights }
    }

    /// Weight of `from`'s trade with `to`; `None` on the diagonal.
    pub fn weight(&self, from: Country, to: Country) -> Option<f64> {
        self.weights.get(&(from, to)).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Default for TradeWeights {
    fn default() -> Self {
        Self::uniform(Self::BASE_WEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_diagonal_only() {
        let w = TradeWeights::default();
        assert_eq!(w.len(), 8 * 7);
        assert_eq!(w.weight(Country::China, Country::China), None);
        assert_eq!(w.weight(Country::China, Country::Japan), Some(0.1));
    }
}
