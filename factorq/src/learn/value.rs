use std::{collections::HashMap, hash::Hash};

use super::DEFAULT_ESTIMATE;
use crate::arch::ActionVector;

/// Learned estimates of expected return, keyed by observation and action
/// vector (structural equality).
///
/// Keys are added on first write and never removed; reading an unseen key
/// yields [`DEFAULT_ESTIMATE`] rather than an error.
#[derive(Default)]
pub struct ValueTable<O, A> {
    estimates: HashMap<O, HashMap<ActionVector<A>, f32>>,
}

impl<O: Clone + Eq + Hash, A: Clone + Eq + Hash> ValueTable<O, A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            estimates: HashMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, observation: &O, action: &ActionVector<A>) -> f32 {
        self.estimates
            .get(observation)
            .and_then(|actions| actions.get(action))
            .copied()
            .unwrap_or(DEFAULT_ESTIMATE)
    }

    pub fn set(&mut self, observation: &O, action: &ActionVector<A>, value: f32) {
        self.estimates
            .entry(observation.clone())
            .or_default()
            .insert(action.clone(), value);
    }

    /// The best estimate among `actions`, or the default when there are none.
    #[must_use]
    pub fn best(&self, observation: &O, actions: &[ActionVector<A>]) -> f32 {
        actions
            .iter()
            .map(|action| self.get(observation, action))
            .reduce(f32::max)
            .unwrap_or(DEFAULT_ESTIMATE)
    }

    /// Number of stored estimates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.estimates.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{ActionVector, ValueTable, DEFAULT_ESTIMATE};

    #[test]
    fn unseen_keys_read_as_the_default() {
        let table: ValueTable<u32, &str> = ValueTable::new();
        assert_eq!(table.get(&7, &ActionVector::new(["jump"])), DEFAULT_ESTIMATE);
    }

    #[test]
    fn set_overwrites() {
        let mut table: ValueTable<u32, &str> = ValueTable::new();
        let action = ActionVector::new(["jump"]);
        table.set(&7, &action, 1.5);
        table.set(&7, &action, -0.5);
        assert_eq!(table.get(&7, &action), -0.5);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn keys_are_structural() {
        let mut table: ValueTable<(u32, u32), &str> = ValueTable::new();
        table.set(&(1, 2), &ActionVector::new(["a", "b"]), 3.0);
        assert_eq!(table.get(&(1, 2), &ActionVector::new(["a", "b"])), 3.0);
    }

    #[test]
    fn best_over_candidates() {
        let mut table: ValueTable<u32, &str> = ValueTable::new();
        let low = ActionVector::new(["low"]);
        let high = ActionVector::new(["high"]);
        let unseen = ActionVector::new(["unseen"]);
        table.set(&0, &low, -2.0);
        table.set(&0, &high, 4.0);

        assert_eq!(table.best(&0, &[low, high, unseen]), 4.0);
        assert_eq!(table.best(&0, &[]), DEFAULT_ESTIMATE);
    }

    #[test]
    fn best_of_all_negative_candidates_is_negative() {
        let mut table: ValueTable<u32, &str> = ValueTable::new();
        let a = ActionVector::new(["a"]);
        let b = ActionVector::new(["b"]);
        table.set(&0, &a, -2.0);
        table.set(&0, &b, -1.0);
        assert_eq!(table.best(&0, &[a, b]), -1.0);
    }
}
