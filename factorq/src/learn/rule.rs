use std::hash::Hash;

use super::value::ValueTable;
use crate::arch::ActionVector;

/// Turns one observed transition into a revised value estimate.
///
/// Rules are pure: the caller writes the returned estimate back to the table.
pub trait LearningRule<O, A> {
    fn update(
        &self,
        table: &ValueTable<O, A>,
        observation: &O,
        action: &ActionVector<A>,
        reward: f32,
        next_observation: &O,
        next_actions: &[ActionVector<A>],
    ) -> f32;
}

/// Tabular Q-learning: move the estimate towards the reward plus the
/// discounted best estimate reachable from the next observation.
pub struct QLearn {
    learning_rate: f32,
    discount_factor: f32,
}

impl QLearn {
    /// # Panics
    ///
    /// Panics unless `learning_rate` is in `(0, 1]` and `discount_factor`
    /// is in `[0, 1]`.
    #[must_use]
    pub fn new(learning_rate: f32, discount_factor: f32) -> Self {
        assert!(
            0.0 < learning_rate && learning_rate <= 1.0,
            "learning rate should be in (0, 1]"
        );
        assert!(
            (0.0..=1.0).contains(&discount_factor),
            "discount factor should be in [0, 1]"
        );
        Self {
            learning_rate,
            discount_factor,
        }
    }
}

impl<O: Clone + Eq + Hash, A: Clone + Eq + Hash> LearningRule<O, A> for QLearn {
    fn update(
        &self,
        table: &ValueTable<O, A>,
        observation: &O,
        action: &ActionVector<A>,
        reward: f32,
        next_observation: &O,
        next_actions: &[ActionVector<A>],
    ) -> f32 {
        let old_estimate = table.get(observation, action);
        let lookahead = table.best(next_observation, next_actions);
        old_estimate + self.learning_rate * (reward + self.discount_factor * lookahead - old_estimate)
    }
}
