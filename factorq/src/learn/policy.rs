use std::hash::Hash;

use ordered_float::NotNan;
use rand::{seq::SliceRandom, Rng};

use super::value::ValueTable;
use crate::arch::ActionVector;

/// Action selection balancing exploration against the current estimates.
pub trait Policy<O, A> {
    /// Choose one of `legal_actions` for `observation`.
    ///
    /// # Panics
    ///
    /// Panics when `legal_actions` is empty.
    fn select(
        &mut self,
        observation: &O,
        legal_actions: &[ActionVector<A>],
        table: &ValueTable<O, A>,
        rng: &mut impl Rng,
    ) -> ActionVector<A>;
}

/// The action with the highest estimate, ties broken by taking the first in
/// enumeration order so that runs are reproducible.
fn exploit<'a, O: Clone + Eq + Hash, A: Clone + Eq + Hash>(
    observation: &O,
    legal_actions: &'a [ActionVector<A>],
    table: &ValueTable<O, A>,
) -> &'a ActionVector<A> {
    let (first, rest) = legal_actions
        .split_first()
        .expect("there should be at least one legal action");
    let mut best = first;
    let mut best_estimate =
        NotNan::new(table.get(observation, best)).expect("estimates should not be NaN");
    for action in rest {
        let estimate =
            NotNan::new(table.get(observation, action)).expect("estimates should not be NaN");
        if estimate > best_estimate {
            best = action;
            best_estimate = estimate;
        }
    }
    best
}

/// Explore with probability epsilon, exploit otherwise. Epsilon shrinks by
/// the regression factor after every selection, flooring at zero.
pub struct EpsilonGreedy {
    epsilon: f32,
    regression: f32,
}

impl EpsilonGreedy {
    /// Use a `regression` of 1.0 to keep the exploration rate fixed.
    ///
    /// # Panics
    ///
    /// Panics unless `epsilon` is in `[0, 1]` and `regression` is in `[0, 1]`.
    #[must_use]
    pub fn new(epsilon: f32, regression: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&epsilon),
            "epsilon should be in [0, 1]"
        );
        assert!(
            (0.0..=1.0).contains(&regression),
            "regression should be in [0, 1]"
        );
        Self {
            epsilon,
            regression,
        }
    }

    /// The current exploration rate.
    #[must_use]
    pub const fn epsilon(&self) -> f32 {
        self.epsilon
    }
}

impl<O: Clone + Eq + Hash, A: Clone + Eq + Hash> Policy<O, A> for EpsilonGreedy {
    fn select(
        &mut self,
        observation: &O,
        legal_actions: &[ActionVector<A>],
        table: &ValueTable<O, A>,
        rng: &mut impl Rng,
    ) -> ActionVector<A> {
        let choice = if rng.gen::<f32>() < self.epsilon {
            legal_actions
                .choose(rng)
                .expect("there should be at least one legal action")
        } else {
            exploit(observation, legal_actions, table)
        };
        self.epsilon = (self.epsilon * self.regression).max(0.0);
        choice.clone()
    }
}

/// Pure exploitation; useful for evaluation runs on a learned table.
pub struct Greedy;

impl<O: Clone + Eq + Hash, A: Clone + Eq + Hash> Policy<O, A> for Greedy {
    fn select(
        &mut self,
        observation: &O,
        legal_actions: &[ActionVector<A>],
        table: &ValueTable<O, A>,
        _rng: &mut impl Rng,
    ) -> ActionVector<A> {
        exploit(observation, legal_actions, table).clone()
    }
}
