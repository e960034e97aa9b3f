use std::hash::Hash;

use rand::Rng;
use thiserror::Error;

use super::{policy::Policy, rule::LearningRule, value::ValueTable};
use crate::arch::ActionVector;

/// `improve` was called with no selection pending.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("improve called without a preceding evaluate")]
pub struct PrematureImprove;

/// Couples a selection policy and a learning rule over one value table.
///
/// Selections and updates alternate: [`evaluate`](Agent::evaluate) remembers
/// the pending `(observation, action)` transition which the next
/// [`improve`](Agent::improve) completes.
pub struct Agent<O, A, P, L> {
    policy: P,
    rule: L,
    table: ValueTable<O, A>,
    pending: Option<(O, ActionVector<A>)>,
}

impl<O, A, P, L> Agent<O, A, P, L>
where
    O: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
    P: Policy<O, A>,
    L: LearningRule<O, A>,
{
    #[must_use]
    pub fn new(policy: P, rule: L) -> Self {
        Self::with_table(policy, rule, ValueTable::new())
    }

    /// Start from previously seeded estimates.
    #[must_use]
    pub fn with_table(policy: P, rule: L, table: ValueTable<O, A>) -> Self {
        Self {
            policy,
            rule,
            table,
            pending: None,
        }
    }

    /// Choose an action for `observation` and remember the transition as
    /// pending. A second call before [`improve`](Agent::improve) replaces the
    /// pending transition.
    pub fn evaluate(
        &mut self,
        observation: &O,
        legal_actions: &[ActionVector<A>],
        rng: &mut impl Rng,
    ) -> ActionVector<A> {
        let action = self
            .policy
            .select(observation, legal_actions, &self.table, rng);
        self.pending = Some((observation.clone(), action.clone()));
        action
    }

    /// Fold the observed reward back into the table, completing the pending
    /// transition, and return the revised estimate.
    ///
    /// # Errors
    ///
    /// Returns [`PrematureImprove`] when no selection is pending.
    pub fn improve(
        &mut self,
        reward: f32,
        next_observation: &O,
        next_actions: &[ActionVector<A>],
    ) -> Result<f32, PrematureImprove> {
        let (observation, action) = self.pending.take().ok_or(PrematureImprove)?;
        let estimate = self.rule.update(
            &self.table,
            &observation,
            &action,
            reward,
            next_observation,
            next_actions,
        );
        self.table.set(&observation, &action, estimate);
        Ok(estimate)
    }

    #[must_use]
    pub const fn table(&self) -> &ValueTable<O, A> {
        &self.table
    }

    #[must_use]
    pub fn into_table(self) -> ValueTable<O, A> {
        self.table
    }
}
