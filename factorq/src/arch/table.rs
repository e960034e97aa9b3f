use std::{collections::HashMap, fmt, hash::Hash};

use thiserror::Error;

/// A state-mutating effect returning its reward contribution.
pub type Effect<Env> = fn(&mut Env) -> f32;

/// Outcome of looking up an action identifier.
#[derive(Debug)]
pub enum Resolution<Env> {
    Registered(Effect<Env>),
    /// The identifier was never registered. Callers treat this as a
    /// zero-reward no-op rather than an abort.
    Unregistered,
}

/// One manipulator's repertoire: a mapping from action identifier to effect.
///
/// Identifiers enumerate in registration order so that downstream selection
/// is reproducible run to run.
pub struct ActionTable<A, Env> {
    order: Vec<A>,
    effects: HashMap<A, Effect<Env>>,
}

impl<A: Clone + Eq + Hash, Env> ActionTable<A, Env> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            effects: HashMap::new(),
        }
    }

    /// Install `effect` under `id`, overwriting any prior registration.
    /// A re-registered identifier keeps its original enumeration position.
    pub fn register(&mut self, id: A, effect: Effect<Env>) {
        if self.effects.insert(id.clone(), effect).is_none() {
            self.order.push(id);
        }
    }

    #[must_use]
    pub fn resolve(&self, id: &A) -> Resolution<Env> {
        self.effects
            .get(id)
            .map_or(Resolution::Unregistered, |&effect| {
                Resolution::Registered(effect)
            })
    }

    /// All registered identifiers, in registration order.
    #[must_use]
    pub fn legal_ids(&self) -> &[A] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<A: Clone + Eq + Hash + fmt::Debug, Env> ActionTable<A, Env> {
    /// Run the effect registered under `id`. An unregistered identifier is
    /// reported through the log facade and leaves the environment untouched.
    pub fn invoke(&self, id: &A, env: &mut Env) -> f32 {
        match self.resolve(id) {
            Resolution::Registered(effect) => effect(env),
            Resolution::Unregistered => {
                log::warn!("unimplemented action: {id:?}");
                0.0
            }
        }
    }
}

impl<A: Clone + Eq + Hash, Env> Default for ActionTable<A, Env> {
    fn default() -> Self {
        Self::new()
    }
}

/// A span registration is malformed or collides with an existing one.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SpanError {
    #[error("span start {0} is not below its end {1}")]
    Inverted(f32, f32),
    #[error("span [{0}, {1}) overlaps an existing registration")]
    Overlap(f32, f32),
}

/// Effects keyed by half-open spans `[start, end)` on a continuous axis,
/// looked up by sample point. Spans may not overlap.
pub struct IntervalTable<Env> {
    spans: Vec<(f32, f32)>,
    effects: Vec<Effect<Env>>,
}

impl<Env> IntervalTable<Env> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            spans: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Install `effect` over `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`SpanError`] when the span is inverted or overlaps a
    /// previously registered span.
    pub fn register(&mut self, start: f32, end: f32, effect: Effect<Env>) -> Result<(), SpanError> {
        if !(start < end) {
            return Err(SpanError::Inverted(start, end));
        }
        if self
            .spans
            .iter()
            .any(|&(existing_start, existing_end)| start < existing_end && existing_start < end)
        {
            return Err(SpanError::Overlap(start, end));
        }
        self.spans.push((start, end));
        self.effects.push(effect);
        Ok(())
    }

    /// The effect whose span contains `point`, if any.
    #[must_use]
    pub fn sample(&self, point: f32) -> Resolution<Env> {
        self.spans
            .iter()
            .position(|&(start, end)| start <= point && point < end)
            .map_or(Resolution::Unregistered, |index| {
                Resolution::Registered(self.effects[index])
            })
    }

    /// All registered spans, in registration order.
    #[must_use]
    pub fn spans(&self) -> &[(f32, f32)] {
        &self.spans
    }
}

impl<Env> Default for IntervalTable<Env> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{ActionTable, IntervalTable, Resolution, SpanError};

    struct Counter {
        ticks: u32,
    }

    impl Counter {
        fn tick(&mut self) -> f32 {
            self.ticks += 1;
            1.0
        }

        fn tock(&mut self) -> f32 {
            self.ticks += 2;
            2.0
        }
    }

    #[test]
    fn registration_order_is_stable() {
        let mut table: ActionTable<&str, Counter> = ActionTable::new();
        table.register("tick", Counter::tick);
        table.register("tock", Counter::tock);
        table.register("tick", Counter::tock);

        assert_eq!(table.legal_ids(), &["tick", "tock"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn register_overwrites_the_effect() {
        let mut table: ActionTable<&str, Counter> = ActionTable::new();
        table.register("tick", Counter::tick);
        table.register("tick", Counter::tock);

        let mut counter = Counter { ticks: 0 };
        assert_eq!(table.invoke(&"tick", &mut counter), 2.0);
        assert_eq!(counter.ticks, 2);
    }

    #[test]
    fn unregistered_id_resolves_to_the_sentinel() {
        let table: ActionTable<&str, Counter> = ActionTable::new();
        assert!(matches!(table.resolve(&"tick"), Resolution::Unregistered));
    }

    #[test]
    fn invoking_an_unregistered_id_leaves_the_environment_alone() {
        let mut table: ActionTable<&str, Counter> = ActionTable::new();
        table.register("tick", Counter::tick);

        let mut counter = Counter { ticks: 0 };
        assert_eq!(table.invoke(&"boom", &mut counter), 0.0);
        assert_eq!(counter.ticks, 0);
    }

    #[test]
    fn spans_must_be_oriented() {
        let mut table: IntervalTable<Counter> = IntervalTable::new();
        assert_eq!(
            table.register(1.0, 1.0, Counter::tick),
            Err(SpanError::Inverted(1.0, 1.0))
        );
    }

    #[test]
    fn spans_must_not_overlap() {
        let mut table: IntervalTable<Counter> = IntervalTable::new();
        table.register(0.0, 1.0, Counter::tick).unwrap();
        table.register(1.0, 2.0, Counter::tock).unwrap();
        assert_eq!(
            table.register(0.5, 1.5, Counter::tick),
            Err(SpanError::Overlap(0.5, 1.5))
        );
    }

    #[test]
    fn sampling_picks_the_containing_span() {
        let mut table: IntervalTable<Counter> = IntervalTable::new();
        table.register(0.0, 1.0, Counter::tick).unwrap();
        table.register(1.0, 2.0, Counter::tock).unwrap();

        let mut counter = Counter { ticks: 0 };
        let Resolution::Registered(effect) = table.sample(1.0) else {
            panic!("span [1, 2) should contain 1.0");
        };
        assert_eq!(effect(&mut counter), 2.0);
        assert!(matches!(table.sample(2.0), Resolution::Unregistered));
    }
}
