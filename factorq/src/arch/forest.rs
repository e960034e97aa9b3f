use super::{
    product_into,
    table::ActionTable,
    ActionVector,
    Architecture,
    ShapeMismatch,
};

/// Wood volume an infinitely old stand approaches.
const VOLUME_CAP: f32 = 10.0;
/// Age at which the stand holds half of [`VOLUME_CAP`].
const HALF_GROWTH_AGE: f32 = 5.0;

/// An even-aged tree stand, advanced one year at a time.
#[derive(Default)]
pub struct Forest {
    tree_age: u32,
}

impl Forest {
    #[must_use]
    pub const fn new() -> Self {
        Self { tree_age: 0 }
    }

    #[must_use]
    pub const fn tree_age(&self) -> u32 {
        self.tree_age
    }

    /// Standing wood volume; saturating, so marginal growth falls with age.
    #[must_use]
    pub fn volume(&self) -> f32 {
        let age = self.tree_age as f32;
        VOLUME_CAP * age / (age + HALF_GROWTH_AGE)
    }

    /// Let the stand grow for a year.
    pub fn wait_one_more_year(&mut self) -> f32 {
        self.tree_age += 1;
        0.0
    }

    /// Fell the stand, harvest its volume, and replant.
    pub fn cut_down_trees(&mut self) -> f32 {
        let harvested = self.volume();
        self.tree_age = 0;
        harvested
    }
}

/// What the grower does with the stand this year.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Tend {
    Wait,
    Harvest,
}

/// Single-manipulator architecture managing a [`Forest`] through one grower.
pub struct WoodCutter {
    forest: Forest,
    grower: ActionTable<Tend, Forest>,
    initial_age: u32,
}

impl WoodCutter {
    #[must_use]
    pub fn new(forest: Forest) -> Self {
        let initial_age = forest.tree_age();
        let mut grower = ActionTable::new();
        grower.register(Tend::Wait, Forest::wait_one_more_year);
        grower.register(Tend::Harvest, Forest::cut_down_trees);
        Self {
            forest,
            grower,
            initial_age,
        }
    }

    #[must_use]
    pub const fn forest(&self) -> &Forest {
        &self.forest
    }
}

impl Default for WoodCutter {
    fn default() -> Self {
        Self::new(Forest::new())
    }
}

impl Architecture for WoodCutter {
    type ActionId = Tend;
    type Observation = u32;

    fn manipulator_count(&self) -> usize {
        1
    }

    fn populate_actions(&self, actions: &mut Vec<ActionVector<Tend>>) {
        product_into(&[self.grower.legal_ids()], actions);
    }

    fn interact(&mut self, action: &ActionVector<Tend>) -> Result<(u32, f32), ShapeMismatch> {
        ShapeMismatch::check(self.manipulator_count(), action.len())?;
        let reward = action
            .components()
            .iter()
            .map(|tend| self.grower.invoke(tend, &mut self.forest))
            .sum();
        Ok((self.forest.tree_age(), reward))
    }

    fn initial_state(&self) -> u32 {
        self.initial_age
    }
}

#[cfg(test)]
mod tests {
    use super::{ActionVector, Architecture, Forest, Tend, WoodCutter};

    #[test]
    fn waiting_ages_the_stand_for_free() {
        let mut arch = WoodCutter::default();
        let (observation, reward) = arch.interact(&ActionVector::new([Tend::Wait])).unwrap();
        assert_eq!((observation, reward), (1, 0.0));
    }

    #[test]
    fn harvesting_pays_the_volume_and_replants() {
        let mut arch = WoodCutter::default();
        for _ in 0..5 {
            arch.interact(&ActionVector::new([Tend::Wait])).unwrap();
        }
        let expected = arch.forest().volume();
        assert!(expected > 0.0);

        let (observation, reward) = arch.interact(&ActionVector::new([Tend::Harvest])).unwrap();
        assert_eq!(observation, 0);
        assert_eq!(reward, expected);
    }

    #[test]
    fn older_stands_yield_more_but_saturate() {
        let mut young = Forest::new();
        let mut old = Forest::new();
        for _ in 0..3 {
            young.wait_one_more_year();
        }
        for _ in 0..30 {
            old.wait_one_more_year();
        }
        assert!(young.volume() < old.volume());
        assert!(old.volume() < super::VOLUME_CAP);
    }

    #[test]
    fn both_tending_choices_are_always_legal() {
        let arch = WoodCutter::default();
        let mut actions = Vec::new();
        arch.populate_actions(&mut actions);
        assert_eq!(actions, vec![
            ActionVector::new([Tend::Wait]),
            ActionVector::new([Tend::Harvest]),
        ]);
    }
}
