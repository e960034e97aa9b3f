use std::{fmt, hash::Hash};

use thiserror::Error;

pub mod forest;
pub mod maze;
pub mod table;

/// One choice per manipulator, in the architecture's manipulator order.
///
/// Vectors compare and hash structurally so they can key a value table.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ActionVector<A>(Box<[A]>);

impl<A> ActionVector<A> {
    #[must_use]
    pub fn new(components: impl Into<Box<[A]>>) -> Self {
        Self(components.into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn components(&self) -> &[A] {
        &self.0
    }
}

impl<A> From<Vec<A>> for ActionVector<A> {
    fn from(components: Vec<A>) -> Self {
        Self(components.into_boxed_slice())
    }
}

/// An action vector's arity does not match the manipulator count.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("action vector has {found} components but the architecture has {expected} manipulators")]
pub struct ShapeMismatch {
    pub expected: usize,
    pub found: usize,
}

impl ShapeMismatch {
    /// # Errors
    ///
    /// Returns the mismatch when `found` differs from `expected`.
    pub const fn check(expected: usize, found: usize) -> Result<(), Self> {
        if expected == found {
            Ok(())
        } else {
            Err(Self { expected, found })
        }
    }
}

/// A set of independently controlled manipulators wrapping one environment.
///
/// The vectors yielded by [`populate_actions`](Architecture::populate_actions)
/// are exactly the vectors [`interact`](Architecture::interact) accepts on the
/// same instance at the same state.
pub trait Architecture {
    type Observation: Clone + Eq + Hash + fmt::Debug;
    type ActionId: Clone + Eq + Hash + fmt::Debug;

    /// Number of independently controlled manipulators.
    fn manipulator_count(&self) -> usize;

    /// Replace `actions` with every currently legal action vector, the
    /// Cartesian product of the manipulators' legal identifier sets.
    fn populate_actions(&self, actions: &mut Vec<ActionVector<Self::ActionId>>);

    /// Execute one composite action, mutating the environment, and observe.
    /// Rewards of the individual manipulator effects are summed.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeMismatch`] when the vector's arity is wrong.
    fn interact(
        &mut self,
        action: &ActionVector<Self::ActionId>,
    ) -> Result<(Self::Observation, f32), ShapeMismatch>;

    /// The observation the environment starts in.
    fn initial_state(&self) -> Self::Observation;
}

/// Replace `out` with the Cartesian product of the given legal sets, one
/// component drawn from each set in order. An empty factor yields no vectors;
/// no factors yield the single empty vector.
pub fn product_into<A: Clone>(legal: &[&[A]], out: &mut Vec<ActionVector<A>>) {
    out.clear();
    if legal.iter().any(|set| set.is_empty()) {
        return;
    }

    let mut indices = vec![0_usize; legal.len()];
    loop {
        out.push(
            legal
                .iter()
                .zip(&indices)
                .map(|(set, &i)| set[i].clone())
                .collect::<Vec<_>>()
                .into(),
        );

        // Advance the rightmost index that has room, like an odometer.
        let mut dimension = legal.len();
        loop {
            if dimension == 0 {
                return;
            }
            dimension -= 1;
            indices[dimension] += 1;
            if indices[dimension] < legal[dimension].len() {
                break;
            }
            indices[dimension] = 0;
        }
    }
}

#[cfg(test)]
pub mod rover {
    use super::{product_into, table::ActionTable, ActionVector, Architecture, ShapeMismatch};

    /// Cart on a rail with a headlamp, controlled by two manipulators.
    #[derive(Default)]
    pub struct Rover {
        position: i32,
        lit: bool,
    }

    impl Rover {
        fn forward(&mut self) -> f32 {
            self.position += 1;
            f32::from(self.position == 3) * 5.0
        }

        fn reverse(&mut self) -> f32 {
            self.position -= 1;
            0.0
        }

        fn lamp_on(&mut self) -> f32 {
            self.lit = true;
            0.0
        }

        fn lamp_off(&mut self) -> f32 {
            self.lit = false;
            0.0
        }
    }

    pub struct RailRover {
        rover: Rover,
        drive: ActionTable<&'static str, Rover>,
        lamp: ActionTable<&'static str, Rover>,
    }

    impl Default for RailRover {
        fn default() -> Self {
            let mut drive = ActionTable::new();
            drive.register("forward", Rover::forward);
            drive.register("reverse", Rover::reverse);
            let mut lamp = ActionTable::new();
            lamp.register("on", Rover::lamp_on);
            lamp.register("off", Rover::lamp_off);
            Self {
                rover: Rover::default(),
                drive,
                lamp,
            }
        }
    }

    impl Architecture for RailRover {
        type ActionId = &'static str;
        type Observation = (i32, bool);

        fn manipulator_count(&self) -> usize {
            2
        }

        fn populate_actions(&self, actions: &mut Vec<ActionVector<&'static str>>) {
            product_into(&[self.drive.legal_ids(), self.lamp.legal_ids()], actions);
        }

        fn interact(
            &mut self,
            action: &ActionVector<&'static str>,
        ) -> Result<((i32, bool), f32), ShapeMismatch> {
            ShapeMismatch::check(self.manipulator_count(), action.len())?;
            let mut components = action.components().iter();
            let mut reward = 0.0;
            reward += self
                .drive
                .invoke(components.next().unwrap(), &mut self.rover);
            reward += self
                .lamp
                .invoke(components.next().unwrap(), &mut self.rover);
            Ok(((self.rover.position, self.rover.lit), reward))
        }

        fn initial_state(&self) -> (i32, bool) {
            (0, false)
        }
    }
}
