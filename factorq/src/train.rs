use std::mem;

use rand::Rng;
use thiserror::Error;

use crate::{
    arch::{Architecture, ShapeMismatch},
    learn::{
        agent::{Agent, PrematureImprove},
        policy::Policy,
        rule::LearningRule,
    },
};

/// Window for the moving average of lap lengths.
const AVERAGE_WINDOW: usize = 100;
/// Laps at most this long count towards the performance target.
const FAST_LAP: usize = 25;

/// Progress notification emitted while training.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A positive reward ended a lap.
    Lap {
        iteration: usize,
        length: usize,
        reward: f32,
        average_length: f32,
    },
}

/// Receives training events, decoupling the loop from presentation.
pub trait Sink {
    fn record(&mut self, event: &Event);
}

/// Forwards events to the log facade.
pub struct LogSink;

impl Sink for LogSink {
    fn record(&mut self, event: &Event) {
        let Event::Lap {
            iteration,
            length,
            reward,
            average_length,
        } = event;
        log::info!(
            "lap of {length} steps at iteration {iteration} \
             (reward {reward}, average {average_length:.2})"
        );
    }
}

/// Collects events for later inspection.
impl Sink for Vec<Event> {
    fn record(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

/// Discards events.
impl Sink for () {
    fn record(&mut self, _event: &Event) {}
}

/// A contract violation that aborts the run.
#[derive(Error, Debug)]
pub enum TrainError {
    #[error(transparent)]
    Shape(#[from] ShapeMismatch),
    #[error(transparent)]
    Improve(#[from] PrematureImprove),
}

/// Summary statistics of one training run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub iterations: usize,
    /// Length of each completed lap, in iterations.
    pub laps: Vec<usize>,
    /// Laps no longer than [`FAST_LAP`] iterations.
    pub fast_laps: usize,
}

impl Report {
    /// Moving average over the most recent lap lengths, if any.
    #[must_use]
    pub fn average_lap(&self) -> Option<f32> {
        (!self.laps.is_empty()).then(|| moving_average(&self.laps, AVERAGE_WINDOW))
    }
}

fn moving_average(laps: &[usize], window: usize) -> f32 {
    let tail = &laps[laps.len().saturating_sub(window)..];
    tail.iter().sum::<usize>() as f32 / tail.len() as f32
}

/// Drive the agent through a fixed number of interactions with the
/// architecture, reporting lap statistics through `sink`.
///
/// # Errors
///
/// Aborts with [`TrainError`] when the agent and the architecture violate
/// their contract; nothing past the broken iteration is run.
pub fn train<Arch, P, L>(
    architecture: &mut Arch,
    agent: &mut Agent<Arch::Observation, Arch::ActionId, P, L>,
    iterations: usize,
    sink: &mut impl Sink,
    rng: &mut impl Rng,
) -> Result<Report, TrainError>
where
    Arch: Architecture,
    P: Policy<Arch::Observation, Arch::ActionId>,
    L: LearningRule<Arch::Observation, Arch::ActionId>,
{
    let mut report = Report {
        iterations,
        ..Report::default()
    };
    let mut lap_start = 0;

    let mut observation = architecture.initial_state();
    let mut actions = Vec::new();
    let mut next_actions = Vec::new();
    architecture.populate_actions(&mut actions);

    for iteration in 0..iterations {
        let action = agent.evaluate(&observation, &actions, rng);
        let (next_observation, reward) = architecture.interact(&action)?;
        architecture.populate_actions(&mut next_actions);
        agent.improve(reward, &next_observation, &next_actions)?;

        if reward > 0.0 {
            let length = iteration - lap_start + 1;
            report.laps.push(length);
            if length <= FAST_LAP {
                report.fast_laps += 1;
            }
            sink.record(&Event::Lap {
                iteration,
                length,
                reward,
                average_length: moving_average(&report.laps, AVERAGE_WINDOW),
            });
            lap_start = iteration + 1;
        }

        observation = next_observation;
        mem::swap(&mut actions, &mut next_actions);
    }

    Ok(report)
}
