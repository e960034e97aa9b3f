use clap::{Parser, ValueEnum};
use factorq::{
    arch::{forest::WoodCutter, maze::MazeNavigator, Architecture},
    learn::{agent::Agent, policy::EpsilonGreedy, rule::QLearn},
    train::{train, LogSink, Report, TrainError},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Parser, Debug)]
struct Args {
    /// Which demonstration architecture to train on.
    #[arg(long, value_enum, default_value_t = Scenario::Maze)]
    scenario: Scenario,
    /// Number of interactions to run.
    #[arg(long, default_value_t = 30_000)]
    iterations: usize,
    /// Initial exploration rate.
    #[arg(long, default_value_t = 0.1)]
    epsilon: f32,
    /// Factor applied to the exploration rate after every selection.
    #[arg(long, default_value_t = 1.0)]
    regression: f32,
    /// Q-learning step size.
    #[arg(long, default_value_t = 0.3)]
    learning_rate: f32,
    /// Discount applied to future rewards.
    #[arg(long, default_value_t = 0.99)]
    discount_factor: f32,
    /// Seed for the training RNG; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Scenario {
    Maze,
    WoodCutter,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    log::info!("Begin (seed {seed}).");

    let result = match args.scenario {
        Scenario::Maze => run(&mut MazeNavigator::default(), &args, &mut rng),
        Scenario::WoodCutter => run(&mut WoodCutter::default(), &args, &mut rng),
    };

    match result {
        Ok(report) => {
            log::info!(
                "{} laps over {} iterations, {} within the performance target",
                report.laps.len(),
                report.iterations,
                report.fast_laps
            );
            if let Some(average) = report.average_lap() {
                log::info!("recent laps averaged {average:.2} iterations");
            }
        }
        Err(error) => {
            log::error!("training aborted: {error}");
            std::process::exit(1);
        }
    }
}

fn run<Arch: Architecture>(
    architecture: &mut Arch,
    args: &Args,
    rng: &mut impl Rng,
) -> Result<Report, TrainError> {
    let mut agent = Agent::new(
        EpsilonGreedy::new(args.epsilon, args.regression),
        QLearn::new(args.learning_rate, args.discount_factor),
    );
    train(architecture, &mut agent, args.iterations, &mut LogSink, rng)
}
