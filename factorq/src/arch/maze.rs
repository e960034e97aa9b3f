use super::{
    product_into,
    table::ActionTable,
    ActionVector,
    Architecture,
    ShapeMismatch,
};

/// Grid coordinates, column then row.
pub type Cell = (usize, usize);

/// Reward paid for entering the goal cell.
pub const GOAL_REWARD: f32 = 10.0;

/// A cell with this value is passable.
const PASSABLE: u8 = 1;

/// Grid world the walker moves through. Entering the goal cell pays
/// [`GOAL_REWARD`] and relocates the walker to the start cell, so one run
/// contains many laps.
pub struct Maze {
    grid: Vec<Vec<u8>>,
    position: Cell,
    start: Cell,
    goal: Cell,
}

impl Maze {
    /// # Panics
    ///
    /// Panics when the grid is empty or ragged, or when the start or goal
    /// cell is not passable.
    #[must_use]
    pub fn new(grid: Vec<Vec<u8>>, start: Cell, goal: Cell) -> Self {
        assert!(!grid.is_empty(), "the grid should have at least one row");
        assert!(
            grid.iter().all(|row| row.len() == grid[0].len()),
            "all grid rows should have the same width"
        );
        let maze = Self {
            grid,
            position: start,
            start,
            goal,
        };
        assert!(
            maze.passable(start.0, start.1),
            "the start cell should be passable"
        );
        assert!(
            maze.passable(goal.0, goal.1),
            "the goal cell should be passable"
        );
        maze
    }

    /// Whether `(x, y)` is inside the grid and passable.
    #[must_use]
    pub fn passable(&self, x: usize, y: usize) -> bool {
        self.grid
            .get(y)
            .and_then(|row| row.get(x))
            .is_some_and(|&cell| cell == PASSABLE)
    }

    #[must_use]
    pub const fn position(&self) -> Cell {
        self.position
    }

    #[must_use]
    pub const fn start(&self) -> Cell {
        self.start
    }

    fn relocate(&mut self, x: usize, y: usize) -> f32 {
        self.position = (x, y);
        if self.position == self.goal {
            self.position = self.start;
            GOAL_REWARD
        } else {
            0.0
        }
    }

    pub fn step_up(&mut self) -> f32 {
        let (x, y) = self.position;
        self.relocate(x, y.saturating_sub(1))
    }

    pub fn step_down(&mut self) -> f32 {
        let (x, y) = self.position;
        self.relocate(x, (y + 1).min(self.grid.len() - 1))
    }

    pub fn step_left(&mut self) -> f32 {
        let (x, y) = self.position;
        self.relocate(x.saturating_sub(1), y)
    }

    pub fn step_right(&mut self) -> f32 {
        let (x, y) = self.position;
        self.relocate((x + 1).min(self.grid[0].len() - 1), y)
    }
}

impl Default for Maze {
    /// A small ring of corridors around a blocked middle.
    fn default() -> Self {
        Self::new(
            vec![
                vec![1, 1, 1, 1, 1],
                vec![1, 0, 0, 0, 1],
                vec![1, 0, 0, 0, 1],
                vec![1, 0, 0, 0, 1],
                vec![1, 1, 1, 1, 1],
            ],
            (0, 0),
            (4, 4),
        )
    }
}

/// One move of the walker.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Step {
    Up,
    Down,
    Left,
    Right,
}

/// Single-manipulator architecture steering a walker through a [`Maze`].
///
/// Move legality depends on the passability of the four neighbouring cells,
/// so the legal set is recomputed from the current position on every call.
pub struct MazeNavigator {
    maze: Maze,
    walker: ActionTable<Step, Maze>,
}

impl MazeNavigator {
    #[must_use]
    pub fn new(maze: Maze) -> Self {
        let mut walker = ActionTable::new();
        walker.register(Step::Up, Maze::step_up);
        walker.register(Step::Down, Maze::step_down);
        walker.register(Step::Left, Maze::step_left);
        walker.register(Step::Right, Maze::step_right);
        Self { maze, walker }
    }

    #[must_use]
    pub const fn maze(&self) -> &Maze {
        &self.maze
    }

    fn legal_steps(&self) -> Vec<Step> {
        let (x, y) = self.maze.position();
        self.walker
            .legal_ids()
            .iter()
            .copied()
            .filter(|step| match step {
                Step::Up => y > 0 && self.maze.passable(x, y - 1),
                Step::Down => self.maze.passable(x, y + 1),
                Step::Left => x > 0 && self.maze.passable(x - 1, y),
                Step::Right => self.maze.passable(x + 1, y),
            })
            .collect()
    }
}

impl Default for MazeNavigator {
    fn default() -> Self {
        Self::new(Maze::default())
    }
}

impl Architecture for MazeNavigator {
    type ActionId = Step;
    type Observation = Cell;

    fn manipulator_count(&self) -> usize {
        1
    }

    fn populate_actions(&self, actions: &mut Vec<ActionVector<Step>>) {
        let legal = self.legal_steps();
        product_into(&[&legal], actions);
    }

    fn interact(&mut self, action: &ActionVector<Step>) -> Result<(Cell, f32), ShapeMismatch> {
        ShapeMismatch::check(self.manipulator_count(), action.len())?;
        let reward = action
            .components()
            .iter()
            .map(|step| self.walker.invoke(step, &mut self.maze))
            .sum();
        Ok((self.maze.position(), reward))
    }

    fn initial_state(&self) -> Cell {
        self.maze.start()
    }
}
