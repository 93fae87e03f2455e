use error_chain::bail;
use tracing::debug;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::errors::*;
use crate::grid_dimensions::{NeighbourSmallVec, RectGridDimensions};
use crate::maze::{CellUpdate, Maze, MazeUpdate};
use crate::pathing::{self, DEFAULT_SOLVE_LIMIT};
use crate::random::MazeRandom;
use crate::units::{ColumnIndex, ColumnsCount, RowsCount};

/// Iteration cap `generate` is usually called with; large enough for any maze it is worth waiting on.
pub const DEFAULT_MAX_LOOP: usize = 50_000;

/// A dead end is only opened into a neighbour when the route already joining the two cells is
/// at least this many cells long, which keeps braiding from adding tiny loops.
pub const DEAD_END_MIN_PATH: usize = 4;

/// Tries granted to each random wall removal before it is abandoned.
pub const WALL_REMOVAL_ATTEMPTS: usize = 10;

/// Post-processing applied after an instant generation carves a perfect maze.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GeneratorOptions {
    remove_walls: usize,
    remove_dead_ends: bool,
    dead_end_min_path: usize,
    solve_limit: usize,
}

impl Default for GeneratorOptions {
    fn default() -> GeneratorOptions {
        GeneratorOptions {
            remove_walls: 0,
            remove_dead_ends: false,
            dead_end_min_path: DEAD_END_MIN_PATH,
            solve_limit: DEFAULT_SOLVE_LIMIT,
        }
    }
}

impl GeneratorOptions {
    #[inline]
    pub fn remove_walls(&self) -> usize {
        self.remove_walls
    }

    #[inline]
    pub fn remove_dead_ends(&self) -> bool {
        self.remove_dead_ends
    }

    #[inline]
    pub fn dead_end_min_path(&self) -> usize {
        self.dead_end_min_path
    }

    #[inline]
    pub fn solve_limit(&self) -> usize {
        self.solve_limit
    }
}

#[derive(Debug, Default)]
pub struct GeneratorOptionsBuilder {
    options: GeneratorOptions,
}

impl GeneratorOptionsBuilder {
    pub fn new() -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder::default()
    }

    /// How many interior walls to knock down at random. Best effort: fewer may come down.
    pub fn remove_walls(mut self, count: usize) -> GeneratorOptionsBuilder {
        self.options.remove_walls = count;
        self
    }

    pub fn remove_dead_ends(mut self, remove: bool) -> GeneratorOptionsBuilder {
        self.options.remove_dead_ends = remove;
        self
    }

    pub fn dead_end_min_path(mut self, length: usize) -> GeneratorOptionsBuilder {
        self.options.dead_end_min_path = length;
        self
    }

    /// Expansion cap for each solve the dead end pass runs.
    pub fn solve_limit(mut self, limit: usize) -> GeneratorOptionsBuilder {
        self.options.solve_limit = limit;
        self
    }

    pub fn build(self) -> GeneratorOptions {
        self.options
    }
}

/// What the post-processing passes of the last instant generation achieved.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct PostProcessingReport {
    pub walls_removed: usize,
    pub dead_ends_removed: usize,
}

#[derive(Debug, Clone)]
struct SteppedState {
    stack: Vec<usize>,
    next_cell: usize,
    done: bool,
    steps: usize,
}

#[derive(Debug, Clone)]
enum GenerationMode {
    Unstarted,
    Instant,
    Stepped(SteppedState),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum CarveStep {
    Advanced(usize),
    Backtracked(usize),
    Finished,
}

/// Randomized depth first backtracker over a rectangular grid.
///
/// A generator runs once, in one of two modes chosen by the first call: `generate` carves the
/// whole maze immediately, while `start_slow_generate` followed by `next_slow_generate` carves
/// one step per call so a caller can animate the process. Both modes consume the random source
/// identically, so the same seed yields the same maze either way.
pub struct MazeGenerator<R: MazeRandom> {
    maze: Maze,
    entrance: ColumnIndex,
    exit: ColumnIndex,
    random: R,
    options: GeneratorOptions,
    mode: GenerationMode,
    report: PostProcessingReport,
}

impl<R: MazeRandom> MazeGenerator<R> {
    pub fn new(columns: ColumnsCount,
               rows: RowsCount,
               entrance: ColumnIndex,
               exit: ColumnIndex,
               random: R)
               -> MazeGenerator<R> {
        MazeGenerator::with_options(columns, rows, entrance, exit, random, GeneratorOptions::default())
    }

    pub fn with_options(columns: ColumnsCount,
                        rows: RowsCount,
                        entrance: ColumnIndex,
                        exit: ColumnIndex,
                        random: R,
                        options: GeneratorOptions)
                        -> MazeGenerator<R> {
        MazeGenerator {
            maze: Maze::new(RectGridDimensions::new(columns, rows)),
            entrance,
            exit,
            random,
            options,
            mode: GenerationMode::Unstarted,
            report: PostProcessingReport::default(),
        }
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.maze.columns()
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.maze.rows()
    }

    #[inline]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    #[inline]
    pub fn report(&self) -> PostProcessingReport {
        self.report
    }

    /// Where carving starts: the entrance column of the first row.
    pub fn entrance_coordinate(&self) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(0, self.entrance.0 as u32)
    }

    /// The exit column of the last row.
    pub fn exit_coordinate(&self) -> Cartesian2DCoordinate {
        let last_row = self.rows().0.saturating_sub(1);
        Cartesian2DCoordinate::new(last_row as u32, self.exit.0 as u32)
    }

    /// Carve the whole maze now, then run any configured post-processing.
    ///
    /// `max_loop` caps the carving iterations (0 for no cap). A capped run returns a maze with
    /// `done == false` and skips post-processing.
    pub fn generate(&mut self, max_loop: usize) -> Result<Maze> {
        self.ensure_unstarted()?;

        if self.maze.size() <= 1 {
            self.mode = GenerationMode::Instant;
            self.finish_trivially();
            return Ok(self.maze.clone());
        }

        let mut current = self.start_index()?;
        self.mode = GenerationMode::Instant;
        let mut stack = Vec::with_capacity(self.maze.size());
        let mut loops = 0;
        let mut carved_all = false;

        loop {
            let step = carve_step(&mut self.maze, &mut self.random, current, &mut stack);
            loops += 1;
            match step {
                CarveStep::Advanced(next) | CarveStep::Backtracked(next) => current = next,
                CarveStep::Finished => {
                    carved_all = true;
                    break;
                }
            }
            if max_loop != 0 && loops > max_loop {
                debug!(max_loop, "maze carving stopped at iteration cap");
                break;
            }
        }
        self.maze.set_progress(loops, carved_all);

        if carved_all {
            if self.options.remove_walls > 0 {
                self.report.walls_removed = self.remove_walls_phase();
            }
            if self.options.remove_dead_ends {
                self.report.dead_ends_removed = self.remove_dead_ends_phase()?;
            }
        }

        Ok(self.maze.clone())
    }

    /// Begin stepped generation, returning the untouched starting maze.
    pub fn start_slow_generate(&mut self) -> Result<Maze> {
        self.ensure_unstarted()?;
        let trivial = self.maze.size() <= 1;
        let next_cell = if trivial { 0 } else { self.start_index()? };

        self.mode = GenerationMode::Stepped(SteppedState {
            stack: Vec::with_capacity(self.maze.size()),
            next_cell,
            done: trivial,
            steps: 0,
        });
        if trivial {
            self.finish_trivially();
        }

        Ok(self.maze.clone())
    }

    /// Perform exactly one carving iteration and report the two cells it touched.
    pub fn next_slow_generate(&mut self) -> Result<MazeUpdate> {
        let MazeGenerator { maze, random, mode, .. } = self;

        let state = match mode {
            GenerationMode::Stepped(state) => state,
            _ => bail!(ErrorKind::SlowGenerateNotStarted),
        };
        if state.done {
            bail!(ErrorKind::GenerationComplete);
        }

        let last_cell = state.next_cell;
        let next_cell = match carve_step(maze, random, last_cell, &mut state.stack) {
            CarveStep::Advanced(next) | CarveStep::Backtracked(next) => next,
            // nowhere left to go: the entered half repeats the departed cell
            CarveStep::Finished => {
                state.done = true;
                last_cell
            }
        };
        state.steps += 1;
        state.next_cell = next_cell;
        maze.set_progress(state.steps, state.done);

        Ok(MazeUpdate {
            cells: [CellUpdate { index: last_cell, cell: maze.cells()[last_cell] },
                    CellUpdate { index: next_cell, cell: maze.cells()[next_cell] }],
            steps: state.steps,
            done: state.done,
        })
    }

    fn ensure_unstarted(&self) -> Result<()> {
        match self.mode {
            GenerationMode::Unstarted => Ok(()),
            _ => bail!(ErrorKind::GenerationModeFixed),
        }
    }

    fn start_index(&self) -> Result<usize> {
        let entrance = self.entrance_coordinate();
        self.maze
            .dimensions()
            .coordinate_index(entrance)
            .ok_or_else(|| ErrorKind::InvalidCoordinate(entrance.x, entrance.y).into())
    }

    /// Zero or one cells: nothing to carve.
    fn finish_trivially(&mut self) {
        for cell in self.maze.cells_mut() {
            cell.visited = true;
        }
        self.maze.set_progress(0, true);
    }

    /// Knock down random interior walls. Returns how many actually came down.
    fn remove_walls_phase(&mut self) -> usize {
        let size = self.maze.size();
        let mut removed = 0;

        for _ in 0..self.options.remove_walls {
            for _ in 0..WALL_REMOVAL_ATTEMPTS {
                let index = self.random.range_between(0, size);
                // the outer boundary stays closed
                if !self.maze.dimensions().is_interior(index) {
                    continue;
                }

                let direction = CompassPrimary::ALL[self.random.range(CompassPrimary::ALL.len())];
                if !self.maze.cells()[index].has_wall(direction) {
                    continue;
                }

                if self.maze.carve(index, direction) {
                    removed += 1;
                    break;
                }
            }
        }

        debug!(requested = self.options.remove_walls, removed, "random wall removal finished");
        removed
    }

    /// Open every dead end into a walled off neighbour, provided the existing route between the
    /// two is long enough. Returns how many dead ends were opened.
    fn remove_dead_ends_phase(&mut self) -> Result<usize> {
        let dimensions = *self.maze.dimensions();
        let mut opened = 0;

        for index in 0..self.maze.size() {
            let cell = self.maze.cells()[index];
            if !cell.is_dead_end() {
                continue;
            }

            let mut candidates: NeighbourSmallVec = dimensions.neighbours(index)
                .into_iter()
                .filter(|(dir, _)| cell.has_wall(*dir))
                .collect();

            loop {
                if candidates.is_empty() {
                    debug!(index, "dead end left in place, no neighbour gives a long enough loop");
                    break;
                }

                let pick = self.random.range(candidates.len());
                let (direction, neighbour) = candidates.remove(pick);

                let detour = pathing::solve(&self.maze,
                                            dimensions.coordinate(index),
                                            dimensions.coordinate(neighbour),
                                            self.options.solve_limit)?;
                if detour.len() >= self.options.dead_end_min_path {
                    self.maze.carve(index, direction);
                    opened += 1;
                    break;
                }
                debug!(index, neighbour, detour = detour.len(), "dead end carve rejected");
            }
        }

        Ok(opened)
    }
}

/// One iteration of the backtracker from `current`.
fn carve_step<R: MazeRandom>(maze: &mut Maze,
                             random: &mut R,
                             current: usize,
                             stack: &mut Vec<usize>)
                             -> CarveStep {
    maze.cells_mut()[current].visited = true;

    if let Some((direction, next)) = unvisited_neighbour(maze, random, current) {
        maze.carve(current, direction);
        stack.push(current);
        CarveStep::Advanced(next)
    } else if let Some(previous) = stack.pop() {
        CarveStep::Backtracked(previous)
    } else {
        CarveStep::Finished
    }
}

/// A random unvisited neighbour. A lone candidate is taken without drawing from `random`.
fn unvisited_neighbour<R: MazeRandom>(maze: &Maze,
                                      random: &mut R,
                                      index: usize)
                                      -> Option<(CompassPrimary, usize)> {
    let candidates: NeighbourSmallVec = maze.dimensions()
        .neighbours(index)
        .into_iter()
        .filter(|(_, neighbour)| !maze.cells()[*neighbour].visited)
        .collect();

    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        n => Some(candidates[random.range(n)]),
    }
}
