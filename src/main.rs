use docopt::Docopt;
use error_chain::bail;
use itertools::Itertools;
use serde_derive::Deserialize;
use tracing::info;

use mazes::{
    generators::{GeneratorOptionsBuilder, MazeGenerator},
    maze::Maze,
    pathing::{self, Distances},
    random::{MazeRandom, SeededRandom, SystemRandom},
    units::{ColumnIndex, ColumnsCount, RowsCount},
};

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [--columns=<c>] [--rows=<r>] [--entrance=<e>] [--exit=<x>] [--seed=<s>] [--remove-walls=<n>] [--remove-dead-ends] [--max-loop=<n>] [--solve-limit=<n>] [--stepped]

Options:
    -h --help              Show this screen.
    --columns=<c>          Number of grid columns [default: 10].
    --rows=<r>             Number of grid rows [default: 10].
    --entrance=<e>         Column of the first row where carving starts [default: 0].
    --exit=<x>             Column of the last row the route is solved to. Defaults to the last column.
    --seed=<s>             Seed for a reproducible maze. OS randomness is used if not given.
    --remove-walls=<n>     Knock down up to n random interior walls after carving [default: 0].
    --remove-dead-ends     Open dead ends into neighbouring corridors after carving.
    --max-loop=<n>         Carving iteration cap, 0 for none [default: 50000].
    --solve-limit=<n>      Expansion cap for every route search [default: 10000].
    --stepped              Carve one step at a time, as an animation would. Skips post-processing.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_columns: usize,
    flag_rows: usize,
    flag_entrance: usize,
    flag_exit: Option<usize>,
    flag_seed: Option<u64>,
    flag_remove_walls: usize,
    flag_remove_dead_ends: bool,
    flag_max_loop: usize,
    flag_solve_limit: usize,
    flag_stepped: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazes::errors::Error, ::mazes::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    if let Some(seed) = args.flag_seed {
        run(&args, SeededRandom::new(seed))
    } else {
        run(&args, SystemRandom::new())
    }
}

fn run<R: MazeRandom>(args: &MazeArgs, random: R) -> Result<()> {

    if args.flag_entrance >= args.flag_columns.max(1) {
        bail!("entrance column {} is outside a maze {} columns wide", args.flag_entrance, args.flag_columns);
    }
    let exit = args.flag_exit.unwrap_or_else(|| args.flag_columns.saturating_sub(1));
    if exit >= args.flag_columns.max(1) {
        bail!("exit column {} is outside a maze {} columns wide", exit, args.flag_columns);
    }

    let options = GeneratorOptionsBuilder::new()
        .remove_walls(args.flag_remove_walls)
        .remove_dead_ends(args.flag_remove_dead_ends)
        .solve_limit(args.flag_solve_limit)
        .build();
    let mut generator = MazeGenerator::with_options(ColumnsCount(args.flag_columns),
                                                    RowsCount(args.flag_rows),
                                                    ColumnIndex(args.flag_entrance),
                                                    ColumnIndex(exit),
                                                    random,
                                                    options);

    let maze = if args.flag_stepped {
        if args.flag_remove_walls > 0 || args.flag_remove_dead_ends {
            info!("stepped generation ignores wall and dead end removal");
        }
        generate_stepwise(&mut generator)?
    } else {
        let maze = generator.generate(args.flag_max_loop)?;
        let report = generator.report();
        info!(walls_removed = report.walls_removed,
              dead_ends_removed = report.dead_ends_removed,
              "instant generation finished");
        maze
    };

    print_summary(&generator, &maze, args.flag_solve_limit)
}

fn generate_stepwise<R: MazeRandom>(generator: &mut MazeGenerator<R>) -> Result<Maze> {
    let mut maze = generator.start_slow_generate()?;
    while !maze.is_done() {
        let update = generator.next_slow_generate()?;
        maze.apply_update(&update);
    }
    info!(steps = maze.steps(), "stepped generation finished");
    Ok(maze)
}

fn print_summary<R: MazeRandom>(generator: &MazeGenerator<R>, maze: &Maze, solve_limit: usize) -> Result<()> {

    println!("maze: {} columns x {} rows, steps: {}, done: {}",
             maze.columns().0, maze.rows().0, maze.steps(), maze.is_done());
    println!("passages: {}, dead ends: {}", maze.links_count(), maze.dead_ends_count());

    if maze.size() == 0 {
        return Ok(());
    }

    let (entrance, exit) = (generator.entrance_coordinate(), generator.exit_coordinate());
    let path = pathing::solve(maze, entrance, exit, solve_limit)?;
    if path.is_degenerate() && entrance != exit {
        println!("route {:?} -> {:?}: none found within {} expansions", entrance, exit, solve_limit);
    } else {
        println!("route {:?} -> {:?}: {} cells", entrance, exit, path.len());
        println!("{}", path.clone().map(|p| format!("({}, {})", p.x, p.y)).join(" "));
    }

    if let Some(distances) = Distances::new(maze, entrance) {
        println!("furthest cell from the entrance: {} steps, reaching {} of {} cells",
                 distances.max(), distances.reachable_count(), maze.size());
    }
    if let Some(longest) = pathing::longest_path(maze) {
        println!("longest corridor: {} cells", longest.len());
    }

    Ok(())
}
