use std::cmp::Ordering;
use std::collections::hash_map::Entry;

use fnv::FnvHashMap;
use smallvec::SmallVec;
use tracing::debug;

use crate::cells::{Cartesian2DCoordinate, Walls};
use crate::errors::*;
use crate::grid_dimensions::RectGridDimensions;
use crate::maze::Maze;
use crate::path::Path;
use crate::priority_queue::PriorityQueue;

/// Expansion cap used when a caller has no better idea.
pub const DEFAULT_SOLVE_LIMIT: usize = 10_000;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum NodeState {
    Unvisited,
    Open,
    Closed,
}

/// Per search bookkeeping for one grid cell.
#[derive(Debug, Copy, Clone)]
struct Node {
    parent: Option<usize>,
    state: NodeState,
    index: usize,
    walls: Walls,
    g: u32,
    h: u32,
}

impl Node {
    #[inline]
    fn f(&self) -> u32 {
        self.g + self.h
    }
}

#[derive(Debug, Copy, Clone)]
struct OpenEntry {
    index: usize,
    f: u32,
}

fn by_total_cost(a: &OpenEntry, b: &OpenEntry) -> Ordering {
    a.f.cmp(&b.f)
}

/// A* from `start` to `end` through the open passages of `maze`.
///
/// The returned path runs from start to end inclusive. When no route exists, or more than
/// `limit` cells get expanded before one is found, the path is just `[start]`: check
/// `Path::is_degenerate`. Coordinates outside the grid are an error.
pub fn solve(maze: &Maze,
             start: Cartesian2DCoordinate,
             end: Cartesian2DCoordinate,
             limit: usize)
             -> Result<Path> {
    let dimensions = maze.dimensions();
    let start_index = dimensions.coordinate_index(start)
        .ok_or(ErrorKind::InvalidCoordinate(start.x, start.y))?;
    let end_index = dimensions.coordinate_index(end)
        .ok_or(ErrorKind::InvalidCoordinate(end.x, end.y))?;

    let mut nodes = maze.cells()
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            Node {
                parent: None,
                state: NodeState::Unvisited,
                index,
                walls: cell.walls,
                g: 0,
                h: 0,
            }
        })
        .collect::<Vec<Node>>();

    let mut open = PriorityQueue::with_capacity(maze.size(), by_total_cost);
    {
        let start_node = &mut nodes[start_index];
        start_node.state = NodeState::Open;
        start_node.h = start.manhattan_distance(end);
        open.push(OpenEntry { index: start_node.index, f: start_node.f() });
    }

    let mut expanded = 0;
    while !open.is_empty() {
        if expanded > limit {
            debug!(limit, ?start, ?end, "solver expansion limit reached");
            return Ok(Path::single(start));
        }

        let current = open.pop()?.index;
        // superseded by a cheaper entry for the same cell
        if nodes[current].state == NodeState::Closed {
            continue;
        }
        nodes[current].state = NodeState::Closed;

        if current == end_index {
            return Ok(build_path(&nodes, current, dimensions));
        }

        let current_node = nodes[current];
        for (direction, neighbour) in dimensions.neighbours(current) {
            if current_node.walls.contains(direction) ||
               nodes[neighbour].walls.contains(direction.opposite()) {
                continue;
            }

            let g = current_node.g + 1;
            let node = &mut nodes[neighbour];
            match node.state {
                NodeState::Closed => continue,
                NodeState::Open if g >= node.g => continue,
                NodeState::Open => {}
                NodeState::Unvisited => {
                    node.h = dimensions.coordinate(neighbour).manhattan_distance(end);
                }
            }

            node.parent = Some(current_node.index);
            node.g = g;
            node.state = NodeState::Open;
            open.push(OpenEntry { index: neighbour, f: node.f() });
        }

        expanded += 1;
    }

    debug!(?start, ?end, "solver found no path");
    Ok(Path::single(start))
}

fn build_path(nodes: &[Node], goal: usize, dimensions: &RectGridDimensions) -> Path {
    let mut points = vec![dimensions.coordinate(goal)];
    let mut current = goal;
    while let Some(parent) = nodes[current].parent {
        points.push(dimensions.coordinate(parent));
        current = parent;
    }
    points.reverse();
    Path::new(points)
}

/// Flood fill step counts from one start cell to every cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// None if `start_coordinate` is not on the maze grid.
    pub fn new(maze: &Maze, start_coordinate: Cartesian2DCoordinate) -> Option<Distances> {
        let dimensions = maze.dimensions();
        let start_index = dimensions.coordinate_index(start_coordinate)?;

        let mut distances = FnvHashMap::with_capacity_and_hasher(maze.size(), Default::default());
        distances.insert(start_coordinate, 0);

        // Edges are unweighted so the first time a cell is reached is along a shortest route,
        // and the map doubles as the visited set.
        let mut max = 0;
        let mut frontier = vec![start_index];
        while !frontier.is_empty() {
            let next_distance = max + 1;
            let mut new_frontier = vec![];
            for index in &frontier {
                for link in maze.links(*index) {
                    if let Entry::Vacant(entry) = distances.entry(dimensions.coordinate(link)) {
                        entry.insert(next_distance);
                        new_frontier.push(link);
                    }
                }
            }
            if !new_frontier.is_empty() {
                max = next_distance;
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    /// How many cells, the start included, can be reached.
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    /// Every cell at the maximum distance, in coordinate order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let furthest_distance = self.max();
        let mut furthest = self.distances
            .iter()
            .filter(|(_, distance)| **distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .collect::<SmallVec<[Cartesian2DCoordinate; 8]>>();
        furthest.sort();
        furthest
    }

    /// Walk back from `end_point` to the start, always stepping to a linked cell one closer.
    /// None when `end_point` is unreachable or these distances came from another maze.
    pub fn path_to(&self, maze: &Maze, end_point: Cartesian2DCoordinate) -> Option<Path> {
        let dimensions = maze.dimensions();
        let mut remaining = self.distance_from_start_to(end_point)?;
        let mut current = end_point;
        let mut points = vec![end_point];

        while remaining > 0 {
            let index = dimensions.coordinate_index(current)?;
            let closer = maze.links(index)
                .into_iter()
                .map(|link| dimensions.coordinate(link))
                .find(|coord| self.distance_from_start_to(*coord) == Some(remaining - 1))?;
            points.push(closer);
            current = closer;
            remaining -= 1;
        }

        points.reverse();
        Some(Path::new(points))
    }
}

/// The longest corridor of a perfect maze: the furthest cell from an arbitrary start, then the
/// furthest cell from that one. On a braided maze this is only some long path.
pub fn longest_path(maze: &Maze) -> Option<Path> {
    if maze.size() == 0 {
        return None;
    }

    let first_distances = Distances::new(maze, maze.dimensions().coordinate(0))?;
    let long_path_start = first_distances.furthest_points_on_grid().first().cloned()?;

    let distances_from_start = Distances::new(maze, long_path_start)?;
    let end_point = distances_from_start.furthest_points_on_grid().first().cloned()?;

    distances_from_start.path_to(maze, end_point)
}


#[cfg(test)]
mod tests {

    use fnv::FnvHashSet;
    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::cells::CompassPrimary;
    use crate::generators::{GeneratorOptionsBuilder, MazeGenerator};
    use crate::random::{MinimumRandom, SeededRandom};
    use crate::units::{ColumnIndex, ColumnsCount, RowsCount};

    static OUT_OF_GRID_COORDINATE: Cartesian2DCoordinate = Cartesian2DCoordinate {
        x: u32::MAX,
        y: u32::MAX,
    };

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn enclosed_maze(columns: usize, rows: usize) -> Maze {
        Maze::new(RectGridDimensions::new(ColumnsCount(columns), RowsCount(rows)))
    }

    fn open_maze(columns: usize, rows: usize) -> Maze {
        let mut maze = enclosed_maze(columns, rows);
        for index in 0..maze.size() {
            maze.carve(index, CompassPrimary::North);
            maze.carve(index, CompassPrimary::East);
        }
        maze
    }

    fn perfect_maze(columns: usize, rows: usize, seed: u64) -> Maze {
        MazeGenerator::new(ColumnsCount(columns), RowsCount(rows), ColumnIndex(0), ColumnIndex(0),
                           SeededRandom::new(seed))
            .generate(0)
            .unwrap()
    }

    fn assert_walkable(maze: &Maze, path: &Path) {
        let d = maze.dimensions();
        let unique = path.points().iter().cloned().collect::<FnvHashSet<_>>();
        assert_eq!(unique.len(), path.len());

        for pair in path.points().windows(2) {
            let from = d.coordinate_index(pair[0]).unwrap();
            let to = d.coordinate_index(pair[1]).unwrap();
            let passable = CompassPrimary::ALL
                .iter()
                .any(|dir| d.neighbour(from, *dir) == Some(to) && maze.is_passable(from, *dir));
            assert!(passable, "no passage from {:?} to {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn one_cell_solve() {
        let maze = enclosed_maze(1, 1);
        let path = solve(&maze, gc(0, 0), gc(0, 0), DEFAULT_SOLVE_LIMIT).unwrap();
        assert_eq!(path.points(), &[gc(0, 0)]);
    }

    #[test]
    fn start_equals_end() {
        let maze = perfect_maze(4, 4, 3);
        let path = solve(&maze, gc(2, 1), gc(2, 1), 0).unwrap();
        assert_eq!(path.points(), &[gc(2, 1)]);
    }

    #[test]
    fn coordinates_off_the_grid_fail() {
        let maze = enclosed_maze(3, 3);
        match solve(&maze, gc(0, 0), gc(3, 0), DEFAULT_SOLVE_LIMIT) {
            Err(Error(ErrorKind::InvalidCoordinate(3, 0), _)) => {}
            other => panic!("expected invalid coordinate error, got {:?}", other),
        }
        assert!(solve(&maze, OUT_OF_GRID_COORDINATE, gc(0, 0), DEFAULT_SOLVE_LIMIT).is_err());
    }

    #[test]
    fn walled_off_goal_gives_degenerate_path() {
        let maze = enclosed_maze(3, 3);
        let path = solve(&maze, gc(0, 0), gc(2, 2), DEFAULT_SOLVE_LIMIT).unwrap();
        assert!(path.is_degenerate());
        assert_eq!(path.points(), &[gc(0, 0)]);
    }

    #[test]
    fn one_sided_wall_blocks_solver() {
        let mut maze = open_maze(1, 2);
        maze.cells_mut()[1].walls.insert(CompassPrimary::West);
        let path = solve(&maze, gc(0, 0), gc(1, 0), DEFAULT_SOLVE_LIMIT).unwrap();
        assert!(path.is_degenerate());
    }

    #[test]
    fn tiny_limit_gives_up() {
        let maze = perfect_maze(10, 10, 77);
        let path = solve(&maze, gc(0, 0), gc(9, 9), 0).unwrap();
        assert!(path.len() <= 1);
        let path = solve(&maze, gc(0, 0), gc(9, 9), 3).unwrap();
        assert!(path.len() <= 1);
    }

    #[test]
    fn open_grid_routes_are_manhattan() {
        let maze = open_maze(6, 5);
        let (start, end) = (gc(0, 0), gc(4, 5));
        let path = solve(&maze, start, end, DEFAULT_SOLVE_LIMIT).unwrap();
        assert_eq!(path.len() as u32, start.manhattan_distance(end) + 1);
        assert_eq!(path.start_point(), Some(start));
        assert_eq!(path.end_point(), Some(end));
        assert_walkable(&maze, &path);
    }

    #[test]
    fn quickcheck_perfect_maze_solve_matches_tree_distance() {
        fn p(columns: u8, rows: u8, from: u16, to: u16, seed: u64) -> TestResult {
            let (columns, rows) = (columns as usize % 10 + 1, rows as usize % 10 + 1);
            let maze = perfect_maze(columns, rows, seed);
            let d = maze.dimensions();
            let start = d.coordinate(from as usize % maze.size());
            let end = d.coordinate(to as usize % maze.size());

            let path = solve(&maze, start, end, DEFAULT_SOLVE_LIMIT).unwrap();
            let distances = Distances::new(&maze, start).unwrap();
            let tree_distance = distances.distance_from_start_to(end).unwrap();
            let unique_route = distances.path_to(&maze, end).unwrap();

            TestResult::from_bool(path.len() as u32 == tree_distance + 1 &&
                                  path.points() == unique_route.points())
        }
        quickcheck(p as fn(u8, u8, u16, u16, u64) -> TestResult)
    }

    #[test]
    fn braided_maze_solve_is_shortest_and_walkable() {
        for seed in 0..10 {
            let options = GeneratorOptionsBuilder::new().remove_walls(8).remove_dead_ends(true).build();
            let mut generator = MazeGenerator::with_options(ColumnsCount(8), RowsCount(7), ColumnIndex(1),
                                                            ColumnIndex(6), SeededRandom::new(seed),
                                                            options);
            let maze = generator.generate(0).unwrap();
            let (start, end) = (generator.entrance_coordinate(), generator.exit_coordinate());

            let path = solve(&maze, start, end, DEFAULT_SOLVE_LIMIT).unwrap();
            let shortest = Distances::new(&maze, start).unwrap().distance_from_start_to(end).unwrap();
            assert_eq!(path.len() as u32, shortest + 1);
            assert_walkable(&maze, &path);
        }
    }

    #[test]
    fn distances_construction_requires_valid_start_coordinate() {
        let maze = enclosed_maze(3, 3);
        assert!(Distances::new(&maze, OUT_OF_GRID_COORDINATE).is_none());
    }

    #[test]
    fn distances_to_unreachable_cells_is_none() {
        let maze = enclosed_maze(3, 3);
        let distances = Distances::new(&maze, gc(1, 1)).unwrap();
        assert_eq!(distances.start(), gc(1, 1));
        assert_eq!(distances.reachable_count(), 1);
        assert_eq!(distances.max(), 0);
        for index in 0..maze.size() {
            let coord = maze.dimensions().coordinate(index);
            if coord == gc(1, 1) {
                assert_eq!(distances.distance_from_start_to(coord), Some(0));
            } else {
                assert_eq!(distances.distance_from_start_to(coord), None);
            }
        }
        assert_eq!(distances.distance_from_start_to(OUT_OF_GRID_COORDINATE), None);
    }

    #[test]
    fn distances_on_open_grid() {
        let maze = open_maze(2, 2);
        let distances = Distances::new(&maze, gc(0, 0)).unwrap();
        assert_eq!(distances.distance_from_start_to(gc(0, 0)), Some(0));
        assert_eq!(distances.distance_from_start_to(gc(1, 0)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(0, 1)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(1, 1)), Some(2));
        assert_eq!(distances.max(), 2);
        assert_eq!(distances.furthest_points_on_grid().to_vec(), vec![gc(1, 1)]);
    }

    #[test]
    fn furthest_points_are_sorted() {
        let maze = open_maze(3, 3);
        let distances = Distances::new(&maze, gc(1, 1)).unwrap();
        assert_eq!(distances.max(), 2);
        assert_eq!(distances.furthest_points_on_grid().to_vec(),
                   vec![gc(0, 0), gc(0, 2), gc(2, 0), gc(2, 2)]);
    }

    #[test]
    fn longest_path_of_a_corridor() {
        // one column, so the maze is a single corridor along x
        let maze = MazeGenerator::new(ColumnsCount(1), RowsCount(5), ColumnIndex(0), ColumnIndex(0),
                                      MinimumRandom)
            .generate(0)
            .unwrap();
        let path = longest_path(&maze).unwrap();
        assert_eq!(path.points(),
                   &[gc(4, 0), gc(3, 0), gc(2, 0), gc(1, 0), gc(0, 0)]);
    }

    #[test]
    fn longest_path_spans_the_tree_diameter() {
        let maze = perfect_maze(7, 6, 1234);
        let path = longest_path(&maze).unwrap();
        assert_walkable(&maze, &path);

        let start = path.start_point().unwrap();
        let from_start = Distances::new(&maze, start).unwrap();
        assert_eq!(path.len() as u32, from_start.max() + 1);

        assert!(longest_path(&enclosed_maze(0, 0)).is_none());
    }
}
