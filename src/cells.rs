use std::fmt;

use smallvec::SmallVec;

/// A grid position. `x` is the row index and `y` the column index, so travelling North
/// increments `y` and travelling East increments `x`.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    /// Steps between two coordinates when only moving along the four compass directions.
    #[inline]
    pub fn manhattan_distance(&self, other: Cartesian2DCoordinate) -> u32 {
        abs_diff(self.x, other.x) + abs_diff(self.y, other.y)
    }
}

#[inline(always)]
fn abs_diff(a: u32, b: u32) -> u32 {
    if a > b { a - b } else { b - a }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    East,
    South,
    West,
}

impl CompassPrimary {
    /// Every direction in the fixed N-E-S-W order. Anything that lists directions uses this order.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::East,
                                          CompassPrimary::South,
                                          CompassPrimary::West];

    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// The bit this direction's wall occupies in a `Walls` set.
    #[inline]
    pub fn wall_bit(self) -> u8 {
        match self {
            CompassPrimary::North => 0b0001,
            CompassPrimary::East => 0b0010,
            CompassPrimary::South => 0b0100,
            CompassPrimary::West => 0b1000,
        }
    }
}

pub type DirectionSmallVec = SmallVec<[CompassPrimary; 4]>;

/// The set of walls still standing around a cell.
#[derive(Eq, PartialEq, Copy, Clone, Hash)]
pub struct Walls(u8);

impl Walls {
    pub const NONE: Walls = Walls(0);
    pub const ALL: Walls = Walls(0b1111);

    /// Bits above the four compass bits are dropped.
    #[inline]
    pub fn from_bits(bits: u8) -> Walls {
        Walls(bits & Walls::ALL.0)
    }

    #[inline]
    pub fn bits(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(&self, direction: CompassPrimary) -> bool {
        self.0 & direction.wall_bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, direction: CompassPrimary) {
        self.0 |= direction.wall_bit();
    }

    #[inline]
    pub fn remove(&mut self, direction: CompassPrimary) {
        self.0 &= !direction.wall_bit();
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Standing walls in N-E-S-W order.
    pub fn iter(&self) -> impl Iterator<Item = CompassPrimary> {
        let walls = *self;
        CompassPrimary::ALL.iter().cloned().filter(move |dir| walls.contains(*dir))
    }

    pub fn directions(&self) -> DirectionSmallVec {
        self.iter().collect()
    }
}

impl Default for Walls {
    fn default() -> Walls {
        Walls::ALL
    }
}

impl fmt::Debug for Walls {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Walls({:#06b})", self.0)
    }
}

/// One square of the maze. A fresh cell is unvisited with every wall standing.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Default)]
pub struct Cell {
    pub visited: bool,
    pub walls: Walls,
}

impl Cell {
    pub fn enclosed() -> Cell {
        Cell {
            visited: false,
            walls: Walls::ALL,
        }
    }

    #[inline]
    pub fn has_wall(&self, direction: CompassPrimary) -> bool {
        self.walls.contains(direction)
    }

    /// Three or four walls standing: only one way in, or none at all.
    #[inline]
    pub fn is_dead_end(&self) -> bool {
        self.walls.count() >= 3
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools;

    #[test]
    fn opposite_is_an_involution() {
        for dir in CompassPrimary::ALL.iter() {
            assert_ne!(dir.opposite(), *dir);
            assert_eq!(dir.opposite().opposite(), *dir);
        }
        assert_eq!(CompassPrimary::North.opposite(), CompassPrimary::South);
        assert_eq!(CompassPrimary::East.opposite(), CompassPrimary::West);
    }

    #[test]
    fn wall_bits_are_distinct() {
        let bits = CompassPrimary::ALL.iter().map(|dir| dir.wall_bit()).collect::<Vec<_>>();
        assert_eq!(bits, vec![1, 2, 4, 8]);
        assert_eq!(bits.iter().fold(0, |acc, b| acc | b), Walls::ALL.bits());
    }

    #[test]
    fn new_cell_is_enclosed() {
        let cell = Cell::default();
        assert_eq!(cell, Cell::enclosed());
        assert!(!cell.visited);
        assert_eq!(cell.walls.count(), 4);
        assert!(cell.is_dead_end());
    }

    #[test]
    fn removing_walls() {
        let mut walls = Walls::ALL;
        walls.remove(CompassPrimary::North);
        walls.remove(CompassPrimary::North);
        assert!(!walls.contains(CompassPrimary::North));
        assert_eq!(walls.bits(), 0b1110);
        walls.remove(CompassPrimary::West);
        assert_eq!(walls.directions().into_iter().collect_vec(),
                   vec![CompassPrimary::East, CompassPrimary::South]);
        walls.insert(CompassPrimary::North);
        assert_eq!(walls.iter().collect_vec(),
                   vec![CompassPrimary::North, CompassPrimary::East, CompassPrimary::South]);
        walls.remove(CompassPrimary::North);
        walls.remove(CompassPrimary::East);
        walls.remove(CompassPrimary::South);
        assert!(walls.is_empty());
        assert_eq!(walls, Walls::NONE);
    }

    #[test]
    fn from_bits_masks_high_bits() {
        assert_eq!(Walls::from_bits(0xff), Walls::ALL);
        assert_eq!(Walls::from_bits(0b1_0101).bits(), 0b0101);
    }

    #[test]
    fn manhattan_distance() {
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(gc(0, 0).manhattan_distance(gc(0, 0)), 0);
        assert_eq!(gc(0, 0).manhattan_distance(gc(3, 4)), 7);
        assert_eq!(gc(3, 4).manhattan_distance(gc(0, 0)), 7);
        assert_eq!(gc(5, 1).manhattan_distance(gc(2, 6)), 8);
    }
}
