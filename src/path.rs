use std::rc::Rc;

use crate::cells::Cartesian2DCoordinate;
use crate::errors::*;

/// A solved route plus a forward-only read cursor.
///
/// The coordinates are shared and read-only, so cloning is cheap. Each clone carries its own
/// cursor, which starts back at the first point.
#[derive(Debug)]
pub struct Path {
    points: Rc<[Cartesian2DCoordinate]>,
    position: usize,
}

impl Path {
    pub fn new(points: Vec<Cartesian2DCoordinate>) -> Path {
        Path {
            points: points.into(),
            position: 0,
        }
    }

    /// The route that goes nowhere. Also how a solver says it found no route.
    pub fn single(point: Cartesian2DCoordinate) -> Path {
        Path::new(vec![point])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// One point or fewer: either start and end coincide or no route was found.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.len() <= 1
    }

    #[inline]
    pub fn points(&self) -> &[Cartesian2DCoordinate] {
        &self.points
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn start_point(&self) -> Option<Cartesian2DCoordinate> {
        self.points.first().cloned()
    }

    #[inline]
    pub fn end_point(&self) -> Option<Cartesian2DCoordinate> {
        self.points.last().cloned()
    }

    /// The point under the cursor, without advancing.
    #[inline]
    pub fn peek(&self) -> Option<Cartesian2DCoordinate> {
        self.points.get(self.position).cloned()
    }

    /// The point under the cursor, advancing past it. Running off the end is an error; use
    /// `try_next` when the end is expected.
    pub fn next_point(&mut self) -> Result<Cartesian2DCoordinate> {
        self.try_next().ok_or_else(|| ErrorKind::PathExhausted(self.len()).into())
    }

    /// Like `next_point`, but once exhausted it returns None and leaves the cursor alone.
    pub fn try_next(&mut self) -> Option<Cartesian2DCoordinate> {
        let point = self.peek()?;
        self.position += 1;
        Some(point)
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}

impl Clone for Path {
    fn clone(&self) -> Path {
        Path {
            points: Rc::clone(&self.points),
            position: 0,
        }
    }
}

impl Iterator for Path {
    type Item = Cartesian2DCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len() - self.position;
        (remaining, Some(remaining))
    }
}
