use std::cmp::Ordering;
use std::fmt;

use crate::errors::*;

/// An insertion sorted queue whose cheapest element sits at the tail.
///
/// `push` is O(n) and `pop` is O(1). That is fine for the few hundred cells of a typical maze.
/// Elements comparing equal pop in reverse insertion order: a later push only displaces
/// elements it compares strictly greater than.
pub struct PriorityQueue<T, C>
    where C: Fn(&T, &T) -> Ordering
{
    elements: Vec<T>,
    compare: C,
}

impl<T, C> PriorityQueue<T, C>
    where C: Fn(&T, &T) -> Ordering
{
    pub fn new(compare: C) -> PriorityQueue<T, C> {
        PriorityQueue {
            elements: Vec::new(),
            compare,
        }
    }

    pub fn with_capacity(capacity: usize, compare: C) -> PriorityQueue<T, C> {
        PriorityQueue {
            elements: Vec::with_capacity(capacity),
            compare,
        }
    }

    pub fn push(&mut self, element: T) {
        let compare = &self.compare;
        let position = self.elements
            .iter()
            .position(|stored| compare(&element, stored) == Ordering::Greater)
            .unwrap_or_else(|| self.elements.len());
        self.elements.insert(position, element);
    }

    /// Removes the cheapest element.
    pub fn pop(&mut self) -> Result<T> {
        self.elements.pop().ok_or_else(|| ErrorKind::EmptyQueue.into())
    }

    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.elements.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

impl<T: fmt::Debug, C> fmt::Debug for PriorityQueue<T, C>
    where C: Fn(&T, &T) -> Ordering
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PriorityQueue :: elements: {:?}", self.elements)
    }
}
