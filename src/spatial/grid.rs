//! Generic dense grid for per-cell data

use crate::core::types::Position;

/// Dense 2D grid addressed by signed cell coordinates
///
/// Out-of-range coordinates (including negatives) read as `None` and
/// writes to them are ignored.
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    /// True if the position lies within [0, width) x [0, height)
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    #[inline]
    fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<&T> {
        self.index(pos).map(|i| &self.data[i])
    }

    #[inline]
    pub fn set(&mut self, pos: Position, value: T) {
        if let Some(i) = self.index(pos) {
            self.data[i] = value;
        }
    }

    /// Iterate over all cells with their coordinates, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(i, v)| {
            (Position::new((i % width) as i32, (i / width) as i32), v)
        })
    }
}
