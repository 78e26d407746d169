//! A fast resettable vector based on timestamps.

use std::ops::{Index, IndexMut};

/// A vector whose elements can all be reset to a default value in amortized
/// constant time.
///
/// Each entry carries the timestamp of its last write, and entries with an
/// outdated stamp read as the default value. Resetting just bumps the
/// current 32bit timestamp; only when the counter wraps around does the data
/// have to be rewritten for real. Elements are modified through the index
/// traits or `set`, other modifications are not permitted.
#[derive(Debug, Clone)]
pub struct TimestampedVector<T> {
    data: Vec<T>,
    // stamp of the last write of each entry
    timestamps: Vec<u32>,
    // stamp of the current round, entries with an older one read as default
    current: u32,
    default: T,
}

impl<T: Clone> TimestampedVector<T> {
    /// Create a new `TimestampedVector` with `size` elements of the default.
    pub fn new(size: usize, default: T) -> TimestampedVector<T> {
        TimestampedVector {
            data: vec![default.clone(); size],
            timestamps: vec![0; size],
            current: 0,
            default,
        }
    }

    /// Reset all elements to the default. Amortized O(1).
    pub fn reset(&mut self) {
        let (incremented, overflow) = self.current.overflowing_add(1);
        self.current = incremented;

        // on wrap-around old stamps become current again, so every entry has
        // to be rewritten once
        if overflow {
            for element in &mut self.data {
                *element = self.default.clone();
            }
        }
    }

    /// Write an element and mark it current. Slightly more efficient than
    /// going through `index_mut` because no branching is involved.
    pub fn set(&mut self, index: usize, value: T) {
        self.data[index] = value;
        self.timestamps[index] = self.current;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Clone> Index<usize> for TimestampedVector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        if self.timestamps[index] == self.current {
            &self.data[index]
        } else {
            // fine since immutable
            &self.default
        }
    }
}

impl<T: Clone> IndexMut<usize> for TimestampedVector<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        if self.timestamps[index] != self.current {
            self.set(index, self.default.clone());
        }
        &mut self.data[index]
    }
}
