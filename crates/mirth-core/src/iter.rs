//! Row-major iteration over strided views.
//!
//! `StridedCursor` is the engine's one traversal algorithm: it advances a
//! coordinate vector in row-major order (last axis fastest) and yields the
//! linear buffer index of each visited position. Printing, deep copies,
//! elementwise maps, and contraction all walk tensors through it and
//! differ only in what they do at each index.
//!
//! An axis can be pinned with `AxisState::Fixed(i)`: its coordinate stays
//! at `i` and the axis is skipped during advancement, so the remaining
//! axes range fully. Contraction pins the contracted axis and walks it
//! separately by stride.

use smallvec::SmallVec;

/// Per-axis traversal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisState {
    /// The axis ranges over its full length.
    Free,
    /// The axis is held at the given coordinate and never advanced.
    Fixed(usize),
}

/// Cursor over a `(dims, strides, offset)` view, yielding buffer indices.
///
/// With zero free axes (including the zero-rank case) the cursor yields
/// exactly one index: the origin. Callers handle the void tensor before
/// constructing a cursor.
#[derive(Debug, Clone)]
pub struct StridedCursor {
    dims: SmallVec<[usize; 4]>,
    strides: SmallVec<[usize; 4]>,
    free: SmallVec<[bool; 4]>,
    coords: SmallVec<[usize; 4]>,
    index: usize,
    remaining: usize,
}

impl StridedCursor {
    /// Cursor over every position of the view, all axes free.
    pub fn new(dims: &[usize], strides: &[usize], offset: usize) -> Self {
        let states: SmallVec<[AxisState; 4]> =
            SmallVec::from_elem(AxisState::Free, dims.len());
        Self::with_states(dims, strides, offset, &states)
    }

    /// Cursor with explicit per-axis states.
    ///
    /// Fixed coordinates are folded into the starting index. The number of
    /// yielded positions is the product of the free axis lengths.
    pub fn with_states(
        dims: &[usize],
        strides: &[usize],
        offset: usize,
        states: &[AxisState],
    ) -> Self {
        debug_assert_eq!(dims.len(), strides.len());
        debug_assert_eq!(dims.len(), states.len());

        let mut free = SmallVec::with_capacity(dims.len());
        let mut coords = SmallVec::with_capacity(dims.len());
        let mut index = offset;
        let mut remaining = 1usize;

        for (axis, &state) in states.iter().enumerate() {
            match state {
                AxisState::Free => {
                    free.push(true);
                    coords.push(0);
                    remaining *= dims[axis];
                }
                AxisState::Fixed(c) => {
                    debug_assert!(c < dims[axis]);
                    free.push(false);
                    coords.push(c);
                    index += c * strides[axis];
                }
            }
        }

        Self {
            dims: SmallVec::from_slice(dims),
            strides: SmallVec::from_slice(strides),
            free,
            coords,
            index,
            remaining,
        }
    }

    /// Coordinates of the position about to be yielded.
    pub fn coords(&self) -> &[usize] {
        &self.coords
    }

    /// Advance the coordinate vector one step in row-major order,
    /// skipping pinned axes.
    fn advance(&mut self) {
        for i in (0..self.dims.len()).rev() {
            if !self.free[i] {
                continue;
            }
            self.coords[i] += 1;
            self.index += self.strides[i];
            if self.coords[i] < self.dims[i] {
                return;
            }
            self.index -= self.coords[i] * self.strides[i];
            self.coords[i] = 0;
        }
    }
}

impl Iterator for StridedCursor {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let out = self.index;
        if self.remaining > 0 {
            self.advance();
        }
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for StridedCursor {}
