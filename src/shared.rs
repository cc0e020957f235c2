//! Lock-free shared `f64` buffers.
//!
//! Every epoch worker reads and writes the same weight vector and memory
//! buffers without taking a lock. Each element is stored as the bit pattern of
//! an `f64` inside an [`AtomicU64`], so concurrent access is well defined while
//! still being unsynchronized: a worker may observe another worker's write to
//! one element and not to its neighbour. The SAGA iteration tolerates these
//! inconsistent reads.
//!
//! All accesses use [`Ordering::Relaxed`]. Visibility of all writes after an
//! epoch group comes from the rayon join that ends the group, not from the
//! atomics themselves.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Fixed-length `f64` vector that several threads may mutate at once.
pub struct SharedVec {
    data: Box<[AtomicU64]>,
}

impl SharedVec {
    /// All-zero vector of the given length.
    pub fn zeros(len: usize) -> Self {
        let zero = 0.0f64.to_bits();
        Self {
            data: (0..len).map(|_| AtomicU64::new(zero)).collect(),
        }
    }

    /// Copy of `values`; the result does not alias the input.
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            data: values.iter().map(|v| AtomicU64::new(v.to_bits())).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        f64::from_bits(self.data[i].load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set(&self, i: usize, value: f64) {
        self.data[i].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Atomically add `delta` to element `i`.
    ///
    /// Uses a compare-exchange loop so concurrent increments are never lost.
    #[inline]
    pub fn add(&self, i: usize, delta: f64) {
        let cell = &self.data[i];
        let mut current = cell.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + delta).to_bits();
            match cell.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    /// Copy every element into `out`, element by element.
    ///
    /// # Panics
    ///
    /// Panics if `out.len() != self.len()`.
    #[inline]
    pub fn load_into(&self, out: &mut [f64]) {
        assert_eq!(out.len(), self.len(), "buffer length mismatch");
        for (dst, cell) in out.iter_mut().zip(self.data.iter()) {
            *dst = f64::from_bits(cell.load(Ordering::Relaxed));
        }
    }

    /// Overwrite every element from `values`.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != self.len()`.
    #[inline]
    pub fn store_from(&self, values: &[f64]) {
        assert_eq!(values.len(), self.len(), "buffer length mismatch");
        for (cell, v) in self.data.iter().zip(values) {
            cell.store(v.to_bits(), Ordering::Relaxed);
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data
            .iter()
            .map(|cell| f64::from_bits(cell.load(Ordering::Relaxed)))
            .collect()
    }
}

impl fmt::Debug for SharedVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn zeros_and_roundtrip() {
        let v = SharedVec::zeros(3);
        assert_eq!(v.to_vec(), vec![0.0, 0.0, 0.0]);
        v.set(1, -2.5);
        assert_eq!(v.get(1), -2.5);
    }

    #[test]
    fn from_slice_copies() {
        let mut src = vec![1.0, 2.0];
        let v = SharedVec::from_slice(&src);
        src[0] = 100.0;
        assert_eq!(v.get(0), 1.0);
    }

    #[test]
    fn load_and_store_whole_buffer() {
        let v = SharedVec::zeros(4);
        v.store_from(&[1.0, 2.0, 3.0, 4.0]);
        let mut out = [0.0; 4];
        v.load_into(&mut out);
        assert_eq!(out, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    #[should_panic(expected = "buffer length mismatch")]
    fn store_from_wrong_length_panics() {
        SharedVec::zeros(2).store_from(&[1.0]);
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let v = SharedVec::zeros(1);
        (0..10_000).into_par_iter().for_each(|_| v.add(0, 1.0));
        assert_eq!(v.get(0), 10_000.0);
    }
}
