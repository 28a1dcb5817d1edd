//! Bounded history of curvature pairs and the two-loop recursion, as formulated in
//!
//! Jorge Nocedal. Updating Quasi-Newton Matrices With Limited Storage.
//! MATHEMATICS OF  COMPUTATION, VOLUME 35,  NUMBER 151 JULY 1980, PAGES 773-782
//!
use std::iter::Chain;
use std::ops::Index;
use std::slice;

use ndarray::prelude::*;

use crate::utils::{axpy, copy, dot, scale};

/// One step of the run: position delta `s`, gradient delta `y` and `ro = dot(s, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvaturePair {
    pub s: Array1<f64>,
    pub y: Array1<f64>,
    pub ro: f64,
}

/// FIFO of at most `capacity` curvature pairs.
///
/// Slots are allocated while the history fills up. Once full, a push overwrites
/// the oldest slot in place, so a run allocates `capacity` pairs at most.
/// `i0` is the slot of the oldest pair.
#[derive(Debug)]
pub struct History {
    capacity: usize,
    i0: usize,
    pairs: Vec<CurvaturePair>,
}

impl History {
    /// # Panics
    ///
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> History {
        assert!(capacity > 0, "history capacity must be positive");
        History {
            capacity,
            i0: 0,
            pairs: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs from oldest to newest.
    pub fn iter(&self) -> Chain<slice::Iter<'_, CurvaturePair>, slice::Iter<'_, CurvaturePair>> {
        self.pairs[self.i0..].iter().chain(self.pairs[..self.i0].iter())
    }

    /// Drops every pair. Allocated slots are released.
    pub fn clear(&mut self) {
        self.pairs.clear();
        self.i0 = 0;
    }

    pub fn newest(&self) -> Option<&CurvaturePair> {
        if self.pairs.is_empty() {
            None
        } else {
            Some(&self[self.len() - 1])
        }
    }

    /// Slot for the next pair: a fresh one while filling up, otherwise the
    /// oldest pair, which stops being part of the history.
    fn claim_slot(&mut self, dim: usize) -> &mut CurvaturePair {
        if self.pairs.len() < self.capacity {
            self.pairs.push(CurvaturePair {
                s: Array1::zeros(dim),
                y: Array1::zeros(dim),
                ro: 0.0,
            });
            let newest = self.pairs.len() - 1;
            &mut self.pairs[newest]
        } else {
            let oldest = self.i0;
            self.i0 = (self.i0 + 1) % self.capacity;
            &mut self.pairs[oldest]
        }
    }

    /// Stores the pair `(s, y)`, evicting the oldest one when full.
    ///
    /// Returns `true` if `dot(s, y) == 0`, which leaves the recursion without a
    /// usable curvature estimate.
    pub fn push(&mut self, s: ArrayView1<f64>, y: ArrayView1<f64>) -> bool {
        let slot = self.claim_slot(s.len());
        copy(&mut slot.s, s);
        copy(&mut slot.y, y);
        slot.ro = dot(slot.s.view(), slot.y.view());
        slot.ro == 0.0
    }

    /// Stores `(x_new - x_old, g_new - g_old)` without temporaries, like [`History::push`].
    pub fn push_difference(
        &mut self,
        x_new: ArrayView1<f64>,
        x_old: ArrayView1<f64>,
        g_new: ArrayView1<f64>,
        g_old: ArrayView1<f64>,
    ) -> bool {
        let slot = self.claim_slot(x_new.len());
        copy(&mut slot.s, x_new);
        axpy(&mut slot.s, x_old, -1.0);
        copy(&mut slot.y, g_new);
        axpy(&mut slot.y, g_old, -1.0);
        slot.ro = dot(slot.s.view(), slot.y.view());
        slot.ro == 0.0
    }

    /// Replaces `dir` with the approximate inverse hessian applied to it.
    ///
    /// An empty history leaves `dir` untouched. Every stored pair must have a
    /// nonzero `ro`; callers stop the run as soon as `push` reports otherwise.
    pub fn apply_inverse_hessian(&self, dir: &mut Array1<f64>) {
        let count = self.len();
        if count == 0 {
            return;
        }
        let mut alphas = vec![0.0; count];
        for n in (0..count).rev() {
            let pair = &self[n];
            alphas[n] = -dot(pair.s.view(), dir.view()) / pair.ro;
            axpy(dir, pair.y.view(), alphas[n]);
        }

        let last = &self[count - 1];
        scale(dir, last.ro / dot(last.y.view(), last.y.view()));

        for (pair, alpha) in self.iter().zip(alphas.iter()) {
            let beta = dot(pair.y.view(), dir.view()) / pair.ro;
            axpy(dir, pair.s.view(), -alpha - beta);
        }
    }
}

/// Index 0 is the oldest pair.
impl Index<usize> for History {
    type Output = CurvaturePair;

    fn index(&self, index: usize) -> &CurvaturePair {
        &self.pairs[(index + self.i0) % self.pairs.len()]
    }
}
