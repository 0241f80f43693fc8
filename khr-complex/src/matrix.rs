use std::collections::HashMap;
use ahash::RandomState;
use itertools::Itertools;
use crate::Mor;

/// Sparse morphism matrix in column-major layout. The entry at
/// `(r, c)` is the component of the differential from object `c` to
/// object `r`. Zero entries are never stored.
#[derive(Clone, Debug)]
pub struct MorMat<M> {
    n: usize,
    cols: Vec<HashMap<usize, M, RandomState>>
}

impl<M: Mor> MorMat<M> {
    fn empty_col() -> HashMap<usize, M, RandomState> {
        HashMap::with_hasher(RandomState::with_seeds(0, 0, 0, 0))
    }

    pub fn new(n: usize) -> Self {
        let cols = (0..n).map(|_| Self::empty_col()).collect();
        Self { n, cols }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn get(&self, r: usize, c: usize) -> Option<&M> {
        self.cols[c].get(&r)
    }

    pub fn is_zero_at(&self, r: usize, c: usize) -> bool {
        self.get(r, c).is_none()
    }

    pub fn set(&mut self, r: usize, c: usize, m: M) {
        if m.is_zero() {
            self.cols[c].remove(&r);
        } else {
            self.cols[c].insert(r, m);
        }
    }

    pub fn add_to(&mut self, r: usize, c: usize, m: M) {
        if m.is_zero() {
            return
        }
        let sum = if let Some(e) = self.cols[c].get(&r) {
            e.plus(&m)
        } else {
            m
        };
        self.set(r, c, sum);
    }

    pub fn col(&self, c: usize) -> impl Iterator<Item = (usize, &M)> {
        self.cols[c].iter().map(|(&r, m)| (r, m))
    }

    /// Column entries sorted by row index, for deterministic scans.
    pub fn col_sorted(&self, c: usize) -> Vec<(usize, &M)> {
        self.col(c).sorted_by_key(|&(r, _)| r).collect()
    }

    pub fn row(&self, r: usize) -> Vec<(usize, &M)> {
        (0..self.n).filter_map(|c|
            self.get(r, c).map(|m| (c, m))
        ).collect()
    }

    pub fn clear_col(&mut self, c: usize) {
        self.cols[c].clear();
    }

    pub fn clear_row(&mut self, r: usize) {
        for col in self.cols.iter_mut() {
            col.remove(&r);
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, &M)> {
        self.cols.iter().enumerate().flat_map(|(c, col)|
            col.iter().map(move |(&r, m)| (r, c, m))
        )
    }

    pub fn prune(&mut self) {
        for col in self.cols.iter_mut() {
            col.retain(|_, m| !m.is_zero());
        }
    }

    /// Rebuilds the matrix over the retained indices. `new_index[i]` is
    /// the new position of index `i`, or `None` if it is dropped.
    pub fn compact(&mut self, new_index: &[Option<usize>]) {
        assert_eq!(new_index.len(), self.n);

        let new_n = new_index.iter().flatten().count();
        let mut cols = (0..new_n).map(|_| Self::empty_col()).collect_vec();

        for (c, col) in self.cols.iter_mut().enumerate() {
            let Some(nc) = new_index[c] else { continue };
            for (r, m) in col.drain() {
                let Some(nr) = new_index[r] else { continue };
                cols[nc].insert(nr, m);
            }
        }

        self.n = new_n;
        self.cols = cols;
    }
}
