use std::fmt;
use std::fmt::Debug;
use itertools::Itertools;
use log::trace;
use crate::MorMat;

/// Morphism interface required by the complex engine. Composition is
/// written `g.compose(f)` for `g ∘ f`, with `f` applied first.
pub trait Mor: Clone + PartialEq + Debug {
    type Obj: Clone + PartialEq + Debug;

    fn zero() -> Self;
    fn is_zero(&self) -> bool;
    fn is_inv(&self) -> bool;
    fn inv(&self) -> Option<Self>;
    fn compose(&self, first: &Self) -> Self;
    fn plus(&self, other: &Self) -> Self;
    fn negate(&self) -> Self;
    fn is_valid_between(&self, from: &Self::Obj, to: &Self::Obj) -> bool;
}

/// Chain complex with one object per index and a sparse differential.
/// Cancelled objects stay in place, with their rows and columns
/// cleared, until `resize` compacts the complex.
#[derive(Clone, Debug)]
pub struct Complex<M: Mor> {
    objs: Vec<M::Obj>,
    diff: MorMat<M>,
    cancelled: Vec<usize>
}

impl<M: Mor> Complex<M> {
    pub fn new(objs: Vec<M::Obj>, diff: MorMat<M>) -> Self {
        assert_eq!(objs.len(), diff.n());
        Self { objs, diff, cancelled: vec![] }
    }

    pub fn len(&self) -> usize {
        assert!(self.cancelled.is_empty());
        self.objs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn objects(&self) -> &[M::Obj] {
        assert!(self.cancelled.is_empty());
        &self.objs
    }

    pub fn diffs(&self) -> &MorMat<M> {
        assert!(self.cancelled.is_empty());
        &self.diff
    }

    pub fn d(&self, r: usize, c: usize) -> Option<&M> {
        self.diff.get(r, c)
    }

    /// Validates `d² = 0` and that every entry connects its objects.
    pub fn check(&self) -> bool {
        let n = self.diff.n();

        for (r, c, m) in self.diff.entries() {
            if !m.is_valid_between(&self.objs[c], &self.objs[r]) {
                return false
            }
        }

        for c in 0..n {
            let terms = self.diff.col(c).flat_map(|(r1, f)|
                self.diff.col(r1).map(move |(r2, g)| (r2, g.compose(f)))
            ).into_group_map();

            for (_, ms) in terms {
                let total = ms.into_iter().reduce(|acc, m| acc.plus(&m)).unwrap();
                if !total.is_zero() {
                    return false
                }
            }
        }

        true
    }

    /// Gaussian elimination along the invertible arrow `s → t`.
    pub fn cancel(&mut self, s: usize, t: usize) {
        let pivot = self.d(t, s).unwrap().clone();
        assert!(pivot.is_inv());
        let pinv = pivot.inv().unwrap();

        let col_s: Vec<_> = self.diff.col(s)
            .filter(|&(r, _)| r != t)
            .map(|(r, m)| (r, m.clone()))
            .collect();
        let row_t: Vec<_> = self.diff.row(t).into_iter()
            .filter(|&(c, _)| c != s)
            .map(|(c, m)| (c, m.clone()))
            .collect();

        for (r, f) in col_s.iter() {
            for (c, g) in row_t.iter() {
                let m = f.compose(&pinv).compose(g).negate();
                self.diff.add_to(*r, *c, m);
            }
        }

        self.diff.clear_col(s);
        self.diff.clear_col(t);
        self.diff.clear_row(s);
        self.diff.clear_row(t);

        self.cancelled.push(t);
        self.cancelled.push(s);
    }

    pub fn find_invertible(&self) -> Option<(usize, usize)> {
        (0..self.diff.n()).find_map(|c|
            self.diff.col_sorted(c).into_iter()
                .find(|(_, m)| m.is_inv())
                .map(|(r, _)| (c, r))
        )
    }

    /// Cancels invertible arrows until none remain, then compacts.
    pub fn cancel_all(&mut self) -> usize {
        let mut count = 0;
        while let Some((s, t)) = self.find_invertible() {
            self.cancel(s, t);
            count += 1;
        }
        self.resize();
        trace!("cancelled {count} pairs, {} objects remain", self.objs.len());
        count
    }

    /// Drops the cancelled objects and renumbers the rest.
    pub fn resize(&mut self) {
        if self.cancelled.is_empty() {
            return
        }
        self.cancelled.sort_unstable();

        let mut new_index = vec![None; self.objs.len()];
        let mut k = 0;
        for (i, slot) in new_index.iter_mut().enumerate() {
            if self.cancelled.binary_search(&i).is_err() {
                *slot = Some(k);
                k += 1;
            }
        }

        let mut objs = Vec::with_capacity(k);
        for (i, obj) in self.objs.drain(..).enumerate() {
            if new_index[i].is_some() {
                objs.push(obj);
            }
        }
        self.objs = objs;

        self.diff.compact(&new_index);
        self.cancelled.clear();
    }

    /// Base change along `mor: start → end`. There must be no arrow
    /// `end → start`.
    pub fn isotopy(&mut self, start: usize, end: usize, mor: &M) {
        assert!(self.diff.is_zero_at(start, end));

        let col_end: Vec<_> = self.diff.col(end)
            .map(|(r, m)| (r, m.clone()))
            .collect();
        for (r, v) in col_end {
            self.diff.add_to(r, start, v.compose(mor));
        }

        let row_start: Vec<_> = self.diff.row(start).into_iter()
            .map(|(c, m)| (c, m.clone()))
            .collect();
        for (c, v) in row_start {
            self.diff.add_to(end, c, mor.negate().compose(&v));
        }

        self.diff.prune();
        assert!(self.check(), "isotopy broke d² = 0");
    }

    pub fn map<N, FO, FM>(&self, fo: FO, fm: FM) -> Complex<N>
    where
        N: Mor,
        FO: Fn(&M::Obj) -> N::Obj,
        FM: Fn(&M) -> N
    {
        let objs = self.objects().iter().map(fo).collect::<Vec<_>>();
        let mut diff = MorMat::new(objs.len());
        for (r, c, m) in self.diff.entries() {
            let m = fm(m);
            if !m.is_zero() {
                diff.set(r, c, m);
            }
        }
        Complex::new(objs, diff)
    }
}

impl<M> fmt::Display for Complex<M>
where M: Mor + fmt::Display, M::Obj: fmt::Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.cancelled.is_empty() {
            writeln!(f, "{} objects awaiting resize", self.cancelled.len())?;
        }

        writeln!(f, "    === objects ===")?;
        for (i, o) in self.objs.iter().enumerate() {
            writeln!(f, "object {i}: {o}")?;
        }

        write!(f, "    === diffs ===")?;
        for c in 0..self.diff.n() {
            for (r, m) in self.diff.col_sorted(c) {
                write!(f, "\n∂: {c} –––> {r}: {m}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // scalar morphisms between featureless objects
    #[derive(Clone, Copy, PartialEq, Debug)]
    struct F(i64);

    impl Mor for F {
        type Obj = u32;

        fn zero() -> Self { F(0) }
        fn is_zero(&self) -> bool { self.0 == 0 }
        fn is_inv(&self) -> bool { self.0 == 1 || self.0 == -1 }
        fn inv(&self) -> Option<Self> { self.is_inv().then_some(*self) }
        fn compose(&self, first: &Self) -> Self { F(self.0 * first.0) }
        fn plus(&self, other: &Self) -> Self { F(self.0 + other.0) }
        fn negate(&self) -> Self { F(-self.0) }
        fn is_valid_between(&self, _: &u32, _: &u32) -> bool { true }
    }

    impl fmt::Display for F {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    fn sample() -> Complex<F> {
        // x0 -> x1 (1), x0 -> x2 (3), x3 -> x1 (2)
        let mut diff = MorMat::new(4);
        diff.set(1, 0, F(1));
        diff.set(2, 0, F(3));
        diff.set(1, 3, F(2));
        Complex::new(vec![10, 11, 12, 13], diff)
    }

    #[test]
    fn check() {
        assert!(sample().check());
    }

    #[test]
    fn check_fails() {
        // x0 -> x1 -> x2, both arrows 1: d² = 1 ≠ 0
        let mut diff = MorMat::new(3);
        diff.set(1, 0, F(1));
        diff.set(2, 1, F(1));
        let cx = Complex::new(vec![10, 11, 12], diff);

        assert!(!cx.check());
    }

    #[test]
    fn cancel() {
        let mut cx = sample();
        cx.cancel(0, 1);
        cx.resize();

        assert_eq!(cx.objects(), &[12, 13]);
        assert_eq!(cx.d(0, 1), Some(&F(-6)));
        assert!(cx.check());
    }

    #[test]
    fn cancel_all() {
        let mut cx = sample();
        let count = cx.cancel_all();

        assert_eq!(count, 1);
        assert_eq!(cx.objects(), &[12, 13]);
        assert!(cx.find_invertible().is_none());
    }

    #[test]
    fn cancel_order_independent() {
        // x0 -> x1 (1), x0 -> x2 (1): either cancellation leaves one object
        let build = || {
            let mut diff = MorMat::new(3);
            diff.set(1, 0, F(1));
            diff.set(2, 0, F(1));
            Complex::new(vec![10, 11, 12], diff)
        };

        let mut a = build();
        a.cancel(0, 1);
        a.resize();

        let mut b = build();
        b.cancel(0, 2);
        b.resize();

        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert!(a.check() && b.check());
    }

    #[test]
    fn isotopy() {
        let mut cx = sample();
        // add 5 · (x2 -> x1); d changes but stays a complex
        cx.isotopy(2, 1, &F(5));

        assert!(cx.check());
        assert_eq!(cx.d(1, 0), Some(&F(-14)));
        assert_eq!(cx.d(2, 0), Some(&F(3)));
    }

    #[test]
    fn display() {
        let expected = "    === objects ===
object 0: 10
object 1: 11
object 2: 12
object 3: 13
    === diffs ===
∂: 0 –––> 1: 1
∂: 0 –––> 2: 3
∂: 3 –––> 1: 2";
        assert_eq!(sample().to_string(), expected);
    }

    #[test]
    fn map() {
        let cx = sample();
        let cx2: Complex<F> = cx.map(|o| o + 1, |m| F(2 * m.0));
        assert_eq!(cx2.objects(), &[11, 12, 13, 14]);
        assert_eq!(cx2.d(1, 0), Some(&F(2)));
    }
}
