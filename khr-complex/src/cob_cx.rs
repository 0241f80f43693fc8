use itertools::Itertools;
use log::info;
use khr::{Ring, RingOps};
use khr::bitseq::BitSeq;
use khr_cob::{components, BnMor, CobMor, CobObj};
use crate::{Complex, Mor, MorMat};

impl<R> Mor for CobMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    type Obj = CobObj;

    fn zero() -> Self {
        CobMor::zero()
    }

    fn is_zero(&self) -> bool {
        CobMor::is_zero(self)
    }

    fn is_inv(&self) -> bool {
        CobMor::is_inv(self)
    }

    fn inv(&self) -> Option<Self> {
        CobMor::inv(self)
    }

    fn compose(&self, first: &Self) -> Self {
        self * first
    }

    fn plus(&self, other: &Self) -> Self {
        self + other
    }

    fn negate(&self) -> Self {
        -self
    }

    fn is_valid_between(&self, from: &CobObj, to: &CobObj) -> bool {
        self.check(from, to)
    }
}

impl<R> Complex<CobMor<R>>
where R: Ring, for<'x> &'x R: RingOps<R> {
    /// Complex of a single crossingless tangle with no differential.
    pub fn from_obj(obj: CobObj) -> Self {
        Complex::new(vec![obj], MorMat::new(1))
    }

    pub fn shift(&self, dh: i32, dq: i32) -> Self {
        self.map(|o| o.shifted(dh, dq), |m| m.shifted_gr(dh, dq))
    }

    /// Tensors the complex with a cap (new arc) at slots `i`, `i + 1`.
    pub fn add_cap(&self, i: usize) -> Self {
        let objs = self.objects().iter().map(|o| {
            let mut o = o.clone();
            o.add_cap(i);
            o
        }).collect_vec();

        let mut diff = MorMat::new(objs.len());
        for (r, c, m) in self.diffs().entries() {
            diff.set(r, c, m.add_cap(objs[c].clone(), objs[r].clone(), i));
        }

        Complex::new(objs, diff)
    }

    /// Tensors the complex with a cup at slots `i`, `i + 1`. Objects
    /// where the cup closes a circle are delooped on the fly into a
    /// (0,−1) and a (0,+1) shifted copy.
    pub fn add_cup(&self, i: usize) -> Self {
        let objs = self.objects();
        let circle = objs.iter().map(|o| o.cup_gives_circle(i)).collect_vec();

        let mut index = Vec::with_capacity(objs.len());
        let mut next = 0;
        for &c in circle.iter() {
            index.push(next);
            next += if c { 2 } else { 1 };
        }

        let mut new_objs = Vec::with_capacity(next);
        for (j, o) in objs.iter().enumerate() {
            let mut o = o.clone();
            o.add_cup(i);
            if circle[j] {
                new_objs.push(o.shifted(0, -1));
                new_objs.push(o.shifted(0, 1));
            } else {
                new_objs.push(o);
            }
        }

        let mut diff = MorMat::new(next);
        for (r, c, m) in self.diffs().entries() {
            let (e, s) = (index[r], index[c]);
            let obj = |k: usize| new_objs[k].clone();

            match (circle[c], circle[r]) {
                (true, true) => {
                    diff.set(e, s, m.add_cup_22(obj(s), obj(e), i, false, false));
                    diff.set(e, s + 1, m.add_cup_22(obj(s + 1), obj(e), i, true, false));
                    diff.set(e + 1, s + 1, m.add_cup_22(obj(s + 1), obj(e + 1), i, true, true));
                },
                (true, false) => {
                    diff.set(e, s, m.add_cup_mixed(obj(s), obj(e), i, false, false));
                    diff.set(e, s + 1, m.add_cup_mixed(obj(s + 1), obj(e), i, true, false));
                },
                (false, true) => {
                    diff.set(e, s, m.add_cup_mixed(obj(s), obj(e), i, true, false));
                    diff.set(e + 1, s, m.add_cup_mixed(obj(s), obj(e + 1), i, true, true));
                },
                (false, false) => {
                    diff.set(e, s, m.add_cup_11(obj(s), obj(e), i));
                }
            }
        }

        let res = Complex::new(new_objs, diff);
        debug_assert!(res.diffs().entries().all(|(_, _, m)| m.gr_q() == 0));
        res
    }

    /// Tensors the complex with a crossing at slots `i`, `i + 1`. The
    /// result is the mapping cone of the saddle between the two
    /// resolutions; `x_type` picks the direction of the saddle and
    /// `positive` the overall grading shifts.
    pub fn add_crossing(&self, i: usize, positive: bool, x_type: bool) -> Self {
        let cupcap = self.add_cup(i).add_cap(i);

        let (left, right) = if x_type {
            (cupcap, self.clone())
        } else {
            (self.clone(), cupcap)
        };
        let (left, right) = if positive {
            (left.shift(0, 1), right.shift(1, 2))
        } else {
            (left.shift(-1, -2), right.shift(0, -1))
        };

        let dim_l = left.len();
        let dim_r = right.len();

        let mut objs = left.objects().to_vec();
        objs.extend(right.objects().iter().cloned());

        let mut diff = MorMat::new(dim_l + dim_r);
        for (r, c, m) in left.diffs().entries() {
            diff.set(r, c, m.clone());
        }
        for (r, c, m) in right.diffs().entries() {
            diff.set(dim_l + r, dim_l + c, m.clone());
        }

        let sign_of = |f: &CobObj| {
            if f.h_is_even() { -R::one() } else { R::one() }
        };
        let plain = |f: &CobObj, t: &CobObj| {
            let n = components(f.arcs(), t.arcs()).len();
            CobMor::new(f.clone(), t.clone(), vec![(0, BitSeq::zeros(n), sign_of(f))])
        };
        let dotted = |f: &CobObj, t: &CobObj, with_h: bool| {
            let comps = components(f.arcs(), t.arcs());
            let n = comps.len();
            let k = comps.iter().position(|c| c[0] == i).unwrap();
            let s = sign_of(f);
            let mut decos = vec![(0, BitSeq::zeros(n).edit(|b| b.set_1(k)), s.clone())];
            if with_h {
                decos.push((1, BitSeq::zeros(n), -s));
            }
            CobMor::new(f.clone(), t.clone(), decos)
        };

        if x_type {
            // saddles from the delooped cup-cap block into the original
            let mut from = 0;
            for (j, t) in right.objects().iter().enumerate() {
                let to = dim_l + j;
                if t.cup_gives_circle(i) {
                    diff.set(to, from, dotted(&left.objects()[from], t, true));
                    from += 1;
                }
                diff.set(to, from, plain(&left.objects()[from], t));
                from += 1;
            }
            assert_eq!(from, dim_l);
        } else {
            // saddles from the original block into the delooped cup-cap
            let mut to = dim_l;
            for (from, f) in left.objects().iter().enumerate() {
                if f.cup_gives_circle(i) {
                    diff.set(to, from, plain(f, &right.objects()[to - dim_l]));
                    to += 1;
                    diff.set(to, from, dotted(f, &right.objects()[to - dim_l], false));
                } else {
                    diff.set(to, from, plain(f, &right.objects()[to - dim_l]));
                }
                to += 1;
            }
            assert_eq!(to, dim_l + dim_r);
        }

        let res = Complex::new(objs, diff);
        debug_assert!(res.diffs().entries().all(|(_, _, m)| m.gr_q() == 0));
        debug_assert!(res.check());

        info!("added crossing at {i}: {} objects", res.len());
        res
    }

    /// Collapses to a complex over the Bar-Natan algebra.
    pub fn to_bn(&self) -> Complex<BnMor<R>> {
        self.map(|o| o.to_bn(), |m| m.to_bn(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_cup_deloops() {
        let o = CobObj::new(2, vec![1, 0, 3, 2, 5, 4], Default::default());
        let cx = Complex::<CobMor<i64>>::from_obj(o).add_cup(2);

        assert_eq!(cx.len(), 2);
        assert_eq!(cx.objects()[0].gr.q, -1);
        assert_eq!(cx.objects()[1].gr.q, 1);
        assert_eq!(cx.objects()[0].arcs(), &[1, 0, 3, 2]);
    }

    #[test]
    fn kink_cancels() {
        // a Reidemeister 1 kink on the horizontal tangle reduces back
        // to a single object
        let cx = Complex::<CobMor<i64>>::from_obj(CobObj::b())
            .add_crossing(2, true, true);

        assert_eq!(cx.len(), 3);
        assert!(cx.check());

        let mut cx = cx;
        cx.cancel_all();
        assert_eq!(cx.len(), 1);
        assert_eq!(cx.objects()[0].arcs(), CobObj::b().arcs());
        assert_eq!(cx.objects()[0].gr, khr_cob::Bigr::new(0, 0));
        assert!(cx.diffs().entries().next().is_none());
    }

    #[test]
    fn to_bn_saddle() {
        use khr_cob::Idem::{B, C};

        let b = CobObj::b();
        let c = CobObj::c().shifted(1, 1);
        let mut diff = MorMat::new(2);
        diff.set(1, 0, CobMor::<i64>::new(b.clone(), c.clone(), vec![
            (0, BitSeq::zeros(1), 1)
        ]));
        let cx = Complex::new(vec![b, c], diff).to_bn();

        assert_eq!(cx.objects()[0].idem, B);
        assert_eq!(cx.objects()[1].idem, C);
        assert_eq!(cx.d(1, 0), Some(&BnMor::gen(B, C, -1, 1)));
    }
}
