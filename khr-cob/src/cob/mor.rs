use std::fmt;
use std::fmt::Display;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg};
use auto_impl_ops::auto_ops;
use itertools::Itertools;
use num_traits::Zero;
use khr::{Ring, RingOps};
use khr::bitseq::{Bit, BitSeq};
use crate::{BnMor, CobObj, components};

/// Decoration of a cobordism: a power of `H`, one dot flag per
/// component, and a coefficient.
#[derive(Clone, PartialEq, Eq, Debug)]
struct Deco<R> {
    hpow: i32,
    dots: BitSeq,
    coeff: R
}

impl<R> Deco<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    fn new(hpow: i32, dots: BitSeq, coeff: R) -> Self {
        Self { hpow, dots, coeff }
    }

    fn gr_q(&self) -> i32 {
        -2 * self.hpow + self.dots.len() as i32 - 2 * self.dots.weight() as i32
    }

    /// Appends the dots of `other`, adds `H`-powers and multiplies
    /// coefficients.
    fn merge(&self, other: &Self) -> Self {
        let mut dots = self.dots;
        for b in other.dots.iter() {
            dots.push(b);
        }
        Self::new(self.hpow + other.hpow, dots, &self.coeff * &other.coeff)
    }

    /// `order[k]` is the new position of the dot at old position `k`.
    fn reorder_old2new(&mut self, order: &[usize]) {
        let mut dots = BitSeq::zeros(order.len());
        for (k, &i) in order.iter().enumerate() {
            if self.dots[k].is_one() {
                dots.set_1(i);
            }
        }
        self.dots = dots;
    }

    /// `order[k]` is the old position of the dot at new position `k`.
    fn reorder_new2old(&mut self, order: &[usize]) {
        let mut dots = BitSeq::zeros(order.len());
        for (k, &i) in order.iter().enumerate() {
            if self.dots[i].is_one() {
                dots.set_1(k);
            }
        }
        self.dots = dots;
    }

    fn edit_dots<F>(&self, f: F) -> Self
    where F: FnOnce(&mut BitSeq) {
        let mut copy = self.clone();
        f(&mut copy.dots);
        copy
    }
}

/// Morphism in the dotted cobordism category: a linear combination of
/// decorated cobordisms between two crossingless tangles. All summands
/// share the underlying surface, whose components are determined by the
/// boundary tangles.
#[derive(Clone, Eq, Debug)]
pub struct CobMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    front: CobObj,
    back: CobObj,
    comps: Vec<Vec<usize>>,
    decos: Vec<Deco<R>>
}

impl<R> CobMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    pub fn new(front: CobObj, back: CobObj, decos: Vec<(i32, BitSeq, R)>) -> Self {
        let comps = components(front.arcs(), back.arcs());
        let decos = decos.into_iter().map(|(hpow, dots, coeff)| {
            assert_eq!(dots.len(), comps.len());
            Deco::new(hpow, dots, coeff)
        }).collect();

        let mut res = Self { front, back, comps, decos };
        res.simplify();
        res
    }

    pub fn id(obj: CobObj) -> Self {
        let n = obj.strands();
        Self::new(obj.clone(), obj, vec![(0, BitSeq::zeros(n), R::one())])
    }

    pub fn zero() -> Self {
        Self {
            front: CobObj::b(),
            back: CobObj::b(),
            comps: vec![],
            decos: vec![]
        }
    }

    pub fn is_zero(&self) -> bool {
        self.decos.is_empty()
    }

    pub fn front(&self) -> &CobObj {
        &self.front
    }

    pub fn back(&self) -> &CobObj {
        &self.back
    }

    fn simplify(&mut self) {
        self.decos.sort_by_key(|d| (d.dots, d.hpow));

        let mut merged: Vec<Deco<R>> = vec![];
        for d in self.decos.drain(..) {
            if let Some(last) = merged.last_mut() {
                if last.hpow == d.hpow && last.dots == d.dots {
                    last.coeff += d.coeff;
                    continue
                }
            }
            merged.push(d);
        }
        merged.retain(|d| !d.coeff.is_zero());

        self.decos = merged;
    }

    pub fn is_inv(&self) -> bool {
        self.front.compatible(&self.back) &&
        self.decos.len() == 1 &&
        self.decos[0].hpow == 0 &&
        self.decos[0].dots.weight() == 0 &&
        self.decos[0].coeff.is_unit()
    }

    pub fn inv(&self) -> Option<Self> {
        if !self.is_inv() {
            return None
        }
        let c = self.decos[0].coeff.inv()?;
        Some(Self::new(self.back.clone(), self.front.clone(), vec![
            (0, BitSeq::zeros(self.comps.len()), c)
        ]))
    }

    /// Quantum degree of the morphism. All summands must share it.
    pub fn gr_q(&self) -> i32 {
        assert!(!self.is_zero());

        let d = self.decos[0].gr_q();
        assert!(self.decos.iter().all(|x| x.gr_q() == d));

        self.back.gr.q - self.front.gr.q + d - self.front.strands() as i32
    }

    /// Shifts the gradings of both boundary objects uniformly.
    pub fn shifted_gr(&self, dh: i32, dq: i32) -> Self {
        let mut res = self.clone();
        res.front.shift(dh, dq);
        res.back.shift(dh, dq);
        res
    }

    pub fn check(&self, from: &CobObj, to: &CobObj) -> bool {
        self.is_zero() ||
        (self.front.compatible(from) && self.back.compatible(to))
    }

    /// Extends the cobordism by an identity cylinder over a new arc at
    /// slots `i`, `i + 1`. `front` and `back` are the capped tangles.
    pub fn add_cap(&self, front: CobObj, back: CobObj, i: usize) -> Self {
        let mut comps = self.comps.clone();
        for c in comps.iter_mut() {
            for e in c.iter_mut() {
                if *e >= i {
                    *e += 2;
                }
            }
        }
        let k = comps.iter().position(|c| c[0] > i).unwrap_or(comps.len());
        comps.insert(k, vec![i, i + 1]);

        let decos = self.decos.iter().map(|d| {
            let mut d = d.clone();
            d.dots.insert_0(k);
            d
        }).collect();

        Self { front, back, comps, decos }
    }

    /// Cups off a circle present on both sides at slot `i`, closing it
    /// with caps that carry the given dots. `(false, true)` vanishes
    /// and is rejected.
    pub fn add_cup_22(&self, front: CobObj, back: CobObj, i: usize,
                      dot_from: bool, dot_to: bool) -> Self {
        let comp_i = self.comps.iter().position(|c| c[0] == i).unwrap();

        let mut comps = self.comps.clone();
        comps.remove(comp_i);
        for c in comps.iter_mut() {
            for e in c.iter_mut() {
                if *e > i + 1 {
                    *e -= 2;
                }
            }
        }

        let decos = self.decos.iter().filter_map(|d| {
            let dotted = d.dots[comp_i].is_one();
            let mut d = d.clone();
            d.dots.remove(comp_i);

            match (dot_from, dot_to) {
                (false, false) if !dotted => Some(d),
                (true, false) if dotted => Some(d),
                (true, true) => {
                    if dotted {
                        d.hpow += 1;
                    }
                    Some(d)
                },
                (false, true) => panic!(),
                _ => None
            }
        }).collect();

        let mut res = Self { front, back, comps, decos };
        res.simplify();
        res
    }

    /// Cups at slot `i` where exactly one side closes a circle there.
    /// `dot_from` / `dot_to` record the dots on the closing caps.
    pub fn add_cup_mixed(&self, front: CobObj, back: CobObj, i: usize,
                         dot_from: bool, dot_to: bool) -> Self {
        let comp_i = self.comps.iter().position(|c| c.contains(&i)).unwrap();
        let comp_names = self.cup_comp_names(i, &[(comp_i, i)]);

        let comps = components(front.arcs(), back.arcs());
        let order = new_order_new2old(&comps, &comp_names);
        let comp_i_new = order.iter().position(|&k| k == comp_i).unwrap();

        let decos = self.decos.iter().flat_map(|d| {
            let mut d = d.clone();
            d.reorder_new2old(&order);

            if !dot_from && !dot_to {
                // neck-cut the dotless summands
                if d.dots[comp_i_new].is_one() {
                    return vec![]
                }
                let dotted = {
                    let mut t = d.clone();
                    t.dots.set_1(comp_i_new);
                    t
                };
                let shifted = Deco::new(d.hpow + 1, d.dots, -d.coeff);
                vec![dotted, shifted]
            } else if dot_to {
                if d.dots[comp_i_new].is_one() {
                    d.hpow += 1;
                } else {
                    d.dots.set_1(comp_i_new);
                }
                vec![d]
            } else {
                vec![d]
            }
        }).collect();

        let mut res = Self { front, back, comps, decos };
        res.simplify();
        res
    }

    /// Cups at slot `i` where neither side closes a circle. Splits or
    /// merges components of the cobordism.
    pub fn add_cup_11(&self, front: CobObj, back: CobObj, i: usize) -> Self {
        let comp_i0 = self.comps.iter().position(|c| c.contains(&i)).unwrap();
        let comp_i1 = self.comps.iter().position(|c| c.contains(&(i + 1))).unwrap();

        let comps = components(front.arcs(), back.arcs());

        if comp_i0 == comp_i1 {
            // the component splits in two
            let comp_names = self.cup_comp_names(i, &[(comp_i0, i)]);
            let sentinel = comp_names.len();
            let order = new_order_new2old(&comps, &comp_names);
            let comp_i0_new = order.iter().position(|&k| k == comp_i0).unwrap();
            let comp_i1_new = order.iter().position(|&k| k == sentinel).unwrap();

            let decos = self.decos.iter().flat_map(|d| {
                let mut d = d.clone();
                d.dots.push(Bit::Bit0);
                d.reorder_new2old(&order);

                if d.dots[comp_i0_new].is_one() {
                    d.dots.set_1(comp_i1_new);
                    return vec![d]
                }

                // neck-cutting
                let d0 = d.edit_dots(|dots| dots.set_1(comp_i0_new));
                let d1 = d.edit_dots(|dots| dots.set_1(comp_i1_new));
                let dh = Deco::new(d.hpow + 1, d.dots, -d.coeff);
                vec![d0, d1, dh]
            }).collect();

            let mut res = Self { front, back, comps, decos };
            res.simplify();
            res
        } else {
            // two components merge
            let comp_names = self.cup_comp_names(i, &[(comp_i0, i), (comp_i1, i + 1)]);
            let order = new_order_new2old(&comps, &comp_names);

            let decos = self.decos.iter().map(|d| {
                let mut d = d.clone();
                let d0 = d.dots[comp_i0].is_one();
                let d1 = d.dots[comp_i1].is_one();
                if d0 && d1 {
                    d.hpow += 1;
                } else if d0 != d1 {
                    d.dots.set_1(comp_i0);
                    d.dots.set_1(comp_i1);
                }
                d.reorder_new2old(&order);
                d
            }).collect();

            let mut res = Self { front, back, comps, decos };
            res.simplify();
            res
        }
    }

    /// Names the old components by their smallest endpoint, renumbered
    /// for the tangles with slots `i`, `i + 1` removed. Components
    /// listed in `renamed` lose the given endpoint as their minimum.
    fn cup_comp_names(&self, i: usize, renamed: &[(usize, usize)]) -> Vec<usize> {
        self.comps.iter().enumerate().map(|(k, c)| {
            let f = renamed.iter().find(|&&(rk, re)|
                rk == k && c[0] == re
            ).map(|&(_, re)|
                *c.iter().filter(|&&e| e != i && e != i + 1 && e != re)
                    .min().unwrap()
            ).unwrap_or(c[0]);

            if f > i + 1 { f - 2 } else { f }
        }).collect()
    }

    /// Collapses a cobordism between 4-ended (or 2-ended) tangles to
    /// the Bar-Natan algebra. `special_end` marks the tangle end whose
    /// component carries the relation `dot = 0`.
    pub fn to_bn(&self, special_end: usize) -> BnMor<R> {
        if self.is_zero() {
            return BnMor::zero()
        }

        let from = self.front.to_bn().idem;
        let to = self.back.to_bn().idem;

        let labels = match self.comps.len() {
            1 => {
                self.decos.iter().filter_map(|d| {
                    if d.dots[0].is_one() {
                        return None
                    }
                    let l = if self.front.strands() == 1 {
                        (d.hpow, d.coeff.clone())
                    } else {
                        let c = if d.hpow % 2 == 0 { d.coeff.clone() } else { -&d.coeff };
                        (-1 - 2 * d.hpow, c)
                    };
                    Some(l)
                }).collect_vec()
            },
            2 => {
                let special = if self.comps[0].contains(&special_end) { 0 } else { 1 };
                let other = 1 - special;

                self.decos.iter().flat_map(|d| {
                    if d.dots[special].is_one() {
                        return vec![]
                    }
                    let n = d.hpow;
                    let c = d.coeff.clone();
                    if d.dots[other].is_one() {
                        vec![(n + 1, c)]
                    } else if n == 0 {
                        vec![(0, c)]
                    } else {
                        let s = if n % 2 == 0 { c.clone() } else { -&c };
                        vec![(n, c), (-2 * n, s)]
                    }
                }).collect_vec()
            },
            _ => panic!("cannot collapse {self}")
        };

        BnMor::new(from, to, labels)
    }
}

fn new_order_new2old(new_comps: &[Vec<usize>], comp_names: &[usize]) -> Vec<usize> {
    new_comps.iter().map(|c|
        comp_names.iter().position(|&f| f == c[0]).unwrap_or(comp_names.len())
    ).collect()
}

impl<R> PartialEq for CobMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    fn eq(&self, other: &Self) -> bool {
        if self.is_zero() && other.is_zero() {
            return true
        }
        self.front.compatible(&other.front) &&
        self.back.compatible(&other.back) &&
        self.decos == other.decos
    }
}

impl<R> Display for CobMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0")
        }
        let s = self.decos.iter().map(|d|
            format!("({}; H^{}; {})", d.dots, d.hpow, d.coeff)
        ).join(" + ");
        write!(f, "{}: {s} -> {}", self.front, self.back)
    }
}

// Composition: `m2 * m1` is `m2 ∘ m1`, with `m1` applied first. The two
// surfaces are glued along the middle tangle, every glued part is
// neck-cut back to a union of disks, and the dots are renumbered to the
// components of the composite.
#[auto_ops]
impl<'a, 'b, R> Mul<&'b CobMor<R>> for &'a CobMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    type Output = CobMor<R>;
    fn mul(self, rhs: &'b CobMor<R>) -> CobMor<R> {
        if self.is_zero() || rhs.is_zero() {
            return CobMor::zero()
        }

        assert!(self.front.compatible(&rhs.back));

        let comps = components(rhs.front.arcs(), self.back.arcs());
        let middle = rhs.back.arcs();

        // group the composite components by connectivity through the
        // middle tangle
        let mut parts: Vec<Vec<usize>> = vec![];
        let mut remaining = (0..comps.len()).collect_vec();
        while let Some(c0) = remaining.pop() {
            let mut part = vec![c0];
            let mut ends = comps[c0].clone();
            let mut k = 0;
            while k < ends.len() {
                let e = middle[ends[k]];
                if !ends.contains(&e) {
                    let pos = remaining.iter().position(|&c|
                        comps[c].contains(&e)
                    ).unwrap();
                    let c = remaining.remove(pos);
                    part.push(c);
                    ends.extend(comps[c].iter().copied());
                }
                k += 1;
            }
            parts.push(part);
        }

        struct Part {
            comps: Vec<usize>,
            part1: Vec<usize>,  // components of the first cobordism
            part2: Vec<usize>,  // components of the second
            genus: i32
        }

        let parts = parts.into_iter().map(|part| {
            let ends = part.iter().flat_map(|&c| comps[c].iter().copied()).collect_vec();
            let part1 = (0..rhs.comps.len()).filter(|&k|
                ends.contains(&rhs.comps[k][0])
            ).collect_vec();
            let part2 = (0..self.comps.len()).filter(|&k|
                ends.contains(&self.comps[k][0])
            ).collect_vec();
            let genus = 1 - ((part1.len() + part2.len() + part.len()) as i32
                - ends.len() as i32 / 2) / 2;
            Part { comps: part, part1, part2, genus }
        }).collect_vec();

        let order = parts.iter()
            .flat_map(|p| p.comps.iter().copied())
            .collect_vec();

        let mut decos = vec![];
        for (d1, d2) in rhs.decos.iter().cartesian_product(self.decos.iter()) {
            let mut acc = vec![Deco::new(0, BitSeq::empty(), R::one())];

            for p in parts.iter() {
                let n = p.comps.len();
                let g = p.genus;
                let r = p.part1.iter().filter(|&&k| d1.dots[k].is_one()).count()
                      + p.part2.iter().filter(|&&k| d2.dots[k].is_one()).count();

                let alts = if r > 0 {
                    vec![Deco::new(g + r as i32 - 1, BitSeq::ones(n), R::one())]
                } else {
                    let mut alts = BitSeq::generate_proper(n).into_iter().map(|dots| {
                        let e = g + (n - dots.weight()) as i32;
                        let c = if e % 2 == 0 { -R::one() } else { R::one() };
                        Deco::new(e - 1, dots, c)
                    }).collect_vec();
                    if g % 2 == 1 {
                        alts.push(Deco::new(g - 1, BitSeq::ones(n), R::one() + R::one()));
                    }
                    alts
                };

                acc = acc.into_iter().cartesian_product(alts)
                    .map(|(a, b)| a.merge(&b))
                    .collect_vec();
            }

            let scalar = Deco::new(d1.hpow + d2.hpow, BitSeq::empty(), &d1.coeff * &d2.coeff);
            for a in acc {
                let mut d = a.merge(&scalar);
                d.reorder_old2new(&order);
                decos.push(d);
            }
        }

        let mut res = CobMor {
            front: rhs.front.clone(),
            back: self.back.clone(),
            comps,
            decos
        };
        res.simplify();
        res
    }
}

#[auto_ops]
impl<R> AddAssign<&CobMor<R>> for CobMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    fn add_assign(&mut self, rhs: &CobMor<R>) {
        if rhs.is_zero() {
            return
        }
        if self.is_zero() {
            *self = rhs.clone();
            return
        }

        assert!(self.front.compatible(&rhs.front));
        assert!(self.back.compatible(&rhs.back));

        self.decos.extend(rhs.decos.iter().cloned());
        self.simplify();
    }
}

impl<R> Neg for CobMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    type Output = Self;
    fn neg(mut self) -> Self {
        for d in self.decos.iter_mut() {
            d.coeff = -&d.coeff;
        }
        self
    }
}

impl<R> Neg for &CobMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    type Output = CobMor<R>;
    fn neg(self) -> CobMor<R> {
        -self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saddle<const FWD: bool>() -> CobMor<i64> {
        let (f, b) = if FWD {
            (CobObj::b(), CobObj::c())
        } else {
            (CobObj::c(), CobObj::b())
        };
        CobMor::new(f, b, vec![(0, BitSeq::zeros(1), 1)])
    }

    #[test]
    fn id_compose() {
        let id = CobMor::<i64>::id(CobObj::b());
        assert_eq!(&id * &id, id);
        assert!(id.is_inv());
        assert_eq!(id.inv().unwrap(), id);
    }

    #[test]
    fn saddle_saddle() {
        // neck-cutting: dot left + dot right - H
        let m = saddle::<false>() * saddle::<true>();
        let e = CobMor::new(CobObj::b(), CobObj::b(), vec![
            (1, BitSeq::zeros(2), -1),
            (0, BitSeq::from([1, 0]), 1),
            (0, BitSeq::from([0, 1]), 1),
        ]);
        assert_eq!(m, e);
    }

    #[test]
    fn compose_associative() {
        let f = saddle::<true>();
        let g = saddle::<false>();
        let h = saddle::<true>();
        assert_eq!(&(&h * &g) * &f, &h * &(&g * &f));
    }

    #[test]
    fn simplify_idempotent() {
        let m = saddle::<false>() * saddle::<true>();
        let mut m2 = m.clone();
        m2.simplify();
        assert_eq!(m2, m);
    }

    #[test]
    fn dot_squared() {
        // dot^2 = H dot
        let b = CobObj::b();
        let dot = CobMor::new(b.clone(), b.clone(), vec![(0, BitSeq::from([1, 0]), 1)]);
        let e = CobMor::new(b.clone(), b, vec![(1, BitSeq::from([1, 0]), 1)]);
        assert_eq!(&dot * &dot, e);
    }

    #[test]
    fn gr() {
        let id = CobMor::<i64>::id(CobObj::b());
        assert_eq!(id.gr_q(), 0);

        let s = CobMor::<i64>::new(
            CobObj::b(),
            CobObj::c().shifted(1, 1),
            vec![(0, BitSeq::zeros(1), 1)]
        );
        assert_eq!(s.gr_q(), 0);
    }

    #[test]
    fn to_bn() {
        use crate::Idem::{B, C};

        let s = saddle::<true>().to_bn(0);
        assert_eq!(s, BnMor::gen(B, C, -1, 1));

        let b = CobObj::b();
        let id = CobMor::<i64>::id(b.clone()).to_bn(0);
        assert_eq!(id, BnMor::gen(B, B, 0, 1));

        // dot away from the special end is D
        let dot = CobMor::new(b.clone(), b.clone(), vec![(0, BitSeq::from([0, 1]), 1)]);
        assert_eq!(dot.to_bn(0), BnMor::gen(B, B, 1, 1));

        // dot on the special end vanishes
        let dot = CobMor::new(b.clone(), b.clone(), vec![(0, BitSeq::from([1, 0]), 1)]);
        assert!(dot.to_bn(0).is_zero());

        // H = D - S^2
        let h = CobMor::new(b.clone(), b, vec![(1, BitSeq::zeros(2), 1)]);
        assert_eq!(h.to_bn(0), BnMor::new(B, B, vec![(1, 1), (-2, -1)]));
    }

    #[test]
    fn to_bn_functorial() {
        let f = saddle::<true>();
        let g = saddle::<false>();
        assert_eq!((&g * &f).to_bn(0), &g.to_bn(0) * &f.to_bn(0));
    }

    #[test]
    fn add() {
        let b = CobObj::b();
        let x = CobMor::new(b.clone(), b.clone(), vec![(0, BitSeq::from([1, 0]), 1)]);
        let y = CobMor::new(b.clone(), b.clone(), vec![(0, BitSeq::from([1, 0]), 2)]);
        let e = CobMor::new(b.clone(), b.clone(), vec![(0, BitSeq::from([1, 0]), 3)]);
        assert_eq!(&x + &y, e);
        assert!((&x + &-&x).is_zero());
    }
}
