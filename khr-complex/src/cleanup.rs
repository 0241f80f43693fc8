use itertools::Itertools;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use khr::{Ring, RingOps, ZMod, ZSim};
use khr_cob::{BnMor, BnObj, Face};
use crate::{Complex, Mor, MorMat};

impl<R> Mor for BnMor<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    type Obj = BnObj;

    fn zero() -> Self {
        BnMor::zero()
    }

    fn is_zero(&self) -> bool {
        BnMor::is_zero(self)
    }

    fn is_inv(&self) -> bool {
        BnMor::is_inv(self)
    }

    fn inv(&self) -> Option<Self> {
        BnMor::inv(self)
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

    fn is_valid_between(&self, from: &BnObj, to: &BnObj) -> bool {
        self.check(from.idem, to.idem)
    }
}

/// True if `candidate` is a strictly better (shorter) arrow of its face
/// than `current`. Identity labels never qualify.
fn arrow_is_shorter(candidate: Option<i32>, current: Option<i32>) -> bool {
    let Some(a) = candidate else {
        return false
    };
    if a == 0 {
        return false
    }
    let Some(b) = current else {
        return true
    };
    if a > 0 { b > a } else { b < a }
}

impl<R> Complex<BnMor<R>>
where R: Ring, for<'x> &'x R: RingOps<R> {
    pub fn map_coeffs<S, F>(&self, f: F) -> Complex<BnMor<S>>
    where
        S: Ring, for<'x> &'x S: RingOps<S>,
        F: Fn(&R) -> S
    {
        self.map(|o| *o, |m| m.map_coeffs(&f))
    }

    /// A complex is loop-type for a face when every object has at most
    /// one incoming and one outgoing arrow carrying that face. Arrows
    /// are counted per label, so a single entry `D + D²` is two.
    pub fn is_loop_type(&self, face: Face) -> bool {
        let n = self.len();
        let mut row_count = vec![0; n];

        for c in 0..n {
            let mut out = 0;
            for (r, m) in self.diffs().col(c) {
                let k = m.num_labels_of_face(face);
                if k == 0 {
                    continue
                }
                out += k;
                row_count[r] += k;
                if out > 1 || row_count[r] > 1 {
                    return false
                }
            }
        }
        true
    }

    /// Mapping cone of H^n acting on the complex, where H = D − S², so
    /// H^n carries the labels D^n + (−1)^n S^(2n).
    pub fn cone(&self, n: i32) -> Self {
        assert!(n >= 0);
        if n == 0 {
            return self.clone()
        }

        let sign = if n % 2 == 0 { R::one() } else { -R::one() };
        let dim = self.len();

        let mut objs = self.objects().iter().map(|o| {
            let mut o = *o;
            o.gr.shift(-1, -n);
            o
        }).collect_vec();
        objs.extend(self.objects().iter().map(|o| {
            let mut o = *o;
            o.gr.shift(0, n);
            o
        }));

        let mut diff = MorMat::new(2 * dim);
        for (r, c, m) in self.diffs().entries() {
            diff.set(r, c, -m);
            diff.set(dim + r, dim + c, m.clone());
        }
        for (i, o) in self.objects().iter().enumerate() {
            let h = BnMor::new(o.idem, o.idem, vec![(n, R::one()), (-2 * n, sign.clone())]);
            diff.set(dim + i, i, h);
        }

        Complex::new(objs, diff)
    }

    /// One randomized clean-up pass for the given face. Repeatedly
    /// picks a start object, walks to a locally shortest arrow among
    /// the objects not yet handled in this pass, and isolates it.
    pub fn clean_up_once(&mut self, face: Face, rng: &mut impl Rng) {
        let mut remaining = (0..self.len()).collect_vec();

        while !remaining.is_empty() {
            let idx = rng.gen_range(0..remaining.len());
            let mut start = remaining[idx];
            let mut end = start;
            let mut found = false;
            let mut best: Option<i32> = None;

            loop {
                let mut changed = false;

                // shorter arrow of the face out of start
                for &x in remaining.iter() {
                    let t = self.d(x, start).and_then(|m| m.type_of_face(face));
                    if arrow_is_shorter(t, best) {
                        end = x;
                        best = t;
                        found = true;
                        changed = true;
                    }
                }

                // shorter arrow of the face into end
                for &x in remaining.iter() {
                    let t = self.d(end, x).and_then(|m| m.type_of_face(face));
                    if arrow_is_shorter(t, best) {
                        start = x;
                        best = t;
                        found = true;
                        changed = true;
                    }
                }

                if !changed {
                    break
                }
            }

            if found {
                self.isolate_arrow(start, end, face);
                remaining.retain(|&k| k != start && k != end);
            } else {
                remaining.retain(|&k| k != start);
            }
        }
    }

    /// Removes every other arrow of the face touching `start` or `end`
    /// by isotopies along the arrow `start → end`. The coefficient of
    /// the face label must be invertible.
    fn isolate_arrow(&mut self, start: usize, end: usize, face: Face) {
        let a = self.d(end, start).unwrap();
        let ty = a.type_of_face(face).unwrap();
        let inv = a.coeff_of_face(face).unwrap().inv().unwrap();

        let idems = self.objects().iter().map(|o| o.idem).collect_vec();
        let start_idem = idems[start];
        let end_idem = idems[end];

        // other face arrows out of start
        let col = self.diffs().col_sorted(start).into_iter()
            .filter(|&(x, _)| x != end)
            .filter_map(|(x, m)| {
                let t = m.type_of_face(face)?;
                let c = m.coeff_of_face(face).unwrap().clone();
                Some((x, t, c))
            })
            .collect_vec();

        for (x, t, c) in col {
            let h = BnMor::gen(end_idem, idems[x], t - ty, &c * &inv);
            self.isotopy(end, x, &h);
        }

        // other face arrows into end
        let row = self.diffs().row(end).into_iter()
            .filter(|&(x, _)| x != start)
            .filter_map(|(x, m)| {
                let t = m.type_of_face(face)?;
                let c = m.coeff_of_face(face).unwrap().clone();
                Some((x, t, c))
            })
            .collect_vec();

        for (x, t, c) in row {
            let h = BnMor::gen(idems[x], start_idem, t - ty, -(&c * &inv));
            self.isotopy(x, start, &h);
        }

        for (x, m) in self.diffs().col_sorted(start) {
            assert!(x == end || m.type_of_face(face).is_none(),
                "arrow {start} → {end} not isolated: face arrow {start} → {x} remains");
        }
        for (x, m) in self.diffs().row(end) {
            assert!(x == start || m.type_of_face(face).is_none(),
                "arrow {start} → {end} not isolated: face arrow {x} → {end} remains");
        }
    }

    /// Alternates clean-up passes over both faces until the complex is
    /// loop-type, up to `max_iter · 10` passes. Returns a soft error on
    /// exhaustion.
    pub fn clean_up(&mut self, max_iter: usize, rng: &mut impl Rng) -> Result<(), String> {
        let budget = max_iter * 10;

        for iter in 0..budget {
            if iter % 10 == 0 && self.is_loop_type(Face::D) && self.is_loop_type(Face::S) {
                info!("loop-type after {iter} clean-up passes");
                return Ok(())
            }
            let face = if iter % 2 == 0 { Face::D } else { Face::S };
            self.clean_up_once(face, rng);
        }

        if self.is_loop_type(Face::D) && self.is_loop_type(Face::S) {
            Ok(())
        } else {
            Err(format!("clean-up did not reach loop-type form within {budget} passes"))
        }
    }

    pub fn clean_up_seeded(&mut self, max_iter: usize, seed: u64) -> Result<(), String> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.clean_up(max_iter, &mut rng)
    }
}

impl Complex<BnMor<ZSim>> {
    /// Projects a simulant-coefficient complex to the given prime
    /// modulus, dropping entries that become zero.
    pub fn to_coeff<const M: i64>(&self) -> Complex<BnMor<ZMod<M>>> {
        self.map_coeffs(|c| c.cast::<M>())
    }
}
