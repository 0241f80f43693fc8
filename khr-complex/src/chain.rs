use std::cmp::Ordering;
use std::fmt;
use std::fmt::Display;
use std::str::FromStr;
use itertools::Itertools;
use log::warn;
use regex::Regex;
use khr::{EucRing, Frac, Ring, RingOps};
use khr::util::format::fill_front;
use khr_cob::{Bigr, BnMor, BnObj, Face, GrWidths, Idem};
use crate::{Complex, KhrCurve};

/// One node of a loop-type chain: a generator together with the arrow
/// leaving it, drawn to the right when `rightarrow` and to the left
/// otherwise. The zero morphism marks the open end of an arc.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Clink<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    pub obj: BnObj,
    pub mor: BnMor<R>,
    pub rightarrow: bool
}

impl<R> Clink<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    pub fn new(obj: BnObj, mor: BnMor<R>, rightarrow: bool) -> Self {
        Self { obj, mor, rightarrow }
    }

    /// Renders the generator and its arrow. Powers, non-unit
    /// coefficients and multi-label arrows are always written out,
    /// plain D and S arrows only when `with_label` is set.
    pub fn to_string_mode(&self, w: &GrWidths, with_grading: bool, with_label: bool, is_4ended: bool) -> String {
        let mut out = String::new();
        if with_grading {
            out.push_str(&self.obj.gr_string(w));
            out.push(' ');
        }
        out.push_str(&self.obj.idem.to_string());

        if self.mor.is_zero() {
            return out
        }

        let ty = self.mor.first_type().unwrap();
        let line = if ty >= 0 { '—' } else { '~' };

        if self.rightarrow {
            out.push(line);
        } else {
            out.push('<');
        }

        let override_label = ty > 1 || ty < -2 ||
            !self.mor.first_coeff().unwrap().is_one() ||
            self.mor.num_labels() > 1;

        if with_label || override_label {
            out.push(line);
            let s = self.mor.to_string_mode(is_4ended);
            if s.starts_with('-') {
                out.push('(');
                out.push_str(&s);
                out.push(')');
            } else {
                out.push_str(&s);
            }
            out.push(line);
        }

        if self.rightarrow {
            out.push('>');
        } else {
            out.push(line);
        }
        out
    }
}

/// A connected component of a loop-type complex: an arc (last arrow
/// zero) or a loop (last arrow closing up cyclically).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Chain<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    clinks: Vec<Clink<R>>
}

impl<R> Chain<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    pub fn new(clinks: Vec<Clink<R>>) -> Self {
        assert!(!clinks.is_empty());
        Self { clinks }
    }

    pub fn clinks(&self) -> &[Clink<R>] {
        &self.clinks
    }

    pub fn len(&self) -> usize {
        self.clinks.len()
    }

    pub fn is_loop(&self) -> bool {
        !self.clinks.last().unwrap().mor.is_zero()
    }

    pub fn to_string_mode(&self, w: &GrWidths, is_4ended: bool) -> String {
        let mut out = self.clinks[0].to_string_mode(w, true, true, is_4ended);
        for c in self.clinks[1..].iter() {
            out.push_str(&c.to_string_mode(w, false, false, is_4ended));
        }
        out
    }

    /// A two-clink component carrying both arrows in a single matrix
    /// entry is split into its S and D halves; with a single label it
    /// is really an arc.
    pub fn fix_shorts(&mut self) {
        if self.clinks.len() != 2 {
            return
        }
        let c0 = self.clinks[0].clone();
        let c1 = self.clinks[1].clone();

        if c0.mor.num_labels() > 1 {
            let parts = c0.mor.split();
            self.clinks = vec![
                Clink::new(c0.obj, parts.first().unwrap().clone(), c0.rightarrow),
                Clink::new(c1.obj, parts.last().unwrap().clone(), !c0.rightarrow)
            ];
        } else {
            self.clinks = vec![
                Clink::new(c0.obj, c0.mor, c0.rightarrow),
                Clink::new(c1.obj, BnMor::zero(), true)
            ];
        }
    }

    /// Normal form: arcs run from lower to higher quantum grading;
    /// loops start at the generator of lowest quantum grading with an
    /// S-arrow in front.
    pub fn sort(&mut self) {
        let n = self.clinks.len();

        if !self.is_loop() {
            if self.clinks[n - 1].obj.gr.q < self.clinks[0].obj.gr.q {
                let old = std::mem::take(&mut self.clinks);
                let mut new = Vec::with_capacity(n);
                for i in (1..n).rev() {
                    new.push(Clink::new(old[i].obj, old[i - 1].mor.clone(), !old[i - 1].rightarrow));
                }
                new.push(Clink::new(old[0].obj, BnMor::zero(), false));
                self.clinks = new;
            }
            return
        }

        let lowest = self.clinks.iter().position_min_by_key(|c| c.obj.gr.q).unwrap();
        self.clinks.rotate_left(lowest);

        if self.clinks[0].mor.first_type().unwrap_or(0) > 0 {
            let old = std::mem::take(&mut self.clinks);
            let n = old.len();
            let mut new = Vec::with_capacity(n);
            new.push(Clink::new(old[0].obj, old[n - 1].mor.clone(), !old[n - 1].rightarrow));
            for i in (1..n).rev() {
                new.push(Clink::new(old[i].obj, old[i - 1].mor.clone(), !old[i - 1].rightarrow));
            }
            self.clinks = new;
        }
    }

    /// Collects all coefficients into the front arrow, setting every
    /// other coefficient to 1. Requires invertible coefficients (a
    /// field), since arrows traversed backwards contribute inverses.
    pub fn concentrate_local_system(&mut self) {
        let n = self.clinks.len();

        if !self.is_loop() {
            for c in self.clinks[..n - 1].iter_mut() {
                c.mor.set_coeff(R::one());
            }
            return
        }

        let mut total = R::one();
        for c in self.clinks.iter_mut() {
            let coeff = c.mor.first_coeff().unwrap().clone();
            if c.rightarrow {
                total = &total * &coeff;
            } else {
                total = &total * &coeff.inv().unwrap();
            }
            c.mor.set_coeff(R::one());
        }

        let front = &mut self.clinks[0];
        if front.rightarrow {
            front.mor.set_coeff(total);
        } else {
            front.mor.set_coeff(total.inv().unwrap());
        }
    }

    /// Classifies a loop as a rational or special curve with its slope.
    /// Panics on arcs and on loops of odd combinatorial length.
    pub fn to_khr_curve(&self) -> KhrCurve {
        let n = self.clinks.len();
        let q = Frac::new(self.clinks.iter().map(|c| c.obj.gr.q as i64).sum(), n as i64);

        assert!(self.is_loop(), "only loops classify as curves");
        assert!(n % 2 == 0, "loop length must be even");

        let idem = |i: usize| self.clinks[i % n].obj.idem;
        let dir = |i: usize| self.clinks[i % n].rightarrow;

        // curves of slope 0 and ∞ of length > 1 have exactly four
        // consecutive pairs of equal idempotents
        if n > 7 {
            let fi = idem(0);
            if idem(n - 1) == fi && idem(n / 2 - 1) == fi && idem(n / 2) == fi {
                let recognized = (1..n)
                    .filter(|&i| i != n / 2 - 1 && i != n / 2 && i != n - 1)
                    .all(|i| idem(i) != fi) &&
                    (0..n / 2).all(|i| dir(i) && !dir(n / 2 + i));

                if recognized {
                    let delta = self.clinks[1].obj.gr.delta();
                    let (p, qs) = if fi == Idem::B { (1, 0) } else { (0, 1) };
                    return KhrCurve::new((n / 2 - 2) as i32, p, qs, delta, q)
                }
            }
        }

        let mut slope_p: i64 = 0;
        let mut slope_q: i64 = 0;
        let mut delta = self.clinks[0].obj.gr.delta();
        for c in self.clinks.iter() {
            if c.obj.idem == Idem::B {
                slope_q += 1;
                delta = c.obj.gr.delta();
            } else {
                slope_p += 1;
            }
        }

        let g = EucRing::gcd(&slope_p, &slope_q);
        assert!(g % 2 == 0, "loop length must be even");
        slope_p /= g;
        slope_q /= g;
        let length = (g / 2) as i32;

        if slope_p == 0 || slope_q == 0 {
            return KhrCurve::new(-length, slope_p, slope_q, self.clinks[0].obj.gr.delta(), q)
        }

        // orientation of the first S-arrow fixes the sign of the slope
        for c in self.clinks.iter() {
            if c.mor.first_type() == Some(-1) {
                let b = c.obj.idem == Idem::B;
                if (b && c.rightarrow) || (!b && !c.rightarrow) {
                    slope_p = -slope_p;
                    break
                }
            }
        }

        if n < 9 {
            return KhrCurve::new(-length, slope_p, slope_q, self.clinks[0].obj.gr.delta(), q)
        }

        // look for the turnback pattern that distinguishes special
        // curves from rational ones
        let half = n / 2;
        let mut length_sign = -1;
        for iter in 0..half {
            let fi = idem(iter);
            let ra = dir(iter);

            if fi == idem(iter + 1) && fi != idem(iter + 2) && fi != idem(iter + 3)
                && ra == dir(iter + 1) && ra == dir(iter + 2)
                && fi != idem(half + iter) && fi != idem(half + iter + 1)
                && fi == idem(half + iter + 2) && fi == idem(half + iter + 3)
                && ra != dir(half + iter) && ra != dir(half + iter + 1) && ra != dir(half + iter + 2)
            {
                let special =
                    (0..half - 4).all(|run| idem(n + iter - run - 1) == idem(iter + 4 + run)) &&
                    (0..half - 3).all(|run| dir(n + iter - run - 1) != dir(iter + 3 + run));

                if special {
                    length_sign = 1;
                    break
                }
            }
        }

        KhrCurve::new(length_sign * length, slope_p, slope_q, delta, q)
    }
}

impl<R> Ord for Chain<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        let rank = |i: Idem| if i == Idem::B { 0 } else { 1 };

        let ord = self.clinks.len().cmp(&other.clinks.len());
        if ord != Ordering::Equal {
            return ord
        }

        let ord = rank(self.clinks[0].obj.idem).cmp(&rank(other.clinks[0].obj.idem));
        if ord != Ordering::Equal {
            return ord
        }

        for (a, b) in self.clinks.iter().zip(other.clinks.iter()) {
            let ord = a.mor.first_type().unwrap_or(0).cmp(&b.mor.first_type().unwrap_or(0));
            if ord != Ordering::Equal {
                return ord
            }
        }

        self.clinks[0].obj.gr.delta().cmp(&other.clinks[0].obj.gr.delta())
            .then(self.clinks[0].obj.gr.q.cmp(&other.clinks[0].obj.gr.q))
    }
}

impl<R> PartialOrd for Chain<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R> Display for Chain<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = GrWidths::collect(std::iter::once(&self.clinks[0].obj.gr));
        write!(f, "{}", self.to_string_mode(&w, true))
    }
}

/// The components of a loop-type complex.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Chains<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    chains: Vec<Chain<R>>
}

impl<R> Chains<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    pub fn new(chains: Vec<Chain<R>>) -> Self {
        Self { chains }
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn chains(&self) -> &[Chain<R>] {
        &self.chains
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chain<R>> {
        self.chains.iter()
    }

    pub fn fix_shorts(&mut self) {
        for chain in self.chains.iter_mut() {
            chain.fix_shorts();
        }
    }

    pub fn sort(&mut self) {
        for chain in self.chains.iter_mut() {
            chain.sort();
        }
        self.chains.sort();
    }

    pub fn concentrate_local_systems(&mut self) {
        for chain in self.chains.iter_mut() {
            chain.concentrate_local_system();
        }
    }

    /// Numbered listing with aligned grading columns. With
    /// `with_curves` each loop is followed by its curve name.
    pub fn to_string_mode(&self, is_4ended: bool, with_curves: bool) -> String {
        let grs = self.chains.iter().map(|c| c.clinks[0].obj.gr).collect_vec();
        let w = GrWidths::collect(grs.iter());
        let cw = self.chains.len().to_string().len();

        let mut out = String::new();
        for (k, chain) in self.chains.iter().enumerate() {
            out.push_str(&fill_front(k + 1, cw));
            out.push_str(") ");
            out.push_str(&chain.to_string_mode(&w, is_4ended));
            if with_curves {
                out.push_str("     ");
                out.push_str(&chain.to_khr_curve().to_string());
            }
            out.push('\n');
        }
        out
    }
}

impl<R> Display for Chains<R>
where R: Ring, for<'x> &'x R: RingOps<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_mode(true, false))
    }
}

impl<R> FromStr for Chains<R>
where R: Ring + FromStr, for<'x> &'x R: RingOps<R> {
    type Err = String;

    /// Parses a numbered listing, one chain per line. Counters and
    /// trailing curve names are ignored.
    fn from_str(s: &str) -> Result<Self, String> {
        let counter = Regex::new(r"^\s*\d+\)\s*").unwrap();
        let curve = Regex::new(r"\s{5}[rs].*$").unwrap();

        let mut chains = vec![];
        for line in s.lines() {
            if line.trim().is_empty() {
                continue
            }
            let line = counter.replace(line, "");
            let line = curve.replace(&line, "");
            chains.push(line.parse()?);
        }
        Ok(Self::new(chains))
    }
}

impl<R> Complex<BnMor<R>>
where R: Ring, for<'x> &'x R: RingOps<R> {
    /// Reads a loop-type complex off as its arcs and loops, in normal
    /// form. Returns an empty list when the complex is not loop-type.
    pub fn to_chains(&self) -> Chains<R> {
        if !(self.is_loop_type(Face::D) && self.is_loop_type(Face::S)) {
            warn!("complex is not loop-type, no chains extracted");
            return Chains::new(vec![])
        }

        let mut remaining = (0..self.len()).collect_vec();
        let mut chains = vec![];

        while let Some(&start) = remaining.last() {
            let mut clinks: Vec<Clink<R>> = vec![];
            let mut current = start;
            let mut second_loop = true;
            let mut rightarrow = true;

            loop {
                let obj = self.objects()[current];
                remaining.retain(|&k| k != current);

                let mut found = None;
                for &k in remaining.iter() {
                    if let Some(m) = self.d(k, current) {
                        found = Some((k, m.clone(), true));
                        break
                    } else if let Some(m) = self.d(current, k) {
                        found = Some((k, m.clone(), false));
                        break
                    }
                }

                if let Some((k, mor, ra)) = found {
                    current = k;
                    rightarrow = ra;
                    clinks.push(Clink::new(obj, mor, rightarrow));
                    continue
                }

                // stuck: close up the loop if possible, else end an arc
                if clinks.len() > 1 && self.d(start, current).is_some() {
                    let m = self.d(start, current).unwrap().clone();
                    clinks.push(Clink::new(obj, m, true));
                    second_loop = false;
                } else if clinks.len() > 1 && self.d(current, start).is_some() {
                    let m = self.d(current, start).unwrap().clone();
                    clinks.push(Clink::new(obj, m, false));
                    second_loop = false;
                } else {
                    clinks.push(Clink::new(obj, BnMor::zero(), rightarrow));
                }
                break
            }

            // extend the arc to the left of the start object
            if second_loop {
                let mut current = start;
                loop {
                    let mut found = None;
                    for &k in remaining.iter() {
                        if let Some(m) = self.d(k, current) {
                            found = Some((k, m.clone(), false));
                            break
                        } else if let Some(m) = self.d(current, k) {
                            found = Some((k, m.clone(), true));
                            break
                        }
                    }

                    let Some((k, mor, ra)) = found else {
                        break
                    };
                    remaining.retain(|&x| x != k);
                    clinks.insert(0, Clink::new(self.objects()[k], mor, ra));
                    current = k;
                }
            }

            chains.push(Chain::new(clinks));
        }

        let mut chains = Chains::new(chains);
        chains.fix_shorts();
        chains.sort();
        chains.concentrate_local_systems();
        chains
    }
}

// ---------------------------------------------------------------------
// text format parsing

fn parse_gr_prefix(s: &str) -> Result<(Bigr, &str), String> {
    let re = Regex::new(r"^h\^\s*(-?\d+)\s+q\^\s*(-?\d+)\s+δ\^\s*(-?\d+(?:/-?\d+)?)\s+").unwrap();
    let Some(cap) = re.captures(s) else {
        return Ok((Bigr::default(), s))
    };

    let h = cap[1].parse::<i32>().map_err(|e| e.to_string())?;
    let q = cap[2].parse::<i32>().map_err(|e| e.to_string())?;
    let rest = &s[cap.get(0).unwrap().end()..];
    Ok((Bigr::new(h, q), rest))
}

/// Splits the body into `(generator, arrow text)` pairs.
fn split_nodes(s: &str) -> Result<Vec<(Idem, String)>, String> {
    let mut nodes: Vec<(Idem, String)> = vec![];
    for c in s.chars() {
        match c {
            '⬮' => nodes.push((Idem::B, String::new())),
            '⬯' => nodes.push((Idem::C, String::new())),
            c => {
                let Some(last) = nodes.last_mut() else {
                    return Err(format!("unexpected '{c}' before first generator"))
                };
                last.1.push(c);
            }
        }
    }
    if nodes.is_empty() {
        return Err(String::from("no generators found"))
    }
    Ok(nodes)
}

fn parse_label<R>(tok: &str) -> Result<(i32, R), String>
where R: Ring + FromStr, for<'x> &'x R: RingOps<R> {
    let re = Regex::new(r"^(-)?(?:([^.]+)\.)?(D|S|H|id)(?:\^(\d+))?$").unwrap();
    let cap = re.captures(tok).ok_or_else(|| format!("bad label '{tok}'"))?;

    let mut coeff = match cap.get(2) {
        Some(c) => R::from_str(c.as_str()).map_err(|_| format!("bad coefficient '{}'", c.as_str()))?,
        None => R::one()
    };
    if cap.get(1).is_some() {
        coeff = -coeff;
    }

    let e = match cap.get(4) {
        Some(e) => e.as_str().parse::<i32>().map_err(|e| e.to_string())?,
        None => 1
    };
    let ty = match &cap[3] {
        "D" | "H" => e,
        "S" => -e,
        _ => 0
    };
    Ok((ty, coeff))
}

/// Splits a sum of labels at `+` and at each `-` starting a new label.
fn parse_label_sum<R>(s: &str) -> Result<Vec<(i32, R)>, String>
where R: Ring + FromStr, for<'x> &'x R: RingOps<R> {
    let mut toks = vec![];
    let mut cur = String::new();
    for c in s.chars() {
        match c {
            '+' if !cur.is_empty() => toks.push(std::mem::take(&mut cur)),
            '-' if !cur.is_empty() => {
                toks.push(std::mem::take(&mut cur));
                cur.push('-');
            },
            _ => cur.push(c)
        }
    }
    if cur.is_empty() {
        return Err(format!("bad label sum '{s}'"))
    }
    toks.push(cur);

    toks.iter().map(|t| parse_label(t)).collect()
}

fn parse_connector<R>(conn: &str, this: Idem, next: Idem) -> Result<(BnMor<R>, bool), String>
where R: Ring + FromStr, for<'x> &'x R: RingOps<R> {
    let rightarrow = !conn.starts_with('<');
    let body = if rightarrow {
        conn.strip_suffix('>').ok_or_else(|| format!("arrow '{conn}' does not close with '>'"))?
    } else {
        &conn[1..]
    };

    let line = body.chars().next().ok_or_else(|| format!("empty arrow '{conn}'"))?;
    if line != '—' && line != '~' {
        return Err(format!("bad arrow line '{line}'"))
    }

    let (front, back) = if rightarrow { (this, next) } else { (next, this) };

    let label = body.trim_matches(|c| c == '—' || c == '~');
    let mor = if label.is_empty() {
        let ty = if line == '—' { 1 } else { -1 };
        BnMor::gen(front, back, ty, R::one())
    } else {
        let label = label.strip_prefix('(')
            .and_then(|l| l.strip_suffix(')'))
            .unwrap_or(label);
        BnMor::new(front, back, parse_label_sum(label)?)
    };

    Ok((mor, rightarrow))
}

impl<R> FromStr for Chain<R>
where R: Ring + FromStr, for<'x> &'x R: RingOps<R> {
    type Err = String;

    /// Parses the loop-type text format, e.g. `h^0 q^0 δ^0 ⬮~~S~>⬯<—`.
    /// Only the first generator carries its grading; the rest default
    /// to (0, 0).
    fn from_str(s: &str) -> Result<Self, String> {
        let (gr, rest) = parse_gr_prefix(s.trim())?;
        let nodes = split_nodes(rest)?;
        let n = nodes.len();

        let mut clinks = Vec::with_capacity(n);
        for (i, (idem, conn)) in nodes.iter().enumerate() {
            let obj = if i == 0 {
                BnObj::new(*idem, gr.h, gr.q)
            } else {
                BnObj::new(*idem, 0, 0)
            };

            if conn.is_empty() {
                if i + 1 != n {
                    return Err(String::from("missing arrow between generators"))
                }
                clinks.push(Clink::new(obj, BnMor::zero(), true));
            } else {
                let next = nodes[(i + 1) % n].0;
                let (mor, rightarrow) = parse_connector(conn, *idem, next)?;
                clinks.push(Clink::new(obj, mor, rightarrow));
            }
        }

        Ok(Chain::new(clinks))
    }
}

impl<R> FromStr for Clink<R>
where R: Ring + FromStr, for<'x> &'x R: RingOps<R> {
    type Err = String;

    /// Parses a single generator with its arrow. A trailing generator
    /// may name the arrow's other end; without one the arrow is read
    /// as an endomorphism.
    fn from_str(s: &str) -> Result<Self, String> {
        let (gr, rest) = parse_gr_prefix(s.trim())?;
        let nodes = split_nodes(rest)?;

        if nodes.len() > 2 || (nodes.len() == 2 && !nodes[1].1.is_empty()) {
            return Err(String::from("expected a single clink"))
        }

        let (idem, conn) = &nodes[0];
        let obj = BnObj::new(*idem, gr.h, gr.q);

        if conn.is_empty() {
            return Ok(Clink::new(obj, BnMor::zero(), true))
        }

        let next = nodes.get(1).map_or(*idem, |n| n.0);
        let (mor, rightarrow) = parse_connector(conn, *idem, next)?;
        Ok(Clink::new(obj, mor, rightarrow))
    }
}

#[cfg(test)]
mod tests {
    use khr::F5;
    use khr_cob::Idem::{B, C};
    use crate::MorMat;
    use super::*;

    fn widths() -> GrWidths {
        GrWidths::collect(std::iter::once(&Bigr::new(0, 0)))
    }

    #[test]
    fn clink_display() {
        let w = widths();

        let c = Clink::new(BnObj::new(B, 0, 0), BnMor::<i64>::gen(B, C, 1, 1), true);
        assert_eq!(c.to_string_mode(&w, false, false, true), "⬮—>");
        assert_eq!(c.to_string_mode(&w, true, true, true), "h^0 q^0 δ^0 ⬮——D—>");

        let c = Clink::new(BnObj::new(C, 0, 0), BnMor::<i64>::gen(B, C, -1, 1), false);
        assert_eq!(c.to_string_mode(&w, false, false, true), "⬯<~");
        assert_eq!(c.to_string_mode(&w, false, true, true), "⬯<~S~~");

        // non-unit coefficients force the label
        let c = Clink::new(BnObj::new(B, 0, 0), BnMor::<i64>::gen(B, B, 1, -1), true);
        assert_eq!(c.to_string_mode(&w, false, false, true), "⬮——(-D)—>");

        let c = Clink::new(BnObj::new(B, 0, 0), BnMor::<i64>::zero(), true);
        assert_eq!(c.to_string_mode(&w, false, false, true), "⬮");
    }

    #[test]
    fn chain_display() {
        let chain = Chain::new(vec![
            Clink::new(BnObj::new(B, 0, 0), BnMor::<i64>::gen(B, C, -1, 1), true),
            Clink::new(BnObj::new(C, 0, 0), BnMor::<i64>::gen(B, C, 1, 1), false)
        ]);
        assert_eq!(chain.to_string(), "h^0 q^0 δ^0 ⬮~~S~>⬯<—");
    }

    #[test]
    fn chain_parse() {
        let chain = Chain::new(vec![
            Clink::new(BnObj::new(B, 0, 0), BnMor::<i64>::gen(B, C, -1, 1), true),
            Clink::new(BnObj::new(C, 0, 0), BnMor::<i64>::gen(B, C, 1, 1), false)
        ]);
        let parsed: Chain<i64> = chain.to_string().parse().unwrap();
        assert_eq!(parsed, chain);

        // powers and coefficients
        let chain = Chain::new(vec![
            Clink::new(BnObj::new(B, 1, 2), BnMor::<i64>::gen(B, C, 2, -3), true),
            Clink::new(BnObj::new(C, 0, 0), BnMor::<i64>::gen(B, C, -1, 1), false)
        ]);
        assert_eq!(chain.to_string(), "h^1 q^2 δ^0 ⬮——(-3.D^2)—>⬯<~");
        let parsed: Chain<i64> = chain.to_string().parse().unwrap();
        assert_eq!(parsed, chain);

        // arcs end without an arrow
        let parsed: Chain<i64> = "⬮~>⬯".parse().unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.clinks()[0].mor, BnMor::gen(B, C, -1, 1));
        assert!(parsed.clinks()[1].mor.is_zero());

        assert!("⬮—".parse::<Chain<i64>>().is_err());
        assert!("x".parse::<Chain<i64>>().is_err());
    }

    #[test]
    fn chains_parse() {
        let chains = Chains::new(vec![
            Chain::new(vec![
                Clink::new(BnObj::new(B, 0, 1), BnMor::<i64>::gen(B, C, -1, 1), true),
                Clink::new(BnObj::new(C, 0, 0), BnMor::<i64>::gen(C, B, 1, 1), true),
                Clink::new(BnObj::new(B, 0, 0), BnMor::<i64>::gen(B, C, -1, 1), true),
                Clink::new(BnObj::new(C, 0, 0), BnMor::<i64>::gen(B, C, 1, 1), false)
            ]),
            Chain::new(vec![
                Clink::new(BnObj::new(B, 0, 0), BnMor::<i64>::gen(B, C, -1, 1), true),
                Clink::new(BnObj::new(C, 0, 0), BnMor::<i64>::zero(), true)
            ])
        ]);

        let plain = chains.to_string_mode(true, false);
        let parsed: Chains<i64> = plain.parse().unwrap();
        assert_eq!(parsed, chains);
        assert_eq!(parsed.to_string_mode(true, false), plain);

        // curve names and counters are stripped on the way in
        let loops = Chains::new(vec![chains.chains()[0].clone()]);
        let listed = loops.to_string_mode(true, true);
        let parsed: Chains<i64> = listed.parse().unwrap();
        assert_eq!(parsed, loops);
    }

    #[test]
    fn clink_parse() {
        let c: Clink<i64> = "⬮~~S^2~>⬯".parse().unwrap();
        assert_eq!(c.obj, BnObj::new(B, 0, 0));
        assert_eq!(c.mor, BnMor::gen(B, C, -2, 1));
        assert!(c.rightarrow);

        let c: Clink<i64> = "h^1 q^3 δ^1/2 ⬯<—".parse().unwrap();
        assert_eq!(c.obj, BnObj::new(C, 1, 3));
        assert_eq!(c.mor, BnMor::gen(C, C, 1, 1));
        assert!(!c.rightarrow);
    }

    #[test]
    fn fix_shorts() {
        let m = BnMor::<i64>::new(B, C, vec![(1, 1), (-1, 1)]);
        let mut chain = Chain::new(vec![
            Clink::new(BnObj::new(B, 0, 0), m, true),
            Clink::new(BnObj::new(C, 0, 0), BnMor::zero(), true)
        ]);
        chain.fix_shorts();

        assert_eq!(chain.clinks()[0].mor, BnMor::gen(B, C, -1, 1));
        assert!(chain.clinks()[0].rightarrow);
        assert_eq!(chain.clinks()[1].mor, BnMor::gen(B, C, 1, 1));
        assert!(!chain.clinks()[1].rightarrow);
    }

    #[test]
    fn sort_arc() {
        let mut chain = Chain::new(vec![
            Clink::new(BnObj::new(C, 0, 2), BnMor::<i64>::gen(C, C, 1, 1), false),
            Clink::new(BnObj::new(C, 0, 1), BnMor::<i64>::gen(B, C, -1, 1), false),
            Clink::new(BnObj::new(B, 0, 0), BnMor::zero(), false)
        ]);
        chain.sort();

        let qs = chain.clinks().iter().map(|c| c.obj.gr.q).collect_vec();
        assert_eq!(qs, vec![0, 1, 2]);
        assert_eq!(chain.clinks()[0].mor, BnMor::gen(B, C, -1, 1));
        assert!(chain.clinks()[0].rightarrow);
        assert!(chain.clinks()[2].mor.is_zero());
    }

    #[test]
    fn sort_loop() {
        let mut chain = Chain::new(vec![
            Clink::new(BnObj::new(B, 0, 1), BnMor::<i64>::gen(B, C, -1, 1), true),
            Clink::new(BnObj::new(C, 0, 0), BnMor::<i64>::gen(C, B, 1, 1), true),
            Clink::new(BnObj::new(B, 0, 2), BnMor::<i64>::gen(B, C, -1, 1), true),
            Clink::new(BnObj::new(C, 0, 3), BnMor::<i64>::gen(C, B, 1, 1), false)
        ]);
        chain.sort();

        let qs = chain.clinks().iter().map(|c| c.obj.gr.q).collect_vec();
        assert_eq!(qs, vec![0, 1, 3, 2]);
        assert_eq!(chain.clinks()[0].mor.first_type(), Some(-1));
        assert!(!chain.clinks()[0].rightarrow);
    }

    #[test]
    fn concentrate() {
        let mut chain = Chain::new(vec![
            Clink::new(BnObj::new(B, 0, 0), BnMor::gen(B, C, -1, F5::new(2)), true),
            Clink::new(BnObj::new(C, 0, 0), BnMor::gen(C, B, 1, F5::new(3)), false)
        ]);
        chain.concentrate_local_system();

        // 2 · 3⁻¹ = 2 · 2 = 4 in F5
        assert_eq!(chain.clinks()[0].mor, BnMor::gen(B, C, -1, F5::new(4)));
        assert_eq!(chain.clinks()[1].mor, BnMor::gen(C, B, 1, F5::new(1)));
    }

    #[test]
    fn to_chains_arc() {
        let mut diff = MorMat::new(3);
        diff.set(1, 0, BnMor::<i64>::gen(B, C, -1, 1));
        diff.set(2, 1, BnMor::<i64>::gen(C, C, 1, 1));
        let cx = Complex::new(vec![
            BnObj::new(B, 0, 0), BnObj::new(C, 0, 1), BnObj::new(C, 0, 2)
        ], diff);

        let chains = cx.to_chains();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains.to_string_mode(true, false), "1) h^0 q^0 δ^0 ⬮~~S~>⬯—>⬯\n");
    }

    #[test]
    fn to_chains_loop() {
        // both arrows of a 2-loop sit in a single matrix entry
        let mut diff = MorMat::new(2);
        diff.set(1, 0, BnMor::<i64>::new(B, C, vec![(1, 1), (-1, 1)]));
        let cx = Complex::new(vec![BnObj::new(B, 0, 0), BnObj::new(C, 0, 1)], diff);

        let chains = cx.to_chains();
        assert_eq!(chains.len(), 1);

        let chain = &chains.chains()[0];
        assert!(chain.is_loop());
        assert_eq!(chain.clinks()[0].mor, BnMor::gen(B, C, -1, 1));
        assert!(chain.clinks()[0].rightarrow);
        assert_eq!(chain.clinks()[1].mor, BnMor::gen(B, C, 1, 1));
        assert!(!chain.clinks()[1].rightarrow);
    }

    #[test]
    fn to_chains_not_loop_type() {
        let mut diff = MorMat::new(3);
        diff.set(1, 0, BnMor::<i64>::gen(B, C, -1, 1));
        diff.set(2, 0, BnMor::<i64>::gen(B, C, -3, 1));
        let cx = Complex::new(vec![
            BnObj::new(B, 0, 0), BnObj::new(C, 0, 1), BnObj::new(C, 0, 2)
        ], diff);

        assert!(cx.to_chains().is_empty());
    }

    #[test]
    fn curve_rational() {
        let chain = Chain::new(vec![
            Clink::new(BnObj::new(B, 0, 1), BnMor::<i64>::gen(B, C, -1, 1), true),
            Clink::new(BnObj::new(C, 0, 1), BnMor::<i64>::gen(C, B, 1, 1), true),
            Clink::new(BnObj::new(B, 0, 1), BnMor::<i64>::gen(B, C, -1, 1), true),
            Clink::new(BnObj::new(C, 0, 1), BnMor::<i64>::gen(C, B, 1, 1), false)
        ]);
        let curve = chain.to_khr_curve();

        assert!(curve.is_rational());
        assert_eq!(curve, KhrCurve::new(-1, -1, 1, Frac::new(1, 2), Frac::from(1)));
        assert_eq!(curve.to_string(), "r(-1) q^1 δ|^1/2");
    }

    #[test]
    fn curve_slope_zero() {
        let idems = [C, B, B, B, B, C, C, B, B, B, B, C];
        let clinks = idems.iter().enumerate().map(|(i, &idem)| {
            let ty = if i % 2 == 0 { -1 } else { 1 };
            Clink::new(BnObj::new(idem, 0, 0), BnMor::<i64>::gen(B, C, ty, 1), i < 6)
        }).collect_vec();
        let curve = Chain::new(clinks).to_khr_curve();

        assert!(curve.is_special());
        assert_eq!(curve, KhrCurve::new(4, 0, 1, Frac::from(0), Frac::from(0)));
        assert_eq!(curve.to_string(), "s4(0) q^0 δ|^0");
    }

    #[test]
    fn chain_order() {
        let short = Chain::new(vec![
            Clink::new(BnObj::new(C, 0, 0), BnMor::<i64>::zero(), true)
        ]);
        let long: Chain<i64> = "⬮~>⬯".parse().unwrap();
        assert!(short < long);

        let b: Chain<i64> = "⬮".parse().unwrap();
        let c: Chain<i64> = "⬯".parse().unwrap();
        assert!(b < c);
    }
}
