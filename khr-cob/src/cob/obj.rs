use std::fmt;
use std::fmt::Display;
use is_even::IsEven;
use itertools::Itertools;
use crate::{Bigr, BnObj, Idem};

/// Crossingless tangle: `arcs[i]` is the endpoint paired with endpoint
/// `i`, with endpoints `0 .. top` on the top boundary and the rest on
/// the bottom. The pairing is a fixed-point-free involution without
/// crossings.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CobObj {
    top: usize,
    arcs: Vec<usize>,
    pub gr: Bigr
}

impl CobObj {
    pub fn new(top: usize, arcs: Vec<usize>, gr: Bigr) -> Self {
        let res = Self { top, arcs, gr };
        assert!(res.check());
        res
    }

    /// The 4-ended tangle ⬮ pairing top with top, bottom with bottom.
    pub fn b() -> Self {
        Self::new(2, vec![1, 0, 3, 2], Bigr::default())
    }

    /// The 4-ended tangle ⬯ pairing left with left, right with right.
    pub fn c() -> Self {
        Self::new(2, vec![3, 2, 1, 0], Bigr::default())
    }

    fn check(&self) -> bool {
        let n = self.arcs.len();
        if self.top > n {
            return false
        }

        // fixed-point-free involution
        for (i, &j) in self.arcs.iter().enumerate() {
            if j >= n || j == i || self.arcs[j] != i {
                return false
            }
        }

        // non-crossing
        let pairs = self.arcs.iter().enumerate().filter_map(|(i, &j)|
            (i < j).then_some((i, j))
        ).collect_vec();

        for (k, &(a, b)) in pairs.iter().enumerate() {
            for &(c, d) in pairs[k + 1 ..].iter() {
                let (a, b, c, d) = if a < c { (a, b, c, d) } else { (c, d, a, b) };
                if c < b && b < d {
                    return false
                }
            }
        }

        true
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn arcs(&self) -> &[usize] {
        &self.arcs
    }

    pub fn ends(&self) -> usize {
        self.arcs.len()
    }

    pub fn strands(&self) -> usize {
        self.ends() / 2
    }

    pub fn is_4ended(&self) -> bool {
        self.ends() == 4
    }

    pub fn h_is_even(&self) -> bool {
        self.gr.h.is_even()
    }

    pub fn shift(&mut self, dh: i32, dq: i32) {
        self.gr.shift(dh, dq);
    }

    pub fn shifted(&self, dh: i32, dq: i32) -> Self {
        Self { top: self.top, arcs: self.arcs.clone(), gr: self.gr.shifted(dh, dq) }
    }

    /// Same underlying tangle, gradings ignored.
    pub fn compatible(&self, other: &Self) -> bool {
        self.top == other.top && self.arcs == other.arcs
    }

    /// True iff cupping at `i` closes off a circle.
    pub fn cup_gives_circle(&self, i: usize) -> bool {
        self.arcs[i] == i + 1
    }

    /// Inserts a new arc occupying slots `i`, `i + 1`.
    pub fn add_cap(&mut self, i: usize) {
        for j in self.arcs.iter_mut() {
            if *j >= i {
                *j += 2;
            }
        }
        self.arcs.splice(i..i, [i + 1, i]);
    }

    /// Joins the arcs at slots `i`, `i + 1` and removes both slots.
    /// The caller handles the circle case separately.
    pub fn add_cup(&mut self, i: usize) {
        let j = self.arcs[i];
        let k = self.arcs[i + 1];

        if !self.cup_gives_circle(i) {
            self.arcs[j] = k;
            self.arcs[k] = j;
        }

        self.arcs.drain(i..i + 2);
        for j in self.arcs.iter_mut() {
            if *j > i {
                *j -= 2;
            }
        }
    }

    pub fn to_bn(&self) -> BnObj {
        let idem = match self.strands() {
            1 => Idem::B,
            2 => {
                let horiz = self.arcs == [1, 0, 3, 2];
                if horiz == (self.top == 2) { Idem::B } else { Idem::C }
            },
            _ => panic!("no algebra for {self}")
        };
        BnObj { idem, gr: self.gr }
    }
}

/// Boundary components of the cobordism with the given front and back
/// arcs. Each component lists the endpoints it meets, starting from the
/// smallest; components are ordered by their smallest endpoint.
pub fn components(front: &[usize], back: &[usize]) -> Vec<Vec<usize>> {
    let n = front.len();
    let mut visited = vec![false; n];
    let mut comps = vec![];

    for i in 0..n {
        if visited[i] {
            continue
        }
        let mut comp = vec![];
        let mut cur = i;
        loop {
            comp.push(cur);
            visited[cur] = true;

            let j = front[cur];
            comp.push(j);
            visited[j] = true;

            cur = back[j];
            if cur == i {
                break
            }
        }
        comps.push(comp);
    }

    comps
}

impl Display for CobObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}|{}]", self.top, self.arcs.iter().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check() {
        let _ = CobObj::b();
        let _ = CobObj::c();
        let _ = CobObj::new(1, vec![1, 0], Bigr::default());
        let _ = CobObj::new(3, vec![1, 0, 3, 2, 5, 4], Bigr::default());
    }

    #[test]
    #[should_panic]
    fn check_crossing() {
        let _ = CobObj::new(2, vec![2, 3, 0, 1], Bigr::default());
    }

    #[test]
    fn to_bn() {
        assert_eq!(CobObj::b().to_bn().idem, Idem::B);
        assert_eq!(CobObj::c().to_bn().idem, Idem::C);
        assert_eq!(CobObj::new(1, vec![1, 0], Bigr::default()).to_bn().idem, Idem::B);

        // with one end on top, the roles swap
        assert_eq!(CobObj::new(1, vec![3, 2, 1, 0], Bigr::default()).to_bn().idem, Idem::B);
        assert_eq!(CobObj::new(1, vec![1, 0, 3, 2], Bigr::default()).to_bn().idem, Idem::C);
    }

    #[test]
    fn cap() {
        let mut o = CobObj::b();
        o.add_cap(2);
        assert_eq!(o.arcs(), &[1, 0, 3, 2, 5, 4]);

        let mut o = CobObj::c();
        o.add_cap(1);
        assert_eq!(o.arcs(), &[5, 2, 1, 4, 3, 0]);
    }

    #[test]
    fn cup() {
        let mut o = CobObj::new(2, vec![1, 0, 3, 2, 5, 4], Bigr::default());
        assert!(!o.cup_gives_circle(3));
        o.add_cup(3);
        assert_eq!(o.arcs(), &[1, 0, 3, 2]);

        let mut o = CobObj::new(2, vec![1, 0, 3, 2, 5, 4], Bigr::default());
        assert!(o.cup_gives_circle(2));
        o.add_cup(2);
        assert_eq!(o.arcs(), &[1, 0, 3, 2]);
    }

    #[test]
    fn comps() {
        // identity on b
        let b = CobObj::b();
        let comps = components(b.arcs(), b.arcs());
        assert_eq!(comps, vec![vec![0, 1], vec![2, 3]]);

        // saddle b -> c
        let c = CobObj::c();
        let comps = components(b.arcs(), c.arcs());
        assert_eq!(comps, vec![vec![0, 1, 2, 3]]);
    }
}
